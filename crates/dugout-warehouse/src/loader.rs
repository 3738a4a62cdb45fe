//! Batch loaders for raw tables.
//!
//! Tables with a [`ConflictKey`] are upserted: a colliding row overwrites every
//! non-key column and refreshes `loaded_at`. Tables without one are append-only
//! and never deduplicated. Either way a call commits as one transaction.

use std::fmt::Write as _;

use ::duckdb::{params_from_iter, Connection};

use crate::row::Row;
use crate::{finalize_transaction, WarehouseError};

/// Rows per multi-row `INSERT` statement in append mode.
pub const APPEND_PAGE_SIZE: usize = 1_000;

const LOADED_AT: &str = "loaded_at";

/// Ordered column set that identifies one logical record in a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictKey(&'static [&'static str]);

impl ConflictKey {
    pub const fn new(columns: &'static [&'static str]) -> Self {
        Self(columns)
    }

    pub const fn columns(self) -> &'static [&'static str] {
        self.0
    }

    pub fn contains(self, column: &str) -> bool {
        self.0.contains(&column)
    }
}

/// Target table plus its load discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub conflict_key: Option<ConflictKey>,
}

impl TableSpec {
    pub const fn upsert(name: &'static str, key: &'static [&'static str]) -> Self {
        Self {
            name,
            conflict_key: Some(ConflictKey::new(key)),
        }
    }

    pub const fn append(name: &'static str) -> Self {
        Self {
            name,
            conflict_key: None,
        }
    }
}

/// Load `rows` into `table` using the table's declared discipline.
///
/// Returns the number of rows submitted.
pub fn load_rows(
    connection: &Connection,
    table: &TableSpec,
    rows: &[Row],
) -> Result<usize, WarehouseError> {
    match table.conflict_key {
        Some(key) => upsert_rows(connection, table.name, rows, key),
        None => append_rows(connection, table.name, rows),
    }
}

/// Insert-or-merge `rows` keyed by `key`.
///
/// The first row fixes the batch schema; every other row must carry exactly
/// the same columns in the same order. An empty batch touches nothing.
pub fn upsert_rows(
    connection: &Connection,
    table: &str,
    rows: &[Row],
    key: ConflictKey,
) -> Result<usize, WarehouseError> {
    let Some(first) = rows.first() else {
        return Ok(0);
    };
    check_batch_schema(table, rows)?;

    let columns = first.columns().collect::<Vec<_>>();
    if let Some(missing) = key.columns().iter().find(|column| !columns.contains(column)) {
        return Err(WarehouseError::InvalidBatch(format!(
            "{table}: conflict column '{missing}' is not part of the batch"
        )));
    }

    let sql = upsert_sql(table, &columns, key);
    connection.execute_batch("BEGIN TRANSACTION")?;
    let result = (|| -> Result<usize, WarehouseError> {
        let mut statement = connection.prepare(&sql)?;
        for row in rows {
            statement.execute(params_from_iter(row.values()))?;
        }
        Ok(rows.len())
    })();

    let count = finalize_transaction(connection, result)?;
    tracing::debug!(table, rows = count, "upserted batch");
    Ok(count)
}

/// Insert every row as a new record. No duplicate detection.
pub fn append_rows(
    connection: &Connection,
    table: &str,
    rows: &[Row],
) -> Result<usize, WarehouseError> {
    let Some(first) = rows.first() else {
        return Ok(0);
    };
    check_batch_schema(table, rows)?;

    let columns = first.columns().collect::<Vec<_>>();
    connection.execute_batch("BEGIN TRANSACTION")?;
    let result = (|| -> Result<usize, WarehouseError> {
        for page in rows.chunks(APPEND_PAGE_SIZE) {
            let sql = insert_sql(table, &columns, page.len());
            let mut statement = connection.prepare_cached(&sql)?;
            statement.execute(params_from_iter(page.iter().flat_map(Row::values)))?;
        }
        Ok(rows.len())
    })();

    let count = finalize_transaction(connection, result)?;
    tracing::debug!(table, rows = count, "appended batch");
    Ok(count)
}

fn check_batch_schema(table: &str, rows: &[Row]) -> Result<(), WarehouseError> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    if first.is_empty() {
        return Err(WarehouseError::InvalidBatch(format!(
            "{table}: rows must carry at least one column"
        )));
    }
    if let Some(index) = rows.iter().position(|row| !row.same_schema(first)) {
        return Err(WarehouseError::InvalidBatch(format!(
            "{table}: row {index} does not match the column set of row 0"
        )));
    }
    Ok(())
}

fn upsert_sql(table: &str, columns: &[&str], key: ConflictKey) -> String {
    let mut sql = insert_sql(table, columns, 1);
    let conflict = key
        .columns()
        .iter()
        .map(|column| quote_identifier(column))
        .collect::<Vec<_>>()
        .join(", ");
    let updates = columns
        .iter()
        .filter(|column| !key.contains(column) && **column != LOADED_AT)
        .map(|column| {
            let column = quote_identifier(column);
            format!("{column} = EXCLUDED.{column}")
        })
        .collect::<Vec<_>>();

    let _ = write!(sql, " ON CONFLICT ({conflict}) ");
    if updates.is_empty() {
        sql.push_str("DO NOTHING");
    } else {
        let _ = write!(
            sql,
            "DO UPDATE SET {}, {} = now()",
            updates.join(", "),
            quote_identifier(LOADED_AT)
        );
    }
    sql
}

fn insert_sql(table: &str, columns: &[&str], row_count: usize) -> String {
    let column_list = columns
        .iter()
        .map(|column| quote_identifier(column))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = format!("({})", vec!["?"; columns.len()].join(", "));
    let values = vec![placeholders.as_str(); row_count].join(", ");
    format!(
        "INSERT INTO {} ({column_list}) VALUES {values}",
        quote_qualified(table)
    )
}

pub(crate) fn quote_qualified(table: &str) -> String {
    table
        .split('.')
        .map(quote_identifier)
        .collect::<Vec<_>>()
        .join(".")
}

fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: ConflictKey = ConflictKey::new(&["player_id", "season"]);

    #[test]
    fn upsert_sql_updates_non_key_columns_and_refreshes_loaded_at() {
        let sql = upsert_sql("raw_mlb.raw_x", &["player_id", "season", "hits"], KEY);

        assert_eq!(
            sql,
            "INSERT INTO \"raw_mlb\".\"raw_x\" (\"player_id\", \"season\", \"hits\") VALUES (?, ?, ?) \
ON CONFLICT (\"player_id\", \"season\") DO UPDATE SET \"hits\" = EXCLUDED.\"hits\", \"loaded_at\" = now()"
        );
    }

    #[test]
    fn upsert_sql_with_only_key_columns_does_nothing_on_conflict() {
        let sql = upsert_sql("t", &["player_id", "season"], KEY);
        assert!(sql.ends_with("ON CONFLICT (\"player_id\", \"season\") DO NOTHING"));
    }

    #[test]
    fn insert_sql_repeats_placeholder_groups_per_row() {
        let sql = insert_sql("t", &["a", "b"], 3);
        assert_eq!(
            sql,
            "INSERT INTO \"t\" (\"a\", \"b\") VALUES (?, ?), (?, ?), (?, ?)"
        );
    }

    #[test]
    fn empty_batches_perform_no_statements() {
        // The table does not exist, so any statement would fail.
        let connection = Connection::open_in_memory().expect("duckdb");

        assert_eq!(append_rows(&connection, "missing", &[]).expect("append"), 0);
        assert_eq!(upsert_rows(&connection, "missing", &[], KEY).expect("upsert"), 0);
    }

    #[test]
    fn mismatched_rows_are_rejected_before_any_write() {
        let connection = Connection::open_in_memory().expect("duckdb");
        connection
            .execute_batch("CREATE TABLE t (a BIGINT, b BIGINT)")
            .expect("create");

        let rows = vec![
            Row::new().with("a", 1_i64).with("b", 2_i64),
            Row::new().with("a", 1_i64),
        ];
        let error = append_rows(&connection, "t", &rows).expect_err("schema mismatch");
        assert!(matches!(error, WarehouseError::InvalidBatch(_)));

        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 0);
    }

    #[test]
    fn failed_batch_rolls_back_every_row() {
        let connection = Connection::open_in_memory().expect("duckdb");
        connection
            .execute_batch("CREATE TABLE t (a BIGINT NOT NULL)")
            .expect("create");

        let rows = vec![
            Row::new().with("a", 1_i64),
            Row::new().with("a", None::<i64>),
        ];
        append_rows(&connection, "t", &rows).expect_err("not null violation");
        upsert_rows(
            &connection,
            "t",
            &rows,
            ConflictKey::new(&["a"]),
        )
        .expect_err("no unique constraint to conflict on");

        let count: i64 = connection
            .query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 0);
    }
}
