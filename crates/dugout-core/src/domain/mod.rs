pub mod chunk;
pub mod record;
pub mod table;

pub use chunk::{format_date, parse_date, DateChunk, DateChunks, DateRange};
pub use record::{coerce_float, coerce_int, Record};
pub use table::{infer_cell, ColumnKind, Table, TableRow};
