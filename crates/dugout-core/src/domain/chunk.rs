//! Inclusive date ranges and their fixed-width chunking.
//!
//! A [`DateRange`] is validated once; [`DateChunks`] then walks it in
//! `chunk_days` windows, the last one clipped to the range end.

use std::fmt::{Display, Formatter};

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration};

use crate::ValidationError;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` date, naming `field` in the error.
pub fn parse_date(field: &'static str, value: &str) -> Result<Date, ValidationError> {
    Date::parse(value.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field,
        value: value.to_owned(),
    })
}

/// Render a date as `YYYY-MM-DD`.
pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

/// Inclusive sub-range of a [`DateRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateChunk {
    pub start: Date,
    pub end: Date,
}

impl DateChunk {
    /// Number of calendar days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end - self.start).whole_days() + 1
    }
}

impl Display for DateChunk {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", format_date(self.start), format_date(self.end))
    }
}

/// Inclusive date interval split into chunks of at most `chunk_days` days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: Date,
    end: Date,
    chunk_days: u32,
}

impl DateRange {
    pub fn new(start: Date, end: Date, chunk_days: u32) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidDateRange {
                start: format_date(start),
                end: format_date(end),
            });
        }
        if chunk_days == 0 {
            return Err(ValidationError::InvalidChunkDays { value: chunk_days });
        }
        Ok(Self {
            start,
            end,
            chunk_days,
        })
    }

    pub const fn start(&self) -> Date {
        self.start
    }

    pub const fn end(&self) -> Date {
        self.end
    }

    pub const fn chunk_days(&self) -> u32 {
        self.chunk_days
    }

    /// Fresh iterator over the chunks, ascending.
    pub fn chunks(&self) -> DateChunks {
        DateChunks {
            next: Some(self.start),
            end: self.end,
            span: Duration::days(i64::from(self.chunk_days) - 1),
        }
    }

    pub fn chunk_count(&self) -> usize {
        let days = (self.end - self.start).whole_days() + 1;
        let per_chunk = i64::from(self.chunk_days);
        usize::try_from((days + per_chunk - 1) / per_chunk).unwrap_or(usize::MAX)
    }
}

/// Lazy chunk sequence produced by [`DateRange::chunks`].
#[derive(Debug, Clone)]
pub struct DateChunks {
    next: Option<Date>,
    end: Date,
    span: Duration,
}

impl Iterator for DateChunks {
    type Item = DateChunk;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next?;
        let end = start
            .checked_add(self.span)
            .map_or(self.end, |candidate| candidate.min(self.end));
        self.next = if end < self.end { end.next_day() } else { None };
        Some(DateChunk { start, end })
    }
}

impl std::iter::FusedIterator for DateChunks {}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn chunk(start: Date, end: Date) -> DateChunk {
        DateChunk { start, end }
    }

    #[test]
    fn splits_into_bounded_adjoining_chunks() {
        let range = DateRange::new(date!(2024 - 04 - 01), date!(2024 - 04 - 12), 5).expect("range");

        assert_eq!(
            range.chunks().collect::<Vec<_>>(),
            vec![
                chunk(date!(2024 - 04 - 01), date!(2024 - 04 - 05)),
                chunk(date!(2024 - 04 - 06), date!(2024 - 04 - 10)),
                chunk(date!(2024 - 04 - 11), date!(2024 - 04 - 12)),
            ]
        );
        assert_eq!(range.chunk_count(), 3);
    }

    #[test]
    fn single_day_range_yields_one_chunk() {
        let day = date!(2024 - 07 - 04);
        let range = DateRange::new(day, day, 5).expect("range");

        assert_eq!(range.chunks().collect::<Vec<_>>(), vec![chunk(day, day)]);
        assert_eq!(range.chunk_count(), 1);
    }

    #[test]
    fn chunks_are_restartable() {
        let range = DateRange::new(date!(2024 - 03 - 28), date!(2024 - 09 - 29), 7).expect("range");
        let first = range.chunks().collect::<Vec<_>>();
        let second = range.chunks().collect::<Vec<_>>();

        assert_eq!(first, second);
        assert_eq!(first.len(), range.chunk_count());
    }

    #[test]
    fn rejects_inverted_range_and_zero_chunk_size() {
        let err = DateRange::new(date!(2024 - 05 - 02), date!(2024 - 05 - 01), 5)
            .expect_err("inverted");
        assert!(matches!(err, ValidationError::InvalidDateRange { .. }));

        let err = DateRange::new(date!(2024 - 05 - 01), date!(2024 - 05 - 02), 0)
            .expect_err("zero chunk");
        assert_eq!(err, ValidationError::InvalidChunkDays { value: 0 });
    }

    #[test]
    fn parses_and_formats_iso_dates() {
        let parsed = parse_date("statcast.start_date", "2024-03-28").expect("date");
        assert_eq!(parsed, date!(2024 - 03 - 28));
        assert_eq!(format_date(parsed), "2024-03-28");
        assert!(parse_date("statcast.start_date", "03/28/2024").is_err());
    }
}
