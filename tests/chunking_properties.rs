//! Property tests for date-range chunking.
//!
//! For any valid range and chunk length the chunk sequence must:
//! 1. Start at the range start and end at the range end
//! 2. Be ascending and contiguous, with no gaps or overlaps
//! 3. Never exceed the chunk length
//! 4. Agree with `chunk_count`

use dugout_core::domain::{DateChunk, DateRange};
use dugout_core::ValidationError;
use proptest::prelude::*;
use time::{Date, Duration};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_date() -> impl Strategy<Value = Date> {
    // 2000-01-01 .. roughly 2040
    (0_i64..15_000).prop_map(|offset| {
        Date::from_ordinal_date(2000, 1)
            .map(|base| base + Duration::days(offset))
            .unwrap_or(Date::MIN)
    })
}

fn arb_range() -> impl Strategy<Value = (Date, Date, u32)> {
    (arb_date(), 0_i64..400, 1_u32..60)
        .prop_map(|(start, span, chunk_days)| (start, start + Duration::days(span), chunk_days))
}

proptest! {
    #[test]
    fn chunks_partition_the_range((start, end, chunk_days) in arb_range()) {
        let range = DateRange::new(start, end, chunk_days).expect("valid range");
        let chunks = range.chunks().collect::<Vec<DateChunk>>();

        prop_assert!(!chunks.is_empty());
        prop_assert_eq!(chunks[0].start, start);
        prop_assert_eq!(chunks[chunks.len() - 1].end, end);

        for chunk in &chunks {
            prop_assert!(chunk.start <= chunk.end);
            prop_assert!(chunk.days() <= i64::from(chunk_days));
        }
        for pair in chunks.windows(2) {
            prop_assert_eq!(pair[0].end.next_day(), Some(pair[1].start));
        }

        let covered: i64 = chunks.iter().map(DateChunk::days).sum();
        prop_assert_eq!(covered, (end - start).whole_days() + 1);
        prop_assert_eq!(chunks.len(), range.chunk_count());
    }

    #[test]
    fn only_the_last_chunk_may_be_short((start, end, chunk_days) in arb_range()) {
        let range = DateRange::new(start, end, chunk_days).expect("valid range");
        let chunks = range.chunks().collect::<Vec<_>>();

        for chunk in &chunks[..chunks.len() - 1] {
            prop_assert_eq!(chunk.days(), i64::from(chunk_days));
        }
    }

    #[test]
    fn reversed_ranges_are_rejected(
        (start, end, chunk_days) in arb_range().prop_filter("non-empty span", |(s, e, _)| s < e)
    ) {
        prop_assert!(matches!(
            DateRange::new(end, start, chunk_days),
            Err(ValidationError::InvalidDateRange { .. })
        ), "expected InvalidDateRange error for reversed range");
    }
}

#[test]
fn single_day_range_is_one_chunk() {
    let day = Date::from_ordinal_date(2024, 100).expect("date");
    let range = DateRange::new(day, day, 5).expect("range");

    assert_eq!(
        range.chunks().collect::<Vec<_>>(),
        vec![DateChunk {
            start: day,
            end: day
        }]
    );
}

#[test]
fn zero_chunk_days_is_rejected() {
    let day = Date::from_ordinal_date(2024, 100).expect("date");
    assert_eq!(
        DateRange::new(day, day, 0),
        Err(ValidationError::InvalidChunkDays { value: 0 })
    );
}
