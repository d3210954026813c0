//! Free/busy computation over plain busy intervals.
//!
//! These functions know nothing about users or the store; [`crate::availability`]
//! gathers the busy intervals and hands them over.

use chrono::{DateTime, Duration, Utc};

use crate::interval::Interval;

/// Merge overlapping or adjacent busy intervals, clipped to the given window.
///
/// Returns a sorted, non-overlapping list. Intervals that only touch the window
/// boundary contribute nothing.
pub fn merge_busy_periods(
    busy: &[Interval],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<Interval> {
    let mut intervals: Vec<Interval> = busy
        .iter()
        .filter(|b| b.start < window_end && b.end > window_start)
        .map(|b| Interval::new(b.start.max(window_start), b.end.min(window_end)))
        .collect();

    if intervals.is_empty() {
        return Vec::new();
    }

    intervals.sort();

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }

    merged
}

/// Gaps between the merged busy intervals within the window, leading and trailing
/// gaps included. Sorted by start.
pub fn find_free_slots(
    busy: &[Interval],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<Interval> {
    let merged = merge_busy_periods(busy, window_start, window_end);

    let mut free_slots = Vec::new();
    let mut cursor = window_start;

    for period in &merged {
        if cursor < period.start {
            free_slots.push(Interval::new(cursor, period.start));
        }
        cursor = cursor.max(period.end);
    }

    if cursor < window_end {
        free_slots.push(Interval::new(cursor, window_end));
    }

    free_slots
}

/// Earliest start at or after `search_start` where `duration` fits between the
/// busy intervals.
///
/// The intervals are sorted by start and swept with a cursor that only moves
/// forward, so overlapping and nested intervals need no merging. When no gap is
/// found before the last interval, the span after it is used if the slot still
/// ends by `search_end`. With no busy intervals at all the answer is
/// `search_start`, whether or not `duration` fits before `search_end`.
///
/// A slot whose end would overflow the representable time range never fits.
pub fn first_fit_start(
    mut busy: Vec<Interval>,
    duration: Duration,
    search_start: DateTime<Utc>,
    search_end: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if busy.is_empty() {
        return Some(search_start);
    }

    busy.sort_by_key(|b| b.start);

    let mut cursor = search_start;
    for interval in &busy {
        let fits = cursor
            .checked_add_signed(duration)
            .is_some_and(|end| interval.start >= end);
        if fits {
            return Some(cursor);
        }
        cursor = cursor.max(interval.end);
    }

    match cursor.checked_add_signed(duration) {
        Some(end) if end <= search_end => Some(cursor),
        _ => None,
    }
}
