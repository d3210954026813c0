//! Recurrence expansion -- turns a recurring meeting template into the concrete
//! occurrences that fall inside a query window.
//!
//! Occurrences keep the template's full duration; they are filtered by the window,
//! never clipped to it.

use chrono::{DateTime, Duration, Utc};
use tracing::trace;

use crate::interval::intersects;
use crate::model::Meeting;

/// Expand a recurring template into every occurrence intersecting
/// `[window_start, window_end]`, in chronological order.
///
/// Each occurrence is an independent copy of the template (same id, creator,
/// invited, participants and period) with its own `start`/`end`. Returns an empty
/// list when the template has no positive `period`.
///
/// The number of occurrences grows with the window; callers bound it by choosing
/// the window.
pub fn expand_occurrences(
    template: &Meeting,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<Meeting> {
    let period = match template.period {
        Some(p) if p > Duration::zero() => p,
        _ => return Vec::new(),
    };
    let duration = template.duration();

    let mut occurrences = Vec::new();
    let mut current = first_candidate(template.start, duration, period, window_start);

    while current <= window_end {
        // An occurrence whose end is past the representable range cannot exist.
        let Some(current_end) = current.checked_add_signed(duration) else {
            break;
        };
        if intersects(current, current_end, window_start, window_end) {
            let mut occurrence = template.clone();
            occurrence.start = current;
            occurrence.end = current_end;
            occurrences.push(occurrence);
        }

        current = match current.checked_add_signed(period) {
            Some(next) => next,
            None => break,
        };
    }

    trace!(
        meeting = %template.id,
        count = occurrences.len(),
        "expanded recurring meeting"
    );

    occurrences
}

/// Skip whole periods whose occurrences end before the window opens.
///
/// Falls back to the template start when the gap cannot be measured in
/// nanoseconds, which only changes how many candidates are visited.
fn first_candidate(
    start: DateTime<Utc>,
    duration: Duration,
    period: Duration,
    window_start: DateTime<Utc>,
) -> DateTime<Utc> {
    let gap = window_start - (start + duration);
    if gap <= Duration::zero() {
        return start;
    }

    match (gap.num_nanoseconds(), period.num_nanoseconds()) {
        (Some(gap_ns), Some(period_ns)) if period_ns > 0 => {
            let skipped = gap_ns / period_ns;
            start + Duration::nanoseconds(skipped * period_ns)
        }
        _ => start,
    }
}
