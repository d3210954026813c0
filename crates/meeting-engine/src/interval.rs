//! Interval math over absolute timepoints.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Whether the closed spans `[first_start, first_end]` and `[second_start, second_end]`
/// share at least one instant.
///
/// Spans that only touch at a boundary count as intersecting.
pub fn intersects(
    first_start: DateTime<Utc>,
    first_end: DateTime<Utc>,
    second_start: DateTime<Utc>,
    second_end: DateTime<Utc>,
) -> bool {
    (first_start <= second_start && second_start <= first_end)
        || (second_start <= first_start && first_start <= second_end)
}

/// A time span, used for busy blocks and free slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Closed containment: both endpoints belong to the interval.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t <= self.end
    }

    pub fn intersects(&self, other: &Interval) -> bool {
        intersects(self.start, self.end, other.start, other.end)
    }
}
