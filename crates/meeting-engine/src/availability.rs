//! Multi-user availability on top of the meeting store.
//!
//! Gathers every queried user's accepted meetings over a window (recurring ones
//! expanded into occurrences) and feeds the resulting busy intervals to
//! [`crate::freebusy`]. Any unknown user fails the whole query.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::freebusy;
use crate::interval::Interval;
use crate::model::UserId;
use crate::store::MeetingStore;

impl MeetingStore {
    /// Busy intervals of all `users` intersecting `[start, end]`, unmerged and
    /// unclipped.
    pub fn busy_intervals(
        &self,
        users: &[UserId],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Interval>> {
        let mut busy = Vec::new();
        for user in users {
            busy.extend(
                self.get_accepted_meetings(*user, start, end)?
                    .into_iter()
                    .map(|m| Interval::new(m.start, m.end)),
            );
        }
        Ok(busy)
    }

    /// Earliest timepoint in `[search_start, search_end]` from which every user is
    /// free for `duration`, or `None` if no such slot exists.
    ///
    /// When nobody has anything scheduled in the window the answer is
    /// `search_start`.
    pub fn first_available_start(
        &self,
        users: &[UserId],
        duration: Duration,
        search_start: DateTime<Utc>,
        search_end: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>> {
        let busy = self.busy_intervals(users, search_start, search_end)?;
        let busy_count = busy.len();
        let found = freebusy::first_fit_start(busy, duration, search_start, search_end);

        debug!(
            users = users.len(),
            busy = busy_count,
            found = ?found,
            "searched for first available start"
        );

        Ok(found)
    }

    /// First free `[start, start + duration]` between `now` and `until`.
    ///
    /// Rejects `until <= now` with `InvalidInterval`, and a non-positive duration
    /// or one that overflows the time range from `now` with `InvalidDuration`,
    /// before looking at any user. A slot that would end after `until` is not
    /// returned, even on an empty calendar.
    pub fn first_available_interval(
        &self,
        users: &[UserId],
        duration: Duration,
        now: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Option<Interval>> {
        if until <= now {
            return Err(ScheduleError::InvalidInterval {
                start: now,
                end: until,
            });
        }
        if duration <= Duration::zero() || now.checked_add_signed(duration).is_none() {
            return Err(ScheduleError::InvalidDuration(duration.num_seconds()));
        }

        let slot = self
            .first_available_start(users, duration, now, until)?
            .and_then(|start| {
                start
                    .checked_add_signed(duration)
                    .filter(|end| *end <= until)
                    .map(|end| Interval::new(start, end))
            });
        Ok(slot)
    }

    /// Merged busy periods of all `users`, clipped to the window.
    pub fn busy_periods(
        &self,
        users: &[UserId],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Interval>> {
        let busy = self.busy_intervals(users, start, end)?;
        Ok(freebusy::merge_busy_periods(&busy, start, end))
    }

    /// Spans within the window where none of `users` is busy.
    pub fn free_slots(
        &self,
        users: &[UserId],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Interval>> {
        let busy = self.busy_intervals(users, start, end)?;
        Ok(freebusy::find_free_slots(&busy, start, end))
    }
}
