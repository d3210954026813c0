//! The meeting store: sole owner of users, meetings, and the per-user indexes.
//!
//! Each user has three index sets. `suggested` holds meetings the user is invited
//! to and has not answered. Accepted meetings are split into `single` and
//! `regular` by whether they recur, so queries only expand the templates that
//! need it. The indexes always mirror the meetings' own `invited` and
//! `participants` sets.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::expander::expand_occurrences;
use crate::interval::intersects;
use crate::model::{Meeting, MeetingId, NewMeeting, User, UserId};

#[derive(Debug, Default)]
struct UserIndex {
    suggested: HashSet<MeetingId>,
    single: HashSet<MeetingId>,
    regular: HashSet<MeetingId>,
}

impl UserIndex {
    fn accepted_for(&mut self, meeting: &Meeting) -> &mut HashSet<MeetingId> {
        if meeting.is_regular() {
            &mut self.regular
        } else {
            &mut self.single
        }
    }
}

/// In-memory store of users and meetings.
///
/// Every operation validates before it mutates, so a failed call leaves the store
/// unchanged.
#[derive(Debug, Default)]
pub struct MeetingStore {
    users: HashMap<UserId, User>,
    user_ids_by_name: HashMap<String, UserId>,
    meetings: HashMap<MeetingId, Meeting>,
    indexes: HashMap<UserId, UserIndex>,
    next_user_id: u64,
    next_meeting_id: u64,
}

impl MeetingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn meeting_count(&self) -> usize {
        self.meetings.len()
    }

    /// Register a user under a fresh id.
    ///
    /// Names are unique: a blank name fails with `InvalidUsername`, a taken one
    /// with `DuplicateUsername`.
    pub fn add_user(&mut self, name: impl Into<String>, info: Option<String>) -> Result<&User> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ScheduleError::InvalidUsername);
        }
        if self.user_ids_by_name.contains_key(&name) {
            return Err(ScheduleError::DuplicateUsername(name));
        }

        let id = UserId(self.next_user_id);
        self.next_user_id += 1;

        self.user_ids_by_name.insert(name.clone(), id);
        self.indexes.insert(id, UserIndex::default());
        debug!(user = %id, name = %name, "registered user");

        Ok(&*self.users.entry(id).or_insert(User { id, name, info }))
    }

    pub fn get_user(&self, id: UserId) -> Result<&User> {
        self.users.get(&id).ok_or(ScheduleError::UnknownUser(id))
    }

    pub fn find_user(&self, name: &str) -> Option<&User> {
        self.user_ids_by_name
            .get(name)
            .and_then(|id| self.users.get(id))
    }

    /// Create a meeting.
    ///
    /// The creator becomes the only participant and is dropped from `invited` if
    /// listed there. Every remaining invitee gets the meeting in their suggested
    /// set.
    pub fn add_meeting(&mut self, new: NewMeeting) -> Result<&Meeting> {
        for user in std::iter::once(&new.creator).chain(new.invited.iter()) {
            self.ensure_user(*user)?;
        }
        if new.start >= new.end {
            return Err(ScheduleError::InvalidInterval {
                start: new.start,
                end: new.end,
            });
        }
        let duration = new.end - new.start;
        if let Some(period) = new.period {
            if period <= duration {
                return Err(ScheduleError::InvalidPeriod {
                    period_seconds: period.num_seconds(),
                    duration_seconds: duration.num_seconds(),
                });
            }
        }

        let id = MeetingId(self.next_meeting_id);
        self.next_meeting_id += 1;

        let mut invited = new.invited;
        invited.remove(&new.creator);
        let meeting = Meeting {
            id,
            start: new.start,
            end: new.end,
            creator: new.creator,
            invited,
            participants: [new.creator].into(),
            period: new.period,
        };

        self.indexes
            .entry(meeting.creator)
            .or_default()
            .accepted_for(&meeting)
            .insert(id);
        for user in &meeting.invited {
            self.indexes.entry(*user).or_default().suggested.insert(id);
        }

        debug!(
            meeting = %id,
            creator = %meeting.creator,
            invited = meeting.invited.len(),
            regular = meeting.is_regular(),
            "created meeting"
        );

        Ok(&*self.meetings.entry(id).or_insert(meeting))
    }

    /// Move `user` from the meeting's invitees to its participants.
    pub fn accept_meeting(&mut self, user: UserId, meeting_id: MeetingId) -> Result<&Meeting> {
        self.ensure_invited(user, meeting_id)?;

        let meeting = self
            .meetings
            .get_mut(&meeting_id)
            .ok_or(ScheduleError::UnknownMeeting(meeting_id))?;
        meeting.invited.remove(&user);
        meeting.participants.insert(user);

        let index = self.indexes.entry(user).or_default();
        index.suggested.remove(&meeting_id);
        index.accepted_for(meeting).insert(meeting_id);

        debug!(user = %user, meeting = %meeting_id, "accepted meeting");
        Ok(&*meeting)
    }

    /// Drop `user` from the meeting's invitees. Participants are left alone and no
    /// accepted index gains the meeting.
    pub fn decline_meeting(&mut self, user: UserId, meeting_id: MeetingId) -> Result<&Meeting> {
        self.ensure_invited(user, meeting_id)?;

        let meeting = self
            .meetings
            .get_mut(&meeting_id)
            .ok_or(ScheduleError::UnknownMeeting(meeting_id))?;
        meeting.invited.remove(&user);

        if let Some(index) = self.indexes.get_mut(&user) {
            index.suggested.remove(&meeting_id);
        }

        debug!(user = %user, meeting = %meeting_id, "declined meeting");
        Ok(&*meeting)
    }

    pub fn get_meeting(&self, meeting_id: MeetingId) -> Result<&Meeting> {
        self.meetings
            .get(&meeting_id)
            .ok_or(ScheduleError::UnknownMeeting(meeting_id))
    }

    /// Meetings `user` is invited to and has not answered. Unordered.
    pub fn get_suggested_meetings(&self, user: UserId) -> Result<Vec<&Meeting>> {
        self.ensure_user(user)?;
        Ok(self
            .indexes
            .get(&user)
            .map(|index| self.resolve(&index.suggested))
            .unwrap_or_default())
    }

    /// Meetings `user` takes part in that intersect `[start, end]`.
    ///
    /// Single meetings come first, followed by the occurrences of recurring ones.
    /// Occurrences are fresh values; changing them never touches the stored
    /// template.
    pub fn get_accepted_meetings(
        &self,
        user: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Meeting>> {
        self.ensure_user(user)?;
        let Some(index) = self.indexes.get(&user) else {
            return Ok(Vec::new());
        };

        let mut accepted: Vec<Meeting> = self
            .resolve(&index.single)
            .into_iter()
            .filter(|m| intersects(m.start, m.end, start, end))
            .cloned()
            .collect();

        for template in self.resolve(&index.regular) {
            accepted.extend(expand_occurrences(template, start, end));
        }

        Ok(accepted)
    }

    fn resolve(&self, ids: &HashSet<MeetingId>) -> Vec<&Meeting> {
        ids.iter().filter_map(|id| self.meetings.get(id)).collect()
    }

    fn ensure_user(&self, user: UserId) -> Result<()> {
        if self.users.contains_key(&user) {
            Ok(())
        } else {
            Err(ScheduleError::UnknownUser(user))
        }
    }

    fn ensure_invited(&self, user: UserId, meeting: MeetingId) -> Result<()> {
        self.ensure_user(user)?;
        if !self.meetings.contains_key(&meeting) {
            return Err(ScheduleError::UnknownMeeting(meeting));
        }
        let invited = self
            .indexes
            .get(&user)
            .is_some_and(|index| index.suggested.contains(&meeting));
        if invited {
            Ok(())
        } else {
            Err(ScheduleError::NotInvited { user, meeting })
        }
    }
}
