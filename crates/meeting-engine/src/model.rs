//! Users, meetings, and the identifiers the store hands out.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned to a user on registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier assigned to a meeting on creation. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingId(pub u64);

impl fmt::Display for MeetingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

/// A meeting as stored: either a single meeting or the template of a recurring one.
///
/// Occurrences produced by the expander use the same type; they are independent
/// copies whose `start`/`end` describe one concrete instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: MeetingId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub creator: UserId,
    /// Users who have not answered yet. Never contains the creator.
    pub invited: BTreeSet<UserId>,
    /// Users who accepted, creator included.
    pub participants: BTreeSet<UserId>,
    /// Recurrence step, in seconds on the wire.
    #[serde(default, with = "period_seconds", skip_serializing_if = "Option::is_none")]
    pub period: Option<Duration>,
}

impl Meeting {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether this meeting recurs every `period`.
    pub fn is_regular(&self) -> bool {
        matches!(self.period, Some(p) if p > Duration::zero())
    }
}

/// Caller-supplied description of a meeting to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMeeting {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub creator: UserId,
    #[serde(default)]
    pub invited: BTreeSet<UserId>,
    #[serde(default, with = "period_seconds", skip_serializing_if = "Option::is_none")]
    pub period: Option<Duration>,
}

impl NewMeeting {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, creator: UserId) -> Self {
        Self {
            start,
            end,
            creator,
            invited: BTreeSet::new(),
            period: None,
        }
    }

    pub fn invite(mut self, users: impl IntoIterator<Item = UserId>) -> Self {
        self.invited.extend(users);
        self
    }

    pub fn every(mut self, period: Duration) -> Self {
        self.period = Some(period);
        self
    }
}

/// `Option<Duration>` as an optional whole number of seconds.
pub(crate) mod period_seconds {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_some(&d.num_seconds()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = Option::<i64>::deserialize(deserializer)?;
        secs.map(|s| {
            Duration::try_seconds(s)
                .ok_or_else(|| serde::de::Error::custom(format!("period out of range: {s}s")))
        })
        .transpose()
    }
}
