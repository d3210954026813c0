//! Request and response types for fronting the store with a transport, plus the
//! dispatcher that maps one onto the other.
//!
//! Both enums are internally tagged by `"type"` in snake_case, so a request looks
//! like `{"type":"accept_meeting","user":1,"meeting":0}`. Timestamps travel as
//! RFC 3339 strings and durations as whole seconds.
//!
//! Checks that belong to the caller layer (query windows must be non-empty)
//! happen here; everything else is left to the store.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::interval::Interval;
use crate::model::{Meeting, MeetingId, NewMeeting, User, UserId};
use crate::store::MeetingStore;

/// Operations a client can ask for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    AddUser {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        info: Option<String>,
    },
    AddMeeting(NewMeeting),
    AcceptMeeting {
        user: UserId,
        meeting: MeetingId,
    },
    DeclineMeeting {
        user: UserId,
        meeting: MeetingId,
    },
    GetMeetingInfo {
        meeting: MeetingId,
    },
    GetSuggestedMeetings {
        user: UserId,
    },
    GetAcceptedMeetings {
        user: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// Search from `start` (the dispatcher's clock when omitted) up to `until`.
    GetFirstAvailableInterval {
        users: Vec<UserId>,
        /// Slot length in seconds.
        duration: i64,
        until: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<DateTime<Utc>>,
    },
    GetBusyPeriods {
        users: Vec<UserId>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    GetFreeSlots {
        users: Vec<UserId>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl Request {
    /// Whether handling this request changes the store.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Request::AddUser { .. }
                | Request::AddMeeting(_)
                | Request::AcceptMeeting { .. }
                | Request::DeclineMeeting { .. }
        )
    }
}

/// Answers to [`Request`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    User(User),
    Meeting(Meeting),
    Meetings {
        meetings: Vec<Meeting>,
    },
    /// Both ends are `null` when no slot was found.
    Interval {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
    Intervals {
        intervals: Vec<Interval>,
    },
    Error {
        code: String,
        message: String,
    },
}

impl Response {
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }

    fn meetings(mut meetings: Vec<Meeting>) -> Self {
        meetings.sort_by_key(|m| (m.start, m.id));
        Response::Meetings { meetings }
    }
}

impl From<ScheduleError> for Response {
    fn from(err: ScheduleError) -> Self {
        Response::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<Option<Interval>> for Response {
    fn from(slot: Option<Interval>) -> Self {
        Response::Interval {
            start: slot.map(|s| s.start),
            end: slot.map(|s| s.end),
        }
    }
}

/// Requests that change the store.
enum Mutation {
    AddUser { name: String, info: Option<String> },
    AddMeeting(NewMeeting),
    Accept { user: UserId, meeting: MeetingId },
    Decline { user: UserId, meeting: MeetingId },
}

/// Requests answered under a shared borrow of the store.
enum Query {
    MeetingInfo(MeetingId),
    Suggested(UserId),
    Accepted {
        user: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    FirstAvailable {
        users: Vec<UserId>,
        duration: i64,
        until: DateTime<Utc>,
        start: Option<DateTime<Utc>>,
    },
    BusyPeriods {
        users: Vec<UserId>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    FreeSlots {
        users: Vec<UserId>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

enum Route {
    Mutation(Mutation),
    Query(Query),
}

impl From<Request> for Route {
    fn from(request: Request) -> Self {
        match request {
            Request::AddUser { name, info } => Route::Mutation(Mutation::AddUser { name, info }),
            Request::AddMeeting(new) => Route::Mutation(Mutation::AddMeeting(new)),
            Request::AcceptMeeting { user, meeting } => {
                Route::Mutation(Mutation::Accept { user, meeting })
            }
            Request::DeclineMeeting { user, meeting } => {
                Route::Mutation(Mutation::Decline { user, meeting })
            }
            Request::GetMeetingInfo { meeting } => Route::Query(Query::MeetingInfo(meeting)),
            Request::GetSuggestedMeetings { user } => Route::Query(Query::Suggested(user)),
            Request::GetAcceptedMeetings { user, start, end } => {
                Route::Query(Query::Accepted { user, start, end })
            }
            Request::GetFirstAvailableInterval {
                users,
                duration,
                until,
                start,
            } => Route::Query(Query::FirstAvailable {
                users,
                duration,
                until,
                start,
            }),
            Request::GetBusyPeriods { users, start, end } => {
                Route::Query(Query::BusyPeriods { users, start, end })
            }
            Request::GetFreeSlots { users, start, end } => {
                Route::Query(Query::FreeSlots { users, start, end })
            }
        }
    }
}

/// Handle any request against `store`. `now` is the default search start for
/// availability requests.
pub fn dispatch(store: &mut MeetingStore, request: Request, now: DateTime<Utc>) -> Response {
    let outcome = match Route::from(request) {
        Route::Mutation(mutation) => apply(store, mutation),
        Route::Query(query) => answer(store, query, now),
    };
    respond(outcome)
}

/// Handle a read-only request. Returns `None` for requests that would mutate the
/// store.
pub fn dispatch_query(store: &MeetingStore, request: &Request, now: DateTime<Utc>) -> Option<Response> {
    if request.is_mutation() {
        return None;
    }
    match Route::from(request.clone()) {
        Route::Query(query) => Some(respond(answer(store, query, now))),
        Route::Mutation(_) => None,
    }
}

fn apply(store: &mut MeetingStore, mutation: Mutation) -> Result<Response> {
    match mutation {
        Mutation::AddUser { name, info } => store.add_user(name, info).cloned().map(Response::User),
        Mutation::AddMeeting(new) => store.add_meeting(new).cloned().map(Response::Meeting),
        Mutation::Accept { user, meeting } => store
            .accept_meeting(user, meeting)
            .cloned()
            .map(Response::Meeting),
        Mutation::Decline { user, meeting } => store
            .decline_meeting(user, meeting)
            .cloned()
            .map(Response::Meeting),
    }
}

fn answer(store: &MeetingStore, query: Query, now: DateTime<Utc>) -> Result<Response> {
    match query {
        Query::MeetingInfo(meeting) => store.get_meeting(meeting).cloned().map(Response::Meeting),
        Query::Suggested(user) => {
            let meetings = store.get_suggested_meetings(user)?;
            Ok(Response::meetings(meetings.into_iter().cloned().collect()))
        }
        Query::Accepted { user, start, end } => {
            ensure_window(start, end)?;
            let meetings = store.get_accepted_meetings(user, start, end)?;
            Ok(Response::meetings(meetings))
        }
        Query::FirstAvailable {
            users,
            duration,
            until,
            start,
        } => {
            let duration =
                Duration::try_seconds(duration).ok_or(ScheduleError::InvalidDuration(duration))?;
            let slot =
                store.first_available_interval(&users, duration, start.unwrap_or(now), until)?;
            Ok(Response::from(slot))
        }
        Query::BusyPeriods { users, start, end } => {
            ensure_window(start, end)?;
            let intervals = store.busy_periods(&users, start, end)?;
            Ok(Response::Intervals { intervals })
        }
        Query::FreeSlots { users, start, end } => {
            ensure_window(start, end)?;
            let intervals = store.free_slots(&users, start, end)?;
            Ok(Response::Intervals { intervals })
        }
    }
}

fn ensure_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<()> {
    if start < end {
        Ok(())
    } else {
        Err(ScheduleError::InvalidInterval { start, end })
    }
}

fn respond(outcome: Result<Response>) -> Response {
    outcome.unwrap_or_else(|err| {
        debug!(code = err.code(), error = %err, "request rejected");
        Response::from(err)
    })
}
