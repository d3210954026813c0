//! # meeting-engine
//!
//! Scheduling core for a meeting service: users register, create single or
//! recurring meetings, invite each other, and search for the earliest slot where
//! everyone is free.
//!
//! All state lives in one explicitly constructed [`MeetingStore`]. Recurring
//! meetings are stored once, as templates, and expanded into concrete occurrences
//! only when a query window asks for them.
//!
//! ## Modules
//!
//! - [`interval`] — Closed-interval overlap test and the `Interval` span type
//! - [`expander`] — Recurring template → occurrences inside a window
//! - [`store`] — Users, meetings, invitations and the per-user indexes
//! - [`availability`] — Multi-user busy/free queries and first-slot search
//! - [`freebusy`] — Merging and sweeping plain busy intervals
//! - [`protocol`] — Request/response types and dispatch for a transport layer
//! - [`shared`] — Thread-safe store handle
//! - [`logging`] — Tracing subscriber setup
//! - [`error`] — Error types

pub mod availability;
pub mod error;
pub mod expander;
pub mod freebusy;
pub mod interval;
pub mod logging;
pub mod model;
pub mod protocol;
pub mod shared;
pub mod store;

pub use error::ScheduleError;
pub use expander::expand_occurrences;
pub use interval::{intersects, Interval};
pub use model::{Meeting, MeetingId, NewMeeting, User, UserId};
pub use protocol::{dispatch, Request, Response};
pub use shared::SharedStore;
pub use store::MeetingStore;
