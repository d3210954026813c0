//! A store handle that can be shared across threads.
//!
//! Operations touch both a meeting and the per-user indexes, so the whole store
//! sits behind one lock: queries share it, mutations take it exclusively.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use crate::protocol::{self, Request, Response};
use crate::store::MeetingStore;

#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<MeetingStore>>,
}

impl SharedStore {
    pub fn new(store: MeetingStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Shared access for queries.
    ///
    /// A poisoned lock is recovered: the store validates before it mutates, so a
    /// panicking holder cannot have left it half-updated.
    pub fn read(&self) -> RwLockReadGuard<'_, MeetingStore> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive access for mutations.
    pub fn write(&self) -> RwLockWriteGuard<'_, MeetingStore> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Dispatch a request, taking the read lock for queries and the write lock
    /// for mutations.
    pub fn dispatch(&self, request: Request, now: DateTime<Utc>) -> Response {
        let answered = protocol::dispatch_query(&self.read(), &request, now);
        match answered {
            Some(response) => response,
            None => protocol::dispatch(&mut self.write(), request, now),
        }
    }
}
