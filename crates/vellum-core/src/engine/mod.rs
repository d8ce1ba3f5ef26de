//! The engine - shared wiring behind the per-collection repositories.
//!
//! Every operation is a complete read-modify-write of one or more whole
//! collections. One `Mutex` per collection serializes those cycles;
//! operations touching several collections acquire their locks in
//! [`Collection::ALL`] order, which keeps the lock graph acyclic.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};

use crate::error::EngineError;
use crate::ports::{AccessGate, AllowAll, Clock, Collection, StateStore, StoreError, SystemClock};

mod comments;
mod drafts;
mod history;
mod likes;
mod posts;
mod scheduled;

pub use comments::CommentLog;
pub use drafts::DraftRepository;
pub use history::HistoryLog;
pub use likes::LikeRegistry;
pub use posts::PostRepository;
pub use scheduled::ScheduledRepository;

/// Handle to the content engine. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

pub(crate) struct EngineInner {
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
    gate: Arc<dyn AccessGate>,
    locks: [Mutex<()>; 6],
    sweep_flight: Mutex<()>,
}

impl Engine {
    /// Engine over the given store, with the wall clock and an allow-all
    /// access gate.
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self::with_parts(store, Arc::new(SystemClock), Arc::new(AllowAll))
    }

    /// Engine with every collaborator injected.
    pub fn with_parts(
        store: Arc<dyn StateStore>,
        clock: Arc<dyn Clock>,
        gate: Arc<dyn AccessGate>,
    ) -> Self {
        Self {
            inner: Arc::new(EngineInner {
                store,
                clock,
                gate,
                locks: std::array::from_fn(|_| Mutex::new(())),
                sweep_flight: Mutex::new(()),
            }),
        }
    }

    /// The engine's clock. Scheduler drivers read `now` here so `sweep`
    /// observes injected time under test.
    pub fn now(&self) -> DateTime<Utc> {
        self.inner.now()
    }

    pub fn posts(&self) -> PostRepository {
        PostRepository::new(self.inner.clone())
    }

    pub fn drafts(&self) -> DraftRepository {
        DraftRepository::new(self.inner.clone())
    }

    pub fn scheduled(&self) -> ScheduledRepository {
        ScheduledRepository::new(self.inner.clone())
    }

    pub fn history(&self) -> HistoryLog {
        HistoryLog::new(self.inner.clone())
    }

    pub fn likes(&self) -> LikeRegistry {
        LikeRegistry::new(self.inner.clone())
    }

    pub fn comments(&self) -> CommentLog {
        CommentLog::new(self.inner.clone())
    }
}

impl EngineInner {
    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub(crate) fn check_mutate(&self) -> Result<(), EngineError> {
        if self.gate.can_mutate() {
            Ok(())
        } else {
            Err(EngineError::Unauthorized)
        }
    }

    pub(crate) fn check_delete(&self) -> Result<(), EngineError> {
        if self.gate.can_delete() {
            Ok(())
        } else {
            Err(EngineError::Unauthorized)
        }
    }

    /// Lock one collection. Callers needing several must lock them in
    /// `Collection::ALL` order.
    pub(crate) async fn lock(&self, collection: Collection) -> MutexGuard<'_, ()> {
        self.locks[collection as usize].lock().await
    }

    pub(crate) fn try_sweep_flight(&self) -> Option<MutexGuard<'_, ()>> {
        self.sweep_flight.try_lock().ok()
    }

    /// Load and decode a collection. A never-saved collection decodes to its
    /// default (empty); stored data that does not fit the schema is a
    /// [`EngineError::CorruptState`], never an empty reset.
    pub(crate) async fn load<T>(&self, collection: Collection) -> Result<T, EngineError>
    where
        T: DeserializeOwned + Default,
    {
        match self.store.load(collection).await? {
            None => Ok(T::default()),
            Some(value) => {
                serde_json::from_value(value).map_err(|err| EngineError::CorruptState {
                    collection,
                    detail: err.to_string(),
                })
            }
        }
    }

    pub(crate) fn encode<T: Serialize>(
        &self,
        collection: Collection,
        value: &T,
    ) -> Result<Value, EngineError> {
        serde_json::to_value(value).map_err(|err| {
            EngineError::Store(StoreError::Encode {
                collection,
                detail: err.to_string(),
            })
        })
    }

    pub(crate) async fn save<T: Serialize>(
        &self,
        collection: Collection,
        value: &T,
    ) -> Result<(), EngineError> {
        let encoded = self.encode(collection, value)?;
        self.store.save(collection, encoded).await?;
        Ok(())
    }

    /// Persist several collections as one batch - the unit of work behind
    /// every cross-collection move.
    pub(crate) async fn save_batch(
        &self,
        entries: Vec<(Collection, Value)>,
    ) -> Result<(), EngineError> {
        self.store.save_all(entries).await?;
        Ok(())
    }
}
