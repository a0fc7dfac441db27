//! In-memory job store.
//!
//! The store is the single writer-arbitration point for job records. Every
//! write is a read-modify-write under one lock: the mutator works on a copy
//! and the copy is committed only if the mutator succeeds, so readers never
//! observe a partial update. Terminal records are frozen.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use crate::jobs::record::{JobId, JobMode, JobRecord};
use crate::types::{AppError, Result};

/// Default capacity of the committed-update channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Published after every committed write.
#[derive(Debug, Clone, Serialize)]
pub struct JobEvent {
    pub job_id: JobId,
    pub record: JobRecord,
    pub timestamp: DateTime<Utc>,
}

pub struct JobStore {
    records: RwLock<HashMap<JobId, JobRecord>>,
    events: Arc<broadcast::Sender<JobEvent>>,
}

impl Default for JobStore {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl JobStore {
    pub fn new(event_capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(event_capacity.max(1));
        Self {
            records: RwLock::new(HashMap::new()),
            events: Arc::new(sender),
        }
    }

    /// Insert a fresh `pending` record.
    pub fn create(&self, id: JobId, query: &str, mode: JobMode) -> Result<JobRecord> {
        let record = {
            let mut records = self.records.write();
            if records.contains_key(&id) {
                return Err(AppError::DuplicateId(id.to_string()));
            }
            let record = JobRecord::new(id.clone(), query, mode);
            records.insert(id, record.clone());
            record
        };

        self.publish(&record);
        Ok(record)
    }

    /// Latest committed snapshot, if the job exists.
    pub fn get(&self, id: &JobId) -> Option<JobRecord> {
        self.records.read().get(id).cloned()
    }

    /// Apply `mutator` atomically and return the committed snapshot.
    pub fn update<F>(&self, id: &JobId, mutator: F) -> Result<JobRecord>
    where
        F: FnOnce(&mut JobRecord) -> Result<()>,
    {
        let committed = {
            let mut records = self.records.write();
            let current = records
                .get_mut(id)
                .ok_or_else(|| AppError::NotFound(format!("Research with ID {} not found", id)))?;

            if current.is_terminal() {
                return Err(AppError::JobFinalized(format!(
                    "job {} is already {}",
                    id, current.status
                )));
            }

            let mut next = current.clone();
            mutator(&mut next)?;
            *current = next;
            current.clone()
        };

        self.publish(&committed);
        Ok(committed)
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Subscribe to committed updates. Lagging receivers lose events.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.events.subscribe()
    }

    fn publish(&self, record: &JobRecord) {
        // No active receivers is fine
        let _ = self.events.send(JobEvent {
            job_id: record.id.clone(),
            record: record.clone(),
            timestamp: Utc::now(),
        });
    }
}
