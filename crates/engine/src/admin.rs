// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Administrative facade: submit, stop, inspect.

use crate::client_pool::ClientPool;
use crate::error::EngineError;
use crate::scheduler::Scheduler;
use rig_core::{Client, ClientStatus, Clock, JobId};
use rig_storage::JobStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct Admin<C: Clock> {
    jobs: Arc<dyn JobStore>,
    scheduler: Scheduler<C>,
    pool: ClientPool,
}

impl<C: Clock> Admin<C> {
    pub fn new(jobs: Arc<dyn JobStore>, scheduler: Scheduler<C>, pool: ClientPool) -> Self {
        Self {
            jobs,
            scheduler,
            pool,
        }
    }

    /// Submit a job by id: planned jobs wait in the scheduler, the rest go
    /// straight to their engine.
    pub fn submit_job(&self, id: &JobId) -> Result<(), EngineError> {
        let job = self
            .jobs
            .get(id)?
            .ok_or_else(|| EngineError::JobNotFound(id.clone()))?;
        self.scheduler.schedule(job)
    }

    pub fn stop_job(&self, id: &JobId) -> Result<(), EngineError> {
        let job = self
            .jobs
            .get(id)?
            .ok_or_else(|| EngineError::JobNotFound(id.clone()))?;
        self.scheduler.cancel(&job)
    }

    /// Current view of every tracked worker client.
    pub fn client_map(&self) -> Vec<(Client, ClientStatus)> {
        self.pool.snapshot()
    }
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
