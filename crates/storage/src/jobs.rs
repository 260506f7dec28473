// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job store trait and in-memory implementation

use crate::error::StorageError;
use parking_lot::Mutex;
use rig_core::{CommandStatus, Job, JobCommandId, JobDetail, JobId, JobStatus, ProjectId};
use std::collections::HashMap;
use std::sync::Arc;

/// Persistence boundary for jobs, their details, and their commands.
pub trait JobStore: Send + Sync {
    fn get(&self, id: &JobId) -> Result<Option<Job>, StorageError>;

    fn save(&self, job: &Job) -> Result<(), StorageError>;

    /// Persist one detail (including its client binding and built commands)
    /// inside its owning job.
    fn save_detail(&self, detail: &JobDetail) -> Result<(), StorageError>;

    fn delete(&self, id: &JobId) -> Result<(), StorageError>;

    fn list_by_project(&self, project_id: &ProjectId) -> Result<Vec<Job>, StorageError>;

    /// Jobs flagged for the CI submission surface.
    fn list_ci_by_project(&self, project_id: &ProjectId) -> Result<Vec<Job>, StorageError>;

    /// Resolve the job currently holding a command with the given id.
    fn find_by_command(&self, command_id: &JobCommandId) -> Result<Option<Job>, StorageError>;

    /// Update status and execution timestamps in one step.
    fn update_status(
        &self,
        id: &JobId,
        status: JobStatus,
        started_at_ms: Option<u64>,
        finished_at_ms: Option<u64>,
    ) -> Result<(), StorageError>;

    fn reset_planned_time(&self, id: &JobId) -> Result<(), StorageError>;

    /// Requeue helper: set the job status and reset every detail to the
    /// given status with its binding and built commands cleared.
    fn set_job_and_details_status(
        &self,
        id: &JobId,
        job_status: JobStatus,
        detail_status: CommandStatus,
    ) -> Result<(), StorageError>;
}

/// In-memory job store.
#[derive(Clone, Default)]
pub struct InMemoryJobStore {
    inner: Arc<Mutex<HashMap<JobId, Job>>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_job<T>(
        &self,
        id: &JobId,
        f: impl FnOnce(&mut Job) -> T,
    ) -> Result<T, StorageError> {
        let mut jobs = self.inner.lock();
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| StorageError::NotFound(format!("job {id}")))?;
        Ok(f(job))
    }
}

impl JobStore for InMemoryJobStore {
    fn get(&self, id: &JobId) -> Result<Option<Job>, StorageError> {
        Ok(self.inner.lock().get(id).cloned())
    }

    fn save(&self, job: &Job) -> Result<(), StorageError> {
        self.inner.lock().insert(job.id.clone(), job.clone());
        Ok(())
    }

    fn save_detail(&self, detail: &JobDetail) -> Result<(), StorageError> {
        self.with_job(&detail.job_id, |job| {
            if let Some(existing) = job.detail_mut(&detail.id) {
                *existing = detail.clone();
            }
        })
    }

    fn delete(&self, id: &JobId) -> Result<(), StorageError> {
        self.inner.lock().remove(id);
        Ok(())
    }

    fn list_by_project(&self, project_id: &ProjectId) -> Result<Vec<Job>, StorageError> {
        let mut jobs: Vec<Job> = self
            .inner
            .lock()
            .values()
            .filter(|j| &j.project_id == project_id)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(jobs)
    }

    fn list_ci_by_project(&self, project_id: &ProjectId) -> Result<Vec<Job>, StorageError> {
        Ok(self
            .list_by_project(project_id)?
            .into_iter()
            .filter(|j| j.ci_enabled)
            .collect())
    }

    fn find_by_command(&self, command_id: &JobCommandId) -> Result<Option<Job>, StorageError> {
        Ok(self
            .inner
            .lock()
            .values()
            .find(|job| job.locate_command(command_id).is_some())
            .cloned())
    }

    fn update_status(
        &self,
        id: &JobId,
        status: JobStatus,
        started_at_ms: Option<u64>,
        finished_at_ms: Option<u64>,
    ) -> Result<(), StorageError> {
        self.with_job(id, |job| {
            job.status = status;
            job.started_at_ms = started_at_ms;
            job.finished_at_ms = finished_at_ms;
        })
    }

    fn reset_planned_time(&self, id: &JobId) -> Result<(), StorageError> {
        self.with_job(id, |job| job.planned_at_ms = None)
    }

    fn set_job_and_details_status(
        &self,
        id: &JobId,
        job_status: JobStatus,
        detail_status: CommandStatus,
    ) -> Result<(), StorageError> {
        self.with_job(id, |job| {
            job.status = job_status;
            job.started_at_ms = None;
            job.finished_at_ms = None;
            for detail in &mut job.details {
                detail.status = detail_status;
                detail.test_set.status = detail_status;
                detail.test_set.executed_at_ms = None;
                detail.client_id = None;
                detail.commands.clear();
            }
        })
    }
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
