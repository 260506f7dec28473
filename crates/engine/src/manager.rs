// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Supervisor: owns the project → engine map.
//!
//! Built once at startup; every administrative path reaches an engine
//! through a `Supervisor` handle instead of ambient lookup.

use crate::client_pool::ClientPool;
use crate::config::RunnerConfig;
use crate::dispatch::{DispatchEngine, EngineHandle};
use crate::error::EngineError;
use rig_adapters::CommandDispatch;
use rig_core::{IdGen, Job, JobId, JobStatus, Project, ProjectId};
use rig_storage::{JobStore, TestDefStore};
use std::collections::HashMap;
use std::sync::Arc;

/// Everything a dispatch engine needs besides its project identity.
#[derive(Clone)]
pub struct EngineDeps<D: CommandDispatch, G: IdGen> {
    pub jobs: Arc<dyn JobStore>,
    pub testdefs: Arc<dyn TestDefStore>,
    pub pool: ClientPool,
    pub dispatch: D,
    pub id_gen: G,
}

struct SupervisorInner {
    engines: HashMap<ProjectId, EngineHandle>,
    jobs: Arc<dyn JobStore>,
}

/// Cloneable handle over all project engines.
#[derive(Clone)]
pub struct Supervisor {
    inner: Arc<SupervisorInner>,
}

impl Supervisor {
    /// Spawn one dispatch engine task per project.
    pub fn start<D: CommandDispatch, G: IdGen>(
        projects: &[Project],
        deps: &EngineDeps<D, G>,
        config: &RunnerConfig,
    ) -> Self {
        let mut engines = HashMap::new();
        for project in projects {
            let handle = EngineHandle::new();
            engines.insert(project.id.clone(), handle.clone());
            let engine = DispatchEngine::new(
                project.id.clone(),
                handle,
                deps.clone(),
                config.poll_interval(),
            );
            tokio::spawn(engine.run());
        }
        Self::with_engines(engines, deps.jobs.clone())
    }

    /// Wire a supervisor over pre-built engine handles. The caller owns
    /// driving the engines (used by embedders and tests that tick engines
    /// themselves).
    pub fn with_engines(
        engines: HashMap<ProjectId, EngineHandle>,
        jobs: Arc<dyn JobStore>,
    ) -> Self {
        Self {
            inner: Arc::new(SupervisorInner { engines, jobs }),
        }
    }

    fn engine(&self, project_id: &ProjectId) -> Result<&EngineHandle, EngineError> {
        self.inner
            .engines
            .get(project_id)
            .ok_or_else(|| EngineError::NoEngineForProject(project_id.clone()))
    }

    /// Queue a job on its project's engine. The job is reloaded from the
    /// store first; a group id carried by the caller survives the reload.
    pub fn submit(&self, job: &Job) -> Result<(), EngineError> {
        let mut fresh = self
            .inner
            .jobs
            .get(&job.id)?
            .ok_or_else(|| EngineError::JobNotFound(job.id.clone()))?;
        if fresh.group_id.is_none() {
            fresh.group_id = job.group_id.clone();
        }
        fresh.status = JobStatus::Queued;
        self.inner.jobs.save(&fresh)?;
        let handle = self.engine(&fresh.project_id)?;
        tracing::info!(job = %fresh.id, project = %fresh.project_id, "job queued");
        handle.enqueue(fresh);
        Ok(())
    }

    /// Take a job off its engine. Details already in flight finish their
    /// reports; the job goes WAITING_STOP until then, or straight to
    /// STOPPED when nothing is in progress.
    pub fn stop(&self, job: &Job) -> Result<(), EngineError> {
        let fresh = self
            .inner
            .jobs
            .get(&job.id)?
            .ok_or_else(|| EngineError::JobNotFound(job.id.clone()))?;
        let handle = self.engine(&fresh.project_id)?;
        handle.dequeue_job(&fresh.id);
        handle.request_requeue(&fresh.id);
        if fresh.has_in_progress_detail() {
            self.inner.jobs.update_status(
                &fresh.id,
                JobStatus::WaitingStop,
                fresh.started_at_ms,
                None,
            )?;
            tracing::info!(job = %fresh.id, "job waiting to stop");
        } else {
            handle.forget(&fresh.id);
            self.inner.jobs.update_status(
                &fresh.id,
                JobStatus::Stopped,
                fresh.started_at_ms,
                fresh.finished_at_ms,
            )?;
            tracing::info!(job = %fresh.id, "job stopped");
        }
        Ok(())
    }

    pub fn remove_from_running(&self, job: &Job) -> Result<(), EngineError> {
        self.engine(&job.project_id)?.forget(&job.id);
        Ok(())
    }

    pub fn queued_jobs(&self, project_id: &ProjectId) -> Result<Vec<JobId>, EngineError> {
        Ok(self.engine(project_id)?.queued_job_ids())
    }

    /// Queued or running on the project's engine.
    pub fn is_job_active(
        &self,
        project_id: &ProjectId,
        job_id: &JobId,
    ) -> Result<bool, EngineError> {
        Ok(self.engine(project_id)?.is_active(job_id))
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
