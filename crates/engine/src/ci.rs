// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CI submission surface.
//!
//! A CI pipeline kicks off every CI-enabled job of a project and blocks
//! until the batch has drained from the project's queue.

use crate::error::EngineError;
use crate::manager::Supervisor;
use rig_core::{CommandStatus, JobId, JobStatus};
use rig_storage::{JobStore, ProjectStore};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct CiService {
    projects: Arc<dyn ProjectStore>,
    jobs: Arc<dyn JobStore>,
    supervisor: Supervisor,
    poll_interval: Duration,
}

impl CiService {
    pub fn new(
        projects: Arc<dyn ProjectStore>,
        jobs: Arc<dyn JobStore>,
        supervisor: Supervisor,
        poll_interval: Duration,
    ) -> Self {
        Self {
            projects,
            jobs,
            supervisor,
            poll_interval,
        }
    }

    /// Requeue the project's CI-enabled jobs that are in a restartable
    /// state, then wait until none of them is still queued or running.
    /// Returns the submitted job ids.
    pub async fn run_project(&self, project_name: &str) -> Result<Vec<JobId>, EngineError> {
        let project = self
            .projects
            .get_by_name(project_name)?
            .ok_or_else(|| EngineError::ProjectNotFound(project_name.to_string()))?;

        let mut submitted = Vec::new();
        for job in self.jobs.list_ci_by_project(&project.id)? {
            if !job.status.is_ci_requeueable() {
                continue;
            }
            self.jobs.set_job_and_details_status(
                &job.id,
                JobStatus::Queued,
                CommandStatus::NotStarted,
            )?;
            let fresh = self
                .jobs
                .get(&job.id)?
                .ok_or_else(|| EngineError::JobNotFound(job.id.clone()))?;
            self.supervisor.submit(&fresh)?;
            submitted.push(fresh.id);
        }
        tracing::info!(project = %project.name, count = submitted.len(), "ci run submitted");

        loop {
            let mut pending = false;
            for id in &submitted {
                if self.supervisor.is_job_active(&project.id, id)? {
                    pending = true;
                    break;
                }
            }
            if !pending {
                break;
            }
            tokio::time::sleep(self.poll_interval).await;
        }
        Ok(submitted)
    }
}

#[cfg(test)]
#[path = "ci_tests.rs"]
mod tests;
