// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job completion listeners.
//!
//! Invoked in registration order after a job reaches COMPLETED; each
//! listener is fault-isolated by the caller, so one failing never blocks
//! the next.

use crate::error::EngineError;
use crate::scheduler::Scheduler;
use async_trait::async_trait;
use rig_adapters::Notifier;
use rig_core::{Clock, Job, JobGroupStatus};
use rig_storage::{JobGroupStore, JobStore};
use std::sync::Arc;

#[async_trait]
pub trait JobCompletionListener: Send + Sync {
    async fn on_job_completed(&self, job: &Job) -> Result<(), EngineError>;
}

/// Chains the jobs of a group: when one finishes, the next is scheduled
/// carrying the group id; after the last, the group is marked COMPLETED.
pub struct GroupChainListener<C: Clock> {
    groups: Arc<dyn JobGroupStore>,
    jobs: Arc<dyn JobStore>,
    scheduler: Scheduler<C>,
}

impl<C: Clock> GroupChainListener<C> {
    pub fn new(
        groups: Arc<dyn JobGroupStore>,
        jobs: Arc<dyn JobStore>,
        scheduler: Scheduler<C>,
    ) -> Self {
        Self {
            groups,
            jobs,
            scheduler,
        }
    }
}

#[async_trait]
impl<C: Clock> JobCompletionListener for GroupChainListener<C> {
    async fn on_job_completed(&self, job: &Job) -> Result<(), EngineError> {
        let Some(group_id) = &job.group_id else {
            return Ok(());
        };
        let Some(group) = self.groups.get(group_id)? else {
            return Ok(());
        };
        if let Some(next_id) = group.next_after(&job.id) {
            let mut next = self
                .jobs
                .get(next_id)?
                .ok_or_else(|| EngineError::JobNotFound(next_id.clone()))?;
            next.group_id = Some(group.id.clone());
            self.jobs.save(&next)?;
            tracing::info!(group = %group.id, job = %next.id, "chaining next group job");
            self.scheduler.schedule(next)?;
        }
        if group.is_last(&job.id) {
            self.groups
                .update_status(&group.id, JobGroupStatus::Completed)?;
            tracing::info!(group = %group.id, "job group completed");
        }
        Ok(())
    }
}

/// Delivers a completion notification when the job declares a target.
pub struct NotificationListener<N: Notifier> {
    notifier: N,
}

impl<N: Notifier> NotificationListener<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl<N: Notifier> JobCompletionListener for NotificationListener<N> {
    async fn on_job_completed(&self, job: &Job) -> Result<(), EngineError> {
        let Some(target) = &job.notification else {
            return Ok(());
        };
        let subject = format!("Job '{}' completed", job.name);
        let message = format!("Job '{}' finished with status {}", job.name, job.status);
        self.notifier.notify(target, &subject, &message).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "listeners_tests.rs"]
mod tests;
