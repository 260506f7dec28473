// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Time-delayed job scheduler.
//!
//! One per process. Jobs with a planned run time sit in the delayed pool
//! until `now >= planned_at_ms`, then go to their project engine through
//! the supervisor. Jobs without a planned time skip the pool entirely.

use crate::error::EngineError;
use crate::manager::Supervisor;
use parking_lot::Mutex;
use rig_core::{Clock, Job, JobId, JobStatus};
use rig_storage::JobStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Clone)]
pub struct Scheduler<C: Clock> {
    delayed: Arc<Mutex<Vec<Job>>>,
    notify: Arc<Notify>,
    supervisor: Supervisor,
    jobs: Arc<dyn JobStore>,
    clock: C,
    poll_interval: Duration,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(
        supervisor: Supervisor,
        jobs: Arc<dyn JobStore>,
        clock: C,
        poll_interval: Duration,
    ) -> Self {
        Self {
            delayed: Arc::new(Mutex::new(Vec::new())),
            notify: Arc::new(Notify::new()),
            supervisor,
            jobs,
            clock,
            poll_interval,
        }
    }

    /// Route a job: delayed pool when it has a planned time, immediate
    /// submission otherwise.
    pub fn schedule(&self, mut job: Job) -> Result<(), EngineError> {
        match job.planned_at_ms {
            Some(planned_at_ms) => {
                job.status = JobStatus::Planned;
                self.jobs.save(&job)?;
                tracing::info!(job = %job.id, planned_at_ms, "job planned");
                self.delayed.lock().push(job);
                self.notify.notify_one();
                Ok(())
            }
            None => self.supervisor.submit(&job),
        }
    }

    /// Cancel a job wherever it is: purge it from the delayed pool, then
    /// stop it on its engine.
    pub fn cancel(&self, job: &Job) -> Result<(), EngineError> {
        self.delayed.lock().retain(|j| j.id != job.id);
        self.supervisor.stop(job)
    }

    /// Move every due job out of the pool and submit it. Returns how many
    /// were promoted.
    pub fn promote_due(&self) -> usize {
        let now = self.clock.epoch_ms();
        let due: Vec<Job> = {
            let mut delayed = self.delayed.lock();
            let mut due = Vec::new();
            delayed.retain(|job| {
                if job.planned_at_ms.is_some_and(|at| now >= at) {
                    due.push(job.clone());
                    false
                } else {
                    true
                }
            });
            due
        };
        let count = due.len();
        for job in due {
            if let Err(error) = self.supervisor.submit(&job) {
                tracing::warn!(job = %job.id, %error, "failed to submit due job");
            }
        }
        count
    }

    pub fn delayed_jobs(&self) -> Vec<JobId> {
        self.delayed.lock().iter().map(|j| j.id.clone()).collect()
    }

    /// Promote due jobs until the task is aborted.
    pub async fn run(self) {
        tracing::info!("scheduler started");
        loop {
            self.promote_due();
            tokio::select! {
                _ = self.notify.notified() => {}
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
