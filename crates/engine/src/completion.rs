// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion state machine.
//!
//! Worker command reports drive everything that happens after dispatch:
//! detail start, detail completion, job completion with recurrence, and the
//! WAITING_STOP to STOPPED transition. Reports are processed one at a time
//! behind an async mutex, so two reports for the same detail can never
//! interleave their read-modify-write cycles.

use crate::client_pool::ClientPool;
use crate::error::EngineError;
use crate::listeners::JobCompletionListener;
use crate::manager::Supervisor;
use crate::scheduler::Scheduler;
use rig_core::{ClientStatus, Clock, CommandReport, CommandStatus, Job, JobId, JobStatus};
use rig_storage::{JobStore, TestRunRecord, TestRunStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct CompletionHandler<C: Clock> {
    jobs: Arc<dyn JobStore>,
    test_runs: Arc<dyn TestRunStore>,
    pool: ClientPool,
    clock: C,
    scheduler: Scheduler<C>,
    supervisor: Supervisor,
    listeners: Arc<Vec<Arc<dyn JobCompletionListener>>>,
    report_lock: Arc<tokio::sync::Mutex<()>>,
}

impl<C: Clock> CompletionHandler<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        jobs: Arc<dyn JobStore>,
        test_runs: Arc<dyn TestRunStore>,
        pool: ClientPool,
        clock: C,
        scheduler: Scheduler<C>,
        supervisor: Supervisor,
        listeners: Vec<Arc<dyn JobCompletionListener>>,
    ) -> Self {
        Self {
            jobs,
            test_runs,
            pool,
            clock,
            scheduler,
            supervisor,
            listeners: Arc::new(listeners),
            report_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Apply one worker report. Unknown command ids are an error to the
    /// caller; every state transition here is persisted before the next
    /// report can observe it.
    pub async fn on_command_report(&self, report: &CommandReport) -> Result<(), EngineError> {
        let _serialized = self.report_lock.lock().await;

        let mut job = self
            .jobs
            .find_by_command(&report.command_id)?
            .ok_or_else(|| EngineError::UnknownCommand(report.command_id.clone()))?;
        let (di, ci) = job
            .locate_command(&report.command_id)
            .ok_or_else(|| EngineError::UnknownCommand(report.command_id.clone()))?;
        let now = self.clock.epoch_ms();

        job.details[di].commands[ci].status = report.status;
        self.jobs.save_detail(&job.details[di])?;

        if job.details[di].commands[ci].run_script && report.status.is_finished() {
            self.record_test_run(&job, di, ci, report, now)?;
        }

        if job.details[di].status == CommandStatus::NotStarted {
            self.start_detail(&mut job, di, now)?;
        } else if job.details[di].status == CommandStatus::InProgress
            && job.details[di].all_commands_finished()
        {
            self.complete_detail(&mut job, di, now).await?;
        }

        self.check_waiting_stop(&job.id, now)
    }

    fn record_test_run(
        &self,
        job: &Job,
        di: usize,
        ci: usize,
        report: &CommandReport,
        now: u64,
    ) -> Result<(), EngineError> {
        let detail = &job.details[di];
        self.test_runs.record(TestRunRecord {
            job_id: job.id.clone(),
            test_set_id: detail.test_set.id.clone(),
            test_case_id: detail.commands[ci].test_case_id.clone(),
            client_id: detail.client_id.clone(),
            status: report.status,
            result: report.result.clone(),
            description: report.description.clone(),
            recorded_at_ms: now,
        })?;
        Ok(())
    }

    /// First report for a detail: detail and its test set go IN_PROGRESS,
    /// and the job gets its start timestamp if it does not have one yet.
    fn start_detail(&self, job: &mut Job, di: usize, now: u64) -> Result<(), EngineError> {
        let detail = &mut job.details[di];
        detail.status = CommandStatus::InProgress;
        detail.test_set.status = CommandStatus::InProgress;
        self.jobs.save_detail(detail)?;
        let startable = matches!(
            job.status,
            JobStatus::Queued | JobStatus::Planned | JobStatus::NotStarted | JobStatus::Started
        );
        if startable && job.started_at_ms.is_none() {
            self.jobs
                .update_status(&job.id, JobStatus::Started, Some(now), None)?;
            job.started_at_ms = Some(now);
            tracing::info!(job = %job.id, "job started");
        }
        Ok(())
    }

    /// Every command of the detail reached a terminal status: stamp the
    /// test set, free the client, clear the binding and the built commands,
    /// then check whether the whole job is done.
    async fn complete_detail(&self, job: &mut Job, di: usize, now: u64) -> Result<(), EngineError> {
        {
            let detail = &mut job.details[di];
            detail.status = CommandStatus::Completed;
            detail.test_set.status = CommandStatus::Completed;
            detail.test_set.executed_at_ms = Some(now);
            // The client must be FREE before the cleared binding is
            // visible, or an engine could see a bindable detail with no
            // client to give it.
            if let Some(client_id) = detail.client_id.take() {
                self.pool.update_status(&client_id, ClientStatus::Free);
            }
            detail.commands.clear();
            self.jobs.save_detail(detail)?;
            tracing::info!(job = %job.id, detail = %detail.id, "job detail completed");
        }

        let completing = job.details[di].id.clone();
        if !job.is_complete(Some(&completing)) {
            return Ok(());
        }

        self.jobs
            .update_status(&job.id, JobStatus::Completed, job.started_at_ms, Some(now))?;
        tracing::info!(job = %job.id, "job completed");

        let mut finished = self
            .jobs
            .get(&job.id)?
            .ok_or_else(|| EngineError::JobNotFound(job.id.clone()))?;
        if finished.run_every_day && finished.planned_at_ms.is_some() {
            finished.advance_planned_one_day();
            finished.reset_details();
            finished.started_at_ms = None;
            finished.finished_at_ms = None;
            self.scheduler.schedule(finished.clone())?;
            // Listeners still see the completed snapshot.
            finished.status = JobStatus::Completed;
        } else {
            self.jobs.reset_planned_time(&finished.id)?;
        }
        self.supervisor.remove_from_running(&finished)?;

        for listener in self.listeners.iter() {
            if let Err(error) = listener.on_job_completed(&finished).await {
                tracing::warn!(job = %finished.id, %error, "completion listener failed");
            }
        }
        Ok(())
    }

    /// Evaluated after every report: a stopping job with nothing left in
    /// progress becomes STOPPED.
    fn check_waiting_stop(&self, job_id: &JobId, now: u64) -> Result<(), EngineError> {
        let Some(job) = self.jobs.get(job_id)? else {
            return Ok(());
        };
        if job.status == JobStatus::WaitingStop && !job.has_in_progress_detail() {
            self.jobs
                .update_status(&job.id, JobStatus::Stopped, job.started_at_ms, Some(now))?;
            self.supervisor.remove_from_running(&job)?;
            tracing::info!(job = %job.id, "job stopped");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "completion_tests.rs"]
mod tests;
