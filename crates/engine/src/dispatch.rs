// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-project dispatch engine.
//!
//! The engine drains its project's detail queue: it holds the head entry,
//! waits for a FREE client, builds the command batch, persists the binding,
//! and sends the batch to the client. A starved job with an all-BUSY
//! explicit pool is rotated to the tail so other jobs can make progress.
//!
//! Administrative calls go through the cloneable [`EngineHandle`]; the loop
//! itself runs on its own tokio task and wakes on notify or after one poll
//! interval, whichever comes first.

use crate::client_pool::ClientPool;
use crate::command_builder::CommandBuilder;
use crate::error::EngineError;
use crate::manager::EngineDeps;
use indexmap::IndexMap;
use parking_lot::Mutex;
use rig_adapters::CommandDispatch;
use rig_core::{
    Client, ClientStatus, CommandStatus, DispatchCommand, IdGen, Job, JobDetail, JobDetailId,
    JobId, JobStatus, ProjectId,
};
use rig_storage::{JobStore, TestDefStore};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// One queued unit of work: a job detail awaiting dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedEntry {
    pub job_id: JobId,
    pub detail_id: JobDetailId,
}

#[derive(Default)]
struct EngineState {
    /// Insertion-ordered job snapshots, kept while any detail is queued.
    queued_jobs: IndexMap<JobId, Job>,
    detail_queue: VecDeque<QueuedEntry>,
    running_jobs: HashSet<JobId>,
    /// Entry the loop is currently trying to place.
    held: Option<QueuedEntry>,
    /// Set when the held entry's job was removed between iterations; the
    /// loop discards its held reference before touching anything else.
    drop_held: bool,
}

/// Cloneable administrative surface of one project's engine.
#[derive(Clone, Default)]
pub struct EngineHandle {
    state: Arc<Mutex<EngineState>>,
    notify: Arc<Notify>,
}

impl EngineHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a job snapshot: one entry per NOT_STARTED detail, in detail
    /// order.
    pub fn enqueue(&self, job: Job) {
        {
            let mut state = self.state.lock();
            for detail in &job.details {
                if detail.status == CommandStatus::NotStarted {
                    state.detail_queue.push_back(QueuedEntry {
                        job_id: job.id.clone(),
                        detail_id: detail.id.clone(),
                    });
                }
            }
            state.queued_jobs.insert(job.id.clone(), job);
        }
        self.notify.notify_one();
    }

    /// Remove every queued trace of a job. Flags the held entry for
    /// dropping when it belongs to this job.
    pub fn dequeue_job(&self, job_id: &JobId) {
        {
            let mut state = self.state.lock();
            state.detail_queue.retain(|e| &e.job_id != job_id);
            state.queued_jobs.shift_remove(job_id);
            if state.held.as_ref().is_some_and(|h| &h.job_id == job_id) {
                state.drop_held = true;
            }
        }
        self.notify.notify_one();
    }

    /// Flag the held entry for dropping if it belongs to this job.
    pub fn request_requeue(&self, job_id: &JobId) {
        let mut state = self.state.lock();
        if state.held.as_ref().is_some_and(|h| &h.job_id == job_id) {
            state.drop_held = true;
        }
    }

    /// Drop a job from the running set.
    pub fn forget(&self, job_id: &JobId) {
        self.state.lock().running_jobs.remove(job_id);
    }

    pub fn queued_job_ids(&self) -> Vec<JobId> {
        self.state.lock().queued_jobs.keys().cloned().collect()
    }

    pub fn queued_entries(&self) -> Vec<QueuedEntry> {
        self.state.lock().detail_queue.iter().cloned().collect()
    }

    pub fn is_running(&self, job_id: &JobId) -> bool {
        self.state.lock().running_jobs.contains(job_id)
    }

    /// Queued or running.
    pub fn is_active(&self, job_id: &JobId) -> bool {
        let state = self.state.lock();
        state.queued_jobs.contains_key(job_id) || state.running_jobs.contains(job_id)
    }
}

/// The queue-draining task for one project.
pub struct DispatchEngine<D: CommandDispatch, G: IdGen> {
    project_id: ProjectId,
    handle: EngineHandle,
    jobs: Arc<dyn JobStore>,
    testdefs: Arc<dyn TestDefStore>,
    pool: ClientPool,
    dispatch: D,
    builder: CommandBuilder<G>,
    poll_interval: Duration,
}

impl<D: CommandDispatch, G: IdGen> DispatchEngine<D, G> {
    pub fn new(
        project_id: ProjectId,
        handle: EngineHandle,
        deps: EngineDeps<D, G>,
        poll_interval: Duration,
    ) -> Self {
        let builder = CommandBuilder::new(deps.testdefs.clone(), deps.id_gen);
        Self {
            project_id,
            handle,
            jobs: deps.jobs,
            testdefs: deps.testdefs,
            pool: deps.pool,
            dispatch: deps.dispatch,
            builder,
            poll_interval,
        }
    }

    /// Drain the queue until the task is aborted. Wakes on administrative
    /// events; otherwise polls once per interval.
    pub async fn run(self) {
        tracing::info!(project = %self.project_id, "dispatch engine started");
        loop {
            self.tick().await;
            tokio::select! {
                _ = self.handle.notify.notified() => {}
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }

    /// One loop iteration with the error contained at the boundary.
    pub async fn tick(&self) {
        if let Err(error) = self.run_iteration().await {
            tracing::warn!(project = %self.project_id, %error, "dispatch iteration failed");
        }
    }

    async fn run_iteration(&self) -> Result<(), EngineError> {
        let (entry, job) = {
            let mut state = self.handle.state.lock();
            if state.drop_held {
                state.held = None;
                state.drop_held = false;
            }
            if state.held.is_none() {
                state.held = state.detail_queue.front().cloned();
            }
            let Some(entry) = state.held.clone() else {
                return Ok(());
            };
            match state.queued_jobs.get(&entry.job_id).cloned() {
                Some(job) => (entry, job),
                None => {
                    // Stale entry: its job snapshot is gone.
                    if state.detail_queue.front() == Some(&entry) {
                        state.detail_queue.pop_front();
                    }
                    state.held = None;
                    return Ok(());
                }
            }
        };

        let Some(detail) = job.detail(&entry.detail_id).cloned() else {
            self.discard_entry(&entry);
            return Ok(());
        };

        if self.testdefs.test_set(&detail.test_set.id)?.is_none()
            || self.testdefs.test_cases(&detail.test_set.id)?.is_empty()
        {
            return self.remove_empty_detail(&entry);
        }

        let Some(client) = self.pool.acquire(&job) else {
            self.maybe_rotate(&job);
            return Ok(());
        };

        // The entry leaves the queue before any I/O; from here on the job
        // counts as running.
        {
            let mut state = self.handle.state.lock();
            if state.detail_queue.front() == Some(&entry) {
                state.detail_queue.pop_front();
            }
            state.held = None;
            state.running_jobs.insert(entry.job_id.clone());
            if !state.detail_queue.iter().any(|e| e.job_id == entry.job_id) {
                state.queued_jobs.shift_remove(&entry.job_id);
            }
        }

        let prepared = self.prepare_dispatch(&job, &detail, &client);
        let wire = match prepared {
            Ok(wire) => wire,
            Err(error) => {
                // The client was flipped BUSY on acquire; give it back.
                self.pool.update_status(&client.id, ClientStatus::Free);
                return Err(error);
            }
        };

        if let Err(error) = self.dispatch.send(&wire).await {
            // Binding stays persisted; the worker picks it up when its
            // channel comes back.
            tracing::warn!(
                project = %self.project_id,
                job = %job.id,
                client = %client.name,
                %error,
                "dispatch send failed"
            );
        } else {
            tracing::info!(
                project = %self.project_id,
                job = %job.id,
                detail = %detail.id,
                client = %client.name,
                "job detail dispatched"
            );
        }
        Ok(())
    }

    /// Build the command batch and persist the client binding, returning
    /// the wire message to send.
    fn prepare_dispatch(
        &self,
        job: &Job,
        detail: &JobDetail,
        client: &Client,
    ) -> Result<DispatchCommand, EngineError> {
        let commands = self.builder.build(job, detail, client)?;
        let mut fresh = self
            .jobs
            .get(&job.id)?
            .ok_or_else(|| EngineError::JobNotFound(job.id.clone()))?;
        let stored = fresh
            .detail_mut(&detail.id)
            .ok_or_else(|| EngineError::JobNotFound(job.id.clone()))?;
        stored.client_id = Some(client.id.clone());
        stored.commands = commands.clone();
        let snapshot = stored.clone();
        self.jobs.save_detail(&snapshot)?;
        // First dispatch flips the job to STARTED; the start timestamp is
        // stamped when the first report arrives.
        if fresh.status == JobStatus::Queued {
            self.jobs.update_status(
                &fresh.id,
                JobStatus::Started,
                fresh.started_at_ms,
                fresh.finished_at_ms,
            )?;
        }
        Ok(DispatchCommand {
            client_id: client.id.clone(),
            client_name: client.name.clone(),
            job_id: job.id.clone(),
            job_detail_id: detail.id.clone(),
            test_set_id: detail.test_set.id.clone(),
            commands,
        })
    }

    /// A detail whose test set has no cases is unrunnable: take it off the
    /// job, and take the job out of storage when nothing remains.
    fn remove_empty_detail(&self, entry: &QueuedEntry) -> Result<(), EngineError> {
        tracing::warn!(
            project = %self.project_id,
            job = %entry.job_id,
            detail = %entry.detail_id,
            "detail has no test cases, removing"
        );
        if let Some(mut job) = self.jobs.get(&entry.job_id)? {
            job.details.retain(|d| d.id != entry.detail_id);
            if job.details.is_empty() {
                self.jobs.delete(&job.id)?;
            } else {
                self.jobs.save(&job)?;
            }
        }
        self.discard_entry(entry);
        Ok(())
    }

    fn discard_entry(&self, entry: &QueuedEntry) {
        let mut state = self.handle.state.lock();
        if state.detail_queue.front() == Some(entry) {
            state.detail_queue.pop_front();
        }
        state.held = None;
        state.drop_held = false;
        let job_still_queued = state.detail_queue.iter().any(|e| e.job_id == entry.job_id);
        if !job_still_queued && !state.running_jobs.contains(&entry.job_id) {
            state.queued_jobs.shift_remove(&entry.job_id);
        }
    }

    /// Starvation relief: when the held job's explicit pool is all busy but
    /// another queued job could bind a client right now, move the held
    /// job's entries to the tail in their original relative order.
    fn maybe_rotate(&self, job: &Job) {
        let mut state = self.handle.state.lock();
        if state.queued_jobs.len() <= 1 {
            return;
        }
        if self.pool.has_client_free(job) {
            return;
        }
        let other_can_run = state
            .queued_jobs
            .values()
            .any(|other| other.id != job.id && self.pool.has_client_free(other));
        if !other_can_run {
            return;
        }
        let mut moved = Vec::new();
        state.detail_queue.retain(|e| {
            if e.job_id == job.id {
                moved.push(e.clone());
                false
            } else {
                true
            }
        });
        state.detail_queue.extend(moved);
        if let Some(snapshot) = state.queued_jobs.shift_remove(&job.id) {
            state.queued_jobs.insert(job.id.clone(), snapshot);
        }
        state.held = None;
        tracing::debug!(project = %self.project_id, job = %job.id, "rotated starved job to tail");
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
