// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker client availability tracker.
//!
//! One tracker per process. All status transitions go through the single
//! mutex, so find-a-FREE-client-and-flip-it-BUSY is atomic: two engines
//! can never acquire the same client.

use parking_lot::Mutex;
use rig_core::{Client, ClientId, ClientStatus, Job};
use std::collections::HashMap;
use std::sync::Arc;

struct TrackedClient {
    client: Client,
    status: ClientStatus,
}

/// Cloneable handle over the shared client status map.
#[derive(Clone, Default)]
pub struct ClientPool {
    inner: Arc<Mutex<HashMap<ClientId, TrackedClient>>>,
}

impl ClientPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a client, initially DEAD until it announces itself. Already
    /// tracked clients keep their current status.
    pub fn register(&self, client: Client) {
        self.inner
            .lock()
            .entry(client.id.clone())
            .or_insert(TrackedClient {
                client,
                status: ClientStatus::Dead,
            });
    }

    /// Set a client's status. Unknown ids are a no-op, and re-applying the
    /// current status is harmless.
    pub fn update_status(&self, id: &ClientId, status: ClientStatus) {
        if let Some(tracked) = self.inner.lock().get_mut(id) {
            tracked.status = status;
        }
    }

    pub fn status(&self, id: &ClientId) -> Option<ClientStatus> {
        self.inner.lock().get(id).map(|t| t.status)
    }

    /// Acquire a FREE client for the job and flip it BUSY. Jobs with an
    /// explicit pool only ever bind a pool member; pool-less jobs take any
    /// free client of their project.
    pub fn acquire(&self, job: &Job) -> Option<Client> {
        if !job.has_client_pool() {
            return self.acquire_unpooled(job, true);
        }
        let mut clients = self.inner.lock();
        for id in &job.client_pool {
            if let Some(tracked) = clients.get_mut(id) {
                // Pool members must still belong to the job's project.
                if tracked.status == ClientStatus::Free
                    && tracked.client.project_id == job.project_id
                {
                    tracked.status = ClientStatus::Busy;
                    return Some(tracked.client.clone());
                }
            }
        }
        None
    }

    /// Find a FREE client of the job's project, ignoring any explicit pool.
    /// With `commit` false this is a pure availability probe.
    pub fn acquire_unpooled(&self, job: &Job, commit: bool) -> Option<Client> {
        let mut clients = self.inner.lock();
        // Deterministic scan order regardless of map layout.
        let mut ids: Vec<ClientId> = clients
            .iter()
            .filter(|(_, t)| {
                t.client.project_id == job.project_id && t.status == ClientStatus::Free
            })
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        let id = ids.into_iter().next()?;
        let tracked = clients.get_mut(&id)?;
        if commit {
            tracked.status = ClientStatus::Busy;
        }
        Some(tracked.client.clone())
    }

    /// True when the job declares a pool and at least one member is FREE.
    pub fn has_pooled_client_free(&self, job: &Job) -> bool {
        if !job.has_client_pool() {
            return false;
        }
        let clients = self.inner.lock();
        job.client_pool.iter().any(|id| {
            clients.get(id).is_some_and(|t| {
                t.status == ClientStatus::Free && t.client.project_id == job.project_id
            })
        })
    }

    /// Availability probe used by queue rotation: could this job bind a
    /// client right now without taking one?
    pub fn has_client_free(&self, job: &Job) -> bool {
        if job.has_client_pool() {
            self.has_pooled_client_free(job)
        } else {
            self.acquire_unpooled(job, false).is_some()
        }
    }

    /// Point-in-time view of every tracked client, ordered by id.
    pub fn snapshot(&self) -> Vec<(Client, ClientStatus)> {
        let clients = self.inner.lock();
        let mut entries: Vec<(Client, ClientStatus)> = clients
            .values()
            .map(|t| (t.client.clone(), t.status))
            .collect();
        entries.sort_by(|a, b| a.0.id.cmp(&b.0.id));
        entries
    }
}

#[cfg(test)]
#[path = "client_pool_tests.rs"]
mod tests;
