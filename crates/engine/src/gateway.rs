// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inbound gateway for transport callbacks.
//!
//! The transport layer (websocket session handling, out of scope here)
//! calls in with announcements, disconnects, and command reports. Errors
//! go back to the transport; they never reach the engine loops.

use crate::client_pool::ClientPool;
use crate::completion::CompletionHandler;
use crate::error::EngineError;
use rig_core::{ClientAnnouncement, ClientId, ClientStatus, Clock, CommandReport};
use rig_storage::ClientStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct Gateway<C: Clock> {
    clients: Arc<dyn ClientStore>,
    pool: ClientPool,
    completion: CompletionHandler<C>,
}

impl<C: Clock> Gateway<C> {
    pub fn new(
        clients: Arc<dyn ClientStore>,
        pool: ClientPool,
        completion: CompletionHandler<C>,
    ) -> Self {
        Self {
            clients,
            pool,
            completion,
        }
    }

    /// A worker announced itself or changed availability. Unknown names are
    /// an error; known clients are tracked and take the announced status.
    pub fn on_client_announcement(
        &self,
        announcement: &ClientAnnouncement,
    ) -> Result<(), EngineError> {
        let client = self
            .clients
            .get_by_name(&announcement.client_name)?
            .ok_or_else(|| EngineError::UnknownClient(announcement.client_name.clone()))?;
        self.pool.register(client.clone());
        self.pool.update_status(&client.id, announcement.status);
        tracing::info!(client = %client.name, status = %announcement.status, "client announced");
        Ok(())
    }

    /// Session dropped: the client is DEAD until it announces again.
    pub fn on_client_disconnected(&self, client_id: &ClientId) {
        self.pool.update_status(client_id, ClientStatus::Dead);
        tracing::info!(client = %client_id, "client disconnected");
    }

    pub async fn on_command_report(&self, report: &CommandReport) -> Result<(), EngineError> {
        self.completion.on_command_report(report).await
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
