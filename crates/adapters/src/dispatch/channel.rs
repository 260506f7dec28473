// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Channel-backed dispatch adapter.
//!
//! Each connected worker registers an outbound channel under its announced
//! name. Command batches are JSON-encoded and routed by client name; the
//! session layer owns draining the receiver onto the socket.

use super::{CommandDispatch, DispatchError};
use async_trait::async_trait;
use parking_lot::Mutex;
use rig_core::DispatchCommand;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// In-process channel registry keyed by client name.
#[derive(Clone, Default)]
pub struct ChannelDispatch {
    channels: Arc<Mutex<HashMap<String, mpsc::UnboundedSender<String>>>>,
}

impl ChannelDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an outbound channel for a client. Replaces any previous channel
    /// registered under the same name.
    pub fn register(&self, client_name: &str) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.channels.lock().insert(client_name.to_string(), tx);
        rx
    }

    /// Drop a client's channel. Subsequent sends to it fail as unavailable.
    pub fn unregister(&self, client_name: &str) {
        self.channels.lock().remove(client_name);
    }

    pub fn is_registered(&self, client_name: &str) -> bool {
        self.channels.lock().contains_key(client_name)
    }
}

#[async_trait]
impl CommandDispatch for ChannelDispatch {
    async fn send(&self, command: &DispatchCommand) -> Result<(), DispatchError> {
        let encoded = serde_json::to_string(command)?;
        let tx = self
            .channels
            .lock()
            .get(&command.client_name)
            .cloned()
            .ok_or_else(|| DispatchError::ClientUnavailable(command.client_name.clone()))?;
        tx.send(encoded).map_err(|_| {
            DispatchError::SendFailed(format!("channel closed for {}", command.client_name))
        })?;
        tracing::debug!(
            client = %command.client_name,
            job_id = %command.job_id,
            detail_id = %command.job_detail_id,
            "dispatched command batch"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
