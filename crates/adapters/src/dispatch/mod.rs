// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker dispatch adapters

mod channel;

pub use channel::ChannelDispatch;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeDispatch;

use async_trait::async_trait;
use rig_core::DispatchCommand;
use thiserror::Error;

/// Errors from dispatch operations
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The addressed client has no open channel.
    #[error("client unavailable: {0}")]
    ClientUnavailable(String),
    #[error("encode failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Adapter for delivering built command batches to worker clients.
#[async_trait]
pub trait CommandDispatch: Clone + Send + Sync + 'static {
    /// Deliver a command batch to the client it is addressed to.
    async fn send(&self, command: &DispatchCommand) -> Result<(), DispatchError>;
}
