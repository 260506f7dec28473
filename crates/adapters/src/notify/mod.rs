// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification adapters

mod log;
mod noop;

pub use log::LogNotifier;
pub use noop::NoOpNotifier;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNotifier, NotifyCall};

use async_trait::async_trait;
use rig_core::NotificationTarget;
use thiserror::Error;

/// Errors from notify operations
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Adapter for delivering job completion notifications.
#[async_trait]
pub trait Notifier: Clone + Send + Sync + 'static {
    /// Deliver a notification to the given target.
    async fn notify(
        &self,
        target: &NotificationTarget,
        subject: &str,
        message: &str,
    ) -> Result<(), NotifyError>;
}
