// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op notification adapter

use super::{Notifier, NotifyError};
use async_trait::async_trait;
use rig_core::NotificationTarget;

/// Notification adapter that silently discards all notifications.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpNotifier;

impl NoOpNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn notify(
        &self,
        _target: &NotificationTarget,
        _subject: &str,
        _message: &str,
    ) -> Result<(), NotifyError> {
        Ok(())
    }
}
