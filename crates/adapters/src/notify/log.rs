// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log-backed notification adapter.
//!
//! Writes each notification to the tracing log instead of delivering it.
//! Used where no mail or webhook transport is wired up.

use super::{Notifier, NotifyError};
use async_trait::async_trait;
use rig_core::NotificationTarget;

#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        target: &NotificationTarget,
        subject: &str,
        message: &str,
    ) -> Result<(), NotifyError> {
        tracing::info!(
            kind = ?target.kind,
            recipient = %target.recipient,
            %subject,
            %message,
            "job notification"
        );
        Ok(())
    }
}
