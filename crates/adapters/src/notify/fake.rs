// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake notification adapter for testing

use super::{Notifier, NotifyError};
use async_trait::async_trait;
use parking_lot::Mutex;
use rig_core::NotificationTarget;
use std::sync::Arc;

/// Recorded notification
#[derive(Debug, Clone)]
pub struct NotifyCall {
    pub target: NotificationTarget,
    pub subject: String,
    pub message: String,
}

struct FakeNotifierState {
    calls: Vec<NotifyCall>,
    fail: bool,
}

/// Fake notification adapter for testing
#[derive(Clone)]
pub struct FakeNotifier {
    inner: Arc<Mutex<FakeNotifierState>>,
}

impl Default for FakeNotifier {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeNotifierState {
                calls: Vec::new(),
                fail: false,
            })),
        }
    }
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded notifications
    pub fn calls(&self) -> Vec<NotifyCall> {
        self.inner.lock().calls.clone()
    }

    /// Make every subsequent notify call fail.
    pub fn fail(&self) {
        self.inner.lock().fail = true;
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn notify(
        &self,
        target: &NotificationTarget,
        subject: &str,
        message: &str,
    ) -> Result<(), NotifyError> {
        let mut state = self.inner.lock();
        if state.fail {
            return Err(NotifyError::SendFailed("forced failure".to_string()));
        }
        state.calls.push(NotifyCall {
            target: target.clone(),
            subject: subject.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
