// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake dispatch adapter for testing

use super::{CommandDispatch, DispatchError};
use async_trait::async_trait;
use parking_lot::Mutex;
use rig_core::DispatchCommand;
use std::sync::Arc;

struct FakeDispatchState {
    sent: Vec<DispatchCommand>,
    fail_for: Vec<String>,
}

/// Fake dispatch adapter for testing. Records every send; sends addressed
/// to a client in the failure list return `ClientUnavailable`.
#[derive(Clone)]
pub struct FakeDispatch {
    inner: Arc<Mutex<FakeDispatchState>>,
}

impl Default for FakeDispatch {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeDispatchState {
                sent: Vec::new(),
                fail_for: Vec::new(),
            })),
        }
    }
}

impl FakeDispatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded command batches
    pub fn sent(&self) -> Vec<DispatchCommand> {
        self.inner.lock().sent.clone()
    }

    /// Make sends to the named client fail.
    pub fn fail_for(&self, client_name: &str) {
        self.inner.lock().fail_for.push(client_name.to_string());
    }
}

#[async_trait]
impl CommandDispatch for FakeDispatch {
    async fn send(&self, command: &DispatchCommand) -> Result<(), DispatchError> {
        let mut state = self.inner.lock();
        if state.fail_for.iter().any(|n| n == &command.client_name) {
            return Err(DispatchError::ClientUnavailable(
                command.client_name.clone(),
            ));
        }
        state.sent.push(command.clone());
        Ok(())
    }
}
