// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test run history. One record per terminal run-script command report.

use crate::error::StorageError;
use parking_lot::Mutex;
use rig_core::{ClientId, CommandStatus, JobId, TestCaseId, TestSetId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of one test case execution on one client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRunRecord {
    pub job_id: JobId,
    pub test_set_id: TestSetId,
    pub test_case_id: TestCaseId,
    pub client_id: Option<ClientId>,
    pub status: CommandStatus,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub recorded_at_ms: u64,
}

pub trait TestRunStore: Send + Sync {
    fn record(&self, run: TestRunRecord) -> Result<(), StorageError>;

    fn list_by_job(&self, job_id: &JobId) -> Result<Vec<TestRunRecord>, StorageError>;
}

/// In-memory, append-only run history.
#[derive(Clone, Default)]
pub struct InMemoryTestRunStore {
    inner: Arc<Mutex<Vec<TestRunRecord>>>,
}

impl InMemoryTestRunStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<TestRunRecord> {
        self.inner.lock().clone()
    }
}

impl TestRunStore for InMemoryTestRunStore {
    fn record(&self, run: TestRunRecord) -> Result<(), StorageError> {
        self.inner.lock().push(run);
        Ok(())
    }

    fn list_by_job(&self, job_id: &JobId) -> Result<Vec<TestRunRecord>, StorageError> {
        Ok(self
            .inner
            .lock()
            .iter()
            .filter(|r| &r.job_id == job_id)
            .cloned()
            .collect())
    }
}
