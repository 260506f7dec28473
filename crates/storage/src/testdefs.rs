// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test-definition store. The engine never writes through this trait; test
//! set execution state lives on the job detail's embedded snapshot.

use crate::error::StorageError;
use parking_lot::Mutex;
use rig_core::{
    CommandTemplate, JobParameter, ProjectId, TestCase, TestCaseId, TestSet, TestSetId, TestStep,
};
use std::sync::Arc;

pub trait TestDefStore: Send + Sync {
    fn test_set(&self, id: &TestSetId) -> Result<Option<TestSet>, StorageError>;

    /// Test cases of a set, in execution order.
    fn test_cases(&self, test_set_id: &TestSetId) -> Result<Vec<TestCase>, StorageError>;

    /// Steps of a case, in execution order.
    fn test_steps(&self, test_case_id: &TestCaseId) -> Result<Vec<TestStep>, StorageError>;

    /// Command templates of a project, in dispatch order.
    fn command_templates(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<CommandTemplate>, StorageError>;

    /// User-defined parameters of a project.
    fn job_parameters(&self, project_id: &ProjectId) -> Result<Vec<JobParameter>, StorageError>;
}

#[derive(Default)]
struct TestDefData {
    test_sets: Vec<TestSet>,
    test_cases: Vec<TestCase>,
    test_steps: Vec<TestStep>,
    command_templates: Vec<CommandTemplate>,
    job_parameters: Vec<JobParameter>,
}

/// In-memory test-definition store, seeded up front.
#[derive(Clone, Default)]
pub struct InMemoryTestDefStore {
    inner: Arc<Mutex<TestDefData>>,
}

impl InMemoryTestDefStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_test_set(&self, set: TestSet) {
        self.inner.lock().test_sets.push(set);
    }

    pub fn add_test_case(&self, case: TestCase) {
        self.inner.lock().test_cases.push(case);
    }

    pub fn add_test_step(&self, step: TestStep) {
        self.inner.lock().test_steps.push(step);
    }

    pub fn add_command_template(&self, template: CommandTemplate) {
        self.inner.lock().command_templates.push(template);
    }

    pub fn add_job_parameter(&self, parameter: JobParameter) {
        self.inner.lock().job_parameters.push(parameter);
    }
}

impl TestDefStore for InMemoryTestDefStore {
    fn test_set(&self, id: &TestSetId) -> Result<Option<TestSet>, StorageError> {
        Ok(self
            .inner
            .lock()
            .test_sets
            .iter()
            .find(|s| &s.id == id)
            .cloned())
    }

    fn test_cases(&self, test_set_id: &TestSetId) -> Result<Vec<TestCase>, StorageError> {
        Ok(self
            .inner
            .lock()
            .test_cases
            .iter()
            .filter(|c| &c.test_set_id == test_set_id)
            .cloned()
            .collect())
    }

    fn test_steps(&self, test_case_id: &TestCaseId) -> Result<Vec<TestStep>, StorageError> {
        Ok(self
            .inner
            .lock()
            .test_steps
            .iter()
            .filter(|s| &s.test_case_id == test_case_id)
            .cloned()
            .collect())
    }

    fn command_templates(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<CommandTemplate>, StorageError> {
        Ok(self
            .inner
            .lock()
            .command_templates
            .iter()
            .filter(|t| &t.project_id == project_id)
            .cloned()
            .collect())
    }

    fn job_parameters(&self, project_id: &ProjectId) -> Result<Vec<JobParameter>, StorageError> {
        Ok(self
            .inner
            .lock()
            .job_parameters
            .iter()
            .filter(|p| &p.project_id == project_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
#[path = "testdefs_tests.rs"]
mod tests;
