// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test definitions: test sets, cases, steps, command templates, parameters.
//!
//! These are read-only from the engine's point of view; the test-definition
//! store serves them. A job detail embeds a [`TestSet`] snapshot whose status
//! is advanced alongside the detail.

use crate::job::CommandStatus;
use crate::project::ProjectId;
use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a test set.
    pub struct TestSetId;
}

crate::define_id! {
    /// Unique identifier for a test case.
    pub struct TestCaseId;
}

crate::define_id! {
    /// Unique identifier for a test step.
    pub struct TestStepId;
}

crate::define_id! {
    /// Unique identifier for a command template.
    pub struct CommandTemplateId;
}

crate::define_id! {
    /// Unique identifier for a user-defined job parameter.
    pub struct JobParameterId;
}

/// An ordered collection of test cases executed as one job detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSet {
    pub id: TestSetId,
    pub name: String,
    #[serde(default = "CommandStatus::not_started")]
    pub status: CommandStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_at_ms: Option<u64>,
}

impl TestSet {
    pub fn new(id: impl Into<TestSetId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: CommandStatus::NotStarted,
            executed_at_ms: None,
        }
    }
}

/// One test case within a test set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: TestCaseId,
    pub test_set_id: TestSetId,
    pub name: String,
}

/// One step of a test case; `parameter` is the opaque payload workers
/// receive through the `@TEST_STEPS` built-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStep {
    pub id: TestStepId,
    pub test_case_id: TestCaseId,
    pub parameter: String,
}

/// A parameterized command definition, expanded per test case at dispatch
/// time. Carries one value string per worker OS family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandTemplate {
    pub id: CommandTemplateId,
    pub project_id: ProjectId,
    pub name: String,
    pub windows_value: String,
    pub unix_value: String,
    /// True for the template that runs the test script itself; a terminal
    /// report for this command triggers test-run recording.
    pub run_script: bool,
}

/// A user-defined constant parameter, referenced from templates as `$NAME`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobParameter {
    pub id: JobParameterId,
    pub project_id: ProjectId,
    pub name: String,
}
