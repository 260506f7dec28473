// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command construction.
//!
//! Expands the project's command templates once per test case of the
//! detail's test set. Two placeholder families with distinct markers:
//! `$NAME` constants resolved from the job environment, and `@...`
//! built-ins resolved from the dispatch context. The constant pass always
//! runs before the built-in pass.

use rig_core::{
    Client, IdGen, Job, JobCommand, JobDetail, JobParameterId, TestCaseId, TestSetId, TestStep,
};
use rig_storage::{StorageError, TestDefStore};
use std::sync::Arc;
use thiserror::Error;

/// Errors from command construction. Any failure aborts the whole build;
/// no partial command list is ever returned.
#[derive(Debug, Error)]
pub enum CommandBuildError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("environment references unknown job parameter: {0}")]
    UnknownParameter(JobParameterId),
    #[error("test set has no test cases: {0}")]
    NoTestCases(TestSetId),
    #[error("test case has no steps: {0}")]
    NoTestSteps(TestCaseId),
}

/// Builds the per-client command batch for one job detail.
#[derive(Clone)]
pub struct CommandBuilder<G: IdGen> {
    testdefs: Arc<dyn TestDefStore>,
    ids: G,
}

impl<G: IdGen> CommandBuilder<G> {
    pub fn new(testdefs: Arc<dyn TestDefStore>, ids: G) -> Self {
        Self { testdefs, ids }
    }

    /// Expand every project template for every test case of the detail's
    /// test set, in stored order.
    pub fn build(
        &self,
        job: &Job,
        detail: &JobDetail,
        client: &Client,
    ) -> Result<Vec<JobCommand>, CommandBuildError> {
        let cases = self.testdefs.test_cases(&detail.test_set.id)?;
        if cases.is_empty() {
            return Err(CommandBuildError::NoTestCases(detail.test_set.id.clone()));
        }
        let templates = self.testdefs.command_templates(&job.project_id)?;
        let constants = self.resolve_constants(job)?;

        let mut commands = Vec::new();
        for case in &cases {
            let steps = self.testdefs.test_steps(&case.id)?;
            if steps.is_empty() {
                return Err(CommandBuildError::NoTestSteps(case.id.clone()));
            }
            let context = BuiltinContext {
                test_case_id: &case.id,
                test_set_id: &detail.test_set.id,
                steps: &steps,
                client_host_name: &client.name,
            };
            for template in &templates {
                commands.push(JobCommand {
                    id: self.ids.next().into(),
                    template_id: template.id.clone(),
                    test_case_id: case.id.clone(),
                    windows_command: expand(&template.windows_value, &constants, &context),
                    unix_command: expand(&template.unix_value, &constants, &context),
                    run_script: template.run_script,
                    status: rig_core::CommandStatus::NotStarted,
                });
            }
        }
        Ok(commands)
    }

    /// Join the job environment's values to the project's parameter
    /// definitions. A value pointing at an unknown parameter id fails the
    /// build rather than leaving its marker unexpanded.
    fn resolve_constants(&self, job: &Job) -> Result<Vec<(String, String)>, CommandBuildError> {
        let params = self.testdefs.job_parameters(&job.project_id)?;
        let mut constants = Vec::new();
        for value in &job.environment.parameter_values {
            let param = params
                .iter()
                .find(|p| p.id == value.parameter_id)
                .ok_or_else(|| {
                    CommandBuildError::UnknownParameter(value.parameter_id.clone())
                })?;
            constants.push((param.name.clone(), value.value.clone()));
        }
        // Longest name first so $FOO never clips $FOOBAR.
        constants.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Ok(constants)
    }
}

struct BuiltinContext<'a> {
    test_case_id: &'a TestCaseId,
    test_set_id: &'a TestSetId,
    steps: &'a [TestStep],
    client_host_name: &'a str,
}

fn expand(template: &str, constants: &[(String, String)], ctx: &BuiltinContext<'_>) -> String {
    let mut out = template.to_string();
    for (name, value) in constants {
        out = out.replace(&format!("${name}"), value);
    }
    let joined_steps = ctx
        .steps
        .iter()
        .map(|s| s.parameter.as_str())
        .collect::<Vec<_>>()
        .join(";");
    out.replace("@TEST_CASE_ID", ctx.test_case_id.as_str())
        .replace("@TEST_SET_ID", ctx.test_set_id.as_str())
        .replace("@TEST_STEPS", &joined_steps)
        .replace("@CLIENT_HOST_NAME", ctx.client_host_name)
}

#[cfg(test)]
#[path = "command_builder_tests.rs"]
mod tests;
