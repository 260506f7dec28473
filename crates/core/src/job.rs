// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job, job detail, and job command state machine.

use crate::client::ClientId;
use crate::clock::DAY_MS;
use crate::group::JobGroupId;
use crate::project::ProjectId;
use crate::testdef::{CommandTemplateId, JobParameterId, TestCaseId, TestSet};
use serde::{Deserialize, Serialize};
use std::fmt;

crate::define_id! {
    /// Unique identifier for a job.
    pub struct JobId;
}

crate::define_id! {
    /// Unique identifier for a job detail.
    pub struct JobDetailId;
}

crate::define_id! {
    /// Unique identifier for a job command, minted fresh on every dispatch.
    pub struct JobCommandId;
}

/// Lifecycle status of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    NotStarted,
    Queued,
    Started,
    Planned,
    WaitingStop,
    Stopped,
    Completed,
}

impl JobStatus {
    /// True for the states a CI run may pick the job back up from.
    pub fn is_ci_requeueable(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::NotStarted | JobStatus::Stopped
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::NotStarted => write!(f, "not_started"),
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Started => write!(f, "started"),
            JobStatus::Planned => write!(f, "planned"),
            JobStatus::WaitingStop => write!(f, "waiting_stop"),
            JobStatus::Stopped => write!(f, "stopped"),
            JobStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Progress status shared by job details, test sets, and job commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    NotStarted,
    InProgress,
    Completed,
    Blocked,
}

impl CommandStatus {
    /// Serde default helper.
    pub fn not_started() -> Self {
        CommandStatus::NotStarted
    }

    /// Terminal from the worker's point of view: the command will make no
    /// further progress.
    pub fn is_finished(self) -> bool {
        matches!(self, CommandStatus::Completed | CommandStatus::Blocked)
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandStatus::NotStarted => write!(f, "not_started"),
            CommandStatus::InProgress => write!(f, "in_progress"),
            CommandStatus::Completed => write!(f, "completed"),
            CommandStatus::Blocked => write!(f, "blocked"),
        }
    }
}

/// One worker-executable instruction derived from a command template and a
/// test case. Rebuilt on every dispatch, cleared when the detail completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCommand {
    pub id: JobCommandId,
    pub template_id: CommandTemplateId,
    pub test_case_id: TestCaseId,
    pub windows_command: String,
    pub unix_command: String,
    /// Mirrors the template's run-script marker so reports can be resolved
    /// without another template lookup.
    pub run_script: bool,
    pub status: CommandStatus,
}

/// The execution of one test set within a job, bound to exactly one worker
/// client while running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDetail {
    pub id: JobDetailId,
    pub job_id: JobId,
    pub test_set: TestSet,
    pub status: CommandStatus,
    /// Set only while the detail is running; cleared on completion, after
    /// the client has been freed in the pool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<ClientId>,
    #[serde(default)]
    pub commands: Vec<JobCommand>,
}

impl JobDetail {
    pub fn new(id: impl Into<JobDetailId>, job_id: impl Into<JobId>, test_set: TestSet) -> Self {
        Self {
            id: id.into(),
            job_id: job_id.into(),
            test_set,
            status: CommandStatus::NotStarted,
            client_id: None,
            commands: Vec::new(),
        }
    }

    /// True when every built command reached a finished status.
    pub fn all_commands_finished(&self) -> bool {
        !self.commands.is_empty() && self.commands.iter().all(|c| c.status.is_finished())
    }
}

/// A value bound to a user-defined parameter in a job environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobParameterValue {
    pub parameter_id: JobParameterId,
    pub value: String,
}

/// The named set of parameter values a job runs with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobEnvironment {
    pub name: String,
    #[serde(default)]
    pub parameter_values: Vec<JobParameterValue>,
}

/// Channel a completion notification is delivered through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Email,
    Webhook,
}

/// Where to deliver a job's completion notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTarget {
    pub kind: NotificationKind,
    pub recipient: String,
}

/// A schedulable unit of test execution composed of one or more details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub name: String,
    pub project_id: ProjectId,
    pub status: JobStatus,
    /// Future run time in epoch milliseconds; `None` means "submit now".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_at_ms: Option<u64>,
    /// Re-plan one day later each time the job completes.
    #[serde(default)]
    pub run_every_day: bool,
    /// Eligible for the CI submission surface.
    #[serde(default)]
    pub ci_enabled: bool,
    /// Explicit pool of eligible clients. Empty means any free client of
    /// the job's project may be used.
    #[serde(default)]
    pub client_pool: Vec<ClientId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<JobGroupId>,
    #[serde(default)]
    pub environment: JobEnvironment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationTarget>,
    pub details: Vec<JobDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at_ms: Option<u64>,
}

impl Job {
    pub fn new(
        id: impl Into<JobId>,
        name: impl Into<String>,
        project_id: impl Into<ProjectId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            project_id: project_id.into(),
            status: JobStatus::NotStarted,
            planned_at_ms: None,
            run_every_day: false,
            ci_enabled: false,
            client_pool: Vec::new(),
            group_id: None,
            environment: JobEnvironment::default(),
            notification: None,
            details: Vec::new(),
            started_at_ms: None,
            finished_at_ms: None,
        }
    }

    /// True when the job declares an explicit client pool.
    pub fn has_client_pool(&self) -> bool {
        !self.client_pool.is_empty()
    }

    pub fn detail(&self, id: &JobDetailId) -> Option<&JobDetail> {
        self.details.iter().find(|d| &d.id == id)
    }

    pub fn detail_mut(&mut self, id: &JobDetailId) -> Option<&mut JobDetail> {
        self.details.iter_mut().find(|d| &d.id == id)
    }

    /// Locate a command by id; returns (detail index, command index).
    pub fn locate_command(&self, id: &JobCommandId) -> Option<(usize, usize)> {
        self.details.iter().enumerate().find_map(|(di, detail)| {
            detail
                .commands
                .iter()
                .position(|c| &c.id == id)
                .map(|ci| (di, ci))
        })
    }

    /// A job is complete iff every detail is COMPLETED. The detail named by
    /// `completing` is treated as already completed, so the check can run
    /// while that detail's transition is still being persisted.
    pub fn is_complete(&self, completing: Option<&JobDetailId>) -> bool {
        self.details.iter().all(|detail| {
            detail.status == CommandStatus::Completed || Some(&detail.id) == completing
        })
    }

    pub fn has_in_progress_detail(&self) -> bool {
        self.details
            .iter()
            .any(|d| d.status == CommandStatus::InProgress)
    }

    /// Advance the planned run time by one day (daily recurrence).
    pub fn advance_planned_one_day(&mut self) {
        if let Some(planned) = self.planned_at_ms {
            self.planned_at_ms = Some(planned + DAY_MS);
        }
    }

    /// Put every detail back to NOT_STARTED so the job can run again.
    /// Execution history lives in the test run records, not here.
    pub fn reset_details(&mut self) {
        for detail in &mut self.details {
            detail.status = CommandStatus::NotStarted;
            detail.test_set.status = CommandStatus::NotStarted;
            detail.test_set.executed_at_ms = None;
            detail.client_id = None;
            detail.commands.clear();
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
