// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job groups: ordered chains of jobs executed one after another.

use crate::job::JobId;
use serde::{Deserialize, Serialize};
use std::fmt;

crate::define_id! {
    /// Unique identifier for a job group.
    pub struct JobGroupId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobGroupStatus {
    Running,
    Completed,
}

impl fmt::Display for JobGroupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobGroupStatus::Running => write!(f, "running"),
            JobGroupStatus::Completed => write!(f, "completed"),
        }
    }
}

/// An ordered list of jobs that must run sequentially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobGroup {
    pub id: JobGroupId,
    pub name: String,
    pub status: JobGroupStatus,
    pub job_ids: Vec<JobId>,
}

impl JobGroup {
    pub fn new(
        id: impl Into<JobGroupId>,
        name: impl Into<String>,
        job_ids: Vec<JobId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: JobGroupStatus::Running,
            job_ids,
        }
    }

    /// The job scheduled right after `job_id` in the chain, if any.
    pub fn next_after(&self, job_id: &JobId) -> Option<&JobId> {
        let pos = self.job_ids.iter().position(|id| id == job_id)?;
        self.job_ids.get(pos + 1)
    }

    /// True when `job_id` is the last job of the chain.
    pub fn is_last(&self, job_id: &JobId) -> bool {
        self.job_ids.last() == Some(job_id)
    }
}

#[cfg(test)]
#[path = "group_tests.rs"]
mod tests;
