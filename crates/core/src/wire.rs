// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire DTOs exchanged with worker clients over the dispatch channel.

use crate::client::{ClientId, ClientStatus};
use crate::job::{CommandStatus, JobCommand, JobCommandId, JobDetailId, JobId};
use crate::testdef::TestSetId;
use serde::{Deserialize, Serialize};

/// A built command batch addressed to one client: everything a worker needs
/// to execute one job detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchCommand {
    pub client_id: ClientId,
    pub client_name: String,
    pub job_id: JobId,
    pub job_detail_id: JobDetailId,
    pub test_set_id: TestSetId,
    pub commands: Vec<JobCommand>,
}

/// Progress report a worker sends back for one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandReport {
    pub command_id: JobCommandId,
    pub status: CommandStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Sent by a worker when its session opens or its availability changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientAnnouncement {
    pub client_name: String,
    pub status: ClientStatus,
}
