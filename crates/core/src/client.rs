// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker client identity and liveness status.

use crate::project::ProjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

crate::define_id! {
    /// Unique identifier for a worker client.
    pub struct ClientId;
}

/// Liveness of a worker client as tracked by the client pool.
///
/// Clients start DEAD until they announce themselves over their channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Free,
    Busy,
    Dead,
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientStatus::Free => write!(f, "free"),
            ClientStatus::Busy => write!(f, "busy"),
            ClientStatus::Dead => write!(f, "dead"),
        }
    }
}

/// A remote worker process capable of executing job commands.
///
/// The name doubles as the host token workers announce themselves with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub project_id: ProjectId,
}

impl Client {
    pub fn new(
        id: impl Into<ClientId>,
        name: impl Into<String>,
        project_id: impl Into<ProjectId>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            project_id: project_id.into(),
        }
    }
}
