// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project identity.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a project.
    pub struct ProjectId;
}

/// A project groups jobs and the clients eligible to run them.
/// One dispatch engine runs per project for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
}

impl Project {
    pub fn new(id: impl Into<ProjectId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}
