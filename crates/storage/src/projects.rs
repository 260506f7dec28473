// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project store.

use crate::error::StorageError;
use parking_lot::Mutex;
use rig_core::{Project, ProjectId};
use std::collections::HashMap;
use std::sync::Arc;

pub trait ProjectStore: Send + Sync {
    fn get(&self, id: &ProjectId) -> Result<Option<Project>, StorageError>;

    fn get_by_name(&self, name: &str) -> Result<Option<Project>, StorageError>;

    fn save(&self, project: &Project) -> Result<(), StorageError>;

    fn list(&self) -> Result<Vec<Project>, StorageError>;
}

/// In-memory project store.
#[derive(Clone, Default)]
pub struct InMemoryProjectStore {
    inner: Arc<Mutex<HashMap<ProjectId, Project>>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectStore for InMemoryProjectStore {
    fn get(&self, id: &ProjectId) -> Result<Option<Project>, StorageError> {
        Ok(self.inner.lock().get(id).cloned())
    }

    fn get_by_name(&self, name: &str) -> Result<Option<Project>, StorageError> {
        Ok(self
            .inner
            .lock()
            .values()
            .find(|p| p.name == name)
            .cloned())
    }

    fn save(&self, project: &Project) -> Result<(), StorageError> {
        self.inner
            .lock()
            .insert(project.id.clone(), project.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<Project>, StorageError> {
        let mut projects: Vec<Project> = self.inner.lock().values().cloned().collect();
        projects.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(projects)
    }
}
