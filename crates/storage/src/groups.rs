// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job group store.

use crate::error::StorageError;
use parking_lot::Mutex;
use rig_core::{JobGroup, JobGroupId, JobGroupStatus};
use std::collections::HashMap;
use std::sync::Arc;

pub trait JobGroupStore: Send + Sync {
    fn get(&self, id: &JobGroupId) -> Result<Option<JobGroup>, StorageError>;

    fn save(&self, group: &JobGroup) -> Result<(), StorageError>;

    fn update_status(&self, id: &JobGroupId, status: JobGroupStatus)
        -> Result<(), StorageError>;
}

/// In-memory job group store.
#[derive(Clone, Default)]
pub struct InMemoryJobGroupStore {
    inner: Arc<Mutex<HashMap<JobGroupId, JobGroup>>>,
}

impl InMemoryJobGroupStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobGroupStore for InMemoryJobGroupStore {
    fn get(&self, id: &JobGroupId) -> Result<Option<JobGroup>, StorageError> {
        Ok(self.inner.lock().get(id).cloned())
    }

    fn save(&self, group: &JobGroup) -> Result<(), StorageError> {
        self.inner.lock().insert(group.id.clone(), group.clone());
        Ok(())
    }

    fn update_status(
        &self,
        id: &JobGroupId,
        status: JobGroupStatus,
    ) -> Result<(), StorageError> {
        let mut groups = self.inner.lock();
        let group = groups
            .get_mut(id)
            .ok_or_else(|| StorageError::NotFound(format!("job group {id}")))?;
        group.status = status;
        Ok(())
    }
}
