// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker client registry store.

use crate::error::StorageError;
use parking_lot::Mutex;
use rig_core::{Client, ClientId, ProjectId};
use std::collections::HashMap;
use std::sync::Arc;

pub trait ClientStore: Send + Sync {
    fn get(&self, id: &ClientId) -> Result<Option<Client>, StorageError>;

    /// Clients announce themselves by name, so the gateway resolves them
    /// that way.
    fn get_by_name(&self, name: &str) -> Result<Option<Client>, StorageError>;

    fn save(&self, client: &Client) -> Result<(), StorageError>;

    fn list_by_project(&self, project_id: &ProjectId) -> Result<Vec<Client>, StorageError>;
}

/// In-memory client registry.
#[derive(Clone, Default)]
pub struct InMemoryClientStore {
    inner: Arc<Mutex<HashMap<ClientId, Client>>>,
}

impl InMemoryClientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientStore for InMemoryClientStore {
    fn get(&self, id: &ClientId) -> Result<Option<Client>, StorageError> {
        Ok(self.inner.lock().get(id).cloned())
    }

    fn get_by_name(&self, name: &str) -> Result<Option<Client>, StorageError> {
        Ok(self
            .inner
            .lock()
            .values()
            .find(|c| c.name == name)
            .cloned())
    }

    fn save(&self, client: &Client) -> Result<(), StorageError> {
        self.inner.lock().insert(client.id.clone(), client.clone());
        Ok(())
    }

    fn list_by_project(&self, project_id: &ProjectId) -> Result<Vec<Client>, StorageError> {
        let mut clients: Vec<Client> = self
            .inner
            .lock()
            .values()
            .filter(|c| &c.project_id == project_id)
            .cloned()
            .collect();
        clients.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(clients)
    }
}
