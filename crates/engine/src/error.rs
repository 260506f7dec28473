// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error type

use crate::command_builder::CommandBuildError;
use rig_adapters::{DispatchError, NotifyError};
use rig_core::{JobCommandId, JobId, ProjectId};
use rig_storage::StorageError;
use thiserror::Error;

/// Errors surfaced by the dispatch core.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error(transparent)]
    Build(#[from] CommandBuildError),
    #[error("job not found: {0}")]
    JobNotFound(JobId),
    #[error("project not found: {0}")]
    ProjectNotFound(String),
    #[error("no engine for project: {0}")]
    NoEngineForProject(ProjectId),
    #[error("unknown command: {0}")]
    UnknownCommand(JobCommandId),
    #[error("unknown client: {0}")]
    UnknownClient(String),
}
