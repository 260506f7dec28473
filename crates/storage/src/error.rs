// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage error type

use thiserror::Error;

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("storage backend error: {0}")]
    Backend(String),
}
