// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rig-storage: collaborator store traits and in-memory reference
//! implementations.
//!
//! The dispatch core only speaks to these traits; durability guarantees are
//! whatever the backing implementation provides. The in-memory stores here
//! back the test suites and small embedders.

mod clients;
mod error;
mod groups;
mod jobs;
mod projects;
mod test_runs;
mod testdefs;

pub use clients::{ClientStore, InMemoryClientStore};
pub use error::StorageError;
pub use groups::{InMemoryJobGroupStore, JobGroupStore};
pub use jobs::{InMemoryJobStore, JobStore};
pub use projects::{InMemoryProjectStore, ProjectStore};
pub use test_runs::{InMemoryTestRunStore, TestRunRecord, TestRunStore};
pub use testdefs::{InMemoryTestDefStore, TestDefStore};
