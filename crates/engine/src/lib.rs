// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rig-engine: the job dispatch core.
//!
//! One dispatch engine per project drains that project's detail queue onto
//! free worker clients. A process-wide scheduler holds time-delayed jobs.
//! Worker reports flow back through the completion state machine, which
//! drives job status, recurrence, group chaining, and notifications.

pub mod admin;
pub mod ci;
pub mod client_pool;
pub mod command_builder;
pub mod completion;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod gateway;
pub mod listeners;
pub mod manager;
pub mod scheduler;

pub use admin::Admin;
pub use ci::CiService;
pub use client_pool::ClientPool;
pub use command_builder::{CommandBuildError, CommandBuilder};
pub use completion::CompletionHandler;
pub use config::{ConfigError, RunnerConfig};
pub use dispatch::{DispatchEngine, EngineHandle};
pub use error::EngineError;
pub use gateway::Gateway;
pub use listeners::{GroupChainListener, JobCompletionListener, NotificationListener};
pub use manager::{EngineDeps, Supervisor};
pub use scheduler::Scheduler;
