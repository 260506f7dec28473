// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for external I/O: the worker dispatch channel and job
//! completion notifications.

pub mod dispatch;
pub mod notify;

pub use dispatch::{ChannelDispatch, CommandDispatch, DispatchError};
pub use notify::{LogNotifier, NoOpNotifier, Notifier, NotifyError};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use dispatch::FakeDispatch;
#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifier, NotifyCall};
