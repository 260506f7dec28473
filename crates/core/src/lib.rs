// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rig-core: entities, identifiers, and wire types for the rig dispatch service

pub mod client;
pub mod clock;
pub mod group;
pub mod id;
pub mod job;
pub mod project;
pub mod testdef;
pub mod wire;

pub use client::{Client, ClientId, ClientStatus};
pub use clock::{Clock, SystemClock, DAY_MS};
pub use group::{JobGroup, JobGroupId, JobGroupStatus};
pub use id::{IdGen, UuidIdGen};
pub use job::{
    CommandStatus, Job, JobCommand, JobCommandId, JobDetail, JobDetailId, JobEnvironment, JobId,
    JobParameterValue, JobStatus, NotificationKind, NotificationTarget,
};
pub use project::{Project, ProjectId};
pub use testdef::{
    CommandTemplate, CommandTemplateId, JobParameter, JobParameterId, TestCase, TestCaseId,
    TestSet, TestSetId, TestStep, TestStepId,
};
pub use wire::{ClientAnnouncement, CommandReport, DispatchCommand};

#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
#[cfg(any(test, feature = "test-support"))]
pub use id::SequentialIdGen;
