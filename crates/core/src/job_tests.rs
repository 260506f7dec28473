// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::testdef::TestSet;
use yare::parameterized;

fn detail(id: &str, status: CommandStatus) -> JobDetail {
    let mut d = JobDetail::new(id, "j1", TestSet::new("ts1", "smoke"));
    d.status = status;
    d
}

fn command(id: &str, status: CommandStatus) -> JobCommand {
    JobCommand {
        id: JobCommandId::new(id),
        template_id: "tpl1".into(),
        test_case_id: "tc1".into(),
        windows_command: "run.bat".into(),
        unix_command: "run.sh".into(),
        run_script: true,
        status,
    }
}

#[parameterized(
    completed = { JobStatus::Completed, true },
    not_started = { JobStatus::NotStarted, true },
    stopped = { JobStatus::Stopped, true },
    queued = { JobStatus::Queued, false },
    started = { JobStatus::Started, false },
    planned = { JobStatus::Planned, false },
    waiting_stop = { JobStatus::WaitingStop, false },
)]
fn ci_requeueable_states(status: JobStatus, expected: bool) {
    assert_eq!(status.is_ci_requeueable(), expected);
}

#[parameterized(
    completed = { CommandStatus::Completed, true },
    blocked = { CommandStatus::Blocked, true },
    not_started = { CommandStatus::NotStarted, false },
    in_progress = { CommandStatus::InProgress, false },
)]
fn finished_command_states(status: CommandStatus, expected: bool) {
    assert_eq!(status.is_finished(), expected);
}

#[test]
fn job_complete_requires_every_detail_completed() {
    let mut job = Job::new("j1", "nightly", "p1");
    job.details = vec![
        detail("d1", CommandStatus::Completed),
        detail("d2", CommandStatus::NotStarted),
    ];
    assert!(!job.is_complete(None));

    job.details[1].status = CommandStatus::Completed;
    assert!(job.is_complete(None));
}

#[test]
fn job_complete_treats_completing_detail_as_done() {
    let mut job = Job::new("j1", "nightly", "p1");
    job.details = vec![
        detail("d1", CommandStatus::Completed),
        detail("d2", CommandStatus::InProgress),
    ];
    // d2 is mid-transition; passing it as "completing" counts it as done.
    assert!(job.is_complete(Some(&JobDetailId::new("d2"))));
    assert!(!job.is_complete(None));
}

#[test]
fn all_commands_finished_handles_empty_and_mixed_lists() {
    let mut d = detail("d1", CommandStatus::InProgress);
    assert!(!d.all_commands_finished(), "no commands built yet");

    d.commands = vec![
        command("c1", CommandStatus::Completed),
        command("c2", CommandStatus::InProgress),
    ];
    assert!(!d.all_commands_finished());

    d.commands[1].status = CommandStatus::Blocked;
    assert!(d.all_commands_finished());
}

#[test]
fn locate_command_returns_detail_and_command_index() {
    let mut job = Job::new("j1", "nightly", "p1");
    let mut d1 = detail("d1", CommandStatus::InProgress);
    d1.commands = vec![command("c1", CommandStatus::InProgress)];
    let mut d2 = detail("d2", CommandStatus::InProgress);
    d2.commands = vec![
        command("c2", CommandStatus::NotStarted),
        command("c3", CommandStatus::NotStarted),
    ];
    job.details = vec![d1, d2];

    assert_eq!(job.locate_command(&JobCommandId::new("c3")), Some((1, 1)));
    assert_eq!(job.locate_command(&JobCommandId::new("nope")), None);
}

#[test]
fn advance_planned_one_day_only_moves_planned_jobs() {
    let mut job = Job::new("j1", "nightly", "p1");
    job.advance_planned_one_day();
    assert_eq!(job.planned_at_ms, None);

    job.planned_at_ms = Some(1_000);
    job.advance_planned_one_day();
    assert_eq!(job.planned_at_ms, Some(1_000 + crate::clock::DAY_MS));
}

#[test]
fn reset_details_clears_run_state() {
    let mut job = Job::new("j1", "nightly", "p1");
    let mut d = detail("d1", CommandStatus::Completed);
    d.test_set.status = CommandStatus::Completed;
    d.test_set.executed_at_ms = Some(42);
    d.client_id = Some("c1".into());
    d.commands = vec![command("c1", CommandStatus::Completed)];
    job.details = vec![d];

    job.reset_details();

    let d = &job.details[0];
    assert_eq!(d.status, CommandStatus::NotStarted);
    assert_eq!(d.test_set.status, CommandStatus::NotStarted);
    assert_eq!(d.test_set.executed_at_ms, None);
    assert_eq!(d.client_id, None);
    assert!(d.commands.is_empty());
}

#[test]
fn client_pool_presence() {
    let mut job = Job::new("j1", "nightly", "p1");
    assert!(!job.has_client_pool());
    job.client_pool.push("c1".into());
    assert!(job.has_client_pool());
}
