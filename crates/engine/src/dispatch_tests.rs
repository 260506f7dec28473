// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rig_adapters::FakeDispatch;
use rig_core::{
    CommandTemplate, JobParameterValue, JobStatus, SequentialIdGen, TestCase, TestSet, TestStep,
};
use rig_storage::{InMemoryJobStore, InMemoryTestDefStore};

struct Fixture {
    engine: DispatchEngine<FakeDispatch, SequentialIdGen>,
    handle: EngineHandle,
    jobs: InMemoryJobStore,
    testdefs: InMemoryTestDefStore,
    pool: ClientPool,
    dispatch: FakeDispatch,
}

fn fixture() -> Fixture {
    let jobs = InMemoryJobStore::new();
    let testdefs = InMemoryTestDefStore::new();
    let pool = ClientPool::new();
    let dispatch = FakeDispatch::new();
    let handle = EngineHandle::new();
    let deps = EngineDeps {
        jobs: Arc::new(jobs.clone()),
        testdefs: Arc::new(testdefs.clone()),
        pool: pool.clone(),
        dispatch: dispatch.clone(),
        id_gen: SequentialIdGen::default(),
    };
    let engine = DispatchEngine::new(
        "p1".into(),
        handle.clone(),
        deps,
        Duration::from_millis(50),
    );
    Fixture {
        engine,
        handle,
        jobs,
        testdefs,
        pool,
        dispatch,
    }
}

impl Fixture {
    fn seed_test_set(&self, set_id: &str) {
        self.testdefs.add_test_set(TestSet::new(set_id, set_id));
        let case_id = format!("{set_id}-tc");
        self.testdefs.add_test_case(TestCase {
            id: case_id.clone().into(),
            test_set_id: set_id.into(),
            name: "case".into(),
        });
        self.testdefs.add_test_step(TestStep {
            id: format!("{case_id}-st").into(),
            test_case_id: case_id.into(),
            parameter: "step one".into(),
        });
    }

    fn seed_template(&self) {
        self.testdefs.add_command_template(CommandTemplate {
            id: "tpl-1".into(),
            project_id: "p1".into(),
            name: "run".into(),
            windows_value: "run.bat @TEST_SET_ID".into(),
            unix_value: "run.sh @TEST_SET_ID".into(),
            run_script: true,
        });
    }

    fn seed_client(&self, id: &str, status: ClientStatus) {
        self.pool.register(Client::new(id, format!("host-{id}"), "p1"));
        self.pool.update_status(&id.into(), status);
    }

    /// Save a queued job with one detail per test set id and enqueue it.
    fn submit_job(&self, job_id: &str, set_ids: &[&str], client_pool: &[&str]) -> Job {
        let mut job = Job::new(job_id, format!("job-{job_id}"), "p1");
        job.status = JobStatus::Queued;
        job.client_pool = client_pool.iter().map(|c| (*c).into()).collect();
        for set_id in set_ids {
            job.details.push(JobDetail::new(
                format!("{job_id}-{set_id}"),
                job_id,
                TestSet::new(*set_id, *set_id),
            ));
        }
        self.jobs.save(&job).unwrap();
        self.handle.enqueue(job.clone());
        job
    }
}

#[tokio::test]
async fn tick_with_empty_queue_is_a_noop() {
    let fx = fixture();
    fx.engine.tick().await;
    assert!(fx.dispatch.sent().is_empty());
}

#[tokio::test]
async fn dispatches_head_detail_to_a_free_client() {
    let fx = fixture();
    fx.seed_test_set("ts-1");
    fx.seed_template();
    fx.seed_client("c1", ClientStatus::Free);
    fx.submit_job("j1", &["ts-1"], &[]);

    fx.engine.tick().await;

    // Client bound and flipped busy.
    assert_eq!(fx.pool.status(&"c1".into()), Some(ClientStatus::Busy));
    let sent = fx.dispatch.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].client_id, "c1");
    assert_eq!(sent[0].job_id, "j1");
    assert_eq!(sent[0].commands.len(), 1);
    assert_eq!(sent[0].commands[0].unix_command, "run.sh ts-1");

    // Binding and built commands persisted; job marked started and running.
    let job = fx.jobs.get(&"j1".into()).unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Started);
    assert_eq!(job.details[0].client_id, Some("c1".into()));
    assert_eq!(job.details[0].commands.len(), 1);
    assert!(fx.handle.is_running(&"j1".into()));
    assert!(fx.handle.queued_entries().is_empty());
    assert!(fx.handle.queued_job_ids().is_empty());
}

#[tokio::test]
async fn holds_the_detail_while_no_client_is_free() {
    let fx = fixture();
    fx.seed_test_set("ts-1");
    fx.seed_template();
    fx.seed_client("c1", ClientStatus::Busy);
    fx.submit_job("j1", &["ts-1"], &[]);

    fx.engine.tick().await;
    fx.engine.tick().await;

    assert!(fx.dispatch.sent().is_empty());
    assert_eq!(fx.handle.queued_entries().len(), 1);
    let job = fx.jobs.get(&"j1".into()).unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Queued);

    // Once the client frees up the held detail goes out.
    fx.pool.update_status(&"c1".into(), ClientStatus::Free);
    fx.engine.tick().await;
    assert_eq!(fx.dispatch.sent().len(), 1);
}

#[tokio::test]
async fn empty_detail_is_removed_and_lone_detail_job_deleted() {
    let fx = fixture();
    fx.seed_template();
    fx.seed_client("c1", ClientStatus::Free);
    // Test set exists but has no cases.
    fx.testdefs.add_test_set(TestSet::new("ts-empty", "empty"));
    fx.submit_job("j1", &["ts-empty"], &[]);

    fx.engine.tick().await;

    assert!(fx.dispatch.sent().is_empty());
    assert_eq!(fx.jobs.get(&"j1".into()).unwrap(), None);
    assert!(fx.handle.queued_entries().is_empty());
    assert_eq!(fx.pool.status(&"c1".into()), Some(ClientStatus::Free));
}

#[tokio::test]
async fn empty_detail_is_dropped_but_job_with_others_survives() {
    let fx = fixture();
    fx.seed_template();
    fx.seed_client("c1", ClientStatus::Free);
    fx.testdefs.add_test_set(TestSet::new("ts-empty", "empty"));
    fx.seed_test_set("ts-1");
    fx.submit_job("j1", &["ts-empty", "ts-1"], &[]);

    fx.engine.tick().await;
    let job = fx.jobs.get(&"j1".into()).unwrap().unwrap();
    assert_eq!(job.details.len(), 1);
    assert_eq!(job.details[0].test_set.id, "ts-1");

    fx.engine.tick().await;
    assert_eq!(fx.dispatch.sent().len(), 1);
}

#[tokio::test]
async fn build_failure_frees_the_acquired_client() {
    let fx = fixture();
    fx.seed_test_set("ts-1");
    fx.seed_template();
    fx.seed_client("c1", ClientStatus::Free);
    let mut job = fx.submit_job("j1", &["ts-1"], &[]);
    // Environment references a parameter that does not exist.
    job.environment.parameter_values.push(JobParameterValue {
        parameter_id: "ghost".into(),
        value: "x".into(),
    });
    fx.jobs.save(&job).unwrap();
    fx.handle.dequeue_job(&job.id);
    fx.handle.enqueue(job);

    fx.engine.tick().await;

    assert!(fx.dispatch.sent().is_empty());
    assert_eq!(fx.pool.status(&"c1".into()), Some(ClientStatus::Free));
    // The entry was consumed; the loop moves on.
    assert!(fx.handle.queued_entries().is_empty());
}

#[tokio::test]
async fn send_failure_keeps_the_persisted_binding() {
    let fx = fixture();
    fx.seed_test_set("ts-1");
    fx.seed_template();
    fx.seed_client("c1", ClientStatus::Free);
    fx.dispatch.fail_for("host-c1");
    fx.submit_job("j1", &["ts-1"], &[]);

    fx.engine.tick().await;

    assert!(fx.dispatch.sent().is_empty());
    let job = fx.jobs.get(&"j1".into()).unwrap().unwrap();
    assert_eq!(job.details[0].client_id, Some("c1".into()));
    assert_eq!(fx.pool.status(&"c1".into()), Some(ClientStatus::Busy));
}

#[tokio::test]
async fn rotates_starved_pooled_job_to_the_tail() {
    let fx = fixture();
    fx.seed_test_set("ts-1");
    fx.seed_test_set("ts-2");
    fx.seed_template();
    fx.seed_client("c1", ClientStatus::Busy);
    fx.seed_client("c2", ClientStatus::Free);
    fx.submit_job("j1", &["ts-1"], &["c1"]);
    fx.submit_job("j2", &["ts-2"], &["c2"]);

    // First tick: j1's pool is all busy while j2 could run, so j1 rotates.
    fx.engine.tick().await;
    let entries = fx.handle.queued_entries();
    assert_eq!(entries[0].job_id, "j2");
    assert_eq!(entries[1].job_id, "j1");
    assert!(fx.dispatch.sent().is_empty());

    // Second tick serves j2.
    fx.engine.tick().await;
    let sent = fx.dispatch.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].job_id, "j2");
}

#[tokio::test]
async fn rotation_preserves_relative_order_of_rotated_details() {
    let fx = fixture();
    for set in ["ts-1", "ts-2", "ts-3"] {
        fx.seed_test_set(set);
    }
    fx.seed_template();
    fx.seed_client("c1", ClientStatus::Busy);
    fx.seed_client("c2", ClientStatus::Free);
    fx.submit_job("j1", &["ts-1", "ts-2"], &["c1"]);
    fx.submit_job("j2", &["ts-3"], &["c2"]);

    fx.engine.tick().await;

    let entries = fx.handle.queued_entries();
    let ids: Vec<&str> = entries.iter().map(|e| e.detail_id.as_str()).collect();
    assert_eq!(ids, ["j2-ts-3", "j1-ts-1", "j1-ts-2"]);
}

#[tokio::test]
async fn no_rotation_when_the_other_job_is_also_starved() {
    let fx = fixture();
    fx.seed_test_set("ts-1");
    fx.seed_test_set("ts-2");
    fx.seed_template();
    fx.seed_client("c1", ClientStatus::Busy);
    fx.seed_client("c2", ClientStatus::Busy);
    fx.submit_job("j1", &["ts-1"], &["c1"]);
    fx.submit_job("j2", &["ts-2"], &["c2"]);

    fx.engine.tick().await;

    let entries = fx.handle.queued_entries();
    assert_eq!(entries[0].job_id, "j1");
}

#[tokio::test]
async fn dequeue_while_held_drops_the_held_detail() {
    let fx = fixture();
    fx.seed_test_set("ts-1");
    fx.seed_template();
    fx.seed_client("c1", ClientStatus::Busy);
    fx.submit_job("j1", &["ts-1"], &[]);

    // Loop holds j1's detail (no client free).
    fx.engine.tick().await;
    fx.handle.dequeue_job(&"j1".into());
    fx.pool.update_status(&"c1".into(), ClientStatus::Free);

    fx.engine.tick().await;
    fx.engine.tick().await;

    assert!(fx.dispatch.sent().is_empty());
    assert!(fx.handle.queued_entries().is_empty());
}

#[tokio::test]
async fn enqueue_skips_details_that_already_ran() {
    let fx = fixture();
    fx.seed_test_set("ts-1");
    fx.seed_test_set("ts-2");
    let mut job = Job::new("j1", "job", "p1");
    job.details.push(JobDetail::new(
        "d1",
        "j1",
        TestSet::new("ts-1", "ts-1"),
    ));
    job.details.push(JobDetail::new(
        "d2",
        "j1",
        TestSet::new("ts-2", "ts-2"),
    ));
    job.details[0].status = CommandStatus::Completed;

    fx.handle.enqueue(job);

    let entries = fx.handle.queued_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].detail_id, "d2");
}
