// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::dispatch::EngineHandle;
use crate::manager::Supervisor;
use crate::scheduler::Scheduler;
use rig_core::{Client, CommandStatus, FakeClock};
use rig_storage::{InMemoryClientStore, InMemoryJobStore, InMemoryTestRunStore};
use std::collections::HashMap;
use std::time::Duration;

fn fixture() -> (Gateway<FakeClock>, InMemoryClientStore, ClientPool) {
    let clients = InMemoryClientStore::new();
    let jobs = InMemoryJobStore::new();
    let pool = ClientPool::new();
    let mut engines = HashMap::new();
    engines.insert("p1".into(), EngineHandle::new());
    let supervisor = Supervisor::with_engines(engines, Arc::new(jobs.clone()));
    let scheduler = Scheduler::new(
        supervisor.clone(),
        Arc::new(jobs.clone()),
        FakeClock::at(1_000),
        Duration::from_millis(50),
    );
    let completion = CompletionHandler::new(
        Arc::new(jobs),
        Arc::new(InMemoryTestRunStore::new()),
        pool.clone(),
        FakeClock::at(1_000),
        scheduler,
        supervisor,
        Vec::new(),
    );
    let gateway = Gateway::new(Arc::new(clients.clone()), pool.clone(), completion);
    (gateway, clients, pool)
}

#[tokio::test]
async fn announcement_registers_a_known_client() {
    let (gateway, clients, pool) = fixture();
    clients.save(&Client::new("c1", "worker-7", "p1")).unwrap();

    gateway
        .on_client_announcement(&ClientAnnouncement {
            client_name: "worker-7".into(),
            status: ClientStatus::Free,
        })
        .unwrap();

    assert_eq!(pool.status(&"c1".into()), Some(ClientStatus::Free));
}

#[tokio::test]
async fn reannouncement_overrides_the_tracked_status() {
    let (gateway, clients, pool) = fixture();
    clients.save(&Client::new("c1", "worker-7", "p1")).unwrap();
    gateway
        .on_client_announcement(&ClientAnnouncement {
            client_name: "worker-7".into(),
            status: ClientStatus::Free,
        })
        .unwrap();

    gateway
        .on_client_announcement(&ClientAnnouncement {
            client_name: "worker-7".into(),
            status: ClientStatus::Busy,
        })
        .unwrap();

    assert_eq!(pool.status(&"c1".into()), Some(ClientStatus::Busy));
}

#[tokio::test]
async fn announcement_from_an_unknown_name_fails() {
    let (gateway, _clients, pool) = fixture();
    let err = gateway
        .on_client_announcement(&ClientAnnouncement {
            client_name: "stranger".into(),
            status: ClientStatus::Free,
        })
        .unwrap_err();
    assert!(matches!(err, EngineError::UnknownClient(name) if name == "stranger"));
    assert_eq!(pool.status(&"c1".into()), None);
}

#[tokio::test]
async fn disconnect_marks_the_client_dead() {
    let (gateway, clients, pool) = fixture();
    clients.save(&Client::new("c1", "worker-7", "p1")).unwrap();
    gateway
        .on_client_announcement(&ClientAnnouncement {
            client_name: "worker-7".into(),
            status: ClientStatus::Free,
        })
        .unwrap();

    gateway.on_client_disconnected(&"c1".into());

    assert_eq!(pool.status(&"c1".into()), Some(ClientStatus::Dead));
}

#[tokio::test]
async fn command_report_for_an_unknown_command_fails() {
    let (gateway, _clients, _pool) = fixture();
    let err = gateway
        .on_command_report(&CommandReport {
            command_id: "ghost".into(),
            status: CommandStatus::Completed,
            result: None,
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::UnknownCommand(_)));
}
