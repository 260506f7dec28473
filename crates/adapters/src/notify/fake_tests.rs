// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rig_core::NotificationKind;

fn target() -> NotificationTarget {
    NotificationTarget {
        kind: NotificationKind::Email,
        recipient: "qa@example.com".to_string(),
    }
}

#[tokio::test]
async fn fake_notifier_records_calls() {
    let notifier = FakeNotifier::new();

    notifier
        .notify(&target(), "nightly", "job completed")
        .await
        .unwrap();

    let calls = notifier.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].subject, "nightly");
    assert_eq!(calls[0].message, "job completed");
    assert_eq!(calls[0].target.recipient, "qa@example.com");
}

#[tokio::test]
async fn fake_notifier_can_be_forced_to_fail() {
    let notifier = FakeNotifier::new();
    notifier.fail();

    let err = notifier
        .notify(&target(), "nightly", "job completed")
        .await
        .unwrap_err();
    assert!(matches!(err, NotifyError::SendFailed(_)));
    assert!(notifier.calls().is_empty());
}
