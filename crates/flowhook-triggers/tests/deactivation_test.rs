//! Integration tests for TriggerDeactivator.

mod common;

use std::time::Duration;

use common::{
    Event, Harness, app_webhook, cron, ok_response, piece_version, polling, webhook,
};
use flowhook_triggers::{DisableError, DisableRequest, DispatchError};
use flowhook_types::{FlowTrigger, FlowVersion, HookStatus, RenewConfiguration};

fn timeout() -> DispatchError {
    DispatchError::Timeout(Duration::from_secs(30))
}

// ─────────────────────────────────────────────────────────────────────────────
// Short circuits
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_non_piece_trigger_is_noop() {
    let h = Harness::new(Some(polling()), Ok(ok_response()));
    let version = FlowVersion::new("fv-empty", "flow-1", FlowTrigger::Empty);

    let result = h
        .deactivator
        .disable(DisableRequest::new(version, "p1"))
        .await
        .unwrap();

    assert!(result.is_none());
    assert!(h.log.events().is_empty(), "no collaborator may be called");
}

#[tokio::test]
async fn test_unresolved_trigger_is_noop() {
    let h = Harness::new(None, Ok(ok_response()));

    let result = h
        .deactivator
        .disable(DisableRequest::new(piece_version("fv-1"), "p1"))
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(h.log.events(), vec![Event::Resolve("on_event".into(), "p1".into())]);
}

#[tokio::test]
async fn test_resolver_and_hook_see_request_project() {
    let h = Harness::new(Some(app_webhook()), Ok(ok_response()));

    h.deactivator
        .disable(DisableRequest::new(piece_version("fv-1"), "tenant-7"))
        .await
        .unwrap();

    assert_eq!(
        h.log.events()[0],
        Event::Resolve("on_event".into(), "tenant-7".into())
    );
    assert_eq!(h.dispatcher.jobs.lock()[0].project_id.as_str(), "tenant-7");
    assert!(h.log.events().contains(&Event::DeleteListeners(
        "tenant-7".into(),
        "flow-of-fv-1".into()
    )));
}

// ─────────────────────────────────────────────────────────────────────────────
// Cleanup always runs
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_polling_success_scenario() {
    let h = Harness::new(Some(polling()), Ok(ok_response()));
    h.jobs.live.lock().push("fv-1".into());

    let result = h
        .deactivator
        .disable(DisableRequest::new(piece_version("fv-1"), "p1"))
        .await
        .unwrap();

    assert_eq!(result, Some(ok_response()));
    assert_eq!(
        h.log.events(),
        vec![
            Event::Resolve("on_event".into(), "p1".into()),
            Event::Dispatch("fv-1".into()),
            Event::RemoveRepeating("fv-1".into()),
        ]
    );
    assert!(h.jobs.live.lock().is_empty());
}

#[tokio::test]
async fn test_polling_cleanup_runs_when_dispatch_fails() {
    let h = Harness::new(Some(polling()), Err(timeout()));

    let err = h
        .deactivator
        .disable(DisableRequest::new(piece_version("fv-1"), "p1"))
        .await
        .unwrap_err();

    assert!(matches!(err, DisableError::HookExecution(DispatchError::Timeout(_))));
    assert_eq!(h.log.count(Harness::is_remove), 1);
}

#[tokio::test]
async fn test_polling_cleanup_runs_when_failure_suppressed() {
    let h = Harness::new(Some(polling()), Err(DispatchError::ChannelClosed));

    let result = h
        .deactivator
        .disable(DisableRequest::new(piece_version("fv-1"), "p1").ignore_error(true))
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(h.log.count(Harness::is_remove), 1);
    assert_eq!(h.log.count(Harness::is_record), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Strategy exclusivity and renew gating
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_app_webhook_only_deletes_listeners() {
    let h = Harness::new(Some(app_webhook()), Ok(ok_response()));
    let version = piece_version("fv-1");
    h.listeners
        .live
        .lock()
        .push(("p1".into(), version.flow_id.clone()));

    h.deactivator
        .disable(DisableRequest::new(version.clone(), "p1"))
        .await
        .unwrap();

    assert_eq!(h.log.count(Harness::is_remove), 0);
    assert_eq!(h.log.count(Harness::is_delete), 1);
    assert!(h.log.events().contains(&Event::DeleteListeners(
        "p1".into(),
        version.flow_id.clone()
    )));
    assert!(h.listeners.live.lock().is_empty());
}

#[tokio::test]
async fn test_polling_never_touches_listeners() {
    let h = Harness::new(Some(polling()), Ok(ok_response()));

    h.deactivator
        .disable(DisableRequest::new(piece_version("fv-1"), "p1"))
        .await
        .unwrap();

    assert_eq!(h.log.count(Harness::is_delete), 0);
}

#[tokio::test]
async fn test_webhook_without_renewal_cleans_nothing() {
    let h = Harness::new(Some(webhook(None)), Ok(ok_response()));

    h.deactivator
        .disable(DisableRequest::new(piece_version("fv-1"), "p1"))
        .await
        .unwrap();

    assert_eq!(h.log.count(Harness::is_remove), 0);
    assert_eq!(h.log.count(Harness::is_delete), 0);
    assert_eq!(h.log.count(Harness::is_dispatch), 1);
}

#[tokio::test]
async fn test_webhook_with_cron_renewal_removes_job() {
    let h = Harness::new(Some(webhook(Some(cron()))), Ok(ok_response()));

    h.deactivator
        .disable(DisableRequest::new(piece_version("fv-1"), "p1"))
        .await
        .unwrap();

    assert_eq!(h.log.count(Harness::is_remove), 1);
    assert!(h.log.events().contains(&Event::RemoveRepeating("fv-1".into())));
}

#[tokio::test]
async fn test_webhook_with_other_renewal_cleans_nothing() {
    let h = Harness::new(
        Some(webhook(Some(RenewConfiguration::None))),
        Ok(ok_response()),
    );

    h.deactivator
        .disable(DisableRequest::new(piece_version("fv-1"), "p1"))
        .await
        .unwrap();

    assert_eq!(h.log.count(Harness::is_remove), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Error policy
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_unignored_failure_recorded_before_cleanup_and_reraised() {
    let failure = DispatchError::HookFailed {
        status: HookStatus::Error,
        message: "token revoked".into(),
    };
    let h = Harness::new(Some(polling()), Err(failure.clone()));

    let err = h
        .deactivator
        .disable(DisableRequest::new(piece_version("fv-1"), "p1"))
        .await
        .unwrap_err();

    assert_eq!(err.hook_error(), Some(&failure));
    let recorded = h.log.position(Harness::is_record).unwrap();
    let removed = h.log.position(Harness::is_remove).unwrap();
    assert!(recorded < removed, "failure must be recorded before cleanup");
    assert_eq!(h.log.count(Harness::is_record), 1);
}

#[tokio::test]
async fn test_webhook_cron_timeout_ignored_scenario() {
    let h = Harness::new(Some(webhook(Some(cron()))), Err(timeout()));
    h.jobs.live.lock().push("fv-2".into());

    let result = h
        .deactivator
        .disable(DisableRequest::new(piece_version("fv-2"), "p1").ignore_error(true))
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(h.log.count(Harness::is_record), 0);
    assert_eq!(h.log.count(Harness::is_remove), 1);
    assert!(h.jobs.live.lock().is_empty());
}

#[tokio::test]
async fn test_cleanup_failure_propagates_after_hook_success() {
    let h = Harness::new(Some(polling()), Ok(ok_response()));
    *h.jobs.fail_with.lock() = Some("redis unreachable".into());

    let err = h
        .deactivator
        .disable(DisableRequest::new(piece_version("fv-1"), "p1"))
        .await
        .unwrap_err();

    assert!(err.is_cleanup_failure());
    assert!(err.hook_error().is_none());
}

#[tokio::test]
async fn test_cleanup_failure_not_suppressed_by_ignore_error() {
    let h = Harness::new(Some(app_webhook()), Err(timeout()));
    *h.listeners.fail_with.lock() = Some("db down".into());

    let err = h
        .deactivator
        .disable(DisableRequest::new(piece_version("fv-1"), "p1").ignore_error(true))
        .await
        .unwrap_err();

    assert!(err.is_cleanup_failure());
    assert!(err.hook_error().is_none(), "ignored hook errors are not carried");
}

#[tokio::test]
async fn test_cleanup_failure_carries_unignored_hook_error() {
    let h = Harness::new(Some(polling()), Err(timeout()));
    *h.jobs.fail_with.lock() = Some("redis unreachable".into());

    let err = h
        .deactivator
        .disable(DisableRequest::new(piece_version("fv-1"), "p1"))
        .await
        .unwrap_err();

    assert!(err.is_cleanup_failure());
    assert_eq!(err.hook_error(), Some(&timeout()));
    assert_eq!(h.log.count(Harness::is_record), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Idempotence and concurrency
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_second_disable_succeeds_after_job_is_gone() {
    let h = Harness::new(Some(polling()), Ok(ok_response()));
    h.jobs.live.lock().push("fv-1".into());

    for _ in 0..2 {
        h.deactivator
            .disable(DisableRequest::new(piece_version("fv-1"), "p1"))
            .await
            .unwrap();
    }

    assert_eq!(h.log.count(Harness::is_remove), 2);
    assert_eq!(h.log.count(Harness::is_dispatch), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_disables_for_different_versions() {
    let h = Harness::new(Some(polling()), Ok(ok_response()));
    let ids: Vec<String> = (0..16).map(|i| format!("fv-{i}")).collect();
    h.jobs
        .live
        .lock()
        .extend(ids.iter().map(|id| id.as_str().into()));

    let mut handles = Vec::new();
    for id in &ids {
        let deactivator = h.deactivator.clone();
        let version = piece_version(id);
        handles.push(tokio::spawn(async move {
            deactivator
                .disable(DisableRequest::new(version, "p1"))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert!(h.jobs.live.lock().is_empty());
    assert_eq!(h.log.count(Harness::is_remove), ids.len());
    assert_eq!(h.dispatcher.jobs.lock().len(), ids.len());
}
