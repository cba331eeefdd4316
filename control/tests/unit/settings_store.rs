//! Settings mutation, persistence and REST service coordination.

#![allow(clippy::expect_used)]

use hostctl::domain::{BridgeError, LifecycleError, Phase, SettingChange};
use hostctl_common::HostCommand;
use serde_json::json;

use crate::helpers::{context, loaded_context, settings_json, started_service_context};

/// Commands that touch the REST service or persist settings.
fn service_traffic(commands: &[HostCommand]) -> Vec<HostCommand> {
    commands
        .iter()
        .copied()
        .filter(|c| {
            matches!(
                c,
                HostCommand::UpdateSettings
                    | HostCommand::IsPortAvailable
                    | HostCommand::StartRestApi
                    | HostCommand::StopRestApi
            )
        })
        .collect()
}

// ── Load and persist ──────────────────────────────────────────────────────────

#[tokio::test]
async fn load_replaces_the_snapshot() {
    let ctx = context(settings_json(9090, true));
    assert!(!ctx.settings.is_loaded());

    let settings = ctx.settings.load().await.expect("load");

    assert_eq!(settings.service.port, 9090);
    assert_eq!(ctx.settings.service_port(), Some(9090));
    assert_eq!(ctx.settings.service_enabled(), Some(true));
    assert_eq!(
        ctx.settings.archive_path().as_deref(),
        Some("/opt/factorio/factorio.tar.xz")
    );
}

#[tokio::test]
async fn failed_load_keeps_the_previous_snapshot() {
    let ctx = loaded_context(settings_json(8080, false)).await;
    ctx.client.bridge().reject(HostCommand::LoadSettings, "disk error");

    assert!(ctx.settings.load().await.is_err());
    assert_eq!(ctx.settings.service_port(), Some(8080));
}

#[tokio::test]
async fn persist_is_idempotent() {
    let ctx = loaded_context(settings_json(8080, false)).await;

    ctx.settings.persist().await.expect("first persist");
    ctx.settings.persist().await.expect("second persist");

    let sent = ctx.client.bridge().args(HostCommand::UpdateSettings);
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], sent[1]);
    assert_eq!(sent[0]["settings"]["restapi"]["port"], json!(8080));
}

#[tokio::test]
async fn persist_before_load_sends_nothing() {
    let ctx = context(settings_json(8080, false));

    ctx.settings.persist().await.expect("persist");

    assert_eq!(ctx.client.bridge().total_calls(), 0);
}

#[tokio::test]
async fn persistence_failure_keeps_the_optimistic_write() {
    let ctx = loaded_context(settings_json(8080, false)).await;
    ctx.client
        .bridge()
        .reject(HostCommand::UpdateSettings, "read-only settings");

    let err = ctx
        .settings
        .mutate(SettingChange::ClientCount(4))
        .await
        .expect_err("persist fails");

    assert_eq!(err.to_string(), "read-only settings");
    assert_eq!(ctx.settings.client_count(), Some(4));
}

// ── Mutate ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn mutate_writes_one_field_and_persists_the_whole_snapshot() {
    let ctx = loaded_context(settings_json(8080, false)).await;

    ctx.settings
        .mutate(SettingChange::Seed("1234".into()))
        .await
        .expect("mutate");

    assert_eq!(ctx.settings.seed().as_deref(), Some("1234"));
    let sent = ctx.client.bridge().args(HostCommand::UpdateSettings);
    assert_eq!(sent.len(), 1);
    let sent = &sent[0]["settings"];
    assert_eq!(sent["factorio"]["seed"], json!("1234"));
    assert_eq!(sent["factorio"]["workspace_path"], json!("/srv/workspace"));
    assert_eq!(sent["gui"]["enable_restapi"], json!(false));
}

#[tokio::test]
async fn mutate_before_load_is_ignored() {
    let ctx = context(settings_json(8080, false));

    ctx.settings
        .mutate(SettingChange::RecreateWorkspace(true))
        .await
        .expect("mutate");

    assert!(!ctx.settings.is_loaded());
    assert_eq!(ctx.client.bridge().total_calls(), 0);
}

#[tokio::test]
async fn non_service_changes_leave_the_service_alone() {
    let ctx = started_service_context(8080).await;

    ctx.settings
        .mutate(SettingChange::AutostartEnabled(true))
        .await
        .expect("mutate");

    assert_eq!(ctx.client.bridge().commands(), vec![HostCommand::UpdateSettings]);
    assert_eq!(ctx.service.phase(), Phase::Started);
    assert_eq!(ctx.settings.autostart_enabled(), Some(true));
}

// ── Service flag ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn enabling_the_service_persists_then_starts_it() {
    let ctx = loaded_context(json!({
        "restapi": { "port": 8080 },
        "gui": { "enable_restapi": false }
    }))
    .await;

    ctx.settings
        .mutate(SettingChange::ServiceEnabled(true))
        .await
        .expect("enable");

    let bridge = ctx.client.bridge();
    assert_eq!(
        bridge.commands(),
        vec![
            HostCommand::UpdateSettings,
            HostCommand::IsPortAvailable,
            HostCommand::StartRestApi,
        ]
    );
    assert_eq!(
        bridge.args(HostCommand::UpdateSettings)[0]["settings"]["gui"]["enable_restapi"],
        json!(true)
    );
    assert_eq!(bridge.args(HostCommand::IsPortAvailable), vec![json!({ "port": 8080 })]);
    assert_eq!(ctx.service.phase(), Phase::Started);
}

#[tokio::test]
async fn disabling_the_service_stops_it_before_persisting() {
    let ctx = started_service_context(8080).await;

    ctx.settings
        .set_service_enabled(false)
        .await
        .expect("disable");

    assert_eq!(
        ctx.client.bridge().commands(),
        vec![HostCommand::StopRestApi, HostCommand::UpdateSettings]
    );
    assert_eq!(ctx.service.phase(), Phase::Idle);
    assert_eq!(ctx.settings.service_enabled(), Some(false));
}

#[tokio::test]
async fn failed_stop_aborts_the_toggle() {
    let ctx = started_service_context(8080).await;
    ctx.client.bridge().reject(HostCommand::StopRestApi, "port in use");

    let err = ctx
        .settings
        .set_service_enabled(false)
        .await
        .expect_err("stop rejected");

    assert_eq!(err.to_string(), "port in use");
    assert_eq!(ctx.settings.service_enabled(), Some(true));
    assert_eq!(ctx.client.bridge().count(HostCommand::UpdateSettings), 0);
    assert_eq!(ctx.service.phase(), Phase::Failed);
}

#[tokio::test]
async fn enabling_a_running_service_only_persists() {
    let ctx = loaded_context(settings_json(8080, false)).await;
    ctx.service.start().await.expect("start");
    ctx.client.bridge().clear();

    ctx.settings.set_service_enabled(true).await.expect("enable");

    assert_eq!(ctx.client.bridge().commands(), vec![HostCommand::UpdateSettings]);
    assert_eq!(ctx.service.phase(), Phase::Started);
}

#[tokio::test]
async fn start_failure_after_enable_keeps_the_flag() {
    let ctx = loaded_context(settings_json(8080, false)).await;
    ctx.client.bridge().reject(HostCommand::StartRestApi, "bind failed");

    let err = ctx
        .settings
        .set_service_enabled(true)
        .await
        .expect_err("start rejected");

    assert_eq!(err.to_string(), "bind failed");
    assert_eq!(ctx.settings.service_enabled(), Some(true));
    assert_eq!(ctx.service.phase(), Phase::Failed);
}

#[tokio::test]
async fn toggle_while_starting_is_refused() {
    let ctx = loaded_context(settings_json(8080, true)).await;
    ctx.client.bridge().slow(HostCommand::StartRestApi, 4);

    let (start, toggle) = tokio::join!(ctx.service.start(), async {
        // Let the port check finish so the machine is in `Starting`.
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        ctx.settings.set_service_enabled(false).await
    });

    start.expect("start");
    let err = toggle.expect_err("toggle while starting");
    assert!(matches!(
        err.downcast_ref::<LifecycleError>(),
        Some(LifecycleError::Busy { .. })
    ));
    assert_eq!(ctx.settings.service_enabled(), Some(true));
}

// ── Service port ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn port_change_while_starting_is_refused_and_not_persisted() {
    let ctx = loaded_context(settings_json(8080, true)).await;
    ctx.client.bridge().slow(HostCommand::StartRestApi, 4);

    let (start, change) = tokio::join!(ctx.service.start(), async {
        tokio::task::yield_now().await;
        tokio::task::yield_now().await;
        ctx.settings.mutate(SettingChange::ServicePort(9000)).await
    });

    start.expect("start");
    let err = change.expect_err("port change while starting");
    assert!(matches!(
        err.downcast_ref::<LifecycleError>(),
        Some(LifecycleError::Busy {
            phase: Phase::Starting,
            ..
        })
    ));
    assert_eq!(ctx.settings.service_port(), Some(8080));
    let bridge = ctx.client.bridge();
    assert_eq!(bridge.count(HostCommand::UpdateSettings), 0);
    assert_eq!(bridge.count(HostCommand::StopRestApi), 0);
    assert_eq!(bridge.args(HostCommand::StartRestApi).len(), 1);
}

#[tokio::test]
async fn port_change_restarts_a_running_service_in_order() {
    let ctx = started_service_context(8080).await;

    ctx.settings
        .mutate(SettingChange::ServicePort(9000))
        .await
        .expect("port change");

    let bridge = ctx.client.bridge();
    assert_eq!(
        service_traffic(&bridge.commands()),
        vec![
            HostCommand::StopRestApi,
            HostCommand::UpdateSettings,
            HostCommand::IsPortAvailable,
            HostCommand::StartRestApi,
        ]
    );
    assert_eq!(bridge.max_in_flight(), 1);
    assert_eq!(bridge.args(HostCommand::IsPortAvailable), vec![json!({ "port": 9000 })]);
    assert_eq!(
        bridge.args(HostCommand::UpdateSettings)[0]["settings"]["restapi"]["port"],
        json!(9000)
    );
    assert_eq!(ctx.service.phase(), Phase::Started);
}

#[tokio::test]
async fn unchanged_port_only_persists() {
    let ctx = started_service_context(8080).await;

    ctx.settings.set_service_port(8080).await.expect("same port");

    assert_eq!(ctx.client.bridge().commands(), vec![HostCommand::UpdateSettings]);
    assert_eq!(ctx.service.phase(), Phase::Started);
}

#[tokio::test]
async fn port_change_starts_an_enabled_idle_service() {
    let ctx = loaded_context(settings_json(8080, true)).await;

    ctx.settings.set_service_port(9000).await.expect("port change");

    assert_eq!(
        ctx.client.bridge().commands(),
        vec![
            HostCommand::UpdateSettings,
            HostCommand::IsPortAvailable,
            HostCommand::StartRestApi,
        ]
    );
    assert!(ctx.service.is_started());
}

#[tokio::test]
async fn port_change_leaves_a_disabled_service_down() {
    let ctx = loaded_context(settings_json(8080, false)).await;

    ctx.settings.set_service_port(9000).await.expect("port change");

    assert_eq!(ctx.client.bridge().commands(), vec![HostCommand::UpdateSettings]);
    assert_eq!(ctx.service.phase(), Phase::Idle);
    assert_eq!(ctx.settings.service_port(), Some(9000));
}

#[tokio::test]
async fn port_change_to_a_taken_port_leaves_the_service_idle() {
    let ctx = started_service_context(8080).await;
    ctx.client
        .bridge()
        .reply(HostCommand::IsPortAvailable, Ok(json!(false)));

    ctx.settings.set_service_port(9000).await.expect("port change");

    assert_eq!(ctx.service.phase(), Phase::Idle);
    assert!(!ctx.service.port_available());
    assert_eq!(ctx.client.bridge().count(HostCommand::StartRestApi), 0);
}

// ── Pass-throughs ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn maximize_window_adopts_the_returned_settings() {
    let ctx = loaded_context(settings_json(8080, false)).await;
    ctx.client
        .bridge()
        .reply(HostCommand::MaximizeWindow, Ok(settings_json(7000, true)));

    ctx.settings.maximize_window().await.expect("maximize");

    assert_eq!(ctx.settings.service_port(), Some(7000));
    assert_eq!(ctx.settings.service_enabled(), Some(true));
}

#[tokio::test]
async fn file_exists_and_open_in_browser_forward_their_argument() {
    let ctx = loaded_context(settings_json(8080, false)).await;
    let bridge = ctx.client.bridge();
    bridge.reply(HostCommand::FileExists, Ok(json!(true)));

    assert!(ctx.settings.file_exists("/opt/factorio").await.expect("exists"));
    ctx.settings
        .open_in_browser("http://localhost:8080")
        .await
        .expect("open");

    assert_eq!(bridge.args(HostCommand::FileExists), vec![json!({ "path": "/opt/factorio" })]);
    assert_eq!(
        bridge.args(HostCommand::OpenInBrowser),
        vec![json!({ "url": "http://localhost:8080" })]
    );
}

#[tokio::test]
async fn malformed_settings_reply_is_a_decode_error() {
    let ctx = context(json!({ "restapi": { "port": "eighty" } }));

    let err = ctx.settings.load().await.expect_err("decode");

    assert!(matches!(
        err.downcast_ref::<BridgeError>(),
        Some(BridgeError::Decode { .. })
    ));
    assert!(!ctx.settings.is_loaded());
}
