// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `spalloc alloc`

use crate::prelude::*;

const OWNER: &str = "[spalloc]\nowner = \"me@example.com\"\n";

fn machine_info() -> serde_json::Value {
    json!({
        "width": 8, "height": 8,
        "connections": [[[0, 0], "10.0.0.1"]],
        "machine_name": "spin-5",
        "boards": [[0, 0, 0]],
    })
}

#[tokio::test]
async fn waits_for_boards_then_destroys_on_enter() {
    let mut server = MockServer::bind().await;
    let port = server.port();
    let script = tokio::spawn(async move {
        server.handshake(SERVER_VERSION).await;
        let create = server.respond("create_job", json!(9)).await;
        assert_eq!(create.kwargs["owner"], json!("me@example.com"));
        assert_eq!(create.kwargs["tags"], json!(["default"]));

        server.respond("get_job_state", json!({"state": 1, "keepalive": 60.0})).await;
        server.respond("notify_job", json!(null)).await;
        server.respond("get_job_state", json!({"state": 1, "keepalive": 60.0})).await;
        server.respond("job_keepalive", json!(null)).await;
        server.send(json!({"jobs_changed": [9]})).await;
        server.respond("get_job_state", json!({"state": 3, "power": true})).await;

        server.respond("get_job_machine_info", machine_info()).await;
        let destroy = server.respond("destroy_job", json!(null)).await;
        assert_eq!(destroy.args, vec![json!(9), json!(null)]);
        server
    });

    cli()
        .args(&["alloc"])
        .server(port)
        .config(OWNER)
        .stdin("\n")
        .run()
        .await
        .passes()
        .stdout_has("Hostname: 10.0.0.1")
        .stdout_has("Running on: spin-5")
        .stderr_has("Job 9: Waiting in queue...")
        .stderr_has("Job 9: Ready!");
    script.await.unwrap();
}

#[tokio::test]
async fn runs_command_with_board_details() {
    let mut server = MockServer::bind().await;
    let port = server.port();
    let script = tokio::spawn(async move {
        server.handshake(SERVER_VERSION).await;
        server.respond("create_job", json!(9)).await;
        server.respond("get_job_state", json!({"state": 3, "power": true})).await;
        server.respond("get_job_machine_info", machine_info()).await;
        server.respond("destroy_job", json!(null)).await;
        server
    });

    cli()
        .args(&["alloc", "--quiet"])
        .server(port)
        .config(OWNER)
        .args(&["--command", "echo", "boot", "{hostname}", "{w}x{h}"])
        .run()
        .await
        .passes()
        .stdout_has("boot 10.0.0.1 8x8");
    script.await.unwrap();
}

#[tokio::test]
async fn command_exit_code_is_passed_through() {
    let mut server = MockServer::bind().await;
    let port = server.port();
    let script = tokio::spawn(async move {
        server.handshake(SERVER_VERSION).await;
        server.respond("create_job", json!(9)).await;
        server.respond("get_job_state", json!({"state": 3})).await;
        server.respond("get_job_machine_info", machine_info()).await;
        server.respond("destroy_job", json!(null)).await;
        server
    });

    cli()
        .args(&["alloc", "-q"])
        .server(port)
        .config(OWNER)
        .args(&["-c", "exit 3"])
        .run()
        .await
        .exits(3);
    script.await.unwrap();
}

#[tokio::test]
async fn destroyed_job_exits_one() {
    let mut server = MockServer::bind().await;
    let port = server.port();
    let script = tokio::spawn(async move {
        server.handshake(SERVER_VERSION).await;
        server.respond("create_job", json!(9)).await;
        server.respond("get_job_state", json!({"state": 4, "reason": "no boards"})).await;
        server.respond("destroy_job", json!(null)).await;
        server
    });

    cli()
        .args(&["alloc"])
        .server(port)
        .config(OWNER)
        .run()
        .await
        .exits(1)
        .stderr_has("Job 9: Destroyed: no boards");
    script.await.unwrap();
}

#[tokio::test]
async fn unreachable_server_exits_six() {
    // Reserve a port, then free it so nothing is listening.
    let port = MockServer::bind().await.port();

    cli()
        .args(&["alloc", "--reconnect-delay", "0.1"])
        .args(&["--hostname", "127.0.0.1", "--port", &port.to_string(), "--timeout", "0.5"])
        .config(OWNER)
        .run()
        .await
        .exits(6)
        .stderr_has("Could not connect to server");
}

#[test]
fn missing_owner_is_a_usage_error() {
    cli().args(&["alloc", "--hostname", "localhost"]).run_offline().exits(2);
}
