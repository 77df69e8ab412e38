// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `spalloc ps`

use crate::prelude::*;

fn jobs() -> serde_json::Value {
    json!([
        {"job_id": 4, "owner": "alice", "start_time": 1.5e9, "keepalive": 60.0, "state": 3,
         "power": true, "allocated_machine_name": "spin-5", "boards": [[0, 0, 0]],
         "keepalivehost": "10.2.0.1"},
        {"job_id": 5, "owner": "bob", "start_time": 1.5e9, "keepalive": 60.0, "state": 1,
         "power": null, "allocated_machine_name": null, "boards": null},
    ])
}

#[tokio::test]
async fn lists_live_jobs() {
    let mut server = MockServer::bind().await;
    let port = server.port();
    let script = tokio::spawn(async move {
        server.handshake(SERVER_VERSION).await;
        server.respond("list_jobs", jobs()).await;
        server
    });

    cli()
        .args(&["ps"])
        .server(port)
        .run()
        .await
        .passes()
        .stdout_has("Owner (Host)")
        .stdout_has("alice (10.2.0.1)")
        .stdout_has("bob");
    script.await.unwrap();
}

#[tokio::test]
async fn filters_by_owner() {
    let mut server = MockServer::bind().await;
    let port = server.port();
    let script = tokio::spawn(async move {
        server.handshake(SERVER_VERSION).await;
        server.respond("list_jobs", jobs()).await;
        server
    });

    cli()
        .args(&["ps", "--owner", "bob"])
        .server(port)
        .run()
        .await
        .passes()
        .stdout_has("bob")
        .stdout_lacks("alice");
    script.await.unwrap();
}

#[tokio::test]
async fn incompatible_server_is_refused() {
    let mut server = MockServer::bind().await;
    let port = server.port();
    let script = tokio::spawn(async move {
        server.handshake("2.1.0").await;
        server
    });

    cli()
        .args(&["ps"])
        .server(port)
        .run()
        .await
        .exits(2)
        .stderr_has("Incompatible server version (2.1.0).");
    script.await.unwrap();
}
