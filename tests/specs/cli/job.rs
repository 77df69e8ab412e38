// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `spalloc job`

use crate::prelude::*;

fn alice_jobs(ids: &[u64]) -> serde_json::Value {
    ids.iter()
        .map(|id| json!({"job_id": id, "owner": "alice", "state": 1, "boards": null}))
        .collect()
}

#[tokio::test]
async fn shows_job_info() {
    let mut server = MockServer::bind().await;
    let port = server.port();
    let script = tokio::spawn(async move {
        server.handshake(SERVER_VERSION).await;
        server.respond("get_job_state", json!({"state": 1, "keepalive": 60.0})).await;
        server
    });

    cli()
        .args(&["job", "12"])
        .server(port)
        .run()
        .await
        .passes()
        .stdout_has("Job ID: 12")
        .stdout_has("State: queued");
    script.await.unwrap();
}

#[tokio::test]
async fn ambiguous_owner_exits_three() {
    let mut server = MockServer::bind().await;
    let port = server.port();
    let script = tokio::spawn(async move {
        server.handshake(SERVER_VERSION).await;
        server.respond("list_jobs", alice_jobs(&[3, 4])).await;
        server
    });

    cli()
        .args(&["job", "--owner", "alice"])
        .server(port)
        .run()
        .await
        .exits(3)
        .stderr_has("Ambiguous: alice has 2 live jobs: 3, 4");
    script.await.unwrap();
}

#[tokio::test]
async fn destroy_credits_the_owner() {
    let mut server = MockServer::bind().await;
    let port = server.port();
    let script = tokio::spawn(async move {
        server.handshake(SERVER_VERSION).await;
        server.respond("list_jobs", alice_jobs(&[3])).await;
        let request = server.respond("destroy_job", json!(null)).await;
        assert_eq!(request.args, vec![json!(3), json!("Destroyed by alice")]);
        server
    });

    cli().args(&["job", "--owner", "alice", "--destroy"]).server(port).run().await.passes();
    script.await.unwrap();
}

#[tokio::test]
async fn ethernet_ips_of_queued_job_exits_nine() {
    let mut server = MockServer::bind().await;
    let port = server.port();
    let script = tokio::spawn(async move {
        server.handshake(SERVER_VERSION).await;
        server
            .respond(
                "get_job_machine_info",
                json!({"width": null, "height": null, "connections": null,
                       "machine_name": null, "boards": null}),
            )
            .await;
        server
    });

    cli()
        .args(&["job", "12", "--ethernet-ips"])
        .server(port)
        .run()
        .await
        .exits(9)
        .stderr_has("Job 12 does not exist or is still queued.");
    script.await.unwrap();
}
