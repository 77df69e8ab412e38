// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `spalloc machine`

use crate::prelude::*;

async fn serve_listings() -> (u16, tokio::task::JoinHandle<MockServer>) {
    let mut server = MockServer::bind().await;
    let port = server.port();
    let script = tokio::spawn(async move {
        server.handshake(SERVER_VERSION).await;
        server
            .respond(
                "list_machines",
                json!([{"name": "spin-5", "tags": ["default"], "width": 2, "height": 1,
                        "dead_boards": [], "dead_links": []}]),
            )
            .await;
        server
            .respond(
                "list_jobs",
                json!([{"job_id": 8, "owner": "alice", "state": 3,
                        "allocated_machine_name": "spin-5", "boards": [[0, 0, 0], [0, 0, 1]]}]),
            )
            .await;
        server
    });
    (port, script)
}

#[tokio::test]
async fn lists_machines() {
    let (port, script) = serve_listings().await;
    cli()
        .args(&["machine"])
        .server(port)
        .run()
        .await
        .passes()
        .stdout_has("Num boards")
        .stdout_has("spin-5");
    script.await.unwrap();
}

#[tokio::test]
async fn shows_one_machine() {
    let (port, script) = serve_listings().await;
    cli()
        .args(&["machine", "spin-5"])
        .server(port)
        .run()
        .await
        .passes()
        .stdout_has("In-use: 2 of 6")
        .stdout_has("alice");
    script.await.unwrap();
}

#[tokio::test]
async fn unknown_machine_exits_six() {
    let (port, script) = serve_listings().await;
    cli()
        .args(&["machine", "nope"])
        .server(port)
        .run()
        .await
        .exits(6)
        .stderr_has("No machine 'nope' was found.");
    script.await.unwrap();
}
