// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `spalloc where-is`

use crate::prelude::*;

#[tokio::test]
async fn locates_a_chip() {
    let mut server = MockServer::bind().await;
    let port = server.port();
    let script = tokio::spawn(async move {
        server.handshake(SERVER_VERSION).await;
        let request = server
            .respond(
                "where_is",
                json!({"machine": "spin-5", "logical": [0, 0, 1], "physical": [0, 0, 2],
                       "chip": [8, 4], "board_chip": [0, 0], "job_chip": null, "job_id": null}),
            )
            .await;
        assert_eq!(request.kwargs["chip_x"], json!(8));
        server
    });

    cli()
        .args(&["where-is", "--chip", "spin-5", "8", "4"])
        .server(port)
        .run()
        .await
        .passes()
        .stdout_has("Cabinet 0, Frame 0, Board 2")
        .stdout_has("Coordinates within board: (0, 0)")
        .stdout_has("Job using board: -");
    script.await.unwrap();
}

#[tokio::test]
async fn empty_location_exits_four() {
    let mut server = MockServer::bind().await;
    let port = server.port();
    let script = tokio::spawn(async move {
        server.handshake(SERVER_VERSION).await;
        server.respond("where_is", json!(null)).await;
        server
    });

    cli()
        .args(&["where-is", "--board", "spin-5", "9", "9", "0"])
        .server(port)
        .run()
        .await
        .exits(4)
        .stderr_has("No boards at the specified location");
    script.await.unwrap();
}
