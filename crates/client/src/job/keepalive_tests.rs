// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::commands::JobRequest;
use crate::options::{JobSettings, JobTarget};
use crate::test_support::{MockServer, STEP_TIMEOUT};
use crate::Job;
use serde_json::json;
use std::time::Duration;
use tokio::time::Instant;

async fn created_job(keepalive: Duration) -> (MockServer, Job) {
    let mut server = MockServer::bind().await;
    let settings = JobSettings {
        hostname: "127.0.0.1".into(),
        port: server.port(),
        reconnect_delay: Duration::from_millis(50),
        timeout: Some(Duration::from_secs(5)),
        target: JobTarget::Create(JobRequest {
            owner: Some("tester".into()),
            keepalive: Some(keepalive),
            ..JobRequest::default()
        }),
    };
    let server_task = tokio::spawn(async move {
        server.handshake("1.2.3").await;
        server.respond("create_job", json!(42)).await;
        server
    });
    let job = Job::create(settings).await.unwrap();
    (server_task.await.unwrap(), job)
}

#[tokio::test]
async fn sends_keepalives_every_half_period() {
    let (mut server, mut job) = created_job(Duration::from_millis(100)).await;

    let started = Instant::now();
    for _ in 0..4 {
        let request = server.respond("job_keepalive", json!(null)).await;
        assert_eq!(request.args, vec![json!(42)]);
    }
    // Four rounds at 50ms each, with room for scheduling.
    assert!(started.elapsed() < Duration::from_secs(1));

    job.close().await;
}

#[tokio::test]
async fn close_stops_a_sleeping_task_promptly() {
    let (mut server, mut job) = created_job(Duration::from_secs(60)).await;

    let started = Instant::now();
    job.close().await;
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(server.try_recv(Duration::from_millis(200)).await.is_none());
}

#[tokio::test]
async fn dropping_the_job_stops_the_task() {
    let (mut server, job) = created_job(Duration::from_millis(100)).await;
    server.respond("job_keepalive", json!(null)).await;

    drop(job);
    // Once the task exits the connection is dropped, so the stream ends.
    let mut extra = 0;
    while let Some(request) = server.try_recv(STEP_TIMEOUT).await {
        assert_eq!(request.command, "job_keepalive");
        server.reply(json!(null)).await;
        extra += 1;
    }
    assert!(extra <= 1, "{extra} keepalives after drop");
}

#[tokio::test]
async fn rejected_keepalive_is_retried_next_cycle() {
    let (mut server, mut job) = created_job(Duration::from_millis(100)).await;

    server.expect("job_keepalive").await;
    server.fail("transient").await;
    let request = server.respond("job_keepalive", json!(null)).await;
    assert_eq!(request.args, vec![json!(42)]);

    job.close().await;
}

#[tokio::test]
async fn reconnects_after_connection_loss() {
    let (mut server, mut job) = created_job(Duration::from_millis(100)).await;
    server.respond("job_keepalive", json!(null)).await;
    server.close();

    server.handshake("1.2.3").await;
    let request = server.respond("job_keepalive", json!(null)).await;
    assert_eq!(request.args, vec![json!(42)]);
    assert_eq!(job.id().get(), 42);

    job.close().await;
}

#[tokio::test]
async fn reconnects_at_most_once_per_cycle() {
    let (mut server, mut job) = created_job(Duration::from_millis(400)).await;
    server.expect("job_keepalive").await;
    server.close();

    // Every connection passes the version check and is then dropped when
    // the keepalive arrives. Cycles are 200ms apart.
    let started = Instant::now();
    let mut reconnects = 0;
    while started.elapsed() < Duration::from_secs(1) {
        if !server.try_accept(Duration::from_millis(100)).await {
            continue;
        }
        server.respond("version", json!("1.2.3")).await;
        server.expect("job_keepalive").await;
        server.close();
        reconnects += 1;
    }
    job.close().await;

    assert!(reconnects >= 2, "only {reconnects} reconnects");
    assert!(reconnects <= 6, "{reconnects} reconnects in one second");
}
