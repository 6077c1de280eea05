mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::{spawn_backend, CountingSync, StubServer};
use pktconsole::api::ApiClient;
use pktconsole::models::capture::CaptureParams;
use pktconsole::session::{CaptureSession, SessionPhase, StatusCache};
use pktconsole::utils::error::{ErrorKind, SessionError};

const PERIOD: Duration = Duration::from_millis(300);

fn session(server: &StubServer) -> (CaptureSession, Arc<CountingSync>) {
    let api = ApiClient::new(server.api_url()).unwrap();
    let sync = Arc::new(CountingSync::default());
    let session = CaptureSession::with_period(api.clone(), StatusCache::new(api), sync.clone(), PERIOD);
    (session, sync)
}

fn params() -> CaptureParams {
    CaptureParams {
        interface: "eth0".into(),
        packet_count: 500,
        timeout_seconds: 30,
        filter_expression: "tcp port 443".into(),
    }
}

#[tokio::test]
async fn start_goes_live_and_polls() {
    let server = spawn_backend();
    let (session, sync) = session(&server);

    session.start(&params()).await.unwrap();

    assert_eq!(session.phase(), SessionPhase::Live);
    assert!(session.is_polling());
    assert!(session.status().snapshot().is_capturing);
    assert_eq!(sync.runs(), 0);

    tokio::time::sleep(PERIOD * 3 + PERIOD / 2).await;
    let runs = sync.runs();
    assert!((2..=4).contains(&runs), "unexpected tick count {runs}");

    session.shutdown();
}

#[tokio::test]
async fn start_sends_capture_params() {
    let server = spawn_backend();
    let (session, _sync) = session(&server);

    session.start(&params()).await.unwrap();
    session.shutdown();

    let body = server.backend.last_body("start").unwrap();
    assert_eq!(
        body,
        serde_json::json!({
            "interface": "eth0",
            "packet_count": 500,
            "timeout": 30,
            "filter": "tcp port 443",
        })
    );
}

#[tokio::test]
async fn restart_replaces_the_timer() {
    let server = spawn_backend();
    let (session, sync) = session(&server);

    session.start(&params()).await.unwrap();
    session.start(&params()).await.unwrap();
    session.start(&params()).await.unwrap();

    tokio::time::sleep(PERIOD * 3 + PERIOD / 2).await;
    let runs = sync.runs();
    assert!((2..=4).contains(&runs), "timers stacked up: {runs} ticks");
    assert_eq!(server.backend.hits("start"), 3);

    session.shutdown();
}

#[tokio::test]
async fn stop_tears_down_timer_and_resyncs_once() {
    let server = spawn_backend();
    let (session, sync) = session(&server);

    session.start(&params()).await.unwrap();
    tokio::time::sleep(PERIOD + PERIOD / 2).await;

    let before = sync.runs();
    session.stop().await.unwrap();
    let after = sync.runs();

    assert_eq!(after, before + 1);
    assert_eq!(session.phase(), SessionPhase::Stopped);
    assert!(!session.is_polling());
    assert!(!session.status().snapshot().is_capturing);

    tokio::time::sleep(PERIOD * 3).await;
    assert_eq!(sync.runs(), after);
}

#[tokio::test]
async fn failed_start_stays_stopped_without_timer() {
    let server = spawn_backend();
    server.backend.fail_start.store(true, Ordering::SeqCst);
    let (session, sync) = session(&server);

    let err = session.start(&params()).await.unwrap_err();
    match err {
        SessionError::Api(api) => {
            assert_eq!(api.kind(), ErrorKind::ServerRejection);
            assert_eq!(api.to_string(), "HTTP 500 - interface not found");
        }
        other => panic!("unexpected error {other:?}"),
    }

    assert_eq!(session.phase(), SessionPhase::Stopped);
    assert!(!session.is_polling());
    assert!(!session.is_busy());

    tokio::time::sleep(PERIOD * 2).await;
    assert_eq!(sync.runs(), 0);
}

#[tokio::test]
async fn failed_stop_keeps_polling() {
    let server = spawn_backend();
    let (session, sync) = session(&server);

    session.start(&params()).await.unwrap();
    server.backend.fail_stop.store(true, Ordering::SeqCst);

    assert!(session.stop().await.is_err());
    assert_eq!(session.phase(), SessionPhase::Live);
    assert!(session.is_polling());

    let before = sync.runs();
    tokio::time::sleep(PERIOD * 2 + PERIOD / 2).await;
    assert!(sync.runs() > before);

    session.shutdown();
    assert!(!session.is_polling());
}

#[tokio::test]
async fn concurrent_commands_are_rejected_while_busy() {
    let server = spawn_backend();
    let (session, _sync) = session(&server);

    let params = params();
    let (first, second) = tokio::join!(session.start(&params), session.start(&params));

    assert!(first.is_ok());
    assert!(matches!(second, Err(SessionError::Busy)));
    assert_eq!(server.backend.hits("start"), 1);
    assert!(!session.is_busy());

    session.shutdown();
}

#[tokio::test]
async fn unreachable_service_is_a_network_failure() {
    let api = ApiClient::new("http://127.0.0.1:9/api").unwrap();
    let sync = Arc::new(CountingSync::default());
    let session = CaptureSession::with_period(api.clone(), StatusCache::new(api), sync, PERIOD);

    match session.start(&params()).await {
        Err(SessionError::Api(e)) => assert_eq!(e.kind(), ErrorKind::NetworkFailure),
        other => panic!("unexpected result {other:?}"),
    }
    assert_eq!(session.phase(), SessionPhase::Stopped);
}

#[tokio::test]
async fn refresh_status_picks_up_the_service_flag() {
    let server = spawn_backend();
    server.backend.capturing.store(true, Ordering::SeqCst);
    let (session, _sync) = session(&server);

    session.refresh_status().await;

    let status = session.status().snapshot();
    assert!(status.is_capturing);
    assert_eq!(status.packets_captured, 10);
    assert_eq!(status.packets_analyzed, 8);
    assert_eq!(session.phase(), SessionPhase::Stopped);
}
