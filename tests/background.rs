mod common;

use std::time::Duration;

use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wmata::endpoints::{GtfsFeed, RailIncidents};
use wmata::types::LineCode;
use wmata::{BackgroundSession, Error, ErrorKind, TaskState};

#[tokio::test]
async fn test_download_delivers_decoded_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Incidents.svc/json/Incidents"))
        .respond_with(ResponseTemplate::new(200).set_body_string(common::INCIDENTS))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = common::client_with_download_dir(&server, dir.path());
    let session = BackgroundSession::new(&client).unwrap();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = session.download(RailIncidents, tx);

    let delivery = rx.recv().await.unwrap();
    assert_eq!(delivery.task, id);

    let incidents = delivery.result.unwrap().incidents;
    assert_eq!(incidents.len(), 1);
    assert_eq!(incidents[0].lines_affected, vec![LineCode::Red]);

    assert!(rx.recv().await.is_none());
    assert_eq!(session.state(id), None);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_download_matches_awaited_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(common::vehicle_feed(4)))
        .mount(&server)
        .await;

    let client = common::client(&server);
    let awaited = client.request(GtfsFeed::BusVehiclePositions).await.unwrap();

    let session = BackgroundSession::new(&client).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    session.download(GtfsFeed::BusVehiclePositions, tx);

    let downloaded = rx.recv().await.unwrap().result.unwrap();
    assert_eq!(downloaded, awaited);
}

#[tokio::test]
async fn test_error_envelope_through_background() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_string(r#"{"statusCode": 429, "message": "Rate limit is exceeded."}"#),
        )
        .mount(&server)
        .await;

    let client = common::client(&server);
    let session = BackgroundSession::new(&client).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    session.download(RailIncidents, tx);

    let err = rx.recv().await.unwrap().result.unwrap_err();
    assert!(matches!(err, Error::Api { status_code: 429, .. }));
}

#[tokio::test]
async fn test_invalidated_session_fails_pending_task_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(common::INCIDENTS)
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = common::client(&server);
    let session = BackgroundSession::new(&client).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let id = session.download(RailIncidents, tx);

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(session.state(id), Some(TaskState::Requested));
    assert_eq!(session.pending(), 1);

    session.invalidate();

    let delivery = rx.recv().await.unwrap();
    assert_eq!(delivery.task, id);
    assert_eq!(
        delivery.result.unwrap_err().kind(),
        ErrorKind::BackgroundSessionInvalid
    );

    // The late response never produces a second delivery.
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(rx.recv().await.is_none());
    assert_eq!(session.pending(), 0);
}

#[tokio::test]
async fn test_receiver_dropped_before_completion() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(common::INCIDENTS))
        .mount(&server)
        .await;

    let client = common::client(&server);
    let session = BackgroundSession::new(&client).unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);

    let id = session.download(RailIncidents, tx);

    for _ in 0..50 {
        if session.state(id).is_none() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(session.state(id), None);
}

#[tokio::test]
async fn test_sessions_sharing_download_dir_both_succeed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/Incidents.svc/json/Incidents"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(common::INCIDENTS)
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gtfs/bus-gtfsrt-vehiclepositions.pb"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(common::vehicle_feed(2)))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = common::client_with_download_dir(&server, dir.path());
    let slow = BackgroundSession::new(&client).unwrap();
    let fast = BackgroundSession::new(&client).unwrap();

    let (incidents_tx, mut incidents_rx) = mpsc::unbounded_channel();
    let (feed_tx, mut feed_rx) = mpsc::unbounded_channel();
    let a = slow.download(RailIncidents, incidents_tx);
    let b = fast.download(GtfsFeed::BusVehiclePositions, feed_tx);
    assert_eq!(a, b);

    let feed = feed_rx.recv().await.unwrap().result.unwrap();
    assert_eq!(feed.entity.len(), 2);

    let incidents = incidents_rx.recv().await.unwrap().result.unwrap();
    assert_eq!(incidents.incidents.len(), 1);

    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
