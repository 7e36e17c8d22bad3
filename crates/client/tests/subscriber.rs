//! Tests for the WebSocket subscription against a local push server.

use std::time::Duration;

use assert_matches::assert_matches;
use futures::{SinkExt, StreamExt};
use reportrun_client::subscriber::subscribe_until_complete;
use reportrun_client::{RunError, SubscriptionError};
use reportrun_core::{JobOutcome, JobTicket};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

const TICKET: &str = "T1";

fn finished() -> Message {
    Message::Text(
        json!({"results": [{"$type": "JobQuit"}, {"$type": "JobResult", "tag": "X"}]}).to_string(),
    )
}

fn running() -> Message {
    Message::Text(json!({"results": [{"$type": "JobProgress"}]}).to_string())
}

/// What the push server saw of one client: the request URI and the last
/// frame the client sent before hanging up.
struct ClientSession {
    uri: String,
    last_frame: Option<Message>,
}

/// Accept one client, push `frames`, optionally close, then drain until
/// the client hangs up.
async fn push_server(frames: Vec<Message>, close: bool) -> (String, JoinHandle<ClientSession>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut uri = String::new();
        let record_uri = |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
            uri = req.uri().to_string();
            Ok(resp)
        };
        let mut ws = tokio_tungstenite::accept_hdr_async(stream, record_uri)
            .await
            .unwrap();

        for frame in frames {
            let _ = ws.send(frame).await;
        }
        if close {
            let _ = ws.close(None).await;
        }
        let mut last_frame = None;
        while let Some(Ok(frame)) = ws.next().await {
            last_frame = Some(frame);
        }
        ClientSession { uri, last_frame }
    });

    (format!("http://{addr}/reporting/service"), handle)
}

async fn session(server: JoinHandle<ClientSession>) -> ClientSession {
    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("client should hang up")
        .unwrap()
}

async fn subscribe(service_url: &str) -> Result<JobOutcome, RunError> {
    subscribe_until_complete(service_url, &JobTicket::new(TICKET), &CancellationToken::new()).await
}

#[tokio::test]
async fn first_terminal_message_yields_artifact() {
    let (service_url, server) = push_server(vec![finished()], false).await;

    let outcome = subscribe(&service_url).await.unwrap();

    assert_eq!(
        outcome,
        JobOutcome::ArtifactReady {
            url: format!("{service_url}/job/result?ticket=T1&tag=X"),
        }
    );
    let seen = session(server).await;
    assert_eq!(seen.uri, "/reporting/service/job/artifacts?ticket=T1");
    assert_matches!(seen.last_frame, Some(Message::Close(_)));
}

#[tokio::test]
async fn non_terminal_messages_are_skipped() {
    let (service_url, _server) = push_server(vec![running(), running(), finished()], false).await;

    let outcome = subscribe(&service_url).await.unwrap();

    assert_matches!(outcome, JobOutcome::ArtifactReady { url } if url.ends_with("tag=X"));
}

#[tokio::test]
async fn binary_frames_are_decoded() {
    let body = json!({"results": [{"$type": "JobQuit"}]}).to_string();
    let (service_url, _server) = push_server(vec![Message::Binary(body.into_bytes())], false).await;

    let outcome = subscribe(&service_url).await.unwrap();

    assert_eq!(
        outcome,
        JobOutcome::Failed {
            logs_url: format!("{service_url}/job/logs?ticket=T1"),
        }
    );
}

#[tokio::test]
async fn close_before_outcome_is_an_error() {
    let (service_url, _server) = push_server(vec![running()], true).await;

    let err = subscribe(&service_url).await.unwrap_err();

    assert_matches!(
        err,
        RunError::Subscription(SubscriptionError::ClosedWithoutOutcome)
    );
}

#[tokio::test]
async fn undecodable_message_is_an_error() {
    let (service_url, server) =
        push_server(vec![Message::Text("not json".into())], false).await;

    let err = subscribe(&service_url).await.unwrap_err();

    assert_matches!(err, RunError::Subscription(SubscriptionError::Decode(_)));
    assert_matches!(session(server).await.last_frame, Some(Message::Close(_)));
}

#[tokio::test]
async fn refused_connection_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = subscribe(&format!("http://{addr}/service")).await.unwrap_err();

    assert_matches!(
        err,
        RunError::Subscription(SubscriptionError::Connect { url, .. })
            if url == format!("ws://{addr}/service/job/artifacts?ticket=T1")
    );
}

#[tokio::test]
async fn failed_tls_handshake_is_a_connect_error() {
    // Accepts TCP and hangs up before any TLS handshake.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        drop(stream);
    });

    let err = subscribe(&format!("https://{addr}/service")).await.unwrap_err();

    assert_matches!(
        err,
        RunError::Subscription(SubscriptionError::Connect { url, .. })
            if url == format!("wss://{addr}/service/job/artifacts?ticket=T1")
    );
}

#[tokio::test]
async fn cancellation_closes_the_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
        // Push nothing; report what the client sends.
        ws.next().await
    });

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let result = subscribe_until_complete(
        &format!("http://{addr}/service"),
        &JobTicket::new(TICKET),
        &cancel,
    )
    .await;

    assert_matches!(result, Err(RunError::Cancelled));
    let received = tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server should observe the close")
        .unwrap();
    assert_matches!(received, Some(Ok(Message::Close(_))));
}
