//! Result acquisition over a push (WebSocket) subscription.
//!
//! The service pushes status snapshots for a ticket on the WebSocket
//! equivalent of the status endpoint. [`subscribe_until_complete`] reads
//! snapshots until one is terminal. The connection is closed before the
//! function returns, whichever way it returns.

use futures::StreamExt;
use reportrun_core::{interpret, urls, JobOutcome, JobStatusSnapshot, JobTicket};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use crate::error::{RunError, SubscriptionError};

type PushStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Subscribe to a job's status events and wait for it to finish.
///
/// `service_url` is the HTTP service root; the push address is derived
/// from it by swapping the scheme (`https` becomes `wss`).
pub async fn subscribe_until_complete(
    service_url: &str,
    ticket: &JobTicket,
    cancel: &CancellationToken,
) -> Result<JobOutcome, RunError> {
    let url = urls::status_url(&urls::push_url(service_url), ticket);
    ensure_crypto_provider();

    let mut ws = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(RunError::Cancelled),
        result = connect_async(url.as_str()) => {
            let (ws, _response) = result.map_err(|source| SubscriptionError::Connect {
                url: url.clone(),
                source,
            })?;
            ws
        }
    };

    tracing::info!(ticket = %ticket, url = %url, "Subscribed to job status");

    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::info!(ticket = %ticket, "Subscription cancelled");
            Err(RunError::Cancelled)
        }
        outcome = receive_outcome(&mut ws, service_url, ticket) => outcome.map_err(RunError::from),
    };

    if let Err(e) = ws.close(None).await {
        tracing::debug!(ticket = %ticket, error = %e, "WebSocket already closed");
    }

    result
}

/// Install the ring provider for `wss://` unless the process already
/// chose one.
fn ensure_crypto_provider() {
    if rustls::crypto::CryptoProvider::get_default().is_none() {
        // Losing a race here leaves the other installer's provider in place.
        let _ = rustls::crypto::ring::default_provider().install_default();
    }
}

/// Read frames until a snapshot yields an outcome.
async fn receive_outcome(
    ws: &mut PushStream,
    service_url: &str,
    ticket: &JobTicket,
) -> Result<JobOutcome, SubscriptionError> {
    while let Some(frame) = ws.next().await {
        let snapshot: JobStatusSnapshot = match frame {
            Ok(Message::Text(text)) => serde_json::from_str(&text)?,
            Ok(Message::Binary(bytes)) => serde_json::from_slice(&bytes)?,
            Ok(Message::Ping(_) | Message::Pong(_)) => {
                // Handled automatically by tungstenite.
                continue;
            }
            Ok(Message::Close(frame)) => {
                tracing::info!(ticket = %ticket, ?frame, "Service closed the subscription");
                return Err(SubscriptionError::ClosedWithoutOutcome);
            }
            Ok(Message::Frame(_)) => continue,
            Err(e) => return Err(SubscriptionError::Receive(e)),
        };

        match interpret(service_url, ticket, &snapshot) {
            Some(outcome) => return Ok(outcome),
            None => {
                tracing::debug!(
                    ticket = %ticket,
                    events = snapshot.results.len(),
                    "Job still running",
                );
            }
        }
    }

    Err(SubscriptionError::ClosedWithoutOutcome)
}
