//! Push channel: server-sent events carrying job status and progress.
//!
//! The event name selects the payload type; the data line is JSON. Frames
//! that cannot be decoded are logged and skipped so one bad event does not
//! end the subscription.

use eventsource_stream::{Event, Eventsource};
use futures_util::stream::BoxStream;
use futures_util::{future, Stream, StreamExt};
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::{debug, warn};

use pargamd_core::backend::BackendError;
use pargamd_core::config::BackendSettings;
use pargamd_core::models::PushEvent;

use crate::http::status_error;

/// Turn one SSE frame into a push event, if it is one we handle.
pub fn decode_event(event: &Event) -> Option<PushEvent> {
    match PushEvent::from_parts(&event.event, &event.data) {
        Ok(Some(parsed)) => Some(parsed),
        Ok(None) => {
            debug!("Ignoring push event '{}'", event.event);
            None
        }
        Err(e) => {
            warn!("Malformed '{}' push event: {}", event.event, e);
            None
        }
    }
}

/// Decode a raw SSE byte stream into push events.
pub fn push_events<S, B, E>(bytes: S) -> impl Stream<Item = PushEvent> + Send
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    bytes.eventsource().filter_map(|frame| {
        let event = match frame {
            Ok(event) => decode_event(&event),
            Err(e) => {
                warn!("Push stream error: {}", e);
                None
            }
        };
        future::ready(event)
    })
}

/// Open the push channel at `url`.
pub async fn connect(
    client: &Client,
    url: &str,
) -> Result<BoxStream<'static, PushEvent>, BackendError> {
    debug!("Subscribing to push events at {}", url);
    let response = client
        .get(url)
        .header(ACCEPT, "text/event-stream")
        .send()
        .await
        .map_err(|e| BackendError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(status_error(status, response.text().await));
    }

    Ok(push_events(response.bytes_stream()).boxed())
}

/// Open the push channel configured in `settings`.
///
/// The stream must outlive the request timeout, so this uses a client
/// without one.
pub async fn connect_with_settings(
    settings: &BackendSettings,
) -> Result<BoxStream<'static, PushEvent>, BackendError> {
    let client = Client::builder()
        .build()
        .map_err(|e| BackendError::Transport(e.to_string()))?;
    connect(&client, &settings.endpoint(&settings.events_path)).await
}
