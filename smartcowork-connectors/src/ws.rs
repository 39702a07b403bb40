//! WebSocket push source for streamed sensor readings
//!
//! [`SensorSocket`] holds a live connection to the gateway's push
//! endpoint and yields one text frame at a time. Only the transport is
//! handled here — ping/pong answered by the library, binary frames
//! skipped, close frames turned into a clean end of stream. What a frame
//! *means* is the aggregator's business.

use async_trait::async_trait;
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use crate::{FrameSource, SourceError};

/// Errors on the push connection.
#[derive(Debug, thiserror::Error)]
pub enum SocketError {
    /// Failed to establish the initial connection.
    #[error("connection error: {0}")]
    Connection(String),

    /// A protocol-level error on an established connection.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// A live push connection to the sensor gateway.
pub struct SensorSocket {
    url: String,
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl SensorSocket {
    /// Connect to the push endpoint.
    pub async fn connect(url: impl Into<String>) -> Result<Self, SocketError> {
        let url = url.into();
        if !url.starts_with("ws://") && !url.starts_with("wss://") {
            return Err(SocketError::Connection(format!(
                "push URL must start with ws:// or wss://, got {url}"
            )));
        }

        let (stream, _response) = connect_async(&url).await.map_err(|e| {
            SocketError::Connection(format!("failed to connect to {url}: {e}"))
        })?;

        log::info!("connected to push stream at {url}");

        Ok(Self { url, stream })
    }

    /// The endpoint this socket is connected to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Await the next text frame.
    ///
    /// Returns `Ok(None)` when the peer closes or the stream ends.
    pub async fn next_text(&mut self) -> Result<Option<String>, SocketError> {
        while let Some(msg) = self.stream.next().await {
            match msg {
                Ok(Message::Text(text)) => return Ok(Some(text)),
                Ok(Message::Binary(_)) => {
                    log::debug!("skipping binary frame on {}", self.url);
                }
                Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => {}
                Ok(Message::Close(frame)) => {
                    log::info!("push stream closed by peer: {frame:?}");
                    return Ok(None);
                }
                Err(e) => return Err(SocketError::Protocol(e.to_string())),
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl FrameSource for SensorSocket {
    async fn next_frame(&mut self) -> Result<Option<String>, SourceError> {
        Ok(self.next_text().await?)
    }
}
