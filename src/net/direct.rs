use super::channel::map_ws_error;
use super::http::{map_http_error, post_json};
use crate::config::SessionConfig;
use crate::error::TransportError;
use crate::ui::{UiGraph, UiNode};
use futures_util::StreamExt;
use reqwest::Client;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, instrument, warn};

/// The simpler deployment mode: post the raw canvas, then read node snapshots from a
/// dedicated socket until the server closes it.
pub struct DirectSimulation {
    ws: Option<WebSocketStream<MaybeTlsStream<TcpStream>>>,
}

impl DirectSimulation {
    /// Posts `{ nodes, edges }` and, on a 2xx answer, opens the update socket.
    ///
    /// No socket is opened when the request fails.
    #[instrument(skip_all, fields(url = %config.simulation_url()))]
    pub async fn start(config: &SessionConfig, graph: &UiGraph) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(map_http_error)?;
        let answer = post_json(&client, &config.simulation_url(), graph).await?;
        debug!(answer = %answer, "simulation accepted");

        let (ws, _) = connect_async(config.updates_ws_url.as_str())
            .await
            .map_err(map_ws_error)?;
        info!("streaming simulation updates");
        Ok(Self { ws: Some(ws) })
    }

    pub fn is_open(&self) -> bool {
        self.ws.is_some()
    }

    /// Next node snapshot, or `None` once the server closed the stream.
    pub async fn next_snapshot(&mut self) -> Result<Option<Vec<UiNode>>, TransportError> {
        while let Some(ws) = self.ws.as_mut() {
            let Some(message) = ws.next().await else {
                self.ws = None;
                break;
            };
            let text = match message.map_err(map_ws_error)? {
                Message::Text(text) => text,
                Message::Close(_) => {
                    info!("simulation completed");
                    self.ws = None;
                    break;
                }
                _ => continue,
            };
            match serde_json::from_str(&text) {
                Ok(nodes) => return Ok(Some(nodes)),
                Err(error) => warn!(%error, "skipping malformed snapshot"),
            }
        }
        Ok(None)
    }

    /// Closes the update socket. Safe to call repeatedly.
    pub async fn close(&mut self) -> Result<(), TransportError> {
        match self.ws.take() {
            Some(mut ws) => match ws.close(None).await {
                Ok(()) => Ok(()),
                Err(error) => match map_ws_error(error) {
                    TransportError::Closed => Ok(()),
                    other => Err(other),
                },
            },
            None => Ok(()),
        }
    }
}
