use super::http::HttpUploader;
use super::stomp::Frame;
use crate::config::SessionConfig;
use crate::error::TransportError;
use crate::factory::FactoryStructure;
use crate::session::{Channel, Command, Connector, Inbound, UploadVerdict};
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, instrument, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const UPDATE_SUBSCRIPTION: &str = "sub-0";
const STATUS_SUBSCRIPTION: &str = "sub-1";

/// Connects to the engine over HTTP for uploads and STOMP over WebSocket for the session.
pub struct StompConnector {
    config: SessionConfig,
    uploader: HttpUploader,
}

impl StompConnector {
    pub fn new(config: SessionConfig) -> Result<Self, TransportError> {
        let uploader = HttpUploader::new(&config)?;
        Ok(Self { config, uploader })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

#[async_trait]
impl Connector for StompConnector {
    type Channel = StompChannel;

    async fn upload(&mut self, structure: &FactoryStructure) -> Result<UploadVerdict, TransportError> {
        self.uploader.upload(structure).await
    }

    async fn open(&mut self) -> Result<StompChannel, TransportError> {
        StompChannel::connect(&self.config).await
    }
}

/// A STOMP session subscribed to the status and update topics.
pub struct StompChannel {
    ws: WsStream,
    status_topic: String,
    update_topic: String,
    command_destination: String,
    closed: bool,
}

impl StompChannel {
    /// Opens the socket, performs the STOMP handshake and subscribes to both topics.
    #[instrument(skip(config), fields(url = %config.ws_url))]
    pub async fn connect(config: &SessionConfig) -> Result<Self, TransportError> {
        let (mut ws, _) = connect_async(config.ws_url.as_str())
            .await
            .map_err(map_ws_error)?;

        write_frame(&mut ws, &Frame::connect(host_of(&config.ws_url))).await?;
        loop {
            match read_frame(&mut ws).await? {
                Some(frame) if frame.command == "CONNECTED" => {
                    debug!(version = ?frame.header("version"), "stomp session established");
                    break;
                }
                Some(frame) if frame.command == "ERROR" => {
                    return Err(TransportError::Protocol(error_message(&frame)));
                }
                Some(frame) => debug!(command = %frame.command, "ignoring frame before CONNECTED"),
                None => return Err(TransportError::Closed),
            }
        }

        write_frame(&mut ws, &Frame::subscribe(UPDATE_SUBSCRIPTION, &config.update_topic)).await?;
        write_frame(&mut ws, &Frame::subscribe(STATUS_SUBSCRIPTION, &config.status_topic)).await?;

        Ok(Self {
            ws,
            status_topic: config.status_topic.clone(),
            update_topic: config.update_topic.clone(),
            command_destination: config.command_destination.clone(),
            closed: false,
        })
    }

    fn route(&self, frame: Frame) -> Option<Inbound> {
        let destination = frame.header("destination").unwrap_or_default();
        let subscription = frame.header("subscription").unwrap_or_default();
        let is_status = destination == self.status_topic || subscription == STATUS_SUBSCRIPTION;
        let is_update = destination == self.update_topic || subscription == UPDATE_SUBSCRIPTION;
        if !is_status && !is_update {
            debug!(destination, "message for unknown destination");
            return None;
        }
        if is_status {
            Some(Inbound::Status(frame.body))
        } else {
            Some(Inbound::Update(frame.body))
        }
    }
}

#[async_trait]
impl Channel for StompChannel {
    async fn send(&mut self, command: Command) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        let frame = Frame::send(&self.command_destination, command.as_str());
        write_frame(&mut self.ws, &frame).await
    }

    async fn recv(&mut self) -> Result<Option<Inbound>, TransportError> {
        while !self.closed {
            let Some(frame) = read_frame(&mut self.ws).await? else {
                self.closed = true;
                break;
            };
            if frame.command == "ERROR" {
                return Err(TransportError::Protocol(error_message(&frame)));
            }
            if frame.command != "MESSAGE" {
                debug!(command = %frame.command, "ignoring frame");
                continue;
            }
            if let Some(inbound) = self.route(frame) {
                return Ok(Some(inbound));
            }
        }
        Ok(None)
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if let Err(error) = write_frame(&mut self.ws, &Frame::disconnect()).await {
            warn!(%error, "could not send DISCONNECT");
        }
        match self.ws.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => Ok(()),
            Err(error) => Err(map_ws_error(error)),
        }
    }
}

async fn write_frame(ws: &mut WsStream, frame: &Frame) -> Result<(), TransportError> {
    debug!(command = %frame.command, "stomp >>");
    ws.send(Message::Text(frame.encode()))
        .await
        .map_err(map_ws_error)
}

/// Reads until a full frame arrives. `None` once the socket is closed.
async fn read_frame(ws: &mut WsStream) -> Result<Option<Frame>, TransportError> {
    while let Some(message) = ws.next().await {
        let text = match message.map_err(map_ws_error)? {
            Message::Text(text) => text,
            Message::Binary(bytes) => String::from_utf8(bytes)
                .map_err(|e| TransportError::Protocol(format!("frame is not UTF-8: {}", e)))?,
            Message::Close(_) => return Ok(None),
            _ => continue,
        };
        if let Some(frame) = Frame::decode(&text)? {
            debug!(command = %frame.command, "stomp <<");
            return Ok(Some(frame));
        }
    }
    Ok(None)
}

fn error_message(frame: &Frame) -> String {
    frame
        .header("message")
        .map(str::to_string)
        .unwrap_or_else(|| frame.body.clone())
}

pub(crate) fn map_ws_error(error: WsError) -> TransportError {
    match error {
        WsError::ConnectionClosed | WsError::AlreadyClosed => TransportError::Closed,
        WsError::Io(e) => TransportError::Io(e.to_string()),
        other => TransportError::WebSocket(other.to_string()),
    }
}

/// The `host[:port]` part of a URL, as sent in the STOMP `host` header.
fn host_of(url: &str) -> &str {
    let without_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(without_scheme)
}
