//! WebSocket transport for the chat channel.
//!
//! Provides [`ConnectedChannel`], which moves JSON envelopes between a
//! WebSocket and a pair of tokio channels. This is a thin layer that just
//! encodes and decodes events; conversation logic remains in the Sans-IO
//! [`crate::ChatWidget`].

use futures::{SinkExt, StreamExt};
use livechat_proto::{Envelope, InboundEvent, OutboundEvent, ProtocolError, SenderRole};
use thiserror::Error;
use tokio::{net::TcpStream, sync::mpsc};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Channel to the connection task is closed.
    #[error("channel closed")]
    Closed,
}

/// A decoded inbound frame, or why it could not be decoded.
pub type Inbound = Result<InboundEvent, ProtocolError>;

/// Handle to an open chat channel.
///
/// Outbound events are encoded for the role given to [`connect`]. The
/// receiver yields [`InboundEvent::Connect`] first and
/// [`InboundEvent::Disconnect`] last.
pub struct ConnectedChannel {
    /// Send events to the backend.
    pub to_server: mpsc::Sender<OutboundEvent>,
    /// Receive events from the backend.
    pub from_server: mpsc::Receiver<Inbound>,
    /// Abort handle to stop the connection task.
    abort_handle: tokio::task::AbortHandle,
}

impl ConnectedChannel {
    /// Stop the connection.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

/// Open a chat channel to `url` (`ws://` or `wss://`) as `role`.
pub async fn connect(url: &str, role: SenderRole) -> Result<ConnectedChannel, TransportError> {
    let (socket, _response) =
        connect_async(url).await.map_err(|e| TransportError::Connection(e.to_string()))?;
    tracing::info!(%url, %role, "chat channel open");

    let (to_server_tx, to_server_rx) = mpsc::channel::<OutboundEvent>(32);
    let (from_server_tx, from_server_rx) = mpsc::channel::<Inbound>(32);

    from_server_tx.send(Ok(InboundEvent::Connect)).await.map_err(|_| TransportError::Closed)?;

    let handle = tokio::spawn(run_connection(socket, role, to_server_rx, from_server_tx));

    Ok(ConnectedChannel {
        to_server: to_server_tx,
        from_server: from_server_rx,
        abort_handle: handle.abort_handle(),
    })
}

/// Run the connection, bridging between channels and the socket.
async fn run_connection(
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    role: SenderRole,
    mut to_server: mpsc::Receiver<OutboundEvent>,
    from_server: mpsc::Sender<Inbound>,
) {
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            outbound = to_server.recv() => {
                let Some(event) = outbound else {
                    let _ = sink.close().await;
                    break;
                };
                match Envelope::encode_outbound(&event, role) {
                    Ok(text) => {
                        if let Err(e) = sink.send(Message::Text(text)).await {
                            tracing::warn!(error = %e, "chat channel write failed");
                            break;
                        }
                    },
                    Err(e) => tracing::warn!(error = %e, "dropping unencodable event"),
                }
            },
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Text(text))) => {
                    if from_server.send(Envelope::decode_inbound(&text)).await.is_err() {
                        break;
                    }
                },
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {},
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "chat channel read failed");
                    break;
                },
            },
        }
    }

    tracing::info!("chat channel closed");
    let _ = from_server.send(Ok(InboundEvent::Disconnect)).await;
}
