//! Integration tests for the WebSocket transport.
//!
//! These tests connect the real transport to a minimal WebSocket server on
//! localhost that answers `request_history` and relays scripted pushes.

#![cfg(feature = "transport")]

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use livechat_client::transport;
use livechat_proto::{
    Envelope, InboundEvent, OutboundEvent, SenderRole,
    events::{RequestHistory, SendMessage},
};
use tokio::{net::TcpListener, sync::mpsc, time::timeout};
use tokio_tungstenite::{accept_async, tungstenite::Message};

/// Start a server that forwards every text frame it receives to the returned
/// receiver and answers history requests with one entry.
async fn start_server() -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (seen_tx, seen_rx) = mpsc::channel(16);

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut socket = accept_async(stream).await.unwrap();

        while let Some(Ok(frame)) = socket.next().await {
            let Message::Text(text) = frame else { continue };
            if text.contains("request_history") {
                let reply = r#"{"event":"chat_history","data":{"history":[{"message_text":"hi","sender_type":"agent"}]}}"#;
                socket.send(Message::Text(reply.to_string())).await.unwrap();
            }
            if text.contains("\"bye\"") {
                let _ = socket.close(None).await;
                break;
            }
            let _ = seen_tx.send(text).await;
        }
    });

    (format!("ws://{addr}"), seen_rx)
}

async fn next_event(channel: &mut transport::ConnectedChannel) -> InboundEvent {
    timeout(Duration::from_secs(5), channel.from_server.recv())
        .await
        .expect("timed out")
        .expect("channel closed")
        .expect("undecodable frame")
}

#[tokio::test]
async fn connect_reports_connect_first() {
    let (url, _seen) = start_server().await;

    let mut channel = transport::connect(&url, SenderRole::Visitor).await.unwrap();

    assert_eq!(next_event(&mut channel).await, InboundEvent::Connect);
}

#[tokio::test]
async fn connect_fails_without_server() {
    let result = transport::connect("ws://127.0.0.1:1", SenderRole::Visitor).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn outbound_events_use_role_wire_names() {
    let (url, mut seen) = start_server().await;
    let channel = transport::connect(&url, SenderRole::Agent).await.unwrap();

    let send = OutboundEvent::SendMessage(SendMessage {
        message: "hello".into(),
        session_id: Some(7),
        customer_id: Some(42),
    });
    channel.to_server.send(send.clone()).await.unwrap();

    let text = timeout(Duration::from_secs(5), seen.recv()).await.unwrap().unwrap();
    assert_eq!(Envelope::decode_outbound(&text).unwrap(), (SenderRole::Agent, send));
}

#[tokio::test]
async fn history_reply_is_decoded() {
    let (url, _seen) = start_server().await;
    let mut channel = transport::connect(&url, SenderRole::Visitor).await.unwrap();
    assert_eq!(next_event(&mut channel).await, InboundEvent::Connect);

    channel
        .to_server
        .send(OutboundEvent::RequestHistory(RequestHistory::default()))
        .await
        .unwrap();

    let InboundEvent::ChatHistory(history) = next_event(&mut channel).await else {
        panic!("expected chat_history");
    };
    assert_eq!(history.history.len(), 1);
    assert_eq!(history.history[0].message_text, "hi");
}

#[tokio::test]
async fn server_close_reports_disconnect() {
    let (url, _seen) = start_server().await;
    let mut channel = transport::connect(&url, SenderRole::Visitor).await.unwrap();
    assert_eq!(next_event(&mut channel).await, InboundEvent::Connect);

    let bye = OutboundEvent::SendMessage(SendMessage {
        message: "bye".into(),
        session_id: None,
        customer_id: None,
    });
    channel.to_server.send(bye).await.unwrap();

    assert_eq!(next_event(&mut channel).await, InboundEvent::Disconnect);
}
