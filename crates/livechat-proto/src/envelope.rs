//! JSON envelope framing.
//!
//! Encoding serializes payload structs directly so field order on the wire
//! matches declaration order. Decoding goes through a generic
//! [`serde_json::Value`] first: the event name decides which schema the
//! payload is checked against.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    InboundEvent, OutboundEvent, ProtocolError, Result, SenderRole,
    events::{ChatHistory, NewCustomerSession, ReceiveMessage, RequestHistory, SendMessage},
};

/// A decoded channel frame: event name plus raw payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Wire event name.
    pub event: String,
    /// Event payload. Absent for payload-less events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Borrowed encoding view; keeps payload field order stable.
#[derive(Serialize)]
struct EnvelopeRef<'a, T: Serialize> {
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
}

fn encode<T: Serialize>(event: &'static str, data: Option<&T>) -> Result<String> {
    serde_json::to_string(&EnvelopeRef { event, data })
        .map_err(|e| ProtocolError::Encode { event, reason: e.to_string() })
}

fn payload<T: DeserializeOwned>(event: &str, data: Option<Value>) -> Result<T> {
    let data = data.ok_or_else(|| ProtocolError::MissingPayload(event.to_string()))?;
    serde_json::from_value(data)
        .map_err(|e| ProtocolError::InvalidPayload { event: event.to_string(), reason: e.to_string() })
}

impl Envelope {
    /// Parse a text frame into an envelope without interpreting the payload.
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }

    /// Encode an outbound event as emitted by a client acting as `role`.
    pub fn encode_outbound(event: &OutboundEvent, role: SenderRole) -> Result<String> {
        let name = event.wire_name(role);
        match event {
            OutboundEvent::SendMessage(p) => encode(name, Some(p)),
            OutboundEvent::RequestHistory(p) => encode(name, Some(p)),
            OutboundEvent::JoinAgentChannel => encode::<()>(name, None),
        }
    }

    /// Encode an inbound event (backend side and simulation).
    pub fn encode_inbound(event: &InboundEvent) -> Result<String> {
        let name = event.wire_name();
        match event {
            InboundEvent::Connect | InboundEvent::Disconnect => encode::<()>(name, None),
            InboundEvent::ReceiveMessage(p) => encode(name, Some(p)),
            InboundEvent::ChatHistory(p) => encode(name, Some(p)),
            InboundEvent::NewCustomerSession(p) => encode(name, Some(p)),
        }
    }

    /// Decode a text frame delivered to a client.
    pub fn decode_inbound(text: &str) -> Result<InboundEvent> {
        Self::parse(text)?.into_inbound()
    }

    /// Decode a text frame emitted by a client, recovering the sender's role
    /// from the event name.
    pub fn decode_outbound(text: &str) -> Result<(SenderRole, OutboundEvent)> {
        Self::parse(text)?.into_outbound()
    }

    /// Interpret the envelope as an inbound event.
    pub fn into_inbound(self) -> Result<InboundEvent> {
        let Self { event, data } = self;
        match event.as_str() {
            "connect" => Ok(InboundEvent::Connect),
            "disconnect" => Ok(InboundEvent::Disconnect),
            "receive_message" => {
                payload::<ReceiveMessage>(&event, data).map(InboundEvent::ReceiveMessage)
            },
            "chat_history" => payload::<ChatHistory>(&event, data).map(InboundEvent::ChatHistory),
            "new_customer_session" => {
                payload::<NewCustomerSession>(&event, data).map(InboundEvent::NewCustomerSession)
            },
            _ => Err(ProtocolError::UnknownEvent(event)),
        }
    }

    /// Interpret the envelope as an outbound event.
    pub fn into_outbound(self) -> Result<(SenderRole, OutboundEvent)> {
        let Self { event, data } = self;
        let role = if event.starts_with("agent_") { SenderRole::Agent } else { SenderRole::Visitor };
        let outbound = match event.as_str() {
            "send_message" | "agent_send_message" => {
                OutboundEvent::SendMessage(payload::<SendMessage>(&event, data)?)
            },
            // The visitor widget historically emits this one without a payload.
            "request_history" | "agent_request_history" => match data {
                Some(_) => OutboundEvent::RequestHistory(payload::<RequestHistory>(&event, data)?),
                None => OutboundEvent::RequestHistory(RequestHistory::default()),
            },
            "agent_join_admin_channel" => OutboundEvent::JoinAgentChannel,
            _ => return Err(ProtocolError::UnknownEvent(event)),
        };
        Ok((role, outbound))
    }
}
