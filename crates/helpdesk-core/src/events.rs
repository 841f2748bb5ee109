use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::{Message, Ticket};
use crate::status::TicketStatus;

/// Every action name the stream may deliver. Used to distinguish an unknown
/// action from a malformed payload for a known one.
const KNOWN_ACTIONS: &[&str] = &[
    "create_ticket",
    "reopen_ticket",
    "close_ticket",
    "assign_ticket",
    "connect_ticket",
    "disconnect_ticket",
    "set_ticket_status",
    "send_message",
    "add_file_to_ticket",
];

/// A delta delivered by the event stream, in the `{action, data}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "snake_case")]
pub enum InboundEvent {
    CreateTicket(Ticket),
    ReopenTicket(Ticket),
    CloseTicket(Ticket),
    AssignTicket(Ticket),
    ConnectTicket(Ticket),
    DisconnectTicket(Ticket),
    SetTicketStatus(Ticket),
    SendMessage(Message),
    /// Attachment notifications carry no state this client consumes yet.
    AddFileToTicket(serde_json::Value),
}

impl InboundEvent {
    pub fn decode(raw: &str) -> Result<Self, CoreError> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|err| CoreError::Decode(format!("malformed event envelope: {err}")))?;

        match serde_json::from_value::<Self>(value.clone()) {
            Ok(event) => Ok(event),
            Err(err) => {
                let action = value.get("action").and_then(|action| action.as_str());
                match action {
                    Some(action) if !KNOWN_ACTIONS.contains(&action) => {
                        Err(CoreError::UnknownAction(action.to_owned()))
                    }
                    _ => Err(CoreError::Decode(format!("invalid event payload: {err}"))),
                }
            }
        }
    }

    pub const fn action(&self) -> &'static str {
        match self {
            Self::CreateTicket(_) => "create_ticket",
            Self::ReopenTicket(_) => "reopen_ticket",
            Self::CloseTicket(_) => "close_ticket",
            Self::AssignTicket(_) => "assign_ticket",
            Self::ConnectTicket(_) => "connect_ticket",
            Self::DisconnectTicket(_) => "disconnect_ticket",
            Self::SetTicketStatus(_) => "set_ticket_status",
            Self::SendMessage(_) => "send_message",
            Self::AddFileToTicket(_) => "add_file_to_ticket",
        }
    }
}

/// A client-initiated intent, sent fire-and-forget over the stream in the
/// same `{action, data}` envelope. The server confirms by echoing a
/// lifecycle event; nothing is applied locally on send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "snake_case")]
pub enum OutboundIntent {
    ConnectTicket {
        item_id: i64,
    },
    DisconnectTicket {
        item_id: i64,
    },
    SetTicketStatus {
        item_id: i64,
        status: TicketStatus,
    },
    SendMessage {
        text: String,
        user_id: i64,
        ticket_id: i64,
    },
}

impl OutboundIntent {
    pub fn encode(&self) -> Result<String, CoreError> {
        serde_json::to_string(self)
            .map_err(|err| CoreError::Decode(format!("failed to encode intent: {err}")))
    }
}
