//! Operator-side ticket lifecycle actions.
//!
//! The controller turns screen actions into [`OutboundIntent`]s and
//! enforces the claim rules before anything is sent. It talks to the
//! stream through the [`IntentSink`] seam so the rules can be tested
//! without a live connection.

use std::sync::Arc;

use crate::error::CoreError;
use crate::events::OutboundIntent;
use crate::model::Ticket;
use crate::status::TicketStatus;

/// Delivery seam for outbound intents.
pub trait IntentSink: Send + Sync {
    fn send(&self, intent: OutboundIntent) -> Result<(), CoreError>;
}

pub struct LifecycleController {
    sink: Arc<dyn IntentSink>,
    self_admin_id: i64,
}

impl LifecycleController {
    pub fn new(sink: Arc<dyn IntentSink>, self_admin_id: i64) -> Self {
        Self { sink, self_admin_id }
    }

    /// Take ownership of a ticket.
    pub fn claim(&self, ticket_id: i64) -> Result<(), CoreError> {
        self.sink.send(OutboundIntent::ConnectTicket { item_id: ticket_id })
    }

    /// Hand a ticket back to the queue.
    ///
    /// Disconnects and resets the status to pending. Both intents are
    /// attempted even if the first fails, so a half-released ticket does
    /// not stay claimed with a stale status.
    pub fn release(&self, ticket_id: i64) -> Result<(), CoreError> {
        let disconnect = self
            .sink
            .send(OutboundIntent::DisconnectTicket { item_id: ticket_id });
        let reset = self.sink.send(OutboundIntent::SetTicketStatus {
            item_id: ticket_id,
            status: TicketStatus::Pending,
        });
        disconnect.and(reset)
    }

    pub fn set_status(&self, ticket_id: i64, status: TicketStatus) -> Result<(), CoreError> {
        self.sink
            .send(OutboundIntent::SetTicketStatus { item_id: ticket_id, status })
    }

    /// Post a message into a ticket's conversation.
    ///
    /// The text must be non-blank and the ticket must not be claimed by
    /// another operator. Sending into an unclaimed ticket claims it
    /// first.
    pub fn send_message(&self, ticket: &Ticket, text: &str) -> Result<(), CoreError> {
        if text.trim().is_empty() {
            return Err(CoreError::MessageTextRequired);
        }
        match ticket.admin_id {
            Some(owner) if owner != self.self_admin_id => return Err(CoreError::AccessDenied),
            Some(_) => {}
            None => self.claim(ticket.id)?,
        }
        self.sink.send(OutboundIntent::SendMessage {
            text: text.to_owned(),
            user_id: ticket.user_id,
            ticket_id: ticket.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_ticket, RecordingSink};

    fn controller(sink: Arc<RecordingSink>) -> LifecycleController {
        LifecycleController::new(sink, 3)
    }

    #[test]
    fn claim_sends_connect() {
        let sink = Arc::new(RecordingSink::new());
        controller(sink.clone()).claim(7).unwrap();
        assert_eq!(sink.sent(), vec![OutboundIntent::ConnectTicket { item_id: 7 }]);
    }

    #[test]
    fn release_disconnects_then_resets_status() {
        let sink = Arc::new(RecordingSink::new());
        controller(sink.clone()).release(7).unwrap();
        assert_eq!(
            sink.sent(),
            vec![
                OutboundIntent::DisconnectTicket { item_id: 7 },
                OutboundIntent::SetTicketStatus {
                    item_id: 7,
                    status: TicketStatus::Pending,
                },
            ]
        );
    }

    #[test]
    fn release_surfaces_failure_after_attempting_both() {
        let sink = Arc::new(RecordingSink::failing());
        let result = controller(sink).release(7);
        assert_eq!(result, Err(CoreError::NotConnected));
    }

    #[test]
    fn blank_message_is_rejected_without_sending() {
        let sink = Arc::new(RecordingSink::new());
        let ticket = sample_ticket(7, 1, Some(3));
        let result = controller(sink.clone()).send_message(&ticket, "   ");

        assert_eq!(result, Err(CoreError::MessageTextRequired));
        assert!(sink.sent().is_empty());
    }

    #[test]
    fn message_into_ticket_claimed_by_other_is_denied() {
        let sink = Arc::new(RecordingSink::new());
        let ticket = sample_ticket(7, 1, Some(9));
        let result = controller(sink.clone()).send_message(&ticket, "hello");

        assert_eq!(result, Err(CoreError::AccessDenied));
        assert!(sink.sent().is_empty());
    }

    #[test]
    fn message_into_own_ticket_sends_directly() {
        let sink = Arc::new(RecordingSink::new());
        let ticket = sample_ticket(7, 1, Some(3));
        controller(sink.clone()).send_message(&ticket, "hello").unwrap();

        assert_eq!(
            sink.sent(),
            vec![OutboundIntent::SendMessage {
                text: "hello".to_owned(),
                user_id: 1,
                ticket_id: 7,
            }]
        );
    }

    #[test]
    fn message_into_unclaimed_ticket_claims_first() {
        let sink = Arc::new(RecordingSink::new());
        let ticket = sample_ticket(7, 1, None);
        controller(sink.clone()).send_message(&ticket, "hello").unwrap();

        assert_eq!(
            sink.sent(),
            vec![
                OutboundIntent::ConnectTicket { item_id: 7 },
                OutboundIntent::SendMessage {
                    text: "hello".to_owned(),
                    user_id: 1,
                    ticket_id: 7,
                },
            ]
        );
    }
}
