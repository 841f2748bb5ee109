use crate::events::InboundEvent;
use crate::join::{self, Directory};
use crate::model::{Message, Ticket};

/// Maintains one ticket's conversation from a snapshot plus live events.
///
/// Only events addressed to the open ticket are folded in; traffic for
/// other tickets passes through untouched. Messages arrive in delivery
/// order and are appended as-is, duplicates included.
#[derive(Debug, Clone)]
pub struct ChatReconciler {
    directory: Directory,
    ticket: Ticket,
    messages: Vec<Message>,
}

impl ChatReconciler {
    pub fn new(directory: Directory, ticket: Ticket, messages: Vec<Message>) -> Self {
        Self {
            directory,
            ticket,
            messages,
        }
    }

    /// Current state of the open ticket.
    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    /// Conversation in delivery order, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Fold one live event into the conversation.
    pub fn apply(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::SendMessage(mut message) if message.ticket_id == self.ticket.id => {
                join::join_message(&mut message, &self.directory);
                self.messages.push(message);
            }
            InboundEvent::CloseTicket(ticket)
            | InboundEvent::ReopenTicket(ticket)
            | InboundEvent::ConnectTicket(ticket)
            | InboundEvent::DisconnectTicket(ticket)
            | InboundEvent::SetTicketStatus(ticket)
                if ticket.id == self.ticket.id =>
            {
                let mut ticket = ticket;
                join::join_ticket(&mut ticket, &self.directory);
                self.ticket = ticket;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::TicketStatus;
    use crate::test_support::{sample_admin, sample_message, sample_ticket, sample_user};

    fn reconciler() -> ChatReconciler {
        let directory = Directory::new(vec![sample_user(1), sample_user(2)], vec![sample_admin(3)]);
        let mut ticket = sample_ticket(7, 1, None);
        join::join_ticket(&mut ticket, &directory);
        ChatReconciler::new(directory, ticket, vec![sample_message(1, 7)])
    }

    #[test]
    fn message_for_open_ticket_is_appended_joined() {
        let mut chat = reconciler();
        chat.apply(InboundEvent::SendMessage(sample_message(2, 7)));

        assert_eq!(chat.messages().len(), 2);
        assert_eq!(chat.messages()[1].user_name, "Usersson Two");
    }

    #[test]
    fn message_for_other_ticket_is_ignored() {
        let mut chat = reconciler();
        chat.apply(InboundEvent::SendMessage(sample_message(2, 8)));
        assert_eq!(chat.messages().len(), 1);
    }

    #[test]
    fn duplicate_messages_are_kept() {
        let mut chat = reconciler();
        chat.apply(InboundEvent::SendMessage(sample_message(2, 7)));
        chat.apply(InboundEvent::SendMessage(sample_message(2, 7)));
        assert_eq!(chat.messages().len(), 3);
    }

    #[test]
    fn lifecycle_event_replaces_open_ticket() {
        let mut chat = reconciler();
        let mut updated = sample_ticket(7, 1, Some(3));
        updated.status = TicketStatus::InProgress;
        chat.apply(InboundEvent::ConnectTicket(updated));

        assert_eq!(chat.ticket().admin_id, Some(3));
        assert_eq!(chat.ticket().admin_name, "Adminov Three");
        assert_eq!(chat.ticket().status_text, "In progress");
    }

    #[test]
    fn lifecycle_event_for_other_ticket_is_ignored() {
        let mut chat = reconciler();
        let before = chat.ticket().clone();
        chat.apply(InboundEvent::CloseTicket(sample_ticket(8, 1, None)));
        assert_eq!(chat.ticket(), &before);
    }

    #[test]
    fn create_and_assign_do_not_touch_the_conversation() {
        let mut chat = reconciler();
        let before = chat.ticket().clone();
        chat.apply(InboundEvent::CreateTicket(sample_ticket(7, 1, None)));
        chat.apply(InboundEvent::AssignTicket(sample_ticket(7, 1, Some(3))));
        assert_eq!(chat.ticket(), &before);
        assert_eq!(chat.messages().len(), 1);
    }

    #[test]
    fn attachment_notification_has_no_effect_on_a_mounted_chat() {
        let mut chat = reconciler();
        let ticket_before = chat.ticket().clone();
        chat.apply(InboundEvent::AddFileToTicket(serde_json::json!({
            "item_id": 7,
            "file_uuid": "abc-123",
        })));

        assert_eq!(chat.ticket(), &ticket_before);
        assert_eq!(chat.messages().len(), 1);
    }
}
