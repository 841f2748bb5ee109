use tracing::debug;

use crate::events::InboundEvent;
use crate::join::{self, Directory};
use crate::model::Ticket;

/// Maintains the open-ticket list from a snapshot plus live events.
///
/// New and reopened tickets are prepended so the freshest work sits at
/// the top. Mutations of tickets the snapshot never contained are
/// dropped rather than inserted; the next snapshot picks them up.
#[derive(Debug, Clone)]
pub struct ListReconciler {
    directory: Directory,
    tickets: Vec<Ticket>,
}

impl ListReconciler {
    pub fn new(directory: Directory, tickets: Vec<Ticket>) -> Self {
        Self { directory, tickets }
    }

    /// Tickets in display order, newest first.
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Fold one live event into the list.
    pub fn apply(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::CreateTicket(ticket) | InboundEvent::ReopenTicket(ticket) => {
                self.prepend(ticket);
            }
            InboundEvent::CloseTicket(ticket) => {
                self.tickets.retain(|existing| existing.id != ticket.id);
            }
            InboundEvent::AssignTicket(ticket)
            | InboundEvent::ConnectTicket(ticket)
            | InboundEvent::DisconnectTicket(ticket)
            | InboundEvent::SetTicketStatus(ticket) => {
                self.replace(ticket);
            }
            InboundEvent::SendMessage(_) | InboundEvent::AddFileToTicket(_) => {}
        }
    }

    fn prepend(&mut self, mut ticket: Ticket) {
        join::join_ticket(&mut ticket, &self.directory);
        self.tickets.insert(0, ticket);
    }

    fn replace(&mut self, mut ticket: Ticket) {
        join::join_ticket(&mut ticket, &self.directory);
        match self.tickets.iter_mut().find(|existing| existing.id == ticket.id) {
            Some(slot) => *slot = ticket,
            None => {
                debug!(ticket_id = ticket.id, "update for ticket absent from list, ignoring");
            }
        }
    }
}
