//! Bulk-read snapshots for the two screens.
//!
//! A snapshot is atomic: every read must succeed or the whole load
//! fails and no partial state escapes. Derived fields on everything a
//! snapshot returns are recomputed through the entity joiner, never
//! taken from the wire.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use helpdesk_core::join::{self, Directory};
use helpdesk_core::model::{Admin, Message, Ticket, TicketFile, User};
use helpdesk_core::CoreError;

use crate::endpoints::ServiceEndpoints;
use crate::transport::{FileDownload, HttpTransport};

/// Everything the ticket-list screen needs, joined and sorted.
#[derive(Debug, Clone)]
pub struct ListSnapshot {
    pub directory: Directory,
    pub tickets: Vec<Ticket>,
}

/// Everything one chat screen needs, joined.
#[derive(Debug, Clone)]
pub struct ChatSnapshot {
    pub directory: Directory,
    pub profile: Admin,
    pub ticket: Ticket,
    pub files: Vec<TicketFile>,
    pub messages: Vec<Message>,
}

pub struct SnapshotLoader {
    transport: Arc<dyn HttpTransport>,
    endpoints: ServiceEndpoints,
}

impl SnapshotLoader {
    pub fn new(transport: Arc<dyn HttpTransport>, endpoints: ServiceEndpoints) -> Self {
        Self {
            transport,
            endpoints,
        }
    }

    /// Loads the ticket-list screen: full directory plus all open
    /// tickets, newest first.
    pub async fn load_list(&self) -> Result<ListSnapshot, CoreError> {
        let directory = self.load_directory().await?;
        let mut tickets: Vec<Ticket> = self.fetch(&self.endpoints.tickets()).await?;
        for ticket in &mut tickets {
            join::join_ticket(ticket, &directory);
        }
        join::sort_tickets_newest_first(&mut tickets);

        debug!(tickets = tickets.len(), "ticket list snapshot loaded");
        Ok(ListSnapshot { directory, tickets })
    }

    /// Loads one chat screen: directory, own profile, the ticket, its
    /// attachments, and the conversation so far.
    pub async fn load_chat(&self, ticket_id: i64) -> Result<ChatSnapshot, CoreError> {
        let directory = self.load_directory().await?;

        let mut profile: Admin = self.fetch(&self.endpoints.own_profile()).await?;
        join::join_admin(&mut profile);

        let mut ticket: Ticket = self.fetch(&self.endpoints.ticket(ticket_id)).await?;
        join::join_ticket(&mut ticket, &directory);

        let files: Vec<TicketFile> = self.fetch(&self.endpoints.ticket_files(ticket_id)).await?;

        let mut messages: Vec<Message> =
            self.fetch(&self.endpoints.ticket_messages(ticket_id)).await?;
        for message in &mut messages {
            join::join_message(message, &directory);
        }

        debug!(ticket_id, messages = messages.len(), "chat snapshot loaded");
        Ok(ChatSnapshot {
            directory,
            profile,
            ticket,
            files,
            messages,
        })
    }

    /// Fetches one stored file's raw contents for the host to render.
    pub async fn download_file(&self, file_uuid: &str) -> Result<FileDownload, CoreError> {
        self.transport.get_bytes(&self.endpoints.file(file_uuid)).await
    }

    async fn load_directory(&self) -> Result<Directory, CoreError> {
        let mut users: Vec<User> = self.fetch(&self.endpoints.users()).await?;
        for user in &mut users {
            join::join_user(user);
        }
        let mut admins: Vec<Admin> = self.fetch(&self.endpoints.admins()).await?;
        for admin in &mut admins {
            join::join_admin(admin);
        }
        Ok(Directory::new(users, admins))
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, CoreError> {
        let value = self.transport.get_json(url).await?;
        serde_json::from_value(value)
            .map_err(|err| CoreError::Decode(format!("{url} payload did not match schema: {err}")))
    }
}
