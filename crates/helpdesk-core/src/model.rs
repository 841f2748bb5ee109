use serde::{Deserialize, Serialize};

use crate::status::TicketStatus;

/// A customer organization. The wire field for its display name is
/// `username`, a quirk of the directory service schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    #[serde(rename = "username")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// An end user who opens tickets. Created and updated only by an external
/// admin subsystem; read-only to this client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub surname: String,
    pub name: String,
    #[serde(default)]
    pub middlename: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub local_workplace: Option<String>,
    #[serde(default)]
    pub remote_workplace: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub cellular: Option<String>,
    #[serde(default)]
    pub post: Option<String>,
    pub company: Company,
    /// Derived: the owning company's display name. Recomputed locally,
    /// never trusted from the wire.
    #[serde(default, rename = "companyName")]
    pub company_name: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A support administrator. Read-only except for the "self" identity used
/// in lifecycle authorization checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub surname: String,
    pub name: String,
    #[serde(default)]
    pub middlename: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub cellular: Option<String>,
    #[serde(default)]
    pub post: Option<String>,
    #[serde(default)]
    pub companies: Vec<Company>,
    /// Derived: comma-joined company names in source order.
    #[serde(default, rename = "companyNames")]
    pub company_names: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A user-opened support request. Mutated only via confirmed stream events;
/// this client never applies an optimistic local mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TicketStatus,
    /// Derived: display label for `status`.
    #[serde(default, rename = "statusText")]
    pub status_text: String,
    pub user_id: i64,
    /// Derived: full name of the opening user, empty when unresolved.
    #[serde(default, rename = "userName")]
    pub user_name: String,
    #[serde(default)]
    pub admin_id: Option<i64>,
    /// Derived: full name of the claiming admin, empty when unclaimed or
    /// unresolved.
    #[serde(default, rename = "adminName")]
    pub admin_name: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Ticket {
    pub fn claimed_by(&self, admin_id: i64) -> bool {
        self.admin_id == Some(admin_id)
    }
}

/// A file attached to a ticket, held by the external storage service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFile {
    pub item_id: i64,
    pub file_uuid: String,
    pub file_name: String,
    pub file_size: u64,
}

/// A file attached to a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageFile {
    pub item_id: i64,
    pub file_uuid: String,
    pub file_name: String,
    pub file_size: u64,
}

/// One entry in a ticket's conversation. Append-only: never mutated after
/// creation, never deleted. Empty text plus the boolean flags encodes a
/// lifecycle annotation rather than user content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Derived: author name when user-authored.
    #[serde(default, rename = "userName")]
    pub user_name: String,
    #[serde(default)]
    pub admin_id: Option<i64>,
    /// Derived: author name when admin-authored.
    #[serde(default, rename = "adminName")]
    pub admin_name: String,
    pub ticket_id: i64,
    #[serde(default)]
    pub admin_connected: bool,
    #[serde(default)]
    pub admin_disconnected: bool,
    #[serde(default)]
    pub in_progress: bool,
    #[serde(default)]
    pub solved: bool,
    #[serde(default)]
    pub files: Vec<MessageFile>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Render classification for a message. The variants mirror the chat
/// view's precedence order exactly, so hosts can match on this instead of
/// re-deriving the flag combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    AdminResetPending,
    UserResetPending,
    AdminInProgress,
    AdminSolved,
    AdminConnected,
    AdminDisconnected,
    UserSolved,
    AdminText,
    UserText,
}

impl Message {
    fn no_flags(&self) -> bool {
        !self.admin_connected && !self.admin_disconnected && !self.in_progress && !self.solved
    }

    pub fn kind(&self) -> MessageKind {
        let admin_authored = self.admin_id.is_some();
        if admin_authored && self.text.is_empty() && self.no_flags() {
            return MessageKind::AdminResetPending;
        }
        if !admin_authored && self.text.is_empty() && self.no_flags() {
            return MessageKind::UserResetPending;
        }
        if admin_authored
            && self.text.is_empty()
            && self.in_progress
            && !self.admin_connected
            && !self.admin_disconnected
            && !self.solved
        {
            return MessageKind::AdminInProgress;
        }
        if admin_authored
            && self.text.is_empty()
            && self.solved
            && !self.admin_connected
            && !self.admin_disconnected
            && !self.in_progress
        {
            return MessageKind::AdminSolved;
        }
        if self.admin_connected {
            return MessageKind::AdminConnected;
        }
        if self.admin_disconnected {
            return MessageKind::AdminDisconnected;
        }
        if self.solved && !admin_authored {
            return MessageKind::UserSolved;
        }
        if admin_authored {
            return MessageKind::AdminText;
        }
        MessageKind::UserText
    }
}

#[cfg(test)]
mod tests {
    use super::MessageKind;
    use crate::test_support::sample_message;

    #[test]
    fn company_display_name_maps_from_username_wire_field() {
        let raw = r#"{"id": 4, "username": "Initech", "description": "client"}"#;
        let company: super::Company =
            serde_json::from_str(raw).expect("company should deserialize");
        assert_eq!(company.name, "Initech");
    }

    #[test]
    fn admin_text_message_classifies_by_author() {
        let mut message = sample_message(1, 7);
        message.text = "hello".to_owned();
        message.admin_id = Some(3);
        message.user_id = None;
        assert_eq!(message.kind(), MessageKind::AdminText);

        message.admin_id = None;
        message.user_id = Some(2);
        assert_eq!(message.kind(), MessageKind::UserText);
    }

    #[test]
    fn empty_text_without_flags_is_a_pending_reset_annotation() {
        let mut message = sample_message(1, 7);
        message.text = String::new();
        message.admin_id = Some(3);
        assert_eq!(message.kind(), MessageKind::AdminResetPending);

        message.admin_id = None;
        assert_eq!(message.kind(), MessageKind::UserResetPending);
    }

    #[test]
    fn connection_flags_take_precedence_over_text() {
        let mut message = sample_message(1, 7);
        message.text = "ignored".to_owned();
        message.admin_id = Some(3);
        message.admin_connected = true;
        assert_eq!(message.kind(), MessageKind::AdminConnected);

        message.admin_connected = false;
        message.admin_disconnected = true;
        assert_eq!(message.kind(), MessageKind::AdminDisconnected);
    }

    #[test]
    fn solved_annotation_distinguishes_admin_and_user() {
        let mut message = sample_message(1, 7);
        message.text = String::new();
        message.admin_id = Some(3);
        message.solved = true;
        assert_eq!(message.kind(), MessageKind::AdminSolved);

        message.admin_id = None;
        assert_eq!(message.kind(), MessageKind::UserSolved);
    }

    #[test]
    fn in_progress_annotation_requires_admin_author() {
        let mut message = sample_message(1, 7);
        message.text = String::new();
        message.admin_id = Some(3);
        message.in_progress = true;
        assert_eq!(message.kind(), MessageKind::AdminInProgress);
    }
}
