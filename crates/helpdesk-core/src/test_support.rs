//! Shared fixtures for unit tests across the workspace.

use std::sync::Mutex;

use crate::error::CoreError;
use crate::events::OutboundIntent;
use crate::lifecycle::IntentSink;
use crate::model::{Admin, Company, Message, Ticket, User};
use crate::report::ErrorReporter;
use crate::status::TicketStatus;

fn ordinal_name(id: i64) -> String {
    const NAMES: [&str; 9] = [
        "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
    ];
    NAMES
        .get(usize::try_from(id).unwrap_or(0).saturating_sub(1))
        .copied()
        .unwrap_or("Nth")
        .to_owned()
}

pub fn sample_company(id: i64) -> Company {
    Company {
        id,
        name: format!("Company {id}"),
        description: String::new(),
        created_at: None,
        updated_at: None,
    }
}

pub fn sample_user(id: i64) -> User {
    User {
        id,
        username: format!("user{id}"),
        password: "opaque".to_owned(),
        surname: "Usersson".to_owned(),
        name: ordinal_name(id),
        middlename: None,
        department: None,
        local_workplace: None,
        remote_workplace: None,
        phone: None,
        cellular: None,
        post: None,
        company: sample_company(1),
        company_name: String::new(),
        created_at: None,
        updated_at: None,
    }
}

pub fn sample_admin(id: i64) -> Admin {
    Admin {
        id,
        username: format!("admin{id}"),
        password: "opaque".to_owned(),
        surname: "Adminov".to_owned(),
        name: ordinal_name(id),
        middlename: None,
        department: None,
        phone: None,
        cellular: None,
        post: None,
        companies: vec![sample_company(1)],
        company_names: String::new(),
        created_at: None,
        updated_at: None,
    }
}

pub fn sample_ticket(id: i64, user_id: i64, admin_id: Option<i64>) -> Ticket {
    Ticket {
        id,
        title: format!("Ticket {id}"),
        description: String::new(),
        status: if admin_id.is_some() {
            TicketStatus::InProgress
        } else {
            TicketStatus::Pending
        },
        status_text: String::new(),
        user_id,
        user_name: String::new(),
        admin_id,
        admin_name: String::new(),
        created_at: Some(format!("2026-03-01T00:00:{:02}Z", id.rem_euclid(60))),
        updated_at: None,
    }
}

pub fn sample_message(id: i64, ticket_id: i64) -> Message {
    Message {
        id,
        text: "hello".to_owned(),
        user_id: Some(2),
        user_name: String::new(),
        admin_id: None,
        admin_name: String::new(),
        ticket_id,
        admin_connected: false,
        admin_disconnected: false,
        in_progress: false,
        solved: false,
        files: Vec::new(),
        created_at: Some("2026-03-01T00:00:00Z".to_owned()),
    }
}

/// Captures every report so tests can assert exact error surfaces.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    reported: Mutex<Vec<CoreError>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reported(&self) -> Vec<CoreError> {
        self.reported
            .lock()
            .expect("recording reporter lock poisoned")
            .clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, error: &CoreError) {
        self.reported
            .lock()
            .expect("recording reporter lock poisoned")
            .push(error.clone());
    }
}

/// Captures outbound intents in order; optionally fails every send to
/// model a closed connection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<OutboundIntent>>,
    pub fail_sends: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_sends: true,
        }
    }

    pub fn sent(&self) -> Vec<OutboundIntent> {
        self.sent
            .lock()
            .expect("recording sink lock poisoned")
            .clone()
    }
}

impl IntentSink for RecordingSink {
    fn send(&self, intent: OutboundIntent) -> Result<(), CoreError> {
        if self.fail_sends {
            return Err(CoreError::NotConnected);
        }
        self.sent
            .lock()
            .expect("recording sink lock poisoned")
            .push(intent);
        Ok(())
    }
}
