//! The entity joiner: pure functions that resolve foreign keys into display
//! names and recompute every derived field. Both the snapshot loader and the
//! reconcilers go through these, so the bulk path and the event path can
//! never disagree on a join.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::model::{Admin, Company, Message, Ticket, User};

/// The join context for one mounted screen: the user and admin directories
/// captured when that screen's snapshot completed. Deliberately not
/// refreshed on later events; joins performed for late-arriving events use
/// the directory as it stood at install time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directory {
    pub users: Vec<User>,
    pub admins: Vec<Admin>,
}

impl Directory {
    pub fn new(users: Vec<User>, admins: Vec<Admin>) -> Self {
        Self { users, admins }
    }

    pub fn user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn admin(&self, id: i64) -> Option<&Admin> {
        self.admins.iter().find(|admin| admin.id == id)
    }
}

/// "surname name middlename" with absent parts skipped.
pub fn full_name(surname: &str, name: &str, middlename: Option<&str>) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(3);
    for part in [surname, name, middlename.unwrap_or("")] {
        let part = part.trim();
        if !part.is_empty() {
            parts.push(part);
        }
    }
    parts.join(" ")
}

/// Resolves a user id to a display name; empty string when unresolved.
pub fn user_full_name(user_id: Option<i64>, users: &[User]) -> String {
    user_id
        .and_then(|id| users.iter().find(|user| user.id == id))
        .map(|user| full_name(&user.surname, &user.name, user.middlename.as_deref()))
        .unwrap_or_default()
}

/// Resolves an admin id to a display name; empty string when unresolved.
pub fn admin_full_name(admin_id: Option<i64>, admins: &[Admin]) -> String {
    admin_id
        .and_then(|id| admins.iter().find(|admin| admin.id == id))
        .map(|admin| full_name(&admin.surname, &admin.name, admin.middlename.as_deref()))
        .unwrap_or_default()
}

/// Comma-joined company names, preserving source array order.
pub fn company_names(companies: &[Company]) -> String {
    companies
        .iter()
        .map(|company| company.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn join_user(user: &mut User) {
    user.company_name = user.company.name.clone();
}

pub fn join_admin(admin: &mut Admin) {
    admin.company_names = company_names(&admin.companies);
}

/// Recomputes every derived field on a ticket from the directory. Joined
/// fields transmitted by the event source are overwritten, never trusted.
pub fn join_ticket(ticket: &mut Ticket, directory: &Directory) {
    ticket.status_text = ticket.status.text().to_owned();
    ticket.user_name = user_full_name(Some(ticket.user_id), &directory.users);
    ticket.admin_name = admin_full_name(ticket.admin_id, &directory.admins);
}

pub fn join_message(message: &mut Message, directory: &Directory) {
    message.user_name = user_full_name(message.user_id, &directory.users);
    message.admin_name = admin_full_name(message.admin_id, &directory.admins);
}

/// Sort key for created timestamps. Unparseable or absent values order
/// last under the newest-first sort.
pub fn created_at_sort_key(created_at: Option<&str>) -> DateTime<Utc> {
    let Some(raw) = created_at else {
        return DateTime::<Utc>::UNIX_EPOCH;
    };
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc);
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return parsed.and_utc();
    }
    DateTime::<Utc>::UNIX_EPOCH
}

/// Newest-first ordering for the ticket list. The sort is stable, so
/// tickets with equal (or unparseable) timestamps keep server order.
pub fn sort_tickets_newest_first(tickets: &mut [Ticket]) {
    tickets.sort_by(|a, b| {
        created_at_sort_key(b.created_at.as_deref())
            .cmp(&created_at_sort_key(a.created_at.as_deref()))
    });
}
