//! End-to-end screen scenarios over a canned HTTP transport and a real
//! (unconnected) connection manager.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use helpdesk_app::{ChatScreen, ListScreen};
use helpdesk_api::{FileDownload, HttpTransport, ServiceEndpoints, SnapshotLoader};
use helpdesk_core::test_support::{
    sample_admin, sample_message, sample_ticket, sample_user, RecordingReporter,
};
use helpdesk_core::{CoreError, InboundEvent};
use helpdesk_stream::ConnectionManager;

struct CannedTransport {
    responses: HashMap<String, serde_json::Value>,
}

#[async_trait]
impl HttpTransport for CannedTransport {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, CoreError> {
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| CoreError::Transport(format!("no canned response for {url}")))
    }

    async fn get_bytes(&self, _url: &str) -> Result<FileDownload, CoreError> {
        Err(CoreError::Transport("not used by these scenarios".to_owned()))
    }
}

fn endpoints() -> ServiceEndpoints {
    ServiceEndpoints::new(
        "https://auth.test",
        "https://tickets.test",
        "https://files.test",
    )
}

fn loader(responses: HashMap<String, serde_json::Value>) -> SnapshotLoader {
    SnapshotLoader::new(Arc::new(CannedTransport { responses }), endpoints())
}

fn connection() -> (Arc<ConnectionManager>, Arc<RecordingReporter>) {
    let reporter = Arc::new(RecordingReporter::new());
    (
        Arc::new(ConnectionManager::new(reporter.clone())),
        reporter,
    )
}

fn directory_responses() -> HashMap<String, serde_json::Value> {
    let endpoints = endpoints();
    let mut responses = HashMap::new();
    responses.insert(
        endpoints.users(),
        json!([sample_user(1), sample_user(2), sample_user(3)]),
    );
    responses.insert(endpoints.admins(), json!([sample_admin(4), sample_admin(5)]));
    responses
}

fn chat_responses(ticket_id: i64) -> HashMap<String, serde_json::Value> {
    let endpoints = endpoints();
    let mut responses = directory_responses();
    responses.insert(endpoints.own_profile(), json!(sample_admin(4)));
    responses.insert(
        endpoints.ticket(ticket_id),
        json!(sample_ticket(ticket_id, 2, None)),
    );
    responses.insert(endpoints.ticket_files(ticket_id), json!([]));
    responses.insert(
        endpoints.ticket_messages(ticket_id),
        json!([sample_message(1, ticket_id)]),
    );
    responses
}

#[tokio::test]
async fn list_screen_loads_sorted_then_reconciles_a_close() {
    let mut responses = directory_responses();
    responses.insert(
        endpoints().tickets(),
        json!([
            sample_ticket(1, 1, None),
            sample_ticket(3, 2, Some(4)),
            sample_ticket(5, 3, None),
            sample_ticket(2, 1, None),
            sample_ticket(4, 2, None),
        ]),
    );
    let (connection, _) = connection();

    let mut screen = ListScreen::mount(&loader(responses), &connection)
        .await
        .expect("list should mount");

    let ids: Vec<i64> = screen.tickets().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![5, 4, 3, 2, 1]);

    screen.apply(InboundEvent::CloseTicket(sample_ticket(3, 2, Some(4))));

    let ids: Vec<i64> = screen.tickets().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![5, 4, 2, 1]);

    screen.unmount(&connection);
}

#[tokio::test]
async fn failed_list_mount_is_reported_exactly_once() {
    // Directory present, tickets endpoint missing.
    let responses = directory_responses();
    let (connection, reporter) = connection();

    let err = ListScreen::mount(&loader(responses), &connection)
        .await
        .err()
        .expect("mount must fail");
    assert!(matches!(err, CoreError::Transport(_)), "got {err:?}");

    let reported = reporter.reported();
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0], err);
}

#[tokio::test]
async fn chat_screen_appends_live_messages_for_its_ticket_only() {
    let (connection, _) = connection();

    let mut screen = ChatScreen::mount(&loader(chat_responses(7)), &connection, 7)
        .await
        .expect("chat should mount");
    assert_eq!(screen.messages().len(), 1);

    screen.apply(InboundEvent::SendMessage(sample_message(2, 7)));
    screen.apply(InboundEvent::SendMessage(sample_message(3, 8)));

    assert_eq!(screen.messages().len(), 2);
    assert_eq!(screen.messages()[1].user_name, "Usersson Two");

    screen.unmount(&connection);
}

#[tokio::test]
async fn rejected_intents_each_produce_exactly_one_report() {
    let (connection, reporter) = connection();

    let screen = ChatScreen::mount(&loader(chat_responses(7)), &connection, 7)
        .await
        .expect("chat should mount");
    assert!(reporter.reported().is_empty());

    // Blank text fails the local precondition before any send.
    assert_eq!(
        screen.send_message("   "),
        Err(CoreError::MessageTextRequired)
    );
    assert_eq!(reporter.reported(), vec![CoreError::MessageTextRequired]);

    // Non-blank text passes the precondition and reaches the (closed)
    // stream; that failure lands on the surface too.
    assert_eq!(screen.send_message("hello"), Err(CoreError::NotConnected));
    assert_eq!(
        reporter.reported(),
        vec![CoreError::MessageTextRequired, CoreError::NotConnected]
    );

    // A release against the closed stream surfaces one report even
    // though both intents were attempted.
    assert_eq!(screen.release(), Err(CoreError::NotConnected));
    assert_eq!(reporter.reported().len(), 3);
}

#[tokio::test]
async fn foreign_claim_rejection_is_reported_without_sending() {
    let endpoints = endpoints();
    let mut responses = chat_responses(7);
    // Ticket already claimed by another admin; profile is admin 4.
    responses.insert(endpoints.ticket(7), json!(sample_ticket(7, 2, Some(5))));
    let (connection, reporter) = connection();

    let screen = ChatScreen::mount(&loader(responses), &connection, 7)
        .await
        .expect("chat should mount");

    assert_eq!(screen.send_message("hello"), Err(CoreError::AccessDenied));
    assert_eq!(reporter.reported(), vec![CoreError::AccessDenied]);
}
