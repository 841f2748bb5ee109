//! Screen bindings: each binding owns a snapshot-seeded reconciler and
//! the receive slot for live events.
//!
//! Mounting loads the snapshot first and only then installs the
//! subscriber, so a screen never reconciles an event against state it
//! has not loaded yet. Tearing a screen down releases its receive slot
//! through the handle, which a later subscriber's slot survives. A
//! mount abandoned mid-snapshot (its future dropped) never subscribes
//! at all, so late results cannot reach a dead screen.
//!
//! Every failure a screen produces, a failed snapshot load or a
//! rejected lifecycle intent, goes to the connection's error surface
//! exactly once before it is returned to the caller.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use helpdesk_api::SnapshotLoader;
use helpdesk_core::model::{Message, Ticket, TicketFile};
use helpdesk_core::{
    ChatReconciler, CoreError, ErrorReporter, InboundEvent, LifecycleController, ListReconciler,
    TicketStatus,
};
use helpdesk_stream::{ConnectionManager, Subscription};

const EVENT_QUEUE_CAPACITY: usize = 64;

fn surface<T>(reporter: &dyn ErrorReporter, result: Result<T, CoreError>) -> Result<T, CoreError> {
    if let Err(error) = &result {
        reporter.report(error);
    }
    result
}

/// The ticket-list screen: every open ticket, newest first.
pub struct ListScreen {
    reconciler: ListReconciler,
    events: mpsc::Receiver<InboundEvent>,
    subscription: Subscription,
}

impl ListScreen {
    pub async fn mount(
        loader: &SnapshotLoader,
        connection: &ConnectionManager,
    ) -> Result<Self, CoreError> {
        let reporter = connection.reporter();
        let snapshot = surface(reporter.as_ref(), loader.load_list().await)?;
        let (events_tx, events) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        let subscription = connection.subscribe("ticket-list", events_tx);
        info!(tickets = snapshot.tickets.len(), "ticket list mounted");

        Ok(Self {
            reconciler: ListReconciler::new(snapshot.directory, snapshot.tickets),
            events,
            subscription,
        })
    }

    /// Waits for the next live event. `None` once the connection's
    /// reader is gone.
    pub async fn recv(&mut self) -> Option<InboundEvent> {
        self.events.recv().await
    }

    pub fn apply(&mut self, event: InboundEvent) {
        self.reconciler.apply(event);
    }

    pub fn tickets(&self) -> &[Ticket] {
        self.reconciler.tickets()
    }

    pub fn unmount(self, connection: &ConnectionManager) {
        connection.unsubscribe(&self.subscription);
    }
}

/// One mounted conversation plus the lifecycle actions it can take.
pub struct ChatScreen {
    reconciler: ChatReconciler,
    controller: LifecycleController,
    reporter: Arc<dyn ErrorReporter>,
    files: Vec<TicketFile>,
    events: mpsc::Receiver<InboundEvent>,
    subscription: Subscription,
}

impl ChatScreen {
    pub async fn mount(
        loader: &SnapshotLoader,
        connection: &Arc<ConnectionManager>,
        ticket_id: i64,
    ) -> Result<Self, CoreError> {
        let reporter = connection.reporter();
        let snapshot = surface(reporter.as_ref(), loader.load_chat(ticket_id).await)?;
        let (events_tx, events) = mpsc::channel(EVENT_QUEUE_CAPACITY);
        let subscription = connection.subscribe("chat", events_tx);
        let controller = LifecycleController::new(connection.clone(), snapshot.profile.id);
        info!(
            ticket_id,
            messages = snapshot.messages.len(),
            "chat mounted"
        );

        Ok(Self {
            reconciler: ChatReconciler::new(snapshot.directory, snapshot.ticket, snapshot.messages),
            controller,
            reporter,
            files: snapshot.files,
            events,
            subscription,
        })
    }

    pub async fn recv(&mut self) -> Option<InboundEvent> {
        self.events.recv().await
    }

    pub fn apply(&mut self, event: InboundEvent) {
        self.reconciler.apply(event);
    }

    pub fn ticket(&self) -> &Ticket {
        self.reconciler.ticket()
    }

    pub fn messages(&self) -> &[Message] {
        self.reconciler.messages()
    }

    pub fn files(&self) -> &[TicketFile] {
        &self.files
    }

    pub fn claim(&self) -> Result<(), CoreError> {
        let result = self.controller.claim(self.ticket().id);
        surface(self.reporter.as_ref(), result)
    }

    pub fn release(&self) -> Result<(), CoreError> {
        let result = self.controller.release(self.ticket().id);
        surface(self.reporter.as_ref(), result)
    }

    pub fn set_status(&self, status: TicketStatus) -> Result<(), CoreError> {
        let result = self.controller.set_status(self.ticket().id, status);
        surface(self.reporter.as_ref(), result)
    }

    pub fn send_message(&self, text: &str) -> Result<(), CoreError> {
        let result = self.controller.send_message(self.ticket(), text);
        surface(self.reporter.as_ref(), result)
    }

    pub fn unmount(self, connection: &ConnectionManager) {
        connection.unsubscribe(&self.subscription);
    }
}
