//! Core synchronization model for the helpdesk messenger client: entities,
//! event envelopes, the entity joiner, both reconcilers, and the ticket
//! lifecycle controller. No I/O lives here.

pub mod error;
pub mod events;
pub mod join;
pub mod lifecycle;
pub mod model;
pub mod reconcile;
pub mod report;
pub mod status;
pub mod test_support;

pub use error::CoreError;
pub use events::{InboundEvent, OutboundIntent};
pub use join::Directory;
pub use lifecycle::{IntentSink, LifecycleController};
pub use model::{Admin, Company, Message, MessageFile, MessageKind, Ticket, TicketFile, User};
pub use reconcile::{ChatReconciler, ListReconciler};
pub use report::ErrorReporter;
pub use status::TicketStatus;
