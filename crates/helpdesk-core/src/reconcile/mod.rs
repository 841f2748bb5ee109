//! Incremental reconciliation of live events into snapshot state.
//!
//! A reconciler owns the state behind one screen. It is handed every
//! decoded [`InboundEvent`](crate::events::InboundEvent) from the stream
//! and folds the relevant ones into its view, leaving the rest alone.

mod chat;
mod list;

pub use chat::ChatReconciler;
pub use list::ListReconciler;
