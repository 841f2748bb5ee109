//! One authenticated WebSocket shared by every screen.
//!
//! The manager owns the socket, splits it into reader and writer tasks,
//! and fans decoded events into a single subscriber slot. Screens come
//! and go; the connection lives for the whole session and only
//! [`ConnectionManager::close`] tears it down.

mod manager;

pub use manager::{ConnectionManager, Subscription};
