//! Bulk-read HTTP client: service endpoints, an injectable transport,
//! and the atomic per-screen snapshot loader.

pub mod endpoints;
pub mod snapshot;
pub mod transport;

pub use endpoints::ServiceEndpoints;
pub use snapshot::{ChatSnapshot, ListSnapshot, SnapshotLoader};
pub use transport::{FileDownload, HttpTransport, ReqwestHttpTransport};
