use crate::error::CoreError;

/// The client-wide error surface. Every degraded path lands here: failed
/// bulk reads, stream faults, dropped events, rejected local intents. No
/// report is ever fatal; prior state stays intact.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &CoreError);
}

/// Default reporter used by the headless app: errors become structured
/// warnings on the tracing subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, error: &CoreError) {
        tracing::warn!(error = %error, "error surfaced to operator");
    }
}
