/// Destination for messages emitted by the `log` helper.
///
/// Implementations must tolerate concurrent writers when renders share a
/// sink across threads.
pub trait DiagnosticSink: Send + Sync {
    fn log(&self, message: &str);
}

/// Forwards to `tracing` at `info` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log(&self, message: &str) {
        tracing::info!(target: "block_helpers::log", "{message}");
    }
}

/// Drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn log(&self, _message: &str) {}
}
