//! Player command abstraction.

use uuid::Uuid;

/// A player action addressed to a narrative session.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable name recorded as the `command` field of log records.
    fn command_type(&self) -> &'static str;

    /// Ties together every log record produced while handling one action.
    fn correlation_id(&self) -> Uuid;
}
