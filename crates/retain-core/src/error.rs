//! Error types for the scheduling core
//!
//! The core is pure computation over well-typed inputs, so the error surface
//! is deliberately narrow: bad arguments and card state this engine could
//! never have produced. There are no retries or partial failures here;
//! callers own the I/O and its error handling.

/// Scheduling error
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// Invalid argument at the API boundary
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Card state this engine never produces (e.g. negative interval)
    #[error("Corrupt card state: {0}")]
    CorruptState(String),
}

/// Scheduling result type
pub type Result<T> = std::result::Result<T, ScheduleError>;
