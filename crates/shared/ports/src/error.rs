use thiserror::Error;

/// Failure reported by a broadcast sink
///
/// The engine logs these and moves on; they never reach engine state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("Subscriber unavailable: {0}")]
    Unavailable(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

pub type SinkResult = std::result::Result<(), SinkError>;
