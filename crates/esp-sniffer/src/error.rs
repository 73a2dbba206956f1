//! Error types for sniffer buffer parsing.

use thiserror::Error;

/// Errors reported by the strict parse path.
///
/// The plain [`decode`](crate::decode) entry point folds all of these into
/// `None`; an unrecognized length is a normal outcome there, not a fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The buffer is neither a short nor a long sniffer buffer.
    #[error("Unrecognized sniffer buffer length: {got} (expected 60 or 128)")]
    UnrecognizedLength { got: usize },

    /// Fewer bytes are available than the claimed length requires.
    #[error("Insufficient data: need {needed} bytes, got {got}")]
    InsufficientData { needed: usize, got: usize },
}
