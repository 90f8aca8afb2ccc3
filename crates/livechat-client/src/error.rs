//! Send rejection reasons.

use thiserror::Error;

/// Why [`crate::ChatWidget::send`] refused a message.
///
/// A rejection never changes widget state and never emits anything; frontends
/// surface it as a disabled send control.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejected {
    /// Text is empty after trimming whitespace.
    #[error("message is empty")]
    Empty,

    /// Text exceeds the length limit.
    #[error("message too long: {len} characters (limit {max})")]
    TooLong {
        /// Length of the trimmed text in characters.
        len: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// Channel is not connected.
    #[error("not connected to the chat server")]
    Disconnected,

    /// Agent widget has no customer to address.
    #[error("no conversation selected")]
    NoRecipient,
}
