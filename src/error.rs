//! The engine's runtime error taxonomy and the outcome type every call returns.

use thiserror_no_std::Error;

use crate::packet::Packet;

/// Terminal or non-terminal failure reported by the engine.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Two consecutive CAN bytes were observed; the receiver canceled the transfer.
    #[error("transfer canceled by receiver")]
    CanceledByReceiver,
    /// A NAK arrived while `retries` had already reached `max_retries`.
    #[error("maximum retries exceeded")]
    MaxRetriesExceeded,
    /// A byte was received that is not valid for the engine's current state.
    #[error("unexpected data from receiver")]
    UnexpectedData,
    /// The engine has already terminated; this call has no effect.
    #[error("no running transfer")]
    NoProcess,
    /// No receiver byte arrived before `recv_timeout` elapsed while `Sending`.
    #[error("timed out waiting for receiver")]
    Timeout,
}

/// What the caller should do in response to a single `Engine` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Write these bytes to the transport.
    Send(Packet),
    /// Nothing to transmit; this input didn't warrant a response.
    Ignore,
    /// The transfer completed successfully. Terminal.
    Done,
    /// The transfer failed. Terminal unless the error is `UnexpectedData`.
    Error(EngineError),
}

impl Outcome {
    /// Bytes to send, if this outcome is [`Outcome::Send`].
    #[must_use]
    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Send(packet) => Some(packet.as_slice()),
            _ => None,
        }
    }

    /// True if the engine has reached a terminal state after returning this outcome.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        match self {
            Self::Done => true,
            Self::Error(kind) => !matches!(kind, EngineError::UnexpectedData),
            Self::Send(_) | Self::Ignore => false,
        }
    }
}
