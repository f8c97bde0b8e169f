//! Validated transfer configuration.

use thiserror_no_std::Error;

use crate::packet::BlockSize;

/// The receive-timeout policy applied while the engine is in the `Sending` state.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RecvTimeout {
    /// No inactivity timer; the engine waits indefinitely for receiver bytes.
    Disabled,
    /// Terminate with `EngineError::Timeout` after this many milliseconds of
    /// inactivity while `Sending`.
    Millis(u64),
}

impl Default for RecvTimeout {
    fn default() -> Self {
        Self::Millis(5_000)
    }
}

/// Options accepted by [`crate::Engine::new`].
///
/// All fields have XMODEM-sane defaults; only `payload` is required.
#[derive(Debug, Clone)]
pub struct TransferOptions {
    /// 128-byte (standard) or 1024-byte (XMODEM-1K) blocks. Default: standard.
    pub block_size: BlockSize,
    /// Fill byte for the final, possibly short, packet. Default: 0x1A (SUB).
    pub padding: u8,
    /// Consecutive NAKs tolerated per packet before aborting. Default: 2.
    pub max_retries: u32,
    /// Inactivity timer armed while `Sending`. Default: 5000ms.
    pub recv_timeout: RecvTimeout,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            block_size: BlockSize::Standard,
            padding: 0x1A,
            max_retries: 2,
            recv_timeout: RecvTimeout::default(),
        }
    }
}

/// Errors that can occur constructing a [`crate::Engine`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The payload was empty; there is nothing to negotiate a transfer over.
    #[error("payload must not be empty")]
    EmptyPayload,
}
