//! Sender-side state machine for the XMODEM, XMODEM-CRC and XMODEM-1K
//! file-transfer protocols.
//!
//! This crate is the protocol engine only: packet framing, checksum and CRC
//! computation, and the event-driven send/acknowledge/retry/cancel state
//! machine described by the XMODEM wire format. It never opens a device,
//! spawns a process, or sleeps (callers feed it receiver bytes through
//! [`Engine::receive_bytes`] and write whatever [`Outcome::Send`] returns to
//! their own transport).
//!
//! ```
//! use xmodem_engine::{Engine, Outcome, TransferOptions};
//!
//! let payload = b"Hello, world!";
//! let mut engine = Engine::new(payload, TransferOptions::default()).unwrap();
//!
//! // Receiver requests CRC mode.
//! match engine.receive_bytes(b"C") {
//!     Outcome::Send(packet) => assert_eq!(packet[0], 0x01), // SOH
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! ```
#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs, unsafe_code)]

mod checksum;
mod config;
mod consts;
mod engine;
mod error;
mod logging;
mod packet;

pub use config::{ConfigError, RecvTimeout, TransferOptions};
pub use engine::Engine;
pub use error::{EngineError, Outcome};
pub use packet::{BlockSize, ChecksumMode, Packet, MAX_PACKET_LEN};

#[doc(hidden)]
pub mod wire {
    //! Low-level building blocks, exposed for callers that want to build or
    //! verify packets without driving a full [`crate::Engine`] (fuzzing,
    //! interoperability tests against a real receiver, and the like).
    pub use crate::checksum::{arithmetic, crc16_xmodem};
    pub use crate::packet::build;
}
