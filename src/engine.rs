//! The sender-side protocol engine: a single-threaded, event-driven state
//! machine that turns receiver bytes into outgoing packets.

use crate::config::{ConfigError, RecvTimeout, TransferOptions};
use crate::consts::{ACK, CAN, CRC_CHAR, EOT, ETB, NAK};
use crate::error::{EngineError, Outcome};
use crate::logging::{debug, error, warn};
use crate::packet::{self, BlockSize, ChecksumMode, Packet};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum State {
    Init,
    Sending,
    SentEot,
    SentEtb,
    Terminated,
}

/// Sender-side XMODEM state machine.
///
/// The engine borrows its payload rather than copying it, so driving a
/// transfer never allocates: every outgoing packet is a fixed-capacity
/// [`Packet`]. It never touches a transport or a clock. Bytes come in
/// through [`Engine::receive_bytes`] and bytes go out through the returned
/// [`Outcome`]; the owning task is responsible for wall-clock time (see
/// [`Engine::notify_timeout`]).
#[derive(Debug)]
pub struct Engine<'a> {
    payload: &'a [u8],
    block_size: BlockSize,
    padding: u8,
    max_retries: u32,
    recv_timeout: RecvTimeout,

    state: State,
    position: usize,
    packet_number: u8,
    sent_packets: u32,
    total_packets: u32,
    retries: u32,
    cancels: u32,
    checksum_mode: Option<ChecksumMode>,
    timer_epoch: u64,
}

impl<'a> Engine<'a> {
    /// Creates a new engine over `payload` with the given `options`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyPayload`] if `payload` is empty; there is
    /// no packet to negotiate a checksum mode over.
    pub fn new(payload: &'a [u8], options: TransferOptions) -> Result<Self, ConfigError> {
        if payload.is_empty() {
            return Err(ConfigError::EmptyPayload);
        }

        let block_len = options.block_size.len();
        let total_packets = ((payload.len() + block_len - 1) / block_len) as u32;

        Ok(Self {
            payload,
            block_size: options.block_size,
            padding: options.padding,
            max_retries: options.max_retries,
            recv_timeout: options.recv_timeout,
            state: State::Init,
            position: 0,
            packet_number: 1,
            sent_packets: 0,
            total_packets,
            retries: 0,
            cancels: 0,
            checksum_mode: None,
            timer_epoch: 0,
        })
    }

    /// Feeds bytes read from the receiver to the engine and returns what the
    /// caller should do next.
    ///
    /// Only the first byte of `bytes` drives an ordinary transition; trailing
    /// bytes are discarded, matching real XMODEM signaling. The CAN rule is
    /// the exception: a leading run of CAN bytes is folded into the
    /// persistent cancel counter one byte at a time, whether that run arrives
    /// in one call or is split across several.
    pub fn receive_bytes(&mut self, bytes: &[u8]) -> Outcome {
        if self.state == State::Terminated {
            return Outcome::Error(EngineError::NoProcess);
        }
        if bytes.is_empty() {
            warn!("empty input chunk from receiver");
            return Outcome::Error(EngineError::UnexpectedData);
        }

        let mut idx = 0;
        while idx < bytes.len() && bytes[idx] == CAN {
            self.cancels += 1;
            warn!("CAN received");
            if self.cancels >= 2 {
                error!("canceled by receiver");
                self.state = State::Terminated;
                return Outcome::Error(EngineError::CanceledByReceiver);
            }
            idx += 1;
        }
        if idx == bytes.len() {
            return Outcome::Ignore;
        }
        self.cancels = 0;

        let event = bytes[idx];
        match self.state {
            State::Init => self.on_init(event),
            State::Sending => self.on_sending(event),
            State::SentEot => self.on_sent_eot(event),
            State::SentEtb => self.on_sent_etb(event),
            State::Terminated => Outcome::Error(EngineError::NoProcess),
        }
    }

    /// Terminates the engine and returns the two-CAN cancel sequence to send.
    ///
    /// Idempotent: calling this on an already-terminated engine returns
    /// [`Outcome::Ignore`] rather than re-sending the cancel sequence.
    pub fn cancel(&mut self) -> Outcome {
        if self.state == State::Terminated {
            return Outcome::Ignore;
        }
        warn!("transfer canceled by caller");
        self.state = State::Terminated;
        let mut packet = Packet::new();
        packet.push(CAN).unwrap();
        packet.push(CAN).unwrap();
        Outcome::Send(packet)
    }

    /// Cooperative shutdown: no bytes are sent. Idempotent.
    pub fn stop(&mut self) -> Outcome {
        if self.state != State::Terminated {
            debug!("engine stopped cooperatively");
        }
        self.state = State::Terminated;
        Outcome::Ignore
    }

    /// Reports `(sent_packets, total_packets)`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoProcess`] once the engine has terminated.
    pub fn progress(&self) -> Result<(u32, u32), EngineError> {
        if self.state == State::Terminated {
            Err(EngineError::NoProcess)
        } else {
            Ok((self.sent_packets, self.total_packets))
        }
    }

    /// The current timer epoch, bumped every time the engine (re-)enters
    /// `Sending`. The owning task should capture this when it starts its
    /// timer and hand it back to [`Engine::notify_timeout`], so a timer that
    /// fires after a race with an ACK (which rearmed the timer under it)
    /// is recognized as stale instead of spuriously expiring the new one.
    #[must_use]
    pub const fn timer_epoch(&self) -> u64 {
        self.timer_epoch
    }

    /// Notifies the engine that `elapsed_ms` have passed since timer `epoch`
    /// was armed. The engine has no clock of its own; the owning task is
    /// expected to call this when its own timer fires, passing back the
    /// epoch it captured from [`Engine::timer_epoch`] at arm time.
    ///
    /// A no-op unless the engine is still `Sending` on that same epoch with a
    /// timeout configured and `elapsed_ms` has reached it. An old epoch means
    /// the timer this call refers to was already superseded by a fresh arm,
    /// and is ignored.
    pub fn notify_timeout(&mut self, epoch: u64, elapsed_ms: u64) -> Outcome {
        if self.state != State::Sending || epoch != self.timer_epoch {
            return Outcome::Ignore;
        }
        match self.recv_timeout {
            RecvTimeout::Disabled => Outcome::Ignore,
            RecvTimeout::Millis(limit) if elapsed_ms >= limit => {
                error!("receive timeout after {}ms", elapsed_ms);
                self.state = State::Terminated;
                Outcome::Error(EngineError::Timeout)
            }
            RecvTimeout::Millis(_) => Outcome::Ignore,
        }
    }

    fn on_init(&mut self, event: u8) -> Outcome {
        match event {
            NAK => {
                self.checksum_mode = Some(ChecksumMode::Checksum);
                self.begin_transfer()
            }
            CRC_CHAR => {
                self.checksum_mode = Some(ChecksumMode::Crc);
                self.begin_transfer()
            }
            _ => {
                warn!("unexpected byte {:#04x} while waiting for mode selection", event);
                Outcome::Error(EngineError::UnexpectedData)
            }
        }
    }

    fn begin_transfer(&mut self) -> Outcome {
        self.enter_sending();
        self.sent_packets = 1;
        debug!("mode selected, sending packet 1/{}", self.total_packets);
        Outcome::Send(self.current_packet())
    }

    fn on_sending(&mut self, event: u8) -> Outcome {
        match event {
            CRC_CHAR => Outcome::Ignore,
            ACK if self.is_last_packet() => {
                debug!("final packet acked, sending EOT");
                self.retries = 0;
                self.state = State::SentEot;
                Outcome::Send(single_byte(EOT))
            }
            ACK => {
                self.position += self.block_size.len();
                self.packet_number = self.packet_number.wrapping_add(1);
                self.sent_packets += 1;
                self.enter_sending();
                debug!("packet acked, sending {}/{}", self.sent_packets, self.total_packets);
                Outcome::Send(self.current_packet())
            }
            NAK if self.retries >= self.max_retries => {
                error!("max retries ({}) exceeded", self.max_retries);
                self.state = State::Terminated;
                Outcome::Error(EngineError::MaxRetriesExceeded)
            }
            NAK => {
                self.retries += 1;
                warn!("NAK received, retry {}/{}", self.retries, self.max_retries);
                Outcome::Send(self.current_packet())
            }
            _ => {
                warn!("unexpected byte {:#04x} while sending", event);
                Outcome::Error(EngineError::UnexpectedData)
            }
        }
    }

    fn on_sent_eot(&mut self, event: u8) -> Outcome {
        match event {
            CRC_CHAR => Outcome::Ignore,
            ACK => {
                debug!("EOT acked, sending ETB");
                self.state = State::SentEtb;
                Outcome::Send(single_byte(ETB))
            }
            _ => {
                warn!("unexpected byte {:#04x} after EOT", event);
                Outcome::Error(EngineError::UnexpectedData)
            }
        }
    }

    fn on_sent_etb(&mut self, event: u8) -> Outcome {
        match event {
            CRC_CHAR => Outcome::Ignore,
            ACK => {
                debug!("ETB acked, transfer complete");
                self.state = State::Terminated;
                Outcome::Done
            }
            _ => {
                warn!("unexpected byte {:#04x} after ETB", event);
                Outcome::Error(EngineError::UnexpectedData)
            }
        }
    }

    fn enter_sending(&mut self) {
        self.retries = 0;
        self.cancels = 0;
        self.state = State::Sending;
        self.timer_epoch += 1;
    }

    fn is_last_packet(&self) -> bool {
        self.position + self.block_size.len() >= self.payload.len()
    }

    fn current_packet(&self) -> Packet {
        let end = core::cmp::min(self.position + self.block_size.len(), self.payload.len());
        let data = &self.payload[self.position..end];
        let mode = self.checksum_mode.expect("checksum mode is set before the first packet");
        packet::build(self.packet_number, data, self.block_size, self.padding, mode)
    }
}

fn single_byte(byte: u8) -> Packet {
    let mut packet = Packet::new();
    packet.push(byte).unwrap();
    packet
}
