//! Packet framing: turns a packet number and a slice of payload bytes into the
//! exact sequence of bytes XMODEM puts on the wire.

use heapless::Vec;

use crate::checksum;
use crate::consts::{SOH, STX};

/// The two block sizes XMODEM and XMODEM-1K negotiate.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum BlockSize {
    /// Standard 128-byte XMODEM block, headed by SOH.
    #[default]
    Standard,
    /// XMODEM-1K 1024-byte block, headed by STX.
    OneK,
}

impl BlockSize {
    /// The payload length this block size carries, before the checksum.
    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            Self::Standard => 128,
            Self::OneK => 1024,
        }
    }

    const fn header(self) -> u8 {
        match self {
            Self::Standard => SOH,
            Self::OneK => STX,
        }
    }
}

/// The checksum scheme negotiated with the receiver.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ChecksumMode {
    /// Classic 8-bit arithmetic checksum, selected by a leading NAK.
    #[default]
    Checksum,
    /// CRC-16/XMODEM, selected by a leading 'C'.
    Crc,
}

/// The longest packet this crate ever builds: STX header (1) + seqno (2) +
/// 1024-byte payload + 2-byte CRC.
pub const MAX_PACKET_LEN: usize = 1 + 2 + 1024 + 2;

/// A framed packet ready for the wire, stack-allocated to the largest size
/// XMODEM-1K ever produces.
pub type Packet = Vec<u8, MAX_PACKET_LEN>;

/// Frames `data` into a complete XMODEM packet.
///
/// `data` must be no longer than `block_size.len()`; any shortfall is padded
/// with `padding`. The checksum in `mode` covers only the padded payload
/// region, never the header or sequence bytes.
///
/// # Panics
///
/// Panics if `data.len() > block_size.len()`, which would be a programming
/// error in the caller (the engine never slices more than a block's worth of
/// payload).
#[must_use]
pub fn build(
    packet_number: u8,
    data: &[u8],
    block_size: BlockSize,
    padding: u8,
    mode: ChecksumMode,
) -> Packet {
    assert!(
        data.len() <= block_size.len(),
        "packet data longer than the negotiated block size"
    );

    let mut packet = Packet::new();
    packet.push(block_size.header()).unwrap();
    packet.push(packet_number).unwrap();
    packet.push(255 - packet_number).unwrap();

    let payload_start = packet.len();
    packet.extend_from_slice(data).unwrap();
    packet.resize(payload_start + block_size.len(), padding).unwrap();
    let payload = &packet[payload_start..];

    match mode {
        ChecksumMode::Checksum => {
            packet.push(checksum::arithmetic(payload)).unwrap();
        }
        ChecksumMode::Crc => {
            let crc = checksum::crc16_xmodem(payload);
            let [hi, lo] = crc.to_be_bytes();
            packet.push(hi).unwrap();
            packet.push(lo).unwrap();
        }
    }

    packet
}
