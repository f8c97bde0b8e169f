//! Pure checksum and CRC functions used to frame and verify XMODEM packets.

/// Computes the classic XMODEM 8-bit arithmetic checksum: `sum(data) mod 256`.
#[must_use]
pub fn arithmetic(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |acc, &byte| acc.wrapping_add(byte))
}

/// Computes CRC-16/XMODEM (poly 0x1021, init 0x0000, no reflection, no final XOR).
#[must_use]
pub fn crc16_xmodem(data: &[u8]) -> u16 {
    crc16::State::<crc16::XMODEM>::calculate(data)
}
