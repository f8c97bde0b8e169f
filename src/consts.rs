//! Collection of protocol bytes for internal usage in `xmodem-engine`.

pub const SOH: u8 = 0x01;
pub const STX: u8 = 0x02;
pub const EOT: u8 = 0x04;
pub const ACK: u8 = 0x06;
pub const NAK: u8 = 0x15;
pub const ETB: u8 = 0x17;
pub const CAN: u8 = 0x18;
pub const CRC_CHAR: u8 = b'C';
