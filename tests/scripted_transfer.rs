//! End-to-end scripted transfers: a tiny in-process "receiver" drives an
//! `Engine` to completion and the reconstructed payload is checked against
//! what went in, mirroring the scenarios in the design documentation.

use rstest::rstest;
use xmodem_engine::{BlockSize, ChecksumMode, Engine, EngineError, Outcome, RecvTimeout, TransferOptions};

/// Strips a trailing run of `padding` from a payload reconstructed out of
/// fixed-size packets, the same way a real receiver would before handing the
/// file back to its caller.
fn strip_padding(mut data: Vec<u8>, padding: u8) -> Vec<u8> {
    while data.last() == Some(&padding) {
        data.pop();
    }
    data
}

/// Drives `engine` through a full transfer using `mode_byte` to select the
/// checksum mode, collecting every packet's payload region along the way.
/// Returns the reconstructed data (before padding is stripped).
fn run_to_completion(engine: &mut Engine<'_>, mode_byte: u8, checksum_len: usize) -> Vec<u8> {
    let mut reconstructed = Vec::new();

    let first = engine.receive_bytes(&[mode_byte]);
    let mut packet = first.bytes().expect("first outcome must be a packet").to_vec();

    loop {
        let payload_region = &packet[3..packet.len() - checksum_len];
        reconstructed.extend_from_slice(payload_region);

        match engine.receive_bytes(&[0x06 /* ACK */]) {
            Outcome::Send(next) if next.len() == 1 && next[0] == 0x04 => {
                // EOT
                match engine.receive_bytes(&[0x06]) {
                    Outcome::Send(etb) => assert_eq!(etb.as_slice(), &[0x17]),
                    other => panic!("expected ETB, got {other:?}"),
                }
                match engine.receive_bytes(&[0x06]) {
                    Outcome::Done => break,
                    other => panic!("expected Done, got {other:?}"),
                }
            }
            Outcome::Send(next) => packet = next.to_vec(),
            other => panic!("unexpected outcome mid-transfer: {other:?}"),
        }
    }

    reconstructed
}

#[rstest]
#[case::checksum_standard(b'\x15', BlockSize::Standard, ChecksumMode::Checksum, 1)]
#[case::crc_standard(b'C', BlockSize::Standard, ChecksumMode::Crc, 2)]
#[case::crc_1k(b'C', BlockSize::OneK, ChecksumMode::Crc, 2)]
fn round_trip_reconstructs_payload(
    #[case] mode_byte: u8,
    #[case] block_size: BlockSize,
    #[case] _mode: ChecksumMode,
    #[case] checksum_len: usize,
) {
    let payload: Vec<u8> = (0u32..5000).map(|b| (b % 251) as u8).collect();
    let options = TransferOptions {
        block_size,
        ..TransferOptions::default()
    };
    let mut engine = Engine::new(&payload, options).unwrap();

    let reconstructed = run_to_completion(&mut engine, mode_byte, checksum_len);
    let trimmed = strip_padding(reconstructed, 0x1A);
    assert_eq!(trimmed, payload);
}

#[test]
fn single_byte_payload_round_trips() {
    let payload = b"x";
    let mut engine = Engine::new(payload, TransferOptions::default()).unwrap();
    let reconstructed = run_to_completion(&mut engine, b'C', 2);
    assert_eq!(strip_padding(reconstructed, 0x1A), payload);
}

#[test]
fn payload_exact_multiple_of_block_size_round_trips() {
    let payload = vec![0x7Eu8; 256];
    let options = TransferOptions {
        padding: 0x00,
        ..TransferOptions::default()
    };
    let mut engine = Engine::new(&payload, options).unwrap();
    let reconstructed = run_to_completion(&mut engine, b'C', 2);
    assert_eq!(reconstructed, payload);
}

#[test]
fn transfer_spanning_more_than_255_packets_completes() {
    let payload = vec![0xAAu8; 128 * 260];
    let mut engine = Engine::new(&payload, TransferOptions::default()).unwrap();
    let reconstructed = run_to_completion(&mut engine, b'C', 2);
    assert_eq!(strip_padding(reconstructed, 0x1A), payload);
    assert_eq!(engine.progress(), Err(EngineError::NoProcess));
}

#[test]
fn happy_path_hello_world_checksum_bytes_match_scenario() {
    let payload = b"Hello, world!";
    let mut engine = Engine::new(payload, TransferOptions::default()).unwrap();

    let outcome = engine.receive_bytes(&[0x15 /* NAK selects checksum mode */]);
    let packet = outcome.bytes().unwrap();

    assert_eq!(packet[0], 0x01); // SOH
    assert_eq!(packet[1], 0x01);
    assert_eq!(packet[2], 0xFE);
    assert_eq!(&packet[3..16], payload);
    assert!(packet[16..131].iter().all(|&b| b == 0x1A));
    assert_eq!(*packet.last().unwrap(), 0x37);
}

#[test]
fn happy_path_hello_world_crc_bytes_match_scenario() {
    let payload = b"Hello, world!";
    let mut engine = Engine::new(payload, TransferOptions::default()).unwrap();

    let outcome = engine.receive_bytes(b"C");
    let packet = outcome.bytes().unwrap();

    let crc = u16::from_be_bytes([packet[packet.len() - 2], packet[packet.len() - 1]]);
    assert_eq!(crc, 0x74A3);
}

#[test]
fn nak_bounded_retries_then_max_retries_exceeded() {
    let payload = b"short";
    let options = TransferOptions {
        max_retries: 2,
        ..TransferOptions::default()
    };
    let mut engine = Engine::new(payload, options).unwrap();

    assert!(matches!(engine.receive_bytes(b"C"), Outcome::Send(_)));
    assert!(matches!(engine.receive_bytes(&[0x15]), Outcome::Send(_)));
    assert!(matches!(engine.receive_bytes(&[0x15]), Outcome::Send(_)));
    assert_eq!(
        engine.receive_bytes(&[0x15]),
        Outcome::Error(EngineError::MaxRetriesExceeded)
    );
}

#[test]
fn receiver_initiated_cancel_terminates_transfer() {
    let payload = b"short";
    let mut engine = Engine::new(payload, TransferOptions::default()).unwrap();

    assert!(matches!(engine.receive_bytes(b"C"), Outcome::Send(_)));
    assert_eq!(engine.receive_bytes(&[0x18]), Outcome::Ignore);
    assert_eq!(
        engine.receive_bytes(&[0x18]),
        Outcome::Error(EngineError::CanceledByReceiver)
    );
    assert_eq!(engine.progress(), Err(EngineError::NoProcess));
}

#[test]
fn sender_initiated_cancel_emits_two_can_bytes_and_terminates() {
    let payload = b"short";
    let mut engine = Engine::new(payload, TransferOptions::default()).unwrap();

    assert!(matches!(engine.receive_bytes(b"C"), Outcome::Send(_)));
    let cancel = engine.cancel();
    assert_eq!(cancel.bytes(), Some(&[0x18, 0x18][..]));
    assert_eq!(engine.receive_bytes(&[0x06]), Outcome::Error(EngineError::NoProcess));
}

#[test]
fn timeout_with_no_intervening_bytes_terminates_transfer() {
    let payload = b"short";
    let options = TransferOptions {
        recv_timeout: RecvTimeout::Millis(2_000),
        ..TransferOptions::default()
    };
    let mut engine = Engine::new(payload, options).unwrap();

    assert!(matches!(engine.receive_bytes(b"C"), Outcome::Send(_)));
    let epoch = engine.timer_epoch();
    assert_eq!(
        engine.notify_timeout(epoch, 2_000),
        Outcome::Error(EngineError::Timeout)
    );
}
