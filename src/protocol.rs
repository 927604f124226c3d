use crate::base::{Error, Frame, Result};
use crate::checksum::Checksum;
use log::trace;

/// First header byte of every SDM15 frame.
pub const SDM15_HEADER_1: u8 = 0xAA;

/// Second header byte of every SDM15 frame.
pub const SDM15_HEADER_2: u8 = 0x55;

/// Smallest possible frame: two header bytes, opcode, length byte, checksum.
const SDM15_MIN_FRAME_SIZE: usize = 5;

/// Offset of the payload length byte within a frame.
const SDM15_LENGTH_OFFSET: usize = 3;

/// Offset of the first payload byte within a frame.
const SDM15_PAYLOAD_OFFSET: usize = 4;

/// The implementation of the SDM15 host communication protocol.
///
/// This struct handles encoding commands (`Frame` -> bytes) and decoding
/// responses (bytes -> `Frame`) according to the SDM15 serial communication
/// protocol. Both directions use the same framing:
/// `[0xAA, 0x55, opcode, len, payload.., checksum]`, where the checksum is
/// the least-significant byte of the sum of every preceding byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sdm15Protocol;

impl Sdm15Protocol {
    /// Creates a new `Sdm15Protocol` instance.
    pub fn new() -> Sdm15Protocol {
        Sdm15Protocol
    }

    /// Encodes a frame into its wire representation.
    pub fn encode(&self, frame: &Frame) -> Vec<u8> {
        trace!(
            "Encoding frame: cmd={:02X}, payload_len={}",
            frame.cmd,
            frame.payload.len()
        );
        let mut bytes = Vec::with_capacity(SDM15_MIN_FRAME_SIZE + frame.payload.len());
        bytes.push(SDM15_HEADER_1);
        bytes.push(SDM15_HEADER_2);
        bytes.push(frame.cmd);
        bytes.push(frame.payload.len() as u8);
        bytes.extend_from_slice(&frame.payload);

        let mut checksum = Checksum::new();
        checksum.push_slice(&bytes);
        bytes.push(checksum.checksum());

        trace!("Encoded {} bytes: {:02X?}", bytes.len(), bytes);
        bytes
    }

    /// Decodes one received burst as a single frame, verifying the header,
    /// declared payload length, and checksum.
    ///
    /// A checksum mismatch is a first-class error: a corrupt frame is never
    /// returned to the caller.
    pub fn decode(&self, raw: &[u8]) -> Result<Frame> {
        trace!("Decoding {} raw bytes", raw.len());
        if raw.len() < SDM15_MIN_FRAME_SIZE {
            return Err(Error::MalformedFrame {
                description: format!(
                    "frame too short: {} bytes, need at least {}",
                    raw.len(),
                    SDM15_MIN_FRAME_SIZE
                ),
            });
        }

        if raw[0] != SDM15_HEADER_1 || raw[1] != SDM15_HEADER_2 {
            return Err(Error::MalformedFrame {
                description: format!("invalid header bytes: {:02X} {:02X}", raw[0], raw[1]),
            });
        }

        let payload_len = raw[SDM15_LENGTH_OFFSET] as usize;
        if raw.len() < SDM15_MIN_FRAME_SIZE + payload_len {
            return Err(Error::MalformedFrame {
                description: format!(
                    "truncated payload: declared {} bytes, frame holds {}",
                    payload_len,
                    raw.len() - SDM15_MIN_FRAME_SIZE
                ),
            });
        }

        let mut checksum = Checksum::new();
        checksum.push_slice(&raw[..raw.len() - 1]);
        let expected = checksum.checksum();
        let actual = raw[raw.len() - 1];
        if expected != actual {
            return Err(Error::ChecksumMismatch { expected, actual });
        }

        let payload = &raw[SDM15_PAYLOAD_OFFSET..SDM15_PAYLOAD_OFFSET + payload_len];
        Ok(Frame::from_raw(raw[2], payload))
    }
}

#[cfg(test)]
mod tests {
    use super::Sdm15Protocol;
    use crate::base::{Error, Frame};
    use crate::cmds::Command;

    #[test]
    fn encode_known_frames() {
        let protocol = Sdm15Protocol::new();

        assert_eq!(
            protocol.encode(&Frame::new(Command::StartScan)).as_slice(),
            [0xAA, 0x55, 0x60, 0x00, 0x5F]
        );

        assert_eq!(
            protocol.encode(&Frame::new(Command::StopScan)).as_slice(),
            [0xAA, 0x55, 0x61, 0x00, 0x60]
        );

        assert_eq!(
            protocol
                .encode(&Frame::with_payload(Command::SetOutputFreq, &[0x03]))
                .as_slice(),
            [0xAA, 0x55, 0x64, 0x01, 0x03, 0x67]
        );
    }

    #[test]
    fn decode_round_trips_payload() {
        let protocol = Sdm15Protocol::new();
        let payloads: [&[u8]; 4] = [&[], &[0x01], &[0x10, 0x01, 0x32, 0x00], &[0xFF; 32]];

        for payload in payloads {
            let frame = Frame::with_payload(Command::SelfTest, payload);
            let decoded = protocol.decode(&protocol.encode(&frame)).unwrap();
            assert_eq!(decoded.cmd, Command::SelfTest.opcode());
            assert_eq!(decoded.payload.as_slice(), payload);
        }
    }

    #[test]
    fn decode_rejects_corrupted_checksum() {
        let protocol = Sdm15Protocol::new();
        let mut bytes = protocol.encode(&Frame::new(Command::StartScan));
        *bytes.last_mut().unwrap() ^= 0xFF;

        match protocol.decode(&bytes) {
            Err(Error::ChecksumMismatch { expected, actual }) => {
                assert_eq!(expected, 0x5F);
                assert_eq!(actual, 0x5F ^ 0xFF);
            }
            other => panic!("expected ChecksumMismatch, got {:?}", other),
        }
    }

    #[test]
    fn decode_rejects_short_input() {
        let protocol = Sdm15Protocol::new();
        assert!(matches!(
            protocol.decode(&[]),
            Err(Error::MalformedFrame { .. })
        ));
        assert!(matches!(
            protocol.decode(&[0xAA, 0x55, 0x60, 0x00]),
            Err(Error::MalformedFrame { .. })
        ));
    }

    #[test]
    fn decode_rejects_bad_header() {
        let protocol = Sdm15Protocol::new();
        assert!(matches!(
            protocol.decode(&[0xA5, 0x55, 0x60, 0x00, 0x5A]),
            Err(Error::MalformedFrame { .. })
        ));
    }

    #[test]
    fn decode_rejects_truncated_payload() {
        let protocol = Sdm15Protocol::new();
        // Declares 4 payload bytes but carries only 2.
        assert!(matches!(
            protocol.decode(&[0xAA, 0x55, 0x63, 0x04, 0x01, 0x00, 0x67]),
            Err(Error::MalformedFrame { .. })
        ));
    }
}
