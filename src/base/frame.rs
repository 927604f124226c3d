use crate::cmds::Command;

/// Represents one complete protocol message exchanged with the SDM15 device:
/// a command (or response) opcode plus its payload bytes.
///
/// The opcode is kept as a raw byte so that responses carrying opcodes outside
/// the command catalog can still be decoded and inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The command opcode or response type identifier.
    pub cmd: u8,

    /// Payload data associated with the frame.
    pub payload: Vec<u8>,
}

impl Frame {
    /// Creates a new frame for a catalog command with no payload.
    pub fn new(cmd: Command) -> Frame {
        Frame::with_payload(cmd, &[])
    }

    /// Creates a new frame for a catalog command with payload data.
    #[inline]
    pub fn with_payload(cmd: Command, payload: &[u8]) -> Frame {
        Frame {
            cmd: cmd.opcode(),
            payload: payload.to_vec(),
        }
    }

    /// Creates a frame from a raw opcode byte, as found in received data.
    #[inline]
    pub fn from_raw(cmd: u8, payload: &[u8]) -> Frame {
        Frame {
            cmd,
            payload: payload.to_vec(),
        }
    }
}
