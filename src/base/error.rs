use std::error;
use std::fmt;
use std::io;

/// Represents errors that can occur during SDM15 operations.
#[derive(Debug)]
pub enum Error {
    /// The received bytes do not form a valid frame (missing header, truncated
    /// payload, or too short to contain a frame at all). Contains a description
    /// of the defect. Fatal to the current call, not to the session.
    MalformedFrame { description: String },

    /// The frame trailer byte does not match the computed checksum. Recoverable:
    /// the caller decides whether to retry or abort.
    ChecksumMismatch { expected: u8, actual: u8 },

    /// The transport signaled data availability but produced zero bytes.
    /// A transient I/O fault.
    NoDataReceived,

    /// The device did not respond within the configured deadline.
    DeviceUnresponsive,

    /// The requested operation is only admissible while the device is idle.
    OperationNotAllowedWhileScanning,

    /// The requested operation is only meaningful while the device is
    /// scanning. Part of the state-guard taxonomy for stream consumers; the
    /// raw sample read itself is deliberately unguarded, so the driver never
    /// produces this variant on its own.
    OperationRequiresScanning,

    /// The device reported a failed self-test. Contains the device error code.
    SelfTestFailed { error_code: u8 },

    /// The device echoed a different configuration byte than the one requested.
    ConfigurationRejected { requested: u8, echoed: u8 },

    /// An I/O error occurred while communicating with the underlying transport
    /// (e.g., serial port).
    IoError(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedFrame { description } => {
                write!(f, "malformed frame: {}", description)
            }
            Error::ChecksumMismatch { expected, actual } => write!(
                f,
                "checksum mismatch: expected {:02X}, actual {:02X}",
                expected, actual
            ),
            Error::NoDataReceived => write!(f, "no data received"),
            Error::DeviceUnresponsive => write!(f, "device unresponsive"),
            Error::OperationNotAllowedWhileScanning => {
                write!(f, "operation not allowed while scanning")
            }
            Error::OperationRequiresScanning => write!(f, "operation requires scanning"),
            Error::SelfTestFailed { error_code } => {
                write!(f, "self test failed: error code {:02X}", error_code)
            }
            Error::ConfigurationRejected { requested, echoed } => write!(
                f,
                "configuration rejected: requested {:02X}, echoed {:02X}",
                requested, echoed
            ),
            Error::IoError(err) => write!(f, "io error: {}", err),
        }
    }
}

impl error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::IoError(err)
    }
}

/// A specialized `Result` type for SDM15 operations.
pub type Result<T> = std::result::Result<T, Error>;
