//! Error types for AkkuMaster and GPS-Logger protocol operations.

use thiserror::Error;

/// Result type alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Error types for device communication and $SETUP decoding.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Serial port communication error
    #[error("Serial port error: {0}")]
    SerialPort(#[from] serialport::Error),

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Answer did not arrive in full before the read timeout
    #[error("Communication timeout: expected {expected} bytes, received {received}")]
    Timeout {
        /// Number of bytes the answer should have
        expected: usize,
        /// Number of bytes received before the deadline
        received: usize,
    },

    /// Read or write attempted on a closed transport
    #[error("Transport not connected")]
    NotConnected,

    /// Leading answer byte does not echo the command byte
    #[error("Echo mismatch: sent {sent:#04x}, received {received:#04x}")]
    EchoMismatch {
        /// Command byte that was sent
        sent: u8,
        /// First byte of the answer
        received: u8,
    },

    /// Device reported a non-success status for a command
    #[error("{command} command failed with status {status:#04x}")]
    CommandFailed {
        /// Name of the failed command
        command: &'static str,
        /// Status byte returned by the device
        status: u8,
    },

    /// Transport returned an answer of unexpected length
    #[error("Answer length mismatch: expected {expected} bytes, got {actual}")]
    AnswerLength {
        /// Answer length required by the command
        expected: usize,
        /// Length actually returned
        actual: usize,
    },

    /// Channel number outside 1..=4
    #[error("Invalid channel: {0} (valid 1-4)")]
    InvalidChannel(u8),

    /// $SETUP buffer of the wrong size
    #[error("Invalid setup length: {actual} bytes (expected 192)")]
    SetupLength {
        /// Size of the rejected buffer
        actual: usize,
    },
}
