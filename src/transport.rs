//! Byte transport used by the AkkuMaster driver.
//!
//! The driver only needs a handful of primitives from the line it talks
//! over, captured by [`Transport`]. [`SerialTransport`] implements them on
//! top of the `serialport` crate; tests substitute a scripted mock.

use crate::constants::*;
use crate::error::{ProtocolError, Result};
use log::{debug, trace};
use serialport::SerialPort;
use std::io::{ErrorKind, Read, Write};
use std::time::{Duration, Instant};

/// Request/response byte transport.
pub trait Transport {
    /// Open the underlying connection.
    fn open(&mut self) -> Result<()>;

    /// Close the underlying connection. Closing a closed transport is a no-op.
    fn close(&mut self);

    /// Whether the connection is currently open.
    fn is_connected(&self) -> bool;

    /// Write all bytes to the line.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Read exactly `expected_len` bytes, failing with
    /// [`ProtocolError::Timeout`] if they do not arrive within `timeout`.
    fn read(&mut self, expected_len: usize, timeout: Duration) -> Result<Vec<u8>>;
}

/// Format bytes as space separated upper-case hex for trace output.
pub(crate) fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Serial port transport
pub struct SerialTransport {
    port_name: String,
    baud_rate: u32,
    stop_bits: serialport::StopBits,
    timeout: Duration,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialTransport {
    /// Create a transport for `port_name` with the default line settings.
    /// The port is not opened until [`Transport::open`] is called.
    pub fn new(port_name: &str) -> Self {
        SerialTransport {
            port_name: port_name.to_string(),
            baud_rate: BAUD_RATE,
            stop_bits: STOP_BITS,
            timeout: Duration::from_millis(TIMEOUT_MS),
            port: None,
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_stop_bits(mut self, stop_bits: serialport::StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    /// Default port timeout used until a read supplies its own.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// List available serial ports
    pub fn list_ports() -> Result<Vec<serialport::SerialPortInfo>> {
        Ok(serialport::available_ports()?)
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn SerialPort>> {
        self.port.as_mut().ok_or(ProtocolError::NotConnected)
    }
}

impl Transport for SerialTransport {
    fn open(&mut self) -> Result<()> {
        if self.port.is_some() {
            return Ok(());
        }
        let port = serialport::new(&self.port_name, self.baud_rate)
            .timeout(self.timeout)
            .stop_bits(self.stop_bits)
            .open()?;
        debug!("Opened {} at {} baud", self.port_name, self.baud_rate);
        self.port = Some(port);
        Ok(())
    }

    fn close(&mut self) {
        if self.port.take().is_some() {
            debug!("Closed {}", self.port_name);
        }
    }

    fn is_connected(&self) -> bool {
        self.port.is_some()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let port = self.port_mut()?;
        port.clear(serialport::ClearBuffer::Input)?;
        trace!("Sending:  {}", hex(bytes));
        port.write_all(bytes)?;
        port.flush()?;
        Ok(())
    }

    fn read(&mut self, expected_len: usize, timeout: Duration) -> Result<Vec<u8>> {
        let port = self.port_mut()?;
        let answer = read_answer(port.as_mut(), expected_len, timeout, |port, remaining| {
            Ok(port.set_timeout(remaining)?)
        })?;
        trace!("Received: {}", hex(&answer));
        Ok(answer)
    }
}

/// Read exactly `expected_len` bytes before `timeout` runs out.
///
/// `set_timeout` is called with the remaining time before every read so a
/// blocking reader never waits past the deadline.
fn read_answer<R, F>(reader: &mut R, expected_len: usize, timeout: Duration, mut set_timeout: F) -> Result<Vec<u8>>
where
    R: Read + ?Sized,
    F: FnMut(&mut R, Duration) -> Result<()>,
{
    let deadline = Instant::now() + timeout;
    let mut answer = vec![0u8; expected_len];
    let mut received = 0;

    while received < expected_len {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(ProtocolError::Timeout { expected: expected_len, received });
        }
        set_timeout(reader, remaining)?;
        match reader.read(&mut answer[received..]) {
            Ok(n) => received += n,
            Err(e) if e.kind() == ErrorKind::TimedOut => {
                return Err(ProtocolError::Timeout { expected: expected_len, received });
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    #[test]
    fn test_hex_format() {
        assert_eq!(hex(&[0x11, 0xC0, 0x0A]), "11 C0 0A");
        assert_eq!(hex(&[]), "");
    }

    #[test]
    fn test_new_uses_defaults() {
        let transport = SerialTransport::new("/dev/ttyUSB0");
        assert_eq!(transport.port_name(), "/dev/ttyUSB0");
        assert_eq!(transport.baud_rate, BAUD_RATE);
        assert_eq!(transport.timeout, Duration::from_millis(TIMEOUT_MS));
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_builder_overrides() {
        let transport = SerialTransport::new("COM3")
            .with_baud_rate(4800)
            .with_stop_bits(serialport::StopBits::Two)
            .with_timeout(Duration::from_millis(500));
        assert_eq!(transport.baud_rate, 4800);
        assert_eq!(transport.stop_bits, serialport::StopBits::Two);
        assert_eq!(transport.timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_io_on_closed_port_fails() {
        let mut transport = SerialTransport::new("COM3");
        assert!(matches!(transport.write(&[0x16]), Err(ProtocolError::NotConnected)));
        assert!(matches!(
            transport.read(11, Duration::from_millis(10)),
            Err(ProtocolError::NotConnected)
        ));
        transport.close();
        assert!(!transport.is_connected());
    }

    /// Hands out scripted chunks. Once they run out it either times out like
    /// an idle serial line or keeps returning zero bytes.
    struct ChunkedReader {
        chunks: VecDeque<std::io::Result<Vec<u8>>>,
        empty_when_idle: bool,
        timeouts_set: usize,
    }

    impl ChunkedReader {
        fn new(chunks: Vec<std::io::Result<Vec<u8>>>) -> Self {
            ChunkedReader {
                chunks: chunks.into(),
                empty_when_idle: false,
                timeouts_set: 0,
            }
        }
    }

    impl Read for ChunkedReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.chunks.pop_front() {
                Some(chunk) => {
                    let chunk = chunk?;
                    buf[..chunk.len()].copy_from_slice(&chunk);
                    Ok(chunk.len())
                }
                None if self.empty_when_idle => Ok(0),
                None => Err(std::io::Error::new(ErrorKind::TimedOut, "idle")),
            }
        }
    }

    fn read_chunks(reader: &mut ChunkedReader, expected_len: usize, timeout: Duration) -> Result<Vec<u8>> {
        read_answer(reader, expected_len, timeout, |reader, _| {
            reader.timeouts_set += 1;
            Ok(())
        })
    }

    #[test]
    fn test_read_answer_collects_partial_reads() {
        let mut reader = ChunkedReader::new(vec![Ok(vec![0x16, 0x01]), Ok(vec![0x02]), Ok(vec![0x03, 0x04])]);
        let answer = read_chunks(&mut reader, 5, Duration::from_secs(1)).unwrap();
        assert_eq!(answer, vec![0x16, 0x01, 0x02, 0x03, 0x04]);
        assert_eq!(reader.timeouts_set, 3);
    }

    #[test]
    fn test_read_answer_short_answer_times_out() {
        let mut reader = ChunkedReader::new(vec![Ok(vec![0x11, 0x81]), Ok(vec![0x00])]);
        assert!(matches!(
            read_chunks(&mut reader, 14, Duration::from_secs(1)),
            Err(ProtocolError::Timeout { expected: 14, received: 3 })
        ));
    }

    #[test]
    fn test_read_answer_deadline() {
        // Reader that keeps returning nothing until the deadline passes
        let mut reader = ChunkedReader::new(vec![Ok(vec![0x12])]);
        reader.empty_when_idle = true;
        assert!(matches!(
            read_chunks(&mut reader, 16, Duration::from_millis(20)),
            Err(ProtocolError::Timeout { expected: 16, received: 1 })
        ));

        let mut reader = ChunkedReader::new(vec![Ok(vec![0x12])]);
        assert!(matches!(
            read_chunks(&mut reader, 1, Duration::ZERO),
            Err(ProtocolError::Timeout { expected: 1, received: 0 })
        ));
    }

    #[test]
    fn test_read_answer_errors() {
        let mut reader = ChunkedReader::new(vec![
            Err(std::io::Error::new(ErrorKind::Interrupted, "signal")),
            Ok(vec![0x19, 0x00]),
        ]);
        assert_eq!(read_chunks(&mut reader, 2, Duration::from_secs(1)).unwrap(), vec![0x19, 0x00]);

        let mut reader = ChunkedReader::new(vec![Err(std::io::Error::new(ErrorKind::BrokenPipe, "unplugged"))]);
        assert!(matches!(
            read_chunks(&mut reader, 2, Duration::from_secs(1)),
            Err(ProtocolError::Io(_))
        ));

        let mut reader = ChunkedReader::new(vec![Ok(vec![0x19])]);
        let failing = read_answer(&mut reader, 2, Duration::from_secs(1), |_, _| {
            Err(ProtocolError::NotConnected)
        });
        assert!(matches!(failing, Err(ProtocolError::NotConnected)));
    }
}
