//! We use this mocking module in unit tests to emulate the serial line.

use crate::error::{ProtocolError, Result};
use crate::transport::Transport;
use std::collections::VecDeque;
use std::io;
use std::time::Duration;

/// Our mock type used to emulate a device on the other end of the line.
pub struct MockTransport {
    /// Every byte written to the mock, in order
    written: Vec<u8>,
    /// Scripted answers, one consumed per read
    answers: VecDeque<Vec<u8>>,
    connected: bool,
    open_count: usize,
    close_count: usize,
    /// Flag to simulate a port that cannot be opened
    should_error_on_open: bool,
    /// Flag to simulate write errors
    should_error_on_write: bool,
    /// Flag to simulate read errors
    should_error_on_read: bool,
}

impl MockTransport {
    /// Create a closed mock with no scripted answers.
    pub fn new() -> Self {
        Self {
            written: Vec::new(),
            answers: VecDeque::new(),
            connected: false,
            open_count: 0,
            close_count: 0,
            should_error_on_open: false,
            should_error_on_write: false,
            should_error_on_read: false,
        }
    }

    /// Create a mock that is already open, as if a caller had opened it.
    pub fn connected() -> Self {
        let mut mock = Self::new();
        mock.connected = true;
        mock
    }

    /// Queue an answer for the next read.
    pub fn push_answer(&mut self, answer: &[u8]) {
        self.answers.push_back(answer.to_vec());
    }

    /// Get a reference to the data that was written to this mock.
    pub fn written_data(&self) -> &[u8] {
        &self.written
    }

    pub fn clear_written_data(&mut self) {
        self.written.clear();
    }

    pub fn pending_answers(&self) -> usize {
        self.answers.len()
    }

    pub fn open_count(&self) -> usize {
        self.open_count
    }

    pub fn close_count(&self) -> usize {
        self.close_count
    }

    pub fn set_open_error(&mut self, should_error: bool) {
        self.should_error_on_open = should_error;
    }

    pub fn set_write_error(&mut self, should_error: bool) {
        self.should_error_on_write = should_error;
    }

    pub fn set_read_error(&mut self, should_error: bool) {
        self.should_error_on_read = should_error;
    }
}

impl Transport for MockTransport {
    fn open(&mut self) -> Result<()> {
        if self.should_error_on_open {
            return Err(io::Error::new(io::ErrorKind::NotFound, "simulated open error").into());
        }
        self.open_count += 1;
        self.connected = true;
        Ok(())
    }

    fn close(&mut self) {
        if self.connected {
            self.close_count += 1;
        }
        self.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if !self.connected {
            return Err(ProtocolError::NotConnected);
        }
        if self.should_error_on_write {
            return Err(io::Error::new(io::ErrorKind::Other, "simulated write error").into());
        }
        self.written.extend_from_slice(bytes);
        Ok(())
    }

    fn read(&mut self, expected_len: usize, _timeout: Duration) -> Result<Vec<u8>> {
        if !self.connected {
            return Err(ProtocolError::NotConnected);
        }
        if self.should_error_on_read {
            return Err(io::Error::new(io::ErrorKind::Other, "simulated read error").into());
        }
        match self.answers.pop_front() {
            Some(answer) if answer.len() >= expected_len => Ok(answer),
            Some(answer) => Err(ProtocolError::Timeout {
                expected: expected_len,
                received: answer.len(),
            }),
            None => Err(ProtocolError::Timeout {
                expected: expected_len,
                received: 0,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(10);

    #[test]
    fn test_new_mock_is_closed() {
        let mock = MockTransport::new();
        assert!(!mock.is_connected());
        assert!(mock.written_data().is_empty());
        assert_eq!(mock.pending_answers(), 0);
    }

    #[test]
    fn test_write_requires_connection() {
        let mut mock = MockTransport::new();
        assert!(matches!(mock.write(&[0x16]), Err(ProtocolError::NotConnected)));
        mock.open().unwrap();
        mock.write(&[0x16]).unwrap();
        mock.write(&[0x11, 0x12]).unwrap();
        assert_eq!(mock.written_data(), &[0x16, 0x11, 0x12]);

        mock.clear_written_data();
        assert!(mock.written_data().is_empty());
        mock.write(&[0x55]).unwrap();
        assert_eq!(mock.written_data(), &[0x55]);
    }

    #[test]
    fn test_answers_are_consumed_in_order() {
        let mut mock = MockTransport::connected();
        mock.push_answer(&[0x19, 0x00]);
        mock.push_answer(&[0x15, 0x00]);
        assert_eq!(mock.read(2, TIMEOUT).unwrap(), vec![0x19, 0x00]);
        assert_eq!(mock.read(2, TIMEOUT).unwrap(), vec![0x15, 0x00]);
        assert!(matches!(
            mock.read(2, TIMEOUT),
            Err(ProtocolError::Timeout { expected: 2, received: 0 })
        ));
    }

    #[test]
    fn test_short_answer_times_out() {
        let mut mock = MockTransport::connected();
        mock.push_answer(&[0x11, 0x81, 0x00]);
        assert!(matches!(
            mock.read(14, TIMEOUT),
            Err(ProtocolError::Timeout { expected: 14, received: 3 })
        ));
    }

    #[test]
    fn test_error_simulation() {
        let mut mock = MockTransport::connected();
        mock.set_write_error(true);
        assert!(matches!(mock.write(&[0x13]), Err(ProtocolError::Io(_))));
        assert!(mock.written_data().is_empty());

        mock.push_answer(&[0x13, 0x00]);
        mock.set_read_error(true);
        assert!(matches!(mock.read(2, TIMEOUT), Err(ProtocolError::Io(_))));

        let mut closed = MockTransport::new();
        closed.set_open_error(true);
        assert!(closed.open().is_err());
        assert!(!closed.is_connected());
    }

    #[test]
    fn test_open_close_counters() {
        let mut mock = MockTransport::new();
        mock.open().unwrap();
        mock.close();
        mock.close();
        assert_eq!(mock.open_count(), 1);
        assert_eq!(mock.close_count(), 1);
    }
}
