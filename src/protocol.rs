use crate::constants::*;
use crate::error::{ProtocolError, Result};
use crate::transport::{hex, SerialTransport, Transport};
use crate::types::*;
use chrono::NaiveDate;
use log::{debug, error};
use std::time::Duration;

/// Command bytes sent to the AkkuMaster: op-code (plus channel offset)
/// followed by big-endian parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    bytes: Vec<u8>,
}

impl Command {
    /// Command addressed to one channel
    pub fn new(op_code: u8, channel: Channel) -> Self {
        Command {
            bytes: vec![encode_command(op_code, channel)],
        }
    }

    /// Command that is not channel addressed
    pub fn global(op_code: u8) -> Self {
        Command { bytes: vec![op_code] }
    }

    pub fn with_u8(mut self, value: u8) -> Self {
        self.bytes.push(value);
        self
    }

    pub fn with_u16(mut self, value: u16) -> Self {
        self.bytes.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Command byte the answer has to echo
    pub fn code(&self) -> u8 {
        self.bytes[0]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Command byte for `op_code` addressed to `channel`.
pub fn encode_command(op_code: u8, channel: Channel) -> u8 {
    channel.address(op_code)
}

/// Fixed-length answer buffer.
struct Answer<'a> {
    bytes: &'a [u8],
}

impl<'a> Answer<'a> {
    fn new(bytes: &'a [u8], expected_len: usize) -> Result<Self> {
        if bytes.len() != expected_len {
            return Err(ProtocolError::AnswerLength {
                expected: expected_len,
                actual: bytes.len(),
            });
        }
        Ok(Answer { bytes })
    }

    fn expect_echo(&self, command: &Command) -> Result<()> {
        if self.bytes[0] != command.code() {
            return Err(ProtocolError::EchoMismatch {
                sent: command.code(),
                received: self.bytes[0],
            });
        }
        Ok(())
    }

    fn byte(&self, index: usize) -> u8 {
        self.bytes[index]
    }

    /// Big-endian 16-bit value starting at `index`
    fn word(&self, index: usize) -> u16 {
        u16::from_be_bytes([self.bytes[index], self.bytes[index + 1]])
    }
}

/// Decode a 14 byte read-configuration answer.
pub fn decode_configuration(bytes: &[u8]) -> Result<Configuration> {
    let answer = Answer::new(bytes, CONFIGURATION_ANSWER_LEN)?;
    Ok(Configuration {
        state: DeviceState(answer.byte(1)),
        error_number: answer.byte(2),
        program: Program::from_raw(answer.byte(3)),
        accu_type: AccuType::from_raw(answer.byte(4)),
        cell_count: answer.byte(5),
        capacity_mah: answer.word(6),
        discharge_current_ma: answer.word(8),
        charge_current_ma: answer.word(10),
        wait_time_min: answer.word(12),
    })
}

/// Decode a 5 byte read-adjusted-values answer.
pub fn decode_adjusted_values(bytes: &[u8]) -> Result<AdjustedValues> {
    let answer = Answer::new(bytes, ADJUSTED_ANSWER_LEN)?;
    Ok(AdjustedValues {
        memory_slot: answer.byte(1),
        repeat_count: answer.byte(2),
        actual_charge_current_ma: answer.word(3),
    })
}

/// Decode a 16 byte read-measured-values answer.
///
/// The voltage counts are scaled with integer arithmetic, `raw * 10 / 2`.
pub fn decode_measured_values(bytes: &[u8]) -> Result<MeasuredValues> {
    let answer = Answer::new(bytes, MEASURED_ANSWER_LEN)?;
    Ok(MeasuredValues {
        discharge_capacity_mah: answer.word(1),
        charge_capacity_mah: answer.word(3),
        voltage_mv: answer.word(5) as u32 * 10 / 2,
        discharge_time: HmsTime {
            hours: answer.byte(7),
            minutes: answer.byte(8),
            seconds: answer.byte(9),
        },
        charge_time: HmsTime {
            hours: answer.byte(10),
            minutes: answer.byte(11),
            seconds: answer.byte(12),
        },
        cycle_count: answer.byte(13),
        remaining_latency_min: answer.word(14),
    })
}

/// Decode an 11 byte read-version answer.
pub fn decode_version(bytes: &[u8]) -> Result<VersionInfo> {
    let answer = Answer::new(bytes, VERSION_ANSWER_LEN)?;
    let day = answer.byte(3);
    let month = answer.byte(4);
    let year = answer.word(5);
    Ok(VersionInfo {
        number: answer.byte(1),
        index: answer.byte(2),
        day,
        month,
        year,
        date: NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32),
        current_variant: CurrentVariant::from_raw(answer.byte(7)),
        front_variant: FrontVariant::from_raw(answer.byte(8)),
    })
}

/// Combine configuration and measurement into the live process values.
///
/// Charging reports the configured charge current and the charged capacity,
/// discharging the configured discharge current and the discharged capacity.
/// Keep-charge is active with zero current and capacity. Every other state
/// is inactive and carries no power or energy.
pub fn derive_process_data(configuration: &Configuration, measured: &MeasuredValues) -> ProcessData {
    let phase = configuration.state.phase();
    let (current_ma, capacity_mah, active) = match phase {
        Phase::Charging => (configuration.charge_current_ma, measured.charge_capacity_mah as u32, true),
        Phase::Discharging => (configuration.discharge_current_ma, measured.discharge_capacity_mah as u32, true),
        Phase::KeepCharge => (0, 0, true),
        Phase::Waiting | Phase::Unknown(_) => (0, 0, false),
    };

    let voltage = measured.voltage_mv as u64;
    ProcessData {
        phase,
        error_number: configuration.error_number,
        voltage_mv: measured.voltage_mv,
        current_ma,
        capacity_mah,
        power: active.then(|| voltage * current_ma as u64),
        energy: active.then(|| voltage * capacity_mah as u64),
    }
}

/// AkkuMaster C4 protocol interface
///
/// All operations take `&mut self`, so a single exclusive borrow covers the
/// whole command/answer exchange on the shared line. Share one instance
/// between threads behind a `Mutex`.
pub struct AkkuMaster<T: Transport> {
    transport: T,
    answer_timeout: Duration,
}

impl AkkuMaster<SerialTransport> {
    /// Create an interface on `port_name` with default line settings.
    /// The port is opened on demand.
    pub fn with_serial_port(port_name: &str) -> Self {
        AkkuMaster::new(SerialTransport::new(port_name))
    }
}

impl<T: Transport> AkkuMaster<T> {
    pub fn new(transport: T) -> Self {
        AkkuMaster {
            transport,
            answer_timeout: Duration::from_millis(TIMEOUT_MS),
        }
    }

    /// Override how long to wait for each answer
    pub fn with_answer_timeout(mut self, timeout: Duration) -> Self {
        self.answer_timeout = timeout;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Send a command and read its answer, checking length and echo byte.
    fn exchange(&mut self, command: &Command, answer_len: usize) -> Result<Vec<u8>> {
        self.transport.write(command.as_bytes())?;
        let bytes = self.transport.read(answer_len, self.answer_timeout)?;
        let answer = Answer::new(&bytes, answer_len)?;
        answer.expect_echo(command)?;
        Ok(bytes)
    }

    /// Send a command answered by echo plus status byte.
    fn execute(&mut self, command: Command, name: &'static str) -> Result<()> {
        debug!("{} command {}", name, hex(command.as_bytes()));
        let bytes = self.exchange(&command, STATUS_ANSWER_LEN)?;
        let status = bytes[1];
        if status != SUCCESS {
            return Err(ProtocolError::CommandFailed { command: name, status });
        }
        Ok(())
    }

    /// Run `operation` on an open transport. Opens it if needed and closes
    /// it afterwards only when it was opened here.
    fn with_connection<R>(&mut self, operation: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        let opened_here = if self.transport.is_connected() {
            false
        } else {
            self.transport.open()?;
            true
        };
        let result = operation(self);
        if opened_here {
            self.transport.close();
        }
        result
    }

    /// Acknowledge program start
    pub fn ok(&mut self, channel: Channel) -> Result<()> {
        self.execute(Command::new(OK_PROGRAM, channel), "OK")
    }

    /// Start loaded program
    pub fn start(&mut self, channel: Channel) -> Result<()> {
        self.execute(Command::new(START_PROGRAM, channel), "Start")
    }

    /// Stop loaded program
    pub fn stop(&mut self, channel: Channel) -> Result<()> {
        self.execute(Command::new(STOP_PROGRAM, channel), "Stop")
    }

    /// Write a new charge program to the channel
    pub fn write_new_program(&mut self, channel: Channel, parameters: &ProgramParameters) -> Result<()> {
        let command = Command::new(WRITE_PROGRAM, channel)
            .with_u8(parameters.program.raw())
            .with_u8(parameters.wait_time_days)
            .with_u8(parameters.accu_type.raw())
            .with_u8(parameters.cell_count)
            .with_u16(parameters.capacity_mah)
            .with_u16(parameters.discharge_current_ma)
            .with_u16(parameters.charge_current_ma);
        self.execute(command, "Write program")
    }

    /// Select memory slot (0-7), repeat count (2-9) and sleep time in
    /// minutes (0-43200)
    pub fn set_memory_slot(
        &mut self,
        channel: Channel,
        memory_number: u8,
        cycle_count: u8,
        sleep_time_min: u16,
    ) -> Result<()> {
        let command = Command::new(SET_MEMORY_CYCLE_SLEEP, channel)
            .with_u8(memory_number)
            .with_u8(cycle_count)
            .with_u16(sleep_time_min);
        self.execute(command, "Set memory")
    }

    /// Read configured values
    pub fn get_configuration(&mut self, channel: Channel) -> Result<Configuration> {
        let bytes = self.exchange(&Command::new(READ_CONFIGURATION, channel), CONFIGURATION_ANSWER_LEN)?;
        decode_configuration(&bytes)
    }

    /// Read additional adjusted parameters
    pub fn get_adjusted_values(&mut self, channel: Channel) -> Result<AdjustedValues> {
        let bytes = self.exchange(&Command::new(READ_ADJUSTED_VALUES, channel), ADJUSTED_ANSWER_LEN)?;
        decode_adjusted_values(&bytes)
    }

    /// Read measured values
    pub fn get_measured_values(&mut self, channel: Channel) -> Result<MeasuredValues> {
        let bytes = self.exchange(&Command::new(READ_MEASURED_VALUES, channel), MEASURED_ANSWER_LEN)?;
        decode_measured_values(&bytes)
    }

    /// Read firmware version and hardware variant
    pub fn get_version(&mut self) -> Result<VersionInfo> {
        let result = self.with_connection(|device| {
            let bytes = device.exchange(&Command::global(READ_VERSION), VERSION_ANSWER_LEN)?;
            decode_version(&bytes)
        });
        if let Err(e) = &result {
            error!("Reading version failed: {}", e);
        }
        result
    }

    /// Gather the live values of a channel.
    pub fn get_data(&mut self, channel: Channel) -> Result<ProcessData> {
        let result = self.with_connection(|device| {
            let configuration = device.get_configuration(channel)?;
            let measured = device.get_measured_values(channel)?;
            Ok(derive_process_data(&configuration, &measured))
        });
        match &result {
            Ok(data) => debug!(
                "{}: {} ({}), {} mV, {} mA, {} mAh",
                channel,
                data.phase,
                data.error_number,
                data.voltage_mv,
                data.current_ma,
                data.capacity_mah
            ),
            Err(e) => error!("Reading data of {} failed: {}", channel, e),
        }
        result
    }
}
