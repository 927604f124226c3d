//! Command catalog for the SDM15 protocol: every command opcode the device
//! understands, plus the single-byte wire encodings of its configuration
//! values. The table is static and read-only.

/// A command understood by the SDM15 device.
///
/// Each variant maps to a fixed opcode byte on the wire. Responses carry the
/// same opcode back, which `from_opcode` recovers for validation and
/// diagnostics.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start continuous distance measurement.
    StartScan,
    /// Stop continuous distance measurement.
    StopScan,
    /// Request model, version and serial number information.
    GetDeviceInfo,
    /// Run the device's internal diagnostic routine.
    SelfTest,
    /// Set the measurement output frequency.
    SetOutputFreq,
    /// Enable or disable the device's output filter.
    SetFilter,
    /// Set the serial link baud rate.
    SetSerialBaud,
    /// Select the output data format.
    SetFormatOutputData,
    /// Restore the device's factory configuration.
    RestoreFactorySettings,
}

impl Command {
    /// Returns the opcode byte for this command.
    pub fn opcode(self) -> u8 {
        match self {
            Command::StartScan => 0x60,
            Command::StopScan => 0x61,
            Command::GetDeviceInfo => 0x62,
            Command::SelfTest => 0x63,
            Command::SetOutputFreq => 0x64,
            Command::SetFilter => 0x65,
            Command::SetSerialBaud => 0x66,
            Command::SetFormatOutputData => 0x67,
            Command::RestoreFactorySettings => 0x68,
        }
    }

    /// Looks up the command for a received opcode byte, for response
    /// validation and diagnostics. Returns `None` for opcodes outside the
    /// catalog.
    pub fn from_opcode(opcode: u8) -> Option<Command> {
        match opcode {
            0x60 => Some(Command::StartScan),
            0x61 => Some(Command::StopScan),
            0x62 => Some(Command::GetDeviceInfo),
            0x63 => Some(Command::SelfTest),
            0x64 => Some(Command::SetOutputFreq),
            0x65 => Some(Command::SetFilter),
            0x66 => Some(Command::SetSerialBaud),
            0x67 => Some(Command::SetFormatOutputData),
            0x68 => Some(Command::RestoreFactorySettings),
            _ => None,
        }
    }

    /// Returns the human-readable command name.
    pub fn name(self) -> &'static str {
        match self {
            Command::StartScan => "START_SCAN",
            Command::StopScan => "STOP_SCAN",
            Command::GetDeviceInfo => "GET_DEVICE_INFO",
            Command::SelfTest => "SELF_TEST",
            Command::SetOutputFreq => "SET_OUTPUT_FREQ",
            Command::SetFilter => "SET_FILTER",
            Command::SetSerialBaud => "SET_SERIAL_BAUD",
            Command::SetFormatOutputData => "SET_FORMAT_OUTPUT_DATA",
            Command::RestoreFactorySettings => "RESTORE_FACTORY_SETTINGS",
        }
    }
}

/// Measurement output frequency, encoded as one byte on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputFrequency {
    Hz10,
    Hz100,
    Hz200,
    Hz500,
    Hz1000,
    Hz1800,
}

impl OutputFrequency {
    /// Returns the wire byte for this frequency.
    pub fn wire_byte(self) -> u8 {
        match self {
            OutputFrequency::Hz10 => 0x00,
            OutputFrequency::Hz100 => 0x01,
            OutputFrequency::Hz200 => 0x02,
            OutputFrequency::Hz500 => 0x03,
            OutputFrequency::Hz1000 => 0x04,
            OutputFrequency::Hz1800 => 0x05,
        }
    }

    /// Looks up the frequency for a wire byte.
    pub fn from_wire(byte: u8) -> Option<OutputFrequency> {
        match byte {
            0x00 => Some(OutputFrequency::Hz10),
            0x01 => Some(OutputFrequency::Hz100),
            0x02 => Some(OutputFrequency::Hz200),
            0x03 => Some(OutputFrequency::Hz500),
            0x04 => Some(OutputFrequency::Hz1000),
            0x05 => Some(OutputFrequency::Hz1800),
            _ => None,
        }
    }

    /// Returns the frequency in hertz.
    pub fn hz(self) -> u32 {
        match self {
            OutputFrequency::Hz10 => 10,
            OutputFrequency::Hz100 => 100,
            OutputFrequency::Hz200 => 200,
            OutputFrequency::Hz500 => 500,
            OutputFrequency::Hz1000 => 1000,
            OutputFrequency::Hz1800 => 1800,
        }
    }
}

/// Output filter state, encoded as one byte on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FilterSetting {
    Off,
    On,
}

impl FilterSetting {
    /// Returns the wire byte for this setting.
    pub fn wire_byte(self) -> u8 {
        match self {
            FilterSetting::Off => 0x00,
            FilterSetting::On => 0x01,
        }
    }

    /// Looks up the setting for a wire byte.
    pub fn from_wire(byte: u8) -> Option<FilterSetting> {
        match byte {
            0x00 => Some(FilterSetting::Off),
            0x01 => Some(FilterSetting::On),
            _ => None,
        }
    }
}

/// Serial link baud rate, encoded as one byte on the wire.
///
/// Codes 0x02 (512000), 0x03 (921600) and 0x04 (1500000) are reserved in the
/// device firmware and not enabled here.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BaudRate {
    Baud230400,
    Baud460800,
}

impl BaudRate {
    /// Returns the wire byte for this baud rate.
    pub fn wire_byte(self) -> u8 {
        match self {
            BaudRate::Baud230400 => 0x00,
            BaudRate::Baud460800 => 0x01,
        }
    }

    /// Looks up the baud rate for a wire byte. Reserved codes return `None`.
    pub fn from_wire(byte: u8) -> Option<BaudRate> {
        match byte {
            0x00 => Some(BaudRate::Baud230400),
            0x01 => Some(BaudRate::Baud460800),
            _ => None,
        }
    }

    /// Returns the baud rate in bits per second, for reopening the port after
    /// a successful rate change.
    pub fn bits_per_second(self) -> u32 {
        match self {
            BaudRate::Baud230400 => 230_400,
            BaudRate::Baud460800 => 460_800,
        }
    }
}

/// Output data format, encoded as one byte on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputDataFormat {
    /// The SDM15 binary frame format.
    Standard,
    /// Pixhawk-compatible text output.
    Pixhawk,
}

impl OutputDataFormat {
    /// Returns the wire byte for this format.
    pub fn wire_byte(self) -> u8 {
        match self {
            OutputDataFormat::Standard => 0x00,
            OutputDataFormat::Pixhawk => 0x01,
        }
    }

    /// Looks up the format for a wire byte.
    pub fn from_wire(byte: u8) -> Option<OutputDataFormat> {
        match byte {
            0x00 => Some(OutputDataFormat::Standard),
            0x01 => Some(OutputDataFormat::Pixhawk),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_lookup_round_trips() {
        let commands = [
            Command::StartScan,
            Command::StopScan,
            Command::GetDeviceInfo,
            Command::SelfTest,
            Command::SetOutputFreq,
            Command::SetFilter,
            Command::SetSerialBaud,
            Command::SetFormatOutputData,
            Command::RestoreFactorySettings,
        ];
        for cmd in commands {
            assert_eq!(Command::from_opcode(cmd.opcode()), Some(cmd));
        }
        assert_eq!(Command::from_opcode(0x5F), None);
        assert_eq!(Command::from_opcode(0x69), None);
    }

    #[test]
    fn opcodes_match_protocol_table() {
        assert_eq!(Command::StartScan.opcode(), 0x60);
        assert_eq!(Command::RestoreFactorySettings.opcode(), 0x68);
        assert_eq!(Command::GetDeviceInfo.name(), "GET_DEVICE_INFO");
    }

    #[test]
    fn frequency_wire_bytes() {
        assert_eq!(OutputFrequency::Hz10.wire_byte(), 0x00);
        assert_eq!(OutputFrequency::Hz500.wire_byte(), 0x03);
        assert_eq!(OutputFrequency::Hz1800.wire_byte(), 0x05);
        assert_eq!(OutputFrequency::from_wire(0x04), Some(OutputFrequency::Hz1000));
        assert_eq!(OutputFrequency::from_wire(0x06), None);
        assert_eq!(OutputFrequency::Hz1800.hz(), 1800);
    }

    #[test]
    fn reserved_baud_codes_are_rejected() {
        assert_eq!(BaudRate::from_wire(0x00), Some(BaudRate::Baud230400));
        assert_eq!(BaudRate::from_wire(0x01), Some(BaudRate::Baud460800));
        for reserved in 0x02..=0x04 {
            assert_eq!(BaudRate::from_wire(reserved), None);
        }
        assert_eq!(BaudRate::Baud460800.bits_per_second(), 460_800);
    }
}
