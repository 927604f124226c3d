//! # SDM15 Driver
//!
//! `sdm15` is a driver for the YDLIDAR SDM15 single-point ranging LiDAR sensor.
//! It implements the device's binary serial command/response protocol on top of
//! an abstract byte-stream transport, providing typed access to device
//! information, self-test, configuration, and continuous distance measurement.

extern crate byteorder;
extern crate log;

mod answers;
pub mod base;
mod checksum;
mod cmds;
mod protocol;
mod state;

pub use crate::answers::{DistanceSample, SelfTestOutcome, VersionInfo};
pub use crate::base::{Channel, Error, Frame, Result, Transport, SDM15_DEFAULT_TIMEOUT};
pub use crate::cmds::{BaudRate, Command, FilterSetting, OutputDataFormat, OutputFrequency};
pub use crate::protocol::Sdm15Protocol;
pub use crate::state::ScanState;

use crate::state::ScanStateMachine;
use log::{error, trace, warn};
use std::mem::ManuallyDrop;

/// Represents a connection to and control interface for an SDM15 device.
///
/// This struct provides methods to interact with the sensor: retrieving device
/// information, running the self-test, changing configuration, and starting,
/// reading and stopping the measurement stream.
///
/// The session tracks the device's Idle/Scanning state and rejects commands
/// the device will not accept in the current state. On drop it makes a
/// best-effort attempt to stop an ongoing scan so the device is left idle.
///
/// # Example
/// ```ignore
/// # use sdm15::{Sdm15Device, Sdm15Protocol, Channel};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let port = open_serial_port("/dev/ttyUSB0", 460_800)?;
/// let mut device = Sdm15Device::with_transport(port);
///
/// let info = device.get_version_info()?;
/// println!("model {:02X}, serial {}", info.model, info.serial_number);
///
/// device.start_scan()?;
/// loop {
///     let sample = device.read_distance_sample()?;
///     println!("{} mm", sample.distance_mm);
/// }
/// # }
/// ```
#[derive(Debug)]
pub struct Sdm15Device<T: Transport> {
    // ManuallyDrop so into_transport can move the channel out past the Drop impl.
    channel: ManuallyDrop<Channel<T>>,
    state: ScanStateMachine,
}

impl<T: Transport> Sdm15Device<T> {
    /// Constructs a new `Sdm15Device` using an existing `Channel`.
    ///
    /// Use this constructor to control the channel's response timeout:
    ///
    /// ```ignore
    /// let channel = Channel::with_timeout(Sdm15Protocol::new(), port, Duration::from_millis(200));
    /// let mut device = Sdm15Device::new(channel);
    /// ```
    pub fn new(channel: Channel<T>) -> Sdm15Device<T> {
        trace!("Creating new Sdm15Device");
        Sdm15Device {
            channel: ManuallyDrop::new(channel),
            state: ScanStateMachine::new(),
        }
    }

    /// Constructs a new `Sdm15Device` directly from a transport, with the
    /// default response timeout.
    ///
    /// # Arguments
    ///
    /// * `transport` - The byte stream connected to the sensor, typically a
    ///   serial port opened at the device's configured baud rate.
    pub fn with_transport(transport: T) -> Sdm15Device<T> {
        trace!("Creating new Sdm15Device with transport");
        Sdm15Device::new(Channel::new(Sdm15Protocol::new(), transport))
    }

    /// Returns the current Idle/Scanning state as tracked by the session.
    pub fn scan_state(&self) -> ScanState {
        self.state.state()
    }

    /// Returns a mutable reference to the underlying transport, for
    /// reconfiguring the physical port after `set_baud_rate`.
    pub fn transport_mut(&mut self) -> &mut T {
        self.channel.transport_mut()
    }

    /// Consumes the session and returns the underlying transport, for callers
    /// that must reopen the port (e.g. at a new baud rate) rather than retune
    /// it in place.
    ///
    /// Performs the same best-effort teardown as `Drop`: an ongoing scan is
    /// stopped so the device is released idle, with failures logged and
    /// swallowed.
    pub fn into_transport(mut self) -> T {
        if self.state.is_scanning() {
            trace!("Releasing transport while scanning, sending stop");
            if let Err(e) = self.stop_scan() {
                warn!("Failed to stop scan while releasing transport: {}", e);
            }
            self.state.stop();
        }

        // Teardown already happened; skip Drop and move the channel out.
        let channel = unsafe { ManuallyDrop::take(&mut self.channel) };
        std::mem::forget(self);
        channel.into_transport()
    }

    /// Sends one command and validates that the response carries the same
    /// opcode before handing the frame back.
    fn invoke(&mut self, cmd: Command, payload: &[u8]) -> Result<Frame> {
        trace!("Invoking {} with payload {:02X?}", cmd.name(), payload);
        let response = self.channel.invoke(&Frame::with_payload(cmd, payload))?;

        if response.cmd != cmd.opcode() {
            let received = Command::from_opcode(response.cmd)
                .map(Command::name)
                .unwrap_or("UNKNOWN");
            error!(
                "Unexpected response to {}: opcode {:02X} ({})",
                cmd.name(),
                response.cmd,
                received
            );
            return Err(Error::MalformedFrame {
                description: format!(
                    "unexpected response opcode {:02X} ({}) to {}",
                    response.cmd,
                    received,
                    cmd.name()
                ),
            });
        }

        Ok(response)
    }

    /// Checks that a configuration response echoed the requested byte.
    fn check_echo(cmd: Command, response: &Frame, requested: u8) -> Result<()> {
        let echoed = match response.payload.first() {
            Some(&byte) => byte,
            None => {
                return Err(Error::MalformedFrame {
                    description: format!("empty payload in {} response", cmd.name()),
                })
            }
        };

        if echoed != requested {
            warn!(
                "{} rejected: requested {:02X}, device echoed {:02X}",
                cmd.name(),
                requested,
                echoed
            );
            return Err(Error::ConfigurationRejected { requested, echoed });
        }

        Ok(())
    }

    /// Starts continuous distance measurement.
    ///
    /// No-op when the device is already scanning. On success the session
    /// enters the `Scanning` state and samples can be read with
    /// `read_distance_sample`.
    pub fn start_scan(&mut self) -> Result<()> {
        if self.state.is_scanning() {
            trace!("start_scan called while already scanning, ignoring");
            return Ok(());
        }

        self.invoke(Command::StartScan, &[])?;
        self.state.start();
        trace!("Scan started");
        Ok(())
    }

    /// Stops continuous distance measurement.
    ///
    /// No-op when the device is already idle. On success the session returns
    /// to the `Idle` state.
    pub fn stop_scan(&mut self) -> Result<()> {
        if !self.state.is_scanning() {
            trace!("stop_scan called while idle, ignoring");
            return Ok(());
        }

        self.invoke(Command::StopScan, &[])?;
        self.state.stop();
        trace!("Scan stopped");
        Ok(())
    }

    /// Gets the device information (model, hardware and firmware versions,
    /// serial number). Requires the `Idle` state.
    pub fn get_version_info(&mut self) -> Result<VersionInfo> {
        self.state.ensure_idle()?;
        let response = self.invoke(Command::GetDeviceInfo, &[])?;
        let info = VersionInfo::parse(&response.payload)?;
        trace!(
            "Device info: model={:02X}, hw={}, fw={}.{}, serial={}",
            info.model,
            info.hardware_version,
            info.firmware_major,
            info.firmware_minor,
            info.serial_number
        );
        Ok(info)
    }

    /// Runs the device's internal diagnostic routine. Requires the `Idle`
    /// state.
    ///
    /// Returns the diagnostic outcome when the device reports a pass; fails
    /// with `SelfTestFailed` carrying the device error code otherwise.
    pub fn self_test(&mut self) -> Result<SelfTestOutcome> {
        self.state.ensure_idle()?;
        let response = self.invoke(Command::SelfTest, &[])?;
        let outcome = SelfTestOutcome::parse(&response.payload)?;

        if !outcome.passed {
            warn!(
                "Device reported self test failure, error code {:02X}",
                outcome.error_code
            );
            return Err(Error::SelfTestFailed {
                error_code: outcome.error_code,
            });
        }

        trace!("Self test passed, {} diagnostic bytes", outcome.data.len());
        Ok(outcome)
    }

    /// Reads the next distance sample from the measurement stream.
    ///
    /// Only meaningful while scanning: the device emits one frame per
    /// measurement and this call blocks (up to the channel timeout) for the
    /// next one. No command is written and no state guard applies.
    pub fn read_distance_sample(&mut self) -> Result<DistanceSample> {
        let frame = self.channel.read()?;
        DistanceSample::parse(&frame.payload)
    }

    /// Sets the measurement output frequency. Requires the `Idle` state.
    ///
    /// The device echoes the configured value; an echo that differs from the
    /// request fails with `ConfigurationRejected`.
    pub fn set_output_frequency(&mut self, freq: OutputFrequency) -> Result<()> {
        self.state.ensure_idle()?;
        let requested = freq.wire_byte();
        let response = self.invoke(Command::SetOutputFreq, &[requested])?;
        Self::check_echo(Command::SetOutputFreq, &response, requested)?;
        trace!("Output frequency set to {} Hz", freq.hz());
        Ok(())
    }

    /// Enables or disables the device's output filter. Requires the `Idle`
    /// state.
    pub fn set_filter(&mut self, setting: FilterSetting) -> Result<()> {
        self.state.ensure_idle()?;
        let requested = setting.wire_byte();
        let response = self.invoke(Command::SetFilter, &[requested])?;
        Self::check_echo(Command::SetFilter, &response, requested)?;
        trace!("Filter set to {:?}", setting);
        Ok(())
    }

    /// Sets the serial link baud rate. Requires the `Idle` state.
    ///
    /// The session does not reconfigure the transport: after a successful
    /// call the caller must reopen (or retune) the port at
    /// `rate.bits_per_second()` before issuing further commands.
    pub fn set_baud_rate(&mut self, rate: BaudRate) -> Result<()> {
        self.state.ensure_idle()?;
        let requested = rate.wire_byte();
        let response = self.invoke(Command::SetSerialBaud, &[requested])?;
        Self::check_echo(Command::SetSerialBaud, &response, requested)?;
        trace!("Baud rate set to {}", rate.bits_per_second());
        Ok(())
    }

    /// Selects the output data format. Requires the `Idle` state.
    pub fn set_output_data_format(&mut self, format: OutputDataFormat) -> Result<()> {
        self.state.ensure_idle()?;
        let requested = format.wire_byte();
        let response = self.invoke(Command::SetFormatOutputData, &[requested])?;
        Self::check_echo(Command::SetFormatOutputData, &response, requested)?;
        trace!("Output data format set to {:?}", format);
        Ok(())
    }

    /// Restores the device's factory configuration. Requires the `Idle`
    /// state.
    pub fn restore_factory_settings(&mut self) -> Result<()> {
        self.state.ensure_idle()?;
        self.invoke(Command::RestoreFactorySettings, &[])?;
        trace!("Factory settings restored");
        Ok(())
    }
}

impl<T: Transport> Drop for Sdm15Device<T> {
    /// Best-effort teardown: stop an ongoing scan so the device is left idle.
    /// Failures are logged and swallowed so shutdown cannot hang or panic on
    /// a dying device.
    fn drop(&mut self) {
        if self.state.is_scanning() {
            trace!("Session dropped while scanning, sending stop");
            if let Err(e) = self.stop_scan() {
                warn!("Failed to stop scan during teardown: {}", e);
            }
            self.state.stop();
        }

        // The channel is ManuallyDrop for into_transport's sake; every other
        // exit path releases it here.
        unsafe { ManuallyDrop::drop(&mut self.channel) };
    }
}
