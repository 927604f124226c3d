use crate::base::error::{Error, Result};
use crate::base::frame::Frame;
use crate::base::traits::Transport;
use crate::protocol::Sdm15Protocol;
use log::{error, trace, warn};
use std::thread;
use std::time::{Duration, Instant};

/// Default deadline for waiting on a device response.
pub const SDM15_DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Interval between availability polls while waiting for a response.
const RESPONSE_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Channel encodes and decodes frames with the SDM15 protocol, and sends and
/// receives bytes via the transport.
///
/// One channel owns its transport exclusively; calls must not be issued
/// concurrently from multiple threads.
///
/// # Examples
/// ```ignore
/// let mut channel = Channel::new(Sdm15Protocol::new(), serial_port);
///
/// let response = channel.invoke(&Frame::new(Command::GetDeviceInfo)).unwrap();
/// ```
#[derive(Debug)]
pub struct Channel<T> {
    protocol: Sdm15Protocol,
    transport: T,
    timeout: Duration,
}

impl<T> Channel<T>
where
    T: Transport,
{
    /// Creates a new `Channel` with the default response timeout.
    pub fn new(protocol: Sdm15Protocol, transport: T) -> Channel<T> {
        trace!(
            "Creating new Channel with default timeout {:?}",
            SDM15_DEFAULT_TIMEOUT
        );
        Channel::with_timeout(protocol, transport, SDM15_DEFAULT_TIMEOUT)
    }

    /// Creates a new `Channel` with a non-default response timeout.
    ///
    /// # Arguments
    ///
    /// * `timeout` - The maximum duration to wait for the device to make
    ///   response bytes available.
    pub fn with_timeout(protocol: Sdm15Protocol, transport: T, timeout: Duration) -> Channel<T> {
        trace!("Creating new Channel with timeout {:?}", timeout);
        Channel {
            protocol,
            transport,
            timeout,
        }
    }

    /// Returns a mutable reference to the underlying transport.
    ///
    /// Needed after `set_baud_rate`-style operations, where the caller must
    /// reconfigure the physical port at the new rate.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consumes the channel and returns the underlying transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Encodes a frame and writes it to the transport, discarding any stale
    /// buffered bytes first so the next read sees only the reply.
    pub fn write(&mut self, frame: &Frame) -> Result<usize> {
        trace!(
            "Channel write called: cmd={:02X}, payload_len={}",
            frame.cmd,
            frame.payload.len()
        );
        self.transport.reset_input_buffer()?;
        self.transport.reset_output_buffer()?;

        let encoded = self.protocol.encode(frame);
        trace!("Writing {} encoded bytes: {:02X?}", encoded.len(), encoded);
        self.transport.write_all(&encoded)?;
        self.transport.flush()?;
        trace!("Transport flushed");
        Ok(encoded.len())
    }

    /// Waits for the device to make response bytes available, reads the burst,
    /// and decodes it as a single frame.
    ///
    /// The device answers every command with one contiguous burst, so no
    /// multi-frame reassembly is attempted. Returns `DeviceUnresponsive` when
    /// the deadline expires with nothing to read.
    pub fn read(&mut self) -> Result<Frame> {
        trace!("Channel read called, timeout {:?}", self.timeout);
        let deadline = Instant::now() + self.timeout;

        loop {
            let available = self.transport.bytes_available()?;
            if available > 0 {
                trace!("{} bytes available", available);
                break;
            }

            if Instant::now() >= deadline {
                warn!("Deadline expired waiting for response bytes");
                return Err(Error::DeviceUnresponsive);
            }

            thread::sleep(RESPONSE_POLL_INTERVAL);
        }

        let raw = self.transport.read_available()?;
        trace!("Read {} bytes from transport: {:02X?}", raw.len(), raw);
        if raw.is_empty() {
            warn!("Transport signaled availability but returned no bytes");
            return Err(Error::NoDataReceived);
        }

        match self.protocol.decode(&raw) {
            Ok(frame) => {
                trace!(
                    "Decoded frame: cmd={:02X}, payload_len={}",
                    frame.cmd,
                    frame.payload.len()
                );
                Ok(frame)
            }
            Err(e) => {
                error!("Failed to decode response burst: {}", e);
                Err(e)
            }
        }
    }

    /// Sends a request frame and waits for the response frame.
    ///
    /// # Example
    /// ```ignore
    /// let resp = channel.invoke(&Frame::new(Command::SelfTest))?;
    /// ```
    pub fn invoke(&mut self, request: &Frame) -> Result<Frame> {
        trace!(
            "Channel invoke called: cmd={:02X}, payload_len={}",
            request.cmd,
            request.payload.len()
        );
        self.write(request)?;
        self.read()
    }
}
