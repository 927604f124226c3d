use std::io;

/// The byte-stream collaborator the driver talks through, typically a serial
/// port opened by the caller at the device's configured baud rate.
///
/// The driver never opens or closes the physical device; it only consumes this
/// interface. Implementations are expected to be non-blocking for
/// `read_available` (return whatever has arrived so far) and to report pending
/// input through `bytes_available`.
pub trait Transport {
    /// Writes the entire buffer to the device.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;

    /// Flushes any bytes buffered by the transport out to the device.
    fn flush(&mut self) -> io::Result<()>;

    /// Discards any bytes received from the device but not yet read.
    fn reset_input_buffer(&mut self) -> io::Result<()>;

    /// Discards any bytes written but not yet transmitted to the device.
    fn reset_output_buffer(&mut self) -> io::Result<()>;

    /// Returns the number of bytes currently available to read.
    fn bytes_available(&mut self) -> io::Result<usize>;

    /// Reads and returns all currently available bytes without blocking.
    fn read_available(&mut self) -> io::Result<Vec<u8>>;
}
