use crate::base::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};

/// Self-test pass flag value reported by the device.
const SELF_TEST_PASSED: u8 = 0x01;

/// Device information reported in response to `GET_DEVICE_INFO`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// Model ID of the sensor.
    pub model: u8,
    /// Hardware revision.
    pub hardware_version: u8,
    /// Firmware major version.
    pub firmware_major: u8,
    /// Firmware minor version.
    pub firmware_minor: u8,
    /// Device serial number.
    pub serial_number: u64,
}

impl VersionInfo {
    /// Parses the `GET_DEVICE_INFO` response payload.
    ///
    /// Layout: model, hardware version, firmware major, firmware minor,
    /// followed by the serial number as a run of decimal digit bytes
    /// (most-significant digit first). Any digit byte outside 0..=9 fails
    /// with `MalformedFrame` rather than yielding a wrong number.
    pub fn parse(payload: &[u8]) -> Result<VersionInfo> {
        if payload.len() < 5 {
            return Err(Error::MalformedFrame {
                description: format!(
                    "device info payload too short: {} bytes, need at least 5",
                    payload.len()
                ),
            });
        }

        let mut serial_number: u64 = 0;
        for &digit in &payload[4..] {
            if digit > 9 {
                return Err(Error::MalformedFrame {
                    description: format!("invalid serial number digit byte: {:02X}", digit),
                });
            }
            serial_number = serial_number * 10 + digit as u64;
        }

        Ok(VersionInfo {
            model: payload[0],
            hardware_version: payload[1],
            firmware_major: payload[2],
            firmware_minor: payload[3],
            serial_number,
        })
    }
}

/// Result of the device's internal diagnostic routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfTestOutcome {
    /// Whether the device reported the test as passed.
    pub passed: bool,
    /// Device error code; meaningful when the test did not pass.
    pub error_code: u8,
    /// Remaining diagnostic bytes, reported verbatim.
    pub data: Vec<u8>,
}

impl SelfTestOutcome {
    /// Parses the `SELF_TEST` response payload: byte 0 is the pass flag
    /// (0x01 = pass), byte 1 the error code, the rest diagnostic data.
    pub fn parse(payload: &[u8]) -> Result<SelfTestOutcome> {
        if payload.len() < 2 {
            return Err(Error::MalformedFrame {
                description: format!(
                    "self test payload too short: {} bytes, need at least 2",
                    payload.len()
                ),
            });
        }

        Ok(SelfTestOutcome {
            passed: payload[0] == SELF_TEST_PASSED,
            error_code: payload[1],
            data: payload[2..].to_vec(),
        })
    }
}

/// One distance measurement, streamed continuously while scanning.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DistanceSample {
    /// Measured distance in millimeters.
    pub distance_mm: u16,
    /// Reflected signal intensity.
    pub intensity: u8,
    /// Ambient interference metric.
    pub disturb: u8,
}

impl DistanceSample {
    /// Parses a streamed measurement payload: distance as a little-endian
    /// u16 (low byte first), then intensity and disturb bytes.
    pub fn parse(payload: &[u8]) -> Result<DistanceSample> {
        if payload.len() < 4 {
            return Err(Error::MalformedFrame {
                description: format!(
                    "distance payload too short: {} bytes, need at least 4",
                    payload.len()
                ),
            });
        }

        Ok(DistanceSample {
            distance_mm: LittleEndian::read_u16(&payload[0..2]),
            intensity: payload[2],
            disturb: payload[3],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_sample_combines_low_and_high_bytes() {
        let sample = DistanceSample::parse(&[0x10, 0x01, 0x32, 0x00]).unwrap();
        assert_eq!(sample.distance_mm, 272);
        assert_eq!(sample.intensity, 50);
        assert_eq!(sample.disturb, 0);
    }

    #[test]
    fn distance_sample_rejects_short_payload() {
        assert!(matches!(
            DistanceSample::parse(&[0x10, 0x01]),
            Err(Error::MalformedFrame { .. })
        ));
    }

    #[test]
    fn version_info_concatenates_serial_digits() {
        let info = VersionInfo::parse(&[0x0F, 0x01, 0x02, 0x05, 1, 2, 0, 4, 5]).unwrap();
        assert_eq!(info.model, 0x0F);
        assert_eq!(info.hardware_version, 0x01);
        assert_eq!(info.firmware_major, 0x02);
        assert_eq!(info.firmware_minor, 0x05);
        assert_eq!(info.serial_number, 12045);
    }

    #[test]
    fn version_info_rejects_non_digit_serial_byte() {
        assert!(matches!(
            VersionInfo::parse(&[0x0F, 0x01, 0x02, 0x05, 1, 0x0A]),
            Err(Error::MalformedFrame { .. })
        ));
    }

    #[test]
    fn version_info_rejects_short_payload() {
        assert!(matches!(
            VersionInfo::parse(&[0x0F, 0x01, 0x02]),
            Err(Error::MalformedFrame { .. })
        ));
    }

    #[test]
    fn self_test_outcome_reads_flag_and_code() {
        let outcome = SelfTestOutcome::parse(&[0x01, 0x00, 0xDE, 0xAD]).unwrap();
        assert!(outcome.passed);
        assert_eq!(outcome.error_code, 0x00);
        assert_eq!(outcome.data, vec![0xDE, 0xAD]);

        let outcome = SelfTestOutcome::parse(&[0x00, 0x07]).unwrap();
        assert!(!outcome.passed);
        assert_eq!(outcome.error_code, 0x07);
        assert!(outcome.data.is_empty());
    }
}
