/// Calculates the 8-bit additive checksum used by the SDM15 protocol: the
/// least-significant byte of the sum of every byte pushed so far.
pub struct Checksum {
    current: u8,
}

impl Checksum {
    /// Creates a new `Checksum` instance, initialized to 0.
    #[inline]
    pub fn new() -> Checksum {
        Checksum { current: 0 }
    }

    /// Includes a slice of bytes in the checksum calculation.
    ///
    /// # Arguments
    ///
    /// * `data` - The byte slice to sum into the current checksum.
    #[inline]
    pub fn push_slice(&mut self, data: &[u8]) {
        for d in data {
            self.current = self.current.wrapping_add(*d);
        }
    }

    /// Returns the calculated checksum value.
    #[inline]
    pub fn checksum(&self) -> u8 {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::Checksum;

    #[test]
    fn checksum_is_lsb_of_sum() {
        let mut checksum = Checksum::new();
        checksum.push_slice(&[0xAA, 0x55, 0x60, 0x00]);
        assert_eq!(checksum.checksum(), 0x5F);

        let mut checksum = Checksum::new();
        checksum.push_slice(&[0xFF, 0xFF, 0x03]);
        assert_eq!(checksum.checksum(), 0x01);
    }
}
