// Sub-byte fields packed into a single flag byte

/// A run of `width` bits starting `shift` bits above the LSB
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField {
    shift: u8,
    width: u8,
}

impl BitField {
    pub const fn new(shift: u8, width: u8) -> Self {
        Self { shift, width }
    }

    /// Unshifted mask, e.g. 0b11 for a 2-bit field
    pub const fn mask(&self) -> u8 {
        ((1u16 << self.width) - 1) as u8
    }

    pub const fn get(&self, byte: u8) -> u8 {
        (byte >> self.shift) & self.mask()
    }

    /// Replace this field in `byte`. Bits of `value` above `width` are dropped.
    pub const fn set(&self, byte: u8, value: u8) -> u8 {
        let mask = self.mask() << self.shift;
        (byte & !mask) | ((value << self.shift) & mask)
    }

    pub const fn is_set(&self, byte: u8) -> bool {
        self.get(byte) != 0
    }

    /// True if `value` survives [`BitField::set`] unchanged
    pub const fn fits(&self, value: u8) -> bool {
        value & !self.mask() == 0
    }
}

/// Exchange the high and low nibbles: 0x5A -> 0xA5
pub const fn swap_nibbles(byte: u8) -> u8 {
    ((byte & 0x0F) << 4) | ((byte & 0xF0) >> 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOP: BitField = BitField::new(7, 1);
    const PAIR: BitField = BitField::new(2, 2);
    const WHOLE: BitField = BitField::new(0, 8);

    #[test]
    fn test_get() {
        assert_eq!(TOP.get(0x80), 1);
        assert_eq!(TOP.get(0x7F), 0);
        assert_eq!(PAIR.get(0b0000_1100), 0b11);
        assert_eq!(PAIR.get(0b1111_0011), 0);
        assert_eq!(WHOLE.get(0xA5), 0xA5);
    }

    #[test]
    fn test_set_preserves_other_bits() {
        assert_eq!(TOP.set(0x00, 1), 0x80);
        assert_eq!(TOP.set(0xFF, 0), 0x7F);
        assert_eq!(PAIR.set(0xFF, 0b01), 0b1111_0111);
        assert_eq!(WHOLE.set(0x12, 0x34), 0x34);
    }

    #[test]
    fn test_set_masks_overflow() {
        // 4 does not fit in two bits and lands as 0
        assert_eq!(PAIR.set(0x00, 4), 0x00);
        assert_eq!(PAIR.set(0x00, 5), 0b0000_0100);
        assert!(PAIR.fits(3));
        assert!(!PAIR.fits(4));
    }

    #[test]
    fn test_swap_nibbles() {
        assert_eq!(swap_nibbles(0x5A), 0xA5);
        assert_eq!(swap_nibbles(0x31), 0x13);
        assert_eq!(swap_nibbles(0x00), 0x00);
        assert_eq!(swap_nibbles(swap_nibbles(0xC3)), 0xC3);
    }
}
