// Packed binary-coded decimal, most significant digit pair first

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BcdError {
    #[error("Invalid BCD digit: {0:#04x}")]
    InvalidDigit(u8),

    #[error("Value {value} does not fit in {num_bytes} BCD bytes")]
    ValueTooLarge { value: u64, num_bytes: usize },
}

pub type Result<T> = std::result::Result<T, BcdError>;

/// Split a BCD byte into (tens, ones)
/// Example: 0x46 -> (4, 6)
pub fn bcd_byte_to_digits(byte: u8) -> Result<(u8, u8)> {
    let tens = byte >> 4;
    let ones = byte & 0x0F;

    if tens > 9 || ones > 9 {
        return Err(BcdError::InvalidDigit(byte));
    }

    Ok((tens, ones))
}

/// Decode big-endian packed BCD
/// Example: [0x14, 0x65, 0x20] -> 146520
pub fn bcd_to_int_be(bcd: &[u8]) -> Result<u64> {
    bcd.iter().try_fold(0u64, |acc, &byte| {
        let (tens, ones) = bcd_byte_to_digits(byte)?;
        Ok(acc * 100 + u64::from(tens * 10 + ones))
    })
}

/// Encode into `num_bytes` of big-endian packed BCD
/// Example: (146520, 3) -> [0x14, 0x65, 0x20]
pub fn int_to_bcd_be(value: u64, num_bytes: usize) -> Result<Vec<u8>> {
    let mut out = vec![0u8; num_bytes];
    let mut remaining = value;

    for byte in out.iter_mut().rev() {
        let pair = (remaining % 100) as u8;
        remaining /= 100;
        *byte = ((pair / 10) << 4) | (pair % 10);
    }

    if remaining > 0 {
        return Err(BcdError::ValueTooLarge { value, num_bytes });
    }

    Ok(out)
}

/// Fixed-width form of [`int_to_bcd_be`] for fields with a known size
pub fn int_to_bcd_array<const N: usize>(value: u64) -> Result<[u8; N]> {
    let bytes = int_to_bcd_be(value, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}
