// Binary helpers for radio memory images: BCD digits, bit-packed fields,
// fixed-width record parsing

pub mod bcd;
pub mod bitfield;
pub mod parser;

pub use bcd::{bcd_to_int_be, int_to_bcd_array, int_to_bcd_be, BcdError};
pub use bitfield::{swap_nibbles, BitField};
pub use parser::{decode_latin1, encode_latin1, parse_byte_array};
