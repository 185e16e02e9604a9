// nom parsers for fixed-width fields inside memory records

use nom::{bytes::complete::take, IResult, Parser};

/// Take exactly `N` bytes as an array
pub fn parse_byte_array<const N: usize>(input: &[u8]) -> IResult<&[u8], [u8; N]> {
    let (input, bytes) = take(N).parse(input)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok((input, out))
}

/// Decode an 8-bit character field; every byte maps to the code point of
/// the same value, so nothing is lost or replaced
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Encode a string into 8-bit characters. Returns None if any character
/// is above U+00FF.
pub fn encode_latin1(s: &str) -> Option<Vec<u8>> {
    s.chars().map(|c| u8::try_from(c).ok()).collect()
}
