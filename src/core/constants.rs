// Value tables shared by every driver: tones, DTCS codes, modes

/// The 50 standard CTCSS tones (Hz)
pub const TONES: [f32; 50] = [
    67.0, 69.3, 71.9, 74.4, 77.0, 79.7, 82.5, 85.4, 88.5, 91.5, 94.8, 97.4, 100.0, 103.5, 107.2,
    110.9, 114.8, 118.8, 123.0, 127.3, 131.8, 136.5, 141.3, 146.2, 151.4, 156.7, 159.8, 162.2,
    165.5, 167.9, 171.3, 173.8, 177.3, 179.9, 183.5, 186.2, 189.9, 192.8, 196.6, 199.5, 203.5,
    206.5, 210.7, 218.1, 225.7, 229.1, 233.6, 241.8, 250.3, 254.1,
];

/// The 104 standard DTCS codes
pub const DTCS_CODES: [u16; 104] = [
    23, 25, 26, 31, 32, 36, 43, 47, 51, 53, 54, 65, 71, 72, 73, 74, 114, 115, 116, 122, 125, 131,
    132, 134, 143, 145, 152, 155, 156, 162, 165, 172, 174, 205, 212, 223, 225, 226, 243, 244, 245,
    246, 251, 252, 255, 261, 263, 265, 266, 271, 274, 306, 311, 315, 325, 331, 332, 343, 346, 351,
    356, 364, 365, 371, 411, 412, 413, 423, 431, 432, 445, 446, 452, 454, 455, 462, 464, 465, 466,
    503, 506, 516, 523, 526, 532, 546, 565, 606, 612, 624, 627, 631, 632, 654, 662, 664, 703, 712,
    723, 731, 732, 734, 743, 754,
];

/// Every operating mode a memory may carry
pub const MODES: &[&str] = &[
    "WFM", "FM", "NFM", "AM", "NAM", "DV", "USB", "LSB", "CW", "RTTY", "DIG", "PKT", "NCW", "NCWR",
    "CWR", "P25", "Auto", "RTTYR", "FSK", "FSKR", "DMR", "DN",
];

/// Tone squelch modes; "" is carrier squelch
pub const TONE_MODES: &[&str] = &["", "Tone", "TSQL", "DTCS", "DTCS-R", "TSQL-R", "Cross"];

/// Scan skip: none, skip, priority
pub const SKIP_VALUES: &[&str] = &["", "S", "P"];

/// Duplex values; "split" puts the transmit frequency in `offset`
pub const DUPLEX_MODES: &[&str] = &["", "+", "-", "split", "off"];

/// DTCS polarity pairs, transmit then receive
pub const DTCS_POLARITIES: &[&str] = &["NN", "NR", "RN", "RR"];

/// Tuning steps most radios offer (kHz)
pub const COMMON_TUNING_STEPS: &[f32] = &[5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 50.0, 100.0];

/// Characters allowed in names on radios without lowercase
pub const CHARSET_UPPER_NUMERIC: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ 1234567890";
/// Characters allowed in names on radios with lowercase
pub const CHARSET_ALPHANUMERIC: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz 1234567890";

/// Sub-audible range; anything outside is certainly not a CTCSS tone
pub fn is_valid_tone(tone: f32) -> bool {
    tone > 50.0 && tone < 300.0
}

/// Any three-digit octal code 000-777, written as its decimal digits
pub fn is_valid_dtcs(code: u16) -> bool {
    code < 1000 && [code / 100, (code / 10) % 10, code % 10].iter().all(|&d| d < 8)
}

/// True if `mode` is in [`MODES`]
pub fn is_valid_mode(mode: &str) -> bool {
    MODES.contains(&mode)
}

/// True if `tmode` is in [`TONE_MODES`]
pub fn is_valid_tone_mode(tmode: &str) -> bool {
    TONE_MODES.contains(&tmode)
}

/// True if `duplex` is in [`DUPLEX_MODES`]
pub fn is_valid_duplex(duplex: &str) -> bool {
    DUPLEX_MODES.contains(&duplex)
}

/// True if `skip` is in [`SKIP_VALUES`]
pub fn is_valid_skip(skip: &str) -> bool {
    SKIP_VALUES.contains(&skip)
}
