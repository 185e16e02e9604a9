// A single memory channel in the host's normalized form

use crate::core::constants::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MemoryError {
    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid tone: {0}")]
    InvalidTone(f32),

    #[error("Invalid DTCS code: {0}")]
    InvalidDtcs(u16),

    #[error("Invalid mode: {0}")]
    InvalidMode(String),

    #[error("Invalid tone mode: {0}")]
    InvalidToneMode(String),

    #[error("Invalid duplex: {0}")]
    InvalidDuplex(String),

    #[error("Invalid skip value: {0}")]
    InvalidSkip(String),

    #[error("Invalid DTCS polarity: {0}")]
    InvalidPolarity(String),
}

pub type Result<T> = std::result::Result<T, MemoryError>;

/// One radio memory channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    /// Channel number
    pub number: u32,

    pub name: String,

    /// Receive frequency in Hz
    pub freq: u64,

    /// Transmit tone (CTCSS) in Hz
    pub rtone: f32,

    /// Receive tone (CTCSS) in Hz
    pub ctone: f32,

    pub dtcs: u16,

    /// Tone mode ("", "Tone", "TSQL", ...)
    pub tmode: String,

    /// DTCS polarity ("NN", "NR", "RN", "RR")
    pub dtcs_polarity: String,

    /// "" to scan, "S" to skip, "P" for priority
    pub skip: String,

    /// Duplex ("", "+", "-", "split", "off")
    pub duplex: String,

    /// Offset in Hz, or the transmit frequency when duplex is "split"
    pub offset: u64,

    pub mode: String,

    /// Tuning step in kHz
    pub tuning_step: f32,

    pub comment: String,

    pub empty: bool,

    /// Fields the driver will not let the user change
    pub immutable: Vec<String>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Memory {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            name: String::new(),
            freq: 0,
            rtone: 88.5,
            ctone: 88.5,
            dtcs: 23,
            tmode: String::new(),
            dtcs_polarity: "NN".to_string(),
            skip: String::new(),
            duplex: String::new(),
            offset: 600_000,
            mode: "FM".to_string(),
            tuning_step: 5.0,
            comment: String::new(),
            empty: false,
            immutable: Vec::new(),
        }
    }

    pub fn new_empty(number: u32) -> Self {
        Self {
            empty: true,
            ..Self::new(number)
        }
    }

    /// Parse a frequency string into Hz
    ///
    /// Accepts "146.520", "146.520 MHz", "146520 kHz" and bare integer MHz.
    pub fn parse_freq(freqstr: &str) -> Result<u64> {
        let freqstr = freqstr.trim();
        let invalid = || MemoryError::InvalidFrequency(freqstr.to_string());

        if freqstr.is_empty() {
            return Ok(0);
        }

        if let Some(mhz) = freqstr.strip_suffix("MHz") {
            return Self::parse_freq(mhz);
        }

        if let Some(khz) = freqstr.strip_suffix("kHz") {
            let khz: u64 = khz.trim().parse().map_err(|_| invalid())?;
            return Ok(khz * 1000);
        }

        match freqstr.split_once('.') {
            Some((whole, frac)) => {
                if frac.len() > 6 || !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                let mhz: u64 = if whole.is_empty() {
                    0
                } else {
                    whole.parse().map_err(|_| invalid())?
                };
                // Right-pad the fraction to whole Hz
                let hz: u64 = format!("{:0<6}", frac).parse().map_err(|_| invalid())?;
                Ok(mhz * 1_000_000 + hz)
            }
            None => {
                let mhz: u64 = freqstr.parse().map_err(|_| invalid())?;
                Ok(mhz * 1_000_000)
            }
        }
    }

    /// Format Hz as MHz with six decimals, e.g. "146.520000"
    pub fn format_freq(freq: u64) -> String {
        format!("{}.{:06}", freq / 1_000_000, freq % 1_000_000)
    }

    pub fn freq_str(&self) -> String {
        Self::format_freq(self.freq)
    }

    /// Check every field against the generic value tables
    ///
    /// Radio-specific limits live in [`crate::core::RadioFeatures::validate_memory`].
    pub fn validate(&self) -> Result<()> {
        if !is_valid_tone_mode(&self.tmode) {
            return Err(MemoryError::InvalidToneMode(self.tmode.clone()));
        }

        for tone in [self.rtone, self.ctone] {
            if !is_valid_tone(tone) {
                return Err(MemoryError::InvalidTone(tone));
            }
        }

        if !is_valid_dtcs(self.dtcs) {
            return Err(MemoryError::InvalidDtcs(self.dtcs));
        }

        if !DTCS_POLARITIES.contains(&self.dtcs_polarity.as_str()) {
            return Err(MemoryError::InvalidPolarity(self.dtcs_polarity.clone()));
        }

        if !is_valid_mode(&self.mode) {
            return Err(MemoryError::InvalidMode(self.mode.clone()));
        }

        if !is_valid_duplex(&self.duplex) {
            return Err(MemoryError::InvalidDuplex(self.duplex.clone()));
        }

        if !is_valid_skip(&self.skip) {
            return Err(MemoryError::InvalidSkip(self.skip.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.empty {
            return write!(f, "Memory {}: <empty>", self.number);
        }

        let tenc = if self.tmode == "Tone" { "*" } else { " " };
        let tsql = if self.tmode == "TSQL" { "*" } else { " " };
        let dup = if self.duplex.is_empty() {
            "/"
        } else {
            &self.duplex
        };

        write!(
            f,
            "Memory {}: {}{}{} {} ({}) r{:.1}{} c{:.1}{} [{:.2}]",
            self.number,
            Self::format_freq(self.freq),
            dup,
            Self::format_freq(self.offset),
            self.mode,
            self.name,
            self.rtone,
            tenc,
            self.ctone,
            tsql,
            self.tuning_step
        )
    }
}
