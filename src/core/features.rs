// Radio capability flags and per-radio validation of channel records

use super::constants::*;
use super::memory::Memory;
use serde::{Deserialize, Serialize};

/// What a radio can store, and the values each field may take
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadioFeatures {
    pub has_dtcs: bool,
    pub has_dtcs_polarity: bool,
    pub has_mode: bool,
    pub has_offset: bool,
    pub has_name: bool,
    pub has_bank: bool,
    pub has_tuning_step: bool,
    pub has_ctone: bool,
    pub has_comment: bool,
    pub can_odd_split: bool,
    pub can_delete: bool,

    pub valid_modes: Vec<String>,
    pub valid_tmodes: Vec<String>,
    pub valid_duplexes: Vec<String>,
    pub valid_tuning_steps: Vec<f32>,
    /// (low_hz, high_hz) pairs, high exclusive
    pub valid_bands: Vec<(u64, u64)>,
    pub valid_skips: Vec<String>,
    pub valid_characters: String,
    pub valid_name_length: usize,
    pub valid_tones: Vec<f32>,
    pub valid_dtcs_pols: Vec<String>,
    pub valid_dtcs_codes: Vec<u16>,

    /// Lowest and highest channel number, inclusive
    pub memory_bounds: (u32, u32),
}

impl Default for RadioFeatures {
    fn default() -> Self {
        Self {
            has_dtcs: true,
            has_dtcs_polarity: true,
            has_mode: true,
            has_offset: true,
            has_name: true,
            has_bank: true,
            has_tuning_step: true,
            has_ctone: true,
            has_comment: false,
            can_odd_split: false,
            can_delete: true,

            valid_modes: MODES.iter().map(|s| s.to_string()).collect(),
            valid_tmodes: Vec::new(),
            valid_duplexes: ["", "+", "-"].iter().map(|s| s.to_string()).collect(),
            valid_tuning_steps: COMMON_TUNING_STEPS.to_vec(),
            valid_bands: Vec::new(),
            valid_skips: ["", "S"].iter().map(|s| s.to_string()).collect(),
            valid_characters: CHARSET_UPPER_NUMERIC.to_string(),
            valid_name_length: 6,
            valid_tones: TONES.to_vec(),
            valid_dtcs_pols: DTCS_POLARITIES.iter().map(|s| s.to_string()).collect(),
            valid_dtcs_codes: DTCS_CODES.to_vec(),
            memory_bounds: (0, 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationMessage {
    Warning(String),
    Error(String),
}

impl ValidationMessage {
    pub fn is_error(&self) -> bool {
        matches!(self, ValidationMessage::Error(_))
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, ValidationMessage::Warning(_))
    }

    pub fn message(&self) -> &str {
        match self {
            ValidationMessage::Warning(msg) | ValidationMessage::Error(msg) => msg,
        }
    }
}

impl RadioFeatures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bands as "136-155MHz, 146-174MHz"
    pub fn concise_bands(&self) -> String {
        let mhz = |hz: u64| {
            Memory::format_freq(hz)
                .trim_end_matches('0')
                .trim_end_matches('.')
                .to_string()
        };

        self.valid_bands
            .iter()
            .map(|(lo, hi)| format!("{}-{}MHz", mhz(*lo), mhz(*hi)))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn in_band(&self, freq: u64) -> bool {
        self.valid_bands
            .iter()
            .any(|(lo, hi)| freq >= *lo && freq < *hi)
    }

    /// Check a memory against this radio's limits
    ///
    /// Errors mean the driver cannot store the memory; warnings mean it
    /// will be stored with something changed or ignored.
    pub fn validate_memory(&self, mem: &Memory) -> Vec<ValidationMessage> {
        let mut msgs = Vec::new();

        let (lo, hi) = self.memory_bounds;
        if mem.number < lo || mem.number > hi {
            msgs.push(ValidationMessage::Warning(format!(
                "Location {} is out of range",
                mem.number
            )));
        }

        if mem.empty {
            return msgs;
        }

        if self.has_mode
            && !self.valid_modes.is_empty()
            && !self.valid_modes.contains(&mem.mode)
            && !mem.immutable.iter().any(|f| f == "mode")
        {
            msgs.push(ValidationMessage::Error(format!(
                "Mode {} not supported",
                mem.mode
            )));
        }

        if !self.valid_tmodes.is_empty() && !self.valid_tmodes.contains(&mem.tmode) {
            msgs.push(ValidationMessage::Error(format!(
                "Tone mode {} not supported",
                mem.tmode
            )));
        }

        if !self.valid_tones.is_empty() {
            for tone in [mem.rtone, mem.ctone] {
                if !self.valid_tones.contains(&tone) {
                    msgs.push(ValidationMessage::Error(format!(
                        "Tone {:.1} not supported",
                        tone
                    )));
                }
            }
        }

        if self.has_dtcs_polarity && !self.valid_dtcs_pols.contains(&mem.dtcs_polarity) {
            msgs.push(ValidationMessage::Error(format!(
                "DTCS Polarity {} not supported",
                mem.dtcs_polarity
            )));
        }

        if self.has_dtcs
            && !self.valid_dtcs_codes.is_empty()
            && !self.valid_dtcs_codes.contains(&mem.dtcs)
        {
            msgs.push(ValidationMessage::Error(format!(
                "DTCS Code {:03} not supported",
                mem.dtcs
            )));
        }

        if !self.valid_duplexes.is_empty() && !self.valid_duplexes.contains(&mem.duplex) {
            msgs.push(ValidationMessage::Error(format!(
                "Duplex {} not supported",
                mem.duplex
            )));
        }

        if self.has_tuning_step
            && !self.valid_tuning_steps.is_empty()
            && !self.valid_tuning_steps.contains(&mem.tuning_step)
        {
            msgs.push(ValidationMessage::Error(format!(
                "Tuning step {:.2} not supported",
                mem.tuning_step
            )));
        }

        if !self.valid_bands.is_empty() {
            if !self.in_band(mem.freq) {
                msgs.push(ValidationMessage::Error(format!(
                    "Frequency {} is out of supported ranges {}",
                    Memory::format_freq(mem.freq),
                    self.concise_bands()
                )));
            }

            let tx_freq = match mem.duplex.as_str() {
                "split" => Some(mem.offset),
                "-" => Some(mem.freq.saturating_sub(mem.offset)),
                "+" => Some(mem.freq + mem.offset),
                _ => None,
            };
            if let Some(tx) = tx_freq.filter(|&tx| !self.in_band(tx)) {
                msgs.push(ValidationMessage::Error(format!(
                    "TX freq {} is out of supported range",
                    Memory::format_freq(tx)
                )));
            }
        }

        if self.has_name {
            if mem.name.chars().count() > self.valid_name_length {
                msgs.push(ValidationMessage::Warning(format!(
                    "Name '{}' is longer than {} characters",
                    mem.name, self.valid_name_length
                )));
            }

            if !self.valid_characters.is_empty() {
                if let Some(ch) = mem
                    .name
                    .chars()
                    .find(|ch| !self.valid_characters.contains(*ch))
                {
                    msgs.push(ValidationMessage::Warning(format!(
                        "Name character '{}' not supported",
                        ch
                    )));
                }
            }
        }

        msgs
    }
}
