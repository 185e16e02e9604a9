// Icom IC-F1010 radio driver
//
// 32-channel VHF handheld programmed by Icom clone mode. The image is 0x800
// bytes; this driver only interprets it.

use super::traits::{
    CloneModeRadio, CloneRange, IcomCloneModeRadio, Radio, RadioError, RadioResult,
};
use crate::bitwise::{
    bcd_to_int_be, decode_latin1, encode_latin1, int_to_bcd_array, parse_byte_array,
    swap_nibbles, BcdError, BitField,
};
use crate::core::{Memory, RadioFeatures, CHARSET_UPPER_NUMERIC};
use crate::formats::Metadata;
use crate::memmap::{hexdump, MemoryMap};
use nom::{number::complete::be_u8, IResult};

const VENDOR: &str = "Icom";
const MODEL: &str = "IC-F1010";

/// Image size: 2048 bytes
const MEMSIZE: usize = 0x0800;

const NUM_MEMORIES: u32 = 32;

/// One flag byte per channel
const FLAGS_BASE: usize = 0x0010;

/// Channel records, 20 bytes each
const MEMORY_BASE: usize = 0x01C0;

/// Channel names, 8 bytes each
const NAME_BASE: usize = 0x05A0;
const NAME_LENGTH: usize = 8;

/// Written in place of an absent name. Only four bytes long, so the last
/// four bytes of the name field keep whatever they held before.
const NAME_UNSET: [u8; 4] = [0xFF; 4];

/// Raw `tmode` value meaning "no tone squelch"
const TMODE_OFF: u8 = 0x80;

/// Transmit tone indexes above this are stored nibble-swapped
const RTONE_SWAP_THRESHOLD: u8 = 48;

/// Whitespace stripped from the end of a decoded name
const NAME_PADDING: &[char] = &[' ', '\t', '\n', '\r', '\x0b', '\x0c'];

const MODEL_CODE: &[u8] = &[0x17, 0x05, 0x02, 0x00];
const ENDFRAME: &[u8] = b"Icom Inc.";
const CLONE_RANGES: &[CloneRange] = &[CloneRange::new(0x0000, 0x07FF, 16)];

/// Duplex values by flag index. Index 0 and 1 both mean simplex, and
/// "split" (4) does not fit the 2-bit flag field.
pub const DUPLEX: [&str; 5] = ["", "", "-", "+", "split"];

/// Tone modes by flag index
pub const TMODES: [&str; 4] = ["", "", "Tone", "TSQL"];

/// CTCSS tones by index as the radio numbers them (Hz). Unlike the common
/// 50-tone list this one carries 71.0 at index 2.
pub const ICF_TONES: [f32; 51] = [
    67.0, 69.3, 71.0, 71.9, 74.4, 77.0, 79.7, 82.5, 85.4, 88.5, 91.5, 94.8, 97.4, 100.0, 103.5,
    107.2, 110.9, 114.8, 118.8, 123.0, 127.3, 131.8, 136.5, 141.3, 146.2, 151.4, 156.7, 159.8,
    162.2, 165.5, 167.9, 171.3, 173.8, 177.3, 179.9, 183.5, 186.2, 189.9, 192.8, 196.6, 199.5,
    203.5, 206.5, 210.7, 218.1, 225.7, 229.1, 233.6, 241.8, 250.3, 254.1,
];

/// Bit layout of the per-channel flag byte, MSB first:
/// empty:1, skip:1, tmode:2, duplex:2, unknown:2
mod flag {
    use crate::bitwise::BitField;

    pub const EMPTY: BitField = BitField::new(7, 1);
    pub const SKIP: BitField = BitField::new(6, 1);
    pub const TMODE: BitField = BitField::new(4, 2);
    pub const DUPLEX: BitField = BitField::new(2, 2);
    pub const UNKNOWN: BitField = BitField::new(0, 2);
}

/// Unpacked per-channel flag byte
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelFlags {
    pub empty: bool,
    pub skip: bool,
    /// Index into [`TMODES`]
    pub tmode: u8,
    /// Index into [`DUPLEX`]
    pub duplex: u8,
    pub unknown: u8,
}

impl ChannelFlags {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            empty: flag::EMPTY.is_set(byte),
            skip: flag::SKIP.is_set(byte),
            tmode: flag::TMODE.get(byte),
            duplex: flag::DUPLEX.get(byte),
            unknown: flag::UNKNOWN.get(byte),
        }
    }

    /// Pack into a byte. Field values wider than their slot are truncated.
    pub fn to_byte(self) -> u8 {
        let fields: [(BitField, u8); 5] = [
            (flag::EMPTY, self.empty as u8),
            (flag::SKIP, self.skip as u8),
            (flag::TMODE, self.tmode),
            (flag::DUPLEX, self.duplex),
            (flag::UNKNOWN, self.unknown),
        ];
        fields
            .iter()
            .fold(0u8, |byte, (field, value)| field.set(byte, *value))
    }
}

/// One 20-byte channel record
///
/// Byte layout:
/// - 0-2:   freq (BCD, kHz)
/// - 3-5:   txfreq (BCD, kHz)
/// - 6:     tmode (0x80 = off)
/// - 7:     rtone index (nibble-swapped above 48)
/// - 8:     ctone index
/// - 9:     power
/// - 10-19: unknown, preserved on write
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawMemory {
    freq: [u8; 3],
    txfreq: [u8; 3],
    tmode: u8,
    rtone: u8,
    ctone: u8,
    power: u8,
    unknown: [u8; 10],
}

impl RawMemory {
    const SIZE: usize = 20;

    fn parse(input: &[u8]) -> IResult<&[u8], Self> {
        let (input, freq) = parse_byte_array::<3>(input)?;
        let (input, txfreq) = parse_byte_array::<3>(input)?;
        let (input, tmode) = be_u8(input)?;
        let (input, rtone) = be_u8(input)?;
        let (input, ctone) = be_u8(input)?;
        let (input, power) = be_u8(input)?;
        let (input, unknown) = parse_byte_array::<10>(input)?;

        Ok((
            input,
            Self {
                freq,
                txfreq,
                tmode,
                rtone,
                ctone,
                power,
                unknown,
            },
        ))
    }

    fn from_bytes(data: &[u8]) -> RadioResult<Self> {
        let (_, raw) = Self::parse(data)
            .map_err(|e| RadioError::Parse(format!("channel record: {}", e)))?;
        Ok(raw)
    }

    fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..3].copy_from_slice(&self.freq);
        bytes[3..6].copy_from_slice(&self.txfreq);
        bytes[6] = self.tmode;
        bytes[7] = self.rtone;
        bytes[8] = self.ctone;
        bytes[9] = self.power;
        bytes[10..20].copy_from_slice(&self.unknown);
        bytes
    }
}

/// Decode a 3-byte BCD kHz field to Hz
pub fn decode_freq(bcd: &[u8; 3]) -> Result<u64, BcdError> {
    Ok(bcd_to_int_be(bcd)? * 1000)
}

/// Encode Hz as a 3-byte BCD kHz field. Anything below 1 kHz is dropped.
pub fn encode_freq(freq: u64) -> Result<[u8; 3], BcdError> {
    int_to_bcd_array(freq / 1000)
}

/// Look up a tone by its table index
pub fn tone_from_index(index: u8) -> Option<f32> {
    ICF_TONES.get(usize::from(index)).copied()
}

/// Index of the transmit tone as stored. Values above 48 have their
/// nibbles swapped; the result is not range checked.
pub fn rtone_index(raw: u8) -> u8 {
    if raw > RTONE_SWAP_THRESHOLD {
        swap_nibbles(raw)
    } else {
        raw
    }
}

/// Table index of `tone`. Encoding never swaps nibbles.
pub fn tone_to_index(tone: f32) -> Option<u8> {
    ICF_TONES
        .iter()
        .position(|&t| t == tone)
        .and_then(|i| u8::try_from(i).ok())
}

/// Decode the 8-byte name field
fn decode_name(raw: &[u8]) -> Option<String> {
    // TODO: this compares the full 8-byte field against the 4-byte marker,
    // so it never matches and an unset name decodes as U+00FF characters.
    // Narrow it to the first four bytes once dumps from a radio show what
    // an erased name really looks like.
    if raw == NAME_UNSET.as_slice() {
        return None;
    }

    Some(decode_latin1(raw).trim_end_matches(NAME_PADDING).to_string())
}

/// Bytes to write at the start of the name field
fn encode_name(name: &str) -> RadioResult<Vec<u8>> {
    if name.is_empty() {
        return Ok(NAME_UNSET.to_vec());
    }

    let mut bytes =
        encode_latin1(name).ok_or_else(|| RadioError::InvalidName(name.to_string()))?;
    if bytes.len() > NAME_LENGTH {
        return Err(RadioError::InvalidName(name.to_string()));
    }
    bytes.resize(NAME_LENGTH, b' ');
    Ok(bytes)
}

/// Decode a channel from its record, flags and name field
fn decode_memory(
    number: u32,
    raw: &RawMemory,
    flags: ChannelFlags,
    name: &[u8],
) -> RadioResult<Memory> {
    let mut mem = Memory::new(number);

    mem.freq = decode_freq(&raw.freq)?;
    mem.offset = decode_freq(&raw.txfreq)?;
    mem.duplex = "split".to_string();

    let rtone_idx = rtone_index(raw.rtone);
    mem.rtone = tone_from_index(rtone_idx).ok_or(RadioError::InvalidTone {
        number,
        index: rtone_idx,
    })?;
    mem.ctone = tone_from_index(raw.ctone).ok_or(RadioError::InvalidTone {
        number,
        index: raw.ctone,
    })?;

    // The tone-mode flag bits are not consulted; the record's tmode byte wins
    mem.tmode = if raw.tmode == TMODE_OFF {
        String::new()
    } else {
        "TSQL".to_string()
    };

    mem.skip = if flags.skip {
        "S".to_string()
    } else {
        String::new()
    };

    if let Some(name) = decode_name(name) {
        mem.name = name;
    }

    Ok(mem)
}

/// Encode a non-empty channel into `raw` and return its fresh flag byte
///
/// Only freq, txfreq, rtone and ctone change in `raw`; the tmode, power and
/// unknown bytes are left as they were.
fn encode_memory(mem: &Memory, raw: &mut RawMemory) -> RadioResult<ChannelFlags> {
    raw.freq = encode_freq(mem.freq)?;
    raw.txfreq = encode_freq(mem.offset)?;

    raw.rtone = tone_to_index(mem.rtone)
        .ok_or_else(|| RadioError::Unsupported(format!("Tone {:.1}", mem.rtone)))?;
    raw.ctone = tone_to_index(mem.ctone)
        .ok_or_else(|| RadioError::Unsupported(format!("Tone {:.1}", mem.ctone)))?;

    let duplex = DUPLEX
        .iter()
        .position(|d| *d == mem.duplex)
        .ok_or_else(|| RadioError::Unsupported(format!("Duplex {:?}", mem.duplex)))?
        as u8;
    if !flag::DUPLEX.fits(duplex) {
        tracing::warn!(
            "Memory #{}: duplex {:?} does not fit the flag field, stored as {}",
            mem.number,
            mem.duplex,
            duplex & flag::DUPLEX.mask()
        );
    }

    let tmode = TMODES
        .iter()
        .position(|t| *t == mem.tmode)
        .ok_or_else(|| RadioError::Unsupported(format!("Tone mode {:?}", mem.tmode)))?
        as u8;

    Ok(ChannelFlags {
        empty: false,
        skip: mem.skip == "S",
        tmode,
        duplex,
        unknown: 0,
    })
}

/// Icom IC-F1010 driver
pub struct ICF1010Radio {
    mmap: Option<MemoryMap>,
}

crate::register_radio_driver!(VENDOR, MODEL, "32-channel VHF handheld (FM)", true);

impl ICF1010Radio {
    pub fn new() -> Self {
        Self { mmap: None }
    }

    /// Driver with `mmap` already loaded
    pub fn from_mmap(mmap: &MemoryMap) -> RadioResult<Self> {
        let mut radio = Self::new();
        radio.process_mmap(mmap)?;
        Ok(radio)
    }

    /// Metadata to store alongside this radio's image in an .img file
    pub fn metadata(&self) -> Metadata {
        Metadata::with_details("ICF1010Radio", VENDOR, MODEL, "")
    }

    fn memory_offset(number: u32) -> usize {
        MEMORY_BASE + number as usize * RawMemory::SIZE
    }

    fn name_offset(number: u32) -> usize {
        NAME_BASE + number as usize * NAME_LENGTH
    }

    fn flag_offset(number: u32) -> usize {
        FLAGS_BASE + number as usize
    }

    fn check_number(number: u32) -> RadioResult<()> {
        if number >= NUM_MEMORIES {
            return Err(RadioError::InvalidMemory(number));
        }
        Ok(())
    }

    fn mmap(&self) -> RadioResult<&MemoryMap> {
        self.mmap.as_ref().ok_or(RadioError::NoImage)
    }

    fn mmap_mut(&mut self) -> RadioResult<&mut MemoryMap> {
        self.mmap.as_mut().ok_or(RadioError::NoImage)
    }

    fn read_raw_memory(&self, number: u32) -> RadioResult<RawMemory> {
        let data = self
            .mmap()?
            .get(Self::memory_offset(number), Some(RawMemory::SIZE))?;
        RawMemory::from_bytes(data)
    }

    fn read_flags(&self, number: u32) -> RadioResult<ChannelFlags> {
        let byte = self.mmap()?.get_byte(Self::flag_offset(number))?;
        Ok(ChannelFlags::from_byte(byte))
    }

    fn read_name_raw(&self, number: u32) -> RadioResult<&[u8]> {
        Ok(self
            .mmap()?
            .get(Self::name_offset(number), Some(NAME_LENGTH))?)
    }

    /// Hex dump of a channel's record, name field and flag byte, in that order
    pub fn get_raw_memory(&self, number: u32) -> RadioResult<String> {
        Self::check_number(number)?;
        let mmap = self.mmap()?;

        let mut raw = Vec::with_capacity(RawMemory::SIZE + NAME_LENGTH + 1);
        raw.extend_from_slice(mmap.get(Self::memory_offset(number), Some(RawMemory::SIZE))?);
        raw.extend_from_slice(mmap.get(Self::name_offset(number), Some(NAME_LENGTH))?);
        raw.push(mmap.get_byte(Self::flag_offset(number))?);

        Ok(hexdump(&raw))
    }
}

impl Default for ICF1010Radio {
    fn default() -> Self {
        Self::new()
    }
}

impl Radio for ICF1010Radio {
    fn vendor(&self) -> &str {
        VENDOR
    }

    fn model(&self) -> &str {
        MODEL
    }

    fn get_features(&self) -> RadioFeatures {
        RadioFeatures {
            memory_bounds: (0, NUM_MEMORIES - 1),
            valid_tmodes: TMODES.iter().map(|s| s.to_string()).collect(),
            valid_duplexes: DUPLEX.iter().map(|s| s.to_string()).collect(),
            valid_bands: vec![
                (136_000_000, 155_000_000),
                (146_000_000, 174_000_000),
            ],
            valid_skips: ["", "1", "2", "3", "4", "5"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            valid_modes: vec!["FM".to_string()],
            valid_name_length: NAME_LENGTH,
            valid_characters: CHARSET_UPPER_NUMERIC.to_string(),
            valid_tones: ICF_TONES.to_vec(),
            valid_tuning_steps: vec![5.0, 10.0, 12.5, 15.0, 20.0, 25.0, 30.0, 50.0, 100.0],
            has_dtcs: true,
            has_dtcs_polarity: false,
            has_tuning_step: false,
            has_mode: false,
            has_bank: false,
            ..Default::default()
        }
    }

    fn get_memory(&mut self, number: u32) -> RadioResult<Option<Memory>> {
        Self::check_number(number)?;

        let flags = self.read_flags(number)?;
        // The radio's own read path ignores this bit and decodes every slot;
        // here an erased slot is reported as None instead of as garbage.
        if flags.empty {
            return Ok(None);
        }

        let raw = self.read_raw_memory(number)?;
        let name = self.read_name_raw(number)?;
        let mem = decode_memory(number, &raw, flags, name)?;

        tracing::debug!(
            "Decoded memory #{}: freq={} tx={} rtone={} ctone={} tmode={:?}",
            number,
            mem.freq,
            mem.offset,
            mem.rtone,
            mem.ctone,
            mem.tmode
        );

        Ok(Some(mem))
    }

    fn set_memory(&mut self, memory: &Memory) -> RadioResult<()> {
        let number = memory.number;
        Self::check_number(number)?;
        let flag_offset = Self::flag_offset(number);

        if memory.empty {
            tracing::debug!("Clearing memory #{}", number);
            let mmap = self.mmap_mut()?;
            let byte = mmap.get_byte(flag_offset)?;
            mmap.set_byte(flag_offset, flag::EMPTY.set(byte, 1))?;
            return Ok(());
        }

        memory.validate()?;

        // Encode everything before touching the image so a bad field
        // leaves the channel as it was
        let mut raw = self.read_raw_memory(number)?;
        let flags = encode_memory(memory, &mut raw)?;
        let name = encode_name(&memory.name)?;

        tracing::debug!(
            "Encoding memory #{}: freq={} tx={} flags={:#04x}",
            number,
            memory.freq,
            memory.offset,
            flags.to_byte()
        );

        let mmap = self.mmap_mut()?;
        mmap.set_byte(flag_offset, flags.to_byte())?;
        mmap.set_bytes(Self::memory_offset(number), &raw.to_bytes())?;
        mmap.set_bytes(Self::name_offset(number), &name)?;

        Ok(())
    }
}

impl CloneModeRadio for ICF1010Radio {
    fn get_memsize(&self) -> usize {
        MEMSIZE
    }

    fn process_mmap(&mut self, mmap: &MemoryMap) -> RadioResult<()> {
        if mmap.len() < MEMSIZE {
            return Err(RadioError::ImageSize {
                expected: MEMSIZE,
                actual: mmap.len(),
            });
        }
        if mmap.len() > MEMSIZE {
            tracing::warn!(
                "Image is {} bytes, ignoring everything past {:#06x}",
                mmap.len(),
                MEMSIZE
            );
        }

        self.mmap = Some(mmap.clone());
        Ok(())
    }

    fn get_mmap(&self) -> Option<&MemoryMap> {
        self.mmap.as_ref()
    }

    fn match_model(data: &[u8], _filename: &str) -> bool {
        data.len() == MEMSIZE
    }
}

impl IcomCloneModeRadio for ICF1010Radio {
    fn model_code(&self) -> &'static [u8] {
        MODEL_CODE
    }

    fn endframe(&self) -> &'static [u8] {
        ENDFRAME
    }

    fn clone_ranges(&self) -> &'static [CloneRange] {
        CLONE_RANGES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MemoryError;
    use crate::formats::{load_img, save_img};
    use tempfile::NamedTempFile;

    /// Image as it comes off a freshly reset radio: all 0xFF
    fn blank_radio() -> ICF1010Radio {
        ICF1010Radio::from_mmap(&MemoryMap::filled(MEMSIZE, 0xFF)).unwrap()
    }

    fn channel(number: u32) -> Memory {
        let mut mem = Memory::new(number);
        mem.freq = 146_520_000;
        mem.offset = 146_520_000;
        mem.duplex = "split".to_string();
        mem.tmode = "TSQL".to_string();
        mem.rtone = 100.0;
        mem.ctone = 100.0;
        mem.name = "CALL".to_string();
        mem
    }

    /// Write raw bytes for channel `number` straight into the image
    fn poke(radio: &mut ICF1010Radio, number: u32, record: &[u8; 20], flags: u8, name: &[u8; 8]) {
        let mmap = radio.mmap.as_mut().unwrap();
        mmap.set_bytes(ICF1010Radio::memory_offset(number), record).unwrap();
        mmap.set_bytes(ICF1010Radio::name_offset(number), name).unwrap();
        mmap.set_byte(ICF1010Radio::flag_offset(number), flags).unwrap();
    }

    #[test]
    fn test_layout_offsets() {
        assert_eq!(ICF1010Radio::memory_offset(0), 0x01C0);
        assert_eq!(ICF1010Radio::memory_offset(31), 0x01C0 + 31 * 20);
        assert_eq!(ICF1010Radio::name_offset(0), 0x05A0);
        assert_eq!(ICF1010Radio::name_offset(31), 0x05A0 + 31 * 8);
        assert_eq!(ICF1010Radio::flag_offset(31), 0x002F);

        // Regions must not overlap and must fit the image
        assert!(ICF1010Radio::flag_offset(31) < MEMORY_BASE);
        assert!(ICF1010Radio::memory_offset(32) <= NAME_BASE);
        assert!(ICF1010Radio::name_offset(32) <= MEMSIZE);
    }

    #[test]
    fn test_freq_conversion() {
        assert_eq!(decode_freq(&[0x14, 0x65, 0x20]).unwrap(), 146_520_000);
        assert_eq!(encode_freq(146_520_000).unwrap(), [0x14, 0x65, 0x20]);
        assert_eq!(encode_freq(155_000_000).unwrap(), [0x15, 0x50, 0x00]);

        // Sub-kHz part is dropped
        assert_eq!(encode_freq(146_520_999).unwrap(), [0x14, 0x65, 0x20]);

        assert!(decode_freq(&[0xFF, 0xFF, 0xFF]).is_err());
        assert!(encode_freq(1_000_000_000).is_err());
    }

    #[test]
    fn test_tone_table() {
        assert_eq!(ICF_TONES.len(), 51);
        assert_eq!(ICF_TONES[0], 67.0);
        assert_eq!(ICF_TONES[2], 71.0);
        assert_eq!(ICF_TONES[50], 254.1);

        assert_eq!(tone_from_index(9), Some(88.5));
        assert_eq!(tone_from_index(51), None);
        assert_eq!(tone_to_index(100.0), Some(13));
        assert_eq!(tone_to_index(69.4), None);
    }

    #[test]
    fn test_rtone_nibble_swap() {
        // At or below 48 the index is used as is
        assert_eq!(rtone_index(0), 0);
        assert_eq!(rtone_index(48), 48);

        // Above 48 the nibbles are swapped
        assert_eq!(rtone_index(49), 0x13);
        assert_eq!(rtone_index(0x50), 0x05);
        assert_eq!(rtone_index(0xFF), 0xFF);
    }

    #[test]
    fn test_flag_byte_layout() {
        let flags = ChannelFlags::from_byte(0b1011_0110);
        assert_eq!(
            flags,
            ChannelFlags {
                empty: true,
                skip: false,
                tmode: 0b11,
                duplex: 0b01,
                unknown: 0b10,
            }
        );
        assert_eq!(flags.to_byte(), 0b1011_0110);

        for byte in [0x00, 0xFF, 0x40, 0x81, 0x2C] {
            assert_eq!(ChannelFlags::from_byte(byte).to_byte(), byte);
        }
    }

    #[test]
    fn test_flag_byte_truncates_wide_values() {
        let flags = ChannelFlags {
            duplex: 4,
            ..Default::default()
        };
        assert_eq!(flags.to_byte(), 0x00);
    }

    #[test]
    fn test_raw_memory_layout() {
        let bytes: [u8; 20] = [
            0x14, 0x65, 0x20, 0x14, 0x60, 0x00, 0x80, 0x0D, 0x09, 0x01, 1, 2, 3, 4, 5, 6, 7, 8,
            9, 10,
        ];
        let raw = RawMemory::from_bytes(&bytes).unwrap();
        assert_eq!(raw.freq, [0x14, 0x65, 0x20]);
        assert_eq!(raw.txfreq, [0x14, 0x60, 0x00]);
        assert_eq!(raw.tmode, 0x80);
        assert_eq!(raw.rtone, 0x0D);
        assert_eq!(raw.ctone, 0x09);
        assert_eq!(raw.power, 0x01);
        assert_eq!(raw.unknown, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(raw.to_bytes(), bytes);

        assert!(matches!(
            RawMemory::from_bytes(&bytes[..19]),
            Err(RadioError::Parse(_))
        ));
    }

    #[test]
    fn test_get_memory_decodes_device_bytes() {
        let mut radio = blank_radio();
        let record = [
            0x14, 0x65, 0x20, 0x14, 0x60, 0x00, 0x00, 0x0D, 0x09, 0x00, 0, 0, 0, 0, 0, 0, 0, 0, 0,
            0,
        ];
        poke(&mut radio, 3, &record, 0b0100_0000, b"RPT 1   ");

        let mem = radio.get_memory(3).unwrap().unwrap();
        assert_eq!(mem.number, 3);
        assert_eq!(mem.freq, 146_520_000);
        assert_eq!(mem.offset, 146_000_000);
        assert_eq!(mem.duplex, "split");
        assert_eq!(mem.rtone, 100.0);
        assert_eq!(mem.ctone, 88.5);
        assert_eq!(mem.tmode, "TSQL");
        assert_eq!(mem.skip, "S");
        assert_eq!(mem.name, "RPT 1");
        assert!(!mem.empty);
    }

    #[test]
    fn test_get_memory_tmode_off_marker() {
        let mut radio = blank_radio();
        let mut record = [0u8; 20];
        record[..6].copy_from_slice(&[0x15, 0x00, 0x00, 0x15, 0x00, 0x00]);
        record[6] = TMODE_OFF;
        poke(&mut radio, 0, &record, 0x00, b"        ");

        let mem = radio.get_memory(0).unwrap().unwrap();
        assert_eq!(mem.tmode, "");
        assert_eq!(mem.skip, "");
        assert_eq!(mem.name, "");
    }

    #[test]
    fn test_get_memory_swapped_rtone() {
        let mut radio = blank_radio();
        let mut record = [0u8; 20];
        // 0x50 is stored for index 5 (77.0 Hz); ctone is never swapped
        record[7] = 0x50;
        record[8] = 0x05;
        poke(&mut radio, 1, &record, 0x00, b"SWAP    ");

        let mem = radio.get_memory(1).unwrap().unwrap();
        assert_eq!(mem.rtone, 77.0);
        assert_eq!(mem.ctone, 77.0);
    }

    #[test]
    fn test_get_memory_tone_out_of_table() {
        let mut radio = blank_radio();
        let mut record = [0u8; 20];
        record[8] = 51;
        poke(&mut radio, 2, &record, 0x00, b"BAD     ");

        match radio.get_memory(2) {
            Err(RadioError::InvalidTone { number, index }) => {
                assert_eq!(number, 2);
                assert_eq!(index, 51);
            }
            other => panic!("expected InvalidTone, got {:?}", other),
        }

        // 0xFF swaps to itself and is still past the table
        let mut record = [0u8; 20];
        record[7] = 0xFF;
        poke(&mut radio, 2, &record, 0x00, b"BAD     ");
        assert!(matches!(
            radio.get_memory(2),
            Err(RadioError::InvalidTone { index: 0xFF, .. })
        ));
    }

    #[test]
    fn test_empty_flag() {
        let mut radio = blank_radio();
        assert!(radio.get_memory(0).unwrap().is_none());
        assert!(radio.get_memories().unwrap().is_empty());
    }

    #[test]
    fn test_unset_name_marker_never_matches() {
        // An 8-byte field is never equal to the 4-byte marker, so even an
        // all-0xFF name decodes as characters
        assert_eq!(decode_name(&[0xFF; 8]), Some("\u{FF}".repeat(8)));
        assert_eq!(decode_name(b"ABC     "), Some("ABC".to_string()));
        assert_eq!(decode_name(b"  A\t\n  "), Some("  A".to_string()));
    }

    #[test]
    fn test_set_memory_roundtrip() {
        let mut radio = blank_radio();
        let mem = channel(7);
        radio.set_memory(&mem).unwrap();

        let decoded = radio.get_memory(7).unwrap().unwrap();
        assert_eq!(decoded.freq, mem.freq);
        assert_eq!(decoded.offset, mem.offset);
        assert_eq!(decoded.duplex, "split");
        assert_eq!(decoded.rtone, 100.0);
        assert_eq!(decoded.ctone, 100.0);
        assert_eq!(decoded.skip, "");
        assert_eq!(decoded.name, "CALL");
    }

    #[test]
    fn test_set_memory_bytes() {
        let mut radio = blank_radio();
        let mut mem = channel(0);
        mem.offset = 146_000_000;
        mem.duplex = "-".to_string();
        mem.skip = "S".to_string();
        mem.ctone = 88.5;
        radio.set_memory(&mem).unwrap();

        let mmap = radio.get_mmap().unwrap();
        assert_eq!(
            mmap.get(MEMORY_BASE, Some(20)).unwrap(),
            &[
                0x14, 0x65, 0x20, 0x14, 0x60, 0x00, 0xFF, 13, 9, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
                0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF
            ]
        );
        // skip bit, tmode TSQL (3), duplex "-" (2)
        assert_eq!(mmap.get_byte(FLAGS_BASE).unwrap(), 0b0111_1000);
        assert_eq!(mmap.get(NAME_BASE, Some(8)).unwrap(), b"CALL    ");
    }

    #[test]
    fn test_set_memory_preserves_untouched_bytes() {
        let mut radio = blank_radio();
        let mut record = [0u8; 20];
        record[6] = TMODE_OFF;
        record[9] = 0x02;
        record[10..].copy_from_slice(&[0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7, 0xA8, 0xA9]);
        poke(&mut radio, 4, &record, 0b0000_0011, b"OLD     ");

        radio.set_memory(&channel(4)).unwrap();

        let raw = radio.read_raw_memory(4).unwrap();
        assert_eq!(raw.tmode, TMODE_OFF);
        assert_eq!(raw.power, 0x02);
        assert_eq!(raw.unknown[0], 0xA0);
        assert_eq!(raw.unknown[9], 0xA9);

        // Flag byte starts from zero, so the unknown bits are cleared
        assert_eq!(radio.read_flags(4).unwrap().unknown, 0);

        // The record's tmode byte was not rewritten, so decode still says off
        assert_eq!(radio.get_memory(4).unwrap().unwrap().tmode, "");
    }

    #[test]
    fn test_split_duplex_masked_to_zero() {
        let mut radio = blank_radio();
        radio.set_memory(&channel(5)).unwrap();
        assert_eq!(radio.read_flags(5).unwrap().duplex, 0);

        let mut mem = channel(5);
        mem.duplex = "+".to_string();
        radio.set_memory(&mem).unwrap();
        assert_eq!(radio.read_flags(5).unwrap().duplex, 3);
    }

    #[test]
    fn test_tmode_flag_indexes() {
        let mut radio = blank_radio();
        for (tmode, index) in [("", 0), ("Tone", 2), ("TSQL", 3)] {
            let mut mem = channel(6);
            mem.tmode = tmode.to_string();
            radio.set_memory(&mem).unwrap();
            assert_eq!(radio.read_flags(6).unwrap().tmode, index, "tmode {:?}", tmode);
        }
    }

    #[test]
    fn test_high_rtone_does_not_roundtrip() {
        // Index 49 (250.3 Hz) is written unswapped but read back swapped
        let mut radio = blank_radio();
        let mut mem = channel(8);
        mem.rtone = 250.3;
        radio.set_memory(&mem).unwrap();

        assert_eq!(radio.read_raw_memory(8).unwrap().rtone, 49);
        assert_eq!(radio.get_memory(8).unwrap().unwrap().rtone, ICF_TONES[0x13]);
    }

    #[test]
    fn test_set_empty_only_sets_flag_bit() {
        let mut radio = blank_radio();
        radio.set_memory(&channel(9)).unwrap();
        let before = radio.get_mmap().unwrap().clone();

        radio.delete_memory(9).unwrap();
        assert!(radio.get_memory(9).unwrap().is_none());

        let after = radio.get_mmap().unwrap();
        let flag_pos = ICF1010Radio::flag_offset(9);
        for (i, (a, b)) in before
            .get_packed()
            .iter()
            .zip(after.get_packed())
            .enumerate()
        {
            if i == flag_pos {
                assert_eq!(*b, *a | 0x80);
            } else {
                assert_eq!(a, b, "byte {:#06x} changed", i);
            }
        }
    }

    #[test]
    fn test_absent_name_writes_four_byte_marker() {
        let mut radio = blank_radio();
        poke(&mut radio, 10, &[0u8; 20], 0x00, b"ABCDEFGH");

        let mut mem = channel(10);
        mem.name = String::new();
        radio.set_memory(&mem).unwrap();

        let name = radio.read_name_raw(10).unwrap();
        assert_eq!(name, &[0xFF, 0xFF, 0xFF, 0xFF, b'E', b'F', b'G', b'H']);
        assert_eq!(
            radio.get_memory(10).unwrap().unwrap().name,
            "\u{FF}\u{FF}\u{FF}\u{FF}EFGH"
        );
    }

    #[test]
    fn test_set_memory_rejects_bad_fields() {
        let mut radio = blank_radio();
        let before = radio.get_mmap().unwrap().clone();

        let mut mem = channel(11);
        mem.rtone = 69.4;
        assert!(matches!(radio.set_memory(&mem), Err(RadioError::Unsupported(_))));

        let mut mem = channel(11);
        mem.duplex = "off".to_string();
        assert!(matches!(radio.set_memory(&mem), Err(RadioError::Unsupported(_))));

        let mut mem = channel(11);
        mem.tmode = "DTCS".to_string();
        assert!(matches!(radio.set_memory(&mem), Err(RadioError::Unsupported(_))));

        let mut mem = channel(11);
        mem.name = "TOOLONGNAME".to_string();
        assert!(matches!(radio.set_memory(&mem), Err(RadioError::InvalidName(_))));

        let mut mem = channel(11);
        mem.name = "\u{263A}".to_string();
        assert!(matches!(radio.set_memory(&mem), Err(RadioError::InvalidName(_))));

        let mut mem = channel(11);
        mem.freq = 1_000_000_000;
        assert!(matches!(radio.set_memory(&mem), Err(RadioError::Bcd(_))));

        // Nothing was written by the failed attempts
        assert_eq!(radio.get_mmap().unwrap(), &before);
    }

    #[test]
    fn test_set_memory_rejects_invalid_values() {
        let mut radio = blank_radio();
        let before = radio.get_mmap().unwrap().clone();

        let mut mem = channel(11);
        mem.skip = "X".to_string();
        assert!(matches!(
            radio.set_memory(&mem),
            Err(RadioError::Memory(MemoryError::InvalidSkip(_)))
        ));

        let mut mem = channel(11);
        mem.ctone = 20.0;
        assert!(matches!(
            radio.set_memory(&mem),
            Err(RadioError::Memory(MemoryError::InvalidTone(_)))
        ));

        assert_eq!(radio.get_mmap().unwrap(), &before);
    }

    #[test]
    fn test_name_length_boundary() {
        let mut radio = blank_radio();

        let mut mem = channel(13);
        mem.name = "ABCDEFGH".to_string();
        radio.set_memory(&mem).unwrap();
        assert_eq!(radio.read_name_raw(13).unwrap(), b"ABCDEFGH");
        assert_eq!(radio.get_memory(13).unwrap().unwrap().name, "ABCDEFGH");

        mem.name = "ABCDEFGHI".to_string();
        assert!(matches!(
            radio.set_memory(&mem),
            Err(RadioError::InvalidName(name)) if name == "ABCDEFGHI"
        ));
        assert_eq!(radio.get_memory(13).unwrap().unwrap().name, "ABCDEFGH");
    }

    #[test]
    fn test_memory_bounds() {
        let mut radio = blank_radio();
        assert!(matches!(radio.get_memory(32), Err(RadioError::InvalidMemory(32))));
        assert!(matches!(
            radio.set_memory(&channel(32)),
            Err(RadioError::InvalidMemory(32))
        ));
        assert!(radio.get_raw_memory(32).is_err());
    }

    #[test]
    fn test_no_image_loaded() {
        let mut radio = ICF1010Radio::new();
        assert!(matches!(radio.get_memory(0), Err(RadioError::NoImage)));
        assert!(matches!(radio.set_memory(&channel(0)), Err(RadioError::NoImage)));
        assert!(radio.get_mmap().is_none());
    }

    #[test]
    fn test_get_memories() {
        let mut radio = blank_radio();
        radio.set_memory(&channel(2)).unwrap();
        radio.set_memory(&channel(30)).unwrap();

        let numbers: Vec<u32> = radio.get_memories().unwrap().iter().map(|m| m.number).collect();
        assert_eq!(numbers, vec![2, 30]);
    }

    #[test]
    fn test_get_raw_memory() {
        let mut radio = blank_radio();
        radio.set_memory(&channel(0)).unwrap();

        let dump = radio.get_raw_memory(0).unwrap();
        let lines: Vec<&str> = dump.lines().collect();
        // 20 + 8 + 1 bytes
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("00000000  14 65 20 14 65 20"));
        assert!(lines[1].ends_with("|....CALL    0|"));
    }

    #[test]
    fn test_features() {
        let radio = ICF1010Radio::new();
        let rf = radio.get_features();

        assert_eq!(rf.memory_bounds, (0, 31));
        assert_eq!(rf.valid_name_length, 8);
        assert_eq!(rf.valid_modes, vec!["FM".to_string()]);
        assert_eq!(rf.valid_duplexes.len(), 5);
        assert_eq!(rf.valid_tmodes, vec!["", "", "Tone", "TSQL"]);
        assert_eq!(
            rf.valid_bands,
            vec![(136_000_000, 155_000_000), (146_000_000, 174_000_000)]
        );
        assert_eq!(rf.valid_skips, vec!["", "1", "2", "3", "4", "5"]);
        assert_eq!(rf.valid_tones.len(), 51);
        assert!(rf.has_dtcs);
        assert!(!rf.has_dtcs_polarity);
        assert!(!rf.has_tuning_step);
        assert!(!rf.has_mode);
        assert!(!rf.has_bank);
        assert_eq!(radio.get_name(), "Icom IC-F1010");
    }

    #[test]
    fn test_decoded_memory_validates() {
        let mut radio = blank_radio();
        radio.set_memory(&channel(1)).unwrap();
        let mem = radio.get_memory(1).unwrap().unwrap();

        let msgs = radio.get_features().validate_memory(&mem);
        assert!(msgs.is_empty(), "{:?}", msgs);
    }

    #[test]
    fn test_clone_parameters() {
        let radio = ICF1010Radio::new();
        assert_eq!(radio.get_memsize(), 0x800);
        assert_eq!(radio.model_code(), &[0x17, 0x05, 0x02, 0x00]);
        assert_eq!(radio.endframe(), b"Icom Inc.");
        assert_eq!(radio.clone_ranges(), &[CloneRange::new(0, 0x7FF, 16)]);
        assert_eq!(radio.clone_block_count(), 128);
        assert!(radio.clone_ranges_fit());
    }

    #[test]
    fn test_process_mmap_and_match_model() {
        let mut radio = ICF1010Radio::new();
        assert!(matches!(
            radio.process_mmap(&MemoryMap::filled(0x7FF, 0xFF)),
            Err(RadioError::ImageSize {
                expected: 0x800,
                actual: 0x7FF
            })
        ));
        assert!(radio.process_mmap(&MemoryMap::filled(0x900, 0xFF)).is_ok());

        assert!(ICF1010Radio::match_model(&[0xFF; 0x800], "radio.img"));
        assert!(!ICF1010Radio::match_model(&[0xFF; 0x801], "radio.img"));
        assert!(!ICF1010Radio::match_model(&[], "radio.img"));
    }

    #[test]
    fn test_img_file_roundtrip() {
        let mut radio = blank_radio();
        radio.set_memory(&channel(12)).unwrap();

        let file = NamedTempFile::new().unwrap();
        save_img(file.path(), radio.get_mmap().unwrap(), &radio.metadata()).unwrap();

        let (mmap, metadata) = load_img(file.path()).unwrap();
        assert_eq!(metadata.rclass, "ICF1010Radio");
        assert_eq!(metadata.vendor, "Icom");
        assert_eq!(metadata.model, "IC-F1010");
        assert!(ICF1010Radio::match_model(mmap.get_packed(), "radio.img"));

        let mut reloaded = ICF1010Radio::from_mmap(&mmap).unwrap();
        assert_eq!(reloaded.get_memory(12).unwrap().unwrap().name, "CALL");
    }
}
