// Radio driver traits and the driver-level error type

use crate::bitwise::BcdError;
use crate::core::{Memory, MemoryError, RadioFeatures};
use crate::memmap::{MemoryMap, MemoryMapError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RadioError {
    #[error("Invalid memory location: {0}")]
    InvalidMemory(u32),

    #[error("No memory image loaded")]
    NoImage,

    #[error("Memory image too small: expected {expected} bytes, got {actual}")]
    ImageSize { expected: usize, actual: usize },

    #[error("Memory {number}: tone index {index} is outside the tone table")]
    InvalidTone { number: u32, index: u8 },

    #[error("Invalid channel name {0:?}")]
    InvalidName(String),

    #[error("Unsupported value: {0}")]
    Unsupported(String),

    #[error("Failed to parse record: {0}")]
    Parse(String),

    #[error("BCD decode error: {0}")]
    Bcd(#[from] BcdError),

    #[error("Memory map error: {0}")]
    MemoryMap(#[from] MemoryMapError),

    #[error(transparent)]
    Memory(#[from] MemoryError),
}

pub type RadioResult<T> = std::result::Result<T, RadioError>;

/// Base trait for all radio drivers
pub trait Radio: Send {
    fn vendor(&self) -> &str;

    fn model(&self) -> &str;

    fn get_features(&self) -> RadioFeatures;

    fn get_name(&self) -> String {
        format!("{} {}", self.vendor(), self.model())
    }

    /// Decode one channel. Returns None if the slot is empty.
    fn get_memory(&mut self, number: u32) -> RadioResult<Option<Memory>>;

    /// Encode one channel. A memory with `empty` set clears the slot.
    fn set_memory(&mut self, memory: &Memory) -> RadioResult<()>;

    fn delete_memory(&mut self, number: u32) -> RadioResult<()> {
        self.set_memory(&Memory::new_empty(number))
    }

    /// All non-empty channels within the radio's memory bounds. Stops at the
    /// first channel that fails to decode.
    fn get_memories(&mut self) -> RadioResult<Vec<Memory>> {
        let (start, end) = self.get_features().memory_bounds;
        let mut memories = Vec::new();

        for i in start..=end {
            if let Some(mem) = self.get_memory(i)? {
                memories.push(mem);
            }
        }

        Ok(memories)
    }
}

/// Radios programmed by transferring a whole memory image
///
/// Moving the image to and from the radio is the host's job; a driver only
/// interprets an image it has been handed.
pub trait CloneModeRadio: Radio {
    /// Size of the radio's memory image in bytes
    fn get_memsize(&self) -> usize;

    /// Take ownership of a copy of `mmap` as the image to decode
    fn process_mmap(&mut self, mmap: &MemoryMap) -> RadioResult<()>;

    /// The loaded image, including any changes made through `set_memory`
    fn get_mmap(&self) -> Option<&MemoryMap>;

    /// Whether `data` (read from `filename`) looks like an image for this radio
    fn match_model(data: &[u8], filename: &str) -> bool
    where
        Self: Sized;
}

/// One address range the Icom clone protocol transfers, in `block_size`
/// chunks. `end` is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloneRange {
    pub start: usize,
    pub end: usize,
    pub block_size: usize,
}

impl CloneRange {
    pub const fn new(start: usize, end: usize, block_size: usize) -> Self {
        Self {
            start,
            end,
            block_size,
        }
    }

    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn block_count(&self) -> usize {
        self.len().div_ceil(self.block_size)
    }
}

/// Static parameters an Icom clone-mode transport needs for this radio
pub trait IcomCloneModeRadio: CloneModeRadio {
    /// Model identifier the radio answers with
    fn model_code(&self) -> &'static [u8];

    /// Trailer sent after the last block
    fn endframe(&self) -> &'static [u8];

    fn clone_ranges(&self) -> &'static [CloneRange];

    fn clone_block_count(&self) -> usize {
        self.clone_ranges().iter().map(CloneRange::block_count).sum()
    }

    /// True if every clone range lies inside the memory image
    fn clone_ranges_fit(&self) -> bool {
        let memsize = self.get_memsize();
        self.clone_ranges()
            .iter()
            .all(|r| !r.is_empty() && r.end < memsize)
    }
}
