// Memory map holding a radio's raw image bytes

use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryMapError {
    #[error("Index out of bounds: {index} (image is {len} bytes)")]
    IndexOutOfBounds { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, MemoryMapError>;

/// Fixed-size image of a radio's memory, addressed by byte offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryMap {
    data: Vec<u8>,
}

impl MemoryMap {
    /// Create a new memory map from bytes
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Create a memory map of `size` bytes, all set to `fill`
    ///
    /// Erased flash reads as 0xFF, so a blank image is usually
    /// `MemoryMap::filled(size, 0xFF)`.
    pub fn filled(size: usize, fill: u8) -> Self {
        Self {
            data: vec![fill; size],
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn range(&self, start: usize, length: Option<usize>) -> Result<std::ops::Range<usize>> {
        let len = self.data.len();
        if start > len {
            return Err(MemoryMapError::IndexOutOfBounds { index: start, len });
        }

        let end = match length {
            Some(n) => start
                .checked_add(n)
                .filter(|&end| end <= len)
                .ok_or(MemoryMapError::IndexOutOfBounds {
                    index: start.saturating_add(n),
                    len,
                })?,
            None => len,
        };

        Ok(start..end)
    }

    /// Get `length` bytes from `start`, or everything from `start` when
    /// `length` is None
    pub fn get(&self, start: usize, length: Option<usize>) -> Result<&[u8]> {
        let range = self.range(start, length)?;
        Ok(&self.data[range])
    }

    pub fn get_mut(&mut self, start: usize, length: Option<usize>) -> Result<&mut [u8]> {
        let range = self.range(start, length)?;
        Ok(&mut self.data[range])
    }

    pub fn get_byte(&self, pos: usize) -> Result<u8> {
        self.data
            .get(pos)
            .copied()
            .ok_or(MemoryMapError::IndexOutOfBounds {
                index: pos,
                len: self.data.len(),
            })
    }

    pub fn set_byte(&mut self, pos: usize, value: u8) -> Result<()> {
        let len = self.data.len();
        let byte = self
            .data
            .get_mut(pos)
            .ok_or(MemoryMapError::IndexOutOfBounds { index: pos, len })?;
        *byte = value;
        Ok(())
    }

    /// Overwrite bytes starting at `pos`
    pub fn set_bytes(&mut self, pos: usize, bytes: &[u8]) -> Result<()> {
        self.get_mut(pos, Some(bytes.len()))?
            .copy_from_slice(bytes);
        Ok(())
    }

    /// Entire image as raw bytes
    pub fn get_packed(&self) -> &[u8] {
        &self.data
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.data.clone()
    }

    pub fn truncate(&mut self, size: usize) {
        self.data.truncate(size);
    }

    /// Hex dump of `start..end` (whole image by default), clamped to the image
    pub fn printable(&self, start: Option<usize>, end: Option<usize>) -> String {
        let end = end.unwrap_or(self.data.len()).min(self.data.len());
        let start = start.unwrap_or(0).min(end);
        hexdump(&self.data[start..end])
    }
}

impl From<Vec<u8>> for MemoryMap {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for MemoryMap {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

impl AsRef<[u8]> for MemoryMap {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for MemoryMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemoryMap({} bytes)", self.data.len())
    }
}

/// `hexdump -C` style rendering: offset, 16 hex bytes, ASCII column
pub fn hexdump(data: &[u8]) -> String {
    let mut output = String::new();

    for (i, chunk) in data.chunks(16).enumerate() {
        output.push_str(&format!("{:08x}  ", i * 16));

        for j in 0..16 {
            if j == 8 {
                output.push(' ');
            }
            match chunk.get(j) {
                Some(byte) => output.push_str(&format!("{:02x} ", byte)),
                None => output.push_str("   "),
            }
        }

        output.push_str(" |");
        output.extend(chunk.iter().map(|&b| {
            if (0x20..=0x7e).contains(&b) {
                b as char
            } else {
                '.'
            }
        }));
        output.push_str("|\n");
    }

    output
}
