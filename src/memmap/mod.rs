// Byte store for a radio's memory image
pub mod memory_map;

pub use memory_map::{hexdump, MemoryMap, MemoryMapError};
