// Channel record, capability description and the shared value tables
pub mod constants;
pub mod features;
pub mod memory;
pub mod validation;

pub use constants::*;
pub use features::{RadioFeatures, ValidationMessage};
pub use memory::{Memory, MemoryError};
