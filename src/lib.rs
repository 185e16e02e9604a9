// chirp-icf1010: Icom IC-F1010 memory image driver in the CHIRP model

pub mod bitwise;
pub mod core;
pub mod drivers;
pub mod formats;
pub mod memmap;

// Re-export commonly used types
pub use bitwise::{bcd_to_int_be, int_to_bcd_be, BcdError};
pub use crate::core::{constants::*, validation, Memory, RadioFeatures};
pub use drivers::{
    list_drivers, CloneModeRadio, ICF1010Radio, IcomCloneModeRadio, Radio, RadioError,
};
pub use formats::{load_img, save_img, Metadata};
pub use memmap::MemoryMap;

/// Crate version, recorded in saved .img metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
