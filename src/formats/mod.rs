// File format handlers
pub mod img;
pub mod metadata;

pub use img::{load_img, save_img, ImgError, MAGIC};
pub use metadata::Metadata;
