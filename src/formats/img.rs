// .img files: raw memory image, then an optional metadata trailer
//
// <image bytes> MAGIC <base64(JSON metadata)>

use super::metadata::Metadata;
use crate::memmap::MemoryMap;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImgError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Metadata is not UTF-8: {0}")]
    MetadataDecode(String),

    #[error("Failed to parse metadata JSON: {0}")]
    MetadataJson(#[from] serde_json::Error),

    #[error("Failed to decode base64 metadata: {0}")]
    Base64Decode(#[from] base64::DecodeError),
}

pub type Result<T> = std::result::Result<T, ImgError>;

/// Separates the image from the metadata trailer
pub const MAGIC: &[u8] = b"\x00\xffchirp\xeeimg\x00\x01";

/// Read an image file. Files without a trailer load with default metadata.
pub fn load_img(filename: impl AsRef<Path>) -> Result<(MemoryMap, Metadata)> {
    let path = filename.as_ref();
    let mut data = fs::read(path)?;

    let metadata = match find_magic(&data) {
        Some(idx) => {
            let metadata = decode_metadata(&data[idx + MAGIC.len()..])?;
            data.truncate(idx);
            metadata
        }
        None => {
            tracing::debug!("{} has no metadata trailer", path.display());
            Metadata::default()
        }
    };

    tracing::info!(
        "Loaded {} bytes from {} ({} {})",
        data.len(),
        path.display(),
        metadata.vendor,
        metadata.model
    );

    Ok((MemoryMap::new(data), metadata))
}

/// Write `mmap` followed by the metadata trailer
pub fn save_img(filename: impl AsRef<Path>, mmap: &MemoryMap, metadata: &Metadata) -> Result<()> {
    let json = metadata.to_json()?;

    let mut out = Vec::with_capacity(mmap.len() + MAGIC.len() + json.len() * 4 / 3 + 4);
    out.extend_from_slice(mmap.get_packed());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(STANDARD.encode(json).as_bytes());

    fs::write(filename.as_ref(), out)?;
    tracing::info!("Saved {} bytes to {}", mmap.len(), filename.as_ref().display());
    Ok(())
}

fn find_magic(data: &[u8]) -> Option<usize> {
    data.windows(MAGIC.len()).position(|window| window == MAGIC)
}

fn decode_metadata(encoded: &[u8]) -> Result<Metadata> {
    let decoded = STANDARD.decode(encoded.trim_ascii())?;
    let json = String::from_utf8(decoded).map_err(|e| ImgError::MetadataDecode(e.to_string()))?;
    Ok(Metadata::from_json(&json)?)
}
