// Metadata stored in the .img trailer

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Describes which driver wrote an image. Keys this crate does not know
/// about are kept in `extra` and written back out unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Metadata {
    /// Driver class name
    #[serde(default)]
    pub rclass: String,

    /// Vendor name
    #[serde(default)]
    pub vendor: String,

    /// Model name
    #[serde(default)]
    pub model: String,

    /// Model variant, empty for the base model
    #[serde(default)]
    pub variant: String,

    /// Version of the program that wrote the file
    #[serde(default)]
    pub chirp_version: String,

    /// Keys written by other programs
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Metadata {
    /// Metadata for `vendor` `model`, stamped with this crate's version
    pub fn new(vendor: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            vendor: vendor.into(),
            model: model.into(),
            chirp_version: crate::VERSION.to_string(),
            ..Default::default()
        }
    }

    /// Create metadata with all fields
    pub fn with_details(
        rclass: impl Into<String>,
        vendor: impl Into<String>,
        model: impl Into<String>,
        variant: impl Into<String>,
    ) -> Self {
        Self {
            rclass: rclass.into(),
            variant: variant.into(),
            ..Self::new(vendor, model)
        }
    }

    /// True if the image claims to be for `vendor` `model`. Files without
    /// metadata match anything.
    pub fn matches(&self, vendor: &str, model: &str) -> bool {
        self.model.is_empty() || (self.vendor == vendor && self.model == model)
    }

    /// Set an extra property
    pub fn set_extra(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.extra.insert(key.into(), value);
    }

    /// Get an extra property
    pub fn get_extra(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON; missing fields default to empty
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_creation() {
        let meta = Metadata::with_details("ICF1010Radio", "Icom", "IC-F1010", "");
        assert_eq!(meta.rclass, "ICF1010Radio");
        assert_eq!(meta.vendor, "Icom");
        assert_eq!(meta.model, "IC-F1010");
        assert!(meta.variant.is_empty());
        assert!(!meta.chirp_version.is_empty());
    }

    #[test]
    fn test_unknown_keys_survive() {
        let mut meta = Metadata::new("Icom", "IC-F1010");
        meta.set_extra("mem_extra", serde_json::json!({"0": "x"}));

        let reloaded = Metadata::from_json(&meta.to_json().unwrap()).unwrap();
        assert_eq!(reloaded, meta);
        assert_eq!(
            reloaded.get_extra("mem_extra"),
            Some(&serde_json::json!({"0": "x"}))
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let meta = Metadata::from_json(r#"{"model":"IC-F1010"}"#).unwrap();
        assert_eq!(meta.vendor, "");
        assert!(meta.extra.is_empty());
    }

    #[test]
    fn test_matches() {
        assert!(Metadata::default().matches("Icom", "IC-F1010"));
        assert!(Metadata::new("Icom", "IC-F1010").matches("Icom", "IC-F1010"));
        assert!(!Metadata::new("Baofeng", "UV-5R").matches("Icom", "IC-F1010"));
    }
}
