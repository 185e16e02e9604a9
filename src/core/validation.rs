// Helpers for acting on validation results before a memory is stored

use super::features::{RadioFeatures, ValidationMessage};
use super::memory::Memory;

/// Validate a memory against radio features and return messages
pub fn validate_memory(features: &RadioFeatures, memory: &Memory) -> Vec<ValidationMessage> {
    features.validate_memory(memory)
}

/// Check if validation messages contain any errors
pub fn has_errors(messages: &[ValidationMessage]) -> bool {
    messages.iter().any(ValidationMessage::is_error)
}

/// Check if validation messages contain any warnings
pub fn has_warnings(messages: &[ValidationMessage]) -> bool {
    messages.iter().any(ValidationMessage::is_warning)
}

/// Text of the error messages, in order
pub fn errors_only(messages: &[ValidationMessage]) -> Vec<String> {
    texts_where(messages, ValidationMessage::is_error)
}

/// Text of the warning messages, in order
pub fn warnings_only(messages: &[ValidationMessage]) -> Vec<String> {
    texts_where(messages, ValidationMessage::is_warning)
}

fn texts_where(
    messages: &[ValidationMessage],
    keep: impl Fn(&ValidationMessage) -> bool,
) -> Vec<String> {
    messages
        .iter()
        .filter(|m| keep(m))
        .map(|m| m.message().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_helpers() {
        let msgs = vec![
            ValidationMessage::Warning("name truncated".to_string()),
            ValidationMessage::Error("tone not supported".to_string()),
            ValidationMessage::Warning("location out of range".to_string()),
        ];

        assert!(has_errors(&msgs));
        assert!(has_warnings(&msgs));
        assert_eq!(errors_only(&msgs), vec!["tone not supported".to_string()]);
        assert_eq!(
            warnings_only(&msgs),
            vec![
                "name truncated".to_string(),
                "location out of range".to_string()
            ]
        );

        assert!(!has_errors(&[]));
        assert!(errors_only(&[]).is_empty());
    }

    #[test]
    fn test_validate_memory_delegates() {
        let features = RadioFeatures {
            memory_bounds: (0, 9),
            ..Default::default()
        };
        let msgs = validate_memory(&features, &Memory::new_empty(12));
        assert!(has_warnings(&msgs));
        assert!(!has_errors(&msgs));
        assert_eq!(warnings_only(&msgs), vec!["Location 12 is out of range"]);
    }
}
