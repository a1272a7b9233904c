//! Common validation utilities for request payloads.

use validator::ValidationError;

/// Validates an entity name (locations, tags, readers, assets).
///
/// Names are used as lookup keys and appear in log output, so they are
/// restricted to visible characters.
pub fn validate_entity_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("name_blank");
        err.message = Some("Name must not be blank".into());
        return Err(err);
    }
    if name.chars().any(|c| c.is_control()) {
        let mut err = ValidationError::new("name_control_chars");
        err.message = Some("Name must not contain control characters".into());
        return Err(err);
    }
    Ok(())
}

/// Validates an estimated distance reading.
///
/// Reader firmware sends -1 for "tag not found", so the valid range is
/// [-1, inf).
pub fn validate_estimated_distance(distance: f64) -> Result<(), ValidationError> {
    if distance >= -1.0 && distance.is_finite() {
        Ok(())
    } else {
        let mut err = ValidationError::new("estimated_distance_range");
        err.message = Some("Estimated distance must be -1 or greater".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_entity_names() {
        assert!(validate_entity_name("Ward 3 East").is_ok());
        assert!(validate_entity_name("READER-01").is_ok());
        assert!(validate_entity_name("ASSET-0042").is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(validate_entity_name("").is_err());
        assert!(validate_entity_name("   ").is_err());
    }

    #[test]
    fn test_control_chars_rejected() {
        assert!(validate_entity_name("bad\nname").is_err());
        assert!(validate_entity_name("bad\0name").is_err());
    }

    #[test]
    fn test_distance_range() {
        assert!(validate_estimated_distance(0.0).is_ok());
        assert!(validate_estimated_distance(4.75).is_ok());
        assert!(validate_estimated_distance(-1.0).is_ok());
        assert!(validate_estimated_distance(-1.5).is_err());
        assert!(validate_estimated_distance(f64::NAN).is_err());
        assert!(validate_estimated_distance(f64::INFINITY).is_err());
    }
}
