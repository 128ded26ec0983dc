//! Restaurant field validation.
//!
//! Error messages are user-facing and surfaced verbatim by the API.

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum length of a restaurant name after trimming.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of a restaurant note after trimming.
pub const MAX_NOTE_LENGTH: usize = 5_000;

/// Lowest accepted star rating.
pub const MIN_RATING: f64 = 1.0;

/// Highest accepted star rating.
pub const MAX_RATING: f64 = 5.0;

/// Validate a restaurant name, returning the trimmed value.
pub fn validate_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Name is required.".to_string()));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Name exceeds maximum length of {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim a note; blank notes become `None`.
pub fn normalize_note(note: Option<&str>) -> Result<Option<String>, CoreError> {
    let Some(trimmed) = note.map(str::trim).filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    if trimmed.chars().count() > MAX_NOTE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Note exceeds maximum length of {MAX_NOTE_LENGTH} characters"
        )));
    }
    Ok(Some(trimmed.to_string()))
}

/// Validate that an id refers to a possibly persisted restaurant.
pub fn validate_restaurant_id(id: DbId) -> Result<DbId, CoreError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(CoreError::Validation("Invalid restaurant id.".to_string()))
    }
}

/// Validate a star rating: finite and within `[MIN_RATING, MAX_RATING]`.
pub fn validate_rating(rating: f64) -> Result<f64, CoreError> {
    if rating.is_finite() && (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(CoreError::Validation(
            "Rating must be between 1 and 5.".to_string(),
        ))
    }
}
