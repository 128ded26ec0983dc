//! Category naming rules and the fixed default set.
//!
//! Default categories are always present and cannot be deleted. Any other
//! name becomes a custom category the first time it is referenced.

use std::collections::HashSet;

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Categories guaranteed to exist, in display order.
pub const DEFAULT_CATEGORY_NAMES: &[&str] = &["Cafe", "Pub", "Restaurant"];

/// Maximum length of a category name after trimming.
pub const MAX_CATEGORY_NAME_LENGTH: usize = 64;

/* --------------------------------------------------------------------------
Rules
-------------------------------------------------------------------------- */

/// Returns `true` if `name` exactly matches one of the default categories.
///
/// The comparison is case-sensitive, mirroring the unique constraint on
/// `categories.name`.
pub fn is_default_category(name: &str) -> bool {
    DEFAULT_CATEGORY_NAMES.contains(&name)
}

/// Whether a newly created category with this name is custom.
pub fn is_custom_name(name: &str) -> bool {
    !is_default_category(name)
}

/// Trim a category name referenced by a restaurant, rejecting blank names.
///
/// No length limit applies here; submitted tags are stored as given.
pub fn require_category_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Category name is required.".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Validate a name for the explicit "add category" entry point, returning
/// the trimmed value. Names are limited to [`MAX_CATEGORY_NAME_LENGTH`].
pub fn validate_category_name(name: &str) -> Result<String, CoreError> {
    let trimmed = require_category_name(name)?;
    if trimmed.chars().count() > MAX_CATEGORY_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Category name exceeds maximum length of {MAX_CATEGORY_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Normalize a submitted list of category names.
///
/// Each name is trimmed and empty entries are dropped. Names that differ
/// only by case collapse onto the first spelling submitted.
pub fn normalize_category_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut normalized = Vec::new();

    for name in names {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_lowercase()) {
            normalized.push(trimmed.to_string());
        }
    }

    normalized
}

/// Reject deletion of non-custom categories.
pub fn ensure_deletable(name: &str, is_custom: bool) -> Result<(), CoreError> {
    if is_custom {
        Ok(())
    } else {
        Err(CoreError::ProtectedCategory {
            name: name.to_string(),
        })
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
