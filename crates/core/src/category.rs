//! Category field validation.
//!
//! Categories carry bilingual display names; the API accepts a single `name`
//! and `description` and writes both language columns, so validation happens
//! once here on the incoming value.

use crate::error::CoreError;

/// Maximum category name length in characters.
pub const MAX_NAME_LEN: usize = 50;

/// Maximum category description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Display color assigned when the caller omits one.
pub const DEFAULT_COLOR: &str = "#667eea";

/// Validate and normalize a category name: trimmed, non-empty, at most
/// [`MAX_NAME_LEN`] characters.
pub fn validate_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Category name is required".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Category name must be {MAX_NAME_LEN} characters or less"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate and normalize an optional description (trimmed, length-capped).
pub fn validate_description(description: Option<&str>) -> Result<String, CoreError> {
    let trimmed = description.unwrap_or("").trim();
    if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Category description must be {MAX_DESCRIPTION_LEN} characters or less"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate an optional `#RRGGBB` display color, falling back to
/// [`DEFAULT_COLOR`] when absent.
pub fn validate_color(color: Option<&str>) -> Result<String, CoreError> {
    let Some(color) = color.map(str::trim).filter(|c| !c.is_empty()) else {
        return Ok(DEFAULT_COLOR.to_string());
    };
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(CoreError::Validation(format!(
            "Invalid color '{color}': expected #RRGGBB"
        )));
    }
    Ok(color.to_string())
}
