//! Todo domain rules: the `Importance` and `Status` enums, title validation
//! and the one-way status transition check.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum todo title length in characters.
pub const MAX_TITLE_LEN: usize = 100;

// ---------------------------------------------------------------------------
// Importance
// ---------------------------------------------------------------------------

/// Ordinal importance of a todo. Stored as TEXT, serialized verbatim
/// (`"High"` / `"Medium"` / `"Low"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "PascalCase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

impl Default for Importance {
    fn default() -> Self {
        Self::Medium
    }
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Parse from a request field. Unknown values are a validation error.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "High" => Ok(Self::High),
            "Medium" => Ok(Self::Medium),
            "Low" => Ok(Self::Low),
            other => Err(CoreError::Validation(format!(
                "Invalid importance '{other}': expected High, Medium or Low"
            ))),
        }
    }

    /// Trello label color used when mirroring the todo as a card.
    pub fn label_color(&self) -> &'static str {
        match self {
            Self::High => "red",
            Self::Medium => "yellow",
            Self::Low => "green",
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a todo. `Completed` is terminal-leaning: direct
/// reactivation back to `Active` is forbidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "PascalCase")]
pub enum Status {
    Active,
    Completed,
}

impl Default for Status {
    fn default() -> Self {
        Self::Active
    }
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Completed => "Completed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "Active" => Ok(Self::Active),
            "Completed" => Ok(Self::Completed),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{other}': expected Active or Completed"
            ))),
        }
    }
}

/// Reject the one forbidden transition: `Completed` back to `Active`.
/// Every other pair (including no-op transitions) is allowed.
pub fn check_status_transition(current: Status, requested: Status) -> Result<(), CoreError> {
    if current == Status::Completed && requested == Status::Active {
        return Err(CoreError::Conflict(
            "Completed todos cannot be reactivated".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Validate and normalize a todo title: trimmed, non-empty, at most
/// [`MAX_TITLE_LEN`] characters. Returns the trimmed title.
pub fn validate_title(title: &str) -> Result<String, CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Title is required".to_string()));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must be {MAX_TITLE_LEN} characters or less"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn importance_label_colors() {
        assert_eq!(Importance::High.label_color(), "red");
        assert_eq!(Importance::Medium.label_color(), "yellow");
        assert_eq!(Importance::Low.label_color(), "green");
    }

    #[test]
    fn importance_parse_round_trip() {
        for v in [Importance::High, Importance::Medium, Importance::Low] {
            assert_eq!(Importance::parse(v.as_str()).unwrap(), v);
        }
        assert!(Importance::parse("Urgent").is_err());
    }

    #[test]
    fn status_parse_rejects_unknown() {
        assert_eq!(Status::parse("Active").unwrap(), Status::Active);
        assert!(Status::parse("Done").is_err());
    }

    #[test]
    fn completed_cannot_be_reactivated() {
        assert!(check_status_transition(Status::Completed, Status::Active).is_err());
    }

    #[test]
    fn all_other_transitions_allowed() {
        assert!(check_status_transition(Status::Active, Status::Active).is_ok());
        assert!(check_status_transition(Status::Active, Status::Completed).is_ok());
        assert!(check_status_transition(Status::Completed, Status::Completed).is_ok());
    }

    #[test]
    fn title_is_trimmed() {
        assert_eq!(validate_title("  Doctor  ").unwrap(), "Doctor");
    }

    #[test]
    fn empty_title_rejected() {
        assert!(validate_title("   ").is_err());
    }

    #[test]
    fn over_length_title_rejected() {
        let long = "x".repeat(MAX_TITLE_LEN + 1);
        assert!(validate_title(&long).is_err());
        let exact = "x".repeat(MAX_TITLE_LEN);
        assert!(validate_title(&exact).is_ok());
    }
}
