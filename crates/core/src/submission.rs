//! The public character submission payload and its validation rules.

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::sanitize::{sanitize_line, sanitize_list, sanitize_text};

/// Maximum number of skill entries on a sheet.
pub const MAX_SKILLS: usize = 40;

/// Maximum number of inventory entries on a sheet.
pub const MAX_INVENTORY: usize = 60;

/// Maximum length of a single skill or inventory entry.
pub const MAX_LIST_ENTRY_LEN: usize = 120;

/// A character sheet as submitted from the public browser form.
///
/// Validation limits match the form; sanitization happens first via
/// [`CharacterSubmission::sanitized`] so limits apply to the cleaned
/// text.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CharacterSubmission {
    #[validate(length(min = 1, max = 80, message = "name must be 1-80 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 80, message = "player_name must be 1-80 characters"))]
    pub player_name: String,

    #[validate(length(min = 1, max = 60, message = "ancestry must be 1-60 characters"))]
    pub ancestry: String,

    #[validate(length(min = 1, max = 60, message = "class must be 1-60 characters"))]
    pub class: String,

    #[validate(range(min = 1, max = 20, message = "level must be between 1 and 20"))]
    pub level: i32,

    #[validate(length(max = 40, message = "alignment must be at most 40 characters"))]
    pub alignment: Option<String>,

    #[validate(length(min = 1, max = 10000, message = "backstory must be 1-10000 characters"))]
    pub backstory: String,

    #[validate(length(max = 5000, message = "appearance must be at most 5000 characters"))]
    pub appearance: Option<String>,

    #[validate(
        length(max = 40, message = "at most 40 skills"),
        custom(function = validate_entry_lengths)
    )]
    #[serde(default)]
    pub skills: Vec<String>,

    #[validate(
        length(max = 60, message = "at most 60 inventory entries"),
        custom(function = validate_entry_lengths)
    )]
    #[serde(default)]
    pub inventory: Vec<String>,
}

impl CharacterSubmission {
    /// Return a copy with every field passed through the sanitizer.
    ///
    /// Single-line fields have newlines folded away; long-text fields
    /// keep paragraph breaks; list entries that sanitize to empty are
    /// dropped. Optional fields that end up empty become `None`.
    pub fn sanitized(&self) -> Self {
        Self {
            name: sanitize_line(&self.name),
            player_name: sanitize_line(&self.player_name),
            ancestry: sanitize_line(&self.ancestry),
            class: sanitize_line(&self.class),
            level: self.level,
            alignment: self
                .alignment
                .as_deref()
                .map(sanitize_line)
                .filter(|s| !s.is_empty()),
            backstory: sanitize_text(&self.backstory),
            appearance: self
                .appearance
                .as_deref()
                .map(sanitize_text)
                .filter(|s| !s.is_empty()),
            skills: sanitize_list(&self.skills),
            inventory: sanitize_list(&self.inventory),
        }
    }
}

/// Validate that every list entry stays within [`MAX_LIST_ENTRY_LEN`].
fn validate_entry_lengths(items: &[String]) -> Result<(), ValidationError> {
    for item in items {
        if item.chars().count() > MAX_LIST_ENTRY_LEN {
            return Err(ValidationError::new("entry_too_long")
                .with_message(format!("list entries must be at most {MAX_LIST_ENTRY_LEN} characters").into()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_submission() -> CharacterSubmission {
        CharacterSubmission {
            name: "Thog the Bold".to_string(),
            player_name: "Sam".to_string(),
            ancestry: "Half-Orc".to_string(),
            class: "Barbarian".to_string(),
            level: 5,
            alignment: Some("Chaotic Good".to_string()),
            backstory: "Raised by wolves.\n\nNow he raises wolves.".to_string(),
            appearance: None,
            skills: vec!["Athletics".to_string(), "Intimidation".to_string()],
            inventory: vec!["Greataxe".to_string()],
        }
    }

    #[test]
    fn valid_submission_passes() {
        assert!(valid_submission().validate().is_ok());
    }

    #[test]
    fn empty_name_fails() {
        let mut sub = valid_submission();
        sub.name = String::new();
        assert!(sub.validate().is_err());
    }

    #[test]
    fn level_out_of_range_fails() {
        let mut sub = valid_submission();
        sub.level = 0;
        assert!(sub.validate().is_err());
        sub.level = 21;
        assert!(sub.validate().is_err());
    }

    #[test]
    fn too_many_skills_fails() {
        let mut sub = valid_submission();
        sub.skills = (0..=MAX_SKILLS).map(|i| format!("skill-{i}")).collect();
        assert!(sub.validate().is_err());
    }

    #[test]
    fn oversized_list_entry_fails() {
        let mut sub = valid_submission();
        sub.inventory = vec!["x".repeat(MAX_LIST_ENTRY_LEN + 1)];
        assert!(sub.validate().is_err());
    }

    #[test]
    fn sanitized_strips_control_characters_and_empties() {
        let mut sub = valid_submission();
        sub.name = "Thog\u{0007}  the Bold".to_string();
        sub.alignment = Some("   ".to_string());
        sub.skills = vec!["Stealth".to_string(), "\u{0001}".to_string()];

        let clean = sub.sanitized();
        assert_eq!(clean.name, "Thog the Bold");
        assert_eq!(clean.alignment, None);
        assert_eq!(clean.skills, vec!["Stealth"]);
    }

    #[test]
    fn sanitize_then_validate_catches_whitespace_only_name() {
        let mut sub = valid_submission();
        sub.name = " \t ".to_string();
        let clean = sub.sanitized();
        assert!(clean.validate().is_err(), "empty-after-sanitize name must fail");
    }
}
