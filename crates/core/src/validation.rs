//! Field constraints shared by request validation and the store.

use crate::error::CoreError;
use crate::patch::Patch;

pub const MAX_PROJECT_NAME_LEN: usize = 64;
pub const MAX_PROJECT_DESCRIPTION_LEN: usize = 1024;
pub const MAX_TASK_NAME_LEN: usize = 64;
pub const MAX_TASK_DESCRIPTION_LEN: usize = 256;
pub const MAX_PERSON_NAME_LEN: usize = 128;
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Trim and lower-case an email so lookups are case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Reject strings longer than `max` characters.
pub fn check_max_len(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Reject blank strings, counting whitespace-only as blank.
pub fn check_not_blank(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Length check for a patched field. `Missing` and `Null` pass.
pub fn check_patch_len(field: &str, value: &Patch<String>, max: usize) -> Result<(), CoreError> {
    match value.value() {
        Some(v) => check_max_len(field, v, max),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn max_len_counts_characters_not_bytes() {
        let name = "é".repeat(MAX_PROJECT_NAME_LEN);
        assert!(check_max_len("name", &name, MAX_PROJECT_NAME_LEN).is_ok());

        let too_long = "a".repeat(MAX_PROJECT_NAME_LEN + 1);
        assert_matches!(
            check_max_len("name", &too_long, MAX_PROJECT_NAME_LEN),
            Err(CoreError::Validation(msg)) if msg.contains("at most 64")
        );
    }

    #[test]
    fn blank_is_rejected() {
        assert!(check_not_blank("name", "   ").is_err());
        assert!(check_not_blank("name", "x").is_ok());
    }

    #[test]
    fn patch_len_ignores_unset_fields() {
        assert!(check_patch_len("description", &Patch::Missing, 3).is_ok());
        assert!(check_patch_len("description", &Patch::Null, 3).is_ok());
        assert!(check_patch_len("description", &Patch::Value("abcd".into()), 3).is_err());
    }
}
