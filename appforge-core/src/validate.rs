//! Prompt validation.
//!
//! Validation runs before any network call; a rejected prompt never reaches
//! the platform API.

use crate::error::CoreError;

/// Minimum accepted prompt length in characters.
pub const MIN_PROMPT_CHARS: usize = 10;

/// Maximum accepted prompt length in characters.
pub const MAX_PROMPT_CHARS: usize = 500;

/// Validates a caller-supplied generation prompt.
///
/// Length is counted in characters, not bytes, so multi-byte input is not
/// penalized.
pub fn validate_prompt(prompt: &str) -> Result<(), CoreError> {
    let len = prompt.chars().count();

    if len < MIN_PROMPT_CHARS {
        return Err(CoreError::InvalidPrompt(format!(
            "prompt must be at least {MIN_PROMPT_CHARS} characters, got {len}"
        )));
    }

    if len > MAX_PROMPT_CHARS {
        return Err(CoreError::InvalidPrompt(format!(
            "prompt must be at most {MAX_PROMPT_CHARS} characters, got {len}"
        )));
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_prompt_rejected() {
        assert!(validate_prompt("short").is_err());
        assert!(validate_prompt("").is_err());
    }

    #[test]
    fn test_minimum_boundary() {
        assert!(validate_prompt(&"x".repeat(MIN_PROMPT_CHARS - 1)).is_err());
        assert!(validate_prompt(&"x".repeat(MIN_PROMPT_CHARS)).is_ok());
    }

    #[test]
    fn test_maximum_boundary() {
        assert!(validate_prompt(&"x".repeat(MAX_PROMPT_CHARS)).is_ok());
        assert!(validate_prompt(&"x".repeat(MAX_PROMPT_CHARS + 1)).is_err());
    }

    #[test]
    fn test_multibyte_counted_as_characters() {
        // 500 three-byte characters: 1500 bytes but exactly at the limit.
        assert!(validate_prompt(&"あ".repeat(MAX_PROMPT_CHARS)).is_ok());
    }
}
