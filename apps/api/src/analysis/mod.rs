// Resume analysis engine.
// Rule-driven extraction and scoring only; every function here is pure over its input text.

pub mod analyzer;
pub mod extract;
pub mod features;
pub mod handlers;
pub mod improver;
pub mod matcher;
pub mod rules;

use crate::errors::AppError;

/// Minimum trimmed length, in characters, for any text submitted for analysis.
pub const MIN_TEXT_CHARS: usize = 50;

/// Rejects text whose trimmed length is below `MIN_TEXT_CHARS`.
pub fn require_min_length(text: &str, message: &str) -> Result<(), AppError> {
    if text.trim().chars().count() < MIN_TEXT_CHARS {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_length_counts_trimmed_characters() {
        let padded = format!("   {}   ", "a".repeat(49));
        assert!(require_min_length(&padded, "too short").is_err());
        assert!(require_min_length(&"é".repeat(50), "too short").is_ok());
    }
}
