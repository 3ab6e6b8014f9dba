//! Entity extraction from user utterances.
//!
//! Pattern matching is deliberately simple and enumerable: part numbers are
//! "PS" followed by digits, model numbers are longer mixed alphanumeric
//! tokens. Heuristic by design; the classifier's structured output can
//! override anything extracted here.

use super::model::IntentEntities;

/// Minimum digits after the "PS" prefix for a token to count as a part number.
const MIN_PART_DIGITS: usize = 5;

/// Minimum length for a token to be considered a model number.
const MIN_MODEL_LEN: usize = 6;

/// Extracts the first part identifier (e.g. "PS11752778") from `text`.
pub fn extract_part_number(text: &str) -> Option<String> {
    tokens(text).find_map(|token| {
        let upper = token.to_uppercase();
        let digits = upper.strip_prefix("PS")?;
        if digits.len() >= MIN_PART_DIGITS && digits.chars().all(|c| c.is_ascii_digit()) {
            Some(upper)
        } else {
            None
        }
    })
}

/// Extracts the first appliance model identifier (e.g. "WDT780SAEM1").
///
/// A model number is a mixed alphanumeric token that is not a part number.
pub fn extract_model_number(text: &str) -> Option<String> {
    tokens(text).find_map(|token| {
        let upper = token.to_uppercase();
        if upper.len() < MIN_MODEL_LEN
            || !upper.chars().all(|c| c.is_ascii_alphanumeric())
            || !upper.chars().any(|c| c.is_ascii_digit())
            || !upper.chars().any(|c| c.is_ascii_alphabetic())
        {
            return None;
        }
        // PS-prefixed all-digit tails are part numbers, not models.
        if let Some(tail) = upper.strip_prefix("PS") {
            if tail.chars().all(|c| c.is_ascii_digit()) {
                return None;
            }
        }
        Some(upper)
    })
}

/// Extracts all recognized entities from `text`.
pub fn extract_entities(text: &str) -> IntentEntities {
    IntentEntities {
        part_number: extract_part_number(text),
        model_number: extract_model_number(text),
        is_follow_up: false,
    }
}

/// Splits on whitespace and strips surrounding punctuation.
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_ascii_alphanumeric()))
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_part_number() {
        assert_eq!(
            extract_part_number("is ps11752778 in stock?").as_deref(),
            Some("PS11752778")
        );
        assert_eq!(
            extract_part_number("Need PS11752778, please.").as_deref(),
            Some("PS11752778")
        );
    }

    #[test]
    fn rejects_short_or_malformed_part_numbers() {
        assert_eq!(extract_part_number("ps123"), None);
        assert_eq!(extract_part_number("PSABC12345"), None);
        assert_eq!(extract_part_number("no identifiers here"), None);
    }

    #[test]
    fn finds_model_number() {
        assert_eq!(
            extract_model_number("my dishwasher is a WDT780SAEM1").as_deref(),
            Some("WDT780SAEM1")
        );
    }

    #[test]
    fn part_number_is_not_a_model() {
        assert_eq!(extract_model_number("PS11752778"), None);
    }

    #[test]
    fn plain_words_are_not_models() {
        assert_eq!(extract_model_number("my dishwasher is broken"), None);
    }

    #[test]
    fn extracts_both_from_one_utterance() {
        let entities = extract_entities("does PS11752778 fit WDT780SAEM1?");
        assert_eq!(entities.part_number.as_deref(), Some("PS11752778"));
        assert_eq!(entities.model_number.as_deref(), Some("WDT780SAEM1"));
        assert!(!entities.is_follow_up);
    }
}
