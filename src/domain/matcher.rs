//! Cell text matching.

use crate::error::{RedactorError, RedactorResult};

/// Payment description that identifies salary rows in payroll card exports.
pub const DEFAULT_PHRASE: &str = "Выплата заработной платы по ведомости";

/// Decides whether a cell's text marks its row for redaction.
pub trait CellMatcher: Send + Sync {
    fn matches(&self, text: &str) -> bool;

    /// Human-readable description used in log output.
    fn describe(&self) -> &str;
}

/// Literal, case-sensitive substring match.
///
/// The phrase may occur anywhere in the cell text; no trimming, case folding
/// or Unicode normalisation is applied to either side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatcher {
    phrase: String,
}

impl PhraseMatcher {
    /// Creates a matcher for a non-empty phrase.
    pub fn new(phrase: impl Into<String>) -> RedactorResult<Self> {
        let phrase = phrase.into();
        if phrase.is_empty() {
            return Err(RedactorError::InvalidInput {
                parameter: "phrase".to_string(),
                reason: "search phrase must not be empty".to_string(),
            });
        }
        Ok(Self { phrase })
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }
}

impl Default for PhraseMatcher {
    fn default() -> Self {
        Self {
            phrase: DEFAULT_PHRASE.to_string(),
        }
    }
}

impl CellMatcher for PhraseMatcher {
    fn matches(&self, text: &str) -> bool {
        text.contains(&self.phrase)
    }

    fn describe(&self) -> &str {
        &self.phrase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHRASE: &str = DEFAULT_PHRASE;

    #[test]
    fn test_substring_anywhere() {
        let matcher = PhraseMatcher::new(PHRASE).unwrap();
        assert!(matcher.matches("Выплата заработной платы по ведомости за март"));
        assert!(matcher.matches("№12 Выплата заработной платы по ведомости"));
        assert!(!matcher.matches("foo"));
    }

    #[test]
    fn test_case_sensitive() {
        let matcher = PhraseMatcher::new(PHRASE).unwrap();
        assert!(!matcher.matches("выплата заработной платы по ведомости"));
    }

    #[test]
    fn test_default_phrase() {
        assert_eq!(PhraseMatcher::default().phrase(), DEFAULT_PHRASE);
    }

    #[test]
    fn test_empty_phrase_rejected() {
        assert!(PhraseMatcher::new("").is_err());
    }
}
