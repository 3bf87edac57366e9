use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Outcome of comparing a reference token list against generated tokens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Share of reference tokens found in the generated set, 0 to 100.
    pub percentage: f64,
    /// Presence of each distinct reference token in the generated set.
    pub details: BTreeMap<String, bool>,
    pub exact_match: bool,
}

impl MatchResult {
    /// The result recorded for a row whose generated query is absent.
    pub fn missing() -> Self {
        Self {
            percentage: 0.0,
            details: BTreeMap::new(),
            exact_match: false,
        }
    }
}

/// Checks every reference token for membership in the generated token set.
///
/// Generated tokens are compared as a set, so their order and repetition do
/// not matter. Repeated reference tokens each count toward the denominator
/// but share one entry in `details`.
pub fn compare_tokens<R, G>(reference: &[R], generated: &[G]) -> MatchResult
where
    R: AsRef<str>,
    G: AsRef<str>,
{
    let generated: HashSet<&str> = generated.iter().map(|token| token.as_ref()).collect();
    let mut details = BTreeMap::new();
    let mut matched = 0usize;
    for token in reference {
        let token = token.as_ref();
        let present = generated.contains(token);
        if present {
            matched += 1;
        }
        details.insert(token.to_string(), present);
    }

    let percentage = if reference.is_empty() {
        0.0
    } else {
        matched as f64 / reference.len() as f64 * 100.0
    };
    let exact_match = !details.is_empty() && details.values().all(|&present| present);

    MatchResult {
        percentage,
        details,
        exact_match,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn test_full_coverage_is_exact() {
        let reference = ["select", "*", "from", "t"];
        let generated = tokenize("SELECT * FROM t WHERE x = 1");
        let result = compare_tokens(&reference, &generated);
        assert_eq!(result.percentage, 100.0);
        assert!(result.exact_match);
        assert_eq!(result.details.len(), 4);
        assert!(result.details.values().all(|&v| v));
    }

    #[test]
    fn test_partial_coverage() {
        let reference = ["select", "name", "from", "singer"];
        let generated = ["select", "title", "from", "singer"];
        let result = compare_tokens(&reference, &generated);
        assert_eq!(result.percentage, 75.0);
        assert!(!result.exact_match);
        assert_eq!(result.details.get("name"), Some(&false));
        assert_eq!(result.details.get("singer"), Some(&true));
    }

    #[test]
    fn test_empty_reference_scores_zero() {
        let reference: [&str; 0] = [];
        let result = compare_tokens(&reference, &["select"]);
        assert_eq!(result.percentage, 0.0);
        assert!(result.details.is_empty());
        assert!(!result.exact_match);
    }

    #[test]
    fn test_empty_generated() {
        let generated: [&str; 0] = [];
        let result = compare_tokens(&["select", "a"], &generated);
        assert_eq!(result.percentage, 0.0);
        assert_eq!(result.details.len(), 2);
        assert!(!result.exact_match);
    }

    #[test]
    fn test_duplicate_reference_tokens_weigh_in_denominator() {
        // "a" appears twice and is missing; "b" is found once
        let result = compare_tokens(&["a", "a", "b"], &["b"]);
        assert!((result.percentage - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(result.details.len(), 2);
        assert_eq!(result.details.get("a"), Some(&false));
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        // both sides are expected to be lower-cased before comparison
        let result = compare_tokens(&["select"], &["SELECT"]);
        assert_eq!(result.percentage, 0.0);
    }

    #[test]
    fn test_missing_row_result() {
        let result = MatchResult::missing();
        assert_eq!(result.percentage, 0.0);
        assert!(result.details.is_empty());
        assert!(!result.exact_match);
    }
}
