use crate::complexity::{Hardness, classify};
use crate::error::{EvalError, Result};
use crate::lexer::tokenize;
use crate::matcher::{MatchResult, compare_tokens};
use crate::reference::RawTokenField;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// One dataset row as the evaluator sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalRow {
    /// 1-based position among the data rows.
    pub row: usize,
    /// Reference SQL text, used for classification.
    pub query: Option<String>,
    /// Reference tokens.
    pub query_toks: Option<RawTokenField>,
    /// Model output; absent when the model produced nothing.
    pub generated_query: Option<String>,
}

impl EvalRow {
    pub fn new(row: usize, query: impl Into<String>, query_toks: RawTokenField) -> Self {
        Self {
            row,
            query: Some(query.into()),
            query_toks: Some(query_toks),
            generated_query: None,
        }
    }

    pub fn with_generated(mut self, generated: impl Into<String>) -> Self {
        self.generated_query = Some(generated.into());
        self
    }
}

/// Per-row evaluation output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowOutcome {
    pub row: usize,
    pub hardness_level: Hardness,
    pub partial_match_percentage: f64,
    pub match_details: BTreeMap<String, bool>,
    /// 1 when every reference token was found, else 0.
    pub exact_match: u8,
    #[serde(skip)]
    pub generated_missing: bool,
}

/// Classifies a row and scores its generated query against the reference.
///
/// A missing generated query is not an error: it scores zero without
/// looking at the reference tokens. A missing `query` or an undecodable
/// `query_toks` fails with the row number and field.
pub fn evaluate_row(row: &EvalRow) -> Result<RowOutcome> {
    let query = row.query.as_deref().ok_or(EvalError::InvalidInput {
        row: row.row,
        field: "query",
    })?;
    let hardness_level = classify(query);

    let Some(generated) = row.generated_query.as_deref() else {
        warn!(row = row.row, "generated query missing, scoring as zero");
        return Ok(outcome(row.row, hardness_level, MatchResult::missing(), true));
    };

    let reference = row
        .query_toks
        .clone()
        .ok_or(EvalError::InvalidInput {
            row: row.row,
            field: "query_toks",
        })?
        .resolve()
        .map_err(|reason| EvalError::Decoding {
            row: row.row,
            field: "query_toks",
            reason,
        })?;
    let generated = tokenize(generated);
    let result = compare_tokens(&reference, &generated);
    debug!(
        row = row.row,
        tier = %hardness_level,
        percentage = result.percentage,
        exact = result.exact_match,
        "evaluated row"
    );
    Ok(outcome(row.row, hardness_level, result, false))
}

fn outcome(row: usize, hardness_level: Hardness, result: MatchResult, missing: bool) -> RowOutcome {
    RowOutcome {
        row,
        hardness_level,
        partial_match_percentage: result.percentage,
        match_details: result.details,
        exact_match: u8::from(result.exact_match),
        generated_missing: missing,
    }
}

/// Evaluates rows in parallel, returning outcomes in input order.
///
/// When several rows fail, the error of the earliest one is returned.
pub fn evaluate_rows(rows: &[EvalRow]) -> Result<Vec<RowOutcome>> {
    let outcomes: Vec<Result<RowOutcome>> = rows.par_iter().map(evaluate_row).collect();
    outcomes.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(text: &str) -> RawTokenField {
        RawTokenField::Literal(text.to_string())
    }

    #[test]
    fn test_exact_row() {
        let row = EvalRow::new(1, "SELECT * FROM t", literal("['SELECT', '*', 'FROM', 't']"))
            .with_generated("select * from T where x = 1");
        let outcome = evaluate_row(&row).unwrap();
        assert_eq!(outcome.hardness_level, Hardness::Easy);
        assert_eq!(outcome.partial_match_percentage, 100.0);
        assert_eq!(outcome.exact_match, 1);
        assert!(!outcome.generated_missing);
    }

    #[test]
    fn test_missing_generated_ignores_reference() {
        let row = EvalRow::new(4, "SELECT a FROM t", literal("not a list at all"));
        let outcome = evaluate_row(&row).unwrap();
        assert_eq!(outcome.partial_match_percentage, 0.0);
        assert!(outcome.match_details.is_empty());
        assert_eq!(outcome.exact_match, 0);
        assert!(outcome.generated_missing);
    }

    #[test]
    fn test_empty_generated_is_not_missing() {
        let row = EvalRow::new(1, "SELECT a FROM t", literal("['select', 'a']")).with_generated("");
        let outcome = evaluate_row(&row).unwrap();
        assert_eq!(outcome.partial_match_percentage, 0.0);
        assert_eq!(outcome.match_details.len(), 2);
        assert!(!outcome.generated_missing);
    }

    #[test]
    fn test_empty_reference_is_never_exact() {
        let row = EvalRow::new(1, "SELECT a FROM t", literal("[]")).with_generated("SELECT a FROM t");
        let outcome = evaluate_row(&row).unwrap();
        assert_eq!(outcome.exact_match, 0);
        assert_eq!(outcome.partial_match_percentage, 0.0);
    }

    #[test]
    fn test_malformed_reference_names_row_and_field() {
        let row = EvalRow::new(7, "SELECT a FROM t", literal("['select', 'a'")).with_generated("SELECT a");
        match evaluate_row(&row) {
            Err(EvalError::Decoding { row, field, .. }) => {
                assert_eq!(row, 7);
                assert_eq!(field, "query_toks");
            }
            other => panic!("expected decoding error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_query_is_invalid_input() {
        let mut row = EvalRow::new(3, "", literal("['a']")).with_generated("a");
        row.query = None;
        assert!(matches!(
            evaluate_row(&row),
            Err(EvalError::InvalidInput { row: 3, field: "query" })
        ));
    }

    #[test]
    fn test_missing_reference_with_generated_is_invalid_input() {
        let mut row = EvalRow::new(2, "SELECT a FROM t", literal("[]")).with_generated("a");
        row.query_toks = None;
        assert!(matches!(
            evaluate_row(&row),
            Err(EvalError::InvalidInput { row: 2, field: "query_toks" })
        ));
    }

    #[test]
    fn test_rows_keep_order_and_report_first_failure() {
        let rows: Vec<EvalRow> = (1..=20)
            .map(|i| {
                EvalRow::new(i, "SELECT a FROM t", literal("['select', 'a']")).with_generated("select a")
            })
            .collect();
        let outcomes = evaluate_rows(&rows).unwrap();
        assert_eq!(outcomes.iter().map(|o| o.row).collect::<Vec<_>>(), (1..=20).collect::<Vec<_>>());

        let mut broken = rows.clone();
        broken[4].query_toks = Some(literal("oops"));
        broken[11].query = None;
        assert!(matches!(
            evaluate_rows(&broken),
            Err(EvalError::Decoding { row: 5, .. })
        ));
    }
}
