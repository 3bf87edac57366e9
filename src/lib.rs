pub mod complexity;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod matcher;
pub mod pipeline;
pub mod reference;
pub mod report;
pub use crate::complexity::{Hardness, classify, complexity_score};
pub use crate::config::EvalConfig;
pub use crate::error::{EvalError, Result};
pub use crate::evaluator::{EvalRow, RowOutcome, evaluate_row, evaluate_rows};
pub use crate::lexer::tokenize;
pub use crate::matcher::{MatchResult, compare_tokens};
pub use crate::pipeline::run;
pub use crate::reference::RawTokenField;
pub use crate::report::{EvaluationReport, TierSummary};
