//! Per-tier accuracy aggregation and its console rendering.

use crate::complexity::Hardness;
use crate::error::{EvalError, Result};
use crate::evaluator::RowOutcome;
use serde::Serialize;

const CHART_WIDTH: usize = 40;

/// Running totals for one tier.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TierTotals {
    pub rows: usize,
    pub partial_sum: f64,
    pub exact_count: usize,
}

impl TierTotals {
    pub fn add(self, outcome: &RowOutcome) -> Self {
        Self {
            rows: self.rows + 1,
            partial_sum: self.partial_sum + outcome.partial_match_percentage,
            exact_count: self.exact_count + usize::from(outcome.exact_match),
        }
    }
}

/// Accuracy figures for one hardness tier.
///
/// Averages are `None` when no row landed in the tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierSummary {
    pub tier: Hardness,
    pub rows: usize,
    pub average_partial_match: Option<f64>,
    pub exact_match_percentage: Option<f64>,
}

impl TierSummary {
    pub fn from_totals(tier: Hardness, totals: TierTotals) -> Self {
        if totals.rows == 0 {
            return Self {
                tier,
                rows: 0,
                average_partial_match: None,
                exact_match_percentage: None,
            };
        }
        let rows = totals.rows as f64;
        Self {
            tier,
            rows: totals.rows,
            average_partial_match: Some(totals.partial_sum / rows),
            exact_match_percentage: Some(totals.exact_count as f64 / rows * 100.0),
        }
    }

    /// Returns `(exact_match_percentage, average_partial_match)`.
    pub fn require_data(&self) -> Result<(f64, f64)> {
        match (self.exact_match_percentage, self.average_partial_match) {
            (Some(exact), Some(partial)) => Ok((exact, partial)),
            _ => Err(EvalError::EmptyCategory(self.tier)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub total_rows: usize,
    pub missing_generated: usize,
    /// One entry per tier, Easy first.
    pub tiers: Vec<TierSummary>,
}

impl EvaluationReport {
    pub fn from_outcomes(outcomes: &[RowOutcome]) -> Self {
        let tiers = Hardness::ALL
            .iter()
            .map(|&tier| {
                let totals = outcomes
                    .iter()
                    .filter(|outcome| outcome.hardness_level == tier)
                    .fold(TierTotals::default(), TierTotals::add);
                TierSummary::from_totals(tier, totals)
            })
            .collect();
        Self {
            total_rows: outcomes.len(),
            missing_generated: outcomes.iter().filter(|o| o.generated_missing).count(),
            tiers,
        }
    }

    pub fn tier(&self, tier: Hardness) -> Option<&TierSummary> {
        self.tiers.iter().find(|summary| summary.tier == tier)
    }

    pub fn format_summary(&self) -> String {
        let mut output = String::new();
        for summary in &self.tiers {
            match summary.require_data() {
                Ok((exact, partial)) => {
                    output.push_str(&format!(
                        "{} Exact Match Percentage: {:.2}%\n",
                        summary.tier, exact
                    ));
                    output.push_str(&format!(
                        "{} Partial Match Percentage: {:.2}%\n",
                        summary.tier, partial
                    ));
                }
                Err(_) => output.push_str(&format!("{}: no data\n", summary.tier)),
            }
        }
        output.push_str(&format!(
            "Rows: {} ({} without a generated query)\n",
            self.total_rows, self.missing_generated
        ));
        output
    }

    /// Horizontal bars of exact vs partial match per tier.
    pub fn format_chart(&self) -> String {
        let mut output = String::from("Match Percentage by Query Hardness\n");
        for summary in &self.tiers {
            match summary.require_data() {
                Ok((exact, partial)) => {
                    output.push_str(&format!("{:<7} exact   {}\n", summary.tier, bar(exact)));
                    output.push_str(&format!("{:<7} partial {}\n", "", bar(partial)));
                }
                Err(_) => output.push_str(&format!("{:<7} (no data)\n", summary.tier)),
            }
        }
        output
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn bar(percentage: f64) -> String {
    let filled = ((percentage / 100.0) * CHART_WIDTH as f64).round() as usize;
    let filled = filled.min(CHART_WIDTH);
    format!(
        "|{}{}| {:6.2}%",
        "#".repeat(filled),
        " ".repeat(CHART_WIDTH - filled),
        percentage
    )
}
