use crate::config::EvalConfig;
use crate::dataset::{Dataset, ensure_dir};
use crate::error::Result;
use crate::evaluator::evaluate_rows;
use crate::report::EvaluationReport;
use std::fs;
use tracing::{info, warn};

/// Loads the dataset, evaluates every row and writes the configured outputs.
pub fn run(config: &EvalConfig) -> Result<EvaluationReport> {
    let dataset = Dataset::load(&config.input)?;
    let rows = dataset.eval_rows();

    let outcomes = match config.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()?
            .install(|| evaluate_rows(&rows))?,
        None => evaluate_rows(&rows)?,
    };
    let report = EvaluationReport::from_outcomes(&outcomes);
    for summary in &report.tiers {
        if summary.rows == 0 {
            warn!(tier = %summary.tier, "no rows in tier");
        } else {
            info!(tier = %summary.tier, rows = summary.rows, "tier evaluated");
        }
    }

    if config.write_splits || config.write_results {
        ensure_dir(&config.out_dir)?;
    }
    if config.write_splits {
        dataset.write_tier_splits(&outcomes, &config.out_dir)?;
    }
    if config.write_results {
        dataset.write_tier_results(&outcomes, &config.out_dir)?;
    }
    if let Some(path) = &config.report_json {
        fs::write(path, report.to_json()?)?;
        info!(path = %path.display(), "wrote JSON report");
    }
    Ok(report)
}
