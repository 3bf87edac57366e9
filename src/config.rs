use std::path::PathBuf;

/// Settings for one evaluation run over a dataset file.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalConfig {
    pub input: PathBuf,
    /// Directory receiving the split and result files.
    pub out_dir: PathBuf,
    /// Write `queries_<tier>.csv` before evaluating.
    pub write_splits: bool,
    /// Write `evaluation_results_<tier>.csv`.
    pub write_results: bool,
    /// Optional path for the JSON report.
    pub report_json: Option<PathBuf>,
    /// Worker threads; `None` lets rayon decide.
    pub threads: Option<usize>,
}

impl EvalConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            out_dir: PathBuf::from("."),
            write_splits: true,
            write_results: true,
            report_json: None,
            threads: None,
        }
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }
}
