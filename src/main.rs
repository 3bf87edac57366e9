use clap::Parser;
use sql_token_eval::{EvalConfig, run};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Score generated SQL against reference tokens, grouped by query hardness.
#[derive(Parser, Debug)]
#[command(name = "sql-token-eval", version)]
struct Args {
    /// Dataset with `query`, `query_toks` and `generated_query` columns (.csv or .json)
    input: PathBuf,

    /// Directory for the per-tier CSV files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Skip writing queries_<tier>.csv
    #[arg(long)]
    no_split: bool,

    /// Skip writing evaluation_results_<tier>.csv
    #[arg(long)]
    no_results: bool,

    /// Write the aggregate report as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Number of worker threads
    #[arg(long)]
    threads: Option<usize>,

    /// Print a bar chart of exact vs partial match per tier
    #[arg(long)]
    chart: bool,

    /// Log each evaluated row
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = EvalConfig::new(&args.input).with_out_dir(&args.out_dir);
    config.write_splits = !args.no_split;
    config.write_results = !args.no_results;
    config.report_json = args.json;
    config.threads = args.threads;

    match run(&config) {
        Ok(report) => {
            print!("{}", report.format_summary());
            if args.chart {
                println!();
                print!("{}", report.format_chart());
            }
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!(%error, "evaluation failed");
            eprintln!("Error evaluating {}: {}", args.input.display(), error);
            ExitCode::FAILURE
        }
    }
}
