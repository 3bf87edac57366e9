//! Tabular input and output around the evaluator.
//!
//! Rows are kept as raw string records so that the split and result files
//! carry every input column, not only the ones the evaluator reads.

use crate::complexity::Hardness;
use crate::error::{EvalError, Result};
use crate::evaluator::{EvalRow, RowOutcome};
use crate::reference::RawTokenField;
use csv::StringRecord;
use serde_json::Value;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

pub const QUERY_COLUMN: &str = "query";
pub const QUERY_TOKS_COLUMN: &str = "query_toks";
pub const GENERATED_COLUMN: &str = "generated_query";

/// Cell values read as missing, as pandas' `read_csv` does by default.
pub const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const RESULT_COLUMNS: [&str; 4] = [
    "hardness_level",
    "partial_match_percentage",
    "match_details",
    "exact_match",
];

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    headers: StringRecord,
    records: Vec<StringRecord>,
}

impl Dataset {
    /// Loads a `.json` array of row objects or, for any other extension, CSV
    /// with a header line.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let dataset = if is_json {
            Self::from_json_reader(file)?
        } else {
            Self::from_csv_reader(file)?
        };
        info!(path = %path.display(), rows = dataset.len(), "loaded dataset");
        Ok(dataset)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        // every record must have as many fields as the header
        let mut reader = csv::ReaderBuilder::new().from_reader(reader);
        let headers = reader.headers()?.clone();
        let records = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { headers, records })
    }

    /// Reads an array of flat objects; the columns are the union of their keys.
    ///
    /// Arrays such as `query_toks` are stored as their JSON text, which the
    /// reference decoder accepts.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let objects: Vec<serde_json::Map<String, Value>> = serde_json::from_reader(reader)?;
        let mut columns: Vec<String> = Vec::new();
        for object in &objects {
            for key in object.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
        let mut records = Vec::with_capacity(objects.len());
        for object in &objects {
            let mut record = StringRecord::new();
            for column in &columns {
                let cell = match object.get(column) {
                    None | Some(Value::Null) => String::new(),
                    Some(Value::String(text)) => text.clone(),
                    Some(other) => serde_json::to_string(other)?,
                };
                record.push_field(&cell);
            }
            records.push(record);
        }
        Ok(Self {
            headers: StringRecord::from(columns),
            records,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    fn record(&self, row: usize) -> Result<&StringRecord> {
        row.checked_sub(1)
            .and_then(|index| self.records.get(index))
            .ok_or(EvalError::UnknownRow(row))
    }

    /// Rows for the evaluator. Absent columns and cells holding one of
    /// [`MISSING_MARKERS`] are missing values.
    pub fn eval_rows(&self) -> Vec<EvalRow> {
        let query = self.column(QUERY_COLUMN);
        let toks = self.column(QUERY_TOKS_COLUMN);
        let generated = self.column(GENERATED_COLUMN);
        let cell = |record: &StringRecord, index: Option<usize>| {
            index
                .and_then(|i| record.get(i))
                .filter(|value| !MISSING_MARKERS.contains(value))
                .map(str::to_string)
        };
        self.records
            .iter()
            .enumerate()
            .map(|(i, record)| EvalRow {
                row: i + 1,
                query: cell(record, query),
                query_toks: cell(record, toks).map(RawTokenField::Literal),
                generated_query: cell(record, generated),
            })
            .collect()
    }

    /// Writes `queries_<tier>.csv` holding the input rows of each tier.
    pub fn write_tier_splits(&self, outcomes: &[RowOutcome], out_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for tier in present_tiers(outcomes) {
            let path = out_dir.join(format!("queries_{}.csv", tier.slug()));
            let mut writer = csv::Writer::from_path(&path)?;
            writer.write_record(&self.headers)?;
            for outcome in outcomes.iter().filter(|o| o.hardness_level == tier) {
                writer.write_record(self.record(outcome.row)?)?;
            }
            writer.flush()?;
            info!(tier = %tier, path = %path.display(), "wrote tier split");
            written.push(path);
        }
        Ok(written)
    }

    /// Writes `evaluation_results_<tier>.csv`: the input columns followed by
    /// the evaluation columns.
    pub fn write_tier_results(&self, outcomes: &[RowOutcome], out_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut headers = self.headers.clone();
        for column in RESULT_COLUMNS {
            headers.push_field(column);
        }
        let mut written = Vec::new();
        for tier in present_tiers(outcomes) {
            let path = out_dir.join(format!("evaluation_results_{}.csv", tier.slug()));
            let mut writer = csv::Writer::from_path(&path)?;
            writer.write_record(&headers)?;
            for outcome in outcomes.iter().filter(|o| o.hardness_level == tier) {
                let mut record = self.record(outcome.row)?.clone();
                record.push_field(outcome.hardness_level.as_str());
                record.push_field(&outcome.partial_match_percentage.to_string());
                record.push_field(&serde_json::to_string(&outcome.match_details)?);
                record.push_field(&outcome.exact_match.to_string());
                writer.write_record(&record)?;
            }
            writer.flush()?;
            info!(tier = %tier, path = %path.display(), "wrote tier results");
            written.push(path);
        }
        Ok(written)
    }
}

fn present_tiers(outcomes: &[RowOutcome]) -> Vec<Hardness> {
    Hardness::ALL
        .into_iter()
        .filter(|&tier| outcomes.iter().any(|o| o.hardness_level == tier))
        .collect()
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}
