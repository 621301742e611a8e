//! Dataset records and the diff report.
//!
//! Input datasets are JSON arrays of records carrying the free-text
//! `"input"` plus optional reference fields to validate against. The diff
//! report lists, for every mismatching record, the original input, the
//! reference record, and the produced record; the CLI writes it next to the
//! parsed output as `differences.json`. Validation is advisory: a mismatch
//! is reported, never an error.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::answer::ParsedTask;
use crate::error::Result;

/// One input record: the task description plus optional reference fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// The free-text task description.
    pub input: String,
    /// Reference output to compare against, if present.
    #[serde(flatten)]
    pub expected: ParsedTask,
}

/// One mismatch between a reference record and produced output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Difference {
    /// The original input text.
    pub original_input: String,
    /// The reference record from the dataset.
    pub reference: ParsedTask,
    /// What the pipeline produced.
    pub produced: ParsedTask,
}

/// Load a dataset from a JSON array file.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Record>> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Write parsed outputs as a JSON array mirroring the input order.
pub fn save_parsed(path: impl AsRef<Path>, parsed: &[ParsedTask]) -> Result<()> {
    let json = serde_json::to_string_pretty(parsed)?;
    fs::write(path, json)?;
    Ok(())
}

/// Compare produced outputs against the reference fields.
///
/// Records and outputs pair up by position; a length mismatch truncates to
/// the shorter side (the caller produced one output per record, so in
/// practice the lengths agree).
#[must_use]
pub fn diff_report(records: &[Record], produced: &[ParsedTask]) -> Vec<Difference> {
    records
        .iter()
        .zip(produced)
        .filter(|(record, out)| &record.expected != *out)
        .map(|(record, out)| Difference {
            original_input: record.input.clone(),
            reference: record.expected.clone(),
            produced: out.clone(),
        })
        .collect()
}

/// Write the diff report as pretty JSON.
pub fn save_diff(path: impl AsRef<Path>, differences: &[Difference]) -> Result<()> {
    let json = serde_json::to_string_pretty(differences)?;
    fs::write(path, json)?;
    Ok(())
}
