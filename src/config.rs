//! Pipeline configuration.
//!
//! The operator supplies the domain vocabulary: group names, holiday
//! names with optional calendar dates, and the duration/weekday words the
//! recurrence trigger recognizes. [`PipelineConfig::default`] carries a
//! small working vocabulary; real deployments load their own from JSON.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Operator-supplied vocabulary for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Group names, possibly multi-word ("Computer Science").
    pub groups: Vec<String>,
    /// Holiday name → "MM-DD" date; `None` for movable feasts the operator
    /// wants tagged but cannot pin to a date.
    pub holidays: BTreeMap<String, Option<String>>,
    /// Duration/weekday words that qualify a token after "every" as a
    /// recurrence trigger.
    pub durations: BTreeSet<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let groups = ["Biology", "Computer Science", "English", "Japanese"]
            .map(String::from)
            .to_vec();
        let mut holidays: BTreeMap<String, Option<String>> = BTreeMap::new();
        for (name, date) in [
            ("Christmas", Some("12-25")),
            ("Valentine's Day", Some("02-14")),
            ("Halloween", Some("10-31")),
            ("New Year's Eve", Some("12-31")),
            ("New Year's Day", Some("01-01")),
            ("Saint Patrick's Day", Some("03-17")),
            ("Easter", None),
            ("Passover", None),
            ("Hanukkah", None),
            ("Chanukah", None),
            ("Diwali", None),
            ("Eid al-Fitr", None),
            ("Thanksgiving", None),
        ] {
            holidays.insert(name.to_string(), date.map(String::from));
        }
        let durations = [
            "day", "week", "weekday", "weekend", "second", "minute", "hour", "month", "year",
            "monday", "mon", "tuesday", "tues", "tue", "wednesday", "wed", "thursday", "thurs",
            "r", "friday", "fri", "saturday", "sat", "sunday", "sun",
        ]
        .map(String::from)
        .into_iter()
        .collect();
        Self {
            groups,
            holidays,
            durations,
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file. Missing fields fall back to
    /// the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Holiday names, for gazetteer registration (dated or not).
    pub fn holiday_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.holidays.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_vocabulary_is_sorted_and_nonempty() {
        let cfg = PipelineConfig::default();
        let mut sorted = cfg.groups.clone();
        sorted.sort();
        assert_eq!(cfg.groups, sorted);
        assert!(cfg.durations.contains("week"));
        assert!(cfg.durations.contains("friday"));
        assert_eq!(cfg.holidays["Christmas"].as_deref(), Some("12-25"));
        assert_eq!(cfg.holidays["Easter"], None);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: PipelineConfig = serde_json::from_str(r#"{"groups": ["Chemistry"]}"#).unwrap();
        assert_eq!(cfg.groups, vec!["Chemistry"]);
        assert!(cfg.durations.contains("week"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"groups": ["Math"], "holidays": {}}"#).unwrap();
        let cfg = PipelineConfig::load(&path).unwrap();
        assert_eq!(cfg.groups, vec!["Math"]);
        assert!(cfg.holidays.is_empty());
    }
}
