//! Answer accumulation and formatting.
//!
//! [`AnswerRecord`] is the mutable accumulator the field-extraction walk and
//! the acronym resolver write into; [`AnswerRecord::into_parsed`] collapses
//! it exactly once into the immutable [`ParsedTask`] output shape. List
//! fields are never formatted as empty: they become null instead.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Per-input accumulator populated during extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerRecord {
    /// Group names found (set semantics: duplicates collapse).
    pub group: BTreeSet<String>,
    /// Task text fragments, in order.
    pub task: Vec<String>,
    /// Resolved date/time strings, in order.
    pub datetime: Vec<String>,
    /// Recurrence phrase, if any.
    pub recurrence: Option<String>,
}

impl AnswerRecord {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Union more group names into the accumulator.
    pub fn add_groups<I, S>(&mut self, groups: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group.extend(groups.into_iter().map(Into::into));
    }

    /// Collapse into the final output record. Consumes the accumulator so
    /// nothing can write to it afterwards.
    #[must_use]
    pub fn into_parsed(self) -> ParsedTask {
        ParsedTask {
            group: if self.group.is_empty() {
                None
            } else {
                Some(self.group.into_iter().collect())
            },
            task: if self.task.is_empty() {
                None
            } else {
                Some(self.task.join(" "))
            },
            datetime: if self.datetime.is_empty() {
                None
            } else {
                Some(self.datetime.join(" "))
            },
            recurrence: self.recurrence.filter(|r| !r.is_empty()),
        }
    }
}

/// The structured output record for one task description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedTask {
    /// Group names, sorted; null when none were found.
    pub group: Option<Vec<String>>,
    /// Cleaned task text; null when nothing remained.
    pub task: Option<String>,
    /// Normalized date/time text; null when none was resolved.
    pub datetime: Option<String>,
    /// Recurrence phrase; null when none was detected.
    pub recurrence: Option<String>,
}

impl ParsedTask {
    /// The all-null record a malformed input degrades to.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_accumulator_formats_to_all_null() {
        let parsed = AnswerRecord::new().into_parsed();
        assert_eq!(parsed, ParsedTask::empty());
    }

    #[test]
    fn task_fragments_join_with_spaces() {
        let mut rec = AnswerRecord::new();
        rec.task = vec!["Wash".into(), "the dishes!".into()];
        assert_eq!(rec.into_parsed().task.as_deref(), Some("Wash the dishes!"));
    }

    #[test]
    fn group_set_sorts_and_dedups() {
        let mut rec = AnswerRecord::new();
        rec.add_groups(["English", "Biology", "English"]);
        assert_eq!(
            rec.into_parsed().group,
            Some(vec!["Biology".to_string(), "English".to_string()])
        );
    }

    #[test]
    fn empty_recurrence_string_becomes_null() {
        let mut rec = AnswerRecord::new();
        rec.recurrence = Some(String::new());
        assert_eq!(rec.into_parsed().recurrence, None);
    }

    #[test]
    fn serializes_null_fields() {
        let json = serde_json::to_string(&ParsedTask::empty()).unwrap();
        assert_eq!(
            json,
            r#"{"group":null,"task":null,"datetime":null,"recurrence":null}"#
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn list_fields_are_null_or_nonempty(
            task in proptest::collection::vec("[a-z]{1,8}", 0..5),
            datetime in proptest::collection::vec("[0-9/: ]{1,14}", 0..3),
            groups in proptest::collection::vec("[A-Z][a-z]{1,8}", 0..4),
        ) {
            let mut rec = AnswerRecord::new();
            rec.task = task.clone();
            rec.datetime = datetime.clone();
            rec.add_groups(groups.clone());
            let parsed = rec.into_parsed();
            prop_assert_eq!(parsed.task.is_none(), task.is_empty());
            prop_assert_eq!(parsed.datetime.is_none(), datetime.is_empty());
            prop_assert_eq!(parsed.group.is_none(), groups.is_empty());
            if let Some(g) = parsed.group {
                prop_assert!(!g.is_empty());
            }
            if let Some(t) = parsed.task {
                prop_assert!(!t.is_empty());
            }
        }
    }
}
