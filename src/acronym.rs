//! Acronym and abbreviation resolution for group names.
//!
//! A text-level scan, independent of tokenization: alphabetic runs from the
//! raw input are checked against per-group abbreviation sets seeded with
//! first-letter acronyms of multi-word group names ("Computer Science" →
//! "cs"), plus a prefix-and-substring test for ad-hoc shortenings ("bio"
//! for "Biology"). Matches union the full group name into the group field;
//! nothing is ever removed here. The index is read-only after construction,
//! so record processing stays free of cross-record state.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use regex::Regex;

static ALPHA_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z]{2,}").unwrap());

/// Read-only index of group-name abbreviations.
#[derive(Debug, Clone, Default)]
pub struct AcronymIndex {
    /// group name → known abbreviations (lowercased)
    abbrevs: BTreeMap<String, BTreeSet<String>>,
}

impl AcronymIndex {
    /// Build the index, seeding first-letter acronyms for multi-word names.
    #[must_use]
    pub fn new<'a>(groups: impl IntoIterator<Item = &'a str>) -> Self {
        let mut abbrevs: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for group in groups {
            let entry = abbrevs.entry(group.to_string()).or_default();
            let words: Vec<&str> = group.split_whitespace().collect();
            if words.len() > 1 {
                let acronym: String = words
                    .iter()
                    .filter_map(|w| w.chars().next())
                    .collect::<String>()
                    .to_lowercase();
                entry.insert(acronym);
            }
        }
        Self { abbrevs }
    }

    /// Known abbreviations for a group, if the group is indexed.
    #[must_use]
    pub fn abbreviations(&self, group: &str) -> Option<&BTreeSet<String>> {
        self.abbrevs.get(group)
    }

    /// Scan raw input text for group acronyms/abbreviations.
    ///
    /// Candidates are alphabetic runs of length ≥ 2, deduplicated via a
    /// frequency count and case-folded. A candidate matches a group when it
    /// is a known abbreviation, or when it starts with the group's first
    /// letter and is a substring of the group name (case-insensitively).
    #[must_use]
    pub fn scan(&self, text: &str) -> BTreeSet<String> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for m in ALPHA_RUN.find_iter(text) {
            *counts.entry(m.as_str().to_lowercase()).or_insert(0) += 1;
        }
        let mut found = BTreeSet::new();
        for candidate in counts.keys() {
            for (group, known) in &self.abbrevs {
                if known.contains(candidate) {
                    found.insert(group.clone());
                    continue;
                }
                let group_lower = group.to_lowercase();
                let same_initial = candidate
                    .chars()
                    .next()
                    .zip(group_lower.chars().next())
                    .is_some_and(|(c, g)| c == g);
                if same_initial && group_lower.contains(candidate.as_str()) {
                    found.insert(group.clone());
                }
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> AcronymIndex {
        AcronymIndex::new(["Biology", "Computer Science", "English", "Japanese"])
    }

    #[test]
    fn seeds_first_letter_acronyms_for_multiword_names() {
        let idx = index();
        assert!(idx.abbreviations("Computer Science").unwrap().contains("cs"));
        assert!(idx.abbreviations("Biology").unwrap().is_empty());
    }

    #[test]
    fn finds_seeded_acronym_inside_course_code() {
        // "CS101" contains the alphabetic run "CS".
        let found = index().scan("Study for CS101");
        assert!(found.contains("Computer Science"));
    }

    #[test]
    fn finds_prefix_substring_abbreviation() {
        let found = index().scan("finish bio homework");
        assert!(found.contains("Biology"));
    }

    #[test]
    fn requires_matching_first_letter() {
        // "ology" is a substring of "Biology" but starts with the wrong letter.
        let found = index().scan("take an ology quiz");
        assert!(!found.contains("Biology"));
    }

    #[test]
    fn ignores_short_and_unrelated_runs() {
        let found = index().scan("go to the gym at 5");
        assert!(found.is_empty());
    }

    #[test]
    fn full_name_matches_via_substring_rule() {
        let found = index().scan("japanese practice");
        assert!(found.contains("Japanese"));
    }

    #[test]
    fn scan_does_not_mutate_the_index() {
        let idx = index();
        let before = idx.abbrevs.clone();
        let _ = idx.scan("CS and bio today");
        assert_eq!(idx.abbrevs, before);
    }
}
