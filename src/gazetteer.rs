//! Gazetteer overlay: phrase → entity label matching.
//!
//! Registered phrases are matched token-wise and case-insensitively against
//! the sequence, and matched spans are relabeled, overwriting whatever the
//! annotator assigned. Matching is greedy left to right; at each position
//! the first registered phrase that matches wins, so longer phrases must be
//! registered before their prefixes (the constructor sorts by token length
//! for exactly this reason).

use crate::annotate::lexicon::tokenize;
use crate::token::{EntityLabel, TokenSequence};

/// A registered gazetteer entry.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    /// Phrase words, lowercased, tokenized like the input stream.
    words: Vec<String>,
    label: EntityLabel,
}

/// Static phrase → label lookup table for domain vocabulary.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    entries: Vec<Entry>,
}

impl Gazetteer {
    /// Create an empty gazetteer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from phrase lists, longest phrases first.
    #[must_use]
    pub fn with_phrases<'a>(
        groups: impl IntoIterator<Item = &'a str>,
        holidays: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut gaz = Self::new();
        for phrase in groups {
            gaz.register(phrase, EntityLabel::Group);
        }
        for phrase in holidays {
            gaz.register(phrase, EntityLabel::Holiday);
        }
        gaz.entries.sort_by_key(|e| std::cmp::Reverse(e.words.len()));
        gaz
    }

    /// Register one phrase. The phrase is tokenized with the same rules as
    /// the input stream, so "Valentine's Day" matches its three tokens.
    pub fn register(&mut self, phrase: &str, label: EntityLabel) {
        let words: Vec<String> = tokenize(phrase)
            .into_iter()
            .map(|(w, _)| w.to_lowercase())
            .collect();
        if !words.is_empty() {
            self.entries.push(Entry { words, label });
        }
    }

    /// Number of registered phrases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no phrases are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay registered labels onto the sequence.
    ///
    /// Greedy scan: at each position the first matching entry (registration
    /// order after the length sort) relabels its span and the scan resumes
    /// past it. Idempotent: labels are overwritten, never accumulated.
    #[must_use]
    pub fn apply(&self, mut seq: TokenSequence) -> TokenSequence {
        let lowers: Vec<String> = seq.tokens().iter().map(|t| t.lower()).collect();
        let mut i = 0;
        while i < lowers.len() {
            let hit = self.entries.iter().find(|e| {
                i + e.words.len() <= lowers.len()
                    && e.words
                        .iter()
                        .zip(&lowers[i..i + e.words.len()])
                        .all(|(w, t)| w == t)
            });
            match hit {
                Some(e) => {
                    seq.set_label(i, i + e.words.len(), Some(e.label));
                    i += e.words.len();
                }
                None => i += 1,
            }
        }
        seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::{Annotator, LexiconAnnotator};

    fn gaz() -> Gazetteer {
        Gazetteer::with_phrases(
            ["Biology", "Computer Science"],
            ["Christmas", "Valentine's Day"],
        )
    }

    fn annotate(text: &str) -> TokenSequence {
        LexiconAnnotator::new().annotate(text).unwrap()
    }

    #[test]
    fn single_word_group() {
        let seq = gaz().apply(annotate("I have Biology today"));
        assert_eq!(seq.tokens()[2].ent, Some(EntityLabel::Group));
    }

    #[test]
    fn multiword_group_case_insensitive() {
        let seq = gaz().apply(annotate("study computer science tonight"));
        assert_eq!(seq.tokens()[1].ent, Some(EntityLabel::Group));
        assert_eq!(seq.tokens()[2].ent, Some(EntityLabel::Group));
    }

    #[test]
    fn overwrites_annotator_labels() {
        let mut gaz = Gazetteer::new();
        gaz.register("Friday", EntityLabel::Group);
        let seq = gaz.apply(annotate("see you Friday"));
        // The annotator said DATE; the gazetteer wins.
        assert_eq!(seq.tokens()[2].ent, Some(EntityLabel::Group));
    }

    #[test]
    fn contraction_phrases_match_token_stream() {
        let seq = gaz().apply(annotate("buy chocolate for Valentine's Day"));
        let ents: Vec<_> = seq.tokens()[3..6].iter().map(|t| t.ent).collect();
        assert_eq!(ents, vec![Some(EntityLabel::Holiday); 3]);
    }

    #[test]
    fn longer_phrase_not_shadowed() {
        // The shorter phrase registered first; the constructor's length sort
        // keeps it from shadowing the longer one.
        let g = Gazetteer::with_phrases(["Computer", "Computer Science"], []);
        let seq = g.apply(annotate("take Computer Science notes"));
        assert_eq!(seq.tokens()[1].ent, Some(EntityLabel::Group));
        assert_eq!(seq.tokens()[2].ent, Some(EntityLabel::Group));
    }

    #[test]
    fn apply_is_idempotent() {
        let g = gaz();
        let once = g.apply(annotate("study Computer Science on Friday"));
        let twice = g.apply(once.clone());
        assert_eq!(once, twice);
    }
}
