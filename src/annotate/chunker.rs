//! Noun chunk detection.
//!
//! Identifies base noun phrases from part-of-speech tags.
//! Pattern: `(DET)? (ADJ|NOUN|PROPN)* (NOUN|PROPN)`, head = last nominal.
//! Standalone pronouns also form chunks, matching what dependency-based
//! chunkers emit for subjects like "I".

use crate::token::{ChunkSpan, EntityLabel, Pos, Token};

/// Noun chunk detector over tagged tokens.
#[derive(Debug, Clone, Default)]
pub struct NounChunker;

fn is_temporal_class(token: &Token) -> bool {
    matches!(
        token.ent,
        Some(EntityLabel::Date)
            | Some(EntityLabel::Time)
            | Some(EntityLabel::Ordinal)
            | Some(EntityLabel::Holiday)
            | Some(EntityLabel::Recurrence)
    )
}

impl NounChunker {
    /// Create a new chunker.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Extract noun chunks from a tagged token slice.
    ///
    /// A chunk never mixes temporal-entity tokens with plain ones: "the
    /// dentist tomorrow" splits into "the dentist" and "tomorrow", the way a
    /// dependency-based chunker separates a head from its temporal adjunct.
    #[must_use]
    pub fn extract(&self, tokens: &[Token]) -> Vec<ChunkSpan> {
        let mut chunks = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            match tokens[i].pos {
                Pos::Pron => {
                    chunks.push(ChunkSpan {
                        start: i,
                        end: i + 1,
                        head: i,
                    });
                    i += 1;
                }
                Pos::Det | Pos::Adj | Pos::Noun | Pos::Propn => {
                    let start = i;
                    if tokens[i].pos == Pos::Det {
                        i += 1;
                    }
                    let mut head = None;
                    let mut class: Option<bool> = None;
                    while i < tokens.len()
                        && matches!(tokens[i].pos, Pos::Adj | Pos::Noun | Pos::Propn)
                    {
                        let temporal = is_temporal_class(&tokens[i]);
                        match class {
                            None => class = Some(temporal),
                            Some(c) if c != temporal => break,
                            Some(_) => {}
                        }
                        if tokens[i].pos.is_nominal() {
                            head = Some(i);
                        }
                        i += 1;
                    }
                    match head {
                        // Trailing adjectives past the last nominal stay in
                        // the chunk; that matches the greedy modifier run.
                        Some(head) => chunks.push(ChunkSpan { start, end: i, head }),
                        // No nominal: not a chunk ("every" alone, bare ADJ).
                        None => {
                            if i == start {
                                i += 1;
                            }
                        }
                    }
                }
                _ => i += 1,
            }
        }
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenSequence;

    fn tag(text: &str, tagged: &[(&str, Pos)]) -> Vec<Token> {
        let mut b = TokenSequence::builder(text);
        for (t, p) in tagged {
            b = b.token(t, *p);
        }
        b.build().tokens().to_vec()
    }

    #[test]
    fn det_adj_noun_chunk() {
        let tokens = tag(
            "wash the dirty dishes",
            &[
                ("wash", Pos::Verb),
                ("the", Pos::Det),
                ("dirty", Pos::Adj),
                ("dishes", Pos::Noun),
            ],
        );
        let chunks = NounChunker::new().extract(&tokens);
        assert_eq!(chunks.len(), 1);
        assert_eq!((chunks[0].start, chunks[0].end, chunks[0].head), (1, 4, 3));
    }

    #[test]
    fn pronoun_forms_own_chunk() {
        let tokens = tag("I run", &[("I", Pos::Pron), ("run", Pos::Verb)]);
        let chunks = NounChunker::new().extract(&tokens);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), 1);
    }

    #[test]
    fn determiner_joins_following_noun() {
        let tokens = tag(
            "every day",
            &[("every", Pos::Det), ("day", Pos::Noun)],
        );
        let chunks = NounChunker::new().extract(&tokens);
        assert_eq!(chunks.len(), 1);
        assert_eq!((chunks[0].start, chunks[0].end), (0, 2));
    }

    #[test]
    fn compound_proper_nouns_group() {
        let tokens = tag(
            "study Computer Science",
            &[
                ("study", Pos::Verb),
                ("Computer", Pos::Propn),
                ("Science", Pos::Propn),
            ],
        );
        let chunks = NounChunker::new().extract(&tokens);
        assert_eq!(chunks.len(), 1);
        assert_eq!((chunks[0].start, chunks[0].end, chunks[0].head), (1, 3, 2));
    }

    #[test]
    fn temporal_token_splits_a_chunk() {
        let seq = TokenSequence::builder("the dentist tomorrow")
            .token("the", Pos::Det)
            .token("dentist", Pos::Noun)
            .token("tomorrow", Pos::Noun)
            .ent(crate::token::EntityLabel::Date)
            .build();
        let chunks = NounChunker::new().extract(seq.tokens());
        assert_eq!(chunks.len(), 2);
        assert_eq!((chunks[0].start, chunks[0].end), (0, 2));
        assert_eq!((chunks[1].start, chunks[1].end), (2, 3));
    }

    #[test]
    fn no_nominal_no_chunk() {
        let tokens = tag(
            "go now",
            &[("go", Pos::Verb), ("now", Pos::Adv)],
        );
        assert!(NounChunker::new().extract(&tokens).is_empty());
    }
}
