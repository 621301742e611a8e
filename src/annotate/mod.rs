//! The linguistic annotation seam.
//!
//! The pipeline consumes annotations through the [`Annotator`] trait, an
//! explicitly constructed service object passed into every component that
//! needs it. The built-in [`LexiconAnnotator`] is cheap to construct and
//! always available; heavier taggers can sit behind the same trait.
//!
//! ```rust
//! use tasktag::annotate::{Annotator, LexiconAnnotator};
//!
//! let annotator = LexiconAnnotator::new();
//! let seq = annotator.annotate("Submit HW by 5pm!").unwrap();
//! assert_eq!(seq.tokens()[0].text, "Submit");
//! ```

pub mod chunker;
pub mod lexicon;

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::token::TokenSequence;

pub use chunker::NounChunker;
pub use lexicon::LexiconAnnotator;

/// Trait for linguistic annotators.
///
/// An annotator tokenizes text and assigns part-of-speech tags, lemmas,
/// morphological number, dependency labels, entity labels, and noun-chunk
/// boundaries. Implementations must support being re-run on a derived lemma
/// string (the weekday-plural refinement pass depends on it).
pub trait Annotator: Send + Sync {
    /// Annotate `text` into a token sequence.
    fn annotate(&self, text: &str) -> Result<TokenSequence>;

    /// Annotator name, for diagnostics.
    fn name(&self) -> &'static str {
        "unknown"
    }
}

/// A mock annotator for tests.
///
/// Returns pre-built sequences registered per input text, so tests can force
/// exact span shapes the built-in annotator would not produce.
///
/// # Example
///
/// ```rust
/// use tasktag::annotate::{Annotator, MockAnnotator};
/// use tasktag::token::{Pos, TokenSequence};
///
/// let seq = TokenSequence::builder("hello").token("hello", Pos::Intj).build();
/// let mock = MockAnnotator::new().with_sequence("hello", seq);
/// assert_eq!(mock.annotate("hello").unwrap().len(), 1);
/// assert!(mock.annotate("other").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockAnnotator {
    sequences: HashMap<String, TokenSequence>,
}

impl MockAnnotator {
    /// Create an empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the sequence to return for `text`.
    #[must_use]
    pub fn with_sequence(mut self, text: impl Into<String>, seq: TokenSequence) -> Self {
        self.sequences.insert(text.into(), seq);
        self
    }
}

impl Annotator for MockAnnotator {
    fn annotate(&self, text: &str) -> Result<TokenSequence> {
        self.sequences
            .get(text)
            .cloned()
            .ok_or_else(|| Error::annotation(format!("no mock sequence for {text:?}")))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
