//! # tasktag
//!
//! Rule-based parsing of short free-text task descriptions ("Do every HW
//! assignment on Fridays at 8pm") into structured records with four fields:
//! a task-group label, a normalized date/time, a recurrence phrase, and the
//! cleaned task text.
//!
//! The core is an annotation-refinement and field-extraction pipeline over
//! per-token linguistic annotations:
//!
//! | Stage | Module | Job |
//! |-------|--------|-----|
//! | Annotate | [`annotate`] | tokens, POS, lemmas, morphology, entities, chunks |
//! | Gazetteer | [`gazetteer`] | overlay GROUP/HOLIDAY phrase labels |
//! | Refine | [`refine`] | weekday-plural expansion, recurrence merge |
//! | Consolidate | [`consolidate`] | collapse noun chunks into units |
//! | Extract | [`extract`] | single classification walk into fields |
//! | Acronyms | [`acronym`] | text-level group abbreviation scan |
//! | Format | [`answer`] | collapse accumulators, null over empty |
//!
//! ## Quick start
//!
//! ```rust
//! use tasktag::{PipelineConfig, TaskPipeline};
//!
//! let pipeline = TaskPipeline::with_defaults(&PipelineConfig::default());
//! let parsed = pipeline.parse("I have Biology on Thursdays").unwrap();
//! assert_eq!(parsed.group, Some(vec!["Biology".to_string()]));
//! assert!(parsed.datetime.is_some());
//! ```
//!
//! ## Collaborator seams
//!
//! The linguistic annotator and the date resolver sit behind traits
//! ([`annotate::Annotator`], [`resolve::DateResolver`]) and are passed into
//! the pipeline as explicitly constructed service objects. The built-in
//! [`annotate::LexiconAnnotator`] and [`resolve::ChronoResolver`] keep the
//! crate self-contained; swap them out for heavier machinery without
//! touching the rule passes.
//!
//! ## Design notes
//!
//! - Entity labels and POS tags are closed enums; the extractor's priority
//!   chain is matched exhaustively.
//! - Span merges build a new token sequence instead of retokenizing in
//!   place, so rule passes never iterate over a half-edited document.
//! - No error aborts a batch: a malformed record degrades to an all-null
//!   record and processing continues.

#![warn(missing_docs)]

pub mod acronym;
pub mod annotate;
pub mod answer;
pub mod config;
pub mod consolidate;
pub mod dataset;
mod error;
pub mod extract;
pub mod gazetteer;
pub mod pipeline;
pub mod refine;
pub mod resolve;
pub mod token;

pub use acronym::AcronymIndex;
pub use annotate::{Annotator, LexiconAnnotator, MockAnnotator};
pub use answer::{AnswerRecord, ParsedTask};
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use gazetteer::Gazetteer;
pub use pipeline::TaskPipeline;
pub use resolve::{ChronoResolver, DateResolver, HolidayTable};
pub use token::{EntityLabel, Pos, Token, TokenSequence};

pub mod prelude {
    //! Commonly used items, re-exported for convenience.
    //!
    //! ```rust
    //! use tasktag::prelude::*;
    //!
    //! let pipeline = TaskPipeline::with_defaults(&PipelineConfig::default());
    //! let parsed = pipeline.parse("Submit HW by 5pm!").unwrap();
    //! assert_eq!(parsed.task.as_deref(), Some("Submit HW!"));
    //! ```
    pub use crate::annotate::{Annotator, LexiconAnnotator, MockAnnotator};
    pub use crate::answer::{AnswerRecord, ParsedTask};
    pub use crate::config::PipelineConfig;
    pub use crate::error::{Error, Result};
    pub use crate::pipeline::TaskPipeline;
    pub use crate::resolve::{ChronoResolver, DateResolver, HolidayTable};
    pub use crate::token::{EntityLabel, Number, Pos, Token, TokenSequence};
}
