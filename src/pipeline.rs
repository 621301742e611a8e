//! The task-parsing pipeline.
//!
//! [`TaskPipeline`] wires every component together behind one explicitly
//! constructed service object: annotator and date resolver are passed in
//! (both can be expensive to initialize and are built exactly once), the
//! gazetteer, acronym index, holiday table, and duration set are derived
//! from the [`PipelineConfig`] at construction and read-only afterwards.
//!
//! Per record the stages run in a fixed order — annotate, gazetteer
//! overlay, weekday-plural expansion, recurrence detection, noun-phrase
//! consolidation, field extraction, acronym scan, formatting — and records
//! are independent of each other, so batches parallelize freely.
//!
//! ```rust
//! use tasktag::{PipelineConfig, TaskPipeline};
//!
//! let pipeline = TaskPipeline::with_defaults(&PipelineConfig::default());
//! let parsed = pipeline.parse("Wash the dishes!").unwrap();
//! assert_eq!(parsed.task.as_deref(), Some("Wash the dishes!"));
//! ```

use std::collections::BTreeSet;

use rayon::prelude::*;

use crate::acronym::AcronymIndex;
use crate::annotate::{Annotator, LexiconAnnotator};
use crate::answer::{AnswerRecord, ParsedTask};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::extract;
use crate::gazetteer::Gazetteer;
use crate::resolve::{ChronoResolver, DateResolver, HolidayTable};
use crate::{consolidate, refine};

/// The assembled task-parsing pipeline.
pub struct TaskPipeline {
    annotator: Box<dyn Annotator>,
    resolver: Box<dyn DateResolver>,
    gazetteer: Gazetteer,
    acronyms: AcronymIndex,
    holidays: HolidayTable,
    durations: BTreeSet<String>,
}

impl TaskPipeline {
    /// Assemble a pipeline from a config and explicit collaborators.
    #[must_use]
    pub fn new(
        config: &PipelineConfig,
        annotator: Box<dyn Annotator>,
        resolver: Box<dyn DateResolver>,
    ) -> Self {
        let gazetteer = Gazetteer::with_phrases(
            config.groups.iter().map(String::as_str),
            config.holiday_names(),
        );
        let acronyms = AcronymIndex::new(config.groups.iter().map(String::as_str));
        let holidays = HolidayTable::from_config(&config.holidays);
        Self {
            annotator,
            resolver,
            gazetteer,
            acronyms,
            holidays,
            durations: config.durations.clone(),
        }
    }

    /// Assemble with the built-in annotator and resolver.
    #[must_use]
    pub fn with_defaults(config: &PipelineConfig) -> Self {
        Self::new(
            config,
            Box::new(LexiconAnnotator::new()),
            Box::new(ChronoResolver::default()),
        )
    }

    /// Parse one task description into a structured record.
    pub fn parse(&self, text: &str) -> Result<ParsedTask> {
        let seq = self.annotator.annotate(text)?;
        let seq = self.gazetteer.apply(seq);
        let (seq, promoted) = refine::expand_weekday_dates(seq, self.annotator.as_ref());
        let seq = refine::detect_recurrence(seq, &self.durations, &promoted);
        let seq = consolidate::merge_noun_phrases(seq);
        let mut answers = AnswerRecord::new();
        extract::walk(&seq, self.resolver.as_ref(), &self.holidays, &mut answers);
        answers.add_groups(self.acronyms.scan(text));
        Ok(answers.into_parsed())
    }

    /// Parse a batch of independent records in parallel.
    ///
    /// A record that fails degrades to the all-null [`ParsedTask`] instead of
    /// failing the batch; the failure is logged.
    #[must_use]
    pub fn parse_batch(&self, texts: &[&str]) -> Vec<ParsedTask> {
        texts
            .par_iter()
            .map(|text| {
                self.parse(text).unwrap_or_else(|e| {
                    log::warn!("failed to parse {text:?}: {e}");
                    ParsedTask::empty()
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn pipeline() -> TaskPipeline {
        TaskPipeline::new(
            &PipelineConfig::default(),
            Box::new(LexiconAnnotator::new()),
            Box::new(ChronoResolver::with_reference(
                NaiveDate::from_ymd_opt(2026, 8, 7)
                    .unwrap()
                    .and_hms_opt(12, 0, 0)
                    .unwrap(),
            )),
        )
    }

    #[test]
    fn full_record_shape() {
        let parsed = pipeline()
            .parse("Study Computer Science every Friday at 8pm")
            .unwrap();
        assert_eq!(parsed.group, Some(vec!["Computer Science".to_string()]));
        assert_eq!(parsed.recurrence.as_deref(), Some("every Friday at 8pm"));
        assert_eq!(parsed.task.as_deref(), Some("Study"));
        assert_eq!(parsed.datetime, None);
    }

    #[test]
    fn batch_preserves_order_and_never_fails() {
        let p = pipeline();
        let out = p.parse_batch(&["Wash the dishes", "Submit HW by 5pm!"]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].task.as_deref(), Some("Wash the dishes"));
        assert_eq!(out[1].datetime.as_deref(), Some("08/07/26 17:00"));
    }

    #[test]
    fn annotator_failure_degrades_to_empty_record() {
        let p = TaskPipeline::new(
            &PipelineConfig::default(),
            Box::new(crate::annotate::MockAnnotator::new()),
            Box::new(ChronoResolver::default()),
        );
        let out = p.parse_batch(&["anything"]);
        assert_eq!(out, vec![ParsedTask::empty()]);
    }
}
