//! Entity refinement passes.
//!
//! Two ordered passes correct and extend entity labels between the gazetteer
//! overlay and noun-phrase consolidation:
//!
//! 1. [`expand_weekday_dates`] — re-annotates the lemma stream and promotes
//!    plural surface forms whose lemma is a recognized date ("Thursdays").
//! 2. [`detect_recurrence`] — finds the first recurrence trigger and merges
//!    from it (or from the start of a date/time span containing it) to the
//!    end of the sequence into a single RECURRENCE token.
//!
//! Both passes are total: a missing neighbor, a lemma stream that fails to
//! re-annotate, or a misaligned re-annotation means the rule simply does not
//! fire. Neither pass ever errors.

use std::collections::BTreeSet;

use crate::annotate::Annotator;
use crate::token::{EntAttr, EntityLabel, MergeAttrs, Pos, TokenSequence};

/// Promote plural tokens whose lemma is a recognized date.
///
/// Joins the lemmas with single spaces, re-runs the annotator on the lemma
/// string, and for every aligned position where the lemma-stream token is
/// DATE, the original token is not, and the original token is plural,
/// relabels the original token DATE (dropping any previous label).
///
/// Returns the refined sequence together with the set of promoted indices;
/// [`detect_recurrence`] uses that set to exempt promotions from its
/// plural-date-after-"on" trigger.
pub fn expand_weekday_dates(
    seq: TokenSequence,
    annotator: &dyn Annotator,
) -> (TokenSequence, BTreeSet<usize>) {
    let mut promoted = BTreeSet::new();
    let lemma_text = seq
        .tokens()
        .iter()
        .map(|t| t.lemma.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let lemma_seq = match annotator.annotate(&lemma_text) {
        Ok(s) => s,
        Err(e) => {
            log::debug!("lemma re-annotation failed, skipping expansion: {e}");
            return (seq, promoted);
        }
    };
    if lemma_seq.len() != seq.len() {
        log::debug!(
            "lemma stream misaligned ({} vs {} tokens), skipping expansion",
            lemma_seq.len(),
            seq.len()
        );
        return (seq, promoted);
    }
    let mut seq = seq;
    for i in 0..seq.len() {
        let lemma_is_date = lemma_seq.tokens()[i].ent == Some(EntityLabel::Date);
        let orig = &seq.tokens()[i];
        if lemma_is_date && orig.ent != Some(EntityLabel::Date) && orig.is_plural() {
            seq.set_label(i, i + 1, Some(EntityLabel::Date));
            promoted.insert(i);
        }
    }
    (seq, promoted)
}

/// Find the first recurrence trigger and merge from it to the end.
///
/// Triggers, scanned left to right, first qualifying token wins:
///
/// - text exactly `every`, where the next token is a DATE/TIME/ORDINAL
///   entity, has part-of-speech NUM or ADJ, or lowercases to a word in
///   `durations`;
/// - text lowercasing to `on`, where the next token is a plural DATE the
///   base annotator tagged itself (indices in `promoted` are exempt).
///
/// The merge start is the trigger's position, pulled back to the start of
/// any DATE or TIME span strictly containing the trigger ("8 pm every
/// night" merges as one unit). At most one merge per sequence.
#[must_use]
pub fn detect_recurrence(
    seq: TokenSequence,
    durations: &BTreeSet<String>,
    promoted: &BTreeSet<usize>,
) -> TokenSequence {
    let Some(trigger) = find_trigger(&seq, durations, promoted) else {
        return seq;
    };
    let mut start = trigger;
    for span in seq.entity_spans() {
        if matches!(span.label, EntityLabel::Time | EntityLabel::Date)
            && span.strictly_contains(trigger)
        {
            start = span.start;
        }
    }
    let end = seq.len();
    seq.merge_span(
        start,
        end,
        MergeAttrs {
            pos: None,
            dep: None,
            ent: EntAttr::Label(EntityLabel::Recurrence),
        },
    )
}

fn find_trigger(
    seq: &TokenSequence,
    durations: &BTreeSet<String>,
    promoted: &BTreeSet<usize>,
) -> Option<usize> {
    for (i, token) in seq.tokens().iter().enumerate() {
        // A trigger needs a following token; at the end of the sequence the
        // rule silently does not fire.
        let Some(next) = seq.get(i + 1) else {
            continue;
        };
        if token.text == "every" {
            let qualifies = next.ent.is_some_and(|e| e.is_temporal())
                || matches!(next.pos, Pos::Num | Pos::Adj)
                || durations.contains(&next.lower());
            if qualifies {
                return Some(i);
            }
        }
        if token.lower() == "on"
            && next.ent == Some(EntityLabel::Date)
            && next.is_plural()
            && !promoted.contains(&(i + 1))
        {
            return Some(i);
        }
    }
    None
}
