//! The field-extraction walk.
//!
//! A single forward pass over the fully refined token sequence classifies
//! every token into exactly one output field. Priority per token, first
//! match wins:
//!
//! 1. GROUP → group set
//! 2. RECURRENCE → recurrence
//! 3. DATE/ORDINAL/TIME → datetime (one whole-text resolution per record)
//! 4. HOLIDAY → datetime via the holiday table, only if still empty
//! 5. included part-of-speech → task text, minus adpositions that introduce
//!    a temporal phrase, with contraction/punctuation re-attachment
//!
//! The walk mutates only the [`AnswerRecord`]; the token sequence is
//! read-only here.

use crate::answer::AnswerRecord;
use crate::resolve::{DateResolver, HolidayTable};
use crate::token::{EntityLabel, Pos, Span, Token, TokenSequence};

/// Parts of speech that contribute to the task text.
const INCLUDED_POS: &[Pos] = &[
    Pos::Verb,
    Pos::Adj,
    Pos::Aux,
    Pos::Noun,
    Pos::Propn,
    Pos::Adp,
    Pos::Adv,
    Pos::Det,
    Pos::Part,
    Pos::Punct,
    Pos::Intj,
    Pos::Pron,
    Pos::Cconj,
];

/// Walk the refined sequence once, filling the accumulator.
///
/// Date resolution receives the entire original text as context (relative
/// dates need the surrounding words); only the first DATE/ORDINAL/TIME
/// token triggers a resolution call, later temporal tokens are covered by
/// it. A failed resolution is logged and contributes nothing.
pub fn walk(
    seq: &TokenSequence,
    resolver: &dyn DateResolver,
    holidays: &HolidayTable,
    answers: &mut AnswerRecord,
) {
    let spans = seq.entity_spans();
    let mut temporal_resolved = false;
    for (i, token) in seq.tokens().iter().enumerate() {
        match token.ent {
            Some(EntityLabel::Group) => {
                answers.group.insert(token.text.clone());
            }
            Some(EntityLabel::Recurrence) => {
                answers.recurrence = Some(token.text.clone());
            }
            Some(EntityLabel::Date) | Some(EntityLabel::Ordinal) | Some(EntityLabel::Time) => {
                if !temporal_resolved {
                    temporal_resolved = true;
                    match resolver.resolve(seq.text()) {
                        Ok(stamp) => answers.datetime.push(stamp),
                        Err(e) => log::debug!("date resolution failed for {:?}: {e}", seq.text()),
                    }
                }
            }
            Some(EntityLabel::Holiday) => {
                // Multi-token holiday names ("Valentine's Day") are looked up
                // by whole-span text; the span's later tokens are covered by
                // the lookup at its first token.
                let span = spans
                    .iter()
                    .find(|s| s.label == EntityLabel::Holiday && s.start <= i && i < s.end);
                let at_span_start = span.map_or(true, |s| s.start == i);
                if at_span_start && answers.datetime.is_empty() {
                    let name = span.map_or_else(|| token.text.clone(), |s| span_text(seq, s));
                    if let Some((month, day)) = holidays.date_of(&name) {
                        match resolver.resolve_month_day(month, day) {
                            Ok(stamp) => answers.datetime.push(stamp),
                            Err(e) => {
                                log::debug!("holiday resolution failed for {name:?}: {e}");
                            }
                        }
                    }
                }
            }
            None => {
                if include_in_task(seq, i) {
                    append_task(seq, token, answers);
                }
            }
        }
    }
}

/// The original-text slice covered by an entity span.
fn span_text(seq: &TokenSequence, span: &Span) -> String {
    let first = &seq.tokens()[span.start];
    let last = &seq.tokens()[span.end - 1];
    seq.text()
        .chars()
        .skip(first.offset)
        .take(last.end_offset().saturating_sub(first.offset))
        .collect()
}

/// True if the token belongs in the task text: an included part of speech
/// that is not an adposition introducing a temporal phrase ("on"/"at"
/// directly before a DATE/TIME/HOLIDAY/RECURRENCE token).
fn include_in_task(seq: &TokenSequence, i: usize) -> bool {
    let token = &seq.tokens()[i];
    if !INCLUDED_POS.contains(&token.pos) {
        return false;
    }
    let adp_before_temporal = token.pos == Pos::Adp
        && seq.get(i + 1).is_some_and(|next| {
            matches!(
                next.ent,
                Some(EntityLabel::Date)
                    | Some(EntityLabel::Time)
                    | Some(EntityLabel::Holiday)
                    | Some(EntityLabel::Recurrence)
            )
        });
    !adp_before_temporal
}

/// Append a token to the task accumulator, re-attaching contraction
/// fragments and tight punctuation onto the previous fragment.
fn append_task(seq: &TokenSequence, token: &Token, answers: &mut AnswerRecord) {
    let contraction = token.pos == Pos::Part && token.text.contains('\'');
    let tight_punct = token.pos == Pos::Punct
        && token.offset > 0
        && seq
            .char_at(token.offset - 1)
            .is_some_and(|c| !c.is_whitespace());
    if (contraction || tight_punct) && !answers.task.is_empty() {
        let last = answers.task.last_mut().expect("checked non-empty");
        last.push_str(&token.text);
    } else {
        answers.task.push(token.text.clone());
    }
}
