//! Edge cases for the refinement passes, driven through [`MockAnnotator`]
//! where the built-in annotator cannot produce the span shape under test.

use std::collections::BTreeSet;

use tasktag::annotate::MockAnnotator;
use tasktag::token::{EntityLabel, Pos, TokenSequence};
use tasktag::{refine, PipelineConfig};

fn durations() -> BTreeSet<String> {
    PipelineConfig::default().durations
}

// =============================================================================
// Recurrence trigger walk-back
// =============================================================================

#[test]
fn trigger_strictly_inside_time_span_merges_whole_span() {
    let seq = TokenSequence::builder("remind me 8 pm every night")
        .token("remind", Pos::Verb)
        .token("me", Pos::Pron)
        .token("8", Pos::Num)
        .ent(EntityLabel::Time)
        .token("pm", Pos::Noun)
        .ent(EntityLabel::Time)
        .token("every", Pos::Det)
        .ent(EntityLabel::Time)
        .token("night", Pos::Noun)
        .ent(EntityLabel::Time)
        .build();
    let refined = refine::detect_recurrence(seq, &durations(), &BTreeSet::new());
    assert_eq!(refined.len(), 3);
    assert_eq!(refined.tokens()[2].text, "8 pm every night");
    assert_eq!(refined.tokens()[2].ent, Some(EntityLabel::Recurrence));
}

#[test]
fn trigger_at_span_start_does_not_walk_back() {
    // "every" begins the DATE span: merge starts at the trigger itself.
    let seq = TokenSequence::builder("call every Friday")
        .token("call", Pos::Verb)
        .token("every", Pos::Det)
        .ent(EntityLabel::Date)
        .token("Friday", Pos::Propn)
        .ent(EntityLabel::Date)
        .build();
    let refined = refine::detect_recurrence(seq, &durations(), &BTreeSet::new());
    assert_eq!(refined.len(), 2);
    assert_eq!(refined.tokens()[1].text, "every Friday");
}

// =============================================================================
// Missing-neighbor recovery
// =============================================================================

#[test]
fn trigger_words_at_end_of_sequence_never_error() {
    for text in ["meet every", "hold on"] {
        let mut b = TokenSequence::builder(text);
        for word in text.split(' ') {
            b = b.token(word, Pos::Verb);
        }
        let seq = b.build();
        let refined = refine::detect_recurrence(seq.clone(), &durations(), &BTreeSet::new());
        assert_eq!(refined, seq);
    }
}

#[test]
fn empty_sequence_is_a_no_op() {
    let seq = TokenSequence::builder("").build();
    let refined = refine::detect_recurrence(seq, &durations(), &BTreeSet::new());
    assert!(refined.is_empty());
}

// =============================================================================
// Weekday-plural expansion against a mock
// =============================================================================

#[test]
fn expansion_promotes_only_plural_mismatches() {
    // Original stream: "Thursdays" plural, untagged. Lemma stream:
    // "thursday" tagged DATE. The pass promotes index 2 only.
    let orig = TokenSequence::builder("see Biology Thursdays")
        .token("see", Pos::Verb)
        .token("Biology", Pos::Propn)
        .token("Thursdays", Pos::Propn)
        .plural()
        .lemma("thursday")
        .build();
    let lemma_seq = TokenSequence::builder("see biology thursday")
        .token("see", Pos::Verb)
        .token("biology", Pos::Propn)
        .token("thursday", Pos::Propn)
        .ent(EntityLabel::Date)
        .build();
    let mock = MockAnnotator::new().with_sequence("see biology thursday", lemma_seq);
    let (refined, promoted) = refine::expand_weekday_dates(orig, &mock);
    assert_eq!(promoted, BTreeSet::from([2]));
    assert_eq!(refined.tokens()[2].ent, Some(EntityLabel::Date));
    assert_eq!(refined.tokens()[1].ent, None);
}

#[test]
fn expansion_skips_misaligned_lemma_stream() {
    let orig = TokenSequence::builder("see Thursdays")
        .token("see", Pos::Verb)
        .token("Thursdays", Pos::Propn)
        .plural()
        .lemma("thursday")
        .build();
    // Mock returns a three-token sequence for the lemma stream.
    let lemma_seq = TokenSequence::builder("see thursday x")
        .token("see", Pos::Verb)
        .token("thursday", Pos::Propn)
        .ent(EntityLabel::Date)
        .token("x", Pos::X)
        .build();
    let mock = MockAnnotator::new().with_sequence("see thursday", lemma_seq);
    let (refined, promoted) = refine::expand_weekday_dates(orig, &mock);
    assert!(promoted.is_empty());
    assert_eq!(refined.tokens()[1].ent, None);
}

#[test]
fn expansion_replaces_conflicting_label() {
    // The original token held a TIME label; promotion overwrites it.
    let orig = TokenSequence::builder("free evenings")
        .token("free", Pos::Adj)
        .token("evenings", Pos::Noun)
        .plural()
        .lemma("evening")
        .ent(EntityLabel::Time)
        .build();
    let lemma_seq = TokenSequence::builder("free evening")
        .token("free", Pos::Adj)
        .token("evening", Pos::Noun)
        .ent(EntityLabel::Date)
        .build();
    let mock = MockAnnotator::new().with_sequence("free evening", lemma_seq);
    let (refined, promoted) = refine::expand_weekday_dates(orig, &mock);
    assert_eq!(promoted, BTreeSet::from([1]));
    assert_eq!(refined.tokens()[1].ent, Some(EntityLabel::Date));
}

// =============================================================================
// on + plural DATE interactions
// =============================================================================

#[test]
fn on_plural_raw_date_merges_from_on() {
    let seq = TokenSequence::builder("gym on weekends")
        .token("gym", Pos::Noun)
        .token("on", Pos::Adp)
        .token("weekends", Pos::Noun)
        .plural()
        .ent(EntityLabel::Date)
        .build();
    let refined = refine::detect_recurrence(seq, &durations(), &BTreeSet::new());
    assert_eq!(refined.len(), 2);
    assert_eq!(refined.tokens()[1].text, "on weekends");
    assert_eq!(refined.tokens()[1].ent, Some(EntityLabel::Recurrence));
}

#[test]
fn on_singular_date_does_not_trigger() {
    let seq = TokenSequence::builder("gym on Monday")
        .token("gym", Pos::Noun)
        .token("on", Pos::Adp)
        .token("Monday", Pos::Propn)
        .ent(EntityLabel::Date)
        .build();
    let refined = refine::detect_recurrence(seq.clone(), &durations(), &BTreeSet::new());
    assert_eq!(refined, seq);
}

#[test]
fn promoted_indices_are_exempt_from_on_trigger() {
    let seq = TokenSequence::builder("gym on Fridays")
        .token("gym", Pos::Noun)
        .token("on", Pos::Adp)
        .token("Fridays", Pos::Propn)
        .plural()
        .ent(EntityLabel::Date)
        .build();
    let promoted = BTreeSet::from([2]);
    let refined = refine::detect_recurrence(seq.clone(), &durations(), &promoted);
    assert_eq!(refined, seq);
}
