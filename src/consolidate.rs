//! Noun-phrase consolidation.
//!
//! Collapses noun chunks into single tokens so the field-extraction walk
//! sees whole phrases: chunks with no GROUP token merge into one opaque
//! unit inheriting the chunk head's tag and dependency label; chunks made
//! entirely of GROUP tokens merge into one GROUP-labeled token ("Computer
//! Science" becomes one unit instead of leaking sub-tokens into the task
//! text). A chunk only partially covered by GROUP merges just the GROUP
//! sub-span and leaves the rest alone.
//!
//! Requires dependency annotations; without them this is a passthrough.

use crate::token::{ChunkSpan, EntAttr, EntityLabel, MergeAttrs, TokenSequence};

/// Merge noun chunks per the GROUP-coverage rules, producing a new sequence.
#[must_use]
pub fn merge_noun_phrases(seq: TokenSequence) -> TokenSequence {
    if !seq.has_deps() {
        return seq;
    }
    let mut ops = Vec::new();
    for chunk in seq.chunks() {
        let group_count = seq.tokens()[chunk.start..chunk.end]
            .iter()
            .filter(|t| t.ent == Some(EntityLabel::Group))
            .count();
        if group_count == 0 {
            let head = &seq.tokens()[chunk.head];
            // The merged token takes the chunk head's label ("a thursday"
            // stays a date); with an unlabeled head any uniform label of the
            // chunk survives.
            let ent = match head.ent {
                Some(label) => EntAttr::Label(label),
                None => EntAttr::InheritUniform,
            };
            ops.push((
                chunk.start,
                chunk.end,
                MergeAttrs {
                    pos: Some(head.pos),
                    dep: head.dep.clone(),
                    ent,
                },
            ));
        } else if group_count == chunk.len() {
            let head = &seq.tokens()[chunk.head];
            ops.push((
                chunk.start,
                chunk.end,
                MergeAttrs {
                    pos: Some(head.pos),
                    dep: head.dep.clone(),
                    ent: EntAttr::Label(EntityLabel::Group),
                },
            ));
        } else if let Some((start, end)) = group_run(&seq, chunk) {
            let last = &seq.tokens()[end - 1];
            ops.push((
                start,
                end,
                MergeAttrs {
                    pos: Some(last.pos),
                    dep: last.dep.clone(),
                    ent: EntAttr::Label(EntityLabel::Group),
                },
            ));
        }
    }
    seq.merge_many(ops)
}

/// The contiguous GROUP run inside a partially covered chunk, if any.
fn group_run(seq: &TokenSequence, chunk: &ChunkSpan) -> Option<(usize, usize)> {
    let start = (chunk.start..chunk.end)
        .find(|&i| seq.tokens()[i].ent == Some(EntityLabel::Group))?;
    let end = (start..chunk.end)
        .take_while(|&i| seq.tokens()[i].ent == Some(EntityLabel::Group))
        .last()
        .map(|i| i + 1)?;
    Some((start, end))
}
