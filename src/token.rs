//! Token-level data model: part-of-speech and entity label enums, tokens,
//! spans, and the [`TokenSequence`] the pipeline passes are applied to.
//!
//! Entity labels and part-of-speech tags are closed enumerations so the
//! field-extraction priority chain can be matched exhaustively. Span merges
//! never mutate a sequence in place: [`TokenSequence::merge_span`] and
//! [`TokenSequence::merge_many`] rebuild a fresh sequence with re-derived
//! indices, so a pass can never observe a half-retokenized document.

use serde::{Deserialize, Serialize};

/// Universal part-of-speech tags (UPOS inventory).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pos {
    /// Adjective
    Adj,
    /// Adposition (preposition/postposition)
    Adp,
    /// Adverb
    Adv,
    /// Auxiliary verb
    Aux,
    /// Coordinating conjunction
    Cconj,
    /// Determiner
    Det,
    /// Interjection
    Intj,
    /// Noun
    Noun,
    /// Numeral
    Num,
    /// Particle
    Part,
    /// Pronoun
    Pron,
    /// Proper noun
    Propn,
    /// Punctuation
    Punct,
    /// Subordinating conjunction
    Sconj,
    /// Symbol
    Sym,
    /// Verb
    Verb,
    /// Other/unknown
    X,
}

impl Pos {
    /// Convert to the standard UPOS label string.
    #[must_use]
    pub fn as_label(&self) -> &'static str {
        match self {
            Pos::Adj => "ADJ",
            Pos::Adp => "ADP",
            Pos::Adv => "ADV",
            Pos::Aux => "AUX",
            Pos::Cconj => "CCONJ",
            Pos::Det => "DET",
            Pos::Intj => "INTJ",
            Pos::Noun => "NOUN",
            Pos::Num => "NUM",
            Pos::Part => "PART",
            Pos::Pron => "PRON",
            Pos::Propn => "PROPN",
            Pos::Punct => "PUNCT",
            Pos::Sconj => "SCONJ",
            Pos::Sym => "SYM",
            Pos::Verb => "VERB",
            Pos::X => "X",
        }
    }

    /// Parse from a UPOS label string. Unknown labels map to [`Pos::X`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.to_uppercase().as_str() {
            "ADJ" => Pos::Adj,
            "ADP" => Pos::Adp,
            "ADV" => Pos::Adv,
            "AUX" => Pos::Aux,
            "CCONJ" => Pos::Cconj,
            "DET" => Pos::Det,
            "INTJ" => Pos::Intj,
            "NOUN" => Pos::Noun,
            "NUM" => Pos::Num,
            "PART" => Pos::Part,
            "PRON" => Pos::Pron,
            "PROPN" => Pos::Propn,
            "PUNCT" => Pos::Punct,
            "SCONJ" => Pos::Sconj,
            "SYM" => Pos::Sym,
            "VERB" => Pos::Verb,
            _ => Pos::X,
        }
    }

    /// True for the nominal tags that can head a noun chunk.
    #[must_use]
    pub fn is_nominal(&self) -> bool {
        matches!(self, Pos::Noun | Pos::Propn)
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

/// Entity label classification.
///
/// The finite label set the pipeline operates over. A token with no entity
/// label carries `None` rather than a sentinel variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityLabel {
    /// Calendar date expression ("Friday", "January 15")
    Date,
    /// Clock time expression ("8pm", "noon")
    Time,
    /// Ordinal expression ("3rd", "third")
    Ordinal,
    /// A configured task-group name ("Biology")
    Group,
    /// A configured holiday name ("Christmas")
    Holiday,
    /// A merged recurrence phrase ("every Friday at 8pm")
    Recurrence,
}

impl EntityLabel {
    /// Convert to the label string used in serialized artifacts.
    #[must_use]
    pub fn as_label(&self) -> &'static str {
        match self {
            EntityLabel::Date => "DATE",
            EntityLabel::Time => "TIME",
            EntityLabel::Ordinal => "ORDINAL",
            EntityLabel::Group => "GROUP",
            EntityLabel::Holiday => "HOLIDAY",
            EntityLabel::Recurrence => "RECURRENCE",
        }
    }

    /// Parse from a label string.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_uppercase().as_str() {
            "DATE" => Some(EntityLabel::Date),
            "TIME" => Some(EntityLabel::Time),
            "ORDINAL" => Some(EntityLabel::Ordinal),
            "GROUP" => Some(EntityLabel::Group),
            "HOLIDAY" => Some(EntityLabel::Holiday),
            "RECURRENCE" => Some(EntityLabel::Recurrence),
            _ => None,
        }
    }

    /// True for the temporal labels (DATE, TIME, ORDINAL).
    #[must_use]
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            EntityLabel::Date | EntityLabel::Time | EntityLabel::Ordinal
        )
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

/// Morphological number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Number {
    /// Singular
    Sing,
    /// Plural
    Plur,
}

/// Coarse dependency labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepLabel {
    /// Sentence root
    Root,
    /// Nominal subject
    Nsubj,
    /// Direct object
    Obj,
    /// Object of an adposition
    Pobj,
    /// Determiner
    Det,
    /// Adjectival modifier
    Amod,
    /// Noun compound modifier
    Compound,
    /// Adpositional modifier
    Prep,
    /// Adverbial modifier
    Advmod,
    /// Punctuation
    Punct,
    /// Anything else
    Other(String),
}

impl DepLabel {
    /// Convert to the conventional lowercase label string.
    #[must_use]
    pub fn as_label(&self) -> &str {
        match self {
            DepLabel::Root => "ROOT",
            DepLabel::Nsubj => "nsubj",
            DepLabel::Obj => "obj",
            DepLabel::Pobj => "pobj",
            DepLabel::Det => "det",
            DepLabel::Amod => "amod",
            DepLabel::Compound => "compound",
            DepLabel::Prep => "prep",
            DepLabel::Advmod => "advmod",
            DepLabel::Punct => "punct",
            DepLabel::Other(s) => s.as_str(),
        }
    }
}

/// A single annotated token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Surface text
    pub text: String,
    /// Position in the token sequence
    pub i: usize,
    /// Lemma (base form)
    pub lemma: String,
    /// Part-of-speech tag
    pub pos: Pos,
    /// Morphological number, if any
    pub number: Option<Number>,
    /// Entity label, if any
    pub ent: Option<EntityLabel>,
    /// Dependency label, if any
    pub dep: Option<DepLabel>,
    /// Offset of the first character in the original text (in chars)
    pub offset: usize,
}

impl Token {
    /// Length of the surface text in chars.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Offset one past the last character (in chars).
    #[must_use]
    pub fn end_offset(&self) -> usize {
        self.offset + self.char_len()
    }

    /// True if the token is morphologically plural.
    #[must_use]
    pub fn is_plural(&self) -> bool {
        self.number == Some(Number::Plur)
    }

    /// Lowercased surface text.
    #[must_use]
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }
}

/// A contiguous half-open token range carrying one entity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// First token index (inclusive)
    pub start: usize,
    /// One past the last token index (exclusive)
    pub end: usize,
    /// Entity label carried by the span
    pub label: EntityLabel,
}

impl Span {
    /// True if `i` lies strictly after the span start and before its
    /// exclusive end (so the span's last token qualifies, its first does not).
    #[must_use]
    pub fn strictly_contains(&self, i: usize) -> bool {
        self.start < i && i < self.end
    }
}

/// A noun-chunk span with its syntactic head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSpan {
    /// First token index (inclusive)
    pub start: usize,
    /// One past the last token index (exclusive)
    pub end: usize,
    /// Index of the chunk's syntactic head, within `[start, end)`
    pub head: usize,
}

impl ChunkSpan {
    /// Number of tokens in the chunk.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True if the chunk is empty (degenerate).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// How a merge assigns the entity label of the merged token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntAttr {
    /// Set the given label.
    Label(EntityLabel),
    /// Clear any label.
    Clear,
    /// Keep the label only if every merged token agrees on it.
    InheritUniform,
}

/// Attributes applied to the token produced by a merge.
///
/// `pos`/`dep` default to the first merged token's values when `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeAttrs {
    /// Part-of-speech of the merged token
    pub pos: Option<Pos>,
    /// Dependency label of the merged token
    pub dep: Option<DepLabel>,
    /// Entity label policy for the merged token
    pub ent: EntAttr,
}

/// An annotated token sequence over one input text.
///
/// Owns the original text, the tokens, and the noun-chunk spans provided by
/// the annotator. Entity spans are a derived view: maximal contiguous runs
/// of tokens sharing the same label (see [`TokenSequence::entity_spans`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSequence {
    text: String,
    tokens: Vec<Token>,
    chunks: Vec<ChunkSpan>,
    has_deps: bool,
}

impl TokenSequence {
    /// Create a sequence from parts. Token indices are re-derived.
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        mut tokens: Vec<Token>,
        chunks: Vec<ChunkSpan>,
        has_deps: bool,
    ) -> Self {
        for (i, t) in tokens.iter_mut().enumerate() {
            t.i = i;
        }
        Self {
            text: text.into(),
            tokens,
            chunks,
            has_deps,
        }
    }

    /// Start building a sequence by hand (used by tests and mocks).
    #[must_use]
    pub fn builder(text: impl Into<String>) -> TokenSequenceBuilder {
        TokenSequenceBuilder::new(text)
    }

    /// The original input text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The tokens, in order.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// The noun-chunk spans.
    #[must_use]
    pub fn chunks(&self) -> &[ChunkSpan] {
        &self.chunks
    }

    /// Whether dependency annotations are present.
    #[must_use]
    pub fn has_deps(&self) -> bool {
        self.has_deps
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True if there are no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Get a token by index.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<&Token> {
        self.tokens.get(i)
    }

    /// The character at `idx` of the original text, if in range.
    #[must_use]
    pub fn char_at(&self, idx: usize) -> Option<char> {
        self.text.chars().nth(idx)
    }

    /// Set the entity label of every token in `[start, end)`.
    pub fn set_label(&mut self, start: usize, end: usize, label: Option<EntityLabel>) {
        for t in self
            .tokens
            .iter_mut()
            .skip(start)
            .take(end.saturating_sub(start))
        {
            t.ent = label;
        }
    }

    /// Derive the entity spans: maximal contiguous runs of equal label.
    #[must_use]
    pub fn entity_spans(&self) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut i = 0;
        while i < self.tokens.len() {
            if let Some(label) = self.tokens[i].ent {
                let start = i;
                while i < self.tokens.len() && self.tokens[i].ent == Some(label) {
                    i += 1;
                }
                spans.push(Span {
                    start,
                    end: i,
                    label,
                });
            } else {
                i += 1;
            }
        }
        spans
    }

    /// Merge one token range into a single token, producing a new sequence.
    ///
    /// See [`TokenSequence::merge_many`].
    #[must_use]
    pub fn merge_span(&self, start: usize, end: usize, attrs: MergeAttrs) -> TokenSequence {
        self.merge_many(vec![(start, end, attrs)])
    }

    /// Apply several non-overlapping merges at once, producing a new sequence.
    ///
    /// Each `(start, end, attrs)` range collapses to one token whose surface
    /// text is the original-text slice from the first token's offset to the
    /// last token's end. A range of length one is a relabel. Chunk spans are
    /// remapped across the merges; chunks that partially overlap a merged
    /// range are dropped.
    #[must_use]
    pub fn merge_many(&self, mut ops: Vec<(usize, usize, MergeAttrs)>) -> TokenSequence {
        ops.retain(|(s, e, _)| *s < *e && *e <= self.tokens.len());
        ops.sort_by_key(|(s, _, _)| *s);

        let chars: Vec<char> = self.text.chars().collect();
        let mut new_tokens: Vec<Token> = Vec::with_capacity(self.tokens.len());
        // old index -> new index
        let mut index_map: Vec<usize> = vec![0; self.tokens.len()];

        let mut op_iter = ops.iter().peekable();
        let mut i = 0;
        while i < self.tokens.len() {
            match op_iter.peek() {
                Some((start, end, attrs)) if *start == i => {
                    let first = &self.tokens[*start];
                    let last = &self.tokens[*end - 1];
                    let slice_start = first.offset.min(chars.len());
                    let slice_end = last.end_offset().min(chars.len());
                    let text: String = chars[slice_start..slice_end].iter().collect();
                    let lemma = self.tokens[*start..*end]
                        .iter()
                        .map(|t| t.lemma.as_str())
                        .collect::<Vec<_>>()
                        .join(" ");
                    let ent = match &attrs.ent {
                        EntAttr::Label(l) => Some(*l),
                        EntAttr::Clear => None,
                        EntAttr::InheritUniform => {
                            let first_ent = first.ent;
                            if self.tokens[*start..*end].iter().all(|t| t.ent == first_ent) {
                                first_ent
                            } else {
                                None
                            }
                        }
                    };
                    let number = if *end - *start == 1 { first.number } else { None };
                    let new_i = new_tokens.len();
                    for m in index_map.iter_mut().skip(*start).take(*end - *start) {
                        *m = new_i;
                    }
                    new_tokens.push(Token {
                        text,
                        i: new_i,
                        lemma,
                        pos: attrs.pos.unwrap_or(first.pos),
                        number,
                        ent,
                        dep: attrs.dep.clone().or_else(|| first.dep.clone()),
                        offset: first.offset,
                    });
                    i = *end;
                    op_iter.next();
                }
                _ => {
                    let new_i = new_tokens.len();
                    index_map[i] = new_i;
                    let mut t = self.tokens[i].clone();
                    t.i = new_i;
                    new_tokens.push(t);
                    i += 1;
                }
            }
        }

        let chunks = self
            .chunks
            .iter()
            .filter(|c| !c.is_empty() && c.end <= self.tokens.len())
            .filter(|c| {
                // Drop chunks that straddle a merged range boundary.
                ops.iter().all(|(s, e, _)| {
                    let covered = *s <= c.start && c.end <= *e;
                    let disjoint = c.end <= *s || *e <= c.start;
                    covered || disjoint
                })
            })
            .map(|c| {
                let start = index_map[c.start];
                let end = index_map[c.end - 1] + 1;
                let head = index_map[c.head];
                ChunkSpan { start, end, head }
            })
            .filter(|c| !c.is_empty())
            .collect();

        TokenSequence {
            text: self.text.clone(),
            tokens: new_tokens,
            chunks,
            has_deps: self.has_deps,
        }
    }
}

/// Builder for hand-constructed [`TokenSequence`]s.
///
/// Offsets are derived by locating each token's text in the original input,
/// scanning forward from the previous token. Intended for tests and
/// [`crate::annotate::MockAnnotator`] fixtures.
#[derive(Debug, Clone)]
pub struct TokenSequenceBuilder {
    text: String,
    tokens: Vec<Token>,
    chunks: Vec<ChunkSpan>,
    has_deps: bool,
    cursor: usize,
}

impl TokenSequenceBuilder {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tokens: Vec::new(),
            chunks: Vec::new(),
            has_deps: true,
            cursor: 0,
        }
    }

    /// Append a token with the given surface text and part-of-speech.
    ///
    /// # Panics
    ///
    /// Panics if the text cannot be found after the previous token.
    #[must_use]
    pub fn token(mut self, text: &str, pos: Pos) -> Self {
        let chars: Vec<char> = self.text.chars().collect();
        let needle: Vec<char> = text.chars().collect();
        let offset = (self.cursor..=chars.len().saturating_sub(needle.len()))
            .find(|&at| chars[at..at + needle.len()] == needle[..])
            .unwrap_or_else(|| panic!("token {text:?} not found in {:?}", self.text));
        self.cursor = offset + needle.len();
        let i = self.tokens.len();
        self.tokens.push(Token {
            text: text.to_string(),
            i,
            lemma: text.to_lowercase(),
            pos,
            number: None,
            ent: None,
            dep: None,
            offset,
        });
        self
    }

    /// Set the entity label of the most recent token.
    #[must_use]
    pub fn ent(mut self, label: EntityLabel) -> Self {
        if let Some(t) = self.tokens.last_mut() {
            t.ent = Some(label);
        }
        self
    }

    /// Mark the most recent token morphologically plural.
    #[must_use]
    pub fn plural(mut self) -> Self {
        if let Some(t) = self.tokens.last_mut() {
            t.number = Some(Number::Plur);
        }
        self
    }

    /// Set the lemma of the most recent token.
    #[must_use]
    pub fn lemma(mut self, lemma: &str) -> Self {
        if let Some(t) = self.tokens.last_mut() {
            t.lemma = lemma.to_string();
        }
        self
    }

    /// Set the dependency label of the most recent token.
    #[must_use]
    pub fn dep(mut self, dep: DepLabel) -> Self {
        if let Some(t) = self.tokens.last_mut() {
            t.dep = Some(dep);
        }
        self
    }

    /// Record a noun chunk over `[start, end)` headed at `head`.
    #[must_use]
    pub fn chunk(mut self, start: usize, end: usize, head: usize) -> Self {
        self.chunks.push(ChunkSpan { start, end, head });
        self
    }

    /// Mark the sequence as lacking dependency annotations.
    #[must_use]
    pub fn without_deps(mut self) -> Self {
        self.has_deps = false;
        self
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> TokenSequence {
        TokenSequence::new(self.text, self.tokens, self.chunks, self.has_deps)
    }
}
