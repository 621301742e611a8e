//! Lexicon-and-suffix annotator.
//!
//! The built-in [`Annotator`]: a whitespace/punctuation/contraction
//! tokenizer plus closed-class lexicons, suffix heuristics for open-class
//! tags, plural morphology, a naive lemmatizer, pattern-based DATE/TIME/
//! ORDINAL recognition, coarse dependency labels, and POS-pattern noun
//! chunks. No model downloads, no external processes; good enough to drive
//! the refinement pipeline and its tests end to end.
//!
//! Deliberately not recognized: plural weekday forms ("Thursdays"). Those
//! are the job of the weekday-plural refinement pass, which re-annotates
//! the lemma stream where the singular form is in the lexicon.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Annotator, NounChunker};
use crate::error::Result;
use crate::token::{DepLabel, EntityLabel, Number, Pos, Token, TokenSequence};

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "every", "each", "all", "some", "any",
    "no", "another", "both",
];
const ADPOSITIONS: &[&str] = &[
    "on", "at", "in", "by", "for", "to", "from", "with", "about", "before", "after", "until",
    "during", "of", "over", "near", "into", "through",
];
const PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them", "my", "your",
    "his", "its", "our", "their", "mine", "yours", "myself", "yourself", "himself", "herself",
    "everyone", "someone", "something", "everything",
];
const AUXILIARIES: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
    "did", "will", "would", "can", "could", "should", "must", "may", "might", "shall", "need",
];
const COORDINATORS: &[&str] = &["and", "or", "but", "nor", "yet"];
const SUBORDINATORS: &[&str] = &["if", "because", "while", "when", "although", "since", "unless"];
const ADVERBS: &[&str] = &[
    "now", "soon", "later", "early", "very", "really", "always", "never", "often", "usually",
    "again", "here", "there", "too", "also", "just", "still", "already", "then",
];
const INTERJECTIONS: &[&str] = &["please", "hey", "hi", "hello", "oh", "ok", "okay", "yes"];
const VERBS: &[&str] = &[
    "do", "go", "get", "make", "take", "submit", "study", "finish", "complete", "call", "meet",
    "buy", "clean", "email", "review", "write", "read", "grade", "attend", "schedule", "pick",
    "turn", "send", "start", "prepare", "practice", "work", "plan", "wash", "walk", "cook",
    "pay", "book", "visit", "check", "remind", "remember", "bring", "return", "order", "renew",
    "water", "feed", "exercise", "give", "help", "see", "run", "fix", "print", "sign", "mail",
];
const WEEKDAYS: &[&str] = &[
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];
const MONTHS: &[&str] = &[
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];
// Month names that are also ordinary English words; these need an initial
// capital to be read as a month.
const AMBIGUOUS_MONTHS: &[&str] = &["may", "march"];
const ORDINAL_WORDS: &[&str] = &[
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth",
    "tenth",
];
const TIMES_OF_DAY: &[&str] = &["morning", "afternoon", "evening", "night", "noon", "midnight"];
const WEEKEND_WORDS: &[&str] = &["weekend", "weekends", "weekday", "weekdays"];
const DATE_MODIFIERS: &[&str] = &["next", "last", "this"];

static TIME_NUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}(?::\d{2})?(?:am|pm)$").unwrap());
static CLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}:\d{2}$").unwrap());
static NUM_ORDINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(?:st|nd|rd|th)$").unwrap());

/// The built-in lexicon/suffix annotator.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconAnnotator;

impl LexiconAnnotator {
    /// Create a new annotator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Annotator for LexiconAnnotator {
    fn annotate(&self, text: &str) -> Result<TokenSequence> {
        let raw = tokenize(text);
        let mut tokens: Vec<Token> = raw
            .into_iter()
            .enumerate()
            .map(|(i, (word, offset))| build_token(i, word, offset))
            .collect();
        acronym_modifier_pass(&mut tokens);
        meridiem_pass(&mut tokens);
        date_modifier_pass(&mut tokens);
        month_neighbor_pass(&mut tokens);
        assign_deps(&mut tokens);
        let chunks = NounChunker::new().extract(&tokens);
        Ok(TokenSequence::new(text, tokens, chunks, true))
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

/// Split text into (word, char offset) pairs.
///
/// Alphanumeric runs hold together (including `8:30` and `5pm`); every other
/// character is its own token. Contractions split the way treebank
/// tokenizers do: `don't` → `do` + `n't`, `I'll` → `I` + `'ll`; a run that
/// begins with an apostrophe (`'s` in a lemma stream) stays one token.
pub fn tokenize(text: &str) -> Vec<(String, usize)> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c.is_alphanumeric() || c == '\'' {
            let start = i;
            i += 1;
            while i < chars.len() {
                let c = chars[i];
                let keep = c.is_alphanumeric()
                    || (c == '\'' && i + 1 < chars.len() && chars[i + 1].is_alphabetic())
                    || (c == ':'
                        && i + 1 < chars.len()
                        && chars[i - 1].is_ascii_digit()
                        && chars[i + 1].is_ascii_digit());
                if !keep {
                    break;
                }
                i += 1;
            }
            let run: String = chars[start..i].iter().collect();
            split_contraction(run, start, &mut out);
        } else {
            out.push((c.to_string(), i));
            i += 1;
        }
    }
    out
}

fn split_contraction(run: String, offset: usize, out: &mut Vec<(String, usize)>) {
    if run.starts_with('\'') {
        out.push((run, offset));
        return;
    }
    let chars: Vec<char> = run.chars().collect();
    if let Some(p) = chars.iter().position(|&c| c == '\'') {
        let lower = run.to_lowercase();
        // "don't" splits before the n, everything else at the apostrophe.
        let split = if lower.ends_with("n't") && chars.len() > 3 {
            chars.len() - 3
        } else {
            p
        };
        let left: String = chars[..split].iter().collect();
        let right: String = chars[split..].iter().collect();
        if !left.is_empty() {
            out.push((left, offset));
        }
        out.push((right, offset + split));
    } else {
        out.push((run, offset));
    }
}

fn contains(list: &[&str], word: &str) -> bool {
    list.contains(&word)
}

fn is_upper_acronym(text: &str) -> bool {
    text.chars().count() >= 2 && text.chars().all(|c| c.is_alphabetic() && c.is_uppercase())
}

fn build_token(i: usize, text: String, offset: usize) -> Token {
    let lower = text.to_lowercase();
    let (pos, ent) = initial_tag(&text, &lower);
    let number = morph_number(pos, &lower);
    let lemma = lemmatize(&text, &lower, pos, number);
    Token {
        text,
        i,
        lemma,
        pos,
        number,
        ent,
        dep: None,
        offset,
    }
}

fn initial_tag(text: &str, lower: &str) -> (Pos, Option<EntityLabel>) {
    if !text.chars().any(char::is_alphanumeric) {
        return (Pos::Punct, None);
    }
    if lower == "n't" || lower == "not" {
        return (Pos::Part, None);
    }
    if lower == "'s" {
        return (Pos::Part, None);
    }
    if lower.starts_with('\'') {
        return (Pos::Aux, None);
    }
    if TIME_NUM.is_match(lower) || CLOCK.is_match(lower) {
        return (Pos::Num, Some(EntityLabel::Time));
    }
    if NUM_ORDINAL.is_match(lower) {
        return (Pos::Adj, Some(EntityLabel::Ordinal));
    }
    if lower.chars().all(|c| c.is_ascii_digit()) {
        return (Pos::Num, None);
    }
    if contains(ORDINAL_WORDS, lower) {
        return (Pos::Adj, Some(EntityLabel::Ordinal));
    }
    if contains(WEEKDAYS, lower) {
        return (Pos::Propn, Some(EntityLabel::Date));
    }
    let capitalized = text.chars().next().is_some_and(char::is_uppercase);
    if contains(MONTHS, lower) && (capitalized || !contains(AMBIGUOUS_MONTHS, lower)) {
        return (Pos::Propn, Some(EntityLabel::Date));
    }
    if matches!(lower, "today" | "tomorrow" | "yesterday") {
        return (Pos::Noun, Some(EntityLabel::Date));
    }
    if lower == "tonight" {
        return (Pos::Noun, Some(EntityLabel::Time));
    }
    if contains(TIMES_OF_DAY, lower) {
        return (Pos::Noun, Some(EntityLabel::Time));
    }
    if contains(WEEKEND_WORDS, lower) {
        return (Pos::Noun, Some(EntityLabel::Date));
    }
    if lower == "pm" {
        return (Pos::Noun, Some(EntityLabel::Time));
    }
    if contains(DETERMINERS, lower) {
        return (Pos::Det, None);
    }
    if contains(ADPOSITIONS, lower) {
        return (Pos::Adp, None);
    }
    if contains(PRONOUNS, lower) {
        return (Pos::Pron, None);
    }
    if contains(AUXILIARIES, lower) {
        return (Pos::Aux, None);
    }
    if contains(COORDINATORS, lower) {
        return (Pos::Cconj, None);
    }
    if contains(SUBORDINATORS, lower) {
        return (Pos::Sconj, None);
    }
    if contains(ADVERBS, lower) {
        return (Pos::Adv, None);
    }
    if contains(INTERJECTIONS, lower) {
        return (Pos::Intj, None);
    }
    if contains(DATE_MODIFIERS, lower) {
        return (Pos::Adj, None);
    }
    if contains(VERBS, lower) {
        return (Pos::Verb, None);
    }
    if lower.len() > 4 && (lower.ends_with("ing") || lower.ends_with("ed")) {
        return (Pos::Verb, None);
    }
    if is_upper_acronym(text) {
        return (Pos::Propn, None);
    }
    if capitalized {
        return (Pos::Propn, None);
    }
    (Pos::Noun, None)
}

fn morph_number(pos: Pos, lower: &str) -> Option<Number> {
    if !pos.is_nominal() {
        return None;
    }
    let plural = lower.chars().count() >= 3 && lower.ends_with('s') && !lower.ends_with("ss");
    Some(if plural { Number::Plur } else { Number::Sing })
}

fn lemmatize(text: &str, lower: &str, pos: Pos, number: Option<Number>) -> String {
    match lower {
        "n't" => return "not".to_string(),
        "'ll" => return "will".to_string(),
        "'re" | "'m" => return "be".to_string(),
        "'ve" => return "have".to_string(),
        "'d" => return "would".to_string(),
        "'s" => return "'s".to_string(),
        _ => {}
    }
    if pos == Pos::Punct || pos == Pos::Num {
        return text.to_string();
    }
    if number == Some(Number::Plur) {
        if lower.len() > 4 && lower.ends_with("ies") {
            return format!("{}y", &lower[..lower.len() - 3]);
        }
        for suffix in ["ches", "shes", "sses", "xes", "zes"] {
            if lower.ends_with(suffix) {
                return lower[..lower.len() - 2].to_string();
            }
        }
        if lower.ends_with('s') {
            return lower[..lower.len() - 1].to_string();
        }
    }
    lower.to_string()
}

/// All-caps abbreviations directly before a noun act as attributive
/// modifiers ("every HW assignment").
fn acronym_modifier_pass(tokens: &mut [Token]) {
    for i in 0..tokens.len().saturating_sub(1) {
        if tokens[i].pos == Pos::Propn
            && is_upper_acronym(&tokens[i].text)
            && tokens[i].text.chars().count() <= 5
            && tokens[i + 1].pos == Pos::Noun
        {
            tokens[i].pos = Pos::Adj;
            tokens[i].number = None;
        }
    }
}

/// "8 am" / "8 pm": the meridiem word and the number before it are TIME.
fn meridiem_pass(tokens: &mut [Token]) {
    for i in 1..tokens.len() {
        let lower = tokens[i].lower();
        if (lower == "am" || lower == "pm") && tokens[i - 1].pos == Pos::Num {
            tokens[i].pos = Pos::Noun;
            tokens[i].ent = Some(EntityLabel::Time);
            tokens[i].number = None;
            tokens[i - 1].ent = Some(EntityLabel::Time);
        }
    }
}

/// "next"/"last"/"this" before a date token join the date span.
fn date_modifier_pass(tokens: &mut [Token]) {
    for i in 0..tokens.len().saturating_sub(1) {
        if contains(DATE_MODIFIERS, &tokens[i].lower())
            && tokens[i + 1].ent == Some(EntityLabel::Date)
        {
            tokens[i].ent = Some(EntityLabel::Date);
        }
    }
}

/// Day numbers adjacent to a month name join the date span.
fn month_neighbor_pass(tokens: &mut [Token]) {
    for i in 0..tokens.len() {
        if tokens[i].ent != Some(EntityLabel::Date) || !contains(MONTHS, &tokens[i].lower()) {
            continue;
        }
        if i + 1 < tokens.len()
            && (tokens[i + 1].pos == Pos::Num || tokens[i + 1].ent == Some(EntityLabel::Ordinal))
        {
            tokens[i + 1].ent = Some(EntityLabel::Date);
        }
        if i > 0 && tokens[i - 1].pos == Pos::Num {
            tokens[i - 1].ent = Some(EntityLabel::Date);
        }
    }
}

fn assign_deps(tokens: &mut [Token]) {
    let mut root_assigned = false;
    let mut seen_verb = false;
    for i in 0..tokens.len() {
        let dep = match tokens[i].pos {
            Pos::Punct => DepLabel::Punct,
            Pos::Det => DepLabel::Det,
            Pos::Adj => DepLabel::Amod,
            Pos::Adp => DepLabel::Prep,
            Pos::Adv => DepLabel::Advmod,
            Pos::Verb => {
                seen_verb = true;
                if root_assigned {
                    DepLabel::Other("conj".to_string())
                } else {
                    root_assigned = true;
                    DepLabel::Root
                }
            }
            Pos::Aux => {
                seen_verb = true;
                DepLabel::Other("aux".to_string())
            }
            Pos::Pron => {
                if seen_verb {
                    DepLabel::Obj
                } else {
                    DepLabel::Nsubj
                }
            }
            Pos::Noun | Pos::Propn => nominal_dep(tokens, i, seen_verb),
            Pos::Num => DepLabel::Other("nummod".to_string()),
            Pos::Part => DepLabel::Other("neg".to_string()),
            Pos::Cconj => DepLabel::Other("cc".to_string()),
            Pos::Sconj => DepLabel::Other("mark".to_string()),
            Pos::Intj => DepLabel::Other("intj".to_string()),
            Pos::Sym | Pos::X => DepLabel::Other("dep".to_string()),
        };
        tokens[i].dep = Some(dep);
    }
}

fn nominal_dep(tokens: &[Token], i: usize, seen_verb: bool) -> DepLabel {
    if i + 1 < tokens.len() && tokens[i + 1].pos.is_nominal() {
        return DepLabel::Compound;
    }
    let mut j = i;
    while j > 0 {
        j -= 1;
        match tokens[j].pos {
            Pos::Det | Pos::Adj | Pos::Num | Pos::Noun | Pos::Propn => continue,
            Pos::Adp => return DepLabel::Pobj,
            _ => break,
        }
    }
    if seen_verb {
        DepLabel::Obj
    } else {
        DepLabel::Nsubj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotate(text: &str) -> TokenSequence {
        LexiconAnnotator::new().annotate(text).unwrap()
    }

    fn texts(seq: &TokenSequence) -> Vec<&str> {
        seq.tokens().iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn tokenizes_contractions() {
        let seq = annotate("Don't forget the milk");
        assert_eq!(texts(&seq), vec!["Do", "n't", "forget", "the", "milk"]);
        assert_eq!(seq.tokens()[1].pos, Pos::Part);
        assert_eq!(seq.tokens()[1].lemma, "not");
        // Offsets point into the original text.
        assert_eq!(seq.tokens()[1].offset, 2);
    }

    #[test]
    fn tokenizes_possessives_and_punctuation() {
        let seq = annotate("Valentine's Day!");
        assert_eq!(texts(&seq), vec!["Valentine", "'s", "Day", "!"]);
        assert_eq!(seq.tokens()[3].pos, Pos::Punct);
    }

    #[test]
    fn clock_times_hold_together() {
        let seq = annotate("meet at 8:30 or 5pm");
        assert_eq!(texts(&seq), vec!["meet", "at", "8:30", "or", "5pm"]);
        assert_eq!(seq.tokens()[2].ent, Some(EntityLabel::Time));
        assert_eq!(seq.tokens()[4].ent, Some(EntityLabel::Time));
    }

    #[test]
    fn weekday_singular_is_date_plural_is_not() {
        let seq = annotate("Friday and Fridays");
        assert_eq!(seq.tokens()[0].ent, Some(EntityLabel::Date));
        assert_eq!(seq.tokens()[2].ent, None);
        assert!(seq.tokens()[2].is_plural());
        assert_eq!(seq.tokens()[2].lemma, "friday");
    }

    #[test]
    fn weekend_words_are_plural_dates() {
        let seq = annotate("gym on weekends");
        let t = &seq.tokens()[2];
        assert_eq!(t.ent, Some(EntityLabel::Date));
        assert!(t.is_plural());
    }

    #[test]
    fn meridiem_joins_preceding_number() {
        let seq = annotate("at 8 pm");
        assert_eq!(seq.tokens()[1].ent, Some(EntityLabel::Time));
        assert_eq!(seq.tokens()[2].ent, Some(EntityLabel::Time));
    }

    #[test]
    fn acronym_before_noun_is_adjectival() {
        let seq = annotate("Do every HW assignment on Fridays");
        assert_eq!(seq.tokens()[2].text, "HW");
        assert_eq!(seq.tokens()[2].pos, Pos::Adj);
        // Not before a noun: stays a proper noun.
        let seq = annotate("Submit HW by 5pm");
        assert_eq!(seq.tokens()[1].pos, Pos::Propn);
    }

    #[test]
    fn next_friday_is_one_date_span() {
        let seq = annotate("call them next Friday");
        assert_eq!(seq.tokens()[2].ent, Some(EntityLabel::Date));
        assert_eq!(seq.tokens()[3].ent, Some(EntityLabel::Date));
        let spans = seq.entity_spans();
        assert_eq!(spans.len(), 1);
        assert_eq!((spans[0].start, spans[0].end), (2, 4));
    }

    #[test]
    fn month_and_day_number_share_a_span() {
        let seq = annotate("due January 15");
        assert_eq!(seq.tokens()[1].ent, Some(EntityLabel::Date));
        assert_eq!(seq.tokens()[2].ent, Some(EntityLabel::Date));
    }

    #[test]
    fn lowercase_may_is_not_a_month() {
        let seq = annotate("it may rain in May");
        assert_eq!(seq.tokens()[1].ent, None);
        assert_eq!(seq.tokens()[1].pos, Pos::Aux);
        assert_eq!(seq.tokens()[4].ent, Some(EntityLabel::Date));
    }

    #[test]
    fn ordinals_numeric_and_word() {
        let seq = annotate("the 3rd or the third");
        assert_eq!(seq.tokens()[1].ent, Some(EntityLabel::Ordinal));
        assert_eq!(seq.tokens()[4].ent, Some(EntityLabel::Ordinal));
    }

    #[test]
    fn chunks_cover_noun_phrases() {
        let seq = annotate("Wash the dirty dishes");
        let chunks = seq.chunks();
        assert_eq!(chunks.len(), 1);
        assert_eq!((chunks[0].start, chunks[0].end), (1, 4));
        assert!(seq.has_deps());
    }

    #[test]
    fn plural_morphology_and_lemmas() {
        let seq = annotate("wash dishes and parties");
        assert_eq!(seq.tokens()[1].lemma, "dish");
        assert!(seq.tokens()[1].is_plural());
        assert_eq!(seq.tokens()[3].lemma, "party");
    }

    #[test]
    fn lemma_stream_retokenizes_to_same_length() {
        // The weekday-plural pass depends on this alignment.
        for text in [
            "Don't forget Valentine's Day!",
            "I have Biology on Thursdays",
            "Submit HW by 5pm!",
        ] {
            let seq = annotate(text);
            let lemmas: Vec<&str> = seq.tokens().iter().map(|t| t.lemma.as_str()).collect();
            let rerun = annotate(&lemmas.join(" "));
            assert_eq!(rerun.len(), seq.len(), "misaligned for {text:?}");
        }
    }
}
