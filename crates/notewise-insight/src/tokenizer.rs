//! Sentence segmentation and content-word normalization.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::stopwords::StopwordFilter;

/// Letters and digits, optionally joined by internal hyphens.
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Alphabetic}\p{N}]+(?:-[\p{Alphabetic}\p{N}]+)*").expect("valid word regex")
});

/// Words that end in a period without ending the sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "e.g", "i.e", "approx", "dept",
    "inc", "ltd", "corp", "fig", "vol", "ca", "cf", "al",
];

/// Capitalized words that usually open a sentence rather than continue a name.
const SENTENCE_OPENERS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "for", "he", "her", "his", "how", "however", "i", "if",
    "in", "it", "its", "my", "on", "our", "she", "so", "that", "the", "their", "then", "there",
    "these", "they", "this", "those", "to", "we", "what", "when", "why", "you",
];

/// A sentence of the source document with its zero-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub index: usize,
    pub text: &'a str,
}

/// Splits documents into sentences and sentences into content words.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    stopwords: Arc<StopwordFilter>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(StopwordFilter::english())
    }
}

impl Tokenizer {
    pub fn new(stopwords: Arc<StopwordFilter>) -> Self {
        Self { stopwords }
    }

    pub fn stopwords(&self) -> &StopwordFilter {
        &self.stopwords
    }

    /// Split `text` into sentences. Whitespace-only input yields none.
    pub fn segment<'a>(&self, text: &'a str) -> Vec<Sentence<'a>> {
        segment(text)
    }

    /// Lower-cased content words of a sentence, stop words removed.
    pub fn normalize(&self, sentence: &str) -> HashSet<String> {
        words(sentence)
            .filter(|w| !self.stopwords.is_stopword(w))
            .collect()
    }
}

/// Lower-cased, purely alphanumeric word tokens in order of appearance.
///
/// Hyphenated compounds are matched as one token and then dropped, the same
/// way a punctuation-aware tokenizer followed by an alphanumeric filter would.
pub fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|w| w.chars().all(char::is_alphanumeric))
        .map(str::to_lowercase)
}

/// Split on sentence terminators and on blank lines.
pub fn segment(text: &str) -> Vec<Sentence<'_>> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];

        if is_terminator(c) {
            let mut j = i + 1;
            while j < chars.len() && (is_terminator(chars[j].1) || is_closer(chars[j].1)) {
                j += 1;
            }
            let end = chars.get(j).map_or(text.len(), |&(p, _)| p);
            let at_boundary = chars.get(j).map_or(true, |&(_, next)| next.is_whitespace());

            let abbreviated =
                c == '.' && ends_with_abbreviation(&text[start..pos], &text[end..]);

            if at_boundary && !abbreviated {
                push_sentence(&mut sentences, &text[start..end]);
                start = end;
            }
            i = j;
            continue;
        }

        if c == '\n' {
            let mut j = i + 1;
            while j < chars.len() && matches!(chars[j].1, ' ' | '\t' | '\r') {
                j += 1;
            }
            if chars.get(j).is_some_and(|&(_, next)| next == '\n') {
                push_sentence(&mut sentences, &text[start..pos]);
                start = chars[j].0;
                i = j;
                continue;
            }
        }

        i += 1;
    }

    push_sentence(&mut sentences, &text[start..]);
    sentences
}

fn push_sentence<'a>(sentences: &mut Vec<Sentence<'a>>, raw: &'a str) {
    let text = raw.trim();
    if !text.is_empty() {
        sentences.push(Sentence {
            index: sentences.len(),
            text,
        });
    }
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '\u{201D}' | '\u{2019}')
}

/// True when the word right before a period is an abbreviation or part of
/// a run of initials. `rest` is the text after the period.
fn ends_with_abbreviation(prefix: &str, rest: &str) -> bool {
    let mut before = prefix.split_whitespace().rev();
    let Some(word) = before.next() else {
        return false;
    };
    let word = word.trim_start_matches(|c: char| !c.is_alphanumeric());
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (None, _) => false,
        (Some(c), None) if c.is_alphabetic() => {
            let next = rest.split_whitespace().next().unwrap_or_default();
            if is_initial(next) {
                return true;
            }
            let continues_name = before.next().map_or(true, |prev| {
                is_initial(prev) || prev.chars().next().is_some_and(char::is_uppercase)
            });
            continues_name && is_name_word(next)
        }
        (Some(_), None) => false,
        _ => ABBREVIATIONS.contains(&word.to_lowercase().as_str()),
    }
}

/// A single letter followed by a period, like "R.".
fn is_initial(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(c), Some('.'), None) if c.is_alphabetic()
    )
}

/// A capitalized word that does not usually start a sentence.
fn is_name_word(token: &str) -> bool {
    let word = token.trim_end_matches(|c: char| !c.is_alphanumeric());
    word.chars().next().is_some_and(char::is_uppercase)
        && !SENTENCE_OPENERS.contains(&word.to_lowercase().as_str())
}
