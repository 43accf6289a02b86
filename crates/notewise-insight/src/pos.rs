//! Lightweight part-of-speech classification.
//!
//! Concept extraction only needs to tell nouns apart from everything else,
//! so the default tagger works from closed-class word lists, a lexicon of
//! common verbs, suffix rules and one token of left context.

/// Coarse word class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosTag {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Determiner,
    Pronoun,
    Preposition,
    Conjunction,
    Modal,
    Numeral,
    /// Infinitive marker "to".
    Particle,
}

impl PosTag {
    pub fn is_noun(&self) -> bool {
        matches!(self, Self::Noun)
    }
}

/// Assigns a tag to each lower-cased token of one sentence.
pub trait PosTagger: Send + Sync {
    fn tag(&self, tokens: &[String]) -> Vec<PosTag>;
}

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "each", "every", "either", "neither",
    "another", "some", "any", "no", "all", "both", "few", "many", "much", "several", "my",
    "your", "his", "her", "its", "our", "their", "whose",
];

const SUBJECT_PRONOUNS: &[&str] = &["i", "you", "he", "she", "it", "we", "they"];

const OTHER_PRONOUNS: &[&str] = &[
    "me", "him", "us", "them", "mine", "yours", "hers", "ours", "theirs", "myself", "yourself",
    "himself", "herself", "itself", "ourselves", "yourselves", "themselves", "who", "whom",
    "what", "which", "someone", "something", "anyone", "anything", "everyone", "everything",
    "nobody", "nothing",
];

const PREPOSITIONS: &[&str] = &[
    "about", "above", "across", "after", "against", "along", "among", "around", "at", "before",
    "behind", "below", "beneath", "beside", "between", "beyond", "by", "despite", "down",
    "during", "except", "for", "from", "in", "inside", "into", "like", "near", "of", "off", "on",
    "onto", "out", "outside", "over", "past", "since", "through", "throughout", "toward",
    "towards", "under", "until", "up", "upon", "with", "within", "without", "via",
];

const CONJUNCTIONS: &[&str] = &[
    "and", "but", "or", "nor", "so", "yet", "because", "although", "though", "while", "whereas",
    "if", "unless", "than", "whether", "when", "where", "why", "how", "then",
];

const MODALS: &[&str] = &[
    "can", "could", "may", "might", "must", "shall", "should", "will", "would",
];

const AUXILIARIES: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
    "do", "does", "did", "doing",
];

const ADVERBS: &[&str] = &[
    "not", "very", "too", "also", "just", "only", "often", "always", "never", "sometimes",
    "soon", "now", "here", "there", "again", "still", "already", "almost", "quite", "rather",
    "even", "ever", "perhaps", "once", "together", "away",
];

const ADJECTIVES: &[&str] = &[
    "good", "bad", "new", "old", "big", "small", "large", "little", "long", "short", "high",
    "low", "great", "important", "different", "same", "other", "own", "first", "last", "next",
    "early", "late", "young", "hard", "easy", "strong", "weak", "major", "main", "real", "true",
    "false", "whole", "free", "full", "clear", "simple", "common", "general", "special", "best",
    "better", "worse", "worst", "fast", "slow", "hot", "cold", "dark", "light", "open", "key",
];

/// Common verb lemmas. Inflected forms are matched after stripping -s, -es,
/// -ed, -d and -ing.
const VERBS: &[&str] = &[
    "accept", "add", "allow", "appear", "apply", "ask", "bark", "become", "begin", "believe",
    "bring", "build", "buy", "call", "carry", "cause", "change", "chase", "choose", "claim",
    "climb", "come", "consider", "contain", "continue", "create", "cut", "decide", "describe",
    "develop", "die", "drive", "eat", "enable", "explain", "fall", "feel", "find", "follow",
    "get", "give", "go", "grow", "happen", "hear", "help", "hold", "hunt", "include",
    "increase", "involve", "keep", "know", "lead", "learn", "leave", "let", "live", "look",
    "lose", "make", "mean", "meet", "move", "need", "offer", "pay", "play", "produce",
    "provide", "put", "reach", "read", "receive", "reduce", "remain", "remember", "require",
    "run", "say", "see", "seem", "sell", "send", "serve", "set", "show", "sit", "sleep",
    "speak", "spend", "stand", "start", "stay", "stop", "suggest", "take", "talk", "teach",
    "tell", "tend", "think", "try", "turn", "understand", "use", "want", "watch", "win",
    "work", "write",
];

/// Words ending in -ly that are not adverbs.
const LY_NOUNS: &[&str] = &[
    "family", "supply", "reply", "rally", "belly", "jelly", "ally", "assembly", "anomaly",
    "monopoly", "butterfly", "italy", "july", "fly", "holly", "lily",
];

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "less", "ish", "ical"];

/// Rule-based tagger over built-in English word lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconTagger;

impl LexiconTagger {
    pub fn new() -> Self {
        Self
    }

    fn closed_class(word: &str) -> Option<PosTag> {
        if word == "to" {
            Some(PosTag::Particle)
        } else if DETERMINERS.contains(&word) {
            Some(PosTag::Determiner)
        } else if SUBJECT_PRONOUNS.contains(&word) || OTHER_PRONOUNS.contains(&word) {
            Some(PosTag::Pronoun)
        } else if MODALS.contains(&word) {
            Some(PosTag::Modal)
        } else if AUXILIARIES.contains(&word) {
            Some(PosTag::Verb)
        } else if PREPOSITIONS.contains(&word) {
            Some(PosTag::Preposition)
        } else if CONJUNCTIONS.contains(&word) {
            Some(PosTag::Conjunction)
        } else if ADVERBS.contains(&word) {
            Some(PosTag::Adverb)
        } else if ADJECTIVES.contains(&word) {
            Some(PosTag::Adjective)
        } else {
            None
        }
    }

    fn tag_word(word: &str, prev: Option<(&str, PosTag)>) -> PosTag {
        if let Some(tag) = Self::closed_class(word) {
            return tag;
        }
        if word.chars().all(|c| c.is_ascii_digit()) {
            return PosTag::Numeral;
        }

        let suffix_tag = suffix_tag(word);

        match prev {
            // "the work", "at night", "our meeting"
            Some((_, PosTag::Determiner | PosTag::Preposition | PosTag::Adjective)) => {
                return match suffix_tag {
                    Some(PosTag::Adjective) => PosTag::Adjective,
                    _ => PosTag::Noun,
                };
            }
            // "to climb", "can run"
            Some((_, PosTag::Particle | PosTag::Modal)) => return PosTag::Verb,
            // "they climb"
            Some((prev_word, PosTag::Pronoun)) if SUBJECT_PRONOUNS.contains(&prev_word) => {
                return PosTag::Verb;
            }
            _ => {}
        }

        if let Some(tag) = suffix_tag {
            return tag;
        }
        if is_lexicon_verb(word) {
            // Sentence-initial bare lemmas read as nouns ("Work is hard").
            if prev.is_none() && VERBS.contains(&word) {
                return PosTag::Noun;
            }
            return PosTag::Verb;
        }
        PosTag::Noun
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, tokens: &[String]) -> Vec<PosTag> {
        let mut tags = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            let prev = i
                .checked_sub(1)
                .map(|p| (tokens[p].as_str(), tags[p]));
            tags.push(Self::tag_word(token, prev));
        }
        tags
    }
}

fn suffix_tag(word: &str) -> Option<PosTag> {
    let len = word.chars().count();
    if len > 4 && word.ends_with("ly") && !LY_NOUNS.contains(&word) {
        return Some(PosTag::Adverb);
    }
    if len > 5 && ADJECTIVE_SUFFIXES.iter().any(|s| word.ends_with(s)) {
        return Some(PosTag::Adjective);
    }
    if (len > 5 && word.ends_with("ing")) || (len > 4 && word.ends_with("ed")) {
        return Some(PosTag::Verb);
    }
    None
}

/// True when the word is a known verb lemma or one of its regular inflections.
fn is_lexicon_verb(word: &str) -> bool {
    if VERBS.contains(&word) {
        return true;
    }
    let candidates = [
        word.strip_suffix("es"),
        word.strip_suffix('s'),
        word.strip_suffix("ed"),
        word.strip_suffix('d'),
        word.strip_suffix("ing"),
    ];
    if let Some(stem) = word.strip_suffix("ies") {
        if VERBS.contains(&format!("{stem}y").as_str()) {
            return true;
        }
    }
    candidates
        .into_iter()
        .flatten()
        .any(|stem| !stem.is_empty() && VERBS.contains(&stem))
}
