//! Concept-map generation from noun co-occurrence.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use crate::error::InsightError;
use crate::pos::{LexiconTagger, PosTagger};
use crate::tokenizer::{words, Tokenizer};
use crate::types::{
    Branch, Concept, ConceptMap, MindmapFormat, MindmapOutput, RelationshipMap, SubBranch,
};

/// Returned when the text has no noun-like content words.
pub const NO_CONCEPTS_MESSAGE: &str = "Could not generate mind map: no key concepts found.";

pub const DEFAULT_MAX_CONCEPTS: usize = 7;

/// Upper bound on concepts per map. Larger requests are clamped to it.
pub const MAX_CONCEPTS_LIMIT: usize = 50;

/// Builds hub-and-branch maps of the most frequent nouns in a text.
pub struct ConceptMapGenerator<T = LexiconTagger> {
    tokenizer: Tokenizer,
    tagger: T,
    max_concepts: usize,
}

impl Default for ConceptMapGenerator {
    fn default() -> Self {
        Self::new(Tokenizer::default(), LexiconTagger::new())
    }
}

impl<T: PosTagger> ConceptMapGenerator<T> {
    pub fn new(tokenizer: Tokenizer, tagger: T) -> Self {
        Self {
            tokenizer,
            tagger,
            max_concepts: DEFAULT_MAX_CONCEPTS,
        }
    }

    pub fn with_max_concepts(mut self, max_concepts: usize) -> Self {
        self.max_concepts = max_concepts.min(MAX_CONCEPTS_LIMIT);
        self
    }

    pub fn max_concepts(&self) -> usize {
        self.max_concepts
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Most frequent noun-like content words, at most `max_concepts`
    /// (itself capped at [`MAX_CONCEPTS_LIMIT`]).
    ///
    /// A word qualifies if it is tagged as a noun in at least one place.
    /// Equal frequencies keep first-occurrence order.
    pub fn extract_concepts(&self, text: &str, max_concepts: usize) -> Vec<Concept> {
        let mut order: Vec<String> = Vec::new();
        let mut frequency: HashMap<String, usize> = HashMap::new();
        let mut nouns: HashSet<String> = HashSet::new();

        for sentence in self.tokenizer.segment(text) {
            let tokens: Vec<String> = words(sentence.text).collect();
            let tags = self.tagger.tag(&tokens);

            for (token, tag) in tokens.into_iter().zip(tags) {
                if self.tokenizer.stopwords().is_stopword(&token) {
                    continue;
                }
                if tag.is_noun() {
                    nouns.insert(token.clone());
                }
                match frequency.get_mut(&token) {
                    Some(count) => *count += 1,
                    None => {
                        frequency.insert(token.clone(), 1);
                        order.push(token);
                    }
                }
            }
        }

        let mut concepts: Vec<Concept> = order
            .into_iter()
            .filter(|w| nouns.contains(w))
            .map(|word| Concept {
                frequency: frequency[&word],
                word,
            })
            .collect();
        // Stable sort keeps first-seen order among equal counts.
        concepts.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        concepts.truncate(max_concepts.min(MAX_CONCEPTS_LIMIT));
        concepts
    }

    /// Concepts that share a sentence, each recorded once per pair.
    pub fn extract_relationships(&self, text: &str, concepts: &[Concept]) -> RelationshipMap {
        let mut relationships = RelationshipMap::new(concepts.iter().map(|c| c.word.as_str()));

        for sentence in self.tokenizer.segment(text) {
            let present: HashSet<String> = words(sentence.text).collect();
            let in_sentence: Vec<&str> = concepts
                .iter()
                .map(|c| c.word.as_str())
                .filter(|w| present.contains(*w))
                .collect();

            for (i, a) in in_sentence.iter().enumerate() {
                for b in &in_sentence[i + 1..] {
                    relationships.relate(a, b);
                }
            }
        }

        relationships
    }

    /// Build the structured map, or `None` when no concepts were found.
    pub fn build(&self, text: &str, max_concepts: usize) -> Option<ConceptMap> {
        let concepts = self.extract_concepts(text, max_concepts);
        if concepts.is_empty() {
            return None;
        }
        let relationships = self.extract_relationships(text, &concepts);
        let hub = central(&concepts, &relationships)?;

        let branches = concepts
            .iter()
            .filter(|c| c.word != hub)
            .map(|c| Branch {
                name: capitalize(&c.word),
                sub_branches: relationships
                    .related(&c.word)
                    .iter()
                    .filter(|r| r.as_str() != hub)
                    .map(|r| SubBranch {
                        name: capitalize(r),
                    })
                    .collect(),
            })
            .collect();

        tracing::debug!(
            concepts = concepts.len(),
            central = hub,
            "Built concept map"
        );

        Some(ConceptMap {
            central: capitalize(hub),
            branches,
        })
    }

    /// Generate a concept map with the configured concept limit.
    pub fn generate(&self, text: &str, format: MindmapFormat) -> MindmapOutput {
        self.generate_with(text, self.max_concepts, format)
    }

    pub fn generate_with(
        &self,
        text: &str,
        max_concepts: usize,
        format: MindmapFormat,
    ) -> MindmapOutput {
        match (self.build(text, max_concepts), format) {
            (None, _) => MindmapOutput::Text(NO_CONCEPTS_MESSAGE.to_string()),
            (Some(map), MindmapFormat::Text) => MindmapOutput::Text(render_text(&map)),
            (Some(map), MindmapFormat::Json) => MindmapOutput::Structured(map),
        }
    }

    /// Generate with a string mode ("text" or "json").
    pub fn generate_str(
        &self,
        text: &str,
        max_concepts: usize,
        format: &str,
    ) -> Result<MindmapOutput, InsightError> {
        let format: MindmapFormat = format.parse()?;
        Ok(self.generate_with(text, max_concepts, format))
    }
}

/// The concept with the most relationships; ties go to the earlier concept.
pub fn central<'a>(concepts: &'a [Concept], relationships: &RelationshipMap) -> Option<&'a str> {
    let mut best: Option<(&str, usize)> = None;
    for concept in concepts {
        let degree = relationships.related(&concept.word).len();
        if best.map_or(true, |(_, d)| degree > d) {
            best = Some((&concept.word, degree));
        }
    }
    best.map(|(word, _)| word)
}

/// Indented outline with 1-based branch and sub-branch numbers.
pub fn render_text(map: &ConceptMap) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Central Topic: {}", map.central);
    for (i, branch) in map.branches.iter().enumerate() {
        let _ = writeln!(out, "Branch {}: {}", i + 1, branch.name);
        for (j, sub) in branch.sub_branches.iter().enumerate() {
            let _ = writeln!(out, "  Sub-branch {}.{}: {}", i + 1, j + 1, sub.name);
        }
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOGS: &str = "Dogs chase cats. Cats climb trees. Dogs bark at night.";

    fn words_of(concepts: &[Concept]) -> Vec<&str> {
        concepts.iter().map(|c| c.word.as_str()).collect()
    }

    #[test]
    fn test_extract_concepts() {
        let generator = ConceptMapGenerator::default();
        let concepts = generator.extract_concepts(DOGS, DEFAULT_MAX_CONCEPTS);
        assert_eq!(words_of(&concepts), vec!["dogs", "cats", "trees", "night"]);
        assert_eq!(concepts[0].frequency, 2);
        assert_eq!(concepts[3].frequency, 1);
    }

    #[test]
    fn test_extract_concepts_truncates() {
        let generator = ConceptMapGenerator::default();
        let concepts = generator.extract_concepts(DOGS, 2);
        assert_eq!(words_of(&concepts), vec!["dogs", "cats"]);
        assert!(generator.extract_concepts(DOGS, 0).is_empty());
    }

    #[test]
    fn test_relationships_and_hub() {
        let generator = ConceptMapGenerator::default();
        let concepts = generator.extract_concepts(DOGS, DEFAULT_MAX_CONCEPTS);
        let relationships = generator.extract_relationships(DOGS, &concepts);

        assert_eq!(relationships.related("dogs"), ["cats".to_string(), "night".to_string()]);
        assert_eq!(relationships.related("cats"), ["dogs".to_string(), "trees".to_string()]);
        assert_eq!(relationships.related("trees"), ["cats".to_string()]);
        assert_eq!(central(&concepts, &relationships), Some("dogs"));
    }

    #[test]
    fn test_render_text() {
        let generator = ConceptMapGenerator::default();
        let MindmapOutput::Text(text) = generator.generate(DOGS, MindmapFormat::Text) else {
            panic!("expected text output");
        };
        assert_eq!(
            text,
            "Central Topic: Dogs\n\
             Branch 1: Cats\n\
             \x20 Sub-branch 1.1: Trees\n\
             Branch 2: Trees\n\
             \x20 Sub-branch 2.1: Cats\n\
             Branch 3: Night\n"
        );
    }

    #[test]
    fn test_json_central_matches_text() {
        let generator = ConceptMapGenerator::default();
        let MindmapOutput::Structured(map) = generator.generate(DOGS, MindmapFormat::Json) else {
            panic!("expected structured output");
        };
        let MindmapOutput::Text(text) = generator.generate(DOGS, MindmapFormat::Text) else {
            panic!("expected text output");
        };
        let first_line = text.lines().next().unwrap();
        assert_eq!(first_line, format!("Central Topic: {}", map.central));

        assert_eq!(map.branches.len(), 3);
        assert_eq!(map.branches[0].name, "Cats");
        assert_eq!(map.branches[0].sub_branches[0].name, "Trees");
        assert!(map.branches[2].sub_branches.is_empty());
    }

    #[test]
    fn test_no_concepts() {
        let generator = ConceptMapGenerator::default();
        for text in ["", "It is what it is.", "They can run."] {
            assert_eq!(
                generator.generate(text, MindmapFormat::Json),
                MindmapOutput::Text(NO_CONCEPTS_MESSAGE.to_string())
            );
        }
    }

    #[test]
    fn test_generate_str_rejects_unknown_mode() {
        let generator = ConceptMapGenerator::default();
        assert!(matches!(
            generator.generate_str(DOGS, 7, "yaml"),
            Err(InsightError::InvalidArgument(_))
        ));
        assert!(generator.generate_str(DOGS, 7, "json").is_ok());
    }

    #[test]
    fn test_central_tie_goes_to_first() {
        let concepts = vec![
            Concept {
                word: "alpha".into(),
                frequency: 1,
            },
            Concept {
                word: "beta".into(),
                frequency: 1,
            },
        ];
        let mut relationships = RelationshipMap::new(["alpha", "beta"]);
        relationships.relate("alpha", "beta");
        assert_eq!(central(&concepts, &relationships), Some("alpha"));
        assert_eq!(central(&[], &relationships), None);
    }

    #[test]
    fn test_concept_count_is_capped() {
        let text: String = ('a'..='d')
            .flat_map(|a| ('a'..='t').map(move |b| format!("I saw the zq{a}{b}o. ")))
            .collect();
        let generator = ConceptMapGenerator::default();

        let concepts = generator.extract_concepts(&text, usize::MAX);
        assert_eq!(concepts.len(), MAX_CONCEPTS_LIMIT);

        let map = generator.build(&text, usize::MAX).unwrap();
        assert!(map.branches.len() < MAX_CONCEPTS_LIMIT);

        let generator = ConceptMapGenerator::default().with_max_concepts(10_000);
        assert_eq!(generator.max_concepts(), MAX_CONCEPTS_LIMIT);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("dogs"), "Dogs");
        assert_eq!(capitalize("éclair"), "Éclair");
        assert_eq!(capitalize(""), "");
    }
}
