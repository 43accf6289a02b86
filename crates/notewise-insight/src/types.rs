use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InsightError;

/// How much of the document to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryLength {
    Short,
    Medium,
    Large,
}

impl SummaryLength {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Number of sentences to select from an `n`-sentence document.
    ///
    /// Fractions are floored, then raised to the per-length minimum and
    /// capped at `n`.
    pub fn sentence_count(&self, n: usize) -> usize {
        let count = match self {
            Self::Short => (n / 10).max(1),
            Self::Medium => (n * 3 / 10).max(2),
            Self::Large => (n / 2).max(3),
        };
        count.min(n)
    }

    /// Parse, falling back to `Large` for anything unrecognized.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or(Self::Large)
    }
}

impl FromStr for SummaryLength {
    type Err = InsightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            other => Err(InsightError::InvalidArgument(format!(
                "unknown summary length '{other}' (expected short, medium or large)"
            ))),
        }
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rendering of a selected summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Paragraph,
    Bullets,
    Mindmap,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Bullets => "bullets",
            Self::Mindmap => "mindmap",
        }
    }

    /// Parse, falling back to `Paragraph` for anything unrecognized.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or(Self::Paragraph)
    }
}

impl FromStr for OutputFormat {
    type Err = InsightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "paragraph" => Ok(Self::Paragraph),
            "bullets" => Ok(Self::Bullets),
            "mindmap" => Ok(Self::Mindmap),
            other => Err(InsightError::InvalidArgument(format!(
                "unknown summary format '{other}' (expected paragraph, bullets or mindmap)"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Concept-map output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MindmapFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for MindmapFormat {
    type Err = InsightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(InsightError::InvalidArgument(format!(
                "unknown mind map format '{other}' (expected text or json)"
            ))),
        }
    }
}

/// Selected sentences in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    /// Zero-based indices of the selected sentences, strictly increasing.
    pub indices: Vec<usize>,
    pub sentences: Vec<String>,
}

impl Summary {
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// A noun-like word and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub word: String,
    pub frequency: usize,
}

/// Co-occurring concepts, keyed in the order concepts were ranked.
///
/// Each entry lists related concepts once, in first-co-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationshipMap {
    entries: Vec<(String, Vec<String>)>,
    index: HashMap<String, usize>,
}

impl RelationshipMap {
    /// One empty entry per concept. Repeated concepts keep their first entry.
    pub fn new<'a>(concepts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut map = Self::default();
        for concept in concepts {
            if !map.index.contains_key(concept) {
                map.index.insert(concept.to_string(), map.entries.len());
                map.entries.push((concept.to_string(), Vec::new()));
            }
        }
        map
    }

    /// Record `a` and `b` as related in both directions.
    pub fn relate(&mut self, a: &str, b: &str) {
        if a == b {
            return;
        }
        self.push(a, b);
        self.push(b, a);
    }

    fn push(&mut self, from: &str, to: &str) {
        let Some(&i) = self.index.get(from) else {
            return;
        };
        let related = &mut self.entries[i].1;
        if !related.iter().any(|r| r == to) {
            related.push(to.to_string());
        }
    }

    pub fn related(&self, concept: &str) -> &[String] {
        self.index
            .get(concept)
            .map(|&i| self.entries[i].1.as_slice())
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(c, related)| (c.as_str(), related.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Hub-and-branch diagram of key concepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptMap {
    pub central: String,
    pub branches: Vec<Branch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    pub sub_branches: Vec<SubBranch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubBranch {
    pub name: String,
}

/// Concept-map result: rendered text or the structured map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MindmapOutput {
    Text(String),
    Structured(ConceptMap),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_count_formula() {
        assert_eq!(SummaryLength::Medium.sentence_count(20), 6);
        assert_eq!(SummaryLength::Short.sentence_count(20), 2);
        assert_eq!(SummaryLength::Large.sentence_count(20), 10);
    }

    #[test]
    fn test_sentence_count_minimums_and_cap() {
        assert_eq!(SummaryLength::Short.sentence_count(5), 1);
        assert_eq!(SummaryLength::Medium.sentence_count(5), 2);
        assert_eq!(SummaryLength::Large.sentence_count(5), 3);
        assert_eq!(SummaryLength::Large.sentence_count(2), 2);
        // floor(0.3 * 9) = 2
        assert_eq!(SummaryLength::Medium.sentence_count(9), 2);
    }

    #[test]
    fn test_length_parse() {
        assert_eq!("short".parse::<SummaryLength>().unwrap(), SummaryLength::Short);
        assert_eq!(" LARGE ".parse::<SummaryLength>().unwrap(), SummaryLength::Large);
        assert!(matches!(
            "huge".parse::<SummaryLength>(),
            Err(InsightError::InvalidArgument(_))
        ));
        assert_eq!(SummaryLength::parse_lenient("huge"), SummaryLength::Large);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("bullets".parse::<OutputFormat>().unwrap(), OutputFormat::Bullets);
        assert!("table".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::parse_lenient("table"), OutputFormat::Paragraph);
        assert_eq!(OutputFormat::Mindmap.to_string(), "mindmap");
    }

    #[test]
    fn test_mindmap_format_parse() {
        assert_eq!("json".parse::<MindmapFormat>().unwrap(), MindmapFormat::Json);
        assert_eq!(MindmapFormat::default(), MindmapFormat::Text);
        assert!("yaml".parse::<MindmapFormat>().is_err());
    }

    #[test]
    fn test_relationship_map_dedups_and_mirrors() {
        let mut map = RelationshipMap::new(["dogs", "cats", "trees"]);
        map.relate("dogs", "cats");
        map.relate("cats", "dogs");
        map.relate("cats", "trees");
        map.relate("trees", "trees");

        assert_eq!(map.related("dogs"), ["cats".to_string()]);
        assert_eq!(map.related("cats"), ["dogs".to_string(), "trees".to_string()]);
        assert_eq!(map.related("trees"), ["cats".to_string()]);
        assert!(map.related("night").is_empty());
    }

    #[test]
    fn test_relationship_map_ignores_unknown_and_repeated_concepts() {
        let mut map = RelationshipMap::new(["dogs", "cats", "dogs"]);
        assert_eq!(map.len(), 2);

        map.relate("dogs", "owls");
        assert_eq!(map.related("dogs"), ["owls".to_string()]);
        assert!(map.related("owls").is_empty());

        let keys: Vec<&str> = map.iter().map(|(c, _)| c).collect();
        assert_eq!(keys, ["dogs", "cats"]);
    }

    #[test]
    fn test_mindmap_output_serializes_untagged() {
        let text = MindmapOutput::Text("Central Topic: Dogs".to_string());
        assert_eq!(serde_json::to_string(&text).unwrap(), r#""Central Topic: Dogs""#);

        let map = MindmapOutput::Structured(ConceptMap {
            central: "Dogs".to_string(),
            branches: vec![Branch {
                name: "Cats".to_string(),
                sub_branches: vec![SubBranch {
                    name: "Trees".to_string(),
                }],
            }],
        });
        let value = serde_json::to_value(&map).unwrap();
        assert_eq!(value["central"], "Dogs");
        assert_eq!(value["branches"][0]["sub_branches"][0]["name"], "Trees");
    }
}
