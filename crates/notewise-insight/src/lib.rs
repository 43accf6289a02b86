//! Notewise Insight crate - extractive summarization and concept maps.
//!
//! Provides the text-analysis pipeline:
//! - Sentence segmentation and stop-word normalization
//! - Cosine similarity graph over sentences
//! - PageRank centrality via a pluggable stationary solver
//! - Length-driven sentence selection with paragraph, bullet, and outline rendering
//! - Noun co-occurrence concept maps

pub mod concept;
pub mod error;
pub mod graph;
pub mod pos;
pub mod rank;
pub mod similarity;
pub mod stopwords;
pub mod summarizer;
pub mod tokenizer;
pub mod types;

pub use concept::{ConceptMapGenerator, MAX_CONCEPTS_LIMIT, NO_CONCEPTS_MESSAGE};
pub use error::InsightError;
pub use graph::SimilarityGraph;
pub use pos::{LexiconTagger, PosTag, PosTagger};
pub use rank::{PowerIterationSolver, ScoreVector, StationarySolver};
pub use stopwords::StopwordFilter;
pub use summarizer::{ExtractiveSummarizer, NO_TEXT_MESSAGE};
pub use tokenizer::{Sentence, Tokenizer};
pub use types::{
    Branch, Concept, ConceptMap, MindmapFormat, MindmapOutput, OutputFormat, RelationshipMap,
    SubBranch, Summary, SummaryLength,
};
