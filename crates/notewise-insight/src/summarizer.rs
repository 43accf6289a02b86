//! Extractive summarization over a sentence-similarity graph.
//!
//! Sentences are scored by graph centrality, the top ones are kept in their
//! original order, and the result is rendered as a paragraph, a bullet list,
//! or a shallow central/branch outline.

use std::collections::HashSet;
use std::fmt::Write as _;

use notewise_core::config::SummarizerConfig;

use crate::error::InsightError;
use crate::graph::SimilarityGraph;
use crate::rank::{PowerIterationSolver, ScoreVector, StationarySolver};
use crate::stopwords::StopwordFilter;
use crate::tokenizer::{Sentence, Tokenizer};
use crate::types::{OutputFormat, Summary, SummaryLength};

/// Returned for empty or whitespace-only input.
pub const NO_TEXT_MESSAGE: &str = "No text provided for summarization.";

/// Documents with this many sentences or fewer are returned unchanged.
const MIN_SENTENCES_TO_SUMMARIZE: usize = 3;

const BULLET: &str = "\u{2022} ";

/// Graph-ranking summarizer, generic over the centrality solver.
pub struct ExtractiveSummarizer<S = PowerIterationSolver> {
    tokenizer: Tokenizer,
    solver: S,
    lenient: bool,
}

impl Default for ExtractiveSummarizer {
    fn default() -> Self {
        Self::new(Tokenizer::default(), PowerIterationSolver::default())
    }
}

impl ExtractiveSummarizer {
    /// Build from the `[summarizer]` config section.
    ///
    /// Fails with `InvalidArgument` when the ranking parameters are out of
    /// range.
    pub fn from_config(config: &SummarizerConfig) -> notewise_core::Result<Self> {
        config.validate()?;
        let stopwords = if config.language.eq_ignore_ascii_case("en") {
            StopwordFilter::english()
        } else {
            std::sync::Arc::new(StopwordFilter::new(&config.language))
        };
        let solver = PowerIterationSolver::new()
            .with_damping(config.damping)
            .with_max_iterations(config.max_iterations)
            .with_tolerance(config.tolerance);

        Ok(Self::new(Tokenizer::new(stopwords), solver).with_lenient(config.lenient_options))
    }
}

impl<S: StationarySolver> ExtractiveSummarizer<S> {
    pub fn new(tokenizer: Tokenizer, solver: S) -> Self {
        Self {
            tokenizer,
            solver,
            lenient: false,
        }
    }

    /// Accept unknown length/format strings instead of rejecting them.
    pub fn with_lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn parse_length(&self, length: &str) -> Result<SummaryLength, InsightError> {
        if self.lenient {
            Ok(SummaryLength::parse_lenient(length))
        } else {
            length.parse()
        }
    }

    pub fn parse_format(&self, format: &str) -> Result<OutputFormat, InsightError> {
        if self.lenient {
            Ok(OutputFormat::parse_lenient(format))
        } else {
            format.parse()
        }
    }

    /// Centrality score for every sentence.
    pub fn score(&self, sentences: &[Sentence<'_>]) -> ScoreVector {
        let normalized: Vec<HashSet<String>> = sentences
            .iter()
            .map(|s| self.tokenizer.normalize(s.text))
            .collect();
        let graph = SimilarityGraph::build(&normalized);
        let scores = self.solver.solve_stationary_distribution(&graph);

        tracing::debug!(
            sentences = sentences.len(),
            edges = graph.num_edges(),
            iterations = scores.iterations,
            converged = scores.converged,
            "Ranked sentences"
        );
        scores
    }

    /// Pick the top sentences for `length` and restore document order.
    pub fn select(
        &self,
        sentences: &[Sentence<'_>],
        scores: &ScoreVector,
        length: SummaryLength,
    ) -> Summary {
        let count = length.sentence_count(sentences.len());

        let mut indices: Vec<usize> = scores
            .ranked()
            .into_iter()
            .filter(|&i| i < sentences.len())
            .take(count)
            .collect();
        indices.sort_unstable();

        Summary {
            sentences: indices.iter().map(|&i| sentences[i].text.to_string()).collect(),
            indices,
        }
    }

    /// Render a selected summary.
    pub fn format(&self, summary: &Summary, format: OutputFormat) -> String {
        match format {
            OutputFormat::Paragraph => summary.sentences.join(" "),
            OutputFormat::Bullets => summary
                .sentences
                .iter()
                .map(|s| format!("{BULLET}{s}"))
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Mindmap => {
                let mut out = String::new();
                let central = summary.sentences.first().map_or("Summary", String::as_str);
                let _ = writeln!(out, "Central: {central}");

                if summary.len() > 1 {
                    for (k, branch) in summary.sentences[1..].iter().enumerate() {
                        let _ = writeln!(out, "Branch {}: {branch}", k + 1);
                    }
                } else {
                    let _ = writeln!(out, "Branch 1: No additional points");
                }
                out
            }
        }
    }

    /// Summarize `text`.
    ///
    /// Empty input yields [`NO_TEXT_MESSAGE`]; documents of three sentences or
    /// fewer come back exactly as given.
    pub fn summarize(&self, text: &str, length: SummaryLength, format: OutputFormat) -> String {
        if text.trim().is_empty() {
            return NO_TEXT_MESSAGE.to_string();
        }

        let sentences = self.tokenizer.segment(text);
        if sentences.len() <= MIN_SENTENCES_TO_SUMMARIZE {
            return text.to_string();
        }

        let scores = self.score(&sentences);
        let summary = self.select(&sentences, &scores, length);

        tracing::info!(
            sentences = sentences.len(),
            selected = summary.len(),
            length = %length,
            format = %format,
            "Summarized text"
        );
        self.format(&summary, format)
    }

    /// Summarize with string options, parsed strictly unless lenient.
    pub fn summarize_str(
        &self,
        text: &str,
        length: &str,
        format: &str,
    ) -> Result<String, InsightError> {
        let length = self.parse_length(length)?;
        let format = self.parse_format(format)?;
        Ok(self.summarize(text, length, format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notewise_core::NotewiseError;

    const CATS: &str = "Cats are mammals. Cats hunt mice. Mice are rodents. \
        Rodents are mammals too. This sentence is unrelated to anything.";

    const ALL_LENGTHS: [SummaryLength; 3] =
        [SummaryLength::Short, SummaryLength::Medium, SummaryLength::Large];
    const ALL_FORMATS: [OutputFormat; 3] =
        [OutputFormat::Paragraph, OutputFormat::Bullets, OutputFormat::Mindmap];

    fn twenty_sentences() -> String {
        (0..20)
            .map(|i| format!("Topic {} relates to shared subject number {}.", i % 4, i % 3))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Solver that returns preset scores.
    struct FixedSolver(Vec<f64>);

    impl StationarySolver for FixedSolver {
        fn solve_stationary_distribution(&self, _graph: &SimilarityGraph) -> ScoreVector {
            ScoreVector::new(self.0.clone(), 0, true)
        }
    }

    #[test]
    fn test_short_summary_picks_most_central_sentence() {
        let summarizer = ExtractiveSummarizer::default();
        let summary = summarizer.summarize(CATS, SummaryLength::Short, OutputFormat::Paragraph);
        assert_eq!(summary, "Rodents are mammals too.");
    }

    #[test]
    fn test_unrelated_sentence_ranks_last() {
        let summarizer = ExtractiveSummarizer::default();
        let sentences = summarizer.tokenizer().segment(CATS);
        let scores = summarizer.score(&sentences);
        assert_eq!(*scores.ranked().last().unwrap(), 4);
    }

    #[test]
    fn test_medium_count_for_twenty_sentences() {
        let summarizer = ExtractiveSummarizer::default();
        let text = twenty_sentences();
        let sentences = summarizer.tokenizer().segment(&text);
        assert_eq!(sentences.len(), 20);

        let scores = summarizer.score(&sentences);
        let summary = summarizer.select(&sentences, &scores, SummaryLength::Medium);
        assert_eq!(summary.len(), 6);
    }

    #[test]
    fn test_selected_indices_strictly_increasing() {
        let summarizer = ExtractiveSummarizer::default();
        let text = twenty_sentences();
        let sentences = summarizer.tokenizer().segment(&text);
        let scores = summarizer.score(&sentences);

        for length in ALL_LENGTHS {
            let summary = summarizer.select(&sentences, &scores, length);
            assert!(summary.indices.windows(2).all(|w| w[0] < w[1]));
            for (i, sentence) in summary.indices.iter().zip(&summary.sentences) {
                assert_eq!(sentences[*i].text, sentence);
            }
        }
    }

    #[test]
    fn test_short_documents_returned_unchanged() {
        let summarizer = ExtractiveSummarizer::default();
        let text = "  One sentence here. Another one!  And a third?";
        for length in ALL_LENGTHS {
            for format in ALL_FORMATS {
                assert_eq!(summarizer.summarize(text, length, format), text);
            }
        }
    }

    #[test]
    fn test_empty_input_message() {
        let summarizer = ExtractiveSummarizer::default();
        for input in ["", "   \n\t "] {
            for format in ALL_FORMATS {
                assert_eq!(
                    summarizer.summarize(input, SummaryLength::Medium, format),
                    NO_TEXT_MESSAGE
                );
            }
        }
    }

    #[test]
    fn test_ties_prefer_lower_index() {
        let summarizer = ExtractiveSummarizer::new(
            Tokenizer::default(),
            FixedSolver(vec![0.1, 0.3, 0.3, 0.1, 0.2]),
        );
        let text = "Alpha one. Beta two. Gamma three. Delta four. Epsilon five.";
        let sentences = summarizer.tokenizer().segment(text);
        let scores = summarizer.score(&sentences);

        let summary = summarizer.select(&sentences, &scores, SummaryLength::Medium);
        assert_eq!(summary.indices, vec![1, 2]);

        let summary = summarizer.select(&sentences, &scores, SummaryLength::Large);
        assert_eq!(summary.indices, vec![1, 2, 4]);
    }

    #[test]
    fn test_format_paragraph_and_bullets() {
        let summarizer = ExtractiveSummarizer::default();
        let summary = Summary {
            indices: vec![0, 2],
            sentences: vec!["First.".to_string(), "Third.".to_string()],
        };
        assert_eq!(summarizer.format(&summary, OutputFormat::Paragraph), "First. Third.");
        assert_eq!(
            summarizer.format(&summary, OutputFormat::Bullets),
            "\u{2022} First.\n\u{2022} Third."
        );
    }

    #[test]
    fn test_format_mindmap() {
        let summarizer = ExtractiveSummarizer::default();
        let summary = Summary {
            indices: vec![0, 2, 3],
            sentences: vec!["First.".to_string(), "Third.".to_string(), "Fourth.".to_string()],
        };
        assert_eq!(
            summarizer.format(&summary, OutputFormat::Mindmap),
            "Central: First.\nBranch 1: Third.\nBranch 2: Fourth.\n"
        );

        let single = Summary {
            indices: vec![3],
            sentences: vec!["Only.".to_string()],
        };
        assert_eq!(
            summarizer.format(&single, OutputFormat::Mindmap),
            "Central: Only.\nBranch 1: No additional points\n"
        );
    }

    #[test]
    fn test_cats_mindmap_has_single_branch_placeholder() {
        let summarizer = ExtractiveSummarizer::default();
        let out = summarizer.summarize(CATS, SummaryLength::Short, OutputFormat::Mindmap);
        assert_eq!(out, "Central: Rodents are mammals too.\nBranch 1: No additional points\n");
    }

    #[test]
    fn test_strict_options_rejected() {
        let summarizer = ExtractiveSummarizer::default();
        assert!(matches!(
            summarizer.summarize_str(CATS, "huge", "paragraph"),
            Err(InsightError::InvalidArgument(_))
        ));
        assert!(matches!(
            summarizer.summarize_str(CATS, "short", "table"),
            Err(InsightError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_lenient_options_fall_back() {
        let summarizer = ExtractiveSummarizer::default().with_lenient(true);
        let lenient = summarizer.summarize_str(CATS, "huge", "table").unwrap();
        let explicit = summarizer.summarize(CATS, SummaryLength::Large, OutputFormat::Paragraph);
        assert_eq!(lenient, explicit);
    }

    #[test]
    fn test_from_config() {
        let config = SummarizerConfig {
            lenient_options: true,
            max_iterations: 5,
            ..SummarizerConfig::default()
        };
        let summarizer = ExtractiveSummarizer::from_config(&config).unwrap();
        assert!(summarizer.is_lenient());
        assert_eq!(
            summarizer.summarize(CATS, SummaryLength::Short, OutputFormat::Paragraph),
            "Rodents are mammals too."
        );
    }

    #[test]
    fn test_from_config_rejects_out_of_range_damping() {
        for damping in [-0.5, 1.5] {
            let config = SummarizerConfig {
                damping,
                ..SummarizerConfig::default()
            };
            assert!(matches!(
                ExtractiveSummarizer::from_config(&config),
                Err(NotewiseError::InvalidArgument(_))
            ));
        }

        let config = SummarizerConfig {
            tolerance: -1.0,
            ..SummarizerConfig::default()
        };
        assert!(ExtractiveSummarizer::from_config(&config).is_err());
    }

    #[test]
    fn test_single_letter_word_before_period_splits_sentences() {
        let text = "We need vitamin C. It helps a lot. \
            Everyone agrees on that.  Doctors say so too.";
        let summarizer = ExtractiveSummarizer::default();
        assert_eq!(summarizer.tokenizer().segment(text).len(), 4);
        assert_ne!(
            summarizer.summarize(text, SummaryLength::Short, OutputFormat::Paragraph),
            text
        );
    }
}
