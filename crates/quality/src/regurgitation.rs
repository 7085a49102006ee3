//! Regurgitation detection - generated text copied too closely from sources.

use iep_qa_core::{FlaggedPassage, GeneratedContent, PassageKind, RegurgitationResult, SourceDocuments};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::similarity::SimilarityScorer;
use crate::text;

/// Sections shorter than this (non-whitespace chars) are too noisy to score.
pub const MIN_SECTION_CHARS: usize = 20;

/// Sentences shorter than this are not flagged individually.
pub const MIN_SENTENCE_CHARS: usize = 20;

/// Sentence similarity at or above which a passage is flagged.
pub const SENTENCE_FLAG_THRESHOLD: f64 = 0.75;

/// Chunks must clear the sentence threshold by this factor.
pub const CHUNK_FLAG_FACTOR: f64 = 1.1;

/// Sliding chunk length in words.
pub const CHUNK_WORDS: usize = 15;

/// Sliding chunk stride in words.
pub const CHUNK_STRIDE: usize = 5;

/// Flagged passages sharing this many leading characters are duplicates.
const DEDUP_PREFIX_CHARS: usize = 50;

/// Flags generated sections that reproduce source phrasing.
#[derive(Debug, Clone, Default)]
pub struct RegurgitationDetector {
    scorer: SimilarityScorer,
}

impl RegurgitationDetector {
    /// Create a new detector.
    pub fn new() -> Self {
        Self {
            scorer: SimilarityScorer::new(),
        }
    }

    /// Compare every section against the concatenated sources.
    ///
    /// `threshold` is the maximum tolerated mean similarity (0..1).
    pub fn detect(
        &self,
        generated: &GeneratedContent,
        sources: &SourceDocuments,
        threshold: f64,
    ) -> RegurgitationResult {
        let source_text = sources.joined();
        if sources.is_empty() || text::normalize(&source_text).is_empty() {
            tracing::warn!("No source text available; regurgitation check defaults to pass");
            return Self::no_source_result();
        }
        let source_tokens = text::tokenize(&source_text);
        let document_tokens: Vec<Vec<String>> = if sources.len() > 1 {
            sources.iter().map(text::tokenize).collect()
        } else {
            Vec::new()
        };

        let mut section_similarities = BTreeMap::new();
        let mut similarities = Vec::new();
        let mut flagged = Vec::new();

        for (section, body) in generated.iter() {
            if text::non_whitespace_len(body) < MIN_SECTION_CHARS {
                tracing::debug!("Skipping short section '{}'", section);
                continue;
            }

            let similarity = self.section_similarity(body, &source_tokens, &document_tokens);
            similarities.push(similarity);
            section_similarities.insert(section.to_string(), similarity * 100.0);

            flagged.extend(self.flag_passages(section, body, &source_tokens));
        }

        let overall = text::mean(&similarities);
        let passes_threshold = overall < threshold;
        let flagged_passages = dedup_passages(flagged);
        let score = regurgitation_score(overall, threshold);

        tracing::debug!(
            similarity = overall,
            flagged = flagged_passages.len(),
            "Regurgitation analysis complete"
        );

        let suggestions = suggestions(overall, threshold, &flagged_passages);

        RegurgitationResult {
            similarity_percentage: overall * 100.0,
            overall_similarity: overall,
            passes_threshold,
            flagged_passages,
            section_similarities,
            score,
            suggestions,
        }
    }

    /// Similarity of a section to the concatenated sources, or to the single
    /// closest source document when that is higher.
    fn section_similarity(&self, body: &str, source_tokens: &[String], document_tokens: &[Vec<String>]) -> f64 {
        let tokens = text::tokenize(body);
        document_tokens
            .iter()
            .map(|doc| self.scorer.similarity(&tokens, doc))
            .fold(self.scorer.similarity(&tokens, source_tokens), f64::max)
    }

    fn flag_passages(&self, section: &str, body: &str, source_tokens: &[String]) -> Vec<FlaggedPassage> {
        let mut flagged = Vec::new();

        for sentence in text::split_sentences(body) {
            if sentence.chars().count() < MIN_SENTENCE_CHARS {
                continue;
            }
            let tokens = text::tokenize(sentence);
            let similarity = self
                .scorer
                .best_window_similarity(&tokens, source_tokens, SENTENCE_FLAG_THRESHOLD);
            if similarity >= SENTENCE_FLAG_THRESHOLD {
                flagged.push(FlaggedPassage {
                    section: section.to_string(),
                    text: sentence.to_string(),
                    similarity,
                    kind: PassageKind::Sentence,
                });
            }
        }

        let chunk_threshold = SENTENCE_FLAG_THRESHOLD * CHUNK_FLAG_FACTOR;
        for chunk in text::word_chunks(body, CHUNK_WORDS, CHUNK_STRIDE) {
            let tokens = text::tokenize(&chunk);
            let similarity = self
                .scorer
                .best_window_similarity(&tokens, source_tokens, chunk_threshold);
            if similarity >= chunk_threshold {
                flagged.push(FlaggedPassage {
                    section: section.to_string(),
                    text: chunk,
                    similarity,
                    kind: PassageKind::Chunk,
                });
            }
        }

        flagged
    }

    fn no_source_result() -> RegurgitationResult {
        RegurgitationResult {
            similarity_percentage: 0.0,
            overall_similarity: 0.0,
            passes_threshold: true,
            flagged_passages: Vec::new(),
            section_similarities: BTreeMap::new(),
            score: 1.0,
            suggestions: Vec::new(),
        }
    }
}

/// Map raw similarity to a quality contribution.
pub fn regurgitation_score(similarity: f64, threshold: f64) -> f64 {
    let score = if similarity < threshold / 2.0 {
        1.0
    } else if similarity < threshold {
        1.0 - (similarity / threshold) * 0.2
    } else {
        (0.7 - 2.0 * (similarity - threshold)).max(0.1)
    };
    score.clamp(0.0, 1.0)
}

/// Keep the most similar passage per leading prefix, most similar first.
fn dedup_passages(passages: Vec<FlaggedPassage>) -> Vec<FlaggedPassage> {
    let mut by_prefix: BTreeMap<String, FlaggedPassage> = BTreeMap::new();
    for passage in passages {
        let key: String = passage
            .text
            .trim()
            .to_lowercase()
            .chars()
            .take(DEDUP_PREFIX_CHARS)
            .collect();
        match by_prefix.get(&key) {
            Some(existing) if existing.similarity >= passage.similarity => {}
            _ => {
                by_prefix.insert(key, passage);
            }
        }
    }

    let mut passages: Vec<FlaggedPassage> = by_prefix.into_values().collect();
    passages.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.section.cmp(&b.section))
            .then_with(|| a.text.cmp(&b.text))
    });
    passages
}

fn suggestions(similarity: f64, threshold: f64, flagged: &[FlaggedPassage]) -> Vec<String> {
    let mut out = Vec::new();
    if similarity >= threshold {
        out.push(format!(
            "Reduce direct copying from source documents: similarity is {:.1}% (target: below {:.1}%). \
             Synthesize assessment findings in new wording instead of restating them.",
            similarity * 100.0,
            threshold * 100.0
        ));
    }
    if let Some(top) = flagged.first() {
        out.push(format!(
            "Paraphrase {} flagged passage(s) that closely match source text; the closest, in '{}', \
             is {:.0}% similar (flag level {:.0}%).",
            flagged.len(),
            top.section,
            top.similarity * 100.0,
            SENTENCE_FLAG_THRESHOLD * 100.0
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "During the spring evaluation the examiner noted that decoding of multisyllabic \
        words remained effortful and inconsistent across tasks. Oral reading fluency was measured at \
        forty two words correct per minute on grade level passages, well below the benchmark expected \
        for third grade readers. Comprehension of narrative text was a relative strength when passages \
        were read aloud by an adult, yet independent comprehension of expository text was limited by \
        decoding errors and slow rate.";

    #[test]
    fn test_no_sources_passes_with_perfect_score() {
        let detector = RegurgitationDetector::new();
        let content = GeneratedContent::new().with_section("present_levels", SOURCE);
        let result = detector.detect(&content, &SourceDocuments::new(), 0.10);
        assert!(result.passes_threshold);
        assert_eq!(result.score, 1.0);
        assert_eq!(result.similarity_percentage, 0.0);

        let blank: SourceDocuments = ["   ", "**"].into_iter().collect();
        let result = detector.detect(&content, &blank, 0.10);
        assert!(result.passes_threshold);
        assert_eq!(result.score, 1.0);
    }

    #[test]
    fn test_verbatim_copy_is_flagged() {
        let detector = RegurgitationDetector::new();
        let content = GeneratedContent::new().with_section("present_levels", SOURCE);
        let sources: SourceDocuments = [SOURCE].into_iter().collect();
        let result = detector.detect(&content, &sources, 0.10);

        assert!(!result.passes_threshold);
        assert!(result.section_similarities["present_levels"] >= 75.0);
        assert!(!result.flagged_passages.is_empty());
        assert!(result.flagged_passages.iter().all(|p| p.section == "present_levels"));
        assert!(result.score <= 0.7);
        assert!(!result.suggestions.is_empty());
    }

    #[test]
    fn test_excerpt_of_longer_source_is_detected() {
        let detector = RegurgitationDetector::new();
        let excerpt = "Oral reading fluency was measured at forty two words correct per minute on grade \
            level passages, well below the benchmark expected for third grade readers.";
        let content = GeneratedContent::new().with_section("present_levels", excerpt);
        let padding = "The family reports that weekends are spent hiking, cooking together, and visiting \
            grandparents who live on a farm with horses, goats, chickens and a large vegetable garden.";
        let sources: SourceDocuments = [padding, SOURCE, padding].into_iter().collect();
        let result = detector.detect(&content, &sources, 0.10);
        let top = &result.flagged_passages[0];
        assert_eq!(top.kind, PassageKind::Sentence);
        assert!(top.similarity >= SENTENCE_FLAG_THRESHOLD);
        assert!(!result.passes_threshold);
    }

    #[test]
    fn test_section_scored_against_closest_document() {
        let detector = RegurgitationDetector::new();
        let padding = "The family reports that weekends are spent hiking, cooking together, and visiting \
            grandparents who live on a farm with horses, goats, chickens and a large vegetable garden.";
        let content = GeneratedContent::new().with_section("present_levels", SOURCE);
        let sources: SourceDocuments = [padding, SOURCE].into_iter().collect();
        let result = detector.detect(&content, &sources, 0.30);
        assert!((result.section_similarities["present_levels"] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_sections_are_skipped() {
        let detector = RegurgitationDetector::new();
        let content = GeneratedContent::new()
            .with_section("notes", "too short")
            .with_section("summary", "Weekly probes show steady growth in math computation accuracy.");
        let sources: SourceDocuments = [SOURCE].into_iter().collect();
        let result = detector.detect(&content, &sources, 0.10);
        assert!(!result.section_similarities.contains_key("notes"));
        assert!(result.section_similarities.contains_key("summary"));
    }

    #[test]
    fn test_score_mapping() {
        assert_eq!(regurgitation_score(0.04, 0.10), 1.0);
        assert!((regurgitation_score(0.08, 0.10) - 0.84).abs() < 1e-9);
        assert!((regurgitation_score(0.20, 0.10) - 0.5).abs() < 1e-9);
        assert_eq!(regurgitation_score(0.90, 0.10), 0.1);
    }

    #[test]
    fn test_dedup_keeps_highest() {
        let make = |text: &str, similarity: f64| FlaggedPassage {
            section: "s".to_string(),
            text: text.to_string(),
            similarity,
            kind: PassageKind::Sentence,
        };
        let prefix = "x".repeat(60);
        let passages = vec![
            make(&format!("{}a", prefix), 0.8),
            make(&format!("{}b", prefix), 0.9),
            make("different passage", 0.95),
        ];
        let deduped = dedup_passages(passages);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].similarity, 0.95);
        assert_eq!(deduped[1].similarity, 0.9);
    }
}
