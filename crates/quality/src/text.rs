//! Text normalization, tokenization, and segmentation.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::patterns::{self, pattern};

pattern!(RE_WHITESPACE, r"\s+");
pattern!(RE_DISALLOWED, r"[^\w\s.,;:!?\-]");
pattern!(RE_WORD, r"\w+");
pattern!(RE_SENTENCE_END, r"[.!?]+");

/// Words carrying no signal for similarity.
static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // articles, pronouns, conjunctions
        "the", "and", "but", "nor", "for", "yet", "this", "that", "these", "those",
        "his", "her", "hers", "him", "she", "they", "them", "their", "its", "our",
        "you", "your", "who", "whom", "which", "what", "when", "where", "while",
        // auxiliaries and modals; "will"/"shall" still mark goals in smart.rs
        "are", "was", "were", "been", "being", "has", "have", "had", "having",
        "does", "did", "doing", "can", "could", "should", "would", "shall", "may",
        "might", "must", "will",
        // prepositions
        "with", "from", "into", "onto", "upon", "about", "over", "under", "than",
        "then", "also", "such", "each", "both", "all", "any", "not",
        // domain-neutral fillers
        "student", "students", "given", "able",
    ]
    .into_iter()
    .collect()
});

/// Lowercase, collapse whitespace, and strip characters outside
/// `[\w\s.,;:!?-]`.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let collapsed = patterns::replace_all(&RE_WHITESPACE, &lowered, " ");
    patterns::replace_all(&RE_DISALLOWED, &collapsed, "")
        .trim()
        .to_string()
}

/// Content words (≥3 chars, not stop words) of the normalized text, in order.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    let Some(re) = RE_WORD.as_ref() else {
        return Vec::new();
    };
    re.find_iter(&normalized)
        .map(|m| m.as_str())
        .filter(|w| w.chars().count() >= 3 && !STOP_WORDS.contains(w))
        .map(|w| w.to_string())
        .collect()
}

/// Sentences split on runs of `.`, `!`, `?`, trimmed, empties dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let Some(re) = RE_SENTENCE_END.as_ref() else {
        return vec![text.trim()].into_iter().filter(|s| !s.is_empty()).collect();
    };
    re.split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Overlapping windows of `size` whitespace-separated words, advancing by
/// `stride`. The last window may be shorter; short texts yield one window.
pub fn word_chunks(text: &str, size: usize, stride: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() || size == 0 {
        return Vec::new();
    }
    if words.len() <= size {
        return vec![words.join(" ")];
    }

    let stride = stride.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < words.len() {
        let end = (start + size).min(words.len());
        chunks.push(words[start..end].join(" "));
        if end == words.len() {
            break;
        }
        start += stride;
    }
    chunks
}

/// Whitespace-separated word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Characters that are not whitespace.
pub fn non_whitespace_len(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Reading\t\tScore:  85 (SS) ** "), "reading score: 85 ss");
        assert_eq!(normalize("well-known; fine!"), "well-known; fine!");
    }

    #[test]
    fn test_tokenize_drops_short_and_stop_words() {
        let tokens = tokenize("The student will read 45 words per minute with accuracy.");
        assert_eq!(tokens, vec!["read", "words", "per", "minute", "accuracy"]);
    }

    #[test]
    fn test_split_sentences() {
        let s = split_sentences("First one. Second?! Third...   ");
        assert_eq!(s, vec!["First one", "Second", "Third"]);
        assert!(split_sentences("   ").is_empty());
    }

    #[test]
    fn test_word_chunks_windows() {
        let text = (1..=25).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ");
        let chunks = word_chunks(&text, 15, 5);
        assert_eq!(chunks.len(), 3);
        assert!(chunks[0].starts_with("w1 "));
        assert!(chunks[1].starts_with("w6 "));
        assert!(chunks[2].starts_with("w11 "));
        assert!(chunks[2].ends_with("w25"));

        assert_eq!(word_chunks("only three words", 15, 5), vec!["only three words"]);
        assert!(word_chunks("", 15, 5).is_empty());
    }

    #[test]
    fn test_counts() {
        assert_eq!(word_count(" a  b c "), 3);
        assert_eq!(non_whitespace_len(" a  b c "), 3);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[0.5, 1.0]), 0.75);
    }
}
