//! Lexical similarity between token sequences.
//!
//! Three signals are blended: unique-token Jaccard, a longest-matching-blocks
//! sequence ratio, and trigram Jaccard for phrase-level reuse.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::text;

/// Weight of the token-set Jaccard signal.
pub const JACCARD_WEIGHT: f64 = 0.4;
/// Weight of the sequence ratio signal.
pub const SEQUENCE_WEIGHT: f64 = 0.3;
/// Weight of the n-gram Jaccard signal.
pub const NGRAM_WEIGHT: f64 = 0.3;
/// Phrase length for the n-gram signal.
pub const NGRAM_SIZE: usize = 3;

/// Blended lexical similarity scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityScorer;

impl SimilarityScorer {
    /// Create a new scorer.
    pub fn new() -> Self {
        Self
    }

    /// Similarity of two raw texts (normalized and tokenized first).
    pub fn text_similarity(&self, a: &str, b: &str) -> f64 {
        self.similarity(&text::tokenize(a), &text::tokenize(b))
    }

    /// Weighted similarity of two token sequences, in [0, 1].
    pub fn similarity(&self, a: &[String], b: &[String]) -> f64 {
        let score = JACCARD_WEIGHT * jaccard(a, b)
            + SEQUENCE_WEIGHT * sequence_ratio(a, b)
            + NGRAM_WEIGHT * ngram_jaccard(a, b, NGRAM_SIZE);
        score.clamp(0.0, 1.0)
    }

    /// Best similarity of `passage` against any equally-long span of `source`.
    ///
    /// Slides a window of the passage's length over the whole source. Token
    /// and trigram overlap are tracked incrementally, so each step is O(1);
    /// the full score is only computed for windows whose upper bound
    /// `0.4·J + 0.3 + 0.3·N` reaches `floor`.
    pub fn best_window_similarity(&self, passage: &[String], source: &[String], floor: f64) -> f64 {
        let n = passage.len();
        if n == 0 || source.is_empty() {
            return 0.0;
        }
        if source.len() <= n {
            return self.similarity(passage, source);
        }

        let mut tokens = WindowOverlap::new(passage.iter().map(std::slice::from_ref));
        let track_grams = n >= NGRAM_SIZE;
        let mut grams = WindowOverlap::new(passage.windows(NGRAM_SIZE));

        for token in &source[..n] {
            tokens.add(std::slice::from_ref(token));
        }
        if track_grams {
            for gram in source[..n].windows(NGRAM_SIZE) {
                grams.add(gram);
            }
        }

        let mut best = 0.0f64;
        let mut start = 0usize;
        loop {
            let ngram_bound = if track_grams { grams.jaccard() } else { 1.0 };
            let bound = JACCARD_WEIGHT * tokens.jaccard() + SEQUENCE_WEIGHT + NGRAM_WEIGHT * ngram_bound;
            if bound + BOUND_EPSILON >= floor && bound > best {
                let score = self.similarity(passage, &source[start..start + n]);
                if score > best {
                    best = score;
                    if best >= 1.0 {
                        break;
                    }
                }
            }

            if start + n >= source.len() {
                break;
            }

            // Slide: drop source[start], add source[start + n].
            tokens.remove(std::slice::from_ref(&source[start]));
            tokens.add(std::slice::from_ref(&source[start + n]));
            if track_grams {
                grams.remove(&source[start..start + NGRAM_SIZE]);
                grams.add(&source[start + n + 1 - NGRAM_SIZE..start + n + 1]);
            }
            start += 1;
        }
        best
    }
}

/// Slack for float rounding when comparing an upper bound to the floor.
const BOUND_EPSILON: f64 = 1e-9;

/// Distinct-item overlap between a fixed passage and a sliding window.
struct WindowOverlap<'a> {
    passage: HashSet<&'a [String]>,
    window: HashMap<&'a [String], usize>,
    shared: usize,
}

impl<'a> WindowOverlap<'a> {
    fn new(items: impl Iterator<Item = &'a [String]>) -> Self {
        Self {
            passage: items.collect(),
            window: HashMap::new(),
            shared: 0,
        }
    }

    fn add(&mut self, item: &'a [String]) {
        let count = self.window.entry(item).or_insert(0);
        if *count == 0 && self.passage.contains(item) {
            self.shared += 1;
        }
        *count += 1;
    }

    fn remove(&mut self, item: &'a [String]) {
        if let Some(count) = self.window.get_mut(item) {
            *count -= 1;
            if *count == 0 {
                self.window.remove(item);
                if self.passage.contains(item) {
                    self.shared -= 1;
                }
            }
        }
    }

    fn jaccard(&self) -> f64 {
        let union = self.passage.len() + self.window.len() - self.shared;
        if union == 0 {
            0.0
        } else {
            self.shared as f64 / union as f64
        }
    }
}

/// `|A ∩ B| / |A ∪ B|` over unique tokens; 0.0 when both are empty.
pub fn jaccard<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    let set_a: HashSet<&T> = a.iter().collect();
    let set_b: HashSet<&T> = b.iter().collect();
    set_jaccard(&set_a, &set_b)
}

fn set_jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Jaccard similarity over overlapping windows of `n` consecutive tokens.
pub fn ngram_jaccard<T: Eq + Hash>(a: &[T], b: &[T], n: usize) -> f64 {
    if n == 0 || a.len() < n || b.len() < n {
        return 0.0;
    }
    let grams_a: HashSet<&[T]> = a.windows(n).collect();
    let grams_b: HashSet<&[T]> = b.windows(n).collect();
    set_jaccard(&grams_a, &grams_b)
}

/// `2·M / (|a| + |b|)` where `M` is the total length of the longest
/// matching blocks; 0.0 when either side is empty.
pub fn sequence_ratio<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let matched = matching_blocks_len(a, b);
    (2.0 * matched as f64) / (a.len() + b.len()) as f64
}

/// Total size of the matching blocks found by recursively taking the
/// longest common contiguous run and recursing on both sides of it.
fn matching_blocks_len<T: Eq + Hash>(a: &[T], b: &[T]) -> usize {
    let mut b_index: HashMap<&T, Vec<usize>> = HashMap::new();
    for (j, item) in b.iter().enumerate() {
        b_index.entry(item).or_default().push(j);
    }

    let mut total = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, k) = longest_match(a, &b_index, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        total += k;
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            queue.push((i + k, ahi, j + k, bhi));
        }
    }
    total
}

/// Longest run `a[i..i+k] == b[j..j+k]` within the given bounds; earliest
/// in `a`, then earliest in `b`, on ties.
fn longest_match<T: Eq + Hash>(
    a: &[T],
    b_index: &HashMap<&T, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    let mut run_at: HashMap<usize, usize> = HashMap::new();

    for (i, item) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_run_at = HashMap::new();
        if let Some(positions) = b_index.get(item) {
            let first = positions.partition_point(|&j| j < blo);
            for &j in &positions[first..] {
                if j >= bhi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| run_at.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_run_at.insert(j, k);
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            }
        }
        run_at = next_run_at;
    }
    (best_i, best_j, best_k)
}
