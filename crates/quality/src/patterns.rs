//! Compiled regex pattern tables shared by the analyzers.
//!
//! Every pattern is a `LazyLock<Option<Regex>>`: compiled once on first use,
//! and a pattern that fails to compile simply never matches.

use regex::Regex;
use std::sync::LazyLock;

/// A lazily-compiled pattern.
pub type Pattern = LazyLock<Option<Regex>>;

/// A fixed group of patterns scored together.
pub type PatternSet = [&'static Pattern];

macro_rules! pattern {
    ($(#[$meta:meta])* $name:ident, $regex_str:expr) => {
        $(#[$meta])*
        pub(crate) static $name: $crate::patterns::Pattern =
            ::std::sync::LazyLock::new(|| ::regex::Regex::new($regex_str).ok());
    };
}

pub(crate) use pattern;

/// Whether the pattern matches anywhere in `text`.
pub fn is_match(pattern: &Pattern, text: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(text))
}

/// Number of non-overlapping matches in `text`.
pub fn count_matches(pattern: &Pattern, text: &str) -> usize {
    pattern.as_ref().map_or(0, |re| re.find_iter(text).count())
}

/// Number of patterns in the set that match at least once.
pub fn matched_patterns(set: &PatternSet, text: &str) -> usize {
    set.iter().filter(|p| is_match(p, text)).count()
}

/// Total matches across every pattern in the set.
pub fn total_matches(set: &PatternSet, text: &str) -> usize {
    set.iter().map(|p| count_matches(p, text)).sum()
}

/// Replace every match with `replacement`; unchanged if the pattern is unusable.
pub fn replace_all(pattern: &Pattern, text: &str, replacement: &str) -> String {
    match pattern.as_ref() {
        Some(re) => re.replace_all(text, replacement).into_owned(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pattern!(RE_DIGITS, r"\d+");
    pattern!(RE_BROKEN, r"(unclosed");

    #[test]
    fn test_counts_and_matches() {
        assert!(is_match(&RE_DIGITS, "grade 3"));
        assert_eq!(count_matches(&RE_DIGITS, "80% of 10 trials"), 2);
        static SET: [&Pattern; 2] = [&RE_DIGITS, &RE_BROKEN];
        assert_eq!(matched_patterns(&SET, "42"), 1);
        assert_eq!(total_matches(&SET, "1 2 3"), 3);
    }

    #[test]
    fn test_broken_pattern_never_matches() {
        assert!(RE_BROKEN.is_none());
        assert!(!is_match(&RE_BROKEN, "(unclosed"));
        assert_eq!(replace_all(&RE_BROKEN, "abc", ""), "abc");
    }
}
