//! Trigram similarity, computed the way PostgreSQL's `pg_trgm` does.
//!
//! Text is lowercased and split into words on anything that is not
//! alphanumeric. Each word is padded with two spaces in front and one behind,
//! and every run of three characters becomes a trigram. Similarity is the
//! size of the shared trigram set over the size of the union.

use std::collections::BTreeSet;

/// Trigram set of a string.
pub fn trigrams(text: &str) -> BTreeSet<String> {
    let lowered = text.to_lowercase();
    let mut set = BTreeSet::new();

    for word in lowered.split(|c: char| !c.is_alphanumeric()) {
        if word.is_empty() {
            continue;
        }
        let padded: Vec<char> = "  ".chars().chain(word.chars()).chain(" ".chars()).collect();
        for window in padded.windows(3) {
            set.insert(window.iter().collect());
        }
    }

    set
}

/// Similarity in `[0, 1]`; zero when either side has no trigrams.
pub fn similarity(a: &str, b: &str) -> f32 {
    let left = trigrams(a);
    let right = trigrams(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared = left.intersection(&right).count();
    let union = left.len() + right.len() - shared;
    shared as f32 / union as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_trigrams_match_pg_trgm() {
        let expected: BTreeSet<String> = ["  c", " ca", "cat", "at "]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(trigrams("Cat"), expected);
    }

    #[test]
    fn test_identical_and_disjoint() {
        assert_eq!(similarity("Django tips", "django TIPS"), 1.0);
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("", "anything"), 0.0);
        assert_eq!(similarity("!!!", "anything"), 0.0);
    }

    #[test]
    fn test_misspelling_still_matches() {
        // pg_trgm gives similarity('word', 'two words') = 0.363636
        let score = similarity("word", "two words");
        assert!((score - 4.0 / 11.0).abs() < 1e-6);

        assert!(similarity("pagination", "Paginaton in practice") > 0.1);
    }

    #[test]
    fn test_symmetry() {
        let a = "Who let the dogs out";
        let b = "dogs in the park";
        assert_eq!(similarity(a, b), similarity(b, a));
    }
}
