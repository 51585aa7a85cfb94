//! Name similarity scoring.
//!
//! Scores are tiered: exact equality wins, then substring containment, and
//! only then the better of word overlap and normalized edit distance. This
//! catches abbreviations, reordering and typos without any training data.

/// Score for a case-insensitive exact match.
pub const EXACT_SCORE: f64 = 1.0;

/// Score when one name contains the other.
pub const CONTAINMENT_SCORE: f64 = 0.9;

/// Compute a similarity in `[0, 1]` between a query and a candidate name.
///
/// Case-insensitive, deterministic and total over all string pairs.
pub fn score(query: &str, candidate: &str) -> f64 {
    let query = query.trim().to_lowercase();
    let candidate = candidate.trim().to_lowercase();

    if query == candidate {
        return EXACT_SCORE;
    }

    if candidate.contains(&query) || query.contains(&candidate) {
        return CONTAINMENT_SCORE;
    }

    word_overlap(&query, &candidate).max(edit_similarity(&query, &candidate))
}

/// Fraction of query words that match some candidate word.
///
/// Words match when equal or when one contains the other. The denominator
/// is the larger of the two word counts, so extra words on either side
/// dilute the ratio.
fn word_overlap(query: &str, candidate: &str) -> f64 {
    let query_words: Vec<&str> = query.split_whitespace().collect();
    let candidate_words: Vec<&str> = candidate.split_whitespace().collect();

    let denominator = query_words.len().max(candidate_words.len());
    if denominator == 0 {
        return 0.0;
    }

    let matched = query_words
        .iter()
        .filter(|qw| {
            candidate_words
                .iter()
                .any(|cw| qw == &cw || cw.contains(*qw) || qw.contains(*cw))
        })
        .count();

    matched as f64 / denominator as f64
}

/// `1 - levenshtein / max_len`, clamped to `[0, 1]`.
///
/// Two empty strings are identical, so they score 1.0.
fn edit_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = strsim::levenshtein(a, b);
    (1.0 - distance as f64 / max_len as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_one() {
        for s in ["Leeds City Council", "", "  ", "x", "Brighton & Hove"] {
            assert_eq!(score(s, s), 1.0, "score({s:?}, {s:?})");
        }
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        assert_eq!(score("LEEDS city council", "Leeds City Council"), 1.0);
    }

    #[test]
    fn test_containment_scores_point_nine() {
        assert_eq!(score("Leeds", "Leeds City Council"), CONTAINMENT_SCORE);
        assert_eq!(score("Leeds City Council", "leeds"), CONTAINMENT_SCORE);
    }

    #[test]
    fn test_word_overlap_handles_reordering() {
        // "council city leeds" vs "leeds city council": every word matches
        let s = score("Council City Leeds", "Leeds City Council");
        assert!((s - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_word_overlap_partial() {
        // 2 of 3 query words match, denominator max(3, 3)
        let s = word_overlap("leeds borough council", "leeds city council");
        assert!((s - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_word_overlap_counts_word_containment() {
        // "manch" is contained in "manchester"
        let s = word_overlap("manch council", "manchester city council");
        assert!((s - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_edit_similarity_catches_typos() {
        let s = score("Manchestr", "Manchester");
        // one deletion over ten characters
        assert!((s - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_edit_similarity_both_empty_is_one() {
        assert_eq!(edit_similarity("", ""), 1.0);
    }

    #[test]
    fn test_edit_similarity_one_empty_is_zero() {
        assert_eq!(edit_similarity("", "abc"), 0.0);
        assert_eq!(edit_similarity("abc", ""), 0.0);
    }

    #[test]
    fn test_unrelated_names_score_low() {
        let s = score("Cornwall", "Leeds");
        assert!(s < 0.3, "got {s}");
    }

    #[test]
    fn test_score_stays_in_unit_interval() {
        let pairs = [
            ("", "anything"),
            ("a b c d e", "f"),
            ("zzzz", "aaaa"),
            ("Bath and North East Somerset", "North Somerset"),
        ];
        for (q, c) in pairs {
            let s = score(q, c);
            assert!((0.0..=1.0).contains(&s), "score({q:?}, {c:?}) = {s}");
        }
    }
}
