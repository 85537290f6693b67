//! Approximate string matching used wherever the engine needs a "close
//! enough" comparison between a JD keyword/title and resume text, rather
//! than an exact substring match.

use std::collections::HashSet;

use crate::tokenizer::tokenize;

/// Jaccard-like token-set similarity, expressed on a 0–100 scale the way
/// general-purpose approximate-matching libraries report ratios.
///
/// Both inputs are tokenized with the shared [`tokenize`]; the result is the
/// size of the token-set intersection over the union. Two empty token sets
/// are considered a perfect (100.0) match only when both inputs are empty;
/// one empty and one non-empty input scores 0.0.
pub fn fuzzy_token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: HashSet<String> = tokenize(a).into_iter().collect();
    let tokens_b: HashSet<String> = tokenize(b).into_iter().collect();

    if tokens_a.is_empty() && tokens_b.is_empty() {
        return 100.0;
    }
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection = tokens_a.intersection(&tokens_b).count();
    let union = tokens_a.union(&tokens_b).count();
    if union == 0 {
        return 0.0;
    }
    (intersection as f64 / union as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_100() {
        assert_eq!(fuzzy_token_set_ratio("Site Reliability Engineer", "Site Reliability Engineer"), 100.0);
    }

    #[test]
    fn test_reordered_tokens_still_score_100() {
        assert_eq!(fuzzy_token_set_ratio("Engineer Site Reliability", "Site Reliability Engineer"), 100.0);
    }

    #[test]
    fn test_partial_overlap_scores_between_zero_and_hundred() {
        let ratio = fuzzy_token_set_ratio("Senior Site Reliability Engineer", "Site Reliability Manager");
        assert!(ratio > 0.0 && ratio < 100.0, "ratio was {ratio}");
    }

    #[test]
    fn test_disjoint_strings_score_zero() {
        assert_eq!(fuzzy_token_set_ratio("Rust Engineer", "Payroll Clerk"), 0.0);
    }

    #[test]
    fn test_empty_vs_nonempty_scores_zero() {
        assert_eq!(fuzzy_token_set_ratio("", "Engineer"), 0.0);
    }

    #[test]
    fn test_both_empty_scores_hundred() {
        assert_eq!(fuzzy_token_set_ratio("", ""), 100.0);
    }
}
