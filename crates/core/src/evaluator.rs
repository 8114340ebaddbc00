use similar::TextDiff;

use crate::model::{AnswerOutcome, normalize_term};

/// Similarity an answer must strictly exceed to be graded `Close`.
pub const CLOSE_MATCH_THRESHOLD: f32 = 0.7;

/// Character-level similarity of two strings in `[0, 1]`.
///
/// Computed as `2 * M / T`, where `M` is the number of characters kept by an optimal
/// diff alignment and `T` the combined length of both strings. Two empty strings
/// compare as `1.0`.
#[must_use]
pub fn similarity_ratio(left: &str, right: &str) -> f32 {
    TextDiff::from_chars(left, right).ratio()
}

/// Grades free-text answers against the expected translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnswerEvaluator {
    threshold: f32,
}

impl Default for AnswerEvaluator {
    fn default() -> Self {
        Self {
            threshold: CLOSE_MATCH_THRESHOLD,
        }
    }
}

impl AnswerEvaluator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// `expected` must already be normalized; `answer` is taken as typed.
    #[must_use]
    pub fn evaluate(&self, answer: &str, expected: &str) -> AnswerOutcome {
        let answer = normalize_term(answer);
        if answer == expected {
            return AnswerOutcome::Correct;
        }
        if similarity_ratio(&answer, expected) > self.threshold {
            AnswerOutcome::Close
        } else {
            AnswerOutcome::Wrong
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(answer: &str, expected: &str) -> AnswerOutcome {
        AnswerEvaluator::new().evaluate(answer, expected)
    }

    #[test]
    fn exact_answer_is_correct() {
        assert_eq!(evaluate("cat", "cat"), AnswerOutcome::Correct);
    }

    #[test]
    fn case_and_whitespace_are_ignored() {
        assert_eq!(evaluate("Cat ", "cat"), AnswerOutcome::Correct);
        assert_eq!(evaluate("\tHOUSE\n", "house"), AnswerOutcome::Correct);
    }

    #[test]
    fn single_substitution_in_short_word_is_wrong() {
        // two of three characters align on each side: 4 / 6
        let ratio = similarity_ratio("cet", "cat");
        assert!((ratio - 4.0 / 6.0).abs() < 1e-6);
        assert_eq!(evaluate("cet", "cat"), AnswerOutcome::Wrong);
    }

    #[test]
    fn missing_letter_in_longer_word_is_close() {
        assert_eq!(evaluate("kisa", "kissa"), AnswerOutcome::Close);
        assert_eq!(evaluate("hause", "house"), AnswerOutcome::Close);
    }

    #[test]
    fn disjoint_answer_is_wrong() {
        assert_eq!(similarity_ratio("xyz", "cat"), 0.0);
        assert_eq!(evaluate("xyz", "cat"), AnswerOutcome::Wrong);
    }

    #[test]
    fn ratio_of_exactly_threshold_is_wrong() {
        // 7 shared characters over 20 total: 14 / 20
        let ratio = similarity_ratio("abcdefgxyz", "abcdefghij");
        assert_eq!(ratio, 0.7);
        assert_eq!(evaluate("abcdefgxyz", "abcdefghij"), AnswerOutcome::Wrong);
    }

    #[test]
    fn ratio_just_above_threshold_is_close() {
        // 11 shared characters over 31 total: 22 / 31, about 0.71
        let ratio = similarity_ratio("abcdefghijkzzzzzz", "abcdefghijklmn");
        assert!(ratio > 0.7 && ratio < 0.72);
        assert_eq!(
            evaluate("abcdefghijkzzzzzz", "abcdefghijklmn"),
            AnswerOutcome::Close
        );
    }

    #[test]
    fn custom_threshold_changes_grading() {
        let strict = AnswerEvaluator::new().with_threshold(0.95);
        assert_eq!(strict.evaluate("kisa", "kissa"), AnswerOutcome::Wrong);
        assert_eq!(strict.threshold(), 0.95);
    }
}
