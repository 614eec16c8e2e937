use std::collections::BTreeSet;

/// Running statistics for one identity while records are being ingested.
///
/// The PR sets, not the counters, decide how many PRs an identity authored or
/// reviewed: several comments on one PR add the number once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewerActivity {
    /// Comments left on other people's PRs (conversation and review comments)
    pub comment_count: u64,
    /// Sum of [`crate::pr::Comment::word_count`] over those comments
    pub comment_word_count: u64,
    pub prs_authored: BTreeSet<u64>,
    /// PRs reviewed or commented on, excluding the identity's own PRs
    pub prs_reviewed: BTreeSet<u64>,
    /// Subset of `prs_reviewed` where at least one comment was left
    pub prs_reviewed_with_comment: BTreeSet<u64>,
}

impl ReviewerActivity {
    /// Flatten the PR sets into counts and compute the derived metrics.
    pub fn finalize(&self) -> ReviewerStats {
        let prs_reviewed = self.prs_reviewed.len();
        let prs_reviewed_with_comment = self.prs_reviewed_with_comment.len();

        ReviewerStats {
            prs_authored: self.prs_authored.len(),
            prs_reviewed,
            prs_reviewed_with_comment,
            comment_count: self.comment_count,
            comment_word_count: self.comment_word_count,
            reviews_with_comment_percent: ratio(prs_reviewed_with_comment as u64, prs_reviewed as u64)
                .map(|r| (r * 100.0).round() as u32),
            average_comments_per_review: ratio(self.comment_count, prs_reviewed as u64).map(round1),
            average_words_per_comment: ratio(self.comment_word_count, self.comment_count).map(round1),
        }
    }
}

/// Final, reportable statistics for one identity.
///
/// Derived metrics are `None` when their denominator is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewerStats {
    pub prs_authored: usize,
    pub prs_reviewed: usize,
    pub prs_reviewed_with_comment: usize,
    pub comment_count: u64,
    pub comment_word_count: u64,
    /// Share of reviewed PRs that got a comment, rounded to a whole percent
    pub reviews_with_comment_percent: Option<u32>,
    /// Comments per reviewed PR, one decimal
    pub average_comments_per_review: Option<f64>,
    /// Words per comment, one decimal
    pub average_words_per_comment: Option<f64>,
}

fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    (denominator != 0).then(|| numerator as f64 / denominator as f64)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(comments: u64, words: u64, reviewed: &[u64], with_comment: &[u64]) -> ReviewerActivity {
        ReviewerActivity {
            comment_count: comments,
            comment_word_count: words,
            prs_authored: BTreeSet::new(),
            prs_reviewed: reviewed.iter().copied().collect(),
            prs_reviewed_with_comment: with_comment.iter().copied().collect(),
        }
    }

    #[test]
    fn test_finalize_rounds_to_one_decimal() {
        let stats = activity(3, 10, &[1, 2], &[1]).finalize();
        assert_eq!(stats.average_words_per_comment, Some(3.3));
        assert_eq!(stats.average_comments_per_review, Some(1.5));
        assert_eq!(stats.reviews_with_comment_percent, Some(50));
    }

    #[test]
    fn test_finalize_percent_rounds_to_nearest() {
        let stats = activity(1, 1, &[1, 2, 3], &[1, 2]).finalize();
        assert_eq!(stats.reviews_with_comment_percent, Some(67));
        let stats = activity(1, 1, &[1, 2, 3], &[1]).finalize();
        assert_eq!(stats.reviews_with_comment_percent, Some(33));
    }

    #[test]
    fn test_finalize_author_only_has_no_derived_metrics() {
        let mut author = ReviewerActivity::default();
        author.prs_authored.insert(7);
        let stats = author.finalize();
        assert_eq!(stats.prs_authored, 1);
        assert_eq!(stats.prs_reviewed, 0);
        assert_eq!(stats.average_words_per_comment, None);
        assert_eq!(stats.average_comments_per_review, None);
        assert_eq!(stats.reviews_with_comment_percent, None);
    }

    #[test]
    fn test_finalize_review_without_comments() {
        let stats = activity(0, 0, &[2], &[]).finalize();
        assert_eq!(stats.reviews_with_comment_percent, Some(0));
        assert_eq!(stats.average_comments_per_review, Some(0.0));
        assert_eq!(stats.average_words_per_comment, None);
    }
}
