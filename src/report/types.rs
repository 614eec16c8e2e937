use crate::stats::{ReviewerStats, ReviewerTable};

/// Column titles of the statistics report, in output order.
pub const COLUMNS: [&str; 7] = [
    "Reviewer",
    "PRs Authored",
    "PRs Reviewed",
    "PRs Reviewed With Comment",
    "% of Reviews With Comment",
    "Comments per PR",
    "Words per Comment",
];

/// Complete statistics report for one run.
#[derive(Debug)]
pub struct Report {
    /// PR records read from the input, before any filtering
    pub records_analyzed: usize,
    /// Per-reviewer statistics, in order of first reference
    pub reviewers: ReviewerTable,
}

impl Report {
    /// Render every reviewer as a row of display cells matching [`COLUMNS`].
    ///
    /// Undefined metrics render as empty cells.
    pub fn rows(&self) -> Vec<[String; 7]> {
        self.reviewers
            .iter()
            .map(|(reviewer, stats)| row(reviewer, stats))
            .collect()
    }
}

fn row(reviewer: &str, stats: &ReviewerStats) -> [String; 7] {
    [
        reviewer.to_string(),
        stats.prs_authored.to_string(),
        stats.prs_reviewed.to_string(),
        stats.prs_reviewed_with_comment.to_string(),
        stats
            .reviews_with_comment_percent
            .map(|p| format!("{p}%"))
            .unwrap_or_default(),
        one_decimal(stats.average_comments_per_review),
        one_decimal(stats.average_words_per_comment),
    ]
}

fn one_decimal(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.1}")).unwrap_or_default()
}
