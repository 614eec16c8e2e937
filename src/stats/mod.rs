pub mod filter;
pub mod types;

pub use filter::AllowList;
pub use types::{ReviewerActivity, ReviewerStats};

use indexmap::IndexMap;
use tracing::debug;

use crate::pr::{Comment, PullRequestRecord};

/// Finalized statistics keyed by identity, in order of first reference.
pub type ReviewerTable = IndexMap<String, ReviewerStats>;

/// Folds PR records into per-identity [`ReviewerActivity`].
///
/// One aggregator is created per run. Identities are raw logins: no case
/// folding or trimming is applied, and entries are created on first reference
/// as author, commenter or reviewer.
#[derive(Debug, Default)]
pub struct Aggregator {
    reviewers: IndexMap<String, ReviewerActivity>,
    records: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute one PR's activity.
    ///
    /// The PR author never gets review or comment credit on their own PR. A
    /// PR without an author compares unequal to everyone, so all of its
    /// activity is credited. Each PR must be ingested at most once.
    pub fn ingest(&mut self, record: &PullRequestRecord) {
        self.records += 1;
        let number = record.number;
        let pr_author = record.author.as_deref();

        if let Some(author) = pr_author {
            self.entry(author).prs_authored.insert(number);
        }

        for comment in &record.comments {
            if Some(comment.author.as_str()) != pr_author {
                self.log_comment(comment, number);
            }
        }

        for review in &record.reviews {
            match review.author.as_deref() {
                Some(reviewer) if Some(reviewer) != pr_author => {
                    self.entry(reviewer).prs_reviewed.insert(number);
                }
                Some(_) => {}
                None => debug!(
                    pr = number,
                    title = record.title.as_deref().unwrap_or_default(),
                    "review without author, no review credit"
                ),
            }

            // Checked against the PR author, not the review author.
            for comment in &review.comments {
                if Some(comment.author.as_str()) != pr_author {
                    self.log_comment(comment, number);
                }
            }
        }
    }

    /// Number of records ingested so far.
    pub fn records(&self) -> usize {
        self.records
    }

    pub fn activity(&self) -> &IndexMap<String, ReviewerActivity> {
        &self.reviewers
    }

    pub fn into_activity(self) -> IndexMap<String, ReviewerActivity> {
        self.reviewers
    }

    fn entry(&mut self, identity: &str) -> &mut ReviewerActivity {
        self.reviewers.entry(identity.to_string()).or_default()
    }

    fn log_comment(&mut self, comment: &Comment, number: u64) {
        let activity = self.entry(&comment.author);
        activity.comment_count += 1;
        activity.comment_word_count += comment.word_count() as u64;
        activity.prs_reviewed.insert(number);
        activity.prs_reviewed_with_comment.insert(number);
    }
}

/// Fold a whole batch of records into a fresh aggregator.
pub fn aggregate<'a, I>(records: I) -> Aggregator
where
    I: IntoIterator<Item = &'a PullRequestRecord>,
{
    records
        .into_iter()
        .fold(Aggregator::new(), |mut aggregator, record| {
            aggregator.ingest(record);
            aggregator
        })
}

/// Compute the reportable statistics for every identity, keeping order.
pub fn finalize(activity: &IndexMap<String, ReviewerActivity>) -> ReviewerTable {
    activity
        .iter()
        .map(|(identity, activity)| {
            let stats = activity.finalize();
            debug!(
                reviewer = %identity,
                comments = stats.comment_count,
                words = stats.comment_word_count,
                "finalized reviewer"
            );
            (identity.clone(), stats)
        })
        .collect()
}
