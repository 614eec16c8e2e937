use serde::Deserialize;

/// One pull request with the activity recorded against it.
///
/// Built from a GraphQL search edge by [`super::load_dir`]; immutable after that.
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequestRecord {
    /// PR number (e.g., 42)
    pub number: u64,
    /// PR title, when the export carried one
    pub title: Option<String>,
    /// Author's GitHub login. `None` for deleted ("ghost") accounts.
    pub author: Option<String>,
    /// Top-level conversation comments
    pub comments: Vec<Comment>,
    /// Submitted reviews, each with its inline comments
    pub reviews: Vec<Review>,
}

impl PullRequestRecord {
    /// Every identity that touched this PR: author, commenters, reviewers and
    /// review commenters. May contain duplicates.
    pub fn participants(&self) -> impl Iterator<Item = &str> {
        let review_activity = self.reviews.iter().flat_map(|review| {
            review
                .author
                .as_deref()
                .into_iter()
                .chain(review.comments.iter().map(|c| c.author.as_str()))
        });

        self.author
            .as_deref()
            .into_iter()
            .chain(self.comments.iter().map(|c| c.author.as_str()))
            .chain(review_activity)
    }
}

/// A comment, either on the PR conversation or inside a review.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub author: String,
    pub body: String,
}

impl Comment {
    /// Approximate word count: the body split on single spaces.
    ///
    /// Punctuation and repeated spaces are not normalized, so `"a  b"` counts
    /// three words and an empty body counts one.
    pub fn word_count(&self) -> usize {
        self.body.split(' ').count()
    }
}

/// A submitted review.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    /// Reviewer login. `None` when GitHub reports no author.
    pub author: Option<String>,
    pub comments: Vec<Comment>,
    /// Parsed but not used by aggregation yet.
    #[allow(dead_code)]
    pub state: Option<ReviewState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    Approved,
    ChangesRequested,
    Commented,
    Dismissed,
    Pending,
    #[serde(other)]
    Other,
}

// GraphQL wire shapes. Only the fields read by the tool are declared; unknown
// fields are ignored here and survive untouched in the raw dump.

/// Top-level shape of one exported document: `data.search.edges[]`.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchDocument {
    pub data: SearchData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchData {
    pub search: SearchResult,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResult {
    /// Kept as raw JSON so the dump stays verbatim; validated one by one.
    pub edges: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edge {
    pub node: PullRequestNode,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PullRequestNode {
    pub number: u64,
    #[serde(default)]
    pub title: Option<String>,
    pub author: Option<Actor>,
    pub comments: Connection<CommentNode>,
    pub reviews: Connection<ReviewNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Connection<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Actor {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentNode {
    pub author: Actor,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewNode {
    pub author: Option<Actor>,
    pub comments: Connection<CommentNode>,
    #[serde(default)]
    pub state: Option<ReviewState>,
}

impl From<PullRequestNode> for PullRequestRecord {
    fn from(node: PullRequestNode) -> Self {
        PullRequestRecord {
            number: node.number,
            title: node.title,
            author: node.author.map(|a| a.login),
            comments: node.comments.nodes.into_iter().map(Comment::from).collect(),
            reviews: node.reviews.nodes.into_iter().map(Review::from).collect(),
        }
    }
}

impl From<CommentNode> for Comment {
    fn from(node: CommentNode) -> Self {
        Comment {
            author: node.author.login,
            body: node.body,
        }
    }
}

impl From<ReviewNode> for Review {
    fn from(node: ReviewNode) -> Self {
        Review {
            author: node.author.map(|a| a.login),
            comments: node.comments.nodes.into_iter().map(Comment::from).collect(),
            state: node.state,
        }
    }
}
