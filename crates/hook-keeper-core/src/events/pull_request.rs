//! `pullrequest:*` payloads.

use super::{nullable, Comment, CommitRef, EventEnvelope, Links, Repository, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pull request as embedded in webhook payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequest {
    #[serde(deserialize_with = "nullable")]
    pub id: u64,

    #[serde(rename = "type", deserialize_with = "nullable")]
    pub object_type: String,

    #[serde(deserialize_with = "nullable")]
    pub title: String,

    #[serde(deserialize_with = "nullable")]
    pub description: String,

    /// `OPEN`, `MERGED`, `DECLINED`, or `SUPERSEDED`
    #[serde(deserialize_with = "nullable")]
    pub state: String,

    /// Reason given when the pull request was declined
    #[serde(deserialize_with = "nullable")]
    pub reason: String,

    #[serde(deserialize_with = "nullable")]
    pub author: User,

    #[serde(deserialize_with = "nullable")]
    pub source: Endpoint,

    #[serde(deserialize_with = "nullable")]
    pub destination: Endpoint,

    /// Set once the pull request is merged
    pub merge_commit: Option<CommitRef>,

    /// Everyone who commented, reviewed, or approved, in Bitbucket's order
    #[serde(deserialize_with = "nullable")]
    pub participants: Vec<Participant>,

    /// Requested reviewers; not deduplicated against `participants`
    #[serde(deserialize_with = "nullable")]
    pub reviewers: Vec<User>,

    #[serde(deserialize_with = "nullable")]
    pub close_source_branch: bool,

    pub closed_by: Option<User>,

    #[serde(deserialize_with = "nullable")]
    pub comment_count: u32,

    #[serde(deserialize_with = "nullable")]
    pub task_count: u32,

    pub created_on: Option<DateTime<Utc>>,

    pub updated_on: Option<DateTime<Utc>>,

    #[serde(deserialize_with = "nullable")]
    pub links: Links,
}

impl PullRequest {
    /// Hash of the merge commit, empty while the pull request is unmerged.
    pub fn merge_commit_hash(&self) -> &str {
        self.merge_commit
            .as_ref()
            .map(|c| c.hash.as_str())
            .unwrap_or("")
    }
}

/// Source or destination of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoint {
    #[serde(deserialize_with = "nullable")]
    pub branch: Branch,

    pub commit: Option<CommitRef>,

    #[serde(deserialize_with = "nullable")]
    pub repository: Repository,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Branch {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
}

/// Account involved in a pull request and its role there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Participant {
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub object_type: String,

    #[serde(deserialize_with = "nullable")]
    pub user: User,

    /// `PARTICIPANT` or `REVIEWER`
    #[serde(deserialize_with = "nullable")]
    pub role: String,

    #[serde(deserialize_with = "nullable")]
    pub approved: bool,

    /// `approved`, `changes_requested`, or empty
    #[serde(deserialize_with = "nullable")]
    pub state: String,

    pub participated_on: Option<DateTime<Utc>>,
}

/// Approval given or withdrawn on a pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Approval {
    pub date: Option<DateTime<Utc>>,

    #[serde(deserialize_with = "nullable")]
    pub user: User,
}

/// `pullrequest:created`, `pullrequest:updated`, `pullrequest:fulfilled`
/// (merged) and `pullrequest:rejected` (declined)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestEvent {
    #[serde(flatten)]
    pub envelope: EventEnvelope,

    #[serde(rename = "pullrequest")]
    pub pull_request: PullRequest,
}

/// `pullrequest:approved` and `pullrequest:unapproved`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestApprovalEvent {
    #[serde(flatten)]
    pub envelope: EventEnvelope,

    #[serde(rename = "pullrequest")]
    pub pull_request: PullRequest,

    pub approval: Approval,
}

/// `pullrequest:comment_created`, `pullrequest:comment_updated` and
/// `pullrequest:comment_deleted`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequestCommentEvent {
    #[serde(flatten)]
    pub envelope: EventEnvelope,

    #[serde(rename = "pullrequest")]
    pub pull_request: PullRequest,

    pub comment: Comment,
}
