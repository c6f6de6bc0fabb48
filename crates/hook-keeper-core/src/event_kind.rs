//! Event key taxonomy.
//!
//! Bitbucket identifies every webhook delivery with an `X-Event-Key` header
//! of the form `<resource>:<action>`. [`EventKind`] is the closed set of keys
//! this crate has a payload schema for. Keys are compared verbatim: no case
//! folding, no trimming, no prefix matching.

use std::fmt;
use std::str::FromStr;

/// Known webhook event keys.
///
/// Each variant selects exactly one payload schema in
/// [`BitbucketEvent`](crate::events::BitbucketEvent).
///
/// # Examples
///
/// ```rust
/// use hook_keeper_core::EventKind;
///
/// let kind = EventKind::from_key("repo:push").unwrap();
/// assert_eq!(kind, EventKind::RepoPush);
/// assert_eq!(kind.as_str(), "repo:push");
///
/// assert!(EventKind::from_key("REPO:PUSH").is_none()); // exact match only
/// assert!(EventKind::from_key("bogus:key").is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    RepoPush,
    RepoFork,
    RepoUpdated,
    RepoCommitCommentCreated,
    RepoCommitStatusCreated,
    RepoCommitStatusUpdated,
    IssueCreated,
    IssueUpdated,
    IssueCommentCreated,
    PullRequestCreated,
    PullRequestUpdated,
    PullRequestApproved,
    PullRequestUnapproved,
    PullRequestFulfilled,
    PullRequestRejected,
    PullRequestCommentCreated,
    PullRequestCommentUpdated,
    PullRequestCommentDeleted,
}

impl EventKind {
    /// Every known event kind, in taxonomy order.
    pub const ALL: [EventKind; 18] = [
        Self::RepoPush,
        Self::RepoFork,
        Self::RepoUpdated,
        Self::RepoCommitCommentCreated,
        Self::RepoCommitStatusCreated,
        Self::RepoCommitStatusUpdated,
        Self::IssueCreated,
        Self::IssueUpdated,
        Self::IssueCommentCreated,
        Self::PullRequestCreated,
        Self::PullRequestUpdated,
        Self::PullRequestApproved,
        Self::PullRequestUnapproved,
        Self::PullRequestFulfilled,
        Self::PullRequestRejected,
        Self::PullRequestCommentCreated,
        Self::PullRequestCommentUpdated,
        Self::PullRequestCommentDeleted,
    ];

    /// The `X-Event-Key` value for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RepoPush => "repo:push",
            Self::RepoFork => "repo:fork",
            Self::RepoUpdated => "repo:updated",
            Self::RepoCommitCommentCreated => "repo:commit_comment_created",
            Self::RepoCommitStatusCreated => "repo:commit_status_created",
            Self::RepoCommitStatusUpdated => "repo:commit_status_updated",
            Self::IssueCreated => "issue:created",
            Self::IssueUpdated => "issue:updated",
            Self::IssueCommentCreated => "issue:comment_created",
            Self::PullRequestCreated => "pullrequest:created",
            Self::PullRequestUpdated => "pullrequest:updated",
            Self::PullRequestApproved => "pullrequest:approved",
            Self::PullRequestUnapproved => "pullrequest:unapproved",
            Self::PullRequestFulfilled => "pullrequest:fulfilled",
            Self::PullRequestRejected => "pullrequest:rejected",
            Self::PullRequestCommentCreated => "pullrequest:comment_created",
            Self::PullRequestCommentUpdated => "pullrequest:comment_updated",
            Self::PullRequestCommentDeleted => "pullrequest:comment_deleted",
        }
    }

    /// Resolve an event key to its kind.
    ///
    /// Returns `None` for any key outside the taxonomy.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == key)
    }

    /// Resource part of the key (`repo`, `issue`, `pullrequest`).
    pub fn resource(&self) -> &'static str {
        let key = self.as_str();
        key.split_once(':').map(|(resource, _)| resource).unwrap_or(key)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownEventKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| UnknownEventKey {
            key: s.to_string(),
        })
    }
}

/// Error returned when a string is not a known event key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown event key '{key}'")]
pub struct UnknownEventKey {
    pub key: String,
}

#[cfg(test)]
#[path = "event_kind_tests.rs"]
mod tests;
