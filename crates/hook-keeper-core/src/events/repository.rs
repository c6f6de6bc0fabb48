//! `repo:*` payloads.

use super::{nullable, Comment, Commit, CommitRef, EventEnvelope, FieldChange, Links, Repository};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Push
// ============================================================================

/// `repo:push`: one or more references were updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushEvent {
    #[serde(flatten)]
    pub envelope: EventEnvelope,

    pub push: Push,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Push {
    #[serde(deserialize_with = "nullable")]
    pub changes: Vec<Change>,
}

/// Update of a single branch or tag.
///
/// `new` is `None` when the reference was deleted, `old` is `None` when it
/// was created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Change {
    pub new: Option<Reference>,

    pub old: Option<Reference>,

    #[serde(deserialize_with = "nullable")]
    pub created: bool,

    #[serde(deserialize_with = "nullable")]
    pub closed: bool,

    #[serde(deserialize_with = "nullable")]
    pub forced: bool,

    /// More commits were pushed than are listed in `commits`
    #[serde(deserialize_with = "nullable")]
    pub truncated: bool,

    #[serde(deserialize_with = "nullable")]
    pub commits: Vec<Commit>,

    #[serde(deserialize_with = "nullable")]
    pub links: Links,
}

/// State of a branch or tag before or after a push.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    /// `branch` or `tag`
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub object_type: String,

    #[serde(deserialize_with = "nullable")]
    pub name: String,

    /// Commit the reference points at
    #[serde(deserialize_with = "nullable")]
    pub target: Commit,

    #[serde(deserialize_with = "nullable")]
    pub repository: Repository,

    #[serde(deserialize_with = "nullable")]
    pub links: Links,
}

// ============================================================================
// Fork
// ============================================================================

/// `repo:fork`: `repository` was forked into `fork`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForkEvent {
    #[serde(flatten)]
    pub envelope: EventEnvelope,

    pub fork: Repository,
}

// ============================================================================
// Repository updated
// ============================================================================

/// `repo:updated`: repository settings changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoUpdatedEvent {
    #[serde(flatten)]
    pub envelope: EventEnvelope,

    pub changes: RepositoryChanges,
}

/// Attributes changed by a `repo:updated` event. Unchanged ones are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryChanges {
    pub name: Option<FieldChange>,
    pub full_name: Option<FieldChange>,
    pub website: Option<FieldChange>,
    pub language: Option<FieldChange>,
    pub description: Option<FieldChange>,
}

// ============================================================================
// Commit comments
// ============================================================================

/// `repo:commit_comment_created`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitCommentCreatedEvent {
    #[serde(flatten)]
    pub envelope: EventEnvelope,

    pub comment: Comment,

    pub commit: CommitRef,
}

// ============================================================================
// Commit statuses
// ============================================================================

/// `repo:commit_status_created` and `repo:commit_status_updated`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitStatusEvent {
    #[serde(flatten)]
    pub envelope: EventEnvelope,

    pub commit_status: CommitStatus,
}

/// Build status reported against a commit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitStatus {
    #[serde(deserialize_with = "nullable")]
    pub name: String,

    #[serde(deserialize_with = "nullable")]
    pub description: String,

    /// `INPROGRESS`, `SUCCESSFUL`, `FAILED`, or `STOPPED`
    #[serde(deserialize_with = "nullable")]
    pub state: String,

    /// Identifier of the reporting system, unique per commit
    #[serde(deserialize_with = "nullable")]
    pub key: String,

    #[serde(deserialize_with = "nullable")]
    pub url: String,

    #[serde(rename = "type", deserialize_with = "nullable")]
    pub object_type: String,

    #[serde(deserialize_with = "nullable")]
    pub refname: String,

    pub created_on: Option<DateTime<Utc>>,

    pub updated_on: Option<DateTime<Utc>>,

    #[serde(deserialize_with = "nullable")]
    pub commit: CommitRef,

    #[serde(deserialize_with = "nullable")]
    pub links: Links,
}
