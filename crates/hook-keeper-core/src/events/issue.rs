//! `issue:*` payloads.

use super::{nullable, Comment, Content, EventEnvelope, FieldChange, Links, NamedRef, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An issue from the repository's issue tracker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Issue {
    #[serde(deserialize_with = "nullable")]
    pub id: u64,

    #[serde(rename = "type", deserialize_with = "nullable")]
    pub object_type: String,

    #[serde(deserialize_with = "nullable")]
    pub title: String,

    /// `bug`, `enhancement`, `proposal`, or `task`
    #[serde(deserialize_with = "nullable")]
    pub kind: String,

    /// `trivial`, `minor`, `major`, `critical`, or `blocker`
    #[serde(deserialize_with = "nullable")]
    pub priority: String,

    /// `new`, `open`, `resolved`, `on hold`, `invalid`, `duplicate`, `wontfix`, `closed`
    #[serde(deserialize_with = "nullable")]
    pub state: String,

    #[serde(deserialize_with = "nullable")]
    pub content: Content,

    #[serde(deserialize_with = "nullable")]
    pub reporter: User,

    pub assignee: Option<User>,

    pub component: Option<NamedRef>,

    pub milestone: Option<NamedRef>,

    pub version: Option<NamedRef>,

    #[serde(deserialize_with = "nullable")]
    pub votes: u32,

    #[serde(deserialize_with = "nullable")]
    pub watches: u32,

    pub created_on: Option<DateTime<Utc>>,

    pub updated_on: Option<DateTime<Utc>>,

    pub edited_on: Option<DateTime<Utc>>,

    #[serde(deserialize_with = "nullable")]
    pub links: Links,
}

/// `issue:created`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueCreatedEvent {
    #[serde(flatten)]
    pub envelope: EventEnvelope,

    pub issue: Issue,
}

/// `issue:updated`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueUpdatedEvent {
    #[serde(flatten)]
    pub envelope: EventEnvelope,

    pub issue: Issue,

    pub changes: IssueChanges,

    /// Comment entered together with the update, if any
    #[serde(default)]
    pub comment: Option<Comment>,
}

/// Attributes changed by an `issue:updated` event. Unchanged ones are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueChanges {
    pub status: Option<FieldChange>,
    pub title: Option<FieldChange>,
    pub kind: Option<FieldChange>,
    pub priority: Option<FieldChange>,
    pub content: Option<FieldChange>,
    pub component: Option<FieldChange>,
    pub milestone: Option<FieldChange>,
    pub version: Option<FieldChange>,
}

impl IssueChanges {
    /// Whether no tracked attribute changed.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// `issue:comment_created`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueCommentCreatedEvent {
    #[serde(flatten)]
    pub envelope: EventEnvelope,

    pub issue: Issue,

    pub comment: Comment,
}
