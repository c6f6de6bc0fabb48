//! Building blocks shared by several payload schemas.

use super::nullable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Accounts
// ============================================================================

/// A Bitbucket account: actor, author, reviewer, reporter, and so on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// Object type reported by Bitbucket (`user`, `team`, ...)
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub object_type: String,

    #[serde(deserialize_with = "nullable")]
    pub username: String,

    #[serde(deserialize_with = "nullable")]
    pub display_name: String,

    #[serde(deserialize_with = "nullable")]
    pub nickname: String,

    #[serde(deserialize_with = "nullable")]
    pub account_id: String,

    /// Account UUID in Bitbucket's braced form (`{...}`)
    #[serde(deserialize_with = "nullable")]
    pub uuid: String,

    #[serde(deserialize_with = "nullable")]
    pub links: Links,
}

impl User {
    /// Best available human-readable name.
    ///
    /// Bitbucket stopped sending `username` for most accounts; fall back to
    /// `nickname` and then `display_name`.
    pub fn name(&self) -> &str {
        [&self.username, &self.nickname, &self.display_name]
            .into_iter()
            .find(|s| !s.is_empty())
            .map(String::as_str)
            .unwrap_or("")
    }
}

// ============================================================================
// Repositories
// ============================================================================

/// Repository reference as embedded in webhook payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub object_type: String,

    #[serde(deserialize_with = "nullable")]
    pub name: String,

    /// `{owner}/{slug}`
    #[serde(deserialize_with = "nullable")]
    pub full_name: String,

    #[serde(deserialize_with = "nullable")]
    pub uuid: String,

    /// Always `git` for current repositories
    #[serde(deserialize_with = "nullable")]
    pub scm: String,

    #[serde(deserialize_with = "nullable")]
    pub website: String,

    #[serde(deserialize_with = "nullable")]
    pub is_private: bool,

    #[serde(deserialize_with = "nullable")]
    pub owner: User,

    pub project: Option<Project>,

    #[serde(deserialize_with = "nullable")]
    pub links: Links,
}

/// Project a repository belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub object_type: String,

    #[serde(deserialize_with = "nullable")]
    pub key: String,

    #[serde(deserialize_with = "nullable")]
    pub name: String,

    #[serde(deserialize_with = "nullable")]
    pub uuid: String,

    #[serde(deserialize_with = "nullable")]
    pub links: Links,
}

// ============================================================================
// Links
// ============================================================================

/// Hypermedia links attached to most Bitbucket objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: Option<Link>,
    pub html: Option<Link>,
    pub avatar: Option<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Link {
    #[serde(deserialize_with = "nullable")]
    pub href: String,
}

// ============================================================================
// Content
// ============================================================================

/// Rendered text in its three forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    /// Text as typed by the user
    #[serde(deserialize_with = "nullable")]
    pub raw: String,

    /// Markup language of `raw` (`markdown`, `creole`, `plaintext`)
    #[serde(deserialize_with = "nullable")]
    pub markup: String,

    /// Rendered HTML
    #[serde(deserialize_with = "nullable")]
    pub html: String,
}

// ============================================================================
// Commits
// ============================================================================

/// Git author of a commit, with the linked account when Bitbucket could map one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    /// `Name <email>` as recorded in the commit
    #[serde(deserialize_with = "nullable")]
    pub raw: String,

    #[serde(deserialize_with = "nullable")]
    pub user: User,
}

/// A commit with its message and author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commit {
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub object_type: String,

    #[serde(deserialize_with = "nullable")]
    pub hash: String,

    #[serde(deserialize_with = "nullable")]
    pub message: String,

    pub date: Option<DateTime<Utc>>,

    #[serde(deserialize_with = "nullable")]
    pub author: Author,

    #[serde(deserialize_with = "nullable")]
    pub parents: Vec<CommitRef>,

    #[serde(deserialize_with = "nullable")]
    pub links: Links,
}

/// A bare commit reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitRef {
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub object_type: String,

    #[serde(deserialize_with = "nullable")]
    pub hash: String,

    #[serde(deserialize_with = "nullable")]
    pub links: Links,
}

// ============================================================================
// Comments
// ============================================================================

/// A comment on a commit, issue, or pull request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    #[serde(deserialize_with = "nullable")]
    pub id: u64,

    #[serde(deserialize_with = "nullable")]
    pub content: Content,

    #[serde(deserialize_with = "nullable")]
    pub user: User,

    pub created_on: Option<DateTime<Utc>>,

    pub updated_on: Option<DateTime<Utc>>,

    #[serde(deserialize_with = "nullable")]
    pub deleted: bool,

    /// Comment this one replies to
    pub parent: Option<CommentRef>,

    /// Present for comments anchored to a line of a diff
    pub inline: Option<Inline>,

    #[serde(deserialize_with = "nullable")]
    pub links: Links,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentRef {
    #[serde(deserialize_with = "nullable")]
    pub id: u64,
}

/// Position of an inline comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inline {
    #[serde(deserialize_with = "nullable")]
    pub path: String,

    /// Line in the old version of the file
    pub from: Option<u32>,

    /// Line in the new version of the file
    pub to: Option<u32>,
}

// ============================================================================
// Changes
// ============================================================================

/// Old and new value of a changed attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldChange {
    #[serde(deserialize_with = "nullable")]
    pub old: String,

    #[serde(deserialize_with = "nullable")]
    pub new: String,
}

/// Reference to a named object such as a milestone, version, or component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamedRef {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
}
