//! # Webhook Event Schemas
//!
//! Typed structures for the Bitbucket webhook payloads, one schema per event
//! key, and the [`BitbucketEvent`] sum type the dispatcher hands to handlers.
//!
//! ## Decoding rules
//!
//! - The body must be well-formed JSON whose top level is an object.
//! - Every schema embeds an [`EventEnvelope`]; its `actor` and `repository`
//!   are required and their absence fails decoding.
//! - The kind-specific top-level object (`push`, `issue`, `pullrequest`, ...)
//!   is required.
//! - Everything below that is lenient: absent fields and JSON `null` decode
//!   to empty strings, zero, `false`, empty vectors, or `None`.

mod common;
mod issue;
mod pull_request;
mod repository;

pub use common::{
    Author, Comment, CommentRef, Commit, CommitRef, Content, FieldChange, Inline, Link, Links,
    NamedRef, Project, Repository, User,
};
pub use issue::{
    Issue, IssueChanges, IssueCommentCreatedEvent, IssueCreatedEvent, IssueUpdatedEvent,
};
pub use pull_request::{
    Approval, Branch, Endpoint, Participant, PullRequest, PullRequestApprovalEvent,
    PullRequestCommentEvent, PullRequestEvent,
};
pub use repository::{
    Change, CommitCommentCreatedEvent, CommitStatus, CommitStatusEvent, ForkEvent, Push,
    PushEvent, Reference, RepoUpdatedEvent, RepositoryChanges,
};

use crate::EventKind;
use serde::{Deserialize, Deserializer, Serialize};

/// Fields common to every webhook payload: who acted and on which repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Account that triggered the event
    pub actor: User,

    /// Repository the event happened in; at least one of `name`,
    /// `full_name` or `uuid` is non-empty
    #[serde(deserialize_with = "identified_repository")]
    pub repository: Repository,
}

/// A decoded webhook payload, tagged with the event key it arrived under.
///
/// The variant is chosen by the dispatcher from the `X-Event-Key` header
/// before decoding, so a handler never has to guess which schema it holds.
/// Handlers bound to several keys match on the variant.
#[derive(Debug, Clone, PartialEq)]
pub enum BitbucketEvent {
    RepoPush(PushEvent),
    RepoFork(ForkEvent),
    RepoUpdated(RepoUpdatedEvent),
    RepoCommitCommentCreated(CommitCommentCreatedEvent),
    RepoCommitStatusCreated(CommitStatusEvent),
    RepoCommitStatusUpdated(CommitStatusEvent),
    IssueCreated(IssueCreatedEvent),
    IssueUpdated(IssueUpdatedEvent),
    IssueCommentCreated(IssueCommentCreatedEvent),
    PullRequestCreated(PullRequestEvent),
    PullRequestUpdated(PullRequestEvent),
    PullRequestApproved(PullRequestApprovalEvent),
    PullRequestUnapproved(PullRequestApprovalEvent),
    /// The pull request was merged
    PullRequestFulfilled(PullRequestEvent),
    /// The pull request was declined
    PullRequestRejected(PullRequestEvent),
    PullRequestCommentCreated(PullRequestCommentEvent),
    PullRequestCommentUpdated(PullRequestCommentEvent),
    PullRequestCommentDeleted(PullRequestCommentEvent),
}

impl BitbucketEvent {
    /// Decode a payload using the schema registered for `kind`.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] when the payload is not
    /// valid JSON, is not an object of the expected shape, or lacks the
    /// envelope or the kind-specific top-level object.
    pub fn decode(kind: EventKind, payload: &[u8]) -> Result<Self, serde_json::Error> {
        let event = match kind {
            EventKind::RepoPush => Self::RepoPush(serde_json::from_slice(payload)?),
            EventKind::RepoFork => Self::RepoFork(serde_json::from_slice(payload)?),
            EventKind::RepoUpdated => Self::RepoUpdated(serde_json::from_slice(payload)?),
            EventKind::RepoCommitCommentCreated => {
                Self::RepoCommitCommentCreated(serde_json::from_slice(payload)?)
            }
            EventKind::RepoCommitStatusCreated => {
                Self::RepoCommitStatusCreated(serde_json::from_slice(payload)?)
            }
            EventKind::RepoCommitStatusUpdated => {
                Self::RepoCommitStatusUpdated(serde_json::from_slice(payload)?)
            }
            EventKind::IssueCreated => Self::IssueCreated(serde_json::from_slice(payload)?),
            EventKind::IssueUpdated => Self::IssueUpdated(serde_json::from_slice(payload)?),
            EventKind::IssueCommentCreated => {
                Self::IssueCommentCreated(serde_json::from_slice(payload)?)
            }
            EventKind::PullRequestCreated => {
                Self::PullRequestCreated(serde_json::from_slice(payload)?)
            }
            EventKind::PullRequestUpdated => {
                Self::PullRequestUpdated(serde_json::from_slice(payload)?)
            }
            EventKind::PullRequestApproved => {
                Self::PullRequestApproved(serde_json::from_slice(payload)?)
            }
            EventKind::PullRequestUnapproved => {
                Self::PullRequestUnapproved(serde_json::from_slice(payload)?)
            }
            EventKind::PullRequestFulfilled => {
                Self::PullRequestFulfilled(serde_json::from_slice(payload)?)
            }
            EventKind::PullRequestRejected => {
                Self::PullRequestRejected(serde_json::from_slice(payload)?)
            }
            EventKind::PullRequestCommentCreated => {
                Self::PullRequestCommentCreated(serde_json::from_slice(payload)?)
            }
            EventKind::PullRequestCommentUpdated => {
                Self::PullRequestCommentUpdated(serde_json::from_slice(payload)?)
            }
            EventKind::PullRequestCommentDeleted => {
                Self::PullRequestCommentDeleted(serde_json::from_slice(payload)?)
            }
        };
        Ok(event)
    }

    /// The event key this payload was decoded for.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::RepoPush(_) => EventKind::RepoPush,
            Self::RepoFork(_) => EventKind::RepoFork,
            Self::RepoUpdated(_) => EventKind::RepoUpdated,
            Self::RepoCommitCommentCreated(_) => EventKind::RepoCommitCommentCreated,
            Self::RepoCommitStatusCreated(_) => EventKind::RepoCommitStatusCreated,
            Self::RepoCommitStatusUpdated(_) => EventKind::RepoCommitStatusUpdated,
            Self::IssueCreated(_) => EventKind::IssueCreated,
            Self::IssueUpdated(_) => EventKind::IssueUpdated,
            Self::IssueCommentCreated(_) => EventKind::IssueCommentCreated,
            Self::PullRequestCreated(_) => EventKind::PullRequestCreated,
            Self::PullRequestUpdated(_) => EventKind::PullRequestUpdated,
            Self::PullRequestApproved(_) => EventKind::PullRequestApproved,
            Self::PullRequestUnapproved(_) => EventKind::PullRequestUnapproved,
            Self::PullRequestFulfilled(_) => EventKind::PullRequestFulfilled,
            Self::PullRequestRejected(_) => EventKind::PullRequestRejected,
            Self::PullRequestCommentCreated(_) => EventKind::PullRequestCommentCreated,
            Self::PullRequestCommentUpdated(_) => EventKind::PullRequestCommentUpdated,
            Self::PullRequestCommentDeleted(_) => EventKind::PullRequestCommentDeleted,
        }
    }

    /// The actor + repository envelope shared by every payload.
    pub fn envelope(&self) -> &EventEnvelope {
        match self {
            Self::RepoPush(e) => &e.envelope,
            Self::RepoFork(e) => &e.envelope,
            Self::RepoUpdated(e) => &e.envelope,
            Self::RepoCommitCommentCreated(e) => &e.envelope,
            Self::RepoCommitStatusCreated(e) | Self::RepoCommitStatusUpdated(e) => &e.envelope,
            Self::IssueCreated(e) => &e.envelope,
            Self::IssueUpdated(e) => &e.envelope,
            Self::IssueCommentCreated(e) => &e.envelope,
            Self::PullRequestCreated(e)
            | Self::PullRequestUpdated(e)
            | Self::PullRequestFulfilled(e)
            | Self::PullRequestRejected(e) => &e.envelope,
            Self::PullRequestApproved(e) | Self::PullRequestUnapproved(e) => &e.envelope,
            Self::PullRequestCommentCreated(e)
            | Self::PullRequestCommentUpdated(e)
            | Self::PullRequestCommentDeleted(e) => &e.envelope,
        }
    }

    /// Account that triggered the event.
    pub fn actor(&self) -> &User {
        &self.envelope().actor
    }

    /// Repository the event happened in.
    pub fn repository(&self) -> &Repository {
        &self.envelope().repository
    }

    /// The issue, for `issue:*` events.
    pub fn issue(&self) -> Option<&Issue> {
        match self {
            Self::IssueCreated(e) => Some(&e.issue),
            Self::IssueUpdated(e) => Some(&e.issue),
            Self::IssueCommentCreated(e) => Some(&e.issue),
            _ => None,
        }
    }

    /// The pull request, for `pullrequest:*` events.
    pub fn pull_request(&self) -> Option<&PullRequest> {
        match self {
            Self::PullRequestCreated(e)
            | Self::PullRequestUpdated(e)
            | Self::PullRequestFulfilled(e)
            | Self::PullRequestRejected(e) => Some(&e.pull_request),
            Self::PullRequestApproved(e) | Self::PullRequestUnapproved(e) => {
                Some(&e.pull_request)
            }
            Self::PullRequestCommentCreated(e)
            | Self::PullRequestCommentUpdated(e)
            | Self::PullRequestCommentDeleted(e) => Some(&e.pull_request),
            _ => None,
        }
    }

    /// The comment carried by comment events and by `issue:updated` when the
    /// update was made together with a comment.
    pub fn comment(&self) -> Option<&Comment> {
        match self {
            Self::RepoCommitCommentCreated(e) => Some(&e.comment),
            Self::IssueUpdated(e) => e.comment.as_ref(),
            Self::IssueCommentCreated(e) => Some(&e.comment),
            Self::PullRequestCommentCreated(e)
            | Self::PullRequestCommentUpdated(e)
            | Self::PullRequestCommentDeleted(e) => Some(&e.comment),
            _ => None,
        }
    }
}

/// Deserialize the envelope repository, rejecting one that names nothing.
fn identified_repository<'de, D>(deserializer: D) -> Result<Repository, D::Error>
where
    D: Deserializer<'de>,
{
    let repository = Repository::deserialize(deserializer)?;
    if repository.name.is_empty() && repository.full_name.is_empty() && repository.uuid.is_empty()
    {
        return Err(serde::de::Error::custom(
            "repository must carry a name, full_name or uuid",
        ));
    }
    Ok(repository)
}

/// Deserialize a field, mapping JSON `null` to the type's default.
///
/// Combined with `#[serde(default)]` this makes a leaf tolerant of both a
/// missing key and an explicit `null`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
