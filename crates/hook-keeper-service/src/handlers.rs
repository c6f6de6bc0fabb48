//! Logging event handlers bound by the service binary.
//!
//! One handler per resource family. Handlers bound to several keys tell the
//! sub-kinds apart by the [`BitbucketEvent`] variant they receive.

use async_trait::async_trait;
use hook_keeper_core::{
    events::{Change, Comment, PullRequest},
    BitbucketEvent, EventHandler, EventKind, EventRegistry, HandlerError, Headers,
};
use std::sync::Arc;
use tracing::info;

/// Bind the logging handlers to `kinds`.
///
/// Kinds of the same family share one handler instance.
pub async fn register_logging_handlers(registry: &EventRegistry, kinds: &[EventKind]) {
    let repository: Arc<dyn EventHandler> = Arc::new(RepositoryEventLogger);
    let issue: Arc<dyn EventHandler> = Arc::new(IssueEventLogger);
    let pull_request: Arc<dyn EventHandler> = Arc::new(PullRequestEventLogger);
    let pull_request_comment: Arc<dyn EventHandler> = Arc::new(PullRequestCommentLogger);

    for &kind in kinds {
        let handler = match kind {
            EventKind::RepoPush
            | EventKind::RepoFork
            | EventKind::RepoUpdated
            | EventKind::RepoCommitCommentCreated
            | EventKind::RepoCommitStatusCreated
            | EventKind::RepoCommitStatusUpdated => &repository,
            EventKind::IssueCreated | EventKind::IssueUpdated | EventKind::IssueCommentCreated => {
                &issue
            }
            EventKind::PullRequestCreated
            | EventKind::PullRequestUpdated
            | EventKind::PullRequestApproved
            | EventKind::PullRequestUnapproved
            | EventKind::PullRequestFulfilled
            | EventKind::PullRequestRejected => &pull_request,
            EventKind::PullRequestCommentCreated
            | EventKind::PullRequestCommentUpdated
            | EventKind::PullRequestCommentDeleted => &pull_request_comment,
        };
        registry.register(kind, Arc::clone(handler)).await;
    }

    info!(count = kinds.len(), "Registered logging handlers");
}

fn unexpected(handler: &str, event: &BitbucketEvent) -> HandlerError {
    format!("{handler} cannot handle event '{}'", event.kind()).into()
}

// ============================================================================
// Repository events
// ============================================================================

/// Logs `repo:*` events.
pub struct RepositoryEventLogger;

#[async_trait]
impl EventHandler for RepositoryEventLogger {
    async fn handle_event(
        &self,
        headers: &Headers,
        event: &BitbucketEvent,
    ) -> Result<(), HandlerError> {
        let request_uuid = headers.request_uuid();

        match event {
            BitbucketEvent::RepoPush(e) => {
                info!(
                    request_uuid = ?request_uuid,
                    changes = e.push.changes.len(),
                    account = %e.envelope.actor.name(),
                    repository = %e.envelope.repository.full_name,
                    "Push received"
                );
                for change in &e.push.changes {
                    log_push_change(change);
                }
            }
            BitbucketEvent::RepoFork(e) => {
                info!(
                    request_uuid = ?request_uuid,
                    source = %e.envelope.repository.full_name,
                    fork = %e.fork.full_name,
                    actor = %e.envelope.actor.name(),
                    "Repository forked"
                );
            }
            BitbucketEvent::RepoUpdated(e) => {
                let changed: Vec<&str> = [
                    ("name", &e.changes.name),
                    ("full_name", &e.changes.full_name),
                    ("website", &e.changes.website),
                    ("language", &e.changes.language),
                    ("description", &e.changes.description),
                ]
                .into_iter()
                .filter_map(|(field, change)| change.as_ref().map(|_| field))
                .collect();

                info!(
                    request_uuid = ?request_uuid,
                    repository = %e.envelope.repository.full_name,
                    actor = %e.envelope.actor.name(),
                    changed = ?changed,
                    "Repository updated"
                );
            }
            BitbucketEvent::RepoCommitCommentCreated(e) => {
                info!(
                    request_uuid = ?request_uuid,
                    repository = %e.envelope.repository.full_name,
                    commit = %e.commit.hash,
                    "Commit comment created"
                );
                log_comment(&e.comment);
            }
            BitbucketEvent::RepoCommitStatusCreated(e)
            | BitbucketEvent::RepoCommitStatusUpdated(e) => {
                let status = &e.commit_status;
                info!(
                    request_uuid = ?request_uuid,
                    event_key = %event.kind(),
                    repository = %e.envelope.repository.full_name,
                    commit = %status.commit.hash,
                    key = %status.key,
                    state = %status.state,
                    refname = %status.refname,
                    url = %status.url,
                    "Commit status changed"
                );
            }
            other => return Err(unexpected("RepositoryEventLogger", other)),
        }

        Ok(())
    }
}

fn log_push_change(change: &Change) {
    let Some(new) = change.new.as_ref() else {
        info!(
            branch = %change.old.as_ref().map(|r| r.name.as_str()).unwrap_or(""),
            closed = change.closed,
            "Reference deleted"
        );
        return;
    };

    info!(
        branch = %new.name,
        reference_type = %new.object_type,
        hash = %new.target.hash,
        message = %new.target.message.trim_end(),
        created = change.created,
        forced = change.forced,
        commits = change.commits.len(),
        "Reference updated"
    );
}

// ============================================================================
// Issue events
// ============================================================================

/// Logs `issue:*` events.
pub struct IssueEventLogger;

#[async_trait]
impl EventHandler for IssueEventLogger {
    async fn handle_event(
        &self,
        headers: &Headers,
        event: &BitbucketEvent,
    ) -> Result<(), HandlerError> {
        let action = match event {
            BitbucketEvent::IssueCreated(_) => "created",
            BitbucketEvent::IssueUpdated(_) => "updated",
            BitbucketEvent::IssueCommentCreated(_) => "commented",
            other => return Err(unexpected("IssueEventLogger", other)),
        };
        let Some(issue) = event.issue() else {
            return Err(unexpected("IssueEventLogger", event));
        };

        info!(
            request_uuid = ?headers.request_uuid(),
            action,
            id = issue.id,
            repository = %event.repository().full_name,
            actor = %event.actor().name(),
            title = %issue.title,
            kind = %issue.kind,
            priority = %issue.priority,
            state = %issue.state,
            "Issue event"
        );

        if let BitbucketEvent::IssueUpdated(e) = event {
            if let Some(status) = &e.changes.status {
                info!(id = issue.id, from = %status.old, to = %status.new, "Issue status changed");
            }
        }
        if let Some(comment) = event.comment() {
            log_comment(comment);
        }

        Ok(())
    }
}

// ============================================================================
// Pull request events
// ============================================================================

/// Logs the `pullrequest:*` lifecycle events.
pub struct PullRequestEventLogger;

#[async_trait]
impl EventHandler for PullRequestEventLogger {
    async fn handle_event(
        &self,
        headers: &Headers,
        event: &BitbucketEvent,
    ) -> Result<(), HandlerError> {
        let (action, approval) = match event {
            BitbucketEvent::PullRequestCreated(_) => ("created", None),
            BitbucketEvent::PullRequestUpdated(_) => ("updated", None),
            BitbucketEvent::PullRequestApproved(e) => ("approved", Some(&e.approval)),
            BitbucketEvent::PullRequestUnapproved(e) => ("unapproved", Some(&e.approval)),
            BitbucketEvent::PullRequestFulfilled(_) => ("merged", None),
            BitbucketEvent::PullRequestRejected(_) => ("declined", None),
            other => return Err(unexpected("PullRequestEventLogger", other)),
        };
        let Some(pull_request) = event.pull_request() else {
            return Err(unexpected("PullRequestEventLogger", event));
        };

        log_pull_request(headers, event, action, pull_request);

        if let Some(approval) = approval {
            info!(
                id = pull_request.id,
                approver = %approval.user.name(),
                date = ?approval.date,
                "Pull request approval changed"
            );
        }

        Ok(())
    }
}

/// Logs `pullrequest:comment_*` events.
pub struct PullRequestCommentLogger;

#[async_trait]
impl EventHandler for PullRequestCommentLogger {
    async fn handle_event(
        &self,
        headers: &Headers,
        event: &BitbucketEvent,
    ) -> Result<(), HandlerError> {
        let (action, e) = match event {
            BitbucketEvent::PullRequestCommentCreated(e) => ("comment created", e),
            BitbucketEvent::PullRequestCommentUpdated(e) => ("comment updated", e),
            BitbucketEvent::PullRequestCommentDeleted(e) => ("comment deleted", e),
            other => return Err(unexpected("PullRequestCommentLogger", other)),
        };

        log_pull_request(headers, event, action, &e.pull_request);
        log_comment(&e.comment);

        Ok(())
    }
}

fn log_pull_request(
    headers: &Headers,
    event: &BitbucketEvent,
    action: &str,
    pull_request: &PullRequest,
) {
    let participants: Vec<&str> = pull_request
        .participants
        .iter()
        .map(|p| p.user.name())
        .collect();
    let reviewers: Vec<&str> = pull_request.reviewers.iter().map(|r| r.name()).collect();

    info!(
        request_uuid = ?headers.request_uuid(),
        action,
        id = pull_request.id,
        repository = %event.repository().full_name,
        actor = %event.actor().name(),
        author = %pull_request.author.name(),
        title = %pull_request.title,
        description = %pull_request.description,
        state = %pull_request.state,
        merge_commit = %pull_request.merge_commit_hash(),
        source = %pull_request.source.branch.name,
        source_repository = %pull_request.source.repository.full_name,
        destination = %pull_request.destination.branch.name,
        destination_repository = %pull_request.destination.repository.full_name,
        participants = ?participants,
        reviewers = ?reviewers,
        "Pull request event"
    );
}

fn log_comment(comment: &Comment) {
    info!(
        comment_id = comment.id,
        author = %comment.user.name(),
        raw = %comment.content.raw,
        html = %comment.content.html,
        markup = %comment.content.markup,
        inline_path = %comment.inline.as_ref().map(|i| i.path.as_str()).unwrap_or(""),
        deleted = comment.deleted,
        "Comment"
    );
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
