//! Event handler trait for application-provided processing logic.
//!
//! Applications implement [`EventHandler`] and bind it to one or more event
//! keys in the [`EventRegistry`](crate::EventRegistry). The dispatcher calls
//! the handler synchronously with respect to the request: the HTTP response is
//! not sent until the handler returns, and its result decides the status code.
//!
//! # Examples
//!
//! ```rust
//! use async_trait::async_trait;
//! use hook_keeper_core::{BitbucketEvent, EventHandler, HandlerError, Headers};
//!
//! struct IssueHandler;
//!
//! #[async_trait]
//! impl EventHandler for IssueHandler {
//!     async fn handle_event(
//!         &self,
//!         _headers: &Headers,
//!         event: &BitbucketEvent,
//!     ) -> Result<(), HandlerError> {
//!         match event {
//!             BitbucketEvent::IssueCreated(e) => println!("created #{}", e.issue.id),
//!             BitbucketEvent::IssueUpdated(e) => println!("updated #{}", e.issue.id),
//!             _ => {}
//!         }
//!         Ok(())
//!     }
//! }
//! ```

use crate::{events::BitbucketEvent, headers::Headers};
use async_trait::async_trait;
use std::error::Error;

/// Error type returned by handlers.
///
/// The dispatcher never inspects it beyond logging; any handler error maps to
/// the same "handler failure" outcome.
pub type HandlerError = Box<dyn Error + Send + Sync>;

/// Application-provided webhook event handler.
///
/// # Concurrency
///
/// Requests are dispatched concurrently, so one handler instance may run
/// several times in parallel. Handlers must be `Send + Sync`.
///
/// # Idempotency
///
/// The dispatcher performs no de-duplication. Bitbucket may redeliver an
/// event (see [`Headers::attempt_number`]), and each delivery invokes the
/// handler again.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle one decoded event.
    ///
    /// # Arguments
    ///
    /// * `headers` - Every header of the inbound request, including `X-Event-Key`
    /// * `event` - The payload decoded with the schema of the event key
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Event processed; the request is answered with 200
    /// * `Err(e)` - Processing failed; the request is answered with 500
    async fn handle_event(&self, headers: &Headers, event: &BitbucketEvent)
        -> Result<(), HandlerError>;
}

#[async_trait]
impl<F> EventHandler for F
where
    F: Fn(&Headers, &BitbucketEvent) -> Result<(), HandlerError> + Send + Sync,
{
    async fn handle_event(
        &self,
        headers: &Headers,
        event: &BitbucketEvent,
    ) -> Result<(), HandlerError> {
        (self)(headers, event)
    }
}
