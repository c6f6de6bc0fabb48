//! # Hook-Keeper Core
//!
//! Core dispatch logic for the Hook-Keeper webhook receiver.
//!
//! This crate contains everything needed to turn a Bitbucket webhook delivery
//! into a call on an application-provided handler:
//!
//! - [`EventKind`]: the closed set of event keys (`X-Event-Key` values) with a known schema
//! - [`events`]: the typed payload schemas and the [`BitbucketEvent`] sum type
//! - [`Headers`]: the read-only header view passed to handlers
//! - [`EventHandler`]: the capability interface applications implement
//! - [`EventRegistry`]: the key → handler binding table
//! - [`Dispatcher`]: the request → handler routing logic
//!
//! The crate is transport independent. The HTTP surface lives in
//! `hook-keeper-api`.
//!
//! ## Usage
//!
//! ```rust
//! use hook_keeper_core::{
//!     BitbucketEvent, Dispatcher, EventKind, EventRegistry, HandlerError, Headers,
//! };
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let registry = Arc::new(EventRegistry::new());
//! registry
//!     .register(
//!         EventKind::RepoFork,
//!         Arc::new(
//!             |_headers: &Headers, event: &BitbucketEvent| -> Result<(), HandlerError> {
//!                 println!("fork of {}", event.repository().full_name);
//!                 Ok(())
//!             },
//!         ),
//!     )
//!     .await;
//!
//! let dispatcher = Dispatcher::new(registry);
//! let headers = Headers::from_pairs([("X-Event-Key", "repo:fork")]);
//! let body = br#"{"actor":{},"repository":{"full_name":"team/repo"},"fork":{}}"#;
//!
//! let outcome = dispatcher.dispatch(&headers, body).await.unwrap();
//! assert_eq!(outcome.kind, EventKind::RepoFork);
//! # });
//! ```

pub mod dispatcher;
pub mod event_kind;
pub mod events;
pub mod handler;
pub mod headers;
pub mod registry;

pub use dispatcher::{DispatchError, DispatchOutcome, Dispatcher};
pub use event_kind::{EventKind, UnknownEventKey};
pub use events::{BitbucketEvent, EventEnvelope};
pub use handler::{EventHandler, HandlerError};
pub use headers::Headers;
pub use registry::{EventRegistry, Registration};

// Re-export commonly used types
pub use uuid::Uuid;

/// Name of the header carrying the event key.
pub const EVENT_KEY_HEADER: &str = "X-Event-Key";
