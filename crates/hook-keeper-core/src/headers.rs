//! Read-only HTTP header view handed to event handlers.

use crate::EVENT_KEY_HEADER;
use uuid::Uuid;

/// Header carrying the unique ID of a single delivery attempt.
pub const REQUEST_UUID_HEADER: &str = "X-Request-UUID";

/// Header carrying the ID of the webhook subscription.
pub const HOOK_UUID_HEADER: &str = "X-Hook-UUID";

/// Header carrying the delivery attempt counter (1 for the first attempt).
pub const ATTEMPT_NUMBER_HEADER: &str = "X-Attempt-Number";

/// HTTP headers of an inbound webhook request.
///
/// Header names are kept exactly as the transport delivered them; lookups are
/// ASCII case-insensitive. Every header the transport received is present,
/// not just the ones the dispatcher interprets.
///
/// # Examples
///
/// ```rust
/// use hook_keeper_core::Headers;
///
/// let headers = Headers::from_pairs([
///     ("X-Event-Key", "repo:push"),
///     ("X-Attempt-Number", "2"),
/// ]);
///
/// assert_eq!(headers.event_key(), Some("repo:push"));
/// assert_eq!(headers.get("x-event-key"), Some("repo:push"));
/// assert_eq!(headers.attempt_number(), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Create an empty header set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a header set from name/value pairs, preserving order and case.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Append a header. Repeated names are kept; [`get`](Self::get) returns the first.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Get the first value for `name`, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Check whether a header is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over all headers in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of header entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no headers are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the event key from the `X-Event-Key` header, verbatim.
    pub fn event_key(&self) -> Option<&str> {
        self.get(EVENT_KEY_HEADER)
    }

    /// Get the delivery attempt ID from `X-Request-UUID`.
    ///
    /// Returns `None` when the header is absent or not a valid UUID.
    pub fn request_uuid(&self) -> Option<Uuid> {
        self.get(REQUEST_UUID_HEADER)
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
    }

    /// Get the webhook subscription ID from `X-Hook-UUID`.
    pub fn hook_uuid(&self) -> Option<Uuid> {
        self.get(HOOK_UUID_HEADER)
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
    }

    /// Get the delivery attempt counter from `X-Attempt-Number`.
    pub fn attempt_number(&self) -> Option<u32> {
        self.get(ATTEMPT_NUMBER_HEADER)
            .and_then(|v| v.trim().parse().ok())
    }

    /// Get the `User-Agent` header.
    pub fn user_agent(&self) -> Option<&str> {
        self.get("User-Agent")
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

#[cfg(test)]
#[path = "headers_tests.rs"]
mod tests;
