//! Entry data model and lifecycle rules.
//!
//! An [`Entry`] maps a public request path to a target resource and
//! carries the access-control state that gates each hit: a blacklist,
//! an optional finite-access expiry, and a running access counter.
//!
//! Entries are plain values. The lifecycle methods only mutate the
//! in-memory copy; writing the result back through the store is the
//! caller's responsibility.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The access rules attached to an entry.
///
/// Rule matching happens in the front end; the core only stores the
/// rules and the counters they feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blacklist {
    /// Rule lines in the order they were supplied
    #[serde(default)]
    pub rules: Vec<String>,
}

impl Blacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule line.
    pub fn add(&mut self, rule: impl Into<String>) {
        self.rules.push(rule.into());
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// A named mapping from a public request path to a target resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// The request path used to access this entry
    pub name: String,

    /// The URL this entry references
    pub url: String,

    /// Location of an uploaded file served instead of `url`
    #[serde(default)]
    pub filename: Option<String>,

    /// MIME type to serve as the Content-Type header
    #[serde(default)]
    pub content_type: Option<String>,

    /// Redirect to the target instead of proxying it
    pub redirect: bool,

    /// When this entry was created; immutable after creation
    pub creation: DateTime<Utc>,

    /// Entry to redirect to when access is denied
    #[serde(default)]
    pub deny_redirect: Option<String>,

    /// Access rules for this entry
    #[serde(default)]
    pub blacklist: Blacklist,

    /// Number of requests caught by the blacklist
    #[serde(default)]
    pub blacklist_hits: u64,

    /// Expire the entry after a finite number of accesses
    #[serde(default)]
    pub expires: bool,

    /// Number of accesses allowed before expiry
    #[serde(default)]
    pub expire_after: u64,

    /// Number of times this entry has been accessed
    #[serde(default)]
    pub access_count: u64,

    /// Whether the blacklist is learning instead of enforcing
    #[serde(default)]
    pub training: bool,
}

impl Entry {
    /// Create an entry named `name` pointing at `url`, created now.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            filename: None,
            content_type: None,
            redirect: false,
            creation: Utc::now(),
            deny_redirect: None,
            blacklist: Blacklist::new(),
            blacklist_hits: 0,
            expires: false,
            expire_after: 0,
            access_count: 0,
            training: false,
        }
    }

    pub fn with_creation(mut self, creation: DateTime<Utc>) -> Self {
        self.creation = creation;
        self
    }

    pub fn with_redirect(mut self, redirect: bool) -> Self {
        self.redirect = redirect;
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_deny_redirect(mut self, name: impl Into<String>) -> Self {
        self.deny_redirect = Some(name.into());
        self
    }

    /// Expire this entry after `limit` accesses.
    pub fn with_expiry(mut self, limit: u64) -> Self {
        self.expires = true;
        self.expire_after = limit;
        self
    }

    /// True once the finite-access allowance has been used up.
    ///
    /// Recomputed from the counters on every call; never stored as its
    /// own flag, so it cannot go stale.
    pub fn is_expired(&self) -> bool {
        self.expires && self.access_count >= self.expire_after
    }

    /// Record one successful access.
    pub fn record_access(&mut self) {
        self.access_count += 1;
    }

    /// Record one request caught by the blacklist.
    pub fn record_denied(&mut self) {
        self.blacklist_hits += 1;
    }

    /// Toggle blacklist training mode.
    pub fn set_training(&mut self, training: bool) {
        self.training = training;
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.name)
    }
}
