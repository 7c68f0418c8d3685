//! Session value type and its cookie codec.
//!
//! The signed cookie is the only session store: nothing about a signed-in
//! user is kept in server memory between requests.

mod codec;

use std::time::Duration;

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

pub use codec::SessionCodec;

/// An authenticated principal.
///
/// Only the provider's stable identifier is kept; profile attributes are
/// dropped when the session is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: String,

    /// Always whole seconds; `with_issued_at` truncates.
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    issued_at: DateTime<Utc>,
}

impl Session {
    /// Start a session issued now.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self::with_issued_at(id, Utc::now())
    }

    /// Start a session with an explicit issuance time.
    #[must_use]
    pub fn with_issued_at(id: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self { id: id.into(), issued_at: issued_at.trunc_subsecs(0) }
    }

    /// Provider subject identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Issuance time.
    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// Whether the session is older than `ttl` at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        now.signed_duration_since(self.issued_at) > ttl
    }
}
