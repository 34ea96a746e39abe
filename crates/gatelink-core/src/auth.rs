//! Caller authorization context.

/// The authorization context supplied with every mutating store call.
///
/// A token identifies an entry-owning principal; the admin flag
/// overrides ownership checks entirely. Whether a token is legitimate
/// is decided by the authentication layer before a `Claims` value is
/// constructed — the store only compares it against the owner recorded
/// on each entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Bearer token identifying the calling principal
    pub token: String,

    /// Whether this caller may override ownership checks
    pub admin: bool,
}

impl Claims {
    /// Claims for an ordinary token-holding caller.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            admin: false,
        }
    }

    /// Claims carrying the admin override.
    pub fn admin(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            admin: true,
        }
    }
}
