use std::fmt;
use std::sync::Arc;

use chrono::Duration;

use crate::error::{AuthError, Result};

/// The only signing algorithm tokens may declare.
pub const ALGORITHM: &str = "HS256";

/// Token type written into every header.
pub const TOKEN_TYPE: &str = "JWT";

/// Issued tokens are valid for 3 days.
pub const TOKEN_TTL_HOURS: i64 = 72;

/// Secrets shorter than this still work but are logged as weak.
pub const RECOMMENDED_SECRET_LEN: usize = 32;

pub fn token_ttl() -> Duration {
    Duration::hours(TOKEN_TTL_HOURS)
}

/// Symmetric signing key shared by issuance and verification.
///
/// Immutable once built and cheap to clone. It has no serde impls and its
/// `Debug` output never shows key material.
#[derive(Clone)]
pub struct Secret {
    key: Arc<[u8]>,
}

impl Secret {
    /// Build a secret from raw bytes.
    ///
    /// An empty key can never produce a trustworthy signature, so it is
    /// rejected here rather than on the first `sign` call.
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(AuthError::SigningFailure("secret is empty".to_string()));
        }
        if key.len() < RECOMMENDED_SECRET_LEN {
            tracing::warn!(
                len = key.len(),
                recommended = RECOMMENDED_SECRET_LEN,
                "JWT secret is shorter than recommended"
            );
        }
        Ok(Self {
            key: Arc::from(key),
        })
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.key
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("len", &self.key.len())
            .finish_non_exhaustive()
    }
}
