use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::{ALGORITHM, TOKEN_TYPE};
use crate::error::{AuthError, Result};

/// Claim carrying the authenticated customer.
pub const CUSTOMER_ID_CLAIM: &str = "subject_customer_id";

/// Header written into issued tokens. Field order fixes the encoded bytes.
#[derive(Debug, Serialize)]
pub(crate) struct TokenHeader<'a> {
    pub alg: &'a str,
    pub typ: &'a str,
}

impl TokenHeader<'static> {
    pub fn hs256() -> Self {
        Self {
            alg: ALGORITHM,
            typ: TOKEN_TYPE,
        }
    }
}

/// Longest `alg` value carried into an error.
const MAX_REPORTED_ALG_LEN: usize = 16;

/// Header as presented by a client; `alg` stays untyped until it is checked.
#[derive(Debug)]
pub(crate) struct PresentedHeader {
    alg: Option<Value>,
}

impl From<Map<String, Value>> for PresentedHeader {
    fn from(mut header: Map<String, Value>) -> Self {
        Self {
            alg: header.remove("alg"),
        }
    }
}

impl PresentedHeader {
    /// The declared algorithm for diagnostics, cut to a few characters.
    pub fn declared_alg(&self) -> String {
        let alg = match &self.alg {
            Some(Value::String(alg)) => alg.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        alg.chars().take(MAX_REPORTED_ALG_LEN).collect()
    }

    pub fn is_hs256(&self) -> bool {
        matches!(&self.alg, Some(Value::String(alg)) if alg == ALGORITHM)
    }
}

/// Verified token payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClaimSet {
    pub subject_customer_id: i64,
    /// Expiration, unix seconds.
    pub exp: i64,
}

impl ClaimSet {
    pub fn new(subject_customer_id: i64, exp: i64) -> Self {
        Self {
            subject_customer_id,
            exp,
        }
    }
}

/// Payload exactly as decoded. Unknown claims are dropped.
#[derive(Debug, Default)]
pub(crate) struct RawClaims {
    subject_customer_id: Option<Value>,
    exp: Option<Value>,
}

impl From<Map<String, Value>> for RawClaims {
    fn from(mut payload: Map<String, Value>) -> Self {
        Self {
            subject_customer_id: payload.remove(CUSTOMER_ID_CLAIM),
            exp: payload.remove("exp"),
        }
    }
}

impl RawClaims {
    /// Turn the untyped payload into a `ClaimSet`, checking expiry against `now`.
    ///
    /// Both claims must be JSON integers. Floats and strings are rejected even
    /// when they hold an integral value.
    pub fn validate_at(self, now: i64) -> Result<ClaimSet> {
        let exp = self
            .exp
            .as_ref()
            .and_then(Value::as_i64)
            .ok_or(AuthError::TokenExpired)?;
        if exp <= now {
            return Err(AuthError::TokenExpired);
        }

        let subject_customer_id = self
            .subject_customer_id
            .as_ref()
            .and_then(Value::as_i64)
            .ok_or(AuthError::ClaimTypeMismatch)?;

        Ok(ClaimSet::new(subject_customer_id, exp))
    }
}
