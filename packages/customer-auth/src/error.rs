use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing auth bearer token in header")]
    MissingAuthHeader,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Unsupported signing algorithm: {alg}")]
    UnsupportedAlgorithm { alg: String },

    #[error("Token signature does not match")]
    SignatureMismatch,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Unrecognized customer id claim")]
    ClaimTypeMismatch,

    #[error("Failed to sign token: {0}")]
    SigningFailure(String),
}

impl AuthError {
    /// Stable code for internal logs. Never send it to clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingAuthHeader => "MISSING_AUTH_HEADER",
            Self::MalformedToken => "MALFORMED_TOKEN",
            Self::UnsupportedAlgorithm { .. } => "UNSUPPORTED_ALGORITHM",
            Self::SignatureMismatch => "SIGNATURE_MISMATCH",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::ClaimTypeMismatch => "CLAIM_TYPE_MISMATCH",
            Self::SigningFailure(_) => "SIGNING_FAILURE",
        }
    }

    /// Whether the error came from a presented credential rather than from
    /// the service's own signing configuration.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::SigningFailure(_))
    }
}

pub type Result<T> = std::result::Result<T, AuthError>;
