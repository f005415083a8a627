pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod service;

pub use codec::TokenCodec;
pub use config::{Secret, TOKEN_TTL_HOURS};
pub use error::{AuthError, Result};
pub use models::{ClaimSet, CUSTOMER_ID_CLAIM};
pub use service::{CustomerAuth, CustomerAuthService};

#[cfg(any(test, feature = "mock"))]
pub use service::{MockCustomerAuth, MOCK_CUSTOMER_ID, MOCK_TOKEN};

const AUTH_SCHEME: &str = "Bearer ";

/// Extract the token from an `Authorization` header value.
///
/// The scheme is matched case-sensitively and the token is returned exactly as
/// sent; nothing about it is verified here.
pub fn extract_bearer_token(authorization_header: &str) -> Result<&str> {
    match authorization_header.strip_prefix(AUTH_SCHEME) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MissingAuthHeader),
    }
}
