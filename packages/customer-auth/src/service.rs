use crate::{codec::TokenCodec, config::Secret, error::Result, extract_bearer_token};

/// Customer authentication as seen by the request layer.
///
/// Implementations are picked by whoever assembles the service graph; the
/// request layer only ever holds an `Arc<dyn CustomerAuth>`.
pub trait CustomerAuth: Send + Sync {
    /// Resolve the customer behind an `Authorization` header value.
    fn parse_customer_token(&self, authorization_header: &str) -> Result<i64>;

    /// Issue a token for `customer_id`, valid for 72 hours.
    fn new_customer_token(&self, customer_id: i64) -> Result<String>;
}

/// Production implementation backed by HMAC-SHA256 tokens.
#[derive(Debug, Clone)]
pub struct CustomerAuthService {
    codec: TokenCodec,
}

impl CustomerAuthService {
    pub fn new(secret: Secret) -> Self {
        Self {
            codec: TokenCodec::new(secret),
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }
}

impl CustomerAuth for CustomerAuthService {
    fn parse_customer_token(&self, authorization_header: &str) -> Result<i64> {
        let token = extract_bearer_token(authorization_header)?;
        self.codec.verify(token).inspect_err(|e| {
            tracing::debug!(code = e.error_code(), "Customer token rejected");
        })
    }

    fn new_customer_token(&self, customer_id: i64) -> Result<String> {
        self.codec.sign(customer_id)
    }
}

/// Customer id every `MockCustomerAuth` lookup resolves to.
#[cfg(any(test, feature = "mock"))]
pub const MOCK_CUSTOMER_ID: i64 = 0;

/// Token every `MockCustomerAuth` issuance returns.
#[cfg(any(test, feature = "mock"))]
pub const MOCK_TOKEN: &str = "secret_token";

/// Stand-in for tests that need a `CustomerAuth` without real tokens.
///
/// Performs no validation at all.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct MockCustomerAuth;

#[cfg(any(test, feature = "mock"))]
impl MockCustomerAuth {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(any(test, feature = "mock"))]
impl CustomerAuth for MockCustomerAuth {
    fn parse_customer_token(&self, _authorization_header: &str) -> Result<i64> {
        Ok(MOCK_CUSTOMER_ID)
    }

    fn new_customer_token(&self, _customer_id: i64) -> Result<String> {
        Ok(MOCK_TOKEN.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AuthError;
    use std::sync::Arc;

    fn service() -> CustomerAuthService {
        CustomerAuthService::new(Secret::new("test-secret-key-that-is-long-enough-for-testing").unwrap())
    }

    #[test]
    fn issued_token_parses_from_header() {
        let auth = service();
        let token = auth.new_customer_token(42).unwrap();
        let header = format!("Bearer {}", token);
        assert_eq!(auth.parse_customer_token(&header).unwrap(), 42);
    }

    #[test]
    fn basic_scheme_is_missing_header() {
        assert_eq!(
            service().parse_customer_token("Basic dXNlcjpwYXNz").unwrap_err(),
            AuthError::MissingAuthHeader
        );
    }

    #[test]
    fn verification_errors_pass_through_unmodified() {
        let auth = service();
        assert_eq!(
            auth.parse_customer_token("Bearer not-a-token").unwrap_err(),
            AuthError::MalformedToken
        );

        let other = CustomerAuthService::new(Secret::new("another-secret").unwrap());
        let header = format!("Bearer {}", other.new_customer_token(1).unwrap());
        assert_eq!(
            auth.parse_customer_token(&header).unwrap_err(),
            AuthError::SignatureMismatch
        );
    }

    #[test]
    fn mock_is_interchangeable_and_never_fails() {
        let implementations: Vec<Arc<dyn CustomerAuth>> =
            vec![Arc::new(service()), Arc::new(MockCustomerAuth::new())];

        for auth in &implementations {
            let token = auth.new_customer_token(7).unwrap();
            assert!(!token.is_empty());
        }

        let mock = MockCustomerAuth::new();
        assert_eq!(mock.parse_customer_token("").unwrap(), MOCK_CUSTOMER_ID);
        assert_eq!(mock.parse_customer_token("garbage").unwrap(), MOCK_CUSTOMER_ID);
        assert_eq!(mock.new_customer_token(99).unwrap(), MOCK_TOKEN);
    }

    #[test]
    fn service_is_shareable_across_threads() {
        let auth = Arc::new(service());
        let handles: Vec<_> = (0..8)
            .map(|id| {
                let auth = Arc::clone(&auth);
                std::thread::spawn(move || {
                    let header = format!("Bearer {}", auth.new_customer_token(id).unwrap());
                    auth.parse_customer_token(&header).unwrap()
                })
            })
            .collect();

        let mut ids: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..8).collect::<Vec<_>>());
    }
}
