use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::{
    config::{token_ttl, Secret},
    error::*,
    models::*,
};

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies HS256 customer tokens.
///
/// Holds nothing but the secret, so a single codec can be shared across any
/// number of request handlers.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    secret: Secret,
}

impl TokenCodec {
    pub fn new(secret: Secret) -> Self {
        Self { secret }
    }

    /// Issue a token for `subject_customer_id`, valid for the next 72 hours.
    pub fn sign(&self, subject_customer_id: i64) -> Result<String> {
        let exp = (Utc::now() + token_ttl()).timestamp();
        self.sign_claims(&ClaimSet::new(subject_customer_id, exp))
    }

    /// Verify a token and return the customer it was issued for.
    pub fn verify(&self, token: &str) -> Result<i64> {
        self.decode_at(token, Utc::now().timestamp())
            .map(|claims| claims.subject_customer_id)
    }

    /// Verify a token against an explicit clock reading (unix seconds).
    ///
    /// Checks run in a fixed order: segment count, header, algorithm,
    /// signature, then claims. The algorithm is checked before the signature
    /// or payload segments are touched.
    pub fn decode_at(&self, token: &str, now: i64) -> Result<ClaimSet> {
        let (header_b64, payload_b64, signature_b64) = split_token(token)?;

        let header = PresentedHeader::from(decode_object(header_b64)?);
        if !header.is_hs256() {
            return Err(AuthError::UnsupportedAlgorithm {
                alg: header.declared_alg(),
            });
        }

        let signature = decode_segment(signature_b64)?;
        let expected = self.mac(&token[..header_b64.len() + 1 + payload_b64.len()])?;
        if !bool::from(expected.as_slice().ct_eq(&signature)) {
            return Err(AuthError::SignatureMismatch);
        }

        RawClaims::from(decode_object(payload_b64)?).validate_at(now)
    }

    pub(crate) fn sign_claims(&self, claims: &ClaimSet) -> Result<String> {
        let header = encode_json(&TokenHeader::hs256())?;
        let payload = encode_json(claims)?;
        let signing_input = format!("{}.{}", header, payload);
        let signature = URL_SAFE_NO_PAD.encode(self.mac(&signing_input)?);
        Ok(format!("{}.{}", signing_input, signature))
    }

    fn mac(&self, signing_input: &str) -> Result<Vec<u8>> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose())
            .map_err(|e| AuthError::SigningFailure(e.to_string()))?;
        mac.update(signing_input.as_bytes());
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

fn split_token(token: &str) -> Result<(&str, &str, &str)> {
    let mut parts = token.split('.');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(header), Some(payload), Some(signature), None) => Ok((header, payload, signature)),
        _ => Err(AuthError::MalformedToken),
    }
}

fn decode_segment(segment: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| AuthError::MalformedToken)
}

/// Header and payload segments must each hold a single JSON object.
fn decode_object(segment: &str) -> Result<Map<String, Value>> {
    let bytes = decode_segment(segment)?;
    serde_json::from_slice(&bytes).map_err(|_| AuthError::MalformedToken)
}

fn encode_json<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_vec(value).map_err(|e| AuthError::SigningFailure(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}
