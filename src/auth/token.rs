use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::{Error as JwtError, ErrorKind},
};

use crate::dto::auth::Claims;

/// HS256 signing and verification keys plus the lifetime given to new tokens.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, user_id: i64) -> Result<String, JwtError> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: user_id.to_string(),
            iat: to_claim(now),
            exp: to_claim(now.saturating_add(ttl)),
        };
        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Returns the user id carried by a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Result<i64, JwtError> {
        let decoded = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        decoded
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| ErrorKind::InvalidSubject.into())
    }
}

// Timestamps outside the claim range clamp instead of wrapping.
fn to_claim(timestamp: i64) -> usize {
    usize::try_from(timestamp.max(0)).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_to_the_same_user() {
        let keys = TokenKeys::new("secret", Duration::from_secs(600));
        let token = keys.issue(42).unwrap();
        assert_eq!(keys.verify(&token).unwrap(), 42);
    }

    #[test]
    fn huge_ttl_clamps_expiry_instead_of_wrapping() {
        let keys = TokenKeys::new("secret", Duration::from_secs(u64::MAX));
        let token = keys.issue(7).unwrap();
        assert_eq!(keys.verify(&token).unwrap(), 7);
        assert_eq!(to_claim(i64::MAX), usize::try_from(i64::MAX).unwrap_or(usize::MAX));
        assert_eq!(to_claim(-5), 0);
    }

    #[test]
    fn token_signed_with_another_secret_is_rejected() {
        let issuer = TokenKeys::new("secret", Duration::from_secs(600));
        let verifier = TokenKeys::new("other", Duration::from_secs(600));
        let token = issuer.issue(42).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = TokenKeys::new("secret", Duration::from_secs(600));
        let past = Utc::now().timestamp() - 3600;
        let claims = Claims {
            sub: "42".into(),
            iat: (past - 600) as usize,
            exp: past as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
    }

    #[test]
    fn non_numeric_subject_is_rejected() {
        let keys = TokenKeys::new("secret", Duration::from_secs(600));
        let claims = Claims {
            sub: "someone".into(),
            iat: Utc::now().timestamp() as usize,
            exp: (Utc::now().timestamp() + 600) as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        let err = keys.verify(&token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidSubject));
    }
}
