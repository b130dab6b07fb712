//! Credential issue/decode — HS256 JWTs carrying a principal snapshot.

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::verify::Role;

/// Claims embedded in every issued credential.
///
/// Self-contained: verification needs no store lookup except the
/// revocation check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: u32,
    pub username: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and decodes credentials with a shared secret and fixed TTL.
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl TokenSigner {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Issue a signed, time-bound credential for a principal.
    pub fn issue(&self, user_id: u32, username: &str, role: Role) -> anyhow::Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id,
            username: username.to_string(),
            role,
            iat: now,
            exp: now + self.ttl_secs,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    /// Decode and verify signature + expiry. Any failure (malformed,
    /// bad signature, expired) is an `Err`, never a panic.
    pub fn decode(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret", 3600)
    }

    #[test]
    fn issued_token_decodes_to_matching_claims() {
        let s = signer();
        let token = s.issue(1, "alice", Role::Admin).unwrap();
        let claims = s.decode(&token).unwrap();
        assert_eq!(claims.user_id, 1);
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = signer().issue(2, "bob", Role::User).unwrap();
        let other = TokenSigner::new("different-secret", 3600);
        assert!(other.decode(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // jsonwebtoken applies 60s default leeway, so go well past it.
        let s = TokenSigner::new("test-secret", -120);
        let token = s.issue(3, "charlie", Role::User).unwrap();
        assert!(s.decode(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected_not_fatal() {
        assert!(signer().decode("not-a-jwt").is_err());
        assert!(signer().decode("").is_err());
    }
}
