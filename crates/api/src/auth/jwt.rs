//! Access and refresh token primitives.
//!
//! Access tokens are short-lived HS256 JWTs. Refresh tokens are opaque UUIDs
//! handed to the client in plaintext; the server persists only their SHA-256
//! hex digest, so session rows are useless to anyone who reads the table.

use cmms_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;

/// Payload of every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (database primary key).
    pub sub: DbId,
    /// Role name, checked again by the RBAC extractors on every request.
    pub role: String,
    /// Expiry, Unix seconds.
    pub exp: i64,
    /// Issued at, Unix seconds.
    pub iat: i64,
    /// Per-token UUID, useful in audit logs.
    pub jti: String,
}

/// Signing secret and token lifetimes.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty), `JWT_ACCESS_EXPIRY_MINS`
    /// (default 15) and `JWT_REFRESH_EXPIRY_DAYS` (default 7) from the
    /// environment. Panics on a missing secret or unparseable number, as the
    /// server must not come up with a guessed signing key.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .map(|v| v.parse().expect("JWT_ACCESS_EXPIRY_MINS must be an integer"))
            .unwrap_or(DEFAULT_ACCESS_EXPIRY_MINS);
        let refresh_token_expiry_days = std::env::var("JWT_REFRESH_EXPIRY_DAYS")
            .map(|v| v.parse().expect("JWT_REFRESH_EXPIRY_DAYS must be an integer"))
            .unwrap_or(DEFAULT_REFRESH_EXPIRY_DAYS);

        Self {
            secret,
            access_token_expiry_mins,
            refresh_token_expiry_days,
        }
    }
}

/// Sign a fresh access token for a user.
pub fn generate_access_token(
    user_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: now + config.access_token_expiry_mins * 60,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature and expiry, returning the claims on success.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

/// Mint a refresh token as `(plaintext, sha256_hex)`.
///
/// The plaintext goes back to the client once and is never stored; sessions
/// persist only the digest.
pub fn generate_refresh_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let digest = hash_refresh_token(&plaintext);
    (plaintext, digest)
}

/// SHA-256 hex digest of a refresh token, for lookup against stored sessions.
pub fn hash_refresh_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_secret(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        }
    }

    #[test]
    fn access_token_round_trips() {
        let config = config_with_secret("hmac-secret-long-enough-for-tests");
        let token = generate_access_token(42, "manager", &config).unwrap();

        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "manager");
        assert!(claims.exp > claims.iat);
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = config_with_secret("hmac-secret-long-enough-for-tests");

        // Well past the default 60-second validation leeway.
        let now = chrono::Utc::now().timestamp();
        let stale = Claims {
            sub: 1,
            role: "viewer".to_string(),
            exp: now - 300,
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &stale,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let signer = config_with_secret("plant-a-secret");
        let verifier = config_with_secret("plant-b-secret");

        let token = generate_access_token(7, "viewer", &signer).unwrap();
        assert!(validate_token(&token, &verifier).is_err());
    }

    #[test]
    fn refresh_digest_is_stable_hex() {
        let (plaintext, digest) = generate_refresh_token();
        assert_eq!(digest, hash_refresh_token(&plaintext));
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
