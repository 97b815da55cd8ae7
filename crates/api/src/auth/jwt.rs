//! HS256 session tokens for the admin panel.
//!
//! Tokens carry the operator's email and role. There are no refresh tokens:
//! the panel logs in again once a token expires.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub email: String,
    /// Role name, always `"admin"` for tokens issued by login.
    pub role: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Configuration for token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in hours.
    pub expiry_hours: i64,
}

impl JwtConfig {
    pub const DEFAULT_EXPIRY_HOURS: i64 = 8;
}

/// Generate an HS256 token for the given operator.
pub fn generate_token(
    email: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        email: email.to_string(),
        role: role.to_string(),
        iat: now,
        exp: now + config.expiry_hours * 3600,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a token, returning its [`Claims`].
///
/// Checks the signature and expiry.
pub fn validate_token(token: &str, config: &JwtConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_hours: 8,
        }
    }

    #[test]
    fn generate_and_validate_token() {
        let config = test_config();
        let token = generate_token("admin@travel.com", "admin", &config).unwrap();

        let claims = validate_token(&token, &config).unwrap();
        assert_eq!(claims.email, "admin@travel.com");
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.exp - claims.iat, 8 * 3600);
    }

    #[test]
    fn expired_token_fails() {
        let config = test_config();

        // Well past the default 60-second leeway.
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            email: "admin@travel.com".to_string(),
            role: "admin".to_string(),
            iat: now - 600,
            exp: now - 300,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn different_secrets_fail() {
        let other = JwtConfig {
            secret: "secret-bravo".to_string(),
            expiry_hours: 8,
        };
        let token = generate_token("admin@travel.com", "admin", &test_config()).unwrap();
        assert!(validate_token(&token, &other).is_err());
    }
}
