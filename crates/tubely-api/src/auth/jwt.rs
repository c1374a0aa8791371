//! Access-token issuing and validation.
//!
//! Tokens are HS256-signed JWTs whose subject is the caller's user id.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer embedded in and required of every access token.
pub const TOKEN_ISSUER: &str = "tubely-access";

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: String,
    pub iss: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

/// Issue an HS256 access token for `user_id`, valid for `expires_in`.
pub fn make_jwt(
    user_id: Uuid,
    secret: &str,
    expires_in: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iss: TOKEN_ISSUER.to_string(),
        exp: (now + expires_in).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validate a token and return the user id it was issued for.
///
/// Checks signature, expiry and issuer. A subject that is not a UUID is
/// reported as an invalid token.
pub fn validate_jwt(token: &str, secret: &str) -> Result<Uuid, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[TOKEN_ISSUER]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;

    Uuid::parse_str(&data.claims.sub)
        .map_err(|_| jsonwebtoken::errors::ErrorKind::InvalidSubject.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

    #[test]
    fn test_make_and_validate() {
        let user_id = Uuid::new_v4();
        let token = make_jwt(user_id, SECRET, Duration::hours(1)).unwrap();
        assert_eq!(validate_jwt(&token, SECRET).unwrap(), user_id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = make_jwt(Uuid::new_v4(), SECRET, Duration::hours(1)).unwrap();
        let err = validate_jwt(&token, "another-secret-that-is-long-enough!!").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidSignature));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Well beyond the default 60 second leeway.
        let token = make_jwt(Uuid::new_v4(), SECRET, Duration::minutes(-10)).unwrap();
        let err = validate_jwt(&token, SECRET).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
    }

    #[test]
    fn test_foreign_issuer_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iss: "someone-else".to_string(),
            exp: now + 3600,
            iat: now,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let err = validate_jwt(&token, SECRET).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidIssuer));
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "42".to_string(),
            iss: TOKEN_ISSUER.to_string(),
            exp: now + 3600,
            iat: now,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(validate_jwt(&token, SECRET).is_err());
    }
}
