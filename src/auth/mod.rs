use actix_web::HttpMessage;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;

/// JWT claims: the user id plus the standard timestamps. Everything else a
/// handler needs is looked up from the database by id.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // User ID
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Authentication service: password hashing and session-token issuance.
pub struct AuthService {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Hash a password using bcrypt with a random salt
    pub fn hash_password(&self, password: &str) -> Result<String, bcrypt::BcryptError> {
        bcrypt::hash(password, self.config.bcrypt_cost)
    }

    /// Verify a password against its hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
        bcrypt::verify(password, hash)
    }

    /// Issue a signed session token embedding the user id, expiring after the
    /// configured interval.
    pub fn generate_token(&self, user_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::seconds(self.config.jwt_expiration_seconds)).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Validate and decode a session token
    pub fn validate_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(token_data.claims)
    }
}

/// Extract the session token from the `x-auth-token` request header.
pub fn extract_token_from_request(req: &impl HttpMessage) -> Option<String> {
    req.headers()
        .get("x-auth-token")
        .and_then(|value| value.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_service(expiration_seconds: i64) -> AuthService {
        AuthService::new(AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_seconds: expiration_seconds,
            bcrypt_cost: 4, // minimum cost, keeps tests fast
        })
    }

    #[test]
    fn token_round_trip_preserves_user_id() {
        let auth = auth_service(3600);
        let user_id = Uuid::new_v4();

        let token = auth.generate_token(user_id).unwrap();
        let claims = auth.validate_token(&token).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let auth = auth_service(3600);
        let token = auth.generate_token(Uuid::new_v4()).unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('a') { 'b' } else { 'a' });

        assert!(auth.validate_token(&tampered).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuing = auth_service(3600);
        let verifying = AuthService::new(AuthConfig {
            jwt_secret: "another-secret".to_string(),
            jwt_expiration_seconds: 3600,
            bcrypt_cost: 4,
        });

        let token = issuing.generate_token(Uuid::new_v4()).unwrap();
        assert!(verifying.validate_token(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Past the default validation leeway.
        let auth = auth_service(-120);
        let token = auth.generate_token(Uuid::new_v4()).unwrap();
        assert!(auth.validate_token(&token).is_err());
    }

    #[test]
    fn password_hash_verifies_and_rejects_wrong_password() {
        let auth = auth_service(3600);
        let hash = auth.hash_password("hunter42").unwrap();

        assert!(auth.verify_password("hunter42", &hash).unwrap());
        assert!(!auth.verify_password("hunter43", &hash).unwrap());
    }

    #[test]
    fn hashing_same_password_twice_salts_differently() {
        let auth = auth_service(3600);
        let first = auth.hash_password("hunter42").unwrap();
        let second = auth.hash_password("hunter42").unwrap();
        assert_ne!(first, second);
    }
}
