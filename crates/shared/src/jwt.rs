//! JWT token generation and validation.
//!
//! Access and refresh tokens share a signing key and are told apart by the
//! `typ` claim.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{Claims, Role, TokenPair, TokenType};
use crate::config::JwtSettings;

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expires_secs: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_expires_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_token_expires_secs: 900,
            refresh_token_expires_secs: 604_800,
        }
    }
}

impl From<&JwtSettings> for JwtConfig {
    fn from(settings: &JwtSettings) -> Self {
        Self {
            secret: settings.secret.clone(),
            access_token_expires_secs: i64::try_from(settings.access_token_expiry_secs)
                .unwrap_or(i64::MAX),
            refresh_token_expires_secs: i64::try_from(settings.refresh_token_expiry_secs)
                .unwrap_or(i64::MAX),
        }
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// A refresh token was presented where an access token is required, or vice versa.
    #[error("unexpected token type")]
    WrongTokenType,
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expires_secs", &self.config.access_token_expires_secs)
            .field("refresh_token_expires_secs", &self.config.refresh_token_expires_secs)
            .field("keys", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn generate(
        &self,
        user_id: Uuid,
        role: Role,
        typ: TokenType,
        lifetime_secs: i64,
    ) -> Result<String, JwtError> {
        let expires_at = Utc::now() + Duration::seconds(lifetime_secs);
        let claims = Claims::new(user_id, role, typ, expires_at);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Generates an access token for a user.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_access_token(&self, user_id: Uuid, role: Role) -> Result<String, JwtError> {
        self.generate(
            user_id,
            role,
            TokenType::Access,
            self.config.access_token_expires_secs,
        )
    }

    /// Generates a refresh token for a user.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_refresh_token(&self, user_id: Uuid, role: Role) -> Result<String, JwtError> {
        self.generate(
            user_id,
            role,
            TokenType::Refresh,
            self.config.refresh_token_expires_secs,
        )
    }

    /// Issues a fresh access/refresh pair.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn issue_pair(&self, user_id: Uuid, role: Role) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: self.generate_access_token(user_id, role)?,
            refresh_token: self.generate_refresh_token(user_id, role)?,
            expires_in: self.config.access_token_expires_secs,
        })
    }

    /// Validates and decodes a token of the expected type.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired,
    /// `JwtError::WrongTokenType` if the `typ` claim does not match, and
    /// `JwtError::DecodingError` if the token is malformed or badly signed.
    pub fn validate_token(&self, token: &str, expected: TokenType) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })?;

        if claims.typ != expected {
            return Err(JwtError::WrongTokenType);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            access_token_expires_secs: 900,
            refresh_token_expires_secs: 3600,
        })
    }

    #[test]
    fn test_access_token_round_trip() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();

        let token = service.generate_access_token(user_id, Role::Staff).unwrap();
        let claims = service.validate_token(&token, TokenType::Access).unwrap();

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.role, Role::Staff);
        assert_eq!(claims.typ, TokenType::Access);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let service = create_test_service();
        let token = service
            .generate_refresh_token(Uuid::new_v4(), Role::Viewer)
            .unwrap();

        assert!(matches!(
            service.validate_token(&token, TokenType::Access),
            Err(JwtError::WrongTokenType)
        ));
        assert!(service.validate_token(&token, TokenType::Refresh).is_ok());
    }

    #[test]
    fn test_issue_pair() {
        let service = create_test_service();
        let pair = service.issue_pair(Uuid::new_v4(), Role::Admin).unwrap();

        assert_ne!(pair.access_token, pair.refresh_token);
        assert_eq!(pair.expires_in, 900);
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            access_token_expires_secs: -600,
            refresh_token_expires_secs: 3600,
        });
        let token = service
            .generate_access_token(Uuid::new_v4(), Role::Admin)
            .unwrap();

        assert!(matches!(
            service.validate_token(&token, TokenType::Access),
            Err(JwtError::Expired)
        ));
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let other = JwtService::new(JwtConfig {
            secret: "another-secret".to_string(),
            ..JwtConfig::default()
        });
        let token = other
            .generate_access_token(Uuid::new_v4(), Role::Admin)
            .unwrap();

        assert!(matches!(
            create_test_service().validate_token(&token, TokenType::Access),
            Err(JwtError::DecodingError(_))
        ));
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();
        assert!(
            service
                .validate_token("invalid.token.here", TokenType::Access)
                .is_err()
        );
    }
}
