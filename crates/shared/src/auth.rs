//! Authentication types for JWT and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Staff roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access including deletes and user management.
    Admin,
    /// Records donors, beneficiaries, receipts and distributions.
    Staff,
    /// Read-only access.
    Viewer,
}

impl Role {
    /// All roles, in privilege order.
    pub const ALL: [Self; 3] = [Self::Admin, Self::Staff, Self::Viewer];

    /// Returns the wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Viewer => "viewer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "viewer" => Ok(Self::Viewer),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token accepted by protected routes.
    Access,
    /// Long-lived token accepted only by the refresh endpoint.
    Refresh,
}

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// User's role.
    pub role: Role,
    /// Token kind.
    pub typ: TokenType,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(user_id: Uuid, role: Role, typ: TokenType, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            role,
            typ,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Token pair returned after successful authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token (short-lived).
    pub access_token: String,
    /// Refresh token (long-lived).
    pub refresh_token: String,
    /// Access token expiration in seconds.
    pub expires_in: i64,
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// User email.
    pub email: String,
    /// User password.
    pub password: String,
}

/// Refresh token request.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token.
    pub refresh_token: String,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// User email.
    pub email: String,
    /// User full name.
    pub full_name: String,
    /// User role.
    pub role: Role,
}

/// Login and register response payload.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// Authenticated user info.
    pub user: UserInfo,
    /// Issued tokens.
    #[serde(flatten)]
    pub tokens: TokenPair,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::str::FromStr;

    #[test]
    fn test_role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
            assert_eq!(role.to_string(), role.as_str());
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!(Role::from_str("owner").is_err());
        assert!(Role::from_str("Admin").is_err());
        assert!(Role::from_str("").is_err());
    }

    #[test]
    fn test_role_serde_uses_snake_case() {
        assert_eq!(serde_json::to_string(&Role::Staff).unwrap(), "\"staff\"");
        let role: Role = serde_json::from_str("\"viewer\"").unwrap();
        assert_eq!(role, Role::Viewer);
    }

    #[test]
    fn test_claims_new_sets_correct_fields() {
        let user_id = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::hours(1);

        let claims = Claims::new(user_id, Role::Admin, TokenType::Access, expires_at);

        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.typ, TokenType::Access);
        assert!(claims.iat <= Utc::now().timestamp());
        assert_eq!(claims.exp, expires_at.timestamp());
    }
}
