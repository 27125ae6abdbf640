//! # Authentication
//!
//! Bearer tokens and password hashes.
//!
//! ## Token Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login(email, password)                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  verify_password(password, user.password_hash)   argon2 PHC string      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  JwtManager::issue(&user, now) ──► HS256 { sub, name, role, iat, exp }  │
//! │                                                                         │
//! │  later request with "Authorization: Bearer <token>"                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  JwtManager::validate(token, now) ──► Claims ──► Actor { user_id, role }│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `now` comes from the service [`Clock`](crate::clock::Clock) on both sides,
//! so issuing and expiry agree on what time it is.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use cafe_core::{Role, User};

/// JWT claims structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Display name, recorded as `created_by` on stock movements
    pub name: String,

    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub name: String,
    pub role: Role,
}

impl From<Claims> for Actor {
    fn from(claims: Claims) -> Self {
        Actor {
            user_id: claims.sub,
            name: claims.name,
            role: claims.role,
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Actor {
            user_id: user.id.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// JWT token manager.
#[derive(Clone)]
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("lifetime_secs", &self.lifetime_secs)
            .finish_non_exhaustive()
    }
}

impl JwtManager {
    pub fn new(secret: String, lifetime_secs: i64) -> Self {
        JwtManager { secret, lifetime_secs }
    }

    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// Issues an access token for the user, valid from `now`.
    pub fn issue(&self, user: &User, now: DateTime<Utc>) -> ApiResult<String> {
        let exp = TimeDelta::try_seconds(self.lifetime_secs)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                tracing::error!(lifetime_secs = self.lifetime_secs, "Token expiry out of range");
                ApiError::internal("Failed to generate token")
            })?;

        let claims = Claims {
            sub: user.id.clone(),
            name: user.name.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            tracing::error!("Failed to sign token: {}", e);
            ApiError::internal("Failed to generate token")
        })
    }

    /// Validates the signature, decodes the claims and checks `exp` against
    /// `now`. A token is expired from its `exp` second onwards.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> ApiResult<Claims> {
        let mut validation = Validation::default();
        // expiry is judged against the service clock below, not the wall clock
        validation.validate_exp = false;

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            tracing::warn!("Rejected token: {}", e);
            ApiError::unauthorized("Invalid or expired token")
        })?;

        let claims = token_data.claims;
        if claims.exp <= now.timestamp() {
            tracing::warn!(sub = %claims.sub, exp = claims.exp, "Rejected expired token");
            return Err(ApiError::unauthorized("Invalid or expired token"));
        }

        Ok(claims)
    }
}

// =============================================================================
// Passwords
// =============================================================================

/// Hashes a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2.hash_password(password.as_bytes(), &salt).map_err(|e| {
        tracing::error!("Failed to hash password: {}", e);
        ApiError::internal("Failed to hash password")
    })?;

    Ok(hash.to_string())
}

/// Checks a password against a stored PHC string. Malformed hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
