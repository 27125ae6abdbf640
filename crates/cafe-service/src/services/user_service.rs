//! # User Service
//!
//! Accounts, login and bearer-token authentication.
//!
//! ## Login
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  { email, password }                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lookup by lower-cased email ──── none ────┐                            │
//! │       │                                    ├──► UNAUTHORIZED            │
//! │       ▼                                    │    "Invalid credentials"   │
//! │  verify argon2 hash ───────────── bad ─────┘    (same for both)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  is_active? ───────────────────── no ──────────► FORBIDDEN              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  { access_token, token_type: "bearer", user }                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::{hash_password, verify_password, Actor};
use crate::dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::error::{ApiError, ApiResult};
use crate::policy::Operation;
use crate::services::checked_id;
use crate::AppState;
use cafe_core::validation::{validate_email, validate_name, validate_password};
use cafe_core::{Role, User, UserProfile};
use cafe_db::{new_id, DbError};

const TOKEN_TYPE: &str = "bearer";

fn invalid_credentials() -> ApiError {
    ApiError::unauthorized("Invalid credentials")
}

fn email_taken() -> ApiError {
    ApiError::conflict("Email already registered")
}

/// User service.
pub struct UserService {
    state: Arc<AppState>,
}

impl UserService {
    pub fn new(state: Arc<AppState>) -> Self {
        UserService { state }
    }

    /// Resolves a bearer token to the caller.
    ///
    /// The role comes from the stored account, so a role change applies to
    /// tokens already issued.
    pub async fn authenticate(&self, token: &str) -> ApiResult<Actor> {
        let claims = self.state.jwt.validate(token, self.state.clock.now())?;

        let user = self
            .state
            .db
            .users()
            .get_by_id(&claims.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized("User not found"))?;

        if !user.is_active {
            warn!(user_id = %user.id, "Token presented for disabled account");
            return Err(ApiError::forbidden("Account is disabled"));
        }

        Ok(Actor::from(&user))
    }

    /// Creates an account and signs it in.
    ///
    /// A requested role other than `staff` needs an admin caller.
    pub async fn register(&self, actor: Option<&Actor>, req: RegisterRequest) -> ApiResult<AuthResponse> {
        self.state.authorize(actor, Operation::Register)?;

        let email = validate_email(&req.email)?;
        let name = validate_name("name", &req.name)?;
        validate_password(&req.password)?;

        let role = match req.role {
            None | Some(Role::Staff) => Role::Staff,
            Some(role) if actor.is_some_and(|a| a.role.at_least(Role::Admin)) => role,
            Some(role) => {
                warn!(email = %email, requested = %role, "Rejected role escalation on register");
                return Err(ApiError::forbidden("Only admins can assign roles"));
            }
        };

        if self.state.db.users().get_by_email(&email).await?.is_some() {
            return Err(email_taken());
        }

        let user = User {
            id: new_id(),
            email,
            name,
            role,
            password_hash: hash_password(&req.password)?,
            is_active: true,
            created_at: self.state.clock.now(),
        };

        self.state.db.users().insert(&user).await.map_err(|e| match e {
            DbError::UniqueViolation { .. } => email_taken(),
            other => ApiError::from(other),
        })?;

        info!(user_id = %user.id, role = %user.role, "User registered");

        self.sign_in(&user)
    }

    pub async fn login(&self, actor: Option<&Actor>, req: LoginRequest) -> ApiResult<AuthResponse> {
        self.state.authorize(actor, Operation::Login)?;

        let email = req.email.trim().to_lowercase();
        let user = match self.state.db.users().get_by_email(&email).await? {
            Some(user) if verify_password(&req.password, &user.password_hash) => user,
            _ => {
                warn!(email = %email, "Failed login");
                return Err(invalid_credentials());
            }
        };

        if !user.is_active {
            warn!(user_id = %user.id, "Login to disabled account");
            return Err(ApiError::forbidden("Account is disabled"));
        }

        info!(user_id = %user.id, "User logged in");
        self.sign_in(&user)
    }

    /// The caller's own profile.
    pub async fn me(&self, actor: Option<&Actor>) -> ApiResult<UserProfile> {
        self.state.authorize(actor, Operation::Me)?;
        let actor = actor.ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

        let user = self
            .state
            .db
            .users()
            .get_by_id(&actor.user_id)
            .await?
            .ok_or_else(|| ApiError::unauthorized("User not found"))?;

        Ok(UserProfile::from(&user))
    }

    pub async fn list(&self, actor: Option<&Actor>) -> ApiResult<Vec<UserProfile>> {
        self.state.authorize(actor, Operation::ListUsers)?;
        let users = self.state.db.users().list().await?;
        Ok(users.iter().map(UserProfile::from).collect())
    }

    /// Disables an account. Its tokens stop working at the next request.
    pub async fn deactivate(&self, actor: Option<&Actor>, user_id: &str) -> ApiResult<UserProfile> {
        self.state.authorize(actor, Operation::DeactivateUser)?;
        let user_id = checked_id(user_id)?;

        if actor.is_some_and(|a| a.user_id == user_id) {
            return Err(ApiError::validation("Cannot deactivate your own account"));
        }

        let mut user = self
            .state
            .db
            .users()
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User", user_id))?;

        self.state.db.users().set_active(user_id, false).await?;
        user.is_active = false;
        info!(user_id = %user.id, "User deactivated");

        Ok(UserProfile::from(&user))
    }

    fn sign_in(&self, user: &User) -> ApiResult<AuthResponse> {
        Ok(AuthResponse {
            access_token: self.state.jwt.issue(user, self.state.clock.now())?,
            token_type: TOKEN_TYPE.to_string(),
            user: UserProfile::from(user),
        })
    }
}
