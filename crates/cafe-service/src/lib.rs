//! # cafe-service: Operations Layer for the Café Back Office
//!
//! The crate a transport mounts. Every operation takes the caller (if any),
//! checks it against the access policy, validates the request, runs the pure
//! calculators from `cafe-core` and persists through `cafe-db`.
//!
//! ## Request Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Request Path                                     │
//! │                                                                         │
//! │  Transport: "Authorization: Bearer …" + JSON body                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UserService::authenticate(token) ──► Option<Actor>                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                  cafe-service (THIS CRATE)                      │    │
//! │  │                                                                 │    │
//! │  │  AccessPolicy::authorize(actor, Operation::…)                   │    │
//! │  │       │                                                         │    │
//! │  │       ▼                                                         │    │
//! │  │  validate DTO ──► cafe-core (compute_bill, adjust_stock, …)     │    │
//! │  │       │                                                         │    │
//! │  │       ▼                                                         │    │
//! │  │  cafe-db repositories                                           │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Result<T, ApiError> ──► status code + JSON                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cafe_service::{AppState, ServiceConfig};
//! use cafe_service::services::BillService;
//!
//! let state = AppState::connect(ServiceConfig::from_env()?).await?;
//! let bills = BillService::new(state.clone());
//! let bill = bills.create(None, request).await?;
//! ```

use std::sync::Arc;

use tracing::info;

use cafe_db::Database;

pub mod auth;
pub mod clock;
pub mod config;
pub mod dto;
pub mod error;
pub mod policy;
pub mod services;

pub use auth::{Actor, JwtManager};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, ServiceConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use policy::{AccessPolicy, Operation, Requirement};

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    /// Database pool and repositories
    pub db: Database,

    pub config: ServiceConfig,

    pub clock: Arc<dyn Clock>,

    pub jwt: JwtManager,
}

impl AppState {
    /// Builds state around an already-open database.
    pub fn new(db: Database, config: ServiceConfig, clock: Arc<dyn Clock>) -> Arc<Self> {
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_lifetime_secs);

        Arc::new(AppState {
            db,
            config,
            clock,
            jwt,
        })
    }

    /// Opens the configured database (running migrations) on the wall clock.
    pub async fn connect(config: ServiceConfig) -> ApiResult<Arc<Self>> {
        let db = Database::new(config.db_config()).await?;
        info!(path = %config.database_path.display(), "Service state ready");
        Ok(AppState::new(db, config, Arc::new(SystemClock)))
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.config.access_policy
    }

    /// Runs the policy check for an operation.
    pub fn authorize(&self, actor: Option<&Actor>, operation: Operation) -> ApiResult<()> {
        self.policy().authorize(actor, operation)
    }
}
