//! Server dependencies (using traits for testability)

use sqlx::PgPool;
use std::sync::Arc;

use crate::domains::auth::JwtService;
use crate::kernel::BaseAI;

/// Dependencies shared by every request handler and background task
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// Incident classifier
    pub ai: Arc<dyn BaseAI>,
    /// Verifies identity-provider tokens
    pub jwt_service: Arc<JwtService>,
    /// Region used for the national emergency-contact fallback
    pub emergency_region: String,
}

impl ServerDeps {
    pub fn new(
        db_pool: PgPool,
        ai: Arc<dyn BaseAI>,
        jwt_service: Arc<JwtService>,
        emergency_region: String,
    ) -> Self {
        Self {
            db_pool,
            ai,
            jwt_service,
            emergency_region,
        }
    }
}
