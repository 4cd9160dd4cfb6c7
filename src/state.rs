/*
 * Responsibility
 * - Shared context attached to the Router (AppState)
 * - Clone-cheap by construction (PgPool and Arc internally)
 */
use std::sync::Arc;

use sqlx::PgPool;

use crate::services::authz::RequestAuthorizer;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub authorizer: Arc<RequestAuthorizer>,
}

impl AppState {
    pub fn new(db: PgPool, authorizer: Arc<RequestAuthorizer>) -> Self {
        Self { db, authorizer }
    }
}
