//! Enforcement point: bearer authorization for protected routes.
//!
//! Reads the Authorization header, asks the RequestAuthorizer for a
//! decision, and:
//! - Deny -> 401 with the opaque error envelope (the failure kind stays
//!   in the audit log)
//! - Allow -> AuthCtx (the resolved caller identity) goes into request
//!   extensions for handlers

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// Apply bearer authorization to every route in `router`.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8's from_fn cannot take a State extractor; from_fn_with_state
    // passes the state explicitly.
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    // The authorizer never errors: any failure is already a Deny decision,
    // and the audit record was emitted inside.
    let authorization = state.authorizer.authorize(auth_header);

    if !authorization.is_allowed() {
        return Err(AppError::Unauthorized);
    }

    let Some(identity) = authorization.identity() else {
        // identity is Some iff allowed; treat disagreement as a denial
        return Err(AppError::Unauthorized);
    };

    // middleware -> extractor hand-off
    req.extensions_mut().insert(AuthCtx::new(identity.clone()));

    Ok(next.run(req).await)
}
