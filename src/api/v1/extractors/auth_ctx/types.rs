/*
 * Responsibility
 * - The "authenticated context" type handlers see
 * - middleware verifies and stores it in request extensions; handlers
 *   only ever receive this type
 *
 * Notes
 * - Token verification and the allow/deny decision live in
 *   services/authz; this is the contract type, nothing more
 */

use crate::services::authz::CallerIdentity;

/// Context attached to an authorized request.
///
/// - `principal` is the raw `sub` from the verified token. Resource
///   ownership is compared against it verbatim.
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub principal: CallerIdentity,
}

impl AuthCtx {
    pub fn new(principal: CallerIdentity) -> Self {
        Self { principal }
    }
}
