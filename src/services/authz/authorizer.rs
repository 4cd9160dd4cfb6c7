/*
 * Responsibility
 * - Orchestrate extractor -> verifier -> resolver and render the decision
 * - Fail closed: every failure kind, expected or not, becomes Deny
 * - Emit the audit record (attempt / allow with principal / deny with kind)
 */
use tracing::{debug, info, warn};

use crate::services::authz::bearer::extract_bearer_token;
use crate::services::authz::error::AuthzError;
use crate::services::authz::identity::{self, CallerIdentity};
use crate::services::authz::policy::AuthorizerDecision;
use crate::services::authz::verifier::TokenVerifier;

/// Outcome of one authorization attempt. The identity is present iff the
/// decision allows, so downstream code cannot pick up an identity from a
/// denied request.
#[derive(Debug)]
pub struct Authorization {
    decision: AuthorizerDecision,
    identity: Option<CallerIdentity>,
}

impl Authorization {
    pub fn decision(&self) -> &AuthorizerDecision {
        &self.decision
    }

    pub fn identity(&self) -> Option<&CallerIdentity> {
        self.identity.as_ref()
    }

    pub fn is_allowed(&self) -> bool {
        self.decision.is_allowed()
    }
}

/// Stateless decision maker. One instance per process, shared read-only;
/// each call is an independent computation over the header and the clock.
#[derive(Debug, Clone)]
pub struct RequestAuthorizer {
    verifier: TokenVerifier,
}

impl RequestAuthorizer {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    /// Render the allow/deny decision for a raw Authorization header.
    ///
    /// Never returns an error: any failure in the pipeline collapses to
    /// Deny with the placeholder principal. The failure kind is only
    /// visible in the audit log, not to the caller.
    pub fn authorize(&self, auth_header: Option<&str>) -> Authorization {
        debug!("authorizing request");

        match self.evaluate(auth_header) {
            Ok(identity) => {
                info!(principal = %identity, outcome = "allow", "request authorized");
                Authorization {
                    decision: AuthorizerDecision::allow(identity.as_str()),
                    identity: Some(identity),
                }
            }
            Err(err) => {
                warn!(kind = err.kind(), outcome = "deny", "request not authorized");
                Authorization {
                    decision: AuthorizerDecision::deny(),
                    identity: None,
                }
            }
        }
    }

    // Extractor -> verifier -> resolver, short-circuiting on first failure.
    fn evaluate(&self, auth_header: Option<&str>) -> Result<CallerIdentity, AuthzError> {
        let token = extract_bearer_token(auth_header)?;
        let claims = self.verifier.verify(token)?;
        identity::resolve(&claims)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_keys;
    use super::*;
    use crate::services::authz::policy::{ANONYMOUS_PRINCIPAL, Effect};

    fn authorizer() -> RequestAuthorizer {
        RequestAuthorizer::new(TokenVerifier::new(test_keys::TRUSTED_PUBLIC_PEM, 0).unwrap())
    }

    fn valid_header(sub: &str) -> String {
        let token = test_keys::sign_trusted(sub, test_keys::now() - 60, test_keys::now() + 3600);
        format!("Bearer {token}")
    }

    #[test]
    fn signed_token_round_trips_to_allow() {
        let auth = authorizer().authorize(Some(&valid_header("user-123")));
        assert!(auth.is_allowed());
        assert_eq!(auth.decision().principal_id(), "user-123");
        assert_eq!(auth.identity().unwrap().as_str(), "user-123");
    }

    #[test]
    fn absent_header_denies() {
        let auth = authorizer().authorize(None);
        assert_eq!(auth.decision().effect(), Effect::Deny);
        assert!(auth.identity().is_none());
    }

    #[test]
    fn basic_scheme_denies() {
        let auth = authorizer().authorize(Some("Basic xyz"));
        assert!(!auth.is_allowed());
    }

    #[test]
    fn token_shaped_garbage_denies_with_placeholder() {
        let auth = authorizer().authorize(Some("Bearer abc.def.ghi"));
        assert!(!auth.is_allowed());
        assert_eq!(auth.decision().principal_id(), ANONYMOUS_PRINCIPAL);
    }

    #[test]
    fn untrusted_signature_denies() {
        let token =
            test_keys::sign_untrusted("user-123", test_keys::now() - 60, test_keys::now() + 3600);
        let auth = authorizer().authorize(Some(&format!("Bearer {token}")));
        assert!(!auth.is_allowed());
    }

    #[test]
    fn expired_token_denies() {
        let token =
            test_keys::sign_trusted("user-123", test_keys::now() - 7200, test_keys::now() - 3600);
        let auth = authorizer().authorize(Some(&format!("Bearer {token}")));
        assert!(!auth.is_allowed());
    }

    #[test]
    fn alg_none_denies() {
        let auth = authorizer().authorize(Some(&format!(
            "Bearer {}",
            test_keys::ALG_NONE_TOKEN
        )));
        assert!(!auth.is_allowed());
    }

    #[test]
    fn missing_subject_denies() {
        let token = test_keys::sign_trusted_json(&serde_json::json!({
            "iat": test_keys::now() - 60,
            "exp": test_keys::now() + 3600,
        }));
        let auth = authorizer().authorize(Some(&format!("Bearer {token}")));
        assert!(!auth.is_allowed());
    }

    #[test]
    fn decision_is_idempotent_for_the_same_token() {
        let header = valid_header("user-123");
        let authorizer = authorizer();
        let first = authorizer.authorize(Some(&header));
        let second = authorizer.authorize(Some(&header));
        assert_eq!(first.decision(), second.decision());
    }
}
