/*
 * Responsibility
 * - Map verified claims to the caller identity used by business logic
 * - `sub` is passed through verbatim; owner records must use the same
 *   raw format (no case folding, no trimming)
 */
use crate::services::authz::error::AuthzError;
use crate::services::authz::verifier::VerifiedClaims;

/// The subject a request acts as. Ephemeral, one per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity(String);

impl CallerIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
impl CallerIdentity {
    /// Test-only constructor; production code only obtains a
    /// CallerIdentity through `resolve`.
    pub(crate) fn for_tests(sub: &str) -> Self {
        Self(sub.to_string())
    }
}

impl std::fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A verified token without an identity claim never passes through as an
/// anonymous caller.
pub fn resolve(claims: &VerifiedClaims) -> Result<CallerIdentity, AuthzError> {
    match claims.subject() {
        Some(sub) if !sub.is_empty() => Ok(CallerIdentity(sub.to_string())),
        _ => Err(AuthzError::MissingSubject),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_keys;
    use super::*;
    use crate::services::authz::verifier::TokenVerifier;

    fn claims_for(payload: &serde_json::Value) -> VerifiedClaims {
        let verifier = TokenVerifier::new(test_keys::TRUSTED_PUBLIC_PEM, 0).unwrap();
        verifier
            .verify(&test_keys::sign_trusted_json(payload))
            .unwrap()
    }

    #[test]
    fn subject_is_passed_through_verbatim() {
        let claims = claims_for(&serde_json::json!({
            "sub": "  User-123 ",
            "iat": test_keys::now() - 60,
            "exp": test_keys::now() + 3600,
        }));
        assert_eq!(resolve(&claims).unwrap().as_str(), "  User-123 ");
    }

    #[test]
    fn missing_subject_is_rejected() {
        let claims = claims_for(&serde_json::json!({
            "iat": test_keys::now() - 60,
            "exp": test_keys::now() + 3600,
        }));
        assert!(matches!(
            resolve(&claims),
            Err(AuthzError::MissingSubject)
        ));
    }

    #[test]
    fn empty_subject_is_rejected() {
        let claims = claims_for(&serde_json::json!({
            "sub": "",
            "iat": test_keys::now() - 60,
            "exp": test_keys::now() + 3600,
        }));
        assert!(matches!(
            resolve(&claims),
            Err(AuthzError::MissingSubject)
        ));
    }
}
