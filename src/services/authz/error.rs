/*
 * Responsibility
 * - Failure taxonomy for the authorization core
 * - Every variant collapses to Deny at the RequestAuthorizer boundary;
 *   the variant itself is only for internal audit logs, never for callers
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("no authorization header")]
    MissingCredential,

    #[error("authorization header is not a bearer credential")]
    MalformedCredential,

    #[error("token signature did not verify")]
    InvalidSignature,

    #[error("token is expired")]
    ExpiredToken,

    #[error("token is not yet valid")]
    NotYetValid,

    #[error("token algorithm is not in the allow-list")]
    UnsupportedAlgorithm,

    #[error("verified token has no usable 'sub' claim")]
    MissingSubject,

    #[error("internal verification error: {0}")]
    InternalVerificationError(String),
}

impl AuthzError {
    /// Stable label used in audit records (never sent to the caller).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::MalformedCredential => "malformed_credential",
            Self::InvalidSignature => "invalid_signature",
            Self::ExpiredToken => "expired_token",
            Self::NotYetValid => "not_yet_valid",
            Self::UnsupportedAlgorithm => "unsupported_algorithm",
            Self::MissingSubject => "missing_subject",
            Self::InternalVerificationError(_) => "internal_verification_error",
        }
    }
}
