/*
 * Responsibility
 * - Cryptographic verification of bearer tokens against the trust anchor
 * - Fixed asymmetric algorithm allow-list (never "none", never symmetric)
 * - Temporal validity: exp/nbf via jsonwebtoken, iat bounded here
 */
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::services::authz::error::AuthzError;

/// The only algorithms this service ever accepts. A token declaring
/// anything else (including `none` or an HMAC variant) is rejected
/// before its signature is even looked at.
const ALLOWED_ALGORITHMS: [Algorithm; 1] = [Algorithm::RS256];

/// Wire shape of the claims segment. Private to this module: nothing
/// outside can deserialize a payload and pretend it was verified.
#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    sub: Option<String>,
    iat: i64,
    exp: i64,
}

/// Claims that passed signature, algorithm and temporal checks.
///
/// Fields are private and the only constructor is `TokenVerifier::verify`,
/// so holding a `VerifiedClaims` is proof the token verified.
#[derive(Debug, Clone)]
pub struct VerifiedClaims {
    sub: Option<String>,
    iat: i64,
    exp: i64,
}

impl VerifiedClaims {
    pub fn subject(&self) -> Option<&str> {
        self.sub.as_deref()
    }

    pub fn issued_at(&self) -> i64 {
        self.iat
    }

    pub fn expires_at(&self) -> i64 {
        self.exp
    }
}

/// RS256 token verifier bound to the process-wide trust anchor.
///
/// Built once at startup from configuration; read-only afterwards.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    leeway_seconds: u64,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    /// `public_key_pem` is the RSA public key (SPKI PEM) of the token
    /// issuer. `leeway_seconds` is the accepted clock skew for all
    /// temporal claims; zero means exact.
    pub fn new(
        public_key_pem: &str,
        leeway_seconds: u64,
    ) -> Result<Self, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())?;

        // Validation::new pins the algorithm allow-list to its argument.
        let mut validation = Validation::new(ALLOWED_ALGORITHMS[0]);
        // Validation::new defaults leeway to 60s; we want the configured value.
        validation.leeway = leeway_seconds;
        validation.validate_nbf = true;

        Ok(Self {
            decoding_key,
            validation,
            leeway_seconds,
        })
    }

    /// Verify a bearer token and decode its claims.
    ///
    /// Pure over (token, trust anchor, wall clock); no I/O, no retries.
    pub fn verify(&self, token: &str) -> Result<VerifiedClaims, AuthzError> {
        let data = jsonwebtoken::decode::<RawClaims>(token, &self.decoding_key, &self.validation)
            .map_err(classify_jwt_error)?;

        // jsonwebtoken checks exp/nbf but not iat; a token "issued" in the
        // future (beyond leeway) is not yet valid.
        let now = Utc::now().timestamp();
        if data.claims.iat - self.leeway_seconds as i64 > now {
            return Err(AuthzError::NotYetValid);
        }

        Ok(VerifiedClaims {
            sub: data.claims.sub,
            iat: data.claims.iat,
            exp: data.claims.exp,
        })
    }
}

fn classify_jwt_error(e: jsonwebtoken::errors::Error) -> AuthzError {
    use jsonwebtoken::errors::ErrorKind;

    match e.kind() {
        ErrorKind::ExpiredSignature => AuthzError::ExpiredToken,
        ErrorKind::ImmatureSignature => AuthzError::NotYetValid,
        ErrorKind::InvalidSignature => AuthzError::InvalidSignature,
        // Declared algorithm outside the allow-list, or one that does not
        // fit the trust anchor's key family.
        ErrorKind::InvalidAlgorithm => AuthzError::UnsupportedAlgorithm,
        // Not three base64url segments, or segments that do not decode to
        // the expected JSON shapes (this also catches `alg: "none"`, which
        // is not a parseable algorithm at all; missing iat/exp land here
        // too).
        ErrorKind::InvalidToken
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::MissingRequiredClaim(_) => AuthzError::MalformedCredential,
        _ => AuthzError::InternalVerificationError(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_keys;
    use super::*;

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(test_keys::TRUSTED_PUBLIC_PEM, 0).unwrap()
    }

    #[test]
    fn valid_token_yields_claims() {
        let iat = test_keys::now() - 60;
        let exp = test_keys::now() + 3600;
        let token = test_keys::sign_trusted("user-123", iat, exp);
        let claims = verifier().verify(&token).unwrap();
        assert_eq!(claims.subject(), Some("user-123"));
        assert_eq!(claims.issued_at(), iat);
        assert_eq!(claims.expires_at(), exp);
    }

    #[test]
    fn token_signed_by_unknown_key_is_invalid_signature() {
        let token =
            test_keys::sign_untrusted("user-123", test_keys::now() - 60, test_keys::now() + 3600);
        assert!(matches!(
            verifier().verify(&token),
            Err(AuthzError::InvalidSignature)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token =
            test_keys::sign_trusted("user-123", test_keys::now() - 7200, test_keys::now() - 3600);
        assert!(matches!(
            verifier().verify(&token),
            Err(AuthzError::ExpiredToken)
        ));
    }

    #[test]
    fn expired_token_within_leeway_is_accepted() {
        let token =
            test_keys::sign_trusted("user-123", test_keys::now() - 7200, test_keys::now() - 30);
        let verifier = TokenVerifier::new(test_keys::TRUSTED_PUBLIC_PEM, 120).unwrap();
        assert!(verifier.verify(&token).is_ok());
    }

    #[test]
    fn future_issued_at_is_not_yet_valid() {
        let token = test_keys::sign_trusted(
            "user-123",
            test_keys::now() + 3600,
            test_keys::now() + 7200,
        );
        assert!(matches!(
            verifier().verify(&token),
            Err(AuthzError::NotYetValid)
        ));
    }

    #[test]
    fn alg_none_never_verifies() {
        // "none" is not even a parseable algorithm; whichever kind it
        // classifies as, it must fail
        assert!(verifier().verify(test_keys::ALG_NONE_TOKEN).is_err());
    }

    #[test]
    fn symmetric_alg_is_unsupported() {
        let token = test_keys::sign_hs256("user-123", test_keys::now(), test_keys::now() + 3600);
        assert!(matches!(
            verifier().verify(&token),
            Err(AuthzError::UnsupportedAlgorithm)
        ));
    }

    #[test]
    fn token_shaped_garbage_is_malformed() {
        assert!(matches!(
            verifier().verify("abc.def.ghi"),
            Err(AuthzError::MalformedCredential)
        ));
    }

    #[test]
    fn missing_temporal_claims_are_malformed() {
        // signed, but the payload has no iat
        let token = test_keys::sign_trusted_json(
            &serde_json::json!({ "sub": "user-123", "exp": test_keys::now() + 3600 }),
        );
        assert!(matches!(
            verifier().verify(&token),
            Err(AuthzError::MalformedCredential)
        ));
    }

    #[test]
    fn missing_sub_still_verifies() {
        // presence of an identity is the resolver's concern, not the verifier's
        let token = test_keys::sign_trusted_json(&serde_json::json!({
            "iat": test_keys::now() - 60,
            "exp": test_keys::now() + 3600,
        }));
        let claims = verifier().verify(&token).unwrap();
        assert_eq!(claims.subject(), None);
    }
}
