/*
 * Responsibility
 * - Parse the raw Authorization header into the bearer token substring
 * - Shape checks only; no decoding, no trimming of the token itself
 */
use crate::services::authz::error::AuthzError;

const BEARER_PREFIX: &[u8] = b"bearer ";

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// - Absent or empty header: `MissingCredential`
/// - Present but not `Bearer <token>` (scheme is case-insensitive,
///   exactly one space): `MalformedCredential`
/// - Success: the substring after the separator, unmodified
pub fn extract_bearer_token(auth_header: Option<&str>) -> Result<&str, AuthzError> {
    let header = match auth_header {
        Some(h) if !h.is_empty() => h,
        _ => return Err(AuthzError::MissingCredential),
    };

    // Byte-wise compare: the prefix is ASCII, and a matching prefix
    // guarantees the split below lands on a char boundary.
    if header.len() <= BEARER_PREFIX.len()
        || !header.as_bytes()[..BEARER_PREFIX.len()].eq_ignore_ascii_case(BEARER_PREFIX)
    {
        return Err(AuthzError::MalformedCredential);
    }

    let token = &header[BEARER_PREFIX.len()..];
    if token.starts_with(' ') {
        // "Bearer  x" has more than one separator space
        return Err(AuthzError::MalformedCredential);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_header_is_missing() {
        assert!(matches!(
            extract_bearer_token(None),
            Err(AuthzError::MissingCredential)
        ));
    }

    #[test]
    fn empty_header_is_missing() {
        assert!(matches!(
            extract_bearer_token(Some("")),
            Err(AuthzError::MissingCredential)
        ));
    }

    #[test]
    fn wrong_scheme_is_malformed() {
        assert!(matches!(
            extract_bearer_token(Some("Basic xyz")),
            Err(AuthzError::MalformedCredential)
        ));
    }

    #[test]
    fn scheme_without_token_is_malformed() {
        assert!(matches!(
            extract_bearer_token(Some("Bearer ")),
            Err(AuthzError::MalformedCredential)
        ));
        assert!(matches!(
            extract_bearer_token(Some("Bearer")),
            Err(AuthzError::MalformedCredential)
        ));
    }

    #[test]
    fn double_separator_is_malformed() {
        assert!(matches!(
            extract_bearer_token(Some("Bearer  abc")),
            Err(AuthzError::MalformedCredential)
        ));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        assert_eq!(extract_bearer_token(Some("bearer abc")).unwrap(), "abc");
        assert_eq!(extract_bearer_token(Some("BEARER abc")).unwrap(), "abc");
        assert_eq!(extract_bearer_token(Some("Bearer abc")).unwrap(), "abc");
    }

    #[test]
    fn token_is_returned_unmodified() {
        assert_eq!(
            extract_bearer_token(Some("Bearer a.b.c==")).unwrap(),
            "a.b.c=="
        );
    }
}
