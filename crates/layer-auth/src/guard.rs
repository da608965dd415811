//! Request authorization.

use std::fmt;
use std::sync::Arc;

use chrono::Utc;

use crate::error::{AuthError, Result};
use crate::revocation::RevocationStore;
use crate::token::{TokenKey, token_fingerprint};

const BEARER_SCHEME: &str = "Bearer";

/// Authenticated token subject (the `userId` claim).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subject(String);

impl Subject {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Gatekeeper for mutating requests.
///
/// Verifies bearer tokens against the shared key and consults the injected
/// revocation store on every check.
#[derive(Debug, Clone)]
pub struct AuthGuard {
    key: TokenKey,
    revocations: Arc<dyn RevocationStore>,
}

impl AuthGuard {
    pub fn new(key: TokenKey, revocations: Arc<dyn RevocationStore>) -> Self {
        Self { key, revocations }
    }

    pub fn key(&self) -> &TokenKey {
        &self.key
    }

    pub fn revocations(&self) -> &Arc<dyn RevocationStore> {
        &self.revocations
    }

    /// Verify an `authorization` header value and return its subject.
    ///
    /// Accepts a bare token or one prefixed with `Bearer `.
    pub fn check(&self, header: Option<&str>) -> Result<Subject> {
        let result = self.verify_header(header);
        if let Err(err) = &result {
            let fingerprint = header
                .map(extract_token)
                .filter(|token| !token.is_empty())
                .map(token_fingerprint);
            tracing::debug!(
                token = fingerprint.as_deref().unwrap_or("-"),
                reason = %err,
                "request not authorized"
            );
        }
        result
    }

    fn verify_header(&self, header: Option<&str>) -> Result<Subject> {
        let token = header
            .map(extract_token)
            .filter(|token| !token.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let claims = self.key.verify(token, Utc::now())?;
        if self.revocations.is_revoked(&claims.user_id) {
            return Err(AuthError::Revoked {
                subject: claims.user_id,
            });
        }
        Ok(Subject(claims.user_id))
    }

    /// Boolean form of [`check`](Self::check). Failures are logged, never raised.
    pub fn authorize(&self, header: Option<&str>) -> bool {
        self.check(header).is_ok()
    }

    /// Revoke every token issued to `subject`.
    pub fn revoke(&self, subject: &Subject) {
        self.revocations.revoke(subject.as_str());
    }
}

fn extract_token(header: &str) -> &str {
    let header = header.trim();
    let scheme = header.get(..BEARER_SCHEME.len());
    let rest = header.get(BEARER_SCHEME.len()..).unwrap_or_default();
    match scheme {
        Some(scheme)
            if scheme.eq_ignore_ascii_case(BEARER_SCHEME)
                && (rest.is_empty() || rest.starts_with(char::is_whitespace)) =>
        {
            rest.trim_start()
        }
        _ => header,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_prefix_is_optional() {
        assert_eq!(extract_token("Bearer abc"), "abc");
        assert_eq!(extract_token("  abc  "), "abc");
        assert_eq!(extract_token("Bearer   abc"), "abc");
        assert_eq!(extract_token("Bearer "), "");
        assert_eq!(extract_token("Bearerabc"), "Bearerabc");
    }

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(extract_token("bearer abc"), "abc");
        assert_eq!(extract_token("BEARER abc"), "abc");
        assert_eq!(extract_token("bearerabc"), "bearerabc");
        assert_eq!(extract_token("béarer abc"), "béarer abc");
    }

    #[test]
    fn subject_displays_raw_id() {
        assert_eq!(Subject("user-7".to_string()).to_string(), "user-7");
    }
}
