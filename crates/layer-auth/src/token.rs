//! HS256 bearer tokens.
//!
//! Tokens use the compact JWT layout: `base64url(header).base64url(claims).base64url(mac)`
//! where the MAC is HMAC-SHA256 over the first two segments.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{AuthError, Result};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    #[serde(default)]
    typ: String,
}

/// Claims carried by a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Subject identifier checked against the revocation store.
    pub user_id: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

/// Shared HMAC secret used to sign and verify tokens.
#[derive(Clone)]
pub struct TokenKey {
    secret: Vec<u8>,
}

impl fmt::Debug for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenKey")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl TokenKey {
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(AuthError::EmptySecret);
        }
        Ok(Self {
            secret: secret.to_vec(),
        })
    }

    fn mac(&self) -> Result<HmacSha256> {
        <HmacSha256 as Mac>::new_from_slice(&self.secret)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Issue a token for `subject` valid for `ttl` from now.
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String> {
        self.issue_at(subject, Utc::now(), ttl)
    }

    /// Issue a token as if it were minted at `issued_at`.
    pub fn issue_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String> {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::Signing("token lifetime is out of range".to_string()))?;
        let header = Header {
            alg: ALGORITHM.to_string(),
            typ: "JWT".to_string(),
        };
        let claims = Claims {
            user_id: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        let header = encode_segment(&header)?;
        let claims = encode_segment(&claims)?;
        let signing_input = format!("{header}.{claims}");

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{signing_input}.{signature}"))
    }

    /// Verify signature and expiry, returning the claims.
    ///
    /// Revocation is not checked here; see [`crate::AuthGuard`].
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Claims> {
        let mut parts = token.split('.');
        let (Some(header_segment), Some(claims_segment), Some(signature_segment), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(AuthError::Malformed("expected three segments".to_string()));
        };

        let header: Header = decode_segment(header_segment, "header")?;
        if header.alg != ALGORITHM {
            return Err(AuthError::UnsupportedAlgorithm(header.alg));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_segment)
            .map_err(|e| AuthError::Malformed(format!("signature: {e}")))?;
        let signing_input = &token[..header_segment.len() + 1 + claims_segment.len()];
        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        mac.verify_slice(&signature).map_err(|_| AuthError::BadSignature)?;

        let claims: Claims = decode_segment(claims_segment, "claims")?;
        if claims.user_id.trim().is_empty() {
            return Err(AuthError::Malformed("empty userId claim".to_string()));
        }
        if claims.exp <= now.timestamp() {
            return Err(AuthError::Expired {
                expired_at: claims.exp,
            });
        }
        Ok(claims)
    }
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_vec(value).map_err(|e| AuthError::Signing(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str, what: &str) -> Result<T> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| AuthError::Malformed(format!("{what}: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| AuthError::Malformed(format!("{what}: {e}")))
}

/// Short SHA-256 fingerprint used to reference a token in logs.
#[must_use]
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(&digest[..6])
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    fn key() -> TokenKey {
        TokenKey::new("test-secret").expect("key")
    }

    #[test]
    fn issued_token_verifies() {
        let token = key().issue("user-1", Duration::hours(1)).expect("issue");
        assert_eq!(token.split('.').count(), 3);
        let claims = key().verify(&token, Utc::now()).expect("verify");
        assert_eq!(claims.user_id, "user-1");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let issued = Utc::now() - Duration::hours(2);
        let token = key()
            .issue_at("user-1", issued, Duration::hours(1))
            .expect("issue");
        assert!(matches!(
            key().verify(&token, Utc::now()),
            Err(AuthError::Expired { .. })
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = key().issue("user-1", Duration::hours(1)).expect("issue");
        let other = TokenKey::new("other-secret").expect("key");
        assert_eq!(
            other.verify(&token, Utc::now()),
            Err(AuthError::BadSignature)
        );
    }

    #[test]
    fn tampered_claims_are_rejected() {
        let token = key().issue("user-1", Duration::hours(1)).expect("issue");
        let parts: Vec<&str> = token.split('.').collect();
        let forged_claims =
            URL_SAFE_NO_PAD.encode(br#"{"userId":"admin","iat":0,"exp":9999999999}"#);
        let forged = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);
        assert_eq!(
            key().verify(&forged, Utc::now()),
            Err(AuthError::BadSignature)
        );
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            key().verify("not-a-token", Utc::now()),
            Err(AuthError::Malformed(_))
        ));
        assert!(matches!(
            key().verify("a.b.c.d", Utc::now()),
            Err(AuthError::Malformed(_))
        ));
    }

    #[test]
    fn unbounded_lifetime_is_refused() {
        assert!(matches!(
            key().issue("user-1", Duration::MAX),
            Err(AuthError::Signing(_))
        ));
    }

    #[test]
    fn empty_secret_is_refused() {
        assert!(matches!(TokenKey::new(""), Err(AuthError::EmptySecret)));
    }

    #[test]
    fn debug_output_hides_secret() {
        assert!(!format!("{:?}", key()).contains("test-secret"));
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        assert_eq!(token_fingerprint("abc"), token_fingerprint("abc"));
        assert_eq!(token_fingerprint("abc").len(), 12);
        assert_ne!(token_fingerprint("abc"), token_fingerprint("abd"));
    }
}
