use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use staybook_shared::{Identity, IdentityRef};
use uuid::Uuid;

use crate::{CoreError, CoreResult};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

/// JWT payload of a session token. Never carries password material.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionClaims {
    pub id: String,
    pub email: String,
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

/// Issues and verifies stateless session tokens signed with the process-wide
/// secret. Nothing is stored server side, so a token stays valid until it
/// expires (when a TTL is configured) or the secret changes.
#[derive(Clone)]
pub struct SessionAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl SessionAuthenticator {
    /// `ttl_seconds = None` issues tokens without an `exp` claim.
    pub fn new(secret: &str, ttl_seconds: Option<u64>) -> CoreResult<Self> {
        if secret.is_empty() {
            return Err(CoreError::ValidationError("session secret must not be empty".to_string()));
        }

        let ttl = match ttl_seconds {
            None => None,
            Some(seconds) => Some(
                i64::try_from(seconds)
                    .ok()
                    .and_then(Duration::try_seconds)
                    .ok_or_else(|| {
                        CoreError::ValidationError(format!(
                            "session ttl of {} seconds is out of range",
                            seconds
                        ))
                    })?,
            ),
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = ttl.is_some();
        if ttl.is_some() {
            validation.set_required_spec_claims(&["exp"]);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    /// Mint a token for an identity whose password has already been checked.
    pub fn issue(&self, identity: &Identity) -> CoreResult<String> {
        self.issue_at(identity, Utc::now())
    }

    pub fn issue_at(&self, identity: &Identity, now: DateTime<Utc>) -> CoreResult<String> {
        let exp = match self.ttl {
            None => None,
            Some(ttl) => Some(
                now.checked_add_signed(ttl)
                    .ok_or_else(|| CoreError::InternalError("Session expiry overflows".into()))?
                    .timestamp(),
            ),
        };

        let claims = SessionClaims {
            id: identity.id.to_string(),
            email: identity.email.clone(),
            iat: now.timestamp(),
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| CoreError::InternalError(format!("Token encoding failed: {}", e)))
    }

    /// Check signature (and expiry when configured) and recover the caller.
    /// Does not consult storage.
    pub fn verify(&self, credential: &str) -> CoreResult<IdentityRef> {
        if credential.is_empty() {
            return Err(CoreError::InvalidCredential);
        }

        let claims = decode::<SessionClaims>(credential, &self.decoding_key, &self.validation)
            .map_err(|e| {
                // Kind only: the token itself is a bearer secret.
                tracing::debug!(kind = ?e.kind(), "Session token rejected");
                CoreError::InvalidCredential
            })?
            .claims;

        let id = Uuid::parse_str(&claims.id).map_err(|_| CoreError::InvalidCredential)?;
        if claims.email.is_empty() {
            return Err(CoreError::InvalidCredential);
        }

        Ok(IdentityRef {
            id,
            email: claims.email,
        })
    }

    /// The empty credential written over the client's cookie at logout.
    pub fn clear(&self) -> String {
        String::new()
    }
}
