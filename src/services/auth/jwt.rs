//! Session token codec (HS256 compact JWS).
//!
//! A token is `base64url(header).base64url(claims).base64url(mac)` carrying
//! `user_id`, `primitive_user_id`, `iat`, `exp` and `jti`.
//!
//! Verification order:
//! - structure + declared `alg` (must be exactly HS256, checked before any MAC work)
//! - signature
//! - required identity claims
//! - expiry against the caller's clock (`exp + leeway <= now` is expired)

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

/// The only algorithm this codec signs with or accepts.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

pub const DEFAULT_VALIDITY_MINUTES: i64 = 60;

/// Longest accepted validity window (366 days).
pub const MAX_VALIDITY_MINUTES: i64 = 366 * 24 * 60;

/// Token issuance / verification errors.
///
/// Display strings are layered with `:`; the HTTP boundary only ever shows the
/// last segment to clients. Detail fields are for logs.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid token configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("token issuance rejected: empty '{0}'")]
    EmptyIdentifier(&'static str),

    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("token verification failed: token is malformed")]
    Malformed { detail: String },

    #[error("token verification failed: unexpected signing method")]
    UnexpectedAlgorithm { declared: String },

    #[error("token verification failed: signature is invalid")]
    SignatureInvalid,

    #[error("token has invalid claims: token is expired")]
    Expired,

    #[error("token has invalid claims: empty '{0}' claim")]
    EmptyClaim(&'static str),
}

impl TokenError {
    fn malformed(detail: impl Into<String>) -> Self {
        Self::Malformed {
            detail: detail.into(),
        }
    }
}

/// Claims embedded in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub user_id: String,
    pub primitive_user_id: String,
    /// Unix seconds. The token is invalid at or after this instant.
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl IdentityClaims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Key material and lifetimes for [`TokenCodec`].
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    pub validity_minutes: i64,
    pub leeway_seconds: i64,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenConfig")
            .field("validity_minutes", &self.validity_minutes)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenConfig {
    pub fn new(secret: impl Into<Vec<u8>>, validity_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            validity_minutes,
            leeway_seconds: 0,
        }
    }

    pub fn with_leeway_seconds(mut self, leeway_seconds: i64) -> Self {
        self.leeway_seconds = leeway_seconds;
        self
    }
}

/// Issues and verifies HS256 session tokens.
///
/// Cheap to share behind an `Arc`; holds no mutable state.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    validity: ChronoDuration,
    leeway_seconds: i64,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &SIGNING_ALGORITHM)
            .field("validity", &self.validity)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(config: &TokenConfig) -> Result<Self, TokenError> {
        if config.secret.is_empty() {
            return Err(TokenError::InvalidConfig("secret must be non-empty"));
        }
        if config.validity_minutes <= 0 {
            return Err(TokenError::InvalidConfig("validity window must be positive"));
        }
        if config.validity_minutes > MAX_VALIDITY_MINUTES {
            return Err(TokenError::InvalidConfig("validity window is too long"));
        }
        let validity = ChronoDuration::try_minutes(config.validity_minutes)
            .ok_or(TokenError::InvalidConfig("validity window is out of range"))?;
        if config.leeway_seconds < 0 {
            return Err(TokenError::InvalidConfig("leeway must not be negative"));
        }

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        // Expiry is compared against the caller's clock in `verify_at`.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&config.secret),
            decoding_key: DecodingKey::from_secret(&config.secret),
            validation,
            validity,
            leeway_seconds: config.leeway_seconds,
        })
    }

    pub fn validity(&self) -> ChronoDuration {
        self.validity
    }

    /// Issue a token for `(user_id, primitive_user_id)` valid from now.
    pub fn issue(&self, user_id: &str, primitive_user_id: &str) -> Result<String, TokenError> {
        self.issue_at(user_id, primitive_user_id, Utc::now())
    }

    pub fn issue_at(
        &self,
        user_id: &str,
        primitive_user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        if user_id.trim().is_empty() {
            return Err(TokenError::EmptyIdentifier("user_id"));
        }
        if primitive_user_id.trim().is_empty() {
            return Err(TokenError::EmptyIdentifier("primitive_user_id"));
        }

        let Some(expires_at) = now.checked_add_signed(self.validity) else {
            error!(%now, validity = ?self.validity, "token expiry is out of range");
            return Err(TokenError::Signing("expiry is out of range".to_string()));
        };

        let claims = IdentityClaims {
            user_id: user_id.to_string(),
            primitive_user_id: primitive_user_id.to_string(),
            exp: expires_at.timestamp(),
            iat: Some(now.timestamp()),
            jti: Some(Uuid::new_v4().to_string()),
        };

        self.sign(&claims)
    }

    fn sign(&self, claims: &IdentityClaims) -> Result<String, TokenError> {
        let mut header = Header::new(SIGNING_ALGORITHM);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, user_id = %claims.user_id, "failed to sign session token");
            TokenError::Signing(e.to_string())
        })
    }

    /// Verify `token` against the current time.
    pub fn verify(&self, token: &str) -> Result<IdentityClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<IdentityClaims, TokenError> {
        let (declared, signature) = split_token(token)?;
        match declared.parse::<Algorithm>() {
            Ok(alg) if alg == SIGNING_ALGORITHM => {}
            _ => return Err(TokenError::UnexpectedAlgorithm { declared }),
        }
        // An edited signature segment is a bad signature even when it no longer decodes.
        URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenError::SignatureInvalid)?;

        let claims = jsonwebtoken::decode::<IdentityClaims>(token, &self.decoding_key, &self.validation)
            .map_err(map_jwt_error)?
            .claims;

        if claims.user_id.trim().is_empty() {
            return Err(TokenError::EmptyClaim("user_id"));
        }
        if claims.primitive_user_id.trim().is_empty() {
            return Err(TokenError::EmptyClaim("primitive_user_id"));
        }
        if claims.exp.saturating_add(self.leeway_seconds) <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Split a compact token into the `alg` it declares and its raw signature segment,
/// without trusting anything else in it.
fn split_token(token: &str) -> Result<(String, &str), TokenError> {
    let mut segments = token.split('.');
    let (Some(header), Some(_), Some(signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(TokenError::malformed("expected three segments"));
    };

    let raw = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|e| TokenError::malformed(format!("header is not base64url: {e}")))?;
    let header: RawHeader = serde_json::from_slice(&raw)
        .map_err(|e| TokenError::malformed(format!("header is not valid json: {e}")))?;

    Ok((header.alg, signature))
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidAlgorithm => TokenError::UnexpectedAlgorithm {
            declared: "unknown".to_string(),
        },
        _ => TokenError::malformed(err.to_string()),
    }
}
