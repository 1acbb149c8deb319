use super::jwt::{IdentityClaims, TokenCodec, TokenError};

/// Identity proven by a valid session token. Lives for one request only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub user_id: String,
    pub primitive_user_id: String,
}

impl From<IdentityClaims> for VerifiedIdentity {
    fn from(claims: IdentityClaims) -> Self {
        Self {
            user_id: claims.user_id,
            primitive_user_id: claims.primitive_user_id,
        }
    }
}

/// Turn a raw bearer credential into a verified identity.
///
/// Token errors are returned unchanged; deciding what the client sees is the
/// middleware's job.
pub fn extract_identity(codec: &TokenCodec, bearer: &str) -> Result<VerifiedIdentity, TokenError> {
    codec.verify(bearer).map(VerifiedIdentity::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::jwt::TokenConfig;

    fn codec() -> TokenCodec {
        TokenCodec::new(&TokenConfig::new(&b"identity-test-secret"[..], 10)).unwrap()
    }

    #[test]
    fn extracts_both_identifiers() {
        let codec = codec();
        let token = codec.issue("123456", "67b0e9c917ddc6790e248882").unwrap();

        let identity = extract_identity(&codec, &token).unwrap();
        assert_eq!(
            identity,
            VerifiedIdentity {
                user_id: "123456".to_string(),
                primitive_user_id: "67b0e9c917ddc6790e248882".to_string(),
            }
        );
    }

    #[test]
    fn propagates_codec_errors() {
        let codec = codec();
        assert!(matches!(
            extract_identity(&codec, "garbage"),
            Err(TokenError::Malformed { .. })
        ));
    }
}
