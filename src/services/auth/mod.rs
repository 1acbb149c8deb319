pub mod factory;
pub mod identity;
pub mod jwt;

pub use factory::build_token_codec;
pub use identity::{VerifiedIdentity, extract_identity};
pub use jwt::{IdentityClaims, TokenCodec, TokenConfig, TokenError};
