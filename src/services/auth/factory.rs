/// Factory: build the shared `TokenCodec` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::jwt::{TokenCodec, TokenError};

pub fn build_token_codec(config: &Config) -> Result<Arc<TokenCodec>, TokenError> {
    let codec = TokenCodec::new(&config.token_config())?;
    Ok(Arc::new(codec))
}
