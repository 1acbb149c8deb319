use anyhow::{Context, Result};
use clap::Parser;

use service_auth::services::auth::{
    TokenCodec, TokenConfig,
    jwt::{DEFAULT_VALIDITY_MINUTES, MAX_VALIDITY_MINUTES},
};

/// Issue a session token for local testing, then verify it back.
///
/// Uses the same codec the services use, so a token printed here is accepted by
/// any service sharing the secret (until it expires).
#[derive(Parser, Debug)]
#[command(name = "token-gen", version, about)]
struct Args {
    /// Principal the token is issued to
    #[arg(long)]
    user_id: String,

    /// Owning entity permissions are looked up by
    #[arg(long)]
    primitive_user_id: String,

    /// HMAC secret shared with the services
    #[arg(long, env = "AUTH_JWT_SECRET", hide_env_values = true)]
    secret: String,

    /// Validity window in minutes
    #[arg(
        long,
        default_value_t = DEFAULT_VALIDITY_MINUTES,
        value_parser = clap::value_parser!(i64).range(1..=MAX_VALIDITY_MINUTES)
    )]
    validity_minutes: i64,

    /// Print only the token (no extra lines)
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let codec = TokenCodec::new(&TokenConfig::new(args.secret.as_bytes(), args.validity_minutes))
        .context("invalid token configuration")?;

    let token = codec
        .issue(&args.user_id, &args.primitive_user_id)
        .context("failed to issue token")?;

    if args.quiet {
        println!("{token}");
        return Ok(());
    }

    let claims = codec.verify(&token).context("freshly issued token did not verify")?;

    println!("token: {token}");
    println!("user_id: {}", claims.user_id);
    println!("primitive_user_id: {}", claims.primitive_user_id);
    if let Some(expires_at) = claims.expires_at() {
        println!("expires_at: {}", expires_at.to_rfc3339());
    }

    Ok(())
}
