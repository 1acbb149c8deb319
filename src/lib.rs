//! Shared authentication / authorization toolkit for HTTP microservices.
//!
//! - [`services::auth`]: HS256 session tokens (issue / verify) and identity extraction
//! - [`middleware::auth`]: the authenticate -> authorize request stages for axum
//! - [`services::permission`]: permission sources, including the remote
//!   authorization service client
//!
//! Typical mounting:
//!
//! ```ignore
//! let codec = service_auth::services::auth::build_token_codec(&config)?;
//! let authorizer: Arc<dyn Authorizer> = Arc::new(RemotePermissionClient::new(remote_config)?);
//! let protected = service_auth::middleware::protect(routes, codec, authorizer);
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
