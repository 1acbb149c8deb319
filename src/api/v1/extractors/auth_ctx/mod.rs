/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - Give handlers the authenticated request context (AuthCtx)
 * - axum-specific code lives in core, the type itself in types
 *
 * Public API:
 * - AuthCtx
 * - AuthCtxExtractor
 * - ContextKey
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::{AuthCtx, ContextKey};
