/*
 * Responsibility
 * - auth: the two request stages (authenticate -> authorize)
 * - http: cross-cutting layers for a whole service (request id, tracing, limits)
 */
pub mod auth;
pub mod http;

pub use auth::protect;
