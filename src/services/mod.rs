/*
 * Responsibility
 * - auth: session token codec + identity extraction
 * - permission: permission sources / authorizers used by the authorization stage
 */
pub mod auth;
pub mod permission;
