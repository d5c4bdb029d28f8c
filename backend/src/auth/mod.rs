//! Authentication module for managing user accounts, sessions, and access control.
//!
//! This module provides the public interface for credential login, session
//! token management, account registration and the session middleware.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;

// Re-exports for convenience
pub use errors::AuthError;
pub use middleware::require_session;
pub use models::SessionUser;
pub use routes::auth_router;
pub use service::SessionTokens;
