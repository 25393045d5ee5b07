//! Authentication for the catalog service.
//!
//! Local username/password login issuing signed bearer tokens, and the gate that
//! verifies those tokens on every protected route.

pub mod handlers;
pub mod middleware;
pub mod password;
mod service;

pub use middleware::require_auth;
pub use service::{bearer_token, AuthService, Claims, Identity, LoginResponse};
