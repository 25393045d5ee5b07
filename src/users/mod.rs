//! User accounts and favorite lists.

pub mod handlers;

pub use handlers::UserRequest;
