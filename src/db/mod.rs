//! Storage layer for the catalog service.
//!
//! The handlers and the authentication core only see the store traits; the
//! PostgreSQL and in-memory backends are chosen once at start-up.

pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use models::{Director, Genre, Movie, User, UserProfile, UserUpdate};
pub use postgres::PgStore;
pub use store::{CredentialStore, MovieStore, UserStore};
