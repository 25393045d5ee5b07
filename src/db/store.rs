use async_trait::async_trait;
use uuid::Uuid;

use crate::db::models::{Movie, User, UserUpdate};
use crate::error::DatabaseError;

/// Read-only credential lookup used by login and token verification.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Exact, case-sensitive match on the username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;
}

#[async_trait]
pub trait UserStore: CredentialStore {
    async fn list_users(&self) -> Result<Vec<User>, DatabaseError>;

    /// Fails with [`DatabaseError::Duplicate`] if the username is taken.
    async fn create_user(&self, user: &User) -> Result<User, DatabaseError>;

    /// Returns `None` when no user has that username.
    async fn update_user(&self, username: &str, update: &UserUpdate) -> Result<Option<User>, DatabaseError>;

    async fn delete_user(&self, username: &str) -> Result<bool, DatabaseError>;

    /// Set semantics: adding a movie already in the list leaves it unchanged.
    async fn add_favorite(&self, username: &str, movie_id: Uuid) -> Result<Option<User>, DatabaseError>;

    async fn remove_favorite(&self, username: &str, movie_id: Uuid) -> Result<Option<User>, DatabaseError>;
}

#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn list_movies(&self) -> Result<Vec<Movie>, DatabaseError>;

    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, DatabaseError>;

    async fn find_by_genre(&self, genre: &str) -> Result<Vec<Movie>, DatabaseError>;

    async fn find_by_director(&self, director: &str) -> Result<Vec<Movie>, DatabaseError>;

    async fn insert_movie(&self, movie: &Movie) -> Result<Movie, DatabaseError>;
}
