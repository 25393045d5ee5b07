use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::models::{Movie, User, UserUpdate};
use crate::db::store::{CredentialStore, MovieStore, UserStore};
use crate::error::DatabaseError;

/// Process-local store, keyed by username and movie id. Contents are lost on restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<RwLock<HashMap<String, User>>>,
    movies: Arc<RwLock<HashMap<Uuid, Movie>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify_user<F>(&self, username: &str, f: F) -> Option<User>
    where
        F: FnOnce(&mut User),
    {
        let mut users = self.users.write().await;
        let user = users.get_mut(username)?;
        f(user);
        user.updated_at = Utc::now();
        Some(user.clone())
    }
}

fn sorted_by_title(mut movies: Vec<Movie>) -> Vec<Movie> {
    movies.sort_by(|a, b| a.title.cmp(&b.title));
    movies
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.read().await.get(username).cloned())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn create_user(&self, user: &User) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(DatabaseError::Duplicate);
        }
        users.insert(user.username.clone(), user.clone());
        Ok(user.clone())
    }

    async fn update_user(&self, username: &str, update: &UserUpdate) -> Result<Option<User>, DatabaseError> {
        let mut users = self.users.write().await;
        if update.username != username && users.contains_key(&update.username) {
            return Err(DatabaseError::Duplicate);
        }

        let Some(mut user) = users.remove(username) else {
            return Ok(None);
        };
        user.username = update.username.clone();
        user.password_hash = update.password_hash.clone();
        user.email = update.email.clone();
        user.birthday = update.birthday;
        user.updated_at = Utc::now();

        users.insert(user.username.clone(), user.clone());
        Ok(Some(user))
    }

    async fn delete_user(&self, username: &str) -> Result<bool, DatabaseError> {
        Ok(self.users.write().await.remove(username).is_some())
    }

    async fn add_favorite(&self, username: &str, movie_id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self
            .modify_user(username, |user| {
                if !user.favorite_movies.contains(&movie_id) {
                    user.favorite_movies.push(movie_id);
                }
            })
            .await)
    }

    async fn remove_favorite(&self, username: &str, movie_id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self
            .modify_user(username, |user| user.favorite_movies.retain(|id| *id != movie_id))
            .await)
    }
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn list_movies(&self) -> Result<Vec<Movie>, DatabaseError> {
        Ok(sorted_by_title(self.movies.read().await.values().cloned().collect()))
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, DatabaseError> {
        Ok(self
            .movies
            .read()
            .await
            .values()
            .find(|m| m.title == title)
            .cloned())
    }

    async fn find_by_genre(&self, genre: &str) -> Result<Vec<Movie>, DatabaseError> {
        let movies = self.movies.read().await;
        Ok(sorted_by_title(
            movies.values().filter(|m| m.genre.name == genre).cloned().collect(),
        ))
    }

    async fn find_by_director(&self, director: &str) -> Result<Vec<Movie>, DatabaseError> {
        let movies = self.movies.read().await;
        Ok(sorted_by_title(
            movies.values().filter(|m| m.director.name == director).cloned().collect(),
        ))
    }

    async fn insert_movie(&self, movie: &Movie) -> Result<Movie, DatabaseError> {
        let mut movies = self.movies.write().await;
        if movies.contains_key(&movie.id) {
            return Err(DatabaseError::Duplicate);
        }
        movies.insert(movie.id, movie.clone());
        Ok(movie.clone())
    }
}
