use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::db::models::{Movie, User, UserUpdate};
use crate::db::store::{CredentialStore, MovieStore, UserStore};
use crate::error::DatabaseError;

const USER_COLUMNS: &str =
    "id, username, password_hash, email, birthday, favorite_movies, created_at, updated_at";

const MOVIE_COLUMNS: &str = "id, title, description, genre_name, genre_description, \
     director_name, director_bio, actors, image_path, featured";

/// PostgreSQL-backed user and movie store.
#[derive(Clone)]
pub struct PgStore {
    pool: Arc<PgPool>,
}

impl PgStore {
    pub async fn connect(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        Ok(Self { pool: Arc::new(pool) })
    }

    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations")
            .run(self.pool.as_ref())
            .await
            .map_err(|e| DatabaseError::QueryError(e.to_string()))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY username"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(users)
    }

    async fn create_user(&self, user: &User) -> Result<User, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, username, password_hash, email, birthday, favorite_movies, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.email)
        .bind(user.birthday)
        .bind(&user.favorite_movies)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn update_user(&self, username: &str, update: &UserUpdate) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET username = $2, password_hash = $3, email = $4, birthday = $5, updated_at = now()
            WHERE username = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(username)
        .bind(&update.username)
        .bind(&update.password_hash)
        .bind(&update.email)
        .bind(update.birthday)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn delete_user(&self, username: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_favorite(&self, username: &str, movie_id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET favorite_movies = CASE
                    WHEN $2 = ANY(favorite_movies) THEN favorite_movies
                    ELSE array_append(favorite_movies, $2)
                END,
                updated_at = now()
            WHERE username = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(username)
        .bind(movie_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn remove_favorite(&self, username: &str, movie_id: Uuid) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET favorite_movies = array_remove(favorite_movies, $2), updated_at = now()
            WHERE username = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(username)
        .bind(movie_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl MovieStore for PgStore {
    async fn list_movies(&self) -> Result<Vec<Movie>, DatabaseError> {
        let movies = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies ORDER BY title"
        ))
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(movies)
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Movie>, DatabaseError> {
        let movie = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE title = $1 LIMIT 1"
        ))
        .bind(title)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(movie)
    }

    async fn find_by_genre(&self, genre: &str) -> Result<Vec<Movie>, DatabaseError> {
        let movies = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE genre_name = $1 ORDER BY title"
        ))
        .bind(genre)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(movies)
    }

    async fn find_by_director(&self, director: &str) -> Result<Vec<Movie>, DatabaseError> {
        let movies = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE director_name = $1 ORDER BY title"
        ))
        .bind(director)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(movies)
    }

    async fn insert_movie(&self, movie: &Movie) -> Result<Movie, DatabaseError> {
        let movie = sqlx::query_as::<_, Movie>(&format!(
            r#"
            INSERT INTO movies ({MOVIE_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {MOVIE_COLUMNS}
            "#
        ))
        .bind(movie.id)
        .bind(&movie.title)
        .bind(&movie.description)
        .bind(&movie.genre.name)
        .bind(&movie.genre.description)
        .bind(&movie.director.name)
        .bind(&movie.director.bio)
        .bind(&movie.actors)
        .bind(&movie.image_path)
        .bind(movie.featured)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(movie)
    }
}
