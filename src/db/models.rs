use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

/// Stored user account. Carries the password hash, so it is never serialized to clients;
/// handlers respond with [`UserProfile`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
    pub favorite_movies: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, password_hash: String, email: String, birthday: Option<NaiveDate>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            email,
            birthday,
            favorite_movies: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }
}

/// Replacement values for `PUT /users/{username}`. The password is already hashed.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
    pub favorite_movies: Vec<Uuid>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            birthday: user.birthday,
            favorite_movies: user.favorite_movies.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Genre {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Director {
    pub name: String,
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Movie {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub genre: Genre,
    pub director: Director,
    #[serde(default)]
    pub actors: Vec<String>,
    pub image_path: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

// Genre and director are stored as flat columns.
impl FromRow<'_, PgRow> for Movie {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            genre: Genre {
                name: row.try_get("genre_name")?,
                description: row.try_get("genre_description")?,
            },
            director: Director {
                name: row.try_get("director_name")?,
                bio: row.try_get("director_bio")?,
            },
            actors: row.try_get("actors")?,
            image_path: row.try_get("image_path")?,
            featured: row.try_get("featured")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_omits_password_hash() {
        let user = User::new(
            "alice".into(),
            "$2b$10$abcdefghijklmnopqrstuuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ01".into(),
            "alice@example.com".into(),
            NaiveDate::from_ymd_opt(1990, 4, 1),
        );

        let json = serde_json::to_value(user.profile()).unwrap();
        assert_eq!(json["Username"], "alice");
        assert_eq!(json["Birthday"], "1990-04-01");
        assert!(json.get("PasswordHash").is_none());
        assert!(!json.to_string().contains("$2b$"));
    }

    #[test]
    fn test_movie_uses_catalog_field_names() {
        let json = serde_json::json!({
            "_id": Uuid::nil(),
            "Title": "Alien",
            "Description": "In space no one can hear you scream.",
            "Genre": { "Name": "Horror", "Description": "Scary" },
            "Director": { "Name": "Ridley Scott", "Bio": "English director" },
            "ImagePath": null
        });

        let movie: Movie = serde_json::from_value(json).unwrap();
        assert_eq!(movie.genre.name, "Horror");
        assert!(movie.actors.is_empty());
        assert!(!movie.featured);
    }
}
