use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::password::MAX_PASSWORD_BYTES;
use crate::auth::Identity;
use crate::db::models::{User, UserProfile, UserUpdate};
use crate::db::store::{CredentialStore, UserStore};
use crate::error::{AppError, DatabaseError, ValidationIssue};
use crate::AppState;

/// Body of `POST /users` and `PUT /users/{username}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
    pub birthday: Option<NaiveDate>,
}

impl UserRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut issues = Vec::new();

        if self.username.chars().count() < 4 {
            issues.push(ValidationIssue { field: "Username", message: "Username is required" });
        }
        if !self.username.chars().all(|c| c.is_ascii_alphanumeric()) {
            issues.push(ValidationIssue {
                field: "Username",
                message: "Username contains non alphanumeric characters - not allowed.",
            });
        }
        if self.password.is_empty() {
            issues.push(ValidationIssue { field: "Password", message: "Password is required" });
        }
        if self.password.len() > MAX_PASSWORD_BYTES {
            issues.push(ValidationIssue {
                field: "Password",
                message: "Password must be at most 72 bytes long",
            });
        }
        if !is_plausible_email(&self.email) {
            issues.push(ValidationIssue { field: "Email", message: "Email does not appear to be valid" });
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(AppError::ValidationError(issues))
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

fn already_exists(username: &str, err: DatabaseError) -> AppError {
    match err {
        DatabaseError::Duplicate => AppError::Conflict(format!("{username} already exists")),
        other => other.into(),
    }
}

fn user_not_found() -> AppError {
    AppError::NotFound("No user was found".to_string())
}

/// `POST /users`: open registration.
pub async fn register(
    req: web::Json<UserRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    req.validate()?;

    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(AppError::Conflict(format!("{} already exists", req.username)));
    }

    let password_hash = state.auth.hash_password(&req.password).await?;
    let user = User::new(req.username.clone(), password_hash, req.email.clone(), req.birthday);
    let user = state
        .users
        .create_user(&user)
        .await
        .map_err(|e| already_exists(&req.username, e))?;

    info!("Registered user: {}", user.username);
    Ok(HttpResponse::Created().json(user.profile()))
}

pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let users: Vec<UserProfile> = state.users.list_users().await?.iter().map(UserProfile::from).collect();
    Ok(HttpResponse::Ok().json(users))
}

pub async fn get_user(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = state
        .users
        .find_by_username(&path)
        .await?
        .ok_or_else(user_not_found)?;
    Ok(HttpResponse::Ok().json(user.profile()))
}

/// `PUT /users/{username}`: replace the account fields, re-hashing the new password.
pub async fn update_user(
    path: web::Path<String>,
    req: web::Json<UserRequest>,
    identity: web::ReqData<Identity>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    req.validate()?;

    let update = UserUpdate {
        username: req.username.clone(),
        password_hash: state.auth.hash_password(&req.password).await?,
        email: req.email.clone(),
        birthday: req.birthday,
    };

    let user = state
        .users
        .update_user(&path, &update)
        .await
        .map_err(|e| already_exists(&req.username, e))?
        .ok_or_else(user_not_found)?;

    info!("User {} updated by {}", path.as_str(), identity.username);
    Ok(HttpResponse::Ok().json(user.profile()))
}

pub async fn delete_user(
    path: web::Path<String>,
    identity: web::ReqData<Identity>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let username = path.into_inner();
    if !state.users.delete_user(&username).await? {
        return Err(AppError::NotFound(format!("{username} was not found")));
    }

    info!("User {} deleted by {}", username, identity.username);
    Ok(HttpResponse::Ok().body(format!("{username} was deleted.")))
}

pub async fn add_favorite(
    path: web::Path<(String, Uuid)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (username, movie_id) = path.into_inner();
    let user = state
        .users
        .add_favorite(&username, movie_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(HttpResponse::Ok().json(user.profile()))
}

pub async fn remove_favorite(
    path: web::Path<(String, Uuid)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (username, movie_id) = path.into_inner();
    let user = state
        .users
        .remove_favorite(&username, movie_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(HttpResponse::Ok().json(user.profile()))
}
