use actix_web::{web, HttpResponse};

use crate::db::store::MovieStore;
use crate::error::AppError;
use crate::AppState;

pub async fn list_movies(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let movies = state.movies.list_movies().await?;
    Ok(HttpResponse::Ok().json(movies))
}

pub async fn get_movie(
    title: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let movie = state
        .movies
        .find_by_title(&title)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} was not found", title.as_str())))?;
    Ok(HttpResponse::Ok().json(movie))
}

pub async fn movies_by_genre(
    genre: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let movies = state.movies.find_by_genre(&genre).await?;
    if movies.is_empty() {
        return Err(AppError::NotFound("No such genre".to_string()));
    }
    Ok(HttpResponse::Ok().json(movies))
}

pub async fn movies_by_director(
    director: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let movies = state.movies.find_by_director(&director).await?;
    if movies.is_empty() {
        return Err(AppError::NotFound("No such director".to_string()));
    }
    Ok(HttpResponse::Ok().json(movies))
}
