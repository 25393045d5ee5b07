use actix_web::{web, Either, HttpResponse};
use serde::Deserialize;
use crate::AppState;
use crate::error::AppError;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /login` with a JSON body, or with `?Username=..&Password=..`.
pub async fn login(
    req: Either<web::Json<LoginRequest>, web::Query<LoginRequest>>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = match req {
        Either::Left(json) => json.into_inner(),
        Either::Right(query) => query.into_inner(),
    };

    let response = state.auth.login(&req.username, &req.password).await?;
    info!("Login successful for user: {}", req.username);
    Ok(HttpResponse::Ok().json(response))
}
