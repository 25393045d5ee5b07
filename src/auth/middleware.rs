//! Bearer-token gate for protected routes.
//!
//! Runs before route dispatch: on success the resolved [`Identity`] is inserted into the
//! request extensions (read it with `web::ReqData<Identity>`); on any rejection the wrapped
//! service is never called and the caller gets the same 401 body whatever the reason.

use actix_web::body::{EitherBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use actix_web::middleware::Next;
use actix_web::{web, Error, HttpMessage};
use tracing::debug;

use crate::auth::service::Identity;
use crate::error::{AppError, AuthError};
use crate::AppState;

/// Authorization header value, if present and readable as text.
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|h| h.to_str().ok())
}

/// Resolve the caller of a request without touching the request itself.
pub async fn authenticate(headers: &HeaderMap, state: &AppState) -> Result<Identity, AuthError> {
    state.auth.verify_bearer(authorization_header(headers)).await
}

pub async fn require_auth<B: MessageBody>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error> {
    let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
        let err = AppError::InternalError("application state is not registered".into());
        return Ok(req.error_response(err).map_into_right_body());
    };

    match authenticate(req.headers(), &state).await {
        Ok(identity) => {
            debug!(user = %identity.username, path = %req.path(), "request authenticated");
            req.extensions_mut().insert(identity);
            next.call(req).await.map(ServiceResponse::map_into_left_body)
        }
        Err(rejection) => {
            if rejection.is_rejection() {
                debug!(reason = rejection.reason(), path = %req.path(), "request rejected");
            }
            Ok(req.error_response(AppError::from(rejection)).map_into_right_body())
        }
    }
}
