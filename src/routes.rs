use actix_web::middleware::from_fn;
use actix_web::{guard, web, HttpResponse};

use crate::auth::{handlers as auth, require_auth};
use crate::movies::handlers as movies;
use crate::users::handlers as users;

async fn welcome() -> HttpResponse {
    HttpResponse::Ok().body("Welcome to the myFlix application!")
}

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Register every route. Everything after the public block sits behind the bearer-token gate.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(welcome))
        .route("/health", web::get().to(health_check))
        .route("/login", web::post().to(auth::login))
        .service(
            web::resource("/users")
                .guard(guard::Post())
                .route(web::post().to(users::register)),
        )
        .service(
            web::scope("")
                .wrap(from_fn(require_auth))
                .route("/users", web::get().to(users::list_users))
                .service(
                    web::resource("/users/{username}")
                        .route(web::get().to(users::get_user))
                        .route(web::put().to(users::update_user))
                        .route(web::delete().to(users::delete_user)),
                )
                .service(
                    web::resource("/users/{username}/movies/{movie_id}")
                        .route(web::post().to(users::add_favorite))
                        .route(web::delete().to(users::remove_favorite)),
                )
                .route("/movies", web::get().to(movies::list_movies))
                .route("/movies/genre/{genre}", web::get().to(movies::movies_by_genre))
                .route("/movies/director/{director}", web::get().to(movies::movies_by_director))
                .route("/movies/{title}", web::get().to(movies::get_movie)),
        );
}
