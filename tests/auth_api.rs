use actix_web::{test, web, App};
use chrono::{Duration, Utc};
use myflix_server::auth::Claims;
use myflix_server::{configure, AppState, CredentialStore, Settings};
use serde_json::json;

fn test_state() -> AppState {
    AppState::in_memory(Settings::new_for_test().expect("Failed to load test config"))
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_register_login_and_access_protected_route() {
    let state = test_state();
    let app = test_app!(state);

    let register_response = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({
            "Username": "alice",
            "Password": "Secret123",
            "Email": "alice@example.com",
            "Birthday": "1990-04-01"
        }))
        .send_request(&app)
        .await;
    assert_eq!(register_response.status(), 201);
    let profile: serde_json::Value = test::read_body_json(register_response).await;
    assert_eq!(profile["Username"], "alice");
    assert!(profile.get("Password").is_none());

    let login_response = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "Username": "alice", "Password": "Secret123" }))
        .send_request(&app)
        .await;
    assert_eq!(login_response.status(), 200);
    let login_body: serde_json::Value = test::read_body_json(login_response).await;
    assert_eq!(login_body["user"]["Username"], "alice");
    let token = login_body["token"].as_str().expect("token in login response").to_string();

    let protected_response = test::TestRequest::get()
        .uri("/users/alice")
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .send_request(&app)
        .await;
    assert_eq!(protected_response.status(), 200);
    let user: serde_json::Value = test::read_body_json(protected_response).await;
    assert_eq!(user["Username"], "alice");
    assert_eq!(user["Email"], "alice@example.com");

    let anonymous_response = test::TestRequest::get()
        .uri("/users/alice")
        .send_request(&app)
        .await;
    assert_eq!(anonymous_response.status(), 401);

    let expired = state
        .auth
        .encode_claims(&Claims::new("alice", Utc::now() - Duration::hours(2), Duration::hours(1)))
        .unwrap();
    let expired_response = test::TestRequest::get()
        .uri("/users/alice")
        .insert_header(("Authorization", format!("Bearer {}", expired)))
        .send_request(&app)
        .await;
    assert_eq!(expired_response.status(), 401);
}

#[actix_web::test]
async fn test_login_with_query_parameters() {
    let state = test_state();
    let app = test_app!(state);

    let response = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "Username": "carol1", "Password": "pw", "Email": "carol@example.com" }))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 201);

    let response = test::TestRequest::post()
        .uri("/login?Username=carol1&Password=pw")
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert!(body["token"].as_str().is_some());
}

#[actix_web::test]
async fn test_invalid_login_is_uniform() {
    let state = test_state();
    let app = test_app!(state);

    test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "Username": "alice", "Password": "Secret123", "Email": "alice@example.com" }))
        .send_request(&app)
        .await;

    let unknown_user = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "Username": "nonexistent", "Password": "Secret123" }))
        .send_request(&app)
        .await;
    let wrong_password = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "Username": "alice", "Password": "wrongpassword" }))
        .send_request(&app)
        .await;

    assert_eq!(unknown_user.status(), 400);
    assert_eq!(wrong_password.status(), 400);

    let unknown_body: serde_json::Value = test::read_body_json(unknown_user).await;
    let wrong_body: serde_json::Value = test::read_body_json(wrong_password).await;
    assert_eq!(unknown_body, wrong_body);
}

#[actix_web::test]
async fn test_rejections_are_uniform_401() {
    let state = test_state();
    let app = test_app!(state);

    let other_secret = {
        let mut config = Settings::new_for_test().unwrap();
        config.auth.jwt_secret = "some_other_secret".into();
        AppState::in_memory(config).auth.issue_token("alice").unwrap()
    };
    let ghost = state.auth.issue_token("ghost").unwrap();

    let headers = [
        None,
        Some("Bearer".to_string()),
        Some("Token abc".to_string()),
        Some("Bearer not.a.jwt".to_string()),
        Some(format!("Bearer {}", other_secret)),
        Some(format!("Bearer {}", ghost)),
    ];

    let mut bodies = Vec::new();
    for header in headers {
        let mut req = test::TestRequest::get().uri("/movies");
        if let Some(value) = header {
            req = req.insert_header(("Authorization", value));
        }
        let response = req.send_request(&app).await;
        assert_eq!(response.status(), 401);
        let body: serde_json::Value = test::read_body_json(response).await;
        bodies.push(body);
    }

    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(bodies[0]["error"]["message"], "Unauthorized");
}

#[actix_web::test]
async fn test_invalid_registration() {
    let state = test_state();
    let app = test_app!(state);

    let response = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({
            "Username": "al",
            "Password": "",
            "Email": "not-an-email"
        }))
        .send_request(&app)
        .await;
    assert_eq!(response.status(), 422);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["errors"].as_array().map(Vec::len), Some(3));
}

#[actix_web::test]
async fn test_duplicate_registration() {
    let state = test_state();
    let app = test_app!(state);
    let body = json!({ "Username": "alice", "Password": "Secret123", "Email": "alice@example.com" });

    let first = test::TestRequest::post().uri("/users").set_json(&body).send_request(&app).await;
    assert_eq!(first.status(), 201);

    let second = test::TestRequest::post().uri("/users").set_json(&body).send_request(&app).await;
    assert_eq!(second.status(), 400);
    let error: serde_json::Value = test::read_body_json(second).await;
    assert_eq!(error["error"]["message"], "alice already exists");
}

#[actix_web::test]
async fn test_stored_password_is_hashed() {
    let state = test_state();
    let app = test_app!(state);

    test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "Username": "alice", "Password": "Secret123", "Email": "alice@example.com" }))
        .send_request(&app)
        .await;

    let stored = state.users.find_by_username("alice").await.unwrap().unwrap();
    assert_ne!(stored.password_hash, "Secret123");
    assert!(stored.password_hash.starts_with("$2b$"));
}

#[actix_web::test]
async fn test_password_beyond_bcrypt_limit() {
    let state = test_state();
    let app = test_app!(state);
    let at_limit = "a".repeat(72);

    let too_long = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({
            "Username": "dave",
            "Password": format!("{at_limit}X"),
            "Email": "dave@example.com"
        }))
        .send_request(&app)
        .await;
    assert_eq!(too_long.status(), 422);

    let registered = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "Username": "dave", "Password": &at_limit, "Email": "dave@example.com" }))
        .send_request(&app)
        .await;
    assert_eq!(registered.status(), 201);

    let extended = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "Username": "dave", "Password": format!("{at_limit}Y") }))
        .send_request(&app)
        .await;
    assert_eq!(extended.status(), 400);

    let exact = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "Username": "dave", "Password": &at_limit }))
        .send_request(&app)
        .await;
    assert_eq!(exact.status(), 200);
}
