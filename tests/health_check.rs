use actix_web::{test, App, web};
use myflix_server::{AppState, Settings};
use chrono::DateTime;

#[actix_web::test]
async fn test_health_check() {
    let config = Settings::new_for_test().expect("Failed to load test config");
    let state = web::Data::new(AppState::in_memory(config));

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(myflix_server::configure)
    ).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());

    let body = test::read_body(resp).await;
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["status"], "healthy");
    assert!(DateTime::parse_from_rfc3339(
        json["timestamp"].as_str().unwrap()
    ).is_ok());
}

#[actix_web::test]
async fn test_welcome_is_public() {
    let config = Settings::new_for_test().expect("Failed to load test config");
    let state = web::Data::new(AppState::in_memory(config));

    let app = test::init_service(
        App::new()
            .app_data(state)
            .configure(myflix_server::configure)
    ).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "Welcome to the myFlix application!");
}
