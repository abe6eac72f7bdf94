use actix_web::{http::header, test, web, App};
use notekeeper_server::{configure_routes, AppState, MemoryStore, Settings};
use serde_json::json;
use std::sync::Arc;

fn test_state() -> web::Data<AppState> {
    let config = Settings::new_for_test().expect("Failed to load test config");
    web::Data::new(AppState::with_store(config, Arc::new(MemoryStore::new())).unwrap())
}

#[actix_web::test]
async fn test_register_and_login() {
    let app = test::init_service(
        App::new()
            .app_data(test_state())
            .configure(configure_routes),
    )
    .await;

    let register_response = test::TestRequest::post()
        .uri("/users/")
        .set_json(json!({
            "email": "alice@example.com",
            "password": "secret123"
        }))
        .send_request(&app)
        .await;

    assert_eq!(register_response.status(), 200);
    let user: serde_json::Value = test::read_body_json(register_response).await;
    assert_eq!(user["email"], "alice@example.com");
    assert_eq!(user["is_active"], true);
    assert!(user["id"].as_i64().is_some());
    assert!(user.get("hashed_password").is_none());
    assert!(user.get("password").is_none());

    let login_response = test::TestRequest::post()
        .uri("/token")
        .set_form([("username", "alice@example.com"), ("password", "secret123")])
        .send_request(&app)
        .await;

    assert_eq!(login_response.status(), 200);
    let body: serde_json::Value = test::read_body_json(login_response).await;
    assert_eq!(body["token_type"], "bearer");
    let token = body["access_token"].as_str().unwrap();

    let me_response = test::TestRequest::get()
        .uri("/users/me/")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .send_request(&app)
        .await;

    assert_eq!(me_response.status(), 200);
    let me: serde_json::Value = test::read_body_json(me_response).await;
    assert_eq!(me["id"], user["id"]);
    assert_eq!(me["email"], "alice@example.com");
}

#[actix_web::test]
async fn test_duplicate_registration() {
    let app = test::init_service(
        App::new()
            .app_data(test_state())
            .configure(configure_routes),
    )
    .await;

    let payload = json!({ "email": "alice@example.com", "password": "secret123" });

    let first = test::TestRequest::post()
        .uri("/users/")
        .set_json(&payload)
        .send_request(&app)
        .await;
    assert_eq!(first.status(), 200);

    let second = test::TestRequest::post()
        .uri("/users/")
        .set_json(&payload)
        .send_request(&app)
        .await;
    assert_eq!(second.status(), 400);

    let body: serde_json::Value = test::read_body_json(second).await;
    assert_eq!(body["error"]["message"], "Email already registered");
}

#[actix_web::test]
async fn test_invalid_login_is_generic() {
    let app = test::init_service(
        App::new()
            .app_data(test_state())
            .configure(configure_routes),
    )
    .await;

    test::TestRequest::post()
        .uri("/users/")
        .set_json(json!({ "email": "alice@example.com", "password": "secret123" }))
        .send_request(&app)
        .await;

    let mut bodies = Vec::new();
    for (username, password) in [
        ("nobody@example.com", "x"),
        ("alice@example.com", "wrongpassword"),
    ] {
        let response = test::TestRequest::post()
            .uri("/token")
            .set_form([("username", username), ("password", password)])
            .send_request(&app)
            .await;

        assert_eq!(response.status(), 401);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
        let body: serde_json::Value = test::read_body_json(response).await;
        bodies.push(body);
    }

    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[0]["error"]["message"], "Incorrect username or password");
}

#[actix_web::test]
async fn test_me_requires_token() {
    let app = test::init_service(
        App::new()
            .app_data(test_state())
            .configure(configure_routes),
    )
    .await;

    let missing = test::TestRequest::get()
        .uri("/users/me/")
        .send_request(&app)
        .await;
    assert_eq!(missing.status(), 401);
    assert_eq!(
        missing.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        "Bearer"
    );

    let garbage = test::TestRequest::get()
        .uri("/users/me/")
        .insert_header((header::AUTHORIZATION, "Bearer invalid_token"))
        .send_request(&app)
        .await;
    assert_eq!(garbage.status(), 401);

    let wrong_scheme = test::TestRequest::get()
        .uri("/users/me/")
        .insert_header((header::AUTHORIZATION, "Basic YWxpY2U6c2VjcmV0"))
        .send_request(&app)
        .await;
    assert_eq!(wrong_scheme.status(), 401);
}

#[actix_web::test]
async fn test_token_for_unknown_user() {
    let state = test_state();
    let token = state
        .auth
        .codec()
        .issue("ghost@example.com", chrono::Duration::minutes(5))
        .unwrap();

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(configure_routes),
    )
    .await;

    let response = test::TestRequest::get()
        .uri("/users/me/")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .send_request(&app)
        .await;

    assert_eq!(response.status(), 401);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["error"]["message"], "Could not validate credentials");
}

#[actix_web::test]
async fn test_expired_token_is_rejected() {
    let state = test_state();
    state.auth.register("alice@example.com", "secret123").await.unwrap();
    let token = state
        .auth
        .codec()
        .issue("alice@example.com", chrono::Duration::seconds(-1))
        .unwrap();

    let app = test::init_service(
        App::new()
            .app_data(state.clone())
            .configure(configure_routes),
    )
    .await;

    let response = test::TestRequest::get()
        .uri("/users/me/")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
        .send_request(&app)
        .await;

    assert_eq!(response.status(), 401);
}
