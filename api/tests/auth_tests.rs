mod common;

use axum::http::StatusCode;
use common::{create_test_server, signup_request};
use feed_api::dto::{AuthResponse, UserResponse};

#[tokio::test]
async fn signup_then_login() {
    let server = create_test_server();

    let signup = server.post("/auth/signup").json(&signup_request("ada")).await;
    signup.assert_status(StatusCode::CREATED);
    let created = signup.json::<AuthResponse>();
    assert_eq!(created.user.name, "ada");

    let login = server
        .post("/auth/login")
        .json(&serde_json::json!({
            "email": "ada@example.com",
            "password": "correct horse battery"
        }))
        .await;
    login.assert_status(StatusCode::OK);
    let token = login.json::<AuthResponse>().token;

    let me = server.get("/users/me").authorization_bearer(&token).await;
    me.assert_status(StatusCode::OK);
    assert_eq!(me.json::<UserResponse>().id, created.user.id);
}

#[tokio::test]
async fn duplicate_signup_conflicts() {
    let server = create_test_server();
    server
        .post("/auth/signup")
        .json(&signup_request("grace"))
        .await
        .assert_status(StatusCode::CREATED);

    server
        .post("/auth/signup")
        .json(&signup_request("grace"))
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let server = create_test_server();
    server
        .post("/auth/signup")
        .json(&signup_request("linus"))
        .await
        .assert_status(StatusCode::CREATED);

    server
        .post("/auth/login")
        .json(&serde_json::json!({
            "email": "linus@example.com",
            "password": "not the password"
        }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invalid_signup_is_a_validation_error() {
    let server = create_test_server();
    let mut request = signup_request("ken");
    request.email = "not-an-email".into();

    server
        .post("/auth/signup")
        .json(&request)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_routes_need_a_token() {
    let server = create_test_server();

    server.get("/users/me").await.assert_status(StatusCode::UNAUTHORIZED);
    server
        .get("/users/me")
        .authorization_bearer("garbage")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
