#![allow(dead_code)]

use axum_test::TestServer;
use feed_api::{
    AppState, app,
    config::Config,
    dto::{AuthResponse, SignupRequest, TweetView},
};
use uuid::Uuid;

pub fn create_test_server() -> TestServer {
    create_test_server_with(Config::for_tests())
}

pub fn create_test_server_with(config: Config) -> TestServer {
    TestServer::new(app(AppState::new(config))).unwrap()
}

pub fn signup_request(name: &str) -> SignupRequest {
    SignupRequest {
        email: format!("{}@example.com", name),
        name: name.to_string(),
        password: "correct horse battery".to_string(),
        image: Some(format!("https://img.example.com/{}.png", name)),
    }
}

/// Signs up a fresh user and returns its token and id.
pub async fn create_test_user(server: &TestServer) -> (String, Uuid) {
    let name = format!("u_{}", &Uuid::new_v4().simple().to_string()[..12]);
    let response = server.post("/auth/signup").json(&signup_request(&name)).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let auth = response.json::<AuthResponse>();
    (auth.token, auth.user.id)
}

pub async fn create_tweet(server: &TestServer, token: &str, text: &str) -> TweetView {
    let response = server
        .post("/tweets")
        .authorization_bearer(token)
        .json(&serde_json::json!({ "text": text }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<TweetView>()
}
