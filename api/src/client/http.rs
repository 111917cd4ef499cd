use super::FeedSource;
use crate::{
    dto::{
        AuthResponse, CreateTweetRequest, LoginRequest, SignupRequest, TimelinePage,
        TimelineParams, TweetView, UserResponse,
    },
    errors::ApiError,
};
use reqwest::{Method, RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};
use uuid::Uuid;

/// HTTP client for the feed API. Holds the bearer token once signed in.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl FeedClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub async fn signup(&mut self, request: &SignupRequest) -> Result<UserResponse, ApiError> {
        let auth: AuthResponse = send(self.request(Method::POST, "/auth/signup").json(request)).await?;
        self.token = Some(auth.token);
        Ok(auth.user)
    }

    pub async fn login(&mut self, request: &LoginRequest) -> Result<UserResponse, ApiError> {
        let auth: AuthResponse = send(self.request(Method::POST, "/auth/login").json(request)).await?;
        self.token = Some(auth.token);
        Ok(auth.user)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

impl FeedSource for FeedClient {
    async fn timeline(&self, params: &TimelineParams) -> Result<TimelinePage, ApiError> {
        send(self.request(Method::GET, "/tweets").query(params)).await
    }

    async fn create(&self, text: &str) -> Result<TweetView, ApiError> {
        let body = CreateTweetRequest {
            text: text.to_string(),
        };
        send(self.request(Method::POST, "/tweets").json(&body)).await
    }

    async fn like(&self, tweet_id: Uuid) -> Result<(), ApiError> {
        let path = format!("/tweets/{}/like", tweet_id);
        send_empty(self.request(Method::POST, &path)).await
    }

    async fn unlike(&self, tweet_id: Uuid) -> Result<(), ApiError> {
        let path = format!("/tweets/{}/like", tweet_id);
        send_empty(self.request(Method::DELETE, &path)).await
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = checked(request).await?;
    response
        .json()
        .await
        .map_err(|e| ApiError::InternalError(format!("Invalid response body: {}", e)))
}

async fn send_empty(request: RequestBuilder) -> Result<(), ApiError> {
    checked(request).await.map(|_| ())
}

/// Sends the request and maps any non-success status back into an `ApiError`.
async fn checked(request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::InternalError(format!("Request failed: {}", e)))?;

    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    };
    Err(ApiError::from_status(status, message))
}
