use crate::{
    AppState,
    auth::{AuthUser, Viewer},
    dto::{CreateTweetRequest, TimelinePage, TimelineParams, TweetView},
    errors::ApiError,
    extract::{AppJson, AppPath, AppQuery},
    feed,
    models::Post,
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// POST /tweets
/// Headers: Authorization: Bearer <token>
/// Body: { "text": "..." }
pub async fn create_tweet(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateTweetRequest>,
) -> Result<(StatusCode, Json<TweetView>), ApiError> {
    payload.validate()?;
    state.check_rate_limit(user.id)?;

    let post = Post::new(user.id, payload.text);
    state.store.insert_post(post.clone())?;

    info!("Tweet created: {} by {}", post.id, user.name);

    let view = feed::tweet_view(&state.store, post, Some(user.id))?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /tweets?limit=10&cursor=<id>&author=<name>
pub async fn timeline(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    AppQuery(params): AppQuery<TimelineParams>,
) -> Result<Json<TimelinePage>, ApiError> {
    feed::timeline(&state.store, viewer, &params).map(Json)
}

/// GET /users/:name/tweets?limit=10&cursor=<id>
pub async fn author_timeline(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    AppPath(name): AppPath<String>,
    AppQuery(params): AppQuery<TimelineParams>,
) -> Result<Json<TimelinePage>, ApiError> {
    let params = TimelineParams {
        author: Some(name),
        ..params
    };
    feed::timeline(&state.store, viewer, &params).map(Json)
}

/// GET /tweets/:id
pub async fn get_tweet(
    State(state): State<AppState>,
    Viewer(viewer): Viewer,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<TweetView>, ApiError> {
    let post = state
        .store
        .post(&id)
        .ok_or_else(|| ApiError::NotFound("Tweet not found".into()))?;

    feed::tweet_view(&state.store, post, viewer).map(Json)
}

/// POST /tweets/:id/like
/// Headers: Authorization: Bearer <token>
pub async fn like_tweet(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.check_rate_limit(user.id)?;
    let likes = state.store.like(id, user.id)?;

    info!("Tweet liked: {} by {} ({} likes)", id, user.name, likes);

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /tweets/:id/like
/// Headers: Authorization: Bearer <token>
pub async fn unlike_tweet(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.check_rate_limit(user.id)?;
    let likes = state.store.unlike(id, user.id)?;

    info!("Tweet unliked: {} by {} ({} likes)", id, user.name, likes);

    Ok(StatusCode::NO_CONTENT)
}
