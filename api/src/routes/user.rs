use crate::{
    AppState,
    auth::{AuthUser, create_token},
    dto::{AuthResponse, LoginRequest, SignupRequest, UserResponse},
    errors::ApiError,
    extract::AppJson,
    models::User,
};
use axum::{Json, extract::State, http::StatusCode};
use bcrypt::{hash, verify};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// POST /auth/signup
/// Body: { "email": "...", "name": "...", "password": "...", "image": "..." }
pub async fn signup(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    payload.validate()?;

    if state.store.user_by_email(&payload.email).is_some()
        || state.store.user_id_by_name(&payload.name).is_some()
    {
        return Err(ApiError::UserAlreadyExists);
    }

    let hashed_password = hash(&payload.password, state.config.bcrypt_cost)
        .map_err(|e| ApiError::InternalError(format!("Password hashing failed: {}", e)))?;

    let user = User {
        id: Uuid::new_v4(),
        email: payload.email,
        name: payload.name,
        image: payload.image,
        hashed_password,
        created_at: Utc::now().timestamp(),
    };

    let token = create_token(
        &user.id,
        &user.name,
        &state.config.jwt_secret,
        state.config.token_ttl_hours,
    )?;

    // The store re-checks uniqueness atomically.
    state.store.insert_user(user.clone())?;

    info!("New user registered: {}", user.name);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user.into(),
        }),
    ))
}

/// POST /auth/login
/// Body: { "email": "...", "password": "..." }
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.validate()?;

    let user = state
        .store
        .user_by_email(&payload.email)
        .ok_or(ApiError::InvalidCredentials)?;

    // Verify password
    let valid = verify(&payload.password, &user.hashed_password)
        .map_err(|e| ApiError::InternalError(format!("Password verification failed: {}", e)))?;

    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    let token = create_token(
        &user.id,
        &user.name,
        &state.config.jwt_secret,
        state.config.token_ttl_hours,
    )?;

    info!("User logged in: {}", user.name);

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// GET /users/me
/// Headers: Authorization: Bearer <token>
pub async fn get_current_user(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .store
        .user(&user.id)
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(user.into()))
}
