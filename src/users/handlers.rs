use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    session::session_cookie,
    state::AppState,
    users::{
        dto::CreateUserRequest,
        repo_types::{NewUser, User},
    },
    validation::JsonBody,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/", get(list_users).post(create_user))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = state.users.list().await.map_err(|e| {
        error!(error = %e, "list users failed");
        AppError::Internal(e)
    })?;
    Ok(Json(users))
}

/// Persists the user first; the session cookie is only attached once the
/// row exists.
#[instrument(skip(state, jar, req))]
pub async fn create_user(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<(StatusCode, CookieJar), AppError> {
    let req = req.validate().map_err(|e| {
        warn!(error = %e, "invalid user payload");
        e
    })?;

    let id = Uuid::new_v4();
    state
        .users
        .insert(NewUser {
            id,
            name: req.name,
            gender: req.gender,
            age: req.age,
        })
        .await
        .map_err(|e| {
            error!(error = %e, "create user failed");
            AppError::Internal(e)
        })?;

    info!(user_id = %id, "user registered");
    let jar = jar.add(session_cookie(id, state.config.session_max_age_secs));
    Ok((StatusCode::CREATED, jar))
}
