use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::get,
    Extension, Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    error::AppError,
    meals::{
        dto::{CreateMealRequest, UpdateMealRequest},
        metrics::MealMetrics,
        repo_types::{Meal, MealFields},
    },
    session::{require_session, SessionUser},
    state::AppState,
    validation::{uuid_param, JsonBody},
};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/", get(list_meals).post(create_meal))
        .route("/meals/metrics", get(get_metrics))
        .route(
            "/meals/:id",
            get(get_meal).put(update_meal).delete(delete_meal),
        )
        .route_layer(middleware::from_fn(require_session))
}

fn store_error(op: &'static str) -> impl Fn(anyhow::Error) -> AppError {
    move |e| {
        error!(error = %e, op, "meal store failed");
        AppError::Internal(e)
    }
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<Vec<Meal>>, AppError> {
    let meals = state.meals.list(&user).await.map_err(store_error("list"))?;
    Ok(Json(meals))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Meal>>, AppError> {
    let meals = state.meals.find(&user, &id).await.map_err(store_error("find"))?;
    if meals.is_empty() {
        warn!(user_id = %user.as_str(), %id, "meal not found for user");
        return Err(AppError::InvalidReference(
            "Invalid meal id, please check your meal id".into(),
        ));
    }
    Ok(Json(meals))
}

#[instrument(skip(state))]
pub async fn get_metrics(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
) -> Result<Json<MealMetrics>, AppError> {
    let ledger = state.meals.list(&user).await.map_err(store_error("list"))?;
    let in_diet = state
        .meals
        .count_within_diet(&user)
        .await
        .map_err(store_error("count_within_diet"))?;
    Ok(Json(MealMetrics::compute(&ledger, in_diet)))
}

#[instrument(skip(state, req))]
pub async fn create_meal(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    JsonBody(req): JsonBody<CreateMealRequest>,
) -> Result<StatusCode, AppError> {
    let fields = MealFields::try_from(req).map_err(|e| {
        warn!(error = %e, "invalid meal payload");
        e
    })?;
    let id = Uuid::new_v4();
    state
        .meals
        .insert(&user, id, fields)
        .await
        .map_err(store_error("insert"))?;
    info!(meal_id = %id, user_id = %user.as_str(), "meal created");
    Ok(StatusCode::CREATED)
}

#[instrument(skip(state, req))]
pub async fn update_meal(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateMealRequest>,
) -> Result<StatusCode, AppError> {
    let fields = MealFields::try_from(req).map_err(|e| {
        warn!(error = %e, "invalid meal payload");
        e
    })?;
    let id = uuid_param(&id, "id")?;

    let affected = state
        .meals
        .update(&user, id, fields)
        .await
        .map_err(store_error("update"))?;
    if affected == 0 {
        warn!(meal_id = %id, user_id = %user.as_str(), "update matched no meal");
        return Err(AppError::InvalidReference(
            "Nothing is updated, please try with another id".into(),
        ));
    }
    info!(meal_id = %id, user_id = %user.as_str(), "meal updated");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = uuid_param(&id, "id")?;
    let affected = state
        .meals
        .delete(&user, id)
        .await
        .map_err(store_error("delete"))?;
    if affected == 0 {
        warn!(meal_id = %id, user_id = %user.as_str(), "delete matched no meal");
        return Err(AppError::InvalidReference(
            "Nothing is deleted, please try with another id".into(),
        ));
    }
    info!(meal_id = %id, user_id = %user.as_str(), "meal deleted");
    Ok(StatusCode::NO_CONTENT)
}
