use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{error, instrument};

use crate::auth::extractors::CurrentUser;
use crate::categories::dto::Category;
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(get_all_categories))
        .route("/me/categories", get(get_user_categories))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/me/categories/:id", post(add_category))
        .route("/me/categories/:id", delete(remove_category))
}

/// Full catalogue; no auth required. Clients do their own paging.
#[instrument(skip(state))]
pub async fn get_all_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, (StatusCode, String)> {
    let categories = Category::list_all(&state.db).await.map_err(internal)?;
    Ok(Json(categories))
}

#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn get_user_categories(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Category>>, (StatusCode, String)> {
    let categories = Category::list_for_user(&state.db, user.0.id)
        .await
        .map_err(internal)?;
    Ok(Json(categories))
}

#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn add_category(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    if !Category::exists(&state.db, id).await.map_err(internal)? {
        return Err((StatusCode::NOT_FOUND, "Category not found".into()));
    }
    Category::add_for_user(&state.db, user.0.id, id)
        .await
        .map_err(internal)?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, user), fields(user_id = user.0.id))]
pub async fn remove_category(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, (StatusCode, String)> {
    Category::remove_for_user(&state.db, user.0.id, id)
        .await
        .map_err(internal)?;
    Ok(StatusCode::NO_CONTENT)
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "category operation failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "Some error occurred".into())
}
