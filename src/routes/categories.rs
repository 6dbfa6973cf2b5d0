//! The routes for creating, viewing, renaming and deleting categories.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState, Error,
    models::{Category, CategoryData, DatabaseID},
    routes::run_with_deadline,
    stores::CategoryStore,
};

/// Create a new category.
pub async fn create_category(
    State(state): State<AppState>,
    Json(data): Json<CategoryData>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let store = state.category_store;
    let category = run_with_deadline(state.query_deadline, move || store.create(data)).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// List every category, ordered by name and then by ID.
pub async fn get_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, Error> {
    let store = state.category_store;
    let categories = run_with_deadline(state.query_deadline, move || store.get_all()).await?;

    Ok(Json(categories))
}

/// Get a single category by its ID.
pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<DatabaseID>,
) -> Result<Json<Category>, Error> {
    let store = state.category_store;
    let category = run_with_deadline(state.query_deadline, move || store.get(category_id)).await?;

    Ok(Json(category))
}

/// Rename an existing category.
pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<DatabaseID>,
    Json(data): Json<CategoryData>,
) -> Result<Json<Category>, Error> {
    let store = state.category_store;
    let category =
        run_with_deadline(state.query_deadline, move || store.update(category_id, data)).await?;

    Ok(Json(category))
}

/// Delete a category. Transactions that referenced it keep existing without
/// a category.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<DatabaseID>,
) -> Result<StatusCode, Error> {
    let store = state.category_store;
    run_with_deadline(state.query_deadline, move || store.delete(category_id)).await?;

    Ok(StatusCode::NO_CONTENT)
}
