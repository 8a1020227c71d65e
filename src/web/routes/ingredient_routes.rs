use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::db::services::ingredient_service;
use crate::web::models::recipe_models::IngredientResponse;
use crate::web::{AppError, AppState};

#[derive(Deserialize)]
pub struct IngredientSearchQuery {
    name: Option<String>,
}

async fn list_ingredients_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<IngredientSearchQuery>,
) -> Result<Json<Vec<IngredientResponse>>, AppError> {
    let ranked =
        ingredient_service::search_ingredients(&app_state.db_pool, query.name.as_deref()).await?;
    Ok(Json(
        ranked.iter().map(IngredientResponse::from_model).collect(),
    ))
}

async fn get_ingredient_handler(
    State(app_state): State<Arc<AppState>>,
    Path(ingredient_id): Path<i32>,
) -> Result<Json<IngredientResponse>, AppError> {
    let ingredient =
        ingredient_service::get_ingredient(&app_state.db_pool, ingredient_id).await?;
    Ok(Json(IngredientResponse::from_model(&ingredient)))
}

pub fn create_ingredients_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_ingredients_handler))
        .route("/{ingredient_id}", get(get_ingredient_handler))
}
