use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use crate::db::services::tag_service;
use crate::web::models::recipe_models::TagResponse;
use crate::web::{AppError, AppState};

async fn list_tags_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<TagResponse>>, AppError> {
    let tags = tag_service::list_tags(&app_state.db_pool).await?;
    Ok(Json(tags.iter().map(TagResponse::from_model).collect()))
}

async fn get_tag_handler(
    State(app_state): State<Arc<AppState>>,
    Path(tag_id): Path<i32>,
) -> Result<Json<TagResponse>, AppError> {
    let tag = tag_service::get_tag(&app_state.db_pool, tag_id).await?;
    Ok(Json(TagResponse::from_model(&tag)))
}

pub fn create_tags_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tags_handler))
        .route("/{tag_id}", get(get_tag_handler))
}
