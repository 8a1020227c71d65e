use axum::{
    extract::{Extension, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::Query;
use std::sync::Arc;

use crate::db::entities::recipe_relation::RelationKind;
use crate::db::services::{recipe_service, relation_service, short_link_service, user_service};
use crate::web::middleware::auth::MaybeUser;
use crate::web::models::recipe_models::{
    RecipeListQuery, RecipePayload, RecipeResponse, RecipeShortResponse,
};
use crate::web::models::{AuthenticatedUser, Paginated};
use crate::web::permissions::{decide, Action, Decision, ResourceRef};
use crate::web::{AppError, AppState};

async fn list_recipes_handler(
    MaybeUser(viewer): MaybeUser,
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<RecipeListQuery>,
) -> Result<Json<Paginated<RecipeResponse>>, AppError> {
    let (count, results) =
        recipe_service::list_recipes(&app_state.db_pool, &params, viewer.map(|u| u.id)).await?;
    Ok(Json(Paginated { count, results }))
}

async fn get_recipe_handler(
    MaybeUser(viewer): MaybeUser,
    State(app_state): State<Arc<AppState>>,
    Path(recipe_id): Path<i32>,
) -> Result<Json<RecipeResponse>, AppError> {
    let recipe = recipe_service::get_recipe(&app_state.db_pool, recipe_id).await?;
    let response =
        recipe_service::build_recipe_response(&app_state.db_pool, &recipe, viewer.map(|u| u.id))
            .await?;
    Ok(Json(response))
}

async fn create_recipe_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<RecipePayload>,
) -> Result<(StatusCode, Json<RecipeResponse>), AppError> {
    let author = user_service::get_user(&app_state.db_pool, authenticated_user.id).await?;
    let response = recipe_service::create_recipe(&app_state.db_pool, &author, &payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_recipe_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(recipe_id): Path<i32>,
    Json(payload): Json<RecipePayload>,
) -> Result<Json<RecipeResponse>, AppError> {
    let recipe = recipe_service::get_recipe(&app_state.db_pool, recipe_id).await?;
    if decide(
        &authenticated_user,
        Action::Update,
        &ResourceRef::Recipe(&recipe),
    ) == Decision::Deny
    {
        return Err(AppError::Forbidden(
            "Only the author or an admin may edit this recipe.".to_string(),
        ));
    }
    let response = recipe_service::update_recipe(
        &app_state.db_pool,
        &recipe,
        &payload,
        authenticated_user.id,
    )
    .await?;
    Ok(Json(response))
}

async fn delete_recipe_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    let recipe = recipe_service::get_recipe(&app_state.db_pool, recipe_id).await?;
    if decide(
        &authenticated_user,
        Action::Delete,
        &ResourceRef::Recipe(&recipe),
    ) == Decision::Deny
    {
        return Err(AppError::Forbidden(
            "Only the author or an admin may delete this recipe.".to_string(),
        ));
    }
    recipe_service::delete_recipe(&app_state.db_pool, recipe).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_relation_add(
    app_state: &AppState,
    user_id: i32,
    recipe_id: i32,
    kind: RelationKind,
) -> Result<(StatusCode, Json<RecipeShortResponse>), AppError> {
    let recipe =
        relation_service::add_relation(&app_state.db_pool, user_id, recipe_id, kind).await?;
    Ok((
        StatusCode::CREATED,
        Json(RecipeShortResponse::from_model(&recipe)),
    ))
}

async fn add_favorite_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(recipe_id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeShortResponse>), AppError> {
    toggle_relation_add(
        &app_state,
        authenticated_user.id,
        recipe_id,
        RelationKind::Favorite,
    )
    .await
}

async fn remove_favorite_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    relation_service::remove_relation(
        &app_state.db_pool,
        authenticated_user.id,
        recipe_id,
        RelationKind::Favorite,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_to_cart_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(recipe_id): Path<i32>,
) -> Result<(StatusCode, Json<RecipeShortResponse>), AppError> {
    toggle_relation_add(
        &app_state,
        authenticated_user.id,
        recipe_id,
        RelationKind::ShoppingCart,
    )
    .await
}

async fn remove_from_cart_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    relation_service::remove_relation(
        &app_state.db_pool,
        authenticated_user.id,
        recipe_id,
        RelationKind::ShoppingCart,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn download_shopping_cart_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let text =
        recipe_service::shopping_list_text(&app_state.db_pool, authenticated_user.id).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"shopping-list.txt\"",
            ),
        ],
        text,
    ))
}

async fn get_link_handler(
    State(app_state): State<Arc<AppState>>,
    Path(recipe_id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    let recipe = recipe_service::get_recipe(&app_state.db_pool, recipe_id).await?;
    let code = short_link_service::ensure_short_link(&app_state.db_pool, &recipe).await?;
    let base = app_state.config.public_base_url.trim_end_matches('/');
    Ok(Json(
        serde_json::json!({ "short-link": format!("{base}/r/{code}") }),
    ))
}

/// Public redirect from a short code to the canonical recipe path.
pub async fn redirect_short_link_handler(
    State(app_state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let recipe_id = short_link_service::resolve_short_link(&app_state.db_pool, &code).await?;
    Ok((
        StatusCode::FOUND,
        [(header::LOCATION, format!("/recipes/{recipe_id}"))],
    ))
}

pub fn create_public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_recipes_handler))
        .route("/{recipe_id}", get(get_recipe_handler))
        .route("/{recipe_id}/get-link", get(get_link_handler))
}

pub fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_recipe_handler))
        .route(
            "/{recipe_id}",
            axum::routing::patch(update_recipe_handler).delete(delete_recipe_handler),
        )
        .route(
            "/{recipe_id}/favorite",
            post(add_favorite_handler).delete(remove_favorite_handler),
        )
        .route(
            "/{recipe_id}/shopping_cart",
            post(add_to_cart_handler).delete(remove_from_cart_handler),
        )
        .route(
            "/download_shopping_cart",
            get(download_shopping_cart_handler),
        )
}
