use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use std::sync::Arc;

use crate::db::services::{subscription_service, user_service};
use crate::web::middleware::auth::MaybeUser;
use crate::web::models::user_models::{AvatarPayload, ProfileResponse, SubscriptionResponse};
use crate::web::models::{AuthenticatedUser, PageParams, Paginated};
use crate::web::permissions::{decide, Action, Decision, ResourceRef};
use crate::web::{AppError, AppState};

async fn list_users_handler(
    MaybeUser(viewer): MaybeUser,
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<ProfileResponse>>, AppError> {
    let viewer_id = viewer.map(|u| u.id);
    let (count, results) = user_service::list_users(
        &app_state.db_pool,
        viewer_id,
        params.page(),
        params.limit(),
    )
    .await?;
    Ok(Json(Paginated { count, results }))
}

async fn get_user_handler(
    MaybeUser(viewer): MaybeUser,
    State(app_state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = user_service::get_user(&app_state.db_pool, user_id).await?;
    let profile =
        user_service::profile_response(&app_state.db_pool, viewer.map(|u| u.id), &user).await?;
    Ok(Json(profile))
}

async fn me_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = user_service::get_user(&app_state.db_pool, authenticated_user.id).await?;
    let profile =
        user_service::profile_response(&app_state.db_pool, Some(user.id), &user).await?;
    Ok(Json(profile))
}

async fn set_avatar_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<AvatarPayload>,
) -> Result<Json<serde_json::Value>, AppError> {
    if payload.avatar.is_empty() {
        return Err(AppError::InvalidInput(
            "avatar: must not be empty".to_string(),
        ));
    }
    let target = user_service::get_user(&app_state.db_pool, authenticated_user.id).await?;
    if decide(
        &authenticated_user,
        Action::Update,
        &ResourceRef::Profile(&target),
    ) == Decision::Deny
    {
        return Err(AppError::Forbidden(
            "Only the owner or an admin may edit this profile.".to_string(),
        ));
    }
    let user =
        user_service::set_avatar(&app_state.db_pool, authenticated_user.id, payload.avatar)
            .await?;
    Ok(Json(serde_json::json!({ "avatar": user.avatar })))
}

async fn remove_avatar_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<StatusCode, AppError> {
    let target = user_service::get_user(&app_state.db_pool, authenticated_user.id).await?;
    if decide(
        &authenticated_user,
        Action::Update,
        &ResourceRef::Profile(&target),
    ) == Decision::Deny
    {
        return Err(AppError::Forbidden(
            "Only the owner or an admin may edit this profile.".to_string(),
        ));
    }
    user_service::remove_avatar(&app_state.db_pool, authenticated_user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn subscribe_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(author_id): Path<i32>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), AppError> {
    let response =
        subscription_service::subscribe(&app_state.db_pool, authenticated_user.id, author_id)
            .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn unsubscribe_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(author_id): Path<i32>,
) -> Result<StatusCode, AppError> {
    subscription_service::unsubscribe(&app_state.db_pool, authenticated_user.id, author_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_subscriptions_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<PageParams>,
) -> Result<Json<Paginated<SubscriptionResponse>>, AppError> {
    let (count, results) = subscription_service::list_subscriptions(
        &app_state.db_pool,
        authenticated_user.id,
        params.page(),
        params.limit(),
    )
    .await?;
    Ok(Json(Paginated { count, results }))
}

pub fn create_public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_users_handler))
        .route("/{user_id}", get(get_user_handler))
}

pub fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(me_handler))
        .route(
            "/me/avatar",
            put(set_avatar_handler).delete(remove_avatar_handler),
        )
        .route("/subscriptions", get(list_subscriptions_handler))
        .route(
            "/{user_id}/subscribe",
            axum::routing::post(subscribe_handler).delete(unsubscribe_handler),
        )
}
