use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::db::entities::{
    prelude::{Subscription, User},
    subscription, user,
};
use crate::web::error::AppError;
use crate::web::models::user_models::ProfileResponse;

pub async fn get_user(db: &DatabaseConnection, user_id: i32) -> Result<user::Model, AppError> {
    User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))
}

/// True when `viewer` follows `author_id`. Anonymous viewers follow nobody.
pub async fn is_subscribed(
    db: &DatabaseConnection,
    viewer: Option<i32>,
    author_id: i32,
) -> Result<bool, AppError> {
    let Some(viewer_id) = viewer else {
        return Ok(false);
    };
    let existing = Subscription::find()
        .filter(subscription::Column::UserId.eq(viewer_id))
        .filter(subscription::Column::AuthorId.eq(author_id))
        .one(db)
        .await?;
    Ok(existing.is_some())
}

pub async fn profile_response(
    db: &DatabaseConnection,
    viewer: Option<i32>,
    user: &user::Model,
) -> Result<ProfileResponse, AppError> {
    let subscribed = is_subscribed(db, viewer, user.id).await?;
    Ok(ProfileResponse::from_model(user, subscribed))
}

pub async fn list_users(
    db: &DatabaseConnection,
    viewer: Option<i32>,
    page: u64,
    limit: u64,
) -> Result<(u64, Vec<ProfileResponse>), AppError> {
    let paginator = User::find()
        .order_by_asc(user::Column::Username)
        .paginate(db, limit);
    let total = paginator.num_items().await?;
    let users = paginator.fetch_page(page.saturating_sub(1)).await?;

    let mut profiles = Vec::with_capacity(users.len());
    for user in &users {
        profiles.push(profile_response(db, viewer, user).await?);
    }
    Ok((total, profiles))
}

pub async fn set_avatar(
    db: &DatabaseConnection,
    user_id: i32,
    avatar: String,
) -> Result<user::Model, AppError> {
    let user = get_user(db, user_id).await?;
    let mut active: user::ActiveModel = user.into();
    active.avatar = Set(Some(avatar));
    Ok(active.update(db).await?)
}

pub async fn remove_avatar(db: &DatabaseConnection, user_id: i32) -> Result<(), AppError> {
    let user = get_user(db, user_id).await?;
    if user.avatar.is_none() {
        return Err(AppError::InvalidInput("No avatar is set.".to_string()));
    }
    let mut active: user::ActiveModel = user.into();
    active.avatar = Set(None);
    active.update(db).await?;
    Ok(())
}
