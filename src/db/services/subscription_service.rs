use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::db::entities::{
    prelude::{Recipe, Subscription},
    recipe, subscription,
};
use crate::db::services::user_service;
use crate::web::error::{is_unique_violation, AppError};
use crate::web::models::recipe_models::RecipeShortResponse;
use crate::web::models::user_models::SubscriptionResponse;

/// Follows `author_id` on behalf of `follower_id` and returns the author's
/// profile with their recipes. Self-follows are rejected up front; the
/// unique (user, author) index guards racing duplicates.
pub async fn subscribe(
    db: &DatabaseConnection,
    follower_id: i32,
    author_id: i32,
) -> Result<SubscriptionResponse, AppError> {
    if follower_id == author_id {
        return Err(AppError::InvalidInput(
            "You cannot subscribe to yourself.".to_string(),
        ));
    }
    let author = user_service::get_user(db, author_id).await?;

    let existing = Subscription::find()
        .filter(subscription::Column::UserId.eq(follower_id))
        .filter(subscription::Column::AuthorId.eq(author_id))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "You are already subscribed to this user.".to_string(),
        ));
    }

    let new_subscription = subscription::ActiveModel {
        user_id: Set(follower_id),
        author_id: Set(author_id),
        ..Default::default()
    };
    match new_subscription.insert(db).await {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::Conflict(
                "You are already subscribed to this user.".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    }

    subscription_response(db, follower_id, author.id).await
}

pub async fn unsubscribe(
    db: &DatabaseConnection,
    follower_id: i32,
    author_id: i32,
) -> Result<(), AppError> {
    user_service::get_user(db, author_id).await?;

    let result = Subscription::delete_many()
        .filter(subscription::Column::UserId.eq(follower_id))
        .filter(subscription::Column::AuthorId.eq(author_id))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(
            "You are not subscribed to this user.".to_string(),
        ));
    }
    Ok(())
}

/// The follower's subscriptions, paginated, each carrying the author's
/// profile plus their recipes in short projection.
pub async fn list_subscriptions(
    db: &DatabaseConnection,
    follower_id: i32,
    page: u64,
    limit: u64,
) -> Result<(u64, Vec<SubscriptionResponse>), AppError> {
    let paginator = Subscription::find()
        .filter(subscription::Column::UserId.eq(follower_id))
        .order_by_asc(subscription::Column::AuthorId)
        .paginate(db, limit);
    let total = paginator.num_items().await?;
    let rows = paginator.fetch_page(page.saturating_sub(1)).await?;

    let mut responses = Vec::with_capacity(rows.len());
    for row in rows {
        responses.push(subscription_response(db, follower_id, row.author_id).await?);
    }
    Ok((total, responses))
}

async fn subscription_response(
    db: &DatabaseConnection,
    follower_id: i32,
    author_id: i32,
) -> Result<SubscriptionResponse, AppError> {
    let author = user_service::get_user(db, author_id).await?;
    let profile = user_service::profile_response(db, Some(follower_id), &author).await?;

    let recipes = Recipe::find()
        .filter(recipe::Column::AuthorId.eq(author_id))
        .order_by_desc(recipe::Column::CreatedAt)
        .all(db)
        .await?;
    let recipes_count = recipes.len() as u64;
    let short: Vec<RecipeShortResponse> = recipes
        .iter()
        .map(RecipeShortResponse::from_model)
        .collect();

    Ok(SubscriptionResponse {
        profile,
        recipes: short,
        recipes_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn self_subscription_is_rejected_before_any_query() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = subscribe(&db, 5, 5).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn unsubscribing_without_a_subscription_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![crate::db::entities::user::Model {
                id: 2,
                email: "author@example.com".to_string(),
                username: "author".to_string(),
                first_name: "Пётр".to_string(),
                last_name: "Сидоров".to_string(),
                password_hash: "$2b$12$hash".to_string(),
                avatar: None,
                is_admin: false,
                created_at: chrono::Utc::now(),
            }]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let err = unsubscribe(&db, 1, 2).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
