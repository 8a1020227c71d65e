use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

use crate::db::entities::{
    prelude::{Recipe, RecipeRelation},
    recipe, recipe_relation,
    recipe_relation::RelationKind,
};
use crate::web::error::{is_unique_violation, AppError};

fn kind_label(kind: RelationKind) -> &'static str {
    match kind {
        RelationKind::Favorite => "favorites",
        RelationKind::ShoppingCart => "shopping cart",
    }
}

/// Adds a (user, recipe) relation of the given kind. Fails with Conflict if
/// the relation already exists and returns the recipe for the caller's short
/// projection. The unique index on (user_id, recipe_id, kind) is the final
/// guard against a racing duplicate insert.
pub async fn add_relation(
    db: &DatabaseConnection,
    user_id: i32,
    recipe_id: i32,
    kind: RelationKind,
) -> Result<recipe::Model, AppError> {
    let recipe = Recipe::find_by_id(recipe_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Recipe {recipe_id} not found")))?;

    let existing = RecipeRelation::find()
        .filter(recipe_relation::Column::UserId.eq(user_id))
        .filter(recipe_relation::Column::RecipeId.eq(recipe_id))
        .filter(recipe_relation::Column::Kind.eq(kind))
        .one(db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(format!(
            "Recipe {recipe_id} is already in the {}.",
            kind_label(kind)
        )));
    }

    let new_relation = recipe_relation::ActiveModel {
        user_id: Set(user_id),
        recipe_id: Set(recipe_id),
        kind: Set(kind),
        ..Default::default()
    };
    match new_relation.insert(db).await {
        Ok(_) => Ok(recipe),
        Err(e) if is_unique_violation(&e) => Err(AppError::Conflict(format!(
            "Recipe {recipe_id} is already in the {}.",
            kind_label(kind)
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Removes a (user, recipe) relation of the given kind. Fails with NotFound
/// if no such relation exists.
pub async fn remove_relation(
    db: &DatabaseConnection,
    user_id: i32,
    recipe_id: i32,
    kind: RelationKind,
) -> Result<(), AppError> {
    let result = RecipeRelation::delete_many()
        .filter(recipe_relation::Column::UserId.eq(user_id))
        .filter(recipe_relation::Column::RecipeId.eq(recipe_id))
        .filter(recipe_relation::Column::Kind.eq(kind))
        .exec(db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!(
            "Recipe {recipe_id} is not in the {}.",
            kind_label(kind)
        )));
    }
    Ok(())
}

/// True when the user holds a relation of the given kind to the recipe.
pub async fn relation_exists(
    db: &DatabaseConnection,
    user_id: i32,
    recipe_id: i32,
    kind: RelationKind,
) -> Result<bool, AppError> {
    let existing = RecipeRelation::find()
        .filter(recipe_relation::Column::UserId.eq(user_id))
        .filter(recipe_relation::Column::RecipeId.eq(recipe_id))
        .filter(recipe_relation::Column::Kind.eq(kind))
        .one(db)
        .await?;
    Ok(existing.is_some())
}

/// All recipe ids the user has related with the given kind.
pub async fn recipe_ids_for_user(
    db: &DatabaseConnection,
    user_id: i32,
    kind: RelationKind,
) -> Result<Vec<i32>, AppError> {
    let rows = RecipeRelation::find()
        .filter(recipe_relation::Column::UserId.eq(user_id))
        .filter(recipe_relation::Column::Kind.eq(kind))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| r.recipe_id).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn recipe_fixture() -> recipe::Model {
        recipe::Model {
            id: 7,
            author_id: 1,
            name: "Борщ".to_string(),
            image: "data:image/png;base64,xyz".to_string(),
            text: "Варить час.".to_string(),
            cooking_time: 60,
            short_link: None,
            created_at: Utc::now(),
        }
    }

    fn relation_fixture() -> recipe_relation::Model {
        recipe_relation::Model {
            id: 3,
            user_id: 2,
            recipe_id: 7,
            kind: RelationKind::Favorite,
        }
    }

    #[tokio::test]
    async fn add_existing_relation_is_a_conflict() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![recipe_fixture()]])
            .append_query_results([vec![relation_fixture()]])
            .into_connection();

        let err = add_relation(&db, 2, 7, RelationKind::Favorite)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn add_relation_returns_the_recipe() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![recipe_fixture()]])
            .append_query_results([Vec::<recipe_relation::Model>::new()])
            .append_query_results([vec![relation_fixture()]])
            .into_connection();

        let recipe = add_relation(&db, 2, 7, RelationKind::Favorite)
            .await
            .unwrap();
        assert_eq!(recipe.id, 7);
        assert_eq!(recipe.name, "Борщ");
    }

    #[tokio::test]
    async fn add_relation_to_missing_recipe_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<recipe::Model>::new()])
            .into_connection();

        let err = add_relation(&db, 2, 99, RelationKind::ShoppingCart)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn remove_missing_relation_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let err = remove_relation(&db, 2, 7, RelationKind::Favorite)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn remove_existing_relation_succeeds() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        remove_relation(&db, 2, 7, RelationKind::Favorite)
            .await
            .unwrap();
    }
}
