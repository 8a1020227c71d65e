use rand::{distr::Alphanumeric, Rng};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tracing::warn;

use crate::db::entities::{prelude::Recipe, recipe};
use crate::web::error::{is_unique_violation, AppError};

pub const SHORT_LINK_LEN: usize = 6;

// Collisions get rarer as the keyspace fills; a handful of retries is
// already far beyond what a 62^6 keyspace needs.
const MAX_ATTEMPTS: usize = 16;

pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SHORT_LINK_LEN)
        .map(char::from)
        .collect()
}

/// Returns the recipe's short code, assigning one first if it has none.
/// Idempotent: an already-coded recipe gets its existing code back
/// unchanged. The unique index on short_link is the final guard; a losing
/// racer retries with a fresh token.
pub async fn ensure_short_link(
    db: &DatabaseConnection,
    recipe: &recipe::Model,
) -> Result<String, AppError> {
    if let Some(code) = &recipe.short_link {
        return Ok(code.clone());
    }

    for _ in 0..MAX_ATTEMPTS {
        let code = generate_code();
        let taken = Recipe::find()
            .filter(recipe::Column::ShortLink.eq(&code))
            .one(db)
            .await?
            .is_some();
        if taken {
            continue;
        }

        let update = recipe::ActiveModel {
            id: Set(recipe.id),
            short_link: Set(Some(code.clone())),
            ..Default::default()
        };
        match update.update(db).await {
            Ok(_) => return Ok(code),
            Err(e) if is_unique_violation(&e) => {
                warn!(recipe_id = recipe.id, "short link collision, retrying");
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::InternalServerError(
        "Could not allocate a unique short link".to_string(),
    ))
}

/// Resolves a short code to the owning recipe's id.
pub async fn resolve_short_link(
    db: &DatabaseConnection,
    code: &str,
) -> Result<i32, AppError> {
    let recipe = Recipe::find()
        .filter(recipe::Column::ShortLink.eq(code))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No recipe for short link '{code}'")))?;
    Ok(recipe.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn recipe_fixture(short_link: Option<&str>) -> recipe::Model {
        recipe::Model {
            id: 4,
            author_id: 1,
            name: "Сырники".to_string(),
            image: "data:image/png;base64,xyz".to_string(),
            text: "Жарить с двух сторон.".to_string(),
            cooking_time: 20,
            short_link: short_link.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn generated_codes_are_fixed_length_alphanumeric() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), SHORT_LINK_LEN);
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[tokio::test]
    async fn ensure_is_idempotent_for_a_coded_recipe() {
        // No query results appended: touching the database would fail the
        // test, proving the early return.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let recipe = recipe_fixture(Some("Ab3xY9"));

        let first = ensure_short_link(&db, &recipe).await.unwrap();
        let second = ensure_short_link(&db, &recipe).await.unwrap();
        assert_eq!(first, "Ab3xY9");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn resolve_unknown_code_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<recipe::Model>::new()])
            .into_connection();

        let err = resolve_short_link(&db, "zzzzzz").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn resolve_returns_the_owning_recipe_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![recipe_fixture(Some("Ab3xY9"))]])
            .into_connection();

        let id = resolve_short_link(&db, "Ab3xY9").await.unwrap();
        assert_eq!(id, 4);
    }
}
