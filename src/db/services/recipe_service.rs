use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::db::entities::{
    ingredient,
    prelude::{Ingredient, Recipe, RecipeIngredient, RecipeTag, Tag},
    recipe, recipe_ingredient,
    recipe_relation::RelationKind,
    recipe_tag, tag, user,
};
use crate::db::services::{relation_service, user_service};
use crate::web::error::{is_unique_violation, AppError};
use crate::web::models::recipe_models::{
    RecipeIngredientResponse, RecipeListQuery, RecipePayload, RecipeResponse, TagResponse,
};
use crate::web::models::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub const MIN_AMOUNT: i32 = 1;
pub const MAX_AMOUNT: i32 = 32_000;
pub const MIN_COOKING_TIME: i32 = 1;
pub const MAX_COOKING_TIME: i32 = 32_000;

/// Parses a boolean facet token. Only "0" and "1" are accepted; anything
/// else is a validation error naming the offending facet.
pub fn parse_bool_facet(name: &str, value: Option<&str>) -> Result<Option<bool>, AppError> {
    match value {
        None => Ok(None),
        Some("1") => Ok(Some(true)),
        Some("0") => Ok(Some(false)),
        Some(other) => Err(AppError::InvalidInput(format!(
            "{name}: expected '0' or '1', got '{other}'"
        ))),
    }
}

/// Validates the associations and scalar bounds of a write payload before
/// anything touches storage.
pub fn validate_payload(payload: &RecipePayload, require_image: bool) -> Result<(), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "name: must not be empty".to_string(),
        ));
    }
    if payload.text.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "text: must not be empty".to_string(),
        ));
    }
    if require_image && payload.image.as_deref().unwrap_or("").is_empty() {
        return Err(AppError::InvalidInput(
            "image: must not be empty".to_string(),
        ));
    }
    if !(MIN_COOKING_TIME..=MAX_COOKING_TIME).contains(&payload.cooking_time) {
        return Err(AppError::InvalidInput(format!(
            "cooking_time: must be between {MIN_COOKING_TIME} and {MAX_COOKING_TIME}"
        )));
    }

    if payload.tags.is_empty() {
        return Err(AppError::InvalidInput(
            "tags: at least one tag is required".to_string(),
        ));
    }
    let mut seen_tags = HashSet::new();
    for tag_id in &payload.tags {
        if !seen_tags.insert(*tag_id) {
            return Err(AppError::InvalidInput(
                "tags: duplicate tag ids are not allowed".to_string(),
            ));
        }
    }

    if payload.ingredients.is_empty() {
        return Err(AppError::InvalidInput(
            "ingredients: at least one ingredient is required".to_string(),
        ));
    }
    let mut seen_ingredients = HashSet::new();
    for entry in &payload.ingredients {
        if !seen_ingredients.insert(entry.id) {
            return Err(AppError::InvalidInput(
                "ingredients: duplicate ingredient ids are not allowed".to_string(),
            ));
        }
        if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&entry.amount) {
            return Err(AppError::InvalidInput(format!(
                "ingredients: amount must be between {MIN_AMOUNT} and {MAX_AMOUNT}"
            )));
        }
    }
    Ok(())
}

/// Fails with a validation error if any referenced tag or ingredient id
/// does not exist.
async fn check_references(
    db: &DatabaseConnection,
    payload: &RecipePayload,
) -> Result<(), AppError> {
    let tags = Tag::find()
        .filter(tag::Column::Id.is_in(payload.tags.clone()))
        .all(db)
        .await?;
    if tags.len() != payload.tags.len() {
        return Err(AppError::InvalidInput(
            "tags: unknown tag id".to_string(),
        ));
    }

    let ingredient_ids: Vec<i32> = payload.ingredients.iter().map(|entry| entry.id).collect();
    let ingredients = Ingredient::find()
        .filter(ingredient::Column::Id.is_in(ingredient_ids.clone()))
        .all(db)
        .await?;
    if ingredients.len() != ingredient_ids.len() {
        return Err(AppError::InvalidInput(
            "ingredients: unknown ingredient id".to_string(),
        ));
    }
    Ok(())
}

/// Replaces the recipe's association rows with the payload's sets. Runs
/// inside the caller's transaction so a failed entry never leaves a
/// partial write behind.
async fn materialize_associations(
    txn: &DatabaseTransaction,
    recipe_id: i32,
    payload: &RecipePayload,
) -> Result<(), AppError> {
    RecipeIngredient::delete_many()
        .filter(recipe_ingredient::Column::RecipeId.eq(recipe_id))
        .exec(txn)
        .await?;
    RecipeTag::delete_many()
        .filter(recipe_tag::Column::RecipeId.eq(recipe_id))
        .exec(txn)
        .await?;

    let ingredient_rows: Vec<recipe_ingredient::ActiveModel> = payload
        .ingredients
        .iter()
        .map(|entry| recipe_ingredient::ActiveModel {
            recipe_id: Set(recipe_id),
            ingredient_id: Set(entry.id),
            amount: Set(entry.amount),
        })
        .collect();
    RecipeIngredient::insert_many(ingredient_rows)
        .exec_without_returning(txn)
        .await?;

    let tag_rows: Vec<recipe_tag::ActiveModel> = payload
        .tags
        .iter()
        .map(|tag_id| recipe_tag::ActiveModel {
            recipe_id: Set(recipe_id),
            tag_id: Set(*tag_id),
        })
        .collect();
    RecipeTag::insert_many(tag_rows)
        .exec_without_returning(txn)
        .await?;
    Ok(())
}

/// Creates a recipe with its associations. The (author, name) unique index
/// is the final guard against a racing duplicate create.
pub async fn create_recipe(
    db: &DatabaseConnection,
    author: &user::Model,
    payload: &RecipePayload,
) -> Result<RecipeResponse, AppError> {
    validate_payload(payload, true)?;
    check_references(db, payload).await?;

    let duplicate = Recipe::find()
        .filter(recipe::Column::AuthorId.eq(author.id))
        .filter(recipe::Column::Name.eq(&payload.name))
        .one(db)
        .await?;
    if duplicate.is_some() {
        return Err(AppError::Conflict(
            "You already have a recipe with this name.".to_string(),
        ));
    }

    let txn = db.begin().await?;
    let new_recipe = recipe::ActiveModel {
        author_id: Set(author.id),
        name: Set(payload.name.clone()),
        image: Set(payload.image.clone().unwrap_or_default()),
        text: Set(payload.text.clone()),
        cooking_time: Set(payload.cooking_time),
        short_link: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let inserted = match new_recipe.insert(&txn).await {
        Ok(model) => model,
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::Conflict(
                "You already have a recipe with this name.".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };
    materialize_associations(&txn, inserted.id, payload).await?;
    txn.commit().await?;

    build_recipe_response(db, &inserted, Some(author.id)).await
}

/// Rewrites a recipe's fields and replaces both association sets. The
/// short link is never touched here.
pub async fn update_recipe(
    db: &DatabaseConnection,
    existing: &recipe::Model,
    payload: &RecipePayload,
    viewer: i32,
) -> Result<RecipeResponse, AppError> {
    validate_payload(payload, false)?;
    check_references(db, payload).await?;

    let clash = Recipe::find()
        .filter(recipe::Column::AuthorId.eq(existing.author_id))
        .filter(recipe::Column::Name.eq(&payload.name))
        .filter(recipe::Column::Id.ne(existing.id))
        .one(db)
        .await?;
    if clash.is_some() {
        return Err(AppError::Conflict(
            "The author already has a recipe with this name.".to_string(),
        ));
    }

    let txn = db.begin().await?;
    let active = recipe::ActiveModel {
        id: Set(existing.id),
        name: Set(payload.name.clone()),
        image: Set(payload
            .image
            .clone()
            .unwrap_or_else(|| existing.image.clone())),
        text: Set(payload.text.clone()),
        cooking_time: Set(payload.cooking_time),
        ..Default::default()
    };
    let updated = match active.update(&txn).await {
        Ok(model) => model,
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::Conflict(
                "The author already has a recipe with this name.".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };
    materialize_associations(&txn, updated.id, payload).await?;
    txn.commit().await?;

    build_recipe_response(db, &updated, Some(viewer)).await
}

pub async fn get_recipe(
    db: &DatabaseConnection,
    recipe_id: i32,
) -> Result<recipe::Model, AppError> {
    Recipe::find_by_id(recipe_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Recipe {recipe_id} not found")))
}

pub async fn delete_recipe(
    db: &DatabaseConnection,
    recipe: recipe::Model,
) -> Result<(), AppError> {
    recipe.delete(db).await?;
    Ok(())
}

/// Lists recipes with all supplied facets ANDed together. Boolean facets
/// apply only for authenticated viewers; anonymous requests ignore them.
pub async fn list_recipes(
    db: &DatabaseConnection,
    params: &RecipeListQuery,
    viewer: Option<i32>,
) -> Result<(u64, Vec<RecipeResponse>), AppError> {
    let favorited = parse_bool_facet("is_favorited", params.is_favorited.as_deref())?;
    let in_cart = parse_bool_facet(
        "is_in_shopping_cart",
        params.is_in_shopping_cart.as_deref(),
    )?;

    let mut query = Recipe::find().order_by_desc(recipe::Column::CreatedAt);
    if let Some(author_id) = params.author {
        query = query.filter(recipe::Column::AuthorId.eq(author_id));
    }
    if !params.tags.is_empty() {
        let tag_ids: Vec<i32> = Tag::find()
            .filter(tag::Column::Slug.is_in(params.tags.clone()))
            .all(db)
            .await?
            .into_iter()
            .map(|t| t.id)
            .collect();
        let mut recipe_ids: Vec<i32> = RecipeTag::find()
            .filter(recipe_tag::Column::TagId.is_in(tag_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|link| link.recipe_id)
            .collect();
        recipe_ids.sort_unstable();
        recipe_ids.dedup();
        query = query.filter(recipe::Column::Id.is_in(recipe_ids));
    }
    if let Some(viewer_id) = viewer {
        if favorited == Some(true) {
            let ids =
                relation_service::recipe_ids_for_user(db, viewer_id, RelationKind::Favorite)
                    .await?;
            query = query.filter(recipe::Column::Id.is_in(ids));
        }
        if in_cart == Some(true) {
            let ids =
                relation_service::recipe_ids_for_user(db, viewer_id, RelationKind::ShoppingCart)
                    .await?;
            query = query.filter(recipe::Column::Id.is_in(ids));
        }
    }

    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let paginator = query.paginate(db, limit);
    let total = paginator.num_items().await?;
    let recipes = paginator.fetch_page(page - 1).await?;

    let mut results = Vec::with_capacity(recipes.len());
    for model in &recipes {
        results.push(build_recipe_response(db, model, viewer).await?);
    }
    Ok((total, results))
}

/// Assembles the full recipe projection a read returns: tags, author with
/// subscription flag, ingredient amounts, and the viewer's relation flags.
pub async fn build_recipe_response(
    db: &DatabaseConnection,
    recipe: &recipe::Model,
    viewer: Option<i32>,
) -> Result<RecipeResponse, AppError> {
    let tag_links = RecipeTag::find()
        .filter(recipe_tag::Column::RecipeId.eq(recipe.id))
        .all(db)
        .await?;
    let tag_ids: Vec<i32> = tag_links.iter().map(|link| link.tag_id).collect();
    let tags = Tag::find()
        .filter(tag::Column::Id.is_in(tag_ids))
        .order_by_asc(tag::Column::Id)
        .all(db)
        .await?;

    let ingredient_links = RecipeIngredient::find()
        .filter(recipe_ingredient::Column::RecipeId.eq(recipe.id))
        .order_by_asc(recipe_ingredient::Column::IngredientId)
        .all(db)
        .await?;
    let ingredient_ids: Vec<i32> = ingredient_links
        .iter()
        .map(|link| link.ingredient_id)
        .collect();
    let ingredient_models = Ingredient::find()
        .filter(ingredient::Column::Id.is_in(ingredient_ids))
        .all(db)
        .await?;
    let catalog: HashMap<i32, &ingredient::Model> =
        ingredient_models.iter().map(|m| (m.id, m)).collect();
    let ingredients: Vec<RecipeIngredientResponse> = ingredient_links
        .iter()
        .filter_map(|link| {
            catalog.get(&link.ingredient_id).map(|m| RecipeIngredientResponse {
                id: m.id,
                name: m.name.clone(),
                measurement_unit: m.measurement_unit.clone(),
                amount: link.amount,
            })
        })
        .collect();

    let author = user_service::get_user(db, recipe.author_id).await?;
    let author_profile = user_service::profile_response(db, viewer, &author).await?;

    let (is_favorited, is_in_shopping_cart) = match viewer {
        Some(viewer_id) => (
            relation_service::relation_exists(db, viewer_id, recipe.id, RelationKind::Favorite)
                .await?,
            relation_service::relation_exists(
                db,
                viewer_id,
                recipe.id,
                RelationKind::ShoppingCart,
            )
            .await?,
        ),
        None => (false, false),
    };

    Ok(RecipeResponse {
        id: recipe.id,
        tags: tags.iter().map(TagResponse::from_model).collect(),
        author: author_profile,
        ingredients,
        is_favorited,
        is_in_shopping_cart,
        name: recipe.name.clone(),
        image: recipe.image.clone(),
        text: recipe.text.clone(),
        cooking_time: recipe.cooking_time,
    })
}

/// Aggregates ingredient amounts across association rows into
/// `"<name>: <total> <unit>"` lines ordered by ingredient name.
pub fn format_shopping_list(
    links: &[recipe_ingredient::Model],
    ingredients: &[ingredient::Model],
) -> String {
    let catalog: HashMap<i32, &ingredient::Model> =
        ingredients.iter().map(|m| (m.id, m)).collect();
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for link in links {
        if let Some(model) = catalog.get(&link.ingredient_id) {
            *totals
                .entry((model.name.clone(), model.measurement_unit.clone()))
                .or_insert(0) += i64::from(link.amount);
        }
    }
    totals
        .iter()
        .map(|((name, unit), total)| format!("{name}: {total} {unit}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Plain-text shopping list for everything in the user's cart.
pub async fn shopping_list_text(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<String, AppError> {
    let recipe_ids =
        relation_service::recipe_ids_for_user(db, user_id, RelationKind::ShoppingCart).await?;
    if recipe_ids.is_empty() {
        return Ok(String::new());
    }
    let links = RecipeIngredient::find()
        .filter(recipe_ingredient::Column::RecipeId.is_in(recipe_ids))
        .all(db)
        .await?;
    let ingredient_ids: Vec<i32> = links.iter().map(|link| link.ingredient_id).collect();
    let ingredients = Ingredient::find()
        .filter(ingredient::Column::Id.is_in(ingredient_ids))
        .all(db)
        .await?;
    Ok(format_shopping_list(&links, &ingredients))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::models::recipe_models::IngredientAmountPayload;

    fn payload(ingredients: Vec<(i32, i32)>, tags: Vec<i32>) -> RecipePayload {
        RecipePayload {
            ingredients: ingredients
                .into_iter()
                .map(|(id, amount)| IngredientAmountPayload { id, amount })
                .collect(),
            tags,
            image: Some("data:image/png;base64,xyz".to_string()),
            name: "Плов".to_string(),
            text: "Тушить сорок минут.".to_string(),
            cooking_time: 60,
        }
    }

    #[test]
    fn bool_facet_accepts_canonical_tokens() {
        assert_eq!(parse_bool_facet("is_favorited", None).unwrap(), None);
        assert_eq!(
            parse_bool_facet("is_favorited", Some("1")).unwrap(),
            Some(true)
        );
        assert_eq!(
            parse_bool_facet("is_favorited", Some("0")).unwrap(),
            Some(false)
        );
    }

    #[test]
    fn bool_facet_rejects_other_tokens_naming_the_facet() {
        for bad in ["true", "yes", "2", ""] {
            let err = parse_bool_facet("is_in_shopping_cart", Some(bad)).unwrap_err();
            match err {
                AppError::InvalidInput(msg) => {
                    assert!(msg.contains("is_in_shopping_cart"), "message: {msg}")
                }
                other => panic!("expected InvalidInput, got {other:?}"),
            }
        }
    }

    #[test]
    fn missing_tags_fail_naming_the_field() {
        let err = validate_payload(&payload(vec![(1, 100)], vec![]), true).unwrap_err();
        match err {
            AppError::InvalidInput(msg) => assert!(msg.starts_with("tags:")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_tags_fail_naming_the_field() {
        let err = validate_payload(&payload(vec![(1, 100)], vec![5, 5]), true).unwrap_err();
        match err {
            AppError::InvalidInput(msg) => assert!(msg.starts_with("tags:")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn missing_ingredients_fail_naming_the_field() {
        let err = validate_payload(&payload(vec![], vec![1]), true).unwrap_err();
        match err {
            AppError::InvalidInput(msg) => assert!(msg.starts_with("ingredients:")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_ingredient_ids_fail_even_with_differing_amounts() {
        let err =
            validate_payload(&payload(vec![(3, 100), (3, 250)], vec![1]), true).unwrap_err();
        match err {
            AppError::InvalidInput(msg) => assert!(msg.starts_with("ingredients:")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn amount_bounds_are_enforced() {
        assert!(validate_payload(&payload(vec![(1, 0)], vec![1]), true).is_err());
        assert!(validate_payload(&payload(vec![(1, MAX_AMOUNT + 1)], vec![1]), true).is_err());
        assert!(validate_payload(&payload(vec![(1, 1)], vec![1]), true).is_ok());
    }

    #[test]
    fn cooking_time_bounds_are_enforced() {
        let mut p = payload(vec![(1, 100)], vec![1]);
        p.cooking_time = 0;
        assert!(validate_payload(&p, true).is_err());
        p.cooking_time = MAX_COOKING_TIME + 1;
        assert!(validate_payload(&p, true).is_err());
    }

    #[test]
    fn shopping_list_sums_shared_ingredients_into_one_line() {
        let sugar = ingredient::Model {
            id: 1,
            name: "Сахар".to_string(),
            measurement_unit: "г".to_string(),
        };
        let milk = ingredient::Model {
            id: 2,
            name: "Молоко".to_string(),
            measurement_unit: "мл".to_string(),
        };
        // Two recipes both use sugar.
        let links = vec![
            recipe_ingredient::Model {
                recipe_id: 10,
                ingredient_id: 1,
                amount: 100,
            },
            recipe_ingredient::Model {
                recipe_id: 11,
                ingredient_id: 1,
                amount: 50,
            },
            recipe_ingredient::Model {
                recipe_id: 11,
                ingredient_id: 2,
                amount: 200,
            },
        ];
        let text = format_shopping_list(&links, &[sugar, milk]);
        assert_eq!(text, "Молоко: 200 мл\nСахар: 150 г");
    }

    #[test]
    fn empty_cart_formats_to_an_empty_list() {
        assert_eq!(format_shopping_list(&[], &[]), "");
    }

    mod with_database {
        use super::*;
        use crate::db::entities::{recipe_relation, subscription};
        use chrono::Utc;
        use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

        fn tag_fixture(id: i32, name: &str, slug: &str) -> tag::Model {
            tag::Model {
                id,
                name: name.to_string(),
                slug: slug.to_string(),
            }
        }

        fn ingredient_fixture(id: i32, name: &str) -> ingredient::Model {
            ingredient::Model {
                id,
                name: name.to_string(),
                measurement_unit: "г".to_string(),
            }
        }

        fn author_fixture() -> user::Model {
            user::Model {
                id: 1,
                email: "chef@example.com".to_string(),
                username: "chef".to_string(),
                first_name: "Анна".to_string(),
                last_name: "Иванова".to_string(),
                password_hash: "$2b$12$hash".to_string(),
                avatar: None,
                is_admin: false,
                created_at: Utc::now(),
            }
        }

        fn recipe_fixture() -> recipe::Model {
            recipe::Model {
                id: 42,
                author_id: 1,
                name: "Плов".to_string(),
                image: "data:image/png;base64,xyz".to_string(),
                text: "Тушить сорок минут.".to_string(),
                cooking_time: 60,
                short_link: None,
                created_at: Utc::now(),
            }
        }

        #[tokio::test]
        async fn create_with_taken_name_is_a_conflict() {
            let db = MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![tag_fixture(1, "Обед", "lunch")]])
                .append_query_results([vec![ingredient_fixture(7, "Рис")]])
                .append_query_results([vec![recipe_fixture()]])
                .into_connection();

            let err = create_recipe(&db, &author_fixture(), &payload(vec![(7, 300)], vec![1]))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Conflict(_)));
        }

        #[tokio::test]
        async fn created_recipe_reads_back_with_the_same_associations() {
            let tags = vec![
                tag_fixture(1, "Обед", "lunch"),
                tag_fixture(2, "Ужин", "dinner"),
            ];
            let ingredients = vec![
                ingredient_fixture(7, "Рис"),
                ingredient_fixture(8, "Морковь"),
            ];
            let tag_links = vec![
                recipe_tag::Model {
                    recipe_id: 42,
                    tag_id: 1,
                },
                recipe_tag::Model {
                    recipe_id: 42,
                    tag_id: 2,
                },
            ];
            let ingredient_links = vec![
                recipe_ingredient::Model {
                    recipe_id: 42,
                    ingredient_id: 7,
                    amount: 300,
                },
                recipe_ingredient::Model {
                    recipe_id: 42,
                    ingredient_id: 8,
                    amount: 150,
                },
            ];

            let db = MockDatabase::new(DatabaseBackend::Postgres)
                // reference checks
                .append_query_results([tags.clone()])
                .append_query_results([ingredients.clone()])
                // duplicate-name probe
                .append_query_results([Vec::<recipe::Model>::new()])
                // INSERT .. RETURNING
                .append_query_results([vec![recipe_fixture()]])
                // association replacement inside the transaction
                .append_exec_results([
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 0,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 2,
                    },
                    MockExecResult {
                        last_insert_id: 0,
                        rows_affected: 2,
                    },
                ])
                // read-back projection
                .append_query_results([tag_links])
                .append_query_results([tags])
                .append_query_results([ingredient_links])
                .append_query_results([ingredients])
                .append_query_results([vec![author_fixture()]])
                .append_query_results([Vec::<subscription::Model>::new()])
                .append_query_results([Vec::<recipe_relation::Model>::new()])
                .append_query_results([Vec::<recipe_relation::Model>::new()])
                .into_connection();

            let response = create_recipe(
                &db,
                &author_fixture(),
                &payload(vec![(7, 300), (8, 150)], vec![1, 2]),
            )
            .await
            .unwrap();

            let pairs: Vec<(i32, i32)> = response
                .ingredients
                .iter()
                .map(|i| (i.id, i.amount))
                .collect();
            assert_eq!(pairs, vec![(7, 300), (8, 150)]);
            let tag_ids: Vec<i32> = response.tags.iter().map(|t| t.id).collect();
            assert_eq!(tag_ids, vec![1, 2]);
            assert!(!response.is_favorited);
            assert!(!response.is_in_shopping_cart);
        }
    }
}
