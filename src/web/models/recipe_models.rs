use serde::{Deserialize, Serialize};

use crate::db::entities::{ingredient, recipe, tag};
use crate::web::models::user_models::ProfileResponse;

#[derive(Debug, Serialize)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

impl TagResponse {
    pub fn from_model(tag: &tag::Model) -> Self {
        Self {
            id: tag.id,
            name: tag.name.clone(),
            slug: tag.slug.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

impl IngredientResponse {
    pub fn from_model(ingredient: &ingredient::Model) -> Self {
        Self {
            id: ingredient.id,
            name: ingredient.name.clone(),
            measurement_unit: ingredient.measurement_unit.clone(),
        }
    }
}

/// An ingredient as it appears inside a recipe: catalog fields plus the
/// amount used.
#[derive(Debug, Serialize)]
pub struct RecipeIngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Compact recipe projection used by relation toggles and subscription
/// listings.
#[derive(Debug, Serialize)]
pub struct RecipeShortResponse {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl RecipeShortResponse {
    pub fn from_model(recipe: &recipe::Model) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Full recipe projection; matches what a read of the recipe returns so
/// write responses round-trip.
#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i32,
    pub tags: Vec<TagResponse>,
    pub author: ProfileResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: i32,
}

#[derive(Debug, Deserialize)]
pub struct IngredientAmountPayload {
    pub id: i32,
    pub amount: i32,
}

// `ingredients` and `tags` default to empty so their absence surfaces as a
// validation error naming the field instead of a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct RecipePayload {
    #[serde(default)]
    pub ingredients: Vec<IngredientAmountPayload>,
    #[serde(default)]
    pub tags: Vec<i32>,
    pub image: Option<String>,
    pub name: String,
    pub text: String,
    pub cooking_time: i32,
}

/// Query parameters accepted by the recipe listing. `tags` repeats;
/// boolean facets arrive as raw tokens and are validated by the filter.
#[derive(Debug, Default, Deserialize)]
pub struct RecipeListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub author: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_favorited: Option<String>,
    pub is_in_shopping_cart: Option<String>,
}
