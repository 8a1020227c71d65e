use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::db::entities::{ingredient, prelude::Ingredient};
use crate::web::error::AppError;

/// Orders `ingredients` against a case-insensitive query substring:
/// names starting with the query come first, then names merely containing
/// it, each tier sorted alphabetically. An empty query returns the input
/// unchanged. Computed in code so the observable order does not depend on
/// the storage engine's collation.
pub fn rank_by_query(
    ingredients: Vec<ingredient::Model>,
    query: &str,
) -> Vec<ingredient::Model> {
    if query.is_empty() {
        return ingredients;
    }
    let query_lower = query.to_lowercase();

    let mut starts_with: Vec<ingredient::Model> = Vec::new();
    let mut contains: Vec<ingredient::Model> = Vec::new();
    for item in ingredients {
        let name_lower = item.name.to_lowercase();
        if name_lower.starts_with(&query_lower) {
            starts_with.push(item);
        } else if name_lower.contains(&query_lower) {
            contains.push(item);
        }
    }

    starts_with.sort_by(|a, b| a.name.cmp(&b.name));
    contains.sort_by(|a, b| a.name.cmp(&b.name));
    starts_with.extend(contains);
    starts_with
}

/// Searches ingredients by name substring, ranked per `rank_by_query`.
pub async fn search_ingredients(
    db: &DatabaseConnection,
    query: Option<&str>,
) -> Result<Vec<ingredient::Model>, AppError> {
    let all = Ingredient::find()
        .order_by_asc(ingredient::Column::Id)
        .all(db)
        .await?;
    Ok(rank_by_query(all, query.unwrap_or_default()))
}

pub async fn get_ingredient(
    db: &DatabaseConnection,
    ingredient_id: i32,
) -> Result<ingredient::Model, AppError> {
    Ingredient::find_by_id(ingredient_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Ingredient {ingredient_id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(id: i32, name: &str) -> ingredient::Model {
        ingredient::Model {
            id,
            name: name.to_string(),
            measurement_unit: "г".to_string(),
        }
    }

    fn names(items: &[ingredient::Model]) -> Vec<&str> {
        items.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn prefix_matches_sort_before_substring_matches() {
        let items = vec![
            ingredient(1, "Капуста"),
            ingredient(2, "Картошка"),
            ingredient(3, "Карамель"),
            ingredient(4, "Макароны"),
            ingredient(5, "Морковь"),
        ];
        let ranked = rank_by_query(items, "кар");
        assert_eq!(names(&ranked), vec!["Карамель", "Картошка", "Макароны"]);
    }

    #[test]
    fn tiers_are_each_alphabetical() {
        let items = vec![
            ingredient(1, "sea salt"),
            ingredient(2, "salt"),
            ingredient(3, "salmon"),
            ingredient(4, "basalt sugar"),
        ];
        let ranked = rank_by_query(items, "sal");
        assert_eq!(
            names(&ranked),
            vec!["salmon", "salt", "basalt sugar", "sea salt"]
        );
    }

    #[test]
    fn empty_query_keeps_original_order() {
        let items = vec![
            ingredient(3, "мука"),
            ingredient(1, "яйцо"),
            ingredient(2, "вода"),
        ];
        let ranked = rank_by_query(items.clone(), "");
        assert_eq!(ranked, items);
    }

    #[test]
    fn no_match_yields_empty() {
        let items = vec![ingredient(1, "мука"), ingredient(2, "вода")];
        assert!(rank_by_query(items, "шоколад").is_empty());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let items = vec![ingredient(1, "Sugar"), ingredient(2, "brown sugar")];
        let ranked = rank_by_query(items, "SUG");
        assert_eq!(names(&ranked), vec!["Sugar", "brown sugar"]);
    }
}
