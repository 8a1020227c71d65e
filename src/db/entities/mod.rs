//! SeaORM entities mapping the database tables, one module per table.

pub mod ingredient;
pub mod recipe;
pub mod recipe_ingredient;
pub mod recipe_relation;
pub mod recipe_tag;
pub mod subscription;
pub mod tag;
pub mod user;

// Prelude module for easy importing of all entities and their related types
pub mod prelude {
    pub use super::user::Entity as User;
    pub use super::user::Model as UserModel;
    pub use super::user::ActiveModel as UserActiveModel;
    pub use super::user::Column as UserColumn;

    pub use super::tag::Entity as Tag;
    pub use super::tag::Model as TagModel;
    pub use super::tag::ActiveModel as TagActiveModel;
    pub use super::tag::Column as TagColumn;

    pub use super::ingredient::Entity as Ingredient;
    pub use super::ingredient::Model as IngredientModel;
    pub use super::ingredient::ActiveModel as IngredientActiveModel;
    pub use super::ingredient::Column as IngredientColumn;

    pub use super::recipe::Entity as Recipe;
    pub use super::recipe::Model as RecipeModel;
    pub use super::recipe::ActiveModel as RecipeActiveModel;
    pub use super::recipe::Column as RecipeColumn;

    pub use super::recipe_ingredient::Entity as RecipeIngredient;
    pub use super::recipe_ingredient::Model as RecipeIngredientModel;
    pub use super::recipe_ingredient::ActiveModel as RecipeIngredientActiveModel;
    pub use super::recipe_ingredient::Column as RecipeIngredientColumn;

    pub use super::recipe_tag::Entity as RecipeTag;
    pub use super::recipe_tag::Model as RecipeTagModel;
    pub use super::recipe_tag::ActiveModel as RecipeTagActiveModel;
    pub use super::recipe_tag::Column as RecipeTagColumn;

    pub use super::recipe_relation::Entity as RecipeRelation;
    pub use super::recipe_relation::Model as RecipeRelationModel;
    pub use super::recipe_relation::ActiveModel as RecipeRelationActiveModel;
    pub use super::recipe_relation::Column as RecipeRelationColumn;
    pub use super::recipe_relation::RelationKind;

    pub use super::subscription::Entity as Subscription;
    pub use super::subscription::Model as SubscriptionModel;
    pub use super::subscription::ActiveModel as SubscriptionActiveModel;
    pub use super::subscription::Column as SubscriptionColumn;
}
