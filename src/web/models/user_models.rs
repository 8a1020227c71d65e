use serde::{Deserialize, Serialize};

use crate::db::entities::user;
use crate::web::models::recipe_models::RecipeShortResponse;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

impl ProfileResponse {
    pub fn from_model(user: &user::Model, is_subscribed: bool) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            is_subscribed,
            avatar: user.avatar.clone(),
        }
    }
}

/// Author profile plus their recipes, returned by the subscription
/// endpoints.
#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub profile: ProfileResponse,
    pub recipes: Vec<RecipeShortResponse>,
    pub recipes_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct AvatarPayload {
    pub avatar: String,
}
