//! Object-level access decisions as a pure function: no request state, no
//! storage, just the actor, the action, and the resource.

use crate::db::entities::{recipe, user};
use crate::web::models::AuthenticatedUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

pub enum ResourceRef<'a> {
    Recipe(&'a recipe::Model),
    Profile(&'a user::Model),
}

pub fn decide(actor: &AuthenticatedUser, action: Action, resource: &ResourceRef) -> Decision {
    if action == Action::Read {
        return Decision::Allow;
    }
    let owns = match resource {
        ResourceRef::Recipe(recipe) => recipe.author_id == actor.id,
        ResourceRef::Profile(profile) => profile.id == actor.id,
    };
    if actor.is_admin || owns {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn actor(id: i32, is_admin: bool) -> AuthenticatedUser {
        AuthenticatedUser {
            id,
            email: format!("user{id}@example.com"),
            is_admin,
        }
    }

    fn recipe_of(author_id: i32) -> recipe::Model {
        recipe::Model {
            id: 1,
            author_id,
            name: "Окрошка".to_string(),
            image: String::new(),
            text: "Смешать и охладить.".to_string(),
            cooking_time: 15,
            short_link: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn anyone_may_read() {
        let recipe = recipe_of(1);
        let resource = ResourceRef::Recipe(&recipe);
        assert_eq!(decide(&actor(2, false), Action::Read, &resource), Decision::Allow);
    }

    #[test]
    fn author_may_mutate_own_recipe() {
        let recipe = recipe_of(1);
        let resource = ResourceRef::Recipe(&recipe);
        assert_eq!(decide(&actor(1, false), Action::Update, &resource), Decision::Allow);
        assert_eq!(decide(&actor(1, false), Action::Delete, &resource), Decision::Allow);
    }

    #[test]
    fn admin_may_mutate_any_recipe() {
        let recipe = recipe_of(1);
        let resource = ResourceRef::Recipe(&recipe);
        assert_eq!(decide(&actor(9, true), Action::Update, &resource), Decision::Allow);
        assert_eq!(decide(&actor(9, true), Action::Delete, &resource), Decision::Allow);
    }

    #[test]
    fn others_may_not_mutate() {
        let recipe = recipe_of(1);
        let resource = ResourceRef::Recipe(&recipe);
        assert_eq!(decide(&actor(2, false), Action::Update, &resource), Decision::Deny);
        assert_eq!(decide(&actor(2, false), Action::Delete, &resource), Decision::Deny);
    }

    #[test]
    fn profile_mutation_is_self_or_admin_only() {
        let profile = user::Model {
            id: 3,
            email: "user3@example.com".to_string(),
            username: "user3".to_string(),
            first_name: "Мария".to_string(),
            last_name: "Петрова".to_string(),
            password_hash: "$2b$12$hash".to_string(),
            avatar: None,
            is_admin: false,
            created_at: Utc::now(),
        };
        let resource = ResourceRef::Profile(&profile);
        assert_eq!(decide(&actor(3, false), Action::Update, &resource), Decision::Allow);
        assert_eq!(decide(&actor(9, true), Action::Update, &resource), Decision::Allow);
        assert_eq!(decide(&actor(4, false), Action::Update, &resource), Decision::Deny);
    }
}
