use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{Recipe, User};

/// Request body for recipe creation. Any `user_id` the client smuggles in
/// is dropped by the decoder; ownership comes from the session alone.
#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub minutes_to_complete: Option<i32>,
}

/// A recipe as returned to the client, with its owner embedded. The owner
/// appears without a `recipes` array so serialization cannot recurse back
/// into this recipe.
#[derive(Debug, Serialize)]
pub struct RecipeBody {
    pub id: Uuid,
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: Option<i32>,
    pub user: OwnerBody,
}

/// The owner as embedded in a recipe: public profile fields only.
#[derive(Debug, Serialize)]
pub struct OwnerBody {
    pub id: Uuid,
    pub username: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

impl RecipeBody {
    pub fn new(recipe: Recipe, owner: &User) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            instructions: recipe.instructions,
            minutes_to_complete: recipe.minutes_to_complete,
            user: OwnerBody {
                id: owner.id,
                username: owner.username.clone(),
                image_url: owner.image_url.clone(),
                bio: owner.bio.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    #[test]
    fn embedded_owner_has_no_recipes_and_no_hash() {
        let owner = User {
            id: Uuid::new_v4(),
            username: "amy".into(),
            password_hash: "$argon2id$secret".into(),
            image_url: None,
            bio: None,
            created_at: OffsetDateTime::now_utc(),
        };
        let recipe = Recipe {
            id: Uuid::new_v4(),
            title: "Toast".into(),
            instructions: "x".repeat(60),
            minutes_to_complete: None,
            user_id: owner.id,
            created_at: OffsetDateTime::now_utc(),
        };

        let json = serde_json::to_value(RecipeBody::new(recipe, &owner)).unwrap();
        assert_eq!(json["user"]["username"], "amy");
        assert!(json["user"].get("recipes").is_none());
        assert!(json["user"].get("password_hash").is_none());
    }

    #[test]
    fn create_request_ignores_a_client_supplied_user_id() {
        let body: CreateRecipeRequest = serde_json::from_str(
            r#"{"title":"Toast","instructions":"x","user_id":"5a40a262-6e46-4e14-8437-4efa02b0bc24"}"#,
        )
        .unwrap();
        assert_eq!(body.title.as_deref(), Some("Toast"));
    }
}
