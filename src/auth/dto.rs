use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::{Recipe, User};

/// Request body for signup. Fields are optional at the wire level so the
/// validators, not the JSON decoder, decide what a missing field means.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// A user as returned to the client: no password hash, and each owned
/// recipe appears without an embedded user so the User↔Recipe cycle stops
/// after one hop.
#[derive(Debug, Serialize)]
pub struct UserBody {
    pub id: Uuid,
    pub username: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
    pub recipes: Vec<RecipeSummary>,
}

/// A recipe as it appears inside its owner's `recipes` array: the owner is
/// referenced by id only.
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: Uuid,
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: Option<i32>,
    pub user_id: Uuid,
}

impl UserBody {
    pub fn new(user: User, recipes: Vec<Recipe>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            image_url: user.image_url,
            bio: user.bio,
            recipes: recipes.into_iter().map(RecipeSummary::from).collect(),
        }
    }
}

impl From<Recipe> for RecipeSummary {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            instructions: recipe.instructions,
            minutes_to_complete: recipe.minutes_to_complete,
            user_id: recipe.user_id,
        }
    }
}
