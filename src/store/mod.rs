//! Durable storage of users and recipes.
//!
//! Handlers talk to [`Store`] as a trait object so the Postgres backend and
//! the in-memory backend are interchangeable. The store owns relational
//! integrity: username uniqueness, the recipe-to-owner foreign key, and the
//! cascade that removes a user's recipes with the user. Field-level rules
//! live in [`crate::validate`], not here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

mod mem;
mod pg;

pub use mem::MemStore;
pub use pg::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Uniqueness or referential-integrity rejection, with a reason fit
    /// for a client-facing `errors` array.
    #[error("{0}")]
    Constraint(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl StoreError {
    pub(crate) fn duplicate_username() -> Self {
        StoreError::Constraint("Username is already taken".into())
    }

    pub(crate) fn missing_owner() -> Self {
        StoreError::Constraint("Recipe owner does not exist".into())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: Option<i32>,
    pub user_id: Uuid,
    pub created_at: OffsetDateTime,
}

/// Insert payload for a user; `password_hash` is already derived, the
/// store never sees a plaintext password.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: Option<i32>,
    pub user_id: Uuid,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a user, assigning its id. Duplicate usernames surface as
    /// [`StoreError::Constraint`]; concurrent duplicates resolve to exactly
    /// one winner.
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Remove a user and, with it, every recipe the user owns. No handler
    /// exposes this; it exists so the no-orphaned-recipes invariant is a
    /// property of the store rather than of caller discipline.
    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError>;

    /// Insert a recipe, assigning its id. An unknown `user_id` surfaces as
    /// [`StoreError::Constraint`].
    async fn create_recipe(&self, new: NewRecipe) -> Result<Recipe, StoreError>;

    async fn list_recipes(&self) -> Result<Vec<Recipe>, StoreError>;

    async fn recipes_for_user(&self, user_id: Uuid) -> Result<Vec<Recipe>, StoreError>;
}
