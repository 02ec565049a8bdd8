use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use super::{NewRecipe, NewUser, Recipe, Store, StoreError, User};

/// Postgres-backed store. Uniqueness and foreign-key rules are enforced by
/// the schema (see `migrations/`), so concurrent conflicting writes are
/// serialized by the database and losers observe a constraint error.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("run database migrations")?;
        Ok(Self { pool })
    }
}

/// Map driver errors onto the store taxonomy. 23505 is Postgres' unique
/// violation, 23503 its foreign-key violation; only the users.username
/// unique index and the recipes.user_id FK exist in this schema.
fn map_db_err(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        match db.code().as_deref() {
            Some("23505") => return StoreError::duplicate_username(),
            Some("23503") => return StoreError::missing_owner(),
            _ => {}
        }
    }
    StoreError::Backend(err.into())
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, image_url, bio)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, image_url, bio, created_at
            "#,
        )
        .bind(&new.username)
        .bind(&new.password_hash)
        .bind(&new.image_url)
        .bind(&new.bio)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, image_url, bio, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, image_url, bio, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err)
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError> {
        // Owned recipes go with the user via ON DELETE CASCADE.
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(())
    }

    async fn create_recipe(&self, new: NewRecipe) -> Result<Recipe, StoreError> {
        sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (title, instructions, minutes_to_complete, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, instructions, minutes_to_complete, user_id, created_at
            "#,
        )
        .bind(&new.title)
        .bind(&new.instructions)
        .bind(new.minutes_to_complete)
        .bind(new.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, title, instructions, minutes_to_complete, user_id, created_at
            FROM recipes
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)
    }

    async fn recipes_for_user(&self, user_id: Uuid) -> Result<Vec<Recipe>, StoreError> {
        sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, title, instructions, minutes_to_complete, user_id, created_at
            FROM recipes
            WHERE user_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)
    }
}
