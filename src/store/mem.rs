use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{NewRecipe, NewUser, Recipe, Store, StoreError, User};

/// In-memory store with the same relational rules as the Postgres backend.
/// Selected when no `DATABASE_URL` is configured, and used by tests. All
/// writes go through one `RwLock`, which serializes conflicting inserts:
/// of two simultaneous signups with the same username, exactly one wins.
#[derive(Default)]
pub struct MemStore {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    recipes: HashMap<Uuid, Recipe>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut tables = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if tables.users.values().any(|u| u.username == new.username) {
            return Err(StoreError::duplicate_username());
        }
        let user = User {
            id: Uuid::new_v4(),
            username: new.username,
            password_hash: new.password_hash,
            image_url: new.image_url,
            bio: new.bio,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let tables = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(tables.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let tables = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn delete_user(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        tables.users.remove(&id);
        // Cascade: a deleted user leaves no orphaned recipes behind.
        tables.recipes.retain(|_, r| r.user_id != id);
        Ok(())
    }

    async fn create_recipe(&self, new: NewRecipe) -> Result<Recipe, StoreError> {
        let mut tables = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if !tables.users.contains_key(&new.user_id) {
            return Err(StoreError::missing_owner());
        }
        let recipe = Recipe {
            id: Uuid::new_v4(),
            title: new.title,
            instructions: new.instructions,
            minutes_to_complete: new.minutes_to_complete,
            user_id: new.user_id,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.recipes.insert(recipe.id, recipe.clone());
        Ok(recipe)
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>, StoreError> {
        let tables = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut recipes: Vec<Recipe> = tables.recipes.values().cloned().collect();
        recipes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(recipes)
    }

    async fn recipes_for_user(&self, user_id: Uuid) -> Result<Vec<Recipe>, StoreError> {
        let mut recipes = self.list_recipes().await?;
        recipes.retain(|r| r.user_id == user_id);
        Ok(recipes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.into(),
            password_hash: "$argon2id$fake".into(),
            image_url: None,
            bio: None,
        }
    }

    fn new_recipe(user_id: Uuid, title: &str) -> NewRecipe {
        NewRecipe {
            title: title.into(),
            instructions: "Butter the bread, toast until golden, then eat it while warm.".into(),
            minutes_to_complete: Some(5),
            user_id,
        }
    }

    #[tokio::test]
    async fn duplicate_username_is_a_constraint_violation() {
        let store = MemStore::new();
        store.create_user(new_user("amy")).await.unwrap();
        let err = store.create_user(new_user("amy")).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
        assert_eq!(err.to_string(), "Username is already taken");
    }

    #[tokio::test]
    async fn find_by_username_round_trips() {
        let store = MemStore::new();
        let created = store.create_user(new_user("amy")).await.unwrap();
        let found = store.find_user_by_username("amy").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(store.find_user_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn recipe_requires_an_existing_owner() {
        let store = MemStore::new();
        let err = store
            .create_recipe(new_recipe(Uuid::new_v4(), "Toast"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Recipe owner does not exist");
    }

    #[tokio::test]
    async fn deleting_a_user_cascades_to_their_recipes() {
        let store = MemStore::new();
        let amy = store.create_user(new_user("amy")).await.unwrap();
        let bob = store.create_user(new_user("bob")).await.unwrap();
        store.create_recipe(new_recipe(amy.id, "Toast")).await.unwrap();
        store.create_recipe(new_recipe(amy.id, "Soup")).await.unwrap();
        store.create_recipe(new_recipe(bob.id, "Stew")).await.unwrap();

        store.delete_user(amy.id).await.unwrap();

        assert!(store.get_user(amy.id).await.unwrap().is_none());
        let remaining = store.list_recipes().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].user_id, bob.id);
    }

    #[tokio::test]
    async fn list_returns_recipes_across_all_users() {
        let store = MemStore::new();
        let amy = store.create_user(new_user("amy")).await.unwrap();
        let bob = store.create_user(new_user("bob")).await.unwrap();
        store.create_recipe(new_recipe(amy.id, "Toast")).await.unwrap();
        store.create_recipe(new_recipe(bob.id, "Stew")).await.unwrap();

        let all = store.list_recipes().await.unwrap();
        assert_eq!(all.len(), 2);

        let amys = store.recipes_for_user(amy.id).await.unwrap();
        assert_eq!(amys.len(), 1);
        assert_eq!(amys[0].title, "Toast");
    }

    #[tokio::test]
    async fn concurrent_signups_with_one_username_admit_exactly_one() {
        use std::sync::Arc;

        let store = Arc::new(MemStore::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.create_user(new_user("amy")).await
            }));
        }
        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
    }
}
