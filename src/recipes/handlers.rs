use std::collections::HashMap;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthSession,
    error::ApiError,
    recipes::dto::{CreateRecipeRequest, RecipeBody},
    state::AppState,
    store::{NewRecipe, User},
    validate,
};

pub fn routes() -> Router<AppState> {
    Router::new().route("/recipes", get(list_recipes).post(create_recipe))
}

#[instrument(skip_all)]
pub async fn list_recipes(
    State(state): State<AppState>,
    _session: AuthSession,
) -> Result<Json<Vec<RecipeBody>>, ApiError> {
    let recipes = state.store.list_recipes().await?;

    // One owner lookup per distinct user, however many recipes they have.
    let mut owners: HashMap<Uuid, User> = HashMap::new();
    for recipe in &recipes {
        if !owners.contains_key(&recipe.user_id) {
            let owner = state
                .store
                .get_user(recipe.user_id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("recipe {} has no owner row", recipe.id))?;
            owners.insert(recipe.user_id, owner);
        }
    }

    let bodies = recipes
        .into_iter()
        .map(|recipe| {
            let owner = &owners[&recipe.user_id];
            RecipeBody::new(recipe, owner)
        })
        .collect();
    Ok(Json(bodies))
}

#[instrument(skip_all)]
pub async fn create_recipe(
    State(state): State<AppState>,
    session: AuthSession,
    Json(payload): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeBody>), ApiError> {
    let title = validate::recipe_title(payload.title.as_deref())?;
    let instructions = validate::recipe_instructions(payload.instructions.as_deref())?;

    // Ownership always comes from the session, never the request body.
    let recipe = state
        .store
        .create_recipe(NewRecipe {
            title,
            instructions,
            minutes_to_complete: payload.minutes_to_complete,
            user_id: session.user_id,
        })
        .await?;

    let owner = state
        .store
        .get_user(session.user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    info!(recipe_id = %recipe.id, user_id = %owner.id, "recipe created");
    Ok((StatusCode::CREATED, Json(RecipeBody::new(recipe, &owner))))
}
