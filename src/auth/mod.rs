use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod password;
pub mod session;
pub(crate) mod extractors;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
