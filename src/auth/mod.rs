use crate::state::AppState;
use axum::Router;

mod cookies;
mod dto;
pub mod handlers;
pub mod jwt;
mod password;
pub mod repo;
mod repo_types;
pub mod services;
pub(crate) mod extractors;
mod validation;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
