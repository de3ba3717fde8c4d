pub mod assets;
pub mod auth;
pub mod comments;
pub mod home;
pub mod posts;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home::front))
        .route("/assets/{*path}", get(assets::serve))
        .merge(auth::router())
        .merge(posts::router())
        .merge(comments::router())
}
