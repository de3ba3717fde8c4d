use askama::Template;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::db::posts;
use crate::error::AppResult;
use crate::extractors::MaybeUser;
use crate::routes::posts::{post_card, PostCard};
use crate::state::AppState;

#[derive(Template)]
#[template(path = "pages/front.html")]
pub struct FrontTemplate {
    pub user: Option<String>,
    pub posts: Vec<PostCard>,
}

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

/// Front page: the ten most recent posts.
pub async fn front(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
) -> AppResult<Response> {
    let conn = state.db.get()?;

    let recent = posts::recent(&conn, 10)?;
    let cards = recent
        .iter()
        .map(|p| post_card(&conn, p, viewer.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Html(FrontTemplate {
        user: viewer.map(|u| u.username),
        posts: cards,
    })
    .into_response())
}
