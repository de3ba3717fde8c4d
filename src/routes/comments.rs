use askama::Template;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;

use crate::db::{comments, posts};
use crate::error::AppResult;
use crate::extractors::SessionUser;
use crate::routes::home::Html;
use crate::routes::posts::PermissionDeniedTemplate;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "pages/newcomment.html")]
struct NewCommentTemplate {
    user: Option<String>,
    post_id: String,
    subject: String,
    comment: String,
    error: String,
}

#[derive(Template)]
#[template(path = "pages/editcomment.html")]
struct EditCommentTemplate {
    user: Option<String>,
    comment_id: String,
    post_id: String,
    comment: String,
    error: String,
}

#[derive(Template)]
#[template(path = "pages/deletecomment.html")]
struct DeleteCommentTemplate {
    user: Option<String>,
    comment_id: String,
    post_id: String,
    comment: String,
}

#[derive(Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub comment: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/newcomment/{id}", get(new_comment_page).post(create_comment))
        .route(
            "/editcomment/{comment_id}/{post_id}",
            get(edit_comment_page).post(update_comment),
        )
        .route(
            "/deletecomment/{comment_id}/{post_id}",
            get(delete_comment_page).post(destroy_comment),
        )
}

async fn new_comment_page(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(post_id): Path<String>,
) -> AppResult<Response> {
    let conn = state.db.get()?;

    let Some(post) = posts::get(&conn, &post_id)? else {
        return Ok(Redirect::to("/").into_response());
    };

    Ok(Html(NewCommentTemplate {
        user: Some(user.username),
        post_id: post.id,
        subject: post.subject,
        comment: String::new(),
        error: String::new(),
    })
    .into_response())
}

async fn create_comment(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(post_id): Path<String>,
    Form(form): Form<CommentForm>,
) -> AppResult<Response> {
    let conn = state.db.get()?;

    let Some(post) = posts::get(&conn, &post_id)? else {
        return Ok(Redirect::to("/").into_response());
    };

    if form.comment.is_empty() {
        return Ok(Html(NewCommentTemplate {
            user: Some(user.username),
            post_id: post.id,
            subject: post.subject,
            comment: form.comment,
            error: "Comment can't be empty!".to_string(),
        })
        .into_response());
    }

    comments::insert(&conn, &post.id, &user.username, &form.comment)?;
    Ok(Redirect::to(&format!("/post/{}", post.id)).into_response())
}

async fn edit_comment_page(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path((comment_id, post_id)): Path<(String, String)>,
) -> AppResult<Response> {
    let conn = state.db.get()?;

    let Some(comment) = comments::get(&conn, &comment_id)? else {
        return Ok(Redirect::to("/").into_response());
    };
    if posts::get(&conn, &post_id)?.is_none() {
        return Ok(Redirect::to("/").into_response());
    }

    if user.username != comment.username {
        return Ok(Html(PermissionDeniedTemplate {
            user: Some(user.username),
            error: "not your comment to edit!".to_string(),
        })
        .into_response());
    }

    Ok(Html(EditCommentTemplate {
        user: Some(user.username),
        comment_id: comment.id,
        post_id,
        comment: comment.comment,
        error: String::new(),
    })
    .into_response())
}

async fn update_comment(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path((comment_id, post_id)): Path<(String, String)>,
    Form(form): Form<CommentForm>,
) -> AppResult<Response> {
    let conn = state.db.get()?;

    let Some(comment) = comments::get(&conn, &comment_id)? else {
        return Ok(Redirect::to("/").into_response());
    };
    if posts::get(&conn, &post_id)?.is_none() {
        return Ok(Redirect::to("/").into_response());
    }

    if user.username != comment.username {
        return Ok(Html(PermissionDeniedTemplate {
            user: Some(user.username),
            error: "not your comment to edit!".to_string(),
        })
        .into_response());
    }

    if form.comment.is_empty() {
        return Ok(Html(EditCommentTemplate {
            user: Some(user.username),
            comment_id: comment.id,
            post_id,
            comment: form.comment,
            error: "Comment can't be empty!".to_string(),
        })
        .into_response());
    }

    comments::update(&conn, &comment.id, &form.comment)?;
    Ok(Redirect::to(&format!("/post/{}", post_id)).into_response())
}

async fn delete_comment_page(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path((comment_id, post_id)): Path<(String, String)>,
) -> AppResult<Response> {
    let conn = state.db.get()?;

    let Some(comment) = comments::get(&conn, &comment_id)? else {
        return Ok(Redirect::to("/").into_response());
    };
    if posts::get(&conn, &post_id)?.is_none() {
        return Ok(Redirect::to("/").into_response());
    }

    if user.username != comment.username {
        return Ok(Html(PermissionDeniedTemplate {
            user: Some(user.username),
            error: "not your comment to delete!".to_string(),
        })
        .into_response());
    }

    Ok(Html(DeleteCommentTemplate {
        user: Some(user.username),
        comment_id: comment.id,
        post_id,
        comment: comment.comment,
    })
    .into_response())
}

async fn destroy_comment(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path((comment_id, post_id)): Path<(String, String)>,
) -> AppResult<Response> {
    let conn = state.db.get()?;

    let Some(comment) = comments::get(&conn, &comment_id)? else {
        return Ok(Redirect::to("/").into_response());
    };
    if posts::get(&conn, &post_id)?.is_none() {
        return Ok(Redirect::to("/").into_response());
    }

    if user.username != comment.username {
        return Ok(Html(PermissionDeniedTemplate {
            user: Some(user.username),
            error: "not your comment to delete!".to_string(),
        })
        .into_response());
    }

    comments::delete(&conn, &comment.id)?;
    Ok(Redirect::to(&format!("/post/{}", post_id)).into_response())
}
