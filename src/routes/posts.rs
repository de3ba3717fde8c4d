use askama::Template;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use rusqlite::Connection;
use serde::Deserialize;

use crate::db::models::{Comment, Post, User};
use crate::db::{comments, likes, posts};
use crate::error::AppResult;
use crate::extractors::{MaybeUser, SessionUser};
use crate::routes::home::Html;
use crate::state::AppState;

// -- View models --

/// Everything a template needs to show one post.
pub struct PostCard {
    pub id: String,
    pub username: String,
    pub subject: String,
    pub content_html: String,
    pub created: String,
    pub likes_count: i64,
    pub comment_count: i64,
    pub liked_by_me: bool,
    pub mine: bool,
}

pub struct CommentCard {
    pub id: String,
    pub post_id: String,
    pub username: String,
    pub comment_html: String,
    pub created: String,
    pub mine: bool,
}

pub fn post_card(
    conn: &Connection,
    post: &Post,
    viewer: Option<&User>,
) -> Result<PostCard, rusqlite::Error> {
    let likes_count = likes::count_for_post(conn, &post.id)?;
    let comment_count = comments::count_for_post(conn, &post.id)?;
    let liked_by_me = match viewer {
        Some(user) => likes::first_for_user(conn, &post.id, &user.username)?.is_some(),
        None => false,
    };

    Ok(PostCard {
        id: post.id.clone(),
        username: post.username.clone(),
        subject: post.subject.clone(),
        content_html: posts::content_html(&post.content),
        created: post.created.clone(),
        likes_count,
        comment_count,
        liked_by_me,
        mine: viewer.is_some_and(|u| u.username == post.username),
    })
}

pub fn comment_card(comment: &Comment, viewer: Option<&User>) -> CommentCard {
    CommentCard {
        id: comment.id.clone(),
        post_id: comment.post_id.clone(),
        username: comment.username.clone(),
        comment_html: posts::content_html(&posts::encode_breaks(&comment.comment)),
        created: comment.created.clone(),
        mine: viewer.is_some_and(|u| u.username == comment.username),
    }
}

// -- Templates --

#[derive(Template)]
#[template(path = "pages/permalink.html")]
struct PermalinkTemplate {
    user: Option<String>,
    post: PostCard,
    comments: Vec<CommentCard>,
}

#[derive(Template)]
#[template(path = "pages/newpost.html")]
struct NewPostTemplate {
    user: Option<String>,
    subject: String,
    content: String,
    error: String,
}

#[derive(Template)]
#[template(path = "pages/editpost.html")]
struct EditPostTemplate {
    user: Option<String>,
    post_id: String,
    subject: String,
    content: String,
    error: String,
}

#[derive(Template)]
#[template(path = "pages/deletepost.html")]
struct DeletePostTemplate {
    user: Option<String>,
    post_id: String,
    subject: String,
    content: String,
}

#[derive(Template)]
#[template(path = "pages/deleted.html")]
struct DeletedTemplate {
    user: Option<String>,
    entity: String,
}

#[derive(Template)]
#[template(path = "pages/permission_denied.html")]
pub struct PermissionDeniedTemplate {
    pub user: Option<String>,
    pub error: String,
}

#[derive(Deserialize)]
pub struct PostForm {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub content: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/newpost", get(new_post_page).post(create_post))
        .route("/post/{id}", get(view_post))
        .route("/postdeleted", get(post_deleted))
        .route("/editpost/{id}", get(edit_post_page).post(update_post))
        .route("/deletepost/{id}", get(delete_post_page).post(destroy_post))
        .route("/likepost/{id}", get(like_post))
        .route("/unlikepost/{id}", get(unlike_post))
}

// -- Handlers --

async fn new_post_page(SessionUser(user): SessionUser) -> Response {
    Html(NewPostTemplate {
        user: Some(user.username),
        subject: String::new(),
        content: String::new(),
        error: String::new(),
    })
    .into_response()
}

async fn create_post(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Form(form): Form<PostForm>,
) -> AppResult<Response> {
    if form.subject.is_empty() || form.content.is_empty() {
        return Ok(Html(NewPostTemplate {
            user: Some(user.username),
            subject: form.subject,
            content: form.content,
            error: "subject and content, please!".to_string(),
        })
        .into_response());
    }

    let conn = state.db.get()?;
    let post = posts::insert(
        &conn,
        &user.username,
        &form.subject,
        &posts::encode_breaks(&form.content),
    )?;

    Ok(Redirect::to(&format!("/post/{}", post.id)).into_response())
}

/// Permalink: the post plus its comments.
async fn view_post(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let conn = state.db.get()?;

    let Some(post) = posts::get(&conn, &id)? else {
        return Ok((StatusCode::NOT_FOUND, "Error! Post Not Found").into_response());
    };

    let card = post_card(&conn, &post, viewer.as_ref())?;
    let comment_cards = comments::for_post(&conn, &post.id)?
        .iter()
        .map(|c| comment_card(c, viewer.as_ref()))
        .collect();

    Ok(Html(PermalinkTemplate {
        user: viewer.map(|u| u.username),
        post: card,
        comments: comment_cards,
    })
    .into_response())
}

async fn post_deleted(MaybeUser(viewer): MaybeUser) -> Response {
    Html(DeletedTemplate {
        user: viewer.map(|u| u.username),
        entity: "Post".to_string(),
    })
    .into_response()
}

async fn edit_post_page(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let conn = state.db.get()?;

    let Some(post) = posts::get(&conn, &id)? else {
        return Ok(Redirect::to("/").into_response());
    };

    if user.username != post.username {
        return Ok(Html(PermissionDeniedTemplate {
            user: Some(user.username),
            error: "not your post to edit!".to_string(),
        })
        .into_response());
    }

    Ok(Html(EditPostTemplate {
        user: Some(user.username),
        post_id: post.id,
        subject: post.subject,
        content: posts::decode_breaks(&post.content),
        error: String::new(),
    })
    .into_response())
}

async fn update_post(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(id): Path<String>,
    Form(form): Form<PostForm>,
) -> AppResult<Response> {
    let conn = state.db.get()?;

    let Some(post) = posts::get(&conn, &id)? else {
        return Ok(Redirect::to("/").into_response());
    };

    if form.subject.is_empty() || form.content.is_empty() {
        return Ok(Html(EditPostTemplate {
            user: Some(user.username),
            post_id: post.id,
            subject: form.subject,
            content: form.content,
            error: "subject and content, please!".to_string(),
        })
        .into_response());
    }

    if user.username != post.username {
        return Ok(Html(PermissionDeniedTemplate {
            user: Some(user.username),
            error: "not your post to edit!".to_string(),
        })
        .into_response());
    }

    posts::update(&conn, &post.id, &form.subject, &posts::encode_breaks(&form.content))?;
    Ok(Redirect::to(&format!("/post/{}", post.id)).into_response())
}

async fn delete_post_page(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let conn = state.db.get()?;

    let Some(post) = posts::get(&conn, &id)? else {
        return Ok(Redirect::to("/").into_response());
    };

    if user.username != post.username {
        return Ok(Html(PermissionDeniedTemplate {
            user: Some(user.username),
            error: "not your post to delete!".to_string(),
        })
        .into_response());
    }

    Ok(Html(DeletePostTemplate {
        user: Some(user.username),
        post_id: post.id,
        subject: post.subject,
        content: posts::decode_breaks(&post.content),
    })
    .into_response())
}

async fn destroy_post(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let conn = state.db.get()?;

    let Some(post) = posts::get(&conn, &id)? else {
        return Ok(Redirect::to("/").into_response());
    };

    if user.username != post.username {
        return Ok(Html(PermissionDeniedTemplate {
            user: Some(user.username),
            error: "not your post to delete!".to_string(),
        })
        .into_response());
    }

    // Only the post row goes; comments and likes keep their dangling
    // post_id (no cascade in the schema).
    posts::delete(&conn, &post.id)?;
    Ok(Redirect::to("/postdeleted").into_response())
}

async fn like_post(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let conn = state.db.get()?;

    let Some(post) = posts::get(&conn, &id)? else {
        return Ok(Redirect::to("/").into_response());
    };

    // Already liked: nothing to do
    if likes::first_for_user(&conn, &post.id, &user.username)?.is_some() {
        return Ok(Redirect::to(&format!("/post/{}", post.id)).into_response());
    }

    // Liking your own post is silently skipped
    if user.username != post.username {
        likes::insert(&conn, &post.id, &user.username)?;
    }

    Ok(Redirect::to(&format!("/post/{}", post.id)).into_response())
}

async fn unlike_post(
    State(state): State<AppState>,
    SessionUser(user): SessionUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let conn = state.db.get()?;

    let Some(post) = posts::get(&conn, &id)? else {
        return Ok(Redirect::to("/").into_response());
    };

    // Remove the first matching row; duplicates (possible under concurrent
    // likes) would take another pass each.
    if let Some(like) = likes::first_for_user(&conn, &post.id, &user.username)? {
        likes::delete(&conn, &like.id)?;
    }

    Ok(Redirect::to(&format!("/post/{}", post.id)).into_response())
}
