use askama::Template;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use serde::Deserialize;

use crate::auth::password;
use crate::db::users;
use crate::error::AppResult;
use crate::extractors::MaybeUser;
use crate::routes::home::Html;
use crate::state::AppState;
use crate::validate;

// -- Templates --

#[derive(Template, Default)]
#[template(path = "pages/signup.html")]
struct SignupTemplate {
    user: Option<String>,
    username: String,
    email: String,
    error_username: String,
    error_password: String,
    error_verify: String,
    error_email: String,
}

#[derive(Template, Default)]
#[template(path = "pages/login.html")]
struct LoginTemplate {
    user: Option<String>,
    username: String,
    error_username: String,
    error_password: String,
    error_login: String,
}

#[derive(Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub verify: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", get(signup_page).post(signup))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}

// -- Handlers --

async fn signup_page(MaybeUser(viewer): MaybeUser) -> Response {
    Html(SignupTemplate {
        user: viewer.map(|u| u.username),
        ..Default::default()
    })
    .into_response()
}

async fn signup(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Form(form): Form<SignupForm>,
) -> AppResult<Response> {
    let mut page = SignupTemplate {
        user: viewer.map(|u| u.username),
        username: form.username.clone(),
        email: form.email.clone(),
        ..Default::default()
    };
    let mut have_error = false;

    if !validate::valid_username(&form.username) {
        page.error_username = "That's not a valid username.".to_string();
        have_error = true;
    }
    if !validate::valid_password(&form.password) {
        page.error_password = "That wasn't a valid password.".to_string();
        have_error = true;
    } else if form.password != form.verify {
        // only checked once the password itself is acceptable
        page.error_verify = "Your passwords didn't match.".to_string();
        have_error = true;
    }
    if !validate::valid_email(&form.email) {
        page.error_email = "That's not a valid email.".to_string();
        have_error = true;
    }

    if have_error {
        return Ok(Html(page).into_response());
    }

    let conn = state.db.get()?;

    // Check-then-insert; a concurrent signup with the same name can still
    // slip through, which the schema tolerates.
    if users::get_by_username(&conn, &form.username)?.is_some() {
        page.error_username =
            "User already exists! Please enter a unique username.".to_string();
        return Ok(Html(page).into_response());
    }

    let email = if form.email.is_empty() {
        None
    } else {
        Some(form.email.as_str())
    };
    let password_hash = password::hash_password(&form.password)?;
    let user = users::insert(&conn, &form.username, &password_hash, email)?;

    tracing::info!("New user signed up: {}", user.username);

    let cookie = state
        .cookies
        .session_cookie(&state.config.auth.cookie_name, &user.id);
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

async fn login_page(MaybeUser(viewer): MaybeUser) -> Response {
    Html(LoginTemplate {
        user: viewer.map(|u| u.username),
        ..Default::default()
    })
    .into_response()
}

async fn login(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let mut page = LoginTemplate {
        user: viewer.map(|u| u.username),
        username: form.username.clone(),
        ..Default::default()
    };
    let mut have_error = false;

    if !validate::valid_username(&form.username) {
        page.error_username = "That's not a valid username.".to_string();
        have_error = true;
    }
    if !validate::valid_password(&form.password) {
        page.error_password = "That wasn't a valid password.".to_string();
        have_error = true;
    }
    if have_error {
        return Ok(Html(page).into_response());
    }

    let conn = state.db.get()?;

    if let Some(user) = users::get_by_username(&conn, &form.username)? {
        if password::verify_password(&form.password, &user.password_hash)? {
            let cookie = state
                .cookies
                .session_cookie(&state.config.auth.cookie_name, &user.id);
            return Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response());
        }
    }

    page.error_login = "Invalid username or password!".to_string();
    Ok(Html(page).into_response())
}

async fn logout(State(state): State<AppState>) -> Response {
    let cookie = state
        .cookies
        .clear_cookie(&state.config.auth.cookie_name);
    ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}
