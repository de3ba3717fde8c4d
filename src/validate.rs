use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]{3,20}$").unwrap());
static PASSWORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^.{3,20}$").unwrap());
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").unwrap());

/// 3-20 characters from `[a-zA-Z0-9_-]`.
pub fn valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

/// 3-20 characters, anything goes.
pub fn valid_password(password: &str) -> bool {
    PASSWORD_RE.is_match(password)
}

/// Optional; when present a loose `x@y.z` shape is enough.
pub fn valid_email(email: &str) -> bool {
    email.is_empty() || EMAIL_RE.is_match(email)
}
