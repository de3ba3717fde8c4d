use rusqlite::{params, Connection, OptionalExtension};

use crate::db::models::User;

fn row_to_user(row: &rusqlite::Row) -> Result<User, rusqlite::Error> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        email: row.get(3)?,
        created: row.get(4)?,
    })
}

pub fn insert(
    conn: &Connection,
    username: &str,
    password_hash: &str,
    email: Option<&str>,
) -> Result<User, rusqlite::Error> {
    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO users (id, username, password_hash, email) VALUES (?1, ?2, ?3, ?4)",
        params![id, username, password_hash, email],
    )?;
    conn.query_row(
        "SELECT id, username, password_hash, email, created FROM users WHERE id = ?1",
        params![id],
        row_to_user,
    )
}

pub fn get_by_id(conn: &Connection, id: &str) -> Result<Option<User>, rusqlite::Error> {
    conn.query_row(
        "SELECT id, username, password_hash, email, created FROM users WHERE id = ?1",
        params![id],
        row_to_user,
    )
    .optional()
}

/// First user with this username. Duplicates are possible in principle
/// (no uniqueness constraint); the first row wins.
pub fn get_by_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<User>, rusqlite::Error> {
    conn.query_row(
        "SELECT id, username, password_hash, email, created FROM users \
         WHERE username = ?1 ORDER BY rowid LIMIT 1",
        params![username],
        row_to_user,
    )
    .optional()
}
