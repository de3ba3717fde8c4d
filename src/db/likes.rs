use rusqlite::{params, Connection, OptionalExtension};

use crate::db::models::Like;

fn row_to_like(row: &rusqlite::Row) -> Result<Like, rusqlite::Error> {
    Ok(Like {
        id: row.get(0)?,
        post_id: row.get(1)?,
        username: row.get(2)?,
        like: row.get(3)?,
    })
}

pub fn insert(conn: &Connection, post_id: &str, username: &str) -> Result<Like, rusqlite::Error> {
    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO likes (id, post_id, username, \"like\") VALUES (?1, ?2, ?3, 1)",
        params![id, post_id, username],
    )?;
    conn.query_row(
        "SELECT id, post_id, username, \"like\" FROM likes WHERE id = ?1",
        params![id],
        row_to_like,
    )
}

/// The user's like on a post, if any. Duplicate rows are possible since
/// nothing enforces uniqueness; the first row wins.
pub fn first_for_user(
    conn: &Connection,
    post_id: &str,
    username: &str,
) -> Result<Option<Like>, rusqlite::Error> {
    conn.query_row(
        "SELECT id, post_id, username, \"like\" FROM likes \
         WHERE post_id = ?1 AND username = ?2 ORDER BY rowid LIMIT 1",
        params![post_id, username],
        row_to_like,
    )
    .optional()
}

pub fn count_for_post(conn: &Connection, post_id: &str) -> Result<i64, rusqlite::Error> {
    conn.query_row(
        "SELECT COUNT(*) FROM likes WHERE post_id = ?1",
        params![post_id],
        |row| row.get(0),
    )
}

pub fn delete(conn: &Connection, id: &str) -> Result<(), rusqlite::Error> {
    conn.execute("DELETE FROM likes WHERE id = ?1", params![id])?;
    Ok(())
}
