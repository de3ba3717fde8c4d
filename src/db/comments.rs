use rusqlite::{params, Connection, OptionalExtension};

use crate::db::models::Comment;

fn row_to_comment(row: &rusqlite::Row) -> Result<Comment, rusqlite::Error> {
    Ok(Comment {
        id: row.get(0)?,
        post_id: row.get(1)?,
        username: row.get(2)?,
        comment: row.get(3)?,
        created: row.get(4)?,
        last_modified: row.get(5)?,
    })
}

pub fn insert(
    conn: &Connection,
    post_id: &str,
    username: &str,
    comment: &str,
) -> Result<Comment, rusqlite::Error> {
    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO comments (id, post_id, username, comment) VALUES (?1, ?2, ?3, ?4)",
        params![id, post_id, username, comment],
    )?;
    conn.query_row(
        "SELECT id, post_id, username, comment, created, last_modified \
         FROM comments WHERE id = ?1",
        params![id],
        row_to_comment,
    )
}

pub fn get(conn: &Connection, id: &str) -> Result<Option<Comment>, rusqlite::Error> {
    conn.query_row(
        "SELECT id, post_id, username, comment, created, last_modified \
         FROM comments WHERE id = ?1",
        params![id],
        row_to_comment,
    )
    .optional()
}

/// All comments on a post, oldest first.
pub fn for_post(conn: &Connection, post_id: &str) -> Result<Vec<Comment>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT id, post_id, username, comment, created, last_modified \
         FROM comments WHERE post_id = ?1 ORDER BY created, rowid",
    )?;
    let rows = stmt.query_map(params![post_id], row_to_comment)?;
    rows.collect()
}

pub fn count_for_post(conn: &Connection, post_id: &str) -> Result<i64, rusqlite::Error> {
    conn.query_row(
        "SELECT COUNT(*) FROM comments WHERE post_id = ?1",
        params![post_id],
        |row| row.get(0),
    )
}

pub fn update(conn: &Connection, id: &str, comment: &str) -> Result<(), rusqlite::Error> {
    conn.execute(
        "UPDATE comments SET comment = ?2, last_modified = datetime('now') WHERE id = ?1",
        params![id, comment],
    )?;
    Ok(())
}

pub fn delete(conn: &Connection, id: &str) -> Result<(), rusqlite::Error> {
    conn.execute("DELETE FROM comments WHERE id = ?1", params![id])?;
    Ok(())
}
