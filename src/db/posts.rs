use rusqlite::{params, Connection, OptionalExtension};

use crate::db::models::Post;

fn row_to_post(row: &rusqlite::Row) -> Result<Post, rusqlite::Error> {
    Ok(Post {
        id: row.get(0)?,
        username: row.get(1)?,
        subject: row.get(2)?,
        content: row.get(3)?,
        created: row.get(4)?,
        last_modified: row.get(5)?,
    })
}

/// Store a post. `content` is expected in stored form (`<br>` markers),
/// see [`encode_breaks`].
pub fn insert(
    conn: &Connection,
    username: &str,
    subject: &str,
    content: &str,
) -> Result<Post, rusqlite::Error> {
    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO posts (id, username, subject, content) VALUES (?1, ?2, ?3, ?4)",
        params![id, username, subject, content],
    )?;
    conn.query_row(
        "SELECT id, username, subject, content, created, last_modified \
         FROM posts WHERE id = ?1",
        params![id],
        row_to_post,
    )
}

pub fn get(conn: &Connection, id: &str) -> Result<Option<Post>, rusqlite::Error> {
    conn.query_row(
        "SELECT id, username, subject, content, created, last_modified \
         FROM posts WHERE id = ?1",
        params![id],
        row_to_post,
    )
    .optional()
}

/// Latest posts for the front page, newest first. Timestamps have second
/// granularity, so insertion order (rowid) breaks ties.
pub fn recent(conn: &Connection, limit: i64) -> Result<Vec<Post>, rusqlite::Error> {
    let mut stmt = conn.prepare(
        "SELECT id, username, subject, content, created, last_modified \
         FROM posts ORDER BY created DESC, rowid DESC LIMIT ?1",
    )?;
    let rows = stmt.query_map(params![limit], row_to_post)?;
    rows.collect()
}

pub fn update(
    conn: &Connection,
    id: &str,
    subject: &str,
    content: &str,
) -> Result<(), rusqlite::Error> {
    conn.execute(
        "UPDATE posts SET subject = ?2, content = ?3, last_modified = datetime('now') \
         WHERE id = ?1",
        params![id, subject, content],
    )?;
    Ok(())
}

/// Delete the post row only. Comments and likes keep their denormalized
/// post_id and are left behind.
pub fn delete(conn: &Connection, id: &str) -> Result<(), rusqlite::Error> {
    conn.execute("DELETE FROM posts WHERE id = ?1", params![id])?;
    Ok(())
}

/// Form text to stored form: newlines become `<br>` markers.
pub fn encode_breaks(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "<br>")
}

/// Stored form back to editable text.
pub fn decode_breaks(stored: &str) -> String {
    stored.replace("<br>", "\n")
}

/// Stored content to display HTML: each segment between `<br>` markers is
/// escaped, the markers themselves become real line breaks.
pub fn content_html(stored: &str) -> String {
    stored
        .split("<br>")
        .map(|segment| html_escape::encode_text(segment).into_owned())
        .collect::<Vec<_>>()
        .join("<br>")
}
