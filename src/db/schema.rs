//! SQL DDL for the blog tables.
//! Every statement is create-if-missing, so running it again is a no-op.

/// SQLite schema with:
/// - `users`: unique `username`, PHC `password_hash`, `online` flag (INTEGER 0/1)
/// - `posts`: authored by a user, published by default
/// - `comments`: attached to a post, optionally replying to another comment
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    online INTEGER NOT NULL DEFAULT 0,
    last_seen TEXT NULL -- RFC3339
);

CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    author_id INTEGER NOT NULL REFERENCES users(id),
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    is_published INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at);

CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id INTEGER NOT NULL REFERENCES posts(id),
    parent_id INTEGER NULL REFERENCES comments(id),
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    is_approved INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_comments_post_id ON comments(post_id);
"#;

/// Tables created by [`SQLITE_INIT`].
pub const TABLES: &[&str] = &["users", "posts", "comments"];
