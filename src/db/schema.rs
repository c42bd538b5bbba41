//! Database schema and migrations for chanboard.
//!
//! Migrations are applied in order when the database is opened. The
//! `schema_version` table records how many have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: accounts
    r#"
CREATE TABLE users (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    email           TEXT NOT NULL UNIQUE COLLATE NOCASE,
    username        TEXT NOT NULL UNIQUE,
    password        TEXT NOT NULL,           -- Argon2 PHC string
    date_of_birth   TEXT,                    -- YYYY-MM-DD
    avatar          TEXT NOT NULL DEFAULT 'uploads/defaults/default.png',
    is_active       INTEGER NOT NULL DEFAULT 1,
    is_staff        INTEGER NOT NULL DEFAULT 0,
    is_admin        INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL DEFAULT (datetime('now'))
);
"#,
    // v2: boards
    r#"
CREATE TABLE boards (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL UNIQUE,
    code        TEXT NOT NULL UNIQUE,
    creator_id  INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_boards_creator_id ON boards(creator_id);
"#,
    // v3: threads
    r#"
CREATE TABLE threads (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    board_id    INTEGER NOT NULL REFERENCES boards(id) ON DELETE CASCADE,
    author_id   INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title       TEXT NOT NULL,
    content     TEXT NOT NULL,
    image       TEXT,
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_threads_board_id ON threads(board_id);
CREATE INDEX idx_threads_author_id ON threads(author_id);
"#,
    // v4: votes
    r#"
CREATE TABLE thread_upvotes (
    thread_id   INTEGER NOT NULL REFERENCES threads(id) ON DELETE CASCADE,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    PRIMARY KEY (thread_id, user_id)
);

CREATE TABLE thread_downvotes (
    thread_id   INTEGER NOT NULL REFERENCES threads(id) ON DELETE CASCADE,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    PRIMARY KEY (thread_id, user_id)
);

CREATE INDEX idx_thread_upvotes_user_id ON thread_upvotes(user_id);
CREATE INDEX idx_thread_downvotes_user_id ON thread_downvotes(user_id);
"#,
];
