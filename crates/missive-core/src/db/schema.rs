//! Canonical SQLite schema for missive.
//!
//! Normalized for queryability:
//! - `users` holds staff accounts (password hash stays storage-only)
//! - `letter_types` are templates referenced by letters
//! - `letters` keeps the letter aggregate fields
//! - `content_blocks` models the ordered block list per letter
//!
//! Timestamps are RFC 3339 TEXT; JSON columns are serialized TEXT.

/// Migration v1: core tables.
pub const MIGRATION_V1_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user_id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE CHECK (length(trim(username)) > 0),
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    is_staff INTEGER NOT NULL DEFAULT 0 CHECK (is_staff IN (0, 1)),
    is_superuser INTEGER NOT NULL DEFAULT 0 CHECK (is_superuser IN (0, 1)),
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS letter_types (
    letter_type_id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE CHECK (length(trim(name)) > 0),
    slug TEXT NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT '',
    meta_schema TEXT NOT NULL DEFAULT '{}',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS letters (
    letter_id TEXT PRIMARY KEY,
    title TEXT NOT NULL CHECK (length(trim(title)) > 0),
    description TEXT NOT NULL DEFAULT '',
    recipient_name TEXT NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    letter_type_id TEXT NOT NULL REFERENCES letter_types(letter_type_id) ON DELETE RESTRICT,
    custom_properties TEXT NOT NULL DEFAULT '{}',
    created_by TEXT REFERENCES users(user_id) ON DELETE CASCADE,
    is_published INTEGER NOT NULL DEFAULT 0 CHECK (is_published IN (0, 1)),
    published_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS content_blocks (
    block_id TEXT PRIMARY KEY,
    letter_id TEXT NOT NULL REFERENCES letters(letter_id) ON DELETE CASCADE,
    block_type TEXT NOT NULL CHECK (block_type IN ('text', 'image', 'rich_text')),
    block_order INTEGER NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE (letter_id, block_order)
);
"#;

/// Migration v2: read-path indexes.
pub const MIGRATION_V2_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_letters_slug_published
    ON letters(slug, is_published);

CREATE INDEX IF NOT EXISTS idx_letters_created
    ON letters(created_at DESC);

CREATE INDEX IF NOT EXISTS idx_letters_type
    ON letters(letter_type_id);

CREATE INDEX IF NOT EXISTS idx_content_blocks_letter_order
    ON content_blocks(letter_id, block_order);

CREATE INDEX IF NOT EXISTS idx_letter_types_name
    ON letter_types(name);
"#;
