//! Typed query layer for the missive database.
//!
//! All functions take a `&Connection` (or `&mut` for transactional writes)
//! and return model structs, never raw rows. Absent rows surface as the
//! matching `CoreError::*NotFound` variant so callers can map them onto
//! HTTP statuses without string matching.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use uuid::Uuid;

use crate::error::CoreError;
use crate::model::{
    BlockType, ContentBlock, Letter, LetterType, NewContentBlock, NewLetter, NewLetterType,
    UpdateLetter, UpdateLetterType, User,
};
use crate::slug::{slugify, unique_slug};

type Result<T> = std::result::Result<T, CoreError>;

// ---------------------------------------------------------------------------
// Row decoding helpers
// ---------------------------------------------------------------------------

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CoreError::Corrupt(format!("bad timestamp '{raw}': {e}")))
}

fn parse_json(raw: &str) -> Result<serde_json::Value> {
    serde_json::from_str(raw).map_err(|e| CoreError::Corrupt(format!("bad json column: {e}")))
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| CoreError::Corrupt(format!("bad uuid '{raw}': {e}")))
}

fn parse_block_type(raw: &str) -> Result<BlockType> {
    raw.parse()
        .map_err(|_| CoreError::Corrupt(format!("bad block type '{raw}'")))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Insert a user with an already-hashed password.
pub fn insert_user(
    conn: &Connection,
    username: &str,
    email: &str,
    password_hash: &str,
    is_staff: bool,
    is_superuser: bool,
) -> Result<User> {
    let username = username.trim();
    if username.is_empty() {
        return Err(CoreError::Validation("username must not be empty".into()));
    }

    let id = Uuid::new_v4();
    let now = now_rfc3339();
    conn.execute(
        "INSERT INTO users (user_id, username, email, password_hash, is_staff, is_superuser,
                            created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
        params![
            id.to_string(),
            username,
            email,
            password_hash,
            is_staff,
            is_superuser,
            now
        ],
    )?;

    Ok(User {
        id,
        username: username.to_string(),
        email: email.to_string(),
        is_staff,
        is_superuser,
    })
}

/// Look up a user by username, returning the stored password hash alongside
/// the account for credential checks. `None` when no such user exists.
pub fn find_credentials(conn: &Connection, username: &str) -> Result<Option<(User, String)>> {
    let row = conn
        .query_row(
            "SELECT user_id, username, email, password_hash, is_staff, is_superuser
             FROM users WHERE username = ?1",
            [username],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, bool>(4)?,
                    row.get::<_, bool>(5)?,
                ))
            },
        )
        .optional()?;

    let Some((id, username, email, hash, is_staff, is_superuser)) = row else {
        return Ok(None);
    };

    Ok(Some((
        User {
            id: parse_id(&id)?,
            username,
            email,
            is_staff,
            is_superuser,
        },
        hash,
    )))
}

pub fn get_user(conn: &Connection, id: Uuid) -> Result<User> {
    let row = conn
        .query_row(
            "SELECT user_id, username, email, is_staff, is_superuser
             FROM users WHERE user_id = ?1",
            [id.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, bool>(3)?,
                    row.get::<_, bool>(4)?,
                ))
            },
        )
        .optional()?;

    let Some((id, username, email, is_staff, is_superuser)) = row else {
        return Err(CoreError::UserNotFound(id.to_string()));
    };

    Ok(User {
        id: parse_id(&id)?,
        username,
        email,
        is_staff,
        is_superuser,
    })
}

/// True when at least one staff account exists (admin bootstrap check).
pub fn staff_user_exists(conn: &Connection) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE is_staff = 1)",
        [],
        |row| row.get(0),
    )?;
    Ok(exists)
}

// ---------------------------------------------------------------------------
// Letter types
// ---------------------------------------------------------------------------

fn letter_type_slug_exists(conn: &Connection, slug: &str) -> bool {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM letter_types WHERE slug = ?1)",
        [slug],
        |row| row.get(0),
    )
    .unwrap_or(false)
}

fn read_letter_type_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, String, String, String, String, String)> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn decode_letter_type(
    (id, name, slug, description, meta_schema, created_at, updated_at): (
        String,
        String,
        String,
        String,
        String,
        String,
        String,
    ),
) -> Result<LetterType> {
    Ok(LetterType {
        id: parse_id(&id)?,
        name,
        slug,
        description,
        meta_schema: parse_json(&meta_schema)?,
        created_at: parse_ts(&created_at)?,
        updated_at: parse_ts(&updated_at)?,
    })
}

const LETTER_TYPE_COLUMNS: &str =
    "letter_type_id, name, slug, description, meta_schema, created_at, updated_at";

pub fn insert_letter_type(conn: &Connection, new: &NewLetterType) -> Result<LetterType> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(CoreError::Validation("name must not be empty".into()));
    }

    let slug = unique_slug(&slugify(name), |candidate| {
        letter_type_slug_exists(conn, candidate)
    });
    let meta_schema = new
        .meta_schema
        .clone()
        .unwrap_or_else(|| serde_json::json!({}));
    let id = Uuid::new_v4();
    let now = now_rfc3339();

    conn.execute(
        "INSERT INTO letter_types (letter_type_id, name, slug, description, meta_schema,
                                   created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![
            id.to_string(),
            name,
            slug,
            new.description,
            meta_schema.to_string(),
            now
        ],
    )?;

    get_letter_type(conn, id)
}

pub fn list_letter_types(conn: &Connection) -> Result<Vec<LetterType>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {LETTER_TYPE_COLUMNS} FROM letter_types ORDER BY name"
    ))?;
    let rows = stmt.query_map([], read_letter_type_row)?;

    let mut out = Vec::new();
    for row in rows {
        out.push(decode_letter_type(row?)?);
    }
    Ok(out)
}

pub fn get_letter_type(conn: &Connection, id: Uuid) -> Result<LetterType> {
    let row = conn
        .query_row(
            &format!("SELECT {LETTER_TYPE_COLUMNS} FROM letter_types WHERE letter_type_id = ?1"),
            [id.to_string()],
            read_letter_type_row,
        )
        .optional()?;

    let Some(row) = row else {
        return Err(CoreError::LetterTypeNotFound(id.to_string()));
    };
    decode_letter_type(row)
}

pub fn update_letter_type(
    conn: &Connection,
    id: Uuid,
    update: &UpdateLetterType,
) -> Result<LetterType> {
    let existing = get_letter_type(conn, id)?;

    let name = match &update.name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        Some(_) => return Err(CoreError::Validation("name must not be empty".into())),
        None => existing.name,
    };
    let description = update
        .description
        .clone()
        .unwrap_or(existing.description);
    let meta_schema = update
        .meta_schema
        .clone()
        .unwrap_or(existing.meta_schema);

    conn.execute(
        "UPDATE letter_types
         SET name = ?2, description = ?3, meta_schema = ?4, updated_at = ?5
         WHERE letter_type_id = ?1",
        params![
            id.to_string(),
            name,
            description,
            meta_schema.to_string(),
            now_rfc3339()
        ],
    )?;

    get_letter_type(conn, id)
}

pub fn delete_letter_type(conn: &Connection, id: Uuid) -> Result<()> {
    let in_use: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM letters WHERE letter_type_id = ?1)",
        [id.to_string()],
        |row| row.get(0),
    )?;
    if in_use {
        return Err(CoreError::Validation(
            "letter type is referenced by letters".into(),
        ));
    }

    let deleted = conn.execute(
        "DELETE FROM letter_types WHERE letter_type_id = ?1",
        [id.to_string()],
    )?;
    if deleted == 0 {
        return Err(CoreError::LetterTypeNotFound(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Letters
// ---------------------------------------------------------------------------

fn letter_slug_exists(conn: &Connection, slug: &str) -> bool {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM letters WHERE slug = ?1)",
        [slug],
        |row| row.get(0),
    )
    .unwrap_or(false)
}

struct LetterRow {
    id: String,
    title: String,
    description: String,
    recipient_name: String,
    slug: String,
    letter_type_id: String,
    custom_properties: String,
    created_by: Option<String>,
    is_published: bool,
    published_at: Option<String>,
    created_at: String,
    updated_at: String,
}

const LETTER_COLUMNS: &str = "letter_id, title, description, recipient_name, slug, \
     letter_type_id, custom_properties, created_by, is_published, published_at, \
     created_at, updated_at";

fn read_letter_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<LetterRow> {
    Ok(LetterRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        recipient_name: row.get(3)?,
        slug: row.get(4)?,
        letter_type_id: row.get(5)?,
        custom_properties: row.get(6)?,
        created_by: row.get(7)?,
        is_published: row.get(8)?,
        published_at: row.get(9)?,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

fn blocks_for_letter(conn: &Connection, letter_id: &str) -> Result<Vec<ContentBlock>> {
    let mut stmt = conn.prepare(
        "SELECT block_id, block_type, block_order, content, created_at
         FROM content_blocks WHERE letter_id = ?1 ORDER BY block_order",
    )?;
    let rows = stmt.query_map([letter_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i64>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ))
    })?;

    let mut blocks = Vec::new();
    for row in rows {
        let (id, block_type, order, content, created_at) = row?;
        blocks.push(ContentBlock {
            id: parse_id(&id)?,
            block_type: parse_block_type(&block_type)?,
            order,
            content: parse_json(&content)?,
            created_at: parse_ts(&created_at)?,
        });
    }
    Ok(blocks)
}

fn assemble_letter(conn: &Connection, row: LetterRow) -> Result<Letter> {
    let letter_type = get_letter_type(conn, parse_id(&row.letter_type_id)?)?;
    let content_blocks = blocks_for_letter(conn, &row.id)?;
    let created_by = match &row.created_by {
        Some(raw) => Some(get_user(conn, parse_id(raw)?)?),
        None => None,
    };
    let published_at = match &row.published_at {
        Some(raw) => Some(parse_ts(raw)?),
        None => None,
    };

    Ok(Letter {
        id: parse_id(&row.id)?,
        title: row.title,
        description: row.description,
        recipient_name: row.recipient_name,
        slug: row.slug,
        letter_type,
        custom_properties: parse_json(&row.custom_properties)?,
        content_blocks,
        is_published: row.is_published,
        published_at,
        created_by,
        created_at: parse_ts(&row.created_at)?,
        updated_at: parse_ts(&row.updated_at)?,
        public_url: None,
    })
}

fn insert_blocks(
    conn: &Connection,
    letter_id: &str,
    blocks: &[NewContentBlock],
) -> Result<()> {
    let mut orders = std::collections::HashSet::new();
    for block in blocks {
        if !orders.insert(block.order) {
            return Err(CoreError::Validation(format!(
                "duplicate content block order {}",
                block.order
            )));
        }
    }

    let now = now_rfc3339();
    let mut stmt = conn.prepare(
        "INSERT INTO content_blocks (block_id, letter_id, block_type, block_order, content,
                                     created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for block in blocks {
        stmt.execute(params![
            Uuid::new_v4().to_string(),
            letter_id,
            block.block_type.to_string(),
            block.order,
            block.content.to_string(),
            now
        ])?;
    }
    Ok(())
}

/// Create a letter and its content blocks in one transaction. The slug is
/// derived from the title with `-N` uniquing.
pub fn insert_letter(conn: &mut Connection, new: &NewLetter, created_by: &User) -> Result<Letter> {
    let title = new.title.trim();
    if title.is_empty() {
        return Err(CoreError::Validation("title must not be empty".into()));
    }
    // Fails early with the right code instead of a bare FK violation.
    let _ = get_letter_type(conn, new.letter_type_id)?;

    let slug = unique_slug(&slugify(title), |candidate| {
        letter_slug_exists(conn, candidate)
    });
    let custom_properties = new
        .custom_properties
        .clone()
        .unwrap_or_else(|| serde_json::json!({}));
    let id = Uuid::new_v4();
    let now = now_rfc3339();

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO letters (letter_id, title, description, recipient_name, slug,
                              letter_type_id, custom_properties, created_by, is_published,
                              published_at, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, NULL, ?9, ?9)",
        params![
            id.to_string(),
            title,
            new.description,
            new.recipient_name,
            slug,
            new.letter_type_id.to_string(),
            custom_properties.to_string(),
            created_by.id.to_string(),
            now
        ],
    )?;
    insert_blocks(&tx, &id.to_string(), &new.content_blocks)?;
    tx.commit()?;

    get_letter(conn, id)
}

pub fn list_letters(conn: &Connection) -> Result<Vec<Letter>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {LETTER_COLUMNS} FROM letters ORDER BY created_at DESC"
    ))?;
    let rows = stmt.query_map([], read_letter_row)?;

    let mut raw_rows = Vec::new();
    for row in rows {
        raw_rows.push(row?);
    }

    let mut out = Vec::with_capacity(raw_rows.len());
    for row in raw_rows {
        out.push(assemble_letter(conn, row)?);
    }
    Ok(out)
}

pub fn get_letter(conn: &Connection, id: Uuid) -> Result<Letter> {
    let row = conn
        .query_row(
            &format!("SELECT {LETTER_COLUMNS} FROM letters WHERE letter_id = ?1"),
            [id.to_string()],
            read_letter_row,
        )
        .optional()?;

    let Some(row) = row else {
        return Err(CoreError::LetterNotFound(id.to_string()));
    };
    assemble_letter(conn, row)
}

/// The public read path: by slug, published letters only. Unpublished and
/// unknown slugs are indistinguishable to callers.
pub fn get_published_letter_by_slug(conn: &Connection, slug: &str) -> Result<Letter> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {LETTER_COLUMNS} FROM letters WHERE slug = ?1 AND is_published = 1"
            ),
            [slug],
            read_letter_row,
        )
        .optional()?;

    let Some(row) = row else {
        return Err(CoreError::LetterNotFound(slug.to_string()));
    };
    assemble_letter(conn, row)
}

/// Apply a partial update. When `content_blocks` is present the letter's
/// blocks are deleted and recreated wholesale rather than merged.
pub fn update_letter(conn: &mut Connection, id: Uuid, update: &UpdateLetter) -> Result<Letter> {
    let existing = get_letter(conn, id)?;

    let title = match &update.title {
        Some(title) if !title.trim().is_empty() => title.trim().to_string(),
        Some(_) => return Err(CoreError::Validation("title must not be empty".into())),
        None => existing.title,
    };
    let description = update
        .description
        .clone()
        .unwrap_or(existing.description);
    let recipient_name = update
        .recipient_name
        .clone()
        .unwrap_or(existing.recipient_name);
    let letter_type_id = match update.letter_type_id {
        Some(type_id) => {
            let _ = get_letter_type(conn, type_id)?;
            type_id
        }
        None => existing.letter_type.id,
    };
    let custom_properties = update
        .custom_properties
        .clone()
        .unwrap_or(existing.custom_properties);
    let is_published = update.is_published.unwrap_or(existing.is_published);
    // First publish stamps published_at; unpublishing keeps the stamp.
    let published_at = if is_published && existing.published_at.is_none() {
        Some(Utc::now())
    } else {
        existing.published_at
    };

    let tx = conn.transaction()?;
    tx.execute(
        "UPDATE letters
         SET title = ?2, description = ?3, recipient_name = ?4, letter_type_id = ?5,
             custom_properties = ?6, is_published = ?7, published_at = ?8, updated_at = ?9
         WHERE letter_id = ?1",
        params![
            id.to_string(),
            title,
            description,
            recipient_name,
            letter_type_id.to_string(),
            custom_properties.to_string(),
            is_published,
            published_at.map(|ts| ts.to_rfc3339()),
            now_rfc3339()
        ],
    )?;

    if let Some(blocks) = &update.content_blocks {
        tx.execute(
            "DELETE FROM content_blocks WHERE letter_id = ?1",
            [id.to_string()],
        )?;
        insert_blocks(&tx, &id.to_string(), blocks)?;
    }
    tx.commit()?;

    get_letter(conn, id)
}

pub fn delete_letter(conn: &Connection, id: Uuid) -> Result<()> {
    let deleted = conn.execute("DELETE FROM letters WHERE letter_id = ?1", [id.to_string()])?;
    if deleted == 0 {
        return Err(CoreError::LetterNotFound(id.to_string()));
    }
    Ok(())
}
