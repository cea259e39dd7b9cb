/// Persistent rating store
///
/// The store keeps three values in a small key-value table: the liked
/// photo IDs, the disliked photo IDs, and the one-time feedback notice
/// latch. All three are cleared on every application start, so ratings
/// only live for one visit by design.
///
/// Storage failures never reach the caller: a store that cannot open its
/// database (or whose statements fail) answers empty/false on reads and
/// drops writes, and the session keeps running without persistence.

use rusqlite::{Connection, OptionalExtension};
use std::path::PathBuf;
use thiserror::Error;

const LIKED_KEY: &str = "liked-ids";
const DISLIKED_KEY: &str = "disliked-ids";
const NOTICE_KEY: &str = "notice-shown";

/// Internal store errors; these are caught and logged, never propagated.
#[derive(Debug, Error)]
enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("stored value is not a valid ID list: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not create data directory: {0}")]
    DataDir(#[from] std::io::Error),
}

/// The rating store over a local SQLite key-value table
pub struct RatingStore {
    /// `None` means the database could not be opened and the whole
    /// session runs in degraded, non-persistent mode.
    conn: Option<Connection>,
}

impl RatingStore {
    /// Open the store in the user's data directory and wipe it.
    ///
    /// The database file lives at:
    /// - Linux: ~/.local/share/wildwatch/ratings.db
    /// - macOS: ~/Library/Application Support/wildwatch/ratings.db
    /// - Windows: %APPDATA%\wildwatch\ratings.db
    ///
    /// Ratings are never remembered across a full restart, so the wipe
    /// is unconditional.
    pub fn open() -> Self {
        let store = match Self::try_open() {
            Ok(conn) => RatingStore { conn: Some(conn) },
            Err(e) => {
                eprintln!("⚠️  Rating store unavailable, continuing without persistence: {}", e);
                RatingStore { conn: None }
            }
        };
        store.reset_all();
        store
    }

    /// An in-memory store, used by tests.
    pub fn open_in_memory() -> Self {
        let conn = Connection::open_in_memory().and_then(|conn| {
            init_schema(&conn)?;
            Ok(conn)
        });

        match conn {
            Ok(conn) => RatingStore { conn: Some(conn) },
            Err(e) => {
                eprintln!("⚠️  Could not open in-memory store: {}", e);
                RatingStore { conn: None }
            }
        }
    }

    /// A store with no backing database; reads answer false, writes are
    /// dropped. This is what `open()` falls back to on failure.
    pub fn degraded() -> Self {
        RatingStore { conn: None }
    }

    fn try_open() -> Result<Connection, StoreError> {
        let db_path = Self::get_db_path();

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;
        init_schema(&conn)?;
        println!("📁 Rating store initialized at: {}", db_path.display());

        Ok(conn)
    }

    /// Get the path where the database should be stored
    fn get_db_path() -> PathBuf {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        path.push("wildwatch");
        path.push("ratings.db");
        path
    }

    // ---- key-value plumbing ----

    fn get_value(&self, key: &str) -> Result<Option<String>, StoreError> {
        let Some(conn) = &self.conn else {
            return Ok(None);
        };
        let value = conn
            .query_row("SELECT value FROM ratings WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set_value(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(conn) = &self.conn {
            conn.execute(
                "INSERT INTO ratings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                [key, value],
            )?;
        }
        Ok(())
    }

    fn remove_value(&self, key: &str) -> Result<(), StoreError> {
        if let Some(conn) = &self.conn {
            conn.execute("DELETE FROM ratings WHERE key = ?1", [key])?;
        }
        Ok(())
    }

    /// Read an ID list; any failure degrades to an empty list.
    fn read_ids(&self, key: &str) -> Vec<u32> {
        let result: Result<Vec<u32>, StoreError> = (|| {
            match self.get_value(key)? {
                Some(raw) => Ok(serde_json::from_str(&raw)?),
                None => Ok(Vec::new()),
            }
        })();

        match result {
            Ok(ids) => ids,
            Err(e) => {
                eprintln!("⚠️  Could not read {}: {}", key, e);
                Vec::new()
            }
        }
    }

    /// Append an ID to a stored list if it is not already present.
    /// Write failures are logged and dropped.
    fn append_id(&self, key: &str, id: u32) {
        let mut ids = self.read_ids(key);
        if ids.contains(&id) {
            return;
        }
        ids.push(id);

        let result: Result<(), StoreError> = (|| {
            let raw = serde_json::to_string(&ids)?;
            self.set_value(key, &raw)
        })();

        if let Err(e) = result {
            eprintln!("⚠️  Could not write {}: {}", key, e);
        }
    }

    // ---- rating operations ----

    /// Record a like for a photo. Idempotent.
    pub fn mark_liked(&self, id: u32) {
        self.append_id(LIKED_KEY, id);
    }

    /// Record a dislike for a photo. Idempotent.
    pub fn mark_disliked(&self, id: u32) {
        self.append_id(DISLIKED_KEY, id);
    }

    pub fn is_liked(&self, id: u32) -> bool {
        self.read_ids(LIKED_KEY).contains(&id)
    }

    pub fn is_disliked(&self, id: u32) -> bool {
        self.read_ids(DISLIKED_KEY).contains(&id)
    }

    /// Whether a photo has been judged either way
    pub fn is_rated(&self, id: u32) -> bool {
        self.is_liked(id) || self.is_disliked(id)
    }

    /// Whether the one-time feedback notice has already been shown
    pub fn has_shown_feedback_notice(&self) -> bool {
        match self.get_value(NOTICE_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                eprintln!("⚠️  Could not read {}: {}", NOTICE_KEY, e);
                false
            }
        }
    }

    /// Latch the feedback notice as shown for the rest of this visit.
    pub fn mark_feedback_notice_shown(&self) {
        if let Err(e) = self.set_value(NOTICE_KEY, "true") {
            eprintln!("⚠️  Could not write {}: {}", NOTICE_KEY, e);
        }
    }

    /// Clear both rating lists and the notice latch.
    ///
    /// Called once at application start, and again whenever a pass has
    /// shown every catalog photo and a new round begins.
    pub fn reset_all(&self) {
        for key in [LIKED_KEY, DISLIKED_KEY, NOTICE_KEY] {
            if let Err(e) = self.remove_value(key) {
                eprintln!("⚠️  Could not clear {}: {}", key, e);
            }
        }
    }
}

/// Initialize the key-value schema.
fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS ratings (
            key     TEXT PRIMARY KEY,
            value   TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

// Connection does not implement Debug usefully, so summarize instead
impl std::fmt::Debug for RatingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RatingStore")
            .field("persistent", &self.conn.is_some())
            .finish()
    }
}
