// SQLite persistence for favorites and the theme flag.
// Data lives in ~/.local/share/skyplayer/skyplayer.db.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use crate::favorites::FavoriteEntry;
use crate::theme::SkyMode;

const THEME_KEY: &str = "theme";

/// SQLite-backed store for favorites and settings.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database in the user data directory.
    pub fn open() -> anyhow::Result<Self> {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skyplayer");
        Self::open_at(&data_dir.join("skyplayer.db"))
    }

    pub fn open_at(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    fn run_migrations(&self) -> anyhow::Result<()> {
        let sql = include_str!("../migrations/001_init.sql");
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    // ── Favorites ──

    /// Replace the stored list with `entries`, keeping their order.
    pub fn save_favorites(&self, entries: &[FavoriteEntry]) -> anyhow::Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM favorites", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO favorites (id, url, title, added_at, position)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (i, entry) in entries.iter().enumerate() {
                stmt.execute(params![
                    entry.id,
                    entry.url,
                    entry.title,
                    entry.added_at.to_rfc3339(),
                    i as i64
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn load_favorites(&self) -> anyhow::Result<Vec<FavoriteEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, url, title, added_at FROM favorites ORDER BY position ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, url, title, added_at) = row?;
            let added_at = DateTime::parse_from_rfc3339(&added_at)?.with_timezone(&Utc);
            entries.push(FavoriteEntry {
                id,
                url,
                title,
                added_at,
            });
        }
        Ok(entries)
    }

    // ── Settings ──

    pub fn get_setting(&self, key: &str) -> anyhow::Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_setting(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn load_theme(&self) -> anyhow::Result<Option<SkyMode>> {
        Ok(self.get_setting(THEME_KEY)?.map(|v| SkyMode::from_name(&v)))
    }

    pub fn save_theme(&self, mode: SkyMode) -> anyhow::Result<()> {
        self.set_setting(THEME_KEY, mode.as_str())
    }
}
