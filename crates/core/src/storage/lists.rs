//! Named list persistence
//!
//! Stores ordered string lists as JSON under a key. The roster is one such
//! list.

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{debug, instrument};

use super::parse::OptionalExt;
use crate::error::Result;

/// Named list store
pub struct ListStore<'a> {
    conn: &'a Connection,
}

impl<'a> ListStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Replace the list stored under `key`
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub fn save(&self, key: &str, items: &[String]) -> Result<()> {
        let items_json = serde_json::to_string(items)?;

        self.conn.execute(
            "INSERT OR REPLACE INTO lists (key, items_json, updated_at)
             VALUES (?1, ?2, ?3)",
            params![key, items_json, Utc::now().to_rfc3339()],
        )?;

        debug!("List saved");
        Ok(())
    }

    /// Load the list stored under `key`, or `None` if it was never saved
    #[instrument(skip(self))]
    pub fn load(&self, key: &str) -> Result<Option<Vec<String>>> {
        let items_json: Option<String> = self
            .conn
            .query_row(
                "SELECT items_json FROM lists WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match items_json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Delete the list stored under `key`
    pub fn delete(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM lists WHERE key = ?1", params![key])?;
        Ok(())
    }
}
