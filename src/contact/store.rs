//! Append-only message log backed by a JSON array file
//!
//! The read-modify-write below is not atomic. Two submissions racing each
//! other can lose one append; the file is a personal inbox, not a database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::validator::ValidContact;

/// Timestamp layout written to the log (UTC, no offset, microseconds)
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Errors from reading or writing the message log
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path:?} does not contain a JSON array: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A stored contact submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: String,
}

impl Message {
    /// Stamp a validated submission with its creation time
    pub fn new(contact: &ValidContact, created: DateTime<Utc>) -> Self {
        Self {
            name: contact.name.clone(),
            email: contact.email.clone(),
            message: contact.message.clone(),
            timestamp: created.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Flat-file message log
#[derive(Debug, Clone)]
pub struct MessageStore {
    path: PathBuf,
}

impl MessageStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Append a submission stamped with the current time
    pub async fn append(&self, contact: &ValidContact) -> Result<Message, StoreError> {
        let message = Message::new(contact, Utc::now());
        self.append_message(&message).await?;
        Ok(message)
    }

    /// Append an already stamped message to the end of the log.
    ///
    /// Entries already in the file are written back unchanged, whatever
    /// their shape. A file that is not a JSON array is left alone.
    pub async fn append_message(&self, message: &Message) -> Result<(), StoreError> {
        let mut entries = self.read_entries().await?;
        entries.push(serde_json::to_value(message)?);

        let content = serde_json::to_string_pretty(&entries)?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!("Appended message to {:?}", self.path);
        Ok(())
    }

    /// Every stored message, oldest first. A missing file is an empty log.
    ///
    /// Entries that are not contact messages are skipped with a warning.
    pub async fn load_all(&self) -> Result<Vec<Message>, StoreError> {
        let entries = self.read_entries().await?;
        let mut messages = Vec::with_capacity(entries.len());

        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<Message>(entry) {
                Ok(message) => messages.push(message),
                Err(e) => {
                    tracing::warn!("Skipping entry {} in {:?}: {}", index, self.path, e);
                }
            }
        }

        Ok(messages)
    }

    async fn read_entries(&self) -> Result<Vec<serde_json::Value>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn contact(name: &str) -> ValidContact {
        ValidContact {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            message: "Hello, I'd like to chat.".to_string(),
        }
    }

    #[test]
    fn test_timestamp_format() {
        let created = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let message = Message::new(&contact("Ada"), created);
        assert_eq!(message.timestamp, "2024-05-01T12:30:00.000000");
    }

    #[tokio::test]
    async fn test_append_creates_file() {
        let dir = TempDir::new().unwrap();
        let store = MessageStore::new(dir.path().join("messages.json"));

        let saved = store.append(&contact("Ada")).await.unwrap();
        let all = store.load_all().await.unwrap();
        assert_eq!(all, vec![saved]);
    }

    #[tokio::test]
    async fn test_append_grows_by_one_and_keeps_order() {
        let dir = TempDir::new().unwrap();
        let store = MessageStore::new(dir.path().join("messages.json"));

        store.append(&contact("Ada")).await.unwrap();
        store.append(&contact("Grace")).await.unwrap();
        let before = store.load_all().await.unwrap().len();

        let saved = store.append(&contact("Linus")).await.unwrap();
        let all = store.load_all().await.unwrap();

        assert_eq!(all.len(), before + 1);
        assert_eq!(all[0].name, "Ada");
        let last = all.last().unwrap();
        assert_eq!(last, &saved);
        assert_eq!(last.name, "Linus");
        assert_eq!(last.email, "linus@example.com");
        assert!(!last.timestamp.is_empty());
    }

    #[tokio::test]
    async fn test_foreign_entries_survive_append() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("messages.json");
        std::fs::write(&path, r#"[{"note": "imported", "n": 1}]"#).unwrap();
        let store = MessageStore::new(&path);

        store.append(&contact("Ada")).await.unwrap();

        let raw: Vec<serde_json::Value> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0]["note"], "imported");
        assert_eq!(raw[1]["name"], "Ada");
    }

    #[tokio::test]
    async fn test_load_all_skips_foreign_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("messages.json");
        std::fs::write(&path, r#"[{"note": "imported"}, "stray", 42]"#).unwrap();
        let store = MessageStore::new(&path);

        let saved = store.append(&contact("Ada")).await.unwrap();
        let all = store.load_all().await.unwrap();

        assert_eq!(all, vec![saved]);
    }

    #[tokio::test]
    async fn test_malformed_file_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("messages.json");
        std::fs::write(&path, "{\"oops\": true}").unwrap();
        let store = MessageStore::new(&path);

        let err = store.append(&contact("Ada")).await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"oops\": true}");
    }

    #[tokio::test]
    async fn test_unwritable_location_fails() {
        let dir = TempDir::new().unwrap();
        let store = MessageStore::new(dir.path().join("missing-dir").join("messages.json"));

        let err = store.append(&contact("Ada")).await.unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }

    #[tokio::test]
    async fn test_non_ascii_written_literally() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("messages.json");
        let store = MessageStore::new(&path);

        let mut c = contact("Zoë");
        c.message = "Gracias, señor. ¿Hablamos?".to_string();
        store.append(&c).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Zoë"));
        assert!(raw.contains("señor"));
        assert!(raw.contains("\n  {"));
    }
}
