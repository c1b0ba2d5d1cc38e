//! Contact message intake.
//!
//! Stores contact form submissions alongside appointments, one JSON file per
//! message under `messages/<s1>/<s2>/<uuid>/message.json`. Listing returns
//! newest first.

use crate::config::CoreConfig;
use crate::constants::MESSAGE_FILE_NAME;
use crate::error::{SchedulingResult, StoreError};
use chrono::{DateTime, Utc};
use rdv_types::{EmailAddress, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// A stored contact form submission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: NonEmptyText,
    pub email: EmailAddress,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: NonEmptyText,
    pub sent_at: DateTime<Utc>,
}

/// File-backed store for contact messages.
#[derive(Clone)]
pub struct ContactMessageStore {
    cfg: Arc<CoreConfig>,
}

impl ContactMessageStore {
    /// Opens the store, creating the messages directory if needed.
    pub fn open(cfg: Arc<CoreConfig>) -> SchedulingResult<Self> {
        fs::create_dir_all(cfg.messages_dir()).map_err(StoreError::DirCreation)?;
        Ok(Self { cfg })
    }

    /// Persists a new contact message and returns the stored record.
    pub fn submit(
        &self,
        name: NonEmptyText,
        email: EmailAddress,
        subject: Option<String>,
        message: NonEmptyText,
    ) -> SchedulingResult<ContactMessage> {
        let record = ContactMessage {
            id: Uuid::new_v4(),
            name,
            email,
            subject,
            message,
            sent_at: Utc::now(),
        };

        let record_dir = self.message_dir(record.id);
        fs::create_dir_all(&record_dir).map_err(StoreError::DirCreation)?;
        let json = serde_json::to_string_pretty(&record).map_err(StoreError::Serialization)?;
        fs::write(record_dir.join(MESSAGE_FILE_NAME), json).map_err(StoreError::FileWrite)?;

        tracing::info!("contact message received from {}", record.email);
        Ok(record)
    }

    /// All stored messages, newest first.
    ///
    /// Unparseable message files are logged as warnings and skipped.
    pub fn list(&self) -> SchedulingResult<Vec<ContactMessage>> {
        let mut messages = Vec::new();
        collect_messages(&self.cfg.messages_dir(), 0, &mut messages);
        messages.sort_by(|a, b| b.sent_at.cmp(&a.sent_at));
        Ok(messages)
    }

    fn message_dir(&self, id: Uuid) -> PathBuf {
        let canonical = id.simple().to_string();
        self.cfg
            .messages_dir()
            .join(&canonical[0..2])
            .join(&canonical[2..4])
            .join(canonical)
    }
}

fn collect_messages(dir: &Path, depth: usize, messages: &mut Vec<ContactMessage>) {
    // messages/<s1>/<s2>/<uuid>/message.json is three levels down.
    if depth > 3 {
        return;
    }

    let entries = match fs::read_dir(dir) {
        Ok(it) => it,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_messages(&path, depth + 1, messages);
            continue;
        }
        if path.file_name().and_then(|n| n.to_str()) != Some(MESSAGE_FILE_NAME) {
            continue;
        }
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<ContactMessage>(&contents) {
                Ok(message) => messages.push(message),
                Err(e) => {
                    tracing::warn!("failed to parse contact message: {} - {}", path.display(), e);
                }
            },
            Err(e) => {
                tracing::warn!("failed to read contact message: {} - {}", path.display(), e);
            }
        }
    }
}
