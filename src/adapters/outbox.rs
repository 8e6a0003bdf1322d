use crate::domain::model::Invitation;
use crate::domain::ports::Notifier;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 寫入 outbox 的訊息格式，交由外部寄信程式處理
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxMessage {
    pub from: Option<String>,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Writes each invitation as a JSON file into a directory.
#[derive(Debug)]
pub struct FileOutbox {
    dir: PathBuf,
    sender: Option<String>,
    sequence: AtomicUsize,
}

impl FileOutbox {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            sender: None,
            sequence: AtomicUsize::new(0),
        }
    }

    pub fn with_sender(mut self, sender: Option<String>) -> Self {
        self.sender = sender;
        self
    }

    /// 以 create_new 開檔，檔名已存在 (例如另一個程序同一毫秒寫入) 就換下一個序號
    fn create_message_file(&self, stamp: &str, json: &str) -> Result<PathBuf> {
        loop {
            let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
            let path = self.dir.join(format!("{stamp}-{seq:03}.json"));
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            file.write_all(json.as_bytes())?;
            return Ok(path);
        }
    }
}

#[async_trait]
impl Notifier for FileOutbox {
    async fn deliver(&self, invitation: &Invitation) -> Result<String> {
        let created_at = Utc::now();
        let message = OutboxMessage {
            from: self.sender.clone(),
            to: invitation.recipients.clone(),
            subject: invitation.subject.clone(),
            body: invitation.body.clone(),
            created_at,
        };

        fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string_pretty(&message)?;
        let stamp = created_at.format("%Y%m%dT%H%M%S%3f").to_string();
        let path = self.create_message_file(&stamp, &json)?;

        tracing::debug!(recipients = message.to.len(), "Outbox message written");
        Ok(path.display().to_string())
    }
}
