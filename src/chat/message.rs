use crate::backend::HistoryMessage;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One transcript entry. Messages are append-only: content and timestamp
/// never change after creation, only the capture-mode flags tied to async
/// resolution do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_video: bool,
    #[serde(default)]
    pub is_video_analysis: bool,
    #[serde(default)]
    pub is_document: bool,
    #[serde(default)]
    pub is_document_analysis: bool,
    #[serde(default)]
    pub is_error: bool,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            is_video: false,
            is_video_analysis: false,
            is_document: false,
            is_document_analysis: false,
            is_error: false,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn with_video(mut self) -> Self {
        self.is_video = true;
        self
    }

    pub fn with_video_analysis(mut self) -> Self {
        self.is_video_analysis = true;
        self
    }

    pub fn with_document(mut self) -> Self {
        self.is_document = true;
        self
    }

    pub fn with_document_analysis(mut self) -> Self {
        self.is_document_analysis = true;
        self
    }

    pub fn with_error(mut self) -> Self {
        self.is_error = true;
        self
    }

    /// Serialize for the history-analysis endpoint
    pub fn to_history(&self) -> HistoryMessage {
        let kind = match self.role {
            Role::User => "user",
            Role::Assistant => "ai",
            Role::System => "system",
        };
        HistoryMessage {
            kind: kind.to_string(),
            content: self.content.clone(),
            timestamp: self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            is_video: self.is_video,
            is_video_analysis: self.is_video_analysis,
        }
    }
}
