use crate::config::BackendConfig;
use crate::error::{Error, Result};
use crate::media::RecordedMedia;
use reqwest::multipart;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::types::*;

/// Client contract for the inference backend.
///
/// Everything the orchestrator needs from the network goes through this
/// trait, so tests can substitute a scripted fake for the HTTP client.
#[async_trait::async_trait]
pub trait BackendClient: Send + Sync {
    /// GET / — backend liveness probe
    async fn health(&self) -> Result<HealthResponse>;

    /// POST /api/chat
    async fn chat(&self, message: &str) -> Result<ChatResponse>;

    /// POST /api/video/analyze (multipart: video_file, audio_transcript)
    async fn analyze_video(&self, video: &RecordedMedia, audio_transcript: &str)
        -> Result<String>;

    /// POST /api/document/analyze (multipart: document)
    async fn analyze_document(&self, file_name: &str, bytes: Vec<u8>) -> Result<String>;

    /// POST /api/chat/analyze-history
    async fn analyze_history(&self, messages: Vec<HistoryMessage>) -> Result<Vec<Diagnosis>>;

    /// GET /api/history
    async fn fetch_history(&self) -> Result<Vec<SessionRecord>>;

    /// POST /api/history/add
    async fn add_history(&self, diagnosis: &Diagnosis) -> Result<()>;

    /// DELETE /api/history/{id}
    async fn delete_history(&self, id: &str) -> Result<()>;
}

/// reqwest-backed implementation of the backend contract
pub struct HttpBackendClient {
    client: reqwest::Client,
    base_url: String,
    user_id: Option<String>,
}

impl HttpBackendClient {
    pub fn new(cfg: &BackendConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            user_id: cfg.user_id.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        debug!("POST {}", path);
        let response = self.client.post(self.url(path)).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("{path} returned {status}")));
        }

        Ok(response.json().await?)
    }

    async fn post_multipart<T>(&self, path: &str, form: multipart::Form) -> Result<T>
    where
        T: DeserializeOwned,
    {
        debug!("POST {} (multipart)", path);
        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("{path} returned {status}")));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl BackendClient for HttpBackendClient {
    async fn health(&self) -> Result<HealthResponse> {
        debug!("GET /");
        let response = self.client.get(self.url("/")).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("/ returned {status}")));
        }

        Ok(response.json().await?)
    }

    async fn chat(&self, message: &str) -> Result<ChatResponse> {
        let request = ChatRequest {
            message: message.to_string(),
            user_id: self.user_id.clone(),
        };
        self.post_json("/api/chat", &request).await
    }

    async fn analyze_video(
        &self,
        video: &RecordedMedia,
        audio_transcript: &str,
    ) -> Result<String> {
        let video_part = multipart::Part::bytes(video.data.clone())
            .file_name("recording.webm")
            .mime_str(video.mime_type)?;

        let mut form = multipart::Form::new()
            .part("video_file", video_part)
            .text("audio_transcript", audio_transcript.to_string());
        if let Some(user_id) = &self.user_id {
            form = form.text("user_id", user_id.clone());
        }

        let response: VideoAnalysisResponse =
            self.post_multipart("/api/video/analyze", form).await?;
        Ok(response.analysis)
    }

    async fn analyze_document(&self, file_name: &str, bytes: Vec<u8>) -> Result<String> {
        let document_part = multipart::Part::bytes(bytes).file_name(file_name.to_string());

        let mut form = multipart::Form::new().part("document", document_part);
        if let Some(user_id) = &self.user_id {
            form = form.text("user_id", user_id.clone());
        }

        let response: DocumentAnalysisResponse =
            self.post_multipart("/api/document/analyze", form).await?;
        Ok(response.response)
    }

    async fn analyze_history(&self, messages: Vec<HistoryMessage>) -> Result<Vec<Diagnosis>> {
        let request = AnalyzeHistoryRequest {
            messages,
            user_id: self.user_id.clone(),
        };
        let response: AnalyzeHistoryResponse =
            self.post_json("/api/chat/analyze-history", &request).await?;

        if !response.success {
            let reason = response
                .error
                .unwrap_or_else(|| "history analysis failed".to_string());
            return Err(Error::Transport(reason));
        }

        Ok(response.diagnoses)
    }

    async fn fetch_history(&self) -> Result<Vec<SessionRecord>> {
        debug!("GET /api/history");
        let response = self.client.get(self.url("/api/history")).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("/api/history returned {status}")));
        }

        let body: HistoryResponse = response.json().await?;
        Ok(body.history)
    }

    async fn add_history(&self, diagnosis: &Diagnosis) -> Result<()> {
        let request = AddHistoryRequest {
            diagnosis: diagnosis.clone(),
        };
        let response = self
            .client
            .post(self.url("/api/history/add"))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!(
                "/api/history/add returned {status}"
            )));
        }
        Ok(())
    }

    async fn delete_history(&self, id: &str) -> Result<()> {
        let path = format!("/api/history/{id}");
        debug!("DELETE {}", path);
        let response = self.client.delete(self.url(&path)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport(format!("{path} returned {status}")));
        }
        Ok(())
    }
}
