use crate::backend::{BackendClient, Diagnosis, SessionRecord};
use crate::error::{Error, Result};
use crate::media::RecordedMedia;
use crate::tts::TextToSpeechQueue;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::message::Message;

const WELCOME_MESSAGE: &str = "Hello! I'm your AI medical assistant. You can chat with me or \
     record a video for health analysis. How can I help you today?";

const CHAT_APOLOGY: &str = "I'm sorry, I'm having trouble connecting to the server. Please \
     check your connection and try again.";

const VIDEO_APOLOGY: &str = "I'm sorry, I had trouble analyzing your video. Please try again \
     or describe your symptoms in text.";

const DOCUMENT_FALLBACK: &str = "Your document has been successfully processed and will be \
     considered in future conversations.";

const VIDEO_ANALYSIS_PROMPT: &str = "Analyze this video for health-related information, \
     symptoms, or medical concerns. Provide a detailed medical analysis.";

/// Turn-taking state machine over the chat transcript.
///
/// Owns the append-only message sequence, decides when speech output must
/// yield to new user input, forwards captured artifacts to the backend and
/// feeds replies back into the transcript and the speech queue. Backend
/// failures never propagate: they become error-flagged assistant messages
/// and the busy flags always clear.
pub struct ConversationOrchestrator {
    backend: Arc<dyn BackendClient>,
    tts: TextToSpeechQueue,

    messages: Vec<Message>,
    processing: bool,
    analyzing_video: bool,
    analyzing_history: bool,
    voice_enabled: bool,
    diagnoses: Vec<Diagnosis>,
}

impl ConversationOrchestrator {
    /// Seeds the welcome message, speaking it when voice output is enabled
    pub async fn new(
        backend: Arc<dyn BackendClient>,
        tts: TextToSpeechQueue,
        voice_enabled: bool,
    ) -> Self {
        let mut orchestrator = Self {
            backend,
            tts,
            messages: Vec::new(),
            processing: false,
            analyzing_video: false,
            analyzing_history: false,
            voice_enabled,
            diagnoses: Vec::new(),
        };

        let welcome = Message::assistant(WELCOME_MESSAGE);
        orchestrator.say(&welcome.content).await;
        orchestrator.messages.push(welcome);
        orchestrator
    }

    /// Send one user turn to the chat endpoint.
    ///
    /// No-op when the text is blank or a prior request is still in flight.
    /// Any currently playing speech stops before the user message is
    /// appended, so the assistant never talks over the user.
    pub async fn send_text_message(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() || self.processing {
            return;
        }

        if self.tts.is_speaking() {
            self.tts.stop().await;
        }

        self.messages.push(Message::user(text));
        self.processing = true;

        match self.backend.chat(text).await {
            Ok(reply) => {
                self.messages.push(Message::assistant(reply.response.clone()));
                self.processing = false;
                self.say(&reply.response).await;
            }
            Err(e) => {
                error!("chat request failed: {}", e);
                self.messages.push(Message::assistant(CHAT_APOLOGY).with_error());
                self.processing = false;
                self.say(CHAT_APOLOGY).await;
            }
        }
    }

    /// Upload a finished recording for analysis.
    ///
    /// Runs under its own `analyzing_video` flag so a video turn does not
    /// block text turns. The blob is consumed on every path, success or
    /// failure.
    pub async fn send_recorded_video(&mut self, video: RecordedMedia, duration_label: &str) {
        self.messages.push(
            Message::user(format!(
                "Video recorded ({duration_label}) - Analyzing for health insights..."
            ))
            .with_video(),
        );
        self.analyzing_video = true;

        match self.backend.analyze_video(&video, VIDEO_ANALYSIS_PROMPT).await {
            Ok(analysis) => {
                info!("video analysis received ({} bytes uploaded)", video.len());
                self.messages
                    .push(Message::assistant(analysis.clone()).with_video_analysis());
                self.analyzing_video = false;
                self.say(&analysis).await;
            }
            Err(e) => {
                error!("video analysis failed: {}", e);
                self.messages.push(Message::assistant(VIDEO_APOLOGY).with_error());
                self.analyzing_video = false;
                self.say(VIDEO_APOLOGY).await;
            }
        }
    }

    /// Upload a document and append its summary to the transcript
    pub async fn upload_document(&mut self, file_name: &str, bytes: Vec<u8>) {
        self.messages.push(
            Message::user(format!("Uploaded document: {file_name}")).with_document(),
        );

        match self.backend.analyze_document(file_name, bytes).await {
            Ok(summary) => {
                let content = if summary.trim().is_empty() {
                    DOCUMENT_FALLBACK.to_string()
                } else {
                    summary
                };
                self.messages
                    .push(Message::assistant(content).with_document_analysis());
            }
            Err(e) => {
                error!("document analysis failed: {}", e);
                self.messages.push(Message::assistant(CHAT_APOLOGY).with_error());
            }
        }
    }

    /// Extract structured diagnoses from the conversation so far.
    ///
    /// Requires at least two messages; fails locally with a validation
    /// error otherwise, issuing no network request.
    pub async fn analyze_history(&mut self) -> Result<&[Diagnosis]> {
        if self.messages.len() < 2 {
            return Err(Error::Validation(
                "not enough conversation history to analyze".to_string(),
            ));
        }

        self.analyzing_history = true;
        let formatted = self.messages.iter().map(Message::to_history).collect();
        let result = self.backend.analyze_history(formatted).await;
        self.analyzing_history = false;

        match result {
            Ok(diagnoses) => {
                info!("extracted {} diagnoses", diagnoses.len());
                self.diagnoses = diagnoses;
                Ok(&self.diagnoses)
            }
            Err(e) => {
                warn!("history analysis failed: {}", e);
                Err(e)
            }
        }
    }

    /// Persist one extracted diagnosis to the remote history store
    pub async fn save_diagnosis(&self, diagnosis: &Diagnosis) -> Result<()> {
        self.backend.add_history(diagnosis).await
    }

    pub async fn load_history(&self) -> Result<Vec<SessionRecord>> {
        self.backend.fetch_history().await
    }

    pub async fn delete_history(&self, id: &str) -> Result<()> {
        self.backend.delete_history(id).await
    }

    /// Toggle voice output; disabling stops anything currently playing
    pub async fn toggle_voice(&mut self) {
        if self.voice_enabled && self.tts.is_speaking() {
            self.tts.stop().await;
        }
        self.voice_enabled = !self.voice_enabled;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn diagnoses(&self) -> &[Diagnosis] {
        &self.diagnoses
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn is_analyzing_video(&self) -> bool {
        self.analyzing_video
    }

    pub fn is_analyzing_history(&self) -> bool {
        self.analyzing_history
    }

    pub fn voice_enabled(&self) -> bool {
        self.voice_enabled
    }

    /// Enqueue text for speech when voice output is on; playback is
    /// fire-and-forget
    async fn say(&self, text: &str) {
        if self.voice_enabled && self.tts.is_supported() {
            self.tts.speak(text).await;
        }
    }
}
