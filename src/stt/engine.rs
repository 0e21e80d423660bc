use crate::error::{Error, Result};
use crate::media::{
    assemble_recording, MediaChunk, MediaDevice, MediaStream, RecordedMedia, StreamConstraints,
    AUDIO_MIME,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::recognizer::{RecognitionEvent, SpeechRecognizer};
use super::transcript::TranscriptState;

/// Interval for the parallel raw-audio recorder
const AUDIO_CHUNK_INTERVAL: Duration = Duration::from_secs(1);

/// Continuous speech-to-text with interim/final reconciliation.
///
/// State machine: Idle → Listening → Idle. While listening, a single
/// reducer task consumes recognition events in order, so committed segments
/// are never reordered or dropped; a parallel microphone recorder captures
/// the raw audio so it can be sent to the backend independent of the
/// recognized text.
pub struct SpeechToTextEngine {
    recognizer: Box<dyn SpeechRecognizer>,
    device: Arc<dyn MediaDevice>,
    locale: String,
    sample_rate: u32,

    listening: Arc<AtomicBool>,
    transcript: Arc<Mutex<TranscriptState>>,
    last_error: Arc<Mutex<Option<String>>>,
    audio_chunks: Arc<Mutex<Vec<MediaChunk>>>,

    audio_stream: Option<Box<dyn MediaStream>>,
    reducer_task: Option<JoinHandle<()>>,
    audio_task: Option<JoinHandle<()>>,
}

impl SpeechToTextEngine {
    pub fn new(
        recognizer: Box<dyn SpeechRecognizer>,
        device: Arc<dyn MediaDevice>,
        locale: impl Into<String>,
        sample_rate: u32,
    ) -> Self {
        Self {
            recognizer,
            device,
            locale: locale.into(),
            sample_rate,
            listening: Arc::new(AtomicBool::new(false)),
            transcript: Arc::new(Mutex::new(TranscriptState::default())),
            last_error: Arc::new(Mutex::new(None)),
            audio_chunks: Arc::new(Mutex::new(Vec::new())),
            audio_stream: None,
            reducer_task: None,
            audio_task: None,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.recognizer.is_supported()
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    /// Enter the Listening state.
    ///
    /// Fails with `Error::UnsupportedCapability` when the runtime has no
    /// streaming recognizer. Clears any previous error, starts continuous
    /// interim-enabled recognition, and opens a microphone stream recording
    /// raw audio in 1 s chunks alongside the recognizer.
    pub async fn start_listening(&mut self) -> Result<()> {
        if !self.recognizer.is_supported() {
            return Err(Error::UnsupportedCapability("speech recognition"));
        }
        if self.listening.load(Ordering::SeqCst) {
            warn!("already listening");
            return Ok(());
        }

        *self.last_error.lock().await = None;

        let mut events = self.recognizer.start(&self.locale).await?;
        self.listening.store(true, Ordering::SeqCst);
        info!("speech recognition started ({})", self.locale);

        // Single reducer applies events in arrival order
        let transcript = Arc::clone(&self.transcript);
        let last_error = Arc::clone(&self.last_error);
        let listening = Arc::clone(&self.listening);
        self.reducer_task = Some(tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    RecognitionEvent::Result { finals, interim } => {
                        transcript.lock().await.apply(&finals, interim.as_deref());
                    }
                    RecognitionEvent::Error(msg) => {
                        error!("speech recognition error: {}", msg);
                        *last_error.lock().await = Some(msg);
                        transcript.lock().await.clear_interim();
                        listening.store(false, Ordering::SeqCst);
                    }
                    RecognitionEvent::Ended => {
                        transcript.lock().await.clear_interim();
                        listening.store(false, Ordering::SeqCst);
                        break;
                    }
                }
            }
            // Channel closed: recognition is over however it ended
            transcript.lock().await.clear_interim();
            listening.store(false, Ordering::SeqCst);
            debug!("recognition reducer finished");
        }));

        // Parallel raw-audio recorder; its failure degrades to
        // recognition-only, it never aborts the session
        match self
            .device
            .open(&StreamConstraints::audio_only(self.sample_rate))
            .await
        {
            Ok(mut stream) => {
                self.audio_chunks.lock().await.clear();
                let mut chunk_rx = stream.start_chunks(AUDIO_CHUNK_INTERVAL);
                let chunks = Arc::clone(&self.audio_chunks);
                self.audio_task = Some(tokio::spawn(async move {
                    while let Some(chunk) = chunk_rx.recv().await {
                        if chunk.data.is_empty() {
                            continue;
                        }
                        chunks.lock().await.push(chunk);
                    }
                }));
                self.audio_stream = Some(stream);
            }
            Err(e) => {
                warn!("raw audio recorder unavailable: {}", e);
                *self.last_error.lock().await = Some(e.to_string());
            }
        }

        Ok(())
    }

    /// Leave the Listening state. The finalized transcript is untouched;
    /// the caller decides whether to consume or reset it.
    ///
    /// A recognizer that fails to stop must not keep the microphone or the
    /// worker tasks alive: every cleanup step runs regardless, the engine
    /// always ends up Idle, and the stop failure is reported last.
    pub async fn stop_listening(&mut self) -> Result<()> {
        let stop_result = self.recognizer.stop().await;

        if let Some(mut stream) = self.audio_stream.take() {
            stream.stop_chunks();
            stream.stop_tracks();
        }
        if let Some(task) = self.audio_task.take() {
            if let Err(e) = task.await {
                error!("audio recorder task panicked: {}", e);
            }
        }
        if let Some(task) = self.reducer_task.take() {
            if stop_result.is_ok() {
                if let Err(e) = task.await {
                    error!("recognition reducer panicked: {}", e);
                }
            } else {
                // A failed stop may never close the event channel; do not
                // wait on it
                task.abort();
            }
        }

        self.listening.store(false, Ordering::SeqCst);
        self.transcript.lock().await.clear_interim();

        match stop_result {
            Ok(()) => {
                info!("speech recognition stopped");
                Ok(())
            }
            Err(e) => {
                error!("recognizer stop failed: {}", e);
                *self.last_error.lock().await = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Clear both finalized and interim text; safe in any state
    pub async fn reset_transcript(&self) {
        self.transcript.lock().await.reset();
    }

    /// Snapshot of the reconciled transcript
    pub async fn transcript(&self) -> TranscriptState {
        self.transcript.lock().await.clone()
    }

    pub async fn finalized_text(&self) -> String {
        self.transcript.lock().await.finalized.clone()
    }

    pub async fn interim_text(&self) -> String {
        self.transcript.lock().await.interim.clone()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.last_error.lock().await.clone()
    }

    /// The raw audio captured alongside recognition, or `None` when no
    /// chunks arrived
    pub async fn audio_blob(&self) -> Option<RecordedMedia> {
        let chunks = self.audio_chunks.lock().await;
        if chunks.is_empty() {
            return None;
        }
        let duration = chunks.len() as u64;
        Some(assemble_recording(chunks.clone(), AUDIO_MIME, duration))
    }
}

impl Drop for SpeechToTextEngine {
    fn drop(&mut self) {
        self.listening.store(false, Ordering::SeqCst);
        if let Some(task) = self.reducer_task.take() {
            task.abort();
        }
        if let Some(task) = self.audio_task.take() {
            task.abort();
        }
        if let Some(mut stream) = self.audio_stream.take() {
            stream.stop_tracks();
        }
    }
}
