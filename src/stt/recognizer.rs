use crate::error::Result;
use tokio::sync::mpsc;

/// One callback from the recognition engine.
///
/// A `Result` event carries zero or more committed segments plus at most
/// one provisional guess. Engines revise the provisional guess repeatedly
/// but commit each final segment exactly once.
#[derive(Debug, Clone)]
pub enum RecognitionEvent {
    Result {
        finals: Vec<String>,
        interim: Option<String>,
    },
    /// Non-fatal engine failure (no-speech timeout, network, permission)
    Error(String),
    /// Engine-initiated end of recognition
    Ended,
}

/// Streaming speech-recognition engine.
///
/// The runtime's recognizer is global state; this trait makes it an
/// explicitly owned collaborator so the engine's ordering guarantees can be
/// tested against scripted fakes.
#[async_trait::async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Whether the runtime has a streaming recognition capability at all
    fn is_supported(&self) -> bool;

    /// Start continuous, interim-enabled recognition in the given locale.
    /// Events arrive on the returned channel until the engine ends or
    /// `stop` is called; the channel closing marks the end of recognition.
    async fn start(&mut self, locale: &str) -> Result<mpsc::Receiver<RecognitionEvent>>;

    /// Stop recognition; the event channel closes shortly after
    async fn stop(&mut self) -> Result<()>;
}
