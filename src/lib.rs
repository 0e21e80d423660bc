pub mod backend;
pub mod chat;
pub mod config;
pub mod error;
pub mod media;
pub mod stt;
pub mod tts;

pub use backend::{BackendClient, Diagnosis, HistoryMessage, HttpBackendClient, SessionRecord};
pub use chat::{ConversationOrchestrator, Message, Role};
pub use config::Config;
pub use error::{Error, Result};
pub use media::{
    FileMediaDevice, MediaChunk, MediaDevice, MediaStream, MediaStreamController, RecordedMedia,
    StillFrame, StreamConstraints, TrackKind,
};
pub use stt::{RecognitionEvent, SpeechRecognizer, SpeechToTextEngine, TranscriptState};
pub use tts::{SpeechParams, SpeechSynthesizer, TextToSpeechQueue, Voice};
