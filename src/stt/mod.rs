//! Continuous speech recognition with interim/final reconciliation
//!
//! The engine wraps a streaming `SpeechRecognizer`, applies its events
//! through a single-task reducer into a `TranscriptState`, and records the
//! raw microphone audio in parallel for backend re-transcription.

pub mod engine;
pub mod recognizer;
pub mod transcript;

pub use engine::SpeechToTextEngine;
pub use recognizer::{RecognitionEvent, SpeechRecognizer};
pub use transcript::TranscriptState;
