//! Serialized text-to-speech output
//!
//! Responses of arbitrary length are normalized, split into
//! sentence-bounded utterances and played strictly one at a time, because
//! the underlying synthesis engine is a process-wide singleton.

pub mod queue;
pub mod text;
pub mod voice;

pub use queue::{SpeechParams, SpeechSynthesizer, TextToSpeechQueue};
pub use text::{normalize_for_speech, split_into_chunks, MAX_UTTERANCE_CHARS};
pub use voice::{select_voice, Voice};
