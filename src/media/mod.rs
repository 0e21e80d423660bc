//! Camera/microphone acquisition and chunked recording
//!
//! This module owns the device lifecycle:
//! - `MediaDevice`/`MediaStream` abstract the runtime's capture hardware
//! - `MediaStreamController` manages acquisition, track toggling and the
//!   chunked recorder producing a playable blob
//! - `FileMediaDevice` replays a WAV file as if it were a microphone

pub mod controller;
pub mod file;
pub mod recorder;
pub mod stream;

pub use controller::{format_duration, MediaStreamController};
pub use file::FileMediaDevice;
pub use recorder::{assemble_recording, encode_wav_chunk, RecordedMedia, AUDIO_MIME, RECORDING_MIME};
pub use stream::{MediaChunk, MediaDevice, MediaStream, StillFrame, StreamConstraints, TrackKind};
