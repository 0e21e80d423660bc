use crate::config::MediaConfig;
use crate::error::Result;
use std::time::Duration;
use tokio::sync::mpsc;

/// Track type within an acquired device stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Video,
    Audio,
}

/// Constraints requested from the device at acquisition time.
///
/// Resolution/frame-rate values are ideals, not hard requirements; the
/// device may deliver the closest mode it supports.
#[derive(Debug, Clone)]
pub struct StreamConstraints {
    pub video: bool,
    pub audio: bool,
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
    pub sample_rate: u32,
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
}

impl StreamConstraints {
    /// Camera + microphone constraints from configuration
    pub fn from_config(cfg: &MediaConfig) -> Self {
        Self {
            video: true,
            audio: true,
            width: cfg.width,
            height: cfg.height,
            frame_rate: cfg.frame_rate,
            sample_rate: cfg.sample_rate,
            echo_cancellation: cfg.echo_cancellation,
            noise_suppression: cfg.noise_suppression,
        }
    }

    /// Microphone-only constraints (used by the speech engine's parallel
    /// raw-audio recorder)
    pub fn audio_only(sample_rate: u32) -> Self {
        Self {
            video: false,
            audio: true,
            width: 0,
            height: 0,
            frame_rate: 0,
            sample_rate,
            echo_cancellation: true,
            noise_suppression: true,
        }
    }
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self::from_config(&MediaConfig::default())
    }
}

/// One encoded media fragment emitted by a stream's chunk encoder
#[derive(Debug, Clone)]
pub struct MediaChunk {
    pub data: Vec<u8>,
    /// Milliseconds since the encoder started
    pub timestamp_ms: u64,
}

/// A compressed still image rasterized from the live video track
#[derive(Debug, Clone)]
pub struct StillFrame {
    pub data: Vec<u8>,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Capture hardware abstraction.
///
/// The runtime's camera/microphone is global state; hiding it behind this
/// trait lets the controller own acquisition explicitly and lets tests
/// substitute fakes.
#[async_trait::async_trait]
pub trait MediaDevice: Send + Sync {
    /// Whether the runtime exposes any capture hardware
    fn is_available(&self) -> bool;

    /// Request device access. Fails with `Error::DeviceAccess` on
    /// permission denial or missing hardware.
    async fn open(&self, constraints: &StreamConstraints) -> Result<Box<dyn MediaStream>>;
}

/// A live device stream: a set of tracks plus an optional chunk encoder.
///
/// Implementations must stop delivering chunks (close the channel returned
/// by `start_chunks`) once `stop_chunks` or `stop_tracks` is called.
pub trait MediaStream: Send + Sync {
    /// Flip the `enabled` flag on a track without re-acquiring the stream.
    /// Returns the new state, or `None` if the stream has no such track.
    fn set_track_enabled(&mut self, kind: TrackKind, enabled: bool) -> Option<bool>;

    /// Current `enabled` state of a track, if present
    fn track_enabled(&self, kind: TrackKind) -> Option<bool>;

    /// Number of tracks still live (not stopped)
    fn active_tracks(&self) -> usize;

    /// Stop every track and release the underlying device handles
    fn stop_tracks(&mut self);

    /// Begin chunked encoding at the given interval. Fragments arrive on
    /// the returned channel until `stop_chunks` is called or the tracks
    /// stop.
    fn start_chunks(&mut self, interval: Duration) -> mpsc::Receiver<MediaChunk>;

    /// Finalize the chunk encoder; the chunk channel closes after any
    /// buffered fragments are delivered
    fn stop_chunks(&mut self);

    /// Rasterize the current video frame, or `None` if no frame is
    /// available yet
    fn capture_still(&self) -> Option<StillFrame>;
}
