use crate::error::{Error, Result};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::recorder::{assemble_recording, RecordedMedia, RECORDING_MIME};
use super::stream::{MediaChunk, MediaDevice, MediaStream, StillFrame, StreamConstraints, TrackKind};

/// Interval between encoded fragments while recording
const CHUNK_INTERVAL: Duration = Duration::from_secs(1);

/// Manages the camera/microphone acquisition lifecycle and chunked
/// recording.
///
/// At most one device stream is active per controller. Enabling/disabling
/// video or audio flips track-level flags without re-acquiring the stream.
/// Dropping the controller stops every track, so device access is never
/// leaked past the owner's lifetime.
pub struct MediaStreamController {
    device: Arc<dyn MediaDevice>,

    stream: Option<Box<dyn MediaStream>>,
    video_enabled: bool,
    audio_enabled: bool,
    loading: bool,
    last_error: Option<String>,

    recording: Arc<AtomicBool>,
    chunks: Arc<Mutex<Vec<MediaChunk>>>,
    duration_secs: Arc<AtomicU64>,
    result: Option<RecordedMedia>,

    recorder_task: Option<JoinHandle<()>>,
    timer_task: Option<JoinHandle<()>>,
}

impl MediaStreamController {
    pub fn new(device: Arc<dyn MediaDevice>) -> Self {
        Self {
            device,
            stream: None,
            video_enabled: false,
            audio_enabled: false,
            loading: false,
            last_error: None,
            recording: Arc::new(AtomicBool::new(false)),
            chunks: Arc::new(Mutex::new(Vec::new())),
            duration_secs: Arc::new(AtomicU64::new(0)),
            result: None,
            recorder_task: None,
            timer_task: None,
        }
    }

    /// Request camera+microphone access.
    ///
    /// Idempotent while a request is outstanding or a stream is already
    /// active; a failure stores a human-readable error and leaves the
    /// controller unacquired.
    pub async fn start_capture(&mut self, constraints: &StreamConstraints) -> Result<()> {
        if self.loading {
            debug!("capture already starting, ignoring duplicate request");
            return Ok(());
        }
        if self.stream.is_some() {
            warn!("stream already active");
            return Ok(());
        }

        self.loading = true;
        self.last_error = None;

        let acquired = self.device.open(constraints).await;
        self.loading = false;

        match acquired {
            Ok(stream) => {
                info!("media stream acquired");
                self.stream = Some(stream);
                self.video_enabled = constraints.video;
                self.audio_enabled = constraints.audio;
                Ok(())
            }
            Err(e) => {
                error!("device acquisition failed: {}", e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Stop every track and release the device handle. Force-stops an
    /// in-progress recording first, so no recorder is left orphaned.
    pub async fn stop_capture(&mut self) {
        if self.recording.load(Ordering::SeqCst) {
            self.stop_recording().await;
        }

        if let Some(mut stream) = self.stream.take() {
            stream.stop_tracks();
            info!("media stream released");
        }

        self.video_enabled = false;
        self.audio_enabled = false;
        self.last_error = None;
    }

    /// Flip the video track's `enabled` flag; no-op without a stream
    pub fn toggle_video(&mut self) {
        if let Some(stream) = self.stream.as_mut() {
            let next = !stream.track_enabled(TrackKind::Video).unwrap_or(false);
            if let Some(state) = stream.set_track_enabled(TrackKind::Video, next) {
                self.video_enabled = state;
            }
        }
    }

    /// Flip the audio track's `enabled` flag; no-op without a stream
    pub fn toggle_audio(&mut self) {
        if let Some(stream) = self.stream.as_mut() {
            let next = !stream.track_enabled(TrackKind::Audio).unwrap_or(false);
            if let Some(state) = stream.set_track_enabled(TrackKind::Audio, next) {
                self.audio_enabled = state;
            }
        }
    }

    /// Begin chunked recording on the active stream.
    ///
    /// Fails with `Error::RecordingState` when no stream is active. Clears
    /// any previous result blob and restarts the 1 Hz duration counter.
    pub fn start_recording(&mut self) -> Result<()> {
        if self.recording.load(Ordering::SeqCst) {
            warn!("recording already in progress");
            return Ok(());
        }

        let stream = self.stream.as_mut().ok_or(Error::RecordingState)?;

        self.result = None;
        self.duration_secs.store(0, Ordering::SeqCst);

        let mut chunk_rx = stream.start_chunks(CHUNK_INTERVAL);
        self.recording.store(true, Ordering::SeqCst);
        info!("recording started");

        // Collect fragments until the encoder closes the channel
        let chunks = Arc::clone(&self.chunks);
        self.recorder_task = Some(tokio::spawn(async move {
            while let Some(chunk) = chunk_rx.recv().await {
                if chunk.data.is_empty() {
                    continue;
                }
                chunks.lock().await.push(chunk);
            }
            debug!("recorder task finished");
        }));

        // 1 Hz duration counter
        let duration = Arc::clone(&self.duration_secs);
        let recording = Arc::clone(&self.recording);
        self.timer_task = Some(tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_secs(1));
            tick.tick().await; // first tick completes immediately
            loop {
                tick.tick().await;
                if !recording.load(Ordering::SeqCst) {
                    break;
                }
                duration.fetch_add(1, Ordering::SeqCst);
            }
        }));

        Ok(())
    }

    /// Finalize the recorder and expose the concatenated result blob.
    ///
    /// Idempotent when no recording is active. A stop with zero collected
    /// fragments still produces a well-formed (empty) blob.
    pub async fn stop_recording(&mut self) {
        if !self.recording.swap(false, Ordering::SeqCst) {
            debug!("no recording in progress");
            return;
        }

        if let Some(stream) = self.stream.as_mut() {
            stream.stop_chunks();
        }

        if let Some(task) = self.recorder_task.take() {
            if let Err(e) = task.await {
                error!("recorder task panicked: {}", e);
            }
        }
        if let Some(task) = self.timer_task.take() {
            task.abort();
        }

        let collected = {
            let mut guard = self.chunks.lock().await;
            std::mem::take(&mut *guard)
        };
        let duration = self.duration_secs.load(Ordering::SeqCst);

        info!(
            "recording stopped: {} chunks, {}s",
            collected.len(),
            duration
        );
        self.result = Some(assemble_recording(collected, RECORDING_MIME, duration));
    }

    /// Rasterize the current video frame, or `None` if the track has not
    /// produced one yet
    pub fn capture_still_frame(&self) -> Option<StillFrame> {
        self.stream.as_ref()?.capture_still()
    }

    /// Consume the finished recording, resetting the duration counter
    pub fn take_recording(&mut self) -> Option<RecordedMedia> {
        let blob = self.result.take();
        if blob.is_some() {
            self.duration_secs.store(0, Ordering::SeqCst);
        }
        blob
    }

    pub fn recording_result(&self) -> Option<&RecordedMedia> {
        self.result.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::SeqCst)
    }

    pub fn video_enabled(&self) -> bool {
        self.video_enabled
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs.load(Ordering::SeqCst)
    }

    /// Active track count of the underlying stream (0 when released)
    pub fn active_tracks(&self) -> usize {
        self.stream.as_ref().map_or(0, |s| s.active_tracks())
    }
}

impl Drop for MediaStreamController {
    fn drop(&mut self) {
        self.recording.store(false, Ordering::SeqCst);
        if let Some(task) = self.recorder_task.take() {
            task.abort();
        }
        if let Some(task) = self.timer_task.take() {
            task.abort();
        }
        if let Some(mut stream) = self.stream.take() {
            stream.stop_tracks();
        }
    }
}

/// Format elapsed seconds as `MM:SS` for recording labels
pub fn format_duration(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
