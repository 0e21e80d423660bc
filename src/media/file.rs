use crate::error::{Error, Result};
use hound::WavReader;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::recorder::encode_wav_chunk;
use super::stream::{MediaChunk, MediaDevice, MediaStream, StillFrame, StreamConstraints, TrackKind};

/// Microphone stand-in backed by a WAV file.
///
/// Useful for headless runs and batch processing: the "device" replays the
/// file's samples through the chunk encoder at the recording interval, so
/// everything downstream behaves exactly as with live capture.
pub struct FileMediaDevice {
    path: PathBuf,
}

impl FileMediaDevice {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl MediaDevice for FileMediaDevice {
    fn is_available(&self) -> bool {
        self.path.exists()
    }

    async fn open(&self, constraints: &StreamConstraints) -> Result<Box<dyn MediaStream>> {
        if constraints.video {
            return Err(Error::DeviceAccess(
                "file-backed device has no video track".to_string(),
            ));
        }

        let reader = WavReader::open(&self.path)
            .map_err(|e| Error::DeviceAccess(format!("failed to open {}: {e}", self.path.display())))?;
        let spec = reader.spec();
        let samples: Vec<i16> = reader
            .into_samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::DeviceAccess(format!("failed to read samples: {e}")))?;

        let duration_seconds =
            samples.len() as f64 / (spec.sample_rate as f64 * spec.channels as f64);
        info!(
            "Opened audio file: {} ({:.1}s, {}Hz, {} channels)",
            self.path.display(),
            duration_seconds,
            spec.sample_rate,
            spec.channels
        );

        Ok(Box::new(FileMediaStream {
            samples,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            audio_enabled: true,
            stopped: Arc::new(AtomicBool::new(false)),
            encoder_stop: None,
        }))
    }
}

struct FileMediaStream {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
    audio_enabled: bool,
    stopped: Arc<AtomicBool>,
    encoder_stop: Option<Arc<AtomicBool>>,
}

impl MediaStream for FileMediaStream {
    fn set_track_enabled(&mut self, kind: TrackKind, enabled: bool) -> Option<bool> {
        match kind {
            TrackKind::Audio if !self.stopped.load(Ordering::SeqCst) => {
                self.audio_enabled = enabled;
                Some(self.audio_enabled)
            }
            _ => None,
        }
    }

    fn track_enabled(&self, kind: TrackKind) -> Option<bool> {
        match kind {
            TrackKind::Audio if !self.stopped.load(Ordering::SeqCst) => Some(self.audio_enabled),
            _ => None,
        }
    }

    fn active_tracks(&self) -> usize {
        if self.stopped.load(Ordering::SeqCst) {
            0
        } else {
            1
        }
    }

    fn stop_tracks(&mut self) {
        self.stop_chunks();
        self.stopped.store(true, Ordering::SeqCst);
    }

    fn start_chunks(&mut self, interval: Duration) -> mpsc::Receiver<MediaChunk> {
        let (tx, rx) = mpsc::channel(32);

        let stop = Arc::new(AtomicBool::new(false));
        self.encoder_stop = Some(Arc::clone(&stop));

        let samples = self.samples.clone();
        let sample_rate = self.sample_rate;
        let channels = self.channels;
        let samples_per_chunk =
            (sample_rate as usize * channels as usize * interval.as_millis() as usize) / 1000;

        tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            let mut offset = 0;
            let mut timestamp_ms = 0u64;

            while offset < samples.len() && !stop.load(Ordering::SeqCst) {
                tick.tick().await;

                let end = (offset + samples_per_chunk).min(samples.len());
                let encoded = match encode_wav_chunk(&samples[offset..end], sample_rate, channels) {
                    Ok(data) => data,
                    Err(e) => {
                        debug!("chunk encoding failed: {}", e);
                        break;
                    }
                };

                if tx
                    .send(MediaChunk {
                        data: encoded,
                        timestamp_ms,
                    })
                    .await
                    .is_err()
                {
                    break;
                }

                offset = end;
                timestamp_ms += interval.as_millis() as u64;
            }

            debug!("file chunk encoder finished at offset {}", offset);
        });

        rx
    }

    fn stop_chunks(&mut self) {
        if let Some(stop) = self.encoder_stop.take() {
            stop.store(true, Ordering::SeqCst);
        }
    }

    fn capture_still(&self) -> Option<StillFrame> {
        // No video track
        None
    }
}
