// Shared fakes for the pipeline integration tests.
//
// Every runtime-global engine (capture device, recognizer, synthesizer,
// backend) sits behind a trait, so these fakes stand in for the real
// hardware/network and let the tests observe ordering precisely.
#![allow(dead_code)]

use medassist::backend::types::{ChatResponse, HealthResponse};
use medassist::backend::{BackendClient, Diagnosis, HistoryMessage, SessionRecord};
use medassist::error::{Error, Result};
use medassist::media::{
    MediaChunk, MediaDevice, MediaStream, RecordedMedia, StillFrame, StreamConstraints, TrackKind,
};
use medassist::stt::{RecognitionEvent, SpeechRecognizer};
use medassist::tts::{SpeechParams, SpeechSynthesizer, Voice};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Notify};

// ============================================================================
// Media device
// ============================================================================

/// Observed track state of a stream handed out by the fake device
pub struct TrackProbe {
    pub active: AtomicUsize,
}

pub struct FakeMediaDevice {
    fail: bool,
    pub opens: AtomicUsize,
    /// Chunks emitted (once) per `start_chunks` call
    script: Mutex<Vec<MediaChunk>>,
    pub probes: Mutex<Vec<Arc<TrackProbe>>>,
}

impl FakeMediaDevice {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            opens: AtomicUsize::new(0),
            script: Mutex::new(Vec::new()),
            probes: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            opens: AtomicUsize::new(0),
            script: Mutex::new(Vec::new()),
            probes: Mutex::new(Vec::new()),
        })
    }

    pub fn with_chunks(chunks: Vec<Vec<u8>>) -> Arc<Self> {
        let device = Self::new();
        *device.script.lock().unwrap() = chunks
            .into_iter()
            .enumerate()
            .map(|(i, data)| MediaChunk {
                data,
                timestamp_ms: i as u64 * 1000,
            })
            .collect();
        device
    }

    pub fn probe(&self, index: usize) -> Arc<TrackProbe> {
        Arc::clone(&self.probes.lock().unwrap()[index])
    }
}

#[async_trait::async_trait]
impl MediaDevice for FakeMediaDevice {
    fn is_available(&self) -> bool {
        !self.fail
    }

    async fn open(&self, constraints: &StreamConstraints) -> Result<Box<dyn MediaStream>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::DeviceAccess("Permission denied".to_string()));
        }

        let track_count = constraints.video as usize + constraints.audio as usize;
        let probe = Arc::new(TrackProbe {
            active: AtomicUsize::new(track_count),
        });
        self.probes.lock().unwrap().push(Arc::clone(&probe));

        Ok(Box::new(FakeMediaStream {
            video: constraints.video.then_some(true),
            audio: constraints.audio.then_some(true),
            stopped: false,
            probe,
            script: self.script.lock().unwrap().clone(),
        }))
    }
}

pub struct FakeMediaStream {
    video: Option<bool>,
    audio: Option<bool>,
    stopped: bool,
    probe: Arc<TrackProbe>,
    script: Vec<MediaChunk>,
}

impl MediaStream for FakeMediaStream {
    fn set_track_enabled(&mut self, kind: TrackKind, enabled: bool) -> Option<bool> {
        if self.stopped {
            return None;
        }
        let slot = match kind {
            TrackKind::Video => self.video.as_mut()?,
            TrackKind::Audio => self.audio.as_mut()?,
        };
        *slot = enabled;
        Some(*slot)
    }

    fn track_enabled(&self, kind: TrackKind) -> Option<bool> {
        if self.stopped {
            return None;
        }
        match kind {
            TrackKind::Video => self.video,
            TrackKind::Audio => self.audio,
        }
    }

    fn active_tracks(&self) -> usize {
        self.probe.active.load(Ordering::SeqCst)
    }

    fn stop_tracks(&mut self) {
        self.stopped = true;
        self.probe.active.store(0, Ordering::SeqCst);
    }

    fn start_chunks(&mut self, _interval: Duration) -> mpsc::Receiver<MediaChunk> {
        let (tx, rx) = mpsc::channel(32);
        let script = self.script.clone();
        tokio::spawn(async move {
            for chunk in script {
                if tx.send(chunk).await.is_err() {
                    break;
                }
            }
            // Sender drops here, closing the channel like a finalized
            // recorder
        });
        rx
    }

    fn stop_chunks(&mut self) {}

    fn capture_still(&self) -> Option<StillFrame> {
        if self.video? {
            Some(StillFrame {
                data: vec![0xFF, 0xD8, 0xFF],
                mime_type: "image/jpeg",
                width: 1280,
                height: 720,
            })
        } else {
            None
        }
    }
}

// ============================================================================
// Speech recognizer
// ============================================================================

type EventSlot = Arc<Mutex<Option<mpsc::Sender<RecognitionEvent>>>>;

/// Scripted recognizer: the test drives events through a handle after the
/// engine has started it
pub struct FakeRecognizer {
    supported: bool,
    fail_stop: bool,
    slot: EventSlot,
}

#[derive(Clone)]
pub struct RecognizerHandle {
    slot: EventSlot,
}

impl FakeRecognizer {
    pub fn new(supported: bool) -> (Box<Self>, RecognizerHandle) {
        let slot: EventSlot = Arc::new(Mutex::new(None));
        let handle = RecognizerHandle {
            slot: Arc::clone(&slot),
        };
        (
            Box::new(Self {
                supported,
                fail_stop: false,
                slot,
            }),
            handle,
        )
    }

    /// An engine whose `stop` fails and never closes the event channel
    pub fn with_failing_stop() -> (Box<Self>, RecognizerHandle) {
        let (mut recognizer, handle) = Self::new(true);
        recognizer.fail_stop = true;
        (recognizer, handle)
    }
}

impl RecognizerHandle {
    pub async fn emit(&self, event: RecognitionEvent) {
        let tx = self
            .slot
            .lock()
            .unwrap()
            .clone()
            .expect("recognizer not started");
        tx.send(event).await.expect("engine dropped event channel");
    }

    pub async fn result(&self, finals: &[&str], interim: Option<&str>) {
        self.emit(RecognitionEvent::Result {
            finals: finals.iter().map(|s| s.to_string()).collect(),
            interim: interim.map(|s| s.to_string()),
        })
        .await;
    }

    /// Close the event channel, like an engine-initiated end
    pub fn end(&self) {
        self.slot.lock().unwrap().take();
    }
}

#[async_trait::async_trait]
impl SpeechRecognizer for FakeRecognizer {
    fn is_supported(&self) -> bool {
        self.supported
    }

    async fn start(&mut self, _locale: &str) -> Result<mpsc::Receiver<RecognitionEvent>> {
        let (tx, rx) = mpsc::channel(32);
        *self.slot.lock().unwrap() = Some(tx);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        if self.fail_stop {
            return Err(Error::DeviceAccess(
                "recognition engine refused to stop".to_string(),
            ));
        }
        self.slot.lock().unwrap().take();
        Ok(())
    }
}

// ============================================================================
// Speech synthesizer
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SynthEvent {
    Started(String),
    Finished(String),
    Cancelled,
    Paused,
    Resumed,
}

pub struct FakeSynthesizer {
    supported: bool,
    voices: Mutex<Vec<Voice>>,
    utterance: Duration,
    pub events: Mutex<Vec<(Instant, SynthEvent)>>,
    pub params_log: Mutex<Vec<SpeechParams>>,
    pub speaking: AtomicBool,
    /// Set if a second utterance started while one was playing
    pub overlap: AtomicBool,
    cancel: Notify,
}

impl FakeSynthesizer {
    pub fn new(utterance: Duration) -> Arc<Self> {
        Arc::new(Self {
            supported: true,
            voices: Mutex::new(vec![Voice::new("Samantha", "en-US")]),
            utterance,
            events: Mutex::new(Vec::new()),
            params_log: Mutex::new(Vec::new()),
            speaking: AtomicBool::new(false),
            overlap: AtomicBool::new(false),
            cancel: Notify::new(),
        })
    }

    pub fn unsupported() -> Arc<Self> {
        Arc::new(Self {
            supported: false,
            voices: Mutex::new(Vec::new()),
            utterance: Duration::from_millis(10),
            events: Mutex::new(Vec::new()),
            params_log: Mutex::new(Vec::new()),
            speaking: AtomicBool::new(false),
            overlap: AtomicBool::new(false),
            cancel: Notify::new(),
        })
    }

    pub fn set_voices(&self, voices: Vec<Voice>) {
        *self.voices.lock().unwrap() = voices;
    }

    pub fn log(&self) -> Vec<SynthEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub fn started_texts(&self) -> Vec<String> {
        self.log()
            .into_iter()
            .filter_map(|e| match e {
                SynthEvent::Started(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    pub fn cancelled_at(&self) -> Option<Instant> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .find(|(_, e)| *e == SynthEvent::Cancelled)
            .map(|(at, _)| *at)
    }

    fn record(&self, event: SynthEvent) {
        self.events.lock().unwrap().push((Instant::now(), event));
    }
}

#[async_trait::async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn voices(&self) -> Vec<Voice> {
        self.voices.lock().unwrap().clone()
    }

    async fn speak(&self, text: &str, _voice: Option<&Voice>, params: &SpeechParams) -> Result<()> {
        if self.speaking.swap(true, Ordering::SeqCst) {
            self.overlap.store(true, Ordering::SeqCst);
        }
        self.record(SynthEvent::Started(text.to_string()));
        self.params_log.lock().unwrap().push(params.clone());

        tokio::select! {
            _ = tokio::time::sleep(self.utterance) => {
                self.record(SynthEvent::Finished(text.to_string()));
            }
            _ = self.cancel.notified() => {}
        }

        self.speaking.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn cancel(&self) {
        self.record(SynthEvent::Cancelled);
        self.cancel.notify_waiters();
    }

    fn pause(&self) {
        self.record(SynthEvent::Paused);
    }

    fn resume(&self) {
        self.record(SynthEvent::Resumed);
    }
}

// ============================================================================
// Backend
// ============================================================================

pub struct FakeBackend {
    pub chat_reply: Mutex<Option<String>>,
    pub video_reply: Mutex<Option<String>>,
    pub document_reply: Mutex<Option<String>>,
    pub diagnoses: Mutex<Vec<Diagnosis>>,
    pub history_error: Mutex<Option<String>>,
    pub records: Mutex<Vec<SessionRecord>>,

    pub chat_calls: AtomicUsize,
    pub video_calls: AtomicUsize,
    pub document_calls: AtomicUsize,
    pub history_calls: AtomicUsize,
    pub add_calls: AtomicUsize,
    pub deleted_ids: Mutex<Vec<String>>,
    pub last_history_payload: Mutex<Vec<HistoryMessage>>,
    pub chat_called_at: Mutex<Option<Instant>>,
}

impl FakeBackend {
    pub fn new(chat_reply: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            chat_reply: Mutex::new(chat_reply.map(|s| s.to_string())),
            video_reply: Mutex::new(Some("The video shows no acute distress.".to_string())),
            document_reply: Mutex::new(Some("Document summary.".to_string())),
            diagnoses: Mutex::new(Vec::new()),
            history_error: Mutex::new(None),
            records: Mutex::new(Vec::new()),
            chat_calls: AtomicUsize::new(0),
            video_calls: AtomicUsize::new(0),
            document_calls: AtomicUsize::new(0),
            history_calls: AtomicUsize::new(0),
            add_calls: AtomicUsize::new(0),
            deleted_ids: Mutex::new(Vec::new()),
            last_history_payload: Mutex::new(Vec::new()),
            chat_called_at: Mutex::new(None),
        })
    }
}

#[async_trait::async_trait]
impl BackendClient for FakeBackend {
    async fn health(&self) -> Result<HealthResponse> {
        Ok(HealthResponse {
            status: "healthy".to_string(),
            message: None,
        })
    }

    async fn chat(&self, _message: &str) -> Result<ChatResponse> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        *self.chat_called_at.lock().unwrap() = Some(Instant::now());
        match self.chat_reply.lock().unwrap().clone() {
            Some(response) => Ok(ChatResponse {
                response,
                success: Some(true),
            }),
            None => Err(Error::Transport("/api/chat returned 500".to_string())),
        }
    }

    async fn analyze_video(
        &self,
        _video: &RecordedMedia,
        _audio_transcript: &str,
    ) -> Result<String> {
        self.video_calls.fetch_add(1, Ordering::SeqCst);
        self.video_reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::Transport("/api/video/analyze returned 500".to_string()))
    }

    async fn analyze_document(&self, _file_name: &str, _bytes: Vec<u8>) -> Result<String> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        self.document_reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::Transport("/api/document/analyze returned 500".to_string()))
    }

    async fn analyze_history(&self, messages: Vec<HistoryMessage>) -> Result<Vec<Diagnosis>> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_history_payload.lock().unwrap() = messages;
        if let Some(reason) = self.history_error.lock().unwrap().clone() {
            return Err(Error::Transport(reason));
        }
        Ok(self.diagnoses.lock().unwrap().clone())
    }

    async fn fetch_history(&self) -> Result<Vec<SessionRecord>> {
        Ok(self.records.lock().unwrap().clone())
    }

    async fn add_history(&self, _diagnosis: &Diagnosis) -> Result<()> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete_history(&self, id: &str) -> Result<()> {
        self.deleted_ids.lock().unwrap().push(id.to_string());
        Ok(())
    }
}

pub fn sample_diagnosis() -> Diagnosis {
    Diagnosis {
        diagnosis: "Seasonal allergic rhinitis".to_string(),
        confidence: 0.85,
        symptoms: vec!["sneezing".to_string(), "itchy eyes".to_string()],
        ai_recommendations: vec!["Try an antihistamine".to_string()],
        follow_up_needed: false,
    }
}
