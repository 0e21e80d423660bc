use crate::config::VoiceConfig;
use crate::error::Result;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::text::{normalize_for_speech, split_into_chunks, MAX_UTTERANCE_CHARS};
use super::voice::{select_voice, Voice};

/// Gap between utterances; avoids audio engine glitches when utterances
/// play back to back
const INTER_UTTERANCE_PAUSE: Duration = Duration::from_millis(100);

/// Synthesis parameters applied to the next utterance
#[derive(Debug, Clone)]
pub struct SpeechParams {
    pub volume: f32,
    pub rate: f32,
    pub pitch: f32,
}

impl From<&VoiceConfig> for SpeechParams {
    fn from(cfg: &VoiceConfig) -> Self {
        Self {
            volume: cfg.volume,
            rate: cfg.rate,
            pitch: cfg.pitch,
        }
    }
}

/// Speech-synthesis engine abstraction.
///
/// The underlying engine is a process-wide singleton that can play only
/// one utterance at a time; the queue above it exists to serialize against
/// that constraint.
#[async_trait::async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Whether the runtime has a synthesis engine at all
    fn is_supported(&self) -> bool;

    /// Currently advertised voices; may grow after startup on engines that
    /// load voices asynchronously
    fn voices(&self) -> Vec<Voice>;

    /// Speak one utterance to completion. Resolves when playback finishes
    /// or the utterance is cancelled.
    async fn speak(&self, text: &str, voice: Option<&Voice>, params: &SpeechParams) -> Result<()>;

    /// Abort the in-progress utterance, if any
    fn cancel(&self);

    fn pause(&self);
    fn resume(&self);
}

struct QueueState {
    queue: Mutex<VecDeque<String>>,
    is_speaking: AtomicBool,
    /// Single-flight guard: exactly one worker drains the queue
    processing: AtomicBool,
    /// Bumped by `stop`; invalidates utterances popped under an older value
    generation: AtomicU64,
    params: std::sync::Mutex<SpeechParams>,
    selected_voice: std::sync::Mutex<Option<Voice>>,
    preferred_voices: Vec<String>,
}

impl QueueState {
    /// Pop the next utterance together with the generation it was observed
    /// under
    async fn next_utterance(&self) -> Option<(String, u64)> {
        let mut queue = self.queue.lock().await;
        let generation = self.generation.load(Ordering::SeqCst);
        queue.pop_front().map(|utterance| (utterance, generation))
    }

    /// Whether an utterance popped under `generation` should still play.
    /// A `stop` that raced the pop leaves the utterance neither queued nor
    /// in progress, so the worker re-checks before synthesis.
    fn still_wanted(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Empty the queue and invalidate any popped-but-unspoken utterance
    async fn discard_pending(&self) {
        let mut queue = self.queue.lock().await;
        queue.clear();
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

/// FIFO queue of pending utterances over a `SpeechSynthesizer`.
///
/// At most one utterance is active at a time; chunks play in submission
/// order. Enqueuing while idle starts processing immediately.
#[derive(Clone)]
pub struct TextToSpeechQueue {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    state: Arc<QueueState>,
}

impl TextToSpeechQueue {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, cfg: &VoiceConfig) -> Self {
        let selected = select_voice(&synthesizer.voices(), &cfg.preferred_voices);
        if let Some(voice) = &selected {
            debug!("selected voice: {} ({})", voice.name, voice.lang);
        }

        Self {
            synthesizer,
            state: Arc::new(QueueState {
                queue: Mutex::new(VecDeque::new()),
                is_speaking: AtomicBool::new(false),
                processing: AtomicBool::new(false),
                generation: AtomicU64::new(0),
                params: std::sync::Mutex::new(SpeechParams::from(cfg)),
                selected_voice: std::sync::Mutex::new(selected),
                preferred_voices: cfg.preferred_voices.clone(),
            }),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.synthesizer.is_supported()
    }

    pub fn is_speaking(&self) -> bool {
        self.state.is_speaking.load(Ordering::SeqCst)
    }

    pub fn voices(&self) -> Vec<Voice> {
        self.synthesizer.voices()
    }

    pub fn selected_voice(&self) -> Option<Voice> {
        self.state.selected_voice.lock().unwrap().clone()
    }

    /// Re-run voice selection against the engine's current voice list.
    /// Call when the engine signals that its voices changed.
    pub fn refresh_voices(&self) {
        let selected = select_voice(&self.synthesizer.voices(), &self.state.preferred_voices);
        *self.state.selected_voice.lock().unwrap() = selected;
    }

    /// Normalize `text`, split it into sentence-bounded utterances and
    /// append them to the queue. Starts the worker if it was idle; chunks
    /// enqueued while busy simply wait their turn.
    pub async fn speak(&self, text: &str) {
        if !self.synthesizer.is_supported() {
            debug!("speech synthesis unsupported, dropping utterance");
            return;
        }

        let clean = normalize_for_speech(text);
        if clean.is_empty() {
            return;
        }

        let chunks = split_into_chunks(&clean, MAX_UTTERANCE_CHARS);
        {
            let mut queue = self.state.queue.lock().await;
            queue.extend(chunks);
        }

        self.ensure_worker();
    }

    /// Cancel the in-progress utterance, empty the queue and reset the
    /// speaking flag
    pub async fn stop(&self) {
        self.synthesizer.cancel();
        self.state.discard_pending().await;
        self.state.is_speaking.store(false, Ordering::SeqCst);
    }

    /// Suspend the current utterance without clearing the queue
    pub fn pause(&self) {
        if self.is_speaking() {
            self.synthesizer.pause();
        }
    }

    pub fn resume(&self) {
        self.synthesizer.resume();
    }

    pub fn set_volume(&self, volume: f32) {
        self.state.params.lock().unwrap().volume = volume;
    }

    pub fn set_rate(&self, rate: f32) {
        self.state.params.lock().unwrap().rate = rate;
    }

    pub fn set_pitch(&self, pitch: f32) {
        self.state.params.lock().unwrap().pitch = pitch;
    }

    pub fn set_voice(&self, voice: Voice) {
        *self.state.selected_voice.lock().unwrap() = Some(voice);
    }

    fn ensure_worker(&self) {
        if self.state.processing.swap(true, Ordering::SeqCst) {
            return;
        }

        let synthesizer = Arc::clone(&self.synthesizer);
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            'drain: loop {
                loop {
                    let Some((utterance, generation)) = state.next_utterance().await else {
                        break;
                    };

                    let voice = state.selected_voice.lock().unwrap().clone();
                    let params = state.params.lock().unwrap().clone();

                    // A stop may have raced the pop; a bumped generation
                    // means this utterance was discarded with the queue
                    if !state.still_wanted(generation) {
                        continue;
                    }

                    state.is_speaking.store(true, Ordering::SeqCst);
                    if let Err(e) = synthesizer
                        .speak(&utterance, voice.as_ref(), &params)
                        .await
                    {
                        // A failed utterance advances the queue, it never
                        // wedges it
                        warn!("speech synthesis failed: {}", e);
                    }
                    state.is_speaking.store(false, Ordering::SeqCst);

                    tokio::time::sleep(INTER_UTTERANCE_PAUSE).await;
                }

                state.processing.store(false, Ordering::SeqCst);

                // An enqueue may have raced the shutdown; reclaim the
                // guard and keep draining if so
                let refill = !state.queue.lock().await.is_empty();
                if refill && !state.processing.swap(true, Ordering::SeqCst) {
                    continue 'drain;
                }
                break;
            }
            debug!("speech queue drained");
        });
    }
}
