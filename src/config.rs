use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub media: MediaConfig,
    pub speech: SpeechConfig,
    pub voice: VoiceConfig,
}

/// Backend inference service (chat, video/document analysis, history).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the inference API
    pub base_url: String,
    /// Optional user identifier attached to requests
    pub user_id: Option<String>,
}

/// Capture constraints requested from the camera/microphone device.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
    pub sample_rate: u32,
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Recognition locale (continuous, interim-enabled)
    pub locale: String,
}

/// Synthesis parameters and voice preference ranking.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    pub volume: f32,
    pub rate: f32,
    pub pitch: f32,
    /// Voice names tried in order before the heuristic fallbacks
    pub preferred_voices: Vec<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            user_id: None,
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            frame_rate: 30,
            sample_rate: 44100,
            echo_cancellation: true,
            noise_suppression: true,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            volume: 0.8,
            rate: 0.9,
            pitch: 1.0,
            preferred_voices: vec![
                "Microsoft Zira - English (United States)".to_string(),
                "Google UK English Female".to_string(),
                "Alex".to_string(),
                "Samantha".to_string(),
                "Karen".to_string(),
                "Moira".to_string(),
                "Tessa".to_string(),
            ],
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
