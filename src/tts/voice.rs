use serde::{Deserialize, Serialize};

/// A synthesis voice advertised by the speech engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    /// BCP-47 language tag, e.g. "en-US"
    pub lang: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }

    fn is_english(&self) -> bool {
        self.lang.starts_with("en")
    }
}

/// Pick the best available voice.
///
/// Ranking: first exact match from the preferred-name list, then the first
/// English voice whose name suggests a female speaker, then the first
/// English voice, then the first voice of any kind. Engines may load their
/// voice list asynchronously, so this runs again whenever the list changes.
pub fn select_voice(available: &[Voice], preferred: &[String]) -> Option<Voice> {
    for name in preferred {
        if let Some(voice) = available.iter().find(|v| &v.name == name) {
            return Some(voice.clone());
        }
    }

    if let Some(voice) = available
        .iter()
        .find(|v| v.is_english() && v.name.to_lowercase().contains("female"))
    {
        return Some(voice.clone());
    }

    if let Some(voice) = available.iter().find(|v| v.is_english()) {
        return Some(voice.clone());
    }

    available.first().cloned()
}
