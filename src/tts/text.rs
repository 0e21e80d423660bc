use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum characters per synthesized utterance
pub const MAX_UTTERANCE_CHARS: usize = 200;

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").unwrap());
static HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"#{1,6}\s").unwrap());
static PARAGRAPH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\n+").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strip markdown emphasis/headers/code punctuation and collapse
/// newlines into sentence-terminated prose, so the synthesizer does not
/// read out formatting characters.
pub fn normalize_for_speech(text: &str) -> String {
    let text = BOLD.replace_all(text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = CODE.replace_all(&text, "$1");
    let text = HEADER.replace_all(&text, "");
    let text = PARAGRAPH.replace_all(&text, ". ");
    let text = text.replace('\n', " ");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Split normalized text into utterances of at most `max_chars`, breaking
/// only at sentence boundaries.
///
/// Sentences longer than the bound are never cut mid-word: a boundary-free
/// string comes back as a single chunk.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in text.split(['.', '!', '?']) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }

        let with_punctuation = format!("{sentence}.");

        if current.chars().count() + with_punctuation.chars().count() <= max_chars {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&with_punctuation);
        } else {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            current = with_punctuation;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    if chunks.is_empty() {
        vec![text.to_string()]
    } else {
        chunks
    }
}
