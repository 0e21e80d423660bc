use crate::error::{Error, Result};
use std::io::Cursor;

use super::stream::MediaChunk;

/// MIME tag for recorded camera+microphone sessions
pub const RECORDING_MIME: &str = "video/webm";
/// MIME tag for raw microphone audio recorded alongside speech recognition
pub const AUDIO_MIME: &str = "audio/webm";

/// A finalized recording: every chunk concatenated into one playable blob
#[derive(Debug, Clone)]
pub struct RecordedMedia {
    pub data: Vec<u8>,
    pub mime_type: &'static str,
    pub duration_secs: u64,
}

impl RecordedMedia {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

/// Concatenate accumulated chunks into a single tagged blob.
///
/// An empty chunk sequence still yields a well-formed (zero-length) blob,
/// never an error.
pub fn assemble_recording(
    chunks: Vec<MediaChunk>,
    mime_type: &'static str,
    duration_secs: u64,
) -> RecordedMedia {
    let mut data = Vec::with_capacity(chunks.iter().map(|c| c.data.len()).sum());
    for chunk in chunks {
        data.extend_from_slice(&chunk.data);
    }
    RecordedMedia {
        data,
        mime_type,
        duration_secs,
    }
}

/// Encode one interval's worth of PCM samples as an in-memory WAV fragment
pub fn encode_wav_chunk(samples: &[i16], sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| Error::DeviceAccess(format!("failed to create WAV encoder: {e}")))?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| Error::DeviceAccess(format!("failed to encode sample: {e}")))?;
        }
        writer
            .finalize()
            .map_err(|e| Error::DeviceAccess(format!("failed to finalize WAV chunk: {e}")))?;
    }

    Ok(cursor.into_inner())
}
