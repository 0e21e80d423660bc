/// Reconciled recognition output.
///
/// `finalized` only ever grows (each committed segment is appended exactly
/// once, in event order); `interim` is replaced wholesale on every event
/// and cleared when recognition ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriptState {
    pub finalized: String,
    pub interim: String,
}

impl TranscriptState {
    /// Apply one recognition result: append finals in order, replace the
    /// interim guess.
    pub fn apply(&mut self, finals: &[String], interim: Option<&str>) {
        for segment in finals {
            self.finalized.push_str(segment);
        }
        self.interim = interim.unwrap_or_default().to_string();
    }

    pub fn clear_interim(&mut self) {
        self.interim.clear();
    }

    pub fn reset(&mut self) {
        self.finalized.clear();
        self.interim.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.finalized.is_empty() && self.interim.is_empty()
    }
}
