//! Transcript windowing for prompt construction.

use super::message::ConversationMessage;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ENTRIES: usize = 20;
pub const DEFAULT_HEAD_KEEP: usize = 6;

/// Bounds applied to a transcript before it is sent to the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryWindow {
    pub max_entries: usize,
    pub head_keep: usize,
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            head_keep: DEFAULT_HEAD_KEEP,
        }
    }
}

impl HistoryWindow {
    pub fn new(max_entries: usize, head_keep: usize) -> Self {
        Self {
            max_entries,
            head_keep,
        }
    }

    pub fn apply(&self, transcript: &[ConversationMessage]) -> Vec<ConversationMessage> {
        window(transcript, self.max_entries, self.head_keep)
    }
}

/// Compresses `transcript` to at most `max_entries` entries.
///
/// The first `head_keep` entries (system prompt and earliest context) and the
/// most recent `max_entries - head_keep` entries survive; the middle is
/// dropped. The input is never modified.
pub fn window(
    transcript: &[ConversationMessage],
    max_entries: usize,
    head_keep: usize,
) -> Vec<ConversationMessage> {
    if transcript.len() <= max_entries {
        return transcript.to_vec();
    }

    let head_keep = head_keep.min(max_entries);
    let tail_keep = max_entries - head_keep;

    let mut windowed = Vec::with_capacity(max_entries);
    windowed.extend_from_slice(&transcript[..head_keep]);
    if tail_keep > 0 {
        windowed.extend_from_slice(&transcript[transcript.len() - tail_keep..]);
    }
    windowed
}
