//! Greedy grouping of transcript entries into candidate segments.

use crate::transcript::TranscriptEntry;

use super::{classify, Segment};

/// Segments need at least this many entries to carry a narrative beat.
pub const MIN_SEGMENT_ENTRIES: usize = 3;
/// Hard ceiling before a group is closed regardless of content.
pub const MAX_SEGMENT_ENTRIES: usize = 15;
/// A silence longer than this between entries is a natural break.
const NATURAL_BREAK_GAP_MS: u64 = 3_000;
/// Topic-change detection only kicks in once a group has this many entries.
const TOPIC_CHANGE_MIN_ENTRIES: usize = 5;

/// Discourse markers that signal the speaker is moving to another topic.
const TRANSITION_WORDS: &[&str] = &[
    "however",
    "but",
    "meanwhile",
    "on the other hand",
    "speaking of",
    "anyway",
];

/// Scan the transcript once, accumulating entries into groups and closing a
/// group at the first break point after it reaches the minimum size.
///
/// A trailing group smaller than [`MIN_SEGMENT_ENTRIES`] is dropped, not
/// emitted. Short transcripts therefore produce no segments here and are
/// handled by the fallback paths instead.
pub fn extract_segments(entries: &[TranscriptEntry]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut group: Vec<&TranscriptEntry> = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        group.push(entry);

        let should_end = group.len() >= MIN_SEGMENT_ENTRIES
            && (group.len() >= MAX_SEGMENT_ENTRIES
                || is_natural_break(entry, entries.get(i + 1))
                || is_topic_change(&group));

        if should_end || i == entries.len() - 1 {
            if group.len() >= MIN_SEGMENT_ENTRIES {
                if let Some(segment) = classify::build_segment(&group) {
                    segments.push(segment);
                }
            }
            group.clear();
        }
    }

    segments
}

/// A natural break holds between two consecutive entries at the end of the
/// transcript, across a long pause, on a speaker change, or when a finished
/// sentence is followed by a fresh capitalized one.
fn is_natural_break(current: &TranscriptEntry, next: Option<&TranscriptEntry>) -> bool {
    let Some(next) = next else {
        return true;
    };

    if next.start_ms.saturating_sub(current.end_ms) > NATURAL_BREAK_GAP_MS {
        return true;
    }

    if current.speaker != next.speaker {
        return true;
    }

    let ends_sentence = current
        .text
        .trim_end()
        .ends_with(['.', '!', '?']);
    let starts_fresh = next
        .text
        .chars()
        .next()
        .map(|c| c.is_ascii_uppercase())
        .unwrap_or(false);

    ends_sentence && starts_fresh
}

/// A topic change is flagged when any transition word appears in the last
/// three entries of a sufficiently large group.
fn is_topic_change(group: &[&TranscriptEntry]) -> bool {
    if group.len() < TOPIC_CHANGE_MIN_ENTRIES {
        return false;
    }

    let recent = group[group.len() - 3..]
        .iter()
        .map(|e| e.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    TRANSITION_WORDS.iter().any(|word| recent.contains(word))
}
