//! Fallback segment discovery for transcripts the primary segmenter
//! rejects: a whole-transcript scan for high-salience rhetorical phrases,
//! and an equal-partition last resort.

use tracing::debug;

use crate::transcript::TranscriptEntry;

use super::{classify, Category, Segment, SegmentSource};

struct PowerPattern {
    category: Category,
    intensity: u8,
    title_prefix: &'static str,
    description: &'static str,
    phrases: &'static [&'static str],
}

/// Rhetorical phrases that mark documentary-worthy moments, strongest
/// first. Scan order doubles as the tiebreak when candidates collide.
static POWER_PATTERNS: &[PowerPattern] = &[
    PowerPattern {
        category: Category::Revelation,
        intensity: 9,
        title_prefix: "The Untold Truth",
        description: "A powerful revelation that changes everything we thought we knew.",
        phrases: &["never told anyone", "first time", "secret", "confession"],
    },
    PowerPattern {
        category: Category::KeyMoment,
        intensity: 8,
        title_prefix: "The Turning Point",
        description: "The critical moment that transformed the entire situation.",
        phrases: &[
            "turning point",
            "changed everything",
            "moment i realized",
            "suddenly understood",
        ],
    },
    PowerPattern {
        category: Category::Conflict,
        intensity: 7,
        title_prefix: "Facing the Challenge",
        description: "The human struggle that reveals true character and determination.",
        phrases: &["struggled with", "difficult", "challenge", "hardest part"],
    },
    PowerPattern {
        category: Category::Insight,
        intensity: 6,
        title_prefix: "The Discovery",
        description: "New insights that illuminate the deeper truth of the story.",
        phrases: &["learned that", "discovered", "found out", "investigation revealed"],
    },
    PowerPattern {
        category: Category::Emotional,
        intensity: 8,
        title_prefix: "The Human Cost",
        description: "A deeply personal moment that shows the emotional reality.",
        phrases: &["felt", "emotional", "heartbreaking", "overwhelming"],
    },
];

/// Context kept before the matched entry.
const MOMENT_LEAD_MS: u64 = 2_000;
/// Context kept after the matched entry.
const MOMENT_TAIL_MS: u64 = 10_000;
/// Candidates whose starts are closer than this collapse into one.
const DEDUP_WINDOW_MS: u64 = 10_000;
/// At most this many moments survive.
const MAX_MOMENTS: usize = 8;
/// Characters of surrounding text used for quote extraction.
const CONTEXT_RADIUS: usize = 100;

struct MomentCandidate {
    start_ms: u64,
    end_ms: u64,
    title: String,
    description: &'static str,
    category: Category,
    intensity: u8,
    quote: String,
}

/// Scan the whole transcript for power phrases and build windowed segments
/// around the entries that contain them.
pub fn find_powerful_moments(entries: &[TranscriptEntry]) -> Vec<Segment> {
    let Some(last) = entries.last() else {
        return Vec::new();
    };
    let transcript_end_ms = last.end_ms;

    let full_text = entries
        .iter()
        .map(|e| e.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let lower = full_text.to_lowercase();

    let mut candidates: Vec<MomentCandidate> = Vec::new();

    for pattern in POWER_PATTERNS {
        for phrase in pattern.phrases {
            let Some(byte_idx) = lower.find(phrase) else {
                continue;
            };
            let word_offset = lower[..byte_idx].split_whitespace().count();
            let Some(entry) = entry_at_word_offset(entries, word_offset) else {
                continue;
            };

            let context = context_around(&full_text, byte_idx, CONTEXT_RADIUS);
            let quote = powerful_quote(context);
            let title_stub: String = quote.chars().take(30).collect();

            candidates.push(MomentCandidate {
                start_ms: entry.start_ms.saturating_sub(MOMENT_LEAD_MS),
                end_ms: (entry.end_ms + MOMENT_TAIL_MS).min(transcript_end_ms),
                title: format!("{}: \"{}...\"", pattern.title_prefix, title_stub),
                description: pattern.description,
                category: pattern.category,
                intensity: pattern.intensity,
                quote,
            });
        }
    }

    let mut unique = dedup_candidates(candidates);
    unique.sort_by(|a, b| b.intensity.cmp(&a.intensity));
    unique.truncate(MAX_MOMENTS);
    debug!(moments = unique.len(), "powerful-moment scan finished");

    unique
        .into_iter()
        .filter_map(|moment| {
            let related: Vec<&TranscriptEntry> = entries
                .iter()
                .filter(|e| e.start_ms >= moment.start_ms && e.end_ms <= moment.end_ms)
                .collect();
            if related.is_empty() {
                return None;
            }

            let content = related
                .iter()
                .map(|e| e.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            let speakers = classify::distinct_speakers(related.iter().map(|e| e.speaker.as_str()));

            Some(Segment {
                title: moment.title,
                description: moment.description.to_string(),
                start_ms: moment.start_ms,
                end_ms: moment.end_ms,
                category: moment.category,
                intensity: moment.intensity,
                key_quotes: vec![moment.quote],
                speakers,
                content,
                entry_count: related.len(),
                source: SegmentSource::PowerfulMoment,
            })
        })
        .collect()
}

/// Find the entry containing the word at `word_offset` across the joined
/// transcript text.
fn entry_at_word_offset(entries: &[TranscriptEntry], word_offset: usize) -> Option<&TranscriptEntry> {
    let mut cumulative = 0usize;
    for entry in entries {
        let count = entry.text.split_whitespace().count();
        if word_offset < cumulative + count {
            return Some(entry);
        }
        cumulative += count;
    }
    None
}

/// UTF-8-safe slice of up to `radius` bytes either side of `center`.
fn context_around(text: &str, center: usize, radius: usize) -> &str {
    let start = clamp_char_boundary(text, center.saturating_sub(radius));
    let end = clamp_char_boundary(text, center + radius);
    text[start..end].trim()
}

fn clamp_char_boundary(text: &str, mut idx: usize) -> usize {
    idx = idx.min(text.len());
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Longest complete sentence in the context window, or a truncated excerpt.
fn powerful_quote(context: &str) -> String {
    let longest = context
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.chars().count() > 10)
        .fold(None::<&str>, |best, s| match best {
            Some(b) if s.chars().count() > b.chars().count() => Some(s),
            Some(b) => Some(b),
            None => Some(s),
        });

    match longest {
        Some(sentence) => format!("{sentence}."),
        None => {
            let excerpt: String = context.chars().take(80).collect();
            format!("{excerpt}...")
        }
    }
}

/// First-found-wins dedup: a candidate is dropped when its start is within
/// 10 seconds of an accepted one or its window overlaps one.
fn dedup_candidates(candidates: Vec<MomentCandidate>) -> Vec<MomentCandidate> {
    let mut unique: Vec<MomentCandidate> = Vec::new();

    for candidate in candidates {
        let collides = unique.iter().any(|existing| {
            let start_delta = candidate.start_ms.abs_diff(existing.start_ms);
            start_delta < DEDUP_WINDOW_MS
                || (candidate.start_ms < existing.end_ms && candidate.end_ms > existing.start_ms)
        });
        if !collides {
            unique.push(candidate);
        }
    }

    unique
}

/// Partitioning fallback: 3 to 6 equal-duration segments with stock titles.
/// Partitions that contain no whole entry are skipped, so very short
/// transcripts can still come out empty.
pub fn smart_default_segments(entries: &[TranscriptEntry]) -> Vec<Segment> {
    let total_ms = entries.last().map(|e| e.end_ms).unwrap_or(60_000);
    let count = (entries.len() / 4).clamp(3, 6);
    let slot = total_ms as f64 / count as f64;
    debug!(count, "partitioning transcript into default segments");

    let mut segments = Vec::new();

    for i in 0..count {
        let start_ms = (i as f64 * slot).round() as u64;
        let end_ms = (((i + 1) as f64 * slot).min(total_ms as f64)).round() as u64;

        let related: Vec<&TranscriptEntry> = entries
            .iter()
            .filter(|e| e.start_ms >= start_ms && e.end_ms <= end_ms)
            .collect();
        if related.is_empty() {
            continue;
        }

        let content = related
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let first_sentence = content
            .split(['.', '!', '?'])
            .next()
            .unwrap_or("")
            .trim()
            .to_string();

        let category = if i == 0 {
            Category::Context
        } else if i == count - 1 {
            Category::Insight
        } else {
            Category::KeyMoment
        };

        segments.push(Segment {
            title: format!("Key Discussion {}", i + 1),
            description: "Important dialogue revealing crucial information and context.".to_string(),
            start_ms,
            end_ms,
            category,
            intensity: 6 + (i % 3) as u8,
            key_quotes: vec![format!("{first_sentence}.")],
            speakers: classify::distinct_speakers(related.iter().map(|e| e.speaker.as_str())),
            content,
            entry_count: related.len(),
            source: SegmentSource::SmartDefault,
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: usize, start: u64, end: u64, text: &str, speaker: &str) -> TranscriptEntry {
        TranscriptEntry {
            start_ms: start,
            end_ms: end,
            text: text.to_string(),
            speaker: speaker.to_string(),
            index,
        }
    }

    #[test]
    fn revelation_phrase_builds_a_windowed_moment() {
        let entries = vec![
            entry(0, 0, 4_000, "We sat down for the interview as usual that day.", "Anna"),
            entry(1, 4_000, 8_000, "I never told anyone about the letters before now.", "Anna"),
            entry(2, 8_000, 30_000, "They stayed in a drawer for twenty years untouched.", "Anna"),
        ];

        let segments = find_powerful_moments(&entries);
        assert_eq!(segments.len(), 1);
        let s = &segments[0];
        assert_eq!(s.category, Category::Revelation);
        assert_eq!(s.intensity, 9);
        assert_eq!(s.start_ms, 2_000); // entry start minus 2s lead
        assert_eq!(s.end_ms, 18_000); // entry end plus 10s tail
        assert!(s.title.starts_with("The Untold Truth: \""));
        assert_eq!(s.key_quotes.len(), 1);
        assert_eq!(s.source, SegmentSource::PowerfulMoment);
    }

    #[test]
    fn window_is_capped_at_the_transcript_end() {
        let entries = vec![entry(
            0,
            0,
            5_000,
            "It was the first time anybody had asked me directly.",
            "Anna",
        )];
        let segments = find_powerful_moments(&entries);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start_ms, 0);
        assert_eq!(segments[0].end_ms, 5_000);
    }

    #[test]
    fn nearby_candidates_are_deduplicated_first_found_wins() {
        // "secret" (revelation) and "difficult" (conflict) both live in the
        // same entry, so the second candidate's window overlaps the first.
        let entries = vec![
            entry(0, 0, 6_000, "Keeping that secret was difficult for all of us.", "Anna"),
            entry(1, 6_000, 40_000, "Later the town moved on and forgot about it.", "Anna"),
        ];

        let segments = find_powerful_moments(&entries);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].category, Category::Revelation);
    }

    #[test]
    fn moments_sort_by_intensity_and_cap_at_eight() {
        // Ten far-apart entries, each holding a distinct power phrase.
        let phrases = [
            "never told anyone",
            "first time",
            "turning point",
            "changed everything",
            "struggled with",
            "hardest part",
            "learned that",
            "found out",
            "felt",
            "heartbreaking",
        ];
        let entries: Vec<TranscriptEntry> = phrases
            .iter()
            .enumerate()
            .map(|(i, phrase)| {
                entry(
                    i,
                    i as u64 * 40_000,
                    i as u64 * 40_000 + 5_000,
                    &format!("In that chapter we {phrase} about the case."),
                    "Anna",
                )
            })
            .collect();

        let segments = find_powerful_moments(&entries);
        assert_eq!(segments.len(), MAX_MOMENTS);
        for pair in segments.windows(2) {
            assert!(pair[0].intensity >= pair[1].intensity);
        }
        assert_eq!(segments[0].intensity, 9);
    }

    #[test]
    fn smart_defaults_partition_into_three_or_more() {
        let entries: Vec<TranscriptEntry> = (0..8)
            .map(|i| {
                entry(
                    i,
                    i as u64 * 4_000,
                    i as u64 * 4_000 + 4_000,
                    &format!("Plain narration item {i} with no notable phrasing."),
                    "Narrator",
                )
            })
            .collect();

        let segments = smart_default_segments(&entries);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].category, Category::Context);
        assert_eq!(segments[1].category, Category::KeyMoment);
        assert_eq!(segments[2].category, Category::Insight);
        assert_eq!(segments[0].intensity, 6);
        assert_eq!(segments[1].intensity, 7);
        assert_eq!(segments[2].intensity, 8);
        assert!(segments[0].title.starts_with("Key Discussion"));
        assert_eq!(segments[0].source, SegmentSource::SmartDefault);
    }

    #[test]
    fn smart_defaults_skip_partitions_without_whole_entries() {
        // A single long entry fits no third of the timeline.
        let entries = vec![entry(0, 0, 30_000, "One long unbroken narration block here.", "Anna")];
        assert!(smart_default_segments(&entries).is_empty());
    }
}
