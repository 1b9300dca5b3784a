//! Transcript normalization: turns heterogeneous input (structured entries,
//! SRT text, plain text) into one canonical ordered entry sequence.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::timecode::{self, WORDS_PER_CHUNK};

pub const DEFAULT_SPEAKER: &str = "Speaker";

/// Minimum estimated duration for a plain-text line, in milliseconds.
const MIN_LINE_DURATION_MS: u64 = 2_000;
/// Estimated speaking time per word for plain-text lines.
const MS_PER_WORD: u64 = 300;
/// Silence inserted between consecutive plain-text lines.
const LINE_GAP_MS: u64 = 500;
/// Plain-text lines at or below this length are treated as noise.
const MIN_LINE_CHARS: usize = 10;

/// One canonical transcript entry. Produced by [`normalize`], immutable
/// afterwards; downstream stages assume ascending `start_ms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
    pub speaker: String,
    pub index: usize,
}

/// A time value as found in structured source data: already in
/// milliseconds, an `HH:MM:SS[,.]mmm` string, or a bare integer string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    Millis(f64),
    Text(String),
}

impl TimeValue {
    fn to_ms(&self) -> u64 {
        match self {
            TimeValue::Millis(n) => n.max(0.0).round() as u64,
            TimeValue::Text(s) => {
                if s.contains(':') {
                    timecode::srt_time_to_ms(s)
                } else {
                    s.trim().parse::<u64>().unwrap_or(0)
                }
            }
        }
    }
}

/// A structured source entry before normalization. Field names cover the
/// shapes produced by the supported capture tools, so every field is
/// optional and has a documented fallback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEntry {
    #[serde(default)]
    pub start: Option<TimeValue>,
    #[serde(default, rename = "startTime")]
    pub start_time: Option<TimeValue>,
    #[serde(default)]
    pub end: Option<TimeValue>,
    #[serde(default, rename = "endTime")]
    pub end_time: Option<TimeValue>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub speaker: Option<String>,
    #[serde(default)]
    pub participant: Option<String>,
}

/// Transcript input, resolved once at the normalizer boundary.
#[derive(Debug, Clone)]
pub enum TranscriptInput {
    Structured(Vec<RawEntry>),
    SrtText(String),
    PlainText(String),
}

impl TranscriptInput {
    /// Classify raw text: the `-->` arrow marks SRT/VTT-style cue timing.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.contains("-->") {
            TranscriptInput::SrtText(text)
        } else {
            TranscriptInput::PlainText(text)
        }
    }
}

/// Normalize any supported input into ordered transcript entries.
pub fn normalize(input: &TranscriptInput) -> Vec<TranscriptEntry> {
    match input {
        TranscriptInput::Structured(entries) => normalize_structured(entries),
        TranscriptInput::SrtText(text) => parse_srt(text),
        TranscriptInput::PlainText(text) => parse_plain_text(text),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn normalize_structured(entries: &[RawEntry]) -> Vec<TranscriptEntry> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            let text = raw
                .text
                .as_deref()
                .or(raw.content.as_deref())
                .unwrap_or("")
                .trim()
                .to_string();
            if text.is_empty() {
                return None;
            }

            let start_ms = raw
                .start
                .as_ref()
                .or(raw.start_time.as_ref())
                .map(TimeValue::to_ms)
                .unwrap_or(index as u64 * 5_000);
            let end_ms = raw
                .end
                .as_ref()
                .or(raw.end_time.as_ref())
                .map(TimeValue::to_ms)
                .unwrap_or(index as u64 * 5_000 + 4_000);
            let speaker = non_empty(&raw.speaker)
                .or(non_empty(&raw.participant))
                .unwrap_or(DEFAULT_SPEAKER)
                .to_string();

            Some(TranscriptEntry {
                start_ms,
                end_ms,
                text,
                speaker,
                index,
            })
        })
        .collect()
}

static SRT_BLOCK_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

fn parse_srt(text: &str) -> Vec<TranscriptEntry> {
    let mut entries = Vec::new();

    for block in SRT_BLOCK_SPLIT.split(text) {
        let lines: Vec<&str> = block.trim().lines().map(str::trim).collect();
        // A well-formed cue is counter, time range, then at least one text line.
        if lines.len() < 3 {
            continue;
        }

        let time_line = lines[1];
        let Some((start_str, end_str)) = time_line.split_once("-->") else {
            continue;
        };

        let joined = lines[2..].join(" ");
        let speaker = detect_speaker(&joined)
            .unwrap_or_else(|| DEFAULT_SPEAKER.to_string());

        entries.push(TranscriptEntry {
            start_ms: timecode::srt_time_to_ms(start_str),
            end_ms: timecode::srt_time_to_ms(end_str),
            text: joined,
            speaker,
            index: entries.len(),
        });
    }

    entries
}

fn parse_plain_text(text: &str) -> Vec<TranscriptEntry> {
    let mut entries = Vec::new();
    let mut clock_ms: u64 = 0;

    for (index, line) in text.lines().filter(|l| !l.trim().is_empty()).enumerate() {
        let line = line.trim();
        if line.chars().count() <= MIN_LINE_CHARS {
            continue;
        }

        let words = line.split_whitespace().count() as u64;
        let duration = (words * MS_PER_WORD).max(MIN_LINE_DURATION_MS);
        let speaker = detect_speaker(line)
            .unwrap_or_else(|| DEFAULT_SPEAKER.to_string());

        entries.push(TranscriptEntry {
            start_ms: clock_ms,
            end_ms: clock_ms + duration,
            text: line.to_string(),
            speaker,
            index,
        });

        clock_ms += duration + LINE_GAP_MS;
    }

    entries
}

/// Fixed-rate estimation for untimed prose: every 20 words become one entry
/// at 2.5 words/second. Used by hosts that have a wall of text rather than
/// line-structured notes.
pub fn word_rate_entries(text: &str) -> Vec<TranscriptEntry> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words
        .chunks(WORDS_PER_CHUNK)
        .enumerate()
        .map(|(index, chunk)| {
            let (start_ms, end_ms) = timecode::word_window_ms(index * WORDS_PER_CHUNK, chunk.len());
            TranscriptEntry {
                start_ms,
                end_ms,
                text: chunk.join(" "),
                speaker: DEFAULT_SPEAKER.to_string(),
                index,
            }
        })
        .collect()
}

static SPEAKER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\[([A-Z][a-z]+)\]:?|([A-Z][a-z]+):)\s*").unwrap());

/// Detect a leading speaker label such as `John:` or `[John]`. A bare
/// capitalized word is not enough; the colon or brackets keep ordinary
/// sentence openers from being read as names.
pub fn detect_speaker(text: &str) -> Option<String> {
    let caps = SPEAKER_PATTERN.captures(text)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}
