//! Cut-timing and overlay derivation: breath pauses, sentence boundaries,
//! speaker changes, timed text overlays, emotional beats and fades.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::transcript::TranscriptEntry;

use super::{Category, Segment};

/// Lead-in kept before speech starts.
pub const PRE_ROLL_MS: u64 = 500;
/// Tail kept after speech ends.
pub const POST_ROLL_MS: u64 = 300;
/// Slight delay into the segment for a natural-feeling first frame.
const OPTIMAL_CUT_DELAY_MS: u64 = 200;

/// Inter-entry gaps inside this band read as breaths rather than silences.
const BREATH_MIN_MS: u64 = 200;
const BREATH_MAX_MS: u64 = 2_000;
/// Above this a breath pause is a top-quality cut point.
const BREATH_EXCELLENT_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutQuality {
    Excellent,
    Good,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathPause {
    pub start_ms: u64,
    pub end_ms: u64,
    pub duration_ms: u64,
    pub quality: CutQuality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceBoundary {
    pub timestamp_ms: u64,
    pub punctuation: String,
    pub quality: CutQuality,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerChange {
    pub timestamp_ms: u64,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutTiming {
    pub pre_roll_ms: u64,
    pub post_roll_ms: u64,
    pub optimal_cut_frame_ms: u64,
    pub breath_pauses: Vec<BreathPause>,
    pub sentence_boundaries: Vec<SentenceBoundary>,
    pub speaker_changes: Vec<SpeakerChange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayKind {
    Title,
    Quote,
    Speaker,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextOverlay {
    #[serde(rename = "type")]
    pub kind: OverlayKind,
    pub text: String,
    pub start_ms: u64,
    pub duration_ms: u64,
    pub style: String,
    pub animation: String,
    pub position: String,
    pub font_size: String,
    pub color: String,
    pub background_color: String,
    /// Milliseconds per character for typewriter animations.
    pub typewriter_speed_ms: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionalBeat {
    pub timestamp_ms: u64,
    pub intensity: f64,
    pub emotion: String,
    pub visual_cue: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionSpec {
    #[serde(rename = "type")]
    pub kind: String,
    pub duration_ms: u64,
    pub curve: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MidpointTransition {
    #[serde(rename = "type")]
    pub kind: String,
    pub timestamp_ms: u64,
    pub effect: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transitions {
    pub intro: TransitionSpec,
    pub midpoint: Option<MidpointTransition>,
    pub outro: TransitionSpec,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoEditing {
    pub fade_in_ms: u64,
    pub fade_out_ms: u64,
    pub natural_cut_points: Vec<u64>,
    pub emotional_beats: Vec<EmotionalBeat>,
    pub transitions: Transitions,
}

/// Compute cutting metadata for a segment from the entries it covers.
pub fn derive_cut_timing(segment: &Segment, transcript: &[TranscriptEntry]) -> CutTiming {
    let entries: Vec<&TranscriptEntry> = transcript
        .iter()
        .filter(|e| e.start_ms >= segment.start_ms && e.end_ms <= segment.end_ms)
        .collect();

    CutTiming {
        pre_roll_ms: PRE_ROLL_MS,
        post_roll_ms: POST_ROLL_MS,
        optimal_cut_frame_ms: segment.start_ms + OPTIMAL_CUT_DELAY_MS,
        breath_pauses: find_breath_pauses(&entries),
        sentence_boundaries: find_sentence_boundaries(&entries),
        speaker_changes: find_speaker_changes(&entries),
    }
}

/// Inter-entry gaps between 200ms and 2s are usable breath pauses.
fn find_breath_pauses(entries: &[&TranscriptEntry]) -> Vec<BreathPause> {
    entries
        .windows(2)
        .filter_map(|pair| {
            let gap = pair[1].start_ms.saturating_sub(pair[0].end_ms);
            if gap > BREATH_MIN_MS && gap < BREATH_MAX_MS {
                Some(BreathPause {
                    start_ms: pair[0].end_ms,
                    end_ms: pair[1].start_ms,
                    duration_ms: gap,
                    quality: if gap > BREATH_EXCELLENT_MS {
                        CutQuality::Excellent
                    } else {
                        CutQuality::Good
                    },
                })
            } else {
                None
            }
        })
        .collect()
}

static SENTENCE_ENDERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());

/// Estimate a sub-entry timestamp for every sentence-ending punctuation run
/// by mapping its character offset proportionally onto the entry's span.
fn find_sentence_boundaries(entries: &[&TranscriptEntry]) -> Vec<SentenceBoundary> {
    let mut boundaries = Vec::new();

    for entry in entries {
        let span = entry.end_ms.saturating_sub(entry.start_ms) as f64;
        let len = entry.text.len().max(1) as f64;

        for m in SENTENCE_ENDERS.find_iter(&entry.text) {
            let relative = (m.start() as f64 / len) * span;
            boundaries.push(SentenceBoundary {
                timestamp_ms: entry.start_ms + relative.round() as u64,
                punctuation: m.as_str().to_string(),
                quality: CutQuality::Excellent,
            });
        }
    }

    boundaries
}

fn find_speaker_changes(entries: &[&TranscriptEntry]) -> Vec<SpeakerChange> {
    entries
        .windows(2)
        .filter(|pair| pair[0].speaker != pair[1].speaker)
        .map(|pair| SpeakerChange {
            timestamp_ms: pair[1].start_ms,
            from: pair[0].speaker.clone(),
            to: pair[1].speaker.clone(),
        })
        .collect()
}

const TITLE_OVERLAY_DELAY_MS: u64 = 1_000;
const TITLE_OVERLAY_DURATION_MS: u64 = 3_000;
const QUOTE_OVERLAY_DURATION_MS: u64 = 4_000;
const SPEAKER_OVERLAY_DELAY_MS: u64 = 500;
const SPEAKER_OVERLAY_DURATION_MS: u64 = 2_000;

/// Documentary-style timed overlays: a typewriter title shortly after the
/// cut, the leading key quote at the midpoint, and a speaker ident near the
/// start.
pub fn generate_text_overlays(segment: &Segment) -> Vec<TextOverlay> {
    let mut overlays = vec![TextOverlay {
        kind: OverlayKind::Title,
        text: segment.title.clone(),
        start_ms: segment.start_ms + TITLE_OVERLAY_DELAY_MS,
        duration_ms: TITLE_OVERLAY_DURATION_MS,
        style: "bbc-title".to_string(),
        animation: "typewriter".to_string(),
        position: "lower-third".to_string(),
        font_size: "2.5rem".to_string(),
        color: "#ffffff".to_string(),
        background_color: "rgba(0,0,0,0.8)".to_string(),
        typewriter_speed_ms: Some(50),
    }];

    if let Some(quote) = segment.key_quotes.first() {
        let midpoint = segment.start_ms + (segment.end_ms - segment.start_ms) / 2;
        overlays.push(TextOverlay {
            kind: OverlayKind::Quote,
            text: format!("\"{quote}\""),
            start_ms: midpoint,
            duration_ms: QUOTE_OVERLAY_DURATION_MS,
            style: "bbc-quote".to_string(),
            animation: "fade-typewriter".to_string(),
            position: "center".to_string(),
            font_size: "1.8rem".to_string(),
            color: "#f8f8f8".to_string(),
            background_color: "rgba(0,0,0,0.6)".to_string(),
            typewriter_speed_ms: Some(30),
        });
    }

    if let Some(speaker) = segment.speakers.first() {
        overlays.push(TextOverlay {
            kind: OverlayKind::Speaker,
            text: speaker.clone(),
            start_ms: segment.start_ms + SPEAKER_OVERLAY_DELAY_MS,
            duration_ms: SPEAKER_OVERLAY_DURATION_MS,
            style: "bbc-speaker".to_string(),
            animation: "slide-in".to_string(),
            position: "lower-left".to_string(),
            font_size: "1.2rem".to_string(),
            color: "#ffffff".to_string(),
            background_color: "rgba(40,40,40,0.9)".to_string(),
            typewriter_speed_ms: None,
        });
    }

    overlays
}

/// Relative positions sampled for emotional beats.
const BEAT_POINTS: [f64; 3] = [0.25, 0.5, 0.75];

/// Fade timing: high-intensity segments cut in fast, emotional segments
/// linger on the way out.
const FADE_IN_FAST_MS: u64 = 500;
const FADE_IN_SLOW_MS: u64 = 1_000;
const FADE_OUT_EMOTIONAL_MS: u64 = 1_500;
const FADE_OUT_DEFAULT_MS: u64 = 800;
const HIGH_INTENSITY: u8 = 7;

/// Derive per-segment editing metadata. The beat intensities carry a small
/// random jitter from the injected RNG; everything else is deterministic.
pub fn derive_video_editing(
    segment: &Segment,
    cut_timing: &CutTiming,
    rng: &mut StdRng,
) -> VideoEditing {
    VideoEditing {
        fade_in_ms: if segment.intensity > HIGH_INTENSITY {
            FADE_IN_FAST_MS
        } else {
            FADE_IN_SLOW_MS
        },
        fade_out_ms: if segment.category == Category::Emotional {
            FADE_OUT_EMOTIONAL_MS
        } else {
            FADE_OUT_DEFAULT_MS
        },
        natural_cut_points: natural_cut_points(cut_timing),
        emotional_beats: map_emotional_beats(segment, rng),
        transitions: suggest_transitions(segment),
    }
}

/// Clean cut candidates inside the segment: breath-pause starts plus
/// estimated sentence boundaries, sorted and deduplicated.
fn natural_cut_points(cut_timing: &CutTiming) -> Vec<u64> {
    let mut points: Vec<u64> = cut_timing
        .breath_pauses
        .iter()
        .map(|p| p.start_ms)
        .chain(cut_timing.sentence_boundaries.iter().map(|b| b.timestamp_ms))
        .collect();
    points.sort_unstable();
    points.dedup();
    points
}

/// Three beats at the quarter points, each with intensity jitter in [-1, 1).
fn map_emotional_beats(segment: &Segment, rng: &mut StdRng) -> Vec<EmotionalBeat> {
    let duration = (segment.end_ms - segment.start_ms) as f64;

    BEAT_POINTS
        .iter()
        .map(|&point| EmotionalBeat {
            timestamp_ms: segment.start_ms + (duration * point).round() as u64,
            intensity: segment.intensity as f64 + rng.gen_range(-1.0..1.0),
            emotion: emotion_for(segment.category).to_string(),
            visual_cue: visual_cue_for(segment.category, point).to_string(),
        })
        .collect()
}

fn emotion_for(category: Category) -> &'static str {
    match category {
        Category::Emotional => "contemplative",
        Category::Revelation => "surprising",
        Category::Conflict => "tense",
        Category::KeyMoment => "significant",
        Category::Insight => "thoughtful",
        Category::Context => "neutral",
    }
}

fn visual_cue_for(category: Category, point: f64) -> &'static str {
    let cues: &[&'static str] = match category {
        Category::Emotional => &["close-up", "soft-lighting", "slight-zoom"],
        Category::Revelation => &["slow-zoom", "reveal-shot", "lighting-change"],
        Category::Conflict => &["cross-cutting", "tension-hold", "shadow-play"],
        _ => &["standard-shot"],
    };

    let index = ((point * cues.len() as f64) as usize).min(cues.len() - 1);
    cues[index]
}

const INTRO_FADE_MS: u64 = 1_000;
const OUTRO_FADE_MS: u64 = 800;
/// Emotional segments get a slow push-in at 40% of the duration.
const EMOTIONAL_MIDPOINT_FRACTION: f64 = 0.4;

fn suggest_transitions(segment: &Segment) -> Transitions {
    let duration = (segment.end_ms - segment.start_ms) as f64;

    let midpoint = (segment.category == Category::Emotional).then(|| MidpointTransition {
        kind: "slow-zoom".to_string(),
        timestamp_ms: segment.start_ms + (duration * EMOTIONAL_MIDPOINT_FRACTION).round() as u64,
        effect: "emotional-close-up".to_string(),
    });

    Transitions {
        intro: TransitionSpec {
            kind: "fade-in".to_string(),
            duration_ms: INTRO_FADE_MS,
            curve: "ease-in".to_string(),
        },
        midpoint,
        outro: TransitionSpec {
            kind: if segment.intensity > HIGH_INTENSITY {
                "dramatic-fade".to_string()
            } else {
                "soft-fade".to_string()
            },
            duration_ms: OUTRO_FADE_MS,
            curve: "ease-out".to_string(),
        },
    }
}
