//! Transcript analysis pipeline: segmentation, classification and
//! enrichment with cutting metadata.
//!
//! The pipeline is a one-way flow over an in-memory transcript. Every stage
//! is pure; the only permitted non-determinism is the emotional-beat jitter,
//! which comes from an injected seedable RNG.

pub mod classify;
pub mod cutting;
pub mod moments;
pub mod segmenter;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{DocuclipError, Result};
use crate::timecode;
use crate::transcript::{self, TranscriptEntry, TranscriptInput};

pub use cutting::{
    BreathPause, CutQuality, CutTiming, EmotionalBeat, MidpointTransition, OverlayKind,
    SentenceBoundary, SpeakerChange, TextOverlay, TransitionSpec, Transitions, VideoEditing,
};

/// Narrative category assigned to a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    KeyMoment,
    Revelation,
    Conflict,
    Insight,
    Emotional,
    Context,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::KeyMoment => "key_moment",
            Category::Revelation => "revelation",
            Category::Conflict => "conflict",
            Category::Insight => "insight",
            Category::Emotional => "emotional",
            Category::Context => "context",
        }
    }
}

/// Which stage produced a segment. Drives the enriched segment's id prefix
/// so a reader of the output can tell the primary path from the fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentSource {
    Heuristic,
    PowerfulMoment,
    SmartDefault,
}

impl SegmentSource {
    fn id_prefix(&self) -> &'static str {
        match self {
            SegmentSource::Heuristic => "segment",
            SegmentSource::PowerfulMoment => "powerful",
            SegmentSource::SmartDefault => "smart",
        }
    }
}

/// A classified segment before enrichment.
#[derive(Debug, Clone)]
pub struct Segment {
    pub title: String,
    pub description: String,
    pub start_ms: u64,
    pub end_ms: u64,
    pub category: Category,
    pub intensity: u8,
    pub key_quotes: Vec<String>,
    pub speakers: Vec<String>,
    pub content: String,
    pub entry_count: usize,
    pub source: SegmentSource,
}

/// Options for one analysis run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Free-form editorial direction. Forwarded to the optional AI
    /// enrichment collaborator; the heuristic result ignores it.
    pub custom_direction: Option<String>,
    /// Seed for the emotional-beat jitter. `None` draws from entropy.
    pub jitter_seed: Option<u64>,
}

/// A fully enriched documentary segment, ready for export or display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedSegment {
    pub id: String,
    pub title: String,
    pub description: String,
    pub start_ms: u64,
    pub end_ms: u64,
    pub display_start: String,
    pub display_end: String,
    pub category: Category,
    pub intensity: u8,
    pub speakers: Vec<String>,
    pub key_quotes: Vec<String>,
    pub content: String,
    pub entry_count: usize,
    pub duration_s: u64,
    pub word_count: usize,
    pub cut_timing: CutTiming,
    pub text_overlays: Vec<TextOverlay>,
    pub video_editing: VideoEditing,
}

/// Analyze a transcript into enriched documentary segments.
///
/// The only fatal condition is a transcript that normalizes to nothing.
/// Everything else degrades: when the primary segmenter finds no usable
/// groups, the powerful-moment scan runs, and when that also comes up empty
/// the transcript is partitioned into equal default segments.
pub fn analyze(
    input: &TranscriptInput,
    options: &AnalysisOptions,
) -> Result<Vec<EnrichedSegment>> {
    analyze_entries(transcript::normalize(input), options)
}

/// [`analyze`] for callers that already hold normalized entries, such as a
/// host that applied fixed word-rate timing to untimed prose.
pub fn analyze_entries(
    entries: Vec<TranscriptEntry>,
    options: &AnalysisOptions,
) -> Result<Vec<EnrichedSegment>> {
    if entries.is_empty() {
        return Err(DocuclipError::EmptyTranscript);
    }
    info!(entries = entries.len(), "analyzing transcript");

    let mut segments = segmenter::extract_segments(&entries);
    if segments.is_empty() {
        debug!("segmenter produced nothing, scanning for powerful moments");
        segments = moments::find_powerful_moments(&entries);
    }
    if segments.is_empty() {
        debug!("no powerful moments found, partitioning into default segments");
        segments = moments::smart_default_segments(&entries);
    }

    let mut rng = match options.jitter_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let enriched = enrich_segments(&segments, &entries, &mut rng);
    info!(segments = enriched.len(), "analysis complete");
    Ok(enriched)
}

/// Attach timing, overlay and editing metadata to classified segments.
pub fn enrich_segments(
    segments: &[Segment],
    entries: &[TranscriptEntry],
    rng: &mut StdRng,
) -> Vec<EnrichedSegment> {
    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let cut_timing = cutting::derive_cut_timing(segment, entries);
            let text_overlays = cutting::generate_text_overlays(segment);
            let video_editing = cutting::derive_video_editing(segment, &cut_timing, rng);

            EnrichedSegment {
                id: format!("{}_{}", segment.source.id_prefix(), i + 1),
                title: segment.title.clone(),
                description: segment.description.clone(),
                start_ms: segment.start_ms,
                end_ms: segment.end_ms,
                display_start: timecode::ms_to_display(segment.start_ms),
                display_end: timecode::ms_to_display(segment.end_ms),
                category: segment.category,
                intensity: segment.intensity,
                speakers: segment.speakers.clone(),
                key_quotes: segment.key_quotes.clone(),
                content: segment.content.clone(),
                entry_count: segment.entry_count,
                duration_s: ((segment.end_ms - segment.start_ms) as f64 / 1000.0).round() as u64,
                word_count: segment.content.split_whitespace().count(),
                cut_timing,
                text_overlays,
                video_editing,
            }
        })
        .collect()
}
