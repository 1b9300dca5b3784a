//! Export document for downstream algorithmic video-cutting consumers.
//!
//! The document shape is the interchange contract of the system: section
//! names and field layout are stable, and the fixed policy strings (cutting
//! algorithm, quality requirements) are matched verbatim by consumers.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::analysis::{
    BreathPause, Category, CutTiming, EmotionalBeat, EnrichedSegment, OverlayKind, Transitions,
};
use crate::error::Result;

pub const EXPORT_VERSION: &str = "2.0";
const PROCESSING_TYPE: &str = "bbc_documentary_algorithmic";
const CUTTING_ALGORITHM: &str = "bbc_documentary_precision";

/// Host-supplied description of the source video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMeta {
    pub title: String,
    pub format: String,
    pub frame_rate: u32,
    pub resolution: String,
}

impl Default for VideoMeta {
    fn default() -> Self {
        Self {
            title: "Documentary Project".to_string(),
            format: "mp4".to_string(),
            frame_rate: 25,
            resolution: "1920x1080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingDocument {
    pub metadata: Metadata,
    pub video_processing: VideoProcessing,
    pub segments: Vec<SegmentExport>,
    pub text_overlays: TextOverlays,
    pub transitions: TransitionBlock,
    pub audio_processing: AudioProcessing,
    pub export_info: ExportInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub project: ProjectMeta,
    pub technical: TechnicalMeta,
    pub analytics: Analytics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMeta {
    pub title: String,
    pub description: String,
    pub genre: String,
    pub style: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalMeta {
    pub total_duration_ms: u64,
    pub segment_count: usize,
    pub categories: Vec<Category>,
    pub speakers: Vec<String>,
    pub video_format: String,
    pub frame_rate: u32,
    pub resolution: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analytics {
    pub avg_segment_duration_ms: f64,
    pub high_intensity_segments: usize,
    pub emotional_segments: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoProcessing {
    pub cutting_algorithm: String,
    pub processing_rules: ProcessingRules,
    pub global_settings: GlobalCutSettings,
    pub quality_requirements: QualityRequirements,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingRules {
    pub respect_speech_pauses: bool,
    pub avoid_mid_word_cuts: bool,
    pub maintain_speaker_continuity: bool,
    pub apply_natural_transitions: bool,
    pub preserve_emotional_timing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalCutSettings {
    pub default_fade_in_ms: u64,
    pub default_fade_out_ms: u64,
    pub cross_fade_duration_ms: u64,
    pub silence_threshold_ms: u64,
    pub minimum_segment_duration_ms: u64,
    pub maximum_segment_duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityRequirements {
    pub cut_precision: String,
    pub audio_sync: String,
    pub overlay_sync: String,
    pub transition_smoothness: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentExport {
    pub segment_id: String,
    pub title: String,
    pub description: String,
    pub timing: TimingExport,
    pub content: ContentExport,
    pub cutting_instructions: CutTiming,
    pub video_editing: VideoEditingExport,
    pub processing_priority: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingExport {
    pub start_ms: u64,
    pub end_ms: u64,
    pub duration_ms: u64,
    pub display_start: String,
    pub display_end: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentExport {
    pub category: Category,
    pub intensity: u8,
    pub speakers: Vec<String>,
    pub key_quotes: Vec<String>,
    pub word_count: usize,
    pub transcript_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoEditingExport {
    pub fade_in_ms: u64,
    pub fade_out_ms: u64,
    pub natural_cut_points: Vec<u64>,
    pub speech_pauses: Vec<BreathPause>,
    pub emotional_beats: Vec<EmotionalBeat>,
    pub cinematic_transitions: Transitions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextOverlays {
    pub total_overlays: usize,
    pub overlay_data: Vec<OverlayExport>,
    pub global_overlay_settings: GlobalOverlaySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayExport {
    pub overlay_id: String,
    pub segment_id: String,
    pub start_time_ms: u64,
    pub duration_ms: u64,
    pub end_time_ms: u64,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: OverlayKind,
    pub style: OverlayStyleExport,
    pub animation: OverlayAnimationExport,
    pub rendering: OverlayRenderingExport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayStyleExport {
    pub font_family: String,
    pub font_size: String,
    pub color: String,
    pub background_color: String,
    pub position: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayAnimationExport {
    #[serde(rename = "type")]
    pub kind: String,
    pub typewriter_speed_ms: u32,
    pub fade_duration_ms: u64,
    pub timing_curve: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayRenderingExport {
    pub z_index: u32,
    pub alpha_blend: bool,
    pub anti_alias: bool,
    pub render_quality: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalOverlaySettings {
    pub default_font: String,
    pub text_shadow: String,
    pub backdrop_filter: String,
    pub responsive_scaling: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionBlock {
    pub total_transitions: usize,
    pub transition_data: Vec<TransitionExport>,
    pub global_transition_settings: GlobalTransitionSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionExport {
    pub transition_id: String,
    pub from_segment: String,
    pub to_segment: String,
    pub start_time_ms: u64,
    pub duration_ms: u64,
    pub end_time_ms: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub effects: TransitionEffects,
    pub audio: TransitionAudio,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionEffects {
    pub fade_type: String,
    pub zoom_effect: bool,
    pub color_grading: String,
    pub motion_blur: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionAudio {
    pub cross_fade_duration_ms: u64,
    pub volume_curve: String,
    pub apply_ducking: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalTransitionSettings {
    pub default_duration_ms: u64,
    pub blend_mode: String,
    pub motion_blur_amount: u32,
    pub color_space: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioProcessing {
    pub global_audio: GlobalAudio,
    pub segment_audio: Vec<SegmentAudio>,
    pub music_scoring: MusicScoring,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalAudio {
    pub normalize_levels: bool,
    pub noise_reduction: String,
    pub dynamic_range_compression: String,
    pub eq_preset: String,
    pub limiter_threshold_db: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentAudio {
    pub segment_id: String,
    pub processing: SegmentAudioSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentAudioSettings {
    pub gain_adjustment: f64,
    pub high_pass_filter_hz: u32,
    pub presence_boost_db: u32,
    pub de_essing: bool,
    pub noise_gate_threshold_db: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicScoring {
    pub apply_background_music: bool,
    pub duck_for_speech: bool,
    pub emotional_stings: Vec<EmotionalSting>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionalSting {
    pub timestamp_ms: u64,
    pub intensity: u8,
    pub category: Category,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportInfo {
    pub version: String,
    pub export_timestamp: String,
    pub total_segments: usize,
    pub processing_type: String,
}

/// Build the full processing document for a segment list.
pub fn processing_document(segments: &[EnrichedSegment], video_meta: &VideoMeta) -> ProcessingDocument {
    ProcessingDocument {
        metadata: build_metadata(segments, video_meta),
        video_processing: video_processing_policy(),
        segments: segments.iter().map(export_segment).collect(),
        text_overlays: export_overlays(segments),
        transitions: export_transitions(segments),
        audio_processing: export_audio(segments),
        export_info: ExportInfo {
            version: EXPORT_VERSION.to_string(),
            export_timestamp: Utc::now().to_rfc3339(),
            total_segments: segments.len(),
            processing_type: PROCESSING_TYPE.to_string(),
        },
    }
}

fn build_metadata(segments: &[EnrichedSegment], video_meta: &VideoMeta) -> Metadata {
    let total_duration_ms = segments.iter().map(|s| s.end_ms).max().unwrap_or(0);

    let mut categories: Vec<Category> = Vec::new();
    for s in segments {
        if !categories.contains(&s.category) {
            categories.push(s.category);
        }
    }
    let mut speakers: Vec<String> = Vec::new();
    for s in segments {
        for speaker in &s.speakers {
            if !speakers.contains(speaker) {
                speakers.push(speaker.clone());
            }
        }
    }

    let avg_segment_duration_ms = if segments.is_empty() {
        0.0
    } else {
        segments
            .iter()
            .map(|s| (s.end_ms - s.start_ms) as f64)
            .sum::<f64>()
            / segments.len() as f64
    };

    Metadata {
        project: ProjectMeta {
            title: video_meta.title.clone(),
            description: "Algorithmically processed documentary with precise cuts".to_string(),
            genre: "documentary".to_string(),
            style: "bbc_professional".to_string(),
        },
        technical: TechnicalMeta {
            total_duration_ms,
            segment_count: segments.len(),
            categories,
            speakers,
            video_format: video_meta.format.clone(),
            frame_rate: video_meta.frame_rate,
            resolution: video_meta.resolution.clone(),
        },
        analytics: Analytics {
            avg_segment_duration_ms,
            high_intensity_segments: segments.iter().filter(|s| s.intensity > 7).count(),
            emotional_segments: segments
                .iter()
                .filter(|s| s.category == Category::Emotional)
                .count(),
        },
    }
}

/// Fixed global cutting policy. Consumers rely on these exact values.
fn video_processing_policy() -> VideoProcessing {
    VideoProcessing {
        cutting_algorithm: CUTTING_ALGORITHM.to_string(),
        processing_rules: ProcessingRules {
            respect_speech_pauses: true,
            avoid_mid_word_cuts: true,
            maintain_speaker_continuity: true,
            apply_natural_transitions: true,
            preserve_emotional_timing: true,
        },
        global_settings: GlobalCutSettings {
            default_fade_in_ms: 500,
            default_fade_out_ms: 300,
            cross_fade_duration_ms: 250,
            silence_threshold_ms: 200,
            minimum_segment_duration_ms: 2_000,
            maximum_segment_duration_ms: 180_000,
        },
        quality_requirements: QualityRequirements {
            cut_precision: "frame_perfect".to_string(),
            audio_sync: "mandatory".to_string(),
            overlay_sync: "precise".to_string(),
            transition_smoothness: "professional".to_string(),
        },
    }
}

fn export_segment(segment: &EnrichedSegment) -> SegmentExport {
    SegmentExport {
        segment_id: segment.id.clone(),
        title: segment.title.clone(),
        description: segment.description.clone(),
        timing: TimingExport {
            start_ms: segment.start_ms,
            end_ms: segment.end_ms,
            duration_ms: segment.end_ms - segment.start_ms,
            display_start: segment.display_start.clone(),
            display_end: segment.display_end.clone(),
        },
        content: ContentExport {
            category: segment.category,
            intensity: segment.intensity,
            speakers: segment.speakers.clone(),
            key_quotes: segment.key_quotes.clone(),
            word_count: segment.word_count,
            transcript_entries: segment.entry_count,
        },
        cutting_instructions: segment.cut_timing.clone(),
        video_editing: VideoEditingExport {
            fade_in_ms: segment.video_editing.fade_in_ms,
            fade_out_ms: segment.video_editing.fade_out_ms,
            natural_cut_points: segment.video_editing.natural_cut_points.clone(),
            speech_pauses: segment.cut_timing.breath_pauses.clone(),
            emotional_beats: segment.video_editing.emotional_beats.clone(),
            cinematic_transitions: segment.video_editing.transitions.clone(),
        },
        processing_priority: processing_priority(segment),
    }
}

fn processing_priority(segment: &EnrichedSegment) -> u8 {
    let mut priority = 5u8;
    if segment.intensity > 8 {
        priority += 2;
    }
    if segment.category == Category::Emotional {
        priority += 1;
    }
    if segment.speakers.len() > 1 {
        priority += 1;
    }
    priority.min(10)
}

fn export_overlays(segments: &[EnrichedSegment]) -> TextOverlays {
    let mut overlay_data = Vec::new();

    for (segment_index, segment) in segments.iter().enumerate() {
        for (overlay_index, overlay) in segment.text_overlays.iter().enumerate() {
            overlay_data.push(OverlayExport {
                overlay_id: format!("overlay_{segment_index}_{overlay_index}"),
                segment_id: segment.id.clone(),
                start_time_ms: overlay.start_ms,
                duration_ms: overlay.duration_ms,
                end_time_ms: overlay.start_ms + overlay.duration_ms,
                text: overlay.text.clone(),
                kind: overlay.kind,
                style: OverlayStyleExport {
                    font_family: font_family_for(&overlay.style).to_string(),
                    font_size: overlay.font_size.clone(),
                    color: overlay.color.clone(),
                    background_color: overlay.background_color.clone(),
                    position: overlay.position.clone(),
                },
                animation: OverlayAnimationExport {
                    kind: overlay.animation.clone(),
                    typewriter_speed_ms: overlay.typewriter_speed_ms.unwrap_or(50),
                    fade_duration_ms: 500,
                    timing_curve: "ease-in-out".to_string(),
                },
                rendering: OverlayRenderingExport {
                    z_index: 10,
                    alpha_blend: true,
                    anti_alias: true,
                    render_quality: "high".to_string(),
                },
            });
        }
    }

    TextOverlays {
        total_overlays: overlay_data.len(),
        overlay_data,
        global_overlay_settings: GlobalOverlaySettings {
            default_font: "Georgia, serif".to_string(),
            text_shadow: "2px 2px 4px rgba(0,0,0,0.8)".to_string(),
            backdrop_filter: "blur(2px)".to_string(),
            responsive_scaling: true,
        },
    }
}

fn font_family_for(style: &str) -> &'static str {
    match style {
        "bbc-title" | "bbc-quote" => "Georgia, Times New Roman, serif",
        _ => "Arial, sans-serif",
    }
}

fn export_transitions(segments: &[EnrichedSegment]) -> TransitionBlock {
    let transition_data: Vec<TransitionExport> = segments
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let current = &pair[0];
            let next = &pair[1];

            TransitionExport {
                transition_id: format!("trans_{i}_{}", i + 1),
                from_segment: current.id.clone(),
                to_segment: next.id.clone(),
                start_time_ms: current.end_ms.saturating_sub(500),
                duration_ms: 1_000,
                end_time_ms: next.start_ms + 500,
                kind: transition_type(current, next).to_string(),
                effects: TransitionEffects {
                    fade_type: fade_type(current, next).to_string(),
                    zoom_effect: next.intensity > current.intensity
                        && next.category == Category::Revelation,
                    color_grading: color_grading(next).to_string(),
                    motion_blur: current.intensity > 7,
                },
                audio: TransitionAudio {
                    cross_fade_duration_ms: 250,
                    volume_curve: "smooth".to_string(),
                    apply_ducking: next.category == Category::Revelation,
                },
            }
        })
        .collect();

    TransitionBlock {
        total_transitions: transition_data.len(),
        transition_data,
        global_transition_settings: GlobalTransitionSettings {
            default_duration_ms: 750,
            blend_mode: "normal".to_string(),
            motion_blur_amount: 2,
            color_space: "rec709".to_string(),
        },
    }
}

fn transition_type(current: &EnrichedSegment, next: &EnrichedSegment) -> &'static str {
    if current.intensity > 7 && next.intensity > 7 {
        "quick_cut"
    } else if current.category == Category::Emotional || next.category == Category::Emotional {
        "soft_fade"
    } else if current.speakers != next.speakers {
        "cross_fade"
    } else {
        "standard_cut"
    }
}

fn fade_type(current: &EnrichedSegment, next: &EnrichedSegment) -> &'static str {
    if next.category == Category::Revelation {
        "fade_to_black"
    } else if current.category == Category::Emotional {
        "soft_dissolve"
    } else {
        "cross_dissolve"
    }
}

fn color_grading(segment: &EnrichedSegment) -> &'static str {
    match segment.category {
        Category::Emotional => "warm_tint",
        Category::Revelation => "bright_lift",
        Category::Conflict => "desaturated",
        _ => "neutral",
    }
}

fn export_audio(segments: &[EnrichedSegment]) -> AudioProcessing {
    AudioProcessing {
        global_audio: GlobalAudio {
            normalize_levels: true,
            noise_reduction: "light".to_string(),
            dynamic_range_compression: "documentary_standard".to_string(),
            eq_preset: "speech_clarity".to_string(),
            limiter_threshold_db: -3,
        },
        segment_audio: segments
            .iter()
            .map(|segment| SegmentAudio {
                segment_id: segment.id.clone(),
                processing: SegmentAudioSettings {
                    gain_adjustment: gain_adjustment(segment),
                    high_pass_filter_hz: if segment.category == Category::Emotional {
                        80
                    } else {
                        100
                    },
                    presence_boost_db: if segment.intensity > 7 { 2 } else { 1 },
                    de_essing: !segment.speakers.is_empty(),
                    noise_gate_threshold_db: -60,
                },
            })
            .collect(),
        music_scoring: MusicScoring {
            apply_background_music: true,
            duck_for_speech: true,
            emotional_stings: segments
                .iter()
                .filter(|s| s.intensity > 8)
                .map(|s| EmotionalSting {
                    timestamp_ms: s.start_ms
                        + ((s.end_ms - s.start_ms) as f64 * 0.6).round() as u64,
                    intensity: s.intensity,
                    category: s.category,
                })
                .collect(),
        },
    }
}

fn gain_adjustment(segment: &EnrichedSegment) -> f64 {
    if segment.intensity > 8 {
        1.2
    } else if segment.category == Category::Emotional {
        0.9
    } else {
        1.0
    }
}

/// Summary statistics over a built document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSummary {
    pub total_segments: usize,
    pub total_duration_ms: u64,
    pub total_overlays: usize,
    pub total_transitions: usize,
    pub processing_complexity: String,
    pub estimated_render_time_s: u64,
    pub file_size_estimate: String,
}

pub fn summary(document: &ProcessingDocument) -> Result<ExportSummary> {
    let segments = &document.segments;

    let mut complexity: u64 = document.text_overlays.total_overlays as u64 * 2;
    for segment in segments {
        complexity += segment.content.intensity as u64 + 3;
    }
    let processing_complexity = match complexity {
        0..=49 => "low",
        50..=99 => "medium",
        100..=199 => "high",
        _ => "very_high",
    };

    let total_duration_s = document.metadata.technical.total_duration_ms as f64 / 1000.0;
    let avg_intensity = if segments.is_empty() {
        0.0
    } else {
        segments
            .iter()
            .map(|s| s.content.intensity as f64)
            .sum::<f64>()
            / segments.len() as f64
    };
    let estimated_render_time_s =
        (total_duration_s * 0.5 * (1.0 + avg_intensity / 10.0)).round() as u64;

    let size_bytes = serde_json::to_string(document)?.len();
    let file_size_estimate = if size_bytes < 1024 {
        format!("{size_bytes} bytes")
    } else if size_bytes < 1024 * 1024 {
        format!("{} KB", size_bytes / 1024)
    } else {
        format!("{} MB", size_bytes / (1024 * 1024))
    };

    Ok(ExportSummary {
        total_segments: segments.len(),
        total_duration_ms: document.metadata.technical.total_duration_ms,
        total_overlays: document.text_overlays.total_overlays,
        total_transitions: document.transitions.total_transitions,
        processing_complexity: processing_complexity.to_string(),
        estimated_render_time_s,
        file_size_estimate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{
        AnalysisOptions, CutQuality, SentenceBoundary, TextOverlay, TransitionSpec, VideoEditing,
    };
    use crate::transcript::TranscriptInput;

    fn enriched(
        id: &str,
        start: u64,
        end: u64,
        category: Category,
        intensity: u8,
        speakers: Vec<&str>,
    ) -> EnrichedSegment {
        let cut_timing = CutTiming {
            pre_roll_ms: 500,
            post_roll_ms: 300,
            optimal_cut_frame_ms: start + 200,
            breath_pauses: vec![BreathPause {
                start_ms: start + 1_000,
                end_ms: start + 1_400,
                duration_ms: 400,
                quality: CutQuality::Good,
            }],
            sentence_boundaries: vec![SentenceBoundary {
                timestamp_ms: start + 2_000,
                punctuation: ".".to_string(),
                quality: CutQuality::Excellent,
            }],
            speaker_changes: vec![],
        };
        EnrichedSegment {
            id: id.to_string(),
            title: "Example title".to_string(),
            description: "Example description.".to_string(),
            start_ms: start,
            end_ms: end,
            display_start: crate::timecode::ms_to_display(start),
            display_end: crate::timecode::ms_to_display(end),
            category,
            intensity,
            speakers: speakers.into_iter().map(String::from).collect(),
            key_quotes: vec!["A quotable line from the interview.".to_string()],
            content: "A quotable line from the interview.".to_string(),
            entry_count: 3,
            duration_s: (end - start) / 1000,
            word_count: 6,
            cut_timing,
            text_overlays: vec![TextOverlay {
                kind: OverlayKind::Title,
                text: "Example title".to_string(),
                start_ms: start + 1_000,
                duration_ms: 3_000,
                style: "bbc-title".to_string(),
                animation: "typewriter".to_string(),
                position: "lower-third".to_string(),
                font_size: "2.5rem".to_string(),
                color: "#ffffff".to_string(),
                background_color: "rgba(0,0,0,0.8)".to_string(),
                typewriter_speed_ms: Some(50),
            }],
            video_editing: VideoEditing {
                fade_in_ms: 1_000,
                fade_out_ms: 800,
                natural_cut_points: vec![start + 1_000, start + 2_000],
                emotional_beats: vec![],
                transitions: crate::analysis::Transitions {
                    intro: TransitionSpec {
                        kind: "fade-in".to_string(),
                        duration_ms: 1_000,
                        curve: "ease-in".to_string(),
                    },
                    midpoint: None,
                    outro: TransitionSpec {
                        kind: "soft-fade".to_string(),
                        duration_ms: 800,
                        curve: "ease-out".to_string(),
                    },
                },
            },
        }
    }

    #[test]
    fn empty_segment_list_exports_cleanly() {
        let document = processing_document(&[], &VideoMeta::default());
        assert_eq!(document.metadata.technical.segment_count, 0);
        assert_eq!(document.metadata.technical.total_duration_ms, 0);
        assert_eq!(document.metadata.analytics.avg_segment_duration_ms, 0.0);
        assert_eq!(document.transitions.total_transitions, 0);
        assert_eq!(document.export_info.version, EXPORT_VERSION);

        // Document and summary both serialize without issue.
        let json = serde_json::to_value(&document).unwrap();
        assert!(json.get("video_processing").is_some());
        let summary = summary(&document).unwrap();
        assert_eq!(summary.total_segments, 0);
        assert_eq!(summary.processing_complexity, "low");
    }

    #[test]
    fn document_aggregates_categories_speakers_and_analytics() {
        let segments = vec![
            enriched("segment_1", 0, 20_000, Category::Emotional, 8, vec!["Anna"]),
            enriched("segment_2", 20_000, 40_000, Category::Revelation, 9, vec!["Anna", "Ben"]),
        ];
        let document = processing_document(&segments, &VideoMeta::default());

        let technical = &document.metadata.technical;
        assert_eq!(technical.total_duration_ms, 40_000);
        assert_eq!(technical.categories, vec![Category::Emotional, Category::Revelation]);
        assert_eq!(technical.speakers, vec!["Anna".to_string(), "Ben".to_string()]);
        assert_eq!(document.metadata.analytics.avg_segment_duration_ms, 20_000.0);
        assert_eq!(document.metadata.analytics.high_intensity_segments, 2);
        assert_eq!(document.metadata.analytics.emotional_segments, 1);
    }

    #[test]
    fn transitions_follow_intensity_and_category_rules() {
        let segments = vec![
            enriched("segment_1", 0, 20_000, Category::Insight, 6, vec!["Anna"]),
            enriched("segment_2", 20_000, 40_000, Category::Revelation, 9, vec!["Anna"]),
            enriched("segment_3", 40_000, 60_000, Category::KeyMoment, 8, vec!["Ben"]),
        ];
        let block = export_transitions(&segments);

        assert_eq!(block.total_transitions, 2);
        let first = &block.transition_data[0];
        assert_eq!(first.kind, "standard_cut");
        assert_eq!(first.effects.fade_type, "fade_to_black");
        assert!(first.effects.zoom_effect);
        assert!(first.audio.apply_ducking);
        assert_eq!(first.start_time_ms, 19_500);
        assert_eq!(first.end_time_ms, 20_500);

        // 9 and 8 are both above the quick-cut threshold.
        let second = &block.transition_data[1];
        assert_eq!(second.kind, "quick_cut");
        assert!(second.effects.motion_blur);
    }

    #[test]
    fn soft_fade_and_cross_fade_selection() {
        let emotional = enriched("segment_1", 0, 10_000, Category::Emotional, 6, vec!["Anna"]);
        let insight = enriched("segment_2", 10_000, 20_000, Category::Insight, 6, vec!["Ben"]);
        assert_eq!(transition_type(&emotional, &insight), "soft_fade");

        let a = enriched("segment_1", 0, 10_000, Category::Insight, 6, vec!["Anna"]);
        let b = enriched("segment_2", 10_000, 20_000, Category::Insight, 6, vec!["Ben"]);
        assert_eq!(transition_type(&a, &b), "cross_fade");
    }

    #[test]
    fn overlays_flatten_with_stable_ids() {
        let segments = vec![
            enriched("segment_1", 0, 20_000, Category::Insight, 6, vec!["Anna"]),
            enriched("segment_2", 20_000, 40_000, Category::Insight, 6, vec!["Anna"]),
        ];
        let overlays = export_overlays(&segments);

        assert_eq!(overlays.total_overlays, 2);
        assert_eq!(overlays.overlay_data[0].overlay_id, "overlay_0_0");
        assert_eq!(overlays.overlay_data[1].overlay_id, "overlay_1_0");
        assert_eq!(overlays.overlay_data[0].end_time_ms, 4_000);
        assert_eq!(
            overlays.overlay_data[0].style.font_family,
            "Georgia, Times New Roman, serif"
        );
    }

    #[test]
    fn stings_trigger_above_intensity_eight() {
        let segments = vec![
            enriched("segment_1", 0, 10_000, Category::Insight, 6, vec!["Anna"]),
            enriched("segment_2", 10_000, 20_000, Category::Revelation, 9, vec!["Anna"]),
        ];
        let audio = export_audio(&segments);

        assert_eq!(audio.music_scoring.emotional_stings.len(), 1);
        let sting = &audio.music_scoring.emotional_stings[0];
        assert_eq!(sting.timestamp_ms, 16_000); // 60% into the segment
        assert_eq!(sting.intensity, 9);

        assert_eq!(audio.segment_audio[1].processing.gain_adjustment, 1.2);
        assert_eq!(audio.segment_audio[0].processing.gain_adjustment, 1.0);
    }

    #[test]
    fn priority_accumulates_and_caps() {
        let plain = enriched("segment_1", 0, 10_000, Category::Insight, 6, vec!["Anna"]);
        assert_eq!(processing_priority(&plain), 5);

        let stacked = enriched("segment_2", 0, 10_000, Category::Emotional, 9, vec!["Anna", "Ben"]);
        assert_eq!(processing_priority(&stacked), 9);
    }

    #[test]
    fn full_pipeline_document_from_analysis() {
        let srt = "1\n00:00:00,000 --> 00:00:03,000\nAnna: The investigation started in spring.\n\n\
                   2\n00:00:03,200 --> 00:00:06,000\nAnna: We had no idea what we would find.\n\n\
                   3\n00:00:06,200 --> 00:00:09,000\nAnna: The files told a different story.\n\n\
                   4\n00:00:09,500 --> 00:00:12,000\nBen: I struggled with what came next.\n\n\
                   5\n00:00:12,200 --> 00:00:15,000\nBen: It was a difficult season for everyone.\n\n\
                   6\n00:00:15,200 --> 00:00:18,000\nBen: We argued about going public at all.\n";
        let input = TranscriptInput::from_text(srt);
        let segments = crate::analysis::analyze(
            &input,
            &AnalysisOptions {
                jitter_seed: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(!segments.is_empty());

        let document = processing_document(&segments, &VideoMeta::default());
        assert_eq!(document.metadata.technical.segment_count, segments.len());
        assert_eq!(document.export_info.total_segments, segments.len());
        assert_eq!(
            document.transitions.total_transitions,
            segments.len().saturating_sub(1)
        );

        let summary = summary(&document).unwrap();
        assert_eq!(summary.total_segments, segments.len());
        assert!(summary.file_size_estimate.ends_with("KB") || summary.file_size_estimate.ends_with("bytes"));
    }
}
