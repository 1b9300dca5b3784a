//! Optional AI enrichment of segment metadata via the Anthropic Messages
//! API. Strictly a collaborator: any failure leaves the heuristic titles,
//! descriptions and categories untouched.

use serde::Deserialize;
use tracing::{info, warn};

use crate::analysis::{Category, EnrichedSegment};
use crate::error::{DocuclipError, Result};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
const TOOL_NAME: &str = "report_clip_metadata";
const MAX_TOKENS: u32 = 4_096;
/// Characters of segment content included per clip in the prompt.
const CONTENT_EXCERPT_CHARS: usize = 400;

pub struct AiEnrichment {
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum AnthropicContentBlock {
    #[serde(rename = "text")]
    Text {
        #[allow(dead_code)]
        text: String,
    },
    #[serde(rename = "tool_use")]
    ToolUse {
        name: String,
        input: serde_json::Value,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct ClipMetadata {
    segment_id: String,
    title: String,
    description: String,
    category: Category,
    intensity: Option<u8>,
}

impl AiEnrichment {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Build from `ANTHROPIC_API_KEY`, tolerating quoted values.
    pub fn from_env() -> Option<Self> {
        let key = std::env::var("ANTHROPIC_API_KEY").ok()?;
        let key = key.trim().trim_matches('"').to_string();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Ask the model for better titles, descriptions and categories, and
    /// apply whatever validates. Returns true when enrichment was applied;
    /// on any failure the heuristic metadata stays and false is returned.
    pub async fn enrich(
        &self,
        segments: &mut [EnrichedSegment],
        custom_direction: Option<&str>,
    ) -> bool {
        if segments.is_empty() {
            return false;
        }

        match self.request_metadata(segments, custom_direction).await {
            Ok(clips) => {
                let applied = apply_metadata(segments, clips);
                info!(applied, total = segments.len(), "AI enrichment applied");
                applied > 0
            }
            Err(e) => {
                warn!("AI enrichment failed, keeping heuristic metadata: {e}");
                false
            }
        }
    }

    async fn request_metadata(
        &self,
        segments: &[EnrichedSegment],
        custom_direction: Option<&str>,
    ) -> Result<Vec<ClipMetadata>> {
        let clip_list: Vec<serde_json::Value> = segments
            .iter()
            .map(|s| {
                let excerpt: String = s.content.chars().take(CONTENT_EXCERPT_CHARS).collect();
                serde_json::json!({
                    "segment_id": s.id,
                    "time": format!("{}-{}", s.display_start, s.display_end),
                    "heuristic_title": s.title,
                    "heuristic_category": s.category,
                    "content": excerpt,
                })
            })
            .collect();

        let direction = custom_direction
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("Create a compelling documentary focusing on the most impactful moments.");

        let system_prompt = format!(
            "You are a professional documentary editor. You are given clips \
             extracted from an interview transcript, each with a heuristic \
             title, category and a content excerpt. For every clip, return a \
             sharper title (at most 8 words), a one-sentence description, a \
             category (key_moment, revelation, conflict, insight, emotional \
             or context) and an intensity from 1 to 10 via the \
             {TOOL_NAME} tool. Keep every segment_id exactly as given.\n\n\
             Editorial direction: {direction}"
        );

        let tool = serde_json::json!({
            "name": TOOL_NAME,
            "description": "Report refined metadata for each documentary clip",
            "input_schema": {
                "type": "object",
                "required": ["clips"],
                "properties": {
                    "clips": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "required": ["segment_id", "title", "description", "category"],
                            "properties": {
                                "segment_id": {"type": "string"},
                                "title": {"type": "string"},
                                "description": {"type": "string"},
                                "category": {
                                    "type": "string",
                                    "enum": ["key_moment", "revelation", "conflict", "insight", "emotional", "context"]
                                },
                                "intensity": {"type": "integer", "minimum": 1, "maximum": 10}
                            }
                        }
                    }
                }
            }
        });

        let request_body = serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "system": system_prompt,
            "tools": [tool],
            "tool_choice": {"type": "tool", "name": TOOL_NAME},
            "messages": [{
                "role": "user",
                "content": format!(
                    "Refine the metadata for these documentary clips:\n\n{}",
                    serde_json::to_string_pretty(&clip_list)?
                ),
            }],
        });

        info!(clips = segments.len(), model = %self.model, "requesting AI clip metadata");

        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(30))
            .timeout(std::time::Duration::from_secs(120))
            .build()?;

        let response = client
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocuclipError::Enrichment(format!(
                "API error ({status}): {body}"
            )));
        }

        let api_response: AnthropicResponse = response.json().await?;
        for block in api_response.content {
            if let AnthropicContentBlock::ToolUse { name, input } = block {
                if name == TOOL_NAME {
                    let clips_value = input
                        .get("clips")
                        .cloned()
                        .unwrap_or(serde_json::Value::Array(Vec::new()));
                    return Ok(serde_json::from_value(clips_value)?);
                }
            }
        }

        Err(DocuclipError::Enrichment(format!(
            "no {TOOL_NAME} tool_use block in response"
        )))
    }
}

/// Apply validated clip metadata onto matching segments; unknown ids and
/// out-of-range intensities are skipped.
fn apply_metadata(segments: &mut [EnrichedSegment], clips: Vec<ClipMetadata>) -> usize {
    let mut applied = 0;

    for clip in clips {
        let Some(segment) = segments.iter_mut().find(|s| s.id == clip.segment_id) else {
            continue;
        };
        if clip.title.trim().is_empty() || clip.description.trim().is_empty() {
            continue;
        }

        segment.title = clip.title;
        segment.description = clip.description;
        segment.category = clip.category;
        if let Some(intensity) = clip.intensity {
            if (1..=10).contains(&intensity) {
                segment.intensity = intensity;
            }
        }
        applied += 1;
    }

    applied
}
