//! Docuclip turns interview and documentary transcripts into labeled clip
//! segments with timing, categories, key quotes and algorithmic cutting
//! metadata (breath pauses, sentence boundaries, overlays, transitions).
//!
//! The analysis core is pure and synchronous; the AI enrichment client and
//! the project store are optional collaborators around it.

pub mod analysis;
pub mod enrich;
pub mod error;
pub mod export;
pub mod project;
pub mod timecode;
pub mod transcript;

pub use analysis::{analyze, analyze_entries, AnalysisOptions, Category, EnrichedSegment};
pub use error::{DocuclipError, Result};
pub use transcript::{TranscriptEntry, TranscriptInput};
