//! JSON-file project store: analysis results saved as one pretty-printed
//! document per project under the platform data directory.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::analysis::EnrichedSegment;
use crate::error::{DocuclipError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub clip_count: usize,
    pub created_at: DateTime<Utc>,
    pub segments: Vec<EnrichedSegment>,
}

impl Project {
    pub fn new(title: impl Into<String>, segments: Vec<EnrichedSegment>) -> Self {
        Self {
            id: None,
            title: title.into(),
            clip_count: segments.len(),
            created_at: Utc::now(),
            segments,
        }
    }
}

pub struct ProjectStore {
    root: PathBuf,
}

impl ProjectStore {
    /// Store under the platform data directory.
    pub fn open_default() -> Result<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| DocuclipError::StoreDirUnavailable(PathBuf::from("data dir")))?;
        Self::open(base.join("docuclip").join("projects"))
    }

    /// Store rooted at an explicit directory, created if missing.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist a project and return its generated id.
    pub fn save(&self, project: &Project) -> Result<String> {
        let id = project
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut record = project.clone();
        record.id = Some(id.clone());

        let path = self.project_path(&id);
        let json = serde_json::to_string_pretty(&record)?;
        fs::write(&path, json)?;
        debug!(id = %id, path = %path.display(), "project saved");

        Ok(id)
    }

    /// Load every stored project, newest first.
    pub fn list(&self) -> Result<Vec<Project>> {
        let mut projects = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match fs::read_to_string(&path)
                .map_err(DocuclipError::from)
                .and_then(|text| Ok(serde_json::from_str::<Project>(&text)?))
            {
                Ok(project) => projects.push(project),
                Err(e) => {
                    // One corrupt file should not hide the rest.
                    debug!(path = %path.display(), "skipping unreadable project: {e}");
                }
            }
        }

        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    pub fn load(&self, id: &str) -> Result<Project> {
        let path = self.project_path(id);
        if !path.exists() {
            return Err(DocuclipError::ProjectNotFound(id.to_string()));
        }
        let text = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn project_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, AnalysisOptions};
    use crate::transcript::TranscriptInput;

    fn sample_project(title: &str) -> Project {
        let text = "Anna: The festival brought the whole town together again.\n\
                    Anna: Volunteers rebuilt the stage in a single weekend.\n\
                    Anna: Nobody wanted the summer to end that year.";
        let segments = analyze(
            &TranscriptInput::from_text(text),
            &AnalysisOptions {
                jitter_seed: Some(5),
                ..Default::default()
            },
        )
        .unwrap();
        Project::new(title, segments)
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();

        let project = sample_project("Town Festival");
        let id = store.save(&project).unwrap();

        let loaded = store.load(&id).unwrap();
        assert_eq!(loaded.id.as_deref(), Some(id.as_str()));
        assert_eq!(loaded.title, "Town Festival");
        assert_eq!(loaded.clip_count, loaded.segments.len());
    }

    #[test]
    fn list_returns_saved_projects() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();

        store.save(&sample_project("First")).unwrap();
        store.save(&sample_project("Second")).unwrap();

        let projects = store.list().unwrap();
        assert_eq!(projects.len(), 2);
    }

    #[test]
    fn corrupt_files_are_skipped_by_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();
        store.save(&sample_project("Good")).unwrap();
        std::fs::write(dir.path().join("broken.json"), "{ not json").unwrap();

        let projects = store.list().unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].title, "Good");
    }

    #[test]
    fn missing_project_is_an_explicit_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProjectStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.load("nope"),
            Err(DocuclipError::ProjectNotFound(_))
        ));
    }
}
