//! Backing artifact resolution: bundled defaults with file overrides.
//!
//! Every engine and the ontology store is driven by one declarative
//! artifact. The defaults under `data/` are bundled into the binary via
//! `include_str!`; a data directory supplied at startup overrides them
//! file by file. Artifacts are loaded once and read-only thereafter.

use std::path::{Path, PathBuf};

use crate::error::{ArtifactError, ArtifactResult};

/// Bundled default artifacts.
pub const BUNDLED_RULES: &str = include_str!("../data/rules.toml");
pub const BUNDLED_CLASSIFIER: &str = include_str!("../data/classifier.json");
pub const BUNDLED_BAYES_NET: &str = include_str!("../data/bayes_net.json");
pub const BUNDLED_ONTOLOGY: &str = include_str!("../data/ontology.toml");

/// File names expected inside an override data directory.
pub const RULES_FILE: &str = "rules.toml";
pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const BAYES_NET_FILE: &str = "bayes_net.json";
pub const ONTOLOGY_FILE: &str = "ontology.toml";

/// Where an artifact's content came from, kept for failure context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactSource {
    /// Bundled into the binary.
    Bundled(&'static str),
    /// Loaded from an external file.
    File(PathBuf),
}

impl std::fmt::Display for ArtifactSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactSource::Bundled(name) => write!(f, "bundled:{name}"),
            ArtifactSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One resolved artifact: raw content plus provenance.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub source: ArtifactSource,
    pub content: String,
}

impl Artifact {
    pub fn bundled(name: &'static str, content: &str) -> Self {
        Self {
            source: ArtifactSource::Bundled(name),
            content: content.to_string(),
        }
    }

    /// Read an artifact from a file.
    pub fn from_file(path: &Path) -> ArtifactResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self {
            source: ArtifactSource::File(path.to_path_buf()),
            content,
        })
    }

    /// Parse-error constructor with this artifact's provenance attached.
    pub fn parse_error(&self, message: impl Into<String>) -> ArtifactError {
        ArtifactError::Parse {
            path: self.source.to_string(),
            message: message.into(),
        }
    }
}

/// Resolves the four artifacts either from the bundled defaults or from
/// an override directory.
#[derive(Debug, Clone, Default)]
pub struct ArtifactSet {
    data_dir: Option<PathBuf>,
}

impl ArtifactSet {
    /// Bundled defaults only.
    pub fn bundled() -> Self {
        Self { data_dir: None }
    }

    /// Resolve each artifact from `dir`, falling back to nothing: a file
    /// missing from an explicit data directory is an error, not a silent
    /// fallback to the bundled copy.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(dir.into()),
        }
    }

    pub fn rules(&self) -> ArtifactResult<Artifact> {
        self.resolve(RULES_FILE, BUNDLED_RULES)
    }

    pub fn classifier(&self) -> ArtifactResult<Artifact> {
        self.resolve(CLASSIFIER_FILE, BUNDLED_CLASSIFIER)
    }

    pub fn bayes_net(&self) -> ArtifactResult<Artifact> {
        self.resolve(BAYES_NET_FILE, BUNDLED_BAYES_NET)
    }

    pub fn ontology(&self) -> ArtifactResult<Artifact> {
        self.resolve(ONTOLOGY_FILE, BUNDLED_ONTOLOGY)
    }

    fn resolve(&self, file: &'static str, bundled: &'static str) -> ArtifactResult<Artifact> {
        match &self.data_dir {
            Some(dir) => Artifact::from_file(&dir.join(file)),
            None => Ok(Artifact::bundled(file, bundled)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_artifacts_resolve() {
        let set = ArtifactSet::bundled();
        assert!(set.rules().unwrap().content.contains("[[rule]]"));
        assert!(set.classifier().unwrap().content.contains("weights"));
        assert!(set.bayes_net().unwrap().content.contains("priors"));
        assert!(set.ontology().unwrap().content.contains("[[disease]]"));
    }

    #[test]
    fn missing_override_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let set = ArtifactSet::from_dir(dir.path());
        assert!(matches!(
            set.rules(),
            Err(crate::error::ArtifactError::Io { .. })
        ));
    }

    #[test]
    fn override_file_wins() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join(RULES_FILE), "[[rule]]\n").unwrap();
        let set = ArtifactSet::from_dir(dir.path());
        let artifact = set.rules().unwrap();
        assert!(matches!(artifact.source, ArtifactSource::File(_)));
    }
}
