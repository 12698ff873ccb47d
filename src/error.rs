//! Rich diagnostic error types for the plantaid engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes, help text, and source chains so users
//! know exactly which engine or artifact failed and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

use crate::adapters::EngineKind;
use crate::vocab::Disease;

/// Top-level error type for the plantaid engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum PlantAidError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Vocab(#[from] VocabError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Fusion(#[from] FusionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Knowledge(#[from] KnowledgeError),
}

/// Result type for top-level plantaid operations.
pub type PlantAidResult<T> = std::result::Result<T, PlantAidError>;

// ---------------------------------------------------------------------------
// Vocabulary errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum VocabError {
    #[error("unknown plant: \"{name}\"")]
    #[diagnostic(
        code(plantaid::vocab::unknown_plant),
        help("Valid plants are olive, rose, and basil. Run `plantaid vocab` for the full list.")
    )]
    UnknownPlant { name: String },

    #[error("unknown season: \"{name}\"")]
    #[diagnostic(
        code(plantaid::vocab::unknown_season),
        help("Valid seasons are spring, summer, autumn, and mild_winter.")
    )]
    UnknownSeason { name: String },

    #[error("unknown symptom: \"{name}\"")]
    #[diagnostic(
        code(plantaid::vocab::unknown_symptom),
        help("Run `plantaid vocab` to list the canonical symptom identifiers.")
    )]
    UnknownSymptom { name: String },

    #[error("unknown disease: \"{name}\"")]
    #[diagnostic(
        code(plantaid::vocab::unknown_disease),
        help("Run `plantaid vocab` to list the canonical disease identifiers.")
    )]
    UnknownDisease { name: String },
}

pub type VocabResult<T> = std::result::Result<T, VocabError>;

// ---------------------------------------------------------------------------
// Artifact errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ArtifactError {
    #[error("failed to read artifact file: {path}")]
    #[diagnostic(
        code(plantaid::artifact::io),
        help("Ensure the file exists under the data directory and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact \"{path}\": {message}")]
    #[diagnostic(
        code(plantaid::artifact::parse),
        help(
            "The artifact is corrupt or from an incompatible version. \
             Restore it from the bundled defaults."
        )
    )]
    Parse { path: String, message: String },
}

pub type ArtifactResult<T> = std::result::Result<T, ArtifactError>;

// ---------------------------------------------------------------------------
// Adapter errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum AdapterError {
    /// The engine's backing artifact is missing, corrupt, or unreachable.
    ///
    /// Never mapped to an empty score map: whether to degrade or abort is
    /// the aggregation barrier's decision, not this layer's.
    #[error("{engine} engine unavailable (artifact: {artifact}): {message}")]
    #[diagnostic(
        code(plantaid::adapter::backing_engine_unavailable),
        help(
            "Restore the artifact or rerun with the bundled defaults. \
             Degraded aggregation (missing engine scored as zero) is the default; \
             pass --fail-on-engine-error to abort instead."
        )
    )]
    BackingEngineUnavailable {
        engine: EngineKind,
        artifact: String,
        message: String,
    },
}

impl AdapterError {
    /// Which engine failed, for degraded-mode bookkeeping.
    pub fn engine(&self) -> EngineKind {
        match self {
            AdapterError::BackingEngineUnavailable { engine, .. } => *engine,
        }
    }
}

pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

// ---------------------------------------------------------------------------
// Fusion errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum FusionError {
    #[error(
        "invalid weight configuration: probabilistic {probabilistic} + symbolic {symbolic} \
         + statistical {statistical} = {sum}, expected 1.0"
    )]
    #[diagnostic(
        code(plantaid::fusion::invalid_weights),
        help("The three aggregation weights must sum to 1.0 (within 1e-6).")
    )]
    InvalidWeightConfiguration {
        probabilistic: f32,
        symbolic: f32,
        statistical: f32,
        sum: f32,
    },

    #[error("no candidate diagnosis: all three engines returned empty score maps")]
    #[diagnostic(
        code(plantaid::fusion::no_candidate),
        help(
            "The observed symptoms matched nothing in any engine. \
             Check that at least one symptom was provided and that the \
             backing artifacts cover the selected plant."
        )
    )]
    NoCandidateDiagnosis,
}

pub type FusionResult<T> = std::result::Result<T, FusionError>;

// ---------------------------------------------------------------------------
// Knowledge store errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum KnowledgeError {
    /// The canonical disease has no individual in the backing ontology.
    /// Non-fatal: the session still produces a report without enrichment.
    #[error("disease \"{disease}\" has no entry in the ontology (individual: {individual})")]
    #[diagnostic(
        code(plantaid::knowledge::unknown_disease_entity),
        help(
            "The diagnosis itself is unaffected; only the enrichment section is empty. \
             Add the individual to the ontology artifact to restore it."
        )
    )]
    UnknownDiseaseEntity { disease: Disease, individual: String },

    #[error("SPARQL error: {message}")]
    #[diagnostic(
        code(plantaid::knowledge::sparql),
        help(
            "The RDF store rejected an insert or query. This points at a malformed \
             ontology artifact or a bug in the store layer."
        )
    )]
    Sparql { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Artifact(#[from] ArtifactError),
}

pub type KnowledgeResult<T> = std::result::Result<T, KnowledgeError>;
