//! Score source adapters: one shared capability, three engines.
//!
//! Each adapter wraps one reasoning engine (symbolic rules, statistical
//! classifier, Bayesian network) behind the same contract: given a
//! diagnostic input, return confidence-per-disease in `[0, 1]`. The
//! translation into engine-specific representations (symptom facts,
//! feature vectors, evidence assignments) is adapter-internal. Engines
//! are selected at composition time; the aggregation stage never
//! branches on which engine produced a score.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AdapterResult;
use crate::input::DiagnosticInput;
use crate::vocab::Disease;

pub mod probabilistic;
pub mod statistical;
pub mod symbolic;

pub use probabilistic::BayesNetAdapter;
pub use statistical::ClassifierAdapter;
pub use symbolic::RuleEngineAdapter;

// ---------------------------------------------------------------------------
// Engine identity
// ---------------------------------------------------------------------------

/// The three reasoning engines, by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Symbolic,
    Statistical,
    Probabilistic,
}

impl EngineKind {
    pub fn display_name(self) -> &'static str {
        match self {
            EngineKind::Symbolic => "Rule engine (symbolic)",
            EngineKind::Statistical => "Classifier (statistical)",
            EngineKind::Probabilistic => "Bayesian network (probabilistic)",
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EngineKind::Symbolic => "symbolic",
            EngineKind::Statistical => "statistical",
            EngineKind::Probabilistic => "probabilistic",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Shared contract
// ---------------------------------------------------------------------------

/// Per-engine confidence map. Absence of a disease key means "this engine
/// assigns it no evidence", not "zero probability"; the normalizer keeps
/// that distinction explicit.
pub type EngineScoreMap = BTreeMap<Disease, f32>;

/// The one capability all three engines expose.
///
/// `produce` is pure with respect to the core: it never mutates the input,
/// and with a fixed backing artifact it is deterministic. An unavailable
/// or corrupt backing artifact fails with `BackingEngineUnavailable`
/// rather than returning an empty map.
pub trait ScoreSource: Send + Sync {
    fn kind(&self) -> EngineKind;

    /// A short description of the backing artifact, for `plantaid info`
    /// and failure context.
    fn artifact(&self) -> String;

    fn produce(&self, input: &DiagnosticInput) -> AdapterResult<EngineScoreMap>;
}
