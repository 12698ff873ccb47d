//! Report assembly: aggregation output plus enrichment, merged once.

use serde::{Deserialize, Serialize};

use crate::adapters::EngineKind;
use crate::vocab::Disease;

use super::aggregate::{CompositeScore, RankedDiagnosis};

/// One recommended treatment from the knowledge store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treatment {
    pub name: String,
    pub description: String,
    pub dosage: Option<String>,
}

/// Ontology-backed knowledge about the winning diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEnrichment {
    pub disease: Disease,
    pub description: String,
    pub scientific_name: String,
    /// Estimated severity, 1 (mild) to 5 (destructive).
    pub severity: u8,
    pub active_period: String,
    pub treatments: Vec<Treatment>,
}

/// The final, immutable outcome of one diagnostic session.
///
/// Always carries the full ranked sequence, so callers can render the
/// score breakdown of every candidate, not only the winner. An
/// enrichment miss leaves `enrichment: None` without losing the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    ranked: RankedDiagnosis,
    enrichment: Option<KnowledgeEnrichment>,
    /// Engines that failed at the barrier and were scored as all-missing.
    degraded_engines: Vec<EngineKind>,
}

impl DiagnosticReport {
    pub fn top(&self) -> &CompositeScore {
        self.ranked.top()
    }

    pub fn ranked(&self) -> &RankedDiagnosis {
        &self.ranked
    }

    pub fn enrichment(&self) -> Option<&KnowledgeEnrichment> {
        self.enrichment.as_ref()
    }

    pub fn degraded_engines(&self) -> &[EngineKind] {
        &self.degraded_engines
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded_engines.is_empty()
    }
}

/// Pure composition; no computation beyond merging.
pub fn assemble(
    ranked: RankedDiagnosis,
    enrichment: Option<KnowledgeEnrichment>,
    degraded_engines: Vec<EngineKind>,
) -> DiagnosticReport {
    DiagnosticReport {
        ranked,
        enrichment,
        degraded_engines,
    }
}
