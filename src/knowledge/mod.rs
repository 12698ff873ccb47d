//! Knowledge enrichment: ontology-backed details for a diagnosis.

use crate::error::KnowledgeResult;
use crate::fusion::report::KnowledgeEnrichment;
use crate::vocab::Disease;

pub mod ontology;

pub use ontology::OntologyStore;

/// The enrichment capability consumed by the core.
///
/// The core supplies the canonical disease identifier; resolving it to
/// the backing store's own naming convention is entirely the adapter's
/// concern. A lookup miss is `UnknownDiseaseEntity` and never fatal to
/// the diagnostic result.
pub trait EnrichmentSource: Send + Sync {
    fn lookup(&self, disease: Disease) -> KnowledgeResult<KnowledgeEnrichment>;
}
