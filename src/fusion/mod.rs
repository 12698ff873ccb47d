//! Score fusion: normalize, aggregate, assemble.
//!
//! The only place where the three engines' independently-produced,
//! differently-shaped outputs are reconciled into a single ranked,
//! explainable decision.

pub mod aggregate;
pub mod normalize;
pub mod report;

pub use aggregate::{AggregationWeights, CompositeScore, RankedDiagnosis, aggregate};
pub use normalize::{EngineScore, NormalizedTriple, normalize};
pub use report::{DiagnosticReport, KnowledgeEnrichment, Treatment, assemble};
