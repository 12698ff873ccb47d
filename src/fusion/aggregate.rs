//! Weighted composite scoring and deterministic ranking.
//!
//! Composite per disease is the weighted sum of the three normalized
//! engine scores, with `Missing` contributing zero. Ranking is total and
//! reproducible: composite descending, then probabilistic score, then
//! symbolic score, then the canonical disease identifier.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{FusionError, FusionResult};
use crate::vocab::Disease;

use super::normalize::NormalizedTriple;

/// Tolerance for the weights-sum-to-one invariant.
const WEIGHT_SUM_TOLERANCE: f32 = 1e-6;

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Aggregation weights for the three engines.
///
/// The probabilistic network carries the most weight for its handling of
/// uncertainty, the rule engine next for its expert knowledge, the
/// classifier least.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregationWeights {
    pub probabilistic: f32,
    pub symbolic: f32,
    pub statistical: f32,
}

impl Default for AggregationWeights {
    fn default() -> Self {
        Self {
            probabilistic: 0.5,
            symbolic: 0.3,
            statistical: 0.2,
        }
    }
}

impl AggregationWeights {
    /// Validate the sum-to-one invariant. Called before any scoring.
    pub fn validate(&self) -> FusionResult<()> {
        let sum = self.probabilistic + self.symbolic + self.statistical;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(FusionError::InvalidWeightConfiguration {
                probabilistic: self.probabilistic,
                symbolic: self.symbolic,
                statistical: self.statistical,
                sum,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One disease's fused score with full per-engine provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub disease: Disease,
    pub scores: NormalizedTriple,
    /// Weighted sum, in `[0, 1]`.
    pub composite: f32,
}

/// The ranked outcome of one aggregation: every candidate disease,
/// strongest first, nothing discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RankedDiagnosisRepr")]
pub struct RankedDiagnosis {
    ranked: Vec<CompositeScore>,
}

// Deserialization funnels through the same non-empty check as
// aggregation, so `top()` cannot index-panic on any construction path.
#[derive(Deserialize)]
struct RankedDiagnosisRepr {
    ranked: Vec<CompositeScore>,
}

impl TryFrom<RankedDiagnosisRepr> for RankedDiagnosis {
    type Error = FusionError;

    fn try_from(repr: RankedDiagnosisRepr) -> FusionResult<Self> {
        if repr.ranked.is_empty() {
            return Err(FusionError::NoCandidateDiagnosis);
        }
        Ok(Self {
            ranked: repr.ranked,
        })
    }
}

impl RankedDiagnosis {
    /// The session's diagnosis.
    pub fn top(&self) -> &CompositeScore {
        // Construction guarantees at least one entry.
        &self.ranked[0]
    }

    /// Every candidate in rank order, for the explanation view.
    pub fn entries(&self) -> &[CompositeScore] {
        &self.ranked
    }

    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Fuse normalized triples into a ranked diagnosis.
pub fn aggregate(
    triples: &BTreeMap<Disease, NormalizedTriple>,
    weights: &AggregationWeights,
) -> FusionResult<RankedDiagnosis> {
    weights.validate()?;

    if triples.is_empty() {
        return Err(FusionError::NoCandidateDiagnosis);
    }

    let mut ranked: Vec<CompositeScore> = triples
        .iter()
        .map(|(disease, scores)| {
            let composite = weights.probabilistic * scores.probabilistic.value_or_zero()
                + weights.symbolic * scores.symbolic.value_or_zero()
                + weights.statistical * scores.statistical.value_or_zero();
            CompositeScore {
                disease: *disease,
                scores: *scores,
                composite,
            }
        })
        .collect();

    // Composite descending, then probabilistic, then symbolic, then the
    // canonical identifier ascending. Total order, reproducible.
    ranked.sort_by(|a, b| {
        b.composite
            .total_cmp(&a.composite)
            .then_with(|| {
                b.scores
                    .probabilistic
                    .value_or_zero()
                    .total_cmp(&a.scores.probabilistic.value_or_zero())
            })
            .then_with(|| {
                b.scores
                    .symbolic
                    .value_or_zero()
                    .total_cmp(&a.scores.symbolic.value_or_zero())
            })
            .then_with(|| a.disease.cmp(&b.disease))
    });

    tracing::debug!(
        candidates = ranked.len(),
        top = %ranked[0].disease,
        composite = ranked[0].composite,
        "aggregation complete"
    );

    Ok(RankedDiagnosis { ranked })
}
