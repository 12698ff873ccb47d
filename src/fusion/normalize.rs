//! Score normalization onto the canonical union key space.
//!
//! Each engine reports confidence for the diseases it has evidence about;
//! the normalizer builds one `NormalizedTriple` per disease in the union
//! of the three key spaces. A disease an engine did not mention stays an
//! explicit `Missing`; the numeric coercion to 0.0 happens only inside
//! the aggregation sum, so the explanation can still distinguish "engine
//! reported 0.0" from "engine had no opinion".

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::adapters::{EngineKind, EngineScoreMap};
use crate::vocab::Disease;

/// One engine's view of one disease.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EngineScore {
    /// The engine reported this confidence.
    Reported(f32),
    /// The engine assigned no evidence to this disease (or was skipped
    /// in degraded mode).
    Missing,
}

impl EngineScore {
    /// Numeric contribution to the weighted sum.
    pub fn value_or_zero(self) -> f32 {
        match self {
            EngineScore::Reported(v) => v,
            EngineScore::Missing => 0.0,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, EngineScore::Missing)
    }
}

impl std::fmt::Display for EngineScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineScore::Reported(v) => write!(f, "{:.1}%", v * 100.0),
            EngineScore::Missing => f.write_str("no opinion"),
        }
    }
}

/// The three per-engine scores for one disease.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTriple {
    pub symbolic: EngineScore,
    pub statistical: EngineScore,
    pub probabilistic: EngineScore,
}

impl NormalizedTriple {
    pub fn get(&self, engine: EngineKind) -> EngineScore {
        match engine {
            EngineKind::Symbolic => self.symbolic,
            EngineKind::Statistical => self.statistical,
            EngineKind::Probabilistic => self.probabilistic,
        }
    }
}

/// Clamp a reported confidence into `[0, 1]`, warning on violations
/// instead of letting an out-of-range artifact poison the composite.
fn clamped(engine: EngineKind, disease: Disease, value: f32) -> f32 {
    if !(0.0..=1.0).contains(&value) {
        tracing::warn!(
            engine = %engine,
            disease = %disease,
            value,
            "engine reported confidence outside [0, 1], clamping"
        );
    }
    value.clamp(0.0, 1.0)
}

/// Build one `NormalizedTriple` per disease in the union key space.
pub fn normalize(
    symbolic: &EngineScoreMap,
    statistical: &EngineScoreMap,
    probabilistic: &EngineScoreMap,
) -> BTreeMap<Disease, NormalizedTriple> {
    let mut union: Vec<Disease> = symbolic
        .keys()
        .chain(statistical.keys())
        .chain(probabilistic.keys())
        .copied()
        .collect();
    union.sort_unstable();
    union.dedup();

    union
        .into_iter()
        .map(|disease| {
            let score = |map: &EngineScoreMap, engine: EngineKind| {
                map.get(&disease)
                    .map(|v| EngineScore::Reported(clamped(engine, disease, *v)))
                    .unwrap_or(EngineScore::Missing)
            };
            let triple = NormalizedTriple {
                symbolic: score(symbolic, EngineKind::Symbolic),
                statistical: score(statistical, EngineKind::Statistical),
                probabilistic: score(probabilistic, EngineKind::Probabilistic),
            };
            (disease, triple)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_covers_all_engines() {
        let symbolic = EngineScoreMap::from([(Disease::PeacockEye, 0.7)]);
        let statistical = EngineScoreMap::from([(Disease::OliveKnot, 0.6)]);
        let probabilistic = EngineScoreMap::from([(Disease::PeacockEye, 0.8)]);

        let triples = normalize(&symbolic, &statistical, &probabilistic);
        assert_eq!(triples.len(), 2);
        assert_eq!(
            triples[&Disease::PeacockEye].symbolic,
            EngineScore::Reported(0.7)
        );
        assert!(triples[&Disease::PeacockEye].statistical.is_missing());
        assert!(triples[&Disease::OliveKnot].probabilistic.is_missing());
    }

    #[test]
    fn reported_zero_is_not_missing() {
        let probabilistic = EngineScoreMap::from([(Disease::RoseBlackSpot, 0.0)]);
        let triples = normalize(
            &EngineScoreMap::new(),
            &EngineScoreMap::new(),
            &probabilistic,
        );
        let triple = triples[&Disease::RoseBlackSpot];
        assert_eq!(triple.probabilistic, EngineScore::Reported(0.0));
        assert!(!triple.probabilistic.is_missing());
        assert_eq!(triple.probabilistic.value_or_zero(), 0.0);
    }

    #[test]
    fn out_of_range_scores_are_clamped() {
        let symbolic = EngineScoreMap::from([(Disease::PeacockEye, 1.7)]);
        let triples = normalize(&symbolic, &EngineScoreMap::new(), &EngineScoreMap::new());
        assert_eq!(
            triples[&Disease::PeacockEye].symbolic,
            EngineScore::Reported(1.0)
        );
    }

    #[test]
    fn empty_maps_give_empty_union() {
        let triples = normalize(
            &EngineScoreMap::new(),
            &EngineScoreMap::new(),
            &EngineScoreMap::new(),
        );
        assert!(triples.is_empty());
    }
}
