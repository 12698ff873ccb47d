//! Diagnostic session input.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::vocab::{Plant, Season, Symptom};

/// Immutable input to one diagnostic session.
///
/// Symptoms are kept as a set: order is irrelevant and duplicates collapse.
/// An empty symptom set is representable, but the ranking it yields is
/// driven by the network's priors alone, so both CLI input paths require
/// at least one observed symptom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticInput {
    plant: Plant,
    symptoms: BTreeSet<Symptom>,
    season: Season,
}

impl DiagnosticInput {
    pub fn new(plant: Plant, symptoms: impl IntoIterator<Item = Symptom>, season: Season) -> Self {
        Self {
            plant,
            symptoms: symptoms.into_iter().collect(),
            season,
        }
    }

    pub fn plant(&self) -> Plant {
        self.plant
    }

    pub fn season(&self) -> Season {
        self.season
    }

    pub fn symptoms(&self) -> &BTreeSet<Symptom> {
        &self.symptoms
    }

    pub fn has_symptom(&self, symptom: Symptom) -> bool {
        self.symptoms.contains(&symptom)
    }
}
