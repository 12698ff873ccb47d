//! Statistical classifier adapter.
//!
//! A trained linear classifier over a fixed feature vector: one binary
//! flag per symptom plus a one-hot plant encoding. Scores are
//! softmax-normalized and the adapter reports confidence only for its
//! top prediction; the other diseases are absent from its map, not zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::artifacts::Artifact;
use crate::error::{AdapterError, AdapterResult, ArtifactResult};
use crate::input::DiagnosticInput;
use crate::vocab::{Disease, Plant, Symptom};

use super::{EngineKind, EngineScoreMap, ScoreSource};

// ---------------------------------------------------------------------------
// Model artifact
// ---------------------------------------------------------------------------

/// One class of the linear model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassWeights {
    pub disease: Disease,
    pub bias: f32,
    pub weights: Vec<f32>,
}

/// Trained classifier: feature order plus per-class weight vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierModel {
    pub version: u32,
    pub features: Vec<String>,
    pub classes: Vec<ClassWeights>,
}

impl ClassifierModel {
    pub fn parse(artifact: &Artifact) -> ArtifactResult<Self> {
        let model: Self = serde_json::from_str(&artifact.content)
            .map_err(|e| artifact.parse_error(e.to_string()))?;
        for class in &model.classes {
            if class.weights.len() != model.features.len() {
                return Err(artifact.parse_error(format!(
                    "class \"{}\" has {} weights for {} features",
                    class.disease,
                    class.weights.len(),
                    model.features.len()
                )));
            }
        }
        Ok(model)
    }
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// Score source backed by the trained linear classifier.
#[derive(Debug)]
pub struct ClassifierAdapter {
    model: ClassifierModel,
    artifact: String,
}

impl ClassifierAdapter {
    pub fn load(artifact: &Artifact) -> AdapterResult<Self> {
        let model = ClassifierModel::parse(artifact).map_err(|e| {
            AdapterError::BackingEngineUnavailable {
                engine: EngineKind::Statistical,
                artifact: artifact.source.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Self {
            model,
            artifact: artifact.source.to_string(),
        })
    }

    /// Translate the diagnostic input into the model's feature vector.
    fn encode(&self, input: &DiagnosticInput) -> Vec<f32> {
        self.model
            .features
            .iter()
            .map(|feature| {
                let on = match feature.as_str() {
                    "plant_olive" => input.plant() == Plant::Olive,
                    "plant_rose" => input.plant() == Plant::Rose,
                    "plant_basil" => input.plant() == Plant::Basil,
                    name => Symptom::parse(name)
                        .map(|s| input.has_symptom(s))
                        .unwrap_or(false),
                };
                if on { 1.0 } else { 0.0 }
            })
            .collect()
    }

    /// Full posterior over all classes (softmax of the linear scores).
    pub fn class_probabilities(&self, input: &DiagnosticInput) -> BTreeMap<Disease, f32> {
        let x = self.encode(input);
        let scores: Vec<(Disease, f32)> = self
            .model
            .classes
            .iter()
            .map(|c| {
                let z: f32 = c
                    .weights
                    .iter()
                    .zip(&x)
                    .map(|(w, xi)| w * xi)
                    .sum::<f32>()
                    + c.bias;
                (c.disease, z)
            })
            .collect();

        // Softmax, shifted by the max score for stability.
        let max = scores
            .iter()
            .map(|(_, z)| *z)
            .fold(f32::NEG_INFINITY, f32::max);
        let exp: Vec<(Disease, f32)> = scores
            .into_iter()
            .map(|(d, z)| (d, (z - max).exp()))
            .collect();
        let total: f32 = exp.iter().map(|(_, e)| e).sum();
        exp.into_iter().map(|(d, e)| (d, e / total)).collect()
    }
}

impl ScoreSource for ClassifierAdapter {
    fn kind(&self) -> EngineKind {
        EngineKind::Statistical
    }

    fn artifact(&self) -> String {
        self.artifact.clone()
    }

    fn produce(&self, input: &DiagnosticInput) -> AdapterResult<EngineScoreMap> {
        let probabilities = self.class_probabilities(input);

        // Confidence for the top prediction only; ties broken by the
        // canonical disease order for determinism.
        let top = probabilities
            .iter()
            .max_by(|(da, pa), (db, pb)| {
                pa.partial_cmp(pb)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| db.cmp(da))
            })
            .map(|(d, p)| (*d, *p));

        let mut scores = EngineScoreMap::new();
        if let Some((disease, confidence)) = top {
            tracing::debug!(
                engine = %self.kind(),
                prediction = %disease,
                confidence,
                "classifier prediction"
            );
            scores.insert(disease, confidence);
        }
        Ok(scores)
    }
}
