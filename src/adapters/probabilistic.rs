//! Bayesian network adapter.
//!
//! Naive-Bayes structure: one disease node with the nine symptom nodes as
//! children. The artifact carries the priors and the learned
//! P(symptom present | disease) tables. Inference assigns evidence for
//! every symptom (observed ones as present, the rest as absent) and
//! normalizes the posterior over all diseases, so the adapter reports a
//! full probability distribution (unlike the classifier, every disease
//! key is present in its map).
//!
//! The plant is deliberately not part of the evidence; the network
//! reasons from symptoms alone, and the rule engine carries the
//! plant-specific knowledge.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::artifacts::Artifact;
use crate::error::{AdapterError, AdapterResult, ArtifactResult};
use crate::input::DiagnosticInput;
use crate::vocab::{Disease, Symptom};

use super::{EngineKind, EngineScoreMap, ScoreSource};

// ---------------------------------------------------------------------------
// Model artifact
// ---------------------------------------------------------------------------

/// Learned network parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BayesNetModel {
    pub version: u32,
    /// P(disease).
    pub priors: BTreeMap<Disease, f32>,
    /// P(symptom present | disease), per disease and symptom.
    pub cpt: BTreeMap<Disease, BTreeMap<Symptom, f32>>,
}

impl BayesNetModel {
    pub fn parse(artifact: &Artifact) -> ArtifactResult<Self> {
        let model: Self = serde_json::from_str(&artifact.content)
            .map_err(|e| artifact.parse_error(e.to_string()))?;

        for (disease, prior) in &model.priors {
            if !(0.0..=1.0).contains(prior) {
                return Err(artifact.parse_error(format!(
                    "prior for \"{disease}\" out of range: {prior}"
                )));
            }
            let Some(table) = model.cpt.get(disease) else {
                return Err(
                    artifact.parse_error(format!("no conditional table for \"{disease}\""))
                );
            };
            for symptom in Symptom::ALL {
                match table.get(&symptom) {
                    Some(p) if (0.0..=1.0).contains(p) => {}
                    Some(p) => {
                        return Err(artifact.parse_error(format!(
                            "P({symptom} | {disease}) out of range: {p}"
                        )));
                    }
                    None => {
                        return Err(artifact.parse_error(format!(
                            "missing P({symptom} | {disease})"
                        )));
                    }
                }
            }
        }
        Ok(model)
    }
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// Score source backed by the Bayesian network.
#[derive(Debug)]
pub struct BayesNetAdapter {
    model: BayesNetModel,
    artifact: String,
}

impl BayesNetAdapter {
    pub fn load(artifact: &Artifact) -> AdapterResult<Self> {
        let model = BayesNetModel::parse(artifact).map_err(|e| {
            AdapterError::BackingEngineUnavailable {
                engine: EngineKind::Probabilistic,
                artifact: artifact.source.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Self {
            model,
            artifact: artifact.source.to_string(),
        })
    }

    /// Log-likelihood of the full evidence assignment under one disease.
    fn log_likelihood(&self, disease: Disease, input: &DiagnosticInput) -> f32 {
        let table = &self.model.cpt[&disease];
        Symptom::ALL
            .iter()
            .map(|symptom| {
                let p_present = table[symptom].clamp(1e-6, 1.0 - 1e-6);
                if input.has_symptom(*symptom) {
                    p_present.ln()
                } else {
                    (1.0 - p_present).ln()
                }
            })
            .sum()
    }
}

impl ScoreSource for BayesNetAdapter {
    fn kind(&self) -> EngineKind {
        EngineKind::Probabilistic
    }

    fn artifact(&self) -> String {
        self.artifact.clone()
    }

    fn produce(&self, input: &DiagnosticInput) -> AdapterResult<EngineScoreMap> {
        // Posterior in log space, then normalize.
        let log_posteriors: Vec<(Disease, f32)> = self
            .model
            .priors
            .iter()
            .map(|(disease, prior)| {
                let log_p = prior.max(1e-6).ln() + self.log_likelihood(*disease, input);
                (*disease, log_p)
            })
            .collect();

        let max = log_posteriors
            .iter()
            .map(|(_, lp)| *lp)
            .fold(f32::NEG_INFINITY, f32::max);
        let unnormalized: Vec<(Disease, f32)> = log_posteriors
            .into_iter()
            .map(|(d, lp)| (d, (lp - max).exp()))
            .collect();
        let total: f32 = unnormalized.iter().map(|(_, p)| p).sum();

        let scores: EngineScoreMap = unnormalized
            .into_iter()
            .map(|(d, p)| (d, p / total))
            .collect();

        tracing::debug!(
            engine = %self.kind(),
            evidence = input.symptoms().len(),
            "posterior inference complete"
        );
        Ok(scores)
    }
}
