//! Diagnostic session: the facade that wires engines, fusion, and
//! knowledge enrichment into one `run` call.
//!
//! The three engines execute concurrently and meet at a barrier; no
//! partial ranking is ever observable. What happens when an engine fails
//! at the barrier is a session-level policy: degrade (score the engine as
//! all-missing and flag it in the report) or fail the whole run.

use rayon::join;

use crate::adapters::{
    BayesNetAdapter, ClassifierAdapter, EngineKind, EngineScoreMap, RuleEngineAdapter,
    ScoreSource,
};
use crate::artifacts::ArtifactSet;
use crate::error::{AdapterError, PlantAidResult};
use crate::fusion::aggregate::{AggregationWeights, aggregate};
use crate::fusion::normalize::normalize;
use crate::fusion::report::{DiagnosticReport, KnowledgeEnrichment, assemble};
use crate::input::DiagnosticInput;
use crate::knowledge::{EnrichmentSource, OntologyStore};

/// What to do when an engine fails at the aggregation barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineFailurePolicy {
    /// Score the failed engine as all-missing and continue. The default.
    #[default]
    Degrade,
    /// Abort the run with the engine's error.
    Fail,
}

/// One configured diagnostic pipeline.
pub struct DiagnosisSession {
    symbolic: Box<dyn ScoreSource>,
    statistical: Box<dyn ScoreSource>,
    probabilistic: Box<dyn ScoreSource>,
    enrichment: Box<dyn EnrichmentSource>,
    weights: AggregationWeights,
    policy: EngineFailurePolicy,
}

impl DiagnosisSession {
    /// Compose a session from explicit engines and an enrichment source.
    pub fn new(
        symbolic: Box<dyn ScoreSource>,
        statistical: Box<dyn ScoreSource>,
        probabilistic: Box<dyn ScoreSource>,
        enrichment: Box<dyn EnrichmentSource>,
    ) -> Self {
        Self {
            symbolic,
            statistical,
            probabilistic,
            enrichment,
            weights: AggregationWeights::default(),
            policy: EngineFailurePolicy::default(),
        }
    }

    /// Load all engines and the ontology store from one artifact set.
    ///
    /// A missing file in an explicit data directory is a hard error. A
    /// corrupt engine artifact is not: the engine is stubbed out and its
    /// `BackingEngineUnavailable` surfaces at the barrier, where the
    /// failure policy decides between degrading and aborting.
    pub fn from_artifacts(artifacts: &ArtifactSet) -> PlantAidResult<Self> {
        let symbolic = engine_or_stub(RuleEngineAdapter::load(&artifacts.rules()?));
        let statistical = engine_or_stub(ClassifierAdapter::load(&artifacts.classifier()?));
        let probabilistic = engine_or_stub(BayesNetAdapter::load(&artifacts.bayes_net()?));
        let ontology = OntologyStore::load(&artifacts.ontology()?)?;
        Ok(Self::new(
            symbolic,
            statistical,
            probabilistic,
            Box::new(ontology),
        ))
    }

    pub fn with_weights(mut self, weights: AggregationWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_failure_policy(mut self, policy: EngineFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn weights(&self) -> &AggregationWeights {
        &self.weights
    }

    /// The engines in canonical order, for the `info` surface.
    pub fn engines(&self) -> [&dyn ScoreSource; 3] {
        [
            self.symbolic.as_ref(),
            self.statistical.as_ref(),
            self.probabilistic.as_ref(),
        ]
    }

    /// Run one diagnostic session to completion.
    ///
    /// Weights are validated before any engine runs, so a bad override
    /// never wastes an inference pass.
    pub fn run(&self, input: &DiagnosticInput) -> PlantAidResult<DiagnosticReport> {
        self.weights.validate()?;

        tracing::info!(
            plant = %input.plant(),
            season = %input.season(),
            symptoms = input.symptoms().len(),
            "diagnostic session started"
        );

        let ((symbolic, statistical), probabilistic) = join(
            || join(|| self.symbolic.produce(input), || self.statistical.produce(input)),
            || self.probabilistic.produce(input),
        );

        let mut degraded = Vec::new();
        let symbolic = self.settle(symbolic, &mut degraded)?;
        let statistical = self.settle(statistical, &mut degraded)?;
        let probabilistic = self.settle(probabilistic, &mut degraded)?;

        let triples = normalize(&symbolic, &statistical, &probabilistic);
        let ranked = aggregate(&triples, &self.weights)?;

        let enrichment = self.enrich(ranked.top().disease);

        tracing::info!(
            diagnosis = %ranked.top().disease,
            composite = ranked.top().composite,
            degraded = degraded.len(),
            "diagnostic session complete"
        );

        Ok(assemble(ranked, enrichment, degraded))
    }

    /// Apply the failure policy to one engine's outcome at the barrier.
    fn settle(
        &self,
        outcome: Result<EngineScoreMap, AdapterError>,
        degraded: &mut Vec<EngineKind>,
    ) -> PlantAidResult<EngineScoreMap> {
        match outcome {
            Ok(scores) => Ok(scores),
            Err(err) => match self.policy {
                EngineFailurePolicy::Fail => Err(err.into()),
                EngineFailurePolicy::Degrade => {
                    tracing::warn!(engine = %err.engine(), %err, "engine degraded");
                    degraded.push(err.engine());
                    Ok(EngineScoreMap::new())
                }
            },
        }
    }

    /// Enrichment is best-effort: a miss or store error costs only the
    /// knowledge section, never the diagnosis.
    fn enrich(&self, disease: crate::vocab::Disease) -> Option<KnowledgeEnrichment> {
        match self.enrichment.lookup(disease) {
            Ok(enrichment) => Some(enrichment),
            Err(err) => {
                tracing::warn!(%disease, %err, "enrichment unavailable");
                None
            }
        }
    }
}

/// Placeholder for an engine whose artifact failed to load. Keeps the
/// degrade-or-abort decision at the barrier instead of at startup.
struct UnavailableEngine {
    kind: EngineKind,
    artifact: String,
    message: String,
}

impl ScoreSource for UnavailableEngine {
    fn kind(&self) -> EngineKind {
        self.kind
    }

    fn artifact(&self) -> String {
        self.artifact.clone()
    }

    fn produce(&self, _input: &DiagnosticInput) -> Result<EngineScoreMap, AdapterError> {
        Err(AdapterError::BackingEngineUnavailable {
            engine: self.kind,
            artifact: self.artifact.clone(),
            message: self.message.clone(),
        })
    }
}

fn engine_or_stub<E: ScoreSource + 'static>(
    loaded: Result<E, AdapterError>,
) -> Box<dyn ScoreSource> {
    match loaded {
        Ok(engine) => Box::new(engine),
        Err(AdapterError::BackingEngineUnavailable {
            engine,
            artifact,
            message,
        }) => {
            tracing::warn!(%engine, %artifact, message, "engine failed to load");
            Box::new(UnavailableEngine {
                kind: engine,
                artifact,
                message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AdapterResult, FusionError, KnowledgeError, KnowledgeResult,
        PlantAidError};
    use crate::vocab::{Disease, Plant, Season, Symptom};

    fn session() -> DiagnosisSession {
        DiagnosisSession::from_artifacts(&ArtifactSet::bundled()).unwrap()
    }

    fn olive_peacock_eye_input() -> DiagnosticInput {
        DiagnosticInput::new(
            Plant::Olive,
            [Symptom::CircularGraySpots, Symptom::LeafYellowing],
            Season::Spring,
        )
    }

    struct BrokenEngine(EngineKind);

    impl ScoreSource for BrokenEngine {
        fn kind(&self) -> EngineKind {
            self.0
        }

        fn artifact(&self) -> String {
            "broken".into()
        }

        fn produce(&self, _input: &DiagnosticInput) -> AdapterResult<EngineScoreMap> {
            Err(AdapterError::BackingEngineUnavailable {
                engine: self.0,
                artifact: "broken".into(),
                message: "simulated failure".into(),
            })
        }
    }

    struct NoEnrichment;

    impl EnrichmentSource for NoEnrichment {
        fn lookup(&self, disease: Disease) -> KnowledgeResult<KnowledgeEnrichment> {
            Err(KnowledgeError::UnknownDiseaseEntity {
                disease,
                individual: disease.ontology_name().to_string(),
            })
        }
    }

    #[test]
    fn full_session_diagnoses_peacock_eye() {
        let report = session().run(&olive_peacock_eye_input()).unwrap();
        assert_eq!(report.top().disease, Disease::PeacockEye);
        assert!(report.top().composite > 0.5);
        assert!(report.enrichment().is_some());
        assert!(!report.is_degraded());
    }

    #[test]
    fn degraded_engine_is_scored_missing_and_flagged() {
        let artifacts = ArtifactSet::bundled();
        let session = DiagnosisSession::new(
            Box::new(RuleEngineAdapter::load(&artifacts.rules().unwrap()).unwrap()),
            Box::new(BrokenEngine(EngineKind::Statistical)),
            Box::new(BayesNetAdapter::load(&artifacts.bayes_net().unwrap()).unwrap()),
            Box::new(OntologyStore::load(&artifacts.ontology().unwrap()).unwrap()),
        );

        let report = session.run(&olive_peacock_eye_input()).unwrap();
        assert_eq!(report.degraded_engines(), [EngineKind::Statistical]);
        assert!(report.top().scores.statistical.is_missing());
        assert_eq!(report.top().disease, Disease::PeacockEye);
    }

    #[test]
    fn fail_policy_aborts_on_engine_error() {
        let artifacts = ArtifactSet::bundled();
        let session = DiagnosisSession::new(
            Box::new(RuleEngineAdapter::load(&artifacts.rules().unwrap()).unwrap()),
            Box::new(BrokenEngine(EngineKind::Statistical)),
            Box::new(BayesNetAdapter::load(&artifacts.bayes_net().unwrap()).unwrap()),
            Box::new(OntologyStore::load(&artifacts.ontology().unwrap()).unwrap()),
        )
        .with_failure_policy(EngineFailurePolicy::Fail);

        assert!(matches!(
            session.run(&olive_peacock_eye_input()),
            Err(PlantAidError::Adapter(_))
        ));
    }

    #[test]
    fn invalid_weight_override_fails_before_engines_run() {
        let session = session().with_weights(AggregationWeights {
            probabilistic: 0.6,
            symbolic: 0.3,
            statistical: 0.3,
        });
        assert!(matches!(
            session.run(&olive_peacock_eye_input()),
            Err(PlantAidError::Fusion(
                FusionError::InvalidWeightConfiguration { .. }
            ))
        ));
    }

    #[test]
    fn enrichment_miss_still_produces_a_report() {
        let artifacts = ArtifactSet::bundled();
        let session = DiagnosisSession::new(
            Box::new(RuleEngineAdapter::load(&artifacts.rules().unwrap()).unwrap()),
            Box::new(ClassifierAdapter::load(&artifacts.classifier().unwrap()).unwrap()),
            Box::new(BayesNetAdapter::load(&artifacts.bayes_net().unwrap()).unwrap()),
            Box::new(NoEnrichment),
        );

        let report = session.run(&olive_peacock_eye_input()).unwrap();
        assert_eq!(report.top().disease, Disease::PeacockEye);
        assert!(report.enrichment().is_none());
    }

    #[test]
    fn report_is_deterministic_across_runs() {
        let session = session();
        let input = olive_peacock_eye_input();
        let first = session.run(&input).unwrap();
        let second = session.run(&input).unwrap();
        assert_eq!(first, second);
    }
}
