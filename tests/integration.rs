//! End-to-end tests: artifact resolution through report assembly.

use std::fs;
use std::path::Path;

use plantaid::adapters::EngineKind;
use plantaid::artifacts::{
    ArtifactSet, BAYES_NET_FILE, BUNDLED_BAYES_NET, BUNDLED_CLASSIFIER, BUNDLED_ONTOLOGY,
    BUNDLED_RULES, CLASSIFIER_FILE, ONTOLOGY_FILE, RULES_FILE,
};
use plantaid::error::{FusionError, PlantAidError};
use plantaid::fusion::aggregate::AggregationWeights;
use plantaid::input::DiagnosticInput;
use plantaid::session::{DiagnosisSession, EngineFailurePolicy};
use plantaid::vocab::{Disease, Plant, Season, Symptom};

fn olive_input() -> DiagnosticInput {
    DiagnosticInput::new(
        Plant::Olive,
        [Symptom::CircularGraySpots, Symptom::LeafYellowing],
        Season::Spring,
    )
}

fn seed_data_dir(dir: &Path) {
    fs::write(dir.join(RULES_FILE), BUNDLED_RULES).unwrap();
    fs::write(dir.join(CLASSIFIER_FILE), BUNDLED_CLASSIFIER).unwrap();
    fs::write(dir.join(BAYES_NET_FILE), BUNDLED_BAYES_NET).unwrap();
    fs::write(dir.join(ONTOLOGY_FILE), BUNDLED_ONTOLOGY).unwrap();
}

#[test]
fn bundled_artifacts_diagnose_and_enrich() {
    let session = DiagnosisSession::from_artifacts(&ArtifactSet::bundled()).unwrap();
    let report = session.run(&olive_input()).unwrap();

    assert_eq!(report.top().disease, Disease::PeacockEye);
    assert!(!report.is_degraded());

    // All three engines had an opinion on the winner.
    let scores = report.top().scores;
    assert!(!scores.symbolic.is_missing());
    assert!(!scores.statistical.is_missing());
    assert!(!scores.probabilistic.is_missing());

    let enrichment = report.enrichment().unwrap();
    assert_eq!(enrichment.scientific_name, "Spilocaea oleagina");
    assert!(!enrichment.treatments.is_empty());
}

#[test]
fn data_dir_override_matches_bundled_behavior() {
    let dir = tempfile::TempDir::new().unwrap();
    seed_data_dir(dir.path());

    let bundled = DiagnosisSession::from_artifacts(&ArtifactSet::bundled()).unwrap();
    let external =
        DiagnosisSession::from_artifacts(&ArtifactSet::from_dir(dir.path())).unwrap();

    let input = olive_input();
    assert_eq!(
        bundled.run(&input).unwrap().ranked(),
        external.run(&input).unwrap().ranked()
    );
}

#[test]
fn missing_file_in_explicit_data_dir_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    // No files at all: an explicit data directory never falls back.
    assert!(matches!(
        DiagnosisSession::from_artifacts(&ArtifactSet::from_dir(dir.path())),
        Err(PlantAidError::Artifact(_))
    ));
}

#[test]
fn corrupt_engine_artifact_degrades_by_default() {
    let dir = tempfile::TempDir::new().unwrap();
    seed_data_dir(dir.path());
    fs::write(dir.path().join(CLASSIFIER_FILE), "{ not json").unwrap();

    let session = DiagnosisSession::from_artifacts(&ArtifactSet::from_dir(dir.path())).unwrap();
    let report = session.run(&olive_input()).unwrap();

    assert_eq!(report.degraded_engines(), [EngineKind::Statistical]);
    assert!(report.top().scores.statistical.is_missing());
    // The remaining engines still carry the diagnosis.
    assert_eq!(report.top().disease, Disease::PeacockEye);
}

#[test]
fn corrupt_engine_artifact_aborts_under_fail_policy() {
    let dir = tempfile::TempDir::new().unwrap();
    seed_data_dir(dir.path());
    fs::write(dir.path().join(CLASSIFIER_FILE), "{ not json").unwrap();

    let session = DiagnosisSession::from_artifacts(&ArtifactSet::from_dir(dir.path()))
        .unwrap()
        .with_failure_policy(EngineFailurePolicy::Fail);

    assert!(matches!(
        session.run(&olive_input()),
        Err(PlantAidError::Adapter(_))
    ));
}

#[test]
fn all_engines_down_is_no_candidate_diagnosis() {
    let dir = tempfile::TempDir::new().unwrap();
    seed_data_dir(dir.path());
    fs::write(dir.path().join(RULES_FILE), "version = [broken").unwrap();
    fs::write(dir.path().join(CLASSIFIER_FILE), "{ not json").unwrap();
    fs::write(dir.path().join(BAYES_NET_FILE), "{ not json").unwrap();

    let session = DiagnosisSession::from_artifacts(&ArtifactSet::from_dir(dir.path())).unwrap();
    assert!(matches!(
        session.run(&olive_input()),
        Err(PlantAidError::Fusion(FusionError::NoCandidateDiagnosis))
    ));
}

#[test]
fn weight_overrides_change_the_blend() {
    let session = DiagnosisSession::from_artifacts(&ArtifactSet::bundled())
        .unwrap()
        .with_weights(AggregationWeights {
            probabilistic: 1.0,
            symbolic: 0.0,
            statistical: 0.0,
        });

    let report = session.run(&olive_input()).unwrap();
    let top = report.top();
    // With all weight on the network, composite equals its posterior.
    assert!(
        (top.composite - top.scores.probabilistic.value_or_zero()).abs() < 1e-6
    );
}

#[test]
fn mutually_exclusive_symptoms_still_produce_a_report() {
    let session = DiagnosisSession::from_artifacts(&ArtifactSet::bundled()).unwrap();
    let input = DiagnosticInput::new(
        Plant::Rose,
        [Symptom::BlackLeafSpots, Symptom::PowderyWhiteMold],
        Season::Spring,
    );

    // The rule engine excludes both rose candidates; the other engines
    // still rank the full union.
    let report = session.run(&input).unwrap();
    assert!(report.top().scores.symbolic.is_missing());
    assert!(!report.top().scores.probabilistic.is_missing());
}

#[test]
fn ranking_lists_every_candidate_strongest_first() {
    let session = DiagnosisSession::from_artifacts(&ArtifactSet::bundled()).unwrap();
    let report = session.run(&olive_input()).unwrap();

    // The network reports a full distribution, so the union covers all
    // known diseases.
    assert_eq!(report.ranked().len(), Disease::ALL.len());
    let composites: Vec<f32> = report
        .ranked()
        .entries()
        .iter()
        .map(|e| e.composite)
        .collect();
    assert!(composites.windows(2).all(|w| w[0] >= w[1]));
}
