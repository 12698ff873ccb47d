//! Symbolic rule engine adapter.
//!
//! Data-driven diagnostic rules in the expert-system tradition: each rule
//! names the symptoms that must be present (and absent) for one disease on
//! one plant, at a symbolic confidence level. Rules are structs, not code,
//! loaded from a TOML artifact. Evaluation is a single pass: match rules,
//! keep the strongest level per disease, drop excluded diagnoses, upgrade
//! fully-supported ones, and downgrade out-of-season `high` matches.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::artifacts::Artifact;
use crate::error::{AdapterError, AdapterResult, ArtifactResult};
use crate::input::DiagnosticInput;
use crate::vocab::{Disease, Plant, Season, Symptom};

use super::{EngineKind, EngineScoreMap, ScoreSource};

// ---------------------------------------------------------------------------
// Rule data model
// ---------------------------------------------------------------------------

/// Symbolic confidence levels, mapped to numeric scores for fusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
    VeryHigh,
    Critical,
}

impl ConfidenceLevel {
    pub fn value(self) -> f32 {
        match self {
            ConfidenceLevel::Low => 0.3,
            ConfidenceLevel::Medium => 0.5,
            ConfidenceLevel::High => 0.7,
            ConfidenceLevel::VeryHigh => 0.9,
            ConfidenceLevel::Critical => 1.0,
        }
    }

    /// One level weaker, saturating at `Low`.
    pub fn downgraded(self) -> Self {
        match self {
            ConfidenceLevel::Low | ConfidenceLevel::Medium => ConfidenceLevel::Low,
            ConfidenceLevel::High => ConfidenceLevel::Medium,
            ConfidenceLevel::VeryHigh => ConfidenceLevel::High,
            ConfidenceLevel::Critical => ConfidenceLevel::VeryHigh,
        }
    }
}

/// A single diagnostic rule: symptom pattern in, confidence level out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticRule {
    pub name: String,
    pub disease: Disease,
    pub plant: Plant,
    pub requires: Vec<Symptom>,
    #[serde(default)]
    pub absent: Vec<Symptom>,
    pub confidence: ConfidenceLevel,
}

impl DiagnosticRule {
    /// Whether this rule fires for the given input.
    fn matches(&self, input: &DiagnosticInput) -> bool {
        self.plant == input.plant()
            && self.requires.iter().all(|s| input.has_symptom(*s))
            && !self.absent.iter().any(|s| input.has_symptom(*s))
    }
}

/// Differential-diagnosis exclusion: an observed symptom that rules a
/// disease out regardless of what else matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub disease: Disease,
    pub when_present: Symptom,
}

/// Per-disease seasonality and symptom coverage, used for confidence
/// modulation after the base rules have matched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiseaseProfile {
    #[serde(default)]
    pub active_seasons: Vec<Season>,
    #[serde(default)]
    pub related_symptoms: Vec<Symptom>,
    /// Discriminant symptom; a completeness upgrade requires it.
    #[serde(default)]
    pub key_symptom: Option<Symptom>,
}

/// The full rule artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    pub version: String,
    #[serde(rename = "rule", default)]
    pub rules: Vec<DiagnosticRule>,
    #[serde(rename = "exclusion", default)]
    pub exclusions: Vec<ExclusionRule>,
    #[serde(default)]
    pub profiles: BTreeMap<Disease, DiseaseProfile>,
}

impl RuleSet {
    pub fn parse(artifact: &Artifact) -> ArtifactResult<Self> {
        toml::from_str(&artifact.content).map_err(|e| artifact.parse_error(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// Score source backed by the symbolic rule set.
#[derive(Debug)]
pub struct RuleEngineAdapter {
    rules: RuleSet,
    artifact: String,
}

impl RuleEngineAdapter {
    /// Load the rule set from a resolved artifact.
    pub fn load(artifact: &Artifact) -> AdapterResult<Self> {
        let rules = RuleSet::parse(artifact).map_err(|e| {
            AdapterError::BackingEngineUnavailable {
                engine: EngineKind::Symbolic,
                artifact: artifact.source.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Self {
            rules,
            artifact: artifact.source.to_string(),
        })
    }

    fn profile(&self, disease: Disease) -> DiseaseProfile {
        self.rules.profiles.get(&disease).cloned().unwrap_or_default()
    }

    /// Confidence modulation after base matching, in order:
    /// completeness upgrade first, seasonal downgrade second (the
    /// downgrade only touches a plain `high`, so upgraded matches keep
    /// their strength).
    fn modulate(
        &self,
        disease: Disease,
        level: ConfidenceLevel,
        input: &DiagnosticInput,
    ) -> ConfidenceLevel {
        let profile = self.profile(disease);

        let observed_related = profile
            .related_symptoms
            .iter()
            .filter(|s| input.has_symptom(**s))
            .count();
        let key_present = profile.key_symptom.is_none_or(|s| input.has_symptom(s));

        let mut level = if observed_related >= 3 && key_present {
            ConfidenceLevel::Critical
        } else {
            level
        };

        let in_season = profile.active_seasons.is_empty()
            || profile.active_seasons.contains(&input.season());
        if !in_season && level == ConfidenceLevel::High {
            level = level.downgraded();
        }

        level
    }
}

impl ScoreSource for RuleEngineAdapter {
    fn kind(&self) -> EngineKind {
        EngineKind::Symbolic
    }

    fn artifact(&self) -> String {
        self.artifact.clone()
    }

    fn produce(&self, input: &DiagnosticInput) -> AdapterResult<EngineScoreMap> {
        // Strongest matching level per disease.
        let mut matched: BTreeMap<Disease, ConfidenceLevel> = BTreeMap::new();
        for rule in &self.rules.rules {
            if rule.matches(input) {
                matched
                    .entry(rule.disease)
                    .and_modify(|level| *level = (*level).max(rule.confidence))
                    .or_insert(rule.confidence);
            }
        }

        // Differential exclusions.
        for exclusion in &self.rules.exclusions {
            if input.has_symptom(exclusion.when_present) {
                matched.remove(&exclusion.disease);
            }
        }

        let scores: EngineScoreMap = matched
            .into_iter()
            .map(|(disease, level)| {
                let level = self.modulate(disease, level, input);
                (disease, level.value())
            })
            .collect();

        tracing::debug!(
            engine = %self.kind(),
            candidates = scores.len(),
            "rule engine evaluation complete"
        );
        Ok(scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::ArtifactSet;

    fn adapter() -> RuleEngineAdapter {
        RuleEngineAdapter::load(&ArtifactSet::bundled().rules().unwrap()).unwrap()
    }

    fn diagnose(
        plant: Plant,
        symptoms: &[Symptom],
        season: Season,
    ) -> EngineScoreMap {
        let input = DiagnosticInput::new(plant, symptoms.iter().copied(), season);
        adapter().produce(&input).unwrap()
    }

    #[test]
    fn peacock_eye_high_in_season() {
        let scores = diagnose(
            Plant::Olive,
            &[Symptom::CircularGraySpots, Symptom::LeafYellowing],
            Season::Spring,
        );
        assert_eq!(scores[&Disease::PeacockEye], 0.7);
    }

    #[test]
    fn peacock_eye_downgraded_out_of_season() {
        let scores = diagnose(
            Plant::Olive,
            &[Symptom::CircularGraySpots, Symptom::LeafYellowing],
            Season::Summer,
        );
        assert_eq!(scores[&Disease::PeacockEye], 0.5);
    }

    #[test]
    fn full_symptom_coverage_upgrades_to_critical() {
        let scores = diagnose(
            Plant::Olive,
            &[
                Symptom::CircularGraySpots,
                Symptom::LeafYellowing,
                Symptom::PrematureLeafDrop,
            ],
            Season::Spring,
        );
        assert_eq!(scores[&Disease::PeacockEye], 1.0);
    }

    #[test]
    fn powdery_mildew_excludes_black_spot() {
        let scores = diagnose(
            Plant::Rose,
            &[Symptom::BlackLeafSpots, Symptom::PowderyWhiteMold],
            Season::Spring,
        );
        assert!(!scores.contains_key(&Disease::RoseBlackSpot));
        assert!(!scores.contains_key(&Disease::RosePowderyMildew));
    }

    #[test]
    fn fusarium_critical_with_wilting() {
        let scores = diagnose(
            Plant::Basil,
            &[Symptom::StemBlackening, Symptom::PlantWilting],
            Season::Summer,
        );
        assert_eq!(scores[&Disease::BasilFusariumWilt], 1.0);
        // The exclusion also removes downy mildew from consideration.
        assert!(!scores.contains_key(&Disease::BasilDownyMildew));
    }

    #[test]
    fn no_match_means_absent_not_zero() {
        let scores = diagnose(Plant::Olive, &[Symptom::PowderyWhiteMold], Season::Spring);
        assert!(scores.is_empty());
    }

    #[test]
    fn wrong_plant_does_not_match() {
        let scores = diagnose(Plant::Basil, &[Symptom::BlackLeafSpots], Season::Spring);
        assert!(!scores.contains_key(&Disease::RoseBlackSpot));
    }

    #[test]
    fn corrupt_artifact_is_engine_unavailable() {
        let artifact = Artifact::bundled("rules.toml", "version = [broken");
        let err = RuleEngineAdapter::load(&artifact).unwrap_err();
        assert_eq!(err.engine(), EngineKind::Symbolic);
    }
}
