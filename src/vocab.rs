//! The closed diagnostic vocabulary: plants, seasons, symptoms, diseases.
//!
//! Every subsystem speaks these canonical identifiers; free-form strings
//! are rejected at the boundary with a `VocabError` naming the offender.
//! The disease type also carries the CamelCase individual name used by
//! the ontology store, so the mapping lives in exactly one place.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{VocabError, VocabResult};

// ---------------------------------------------------------------------------
// Plants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plant {
    Olive,
    Rose,
    Basil,
}

impl Plant {
    pub const ALL: [Plant; 3] = [Plant::Olive, Plant::Rose, Plant::Basil];

    pub fn as_str(self) -> &'static str {
        match self {
            Plant::Olive => "olive",
            Plant::Rose => "rose",
            Plant::Basil => "basil",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Plant::Olive => "Olive",
            Plant::Rose => "Rose",
            Plant::Basil => "Basil",
        }
    }

    pub fn parse(name: &str) -> VocabResult<Self> {
        let needle = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == needle)
            .ok_or_else(|| VocabError::UnknownPlant {
                name: name.to_string(),
            })
    }
}

impl std::fmt::Display for Plant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Seasons
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    MildWinter,
}

impl Season {
    pub const ALL: [Season; 4] = [
        Season::Spring,
        Season::Summer,
        Season::Autumn,
        Season::MildWinter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::MildWinter => "mild_winter",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::MildWinter => "Mild winter",
        }
    }

    pub fn parse(name: &str) -> VocabResult<Self> {
        let needle = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == needle)
            .ok_or_else(|| VocabError::UnknownSeason {
                name: name.to_string(),
            })
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Symptoms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symptom {
    CircularGraySpots,
    LeafYellowing,
    PrematureLeafDrop,
    BranchGalls,
    DarkBrownFruitSpots,
    BlackLeafSpots,
    PowderyWhiteMold,
    StemBlackening,
    PlantWilting,
}

impl Symptom {
    pub const ALL: [Symptom; 9] = [
        Symptom::CircularGraySpots,
        Symptom::LeafYellowing,
        Symptom::PrematureLeafDrop,
        Symptom::BranchGalls,
        Symptom::DarkBrownFruitSpots,
        Symptom::BlackLeafSpots,
        Symptom::PowderyWhiteMold,
        Symptom::StemBlackening,
        Symptom::PlantWilting,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Symptom::CircularGraySpots => "circular_gray_spots",
            Symptom::LeafYellowing => "leaf_yellowing",
            Symptom::PrematureLeafDrop => "premature_leaf_drop",
            Symptom::BranchGalls => "branch_galls",
            Symptom::DarkBrownFruitSpots => "dark_brown_fruit_spots",
            Symptom::BlackLeafSpots => "black_leaf_spots",
            Symptom::PowderyWhiteMold => "powdery_white_mold",
            Symptom::StemBlackening => "stem_blackening",
            Symptom::PlantWilting => "plant_wilting",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Symptom::CircularGraySpots => "Circular gray spots on leaves",
            Symptom::LeafYellowing => "Leaf yellowing",
            Symptom::PrematureLeafDrop => "Premature leaf drop",
            Symptom::BranchGalls => "Galls on branches",
            Symptom::DarkBrownFruitSpots => "Dark brown spots on fruit",
            Symptom::BlackLeafSpots => "Black spots on leaves",
            Symptom::PowderyWhiteMold => "Powdery white mold",
            Symptom::StemBlackening => "Stem blackening",
            Symptom::PlantWilting => "Plant wilting",
        }
    }

    pub fn parse(name: &str) -> VocabResult<Self> {
        let needle = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == needle)
            .ok_or_else(|| VocabError::UnknownSymptom {
                name: name.to_string(),
            })
    }
}

impl std::fmt::Display for Symptom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Diseases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disease {
    PeacockEye,
    OliveKnot,
    OliveAnthracnose,
    RoseBlackSpot,
    RosePowderyMildew,
    RoseDownyMildew,
    BasilDownyMildew,
    BasilFusariumWilt,
}

impl Disease {
    pub const ALL: [Disease; 8] = [
        Disease::PeacockEye,
        Disease::OliveKnot,
        Disease::OliveAnthracnose,
        Disease::RoseBlackSpot,
        Disease::RosePowderyMildew,
        Disease::RoseDownyMildew,
        Disease::BasilDownyMildew,
        Disease::BasilFusariumWilt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Disease::PeacockEye => "peacock_eye",
            Disease::OliveKnot => "olive_knot",
            Disease::OliveAnthracnose => "olive_anthracnose",
            Disease::RoseBlackSpot => "rose_black_spot",
            Disease::RosePowderyMildew => "rose_powdery_mildew",
            Disease::RoseDownyMildew => "rose_downy_mildew",
            Disease::BasilDownyMildew => "basil_downy_mildew",
            Disease::BasilFusariumWilt => "basil_fusarium_wilt",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Disease::PeacockEye => "Peacock eye",
            Disease::OliveKnot => "Olive knot",
            Disease::OliveAnthracnose => "Olive anthracnose",
            Disease::RoseBlackSpot => "Rose black spot",
            Disease::RosePowderyMildew => "Rose powdery mildew",
            Disease::RoseDownyMildew => "Rose downy mildew",
            Disease::BasilDownyMildew => "Basil downy mildew",
            Disease::BasilFusariumWilt => "Basil fusarium wilt",
        }
    }

    /// The CamelCase individual name this disease has in the ontology.
    pub fn ontology_name(self) -> &'static str {
        match self {
            Disease::PeacockEye => "PeacockEye",
            Disease::OliveKnot => "OliveKnot",
            Disease::OliveAnthracnose => "OliveAnthracnose",
            Disease::RoseBlackSpot => "RoseBlackSpot",
            Disease::RosePowderyMildew => "RosePowderyMildew",
            Disease::RoseDownyMildew => "RoseDownyMildew",
            Disease::BasilDownyMildew => "BasilDownyMildew",
            Disease::BasilFusariumWilt => "BasilFusariumWilt",
        }
    }

    pub fn parse(name: &str) -> VocabResult<Self> {
        let needle = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == needle)
            .ok_or_else(|| VocabError::UnknownDisease {
                name: name.to_string(),
            })
    }
}

// Ordered by the canonical identifier, not declaration order, so that
// ranking tie-breaks and BTreeMap iteration match the documented
// lexical order.
impl Ord for Disease {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Disease {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Disease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_canonical_identifiers_case_insensitively() {
        assert_eq!(Plant::parse("Olive").unwrap(), Plant::Olive);
        assert_eq!(Season::parse(" MILD_WINTER ").unwrap(), Season::MildWinter);
        assert_eq!(
            Symptom::parse("circular_gray_spots").unwrap(),
            Symptom::CircularGraySpots
        );
        assert_eq!(Disease::parse("peacock_eye").unwrap(), Disease::PeacockEye);
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert!(matches!(
            Plant::parse("cactus"),
            Err(VocabError::UnknownPlant { .. })
        ));
        assert!(matches!(
            Season::parse("winter"),
            Err(VocabError::UnknownSeason { .. })
        ));
        assert!(matches!(
            Symptom::parse("spots"),
            Err(VocabError::UnknownSymptom { .. })
        ));
        assert!(matches!(
            Disease::parse("rust"),
            Err(VocabError::UnknownDisease { .. })
        ));
    }

    #[test]
    fn disease_order_is_lexical_on_the_identifier() {
        let mut sorted = Disease::ALL.to_vec();
        sorted.sort();
        let ids: Vec<_> = sorted.iter().map(|d| d.as_str()).collect();
        let mut expected = ids.clone();
        expected.sort();
        assert_eq!(ids, expected);
        assert!(Disease::BasilDownyMildew < Disease::PeacockEye);
    }

    #[test]
    fn serde_uses_the_canonical_identifier() {
        let json = serde_json::to_string(&Disease::RoseBlackSpot).unwrap();
        assert_eq!(json, "\"rose_black_spot\"");
        let back: Disease = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Disease::RoseBlackSpot);
    }

    #[test]
    fn every_disease_has_an_ontology_individual() {
        for disease in Disease::ALL {
            let name = disease.ontology_name();
            assert!(name.chars().next().unwrap().is_ascii_uppercase());
            assert!(!name.contains('_'));
        }
    }
}
