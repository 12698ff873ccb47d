//! # plantaid
//!
//! A hybrid plant disease diagnostic engine fusing three independent
//! reasoning paradigms over one shared observation:
//!
//! - **Symbolic** (`adapters::symbolic`): a declarative rule engine with
//!   expert confidence levels, exclusion rules, and seasonal modulation
//! - **Statistical** (`adapters::statistical`): a linear classifier with
//!   softmax confidence over a fixed feature encoding
//! - **Probabilistic** (`adapters::probabilistic`): a naive Bayesian
//!   network scoring the full evidence assignment
//!
//! Engine outputs are normalized onto a shared disease key space
//! (`fusion::normalize`), fused into a weighted composite with
//! deterministic tie-breaking (`fusion::aggregate`), enriched from an
//! RDF ontology (`knowledge`), and assembled into one immutable report
//! (`fusion::report`). The `session` module wires the pipeline together.
//!
//! ## Library usage
//!
//! ```no_run
//! use plantaid::artifacts::ArtifactSet;
//! use plantaid::input::DiagnosticInput;
//! use plantaid::session::DiagnosisSession;
//! use plantaid::vocab::{Plant, Season, Symptom};
//!
//! let session = DiagnosisSession::from_artifacts(&ArtifactSet::bundled()).unwrap();
//! let input = DiagnosticInput::new(
//!     Plant::Olive,
//!     [Symptom::CircularGraySpots, Symptom::LeafYellowing],
//!     Season::Spring,
//! );
//! let report = session.run(&input).unwrap();
//! println!("{}", report.top().disease);
//! ```

pub mod adapters;
pub mod artifacts;
pub mod error;
pub mod fusion;
pub mod input;
pub mod knowledge;
pub mod session;
pub mod vocab;

pub use error::{PlantAidError, PlantAidResult};
pub use fusion::report::DiagnosticReport;
pub use input::DiagnosticInput;
pub use session::DiagnosisSession;
