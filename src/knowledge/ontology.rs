//! RDF ontology store backed by oxigraph.
//!
//! Disease and treatment individuals are declared in a TOML artifact and
//! inserted as quads under the project namespace at load time; lookups
//! run SPARQL SELECT for the data properties plus one `requiresTreatment`
//! relation traversal. The canonical disease identifier is resolved to
//! the ontology's CamelCase individual name through the shared vocabulary
//! table, never by string munging at the call site.

use oxigraph::model::{GraphNameRef, Literal, NamedNode, Quad, Term};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use serde::{Deserialize, Serialize};

use crate::artifacts::Artifact;
use crate::error::{ArtifactResult, KnowledgeError, KnowledgeResult};
use crate::fusion::report::{KnowledgeEnrichment, Treatment};
use crate::vocab::{Disease, Plant};

use super::EnrichmentSource;

// ---------------------------------------------------------------------------
// Ontology artifact
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreatmentEntry {
    pub individual: String,
    pub label: String,
    pub description: String,
    #[serde(default)]
    pub dosage: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseEntry {
    pub individual: String,
    pub label: String,
    pub scientific_name: String,
    pub description: String,
    pub severity: u8,
    pub active_period: String,
    pub affects: Plant,
    #[serde(default)]
    pub treatments: Vec<String>,
}

/// The declarative ontology document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologyDoc {
    pub namespace: String,
    #[serde(rename = "treatment", default)]
    pub treatments: Vec<TreatmentEntry>,
    #[serde(rename = "disease", default)]
    pub diseases: Vec<DiseaseEntry>,
}

impl OntologyDoc {
    pub fn parse(artifact: &Artifact) -> ArtifactResult<Self> {
        toml::from_str(&artifact.content).map_err(|e| artifact.parse_error(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// In-memory SPARQL-capable ontology store.
pub struct OntologyStore {
    store: Store,
    namespace: String,
}

impl OntologyStore {
    /// Load the ontology artifact into a fresh RDF store.
    pub fn load(artifact: &Artifact) -> KnowledgeResult<Self> {
        let doc = OntologyDoc::parse(artifact)?;
        let store = Store::new().map_err(|e| KnowledgeError::Sparql {
            message: format!("failed to create oxigraph store: {e}"),
        })?;

        let this = Self {
            store,
            namespace: doc.namespace.clone(),
        };

        for treatment in &doc.treatments {
            let subject = this.iri(&treatment.individual)?;
            this.insert_literal(&subject, "label", &treatment.label)?;
            this.insert_literal(&subject, "description", &treatment.description)?;
            if let Some(dosage) = &treatment.dosage {
                this.insert_literal(&subject, "dosage", dosage)?;
            }
        }

        for disease in &doc.diseases {
            let subject = this.iri(&disease.individual)?;
            this.insert_literal(&subject, "label", &disease.label)?;
            this.insert_literal(&subject, "scientificName", &disease.scientific_name)?;
            this.insert_literal(&subject, "description", &disease.description)?;
            this.insert_literal(&subject, "activePeriod", &disease.active_period)?;
            this.insert(
                &subject,
                "severity",
                Literal::from(i64::from(disease.severity)),
            )?;
            this.insert_literal(&subject, "affects", disease.affects.as_str())?;
            for treatment in &disease.treatments {
                let object = this.iri(treatment)?;
                this.insert(&subject, "requiresTreatment", object)?;
            }
        }

        tracing::info!(
            diseases = doc.diseases.len(),
            treatments = doc.treatments.len(),
            "ontology store loaded"
        );
        Ok(this)
    }

    fn iri(&self, local: &str) -> KnowledgeResult<NamedNode> {
        NamedNode::new(format!("{}{local}", self.namespace)).map_err(|e| {
            KnowledgeError::Sparql {
                message: format!("invalid IRI for \"{local}\": {e}"),
            }
        })
    }

    fn insert(
        &self,
        subject: &NamedNode,
        predicate: &str,
        object: impl Into<Term>,
    ) -> KnowledgeResult<()> {
        let predicate = self.iri(predicate)?;
        let quad = Quad::new(
            subject.clone(),
            predicate,
            object,
            GraphNameRef::DefaultGraph,
        );
        self.store.insert(&quad).map_err(|e| KnowledgeError::Sparql {
            message: format!("insert failed: {e}"),
        })?;
        Ok(())
    }

    fn insert_literal(
        &self,
        subject: &NamedNode,
        predicate: &str,
        value: &str,
    ) -> KnowledgeResult<()> {
        self.insert(subject, predicate, Literal::from(value))
    }

    /// Run a SELECT query and collect the named variables per solution.
    fn select(
        &self,
        sparql: &str,
        variables: &[&str],
    ) -> KnowledgeResult<Vec<Vec<Option<String>>>> {
        let results = self.store.query(sparql).map_err(|e| KnowledgeError::Sparql {
            message: format!("SPARQL query failed: {e}"),
        })?;

        let QueryResults::Solutions(solutions) = results else {
            return Err(KnowledgeError::Sparql {
                message: "expected solutions from SELECT query".into(),
            });
        };

        let mut rows = Vec::new();
        for solution in solutions {
            let solution = solution.map_err(|e| KnowledgeError::Sparql {
                message: format!("solution error: {e}"),
            })?;
            let row = variables
                .iter()
                .map(|var| {
                    solution.get(*var).map(|term| match term {
                        Term::Literal(literal) => literal.value().to_string(),
                        other => other.to_string(),
                    })
                })
                .collect();
            rows.push(row);
        }
        Ok(rows)
    }
}

impl EnrichmentSource for OntologyStore {
    fn lookup(&self, disease: Disease) -> KnowledgeResult<KnowledgeEnrichment> {
        let individual = disease.ontology_name();
        let ns = &self.namespace;

        let details = self.select(
            &format!(
                "SELECT ?description ?scientific ?severity ?period WHERE {{ \
                   <{ns}{individual}> <{ns}description> ?description ; \
                                      <{ns}scientificName> ?scientific ; \
                                      <{ns}severity> ?severity ; \
                                      <{ns}activePeriod> ?period . \
                 }}"
            ),
            &["description", "scientific", "severity", "period"],
        )?;

        let Some(row) = details.into_iter().next() else {
            return Err(KnowledgeError::UnknownDiseaseEntity {
                disease,
                individual: individual.to_string(),
            });
        };
        let [description, scientific, severity, period] = row.as_slice() else {
            return Err(KnowledgeError::Sparql {
                message: "malformed detail row".into(),
            });
        };

        let severity = severity
            .as_deref()
            .unwrap_or_default()
            .parse::<u8>()
            .map_err(|e| KnowledgeError::Sparql {
                message: format!("severity literal for \"{individual}\" is not a number: {e}"),
            })?;

        let treatment_rows = self.select(
            &format!(
                "SELECT ?label ?description ?dosage WHERE {{ \
                   <{ns}{individual}> <{ns}requiresTreatment> ?t . \
                   ?t <{ns}label> ?label ; <{ns}description> ?description . \
                   OPTIONAL {{ ?t <{ns}dosage> ?dosage }} \
                 }} ORDER BY ?label"
            ),
            &["label", "description", "dosage"],
        )?;

        let treatments = treatment_rows
            .into_iter()
            .map(|row| Treatment {
                name: row.first().cloned().flatten().unwrap_or_default(),
                description: row.get(1).cloned().flatten().unwrap_or_default(),
                dosage: row.get(2).cloned().flatten(),
            })
            .collect();

        Ok(KnowledgeEnrichment {
            disease,
            description: description.clone().unwrap_or_default(),
            scientific_name: scientific.clone().unwrap_or_default(),
            severity,
            active_period: period.clone().unwrap_or_default(),
            treatments,
        })
    }
}
