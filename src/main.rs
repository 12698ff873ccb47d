//! plantaid CLI: hybrid plant disease diagnosis.

use std::io::{BufRead, Write as _};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use plantaid::artifacts::ArtifactSet;
use plantaid::fusion::aggregate::AggregationWeights;
use plantaid::fusion::report::DiagnosticReport;
use plantaid::input::DiagnosticInput;
use plantaid::session::{DiagnosisSession, EngineFailurePolicy};
use plantaid::vocab::{Disease, Plant, Season, Symptom};

#[derive(Parser)]
#[command(name = "plantaid", version, about = "Hybrid plant disease diagnostic engine")]
struct Cli {
    /// Directory with override artifacts (rules.toml, classifier.json,
    /// bayes_net.json, ontology.toml). Defaults to the bundled copies.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a diagnostic session (interactive unless --plant is given).
    Diagnose {
        /// Plant under observation (olive, rose, basil).
        #[arg(long)]
        plant: Option<String>,

        /// Comma-separated canonical symptom identifiers.
        #[arg(long)]
        symptoms: Option<String>,

        /// Current season (spring, summer, autumn, mild_winter).
        #[arg(long)]
        season: Option<String>,

        /// Override the probabilistic engine weight.
        #[arg(long)]
        weight_probabilistic: Option<f32>,

        /// Override the symbolic engine weight.
        #[arg(long)]
        weight_symbolic: Option<f32>,

        /// Override the statistical engine weight.
        #[arg(long)]
        weight_statistical: Option<f32>,

        /// Abort on any engine failure instead of degrading.
        #[arg(long)]
        fail_on_engine_error: bool,
    },

    /// List the canonical plants, seasons, symptoms, and diseases.
    Vocab,

    /// Show the configured engines and their backing artifacts.
    Info,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let artifacts = match &cli.data_dir {
        Some(dir) => ArtifactSet::from_dir(dir),
        None => ArtifactSet::bundled(),
    };

    match cli.command {
        Commands::Diagnose {
            plant,
            symptoms,
            season,
            weight_probabilistic,
            weight_symbolic,
            weight_statistical,
            fail_on_engine_error,
        } => {
            let input = match plant {
                Some(plant) => parse_input(&plant, symptoms.as_deref(), season.as_deref())?,
                None => prompt_input()?,
            };

            let mut weights = AggregationWeights::default();
            if let Some(w) = weight_probabilistic {
                weights.probabilistic = w;
            }
            if let Some(w) = weight_symbolic {
                weights.symbolic = w;
            }
            if let Some(w) = weight_statistical {
                weights.statistical = w;
            }

            let policy = if fail_on_engine_error {
                EngineFailurePolicy::Fail
            } else {
                EngineFailurePolicy::Degrade
            };

            let session = DiagnosisSession::from_artifacts(&artifacts)?
                .with_weights(weights)
                .with_failure_policy(policy);
            let report = session.run(&input)?;
            print_report(&report, session.weights());
        }

        Commands::Vocab => print_vocab(),

        Commands::Info => {
            let session = DiagnosisSession::from_artifacts(&artifacts)?;
            println!("plantaid {}", env!("CARGO_PKG_VERSION"));
            println!();
            for engine in session.engines() {
                println!("  {:<34} {}", engine.kind().display_name(), engine.artifact());
            }
            let weights = session.weights();
            println!();
            println!(
                "  default weights: probabilistic {:.1}, symbolic {:.1}, statistical {:.1}",
                weights.probabilistic, weights.symbolic, weights.statistical
            );
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Input assembly
// ---------------------------------------------------------------------------

fn parse_input(
    plant: &str,
    symptoms: Option<&str>,
    season: Option<&str>,
) -> Result<DiagnosticInput> {
    let plant = Plant::parse(plant)?;
    let season = Season::parse(season.unwrap_or("spring"))?;
    let symptoms = symptoms
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Symptom::parse)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if symptoms.is_empty() {
        miette::bail!(
            "at least one symptom is required; pass --symptoms with \
             comma-separated identifiers (see `plantaid vocab`)"
        );
    }
    Ok(DiagnosticInput::new(plant, symptoms, season))
}

/// Interactive numbered menus, one question per line of input.
fn prompt_input() -> Result<DiagnosticInput> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    println!("Which plant are you observing?");
    for (i, plant) in Plant::ALL.iter().enumerate() {
        println!("  {}. {}", i + 1, plant.display_name());
    }
    let plant = Plant::ALL[read_choice(&mut input, Plant::ALL.len())? - 1];

    println!();
    println!("Select the observed symptoms (one number per line, 0 to finish):");
    for (i, symptom) in Symptom::ALL.iter().enumerate() {
        println!("  {}. {}", i + 1, symptom.display_name());
    }
    let mut symptoms = Vec::new();
    loop {
        let choice = read_choice_or_zero(&mut input, Symptom::ALL.len())?;
        if choice == 0 {
            if symptoms.is_empty() {
                println!("Select at least one symptom.");
                continue;
            }
            break;
        }
        symptoms.push(Symptom::ALL[choice - 1]);
    }

    println!();
    println!("What season is it?");
    for (i, season) in Season::ALL.iter().enumerate() {
        println!("  {}. {}", i + 1, season.display_name());
    }
    let season = Season::ALL[read_choice(&mut input, Season::ALL.len())? - 1];

    Ok(DiagnosticInput::new(plant, symptoms, season))
}

fn read_choice(input: &mut impl BufRead, max: usize) -> Result<usize> {
    loop {
        let choice = read_choice_or_zero(input, max)?;
        if choice > 0 {
            return Ok(choice);
        }
        println!("Please choose between 1 and {max}.");
    }
}

fn read_choice_or_zero(input: &mut impl BufRead, max: usize) -> Result<usize> {
    loop {
        print!("> ");
        std::io::stdout().flush().into_diagnostic()?;
        let mut line = String::new();
        // read_line returns Ok(0) on a closed stream; re-prompting there
        // would spin forever.
        if input.read_line(&mut line).into_diagnostic()? == 0 {
            miette::bail!("input closed before a choice was made");
        }
        match line.trim().parse::<usize>() {
            Ok(n) if n <= max => return Ok(n),
            _ => println!("Please enter a number between 0 and {max}."),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_report(report: &DiagnosticReport, weights: &AggregationWeights) {
    let top = report.top();

    println!();
    println!("=== Diagnosis ===");
    println!(
        "  {}  (composite confidence {:.1}%)",
        top.disease.display_name(),
        top.composite * 100.0
    );
    if report.is_degraded() {
        let names: Vec<_> = report
            .degraded_engines()
            .iter()
            .map(|e| e.to_string())
            .collect();
        println!("  [degraded: {} engine(s) unavailable]", names.join(", "));
    }

    println!();
    println!("=== Score breakdown ===");
    println!(
        "  weights: probabilistic {:.1}, symbolic {:.1}, statistical {:.1}",
        weights.probabilistic, weights.symbolic, weights.statistical
    );
    for entry in report.ranked().entries() {
        println!(
            "  {:<22} composite {:>5.1}%  | probabilistic {:>10} | symbolic {:>10} | statistical {:>10}",
            entry.disease.display_name(),
            entry.composite * 100.0,
            entry.scores.probabilistic.to_string(),
            entry.scores.symbolic.to_string(),
            entry.scores.statistical.to_string(),
        );
    }

    println!();
    println!("=== Knowledge ===");
    match report.enrichment() {
        Some(enrichment) => {
            println!("  {} ({})", enrichment.disease.display_name(), enrichment.scientific_name);
            println!("  {}", enrichment.description);
            println!("  severity: {}/5   active period: {}", enrichment.severity, enrichment.active_period);
            println!("  treatments:");
            for treatment in &enrichment.treatments {
                match &treatment.dosage {
                    Some(dosage) => {
                        println!("    - {}: {} ({})", treatment.name, treatment.description, dosage)
                    }
                    None => println!("    - {}: {}", treatment.name, treatment.description),
                }
            }
        }
        None => println!("  (no ontology entry for the diagnosed disease)"),
    }
}

fn print_vocab() {
    println!("Plants:");
    for plant in Plant::ALL {
        println!("  {:<24} {}", plant.as_str(), plant.display_name());
    }
    println!();
    println!("Seasons:");
    for season in Season::ALL {
        println!("  {:<24} {}", season.as_str(), season.display_name());
    }
    println!();
    println!("Symptoms:");
    for symptom in Symptom::ALL {
        println!("  {:<24} {}", symptom.as_str(), symptom.display_name());
    }
    println!();
    println!("Diseases:");
    for disease in Disease::ALL {
        println!("  {:<24} {}", disease.as_str(), disease.display_name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn closed_input_aborts_instead_of_spinning() {
        let mut input = Cursor::new("");
        assert!(read_choice_or_zero(&mut input, 9).is_err());
    }

    #[test]
    fn closed_input_mid_menu_aborts() {
        // One unusable line, then EOF while a choice is still required.
        let mut input = Cursor::new("not a number\n");
        assert!(read_choice(&mut input, 3).is_err());
    }

    #[test]
    fn invalid_lines_are_skipped_until_a_valid_choice() {
        let mut input = Cursor::new("abc\n12\n3\n");
        assert_eq!(read_choice_or_zero(&mut input, 9).unwrap(), 3);
    }

    #[test]
    fn zero_terminates_the_multi_select() {
        let mut input = Cursor::new("0\n");
        assert_eq!(read_choice_or_zero(&mut input, 9).unwrap(), 0);
    }

    #[test]
    fn non_interactive_input_requires_symptoms() {
        assert!(parse_input("olive", None, Some("spring")).is_err());
        assert!(parse_input("olive", Some(" , "), Some("spring")).is_err());
        assert!(parse_input("olive", Some("leaf_yellowing"), Some("spring")).is_ok());
    }
}
