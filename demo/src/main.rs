//! GLYERAL CLI
//!
//! Evaluates patient profiles against the medication rule table, looks up
//! formulary entries, answers assistant questions, and runs the clinic
//! reference scenarios.
//!
//! Usage:
//!   cargo run -p glyeral-demo -- run-all
//!   cargo run -p glyeral-demo -- evaluate --profile patient.json
//!   echo '{"egfr": "38", "hasCKD": true}' | cargo run -p glyeral-demo -- evaluate
//!   cargo run -p glyeral-demo -- formulary Glargine_Before_Dinner
//!   cargo run -p glyeral-demo -- ask "Why Farxiga?"

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use glyeral_clinic::{
    assistant::respond,
    scenarios::{intake, parse_intake, review},
};
use glyeral_contracts::{
    error::{GlyeralError, GlyeralResult},
    recommendation::DrugId,
};
use glyeral_core::traits::{RecommendationEngine, Verifier};
use glyeral_rules::{GlyeralConfig, TableEngine};
use glyeral_verify::RecommendationVerifier;

// ── CLI definition ────────────────────────────────────────────────────────────

/// GLYERAL: rules-based diabetes medication recommendations.
#[derive(Parser)]
#[command(
    name = "glyeral",
    about = "GLYERAL medication recommendation CLI",
    long_about = "Evaluates patient profiles against the GLYERAL drug table and runs the\n\
                  clinic reference scenarios (intake, physician review, audit trail)."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run both clinic scenarios in sequence.
    RunAll,
    /// Scenario 1: Patient Intake (roster search, lab defaults, chat chips).
    Intake,
    /// Scenario 2: Physician Review (accept / modify / reject, audit chain).
    Review,
    /// Evaluate a patient profile and print the recommendation list as JSON.
    Evaluate {
        /// Profile JSON file. Reads stdin when omitted.
        #[arg(long)]
        profile: Option<PathBuf>,
        /// Configuration TOML. Uses the embedded standard configuration when omitted.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the formulary view for a drug id.
    Formulary {
        drug_id: String,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Ask the assistant a question about the standard recommendations
    /// for a default profile.
    Ask { message: String },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for rule-level output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::Intake => {
            print_banner();
            intake::run_scenario()
        }
        Command::Review => {
            print_banner();
            review::run_scenario()
        }
        Command::Evaluate { profile, config } => evaluate(profile.as_deref(), config.as_deref()),
        Command::Formulary { drug_id, config } => formulary(&drug_id, config.as_deref()),
        Command::Ask { message } => ask(&message),
    };

    if let Err(e) = result {
        eprintln!("glyeral: {}", e);
        std::process::exit(1);
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn run_all() -> GlyeralResult<()> {
    print_banner();
    intake::run_scenario()?;
    review::run_scenario()?;
    println!("All scenarios completed successfully.");
    Ok(())
}

fn load_config(path: Option<&Path>) -> GlyeralResult<GlyeralConfig> {
    match path {
        Some(p) => GlyeralConfig::from_file(p),
        None => GlyeralConfig::standard(),
    }
}

fn read_profile_input(path: Option<&Path>) -> GlyeralResult<String> {
    match path {
        Some(p) => std::fs::read_to_string(p).map_err(|e| GlyeralError::Validation {
            reason: format!("failed to read profile '{}': {}", p.display(), e),
        }),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .map_err(|e| GlyeralError::Validation {
                    reason: format!("failed to read profile from stdin: {}", e),
                })?;
            Ok(input)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> GlyeralResult<()> {
    let text = serde_json::to_string_pretty(value).map_err(|e| GlyeralError::Validation {
        reason: format!("failed to render JSON: {}", e),
    })?;
    println!("{}", text);
    Ok(())
}

fn evaluate(profile: Option<&Path>, config: Option<&Path>) -> GlyeralResult<()> {
    let config = load_config(config)?;
    let engine = TableEngine::from_config(&config);
    let verifier = RecommendationVerifier::with_formulary(config.formulary());

    let input = read_profile_input(profile)?;
    let form: serde_json::Value =
        serde_json::from_str(&input).map_err(|e| GlyeralError::Validation {
            reason: format!("profile is not valid JSON: {}", e),
        })?;
    let profile = parse_intake(form)?;
    debug!(egfr = ?profile.egfr, hba1c = ?profile.hba1c, "profile parsed");

    let recommendations = engine.evaluate(&profile);
    let report = verifier.verify_recommendations(&recommendations, &engine.candidate_drugs())?;
    if !report.passed {
        return Err(GlyeralError::VerificationFailed {
            reason: report.summary(),
        });
    }
    print_json(&recommendations)
}

fn formulary(drug_id: &str, config: Option<&Path>) -> GlyeralResult<()> {
    let config = load_config(config)?;
    print_json(&config.formulary().view(&DrugId::from(drug_id)))
}

fn ask(message: &str) -> GlyeralResult<()> {
    let config = GlyeralConfig::standard()?;
    let engine = TableEngine::from_config(&config);
    let recommendations = engine.evaluate(&Default::default());
    println!("{}", respond(message, &recommendations));
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("GLYERAL: Diabetes Medication Recommendations");
    println!("Clinic Reference Demo");
    println!("============================================");
    println!();
    println!("Review pipeline per patient:");
    println!("  [1] Labs parsed leniently; missing values take configured defaults");
    println!("  [2] Rule table evaluates all 12 drug slots (dose, confidence, status)");
    println!("  [3] Verifier checks the list against JSON Schema + block-warning rules");
    println!("  [4] Physician accepts, modifies (notes required), or rejects");
    println!("  [5] Each decision is appended to a SHA-256 hash-chained log");
    println!();
}
