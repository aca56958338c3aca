//! AML evaluation CLI
//!
//! Reads an extended transaction context from a JSON file and prints the
//! triggered rules, the assessment summary and the policy decision as JSON.
//! `--core` runs only the core rules over the embedded `base` snapshot.
//!
//! ```text
//! aml-evaluate [--core] <context.json>
//! ```
//!
//! Thresholds come from the TOML file named by `AML_ENGINE_CONFIG`, or from
//! `AML_*` environment variables. Set `AML_LOG_JSON=1` for JSON logs.

use aml_engine::{EngineConfig, EvaluationReport, ExtendedTransactionContext, RuleEngine};
use anyhow::{bail, Context};
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const USAGE: &str = "usage: aml-evaluate [--core] <context.json>";

fn main() -> anyhow::Result<()> {
    init_tracing();

    let (core_only, path) = parse_args(std::env::args().skip(1))?;

    let config = if let Ok(config_path) = std::env::var("AML_ENGINE_CONFIG") {
        info!("Loading config from: {}", config_path);
        EngineConfig::from_file(&config_path)
            .with_context(|| format!("loading config {}", config_path))?
    } else {
        EngineConfig::from_env().context("loading config from environment")?
    };

    let engine = RuleEngine::from_config(&config);
    let report = evaluate_file(&engine, &path, core_only)?;

    info!(
        "{}: score {:.1}, level {}, action {:?}",
        config.service_name,
        report.assessment.risk_score,
        report.assessment.overall_risk_level,
        report.decision.action
    );

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

/// `--core` flag and context path
fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<(bool, String)> {
    let mut core_only = false;
    let mut path = None;
    for arg in args {
        match arg.as_str() {
            "--core" => core_only = true,
            _ if path.is_none() => path = Some(arg),
            _ => bail!("unexpected argument: {}\n{}", arg, USAGE),
        }
    }
    match path {
        Some(path) => Ok((core_only, path)),
        None => bail!(USAGE),
    }
}

fn evaluate_file(
    engine: &RuleEngine,
    path: impl AsRef<Path>,
    core_only: bool,
) -> anyhow::Result<EvaluationReport> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let ctx: ExtendedTransactionContext = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", path.display()))?;

    Ok(engine.report(&ctx, core_only))
}

fn init_tracing() {
    let json = std::env::var("AML_LOG_JSON").is_ok_and(|v| v == "1");
    let registry = tracing_subscriber::registry().with(EnvFilter::from_default_env());

    if json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}
