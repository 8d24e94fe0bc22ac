use anyhow::{Context, Result};
use incentive_stack_engine::{config::Config, telemetry::init_tracing, StackEngine};
use incentive_stack_engine::domain::{IncentiveProgram, Project};
use tracing::info;

fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;

    // Positional arguments override the configured input paths.
    let mut args = std::env::args().skip(1);
    let catalog_path = args.next().unwrap_or_else(|| cfg.inputs.catalog_path.clone());
    let project_path = args.next().unwrap_or_else(|| cfg.inputs.project_path.clone());

    let catalog: Vec<IncentiveProgram> = read_json(&catalog_path)
        .with_context(|| format!("reading catalog from {catalog_path}"))?;
    let project: Project = read_json(&project_path)
        .with_context(|| format!("reading project from {project_path}"))?;

    info!(
        catalog = %catalog_path,
        programs = catalog.len(),
        project = %project.name,
        "starting stack evaluation"
    );

    let engine = StackEngine::new(cfg.engine());
    let valuation = engine.evaluate(&project, &catalog)?;

    println!("{}", serde_json::to_string_pretty(&valuation)?);
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
