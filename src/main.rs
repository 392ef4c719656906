use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

mod cli;

use cli::Cli;
use cli::commands::Commands;
use cli::render::ConsoleObserver;

use siftr::config::{self, Database, GlobalSettings};
use siftr::escalate::ConsoleEscalation;
use siftr::judge::{GeminiConfig, GeminiJudge, RelevanceJudge};
use siftr::refine::RefineEngine;
use siftr::source::{OpenAlexSource, RecordSource, ScopusSource, WosSource};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("siftr")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("siftr.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn build_source(database: Database, settings: &GlobalSettings) -> siftr::Result<Arc<dyn RecordSource>> {
    let timeout = settings.sources.timeout();
    Ok(match database {
        Database::Openalex => Arc::new(OpenAlexSource::new(
            settings.sources.openalex_mailto.clone(),
            timeout,
        )?),
        Database::Scopus => Arc::new(ScopusSource::from_env(timeout)?),
        Database::Wos => Arc::new(WosSource::from_env(timeout)?),
    })
}

fn build_judge(settings: &GlobalSettings) -> siftr::Result<Arc<dyn RelevanceJudge>> {
    let config = GeminiConfig {
        model: settings.llm.model.clone(),
        timeout: settings.llm.timeout(),
        api_key_env: settings.llm.api_key_env.clone(),
        ..Default::default()
    };
    Ok(Arc::new(GeminiJudge::new(config)?))
}

async fn handle_run(project_name: &str, settings: &GlobalSettings) -> Result<()> {
    let project = config::load_project(settings, project_name)?;

    println!("{}", format!("Project: {}", project.name).blue().bold());
    if !project.description.is_empty() {
        println!("{}", project.description.dimmed());
    }
    println!("Database: {}", project.database);

    let source = build_source(project.database, settings)?;
    let judge = build_judge(settings)?;
    let engine = RefineEngine::new(source, judge, Arc::new(ConsoleEscalation::new()))
        .with_observer(Arc::new(ConsoleObserver::new()));

    let params = project.loop_params(&settings.defaults, settings.escalation.timeout());
    engine.run(&params).await.context("Refinement loop failed")?;

    Ok(())
}

fn handle_show(project_name: &str, settings: &GlobalSettings) -> Result<()> {
    let project = config::load_project(settings, project_name)?;
    let params = project.loop_params(&settings.defaults, settings.escalation.timeout());

    println!("{}", format!("Project: {}", project.name).blue().bold());
    if !project.description.is_empty() {
        println!("{}", project.description.dimmed());
    }
    println!("Database: {}", project.database);
    println!("Initial query: {}", params.initial_query.green());
    println!("Max iterations: {}", params.max_iterations);
    println!("Precision threshold: {:.2}", params.precision_threshold);
    println!("Max results per iteration: {}", params.max_results);
    println!("Inclusion criteria: {}", params.criteria.inclusion);
    println!("Exclusion criteria: {}", params.criteria.exclusion);

    Ok(())
}

async fn run_application(cli: &Cli, settings: &GlobalSettings) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Run { project } => handle_run(project, settings).await,
        Commands::Show { project } => handle_show(project, settings),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load settings
    let settings = config::load_settings(cli.config.as_ref()).context("Failed to load settings")?;
    settings.validate().context("Invalid settings")?;

    info!("Starting with settings from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &settings).await.context("Application failed")?;

    Ok(())
}
