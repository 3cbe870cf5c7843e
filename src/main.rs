//! ragworkshop - CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use ragworkshop::{
    cli::{display, Args, Commands},
    config::Config,
    doctor::Doctor,
    harness::Corpus,
    streaming::OllamaClient,
    workshop::Workshop,
};
use std::path::Path;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;

    let verbosity = args.verbosity();
    let filter = verbosity.log_filter(&config.logging.filter);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Commands::Run {
            exercise,
            ref corpus,
            difficulty,
        } => {
            let corpus = load_corpus(corpus)?;
            let workshop = Workshop::with_ollama(config)?;

            tracing::info!(%exercise, corpus = %corpus.name, "running exercise");
            let report = workshop
                .run_exercise(exercise, &corpus, difficulty)
                .await
                .with_context(|| format!("Exercise '{}' failed", exercise))?;

            display::print_report(exercise, &report, verbosity.show_details());

            if !report.is_success() {
                std::process::exit(1);
            }
        }
        Commands::Ask {
            ref question,
            ref corpus,
            exercise,
        } => {
            let corpus = load_corpus(corpus)?;
            let workshop = Workshop::with_ollama(config)?;

            let result = workshop
                .ask(exercise, question, &corpus)
                .await
                .with_context(|| format!("Could not answer with '{}'", exercise))?;

            display::print_answer(&result, verbosity.show_details());
        }
        Commands::Config => show_config(&config, args.config.as_deref())?,
        Commands::Doctor => run_doctor(&config).await?,
    }

    Ok(())
}

fn load_corpus(path: &Path) -> Result<Corpus> {
    Corpus::load(path).with_context(|| format!("Failed to load corpus {}", path.display()))
}

/// Run doctor diagnostics
async fn run_doctor(config: &Config) -> Result<()> {
    let client = OllamaClient::from_config(&config.ollama)?;
    let checks = Doctor::new(client).run_diagnostics().await;

    Doctor::display_results(&checks);

    let healthy = Doctor::overall_status(&checks);
    if healthy {
        println!("{}", "All checks passed".green());
    } else {
        println!("{}", "Some checks failed".red());
    }

    std::process::exit(if healthy { 0 } else { 1 });
}

/// Show current configuration
fn show_config(config: &Config, explicit: Option<&Path>) -> Result<()> {
    println!("\n{}\n", "Current Configuration".bold().cyan());

    let source = match explicit {
        Some(path) => path.display().to_string(),
        None => match Config::default_path() {
            Some(path) if path.exists() => path.display().to_string(),
            _ => "built-in defaults".to_string(),
        },
    };
    println!("{} {}\n", "Source:".bold(), source);
    println!("{}", config.to_toml()?);

    Ok(())
}
