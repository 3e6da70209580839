use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, Utc};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::{info, warn};

use weather_odds::EngineConfig;
use weather_odds::analysis::analyze_for_date;
use weather_odds::logging::LoggingConfig;
use weather_odds::models::{Observation, TargetDate};
use weather_odds::provider::{HistoricalSource, JsonFileSource, ProviderFormat};
use weather_odds::risk::{event_climatology, score_event};

#[derive(Parser)]
#[command(
    name = "weather-odds",
    version,
    about = "Historical weather odds and event risk for a calendar date"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Provider response file
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// Layout of the input file (nasa-power, open-meteo, raw)
    #[arg(long, short = 'f', default_value = "raw")]
    format: ProviderFormat,

    #[arg(long)]
    month: u32,

    #[arg(long)]
    day: u32,

    /// Last season to include (default: current year)
    #[arg(long)]
    reference_year: Option<i32>,

    /// Also score this event profile over the window
    #[arg(long, short = 'e')]
    event: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Analyse a saved provider response around a calendar date
    Analyze(AnalyzeArgs),

    /// Score a single observation for an event
    Score {
        #[arg(long, short = 'e')]
        event: String,

        /// Air temperature in Celsius
        #[arg(long)]
        temperature: Option<f64>,

        /// Precipitation in mm
        #[arg(long)]
        precipitation: Option<f64>,

        /// Wind speed in km/h
        #[arg(long)]
        wind: Option<f64>,

        /// Visibility in km
        #[arg(long)]
        visibility: Option<f64>,

        /// Thunderstorm probability in percent
        #[arg(long)]
        storm: Option<f64>,
    },

    /// List the event profiles in the catalog
    Events,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = EngineConfig::load_from_path(cli.config.clone())
        .with_context(|| "Failed to load configuration")?;
    let logging = if cli.verbose {
        LoggingConfig {
            level: "debug".to_string(),
            ..config.logging.clone()
        }
    } else {
        config.logging.clone()
    };
    logging.init()?;

    match cli.command {
        Command::Analyze(args) => run_analyze(&config, args),
        Command::Score {
            event,
            temperature,
            precipitation,
            wind,
            visibility,
            storm,
        } => {
            let observation = Observation {
                temperature,
                precipitation,
                wind_speed: wind,
                visibility,
                storm_probability: storm,
            };
            let catalog = config.event_catalog()?;
            let result = score_event(
                (!observation.is_empty()).then_some(&observation),
                &event,
                &catalog,
            );
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(())
        }
        Command::Events => {
            let catalog = config.event_catalog()?;
            for key in catalog.keys() {
                if let Some(profile) = catalog.get(key) {
                    println!("{key:<18} {} {}", profile.icon, profile.name);
                }
            }
            Ok(())
        }
    }
}

fn run_analyze(config: &EngineConfig, args: AnalyzeArgs) -> Result<()> {
    let target = TargetDate::new(args.month, args.day)?;
    let reference_year = args.reference_year.unwrap_or_else(|| Utc::now().year());

    let source = JsonFileSource {
        path: args.input,
        format: args.format,
    };
    let batch = source.load()?;
    let normalized = batch.normalize();
    if !normalized.dropped.is_empty() {
        warn!(
            "{} entries were dropped during normalisation",
            normalized.dropped.len()
        );
    }
    info!(
        records = normalized.sample.len(),
        %target,
        reference_year,
        "Loaded historical sample"
    );

    let report = analyze_for_date(
        &normalized.sample,
        target,
        &config.thresholds,
        &config.analysis,
        reference_year,
    )?;

    let mut output = json!({
        "report": report,
        "dropped": normalized.dropped,
    });

    if let Some(key) = args.event.as_deref() {
        let catalog = config.event_catalog()?;
        let profile = catalog.get(key).ok_or_else(|| {
            anyhow!("Unknown event '{key}'. Run `weather-odds events` for the list.")
        })?;
        let window = normalized.sample.windowed(
            target,
            config.analysis.window_days,
            config.analysis.years_back,
            reference_year,
        );
        let typical = Observation::from_sample(&window);
        output["event_climatology"] = json!(event_climatology(&window, profile));
        output["typical_day_risk"] = json!(score_event(
            (!typical.is_empty()).then_some(&typical),
            key,
            &catalog,
        ));
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
