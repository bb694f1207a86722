//! `autoins` - CLI for autoinsight
//!
//! This binary provides the command-line interface for scoring vibration
//! telemetry, browsing journey history, and managing the sealed profile.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use clap::Parser;

use autoinsight::cli::{Cli, Command, ConfigCommand, JourneysCommand, ProfileCommand, ScoreCommand};
use autoinsight::profile::{compile_registration_patterns, VehicleProfile};
use autoinsight::telemetry::{
    fetch_raw_soft, parse_samples, score_samples, DisturbanceWindow, FileSource,
};
use autoinsight::{init_logging, Config, Error, Journey, Storage, Vault};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Score(score_cmd) => handle_score(&config, score_cmd).await,
        Command::Journeys(journeys_cmd) => handle_journeys(&config, &journeys_cmd),
        Command::Profile(profile_cmd) => handle_profile(&config, profile_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

async fn handle_score(config: &Config, cmd: ScoreCommand) -> anyhow::Result<()> {
    let source_path = cmd
        .source
        .or_else(|| config.ingest.default_source.clone())
        .ok_or_else(|| {
            anyhow::anyhow!("no sample source given and no ingest.default_source configured")
        })?;

    let windows = load_windows(cmd.windows.as_deref())?;

    let source = FileSource::new(&source_path);
    let raw = fetch_raw_soft(&source).await;
    let samples = parse_samples(&raw);
    let score = score_samples(&samples, &windows);

    let mut journey = Journey::new(
        source_path.display().to_string(),
        &raw,
        u32::try_from(samples.len()).unwrap_or(u32::MAX),
        score,
    );

    let mut duplicate = false;
    if cmd.record {
        let storage = Storage::open(config.database_path())?;
        match storage.insert_journey(&journey)? {
            Some(id) => journey.id = Some(id),
            None => duplicate = true,
        }
        if let Some(max_age) = config.max_age() {
            storage.prune_older_than(max_age)?;
        }
        if config.storage.max_journeys > 0 {
            storage.prune_keep_recent(config.storage.max_journeys)?;
        }
    }

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&journey)?);
    } else {
        println!("Engine performance");
        println!("------------------");
        println!("Source:    {}", source_path.display());
        println!("Samples:   {}", samples.len());
        println!(
            "Spikes:    {} total, {} explained",
            score.total_spikes, score.explained_spikes
        );
        println!("Score:     {score}");
        if samples.is_empty() {
            println!();
            println!("No usable samples were found; the score above is the optimistic default.");
        }
        if let Some(id) = journey.id {
            println!();
            println!("Recorded as journey #{id}");
        } else if duplicate {
            println!();
            println!("Identical data was already recorded; journey not duplicated.");
        }
    }
    Ok(())
}

/// Read disturbance windows from the event-detection feed's JSON file.
fn load_windows(path: Option<&Path>) -> anyhow::Result<Vec<DisturbanceWindow>> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(Vec::new()),
    }
}

fn handle_journeys(config: &Config, cmd: &JourneysCommand) -> anyhow::Result<()> {
    let storage = Storage::open(config.database_path())?;

    match cmd {
        JourneysCommand::List { limit, json } => {
            let journeys = storage.recent_journeys(*limit)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&journeys)?);
            } else if journeys.is_empty() {
                println!("No journeys recorded yet.");
            } else {
                for journey in &journeys {
                    println!(
                        "#{:<5} {}  {:>7}  {} samples, {} spikes ({} explained)  {}",
                        journey.id.unwrap_or(0),
                        journey.recorded_at.format("%Y-%m-%d %H:%M"),
                        journey.score.to_string(),
                        journey.sample_count,
                        journey.score.total_spikes,
                        journey.score.explained_spikes,
                        journey.source,
                    );
                }
            }
        }
        JourneysCommand::Stats { json } => {
            let stats = storage.journey_stats()?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Journey statistics");
                println!("------------------");
                println!("Journeys:        {}", stats.total_journeys);
                println!(
                    "Average score:   {}",
                    stats
                        .average_score
                        .map_or_else(|| "-".to_string(), |avg| format!("{avg:.1}"))
                );
                println!(
                    "Best score:      {}",
                    stats
                        .best_score
                        .map_or_else(|| "-".to_string(), |s| s.to_string())
                );
                println!(
                    "Worst score:     {}",
                    stats
                        .worst_score
                        .map_or_else(|| "-".to_string(), |s| s.to_string())
                );
                println!(
                    "Latest journey:  {}",
                    stats.newest_journey.map_or_else(
                        || "-".to_string(),
                        |dt| dt.format("%Y-%m-%d %H:%M").to_string()
                    )
                );
            }
        }
    }
    Ok(())
}

fn handle_profile(config: &Config, cmd: ProfileCommand) -> anyhow::Result<()> {
    let storage = Storage::open(config.database_path())?;

    match cmd {
        ProfileCommand::Set { file } => {
            let text = std::fs::read_to_string(&file)?;
            let profile: VehicleProfile = serde_json::from_str(&text)?;

            let patterns = compile_registration_patterns(&config.profile.registration_patterns)?;
            profile.validate(&patterns)?;

            let vault = Vault::load_or_generate(config.vault_key_path())?;
            let sealed = vault.seal(&profile)?;
            storage.store_sealed_profile(&sealed)?;

            println!("Profile for {} sealed and stored.", profile.full_name);
        }
        ProfileCommand::Show { json, sealed } => {
            let blob = storage.load_sealed_profile()?.ok_or(Error::ProfileMissing)?;

            if sealed {
                println!("{blob}");
                return Ok(());
            }

            let vault = Vault::load_or_generate(config.vault_key_path())?;
            let profile: VehicleProfile = vault.open(&blob)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&profile)?);
            } else {
                println!("Owner profile");
                println!("-------------");
                println!("Name:        {}", profile.full_name);
                println!("Vehicle:     {}", profile.vehicle_number);
                println!("Authority:   {}", profile.registration_authority);
                println!("Registered:  {}", profile.registration_date);
                println!("Contact:     {}", profile.contact_number);
                println!("Licence:     {}", profile.license_number);
                println!(
                    "Photo:       {}",
                    profile.photo_url.as_deref().unwrap_or("-")
                );
            }
        }
        ProfileCommand::Clear { yes } => {
            if yes {
                if storage.clear_profile()? {
                    println!("Profile deleted.");
                } else {
                    println!("No profile stored.");
                }
            } else {
                println!("This will delete the stored profile.");
                println!("Use --yes to confirm.");
            }
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:  {}", config.database_path().display());
                println!("  Max journeys:   {}", config.storage.max_journeys);
                println!("  Max age (days): {}", config.storage.max_age_days);
                println!();
                println!("[Ingest]");
                println!(
                    "  Default source: {}",
                    config
                        .ingest
                        .default_source
                        .as_ref()
                        .map_or_else(|| "none".to_string(), |p| p.display().to_string())
                );
                println!();
                println!("[Vault]");
                println!("  Key path:       {}", config.vault_key_path().display());
                println!();
                println!("[Profile]");
                println!(
                    "  Registration patterns: {}",
                    config.profile.registration_patterns.len()
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path: PathBuf = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
