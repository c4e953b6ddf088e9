//! racer-reward: score simulator ticks from the command line
//!
//! Reads simulator parameter snapshots as JSON (a single object, an array,
//! or one object per line) from files or stdin and prints one reward per
//! tick.

use anyhow::{Context, Result};
use clap::Parser;
use racer_reward_core::{
    Reward, RewardConfig, RewardFunction, RewardParams, SteerToPointReward, state_hash,
};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Parser)]
#[command(name = "racer-reward", version, about = "Score driving-simulator ticks")]
struct Args {
    /// Reward config (JSON); defaults to standard mode
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a JSON record with reward components per tick
    #[arg(long)]
    json: bool,

    /// Include the SHA-256 of each tick's parameters
    #[arg(long)]
    hash: bool,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,

    /// Tick files; stdin when empty
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ScoredTick {
    #[serde(flatten)]
    reward: Reward,
    #[serde(skip_serializing_if = "Option::is_none")]
    state_hash: Option<String>,
}

/// Parse one object, an array of objects, or a whitespace-separated stream of objects
fn parse_ticks(text: &str) -> Result<Vec<RewardParams>> {
    if text.trim_start().starts_with('[') {
        return serde_json::from_str(text).context("Invalid tick array");
    }
    serde_json::Deserializer::from_str(text)
        .into_iter::<RewardParams>()
        .enumerate()
        .map(|(i, tick)| tick.with_context(|| format!("Invalid tick #{}", i + 1)))
        .collect()
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn score(
    reward: &SteerToPointReward,
    ticks: &[RewardParams],
    args: &Args,
    out: &mut impl Write,
) -> Result<()> {
    for (i, tick) in ticks.iter().enumerate() {
        let result = reward
            .compute(tick)
            .with_context(|| format!("Failed to score tick #{}", i + 1))?;
        let hash = if args.hash {
            Some(state_hash(tick)?)
        } else {
            None
        };
        debug!("Tick #{}: {:.4}", i + 1, result.value);

        if args.json {
            let record = ScoredTick {
                reward: result,
                state_hash: hash,
            };
            writeln!(out, "{}", serde_json::to_string(&record)?)?;
        } else if let Some(hash) = hash {
            writeln!(out, "{}\t{}", result.value, hash)?;
        } else {
            writeln!(out, "{}", result.value)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &args.config {
        Some(path) => RewardConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RewardConfig::default(),
    };
    let reward = SteerToPointReward::new(config);
    info!("Scoring in {:?} mode", reward.config().mode);

    let sources: Vec<Option<&Path>> = if args.inputs.is_empty() {
        vec![None]
    } else {
        args.inputs.iter().map(|p| Some(p.as_path())).collect()
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for source in sources {
        let ticks = parse_ticks(&read_input(source)?)?;
        info!(
            "Scoring {} tick(s) from {}",
            ticks.len(),
            source.map_or_else(|| "stdin".to_string(), |p| p.display().to_string())
        );
        score(&reward, &ticks, &args, &mut out)?;
    }

    Ok(())
}
