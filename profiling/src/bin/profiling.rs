use chunkeval::{evaluate_episodes, EvalConfigBuilder, Episode, EvaluationExample};
use serde::Deserialize;
use serde_jsonlines::json_lines;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::info;

use clap::Parser;

#[derive(Deserialize)]
struct Record {
    episode: String,
    #[serde(flatten)]
    example: EvaluationExample,
}

/// Reads the examples of a JSON-lines file and groups them by episode.
fn read_episodes<P: AsRef<Path>>(path: P) -> Result<Vec<Episode>, std::io::Error> {
    let mut examples: BTreeMap<String, Vec<EvaluationExample>> = BTreeMap::new();
    for record in json_lines::<Record, P>(path)? {
        let record = record?;
        examples
            .entry(record.episode)
            .or_default()
            .push(record.example);
    }
    Ok(examples
        .into_iter()
        .map(|(name, examples)| Episode::new(name, examples))
        .collect())
}

#[derive(Debug, Parser)]
struct Args {
    #[arg(short, long, default_value_t = 1)]
    n_samples: u32,
    #[arg(short, long, default_value_t=String::from("./tests/data/episodes.jsonl"))]
    dataset: String,
    #[arg(short, long, default_value_t = false)]
    parallel: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let n_samples = args.n_samples;
    let config = EvalConfigBuilder::default().parallel(args.parallel).build();
    let episodes = read_episodes(&args.dataset)?;
    info!(episodes = episodes.len(), "Loaded {}", args.dataset);

    let mut total_duration = Duration::ZERO;
    for _ in 0..n_samples {
        let now = Instant::now();
        let summary = evaluate_episodes(&episodes, &config)?;
        total_duration += now.elapsed();
        info!(average = summary.average, "Scored the episodes");
    }
    println!(
        "Total duration: {} with {n_samples} samples",
        total_duration.as_secs_f64()
    );
    Ok(())
}
