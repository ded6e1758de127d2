use chunkeval::{evaluate_episodes, EvalConfig, EvalConfigBuilder, Episode, EvaluationExample};
use criterion::{criterion_group, criterion_main, Criterion};
use pprof::criterion::{Output, PProfProfiler};
use serde::Deserialize;
use serde_jsonlines::json_lines;
use std::path::Path;

const GOLD_PATTERN: [&str; 12] = [
    "B-PER", "I-PER", "O", "B-LOC", "O", "B-ORG", "I-ORG", "I-ORG", "O", "B-MISC", "O", "O",
];
const PREDICTED_PATTERN: [&str; 12] = [
    "B-PER", "I-PER", "O", "B-ORG", "O", "B-ORG", "I-ORG", "O", "O", "B-MISC", "I-MISC", "O",
];

/// Builds `n_episodes` episodes of `n_examples` examples each. The patterns are shifted from one
/// example to the next so that the chunks do not always line up.
fn synthetic_episodes(n_episodes: usize, n_examples: usize) -> Vec<Episode> {
    (1..=n_episodes)
        .map(|e| {
            let examples = (0..n_examples)
                .map(|i| {
                    let len = GOLD_PATTERN.len();
                    let shift = (e + i) % len;
                    let gold: Vec<&str> = (0..len * 3)
                        .map(|t| GOLD_PATTERN[(t + shift) % len])
                        .collect();
                    let predicted: Vec<&str> = (0..len * 3)
                        .map(|t| PREDICTED_PATTERN[(t + i) % len])
                        .collect();
                    EvaluationExample::from_tags(i.to_string(), &gold, &predicted)
                })
                .collect();
            Episode::new(format!("episode{}", e), examples)
        })
        .collect()
}

#[derive(Deserialize)]
struct Record {
    #[serde(flatten)]
    example: EvaluationExample,
}

fn fixture_episode<P: AsRef<Path>>(path: P) -> Vec<Episode> {
    let examples = json_lines::<Record, P>(path)
        .unwrap()
        .map(|r| r.unwrap().example)
        .collect::<Vec<_>>();
    vec![Episode::new("episode1", examples)]
}

fn benchmark_fixture(c: &mut Criterion) {
    let episodes = fixture_episode("./tests/data/episodes.jsonl");
    let config = EvalConfig::default();
    c.bench_function("fixture_episodes", |b| {
        b.iter(|| evaluate_episodes(&episodes, &config).unwrap())
    });
}

fn benchmark_small_episodes(c: &mut Criterion) {
    let episodes = synthetic_episodes(5, 100);
    let config = EvalConfig::default();
    c.bench_function("small_episodes", |b| {
        b.iter(|| evaluate_episodes(&episodes, &config).unwrap())
    });
}

fn benchmark_big_episodes(c: &mut Criterion) {
    let episodes = synthetic_episodes(5, 10_000);
    let config = EvalConfig::default();
    c.bench_function("big_episodes", |b| {
        b.iter(|| evaluate_episodes(&episodes, &config).unwrap())
    });
}

fn benchmark_big_episodes_parallel(c: &mut Criterion) {
    let episodes = synthetic_episodes(5, 10_000);
    let config = EvalConfigBuilder::default().parallel(true).build();
    c.bench_function("big_episodes_parallel", |b| {
        b.iter(|| evaluate_episodes(&episodes, &config).unwrap())
    });
}

criterion_group!(
    name=episode_benches;
    config = Criterion::default().sample_size(100).with_profiler(PProfProfiler::new(3000, Output::Flamegraph(None)));
    targets = benchmark_fixture,
    benchmark_small_episodes,
    benchmark_big_episodes,
    benchmark_big_episodes_parallel
);
criterion_main!(episode_benches);
