use crate::config::EvalConfig;
use crate::matcher::CountTable;
use crate::metrics::{self, ComputationError};
use crate::reporter::{EpisodeReport, EpisodeScore, SummaryScore};
use ndarray::aview1;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A single sentence with its gold tags and its predicted tags. The tokens are optional: when
/// they are given, there must be one per tag.
pub struct EvaluationExample {
    id: String,
    #[serde(default)]
    tokens: Vec<String>,
    gold_tags: Vec<String>,
    predicted_tags: Vec<String>,
}

impl EvaluationExample {
    pub fn new(
        id: impl Into<String>,
        tokens: Vec<String>,
        gold_tags: Vec<String>,
        predicted_tags: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            tokens,
            gold_tags,
            predicted_tags,
        }
    }

    /// Builds an example without tokens.
    pub fn from_tags<S: AsRef<str>>(
        id: impl Into<String>,
        gold_tags: &[S],
        predicted_tags: &[S],
    ) -> Self {
        let owned = |tags: &[S]| -> Vec<String> {
            tags.iter().map(|t| String::from(t.as_ref())).collect()
        };
        Self::new(id, Vec::new(), owned(gold_tags), owned(predicted_tags))
    }

    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
    pub fn gold_tags(&self) -> &[String] {
        &self.gold_tags
    }
    pub fn predicted_tags(&self) -> &[String] {
        &self.predicted_tags
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// An independent evaluation set. Its examples are scored together and its score does not depend
/// on the other episodes.
pub struct Episode {
    name: String,
    examples: Vec<EvaluationExample>,
}

impl Episode {
    pub fn new(name: impl Into<String>, examples: Vec<EvaluationExample>) -> Self {
        Self {
            name: name.into(),
            examples,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn examples(&self) -> &[EvaluationExample] {
        &self.examples
    }
}

/// Scores a single episode. Any invalid example aborts the scoring of the episode. An episode
/// without any chunk scores zero.
///
/// * `episode`: The episode to score.
/// * `config`: Gives the outside tag and the raw mode used when parsing the tags.
#[instrument(skip_all, fields(episode = %episode.name))]
pub fn evaluate_episode(
    episode: &Episode,
    config: &EvalConfig,
) -> Result<EpisodeScore, ComputationError> {
    debug!(examples = episode.examples.len(), "Scoring episode");
    let mut table = CountTable::new();
    for example in episode.examples.iter() {
        trace!(id = example.id(), tags = example.gold_tags().len(), "Adding example");
        table
            .update(example, config)
            .inspect_err(|e| warn!("Cannot score episode {}: {}", episode.name, e))?;
    }
    let score = metrics::score(&table);
    debug!(
        found_correct = score.counts.found_correct,
        found_guessed = score.counts.found_guessed,
        correct_chunk = score.counts.correct_chunk,
        f1 = score.overall.f1,
        "Episode scored"
    );
    Ok(score)
}

/// Scores every episode and averages their overall F1 scores. The average is computed on the
/// unrounded scores; only the reports round them. The reports are in the same order as the
/// episodes. With `config.parallel()`, every episode is scored on its own rayon task.
///
/// * `episodes`: The episodes to score. There must be at least one.
/// * `config`: The evaluation config.
pub fn evaluate_episodes(
    episodes: &[Episode],
    config: &EvalConfig,
) -> Result<SummaryScore, ComputationError> {
    let report = |episode: &Episode| {
        evaluate_episode(episode, config).map(|score| EpisodeReport {
            name: episode.name.clone(),
            score,
        })
    };
    let reports: Vec<EpisodeReport> = if config.parallel() {
        episodes.par_iter().map(report).collect::<Result<_, _>>()?
    } else {
        episodes.iter().map(report).collect::<Result<_, _>>()?
    };
    let f1: Vec<f64> = reports.iter().map(|r| r.score.overall.f1).collect();
    let average = mean_f1(&f1)?;
    info!(episodes = reports.len(), average, "Scored every episode");
    Ok(SummaryScore {
        episodes: reports,
        average,
    })
}

/// Unweighted arithmetic mean of the episode scores.
pub fn mean_f1(scores: &[f64]) -> Result<f64, ComputationError> {
    aview1(scores)
        .mean()
        .ok_or_else(|| ComputationError::EmptyInput(String::from("episode scores")))
}
