/*!
This module pairs the gold annotations of a leaderboard with a submission. Both sides map the
episode names (`episode1`, `episode2`, ...) to a list of annotated sentences. The annotations are
matched by id and turned into the episodes scored by `evaluate_episodes`.
*/
use crate::config::EvalConfig;
use crate::episode::{evaluate_episodes, Episode, EvaluationExample};
use crate::metrics::{ComputationError, InconsistentLengthError};
use crate::reporter::SummaryScore;
use ahash::{HashMap as AHashMap, HashSet as AHashSet};
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use thiserror::Error;
use tracing::debug;

/// Ids are JSON strings or integers. Both are read as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Integer(i64),
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Integer(integer) => integer.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One annotated sentence of an episode. The sentence and the tag sequence are delimited strings,
/// with one tag per token.
pub struct Annotation {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
    sentence: String,
    tag_sequence: String,
}

impl Annotation {
    pub fn new(
        id: impl Into<String>,
        sentence: impl Into<String>,
        tag_sequence: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            sentence: sentence.into(),
            tag_sequence: tag_sequence.into(),
        }
    }
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn sentence(&self) -> &str {
        &self.sentence
    }
    pub fn tag_sequence(&self) -> &str {
        &self.tag_sequence
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
/// Annotations of every episode, keyed by episode name. This is the shape of both the gold file and
/// the submitted file of the leaderboard.
pub struct Submission {
    episodes: BTreeMap<String, Vec<Annotation>>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the annotations of an episode.
    pub fn insert(&mut self, name: impl Into<String>, annotations: Vec<Annotation>) {
        self.episodes.insert(name.into(), annotations);
    }

    pub fn episode(&self, name: &str) -> Option<&[Annotation]> {
        self.episodes.get(name).map(|a| a.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.episodes.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<Annotation>)> for Submission {
    fn from_iter<T: IntoIterator<Item = (S, Vec<Annotation>)>>(iter: T) -> Self {
        Self {
            episodes: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Name of the `i`-th episode. Episodes are numbered from 1.
pub fn episode_name(i: usize) -> String {
    format!("episode{}", i)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Gold,
    Submitted,
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gold => write!(f, "gold"),
            Self::Submitted => write!(f, "submitted"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Error returned when the submitted annotations cannot be paired with the gold annotations.
pub enum AlignmentError {
    #[error("The {side} annotations have no episode `{episode}`")]
    MissingEpisode { episode: String, side: Side },
    #[error("The submitted annotations contain the unexpected episode `{0}`")]
    UnexpectedEpisode(String),
    #[error("The {side} annotations of episode `{episode}` contain the id `{id}` more than once")]
    DuplicateId {
        episode: String,
        side: Side,
        id: String,
    },
    #[error("The ids of episode `{episode}` differ from the gold ids. Missing ids: {missing:?}, unexpected ids: {unexpected:?}")]
    IdMismatch {
        episode: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    #[error("The sentence `{id}` of episode `{episode}` differs from the gold sentence")]
    SentenceMismatch { episode: String, id: String },
    #[error("Invalid example in episode `{episode}`: {source}")]
    Example {
        episode: String,
        source: ComputationError,
    },
}

/// Error returned by `score_submission`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Alignment(#[from] AlignmentError),
    #[error(transparent)]
    Computation(#[from] ComputationError),
}

/// Builds the episodes `episode1` to `episodeN` out of the gold and the submitted annotations,
/// where `N` is `config.episodes()`. The examples keep the order of the gold annotations.
///
/// * `gold`: The gold annotations. Episodes beyond `N` are ignored.
/// * `submitted`: The submitted annotations. They must contain exactly the episodes `1..=N`.
/// * `config`: Gives the number of episodes and the delimiter of the sentences and the tags.
pub fn align_episodes(
    gold: &Submission,
    submitted: &Submission,
    config: &EvalConfig,
) -> Result<Vec<Episode>, AlignmentError> {
    let expected: Vec<String> = (1..=config.episodes()).map(episode_name).collect();
    if let Some(extra) = submitted
        .names()
        .find(|name| !expected.iter().any(|e| e.as_str() == *name))
    {
        return Err(AlignmentError::UnexpectedEpisode(String::from(extra)));
    }
    expected
        .iter()
        .map(|name| align_episode(name, gold, submitted, config))
        .collect()
}

fn align_episode(
    name: &str,
    gold: &Submission,
    submitted: &Submission,
    config: &EvalConfig,
) -> Result<Episode, AlignmentError> {
    let gold_annotations = episode_of(gold, name, Side::Gold)?;
    let mut submitted_index = index_by_id(name, episode_of(submitted, name, Side::Submitted)?)?;

    let mut seen = AHashSet::default();
    let mut pairs = Vec::with_capacity(gold_annotations.len());
    let mut missing = Vec::new();
    for gold_annotation in gold_annotations {
        if !seen.insert(gold_annotation.id()) {
            return Err(AlignmentError::DuplicateId {
                episode: String::from(name),
                side: Side::Gold,
                id: String::from(gold_annotation.id()),
            });
        }
        match submitted_index.remove(gold_annotation.id()) {
            Some(submitted_annotation) => pairs.push((gold_annotation, submitted_annotation)),
            None => missing.push(String::from(gold_annotation.id())),
        }
    }
    if !missing.is_empty() || !submitted_index.is_empty() {
        return Err(AlignmentError::IdMismatch {
            episode: String::from(name),
            missing,
            unexpected: submitted_index.into_keys().map(String::from).sorted().collect(),
        });
    }

    let examples = pairs
        .into_iter()
        .map(|(g, s)| to_example(name, g, s, config))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(episode = name, examples = examples.len(), "Aligned episode");
    Ok(Episode::new(name, examples))
}

fn episode_of<'s>(
    submission: &'s Submission,
    name: &str,
    side: Side,
) -> Result<&'s [Annotation], AlignmentError> {
    submission
        .episode(name)
        .ok_or_else(|| AlignmentError::MissingEpisode {
            episode: String::from(name),
            side,
        })
}

fn index_by_id<'s>(
    name: &str,
    annotations: &'s [Annotation],
) -> Result<AHashMap<&'s str, &'s Annotation>, AlignmentError> {
    let mut index = AHashMap::default();
    for annotation in annotations {
        if index.insert(annotation.id(), annotation).is_some() {
            return Err(AlignmentError::DuplicateId {
                episode: String::from(name),
                side: Side::Submitted,
                id: String::from(annotation.id()),
            });
        }
    }
    Ok(index)
}

fn to_example(
    name: &str,
    gold: &Annotation,
    submitted: &Annotation,
    config: &EvalConfig,
) -> Result<EvaluationExample, AlignmentError> {
    if gold.sentence != submitted.sentence {
        return Err(AlignmentError::SentenceMismatch {
            episode: String::from(name),
            id: String::from(gold.id()),
        });
    }
    let split =
        |line: &str| -> Vec<String> { config.split_fields(line).map(String::from).collect() };
    let gold_tags = split(&gold.tag_sequence);
    let predicted_tags = split(&submitted.tag_sequence);
    if gold_tags.len() != predicted_tags.len() {
        let length_error = InconsistentLengthError {
            id: String::from(gold.id()),
            gold: gold_tags.len(),
            predicted: predicted_tags.len(),
        };
        return Err(AlignmentError::Example {
            episode: String::from(name),
            source: length_error.into(),
        });
    }
    Ok(EvaluationExample::new(
        gold.id(),
        split(&gold.sentence),
        gold_tags,
        predicted_tags,
    ))
}

/// Aligns a submission with the gold annotations and scores every episode.
pub fn score_submission(
    gold: &Submission,
    submitted: &Submission,
    config: &EvalConfig,
) -> Result<SummaryScore, SubmissionError> {
    let episodes = align_episodes(gold, submitted, config)?;
    Ok(evaluate_episodes(&episodes, config)?)
}
