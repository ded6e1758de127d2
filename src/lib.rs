/*!
This library scores predicted tag sequences against gold tag sequences at the chunk level, the way
the conlleval script of the CoNLL shared tasks does. It computes the precision, the recall and the
F1 score of every category and of all the chunks together, for several independent evaluation
sets called episodes, and averages the F1 scores of the episodes.
# SCHEMES
The chunk boundaries are read from the tags with a single automaton. There is no scheme to
configure and the schemes can even be mixed:
* IOB1: `I` is a token inside a chunk, `O` is a token outside a chunk and `B` is the beginning of
    a chunk immediately following another chunk of the same category.
* IOB2: It is same as IOB1, except that a `B` tag is given to the first token of every chunk.
* IOE1 and IOE2: An `E` tag marks the last token of a chunk, either only before a chunk of the
    same category (IOE1) or for every chunk (IOE2).
* IOBES: `S` marks a chunk of a single token and `E` the last token of a longer chunk.
* Brackets: `[` and `]` tags are single-token chunks.

Unknown prefixes (such as `U` or `L`) are accepted: they only start or end a chunk when the
category changes. The `.` tag behaves like the outside tag.

# Terminology
* A category is what a chunk refers to, such as `PER` for person or `NP` for a noun phrase.
* A tag is a prefix and a category separated by the first `-`, such as `B-PER` or `B-ORG-CORP`,
    or the outside tag `O`.
* A chunk is a contiguous span of tokens of the same category. A predicted chunk is correct only
    if a gold chunk has the same start, the same end and the same category.
* An episode is a list of examples scored together. The scores of an episode do not depend on the
    other episodes.
*/

mod config;
mod entity;
mod episode;
mod matcher;
mod metrics;
mod reporter;
mod submission;

// The public api starts here
pub use config::{
    EvalConfig, EvalConfigBuilder, DEFAULT_DELIMITER, DEFAULT_EPISODES, DEFAULT_OUTSIDE_TAG,
};

pub use entity::{
    end_of_chunk, extract_chunks, start_of_chunk, Chunk, ChunkIter, ParsingError, Prefix, Tag,
    TaggedSentence,
};

pub use episode::{evaluate_episode, evaluate_episodes, mean_f1, Episode, EvaluationExample};

pub use matcher::{CountTable, Counts};

pub use metrics::{score, ComputationError, InconsistentLengthError};

pub use reporter::{ClassScore, EpisodeReport, EpisodeScore, Prf, SummaryScore};

pub use submission::{
    align_episodes, episode_name, score_submission, AlignmentError, Annotation, Side, Submission,
    SubmissionError,
};

/// Main entrypoint of the chunkeval library. This function scores every episode and returns the
/// scores of each one of them with the average of their overall F1 scores. The returned structure
/// can be used to prettyprint the results or be serialized. Instead of borrowing the config, this
/// function takes it by value, which is handy with the `EvalConfigBuilder`.
///
/// * `episodes`: The episodes to score.
/// * `config`: Parameters used to parse the tags and to schedule the episodes.
///
/// #Example
/// ```rust
/// use chunkeval::{evaluate_episodes_conf, EvalConfigBuilder, Episode, EvaluationExample};
///
/// let example = EvaluationExample::from_tags(
///     "1",
///     &["B-PER", "I-PER", "O", "B-LOC"],
///     &["B-PER", "I-PER", "O", "O"],
/// );
/// let episodes = vec![Episode::new("episode1", vec![example])];
/// let config = EvalConfigBuilder::default().parallel(true).build();
///
/// let summary = evaluate_episodes_conf(&episodes, config).unwrap();
/// let expected_summary = "episode1: 66.67
/// Average: 66.67";
/// assert_eq!(summary.to_string(), expected_summary);
/// ```
pub fn evaluate_episodes_conf(
    episodes: &[Episode],
    config: EvalConfig,
) -> Result<SummaryScore, ComputationError> {
    evaluate_episodes(episodes, &config)
}
