/*!
This module compares the gold and the predicted tags of aligned examples. Two automata run side by
side over the tags and a chunk is credited as correct only when both streams start it at the same
position with the same category and end it at the same position.
*/
use crate::config::EvalConfig;
use crate::entity::{end_of_chunk, start_of_chunk, Tag, TaggedSentence};
use crate::episode::EvaluationExample;
use crate::metrics::{ComputationError, InconsistentLengthError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
/// Chunk counts of one bucket (a category or the overall bucket).
pub struct Counts {
    /// Number of chunks in the gold tags.
    pub found_correct: usize,
    /// Number of chunks in the predicted tags.
    pub found_guessed: usize,
    /// Number of predicted chunks matching a gold chunk exactly.
    pub correct_chunk: usize,
}

/// Counts accumulated over the examples of one episode. The categories are kept sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CountTable<'a> {
    overall: Counts,
    per_category: BTreeMap<&'a str, Counts>,
    correct_tags: usize,
    token_count: usize,
}

impl<'a> CountTable<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overall(&self) -> Counts {
        self.overall
    }

    /// Counts of every category seen in the gold or in the predicted tags.
    pub fn per_category(&self) -> &BTreeMap<&'a str, Counts> {
        &self.per_category
    }

    pub fn category(&self, category: &str) -> Option<&Counts> {
        self.per_category.get(category)
    }

    /// Number of tokens whose predicted tag is exactly the gold tag.
    pub fn correct_tags(&self) -> usize {
        self.correct_tags
    }

    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// Adds the counts of a single example to the table. Both tag sequences are parsed before the
    /// table is modified, so an invalid example leaves the table untouched.
    ///
    /// * `example`: Example with the gold tags and the predicted tags.
    /// * `config`: Gives the outside tag and the raw mode used when parsing the tags.
    pub fn update(
        &mut self,
        example: &'a EvaluationExample,
        config: &EvalConfig,
    ) -> Result<(), ComputationError> {
        let (gold, predicted) = (example.gold_tags(), example.predicted_tags());
        if gold.len() != predicted.len() {
            return Err(InconsistentLengthError {
                id: String::from(example.id()),
                gold: gold.len(),
                predicted: predicted.len(),
            }
            .into());
        }
        let tokens = example.tokens();
        if !tokens.is_empty() && tokens.len() != gold.len() {
            return Err(ComputationError::TokenCount {
                id: String::from(example.id()),
                tokens: tokens.len(),
                tags: gold.len(),
            });
        }
        let gold = parse_tags(example.id(), gold, config)?;
        let predicted = parse_tags(example.id(), predicted, config)?;
        let mut matcher = ChunkMatcher::new(self);
        for (gold_tag, predicted_tag) in gold.iter().zip(predicted.iter()) {
            matcher.step(*gold_tag, *predicted_tag);
        }
        matcher.finish();
        Ok(())
    }

    fn credit_found_correct(&mut self, category: &'a str) {
        self.overall.found_correct += 1;
        self.per_category.entry(category).or_default().found_correct += 1;
    }

    fn credit_found_guessed(&mut self, category: &'a str) {
        self.overall.found_guessed += 1;
        self.per_category.entry(category).or_default().found_guessed += 1;
    }

    fn credit_correct_chunk(&mut self, category: &'a str) {
        self.overall.correct_chunk += 1;
        self.per_category.entry(category).or_default().correct_chunk += 1;
    }
}

fn parse_tags<'a>(
    id: &str,
    tags: &'a [String],
    config: &EvalConfig,
) -> Result<TaggedSentence<'a>, ComputationError> {
    TaggedSentence::parse(tags, config).map_err(|source| ComputationError::Parsing {
        id: String::from(id),
        source,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    /// No chunk is being compared.
    Idle,
    /// A gold and a predicted chunk started at the same position with the same category and have
    /// not diverged yet.
    Open,
}

/// Drives the gold and the predicted automata over a single example. The example is surrounded by
/// outside tags, like in the `ChunkIter`.
struct ChunkMatcher<'t, 'a> {
    table: &'t mut CountTable<'a>,
    candidate: Candidate,
    prev_gold: Tag<'a>,
    prev_predicted: Tag<'a>,
}

impl<'t, 'a> ChunkMatcher<'t, 'a> {
    fn new(table: &'t mut CountTable<'a>) -> Self {
        ChunkMatcher {
            table,
            candidate: Candidate::Idle,
            prev_gold: Tag::outside(),
            prev_predicted: Tag::outside(),
        }
    }

    fn step(&mut self, gold: Tag<'a>, predicted: Tag<'a>) {
        self.advance(gold, predicted);
        self.table.token_count += 1;
        if gold == predicted {
            self.table.correct_tags += 1;
        }
    }

    /// Closes the last chunks of the example, as if it was followed by an outside tag.
    fn finish(mut self) {
        self.advance(Tag::outside(), Tag::outside());
    }

    fn advance(&mut self, gold: Tag<'a>, predicted: Tag<'a>) {
        let (prev_gold, prev_predicted) = (self.prev_gold, self.prev_predicted);
        let gold_end = end_of_chunk(&prev_gold, &gold);
        let predicted_end = end_of_chunk(&prev_predicted, &predicted);
        let gold_start = start_of_chunk(&prev_gold, &gold);
        let predicted_start = start_of_chunk(&prev_predicted, &predicted);

        if self.candidate == Candidate::Open {
            if gold_end && predicted_end && prev_gold.category == prev_predicted.category {
                self.table.credit_correct_chunk(prev_gold.category);
                self.candidate = Candidate::Idle;
            } else if gold_end != predicted_end || gold.category != predicted.category {
                self.candidate = Candidate::Idle;
            }
        }
        if gold_start && predicted_start && gold.category == predicted.category {
            self.candidate = Candidate::Open;
        }
        if gold_start {
            self.table.credit_found_correct(gold.category);
        }
        if predicted_start {
            self.table.credit_found_guessed(predicted.category);
        }
        self.prev_gold = gold;
        self.prev_predicted = predicted;
    }
}
