use crate::entity::ParsingError;
use crate::matcher::{CountTable, Counts};
use crate::reporter::{ClassScore, EpisodeScore, Prf};
use itertools::multizip;
use ndarray::{prelude::*, Zip};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Clone, Error)]
/// Error type to represent when the gold tags and the predicted tags of an example are not of the
/// same length.
#[error("Inconsistent length between the tags of example `{id}`. The gold tags are length {gold}, the predicted tags are length {predicted}")]
pub struct InconsistentLengthError {
    pub id: String,
    pub gold: usize,
    pub predicted: usize,
}

#[derive(Debug, PartialEq, Eq, Clone, Error)]
/// Error returned when an episode cannot be scored. Scoring never falls back to a zero score on
/// malformed input.
pub enum ComputationError {
    #[error("Could not parse the tags of example `{id}`: {source}")]
    Parsing { id: String, source: ParsingError },
    #[error(transparent)]
    InconsistentLength(#[from] InconsistentLengthError),
    #[error("Example `{id}` has {tokens} tokens but {tags} tags")]
    TokenCount {
        id: String,
        tokens: usize,
        tags: usize,
    },
    #[error("Received an empty input: `{0}`")]
    EmptyInput(String),
}

/// Divides the numerator by the denominator, element wise. Where the denominator is zero, the
/// result is zero.
#[inline(always)]
fn prf_divide(numerator: Array1<f64>, mut denominator: Array1<f64>) -> Array1<f64> {
    let zero_mask = Zip::from(&denominator).map_collect(|d| if *d == 0. { 0. } else { 1. });
    denominator.mapv_inplace(|v| if v == 0. { 1. } else { v });
    numerator / denominator * zero_mask
}

/// Computes the precision, the recall and the F1 score, in percent, of every bucket at once.
fn precision_recall_f1(counts: &[Counts]) -> (Array1<f64>, Array1<f64>, Array1<f64>) {
    let found_correct: Array1<f64> = counts.iter().map(|c| c.found_correct as f64).collect();
    let found_guessed: Array1<f64> = counts.iter().map(|c| c.found_guessed as f64).collect();
    let correct_chunk: Array1<f64> = counts.iter().map(|c| c.correct_chunk as f64).collect();
    let scaled_correct = correct_chunk * 100.;
    let precision = prf_divide(scaled_correct.clone(), found_guessed);
    let recall = prf_divide(scaled_correct, found_correct);
    let f1 = prf_divide(&precision * &recall * 2., &precision + &recall);
    (precision, recall, f1)
}

/// Turns the counts of an episode into its scores. The per-category scores are computed together
/// over the sorted categories of the table.
pub fn score(table: &CountTable) -> EpisodeScore {
    let overall_counts = table.overall();
    let (p, r, f1) = precision_recall_f1(std::slice::from_ref(&overall_counts));
    let overall = Prf {
        precision: p[0],
        recall: r[0],
        f1: f1[0],
    };

    let category_counts: Vec<Counts> = table.per_category().values().copied().collect();
    let (p, r, f1) = precision_recall_f1(&category_counts);
    let mut per_category = BTreeMap::new();
    for (category, counts, precision, recall, f1) in multizip((
        table.per_category().keys(),
        category_counts.iter(),
        p.iter().copied(),
        r.iter().copied(),
        f1.iter().copied(),
    )) {
        per_category.insert(
            String::from(*category),
            ClassScore {
                precision,
                recall,
                f1,
                found_guessed: counts.found_guessed,
                support: counts.found_correct,
            },
        );
    }

    let accuracy = if table.token_count() == 0 {
        0.
    } else {
        100. * table.correct_tags() as f64 / table.token_count() as f64
    };
    EpisodeScore {
        accuracy,
        overall,
        counts: overall_counts,
        token_count: table.token_count(),
        per_category,
    }
}
