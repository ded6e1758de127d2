use crate::matcher::Counts;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
/// Precision, recall and F1 score, in percent.
pub struct Prf {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
/// Scores of a single category.
pub struct ClassScore {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Number of predicted chunks of this category.
    pub found_guessed: usize,
    /// Number of gold chunks of this category.
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// Scores of a single episode.
pub struct EpisodeScore {
    /// Percentage of tokens whose predicted tag is exactly the gold tag.
    pub accuracy: f64,
    pub overall: Prf,
    pub counts: Counts,
    pub token_count: usize,
    pub per_category: BTreeMap<String, ClassScore>,
}

impl Display for EpisodeScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "processed {} tokens with {} phrases; found: {} phrases; correct: {}.",
            self.token_count,
            self.counts.found_correct,
            self.counts.found_guessed,
            self.counts.correct_chunk
        )?;
        if self.token_count > 0 {
            writeln!(
                f,
                "accuracy: {:6.2}%; precision: {:6.2}%; recall: {:6.2}%; FB1: {:6.2}",
                self.accuracy, self.overall.precision, self.overall.recall, self.overall.f1
            )?;
        }
        for (category, score) in self.per_category.iter() {
            writeln!(
                f,
                "{:>17}: precision: {:6.2}%; recall: {:6.2}%; FB1: {:6.2}  {}",
                category, score.precision, score.recall, score.f1, score.found_guessed
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Scores of a named episode.
pub struct EpisodeReport {
    pub name: String,
    pub score: EpisodeScore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Scores of every episode, in the order they were given, and the unweighted mean of their overall
/// F1 scores.
pub struct SummaryScore {
    pub episodes: Vec<EpisodeReport>,
    pub average: f64,
}

impl SummaryScore {
    pub fn per_episode_f1(&self) -> Vec<f64> {
        self.episodes.iter().map(|e| e.score.overall.f1).collect()
    }
}

impl Display for SummaryScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for episode in self.episodes.iter() {
            writeln!(f, "{}: {:.2}", episode.name, episode.score.overall.f1)?;
        }
        write!(f, "Average: {:.2}", self.average)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worked_example_score() -> EpisodeScore {
        let mut per_category = BTreeMap::new();
        per_category.insert(
            String::from("LOC"),
            ClassScore {
                support: 1,
                ..Default::default()
            },
        );
        per_category.insert(
            String::from("PER"),
            ClassScore {
                precision: 100.,
                recall: 100.,
                f1: 100.,
                found_guessed: 1,
                support: 1,
            },
        );
        EpisodeScore {
            accuracy: 75.,
            overall: Prf {
                precision: 100.,
                recall: 50.,
                f1: 200. / 3.,
            },
            counts: Counts {
                found_correct: 2,
                found_guessed: 1,
                correct_chunk: 1,
            },
            token_count: 4,
            per_category,
        }
    }

    #[test]
    fn test_episode_score_display() {
        let expected = "processed 4 tokens with 2 phrases; found: 1 phrases; correct: 1.\n\
                        accuracy:  75.00%; precision: 100.00%; recall:  50.00%; FB1:  66.67\n              \
                        LOC: precision:   0.00%; recall:   0.00%; FB1:   0.00  0\n              \
                        PER: precision: 100.00%; recall: 100.00%; FB1: 100.00  1\n";
        assert_eq!(worked_example_score().to_string(), expected);
    }

    #[test]
    fn test_episode_score_display_without_tokens() {
        let expected = "processed 0 tokens with 0 phrases; found: 0 phrases; correct: 0.\n";
        assert_eq!(EpisodeScore::default().to_string(), expected);
    }

    #[test]
    fn test_summary_display() {
        let summary = SummaryScore {
            episodes: vec![
                EpisodeReport {
                    name: String::from("episode1"),
                    score: worked_example_score(),
                },
                EpisodeReport {
                    name: String::from("episode2"),
                    score: EpisodeScore::default(),
                },
            ],
            average: 100. / 3.,
        };
        assert_eq!(
            summary.to_string(),
            "episode1: 66.67\nepisode2: 0.00\nAverage: 33.33"
        );
        assert_eq!(summary.per_episode_f1(), vec![200. / 3., 0.]);
    }

    #[test]
    fn test_serialize_episode_score() {
        let score = worked_example_score();
        let json = serde_json::to_string(&score).unwrap();
        assert!(json.contains("\"per_category\":{\"LOC\""));
        let deserialized: EpisodeScore = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.counts, score.counts);
        assert_eq!(deserialized.per_category.len(), 2);
    }
}
