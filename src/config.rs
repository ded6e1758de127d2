/*
 * This modules contains the `EvalConfig` struct, which implements the default trait, and the
 * builder used to customize it. The config is passed to the episode evaluation functions and to
 * the submission alignment to simplify their arguments.
*/
use either::Either;
use std::fmt::{Debug, Display};

/// Default field separator of the sentence and tag sequence strings.
pub const DEFAULT_DELIMITER: &str = " ";
/// Default tag of the tokens outside of any chunk.
pub const DEFAULT_OUTSIDE_TAG: &str = "O";
/// Default number of episodes expected in a submission.
pub const DEFAULT_EPISODES: usize = 5;

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
/// Config struct used to simplify the inputs of the main functions of `chunkeval`. It implements
/// the default trait.
pub struct EvalConfig {
    /// In raw mode, the tags carry no prefix: every token other than the outside tag is a
    /// single-token chunk of that category.
    raw: bool,
    /// Field separator used when splitting the sentences and the tag sequences of a submission. A
    /// single space (or an empty delimiter) splits on any whitespace.
    delimiter: String,
    /// Tag used for the tokens outside of any chunk. `O` is always accepted as well.
    outside_tag: String,
    /// Number of episodes the submissions must contain, named `episode1` to `episodeN`.
    episodes: usize,
    /// Can we use multiple cores to evaluate the episodes? Each episode is scored on its own rayon
    /// task. This option should be benched.
    parallel: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            raw: false,
            delimiter: String::from(DEFAULT_DELIMITER),
            outside_tag: String::from(DEFAULT_OUTSIDE_TAG),
            episodes: DEFAULT_EPISODES,
            parallel: false,
        }
    }
}

impl From<EvalConfigBuilder> for EvalConfig {
    fn from(value: EvalConfigBuilder) -> Self {
        Self {
            raw: value.raw,
            delimiter: value.delimiter,
            outside_tag: value.outside_tag,
            episodes: value.episodes,
            parallel: value.parallel,
        }
    }
}

impl EvalConfig {
    pub fn raw(&self) -> bool {
        self.raw
    }
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }
    pub fn outside_tag(&self) -> &str {
        &self.outside_tag
    }
    pub fn episodes(&self) -> usize {
        self.episodes
    }
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Splits a sentence or a tag sequence into its fields. The line is trimmed and the empty
    /// fields are skipped.
    pub fn split_fields<'s>(&'s self, line: &'s str) -> impl Iterator<Item = &'s str> + 's {
        let line = line.trim();
        let fields = if self.delimiter.is_empty() || self.delimiter == DEFAULT_DELIMITER {
            Either::Left(line.split_whitespace())
        } else {
            Either::Right(line.split(self.delimiter.as_str()))
        };
        fields.filter(|f| !f.is_empty())
    }
}

impl Display for EvalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let string = format!("Raw tags: {}\n Field delimiter: {:?}\n Outside tag: {}\n Number of episodes: {}\n Using parallel computations: {}", self.raw, self.delimiter, self.outside_tag, self.episodes, self.parallel);
        write!(f, "{}", string)
    }
}

/// This builder can be used to build and customize an `EvalConfig` stucture.
#[derive(Clone, Debug)]
pub struct EvalConfigBuilder {
    raw: bool,
    delimiter: String,
    outside_tag: String,
    episodes: usize,
    parallel: bool,
}

impl Default for EvalConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EvalConfigBuilder {
    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }
    pub fn outside_tag(mut self, outside_tag: impl Into<String>) -> Self {
        self.outside_tag = outside_tag.into();
        self
    }
    pub fn episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
    pub fn new() -> Self {
        Self {
            raw: false,
            delimiter: String::from(DEFAULT_DELIMITER),
            outside_tag: String::from(DEFAULT_OUTSIDE_TAG),
            episodes: DEFAULT_EPISODES,
            parallel: false,
        }
    }
    pub fn build(self) -> EvalConfig {
        EvalConfig::from(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_builder_default_is_default_config() {
        assert_eq!(EvalConfigBuilder::default().build(), EvalConfig::default())
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn test_builder_setters_raw(#[case] raw: bool) {
        let builder = EvalConfigBuilder::default();
        let config = builder.raw(raw).build();
        assert_eq!(config.raw, raw)
    }

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn test_builder_setters_parallel(#[case] parallel: bool) {
        let builder = EvalConfigBuilder::default();
        let config = builder.parallel(parallel).build();
        assert_eq!(config.parallel, parallel)
    }

    #[rstest]
    #[case(1)]
    #[case(5)]
    #[case(12)]
    fn test_builder_setters_episodes(#[case] episodes: usize) {
        let builder = EvalConfigBuilder::default();
        let config = builder.episodes(episodes).build();
        assert_eq!(config.episodes, episodes)
    }

    #[rstest]
    #[case("NONE")]
    #[case("-")]
    fn test_builder_setters_outside_tag(#[case] outside_tag: &str) {
        let builder = EvalConfigBuilder::default();
        let config = builder.outside_tag(outside_tag).build();
        assert_eq!(config.outside_tag(), outside_tag)
    }

    #[rstest]
    #[case(" ", "  B-PER  I-PER\tO ", vec!["B-PER", "I-PER", "O"])]
    #[case("", "B-PER I-PER", vec!["B-PER", "I-PER"])]
    #[case("|", "B-PER||I-PER|O", vec!["B-PER", "I-PER", "O"])]
    #[case(
        ", ",
        "John, Smith, lives",
        vec!["John", "Smith", "lives"]
    )]
    #[case(" ", "   ", vec![])]
    fn test_split_fields(
        #[case] delimiter: &str,
        #[case] line: &str,
        #[case] expected: Vec<&str>,
    ) {
        let config = EvalConfigBuilder::default().delimiter(delimiter).build();
        let actual: Vec<&str> = config.split_fields(line).collect();
        assert_eq!(actual, expected)
    }

    #[test]
    fn test_display_config() {
        let actual = EvalConfig::default().to_string();
        assert!(actual.contains("Outside tag: O"));
        assert!(actual.contains("Number of episodes: 5"));
    }
}
