/*!
This module parses single tag tokens (`B-PER`, `I-NP`, `O`, ...) into a prefix and a category.
*/
use crate::config::EvalConfig;
use enum_iterator::Sequence;
use std::fmt::Display;
use std::ops::Deref;
use thiserror::Error;

/// Tag used for tokens outside of any chunk.
pub(crate) const OUTSIDE: &str = "O";
/// Bare symbol treated like the outside tag by the boundary rules.
pub(crate) const DOT: &str = ".";
/// Separates the prefix from the category. Only the first occurrence counts, so categories can
/// contain hyphens (`B-ORG-CORP` has the category `ORG-CORP`).
pub(crate) const CATEGORY_DELIMITER: char = '-';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence)]
/// Scheme symbol found in front of the category. Symbols that are not part of a known scheme are
/// grouped under `Other` and only take part in the category rules of the automaton.
pub enum Prefix {
    B,
    I,
    O,
    E,
    S,
    /// `.`
    Dot,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    Other,
}

impl Prefix {
    pub(crate) fn from_symbol(symbol: &str) -> Self {
        match symbol {
            "B" => Self::B,
            "I" => Self::I,
            "O" => Self::O,
            "E" => Self::E,
            "S" => Self::S,
            "." => Self::Dot,
            "[" => Self::OpenBracket,
            "]" => Self::CloseBracket,
            _ => Self::Other,
        }
    }

    /// Is this prefix one of the outside symbols (`O` or `.`)?
    pub fn is_outside(&self) -> bool {
        matches!(self, Self::O | Self::Dot)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Error returned when a token cannot be read as `PREFIX-CATEGORY` or as an outside symbol.
pub enum ParsingError {
    #[error("Received an empty tag")]
    EmptyTag,
    #[error("The tag `{0}` is neither an outside tag nor of the form `PREFIX-CATEGORY`")]
    MissingDelimiter(String),
    #[error("The tag `{0}` has an empty prefix or an empty category")]
    EmptyPart(String),
    #[error("The outside tag `{0}` cannot carry a category")]
    OutsideWithCategory(String),
}

/// A parsed tag. The category is empty only for the outside symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag<'a> {
    pub(crate) prefix: Prefix,
    /// Raw prefix symbol, kept so that two `Other` prefixes only compare equal when their symbols
    /// do.
    symbol: &'a str,
    pub(crate) category: &'a str,
}

impl<'a> Tag<'a> {
    /// The outside tag. It is also the implicit tag before and after every sentence.
    pub fn outside() -> Self {
        Tag {
            prefix: Prefix::O,
            symbol: OUTSIDE,
            category: "",
        }
    }

    fn dot() -> Self {
        Tag {
            prefix: Prefix::Dot,
            symbol: DOT,
            category: "",
        }
    }

    /// Parses a single token. In raw mode, every token other than the outside tag is read as the
    /// single-token chunk `B-<token>`.
    ///
    /// * `token`: The tag token, such as `B-PER`.
    /// * `config`: Gives the outside tag and whether we are in raw mode.
    pub fn parse(token: &'a str, config: &EvalConfig) -> Result<Self, ParsingError> {
        if token.is_empty() {
            return Err(ParsingError::EmptyTag);
        }
        if token == config.outside_tag() || token == OUTSIDE {
            return Ok(Self::outside());
        }
        if config.raw() {
            return Ok(Tag {
                prefix: Prefix::B,
                symbol: "B",
                category: token,
            });
        }
        if token == DOT {
            return Ok(Self::dot());
        }
        let (symbol, category) = token
            .split_once(CATEGORY_DELIMITER)
            .ok_or_else(|| ParsingError::MissingDelimiter(String::from(token)))?;
        if symbol.is_empty() || category.is_empty() {
            return Err(ParsingError::EmptyPart(String::from(token)));
        }
        let prefix = Prefix::from_symbol(symbol);
        if prefix.is_outside() {
            return Err(ParsingError::OutsideWithCategory(String::from(token)));
        }
        Ok(Tag {
            prefix,
            symbol,
            category,
        })
    }

    pub fn prefix(&self) -> Prefix {
        self.prefix
    }

    pub fn category(&self) -> &'a str {
        self.category
    }
}

impl Display for Tag<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.category.is_empty() {
            write!(f, "{}", self.symbol)
        } else {
            write!(f, "{}{}{}", self.symbol, CATEGORY_DELIMITER, self.category)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// The parsed tags of one sentence, one tag per token.
pub struct TaggedSentence<'a>(Vec<Tag<'a>>);

impl<'a> TaggedSentence<'a> {
    /// Parses every token of the sentence and stops at the first invalid one.
    pub fn parse<S: AsRef<str>>(tokens: &'a [S], config: &EvalConfig) -> Result<Self, ParsingError> {
        let tags: Result<Vec<_>, _> = tokens
            .iter()
            .map(|t| Tag::parse(t.as_ref(), config))
            .collect();
        Ok(Self(tags?))
    }
}

impl<'a> Deref for TaggedSentence<'a> {
    type Target = [Tag<'a>];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
