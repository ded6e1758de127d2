use serde::Serialize;
use std::{
    fmt::Display,
    iter::{once, Chain, Copied, Once},
    mem::replace,
    slice::Iter,
};

mod automaton;
mod tag;

// Re-exporting
pub use automaton::{end_of_chunk, start_of_chunk};
pub use tag::{ParsingError, Prefix, Tag, TaggedSentence};

/// A chunk is a contiguous span of tokens sharing a category, such as `PER` or `NP`. It contains a
/// start and an end (the end is exclusive, i.e. the index of the first token *after* the chunk).
#[derive(Debug, Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Chunk<'a> {
    pub start: usize,
    pub end: usize,
    pub category: &'a str,
}

impl<'a> Chunk<'a> {
    pub(crate) fn new(start: usize, end: usize, category: &'a str) -> Self {
        Chunk {
            start,
            end,
            category,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl Display for Chunk<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}, {})", self.category, self.start, self.end)
    }
}

/// Retrieves the chunks of a single sentence, ordered by their start.
pub fn extract_chunks<'a>(sentence: &TaggedSentence<'a>) -> Vec<Chunk<'a>> {
    ChunkIter::new(sentence).collect()
}

/// This struct iterates over a *single* sentence and returns the chunks found in it. The sentence
/// is surrounded by outside tags: the first `prev` is `Tag::outside()` and a trailing outside tag
/// is appended to the inner iterator, which closes the last chunk.
pub struct ChunkIter<'s, 'a> {
    /// The tags on which we are iterating, followed by the trailing outside tag.
    inner: Chain<Copied<Iter<'s, Tag<'a>>>, Once<Tag<'a>>>,
    prev: Tag<'a>,
    /// Start and category of the chunk being read, if any.
    open: Option<(usize, &'a str)>,
    index: usize,
}

impl<'s, 'a> ChunkIter<'s, 'a> {
    pub fn new(tags: &'s [Tag<'a>]) -> Self {
        ChunkIter {
            inner: tags.iter().copied().chain(once(Tag::outside())),
            prev: Tag::outside(),
            open: None,
            index: 0,
        }
    }

    fn close(&mut self, end: usize) -> Option<Chunk<'a>> {
        self.open
            .take()
            .map(|(start, category)| Chunk::new(start, end, category))
    }
}

impl<'a> Iterator for ChunkIter<'_, 'a> {
    type Item = Chunk<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let cur = self.inner.next()?;
            let index = self.index;
            self.index += 1;
            let prev = replace(&mut self.prev, cur);
            let mut closed = None;
            if end_of_chunk(&prev, &cur) {
                closed = self.close(index);
            }
            if start_of_chunk(&prev, &cur) {
                // A start always closes the previous chunk, so chunks never overlap.
                if closed.is_none() {
                    closed = self.close(index);
                }
                self.open = Some((index, cur.category));
            }
            if closed.is_some() {
                return closed;
            }
        }
    }
}
