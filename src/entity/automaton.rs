/*!
Chunk boundary rules. Both functions look at the previous and the current tag of a stream and
decide whether a chunk started (or ended) between them. The transition tables cover the IOB, IOE
and IOBES schemes as well as the bracket notation, so no scheme needs to be configured.
*/
use super::tag::{Prefix, Tag};

/// Checks if a chunk started between the previous and the current tag.
pub fn start_of_chunk(prev: &Tag, cur: &Tag) -> bool {
    use Prefix::{B, E, I, O, S};
    let by_transition = matches!(
        (prev.prefix, cur.prefix),
        (B | I | O | S | E, B) | (B | I | O | S | E, S) | (O | S | E, I) | (S | E | O, E)
    );
    by_transition
        || (!cur.prefix.is_outside() && prev.category != cur.category)
        || matches!(cur.prefix, Prefix::OpenBracket | Prefix::CloseBracket)
}

/// Checks if a chunk ended between the previous and the current tag.
pub fn end_of_chunk(prev: &Tag, cur: &Tag) -> bool {
    use Prefix::{B, E, I, O, S};
    let by_transition = matches!(
        (prev.prefix, cur.prefix),
        (B, B | O | S) | (I, B | S | O) | (E, E | I | O | S | B) | (S, E | I | O | S | B)
    );
    by_transition
        || (!prev.prefix.is_outside() && prev.category != cur.category)
        // Bracketed chunks are one token long.
        || matches!(prev.prefix, Prefix::OpenBracket | Prefix::CloseBracket)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EvalConfig;
    use rstest::rstest;

    const START_TRANSITIONS: [(char, char); 16] = [
        ('B', 'B'),
        ('I', 'B'),
        ('O', 'B'),
        ('S', 'B'),
        ('E', 'B'),
        ('B', 'S'),
        ('I', 'S'),
        ('O', 'S'),
        ('S', 'S'),
        ('E', 'S'),
        ('O', 'I'),
        ('S', 'I'),
        ('E', 'I'),
        ('S', 'E'),
        ('E', 'E'),
        ('O', 'E'),
    ];
    const END_TRANSITIONS: [(char, char); 16] = [
        ('B', 'B'),
        ('B', 'O'),
        ('B', 'S'),
        ('I', 'B'),
        ('I', 'S'),
        ('I', 'O'),
        ('E', 'E'),
        ('E', 'I'),
        ('E', 'O'),
        ('E', 'S'),
        ('E', 'B'),
        ('S', 'E'),
        ('S', 'I'),
        ('S', 'O'),
        ('S', 'S'),
        ('S', 'B'),
    ];
    const SAME_CATEGORY_TAGS: [&str; 5] = ["B-X", "I-X", "O", "E-X", "S-X"];

    fn tag(token: &'static str) -> Tag<'static> {
        Tag::parse(token, &EvalConfig::default()).unwrap()
    }

    fn first_char(token: &str) -> char {
        token.chars().next().unwrap()
    }

    #[test]
    fn test_start_of_chunk_transition_table() {
        for prev in SAME_CATEGORY_TAGS {
            for cur in SAME_CATEGORY_TAGS {
                let expected = START_TRANSITIONS.contains(&(first_char(prev), first_char(cur)));
                assert_eq!(
                    start_of_chunk(&tag(prev), &tag(cur)),
                    expected,
                    "{} -> {}",
                    prev,
                    cur
                );
            }
        }
    }

    #[test]
    fn test_end_of_chunk_transition_table() {
        for prev in SAME_CATEGORY_TAGS {
            for cur in SAME_CATEGORY_TAGS {
                let expected = END_TRANSITIONS.contains(&(first_char(prev), first_char(cur)));
                assert_eq!(
                    end_of_chunk(&tag(prev), &tag(cur)),
                    expected,
                    "{} -> {}",
                    prev,
                    cur
                );
            }
        }
    }

    #[rstest]
    #[case("I-PER", "I-LOC", true, true)]
    #[case("B-PER", "I-LOC", true, true)]
    #[case("U-PER", "U-PER", false, false)]
    #[case("U-PER", "U-LOC", true, true)]
    #[case("O", "U-PER", true, false)]
    #[case("U-PER", "O", false, true)]
    #[case("B-NP", ".", false, true)]
    #[case(".", "I-NP", true, false)]
    #[case(".", "O", false, false)]
    #[case("[-NP", "]-NP", true, true)]
    #[case("O", "[-NP", true, false)]
    #[case("]-NP", "O", false, true)]
    fn test_boundaries(
        #[case] prev: &'static str,
        #[case] cur: &'static str,
        #[case] start: bool,
        #[case] end: bool,
    ) {
        let (prev, cur) = (tag(prev), tag(cur));
        assert_eq!(start_of_chunk(&prev, &cur), start);
        assert_eq!(end_of_chunk(&prev, &cur), end);
    }
}
