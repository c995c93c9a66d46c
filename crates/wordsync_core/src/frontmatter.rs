use std::borrow::Cow;
use std::ops::Range;

/// Marker that opens and closes a frontmatter block.
pub const DELIMITER: &str = "---";

/// Byte range of the first `---` … `---` span in `text`, delimiters included.
///
/// The opening delimiter is the first occurrence anywhere in the text, not only
/// at the start of the document, and the closing one is the next occurrence after
/// it. Line breaks inside the span are irrelevant. Returns `None` when no closing
/// delimiter follows the first opening one.
pub fn frontmatter_span(text: &str) -> Option<Range<usize>> {
    let open = text.find(DELIMITER)?;
    let body_start = open + DELIMITER.len();
    let close = text[body_start..].find(DELIMITER)? + body_start;
    Some(open..close + DELIMITER.len())
}

/// Removes the span found by [`frontmatter_span`], leaving the text untouched
/// when there is none.
pub fn strip_frontmatter(text: &str) -> Cow<'_, str> {
    match frontmatter_span(text) {
        Some(span) => {
            let mut stripped = String::with_capacity(text.len() - span.len());
            stripped.push_str(&text[..span.start]);
            stripped.push_str(&text[span.end..]);
            Cow::Owned(stripped)
        }
        None => Cow::Borrowed(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_covers_both_delimiters() {
        let text = "---\nfoo: bar\n---\nbody";
        assert_eq!(frontmatter_span(text), Some(0..16));
        assert_eq!(strip_frontmatter(text), "\nbody");
    }

    #[test]
    fn single_delimiter_is_left_alone() {
        assert_eq!(frontmatter_span("a --- b"), None);
        assert!(matches!(strip_frontmatter("a --- b"), Cow::Borrowed("a --- b")));
    }

    #[test]
    fn four_dashes_do_not_pair_with_themselves() {
        assert_eq!(frontmatter_span("----"), None);
        assert_eq!(frontmatter_span("------"), Some(0..6));
    }

    #[test]
    fn first_pair_anywhere_wins() {
        // A horizontal rule before the real header pairs with the header's opener.
        let text = "intro\n---\nmiddle\n---\nfoo: bar\n---\nend";
        assert_eq!(strip_frontmatter(text), "intro\n\nfoo: bar\n---\nend");
    }
}
