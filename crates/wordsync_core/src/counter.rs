use crate::frontmatter::strip_frontmatter;

/// Counts words in raw document text.
pub trait WordCounter: Send + Sync {
    fn count(&self, text: &str) -> u32;
}

/// Counts maximal runs of word characters (ASCII letters, ASCII digits, `_`)
/// after removing the first frontmatter span.
#[derive(Debug, Default, Clone, Copy)]
pub struct WordCharCounter;

impl WordCounter for WordCharCounter {
    fn count(&self, text: &str) -> u32 {
        let body = strip_frontmatter(text);
        let mut count = 0u32;
        let mut in_word = false;
        for c in body.chars() {
            let is_word = is_word_char(c);
            if is_word && !in_word {
                count = count.saturating_add(1);
            }
            in_word = is_word;
        }
        count
    }
}

/// Convenience wrapper over [`WordCharCounter`].
pub fn count_words(text: &str) -> u32 {
    WordCharCounter.count(text)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
