//! Locating, parsing and rewriting the leading YAML header of a markdown document.
//!
//! Parsing goes through `serde_yaml`. When a header is written back, every
//! top-level key whose value did not change keeps its original lines, so an
//! edit to one field leaves comments and formatting elsewhere intact.

use serde_json::Value;
use thiserror::Error;
use wordsync_core::{Header, DELIMITER};

#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("invalid yaml frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("frontmatter value cannot be represented: {0}")]
    Convert(#[from] serde_json::Error),
    #[error("frontmatter is not a key-value mapping")]
    NotMapping,
}

/// Header block found at the very start of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontmatterBlock {
    lines: Vec<String>,
    header: Header,
}

/// Lines belonging to one top-level key, or the comments and blanks before the first key.
struct Segment<'a> {
    key: Option<String>,
    lines: &'a [String],
}

impl FrontmatterBlock {
    fn parse(lines: Vec<String>) -> Result<Self, FrontmatterError> {
        let header = parse_header(&lines.join("\n"))?;
        Ok(Self { lines, header })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Splits the block into per-key line groups. `None` when the layout is too
    /// unusual to map lines back to keys, in which case the header is rewritten whole.
    fn segments(&self) -> Option<Vec<Segment<'_>>> {
        let mut starts = Vec::new();
        for (idx, line) in self.lines.iter().enumerate() {
            let top_level = !line.is_empty() && !line.starts_with([' ', '\t', '-', '#']);
            if top_level {
                starts.push(idx);
            }
        }

        let mut segments = Vec::with_capacity(starts.len() + 1);
        let first_key = starts.first().copied().unwrap_or(self.lines.len());
        if first_key > 0 {
            segments.push(Segment {
                key: None,
                lines: &self.lines[..first_key],
            });
        }
        for (n, start) in starts.iter().enumerate() {
            let end = starts.get(n + 1).copied().unwrap_or(self.lines.len());
            let lines = &self.lines[*start..end];
            let key = segment_key(&lines.join("\n"))?;
            segments.push(Segment {
                key: Some(key),
                lines,
            });
        }

        let keyed = segments.iter().filter(|segment| segment.key.is_some()).count();
        let consistent = keyed == self.header.len()
            && segments
                .iter()
                .filter_map(|segment| segment.key.as_deref())
                .all(|key| self.header.contains_key(key));
        consistent.then_some(segments)
    }
}

/// Splits `text` into its leading header block and the body that follows it.
///
/// The block must open on the first line and close on a later line consisting of
/// the delimiter alone; otherwise the whole text is body. A block that is not
/// valid YAML, or not a mapping, is an error.
pub fn split_document(text: &str) -> Result<(Option<FrontmatterBlock>, &str), FrontmatterError> {
    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok((None, text));
    };
    if first.trim_end() != DELIMITER {
        return Ok((None, text));
    }

    let mut offset = first.len();
    let mut header_lines = Vec::new();
    for line in lines {
        offset += line.len();
        if line.trim_end() == DELIMITER {
            let block = FrontmatterBlock::parse(header_lines)?;
            return Ok((Some(block), &text[offset..]));
        }
        header_lines.push(line.trim_end_matches(['\n', '\r']).to_string());
    }
    Ok((None, text))
}

/// Renders `header` in front of `body`, reusing the original lines of `block`
/// for every key whose value did not change.
pub fn render_document(
    block: Option<&FrontmatterBlock>,
    header: &Header,
    body: &str,
) -> Result<String, FrontmatterError> {
    if block.is_none() && header.is_empty() {
        return Ok(body.to_string());
    }

    let mut out = String::with_capacity(body.len() + 128);
    out.push_str(DELIMITER);
    out.push('\n');

    match block.and_then(|block| block.segments().map(|segments| (block, segments))) {
        Some((block, segments)) => {
            for segment in &segments {
                let Some(key) = segment.key.as_deref() else {
                    push_lines(&mut out, segment.lines);
                    continue;
                };
                match header.get(key) {
                    Some(value) if block.header.get(key) == Some(value) => {
                        push_lines(&mut out, segment.lines);
                    }
                    Some(value) => out.push_str(&render_entry(key, value)?),
                    None => {}
                }
            }
            for (key, value) in header {
                if !block.header.contains_key(key) {
                    out.push_str(&render_entry(key, value)?);
                }
            }
        }
        None => out.push_str(&render_mapping(header)?),
    }

    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(body);
    Ok(out)
}

fn parse_header(content: &str) -> Result<Header, FrontmatterError> {
    if content.trim().is_empty() {
        return Ok(Header::new());
    }
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    match serde_json::to_value(yaml)? {
        Value::Object(map) => Ok(map),
        // Only comments.
        Value::Null => Ok(Header::new()),
        _ => Err(FrontmatterError::NotMapping),
    }
}

fn segment_key(text: &str) -> Option<String> {
    let mapping: serde_yaml::Mapping = serde_yaml::from_str(text).ok()?;
    if mapping.len() != 1 {
        return None;
    }
    match mapping.into_iter().next()?.0 {
        serde_yaml::Value::String(key) => Some(key),
        serde_yaml::Value::Number(key) => Some(key.to_string()),
        serde_yaml::Value::Bool(key) => Some(key.to_string()),
        _ => None,
    }
}

fn render_entry(key: &str, value: &Value) -> Result<String, FrontmatterError> {
    let mut single = Header::new();
    single.insert(key.to_string(), value.clone());
    render_mapping(&single)
}

fn render_mapping(header: &Header) -> Result<String, FrontmatterError> {
    if header.is_empty() {
        return Ok(String::new());
    }
    let yaml = serde_yaml::to_string(header)?;
    let trimmed = yaml.trim_end();
    let mut rendered = trimmed.strip_prefix("---\n").unwrap_or(trimmed).to_string();
    rendered.push('\n');
    Ok(rendered)
}

fn push_lines(out: &mut String, lines: &[String]) {
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn header_of(text: &str) -> Value {
        let (block, _) = split_document(text).unwrap();
        Value::Object(block.unwrap().header().clone())
    }

    #[test]
    fn header_requires_leading_delimiter() {
        let (block, body) = split_document("intro\n---\na: 1\n---\n").unwrap();
        assert!(block.is_none());
        assert_eq!(body, "intro\n---\na: 1\n---\n");
    }

    #[test]
    fn unterminated_block_is_body() {
        let (block, body) = split_document("---\na: 1\nno close").unwrap();
        assert!(block.is_none());
        assert_eq!(body, "---\na: 1\nno close");
    }

    #[test]
    fn yaml_values_parse() {
        let text = "---\ntitle: Notes\ncount: 12\nratio: 0.5\ndone: false\nempty:\ntags:\n  - a\n  - b\nflow: [x, y]\n---\nbody";
        assert_eq!(split_document(text).unwrap().1, "body");
        assert_eq!(
            header_of(text),
            json!({
                "title": "Notes",
                "count": 12,
                "ratio": 0.5,
                "done": false,
                "empty": null,
                "tags": ["a", "b"],
                "flow": ["x", "y"],
            })
        );
    }

    #[test]
    fn quoted_keys_and_comments_follow_yaml() {
        let text = "---\n\"status: draft\": yes\nword_count: 4 # words\n---\nbody";
        assert_eq!(
            header_of(text),
            json!({ "status: draft": "yes", "word_count": 4 })
        );
    }

    #[test]
    fn crlf_header_parses() {
        let (block, body) = split_document("---\r\nword_count: 3\r\n---\r\nbody").unwrap();
        assert_eq!(block.unwrap().header().get("word_count"), Some(&json!(3)));
        assert_eq!(body, "body");
    }

    #[test]
    fn comment_only_header_is_empty() {
        assert_eq!(header_of("---\n# nothing yet\n---\nbody"), json!({}));
    }

    #[test]
    fn invalid_or_duplicate_headers_are_errors() {
        assert!(split_document("---\na: [1, 2\n---\nbody").is_err());
        assert!(split_document("---\n- a\n- b\n---\nbody").is_err());
        assert!(split_document("---\nword_count: 1\nword_count: 2\n---\nbody").is_err());
    }

    #[test]
    fn untouched_lines_survive_an_edit() {
        let text = "---\n# keep me\ntitle:   Spaced  # note\ntags:\n  - a\nword_count: 1\n---\nbody\n";
        let (block, body) = split_document(text).unwrap();
        let block = block.unwrap();
        let mut header = block.header().clone();
        header.insert("word_count".into(), json!(7));

        let rendered = render_document(Some(&block), &header, body).unwrap();
        assert_eq!(
            rendered,
            "---\n# keep me\ntitle:   Spaced  # note\ntags:\n  - a\nword_count: 7\n---\nbody\n"
        );
    }

    #[test]
    fn removed_and_added_keys_render() {
        let (block, body) = split_document("---\na: 1\nword_count: 4\n---\nbody").unwrap();
        let block = block.unwrap();
        let mut header = block.header().clone();
        header.shift_remove("word_count");
        header.insert("note".into(), json!("x: y"));

        let rendered = render_document(Some(&block), &header, body).unwrap();
        assert!(rendered.starts_with("---\na: 1\nnote: "));
        assert!(!rendered.contains("word_count"));
        assert_eq!(header_of(&rendered), json!({ "a": 1, "note": "x: y" }));
    }

    #[test]
    fn ambiguous_strings_survive_a_round_trip() {
        let mut header = Header::new();
        header.insert("a".into(), json!("12"));
        header.insert("b".into(), json!("true"));
        header.insert("c".into(), json!("plain text"));

        let rendered = render_document(None, &header, "").unwrap();
        assert_eq!(header_of(&rendered), json!({ "a": "12", "b": "true", "c": "plain text" }));
    }

    #[test]
    fn no_block_and_no_keys_leaves_body_alone() {
        assert_eq!(
            render_document(None, &Header::new(), "just text").unwrap(),
            "just text"
        );
    }
}
