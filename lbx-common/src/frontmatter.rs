//! Frontmatter parsing for Markdown lesson files
//!
//! Parses the metadata block delimited by `---` lines at the top of a
//! document. This is deliberately a narrow subset, not YAML:
//!
//! - `key: value` pairs, one per line
//! - quoted strings (`"x"` or `'x'`) are unquoted
//! - flat bracketed lists (`[a, "b"]`) become lists of trimmed, unquoted strings
//! - integer and float literals become numbers
//! - `true` / `false` / `null` become the corresponding primitives
//! - everything else stays a string
//!
//! Nested mappings, multi-line values, and anchors are out of grammar; a
//! document using them parses to whatever the rules above yield. A document
//! with no well-formed frontmatter block parses to empty metadata with the
//! full text as content.

use crate::model::{file_stem, Lesson, ORDER_LAST};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A parsed frontmatter scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
    List(Vec<String>),
}

/// Parsed frontmatter block: a flat key/value mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    fields: HashMap<String, Value>,
}

impl Frontmatter {
    /// String value for `key`, if present and a string.
    pub fn str(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Integer value for `key`; floats are truncated.
    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.fields.get(key) {
            Some(Value::Integer(n)) => Some(*n),
            Some(Value::Float(f)) => Some(*f as i64),
            _ => None,
        }
    }

    /// List value for `key`; a bare string counts as a one-element list.
    pub fn str_list(&self, key: &str) -> Option<Vec<String>> {
        match self.fields.get(key) {
            Some(Value::List(items)) => Some(items.clone()),
            Some(Value::String(s)) => Some(vec![s.clone()]),
            _ => None,
        }
    }

    /// Raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Split a document into parsed frontmatter and the remaining Markdown body.
///
/// Returns empty metadata and the whole text when no well-formed block is
/// found (missing opening line, or an unterminated block).
pub fn parse(text: &str) -> (Frontmatter, &str) {
    match split_block(text) {
        Some((block, body)) => (parse_block(block), body),
        None => (Frontmatter::default(), text),
    }
}

/// Build a `Lesson` from a raw Markdown document.
///
/// Missing `title` falls back to the filename stem, missing `order` to the
/// sort-last sentinel, missing `tags` to an empty list.
pub fn lesson_from_markdown(
    path: impl Into<String>,
    raw: &str,
    last_modified: DateTime<Utc>,
) -> Lesson {
    let path = path.into();
    let (meta, body) = parse(raw);
    let title = meta
        .str("title")
        .map(str::to_string)
        .unwrap_or_else(|| file_stem(&path).to_string());
    Lesson {
        title,
        order: meta.integer("order").unwrap_or(ORDER_LAST),
        parent: meta.str("parent").map(str::to_string),
        tags: meta.str_list("tags").unwrap_or_default(),
        path,
        content: body.to_string(),
        last_modified,
    }
}

/// Locate the `---` delimited block. The opening line must be the first line
/// of the document; the closing line may be the last line of the document.
fn split_block(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix("---")?;
    let newline = rest.find('\n')?;
    if !rest[..newline].trim().is_empty() {
        // something other than whitespace after the opening dashes
        return None;
    }
    let after = &rest[newline + 1..];

    let mut offset = 0;
    for line in after.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']).trim() == "---" {
            let block = &after[..offset];
            let body = &after[offset + line.len()..];
            return Some((block, body));
        }
        offset += line.len();
    }
    None
}

fn parse_block(block: &str) -> Frontmatter {
    let mut fields = HashMap::new();
    for line in block.lines() {
        let Some(colon) = line.find(':') else { continue };
        if colon == 0 {
            continue;
        }
        let key = line[..colon].trim();
        if key.is_empty() {
            continue;
        }
        let raw = line[colon + 1..].trim();
        fields.insert(key.to_string(), parse_value(raw));
    }
    Frontmatter { fields }
}

fn parse_value(raw: &str) -> Value {
    if raw.starts_with('[') && raw.ends_with(']') && raw.len() >= 2 {
        let items = raw[1..raw.len() - 1]
            .split(',')
            .map(|item| unquote(item.trim()).to_string())
            .filter(|item| !item.is_empty())
            .collect();
        return Value::List(items);
    }
    let unquoted = unquote(raw);
    if unquoted.len() != raw.len() {
        // explicitly quoted values are always strings
        return Value::String(unquoted.to_string());
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Integer(n);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::Float(f);
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        _ => Value::String(raw.to_string()),
    }
}

fn unquote(raw: &str) -> &str {
    if raw.len() >= 2
        && ((raw.starts_with('"') && raw.ends_with('"'))
            || (raw.starts_with('\'') && raw.ends_with('\'')))
    {
        &raw[1..raw.len() - 1]
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let doc = "---\ntitle: \"Intro\"\norder: 2\ntags: [a, b]\n---\nBody text";
        let (meta, body) = parse(doc);
        assert_eq!(meta.str("title"), Some("Intro"));
        assert_eq!(meta.integer("order"), Some(2));
        assert_eq!(
            meta.str_list("tags"),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(body, "Body text");
    }

    #[test]
    fn test_no_frontmatter() {
        let doc = "# Just a heading\n\nSome text";
        let (meta, body) = parse(doc);
        assert!(meta.is_empty());
        assert_eq!(body, doc);
    }

    #[test]
    fn test_unterminated_block_is_plain_content() {
        let doc = "---\ntitle: Broken\nno closing delimiter";
        let (meta, body) = parse(doc);
        assert!(meta.is_empty());
        assert_eq!(body, doc);
    }

    #[test]
    fn test_scalar_kinds() {
        let doc = "---\nn: 7\nf: 2.5\nyes: true\nno: false\nnothing: null\nplain: hello world\n---\n";
        let (meta, _) = parse(doc);
        assert_eq!(meta.get("n"), Some(&Value::Integer(7)));
        assert_eq!(meta.get("f"), Some(&Value::Float(2.5)));
        assert_eq!(meta.get("yes"), Some(&Value::Bool(true)));
        assert_eq!(meta.get("no"), Some(&Value::Bool(false)));
        assert_eq!(meta.get("nothing"), Some(&Value::Null));
        assert_eq!(
            meta.get("plain"),
            Some(&Value::String("hello world".to_string()))
        );
    }

    #[test]
    fn test_quoted_values_stay_strings() {
        let doc = "---\ntitle: '3'\nsingle: 'one'\n---\nx";
        let (meta, _) = parse(doc);
        assert_eq!(meta.get("title"), Some(&Value::String("3".to_string())));
        assert_eq!(meta.str("single"), Some("one"));
    }

    #[test]
    fn test_quoted_list_items() {
        let doc = "---\ntags: [\"basics\", 'loops' , control]\n---\nx";
        let (meta, _) = parse(doc);
        assert_eq!(
            meta.str_list("tags"),
            Some(vec![
                "basics".to_string(),
                "loops".to_string(),
                "control".to_string()
            ])
        );
    }

    #[test]
    fn test_empty_list() {
        let doc = "---\ntags: []\n---\nx";
        let (meta, _) = parse(doc);
        assert_eq!(meta.str_list("tags"), Some(Vec::new()));
    }

    #[test]
    fn test_lines_without_colon_are_skipped() {
        let doc = "---\ntitle: Ok\nnot a mapping line\n: empty key\n---\nx";
        let (meta, _) = parse(doc);
        assert_eq!(meta.str("title"), Some("Ok"));
        assert_eq!(meta.get("not a mapping line"), None);
    }

    #[test]
    fn test_lesson_from_markdown_defaults() {
        let when = Utc::now();
        let lesson = lesson_from_markdown("basics/loops.md", "just a body", when);
        assert_eq!(lesson.title, "loops");
        assert_eq!(lesson.order, ORDER_LAST);
        assert_eq!(lesson.parent, None);
        assert!(lesson.tags.is_empty());
        assert_eq!(lesson.content, "just a body");
        assert_eq!(lesson.last_modified, when);
    }

    #[test]
    fn test_lesson_from_markdown_full() {
        let doc = "---\ntitle: Loops\norder: 1\nparent: basics.md\ntags: [basics, control]\n---\nfor and while";
        let lesson = lesson_from_markdown("basics/loops.md", doc, Utc::now());
        assert_eq!(lesson.title, "Loops");
        assert_eq!(lesson.order, 1);
        assert_eq!(lesson.parent.as_deref(), Some("basics.md"));
        assert_eq!(lesson.tags, vec!["basics", "control"]);
        assert_eq!(lesson.content, "for and while");
    }

    #[test]
    fn test_crlf_document() {
        let doc = "---\r\ntitle: Intro\r\n---\r\nBody";
        let (meta, body) = parse(doc);
        assert_eq!(meta.str("title"), Some("Intro"));
        assert_eq!(body, "Body");
    }
}
