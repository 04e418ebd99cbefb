//! YAML frontmatter handling for markdown notes.
//!
//! A frontmatter block is only recognised when the very first line is exactly
//! the `---` delimiter; the next such line closes it. Anything else is treated
//! as a note without frontmatter. Delimiter lines must match byte-for-byte, so
//! `"--- "`, `"  ---"` and `"---\r"` do not count.

use anyhow::{Context, Result, bail};
use serde_yaml::{Mapping, Value};

pub const DELIMITER: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    yaml_start: usize,
    yaml_end: usize,
    body_start: usize,
}

fn locate(content: &str) -> Option<Span> {
    let mut offset = 0;
    let mut yaml_start = None;

    for (idx, line) in content.split_inclusive('\n').enumerate() {
        let line_start = offset;
        offset += line.len();
        let is_delimiter = line.strip_suffix('\n').unwrap_or(line) == DELIMITER;

        if idx == 0 {
            if !is_delimiter {
                return None;
            }
            yaml_start = Some(offset);
            continue;
        }
        if is_delimiter {
            return Some(Span {
                yaml_start: yaml_start?,
                yaml_end: line_start,
                body_start: offset,
            });
        }
    }
    None
}

/// Split `content` into the raw YAML text and the body that follows the closing delimiter.
pub fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let span = locate(content)?;
    Some((
        &content[span.yaml_start..span.yaml_end],
        &content[span.body_start..],
    ))
}

/// Parse the frontmatter block as a key/value mapping.
///
/// Returns `Ok(None)` when the note has no frontmatter block at all.
pub fn parse_frontmatter(content: &str) -> Result<Option<Mapping>> {
    let Some((yaml, _)) = split_frontmatter(content) else {
        return Ok(None);
    };
    parse_mapping(yaml).map(Some)
}

fn parse_mapping(yaml: &str) -> Result<Mapping> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }
    let value: Value = serde_yaml::from_str(yaml).context("frontmatter is not valid YAML")?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => bail!("frontmatter must be a key/value mapping"),
    }
}

pub fn render_with_frontmatter(mapping: &Mapping, body: &str) -> Result<String> {
    let yaml = if mapping.is_empty() {
        String::new()
    } else {
        serde_yaml::to_string(mapping).context("failed to serialize frontmatter")?
    };
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{body}"))
}

/// Apply `edit` to the note's frontmatter and return the rewritten note.
///
/// The body is carried over byte-for-byte. A note without frontmatter gets a
/// fresh block in front of its existing text.
pub fn update_frontmatter(content: &str, edit: &mut dyn FnMut(&mut Mapping)) -> Result<String> {
    let (mut mapping, body) = match split_frontmatter(content) {
        Some((yaml, body)) => (parse_mapping(yaml)?, body),
        None => (Mapping::new(), content),
    };
    edit(&mut mapping);
    render_with_frontmatter(&mapping, body)
}

/// Insert `section` right after the closing frontmatter delimiter, or at the
/// very start of the note when there is no frontmatter block.
pub fn insert_after_frontmatter(content: &str, section: &str) -> String {
    match locate(content) {
        Some(span) => {
            let (head, body) = content.split_at(span.body_start);
            let separator = if head.ends_with('\n') { "" } else { "\n" };
            format!("{head}{separator}{section}{body}")
        }
        None => format!("{section}{content}"),
    }
}

/// Frontmatter values as display text, for fields the host reads back.
pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
