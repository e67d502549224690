//! Front-matter extraction from markdown text.
//!
//! A document may start with a `---`-delimited YAML block; everything
//! after the closing delimiter is the body. Documents without an
//! opening delimiter (or with an unterminated block) are treated as
//! all body.

use std::collections::HashMap;

use serde::Deserialize;

/// Metadata parsed from a front-matter block.
///
/// `title` and `description` are pulled out because pages surface them
/// directly; every other field is carried verbatim in `extra`.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct FrontMatter {
    /// Page title.
    #[serde(default)]
    pub title: Option<String>,
    /// Page description.
    #[serde(default)]
    pub description: Option<String>,
    /// Remaining front-matter fields, merged into the page record
    /// verbatim.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// Split text into front matter and body.
///
/// # Errors
///
/// Returns an error if a delimited block is present but is not valid
/// YAML.
pub fn parse(text: &str) -> Result<(FrontMatter, String), serde_yaml::Error> {
    let Some(block) = front_matter_block(text) else {
        return Ok((FrontMatter::default(), text.to_owned()));
    };
    let (meta, body) = block;

    let front = if meta.trim().is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str(meta)?
    };
    Ok((front, body.to_owned()))
}

/// Locate the front-matter block, returning `(metadata, body)` slices.
///
/// Returns `None` when the text does not open with a `---` line or the
/// block is never closed.
fn front_matter_block(text: &str) -> Option<(&str, &str)> {
    let rest = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))?;

    // Closing delimiter as the immediately following line.
    if let Some(body) = rest.strip_prefix("---\n").or_else(|| rest.strip_prefix("---\r\n")) {
        return Some(("", body));
    }
    if rest == "---" {
        return Some(("", ""));
    }

    let mut search = 0;
    while let Some(found) = rest[search..].find("\n---") {
        let at = search + found;
        let after = &rest[at + 4..];
        if after.is_empty() {
            return Some((&rest[..at], ""));
        }
        if let Some(body) = after.strip_prefix('\n').or_else(|| after.strip_prefix("\r\n")) {
            return Some((&rest[..at], body));
        }
        search = at + 4;
    }
    None
}
