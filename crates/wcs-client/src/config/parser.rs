//! INI-style config file parser

use crate::{ClientError, Result};
use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use super::options::is_secret_option;

static SECTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[([^\]]+)\]").unwrap());
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*#").unwrap());
static EMPTY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*$").unwrap());
static DATA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?P<key>\w+)\s*=\s*(?P<value>.*)$").unwrap());
static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^"(.*)"$"#).unwrap());

/// Key that selects the file's text encoding
pub const ENCODING_KEY: &str = "encoding";

/// A line that was neither comment, blank, section nor `key = value`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MalformedLine {
    /// File name (or other source label)
    pub source: String,
    /// 1-based line number
    pub line_number: usize,
    /// Raw line text
    pub line: String,
}

/// Flat key/value view of one config file
#[derive(Clone, Debug, Default)]
pub struct ConfigParser {
    values: HashMap<String, String>,
    warnings: Vec<MalformedLine>,
}

impl ConfigParser {
    /// Read and parse a file. An empty `sections` slice accepts every section.
    ///
    /// The file is decoded as UTF-8 unless it declares a different
    /// `encoding`, in which case it is decoded with that encoding. Only the
    /// final decode is parsed and logged.
    pub fn parse_file(path: &Path, sections: &[&str]) -> Result<Self> {
        debug!("ConfigParser: Reading file '{}'", path.display());
        let bytes = std::fs::read(path).map_err(|source| ClientError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let source = path.display().to_string();

        let (text, _, malformed) = UTF_8.decode(&bytes);
        let declared = match declared_encoding(&text, sections) {
            Some(label) => Encoding::for_label(label.trim().as_bytes())
                .ok_or(ClientError::UnknownEncoding(label))?,
            None => UTF_8,
        };

        if declared == UTF_8 {
            if malformed {
                return Err(ClientError::ConfigRead {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "file is not valid UTF-8",
                    ),
                });
            }
            return Ok(Self::parse_str(&text, &source, sections));
        }

        debug!("ConfigParser: Decoding '{}' as {}", source, declared.name());
        let (text, _, malformed) = declared.decode(&bytes);
        if malformed {
            warn!("Replaced undecodable bytes in '{}' ({})", source, declared.name());
        }
        Ok(Self::parse_str(&text, &source, sections))
    }

    /// Parse already-decoded text. `source` labels diagnostics.
    pub fn parse_str(text: &str, source: &str, sections: &[&str]) -> Self {
        let mut parser = Self::default();
        let mut in_our_section = true;

        for (index, line) in text.lines().enumerate() {
            if COMMENT.is_match(line) || EMPTY.is_match(line) {
                continue;
            }

            if let Some(caps) = SECTION.captures(line) {
                let section = &caps[1];
                in_our_section = sections.is_empty() || sections.contains(&section);
                continue;
            }

            if !in_our_section {
                continue;
            }

            if let Some(caps) = DATA.captures(line) {
                let key = &caps["key"];
                let value = unquote(&caps["value"]);

                if is_secret_option(key) {
                    debug!("ConfigParser: {}->{}", key, mask_secret(value));
                } else {
                    debug!("ConfigParser: {}->{}", key, value);
                }
                parser.values.insert(key.to_string(), value.to_string());
                continue;
            }

            warn!("Ignoring invalid line in '{}': {}", source, line);
            parser.warnings.push(MalformedLine {
                source: source.to_string(),
                line_number: index + 1,
                line: line.to_string(),
            });
        }

        parser
    }

    /// Stored value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Stored value for `key`, or `default` when absent
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// All parsed keys
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Lines that were ignored as invalid
    pub fn warnings(&self) -> &[MalformedLine] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Value of the `encoding` key, found without logging or recording warnings
fn declared_encoding(text: &str, sections: &[&str]) -> Option<String> {
    let mut in_our_section = true;
    let mut encoding = None;

    for line in text.lines() {
        if COMMENT.is_match(line) || EMPTY.is_match(line) {
            continue;
        }
        if let Some(caps) = SECTION.captures(line) {
            let section = &caps[1];
            in_our_section = sections.is_empty() || sections.contains(&section);
            continue;
        }
        if !in_our_section {
            continue;
        }
        if let Some(caps) = DATA.captures(line) {
            if &caps["key"] == ENCODING_KEY {
                encoding = Some(unquote(&caps["value"]).to_string());
            }
        }
    }

    encoding
}

/// Drop trailing whitespace and one pair of surrounding double quotes
fn unquote(raw: &str) -> &str {
    let value = raw.trim_end();
    match QUOTED.captures(value).and_then(|c| c.get(1)) {
        Some(inner) => inner.as_str(),
        None => value,
    }
}

/// Render a secret for logs: first and last character around the elided count.
///
/// `"ABCDEFGH"` becomes `"A...6_chars...H"`. Values of two characters or
/// fewer are elided entirely.
pub fn mask_secret(value: &str) -> String {
    let count = value.chars().count();
    if count <= 2 {
        return format!("...{}_chars...", count);
    }
    let first = value.chars().next().unwrap_or_default();
    let last = value.chars().last().unwrap_or_default();
    format!("{}...{}_chars...{}", first, count - 2, last)
}
