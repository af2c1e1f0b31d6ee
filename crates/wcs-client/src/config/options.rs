//! Option table and typed settings

use crate::{ClientError, Result};
use std::fmt;
use std::time::Duration;

use super::parser::mask_secret;

/// Semantic type of an option
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionKind {
    Text,
    Integer,
    Boolean,
}

impl OptionKind {
    /// Convert a raw file value into a typed value for `option`
    pub fn coerce(self, option: &str, raw: &str) -> Result<OptionValue> {
        match self {
            OptionKind::Text => Ok(OptionValue::Text(raw.to_string())),
            OptionKind::Integer => raw
                .parse::<u64>()
                .map(OptionValue::Integer)
                .map_err(|_| ClientError::InvalidInteger {
                    option: option.to_string(),
                    value: raw.to_string(),
                }),
            OptionKind::Boolean => match raw.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Ok(OptionValue::Boolean(true)),
                "false" | "no" | "off" | "0" => Ok(OptionValue::Boolean(false)),
                _ => Err(ClientError::InvalidBooleanLiteral {
                    option: option.to_string(),
                    value: raw.to_string(),
                }),
            },
        }
    }
}

/// A typed option value
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionValue {
    Text(String),
    Integer(u64),
    Boolean(bool),
}

impl OptionValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::Text(_) => OptionKind::Text,
            OptionValue::Integer(_) => OptionKind::Integer,
            OptionValue::Boolean(_) => OptionKind::Boolean,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Text(s) => f.write_str(s),
            OptionValue::Integer(n) => write!(f, "{}", n),
            OptionValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Default value of a declared option
#[derive(Clone, Copy, Debug)]
pub enum DefaultValue {
    Text(&'static str),
    Integer(u64),
    Boolean(bool),
}

/// A declared option: name, type and default
#[derive(Clone, Copy, Debug)]
pub struct OptionSpec {
    pub name: &'static str,
    pub default: DefaultValue,
}

impl OptionSpec {
    const fn text(name: &'static str, default: &'static str) -> Self {
        Self { name, default: DefaultValue::Text(default) }
    }

    const fn integer(name: &'static str, default: u64) -> Self {
        Self { name, default: DefaultValue::Integer(default) }
    }

    const fn boolean(name: &'static str, default: bool) -> Self {
        Self { name, default: DefaultValue::Boolean(default) }
    }

    pub fn kind(&self) -> OptionKind {
        match self.default {
            DefaultValue::Text(_) => OptionKind::Text,
            DefaultValue::Integer(_) => OptionKind::Integer,
            DefaultValue::Boolean(_) => OptionKind::Boolean,
        }
    }

    pub fn default_value(&self) -> OptionValue {
        match self.default {
            DefaultValue::Text(s) => OptionValue::Text(s.to_string()),
            DefaultValue::Integer(n) => OptionValue::Integer(n),
            DefaultValue::Boolean(b) => OptionValue::Boolean(b),
        }
    }

    /// Whether the value must never appear in logs
    pub fn is_secret(&self) -> bool {
        is_secret_option(self.name)
    }
}

/// Every configurable option, in dump order
pub const OPTIONS: &[OptionSpec] = &[
    OptionSpec::text("access_key", ""),
    OptionSpec::text("secret_key", ""),
    OptionSpec::text("put_url", ""),
    OptionSpec::text("mgr_url", ""),
    // Multipart upload block and chunk size, in bytes
    OptionSpec::integer("block_size", 4 * 1024 * 1024),
    OptionSpec::integer("bput_size", 512 * 1024),
    OptionSpec::integer("connection_retries", 3),
    // Seconds
    OptionSpec::integer("connection_timeout", 40),
    OptionSpec::integer("mkblk_retries", 3),
    OptionSpec::integer("bput_retries", 3),
    OptionSpec::integer("mkfile_retries", 3),
    OptionSpec::text("tmp_record_folder", "/tmp/multipart/"),
    // Upload worker count; keep at or below the core count
    OptionSpec::integer("concurrency", 4),
    OptionSpec::boolean("ishttps", false),
];

/// Look up a declared option by name
pub fn find_option(name: &str) -> Option<&'static OptionSpec> {
    OPTIONS.iter().find(|spec| spec.name == name)
}

pub(crate) fn is_secret_option(name: &str) -> bool {
    matches!(name, "access_key" | "secret_key")
}

/// Current value of every option
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    pub access_key: String,
    pub secret_key: String,
    pub put_url: String,
    pub mgr_url: String,
    pub block_size: u64,
    pub bput_size: u64,
    pub connection_retries: u64,
    pub connection_timeout: u64,
    pub mkblk_retries: u64,
    pub bput_retries: u64,
    pub mkfile_retries: u64,
    pub tmp_record_folder: String,
    pub concurrency: u64,
    pub ishttps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let mut settings = Self {
            access_key: String::new(),
            secret_key: String::new(),
            put_url: String::new(),
            mgr_url: String::new(),
            block_size: 0,
            bput_size: 0,
            connection_retries: 0,
            connection_timeout: 0,
            mkblk_retries: 0,
            bput_retries: 0,
            mkfile_retries: 0,
            tmp_record_folder: String::new(),
            concurrency: 0,
            ishttps: false,
        };
        for spec in OPTIONS {
            let stored = settings.store(spec.name, spec.default_value());
            debug_assert!(stored.is_ok(), "bad default for {}: {:?}", spec.name, stored);
        }
        settings
    }
}

impl Settings {
    /// Read an option by name
    pub fn value(&self, name: &str) -> Option<OptionValue> {
        let value = match name {
            "access_key" => OptionValue::Text(self.access_key.clone()),
            "secret_key" => OptionValue::Text(self.secret_key.clone()),
            "put_url" => OptionValue::Text(self.put_url.clone()),
            "mgr_url" => OptionValue::Text(self.mgr_url.clone()),
            "block_size" => OptionValue::Integer(self.block_size),
            "bput_size" => OptionValue::Integer(self.bput_size),
            "connection_retries" => OptionValue::Integer(self.connection_retries),
            "connection_timeout" => OptionValue::Integer(self.connection_timeout),
            "mkblk_retries" => OptionValue::Integer(self.mkblk_retries),
            "bput_retries" => OptionValue::Integer(self.bput_retries),
            "mkfile_retries" => OptionValue::Integer(self.mkfile_retries),
            "tmp_record_folder" => OptionValue::Text(self.tmp_record_folder.clone()),
            "concurrency" => OptionValue::Integer(self.concurrency),
            "ishttps" => OptionValue::Boolean(self.ishttps),
            _ => return None,
        };
        Some(value)
    }

    /// Store a typed value into the named option
    pub fn store(&mut self, name: &str, value: OptionValue) -> Result<()> {
        let expected = find_option(name)
            .ok_or_else(|| ClientError::UnknownOption(name.to_string()))?
            .kind();
        if value.kind() != expected {
            return Err(ClientError::Config(format!(
                "option '{}' expects {:?}, got {:?}",
                name,
                expected,
                value.kind()
            )));
        }

        match (name, value) {
            ("access_key", OptionValue::Text(v)) => self.access_key = v,
            ("secret_key", OptionValue::Text(v)) => self.secret_key = v,
            ("put_url", OptionValue::Text(v)) => self.put_url = v,
            ("mgr_url", OptionValue::Text(v)) => self.mgr_url = v,
            ("block_size", OptionValue::Integer(v)) => self.block_size = v,
            ("bput_size", OptionValue::Integer(v)) => self.bput_size = v,
            ("connection_retries", OptionValue::Integer(v)) => self.connection_retries = v,
            ("connection_timeout", OptionValue::Integer(v)) => self.connection_timeout = v,
            ("mkblk_retries", OptionValue::Integer(v)) => self.mkblk_retries = v,
            ("bput_retries", OptionValue::Integer(v)) => self.bput_retries = v,
            ("mkfile_retries", OptionValue::Integer(v)) => self.mkfile_retries = v,
            ("tmp_record_folder", OptionValue::Text(v)) => self.tmp_record_folder = v,
            ("concurrency", OptionValue::Integer(v)) => self.concurrency = v,
            ("ishttps", OptionValue::Boolean(v)) => self.ishttps = v,
            _ => return Err(ClientError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Coerce a raw string and store it. Empty or absent values are ignored.
    pub fn apply(&mut self, name: &str, raw: Option<&str>) -> Result<bool> {
        let raw = match raw {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Ok(false),
        };
        let spec = find_option(name).ok_or_else(|| ClientError::UnknownOption(name.to_string()))?;
        let value = spec.kind().coerce(name, raw)?;
        self.store(name, value)?;
        Ok(true)
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout)
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("access_key", &mask_secret(&self.access_key))
            .field("secret_key", &mask_secret(&self.secret_key))
            .field("put_url", &self.put_url)
            .field("mgr_url", &self.mgr_url)
            .field("block_size", &self.block_size)
            .field("bput_size", &self.bput_size)
            .field("connection_retries", &self.connection_retries)
            .field("connection_timeout", &self.connection_timeout)
            .field("mkblk_retries", &self.mkblk_retries)
            .field("bput_retries", &self.bput_retries)
            .field("mkfile_retries", &self.mkfile_retries)
            .field("tmp_record_folder", &self.tmp_record_folder)
            .field("concurrency", &self.concurrency)
            .field("ishttps", &self.ishttps)
            .finish()
    }
}
