//! Client configuration
//!
//! [`Config`] holds the typed [`Settings`] used to build requests. One
//! process-wide instance is available through [`Config::instance`]; the
//! first call creates it (optionally loading a file) and later calls return
//! the same instance untouched. [`Config::new`] builds an independent
//! instance for callers that would rather pass configuration around
//! explicitly.
//!
//! Settings sit behind a read-write lock. A [`Config::load_file`] call holds
//! the write lock while it applies the file, so readers see either the
//! state before the load or after it.

mod dumper;
mod options;
mod parser;

pub use dumper::ConfigDumper;
pub use options::{find_option, DefaultValue, OptionKind, OptionSpec, OptionValue, Settings, OPTIONS};
pub use parser::{mask_secret, ConfigParser, MalformedLine, ENCODING_KEY};

use crate::{ClientError, Result};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

static INSTANCE: OnceCell<Config> = OnceCell::new();

#[derive(Debug, Default)]
struct State {
    settings: Settings,
    parsed_files: Vec<PathBuf>,
}

/// Configuration store
#[derive(Debug, Default)]
pub struct Config {
    state: RwLock<State>,
}

impl Config {
    /// Create a standalone config holding default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a standalone config and load `path` into it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = Self::new();
        config.load_file(path.as_ref())?;
        Ok(config)
    }

    /// The process-wide config.
    ///
    /// The first call creates it and loads `config_file` if given. If that
    /// load fails, nothing is initialized and the error is returned; a
    /// [`ClientError::ConfigRead`] is meant to end the process. Subsequent
    /// calls return the existing instance and ignore `config_file`; use
    /// [`Config::load_file`] to merge another file.
    pub fn instance(config_file: Option<&Path>) -> Result<&'static Config> {
        if let Some(config) = INSTANCE.get() {
            if let Some(path) = config_file {
                debug!("Config already initialized, not loading '{}'", path.display());
            }
            return Ok(config);
        }

        INSTANCE.get_or_try_init(|| -> Result<Config> {
            let config = Config::new();
            if let Some(path) = config_file {
                config.load_file(path)?;
            }
            Ok(config)
        })
    }

    /// The process-wide config, if it has been created
    pub fn global() -> Option<&'static Config> {
        INSTANCE.get()
    }

    /// Names of all configurable options, in a fixed order
    pub fn option_names() -> Vec<&'static str> {
        OPTIONS.iter().map(|spec| spec.name).collect()
    }

    /// Merge a config file into the current settings.
    ///
    /// Options the file does not mention keep their values. Entries applied
    /// before a failing entry stay applied.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn load_file(&self, path: &Path) -> Result<()> {
        let parser = ConfigParser::parse_file(path, &[])?;

        for key in parser.keys() {
            if key != ENCODING_KEY && find_option(key).is_none() {
                debug!("Ignoring unknown option '{}'", key);
            }
        }

        let mut state = self.state.write();
        for spec in OPTIONS {
            let raw = parser.get(spec.name).map(str::trim);
            state.settings.apply(spec.name, raw)?;
        }
        state.parsed_files.push(path.to_path_buf());
        debug!("Loaded {} entries", parser.len());
        Ok(())
    }

    /// Set one option from its raw text. Empty or absent values are ignored.
    pub fn set_option(&self, name: &str, value: Option<&str>) -> Result<()> {
        self.state.write().settings.apply(name, value)?;
        Ok(())
    }

    /// Current value of one option
    pub fn get_option(&self, name: &str) -> Result<OptionValue> {
        self.state
            .read()
            .settings
            .value(name)
            .ok_or_else(|| ClientError::UnknownOption(name.to_string()))
    }

    /// Snapshot of all settings
    pub fn settings(&self) -> Settings {
        self.state.read().settings.clone()
    }

    /// Files merged so far, oldest first
    pub fn parsed_files(&self) -> Vec<PathBuf> {
        self.state.read().parsed_files.clone()
    }

    /// Write current settings as a `[default]` section
    pub fn dump_to<W: Write>(&self, writer: W) -> Result<()> {
        let settings = self.settings();
        ConfigDumper::new(writer).dump("default", &settings)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_option_names() {
        let names = Config::option_names();
        assert_eq!(
            names,
            vec![
                "access_key",
                "secret_key",
                "put_url",
                "mgr_url",
                "block_size",
                "bput_size",
                "connection_retries",
                "connection_timeout",
                "mkblk_retries",
                "bput_retries",
                "mkfile_retries",
                "tmp_record_folder",
                "concurrency",
                "ishttps",
            ]
        );
        assert_eq!(names, Config::option_names());
    }

    #[test]
    fn test_load_file_applies_options() {
        let file = config_file(
            "[default]\naccess_key = \"AK123\"\nmgr_url = http://mgr.example.com  \nconcurrency = 2\nishttps = Yes\n",
        );
        let config = Config::from_file(file.path()).unwrap();
        let settings = config.settings();

        assert_eq!(settings.access_key, "AK123");
        assert_eq!(settings.mgr_url, "http://mgr.example.com");
        assert_eq!(settings.concurrency, 2);
        assert!(settings.ishttps);
        assert_eq!(settings.block_size, 4 * 1024 * 1024);
        assert_eq!(config.parsed_files(), vec![file.path().to_path_buf()]);
    }

    #[test]
    fn test_last_load_wins() {
        let first = config_file("ishttps = Yes\n");
        let second = config_file("ishttps = off\n");
        let config = Config::new();

        config.load_file(first.path()).unwrap();
        assert_eq!(config.get_option("ishttps").unwrap(), OptionValue::Boolean(true));
        config.load_file(second.path()).unwrap();
        assert_eq!(config.get_option("ishttps").unwrap(), OptionValue::Boolean(false));
        assert_eq!(config.parsed_files().len(), 2);
    }

    #[test]
    fn test_invalid_boolean_fails_load() {
        let file = config_file("mgr_url = http://m\nishttps = maybe\n");
        let config = Config::new();
        let err = config.load_file(file.path()).unwrap_err();

        assert!(matches!(err, ClientError::InvalidBooleanLiteral { ref value, .. } if value == "maybe"));
        // No rollback of options applied earlier in the same file
        assert_eq!(config.settings().mgr_url, "http://m");
        assert!(config.parsed_files().is_empty());
    }

    #[test]
    fn test_malformed_line_does_not_change_options() {
        let file = config_file("[default]\nfoo bar\n");
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.settings(), Settings::default());
    }

    #[test]
    fn test_missing_file_is_config_read_error() {
        let config = Config::new();
        let err = config.load_file(Path::new("/nonexistent/wcs.cfg")).unwrap_err();
        assert!(err.is_config_read());
    }

    #[test]
    fn test_set_option() {
        let config = Config::new();
        config.set_option("connection_timeout", Some("10")).unwrap();
        config.set_option("connection_timeout", Some("")).unwrap();
        assert_eq!(config.settings().connection_timeout, 10);
        assert!(config.set_option("bogus", Some("1")).is_err());
    }

    #[test]
    fn test_dump_round_trip() {
        let config = Config::new();
        let mut out = Vec::new();
        config.dump_to(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("[default]\n"));

        let parser = ConfigParser::parse_str(&text, "dump", &[]);
        for spec in OPTIONS.iter().filter(|spec| !spec.is_secret()) {
            let expected = spec.default_value().to_string();
            assert_eq!(parser.get_or(spec.name, "<missing>"), expected, "{}", spec.name);
        }
    }

    #[test]
    fn test_dumped_file_loads_back() {
        let source = Config::new();
        source.set_option("mgr_url", Some("http://mgr.example.com")).unwrap();
        source.set_option("ishttps", Some("on")).unwrap();
        source.set_option("bput_size", Some("1024")).unwrap();

        let mut file = NamedTempFile::new().unwrap();
        source.dump_to(file.as_file_mut()).unwrap();

        let loaded = Config::from_file(file.path()).unwrap();
        assert_eq!(loaded.settings(), source.settings());
    }
}
