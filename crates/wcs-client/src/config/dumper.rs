//! Write settings back out in the format the parser reads

use std::io::{self, Write};

use super::options::{Settings, OPTIONS};

/// Serializes settings as one `[section]` of `name = value` lines.
///
/// Values are written unquoted.
pub struct ConfigDumper<W: Write> {
    stream: W,
}

impl<W: Write> ConfigDumper<W> {
    pub fn new(stream: W) -> Self {
        Self { stream }
    }

    pub fn dump(&mut self, section: &str, settings: &Settings) -> io::Result<()> {
        writeln!(self.stream, "[{}]", section)?;
        for spec in OPTIONS {
            if let Some(value) = settings.value(spec.name) {
                writeln!(self.stream, "{} = {}", spec.name, value)?;
            }
        }
        self.stream.flush()
    }

    pub fn into_inner(self) -> W {
        self.stream
    }
}
