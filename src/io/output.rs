use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use super::DocumentFormat;

/// Where serialized documents (results, schemas) are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputDestination {
    Stdout,
    File(PathBuf),
}

impl OutputDestination {
    pub fn file(path: impl AsRef<Path>) -> Self {
        OutputDestination::File(path.as_ref().to_path_buf())
    }

    fn describe(&self) -> String {
        match self {
            OutputDestination::Stdout => "stdout".to_string(),
            OutputDestination::File(path) => format!("file {}", path.display()),
        }
    }
}

/// Format, layout and destinations for [`emit`]. Defaults to pretty JSON on
/// stdout.
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    pub pretty: bool,
    pub destinations: Vec<OutputDestination>,
}

impl OutputOptions {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format,
            pretty: true,
            destinations: vec![OutputDestination::Stdout],
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_destinations(mut self, destinations: Vec<OutputDestination>) -> Self {
        self.destinations = destinations;
        self
    }
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self::new(DocumentFormat::default())
    }
}

/// Serialize `value` once and write it, newline-terminated, to every
/// destination. Nothing is serialized when there are no destinations.
pub fn emit<T: Serialize + ?Sized>(value: &T, options: &OutputOptions) -> Result<()> {
    if options.destinations.is_empty() {
        return Ok(());
    }
    let payload = serialize_value(value, options)?;
    for destination in &options.destinations {
        let written = match destination {
            OutputDestination::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{payload}").and_then(|()| stdout.flush())
            }
            OutputDestination::File(path) => fs::write(path, format!("{payload}\n")),
        };
        written.with_context(|| format!("failed to write to {}", destination.describe()))?;
    }
    Ok(())
}

/// Serialize `value` in the configured format. YAML has no compact layout,
/// so `pretty` only affects JSON and TOML.
pub fn serialize_value<T: Serialize + ?Sized>(
    value: &T,
    options: &OutputOptions,
) -> Result<String> {
    let text = match (options.format, options.pretty) {
        (DocumentFormat::Json, true) => serde_json::to_string_pretty(value)?,
        (DocumentFormat::Json, false) => serde_json::to_string(value)?,
        #[cfg(feature = "yaml")]
        (DocumentFormat::Yaml, _) => serde_yaml::to_string(value)?,
        #[cfg(feature = "toml")]
        (DocumentFormat::Toml, true) => toml::to_string_pretty(value)?,
        #[cfg(feature = "toml")]
        (DocumentFormat::Toml, false) => toml::to_string(value)?,
    };
    Ok(text)
}
