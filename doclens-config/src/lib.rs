//! Shared configuration loader for the doclens toolchain.
//!
//! The defaults live in `defaults/doclens.default.toml` and are compiled in, so every key
//! always has a value. [`Loader`] stacks a working-directory `doclens.toml`, an explicit
//! `--config` file and command-line overrides over them, then deserializes the result into
//! [`DoclensConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use doclens::format::ConvertOptions;
use doclens::inspect::TreevizOptions;
use doclens::xml::WriteOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/doclens.default.toml");

/// Top-level configuration consumed by doclens applications.
#[derive(Debug, Clone, Deserialize)]
pub struct DoclensConfig {
    pub convert: ConvertConfig,
    pub output: OutputConfig,
    pub inspect: InspectConfig,
    pub logging: LoggingConfig,
}

/// Knobs shared by get, put and create.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub id_prefix: String,
    pub normalize_before_put: bool,
}

impl From<&ConvertConfig> for ConvertOptions {
    fn from(config: &ConvertConfig) -> Self {
        ConvertOptions {
            id_prefix: config.id_prefix.clone(),
            normalize: config.normalize_before_put,
        }
    }
}

/// How the abstract HTML is written.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub indent: bool,
    pub indent_string: String,
    pub xml_declaration: bool,
}

impl OutputConfig {
    /// Writer settings for the abstract (XHTML) side.
    pub fn html_options(&self) -> WriteOptions {
        WriteOptions {
            indent: self.indent,
            indent_string: self.indent_string.clone(),
            ..WriteOptions::html()
        }
    }

    /// Writer settings for the concrete side; never indented, so untouched markup stays
    /// byte for byte what was read.
    pub fn concrete_options(&self) -> WriteOptions {
        WriteOptions {
            xml_declaration: self.xml_declaration,
            ..WriteOptions::default()
        }
    }
}

/// Controls treeviz output.
#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    pub show_seq_no: bool,
    pub show_attributes: bool,
}

impl From<&InspectConfig> for TreevizOptions {
    fn from(config: &InspectConfig) -> Self {
        TreevizOptions {
            show_seq_no: config.show_seq_no,
            show_attributes: config.show_attributes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
}

/// Stacks configuration sources; later sources win key by key.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// The embedded defaults, with nothing layered on top yet.
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULT_TOML, FileFormat::Toml);
        Loader {
            builder: Config::builder().add_source(defaults),
        }
    }

    fn layer(self, path: &Path, required: bool) -> Self {
        let file = File::from(path).format(FileFormat::Toml).required(required);
        Loader {
            builder: self.builder.add_source(file),
        }
    }

    /// Layer a TOML file that must exist; `build` fails otherwise.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Layer a TOML file if it exists, such as `doclens.toml` in the working directory.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    /// Force one dotted key, e.g. `convert.id_prefix` from `--id-prefix`.
    pub fn set_override<I>(self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        Ok(Loader {
            builder: self.builder.set_override(key, value)?,
        })
    }

    pub fn build(self) -> Result<DoclensConfig, ConfigError> {
        let merged = self.builder.build()?;
        merged.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Loader::new()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<DoclensConfig, ConfigError> {
    Loader::default().build()
}
