// src/core/defaults.rs

//! The project defaults file and project location handling.

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::DEFAULTS_FILENAME;
use crate::models::OptionDescriptor;

/// Failures while loading the defaults file.
#[derive(Error, Debug)]
pub enum DefaultsError {
    /// The file exists but could not be read.
    #[error("Failed to read defaults file '{path}': {source}")]
    Io {
        /// The defaults file.
        path: String,
        /// The read error.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid JSON.
    #[error("Error parsing JSON in '{path}': {source}")]
    Parse {
        /// The defaults file.
        path: String,
        /// The parse error.
        #[source]
        source: serde_json::Error,
    },
    /// The document root is not an object.
    #[error("Defaults file '{path}' must contain a JSON object at its root.")]
    NotAnObject {
        /// The defaults file.
        path: String,
    },
}

/// Resolves where a project lives from the working directory and the optional
/// `--project-location` value.
pub fn determine_project_location(working_directory: &Path, project_location: Option<&str>) -> PathBuf {
    match project_location.filter(|l| !l.is_empty()) {
        None => dunce::simplified(working_directory).to_path_buf(),
        Some(location) => resolve_location(working_directory, location),
    }
}

/// Expands `~` in a user-supplied location and joins relative paths onto `base`.
pub fn resolve_location(base: &Path, location: &str) -> PathBuf {
    let expanded = shellexpand::tilde(location);
    let path = Path::new(expanded.as_ref());
    let location = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    dunce::simplified(&location).to_path_buf()
}

/// The read-only project defaults, loaded from `aws-lambda-tools-defaults.json`.
///
/// Keys are option switches without their leading dashes. Values are kept as raw
/// JSON: strings are served to string-like options, native integers and booleans to
/// typed options. Nothing is ever coerced from one to the other.
#[derive(Debug, Clone, Default)]
pub struct ResolvedDefaults {
    source: Option<PathBuf>,
    values: Map<String, Value>,
}

impl ResolvedDefaults {
    /// Loads the defaults file for a project. A missing file yields an empty store.
    pub fn load(project_location: &Path) -> Result<Self, DefaultsError> {
        let path = project_location.join(DEFAULTS_FILENAME);
        if !path.is_file() {
            log::debug!(
                "No defaults file at '{}'. Using empty defaults.",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| DefaultsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let parsed: Value = serde_json::from_str(&content).map_err(|source| DefaultsError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        let Value::Object(values) = parsed else {
            return Err(DefaultsError::NotAnObject {
                path: path.display().to_string(),
            });
        };

        log::debug!(
            "Loaded {} default(s) from '{}'.",
            values.len(),
            path.display()
        );
        Ok(Self {
            source: Some(path),
            values,
        })
    }

    /// Builds a store directly from a JSON object. Used by embedders that already
    /// hold the document.
    pub fn from_map(values: Map<String, Value>) -> Self {
        Self {
            source: None,
            values,
        }
    }

    /// The file the defaults were read from, if one existed.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The raw JSON default for an option.
    pub fn get(&self, option: &OptionDescriptor) -> Option<&Value> {
        self.values.get(option.defaults_key())
    }

    /// A non-empty string default for the option.
    pub fn get_string(&self, option: &OptionDescriptor) -> Option<&str> {
        self.get(option)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// An integer default, only when stored as a JSON integer that fits in `i32`.
    pub fn get_int(&self, option: &OptionDescriptor) -> Option<i32> {
        self.get(option)
            .and_then(Value::as_i64)
            .and_then(|i| i32::try_from(i).ok())
    }

    /// A boolean default, only when stored as a JSON boolean.
    pub fn get_bool(&self, option: &OptionDescriptor) -> Option<bool> {
        self.get(option).and_then(Value::as_bool)
    }

    /// Every entry in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
