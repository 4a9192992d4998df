use std::path::Path;

use rsb_core::errors::{ErrorInfo, RsbError};
use serde::{Deserialize, Serialize};

/// Knobs controlling program generation.
///
/// Loaded from YAML (`--gen-config`) and overridden by `key=value` pairs
/// (`--gen-opt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct GenOptions {
    /// Master seed for all randomness.
    pub seed: u64,
    /// Minimum number of fields per struct.
    pub min_fields: usize,
    /// Maximum number of fields per struct.
    pub max_fields: usize,
    /// Minimum number of arguments per function.
    pub min_args: usize,
    /// Maximum number of arguments per function.
    pub max_args: usize,
    /// Allow pointer members and pointer arguments.
    pub pointers: bool,
    /// Allow structs embedded by value.
    pub embedded: bool,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            min_fields: 1,
            max_fields: 10,
            min_args: 1,
            max_args: 8,
            pointers: true,
            embedded: true,
        }
    }
}

fn invalid(message: impl Into<String>, option: &str) -> RsbError {
    RsbError::Generate(
        ErrorInfo::new("invalid-option", message)
            .with_context("option", option)
            .with_hint("options are seed, min-fields, max-fields, min-args, max-args, pointers, embedded"),
    )
}

impl GenOptions {
    /// Parses a YAML document; missing keys keep their defaults.
    pub fn from_yaml(text: &str) -> Result<Self, RsbError> {
        let options: GenOptions = serde_yaml::from_str(text)
            .map_err(|err| RsbError::Serde(ErrorInfo::new("yaml", err.to_string())))?;
        options.validate()?;
        Ok(options)
    }

    /// Loads options from a YAML file.
    pub fn load(path: &Path) -> Result<Self, RsbError> {
        let text = std::fs::read_to_string(path).map_err(|err| RsbError::io(path, err))?;
        Self::from_yaml(&text)
    }

    /// Applies `key=value` overrides. Booleans also accept the bare `key`
    /// and `no-key` forms.
    pub fn apply_pairs<S: AsRef<str>>(mut self, pairs: &[S]) -> Result<Self, RsbError> {
        for pair in pairs {
            let pair = pair.as_ref().trim();
            let (key, value) = match pair.split_once('=') {
                Some((key, value)) => (key.trim(), Some(value.trim())),
                None => (pair, None),
            };
            let key = key.replace('_', "-");
            match (key.as_str(), value) {
                ("seed", Some(v)) => self.seed = parse_number(&key, v)?,
                ("min-fields", Some(v)) => self.min_fields = parse_number(&key, v)?,
                ("max-fields", Some(v)) => self.max_fields = parse_number(&key, v)?,
                ("min-args", Some(v)) => self.min_args = parse_number(&key, v)?,
                ("max-args", Some(v)) => self.max_args = parse_number(&key, v)?,
                ("pointers", v) => self.pointers = parse_flag(&key, v)?,
                ("embedded", v) => self.embedded = parse_flag(&key, v)?,
                ("no-pointers", None) => self.pointers = false,
                ("no-embedded", None) => self.embedded = false,
                _ => return Err(invalid(format!("unrecognised generator option {pair:?}"), &key)),
            }
        }
        self.validate()?;
        Ok(self)
    }

    /// Checks the count ranges.
    pub fn validate(&self) -> Result<(), RsbError> {
        if self.min_fields == 0 {
            return Err(invalid("structs need at least one field", "min-fields"));
        }
        if self.min_fields > self.max_fields {
            return Err(invalid(
                format!("min-fields {} exceeds max-fields {}", self.min_fields, self.max_fields),
                "min-fields",
            ));
        }
        if self.min_args > self.max_args {
            return Err(invalid(
                format!("min-args {} exceeds max-args {}", self.min_args, self.max_args),
                "min-args",
            ));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, RsbError>
where
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|err: T::Err| invalid(format!("{key}: {err}"), key))
}

fn parse_flag(key: &str, value: Option<&str>) -> Result<bool, RsbError> {
    match value {
        None | Some("true") | Some("1") | Some("yes") => Ok(true),
        Some("false") | Some("0") | Some("no") => Ok(false),
        Some(other) => Err(invalid(format!("{key}: expected a boolean, got {other:?}"), key)),
    }
}
