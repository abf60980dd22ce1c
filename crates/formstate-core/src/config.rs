//! View definitions loaded from TOML.
//!
//! A view names the entity model it edits, the form's translation path and
//! header expression, and the field components placed on it.
use crate::{DEFAULT_LOCALE, model::EntityModel};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read view config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid view config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("view config declares field '{0}' more than once")]
    DuplicateField(String),
}

///
/// ViewConfig
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ViewConfig {
    /// Defaults to `<namespace>.<entity_name>.form`.
    #[serde(default)]
    pub translation_path: Option<String>,
    #[serde(default)]
    pub expression: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    pub model: EntityModel,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

///
/// FieldConfig
/// One field component on the view and its declared base flags.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl FieldConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            required: false,
            enabled: true,
        }
    }
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

const fn enabled_by_default() -> bool {
    true
}

impl ViewConfig {
    /// View over `model` with one plain field component per scalar field.
    #[must_use]
    pub fn for_model(model: EntityModel) -> Self {
        let fields = model
            .fields
            .iter()
            .filter(|field| !field.kind.is_to_many())
            .map(|field| FieldConfig::new(&field.name))
            .collect();

        Self {
            translation_path: None,
            expression: String::new(),
            locale: default_locale(),
            model,
            fields,
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&source)
    }

    #[must_use]
    pub fn translation_path(&self) -> String {
        self.translation_path.clone().unwrap_or_else(|| {
            format!("{}.{}.form", self.model.namespace, self.model.entity_name)
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(ConfigError::DuplicateField(field.name.clone()));
            }
        }

        Ok(())
    }
}
