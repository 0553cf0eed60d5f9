//! Layer configuration handling.
//!
//! Loads layer definitions from an INI file into [`ProviderDescriptor`]
//! values. Each `[layer:<name>]` section names its provider either with
//! `provider` (a built-in name) or `provider_class` (a dotted external
//! class reference); every other key in the section is passed through
//! verbatim as a constructor argument.
//!
//! ```ini
//! [layer:osm]
//! provider = proxy
//! url = https://tile.openstreetmap.org/{Z}/{X}/{Y}.png
//!
//! [layer:streets]
//! provider = mapnik
//! mapfile = /maps/streets.xml
//! ```
//!
//! Configuration is read once at startup; descriptors are never mutated
//! afterwards.

use crate::provider::{split_class_path, ProviderArgs, ProviderDescriptor, ProviderKind};
use ini::Ini;
use std::path::Path;
use thiserror::Error;

/// Section prefix identifying layer definitions.
const LAYER_PREFIX: &str = "layer:";

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or parse the configuration file
    #[error("Failed to read layer configuration: {0}")]
    Read(#[from] ini::Error),

    /// Layer section names neither a built-in nor an external provider
    #[error("Layer '{0}' has no provider entry ('provider' or 'provider_class')")]
    MissingProvider(String),

    /// Layer section names both a built-in and an external provider
    #[error("Layer '{0}' sets both 'provider' and 'provider_class'")]
    AmbiguousProvider(String),

    /// External class path cannot be split into module and type
    #[error("Layer '{layer}' has invalid provider class path '{path}'")]
    InvalidClassPath { layer: String, path: String },
}

/// One configured layer: its name and how to build its provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerConfig {
    pub name: String,
    pub descriptor: ProviderDescriptor,
}

/// Loads layer configurations from an INI file.
pub fn load_layers(path: &Path) -> Result<Vec<LayerConfig>, ConfigError> {
    let ini = Ini::load_from_file(path)?;
    parse_layers(&ini)
}

/// Parses layer configurations out of an already-loaded INI document.
pub fn parse_layers(ini: &Ini) -> Result<Vec<LayerConfig>, ConfigError> {
    let mut layers = Vec::new();

    for (section, properties) in ini.iter() {
        let Some(name) = section.and_then(|s| s.strip_prefix(LAYER_PREFIX)) else {
            continue;
        };

        let builtin = properties.get("provider");
        let external = properties.get("provider_class");

        let kind = match (builtin, external) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::AmbiguousProvider(name.to_string()));
            }
            (Some(builtin), None) => ProviderKind::BuiltIn(builtin.to_string()),
            (None, Some(class_path)) => {
                let (module_path, class_name) =
                    split_class_path(class_path).ok_or_else(|| ConfigError::InvalidClassPath {
                        layer: name.to_string(),
                        path: class_path.to_string(),
                    })?;
                ProviderKind::External {
                    module_path: module_path.to_string(),
                    class_name: class_name.to_string(),
                }
            }
            (None, None) => {
                return Err(ConfigError::MissingProvider(name.to_string()));
            }
        };

        let args: ProviderArgs = properties
            .iter()
            .filter(|(key, _)| *key != "provider" && *key != "provider_class")
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();

        layers.push(LayerConfig {
            name: name.to_string(),
            descriptor: ProviderDescriptor { kind, args },
        });
    }

    Ok(layers)
}
