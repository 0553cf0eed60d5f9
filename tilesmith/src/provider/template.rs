//! Tile URL templates.
//!
//! A template addresses remote tiles with `{Z}`, `{X}` and `{Y}`
//! placeholders, for example
//! `https://tile.openstreetmap.org/{Z}/{X}/{Y}.png`.

use crate::coord::TileCoord;
use std::fmt;

/// Placeholder names a template must contain.
const PLACEHOLDERS: [&str; 3] = ["{Z}", "{X}", "{Y}"];

/// A validated tile URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    template: String,
}

impl UrlTemplate {
    /// Creates a template, checking that all three placeholders are present.
    pub fn new(template: impl Into<String>) -> Result<Self, TemplateError> {
        let template = template.into();
        for placeholder in PLACEHOLDERS {
            if !template.contains(placeholder) {
                return Err(TemplateError::MissingPlaceholder {
                    template,
                    placeholder,
                });
            }
        }
        Ok(Self { template })
    }

    /// Substitutes a tile coordinate into the template.
    pub fn fill(&self, coord: TileCoord) -> String {
        self.template
            .replace("{Z}", &coord.zoom.to_string())
            .replace("{X}", &coord.col.to_string())
            .replace("{Y}", &coord.row.to_string())
    }

    /// The raw template string.
    pub fn as_str(&self) -> &str {
        &self.template
    }
}

/// Errors raised by template validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Template is missing one of the `{Z}`/`{X}`/`{Y}` placeholders
    MissingPlaceholder {
        template: String,
        placeholder: &'static str,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::MissingPlaceholder {
                template,
                placeholder,
            } => {
                write!(
                    f,
                    "URL template '{}' is missing the {} placeholder",
                    template, placeholder
                )
            }
        }
    }
}

impl std::error::Error for TemplateError {}
