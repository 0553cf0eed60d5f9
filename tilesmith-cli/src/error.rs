//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and a single exit path.

use std::fmt;
use std::process;
use tilesmith::provider::{RenderError, RequestError, TemplateError};

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// The tile URL template is malformed
    Template(TemplateError),
    /// Failed to create the HTTP client
    HttpClient(RenderError),
    /// Rendering failed
    Render(RequestError),
    /// Failed to write the output image
    FileWrite { path: String, reason: String },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Template(_) = self {
            eprintln!();
            eprintln!("The URL template must contain {{Z}}, {{X}} and {{Y}} placeholders,");
            eprintln!("for example: https://tile.openstreetmap.org/{{Z}}/{{X}}/{{Y}}.png");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Template(e) => write!(f, "Invalid URL template: {}", e),
            CliError::HttpClient(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Render(e) => write!(f, "Rendering failed: {}", e),
            CliError::FileWrite { path, reason } => {
                write!(f, "Failed to write file '{}': {}", path, reason)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Template(e) => Some(e),
            CliError::HttpClient(e) => Some(e),
            CliError::Render(e) => Some(e),
            CliError::FileWrite { .. } => None,
        }
    }
}

impl From<TemplateError> for CliError {
    fn from(e: TemplateError) -> Self {
        CliError::Template(e)
    }
}

impl From<RequestError> for CliError {
    fn from(e: RequestError) -> Self {
        CliError::Render(e)
    }
}
