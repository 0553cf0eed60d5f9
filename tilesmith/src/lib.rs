//! Tilesmith - tile rendering provider abstraction
//!
//! This library resolves which rendering backend produces imagery for a
//! map layer and normalizes the rendering contract across heterogeneous
//! backends: a remote tile proxy that composites fetched tiles, and a
//! native rendering engine driven by a style file, both behind one
//! [`provider::Provider`] interface.
//!
//! # High-Level API
//!
//! ```ignore
//! use tilesmith::config::load_layers;
//! use tilesmith::provider::{LayerContext, ProviderRegistry, ReqwestClient};
//!
//! let registry = ProviderRegistry::with_builtins(ReqwestClient::new()?, engines);
//! for layer in load_layers(config_path)? {
//!     let provider = registry.resolve(&LayerContext::new(&layer.name), &layer.descriptor)?;
//!     let image = provider.render_area(256, 256, srs, extent)?;
//! }
//! ```

pub mod compose;
pub mod config;
pub mod coord;
pub mod provider;

/// Version of the tilesmith library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
