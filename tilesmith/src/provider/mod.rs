//! Tile rendering provider abstraction
//!
//! This module provides the polymorphic provider core: every provider
//! renders a projected extent through [`Provider::render_area`], some
//! additionally render single tile coordinates through the checked
//! [`Provider::tile_renderer`] capability.
//!
//! # Built-in providers
//!
//! - [`RemoteTileProvider`] ("proxy") composites a rendered extent from
//!   tiles fetched off a remote tile server.
//! - [`NativeEngineProvider`] ("mapnik") delegates to an embedded
//!   rendering engine driven by a style definition file.
//!
//! External providers are resolved by dotted class reference through the
//! [`ProviderRegistry`]:
//!
//! ```ignore
//! use tilesmith::provider::{ProviderRegistry, ReqwestClient};
//!
//! let registry = ProviderRegistry::with_builtins(ReqwestClient::new()?, engines);
//! let provider = registry.resolve(&layer, &descriptor)?;
//! let image = provider.render_area(256, 256, srs, extent)?;
//! ```

mod http;
mod mapnik;
mod proxy;
mod registry;
mod request;
mod template;
mod types;

pub use http::{HttpClient, ReqwestClient};
pub use mapnik::{EngineFactory, NativeEngineProvider, RenderEngine};
pub use proxy::RemoteTileProvider;
pub use registry::{
    split_class_path, MapnikFactory, ModuleLoader, ProviderArgs, ProviderDescriptor,
    ProviderFactory, ProviderKind, ProviderModule, ProviderRegistry, ProxyFactory, RegistryError,
};
pub use request::{dispatch, validate_srs, validate_tile_size, RenderRequest, RequestError};
pub use template::{TemplateError, UrlTemplate};
pub use types::{LayerContext, Provider, RenderError, TileRenderer};
