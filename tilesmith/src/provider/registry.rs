//! Provider registry.
//!
//! Resolves a provider for a layer either by built-in name ("mapnik",
//! "proxy") or by a dotted external class reference such as
//! `"custom_providers.shaded.ShadedRelief"`. Rust has no runtime
//! reflection, so external resolution is a registration table plus a
//! host-supplied [`ModuleLoader`] hook: the dotted path is split into a
//! module reference (all segments but the last) and a type name (the
//! last), the hook loads the module, and the type name is looked up in
//! the module's exported factories. Loading is configuration-time only;
//! no caching beyond what the host loader does itself.

use super::http::ReqwestClient;
use super::mapnik::{EngineFactory, NativeEngineProvider};
use super::proxy::RemoteTileProvider;
use super::template::UrlTemplate;
use super::types::{LayerContext, Provider};
use crate::compose::HttpComposer;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Registry errors.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Built-in name not in the fixed set
    #[error("Unknown provider name: \"{0}\"")]
    UnknownProvider(String),

    /// External module could not be located or loaded
    #[error("Failed to load provider module '{module}': {reason}")]
    ModuleLoad { module: String, reason: String },

    /// Module loaded but the named type is absent
    #[error("Module '{module}' has no provider type '{type_name}'")]
    TypeLookup { module: String, type_name: String },

    /// Constructor argument required by the provider is missing
    #[error("Provider '{provider}' missing required argument '{key}'")]
    MissingArgument { provider: String, key: String },

    /// Provider construction failed
    #[error("Failed to construct provider '{provider}': {reason}")]
    Construction { provider: String, reason: String },
}

/// Named constructor arguments for a provider, from layer configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderArgs(HashMap<String, String>);

impl ProviderArgs {
    /// Creates an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an argument, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Looks up an optional argument.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Looks up a mandatory argument, failing loudly when absent.
    pub fn require(&self, provider: &str, key: &str) -> Result<&str, RegistryError> {
        self.get(key).ok_or_else(|| RegistryError::MissingArgument {
            provider: provider.to_string(),
            key: key.to_string(),
        })
    }

    /// Iterates over all arguments.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for ProviderArgs {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// How a layer identifies its provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderKind {
    /// One of the fixed built-in names
    BuiltIn(String),
    /// A dotted external class reference, already split
    External {
        module_path: String,
        class_name: String,
    },
}

/// Everything needed to construct a layer's provider.
///
/// Read once at layer-configuration time; the resolved provider instance
/// is constructed exactly once per layer and reused across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    pub kind: ProviderKind,
    pub args: ProviderArgs,
}

/// Constructs provider instances from a layer context and named args.
pub trait ProviderFactory: Send + Sync {
    fn create(
        &self,
        layer: &LayerContext,
        args: &ProviderArgs,
    ) -> Result<Arc<dyn Provider>, RegistryError>;
}

/// A loaded external module: type name to factory.
#[derive(Default)]
pub struct ProviderModule {
    factories: HashMap<String, Arc<dyn ProviderFactory>>,
}

impl ProviderModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under its exported type name.
    pub fn register(&mut self, type_name: impl Into<String>, factory: Arc<dyn ProviderFactory>) {
        self.factories.insert(type_name.into(), factory);
    }

    fn get(&self, type_name: &str) -> Option<Arc<dyn ProviderFactory>> {
        self.factories.get(type_name).cloned()
    }
}

/// Host hook that loads external provider modules by path.
///
/// Typical implementations wrap the platform's dynamic library loader or
/// a compiled-in table populated at build time.
pub trait ModuleLoader: Send + Sync {
    fn load(&self, module_path: &str) -> Result<ProviderModule, String>;
}

/// Splits a dotted class path into `(module_path, class_name)`.
///
/// The last segment is the type name; all preceding segments form the
/// module reference. Returns `None` when either part would be empty.
pub fn split_class_path(class_path: &str) -> Option<(&str, &str)> {
    match class_path.rsplit_once('.') {
        Some((module, class)) if !module.is_empty() && !class.is_empty() => Some((module, class)),
        _ => None,
    }
}

/// Resolves providers by built-in name or external class reference.
pub struct ProviderRegistry {
    builtins: HashMap<&'static str, Arc<dyn ProviderFactory>>,
    loader: Option<Box<dyn ModuleLoader>>,
}

impl ProviderRegistry {
    /// Creates a registry with the two built-in providers registered:
    /// "proxy" fetching through `http`, and "mapnik" constructing engine
    /// handles through `engines`.
    pub fn with_builtins(http: ReqwestClient, engines: Arc<dyn EngineFactory>) -> Self {
        let mut builtins: HashMap<&'static str, Arc<dyn ProviderFactory>> = HashMap::new();
        builtins.insert("proxy", Arc::new(ProxyFactory::new(http)));
        builtins.insert("mapnik", Arc::new(MapnikFactory::new(engines)));
        Self {
            builtins,
            loader: None,
        }
    }

    /// Installs the host's external module loader.
    pub fn set_module_loader(&mut self, loader: Box<dyn ModuleLoader>) {
        self.loader = Some(loader);
    }

    /// Resolves a built-in provider factory by exact name match.
    ///
    /// No partial matching, no case folding, no whitespace trimming.
    pub fn resolve_builtin(&self, name: &str) -> Result<Arc<dyn ProviderFactory>, RegistryError> {
        self.builtins
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownProvider(name.to_string()))
    }

    /// Resolves an external provider factory from a dotted class path.
    pub fn resolve_external(
        &self,
        class_path: &str,
    ) -> Result<Arc<dyn ProviderFactory>, RegistryError> {
        let (module_path, class_name) =
            split_class_path(class_path).ok_or_else(|| RegistryError::ModuleLoad {
                module: class_path.to_string(),
                reason: "class path has no module component".to_string(),
            })?;
        self.resolve_external_parts(module_path, class_name)
    }

    fn resolve_external_parts(
        &self,
        module_path: &str,
        class_name: &str,
    ) -> Result<Arc<dyn ProviderFactory>, RegistryError> {
        let loader = self.loader.as_ref().ok_or_else(|| RegistryError::ModuleLoad {
            module: module_path.to_string(),
            reason: "no module loader installed".to_string(),
        })?;

        debug!(module = module_path, "Loading external provider module");
        let module = loader
            .load(module_path)
            .map_err(|reason| RegistryError::ModuleLoad {
                module: module_path.to_string(),
                reason,
            })?;

        module.get(class_name).ok_or_else(|| RegistryError::TypeLookup {
            module: module_path.to_string(),
            type_name: class_name.to_string(),
        })
    }

    /// Resolves the descriptor's factory and constructs the provider.
    pub fn resolve(
        &self,
        layer: &LayerContext,
        descriptor: &ProviderDescriptor,
    ) -> Result<Arc<dyn Provider>, RegistryError> {
        let factory = match &descriptor.kind {
            ProviderKind::BuiltIn(name) => self.resolve_builtin(name)?,
            ProviderKind::External {
                module_path,
                class_name,
            } => self.resolve_external_parts(module_path, class_name)?,
        };
        factory.create(layer, &descriptor.args)
    }
}

/// Factory for the built-in "proxy" provider.
pub struct ProxyFactory {
    http: ReqwestClient,
}

impl ProxyFactory {
    pub fn new(http: ReqwestClient) -> Self {
        Self { http }
    }
}

impl ProviderFactory for ProxyFactory {
    fn create(
        &self,
        layer: &LayerContext,
        args: &ProviderArgs,
    ) -> Result<Arc<dyn Provider>, RegistryError> {
        let url = args.require("proxy", "url")?;
        let template = UrlTemplate::new(url).map_err(|e| RegistryError::Construction {
            provider: "proxy".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Arc::new(RemoteTileProvider::new(
            layer.clone(),
            template,
            self.http.clone(),
            HttpComposer::new(self.http.clone()),
        )))
    }
}

/// Factory for the built-in "mapnik" provider.
pub struct MapnikFactory {
    engines: Arc<dyn EngineFactory>,
}

impl MapnikFactory {
    pub fn new(engines: Arc<dyn EngineFactory>) -> Self {
        Self { engines }
    }
}

impl ProviderFactory for MapnikFactory {
    fn create(
        &self,
        layer: &LayerContext,
        args: &ProviderArgs,
    ) -> Result<Arc<dyn Provider>, RegistryError> {
        let mapfile = args.require("mapnik", "mapfile")?;
        if !Path::new(mapfile).is_absolute() {
            return Err(RegistryError::Construction {
                provider: "mapnik".to_string(),
                reason: format!("mapfile path must be absolute: '{}'", mapfile),
            });
        }
        Ok(Arc::new(NativeEngineProvider::new(
            layer.clone(),
            PathBuf::from(mapfile),
            self.engines.clone(),
        )))
    }
}
