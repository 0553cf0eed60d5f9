//! Native engine provider.
//!
//! Renders map images directly from a style definition file through an
//! embedded rendering engine. The engine itself is out of scope; this
//! module specifies only its invocation contract ([`RenderEngine`]) and
//! the provider that drives it.
//!
//! # Concurrency
//!
//! The engine handle is mutable shared state: canvas size and visible
//! extent are engine-wide properties, not per-call parameters. The
//! provider therefore holds the handle behind a mutex and performs the
//! whole "set size, set extent, render, read buffer" sequence under it.
//! Lazy construction and style loading happen under the same lock, so two
//! callers can never both observe an unconstructed engine.

use super::types::{LayerContext, Provider, RenderError};
use crate::coord::Extent;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Invocation contract for an embedded rendering engine.
///
/// Size and extent are engine-wide state; callers must treat
/// "set size, set extent, render" as one atomic sequence.
pub trait RenderEngine: Send {
    /// Loads a style definition file into the engine.
    fn load_style(&mut self, mapfile: &Path) -> Result<(), String>;

    /// Sets the target raster size in pixels.
    fn set_size(&mut self, width: u32, height: u32);

    /// Sets the visible extent in projected coordinates.
    fn set_extent(&mut self, extent: Extent);

    /// Runs the rasterization pass and returns the raw RGBA buffer,
    /// `width * height * 4` bytes in row-major order.
    fn render(&mut self) -> Result<Vec<u8>, String>;
}

/// Creates engine handles on demand.
///
/// Engines are assumed expensive to initialize, so the provider defers
/// creation until the first render call.
pub trait EngineFactory: Send + Sync {
    fn create(&self) -> Box<dyn RenderEngine>;
}

/// Lifecycle of the lazily constructed engine handle.
enum EngineSlot {
    /// No render call has happened yet.
    Unloaded,
    /// Engine constructed and style loaded.
    Ready(Box<dyn RenderEngine>),
    /// Style load failed; the provider is unusable for the process
    /// lifetime and every call fails with the recorded reason.
    Failed(String),
}

/// Provider that renders through an embedded native engine.
///
/// Identified by the name "mapnik" in layer configuration. Requires a
/// `mapfile` argument holding an absolute path to the style definition
/// file. Offers no per-tile operation; callers synthesize single-tile
/// requests as degenerate area requests.
pub struct NativeEngineProvider {
    layer: LayerContext,
    mapfile: PathBuf,
    factory: Arc<dyn EngineFactory>,
    engine: Mutex<EngineSlot>,
}

impl NativeEngineProvider {
    /// Creates the provider. The engine is not constructed and the style
    /// file is not touched until the first render call.
    pub fn new(layer: LayerContext, mapfile: PathBuf, factory: Arc<dyn EngineFactory>) -> Self {
        Self {
            layer,
            mapfile,
            factory,
            engine: Mutex::new(EngineSlot::Unloaded),
        }
    }

    /// The style file this provider renders from.
    pub fn mapfile(&self) -> &Path {
        &self.mapfile
    }

    fn style_error(&self, reason: String) -> RenderError {
        RenderError::StyleLoad {
            mapfile: self.mapfile.clone(),
            reason,
        }
    }
}

impl Provider for NativeEngineProvider {
    fn render_area(
        &self,
        width: u32,
        height: u32,
        _srs: &str,
        extent: Extent,
    ) -> Result<RgbaImage, RenderError> {
        let mut slot = self.engine.lock().unwrap_or_else(|e| e.into_inner());

        if let EngineSlot::Unloaded = &*slot {
            debug!(
                layer = self.layer.name(),
                mapfile = %self.mapfile.display(),
                "Loading style into native engine"
            );
            let mut engine = self.factory.create();
            match engine.load_style(&self.mapfile) {
                Ok(()) => *slot = EngineSlot::Ready(engine),
                Err(reason) => {
                    warn!(
                        layer = self.layer.name(),
                        mapfile = %self.mapfile.display(),
                        reason = reason,
                        "Style load failed; provider disabled"
                    );
                    *slot = EngineSlot::Failed(reason);
                }
            }
        }

        let engine = match &mut *slot {
            EngineSlot::Ready(engine) => engine,
            EngineSlot::Failed(reason) => return Err(self.style_error(reason.clone())),
            EngineSlot::Unloaded => {
                return Err(RenderError::Engine("engine slot not initialized".to_string()))
            }
        };

        engine.set_size(width, height);
        engine.set_extent(extent);
        let raw = engine.render().map_err(RenderError::Engine)?;

        RgbaImage::from_raw(width, height, raw).ok_or_else(|| {
            RenderError::Engine(format!(
                "engine returned a buffer of unexpected size for {}x{}",
                width, height
            ))
        })
    }

    fn metatile_ok(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "mapnik"
    }
}
