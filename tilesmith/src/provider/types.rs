//! Provider types and traits

use crate::coord::{Extent, TileCoord};
use image::RgbaImage;
use std::fmt;
use std::path::PathBuf;

/// Errors that can occur during rendering operations.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Wrong projection identifier or wrong fixed tile size
    UnsupportedGeometry(String),
    /// Network fetch or image decode failed
    Fetch(String),
    /// Native style file is missing or malformed; fatal for the provider
    StyleLoad { mapfile: PathBuf, reason: String },
    /// Native rasterization pass failed
    Engine(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::UnsupportedGeometry(msg) => {
                write!(f, "Unsupported geometry: {}", msg)
            }
            RenderError::Fetch(msg) => write!(f, "Tile fetch failed: {}", msg),
            RenderError::StyleLoad { mapfile, reason } => {
                write!(
                    f,
                    "Failed to load style file '{}': {}",
                    mapfile.display(),
                    reason
                )
            }
            RenderError::Engine(msg) => write!(f, "Render engine error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

/// Handle to the layer a provider renders for.
///
/// Passed to every provider constructor alongside the provider's named
/// arguments, and used for log attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerContext {
    name: String,
}

impl LayerContext {
    /// Create a context for the named layer.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The layer name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Optional per-tile rendering capability.
///
/// Providers that can draw a single tile coordinate directly expose this
/// through [`Provider::tile_renderer`]. Providers without it (the native
/// engine provider) expect callers to synthesize single-tile requests as
/// degenerate area requests instead.
pub trait TileRenderer {
    /// Renders one tile at the given coordinate.
    ///
    /// # Arguments
    ///
    /// * `width`, `height` - Output size in pixels (fixed at 256×256)
    /// * `srs` - Projection identifier as a proj4 string
    /// * `coord` - Tile coordinate to render
    fn render_tile(
        &self,
        width: u32,
        height: u32,
        srs: &str,
        coord: TileCoord,
    ) -> Result<RgbaImage, RenderError>;
}

/// Trait for tile rendering providers.
///
/// A provider is constructed once per layer and reused across many
/// sequential render calls; it must not leak per-call state between
/// invocations. Area rendering is mandatory; per-tile rendering is a
/// checked capability queried through [`Provider::tile_renderer`].
pub trait Provider: Send + Sync {
    /// Renders the projected extent into an image of exactly
    /// `(width, height)` pixels.
    ///
    /// # Arguments
    ///
    /// * `width`, `height` - Output size in pixels
    /// * `srs` - Projection identifier as a proj4 string
    /// * `extent` - Bounding box in projected coordinates
    fn render_area(
        &self,
        width: u32,
        height: u32,
        srs: &str,
        extent: Extent,
    ) -> Result<RgbaImage, RenderError>;

    /// Returns the per-tile rendering capability if this provider has one.
    fn tile_renderer(&self) -> Option<&dyn TileRenderer> {
        None
    }

    /// Whether rendered output may be subdivided and recombined across
    /// tile boundaries by a metatiling collaborator.
    fn metatile_ok(&self) -> bool;

    /// Returns the provider's name for logging and identification.
    fn name(&self) -> &str;
}
