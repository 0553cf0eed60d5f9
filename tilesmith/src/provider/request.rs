//! Render request types and shared validation helpers.
//!
//! A [`RenderRequest`] describes what a caller wants produced: an area in
//! projected coordinates, or a single tile coordinate. Area and tile are
//! two distinct operations, not a union field; [`dispatch`] routes a
//! request to the matching provider operation and turns a missing
//! per-tile capability into a checked error.

use super::types::{Provider, RenderError};
use crate::coord::{CoordError, Extent, TileCoord, SPHERICAL_MERCATOR_SRS, TILE_PIXELS};
use image::RgbaImage;
use std::fmt;

/// A request for rendered imagery.
#[derive(Debug, Clone)]
pub enum RenderRequest {
    /// Render a projected bounding box at the given pixel size.
    Area {
        width: u32,
        height: u32,
        srs: String,
        extent: Extent,
    },
    /// Render a single tile coordinate.
    Tile {
        width: u32,
        height: u32,
        srs: String,
        coord: TileCoord,
    },
}

impl RenderRequest {
    /// Requested output width in pixels.
    pub fn width(&self) -> u32 {
        match self {
            RenderRequest::Area { width, .. } | RenderRequest::Tile { width, .. } => *width,
        }
    }

    /// Requested output height in pixels.
    pub fn height(&self) -> u32 {
        match self {
            RenderRequest::Area { height, .. } | RenderRequest::Tile { height, .. } => *height,
        }
    }

    /// Requested projection identifier.
    pub fn srs(&self) -> &str {
        match self {
            RenderRequest::Area { srs, .. } | RenderRequest::Tile { srs, .. } => srs,
        }
    }

    /// Checks the request's dimensions and geometry before dispatch.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.width() == 0 || self.height() == 0 {
            return Err(RequestError::InvalidDimensions {
                width: self.width(),
                height: self.height(),
            });
        }
        if let RenderRequest::Area { extent, .. } = self {
            extent.validate()?;
        }
        Ok(())
    }
}

/// Routes a request to the provider operation that serves it.
///
/// Area requests go to [`Provider::render_area`]; tile requests go
/// through the checked [`Provider::tile_renderer`] capability and fail
/// with [`RequestError::TileNotSupported`] when the provider has none.
pub fn dispatch(provider: &dyn Provider, request: &RenderRequest) -> Result<RgbaImage, RequestError> {
    request.validate()?;
    match request {
        RenderRequest::Area {
            width,
            height,
            srs,
            extent,
        } => Ok(provider.render_area(*width, *height, srs, *extent)?),
        RenderRequest::Tile {
            width,
            height,
            srs,
            coord,
        } => match provider.tile_renderer() {
            Some(renderer) => Ok(renderer.render_tile(*width, *height, srs, *coord)?),
            None => Err(RequestError::TileNotSupported {
                provider: provider.name().to_string(),
            }),
        },
    }
}

/// Validates a projection identifier against the fixed spherical
/// mercator string. No normalization; any other value is rejected.
pub fn validate_srs(srs: &str) -> Result<(), RenderError> {
    if srs != SPHERICAL_MERCATOR_SRS {
        return Err(RenderError::UnsupportedGeometry(format!(
            "projection doesn't match spherical mercator: \"{}\"",
            srs
        )));
    }
    Ok(())
}

/// Validates the fixed 256×256 tile size for per-tile rendering.
pub fn validate_tile_size(width: u32, height: u32) -> Result<(), RenderError> {
    if (width, height) != (TILE_PIXELS, TILE_PIXELS) {
        return Err(RenderError::UnsupportedGeometry(format!(
            "image dimensions don't match expected tile size: {}x{}",
            width, height
        )));
    }
    Ok(())
}

/// Errors raised when validating or dispatching a render request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestError {
    /// Width or height is zero
    InvalidDimensions { width: u32, height: u32 },
    /// Extent does not span a positive area
    Coord(CoordError),
    /// Tile request sent to a provider without the per-tile capability
    TileNotSupported { provider: String },
    /// The provider operation itself failed
    Render(RenderError),
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidDimensions { width, height } => {
                write!(f, "Invalid render dimensions: {}x{}", width, height)
            }
            RequestError::Coord(err) => write!(f, "{}", err),
            RequestError::TileNotSupported { provider } => {
                write!(
                    f,
                    "Provider '{}' does not support single-tile rendering",
                    provider
                )
            }
            RequestError::Render(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for RequestError {}

impl From<CoordError> for RequestError {
    fn from(err: CoordError) -> Self {
        RequestError::Coord(err)
    }
}

impl From<RenderError> for RequestError {
    fn from(err: RenderError) -> Self {
        RequestError::Render(err)
    }
}
