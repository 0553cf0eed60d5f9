//! Coordinate type definitions

use std::fmt;

/// Spherical mercator earth radius in meters (EPSG:900913 sphere).
pub const EARTH_RADIUS: f64 = 6_378_137.0;

/// Half the width of the projected world in meters.
pub const MERCATOR_WORLD_EDGE: f64 = 20_037_508.342789244;

/// Standard zoom range for slippy-map tile pyramids.
pub const MIN_ZOOM: u8 = 0;
pub const MAX_ZOOM: u8 = 18;

/// Side length of a standard source tile in pixels.
pub const TILE_PIXELS: u32 = 256;

/// The fixed spherical mercator projection identifier.
///
/// Remote tile providers only operate in this projection; any other
/// value is rejected with an unsupported-geometry error.
pub const SPHERICAL_MERCATOR_SRS: &str = "+proj=merc +a=6378137 +b=6378137 +lat_ts=0.0 +lon_0=0.0 +x_0=0.0 +y_0=0 +k=1.0 +units=m +nadgrids=@null +no_defs";

/// A point in projected spherical mercator coordinates (meters).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Easting in meters
    pub x: f64,
    /// Northing in meters
    pub y: f64,
}

/// A geographic location in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoLocation {
    /// Latitude in degrees, positive north
    pub lat: f64,
    /// Longitude in degrees, positive east
    pub lon: f64,
}

/// A rectangular region in projected coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Extent {
    /// Create a new extent from its corner coordinates.
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Width of the extent in projected units.
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Height of the extent in projected units.
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// The southwest corner of the extent.
    pub fn southwest(&self) -> Point {
        Point {
            x: self.xmin,
            y: self.ymin,
        }
    }

    /// The northeast corner of the extent.
    pub fn northeast(&self) -> Point {
        Point {
            x: self.xmax,
            y: self.ymax,
        }
    }

    /// Checks that the extent spans a non-empty area.
    pub fn validate(&self) -> Result<(), CoordError> {
        if self.xmin < self.xmax && self.ymin < self.ymax {
            Ok(())
        } else {
            Err(CoordError::InvalidExtent {
                xmin: self.xmin,
                ymin: self.ymin,
                xmax: self.xmax,
                ymax: self.ymax,
            })
        }
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.xmin, self.ymin, self.xmax, self.ymax
        )
    }
}

/// Tile coordinates in the Web Mercator / slippy-map scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Zoom level (0-18)
    pub zoom: u8,
    /// X coordinate (east-west), 0 at west
    pub col: u32,
    /// Y coordinate (north-south), 0 at north
    pub row: u32,
}

impl TileCoord {
    /// Create a new tile coordinate.
    pub fn new(zoom: u8, col: u32, row: u32) -> Self {
        Self { zoom, col, row }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.col, self.row)
    }
}

/// Errors that can occur during coordinate handling.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Extent does not span a positive area
    InvalidExtent {
        xmin: f64,
        ymin: f64,
        xmax: f64,
        ymax: f64,
    },
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidExtent {
                xmin,
                ymin,
                xmax,
                ymax,
            } => {
                write!(
                    f,
                    "Invalid extent ({}, {}, {}, {}): min corner must be strictly below max corner",
                    xmin, ymin, xmax, ymax
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
