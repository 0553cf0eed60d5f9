//! Coordinate conversion module
//!
//! Provides the forward transform from projected spherical mercator
//! coordinates (meters) to geographic coordinates, and the world-pixel
//! helpers the tile composer uses to place tiles on a canvas.

mod types;

pub use types::{
    CoordError, Extent, GeoLocation, Point, TileCoord, EARTH_RADIUS, MAX_ZOOM,
    MERCATOR_WORLD_EDGE, MIN_ZOOM, SPHERICAL_MERCATOR_SRS, TILE_PIXELS,
};

use std::f64::consts::PI;

/// Converts a projected spherical mercator point to a geographic location.
///
/// This is the projection service's forward transform: projected meters in,
/// latitude/longitude in degrees out. The transform is total over finite
/// inputs; points beyond the mercator world edge map to latitudes
/// approaching the projection's ±85.05° limit.
#[inline]
pub fn project_to_geo(point: Point) -> GeoLocation {
    let lon = (point.x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (point.y / EARTH_RADIUS).exp().atan() - PI / 2.0).to_degrees();
    GeoLocation { lat, lon }
}

/// Converts a geographic location to world-pixel coordinates at a zoom level.
///
/// At zoom `z` the world is a square of `256 * 2^z` pixels with (0, 0) at
/// the northwest corner. Fractional pixels are preserved so callers can
/// position a canvas between tile boundaries.
#[inline]
pub fn geo_to_world_pixel(geo: GeoLocation, zoom: u8) -> (f64, f64) {
    let world = (1u64 << zoom) as f64 * TILE_PIXELS as f64;
    let x = (geo.lon + 180.0) / 360.0 * world;
    let lat_rad = geo.lat.to_radians();
    let y = (1.0 - lat_rad.tan().asinh() / PI) / 2.0 * world;
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    #[test]
    fn test_project_origin() {
        let geo = project_to_geo(Point { x: 0.0, y: 0.0 });
        assert!(geo.lat.abs() < EPS);
        assert!(geo.lon.abs() < EPS);
    }

    #[test]
    fn test_project_world_edge_longitude() {
        let geo = project_to_geo(Point {
            x: MERCATOR_WORLD_EDGE,
            y: 0.0,
        });
        assert!((geo.lon - 180.0).abs() < EPS);
    }

    #[test]
    fn test_project_world_edge_latitude() {
        // The top of the mercator square sits at the projection's
        // latitude limit of ~85.05 degrees.
        let geo = project_to_geo(Point {
            x: 0.0,
            y: MERCATOR_WORLD_EDGE,
        });
        assert!((geo.lat - 85.05112878).abs() < 1e-6);
    }

    #[test]
    fn test_project_known_latitude() {
        // y = R * ln(tan(pi/4 + lat/2)) for lat = 45 degrees
        let y = EARTH_RADIUS * (std::f64::consts::FRAC_PI_4 + 45f64.to_radians() / 2.0).tan().ln();
        let geo = project_to_geo(Point { x: 0.0, y });
        assert!((geo.lat - 45.0).abs() < EPS);
    }

    #[test]
    fn test_world_pixel_center_zoom_0() {
        let (x, y) = geo_to_world_pixel(GeoLocation { lat: 0.0, lon: 0.0 }, 0);
        assert!((x - 128.0).abs() < EPS);
        assert!((y - 128.0).abs() < EPS);
    }

    #[test]
    fn test_world_pixel_west_edge() {
        let (x, _) = geo_to_world_pixel(
            GeoLocation {
                lat: 0.0,
                lon: -180.0,
            },
            0,
        );
        assert!(x.abs() < EPS);
    }

    #[test]
    fn test_world_pixel_scales_with_zoom() {
        let geo = GeoLocation {
            lat: 40.7128,
            lon: -74.0060,
        };
        let (x0, y0) = geo_to_world_pixel(geo, 0);
        let (x3, y3) = geo_to_world_pixel(geo, 3);
        assert!((x3 - x0 * 8.0).abs() < 1e-3);
        assert!((y3 - y0 * 8.0).abs() < 1e-3);
    }

    #[test]
    fn test_projected_corner_roundtrip_to_world_pixel() {
        // The southwest corner of the mercator square lands on world
        // pixel (0, 256) at zoom 0.
        let geo = project_to_geo(Point {
            x: -MERCATOR_WORLD_EDGE,
            y: -MERCATOR_WORLD_EDGE,
        });
        let (x, y) = geo_to_world_pixel(geo, 0);
        assert!(x.abs() < 1e-3);
        assert!((y - 256.0).abs() < 1e-3);
    }

    #[test]
    fn test_extent_accessors() {
        let extent = Extent::new(-10.0, -20.0, 30.0, 40.0);
        assert_eq!(extent.width(), 40.0);
        assert_eq!(extent.height(), 60.0);
        assert_eq!(extent.southwest(), Point { x: -10.0, y: -20.0 });
        assert_eq!(extent.northeast(), Point { x: 30.0, y: 40.0 });
    }

    #[test]
    fn test_extent_validate() {
        assert!(Extent::new(0.0, 0.0, 1.0, 1.0).validate().is_ok());

        let degenerate = Extent::new(1.0, 0.0, 1.0, 1.0);
        assert!(matches!(
            degenerate.validate(),
            Err(CoordError::InvalidExtent { .. })
        ));

        let inverted = Extent::new(2.0, 2.0, 1.0, 1.0);
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_tile_coord_display() {
        let coord = TileCoord::new(12, 654, 1583);
        assert_eq!(coord.to_string(), "12/654/1583");
    }
}
