//! Extent composition for remote tile sources.
//!
//! [`ExtentComposer`] is the collaborator the proxy provider hands a
//! geographic extent and a canvas size; the composer picks a zoom level,
//! fetches whichever source tiles intersect the extent, and mosaics them
//! onto the canvas.
//!
//! [`HttpComposer`] is the default implementation. Its extent-to-zoom
//! inference deliberately keeps the ceil-of-log2 form used by classic
//! slippy-map compositors: when the requested pixel box maps exactly onto
//! a tile boundary, floating point noise can push the inferred zoom down
//! one level. The proxy provider compensates by inflating the canvas by
//! one pixel per side before calling [`ExtentComposer::compose`] and
//! cropping the border afterwards. A composer with different inference
//! must revisit that correction.

use crate::coord::{geo_to_world_pixel, GeoLocation, TileCoord, MAX_ZOOM, TILE_PIXELS};
use crate::provider::{HttpClient, RenderError, UrlTemplate};
use image::RgbaImage;
use tracing::{debug, trace};

/// Assembles a canvas of remote tiles covering a geographic extent.
pub trait ExtentComposer: Send + Sync {
    /// Composites tiles addressed through `template` onto a canvas of
    /// exactly `(width, height)` pixels covering the extent between the
    /// `sw` and `ne` corners.
    fn compose(
        &self,
        template: &UrlTemplate,
        sw: GeoLocation,
        ne: GeoLocation,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, RenderError>;
}

impl<M: ExtentComposer + ?Sized> ExtentComposer for std::sync::Arc<M> {
    fn compose(
        &self,
        template: &UrlTemplate,
        sw: GeoLocation,
        ne: GeoLocation,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, RenderError> {
        (**self).compose(template, sw, ne, width, height)
    }
}

/// Default composer that fetches tiles over HTTP and mosaics them.
pub struct HttpComposer<C: HttpClient> {
    http: C,
}

impl<C: HttpClient> HttpComposer<C> {
    /// Creates a composer that fetches tiles with the given client.
    pub fn new(http: C) -> Self {
        Self { http }
    }
}

impl<C: HttpClient> ExtentComposer for HttpComposer<C> {
    fn compose(
        &self,
        template: &UrlTemplate,
        sw: GeoLocation,
        ne: GeoLocation,
        width: u32,
        height: u32,
    ) -> Result<RgbaImage, RenderError> {
        let zoom = infer_zoom(sw, ne, width, height);

        let (ax, ay) = geo_to_world_pixel(sw, zoom);
        let (bx, by) = geo_to_world_pixel(ne, zoom);

        // Canvas centered on the extent midpoint, in world pixels.
        let left = (ax + bx) / 2.0 - width as f64 / 2.0;
        let top = (ay + by) / 2.0 - height as f64 / 2.0;

        debug!(
            zoom = zoom,
            width = width,
            height = height,
            "Composing extent from remote tiles"
        );

        let mut canvas = RgbaImage::new(width, height);
        let world_tiles = 1i64 << zoom;
        let tile_span = TILE_PIXELS as f64;

        let tx_min = (left / tile_span).floor() as i64;
        let tx_max = ((left + width as f64 - 1.0) / tile_span).floor() as i64;
        let ty_min = (top / tile_span).floor() as i64;
        let ty_max = ((top + height as f64 - 1.0) / tile_span).floor() as i64;

        for ty in ty_min..=ty_max {
            // Rows beyond the poles have no tile; leave them transparent.
            if ty < 0 || ty >= world_tiles {
                continue;
            }
            for tx in tx_min..=tx_max {
                // Columns wrap at the antimeridian.
                let col = tx.rem_euclid(world_tiles) as u32;
                let coord = TileCoord::new(zoom, col, ty as u32);

                let url = template.fill(coord);
                trace!(url = url, "Fetching source tile");
                let body = self.http.get(&url)?;
                let tile = image::load_from_memory(&body)
                    .map_err(|e| RenderError::Fetch(format!("image decode error: {}", e)))?
                    .to_rgba8();

                let dx = (tx as f64 * tile_span - left).round() as i64;
                let dy = (ty as f64 * tile_span - top).round() as i64;
                paste(&mut canvas, &tile, dx, dy);
            }
        }

        Ok(canvas)
    }
}

/// Infers the zoom level whose pixel density best fits the extent into
/// the canvas.
///
/// Per axis: the extent's span in zoom-0 tiles is scaled against the
/// canvas size in tiles, and the zoom is `-ceil(log2(factor))`; the final
/// zoom is the minimum of both axes, clamped to the valid range. The ceil
/// keeps the whole extent on the canvas but makes exact-fit inputs
/// float-sensitive (see module docs).
fn infer_zoom(sw: GeoLocation, ne: GeoLocation, width: u32, height: u32) -> u8 {
    let (ax, ay) = geo_to_world_pixel(sw, 0);
    let (bx, by) = geo_to_world_pixel(ne, 0);

    let tile_span = TILE_PIXELS as f64;
    let h_span = (bx - ax).abs() / tile_span;
    let v_span = (by - ay).abs() / tile_span;

    let h_factor = h_span / (width as f64 / tile_span);
    let v_factor = v_span / (height as f64 / tile_span);

    let h_zoom = -h_factor.log2().ceil();
    let v_zoom = -v_factor.log2().ceil();

    h_zoom.min(v_zoom).clamp(0.0, MAX_ZOOM as f64) as u8
}

/// Places a tile onto the canvas at the given offset, clipping at the
/// canvas edges.
fn paste(canvas: &mut RgbaImage, tile: &RgbaImage, dx: i64, dy: i64) {
    let (cw, ch) = canvas.dimensions();
    for ty in 0..tile.height() {
        let y = dy + ty as i64;
        if y < 0 || y >= ch as i64 {
            continue;
        }
        for tx in 0..tile.width() {
            let x = dx + tx as i64;
            if x < 0 || x >= cw as i64 {
                continue;
            }
            canvas.put_pixel(x as u32, y as u32, *tile.get_pixel(tx, ty));
        }
    }
}
