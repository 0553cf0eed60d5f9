//! Remote tile proxy provider.
//!
//! Renders by passing through imagery from a remote slippy-map tile
//! server. Single tiles are fetched directly from the URL template; areas
//! are composited from source tiles by an [`ExtentComposer`].

use super::http::HttpClient;
use super::request::{validate_srs, validate_tile_size};
use super::template::UrlTemplate;
use super::types::{LayerContext, Provider, RenderError, TileRenderer};
use crate::compose::ExtentComposer;
use crate::coord::{project_to_geo, Extent, TileCoord};
use image::RgbaImage;
use tracing::debug;

/// Provider that proxies tiles from a remote tile server.
///
/// Identified by the name "proxy" in layer configuration. Requires a
/// `url` argument holding a template with `{Z}`/`{X}`/`{Y}` placeholders.
pub struct RemoteTileProvider<C: HttpClient, M: ExtentComposer> {
    layer: LayerContext,
    template: UrlTemplate,
    http: C,
    composer: M,
}

impl<C: HttpClient, M: ExtentComposer> RemoteTileProvider<C, M> {
    /// Creates a proxy provider for the given layer.
    pub fn new(layer: LayerContext, template: UrlTemplate, http: C, composer: M) -> Self {
        Self {
            layer,
            template,
            http,
            composer,
        }
    }

    /// The URL template tiles are fetched from.
    pub fn template(&self) -> &UrlTemplate {
        &self.template
    }
}

impl<C: HttpClient, M: ExtentComposer> TileRenderer for RemoteTileProvider<C, M> {
    fn render_tile(
        &self,
        width: u32,
        height: u32,
        srs: &str,
        coord: TileCoord,
    ) -> Result<RgbaImage, RenderError> {
        validate_srs(srs)?;
        validate_tile_size(width, height)?;

        let url = self.template.fill(coord);
        debug!(layer = self.layer.name(), url = url, "Proxying tile");

        let body = self.http.get(&url)?;
        let image = image::load_from_memory(&body)
            .map_err(|e| RenderError::Fetch(format!("image decode error: {}", e)))?;

        Ok(image.to_rgba8())
    }
}

impl<C: HttpClient, M: ExtentComposer> Provider for RemoteTileProvider<C, M> {
    fn render_area(
        &self,
        width: u32,
        height: u32,
        srs: &str,
        extent: Extent,
    ) -> Result<RgbaImage, RenderError> {
        validate_srs(srs)?;

        let sw = project_to_geo(extent.southwest());
        let ne = project_to_geo(extent.northeast());

        debug!(
            layer = self.layer.name(),
            width = width,
            height = height,
            extent = %extent,
            "Proxying area"
        );

        // Compose onto a canvas one pixel larger on every side. The
        // composer's extent-to-zoom inference can round down a level when
        // the exact pixel box lands on a tile boundary; the inflated
        // canvas keeps it on the right level and the border is cropped
        // away below.
        let canvas = self
            .composer
            .compose(&self.template, sw, ne, width + 2, height + 2)?;

        if canvas.dimensions() != (width + 2, height + 2) {
            return Err(RenderError::Fetch(format!(
                "composer returned a {}x{} canvas, expected {}x{}",
                canvas.width(),
                canvas.height(),
                width + 2,
                height + 2
            )));
        }

        Ok(image::imageops::crop_imm(&canvas, 1, 1, width, height).to_image())
    }

    fn tile_renderer(&self) -> Option<&dyn TileRenderer> {
        Some(self)
    }

    fn metatile_ok(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "proxy"
    }
}
