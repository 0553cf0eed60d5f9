//! Integration tests for the provider core.
//!
//! These tests verify the complete rendering flows:
//! - Layer config → registry → provider construction
//! - Proxy area rendering through the real tile composer, including the
//!   edge inflation and crop back to the exact requested size
//! - Native engine lifecycle: lazy style load, fatal style failure
//! - External provider resolution through a host module loader
//!
//! Run with: `cargo test --test provider_integration`

use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

use image::{Rgba, RgbaImage};

use tilesmith::compose::HttpComposer;
use tilesmith::coord::{Extent, TileCoord, MERCATOR_WORLD_EDGE, SPHERICAL_MERCATOR_SRS};
use tilesmith::provider::{
    dispatch, EngineFactory, HttpClient, LayerContext, ModuleLoader, NativeEngineProvider,
    Provider, ProviderArgs, ProviderDescriptor, ProviderFactory, ProviderKind, ProviderModule,
    ProviderRegistry, RegistryError, RemoteTileProvider, RenderEngine, RenderError, RenderRequest,
    ReqwestClient, RequestError, UrlTemplate,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// HTTP client that records requested URLs and serves one canned body.
struct ScriptedHttpClient {
    body: Vec<u8>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedHttpClient {
    fn new(body: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            body,
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requested_urls(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, RenderError> {
        self.requests.lock().unwrap().push(url.to_string());
        Ok(self.body.clone())
    }
}

/// Engine whose style load succeeds only when the mapfile exists.
struct FileCheckingEngine {
    size: (u32, u32),
}

impl RenderEngine for FileCheckingEngine {
    fn load_style(&mut self, mapfile: &Path) -> Result<(), String> {
        if mapfile.exists() {
            Ok(())
        } else {
            Err(format!("no such file: {}", mapfile.display()))
        }
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn set_extent(&mut self, _extent: Extent) {}

    fn render(&mut self) -> Result<Vec<u8>, String> {
        let (width, height) = self.size;
        Ok(vec![77; (width * height * 4) as usize])
    }
}

struct FileCheckingEngineFactory;

impl EngineFactory for FileCheckingEngineFactory {
    fn create(&self) -> Box<dyn RenderEngine> {
        Box::new(FileCheckingEngine { size: (0, 0) })
    }
}

fn png_bytes(color: Rgba<u8>) -> Vec<u8> {
    let img = RgbaImage::from_pixel(256, 256, color);
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    img.write_to(&mut cursor, image::ImageFormat::Png).unwrap();
    buffer
}

fn world_extent() -> Extent {
    Extent::new(
        -MERCATOR_WORLD_EDGE,
        -MERCATOR_WORLD_EDGE,
        MERCATOR_WORLD_EDGE,
        MERCATOR_WORLD_EDGE,
    )
}

fn scripted_proxy(
    body: Vec<u8>,
) -> (
    Arc<ScriptedHttpClient>,
    RemoteTileProvider<Arc<ScriptedHttpClient>, HttpComposer<Arc<ScriptedHttpClient>>>,
) {
    let client = ScriptedHttpClient::new(body);
    let provider = RemoteTileProvider::new(
        LayerContext::new("integration"),
        UrlTemplate::new("https://tiles.test/{Z}/{X}/{Y}.png").unwrap(),
        client.clone(),
        HttpComposer::new(client.clone()),
    );
    (client, provider)
}

// ============================================================================
// Proxy flow
// ============================================================================

#[test]
fn proxy_area_render_returns_exact_requested_size() {
    let (_, provider) = scripted_proxy(png_bytes(Rgba([180, 40, 40, 255])));

    let image = provider
        .render_area(254, 254, SPHERICAL_MERCATOR_SRS, world_extent())
        .unwrap();

    // Exactly the requested size, never the inflated intermediate.
    assert_eq!(image.dimensions(), (254, 254));
    assert_eq!(*image.get_pixel(0, 0), Rgba([180, 40, 40, 255]));
    assert_eq!(*image.get_pixel(253, 253), Rgba([180, 40, 40, 255]));
}

#[test]
fn proxy_area_render_fetches_base_tile_for_world_extent() {
    let (client, provider) = scripted_proxy(png_bytes(Rgba([0, 0, 0, 255])));

    provider
        .render_area(254, 254, SPHERICAL_MERCATOR_SRS, world_extent())
        .unwrap();

    let urls = client.requested_urls();
    assert!(!urls.is_empty());
    assert!(urls.contains(&"https://tiles.test/0/0/0.png".to_string()));
}

#[test]
fn proxy_tile_render_substitutes_exact_coordinate() {
    let (client, provider) = scripted_proxy(png_bytes(Rgba([1, 2, 3, 255])));

    for (zoom, col, row) in [(0u8, 0u32, 0u32), (5, 9, 23), (17, 70406, 42987)] {
        let request = RenderRequest::Tile {
            width: 256,
            height: 256,
            srs: SPHERICAL_MERCATOR_SRS.to_string(),
            coord: TileCoord::new(zoom, col, row),
        };
        let image = dispatch(&provider, &request).unwrap();
        assert_eq!(image.dimensions(), (256, 256));
    }

    assert_eq!(
        client.requested_urls(),
        vec![
            "https://tiles.test/0/0/0.png".to_string(),
            "https://tiles.test/5/9/23.png".to_string(),
            "https://tiles.test/17/70406/42987.png".to_string(),
        ]
    );
}

#[test]
fn proxy_rejects_foreign_projection() {
    let (_, provider) = scripted_proxy(png_bytes(Rgba([0, 0, 0, 255])));

    let result = provider.render_area(
        256,
        256,
        "+proj=longlat +ellps=WGS84 +datum=WGS84",
        world_extent(),
    );
    assert!(matches!(result, Err(RenderError::UnsupportedGeometry(_))));
}

// ============================================================================
// Native engine flow
// ============================================================================

#[test]
fn mapnik_renders_after_lazy_style_load() {
    let mut mapfile = tempfile::NamedTempFile::new().unwrap();
    write!(mapfile, "<Map></Map>").unwrap();

    let provider = NativeEngineProvider::new(
        LayerContext::new("integration"),
        mapfile.path().to_path_buf(),
        Arc::new(FileCheckingEngineFactory),
    );

    let image = provider
        .render_area(128, 96, SPHERICAL_MERCATOR_SRS, world_extent())
        .unwrap();
    assert_eq!(image.dimensions(), (128, 96));
}

#[test]
fn mapnik_missing_style_is_provider_fatal() {
    let provider = NativeEngineProvider::new(
        LayerContext::new("integration"),
        "/nonexistent/style.xml".into(),
        Arc::new(FileCheckingEngineFactory),
    );

    for _ in 0..2 {
        let result = provider.render_area(64, 64, SPHERICAL_MERCATOR_SRS, world_extent());
        assert!(matches!(result, Err(RenderError::StyleLoad { .. })));
    }
}

#[test]
fn mapnik_tile_requests_fail_as_unsupported_capability() {
    let provider = NativeEngineProvider::new(
        LayerContext::new("integration"),
        "/maps/style.xml".into(),
        Arc::new(FileCheckingEngineFactory),
    );

    let request = RenderRequest::Tile {
        width: 256,
        height: 256,
        srs: SPHERICAL_MERCATOR_SRS.to_string(),
        coord: TileCoord::new(3, 1, 2),
    };
    let result = dispatch(&provider, &request);
    assert!(matches!(
        result,
        Err(RequestError::TileNotSupported { .. })
    ));
}

// ============================================================================
// Registry flow
// ============================================================================

fn registry() -> ProviderRegistry {
    ProviderRegistry::with_builtins(
        ReqwestClient::new().unwrap(),
        Arc::new(FileCheckingEngineFactory),
    )
}

#[test]
fn registry_builds_providers_from_descriptors() {
    let registry = registry();

    let mut args = ProviderArgs::new();
    args.set("url", "https://tiles.test/{Z}/{X}/{Y}.png");
    let proxy = registry
        .resolve(
            &LayerContext::new("osm"),
            &ProviderDescriptor {
                kind: ProviderKind::BuiltIn("proxy".to_string()),
                args,
            },
        )
        .unwrap();
    assert_eq!(proxy.name(), "proxy");

    let mut args = ProviderArgs::new();
    args.set("mapfile", "/maps/streets.xml");
    let mapnik = registry
        .resolve(
            &LayerContext::new("streets"),
            &ProviderDescriptor {
                kind: ProviderKind::BuiltIn("mapnik".to_string()),
                args,
            },
        )
        .unwrap();
    assert_eq!(mapnik.name(), "mapnik");
}

#[test]
fn registry_rejects_unknown_names_without_normalization() {
    let registry = registry();
    for name in ["", "Proxy", " mapnik", "mapnik "] {
        assert!(matches!(
            registry.resolve_builtin(name),
            Err(RegistryError::UnknownProvider(_))
        ));
    }
}

/// Factory used by the external-module test: renders solid blue areas.
struct BlueFactory;

struct BlueProvider;

impl Provider for BlueProvider {
    fn render_area(
        &self,
        width: u32,
        height: u32,
        _srs: &str,
        _extent: Extent,
    ) -> Result<RgbaImage, RenderError> {
        Ok(RgbaImage::from_pixel(width, height, Rgba([0, 0, 255, 255])))
    }

    fn metatile_ok(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "blue"
    }
}

impl ProviderFactory for BlueFactory {
    fn create(
        &self,
        _layer: &LayerContext,
        _args: &ProviderArgs,
    ) -> Result<Arc<dyn Provider>, RegistryError> {
        Ok(Arc::new(BlueProvider))
    }
}

struct HostLoader;

impl ModuleLoader for HostLoader {
    fn load(&self, module_path: &str) -> Result<ProviderModule, String> {
        if module_path != "acme.tiles" {
            return Err(format!("module not found: {}", module_path));
        }
        let mut module = ProviderModule::new();
        module.register("Blue", Arc::new(BlueFactory) as Arc<dyn ProviderFactory>);
        Ok(module)
    }
}

#[test]
fn registry_resolves_external_provider_end_to_end() {
    let mut registry = registry();
    registry.set_module_loader(Box::new(HostLoader));

    let provider = registry
        .resolve(
            &LayerContext::new("custom"),
            &ProviderDescriptor {
                kind: ProviderKind::External {
                    module_path: "acme.tiles".to_string(),
                    class_name: "Blue".to_string(),
                },
                args: ProviderArgs::new(),
            },
        )
        .unwrap();

    assert_eq!(provider.name(), "blue");
    assert!(!provider.metatile_ok());
    let image = provider
        .render_area(16, 16, SPHERICAL_MERCATOR_SRS, world_extent())
        .unwrap();
    assert_eq!(*image.get_pixel(8, 8), Rgba([0, 0, 255, 255]));
}

#[test]
fn registry_reports_missing_external_type() {
    let mut registry = registry();
    registry.set_module_loader(Box::new(HostLoader));

    let result = registry.resolve_external("acme.tiles.Green");
    assert!(matches!(result, Err(RegistryError::TypeLookup { .. })));
}
