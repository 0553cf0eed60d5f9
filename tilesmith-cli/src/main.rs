//! Tilesmith CLI - Command-line interface
//!
//! This binary renders tiles and projected areas from a remote tile
//! server through the tilesmith library's proxy provider.

mod error;

use clap::{Parser, Subcommand};
use error::CliError;
use tilesmith::compose::HttpComposer;
use tilesmith::coord::{Extent, TileCoord, SPHERICAL_MERCATOR_SRS};
use tilesmith::provider::{
    dispatch, LayerContext, RemoteTileProvider, ReqwestClient, RenderRequest, UrlTemplate,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tilesmith")]
#[command(version = tilesmith::VERSION)]
#[command(about = "Render map tiles and areas from a remote tile server", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a single 256x256 tile by coordinate
    Tile {
        /// Tile URL template with {Z}/{X}/{Y} placeholders
        #[arg(long)]
        url: String,

        /// Zoom level (0-18)
        #[arg(long)]
        zoom: u8,

        /// Tile column (west to east)
        #[arg(long)]
        col: u32,

        /// Tile row (north to south)
        #[arg(long)]
        row: u32,

        /// Output image path (format from extension, e.g. .png)
        #[arg(long)]
        output: String,
    },
    /// Render a projected bounding box composited from source tiles
    Area {
        /// Tile URL template with {Z}/{X}/{Y} placeholders
        #[arg(long)]
        url: String,

        /// Output width in pixels
        #[arg(long)]
        width: u32,

        /// Output height in pixels
        #[arg(long)]
        height: u32,

        /// Western edge in spherical mercator meters
        #[arg(long)]
        xmin: f64,

        /// Southern edge in spherical mercator meters
        #[arg(long)]
        ymin: f64,

        /// Eastern edge in spherical mercator meters
        #[arg(long)]
        xmax: f64,

        /// Northern edge in spherical mercator meters
        #[arg(long)]
        ymax: f64,

        /// Output image path (format from extension, e.g. .png)
        #[arg(long)]
        output: String,
    },
}

fn main() {
    init_logging();

    let args = Args::parse();
    if let Err(e) = run(args.command) {
        e.exit();
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command) -> Result<(), CliError> {
    let (url, output, request) = match command {
        Command::Tile {
            url,
            zoom,
            col,
            row,
            output,
        } => {
            let request = RenderRequest::Tile {
                width: 256,
                height: 256,
                srs: SPHERICAL_MERCATOR_SRS.to_string(),
                coord: TileCoord::new(zoom, col, row),
            };
            (url, output, request)
        }
        Command::Area {
            url,
            width,
            height,
            xmin,
            ymin,
            xmax,
            ymax,
            output,
        } => {
            let request = RenderRequest::Area {
                width,
                height,
                srs: SPHERICAL_MERCATOR_SRS.to_string(),
                extent: Extent::new(xmin, ymin, xmax, ymax),
            };
            (url, output, request)
        }
    };

    let template = UrlTemplate::new(url)?;
    let client = ReqwestClient::new().map_err(CliError::HttpClient)?;
    let provider = RemoteTileProvider::new(
        LayerContext::new("cli"),
        template,
        client.clone(),
        HttpComposer::new(client),
    );

    let image = dispatch(&provider, &request)?;
    image.save(&output).map_err(|e| CliError::FileWrite {
        path: output.clone(),
        reason: e.to_string(),
    })?;

    println!(
        "Saved {} ({}x{} pixels)",
        output,
        image.width(),
        image.height()
    );
    Ok(())
}
