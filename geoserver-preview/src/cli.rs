// ABOUTME: CLI argument definitions for the gspreview binary
// ABOUTME: Defines global connection flags and the preview, snapshot, and detect commands

use crate::image_protocols::Protocol;
use clap::{Args, Parser, Subcommand};
use geoserver_sdk::BoundingBox;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gspreview")]
#[command(about = "Preview GeoServer WMS layers in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// GeoServer root URL, e.g. http://localhost:8080/geoserver
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// GeoServer username
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Read configuration from this file instead of the standard locations
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Force a rendering tier (native, sixel, chafa, ascii)
    #[arg(long, global = true)]
    pub protocol: Option<Protocol>,

    /// Write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive map preview
    Preview {
        #[command(flatten)]
        layer: LayerArgs,

        /// Skip the REST lookup of the layer's extent and styles
        #[arg(long)]
        no_metadata: bool,
    },
    /// Render one frame of the initial view to stdout
    Snapshot {
        #[command(flatten)]
        layer: LayerArgs,

        /// Frame width in terminal columns (defaults to the terminal width)
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        cols: Option<u16>,

        /// Frame height in terminal rows (defaults to the terminal height)
        #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
        rows: Option<u16>,
    },
    /// Show which rendering tier this terminal gets and why
    Detect,
}

#[derive(Args, Debug, Clone)]
pub struct LayerArgs {
    /// Workspace containing the layer (falls back to default_workspace)
    #[arg(long, short)]
    pub workspace: Option<String>,

    /// Layer name
    #[arg(long, short)]
    pub layer: String,

    /// Style to cycle through; repeat for several (default: the layer's styles)
    #[arg(long, short)]
    pub style: Vec<String>,

    /// Initial extent as minx,miny,maxx,maxy in EPSG:4326
    #[arg(long, value_parser = parse_bbox, allow_hyphen_values = true)]
    pub bbox: Option<BoundingBox>,

    /// Initial zoom level (0-20)
    #[arg(long, short, value_parser = parse_zoom)]
    pub zoom: Option<f64>,
}

pub fn parse_bbox(s: &str) -> Result<BoundingBox, String> {
    let values: Vec<f64> = s
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("Invalid number in bbox '{}': {}", s, e))?;

    let &[min_x, min_y, max_x, max_y] = &values[..] else {
        return Err(format!(
            "Expected 4 comma-separated values (minx,miny,maxx,maxy), got {}",
            values.len()
        ));
    };

    if values.iter().any(|v| !v.is_finite()) {
        return Err(format!("Invalid bbox '{}': values must be finite numbers", s));
    }

    if min_x >= max_x || min_y >= max_y {
        return Err(format!(
            "Empty bbox '{}': min values must be below max values",
            s
        ));
    }

    Ok(BoundingBox::new(min_x, min_y, max_x, max_y))
}

pub fn parse_zoom(s: &str) -> Result<f64, String> {
    let zoom: f64 = s
        .parse()
        .map_err(|_| format!("Invalid zoom level '{}'", s))?;
    if !(0.0..=20.0).contains(&zoom) {
        return Err(format!("Zoom level must be between 0 and 20, got {}", zoom));
    }
    Ok(zoom)
}
