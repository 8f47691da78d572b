use std::path::{Path, PathBuf};

use cellray_renderer::{RenderSettings, ShadingMode, Traversal};
use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ShadingArg {
    Standard,
    Normals,
    Shadows,
}

impl From<ShadingArg> for ShadingMode {
    fn from(arg: ShadingArg) -> Self {
        match arg {
            ShadingArg::Standard => ShadingMode::Standard,
            ShadingArg::Normals => ShadingMode::Normals,
            ShadingArg::Shadows => ShadingMode::Shadows,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TraversalArg {
    Dda,
    Exhaustive,
}

impl From<TraversalArg> for Traversal {
    fn from(arg: TraversalArg) -> Self {
        match arg {
            TraversalArg::Dda => Traversal::Dda,
            TraversalArg::Exhaustive => Traversal::Exhaustive,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "cellray")]
#[command(about = "Grid-accelerated Whitted ray tracer", version)]
pub struct Args {
    /// Scene description file
    pub scene: PathBuf,

    /// Output image path (defaults to the scene's `output` name, then the scene file name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON render settings; flags below override its fields
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Worker threads including the main thread
    #[arg(long)]
    pub threads: Option<usize>,

    /// Acceleration grid cells per axis
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"])]
    pub grid: Option<Vec<u32>>,

    /// Tile width and height in pixels
    #[arg(long, num_args = 2, value_names = ["W", "H"])]
    pub block: Option<Vec<u32>>,

    #[arg(long, value_enum)]
    pub shading: Option<ShadingArg>,

    #[arg(long, value_enum)]
    pub traversal: Option<TraversalArg>,

    /// Gamma applied on export
    #[arg(long, default_value_t = 1.0)]
    pub gamma: f32,

    /// Write a Radiance HDR file instead of PNG
    #[arg(long)]
    pub hdr: bool,

    /// Set the logging level (RUST_LOG still applies per module)
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

impl Args {
    /// Apply command-line overrides on top of `base`.
    pub fn apply_overrides(&self, mut base: RenderSettings) -> RenderSettings {
        if let Some(threads) = self.threads {
            base.num_threads = threads;
        }
        if let Some([x, y, z]) = self.grid.as_deref().and_then(|g| <[u32; 3]>::try_from(g).ok()) {
            base.grid_dim = [x, y, z];
        }
        if let Some([w, h]) = self.block.as_deref().and_then(|b| <[u32; 2]>::try_from(b).ok()) {
            base.block_dim = [w, h];
        }
        if let Some(shading) = self.shading {
            base.shading_mode = shading.into();
        }
        if let Some(traversal) = self.traversal {
            base.traversal = traversal.into();
        }
        base
    }

    /// Where the image is written: `--output`, else the scene's own output
    /// name, else the scene file name. The extension follows `--hdr`.
    pub fn output_path(&self, scene_output: Option<&str>) -> PathBuf {
        let path = match (&self.output, scene_output) {
            (Some(path), _) => return path.clone(),
            (None, Some(name)) => PathBuf::from(name),
            (None, None) => self
                .scene
                .file_stem()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("render")),
        };
        path.with_extension(self.extension())
    }

    fn extension(&self) -> &'static str {
        if self.hdr {
            "hdr"
        } else {
            "png"
        }
    }
}

/// Initialise env_logger at `level`; `RUST_LOG` directives are still honoured.
pub fn init_logger(level: LogLevel) {
    env_logger::Builder::new()
        .filter_level(level.into())
        .parse_default_env()
        .init();
}

/// True if `path` asks for HDR output by extension.
pub fn is_hdr_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("hdr"))
}
