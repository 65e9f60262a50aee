use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct JuliaRendererArgs {
    #[command(subcommand)]
    pub command: Option<CommandsEnum>,
}

#[derive(Debug, Subcommand)]
pub enum CommandsEnum {
    /// Render a Julia set to PNG, with a JSON sidecar and a diagnostics file.
    Render(RenderArgs),
    /// Write a swatch image of one of the built-in color maps.
    ColorSwatch(ColorSwatchArgs),
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    /// JSON parameter file; the default scene is rendered when omitted.
    pub params_path: Option<String>,

    /// Write the outputs into a date-time stamped sub-directory.
    #[clap(long, short)]
    pub date_time_out: bool,

    #[clap(long, short, default_value = "out")]
    pub output_dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct ColorSwatchArgs {
    /// Name of a built-in color map: inferno, viridis, or grayscale.
    pub color_map: String,

    #[clap(long, default_value_t = 512)]
    pub width: u32,

    #[clap(long, default_value_t = 64)]
    pub height: u32,

    #[clap(long, short, default_value = "out")]
    pub output_dir: PathBuf,
}
