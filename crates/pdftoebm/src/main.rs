use crate::prelude::*;
use clap::Parser;

mod config;
mod ebm;
mod error;
mod header;
mod inspect;
mod output;
mod pipeline;
mod prelude;
mod progress;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Convert PDF pages into 1-bit bitmaps for e-paper displays"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Target display
    #[clap(long, env = "PDFTOEBM_PANEL", global = true, default_value = "epd7in5")]
    panel: pdftoebm_core::Panel,

    /// Rasterization resolution (defaults to the panel's DPI)
    #[clap(long, env = "PDFTOEBM_DPI", global = true)]
    dpi: Option<u32>,

    /// Luminance threshold in percent; brighter pixels become white
    #[clap(
        long,
        env = "PDFTOEBM_THRESHOLD",
        global = true,
        default_value = "80",
        conflicts_with = "monochrome"
    )]
    threshold: u8,

    /// Use dithered monochrome reduction instead of a fixed threshold
    #[clap(long, env = "PDFTOEBM_MONOCHROME", global = true)]
    monochrome: bool,

    /// Explicit crop rectangle applied to every page (WxH+X+Y)
    #[clap(long, env = "PDFTOEBM_CROP", global = true)]
    crop: Option<pdftoebm_core::CropRect>,

    /// Luminance tolerance when trimming page margins (0-255)
    #[clap(long, env = "PDFTOEBM_FUZZ", global = true, default_value = "0")]
    fuzz: u8,

    /// Path to the pdftoppm executable
    #[clap(long, env = "PDFTOEBM_PDFTOPPM", global = true, default_value = "pdftoppm")]
    pdftoppm: std::path::PathBuf,

    /// Whether to display additional information.
    #[clap(long, env = "PDFTOEBM_VERBOSE", global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// Convert a page range into a C header array
    Header(crate::header::Options),

    /// Convert a whole document into a raw .ebm bitstream
    Ebm(crate::ebm::Options),

    /// Summarize an existing .ebm bitstream
    Inspect(crate::inspect::Options),
}

fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Header(options) => crate::header::run(options, app.global),
        SubCommands::Ebm(options) => crate::ebm::run(options, app.global),
        SubCommands::Inspect(options) => crate::inspect::run(options, app.global),
    }
}
