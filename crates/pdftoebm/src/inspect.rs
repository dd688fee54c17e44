use std::fmt::Write;
use std::path::{Path, PathBuf};

use colored::Colorize;
use pdftoebm_core::inspect::{summarize, BitstreamSummary};
use pdftoebm_core::size::format_size;
use pdftoebm_core::Preset;
use serde::Serialize;

use crate::config::Settings;
use crate::prelude::{println, *};
use crate::Global;

#[derive(Debug, clap::Args)]
pub struct Options {
    /// Raw bitstream to summarize
    path: PathBuf,

    /// Print the summary as JSON
    #[clap(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    path: &'a Path,
    panel: String,
    #[serde(flatten)]
    summary: &'a BitstreamSummary,
}

fn render_text(path: &Path, panel: &str, summary: &BitstreamSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", path.display().to_string().bold());
    let _ = writeln!(
        out,
        "{} ({} bytes), {} page(s) of {} bytes for {}",
        format_size(summary.bytes as u64),
        summary.bytes,
        summary.page_count,
        summary.bytes_per_page,
        panel
    );
    for page in &summary.pages {
        let _ = writeln!(
            out,
            "  page {:>3}: {:>8} black pixels ({:.1}%)",
            page.page,
            page.black_pixels,
            page.coverage * 100.0
        );
    }
    out
}

pub fn run(options: Options, global: Global) -> Result<()> {
    let settings = Settings::from_global(&global)?;
    let bytes = std::fs::read(&options.path).map_err(Error::filesystem("read", &options.path))?;

    let summary = summarize(&bytes, &settings.geometry, Preset::RawBinary.polarity())
        .wrap_err_with(|| f!("{} is not a {} bitstream", options.path.display(), global.panel))?;

    if options.json {
        let report = Report {
            path: &options.path,
            panel: global.panel.to_string(),
            summary: &summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        anstream::print!("{}", render_text(&options.path, global.panel.as_str(), &summary));
    }

    Ok(())
}
