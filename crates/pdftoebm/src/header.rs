use std::path::{Path, PathBuf};

use pdftoebm_core::header::{guard_macro, HeaderRenderer};
use pdftoebm_core::{CropPolicy, PageRange, Preset};
use raster::{ImageCrate, ImageOps, Pdftoppm, Rasterizer};

use crate::config::{open_document, Settings};
use crate::output;
use crate::pipeline::Pipeline;
use crate::prelude::{eprintln, println, *};
use crate::progress::Progress;
use crate::Global;

#[derive(Debug, clap::Args)]
pub struct Options {
    /// PDF document to convert
    pdf: PathBuf,

    /// First page to convert (1-based, inclusive)
    first: u32,

    /// Last page to convert (inclusive)
    last: u32,

    /// Page whose trimmed margins crop every converted page
    crop_page: Option<u32>,

    /// Header file to write
    #[clap(short, long, default_value = "doc.h")]
    output: PathBuf,
}

/// Include guard for a header written to `path`.
fn guard_for(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "doc".to_string());
    guard_macro(&stem)
}

/// Pack `range` and render the header text in memory.
pub fn build_header<R: Rasterizer, O: ImageOps>(
    pipeline: &Pipeline<'_, R, O>,
    range: PageRange,
    policy: CropPolicy,
    guard: &str,
    progress: &Progress,
) -> Result<String, Error> {
    let mut renderer = HeaderRenderer::new(guard, range.page_count(), pipeline.geometry().bytes_per_page());

    pipeline.run(range, policy, Preset::HeaderArray.polarity(), progress, |_, record| {
        renderer.push_page(&record)?;
        Ok(())
    })?;

    Ok(renderer.finish()?)
}

pub fn run(options: Options, global: Global) -> Result<()> {
    let settings = Settings::from_global(&global)?;

    let range = PageRange::new(options.first, options.last)?;
    if options.crop_page == Some(0) {
        return Err(Error::InvalidArguments("crop page must be at least 1".into()).into());
    }

    let document = open_document(&options.pdf)?;
    range.check_within(document.page_count())?;
    if let Some(page) = options.crop_page {
        if page > document.page_count() {
            return Err(Error::InvalidArguments(f!(
                "crop page {} is past the end of {} ({} pages)",
                page,
                options.pdf.display(),
                document.page_count()
            ))
            .into());
        }
    }

    let policy = Preset::HeaderArray.crop_policy(settings.crop, options.crop_page);
    if settings.verbose {
        eprintln!(
            "{} pages {} at {} dpi, {} bytes per page",
            options.pdf.display(),
            range,
            settings.geometry.dpi,
            settings.geometry.bytes_per_page()
        );
    }

    let rasterizer = Pdftoppm::new(&settings.pdftoppm)?;
    let ops = ImageCrate::new(settings.fuzz);
    let pipeline = Pipeline::new(
        &rasterizer,
        &ops,
        document.path(),
        settings.geometry,
        settings.binarization,
    );

    let progress = Progress::new(range.page_count());
    let text = build_header(&pipeline, range, policy, &guard_for(&options.output), &progress)
        .wrap_err_with(|| f!("Failed to convert {}", options.pdf.display()))?;

    output::persist_text(&options.output, &text)?;
    println!("{}", output::size_report(&options.output)?);

    Ok(())
}
