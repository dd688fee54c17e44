use std::path::{Path, PathBuf};

use pdftoebm_core::size::format_size;
use pdftoebm_core::{CropPolicy, PageRange, Preset};
use raster::{ImageCrate, ImageOps, Pdftoppm, Rasterizer};

use crate::config::{open_document, Settings};
use crate::output::{self, RawStage, SplitStage};
use crate::pipeline::Pipeline;
use crate::prelude::{eprintln, println, *};
use crate::progress::Progress;
use crate::Global;

#[derive(Debug, clap::Args)]
pub struct Options {
    /// PDF document to convert
    pdf: PathBuf,

    /// Directory the bitstream is written to
    #[clap(short, long, default_value = ".")]
    output: PathBuf,

    /// File name of the bitstream, without extension
    #[clap(long, default_value = "a")]
    name: String,

    /// First page to convert (defaults to the first page)
    #[clap(long)]
    first: Option<u32>,

    /// Last page to convert (defaults to the last page)
    #[clap(long)]
    last: Option<u32>,

    /// Write one NN.ebm file per page instead of a single bitstream
    #[clap(long)]
    split: bool,
}

/// Where packed records go until the run is committed.
pub enum Sink {
    Single(RawStage),
    Split(SplitStage),
}

impl Sink {
    pub fn single(dir: &Path, name: &str) -> Result<Self, Error> {
        let file = f!("{}.{}", name, Preset::RawBinary.extension());
        Ok(Sink::Single(RawStage::new(dir.join(file))?))
    }

    pub fn split(dir: &Path) -> Result<Self, Error> {
        Ok(Sink::Split(SplitStage::new(dir)?))
    }

    fn push(&mut self, record: &[u8]) -> Result<(), Error> {
        match self {
            Sink::Single(stage) => stage.push(record),
            Sink::Split(stage) => stage.push(record),
        }
    }

    /// Move the staged records to their final paths.
    pub fn commit(self) -> Result<Vec<PathBuf>, Error> {
        match self {
            Sink::Single(stage) => Ok(vec![stage.commit()?]),
            Sink::Split(stage) => stage.commit(),
        }
    }
}

/// Pack `range` into `sink`, committing only when every page succeeded.
pub fn convert<R: Rasterizer, O: ImageOps>(
    pipeline: &Pipeline<'_, R, O>,
    range: PageRange,
    policy: CropPolicy,
    mut sink: Sink,
    progress: &Progress,
) -> Result<Vec<PathBuf>, Error> {
    pipeline.run(range, policy, Preset::RawBinary.polarity(), progress, |_, record| {
        sink.push(&record)
    })?;
    sink.commit()
}

fn check_name(name: &str) -> Result<(), Error> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(Error::InvalidArguments(f!(
            "--name must be a plain file name, got {:?}",
            name
        )));
    }
    Ok(())
}

pub fn run(options: Options, global: Global) -> Result<()> {
    let settings = Settings::from_global(&global)?;
    check_name(&options.name)?;
    if options.first == Some(0) {
        return Err(Error::InvalidArguments("--first must be at least 1".into()).into());
    }

    let document = open_document(&options.pdf)?;
    let range = PageRange::new(
        options.first.unwrap_or(1),
        options.last.unwrap_or(document.page_count()),
    )?;
    range.check_within(document.page_count())?;

    output::ensure_dir(&options.output)?;
    let sink = if options.split {
        Sink::split(&options.output)?
    } else {
        Sink::single(&options.output, &options.name)?
    };

    let policy = Preset::RawBinary.crop_policy(settings.crop, None);
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
    let written = convert(&pipeline, range, policy, sink, &progress)
        .wrap_err_with(|| f!("Failed to convert {}", options.pdf.display()))?;

    match written.as_slice() {
        [single] if !options.split => println!("{}", output::size_report(single)?),
        files => {
            let bytes = (files.len() * settings.geometry.bytes_per_page()) as u64;
            println!(
                "Done! Wrote {} in {} files to {}",
                format_size(bytes),
                files.len(),
                options.output.display()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::pipeline::tests::{page, tiny_panel, FakeRasterizer};
    use pdftoebm_core::{Binarization, CropRect};
    use raster::RasterError;
    use tempfile::TempDir;

    fn pages(n: usize) -> FakeRasterizer {
        FakeRasterizer::new((0..n).map(|_| page(20, 20, CropRect::new(10, 10, 5, 5))).collect())
    }

    fn pipeline<'a>(
        rasterizer: &'a FakeRasterizer,
        ops: &'a ImageCrate,
    ) -> Pipeline<'a, FakeRasterizer, ImageCrate> {
        Pipeline::new(
            rasterizer,
            ops,
            Path::new("book.pdf"),
            tiny_panel(),
            Binarization::default(),
        )
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_single_bitstream_concatenates_pages() {
        let dir = TempDir::new().unwrap();
        let rasterizer = pages(3);
        let ops = ImageCrate::default();
        let pipeline = pipeline(&rasterizer, &ops);

        let written = convert(
            &pipeline,
            PageRange::whole(3).unwrap(),
            CropPolicy::LargestBox,
            Sink::single(dir.path(), "a").unwrap(),
            &Progress::hidden(3),
        )
        .unwrap();

        assert_eq!(written, vec![dir.path().join("a.ebm")]);
        let bytes = fs::read(dir.path().join("a.ebm")).unwrap();
        assert_eq!(bytes.len(), 3 * tiny_panel().bytes_per_page());
        // Solid black after trimming: every bit set.
        assert!(bytes.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_second_run_appends() {
        let dir = TempDir::new().unwrap();
        let rasterizer = pages(1);
        let ops = ImageCrate::default();
        let pipeline = pipeline(&rasterizer, &ops);

        for _ in 0..2 {
            convert(
                &pipeline,
                PageRange::whole(1).unwrap(),
                CropPolicy::LargestBox,
                Sink::single(dir.path(), "a").unwrap(),
                &Progress::hidden(1),
            )
            .unwrap();
        }

        let len = fs::metadata(dir.path().join("a.ebm")).unwrap().len() as usize;
        assert_eq!(len, 2 * tiny_panel().bytes_per_page());
    }

    #[test]
    fn test_failure_leaves_no_output() {
        let dir = TempDir::new().unwrap();
        let rasterizer = pages(2);
        let ops = ImageCrate::default();
        let pipeline = pipeline(&rasterizer, &ops);

        // Page 3 does not exist, so the run fails after packing two pages.
        let result = convert(
            &pipeline,
            PageRange::new(1, 3).unwrap(),
            CropPolicy::Fixed(CropRect::new(20, 20, 0, 0)),
            Sink::single(dir.path(), "a").unwrap(),
            &Progress::hidden(3),
        );

        assert!(matches!(
            result,
            Err(Error::Raster(RasterError::CollaboratorFailure { page: 3, .. }))
        ));
        assert!(entries(dir.path()).is_empty());
    }

    #[test]
    fn test_split_writes_one_file_per_page() {
        let dir = TempDir::new().unwrap();
        let rasterizer = pages(3);
        let ops = ImageCrate::default();
        let pipeline = pipeline(&rasterizer, &ops);

        let written = convert(
            &pipeline,
            PageRange::new(2, 3).unwrap(),
            CropPolicy::LargestBox,
            Sink::split(dir.path()).unwrap(),
            &Progress::hidden(2),
        )
        .unwrap();

        assert_eq!(written.len(), 2);
        assert_eq!(entries(dir.path()), vec!["01.ebm", "02.ebm"]);
        for name in ["01.ebm", "02.ebm"] {
            let len = fs::metadata(dir.path().join(name)).unwrap().len() as usize;
            assert_eq!(len, tiny_panel().bytes_per_page());
        }
    }

    #[test]
    fn test_check_name() {
        assert!(check_name("a").is_ok());
        assert!(check_name("book-1").is_ok());
        assert!(matches!(check_name(""), Err(Error::InvalidArguments(_))));
        assert!(matches!(check_name("../a"), Err(Error::InvalidArguments(_))));
        assert!(matches!(check_name(".."), Err(Error::InvalidArguments(_))));
    }
}
