use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::{RasterError, RasterImage};

/// Renders a single PDF page to a grayscale raster.
pub trait Rasterizer {
    /// Rasterize 1-based `page` of `document` at `dpi`.
    fn rasterize(&self, document: &Path, page: u32, dpi: u32) -> Result<RasterImage, RasterError>;
}

/// [`Rasterizer`] backed by Poppler's `pdftoppm`.
///
/// Rendered PNGs are written to a private temporary directory and removed as
/// soon as they are decoded. The directory itself is removed when the value
/// is dropped, which also covers runs that bail out with an error.
#[derive(Debug)]
pub struct Pdftoppm {
    program: PathBuf,
    workdir: TempDir,
}

impl Pdftoppm {
    pub fn new(program: impl Into<PathBuf>) -> Result<Self, RasterError> {
        let workdir = tempfile::Builder::new().prefix("pdftoebm-").tempdir()?;
        Ok(Self {
            program: program.into(),
            workdir,
        })
    }

    pub fn workdir(&self) -> &Path {
        self.workdir.path()
    }

    fn tool_name(&self) -> String {
        self.program
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }
}

/// Arguments for rendering one page to `<root>.png`.
pub fn pdftoppm_args(document: &Path, page: u32, dpi: u32, root: &Path) -> Vec<OsString> {
    let page = page.to_string();
    vec![
        "-png".into(),
        "-r".into(),
        dpi.to_string().into(),
        "-thinlinemode".into(),
        "solid".into(),
        "-f".into(),
        page.clone().into(),
        "-l".into(),
        page.into(),
        "-singlefile".into(),
        document.as_os_str().to_owned(),
        root.as_os_str().to_owned(),
    ]
}

impl Rasterizer for Pdftoppm {
    fn rasterize(&self, document: &Path, page: u32, dpi: u32) -> Result<RasterImage, RasterError> {
        let tool = self.tool_name();
        let root = self.workdir.path().join(format!("page-{page}"));
        let args = pdftoppm_args(document, page, dpi, &root);
        log::debug!("{} {:?}", self.program.display(), args);

        // A bare program name must be looked up on PATH, which duct only does
        // for string-like programs, not paths.
        let output = duct::cmd(self.program.as_os_str(), &args)
            .stdout_null()
            .stderr_capture()
            .unchecked()
            .run()
            .map_err(|source| RasterError::Spawn {
                tool: tool.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RasterError::CollaboratorFailure {
                tool,
                page,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let png = root.with_extension("png");
        if !png.exists() {
            return Err(RasterError::MissingOutput { tool, path: png });
        }

        let image = image::open(&png)?.into_luma8();
        std::fs::remove_file(&png)?;
        log::debug!("page {} rasterized at {}x{}", page, image.width(), image.height());

        Ok(image)
    }
}
