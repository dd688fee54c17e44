use std::path::{Path, PathBuf};

use pdftoebm_core::{Binarization, CropRect, PanelGeometry};
use raster::PdfDocument;

use crate::error::Error;
use crate::Global;

/// Run settings resolved from the global flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub geometry: PanelGeometry,
    pub binarization: Binarization,
    pub crop: Option<CropRect>,
    pub fuzz: u8,
    pub pdftoppm: PathBuf,
    pub verbose: bool,
}

impl Settings {
    pub fn from_global(global: &Global) -> Result<Self, Error> {
        let mut geometry = global.panel.geometry();
        if let Some(dpi) = global.dpi {
            if dpi == 0 {
                return Err(Error::InvalidArguments("--dpi must be positive".into()));
            }
            geometry = geometry.with_dpi(dpi);
        }

        let binarization = if global.monochrome {
            Binarization::Monochrome
        } else {
            Binarization::threshold(global.threshold)?
        };

        if let Some(rect) = global.crop {
            rect.non_degenerate()?;
        }

        Ok(Self {
            geometry,
            binarization,
            crop: global.crop,
            fuzz: global.fuzz,
            pdftoppm: global.pdftoppm.clone(),
            verbose: global.verbose,
        })
    }
}

/// Open the source document, rejecting a missing path as a usage error.
pub fn open_document(path: &Path) -> Result<PdfDocument, Error> {
    if !path.is_file() {
        return Err(Error::InvalidArguments(format!(
            "PDF not found: {}",
            path.display()
        )));
    }
    let document = PdfDocument::open(path)?;
    log::info!("{} has {} page(s)", path.display(), document.page_count());
    Ok(document)
}
