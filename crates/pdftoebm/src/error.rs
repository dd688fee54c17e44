use std::path::PathBuf;

use pdftoebm_core::header::HeaderError;
use pdftoebm_core::CoreError;
use raster::RasterError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Header(#[from] HeaderError),

    #[error("Failed to {action} {}: {source}", path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn filesystem(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Error::Filesystem {
            action,
            path,
            source,
        }
    }
}
