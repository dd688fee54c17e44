//! Writing artifacts to disk.
//!
//! Nothing reaches its final path until every page has been packed. Raw
//! records are staged next to the destination and appended in one go; text
//! artifacts are written to a temporary file and renamed into place; split
//! pages are staged in a temporary directory and moved out at the end. A run
//! that fails while packing leaves the output directory as it found it.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use pdftoebm_core::size::format_size;
use tempfile::{NamedTempFile, TempDir};

use crate::error::Error;

/// Create `dir` and its parents if needed.
pub fn ensure_dir(dir: &Path) -> Result<(), Error> {
    fs::create_dir_all(dir).map_err(Error::filesystem("create directory", dir))
}

/// The directory a file will be written into.
fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Staged page records for one `.ebm` destination.
pub struct RawStage {
    destination: PathBuf,
    staged: NamedTempFile,
    records: usize,
}

impl RawStage {
    pub fn new(destination: impl Into<PathBuf>) -> Result<Self, Error> {
        let destination = destination.into();
        let dir = parent_dir(&destination);
        let staged = tempfile::Builder::new()
            .prefix(".pdftoebm-")
            .suffix(".ebm.part")
            .tempfile_in(dir)
            .map_err(Error::filesystem("stage output in", dir))?;

        Ok(Self {
            destination,
            staged,
            records: 0,
        })
    }

    pub fn push(&mut self, record: &[u8]) -> Result<(), Error> {
        self.staged
            .write_all(record)
            .map_err(Error::filesystem("write", self.staged.path()))?;
        self.records += 1;
        Ok(())
    }

    /// Append everything staged to the destination, creating it if needed.
    pub fn commit(mut self) -> Result<PathBuf, Error> {
        let staged_path = self.staged.path().to_path_buf();
        let file = self.staged.as_file_mut();
        file.flush().map_err(Error::filesystem("flush", &staged_path))?;
        file.seek(SeekFrom::Start(0))
            .map_err(Error::filesystem("rewind", &staged_path))?;

        let mut destination = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.destination)
            .map_err(Error::filesystem("open", &self.destination))?;
        io::copy(file, &mut destination).map_err(Error::filesystem("append to", &self.destination))?;
        destination
            .sync_all()
            .map_err(Error::filesystem("sync", &self.destination))?;

        log::debug!(
            "appended {} record(s) to {}",
            self.records,
            self.destination.display()
        );
        Ok(self.destination)
    }
}

/// File name for the 1-based `position` of a split run, e.g. `01.ebm`.
pub fn split_file_name(position: usize) -> String {
    format!("{:02}.ebm", position)
}

/// One raw file per page, staged until the whole run succeeds.
pub struct SplitStage {
    dir: PathBuf,
    staging: TempDir,
    files: Vec<String>,
}

impl SplitStage {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, Error> {
        let dir = dir.into();
        let staging = tempfile::Builder::new()
            .prefix(".pdftoebm-")
            .tempdir_in(&dir)
            .map_err(Error::filesystem("stage output in", &dir))?;

        Ok(Self {
            dir,
            staging,
            files: Vec::new(),
        })
    }

    pub fn push(&mut self, record: &[u8]) -> Result<(), Error> {
        let name = split_file_name(self.files.len() + 1);
        let path = self.staging.path().join(&name);
        fs::write(&path, record).map_err(Error::filesystem("write", &path))?;
        self.files.push(name);
        Ok(())
    }

    /// Move every staged page into the output directory.
    ///
    /// Existing `NN.ebm` files are replaced. Each page is renamed on its own,
    /// so the commit is not atomic across pages: if a rename fails, the pages
    /// before it are already in place and the rest are discarded.
    pub fn commit(self) -> Result<Vec<PathBuf>, Error> {
        let mut written = Vec::with_capacity(self.files.len());
        for name in &self.files {
            let from = self.staging.path().join(name);
            let to = self.dir.join(name);
            if to.exists() {
                log::warn!("replacing {}", to.display());
            }
            fs::rename(&from, &to).map_err(Error::filesystem("move page to", &to))?;
            written.push(to);
        }
        Ok(written)
    }
}

/// Write `text` to `path`, replacing it atomically.
pub fn persist_text(path: &Path, text: &str) -> Result<(), Error> {
    let dir = parent_dir(path);
    let mut staged = NamedTempFile::new_in(dir).map_err(Error::filesystem("stage output in", dir))?;
    staged
        .write_all(text.as_bytes())
        .map_err(Error::filesystem("write", staged.path()))?;
    staged
        .persist(path)
        .map_err(|e| Error::filesystem("replace", path)(e.error))?;
    Ok(())
}

/// Summary line with the artifact's size on disk.
pub fn size_report(path: &Path) -> Result<String, Error> {
    let size = File::open(path)
        .and_then(|f| f.metadata())
        .map_err(Error::filesystem("read metadata of", path))?
        .len();
    Ok(format!("Done! Wrote {} to {}", format_size(size), path.display()))
}
