use std::path::{Path, PathBuf};

use crate::RasterError;

/// A source PDF, opened once to validate it and learn its page count.
///
/// Rendering goes through a [`crate::Rasterizer`]; this type only answers
/// structural questions about the file.
#[derive(Debug)]
pub struct PdfDocument {
    path: PathBuf,
    page_count: u32,
}

impl PdfDocument {
    /// Parse the PDF at `path` and count its pages.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RasterError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let page_count = count_pages(&bytes)?;
        log::debug!("{} has {} page(s)", path.display(), page_count);

        Ok(Self {
            path: path.to_path_buf(),
            page_count,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }
}

/// Count the pages of an in-memory PDF.
pub fn count_pages(bytes: &[u8]) -> Result<u32, RasterError> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| RasterError::Parse(e.to_string()))?;

    if doc.is_encrypted() {
        return Err(RasterError::Encrypted);
    }

    Ok(doc.get_pages().len() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    use lopdf::dictionary;
    use lopdf::{Document, Object};

    /// Build a minimal document with `pages` empty pages.
    fn blank_pdf(pages: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let kids: Vec<Object> = (0..pages)
            .map(|_| {
                doc.add_object(dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                })
                .into()
            })
            .collect();

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    // -- count_pages --------------------------------------------------------

    #[test]
    fn count_pages_three() {
        assert_eq!(count_pages(&blank_pdf(3)).unwrap(), 3);
    }

    #[test]
    fn count_pages_rejects_garbage() {
        assert!(matches!(
            count_pages(b"not a pdf"),
            Err(RasterError::Parse(_))
        ));
    }

    #[test]
    fn count_pages_rejects_empty() {
        assert!(count_pages(&[]).is_err());
    }

    // -- PdfDocument --------------------------------------------------------

    #[test]
    fn open_reads_page_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.pdf");
        std::fs::write(&path, blank_pdf(2)).unwrap();

        let doc = PdfDocument::open(&path).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.path(), path.as_path());
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let result = PdfDocument::open("/definitely/not/here.pdf");
        assert!(matches!(result, Err(RasterError::Io(_))));
    }
}
