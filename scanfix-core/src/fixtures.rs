//! The fixture catalog and its driver
//!
//! A fixed, ordered list of fixture descriptors covers every file the bulk
//! scanning test suite expects: one PDF and one raster image per supported
//! format, a multi-page PDF, an oversized PDF, and one deliberately invalid
//! text file. Generation is procedural and idempotent; re-running overwrites
//! the same named files.

use crate::canvas::Canvas;
use crate::encoder::{self, FixtureFormat};
use crate::error::Result;
use crate::pdf::PdfDocument;
use std::fs;
use std::path::{Path, PathBuf};

/// Standard fixture dimensions in pixels.
pub const STANDARD_SIZE: (u32, u32) = (800, 600);

/// High-resolution dimensions used for the oversized PDF.
pub const LARGE_SIZE: (u32, u32) = (2400, 1800);

/// Size the oversized PDF is expected to exceed, in kilobytes.
pub const LARGE_PDF_TARGET_KB: f64 = 1100.0;

/// Page count of the multi-page fixture.
pub const MULTI_PAGE_COUNT: u32 = 3;

/// Page count of the escalated oversized PDF.
pub const ESCALATION_PAGES: u32 = 5;

/// Extensions the manifest recognizes when listing the output directory.
pub const RECOGNIZED_EXTENSIONS: &[&str] = &[
    "pdf", "jpg", "jpeg", "png", "gif", "jfif", "tiff", "tif", "txt",
];

const INVALID_TEXT: &str = "This is a text file, not a valid image or PDF.\n\
                            Used for testing file type validation.\n";

/// How one fixture file is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureKind {
    /// A raster image in the given format.
    Raster(FixtureFormat),
    /// A one-page PDF.
    SinglePagePdf,
    /// A PDF with a fixed number of pages.
    MultiPagePdf { pages: u32 },
    /// A PDF expected to exceed a size threshold (best effort, see
    /// [`FixtureSpec::generate`]).
    OversizedPdf,
    /// A plain text file that fails image and PDF sniffing.
    InvalidText,
}

/// Descriptor for one file of the catalog.
#[derive(Debug, Clone, Copy)]
pub struct FixtureSpec {
    pub filename: &'static str,
    pub caption: &'static str,
    pub width: u32,
    pub height: u32,
    pub kind: FixtureKind,
}

/// A generated file and its measured size.
#[derive(Debug, Clone)]
pub struct GeneratedFixture {
    pub path: PathBuf,
    pub size_kb: f64,
}

/// The full catalog, in generation order.
pub fn catalog() -> Vec<FixtureSpec> {
    let (w, h) = STANDARD_SIZE;
    let (lw, lh) = LARGE_SIZE;
    let raster = |filename, caption, format| FixtureSpec {
        filename,
        caption,
        width: w,
        height: h,
        kind: FixtureKind::Raster(format),
    };

    vec![
        FixtureSpec {
            filename: "test-document.pdf",
            caption: "PDF Test File",
            width: w,
            height: h,
            kind: FixtureKind::SinglePagePdf,
        },
        raster("test-image.jpg", "JPG Test File", FixtureFormat::Jpeg),
        raster("test-image.jpeg", "JPEG Test File", FixtureFormat::Jpeg),
        raster("test-image.png", "PNG Test File", FixtureFormat::Png),
        raster("test-image.gif", "GIF Test File", FixtureFormat::Gif),
        raster("test-image.jfif", "JFIF Test File", FixtureFormat::Jpeg),
        raster("test-document.tiff", "TIFF Test File", FixtureFormat::Tiff),
        raster("test-document.tif", "TIF Test File", FixtureFormat::Tiff),
        FixtureSpec {
            filename: "document1.pdf",
            caption: "PDF Test File",
            width: w,
            height: h,
            kind: FixtureKind::SinglePagePdf,
        },
        FixtureSpec {
            filename: "document2.pdf",
            caption: "PDF Test File",
            width: w,
            height: h,
            kind: FixtureKind::SinglePagePdf,
        },
        FixtureSpec {
            filename: "multi-page.pdf",
            caption: "Multi-page PDF",
            width: w,
            height: h,
            kind: FixtureKind::MultiPagePdf {
                pages: MULTI_PAGE_COUNT,
            },
        },
        FixtureSpec {
            filename: "large-document.pdf",
            caption: "Large PDF",
            width: lw,
            height: lh,
            kind: FixtureKind::OversizedPdf,
        },
        FixtureSpec {
            filename: "invalid-file.txt",
            caption: "",
            width: 0,
            height: 0,
            kind: FixtureKind::InvalidText,
        },
    ]
}

impl FixtureSpec {
    /// Generate this fixture into `dir`, overwriting any previous file, and
    /// report its final size.
    pub fn generate(&self, dir: &Path) -> Result<GeneratedFixture> {
        let path = dir.join(self.filename);

        match self.kind {
            FixtureKind::Raster(format) => {
                let canvas = Canvas::compose(self.caption, self.width, self.height);
                encoder::write_canvas(&canvas, &path, format)?;
            }
            FixtureKind::SinglePagePdf => {
                let canvas = Canvas::compose(self.caption, self.width, self.height);
                encoder::write_canvas(&canvas, &path, FixtureFormat::Pdf)?;
            }
            FixtureKind::MultiPagePdf { pages } => {
                let mut doc = PdfDocument::new();
                for page in 1..=pages {
                    let caption = format!("{} - Page {}", self.caption, page);
                    doc.push_page(&Canvas::compose(&caption, self.width, self.height))?;
                }
                doc.save(&path)?;
            }
            FixtureKind::OversizedPdf => {
                self.write_oversized_pdf(&path)?;
            }
            FixtureKind::InvalidText => {
                fs::write(&path, INVALID_TEXT)?;
            }
        }

        let size_kb = file_size_kb(&path)?;
        tracing::debug!("generated {} ({:.2} KB)", path.display(), size_kb);
        Ok(GeneratedFixture { path, size_kb })
    }

    /// Best-effort size targeting: write one high-resolution page, and if
    /// the file is still under [`LARGE_PDF_TARGET_KB`], rewrite it as a
    /// fixed five-page document. The escalated file is not re-checked
    /// against the target, so it can still under-shoot.
    fn write_oversized_pdf(&self, path: &Path) -> Result<()> {
        let mut doc = PdfDocument::new();
        let caption = format!("{} Test File", self.caption);
        doc.push_page(&Canvas::compose(&caption, self.width, self.height))?;
        doc.save(path)?;

        if file_size_kb(path)? < LARGE_PDF_TARGET_KB {
            let mut doc = PdfDocument::new();
            for page in 1..=ESCALATION_PAGES {
                let caption = format!("{} - Page {}", self.caption, page);
                doc.push_page(&Canvas::compose(&caption, self.width, self.height))?;
            }
            doc.save(path)?;
        }

        Ok(())
    }
}

/// Generate the entire catalog into `dir`, creating the directory if
/// needed. Files are written in catalog order; any failure aborts the run
/// with the files generated so far left in place.
pub fn generate_all(dir: &Path) -> Result<Vec<GeneratedFixture>> {
    fs::create_dir_all(dir)?;
    catalog().iter().map(|spec| spec.generate(dir)).collect()
}

/// One manifest row: a recognized file in the output directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    pub filename: String,
    pub size_kb: f64,
}

/// List the recognized files in `dir`, sorted by name.
pub fn manifest(dir: &Path) -> Result<Vec<ManifestEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let filename = entry.file_name().to_string_lossy().into_owned();
        let recognized = Path::new(&filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| RECOGNIZED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if recognized {
            entries.push(ManifestEntry {
                filename,
                size_kb: entry.metadata()?.len() as f64 / 1024.0,
            });
        }
    }
    entries.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(entries)
}

fn file_size_kb(path: &Path) -> Result<f64> {
    Ok(fs::metadata(path)?.len() as f64 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[test]
    fn test_catalog_has_thirteen_unique_files() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 13);

        let names: HashSet<_> = catalog.iter().map(|s| s.filename).collect();
        assert_eq!(names.len(), 13);
    }

    #[test]
    fn test_catalog_covers_every_format() {
        let catalog = catalog();
        for format in [
            FixtureFormat::Jpeg,
            FixtureFormat::Png,
            FixtureFormat::Gif,
            FixtureFormat::Tiff,
        ] {
            assert!(
                catalog
                    .iter()
                    .any(|s| s.kind == FixtureKind::Raster(format)),
                "no raster fixture for {format:?}"
            );
        }
        assert!(catalog
            .iter()
            .any(|s| matches!(s.kind, FixtureKind::MultiPagePdf { pages: 3 })));
        assert!(catalog.iter().any(|s| s.kind == FixtureKind::OversizedPdf));
        assert!(catalog.iter().any(|s| s.kind == FixtureKind::InvalidText));
    }

    #[test]
    fn test_catalog_extensions_match_declared_formats() {
        for spec in catalog() {
            let ext = Path::new(spec.filename)
                .extension()
                .and_then(|e| e.to_str())
                .unwrap();
            match spec.kind {
                FixtureKind::Raster(format) => {
                    assert_eq!(FixtureFormat::from_extension(ext), Some(format));
                }
                FixtureKind::SinglePagePdf
                | FixtureKind::MultiPagePdf { .. }
                | FixtureKind::OversizedPdf => {
                    assert_eq!(FixtureFormat::from_extension(ext), Some(FixtureFormat::Pdf));
                }
                FixtureKind::InvalidText => {
                    assert_eq!(FixtureFormat::from_extension(ext), None);
                }
            }
        }
    }

    #[test]
    fn test_invalid_text_fixture() {
        let dir = TempDir::new().unwrap();
        let spec = catalog()
            .into_iter()
            .find(|s| s.kind == FixtureKind::InvalidText)
            .unwrap();

        let generated = spec.generate(dir.path()).unwrap();
        let content = fs::read_to_string(&generated.path).unwrap();
        assert!(!content.is_empty());
        assert!(content.contains("not a valid image or PDF"));
    }

    #[test]
    fn test_manifest_filters_unrecognized_extensions() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("kept.pdf"), b"x").unwrap();
        fs::write(dir.path().join("kept.txt"), b"x").unwrap();
        fs::write(dir.path().join("skipped.bmp"), b"x").unwrap();
        fs::write(dir.path().join("no-extension"), b"x").unwrap();

        let entries = manifest(dir.path()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, ["kept.pdf", "kept.txt"]);
    }

    #[test]
    fn test_manifest_is_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["zz.pdf", "aa.png", "mm.gif"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let entries = manifest(dir.path()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(names, ["aa.png", "mm.gif", "zz.pdf"]);
    }

    #[test]
    fn test_manifest_reports_size_kb() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sized.txt"), vec![0u8; 2048]).unwrap();

        let entries = manifest(dir.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert!((entries[0].size_kb - 2.0).abs() < f64::EPSILON);
    }
}
