//! Minimal image-backed PDF generation
//!
//! Fixture PDFs are plain containers: each page is one JPEG-compressed
//! canvas embedded as a DCTDecode image XObject, drawn over the full
//! MediaBox. The writer emits the classic header / objects / xref / trailer
//! layout.

mod objects;
mod writer;

pub use objects::{Dictionary, Object, ObjectId};
pub use writer::PdfWriter;

use crate::canvas::Canvas;
use crate::encoder;
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Pages are sized at a fixed rendering resolution, in dots per inch.
pub const PDF_DPI: f64 = 100.0;

/// One PDF page: a JPEG-compressed canvas plus its pixel dimensions.
#[derive(Debug, Clone)]
pub struct PdfPage {
    jpeg: Vec<u8>,
    width_px: u32,
    height_px: u32,
}

impl PdfPage {
    pub fn from_canvas(canvas: &Canvas) -> Result<Self> {
        Ok(Self {
            jpeg: encoder::encode_jpeg(canvas.image())?,
            width_px: canvas.width(),
            height_px: canvas.height(),
        })
    }

    /// Page width in PDF points (1/72 inch) at the fixed resolution.
    pub fn width_pt(&self) -> f64 {
        f64::from(self.width_px) * 72.0 / PDF_DPI
    }

    /// Page height in PDF points at the fixed resolution.
    pub fn height_pt(&self) -> f64 {
        f64::from(self.height_px) * 72.0 / PDF_DPI
    }

    /// Build the image XObject carrying the page raster.
    pub fn image_object(&self) -> Object {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name("XObject".to_string()));
        dict.set("Subtype", Object::Name("Image".to_string()));
        dict.set("Width", Object::Integer(i64::from(self.width_px)));
        dict.set("Height", Object::Integer(i64::from(self.height_px)));
        dict.set("ColorSpace", Object::Name("DeviceRGB".to_string()));
        dict.set("BitsPerComponent", Object::Integer(8));
        dict.set("Filter", Object::Name("DCTDecode".to_string()));
        dict.set("Length", Object::Integer(self.jpeg.len() as i64));

        Object::Stream(dict, self.jpeg.clone())
    }
}

/// An ordered sequence of pages, written as one document.
#[derive(Debug, Clone, Default)]
pub struct PdfDocument {
    pages: Vec<PdfPage>,
    creation_date: Option<DateTime<Utc>>,
}

impl PdfDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one canvas as the next page.
    pub fn push_page(&mut self, canvas: &Canvas) -> Result<()> {
        self.pages.push(PdfPage::from_canvas(canvas)?);
        Ok(())
    }

    pub fn pages(&self) -> &[PdfPage] {
        &self.pages
    }

    /// Pin the creation date written to the Info dictionary. Defaults to
    /// the current time.
    pub fn set_creation_date(&mut self, date: DateTime<Utc>) {
        self.creation_date = Some(date);
    }

    pub fn creation_date(&self) -> DateTime<Utc> {
        self.creation_date.unwrap_or_else(Utc::now)
    }

    /// Write the document to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut writer = PdfWriter::create(path)?;
        writer.write_document(self)
    }
}
