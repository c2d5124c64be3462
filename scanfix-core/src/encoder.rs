//! Encoding of composed canvases into the fixture formats
//!
//! JPEG family formats are flattened to opaque RGB at a fixed quality; GIF
//! is palette-quantized by the encoder; PNG and TIFF are written directly;
//! PDF wraps the canvas as a one-page document.

use crate::canvas::Canvas;
use crate::error::Result;
use crate::pdf::PdfDocument;
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::tiff::TiffEncoder;
use image::{ExtendedColorType, RgbImage};
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;

/// Fixed quality for the JPEG family (`.jpg`, `.jpeg`, `.jfif`).
pub const JPEG_QUALITY: u8 = 95;

/// The closed set of formats the generator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureFormat {
    Jpeg,
    Png,
    Gif,
    Tiff,
    Pdf,
}

impl FixtureFormat {
    /// Map a file extension to its format. `.jpg`, `.jpeg` and `.jfif` are
    /// all JPEG; `.tiff` and `.tif` are both TIFF.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "jfif" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "tiff" | "tif" => Some(Self::Tiff),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }
}

/// Encode a canvas into memory as JPEG at the fixed quality.
pub fn encode_jpeg(image: &RgbImage) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut data, JPEG_QUALITY);
    image.write_with_encoder(encoder)?;
    Ok(data)
}

/// Encode a canvas and write it to `path` in the given format.
pub fn write_canvas(canvas: &Canvas, path: &Path, format: FixtureFormat) -> Result<()> {
    tracing::debug!("encoding {} as {:?}", path.display(), format);
    match format {
        FixtureFormat::Jpeg => {
            let writer = BufWriter::new(File::create(path)?);
            let encoder = JpegEncoder::new_with_quality(writer, JPEG_QUALITY);
            canvas.image().write_with_encoder(encoder)?;
        }
        FixtureFormat::Png => {
            let writer = BufWriter::new(File::create(path)?);
            canvas.image().write_with_encoder(PngEncoder::new(writer))?;
        }
        FixtureFormat::Gif => {
            let writer = BufWriter::new(File::create(path)?);
            let mut encoder = GifEncoder::new(writer);
            encoder.encode(
                canvas.image().as_raw(),
                canvas.width(),
                canvas.height(),
                ExtendedColorType::Rgb8,
            )?;
        }
        FixtureFormat::Tiff => {
            // TIFF encoding needs a seekable sink
            let mut cursor = Cursor::new(Vec::new());
            canvas
                .image()
                .write_with_encoder(TiffEncoder::new(&mut cursor))?;
            std::fs::write(path, cursor.into_inner())?;
        }
        FixtureFormat::Pdf => {
            let mut doc = PdfDocument::new();
            doc.push_page(canvas)?;
            doc.save(path)?;
        }
    }
    Ok(())
}
