//! Canvas composition for fixture pages
//!
//! Every generated file starts from the same layout: a solid background, a
//! caption with a few descriptive lines centered horizontally, and an
//! outlined rectangle near the bottom as a visual marker.

use ab_glyph::{FontArc, FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use lazy_static::lazy_static;

/// Embedded fallback font, used when no preferred font is found on disk.
const FALLBACK_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Well-known locations for a nicer caption font. Missing entries are
/// skipped silently.
const PREFERRED_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/msttcorefonts/Arial.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const MARKER_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

const FONT_SCALE: f32 = 40.0;
const LINE_SPACING: i32 = 20;
const TEXT_TOP: i32 = 50;
const MARKER_BORDER: i32 = 3;

lazy_static! {
    static ref CAPTION_FONT: FontArc = load_caption_font();
}

fn load_caption_font() -> FontArc {
    for path in PREFERRED_FONT_PATHS {
        if let Ok(data) = std::fs::read(path) {
            if let Ok(font) = FontVec::try_from_vec(data) {
                tracing::debug!("using caption font from {}", path);
                return FontArc::from(font);
            }
        }
    }
    FontArc::try_from_slice(FALLBACK_FONT).expect("embedded fallback font is valid")
}

/// An in-memory RGB raster, composed once per generated file (or PDF page)
/// and discarded after encoding.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// Compose a fixture page: caption plus fixed descriptive lines, each
    /// centered horizontally, and the bottom marker rectangle.
    pub fn compose(caption: &str, width: u32, height: u32) -> Self {
        let mut image = RgbImage::from_pixel(width, height, BACKGROUND);
        let font = &*CAPTION_FONT;
        let scale = PxScale::from(FONT_SCALE);

        let lines = [
            caption.to_string(),
            String::new(),
            "Test Document".to_string(),
            "For Bulk Scanning E2E Tests".to_string(),
            format!("Size: {width}x{height}"),
        ];

        let mut y = TEXT_TOP;
        for line in &lines {
            if line.is_empty() {
                y += LINE_SPACING;
                continue;
            }
            let (text_width, text_height) = text_size(scale, font, line);
            let x = (width as i32 - text_width as i32) / 2;
            draw_text_mut(&mut image, TEXT_COLOR, x, y, scale, font, line);
            y += text_height as i32 + LINE_SPACING;
        }

        // Bottom marker: [100, h-200] to [w-100, h-50], 3px outline
        for inset in 0..MARKER_BORDER {
            let rect = Rect::at(100 + inset, height as i32 - 200 + inset).of_size(
                width - 200 - 2 * inset as u32,
                150 - 2 * inset as u32,
            );
            draw_hollow_rect_mut(&mut image, rect, MARKER_COLOR);
        }

        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }
}
