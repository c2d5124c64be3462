//! # scanfix
//!
//! Synthetic fixture generation for bulk document scanning test suites.
//!
//! The crate produces a fixed catalog of files an end-to-end suite expects
//! to find: PDFs (single-page, multi-page, and one deliberately oversized),
//! raster images in every supported format, and one deliberately invalid
//! text file for negative-path testing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scanfix::fixtures;
//! use std::path::Path;
//!
//! # fn main() -> scanfix::Result<()> {
//! let generated = fixtures::generate_all(Path::new("documents"))?;
//! for file in &generated {
//!     println!("{} ({:.2} KB)", file.path.display(), file.size_kb);
//! }
//! # Ok(())
//! # }
//! ```

pub mod canvas;
pub mod encoder;
pub mod error;
pub mod fixtures;
pub mod pdf;

pub use canvas::Canvas;
pub use encoder::FixtureFormat;
pub use error::{FixtureError, Result};
pub use fixtures::{FixtureKind, FixtureSpec, GeneratedFixture, ManifestEntry};
pub use pdf::PdfDocument;
