use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Encoding(#[from] image::ImageError),

    #[error("PDF document has no pages")]
    EmptyPdf,
}

pub type Result<T> = std::result::Result<T, FixtureError>;
