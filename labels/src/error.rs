use thiserror::Error;

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("image: {0}")]
    Image(#[from] image::ImageError),

    #[error(
        "entry {index} ({filename}): field `{field}` has {found} value(s), `label` has {expected}"
    )]
    FieldLengthMismatch {
        index: usize,
        filename: String,
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("entry {index}: file name is not valid UTF-16")]
    InvalidName { index: usize },

    #[error("symbol {0:?} is not part of the alphabet")]
    UnknownSymbol(char),

    #[error("annotation store: {0}")]
    Store(String),
}
