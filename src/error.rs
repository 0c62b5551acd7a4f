//! Error types for transformer operations.

use thiserror::Error;

/// Boxed error produced by caller-supplied collaborators (XSLT engines,
/// preprocess hooks).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while transforming an XForm.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Parse(String),

    #[error("Structural transform failed: {0}")]
    StructuralTransform(#[source] BoxError),

    #[error("Model is missing")]
    MissingModel,

    /// The caller's preprocess hook failed. Displayed exactly as the hook's own error.
    #[error(transparent)]
    Preprocess(BoxError),

    #[error("Invalid selector `{selector}`: {message}")]
    Selector { selector: String, message: String },
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
