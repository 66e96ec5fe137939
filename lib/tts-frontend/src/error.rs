use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FrontendError>;

#[derive(Error, Debug)]
pub enum FrontendError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Shape mismatch in {context}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        context: &'static str,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Romanization service failed: {0}")]
    ExternalService(#[from] jyutping_client::Error),

    #[error("Romanization service is not configured for Cantonese mode")]
    RomanizerMissing,

    #[error("Word {0:?} has no usable pronunciation")]
    UnusableWord(String),

    #[error("Failed to load {what} from {path:?}: {reason}")]
    ResourceLoad {
        what: &'static str,
        path: PathBuf,
        reason: String,
    },

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

impl FrontendError {
    pub fn shape_mismatch(context: &'static str, expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            context,
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Only external-service hiccups are worth retrying, everything else will fail
    /// the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ExternalService(e) if e.is_retryable())
    }
}
