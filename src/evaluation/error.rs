use crate::annotations::bounding_box::BBox;
use std::fmt;
use thiserror::Error;

/// Which of the two paired input sequences ran out first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequence {
    GroundTruth,
    Prediction,
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sequence::GroundTruth => write!(f, "ground truth"),
            Sequence::Prediction => write!(f, "prediction"),
        }
    }
}

/// Everything that can go wrong while evaluating a dataset.
///
/// Structural problems in the input (shapes, lengths, labels) are always fatal: a partially
/// filled confusion matrix would produce misleading metrics, so no partial result is returned.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error(
        "mask shapes differ in sample {sample}: ground truth is {ground_truth:?}, \
        prediction is {prediction:?}"
    )]
    ShapeMismatch {
        sample: usize,
        ground_truth: (usize, usize),
        prediction: (usize, usize),
    },

    #[error("the {exhausted} sequence ended early, after {sample} samples")]
    LengthMismatch { sample: usize, exhausted: Sequence },

    #[error("label {label} is outside the valid range [0, {num_classes})")]
    InvalidLabel { label: usize, num_classes: usize },

    #[error("box {bbox} has zero width or height")]
    DegenerateGeometry { bbox: BBox },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("directory traversal error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EvaluationError>;
