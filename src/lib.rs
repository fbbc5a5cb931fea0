//! Evaluation metrics for semantic segmentation, classification and object detection models.
//!
//! Ground truth and predictions are streamed in as two iterators of equal length. Every task
//! turns its samples into (ground truth, prediction) label comparisons, counts them in a
//! [`ConfusionMatrix`], and derives per-class and averaged [`Metrics`] from it.
//!
//! ```
//! use model_evaluation::{BBox, MatchingConfig, evaluate_detection};
//!
//! let ground_truth = vec![vec![BBox::new(10, 10, 10, 10, 0)]];
//! let predictions = vec![vec![BBox::new(10, 10, 10, 10, 0).with_score(0.9)]];
//! let metrics = evaluate_detection(
//!     ground_truth,
//!     predictions,
//!     &["kite"],
//!     &MatchingConfig::default(),
//! )
//! .unwrap();
//! assert_eq!(metrics.by_class()[0].true_positives(), 1);
//! ```

pub mod annotations;
pub mod config;
pub mod evaluation;
pub mod image_utils;

pub use annotations::bounding_box::BBox;
pub use annotations::classification::{Classification, Prediction};
pub use annotations::mask::Mask;
pub use config::EvaluationJob;
pub use evaluation::confusion_matrix::ConfusionMatrix;
pub use evaluation::detection_matching::MatchingConfig;
pub use evaluation::error::{EvaluationError, Result};
pub use evaluation::evaluate::{
    evaluate_classification, evaluate_detection, evaluate_segmentation,
};
pub use evaluation::metrics::{ClassMetrics, MetricSummary, Metrics, Task};
