use crate::annotations::bounding_box::BBox;
use crate::annotations::classification::Classification;
use crate::evaluation::detection_matching::MatchingConfig;
use crate::evaluation::error::{EvaluationError, Result};
use crate::evaluation::evaluate::{
    evaluate_classification, evaluate_detection, evaluate_segmentation,
};
use crate::evaluation::metrics::Metrics;
use crate::image_utils::image_io::read_masks;
use itertools::process_results;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// One evaluation run, as described in a JSON job file.
///
/// ```json
/// { "task": "detection", "class_names": ["kite", "person"],
///   "ground_truth": "gt.json", "predictions": "pred.json",
///   "matching": { "iou_threshold": 0.5 } }
/// ```
///
/// Relative paths are resolved against the directory of the job file.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "task", rename_all = "lowercase")]
pub enum EvaluationJob {
    /// `ground_truth` and `predictions` are directories of label PNGs.
    Segmentation {
        class_names: Vec<String>,
        ground_truth: PathBuf,
        predictions: PathBuf,
    },
    /// `ground_truth` and `predictions` are JSON arrays of `{ "cls": .., "score": .. }`.
    Classification {
        class_names: Vec<String>,
        ground_truth: PathBuf,
        predictions: PathBuf,
    },
    /// `ground_truth` and `predictions` are JSON arrays holding the boxes of each image.
    Detection {
        class_names: Vec<String>,
        ground_truth: PathBuf,
        predictions: PathBuf,
        #[serde(default)]
        matching: MatchingConfig,
    },
}

impl EvaluationJob {
    pub fn from_path(filepath: &Path) -> Result<Self> {
        let job: EvaluationJob = serde_json::from_reader(BufReader::new(File::open(filepath)?))?;
        let base = filepath.parent().unwrap_or_else(|| Path::new(""));
        Ok(job.relative_to(base))
    }

    fn relative_to(self, base: &Path) -> Self {
        match self {
            EvaluationJob::Segmentation {
                class_names,
                ground_truth,
                predictions,
            } => EvaluationJob::Segmentation {
                class_names,
                ground_truth: base.join(ground_truth),
                predictions: base.join(predictions),
            },
            EvaluationJob::Classification {
                class_names,
                ground_truth,
                predictions,
            } => EvaluationJob::Classification {
                class_names,
                ground_truth: base.join(ground_truth),
                predictions: base.join(predictions),
            },
            EvaluationJob::Detection {
                class_names,
                ground_truth,
                predictions,
                matching,
            } => EvaluationJob::Detection {
                class_names,
                ground_truth: base.join(ground_truth),
                predictions: base.join(predictions),
                matching,
            },
        }
    }

    pub fn run(&self) -> Result<Metrics> {
        match self {
            EvaluationJob::Segmentation {
                class_names,
                ground_truth,
                predictions,
            } => {
                log::info!(
                    "evaluating segmentation masks in {} against {}",
                    predictions.display(),
                    ground_truth.display()
                );
                process_results(read_masks(ground_truth), |gt_masks| {
                    process_results(read_masks(predictions), |pred_masks| {
                        evaluate_segmentation(gt_masks, pred_masks, class_names)
                    })
                })??
            }
            EvaluationJob::Classification {
                class_names,
                ground_truth,
                predictions,
            } => {
                let gt: Vec<Classification> = read_json(ground_truth)?;
                let pred: Vec<Classification> = read_json(predictions)?;
                evaluate_classification(gt, pred, class_names)
            }
            EvaluationJob::Detection {
                class_names,
                ground_truth,
                predictions,
                matching,
            } => {
                let gt: Vec<Vec<BBox>> = read_json(ground_truth)?;
                let pred: Vec<Vec<BBox>> = read_json(predictions)?;
                evaluate_detection(gt, pred, class_names, matching)
            }
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(filepath: &Path) -> Result<T> {
    let reader = BufReader::new(File::open(filepath)?);
    serde_json::from_reader(reader).map_err(EvaluationError::from)
}
