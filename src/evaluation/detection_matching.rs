use crate::annotations::bounding_box::{BBox, iou_checked};
use crate::evaluation::confusion_matrix::Comparison;
use crate::evaluation::error::{EvaluationError, Result};
use itertools::{Itertools, iproduct};
use serde::{Deserialize, Serialize};

pub const DEFAULT_IOU_THRESHOLD: f64 = 0.5;

/// Settings for matching predicted boxes to ground-truth boxes.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// A pair only matches when its IoU is strictly greater than this.
    pub iou_threshold: f64,
    /// Fail on boxes with zero width or height instead of treating them as empty.
    pub strict_geometry: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        MatchingConfig {
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            strict_geometry: false,
        }
    }
}

/// A ground-truth box and a predicted box of the same class that were paired up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Index into the sample's ground-truth boxes.
    pub ground_truth: usize,
    /// Index into the sample's predicted boxes.
    pub prediction: usize,
    pub cls: usize,
    pub iou: f64,
}

/// The outcome of matching one sample. Indices refer to the input slices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleMatches {
    pub matched: Vec<Match>,
    /// Ground-truth boxes nothing was matched to (false negatives).
    pub unmatched_ground_truth: Vec<usize>,
    /// Predicted boxes nothing was matched to (false positives).
    pub unmatched_predictions: Vec<usize>,
    ground_truth_classes: Vec<usize>,
    prediction_classes: Vec<usize>,
}

impl SampleMatches {
    /// Match mode: one comparison per matched pair, then one per unmatched ground-truth box
    /// and one per unmatched prediction.
    pub fn comparisons(&self) -> impl Iterator<Item = Comparison> + '_ {
        let matched = self
            .matched
            .iter()
            .map(|m| Comparison::new(Some(m.cls), Some(m.cls)));
        let (gt_classes, pred_classes) = (&self.ground_truth_classes, &self.prediction_classes);
        let missed = self
            .unmatched_ground_truth
            .iter()
            .map(move |&index| Comparison::new(Some(gt_classes[index]), None));
        let spurious = self
            .unmatched_predictions
            .iter()
            .map(move |&index| Comparison::new(None, Some(pred_classes[index])));
        matched.chain(missed).chain(spurious)
    }
}

/// Greedily matches the predicted boxes of one sample to its ground-truth boxes.
///
/// Only boxes of the same class are ever paired. Within a class, the candidate pair with the
/// highest IoU is accepted first, both boxes are removed, and the process repeats until no
/// remaining pair has an IoU above the threshold. On equal IoU, the pair that comes first in input
/// order (ground-truth index, then prediction index) wins.
///
/// This is not an optimal assignment: a box taken by an earlier, better pair is never given
/// back, even if that would allow more matches overall.
pub fn match_detections(
    ground_truth: &[BBox],
    predictions: &[BBox],
    config: &MatchingConfig,
) -> Result<SampleMatches> {
    let mut gt_taken = vec![false; ground_truth.len()];
    let mut pred_taken = vec![false; predictions.len()];
    let mut matched = Vec::new();

    let classes = ground_truth.iter().map(BBox::cls).unique().sorted();
    for cls in classes {
        let gt_of_class = indices_of_class(ground_truth, cls);
        let pred_of_class = indices_of_class(predictions, cls);
        let mut candidates = Vec::new();
        for (&gt, &pred) in iproduct!(gt_of_class.iter(), pred_of_class.iter()) {
            let iou = iou_checked(&ground_truth[gt], &predictions[pred], config.strict_geometry)?;
            if iou > config.iou_threshold {
                candidates.push(Match {
                    ground_truth: gt,
                    prediction: pred,
                    cls,
                    iou,
                });
            }
        }
        // Stable sort: equal IoUs keep their input order.
        candidates.sort_by(|a, b| b.iou.total_cmp(&a.iou));
        for candidate in candidates {
            if gt_taken[candidate.ground_truth] || pred_taken[candidate.prediction] {
                continue;
            }
            gt_taken[candidate.ground_truth] = true;
            pred_taken[candidate.prediction] = true;
            matched.push(candidate);
        }
    }

    // Degenerate boxes with no same-class partner never went through iou_checked.
    if let Some(bbox) = ground_truth
        .iter()
        .chain(predictions.iter())
        .find(|bbox| bbox.is_degenerate())
    {
        if config.strict_geometry {
            return Err(EvaluationError::DegenerateGeometry { bbox: *bbox });
        }
        log::warn!("treating degenerate box {} as empty", bbox);
    }

    Ok(SampleMatches {
        matched,
        unmatched_ground_truth: untaken(&gt_taken),
        unmatched_predictions: untaken(&pred_taken),
        ground_truth_classes: ground_truth.iter().map(BBox::cls).collect(),
        prediction_classes: predictions.iter().map(BBox::cls).collect(),
    })
}

fn indices_of_class(boxes: &[BBox], cls: usize) -> Vec<usize> {
    boxes
        .iter()
        .positions(|bbox| bbox.cls() == cls)
        .collect()
}

fn untaken(taken: &[bool]) -> Vec<usize> {
    taken.iter().positions(|&taken| !taken).collect()
}
