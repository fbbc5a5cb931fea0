use crate::annotations::bounding_box::BBox;
use crate::annotations::classification::{Classification, Prediction};
use crate::annotations::mask::Mask;
use crate::evaluation::confusion_matrix::{
    ConfusionMatrixBuilder, NoMatchClass, pixel_comparisons, scalar_comparison,
};
use crate::evaluation::detection_matching::{MatchingConfig, match_detections};
use crate::evaluation::error::{EvaluationError, Result, Sequence};
use crate::evaluation::metrics::{Metrics, Task};
use itertools::{EitherOrBoth, Itertools};
use std::borrow::Borrow;

/// Pairs up two sequences sample by sample and fails as soon as one of them runs out first.
///
/// Items are yielded together with their sample index. Nothing is buffered, so only one sample
/// pair is alive at a time.
fn lockstep<G, P>(
    ground_truth: G,
    predictions: P,
) -> impl Iterator<Item = Result<(usize, G::Item, P::Item)>>
where
    G: IntoIterator,
    P: IntoIterator,
{
    ground_truth
        .into_iter()
        .zip_longest(predictions)
        .enumerate()
        .map(|(sample, pair)| match pair {
            EitherOrBoth::Both(gt, pred) => Ok((sample, gt, pred)),
            EitherOrBoth::Left(_) => Err(EvaluationError::LengthMismatch {
                sample,
                exhausted: Sequence::Prediction,
            }),
            EitherOrBoth::Right(_) => Err(EvaluationError::LengthMismatch {
                sample,
                exhausted: Sequence::GroundTruth,
            }),
        })
}

fn owned_names<S: AsRef<str>>(class_names: &[S]) -> Vec<String> {
    class_names
        .iter()
        .map(|name| name.as_ref().to_string())
        .collect()
}

/// Evaluates a semantic segmentation model pixel by pixel.
///
/// Both sequences yield one label mask per image. Label 0 is the background: it is counted in the
/// matrix and gets its own `ClassMetrics`, but is left out of the macro and weighted averages.
pub fn evaluate_segmentation<G, P, S>(
    ground_truth: G,
    predictions: P,
    class_names: &[S],
) -> Result<Metrics>
where
    G: IntoIterator,
    G::Item: Borrow<Mask>,
    P: IntoIterator,
    P::Item: Borrow<Mask>,
    S: AsRef<str>,
{
    let mut builder = ConfusionMatrixBuilder::new(class_names.len(), NoMatchClass::OnDemand);
    let mut samples = 0;
    for pair in lockstep(ground_truth, predictions) {
        let (sample, gt, pred) = pair?;
        let (gt, pred): (&Mask, &Mask) = (gt.borrow(), pred.borrow());
        builder.extend(pixel_comparisons(sample, gt, pred)?)?;
        samples += 1;
    }
    let metrics = Metrics::new(
        Task::Segmentation,
        owned_names(class_names),
        builder.finalize(),
    );
    log::info!(
        "evaluated segmentation of {} masks ({} pixels)",
        samples,
        metrics.confusion_matrix().total()
    );
    Ok(metrics)
}

/// Evaluates a classifier, one label per sample.
///
/// Predictions without a score count as "no prediction" and land in the extra "none" column,
/// which only exists when at least one such sample was seen.
pub fn evaluate_classification<G, P, S>(
    ground_truth: G,
    predictions: P,
    class_names: &[S],
) -> Result<Metrics>
where
    G: IntoIterator,
    G::Item: Into<Classification>,
    P: IntoIterator,
    P::Item: Into<Prediction>,
    S: AsRef<str>,
{
    let mut builder = ConfusionMatrixBuilder::new(class_names.len(), NoMatchClass::OnDemand);
    let mut samples = 0;
    for pair in lockstep(ground_truth, predictions) {
        let (_, gt, pred) = pair?;
        let gt: Classification = gt.into();
        builder.update(scalar_comparison(gt.cls, pred.into()))?;
        samples += 1;
    }
    let metrics = Metrics::new(
        Task::Classification,
        owned_names(class_names),
        builder.finalize(),
    );
    log::info!("evaluated classification of {} samples", samples);
    Ok(metrics)
}

/// Evaluates an object detector.
///
/// Each sequence yields the boxes of one image. The boxes of every image are matched on their
/// own (see `match_detections`); the matrix always has a "none" row and column for missed and
/// spurious boxes.
pub fn evaluate_detection<G, P, S>(
    ground_truth: G,
    predictions: P,
    class_names: &[S],
    config: &MatchingConfig,
) -> Result<Metrics>
where
    G: IntoIterator,
    G::Item: AsRef<[BBox]>,
    P: IntoIterator,
    P::Item: AsRef<[BBox]>,
    S: AsRef<str>,
{
    let mut builder = ConfusionMatrixBuilder::new(class_names.len(), NoMatchClass::Always);
    let mut samples = 0;
    for pair in lockstep(ground_truth, predictions) {
        let (sample, gt, pred) = pair?;
        let (gt, pred) = (gt.as_ref(), pred.as_ref());
        let matches = match_detections(gt, pred, config)?;
        log::debug!(
            "sample {}: {} matched, {} missed, {} spurious",
            sample,
            matches.matched.len(),
            matches.unmatched_ground_truth.len(),
            matches.unmatched_predictions.len()
        );
        builder.extend(matches.comparisons())?;
        samples += 1;
    }
    let metrics = Metrics::new(
        Task::Detection,
        owned_names(class_names),
        builder.finalize(),
    );
    log::info!(
        "evaluated detection of {} images ({} box comparisons, IoU threshold {})",
        samples,
        metrics.confusion_matrix().total(),
        config.iou_threshold
    );
    Ok(metrics)
}
