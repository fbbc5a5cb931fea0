use crate::annotations::classification::Prediction;
use crate::annotations::mask::{Mask, check_same_shape};
use crate::evaluation::error::{EvaluationError, Result};
use ndarray::{Array2, ArrayView2, s};
use serde::Serialize;

/// One (ground truth, prediction) label comparison.
///
/// `None` on either side stands for the virtual "none" class: a ground-truth object that was
/// never predicted, or a prediction with nothing behind it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Comparison {
    pub ground_truth: Option<usize>,
    pub prediction: Option<usize>,
}

impl Comparison {
    pub fn new(ground_truth: Option<usize>, prediction: Option<usize>) -> Self {
        Comparison {
            ground_truth,
            prediction,
        }
    }
}

/// Whether the matrix carries an extra row and column for the virtual "none" class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoMatchClass {
    /// Only when at least one comparison involved "none".
    OnDemand,
    /// Always, even if every comparison was between real classes.
    Always,
}

/// Accumulates label comparisons into a confusion matrix.
///
/// Every ingestion mode (pixels, scalar labels, matched boxes) produces `Comparison`s and feeds
/// them through `update()`, so all tasks share the same counting and validation.
pub struct ConfusionMatrixBuilder {
    num_classes: usize,
    no_match_class: NoMatchClass,
    no_match_seen: bool,
    //                       ground truth   prediction
    //                            |             |
    //                            v             v
    // The last row and column belong to "none".
    matrix: Array2<u64>,
}

impl ConfusionMatrixBuilder {
    pub fn new(num_classes: usize, no_match_class: NoMatchClass) -> Self {
        let matrix = Array2::zeros((num_classes + 1, num_classes + 1));
        ConfusionMatrixBuilder {
            num_classes,
            no_match_class,
            no_match_seen: false,
            matrix,
        }
    }

    fn index(&mut self, label: Option<usize>) -> Result<usize> {
        match label {
            Some(label) if label < self.num_classes => Ok(label),
            Some(label) => Err(EvaluationError::InvalidLabel {
                label,
                num_classes: self.num_classes,
            }),
            None => {
                self.no_match_seen = true;
                Ok(self.num_classes)
            }
        }
    }

    /// Counts a single comparison. Fails with `InvalidLabel` if either label is out of range.
    pub fn update(&mut self, comparison: Comparison) -> Result<()> {
        let row = self.index(comparison.ground_truth)?;
        let column = self.index(comparison.prediction)?;
        self.matrix[(row, column)] += 1;
        Ok(())
    }

    pub fn extend<I>(&mut self, comparisons: I) -> Result<()>
    where
        I: IntoIterator<Item = Comparison>,
    {
        comparisons
            .into_iter()
            .try_for_each(|comparison| self.update(comparison))
    }

    pub fn finalize(self) -> ConfusionMatrix {
        let keep_no_match = match self.no_match_class {
            NoMatchClass::Always => true,
            NoMatchClass::OnDemand => self.no_match_seen,
        };
        if keep_no_match {
            ConfusionMatrix {
                matrix: self.matrix,
                num_classes: self.num_classes,
                no_match_index: Some(self.num_classes),
            }
        } else {
            let n = self.num_classes;
            ConfusionMatrix {
                matrix: self.matrix.slice(s![..n, ..n]).to_owned(),
                num_classes: self.num_classes,
                no_match_index: None,
            }
        }
    }
}

/// A finished, read-only confusion matrix. Rows are ground truth, columns are predictions.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConfusionMatrix {
    matrix: Array2<u64>,
    num_classes: usize,
    no_match_index: Option<usize>,
}

impl ConfusionMatrix {
    /// The number of real classes, not counting "none".
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Row and column of the virtual "none" class, when the matrix has one.
    pub fn no_match_index(&self) -> Option<usize> {
        self.no_match_index
    }

    pub fn get(&self, ground_truth: usize, prediction: usize) -> u64 {
        self.matrix[(ground_truth, prediction)]
    }

    pub fn view(&self) -> ArrayView2<'_, u64> {
        self.matrix.view()
    }

    /// The number of comparisons counted.
    pub fn total(&self) -> u64 {
        self.matrix.sum()
    }

    /// The number of comparisons where prediction and ground truth agreed.
    pub fn trace(&self) -> u64 {
        self.matrix.diag().sum()
    }

    pub fn row_sum(&self, ground_truth: usize) -> u64 {
        self.matrix.row(ground_truth).sum()
    }

    pub fn column_sum(&self, prediction: usize) -> u64 {
        self.matrix.column(prediction).sum()
    }
}

/// Pixel mode: one comparison per grid position of a mask pair.
pub fn pixel_comparisons<'a>(
    sample: usize,
    ground_truth: &'a Mask,
    prediction: &'a Mask,
) -> Result<impl Iterator<Item = Comparison> + 'a> {
    check_same_shape(sample, ground_truth, prediction)?;
    Ok(ground_truth
        .iter()
        .zip(prediction.iter())
        .map(|(&gt, &pred)| Comparison::new(Some(gt), Some(pred))))
}

/// Scalar mode: one comparison per classification sample.
pub fn scalar_comparison(ground_truth: usize, prediction: Prediction) -> Comparison {
    Comparison::new(Some(ground_truth), prediction.cls())
}
