use crate::evaluation::confusion_matrix::ConfusionMatrix;
use serde::Serialize;

/// Display name of the virtual "none" row and column of a confusion matrix.
pub const NO_MATCH_NAME: &str = "background";

/// The kind of task a set of metrics was computed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Task {
    Segmentation,
    Classification,
    Detection,
}

impl Task {
    /// Whether a class takes part in the dataset-level averages. Label 0 of a segmentation is
    /// the background: it keeps its own metrics but is not averaged.
    fn is_averaged(self, cls: usize) -> bool {
        !(self == Task::Segmentation && cls == 0)
    }
}

/// Metrics for a single class, computed one-vs-rest from the full confusion matrix.
///
/// Every ratio whose denominator is zero is reported as 0 rather than NaN. A precision of 0 can
/// therefore also mean "this class was never predicted", so check the counts before reading too
/// much into it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassMetrics {
    cls: usize,
    name: String,
    true_positives: u64,
    false_positives: u64,
    false_negatives: u64,
    true_negatives: u64,
    accuracy: f64,
    precision: f64,
    recall: f64,
    f_score: f64,
    iou: f64,
    specificity: f64,
    false_positive_rate: f64,
}

impl ClassMetrics {
    fn compute(confusion_matrix: &ConfusionMatrix, cls: usize, name: String) -> Self {
        let total = confusion_matrix.total();
        let true_positives = confusion_matrix.get(cls, cls);
        let false_positives = confusion_matrix.column_sum(cls) - true_positives;
        let false_negatives = confusion_matrix.row_sum(cls) - true_positives;
        let true_negatives = total - true_positives - false_positives - false_negatives;
        let precision = ratio(true_positives, true_positives + false_positives);
        let recall = ratio(true_positives, true_positives + false_negatives);
        let f_score = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };
        ClassMetrics {
            cls,
            name,
            true_positives,
            false_positives,
            false_negatives,
            true_negatives,
            accuracy: ratio(true_positives + true_negatives, total),
            precision,
            recall,
            f_score,
            iou: ratio(
                true_positives,
                true_positives + false_positives + false_negatives,
            ),
            specificity: ratio(true_negatives, true_negatives + false_positives),
            false_positive_rate: ratio(false_positives, false_positives + true_negatives),
        }
    }

    pub fn cls(&self) -> usize {
        self.cls
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn true_positives(&self) -> u64 {
        self.true_positives
    }

    pub fn false_positives(&self) -> u64 {
        self.false_positives
    }

    pub fn false_negatives(&self) -> u64 {
        self.false_negatives
    }

    pub fn true_negatives(&self) -> u64 {
        self.true_negatives
    }

    /// How many ground-truth comparisons belong to this class.
    pub fn support(&self) -> u64 {
        self.true_positives + self.false_negatives
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn precision(&self) -> f64 {
        self.precision
    }

    pub fn recall(&self) -> f64 {
        self.recall
    }

    pub fn f_score(&self) -> f64 {
        self.f_score
    }

    pub fn iou(&self) -> f64 {
        self.iou
    }

    pub fn specificity(&self) -> f64 {
        self.specificity
    }

    pub fn false_positive_rate(&self) -> f64 {
        self.false_positive_rate
    }

    /// The one-vs-rest matrix for this class, `[[TP, FN], [FP, TN]]`.
    pub fn binary_confusion_matrix(&self) -> [[u64; 2]; 2] {
        [
            [self.true_positives, self.false_negatives],
            [self.false_positives, self.true_negatives],
        ]
    }

    fn summary(&self) -> MetricSummary {
        MetricSummary {
            precision: self.precision,
            recall: self.recall,
            f_score: self.f_score,
            iou: self.iou,
            specificity: self.specificity,
            false_positive_rate: self.false_positive_rate,
        }
    }
}

/// Dataset-level averages of the per-class ratios.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct MetricSummary {
    pub precision: f64,
    pub recall: f64,
    pub f_score: f64,
    pub iou: f64,
    pub specificity: f64,
    pub false_positive_rate: f64,
}

impl MetricSummary {
    fn weighted_mean(summaries: impl Iterator<Item = (MetricSummary, f64)>) -> Self {
        let mut total_weight = 0.0;
        let mut sum = MetricSummary::default();
        for (summary, weight) in summaries {
            total_weight += weight;
            sum.precision += summary.precision * weight;
            sum.recall += summary.recall * weight;
            sum.f_score += summary.f_score * weight;
            sum.iou += summary.iou * weight;
            sum.specificity += summary.specificity * weight;
            sum.false_positive_rate += summary.false_positive_rate * weight;
        }
        if total_weight == 0.0 {
            return MetricSummary::default();
        }
        MetricSummary {
            precision: sum.precision / total_weight,
            recall: sum.recall / total_weight,
            f_score: sum.f_score / total_weight,
            iou: sum.iou / total_weight,
            specificity: sum.specificity / total_weight,
            false_positive_rate: sum.false_positive_rate / total_weight,
        }
    }
}

/// The result of one evaluation call.
///
/// `by_class` follows the order of the class names. The virtual "none" class, when present, is
/// kept in the confusion matrix but has no `ClassMetrics` and is left out of both averages. The
/// background of a segmentation (label 0) has `ClassMetrics` but is left out of the averages too.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Metrics {
    task: Task,
    class_names: Vec<String>,
    confusion_matrix: ConfusionMatrix,
    by_class: Vec<ClassMetrics>,
    accuracy: f64,
    macro_average: MetricSummary,
    weighted_average: MetricSummary,
}

impl Metrics {
    pub(crate) fn new(
        task: Task,
        class_names: Vec<String>,
        confusion_matrix: ConfusionMatrix,
    ) -> Self {
        let by_class: Vec<ClassMetrics> = class_names
            .iter()
            .enumerate()
            .map(|(cls, name)| ClassMetrics::compute(&confusion_matrix, cls, name.clone()))
            .collect();
        let accuracy = ratio(confusion_matrix.trace(), confusion_matrix.total());
        let averaged = || by_class.iter().filter(move |class| task.is_averaged(class.cls));
        let macro_average =
            MetricSummary::weighted_mean(averaged().map(|class| (class.summary(), 1.0)));
        let weighted_average = MetricSummary::weighted_mean(
            averaged().map(|class| (class.summary(), class.support() as f64)),
        );
        Metrics {
            task,
            class_names,
            confusion_matrix,
            by_class,
            accuracy,
            macro_average,
            weighted_average,
        }
    }

    pub fn task(&self) -> Task {
        self.task
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    /// Names of every row and column of the confusion matrix, including "none" when present.
    pub fn matrix_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.class_names.iter().map(String::as_str).collect();
        if self.confusion_matrix.no_match_index().is_some() {
            labels.push(NO_MATCH_NAME);
        }
        labels
    }

    pub fn confusion_matrix(&self) -> &ConfusionMatrix {
        &self.confusion_matrix
    }

    pub fn by_class(&self) -> &[ClassMetrics] {
        &self.by_class
    }

    pub fn class(&self, name: &str) -> Option<&ClassMetrics> {
        self.by_class.iter().find(|class| class.name == name)
    }

    /// The share of all comparisons that landed on the diagonal.
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Unweighted mean over the averaged classes.
    pub fn macro_average(&self) -> &MetricSummary {
        &self.macro_average
    }

    /// Mean over the classes weighted by their support.
    pub fn weighted_average(&self) -> &MetricSummary {
        &self.weighted_average
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0.
fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
