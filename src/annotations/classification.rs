use serde::{Deserialize, Serialize};

/// A single classification record, as read from annotation files or produced by a classifier.
///
/// Ground-truth records only use `cls`. For predictions, a missing `score` means the classifier
/// made no prediction for the sample, which is different from predicting any class (including a
/// background class).
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct Classification {
    pub cls: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl Classification {
    pub fn new(cls: usize) -> Self {
        Classification { cls, score: None }
    }

    /// Scores are expected in [0, 1] but are taken as given. Only their presence matters here.
    pub fn with_score(cls: usize, score: f32) -> Self {
        Classification {
            cls,
            score: Some(score),
        }
    }
}

impl From<usize> for Classification {
    fn from(cls: usize) -> Self {
        Classification::new(cls)
    }
}

/// What a classifier said about one sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Prediction {
    Predicted { cls: usize, score: f32 },
    NoPrediction,
}

impl Prediction {
    /// The predicted class, or `None` when nothing was predicted.
    pub fn cls(&self) -> Option<usize> {
        match self {
            Prediction::Predicted { cls, .. } => Some(*cls),
            Prediction::NoPrediction => None,
        }
    }
}

impl From<Classification> for Prediction {
    fn from(classification: Classification) -> Self {
        match classification.score {
            Some(score) => Prediction::Predicted {
                cls: classification.cls,
                score,
            },
            None => Prediction::NoPrediction,
        }
    }
}

impl From<Option<Classification>> for Prediction {
    fn from(classification: Option<Classification>) -> Self {
        classification.map_or(Prediction::NoPrediction, Prediction::from)
    }
}
