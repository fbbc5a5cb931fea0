pub mod confusion_matrix;
pub mod detection_matching;
pub mod error;
pub mod evaluate;
pub mod metrics;
