pub mod bounding_box;
pub mod classification;
pub mod mask;
pub mod point;
