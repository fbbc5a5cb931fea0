use crate::annotations::bounding_box::BBox;
use crate::evaluation::error::{EvaluationError, Result};
use ndarray::{Array2, s};

/// A segmentation mask: one class label per pixel, indexed `[row, column]`.
pub type Mask = Array2<usize>;

/// Fails with `ShapeMismatch` unless both masks have the same number of rows and columns.
///
/// `sample` is only used to report where the mismatch happened.
pub fn check_same_shape(sample: usize, ground_truth: &Mask, prediction: &Mask) -> Result<()> {
    if ground_truth.dim() != prediction.dim() {
        return Err(EvaluationError::ShapeMismatch {
            sample,
            ground_truth: ground_truth.dim(),
            prediction: prediction.dim(),
        });
    }
    Ok(())
}

/// Builds a mask of the given `(rows, columns)` shape filled with background (label 0), then
/// paints every box with its class.
///
/// Boxes are clipped to the mask. Where boxes overlap, the later one wins.
pub fn draw_boxes(shape: (usize, usize), boxes: &[BBox]) -> Mask {
    let mut mask = Mask::zeros(shape);
    let (rows, columns) = shape;
    for bbox in boxes {
        let upper_left = bbox.upper_left_point();
        let bottom_right = bbox.bottom_right_point();
        let top = (upper_left.y as usize).min(rows);
        let bottom = (bottom_right.y as usize).min(rows);
        let left = (upper_left.x as usize).min(columns);
        let right = (bottom_right.x as usize).min(columns);
        mask.slice_mut(s![top..bottom, left..right]).fill(bbox.cls());
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_shape_passes() {
        let a = Mask::zeros((4, 6));
        let b = Mask::from_elem((4, 6), 2);
        assert!(check_same_shape(0, &a, &b).is_ok());
    }

    #[test]
    fn transposed_shape_fails() {
        let a = Mask::zeros((4, 6));
        let b = Mask::zeros((6, 4));
        match check_same_shape(3, &a, &b) {
            Err(EvaluationError::ShapeMismatch {
                sample,
                ground_truth,
                prediction,
            }) => {
                assert_eq!(sample, 3);
                assert_eq!(ground_truth, (4, 6));
                assert_eq!(prediction, (6, 4));
            }
            other => panic!("expected ShapeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn draw_boxes_fills_and_clips() {
        let mask = draw_boxes(
            (4, 5),
            &[BBox::new(1, 1, 2, 2, 1), BBox::new(3, 2, 10, 10, 2)],
        );
        let expected: Mask = ndarray::arr2(&[
            [0, 0, 0, 0, 0],
            [0, 1, 1, 0, 0],
            [0, 1, 1, 2, 2],
            [0, 0, 0, 2, 2],
        ]);
        assert_eq!(mask, expected);
    }

    #[test]
    fn later_boxes_overwrite_earlier_ones() {
        let mask = draw_boxes((2, 2), &[BBox::new(0, 0, 2, 2, 1), BBox::new(1, 1, 1, 1, 2)]);
        let expected: Mask = ndarray::arr2(&[[1, 1], [1, 2]]);
        assert_eq!(mask, expected);
    }

    #[test]
    fn boxes_outside_the_mask_are_ignored() {
        let mask = draw_boxes((3, 3), &[BBox::new(10, 10, 2, 2, 1)]);
        assert_eq!(mask.sum(), 0);
    }
}
