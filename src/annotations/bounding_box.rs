use crate::annotations::point::Point;
use crate::evaluation::error::{EvaluationError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A struct representing a bounding box.
///
/// A bounding box is a rectangle used to annotate objects in images. It is composed of a
/// rectangle and a class label denoting what object it is. Boxes produced by a detector may also
/// carry a confidence score; the score travels with the box but plays no part in matching.
///
/// Coordinates are integer pixels with the usual convention of the left side of the image being
/// x=0 and the top of the image being y=0. A box covers the pixels `x..x + width` and
/// `y..y + height`.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct BBox {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    cls: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    score: Option<f32>,
}

impl BBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32, cls: usize) -> Self {
        BBox {
            x,
            y,
            width,
            height,
            cls,
            score: None,
        }
    }

    /// Attaches a detector confidence. Values outside [0, 1] are accepted as is.
    pub fn with_score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cls(&self) -> usize {
        self.cls
    }

    pub fn score(&self) -> Option<f32> {
        self.score
    }

    pub fn upper_left_point(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    /// The corner one past the last covered pixel in both directions, clamped to `u32::MAX`.
    pub fn bottom_right_point(&self) -> Point {
        Point {
            x: self.x.saturating_add(self.width),
            y: self.y.saturating_add(self.height),
        }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// A box with zero width or height covers no pixels.
    pub fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Left, top, right and bottom edges, widened so that `x + width` cannot overflow.
    fn edges(&self) -> (u64, u64, u64, u64) {
        let (x, y) = (u64::from(self.x), u64::from(self.y));
        (x, y, x + u64::from(self.width), y + u64::from(self.height))
    }

    /// Overlap area between two boxes, 0 when they are disjoint.
    pub fn intersection_area(&self, other: &BBox) -> u64 {
        let (self_left, self_top, self_right, self_bottom) = self.edges();
        let (other_left, other_top, other_right, other_bottom) = other.edges();
        let (left, top) = (self_left.max(other_left), self_top.max(other_top));
        let (right, bottom) = (self_right.min(other_right), self_bottom.min(other_bottom));
        if right <= left || bottom <= top {
            return 0;
        }
        (right - left) * (bottom - top)
    }

    pub fn union_area(&self, other: &BBox) -> u64 {
        self.area() + other.area() - self.intersection_area(other)
    }

    /// Intersection over union of two boxes, defined as 0 when the union is empty.
    pub fn intersection_over_union(&self, other: &BBox) -> f64 {
        let union = self.union_area(other);
        if union == 0 {
            return 0.0;
        }
        self.intersection_area(other) as f64 / union as f64
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BBox {{ x: {}, y: {}, width: {}, height: {}, cls: {} }}",
            self.x, self.y, self.width, self.height, self.cls
        )
    }
}

/// IoU of two boxes that rejects degenerate boxes when `strict` is set.
///
/// Outside strict mode a degenerate box simply has area 0, so its IoU with anything is 0.
pub fn iou_checked(a: &BBox, b: &BBox, strict: bool) -> Result<f64> {
    if strict {
        if let Some(bbox) = [a, b].into_iter().find(|bbox| bbox.is_degenerate()) {
            return Err(EvaluationError::DegenerateGeometry { bbox: *bbox });
        }
    }
    Ok(a.intersection_over_union(b))
}
