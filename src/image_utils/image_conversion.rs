use crate::annotations::mask::Mask;
use crate::evaluation::error::{EvaluationError, Result};
use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use ndarray::Array2;

/// Converts a single-channel label image into a mask. Pixel values are taken as class labels.
///
/// 8 and 16 bit grayscale images are read as is. Anything else is converted to 8 bit grayscale
/// first, which only makes sense for label images that were saved in a color format by mistake.
pub fn convert_label_image_to_mask(label_image: DynamicImage) -> Mask {
    match label_image {
        DynamicImage::ImageLuma16(image) => convert_luma_buffer_to_mask(&image),
        DynamicImage::ImageLuma8(image) => convert_luma_buffer_to_mask(&image),
        other => convert_luma_buffer_to_mask(&other.into_luma8()),
    }
}

fn convert_luma_buffer_to_mask<P>(image: &ImageBuffer<Luma<P>, Vec<P>>) -> Mask
where
    P: image::Primitive + Into<u32>,
    Luma<P>: image::Pixel<Subpixel = P>,
{
    let rows = image.height() as usize;
    let columns = image.width() as usize;
    let mut mask = Array2::zeros((rows, columns));
    for (x, y, pixel) in image.enumerate_pixels() {
        let label: u32 = pixel.0[0].into();
        mask[[y as usize, x as usize]] = label as usize;
    }
    mask
}

/// Converts a mask back into an 8 bit label image. Fails if a label does not fit in a byte.
pub fn convert_mask_to_gray_image(mask: &Mask) -> Result<GrayImage> {
    let (rows, columns) = mask.dim();
    let mut gray_image = GrayImage::new(columns as u32, rows as u32);
    for ((y, x), &label) in mask.indexed_iter() {
        let value = u8::try_from(label).map_err(|_| EvaluationError::InvalidLabel {
            label,
            num_classes: usize::from(u8::MAX) + 1,
        })?;
        gray_image.put_pixel(x as u32, y as u32, Luma([value]));
    }
    Ok(gray_image)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma8_pixels_become_labels() {
        let mut gray_image = GrayImage::new(3, 2);
        gray_image.put_pixel(0, 0, Luma([1]));
        gray_image.put_pixel(2, 1, Luma([2]));
        let mask = convert_label_image_to_mask(DynamicImage::ImageLuma8(gray_image));
        let expected: Mask = ndarray::arr2(&[[1, 0, 0], [0, 0, 2]]);
        assert_eq!(mask, expected);
    }

    #[test]
    fn luma16_keeps_large_labels() {
        let mut image: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(2, 1);
        image.put_pixel(1, 0, Luma([300]));
        let mask = convert_label_image_to_mask(DynamicImage::ImageLuma16(image));
        let expected: Mask = ndarray::arr2(&[[0, 300]]);
        assert_eq!(mask, expected);
    }

    #[test]
    fn mask_round_trips_through_gray_image() {
        let mask: Mask = ndarray::arr2(&[[0, 1, 2], [2, 1, 0]]);
        let gray_image = convert_mask_to_gray_image(&mask).unwrap();
        assert_eq!(gray_image.get_pixel(2, 0), &Luma([2]));
        assert_eq!(
            convert_label_image_to_mask(DynamicImage::ImageLuma8(gray_image)),
            mask
        );
    }

    #[test]
    fn labels_above_255_do_not_fit_a_gray_image() {
        let mask: Mask = ndarray::arr2(&[[256]]);
        assert!(convert_mask_to_gray_image(&mask).is_err());
    }
}
