use crate::annotations::mask::Mask;
use crate::evaluation::error::Result;
use crate::image_utils::image_conversion::{
    convert_label_image_to_mask, convert_mask_to_gray_image,
};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Reads a single-channel label image (usually a PNG) as a mask.
pub fn read_mask(filepath: &Path) -> Result<Mask> {
    let label_image = image::open(filepath)?;
    Ok(convert_label_image_to_mask(label_image))
}

/// Saves a mask as an 8 bit label image. The format follows the file extension.
pub fn write_mask(filepath: &Path, mask: &Mask) -> Result<()> {
    convert_mask_to_gray_image(mask)?.save(filepath)?;
    Ok(())
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("png"))
}

/// The PNG files directly inside `directory`, sorted by file name.
///
/// Ground-truth and prediction directories are paired by this order, so both should use the
/// same file names.
pub fn mask_paths(directory: &Path) -> impl Iterator<Item = Result<PathBuf>> + use<> {
    WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() && is_png(entry.path()) => {
                Some(Ok(entry.into_path()))
            }
            Ok(_) => None,
            Err(error) => Some(Err(error.into())),
        })
}

/// Lazily reads every mask in `directory`. Each file is only decoded when the iterator gets to
/// it, so a whole dataset never has to fit in memory.
pub fn read_masks(directory: &Path) -> impl Iterator<Item = Result<Mask>> + use<> {
    mask_paths(directory).map(|path| {
        let path = path?;
        log::debug!("reading mask {}", path.display());
        read_mask(&path)
    })
}
