//! Convenience helpers for loading images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Decoded pixels are
//! reduced to single-channel intensities in `[0, 1]` before the engine sees
//! them; the reduction step is pluggable via [`IntensityMode`].

use crate::image::OwnedImage;
use crate::util::{ObjMatchError, ObjMatchResult};
use std::path::Path;

/// How color pixels are reduced to a single intensity sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntensityMode {
    /// Standard luma conversion (ITU-R BT.601 weights).
    #[default]
    Luma,
    /// Plain average of the R, G and B channels.
    ChannelAverage,
}

/// Creates an owned intensity image from a grayscale buffer.
pub fn intensities_from_gray(img: &image::GrayImage) -> ObjMatchResult<OwnedImage> {
    let data = img.as_raw().iter().map(|&p| f64::from(p) / 255.0).collect();
    OwnedImage::from_vec(data, img.width() as usize, img.height() as usize)
}

/// Creates an owned intensity image from a decoded dynamic image.
pub fn intensities_from_dynamic(
    img: &image::DynamicImage,
    mode: IntensityMode,
) -> ObjMatchResult<OwnedImage> {
    match mode {
        IntensityMode::Luma => intensities_from_gray(&img.to_luma8()),
        IntensityMode::ChannelAverage => {
            let rgb = img.to_rgb8();
            let data = rgb
                .pixels()
                .map(|p| {
                    let sum = u32::from(p.0[0]) + u32::from(p.0[1]) + u32::from(p.0[2]);
                    f64::from(sum) / (3.0 * 255.0)
                })
                .collect();
            OwnedImage::from_vec(data, rgb.width() as usize, rgb.height() as usize)
        }
    }
}

/// Loads an image from disk and converts it to an intensity image.
pub fn load_intensity_image<P: AsRef<Path>>(
    path: P,
    mode: IntensityMode,
) -> ObjMatchResult<OwnedImage> {
    let img = image::open(path).map_err(|err| ObjMatchError::ImageIo {
        reason: err.to_string(),
    })?;
    intensities_from_dynamic(&img, mode)
}
