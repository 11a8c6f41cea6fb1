//! Dominant color extraction.
//!
//! Sampled pixels are converted to CIELAB and clustered with k-means (`kmeans_colors`, fixed
//! seed). Each cluster's centroid becomes one suggestion, ranked by the share of sampled
//! pixels it holds.

use std::cmp::Ordering;

use ::palette::{IntoColor, Lab, LinSrgb, Srgb};
use image::{DynamicImage, GenericImageView};
use kmeans_colors::{get_kmeans, Sort};

use crate::color::Color;
use crate::error::{Error, Result};

/// Number of suggestions offered for a logo.
pub const DEFAULT_PALETTE_SIZE: usize = 6;
/// Every n-th pixel is sampled.
pub const DEFAULT_QUALITY: usize = 10;

/// Pixels below this alpha are ignored.
const MIN_ALPHA: u8 = 125;
/// Pixels with every channel above this are ignored.
const WHITE_THRESHOLD: u8 = 250;

const KMEANS_MAX_ITER: usize = 20;
const KMEANS_CONVERGE: f32 = 1e-4;
const KMEANS_SEED: u64 = 0;

/// Returns exactly `count` colors representative of `image`, most prevalent first.
///
/// When the image has fewer distinct colors than `count`, the ranked colors repeat in order
/// to fill the list.
///
/// # Errors
///
/// * [`Error::EmptyPalette`] if `count` is 0.
/// * [`Error::EmptyImage`] if the image has no pixels.
///
/// # Example
///
/// ```rust
/// use image::{DynamicImage, Rgb, RgbImage};
/// use qrstyle::{extract_palette, Color};
///
/// let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([200, 30, 30])));
/// let palette = extract_palette(&img, 6).unwrap();
/// assert_eq!(palette, vec![Color::new(200, 30, 30); 6]);
/// ```
pub fn extract_palette(image: &DynamicImage, count: usize) -> Result<Vec<Color>> {
    extract_palette_with_quality(image, count, DEFAULT_QUALITY)
}

/// Like [`extract_palette`], sampling every `quality`-th pixel (1 = every pixel).
pub fn extract_palette_with_quality(image: &DynamicImage, count: usize, quality: usize) -> Result<Vec<Color>> {
    if count == 0 {
        return Err(Error::EmptyPalette);
    }
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::EmptyImage { width, height });
    }

    let pixels = sample_pixels(image, quality);
    let mut palette = dominant_colors(&pixels, count);

    let distinct = palette.len();
    if distinct == 0 {
        return Err(Error::EmptyImage { width, height });
    }
    if distinct < count {
        log::debug!("Image yields {distinct} colors, repeating them to fill {count}");
        for i in 0..count - distinct {
            palette.push(palette[i % distinct]);
        }
    }
    Ok(palette)
}

/// Samples every `quality`-th pixel, preferring opaque, non-white ones. Falls back to
/// the wider sets when the preferred one is empty (an all-white or all-clear logo).
fn sample_pixels(image: &DynamicImage, quality: usize) -> Vec<[u8; 3]> {
    let rgba = image.to_rgba8();
    let sampled: Vec<[u8; 4]> = rgba.pixels().step_by(quality.max(1)).map(|p| p.0).collect();
    let rgb = |p: &[u8; 4]| [p[0], p[1], p[2]];
    let opaque = |p: &&[u8; 4]| p[3] >= MIN_ALPHA;
    let near_white = |p: &&[u8; 4]| p[..3].iter().all(|&c| c > WHITE_THRESHOLD);

    let preferred: Vec<[u8; 3]> = sampled
        .iter()
        .filter(opaque)
        .filter(|p| !near_white(p))
        .map(rgb)
        .collect();
    if !preferred.is_empty() {
        return preferred;
    }
    let visible: Vec<[u8; 3]> = sampled.iter().filter(opaque).map(rgb).collect();
    if !visible.is_empty() {
        log::warn!("Logo is near-white only; suggesting from its white pixels");
        return visible;
    }
    log::warn!("Logo is fully transparent; suggesting from its hidden colors");
    sampled.iter().map(rgb).collect()
}

/// Clusters `pixels` into at most `count` colors, largest share first, ties by color.
///
/// Asks for no more clusters than there are distinct colors, so no cluster starts empty.
fn dominant_colors(pixels: &[[u8; 3]], count: usize) -> Vec<Color> {
    let mut distinct = pixels.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    let k = count.min(distinct.len()).min(usize::from(u8::MAX));
    if k == 0 {
        return Vec::new();
    }

    let lab_pixels: Vec<Lab> = pixels
        .iter()
        .map(|&[r, g, b]| {
            let linear: LinSrgb = Srgb::new(r, g, b).into_linear();
            linear.into_color()
        })
        .collect();
    let kmeans = get_kmeans(k, KMEANS_MAX_ITER, KMEANS_CONVERGE, false, &lab_pixels, KMEANS_SEED);

    let mut ranked: Vec<(f32, Color)> = Lab::sort_indexed_colors(&kmeans.centroids, &kmeans.indices)
        .into_iter()
        .filter(|data| data.percentage > 0.0)
        .map(|data| (data.percentage, to_color(data.centroid)))
        .collect();
    ranked.sort_by(|a, b| match b.0.total_cmp(&a.0) {
        Ordering::Equal => a.1.cmp(&b.1),
        order => order,
    });
    ranked.into_iter().map(|(_, color)| color).collect()
}

fn to_color(lab: Lab) -> Color {
    let linear: LinSrgb = lab.into_color();
    let rgb: Srgb<u8> = Srgb::<f32>::from_linear(linear).into_format();
    Color::new(rgb.red, rgb.green, rgb.blue)
}
