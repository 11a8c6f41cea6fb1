//! Code + logo compositing.
//!
//! [`generate`] encodes the text at high error correction, renders the matrix in the style's
//! colors and, when a logo is supplied, pastes it opaquely over the center of the code.

use std::io::Cursor;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageFormat, RgbImage};

use crate::color::Color;
use crate::config::{LogoFit, Style};
use crate::error::{Error, Result};
use crate::qrcode::{QrCode, QrCodeEcc};
use crate::render::render_modules;

/// Fixed so that a centered logo can hide up to ~30% of the modules and still scan.
pub const ERROR_CORRECTION: QrCodeEcc = QrCodeEcc::High;

/// Bicubic, matching what image editors use for logo scaling.
const LOGO_FILTER: FilterType = FilterType::CatmullRom;

/// A decoded logo with at least one pixel.
#[derive(Clone, Debug)]
pub struct Logo {
    image: DynamicImage,
}

impl Logo {
    /// Decodes a PNG, JPEG or any other format the `image` crate recognizes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Logo::from_image(image::load_from_memory(bytes)?)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        let logo = Logo::from_bytes(&bytes)?;
        log::debug!(
            "Loaded logo {} ({}x{})",
            path.as_ref().display(),
            logo.image.width(),
            logo.image.height()
        );
        Ok(logo)
    }

    pub fn from_image(image: DynamicImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::EmptyImage { width, height });
        }
        Ok(Logo { image })
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

/// Everything one render depends on.
#[derive(Clone, Copy, Debug)]
pub struct GenerationRequest<'a> {
    pub text: &'a str,
    pub logo: Option<&'a Logo>,
    pub style: &'a Style,
}

/// Renders `request` into a new RGB image.
///
/// The output edge is `(4 * version + 17 + 8) * module_size` pixels whether or not a logo is
/// present. The logo is resized to `floor(edge * logo_scale)` on both axes, framed with
/// `logo_padding` pixels of `padding_color` and pasted at the center, replacing the modules
/// beneath it.
///
/// # Errors
///
/// * [`Error::EmptyText`] for empty text.
/// * [`Error::Encoding`] when the text is over capacity.
/// * [`Error::InvalidStyle`] when the style fails [`Style::validate`] or the framed logo
///   would be larger than the code.
///
/// # Example
///
/// ```rust
/// use qrstyle::{generate, GenerationRequest, Style};
///
/// let style = Style::default();
/// let img = generate(&GenerationRequest { text: "HELLO", logo: None, style: &style }).unwrap();
/// assert_eq!(img.dimensions(), (290, 290));
/// ```
pub fn generate(request: &GenerationRequest<'_>) -> Result<RgbImage> {
    let GenerationRequest { text, logo, style } = *request;
    let qr = encode(text)?;
    compose_code(&qr, logo, style)
}

/// Encodes `text` at [`ERROR_CORRECTION`], rejecting empty text.
pub fn encode(text: &str) -> Result<QrCode> {
    if text.is_empty() {
        return Err(Error::EmptyText);
    }
    let qr = QrCode::encode_text(text, ERROR_CORRECTION)?;
    log::debug!("Encoded {} bytes as version {}", text.len(), qr.version().value());
    Ok(qr)
}

/// Renders an already encoded code in `style`, with `logo` pasted over its center.
pub fn compose_code(qr: &QrCode, logo: Option<&Logo>, style: &Style) -> Result<RgbImage> {
    style.validate()?;
    let mut canvas = render_modules(qr, style.module_size, style.foreground, style.background);

    if let Some(logo) = logo {
        let badge = prepare_logo(logo.image(), canvas.dimensions(), style)?;
        let (x, y) = centered_origin(canvas.dimensions(), badge.dimensions());
        imageops::replace(&mut canvas, &badge, x, y);
        log::debug!("Placed {}x{} logo at ({x}, {y})", badge.width(), badge.height());
    }

    Ok(canvas)
}

/// Encodes an image as PNG bytes.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes: Vec<u8> = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Target box for the resized logo (before padding): `floor(edge * scale)`, at least 1 px.
pub fn logo_box((width, height): (u32, u32), scale: f32) -> (u32, u32) {
    let side = |edge: u32| ((f64::from(edge) * f64::from(scale)).floor() as u32).max(1);
    (side(width), side(height))
}

/// Top-left corner that centers `inner` in `outer`, rounding toward the top-left.
pub fn centered_origin((outer_w, outer_h): (u32, u32), (inner_w, inner_h): (u32, u32)) -> (i64, i64) {
    (
        (i64::from(outer_w) - i64::from(inner_w)).div_euclid(2),
        (i64::from(outer_h) - i64::from(inner_h)).div_euclid(2),
    )
}

fn prepare_logo(logo: &DynamicImage, canvas: (u32, u32), style: &Style) -> Result<RgbImage> {
    let (width, height) = logo_box(canvas, style.logo_scale);
    let badge = badge_size(canvas, (width, height), style.logo_padding)?;
    let resized = match style.logo_fit {
        LogoFit::Stretch => flatten(&logo.resize_exact(width, height, LOGO_FILTER), style.padding_color),
        LogoFit::Contain => {
            let fitted = flatten(&logo.resize(width, height, LOGO_FILTER), style.padding_color);
            let mut boxed = RgbImage::from_pixel(width, height, style.padding_color.into());
            let (x, y) = centered_origin((width, height), fitted.dimensions());
            imageops::replace(&mut boxed, &fitted, x, y);
            boxed
        }
    };

    Ok(if style.logo_padding == 0 {
        resized
    } else {
        frame(&resized, style.logo_padding, style.padding_color, badge)
    })
}

/// Size of the logo plus its frame, which must fit inside the code.
fn badge_size(canvas: (u32, u32), (width, height): (u32, u32), padding: u32) -> Result<(u32, u32)> {
    let grow = |side: u32| padding.checked_mul(2).and_then(|frame| side.checked_add(frame));
    match (grow(width), grow(height)) {
        (Some(w), Some(h)) if w <= canvas.0 && h <= canvas.1 => Ok((w, h)),
        _ => Err(Error::invalid_style(
            "logo_padding",
            format!(
                "a {padding} px frame around the {width}x{height} logo does not fit the {}x{} code",
                canvas.0, canvas.1
            ),
        )),
    }
}

/// Composites any transparency over `matte`, so the paste onto the code stays opaque.
fn flatten(image: &DynamicImage, matte: Color) -> RgbImage {
    let rgba = image.to_rgba8();
    let [mr, mg, mb] = matte.channels();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let a = u16::from(a);
        let mix = |c: u8, m: u8| ((u16::from(c) * a + u16::from(m) * (255 - a) + 127) / 255) as u8;
        image::Rgb([mix(r, mr), mix(g, mg), mix(b, mb)])
    })
}

fn frame(image: &RgbImage, border: u32, fill: Color, (width, height): (u32, u32)) -> RgbImage {
    let mut framed = RgbImage::from_pixel(width, height, fill.into());
    imageops::replace(&mut framed, image, i64::from(border), i64::from(border));
    framed
}
