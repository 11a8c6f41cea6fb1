//! Rasterizing QR codes into images and terminal text.

use image::RgbImage;

use crate::color::Color;
use crate::qrcode::QrCode;

/// Width of the blank border around the symbol, in modules.
pub const QUIET_ZONE: i32 = 4;

/// Edge length in pixels of a rendered code, quiet zone included.
pub fn rendered_size(qr: &QrCode, module_size: u32) -> u32 {
    (qr.size() + 2 * QUIET_ZONE) as u32 * module_size
}

/// Rasterizes a QR code: every module becomes a `module_size` square, `foreground` for
/// dark modules and `background` for light ones, inside a quiet zone of [`QUIET_ZONE`]
/// modules.
///
/// # Arguments
///
/// * `qr` - The QR code to draw.
/// * `module_size` - Pixels per module edge, at least 1.
/// * `foreground` - Dark module color.
/// * `background` - Light module and quiet zone color.
///
/// # Example
///
/// ```rust
/// use qrstyle::qrcode::{QrCode, QrCodeEcc};
/// use qrstyle::render::render_modules;
/// use qrstyle::Color;
///
/// let qr = QrCode::encode_text("HELLO", QrCodeEcc::High).unwrap();
/// let img = render_modules(&qr, 10, Color::BLACK, Color::WHITE);
/// assert_eq!(img.dimensions(), (290, 290));
/// ```
pub fn render_modules(qr: &QrCode, module_size: u32, foreground: Color, background: Color) -> RgbImage {
    assert!(module_size > 0, "Module size must be positive");
    let size = rendered_size(qr, module_size);
    let dark = image::Rgb::from(foreground);
    let light = image::Rgb::from(background);

    RgbImage::from_fn(size, size, |x, y| {
        let qr_x = (x / module_size) as i32 - QUIET_ZONE;
        let qr_y = (y / module_size) as i32 - QUIET_ZONE;
        if qr.get_module(qr_x, qr_y) { dark } else { light }
    })
}

/// Draws the code as text, two characters per module so it looks square in a terminal.
/// Uses Unix newlines regardless of platform.
pub fn to_ascii_string(qr: &QrCode, border: i32) -> String {
    assert!(border >= 0, "Border must be non-negative");
    let mut result = String::new();
    for y in -border..qr.size() + border {
        for x in -border..qr.size() + border {
            let c: char = if qr.get_module(x, y) { '█' } else { ' ' };
            result.push(c);
            result.push(c);
        }
        result.push('\n');
    }
    result
}
