// End-to-end tests for code generation, logo embedding and PNG export
use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use qrstyle::compose::{encode_png, generate, GenerationRequest, Logo};
use qrstyle::qrcode::{QrCode, QrCodeEcc};
use qrstyle::{Color, ErrorKind, LogoFit, Style};

const RED: [u8; 3] = [220, 20, 20];

fn solid_logo(width: u32, height: u32, color: [u8; 3]) -> Logo {
    Logo::from_image(DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))).unwrap()
}

fn render(text: &str, logo: Option<&Logo>, style: &Style) -> RgbImage {
    generate(&GenerationRequest { text, logo, style }).unwrap()
}

/// Bounding box (x0, y0, x1 exclusive, y1 exclusive) and count of pixels with the given color.
fn color_bounds(img: &RgbImage, color: [u8; 3]) -> Option<((u32, u32, u32, u32), usize)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    let mut count = 0;
    for (x, y, px) in img.enumerate_pixels() {
        if px.0 != color {
            continue;
        }
        count += 1;
        bounds = Some(match bounds {
            None => (x, y, x + 1, y + 1),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x + 1), y1.max(y + 1)),
        });
    }
    bounds.map(|b| (b, count))
}

fn decode(img: &RgbImage) -> String {
    let grey = DynamicImage::ImageRgb8(img.clone()).to_luma8();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        grey.width() as usize,
        grey.height() as usize,
        |x, y| grey.get_pixel(x as u32, y as u32).0[0],
    );
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one code");
    let (_, content) = grids[0].decode().expect("code should decode");
    content
}

#[test]
fn hello_black_on_white() {
    let img = render("HELLO", None, &Style::default());
    assert_eq!(img.dimensions(), (290, 290));

    // Only the two style colors appear
    assert!(img.pixels().all(|p| p.0 == [0, 0, 0] || p.0 == [255, 255, 255]));

    // 4-module (40 px) quiet zone on every side
    for (x, y, px) in img.enumerate_pixels() {
        if x < 40 || y < 40 || x >= 250 || y >= 250 {
            assert_eq!(px.0, [255, 255, 255], "quiet zone pixel ({x}, {y})");
        }
    }

    // Finder pattern corners start right at the quiet zone edge
    assert_eq!(img.get_pixel(40, 40).0, [0, 0, 0]);
    assert_eq!(img.get_pixel(249, 40).0, [0, 0, 0]);
    assert_eq!(img.get_pixel(40, 249).0, [0, 0, 0]);
}

#[test]
fn custom_colors_are_used() {
    let style = Style {
        foreground: Color::new(10, 40, 90),
        background: Color::new(250, 245, 200),
        ..Style::default()
    };
    let img = render("colors", None, &style);
    assert_eq!(img.get_pixel(0, 0).0, [250, 245, 200]);
    assert!(img.pixels().any(|p| p.0 == [10, 40, 90]));
}

#[test]
fn empty_text_is_validation_error() {
    let style = Style::default();
    let err = generate(&GenerationRequest { text: "", logo: None, style: &style }).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.to_string(), "Please enter some text for the QR Code.");
}

#[test]
fn over_capacity_is_encoding_error() {
    let style = Style::default();
    let text = "a".repeat(1300);
    let err = generate(&GenerationRequest { text: &text, logo: None, style: &style }).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encoding);
}

#[test]
fn invalid_style_is_validation_error() {
    let style = Style { logo_scale: 1.5, ..Style::default() };
    let err = generate(&GenerationRequest { text: "x", logo: None, style: &style }).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn undecodable_logo_is_image_error() {
    let err = Logo::from_bytes(&[0x89, b'P', b'N', b'G', 0, 1, 2, 3]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Image);
}

#[test]
fn logo_quarter_scale_without_padding() {
    let logo = solid_logo(50, 30, RED);
    let img = render("HELLO", Some(&logo), &Style::default());
    assert_eq!(img.dimensions(), (290, 290));

    // floor(290 * 0.25) = 72, at ((290 - 72) / 2) = 109 on both axes; stretched, not letterboxed
    let (bounds, count) = color_bounds(&img, RED).unwrap();
    assert_eq!(bounds, (109, 109, 181, 181));
    assert_eq!(count, 72 * 72);
}

#[test]
fn logo_padding_frames_the_logo() {
    let logo = solid_logo(40, 40, RED);
    let style = Style {
        logo_padding: 5,
        padding_color: Color::WHITE,
        foreground: Color::new(0, 0, 80),
        background: Color::new(200, 200, 255),
        ..Style::default()
    };
    let img = render("HELLO", Some(&logo), &style);

    let (bounds, count) = color_bounds(&img, RED).unwrap();
    assert_eq!(bounds, (109, 109, 181, 181));
    assert_eq!(count, 72 * 72);

    // 82x82 badge at 104; everything in it outside the logo is the white frame
    for y in 104..186 {
        for x in 104..186 {
            let inside_logo = (109..181).contains(&x) && (109..181).contains(&y);
            if !inside_logo {
                assert_eq!(img.get_pixel(x, y).0, [255, 255, 255], "frame pixel ({x}, {y})");
            }
        }
    }
    // Just outside the badge is code again, and white is in neither code color
    assert_ne!(img.get_pixel(103, 145).0, [255, 255, 255]);
}

#[test]
fn logo_is_centered_within_one_pixel() {
    for (text, module_size, scale, padding) in [
        ("HELLO", 10, 0.25, 0),
        ("https://example.com/a", 7, 0.33, 3),
        ("0123456789", 5, 0.1, 0),
        ("odd sizes everywhere", 9, 0.45, 1),
    ] {
        let style = Style {
            module_size,
            logo_scale: scale,
            logo_padding: padding,
            padding_color: Color::new(0, 200, 0),
            ..Style::default()
        };
        let img = render(text, Some(&solid_logo(31, 17, RED)), &style);
        let ((x0, y0, x1, y1), _) = color_bounds(&img, RED).unwrap();
        let (w, h) = img.dimensions();
        assert!(((x0 + x1) as i64 - w as i64).abs() <= 2, "{text}: x {x0}..{x1} in {w}");
        assert!(((y0 + y1) as i64 - h as i64).abs() <= 2, "{text}: y {y0}..{y1} in {h}");
    }
}

#[test]
fn contain_fit_keeps_the_same_box() {
    let style = Style {
        logo_fit: LogoFit::Contain,
        padding_color: Color::new(0, 200, 0),
        ..Style::default()
    };
    let img = render("HELLO", Some(&solid_logo(60, 20, RED)), &style);
    // Box is still 72x72 at 109, the logo spans its full width but only part of its height
    let ((x0, y0, x1, y1), _) = color_bounds(&img, RED).unwrap();
    assert_eq!((x0, x1), (109, 181));
    assert!(y0 > 109 && y1 < 181);
    assert_eq!(img.get_pixel(145, 110).0, [0, 200, 0]);
}

#[test]
fn transparent_logo_areas_take_padding_color() {
    let mut rgba = RgbaImage::from_pixel(40, 40, Rgba([0, 0, 0, 0]));
    for y in 10..30 {
        for x in 10..30 {
            rgba.put_pixel(x, y, Rgba([RED[0], RED[1], RED[2], 255]));
        }
    }
    let logo = Logo::from_image(DynamicImage::ImageRgba8(rgba)).unwrap();
    let style = Style { padding_color: Color::new(0, 200, 0), ..Style::default() };
    let img = render("HELLO", Some(&logo), &style);
    assert_eq!(img.get_pixel(110, 110).0, [0, 200, 0]);
    assert_eq!(img.get_pixel(145, 145).0, RED);
}

#[test]
fn oversized_logo_padding_is_validation_error() {
    let logo = solid_logo(40, 40, RED);
    for padding in [2_147_483_648, u32::MAX, 1_000_000, 200] {
        let style = Style { logo_padding: padding, ..Style::default() };
        let err = generate(&GenerationRequest { text: "HELLO", logo: Some(&logo), style: &style }).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "padding {padding}");
    }

    // A 72 px logo plus two 109 px sides is exactly the 290 px code
    let style = Style { logo_padding: 109, padding_color: Color::new(0, 200, 0), ..Style::default() };
    let img = render("HELLO", Some(&logo), &style);
    assert_eq!(img.dimensions(), (290, 290));
    assert_eq!(img.get_pixel(0, 0).0, [0, 200, 0]);
    assert_eq!(img.get_pixel(145, 145).0, RED);
}

#[test]
fn dimensions_do_not_depend_on_logo() {
    let style = Style { module_size: 6, logo_padding: 20, ..Style::default() };
    let text = "https://example.com/dimensions";
    let plain = render(text, None, &style);
    let with_logo = render(text, Some(&solid_logo(300, 100, RED)), &style);
    assert_eq!(plain.dimensions(), with_logo.dimensions());

    let qr = QrCode::encode_text(text, QrCodeEcc::High).unwrap();
    let side = (qr.size() as u32 + 8) * 6;
    assert_eq!(plain.dimensions(), (side, side));
}

#[test]
fn png_round_trip_is_pixel_exact() {
    let style = Style { logo_padding: 4, padding_color: Color::new(1, 2, 3), ..Style::default() };
    let img = render("round trip", Some(&solid_logo(13, 29, [17, 99, 201])), &style);
    let bytes = encode_png(&img).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert_eq!(decoded, img);
}

#[test]
fn generation_is_deterministic() {
    let logo = solid_logo(64, 64, [90, 30, 160]);
    let style = Style { logo_padding: 2, ..Style::default() };
    let a = encode_png(&render("same input", Some(&logo), &style)).unwrap();
    let b = encode_png(&render("same input", Some(&logo), &style)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn codes_decode_back_to_their_text() {
    // The last one needs version 8, which carries version information
    let long = "https://example.com/".repeat(4);
    for text in [
        "HELLO",
        "0123456789012345",
        "Hello, world! 123",
        "https://example.com/some/longer/path?q=1",
        long.as_str(),
    ] {
        let style = Style { module_size: 4, ..Style::default() };
        assert_eq!(decode(&render(text, None, &style)), text);
    }
}

#[test]
fn code_with_logo_still_decodes() {
    let text = "https://example.com/some/longer/path?q=1";
    let style = Style {
        logo_scale: 0.2,
        logo_padding: 2,
        ..Style::default()
    };
    let img = render(text, Some(&solid_logo(32, 32, RED)), &style);
    // Version 5: 37 modules + quiet zone
    assert_eq!(img.width(), 45 * 10);
    assert_eq!(decode(&img), text);
}
