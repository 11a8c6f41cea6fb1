//! Interactive session state.
//!
//! A [`Session`] owns the user's inputs and caches what is derived from them. Each
//! [`Input`] invalidates only what depends on it:
//!
//! ```text
//! text ──> code ──┐
//! style ──────────┼──> code image ──> preview / download
//! logo ───────────┤
//!     └──> palette ──> suggestions ──(adopt)──> style
//! ```

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::color::Color;
use crate::compose::{compose_code, encode, encode_png, Logo};
use crate::config::{LogoFit, Style};
use crate::error::{Error, Result};
use crate::palette::{extract_palette, DEFAULT_PALETTE_SIZE};
use crate::qrcode::QrCode;

/// File name offered for the download.
pub const DOWNLOAD_FILE_NAME: &str = "qr_code.png";
/// MIME type of the download.
pub const DOWNLOAD_MIME: &str = "image/png";
/// Width the preview is shown at; the download keeps the true size.
pub const PREVIEW_WIDTH: u32 = 300;

/// Which color control a suggestion is copied into.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ColorSlot {
    Foreground,
    Background,
    Padding,
}

/// One user action.
#[derive(Clone, Debug)]
pub enum Input {
    Text(String),
    Logo(Option<Logo>),
    Foreground(Color),
    Background(Color),
    ModuleSize(u32),
    LogoScale(f32),
    LogoPadding(u32),
    PaddingColor(Color),
    LogoFit(LogoFit),
    /// Replace the whole style at once.
    Style(Style),
    /// Copy palette entry `index` into a color control.
    AdoptSuggestion { slot: ColorSlot, index: usize },
}

/// PNG bytes ready to be saved or served.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Download {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Caller-owned state of one interactive session.
#[derive(Debug)]
pub struct Session {
    text: String,
    logo: Option<Logo>,
    style: Style,
    palette_size: usize,
    palette: Option<Vec<Color>>,
    code: Option<QrCode>,
    image: Option<RgbImage>,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(Style::default())
    }
}

impl Session {
    pub fn new(style: Style) -> Self {
        Session {
            text: String::new(),
            logo: None,
            style,
            palette_size: DEFAULT_PALETTE_SIZE,
            palette: None,
            code: None,
            image: None,
        }
    }

    /// Sets how many suggestions are derived from a logo.
    pub fn with_palette_size(mut self, palette_size: usize) -> Self {
        self.palette_size = palette_size;
        self.palette = None;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn has_logo(&self) -> bool {
        self.logo.is_some()
    }

    /// Applies one input and drops the derived values that depend on it.
    ///
    /// Only [`Input::AdoptSuggestion`] can fail, when there is no logo or the index is past
    /// the end of the palette; the state is unchanged in that case.
    pub fn apply(&mut self, input: Input) -> Result<()> {
        match input {
            Input::Text(text) => {
                if text == self.text {
                    return Ok(());
                }
                self.text = text;
                self.code = None;
            }
            Input::Logo(logo) => {
                self.logo = logo;
                self.palette = None;
                log::debug!("Logo changed, palette and image invalidated");
            }
            Input::Foreground(color) => self.style.foreground = color,
            Input::Background(color) => self.style.background = color,
            Input::ModuleSize(size) => self.style.module_size = size,
            Input::LogoScale(scale) => self.style.logo_scale = scale,
            Input::LogoPadding(padding) => self.style.logo_padding = padding,
            Input::PaddingColor(color) => self.style.padding_color = color,
            Input::LogoFit(fit) => self.style.logo_fit = fit,
            Input::Style(style) => self.style = style,
            Input::AdoptSuggestion { slot, index } => {
                let color = self.suggestion(index)?;
                match slot {
                    ColorSlot::Foreground => self.style.foreground = color,
                    ColorSlot::Background => self.style.background = color,
                    ColorSlot::Padding => self.style.padding_color = color,
                }
                log::debug!("Adopted suggestion {index} ({color}) as {slot:?}");
            }
        }
        self.image = None;
        Ok(())
    }

    /// Colors suggested by the current logo, computed once per logo. `None` without a logo.
    pub fn palette(&mut self) -> Result<Option<&[Color]>> {
        let Some(logo) = &self.logo else {
            return Ok(None);
        };
        if self.palette.is_none() {
            let palette = extract_palette(logo.image(), self.palette_size)?;
            log::info!(
                "Suggested colors: {}",
                palette.iter().map(Color::to_string).collect::<Vec<_>>().join(" ")
            );
            self.palette = Some(palette);
        }
        Ok(self.palette.as_deref())
    }

    /// The suggestions as `#rrggbb` strings, ready to show or copy.
    pub fn suggestions(&mut self) -> Result<Vec<String>> {
        Ok(self
            .palette()?
            .map(|colors| colors.iter().map(Color::to_string).collect())
            .unwrap_or_default())
    }

    fn suggestion(&mut self, index: usize) -> Result<Color> {
        let palette = self.palette()?.unwrap_or(&[]);
        palette.get(index).copied().ok_or_else(|| {
            Error::invalid_style(
                "suggestion",
                format!("index {index} is outside the {} suggested colors", palette.len()),
            )
        })
    }

    /// The encoded symbol for the current text. Style and logo changes keep it.
    ///
    /// Fails with [`Error::EmptyText`] before any text has been entered.
    pub fn code(&mut self) -> Result<&QrCode> {
        let code = match self.code.take() {
            Some(code) => code,
            None => encode(&self.text)?,
        };
        let code: &QrCode = self.code.insert(code);
        Ok(code)
    }

    /// The code for the current inputs, rendered on first use after a change.
    ///
    /// Fails with [`Error::EmptyText`] before any text has been entered.
    pub fn render(&mut self) -> Result<&RgbImage> {
        let image = match self.image.take() {
            Some(image) => image,
            None => {
                let code = match self.code.take() {
                    Some(code) => code,
                    None => encode(&self.text)?,
                };
                let image = compose_code(&code, self.logo.as_ref(), &self.style);
                self.code = Some(code);
                image?
            }
        };
        let image: &RgbImage = self.image.insert(image);
        Ok(image)
    }

    /// The code scaled to exactly `width` pixels wide for display, aspect kept.
    pub fn preview(&mut self, width: u32) -> Result<RgbImage> {
        let image = self.render()?;
        if image.width() == width {
            return Ok(image.clone());
        }
        let scaled = u64::from(image.height()) * u64::from(width.max(1)) / u64::from(image.width());
        let height = u32::try_from(scaled).unwrap_or(u32::MAX).max(1);
        Ok(imageops::resize(image, width.max(1), height, FilterType::Nearest))
    }

    /// The full-size code as a PNG download.
    pub fn download(&mut self) -> Result<Download> {
        let bytes = encode_png(self.render()?)?;
        log::info!("Prepared {DOWNLOAD_FILE_NAME} ({} bytes)", bytes.len());
        Ok(Download {
            file_name: DOWNLOAD_FILE_NAME,
            mime: DOWNLOAD_MIME,
            bytes,
        })
    }

    #[cfg(test)]
    fn is_image_cached(&self) -> bool {
        self.image.is_some()
    }

    #[cfg(test)]
    fn is_code_cached(&self) -> bool {
        self.code.is_some()
    }

    #[cfg(test)]
    fn is_palette_cached(&self) -> bool {
        self.palette.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb};

    fn logo(color: [u8; 3]) -> Logo {
        Logo::from_image(DynamicImage::ImageRgb8(RgbImage::from_pixel(20, 20, Rgb(color)))).unwrap()
    }

    fn session_with_text(text: &str) -> Session {
        let mut session = Session::default();
        session.apply(Input::Text(text.to_string())).unwrap();
        session
    }

    #[test]
    fn test_empty_text_surfaces_validation_error() {
        let mut session = Session::default();
        let err = session.render().unwrap_err();
        assert_eq!(err.to_string(), "Please enter some text for the QR Code.");
        assert!(session.download().is_err());
    }

    #[test]
    fn test_render_is_cached_until_input_changes() {
        let mut session = session_with_text("HELLO");
        assert_eq!(session.render().unwrap().dimensions(), (290, 290));
        assert!(session.is_image_cached());

        session.apply(Input::Text("HELLO".to_string())).unwrap();
        assert!(session.is_image_cached());

        session.apply(Input::ModuleSize(5)).unwrap();
        assert!(!session.is_image_cached());
        assert_eq!(session.render().unwrap().dimensions(), (145, 145));
    }

    #[test]
    fn test_code_is_shared_and_survives_style_changes() {
        let mut session = session_with_text("HELLO");
        assert!(session.code().is_ok());
        assert!(session.is_code_cached());
        let size = session.code().unwrap().size();
        assert_eq!(session.render().unwrap().width(), (size as u32 + 8) * 10);

        session.apply(Input::Background(Color::new(240, 240, 240))).unwrap();
        assert!(session.is_code_cached());
        assert!(!session.is_image_cached());

        session.apply(Input::Text("HELLO AGAIN".to_string())).unwrap();
        assert!(!session.is_code_cached());
        assert!(matches!(Session::default().code(), Err(Error::EmptyText)));
    }

    #[test]
    fn test_oversized_frame_fails_without_panicking() {
        let mut session = session_with_text("HELLO");
        session.apply(Input::Logo(Some(logo([30, 60, 90])))).unwrap();
        session.apply(Input::LogoPadding(2_147_483_648)).unwrap();
        assert!(matches!(session.render(), Err(Error::InvalidStyle { field: "logo_padding", .. })));
        session.apply(Input::LogoPadding(5)).unwrap();
        assert!(session.render().is_ok());
    }

    #[test]
    fn test_style_change_keeps_palette() {
        let mut session = session_with_text("HELLO");
        session.apply(Input::Logo(Some(logo([30, 60, 90])))).unwrap();
        assert_eq!(session.palette().unwrap().map(<[Color]>::len), Some(6));
        session.apply(Input::Foreground(Color::new(1, 1, 1))).unwrap();
        assert!(session.is_palette_cached());
        session.apply(Input::Logo(None)).unwrap();
        assert!(!session.is_palette_cached());
        assert!(session.palette().unwrap().is_none());
        assert!(session.suggestions().unwrap().is_empty());
    }

    #[test]
    fn test_adopt_suggestion() {
        let mut session = session_with_text("HELLO").with_palette_size(3);
        session.apply(Input::Logo(Some(logo([30, 60, 90])))).unwrap();
        assert_eq!(session.suggestions().unwrap(), vec!["#1e3c5a"; 3]);

        session
            .apply(Input::AdoptSuggestion { slot: ColorSlot::Background, index: 2 })
            .unwrap();
        assert_eq!(session.style().background, Color::new(30, 60, 90));

        let err = session
            .apply(Input::AdoptSuggestion { slot: ColorSlot::Padding, index: 3 })
            .unwrap_err();
        assert!(matches!(err, Error::InvalidStyle { field: "suggestion", .. }));
        assert_eq!(session.style().padding_color, Color::WHITE);
    }

    #[test]
    fn test_adopt_without_logo_fails() {
        let mut session = session_with_text("HELLO");
        assert!(session
            .apply(Input::AdoptSuggestion { slot: ColorSlot::Foreground, index: 0 })
            .is_err());
    }

    #[test]
    fn test_preview_keeps_aspect_and_download_keeps_size() {
        let mut session = session_with_text("HELLO");
        // 290 px code is scaled up to the display width
        let preview = session.preview(PREVIEW_WIDTH).unwrap();
        assert_eq!(preview.dimensions(), (300, 300));

        session.apply(Input::ModuleSize(20)).unwrap();
        let preview = session.preview(PREVIEW_WIDTH).unwrap();
        assert_eq!(preview.dimensions(), (300, 300));
        assert_eq!(session.preview(150).unwrap().dimensions(), (150, 150));

        let download = session.download().unwrap();
        assert_eq!(download.file_name, "qr_code.png");
        assert_eq!(download.mime, "image/png");
        let decoded = image::load_from_memory(&download.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (580, 580));
    }
}
