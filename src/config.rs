//! Style configuration.
//!
//! `Style` is the caller-owned bundle of rendering parameters. It is passed into the
//! compositor explicitly, can be loaded from a JSON file, and is overridden piecewise by the
//! CLI flags.

use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{Error, Result};

/// Module size bounds offered by the interactive controls.
pub const MODULE_SIZE_RANGE: RangeInclusive<u32> = 5..=20;
/// Logo scale bounds offered by the interactive controls.
pub const LOGO_SCALE_RANGE: RangeInclusive<f32> = 0.1..=0.5;
/// Logo padding bounds offered by the interactive controls.
pub const LOGO_PADDING_RANGE: RangeInclusive<u32> = 0..=20;

/// Largest module size the library accepts; keeps a version 40 code under 16k pixels a side.
pub const MAX_MODULE_SIZE: u32 = 88;

/// Largest logo frame the library accepts: half the edge of a version 40 code at
/// [`MAX_MODULE_SIZE`], the widest frame that could still fit.
pub const MAX_LOGO_PADDING: u32 = (177 + 8) * MAX_MODULE_SIZE / 2;

/// How the logo is fitted into its target box.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogoFit {
    /// Resize to exactly the target box, ignoring the logo's aspect ratio.
    #[default]
    Stretch,
    /// Keep the aspect ratio; the rest of the box is filled with the padding color.
    Contain,
}

/// Rendering parameters for one QR code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Dark module color.
    pub foreground: Color,
    /// Light module and quiet zone color.
    pub background: Color,
    /// Pixels per module edge.
    pub module_size: u32,
    /// Logo edge length as a fraction of the code's edge, in (0, 1).
    pub logo_scale: f32,
    /// Border added around the resized logo, in pixels.
    pub logo_padding: u32,
    /// Fill for the logo border.
    pub padding_color: Color,
    pub logo_fit: LogoFit,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            foreground: Color::BLACK,
            background: Color::WHITE,
            module_size: 10,
            logo_scale: 0.25,
            logo_padding: 0,
            padding_color: Color::WHITE,
            logo_fit: LogoFit::Stretch,
        }
    }
}

impl Style {
    /// Reads a style from a JSON file. Missing fields take their default values.
    ///
    /// ```rust,ignore
    /// let style = Style::from_json_file("style.json")?;
    /// ```
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let style: Style = serde_json::from_str(&text)?;
        style.validate()?;
        log::debug!("Loaded style from {}", path.as_ref().display());
        Ok(style)
    }

    /// Checks the ranges the compositor relies on.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_MODULE_SIZE).contains(&self.module_size) {
            return Err(Error::invalid_style(
                "module_size",
                format!("{} is outside 1..={}", self.module_size, MAX_MODULE_SIZE),
            ));
        }
        if !(self.logo_scale.is_finite() && self.logo_scale > 0.0 && self.logo_scale < 1.0) {
            return Err(Error::invalid_style(
                "logo_scale",
                format!("{} is not strictly between 0 and 1", self.logo_scale),
            ));
        }
        if self.logo_padding > MAX_LOGO_PADDING {
            return Err(Error::invalid_style(
                "logo_padding",
                format!("{} is outside 0..={}", self.logo_padding, MAX_LOGO_PADDING),
            ));
        }
        Ok(())
    }
}
