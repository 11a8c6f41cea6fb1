//! # qrstyle
//!
//! Styled QR codes with an embedded logo and color suggestions taken from that logo.
//!
//! `qrstyle` encodes text at the High error correction level (about 30% of the modules can be
//! lost), which leaves room to paste a logo over the center of the code and still scan it.
//! Colors, module size, logo size and the frame around the logo are all configurable, and a
//! palette of the logo's dominant colors can be used to pick matching code colors.
//!
//! ## Features
//!
//! - Encode text in numeric, alphanumeric or byte mode, versions 1 to 40, chosen automatically.
//! - Render with custom foreground/background colors and a 4-module quiet zone.
//! - Embed a logo, stretched or aspect-preserved, with an optional colored frame.
//! - Extract the dominant colors of a logo, most prevalent first.
//! - Keep interactive state in a [`Session`] that only recomputes what an input affects.
//! - Export PNG bytes, or print the code to a terminal.
//!
//! ## Example
//!
//! Generate a code with a logo and save it:
//!
//! ```rust,no_run
//! use qrstyle::{encode_png, generate, Color, GenerationRequest, Logo, Style};
//!
//! fn main() -> qrstyle::Result<()> {
//!     let logo = Logo::open("logo.png")?;
//!     let style = Style {
//!         foreground: "#1e3c5a".parse()?,
//!         logo_padding: 5,
//!         padding_color: Color::WHITE,
//!         ..Style::default()
//!     };
//!     let img = generate(&GenerationRequest {
//!         text: "https://example.com",
//!         logo: Some(&logo),
//!         style: &style,
//!     })?;
//!     std::fs::write("qr_code.png", encode_png(&img)?)?;
//!     Ok(())
//! }
//! ```
//!
//! Drive it interactively:
//!
//! ```rust
//! use qrstyle::{Input, Session};
//!
//! let mut session = Session::default();
//! assert!(session.render().is_err()); // no text yet
//! session.apply(Input::Text("HELLO".into())).unwrap();
//! assert_eq!(session.render().unwrap().dimensions(), (290, 290));
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: QR code encoding.
//! - [`render`]: Rasterizing a code, and terminal output.
//! - [`compose`]: Logo embedding and PNG export.
//! - [`palette`]: Dominant color extraction.
//! - [`session`]: Interactive state and derived values.

pub mod color;
pub mod compose;
pub mod config;
pub mod error;
pub mod palette;
pub mod qrcode;
pub mod render;
pub mod session;

pub use color::Color;
pub use compose::{encode_png, generate, GenerationRequest, Logo};
pub use config::{LogoFit, Style};
pub use error::{Error, ErrorKind, Result};
pub use crate::palette::extract_palette;
pub use session::{ColorSlot, Download, Input, Session};
