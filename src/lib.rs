//! Color-model conversion and CSS color codec.
//!
//! Four color models (RGB/RGBA, HSL/HSLA, CIE Lab, CIE LCh) with lossless
//! `f64` components, converters between them, and parsers/stringifiers for
//! the CSS notations: hex (`#rgb`, `#rrggbbaa`), functional (`rgb()`,
//! `hsl()`, `lab()`, `lch()` in legacy and modern delimiter styles), and
//! color keywords.
//!
//! Components are never clamped in memory. Out-of-gamut values survive every
//! conversion and are clamped only when serialized; NaN components make
//! serialization fail rather than silently disappearing.
//!
//! ```
//! use tinct::FormatOptions;
//!
//! let c = tinct::to_rgb("#ff8000")?;
//! let css = tinct::from_rgb(c, &FormatOptions::new())?;
//! assert_eq!(css, "rgb(255,128,0)");
//! # Ok::<(), tinct::Error>(())
//! ```
//!
//! Conversions that cross the gamma boundary take a [`ColorSpace`] argument
//! naming the transfer pair; pass [`ColorSpace::Linear`] when no gamma
//! handling is wanted.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod css;
pub mod error;
pub mod hsl;
pub mod lab;
pub mod math;
pub(crate) mod parse;
pub mod rgb;
pub mod transfer;

pub use css::{
    add_aliases, default_named_colors, from_rgb, from_rgba, name_of, parse_css, reset_aliases,
    to_rgb, to_rgba, CssFormat, FormatOptions, Mode, NamedColorTable, Precision,
};
pub use error::{Error, Result};
pub use hsl::{Hsl, Hsla};
pub use lab::{Illuminant, Lab, Lch};
pub use math::AngleUnit;
pub use parse::{
    is_css_hex_string, is_css_hsl_string, is_css_hsla_string, is_css_lab_string,
    is_css_lch_string, is_css_rgb_string, is_css_rgba_string,
};
pub use rgb::{Rgb, Rgba};
pub use transfer::ColorSpace;
