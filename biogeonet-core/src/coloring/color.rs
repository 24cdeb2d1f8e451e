//! RGB colours and their textual forms.

use std::{fmt, str::FromStr};

use crate::error::ConfigurationError;

/// An opaque 8-bit RGB colour.
///
/// Parsed from `#RRGGBB`, `#RGB` or a small set of common colour names, and
/// displayed as upper-case `#RRGGBB`.
///
/// # Examples
/// ```
/// use biogeonet_core::Color;
///
/// let red: Color = "#e41a1c".parse()?;
/// assert_eq!(red.to_string(), "#E41A1C");
/// assert_eq!(red.rgb_triplet(), "228,26,28");
/// assert_eq!("navy".parse::<Color>()?.gdf_literal(), "'0,0,128'");
/// # Ok::<(), biogeonet_core::ConfigurationError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

const NAMED: &[(&str, Color)] = &[
    ("black", Color::rgb(0, 0, 0)),
    ("white", Color::rgb(255, 255, 255)),
    ("red", Color::rgb(255, 0, 0)),
    ("green", Color::rgb(0, 255, 0)),
    ("blue", Color::rgb(0, 0, 255)),
    ("yellow", Color::rgb(255, 255, 0)),
    ("orange", Color::rgb(255, 165, 0)),
    ("purple", Color::rgb(160, 32, 240)),
    ("pink", Color::rgb(255, 192, 203)),
    ("brown", Color::rgb(165, 42, 42)),
    ("cyan", Color::rgb(0, 255, 255)),
    ("magenta", Color::rgb(255, 0, 255)),
    ("gold", Color::rgb(255, 215, 0)),
    ("navy", Color::rgb(0, 0, 128)),
    ("darkgreen", Color::rgb(0, 100, 0)),
    ("darkred", Color::rgb(139, 0, 0)),
    ("grey", Color::rgb(190, 190, 190)),
    ("gray", Color::rgb(190, 190, 190)),
    ("lightgrey", Color::rgb(211, 211, 211)),
    ("lightgray", Color::rgb(211, 211, 211)),
];

impl Color {
    /// Creates a colour from its channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A neutral grey with every channel at `level` (clamped to `0..=1`).
    #[must_use]
    pub fn gray(level: f64) -> Self {
        let channel = (level.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(channel, channel, channel)
    }

    /// Channels as a comma-separated `r,g,b` string.
    #[must_use]
    pub fn rgb_triplet(&self) -> String {
        format!("{},{},{}", self.r, self.g, self.b)
    }

    /// The quoted triplet used by GDF colour attributes.
    #[must_use]
    pub fn gdf_literal(&self) -> String {
        format!("'{}'", self.rgb_triplet())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ConfigurationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let invalid = || ConfigurationError::InvalidColor {
            provided: trimmed.to_owned(),
        };
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }
        let lowered = trimmed.to_ascii_lowercase();
        NAMED
            .iter()
            .find(|(name, _)| *name == lowered)
            .map(|(_, color)| *color)
            .ok_or_else(invalid)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
    match hex.len() {
        6 => Some(Color::rgb(
            channel(hex.get(0..2)?)?,
            channel(hex.get(2..4)?)?,
            channel(hex.get(4..6)?)?,
        )),
        3 => {
            let short = |index: usize| -> Option<u8> {
                let digit = channel(hex.get(index..=index)?)?;
                Some(digit * 17)
            };
            Some(Color::rgb(short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}
