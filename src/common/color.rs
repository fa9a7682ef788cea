use std::fmt;

/// RGB color representation.
///
/// Represents a color using red, green, and blue components, each in the range 0-255.
///
/// # Examples
///
/// ```rust
/// use deckweave::common::RGBColor;
///
/// let red = RGBColor::new(255, 0, 0);
/// let blue = RGBColor::from_hex("#0000FF").unwrap();
/// assert_eq!(blue.to_hex(), "0000FF");
/// assert_ne!(red, blue);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RGBColor {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
}

impl RGBColor {
    pub const BLACK: RGBColor = RGBColor::new(0, 0, 0);
    pub const WHITE: RGBColor = RGBColor::new(255, 255, 255);

    /// Create a new RGB color.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create an RGB color from a hex string.
    ///
    /// Accepts `RRGGBB` and the `RGB` shorthand, with or without a leading `#`.
    /// Surrounding whitespace is ignored.
    ///
    /// ```rust
    /// use deckweave::common::RGBColor;
    ///
    /// assert_eq!(RGBColor::from_hex("#F00"), Some(RGBColor::new(255, 0, 0)));
    /// assert_eq!(RGBColor::from_hex("12345"), None);
    /// ```
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::new(r, g, b))
            },
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
                let (r, g, b) = (nibble(0)?, nibble(1)?, nibble(2)?);
                Some(Self::new(r * 17, g * 17, b * 17))
            },
            _ => None,
        }
    }

    /// Convert to hex string (without # prefix), as DrawingML `srgbClr` expects.
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Relative luminance in `[0.0, 1.0]` (Rec. 709 weights on sRGB components).
    pub fn luminance(&self) -> f64 {
        (0.2126 * self.r as f64 + 0.7152 * self.g as f64 + 0.0722 * self.b as f64) / 255.0
    }

    /// Black or white, whichever reads better on top of this color.
    pub fn contrasting_text(&self) -> RGBColor {
        if self.luminance() > 0.6 {
            Self::BLACK
        } else {
            Self::WHITE
        }
    }
}

impl fmt::Display for RGBColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_variants() {
        assert_eq!(RGBColor::from_hex("FF0000"), Some(RGBColor::new(255, 0, 0)));
        assert_eq!(RGBColor::from_hex(" #0d47a1 "), Some(RGBColor::new(13, 71, 161)));
        assert_eq!(RGBColor::from_hex("#abc"), Some(RGBColor::new(0xAA, 0xBB, 0xCC)));
        assert_eq!(RGBColor::from_hex("#GG0000"), None);
        assert_eq!(RGBColor::from_hex(""), None);
        assert_eq!(RGBColor::from_hex("#ÄÄÄ"), None);
    }

    #[test]
    fn test_contrasting_text() {
        assert_eq!(RGBColor::new(13, 71, 161).contrasting_text(), RGBColor::WHITE);
        assert_eq!(RGBColor::new(255, 193, 7).contrasting_text(), RGBColor::BLACK);
    }

    #[test]
    fn test_display() {
        assert_eq!(RGBColor::new(1, 2, 3).to_string(), "#010203");
    }
}
