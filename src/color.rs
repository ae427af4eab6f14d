use std::str::FromStr;

use palette::Srgb;

use crate::error::{EngineError, Result};

/// Core color type used throughout the pipeline.
/// Wraps sRGB u8 components; all matching happens in this space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string like `#ff8800` or `#FF8800`.
    ///
    /// Exactly six hex digits are required; the shorthand `#f80` form is rejected.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() {
            return Err(EngineError::InvalidInput(format!(
                "invalid hex color {hex:?}: non-ASCII characters"
            )));
        }
        if digits.len() != 6 {
            return Err(EngineError::InvalidInput(format!(
                "invalid hex color {hex:?}: expected 6 hex digits, got {}",
                digits.len()
            )));
        }
        let srgb = Srgb::<u8>::from_str(digits)
            .map_err(|e| EngineError::InvalidInput(format!("invalid hex color {hex:?}: {e}")))?;
        Ok(Self::from_srgb_u8(srgb))
    }

    /// Serialize to lowercase hex `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Create from `palette::Srgb<u8>`.
    pub fn from_srgb_u8(srgb: Srgb<u8>) -> Self {
        Self {
            r: srgb.red,
            g: srgb.green,
            b: srgb.blue,
        }
    }

    /// Euclidean distance between two colors in 8-bit RGB space.
    pub fn distance(self, other: Color) -> f64 {
        let dr = f64::from(self.r) - f64::from(other.r);
        let dg = f64::from(self.g) - f64::from(other.g);
        let db = f64::from(self.b) - f64::from(other.b);
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// WCAG relative luminance.
    ///
    /// Uses the 0.03928 linearization cutoff from the WCAG 2.0 text rather than
    /// the sRGB standard's 0.04045; the two only disagree on channel values 10 and 11.
    pub fn relative_luminance(self) -> f64 {
        fn linearize(c: u8) -> f64 {
            let c = f64::from(c) / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        let r = linearize(self.r);
        let g = linearize(self.g);
        let b = linearize(self.b);
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }

    /// WCAG contrast ratio between two colors.
    ///
    /// Returns a value in [1, 21]. Higher means more contrast.
    pub fn contrast_ratio(c1: &Color, c2: &Color) -> f64 {
        let l1 = c1.relative_luminance();
        let l2 = c2.relative_luminance();
        let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
        (lighter + 0.05) / (darker + 0.05)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    #[test]
    fn hex_parses_components() {
        let color = Color::from_hex("#ff8800").unwrap();
        assert_eq!((color.r, color.g, color.b), (255, 136, 0));
    }

    #[test]
    fn hex_parsing_table() {
        let cases: &[(&str, Option<&str>)] = &[
            ("#ff8800", Some("#ff8800")),
            ("#FF8800", Some("#ff8800")),
            ("#Ff88aA", Some("#ff88aa")),
            ("aabbcc", Some("#aabbcc")),
            ("#fff", None),
            ("#fffffff", None),
            ("", None),
            ("#", None),
            ("#gggggg", None),
            ("##ff8800", None),
            ("#ff880é", None),
            ("éffff", None),
            ("#ｆｆ８８００", None),
        ];
        for &(input, expected) in cases {
            match (Color::from_hex(input), expected) {
                (Ok(color), Some(hex)) => assert_eq!(color.to_hex(), hex, "{input:?}"),
                (Err(err), None) => {
                    assert!(matches!(err, EngineError::InvalidInput(_)), "{input:?}: {err}")
                }
                (got, _) => panic!("{input:?}: unexpected {got:?}"),
            }
        }
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Color::new(0, 0, 0);
        let b = Color::new(3, 4, 0);
        assert!((a.distance(b) - 5.0).abs() < 1e-9);
        assert_eq!(a.distance(a), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Color::new(200, 50, 50);
        let b = Color::new(50, 200, 50);
        assert_eq!(a.distance(b), b.distance(a));
    }

    #[test]
    fn contrast_ratio_black_white() {
        let ratio = Color::contrast_ratio(&BLACK, &WHITE);
        assert!(
            (ratio - 21.0).abs() < 1e-9,
            "black/white contrast should be 21:1, got {ratio}"
        );
    }

    #[test]
    fn contrast_ratio_same_color() {
        for color in [BLACK, WHITE, Color::new(128, 128, 128), Color::new(16, 16, 16)] {
            let ratio = Color::contrast_ratio(&color, &color);
            assert!(
                (ratio - 1.0).abs() < 1e-12,
                "same color contrast should be 1:1, got {ratio}"
            );
        }
    }

    #[test]
    fn contrast_ratio_is_symmetric() {
        let a = Color::new(200, 50, 50);
        let b = Color::new(50, 200, 50);
        let ratio_ab = Color::contrast_ratio(&a, &b);
        let ratio_ba = Color::contrast_ratio(&b, &a);
        assert!(
            (ratio_ab - ratio_ba).abs() < 1e-12,
            "contrast ratio should be symmetric: {ratio_ab} vs {ratio_ba}"
        );
    }

    #[test]
    fn contrast_ratio_mid_gray_vs_black() {
        // sRGB(119,119,119) has relative luminance ~0.184
        let gray = Color::new(119, 119, 119);
        let ratio = Color::contrast_ratio(&gray, &BLACK);
        assert!(
            ratio > 4.5 && ratio < 5.0,
            "mid-gray vs black should be ~4.7:1, got {ratio}"
        );
    }

    #[test]
    fn luminance_cutoff_uses_wcag_threshold() {
        // 10/255 = 0.0392 sits below the 0.03928 cutoff, so it stays on the linear segment.
        let dark = Color::new(10, 10, 10);
        let expected = (10.0 / 255.0) / 12.92;
        assert!((dark.relative_luminance() - expected).abs() < 1e-12);
    }

    #[test]
    fn relative_luminance_extremes() {
        assert!(BLACK.relative_luminance() < 1e-12);
        assert!((WHITE.relative_luminance() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn display_matches_to_hex() {
        let color = Color::new(171, 205, 239);
        assert_eq!(format!("{color}"), color.to_hex());
    }
}
