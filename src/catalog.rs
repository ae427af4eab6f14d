//! Bidirectional lookup between named color codes and RGB.

use std::collections::HashMap;

use tracing::debug;

use crate::color::Color;
use crate::corpus::Corpus;
use crate::error::{EngineError, Result};

/// Standard GMK color codes and their canonical hex values.
pub const STANDARD_COLORS: &[(&str, &str)] = &[
    ("CR", "#171718"),
    ("N9", "#393b3b"),
    ("CC", "#67635b"),
    ("2B", "#727474"),
    ("BJ", "#91867a"),
    ("CB", "#9b9284"),
    ("U9", "#aca693"),
    ("L9", "#d8d2c3"),
    ("T9", "#c3c3ba"),
    ("3K", "#ccc6c0"),
    ("2M", "#c6c9c7"),
    ("GR1", "#c5c7ca"),
    ("GR2", "#8c8e91"),
    ("CP", "#e1dbd1"),
    ("WS1", "#f7f2ea"),
    ("WS2", "#ebe3d4"),
    ("WS4", "#eee2d0"),
    ("BR1", "#653c25"),
    ("N7", "#00773a"),
    ("AE", "#689b34"),
    ("3B", "#768e72"),
    ("3A", "#7fa580"),
    ("V4", "#00589f"),
    ("N5", "#0084c2"),
    ("V3", "#5e7bb4"),
    ("TU1", "#00627a"),
    ("TU2", "#00a4a9"),
    ("DY", "#5d437e"),
    ("RO1", "#8d242f"),
    ("P3", "#bc251e"),
    ("V1", "#d02f1c"),
    ("RO2", "#dd1126"),
    ("3C", "#c87e74"),
    ("MG1", "#cb3d6e"),
    ("V2", "#ee6900"),
    ("N6", "#e5a100"),
    ("CV", "#f8c200"),
    ("GE1", "#ebd400"),
];

#[derive(Debug, Clone)]
struct CatalogEntry {
    code: String,
    hex: String,
    rgb: Color,
}

/// Code ↔ hex table built fresh for each call.
///
/// Iteration order is corpus scan order followed by the standard table; the first
/// hex seen for a code wins and later duplicates are ignored.
#[derive(Debug, Clone, Default)]
pub struct ColorTable {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl ColorTable {
    /// Table holding only the standard codes.
    pub fn standard() -> Self {
        let mut table = Self::default();
        table.extend_standard();
        table
    }

    /// Scan every keycap's own vocabulary, then fill gaps from the standard codes.
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let mut table = Self::default();
        for keycap in &corpus.keycaps {
            for color in keycap.colors.iter().flatten() {
                if !color.gmk_code {
                    continue;
                }
                if let Some(hex) = &color.hex {
                    table.insert(&color.code, hex);
                }
            }
        }
        let from_corpus = table.len();
        table.extend_standard();
        debug!(
            from_corpus,
            total = table.len(),
            "built color table"
        );
        table
    }

    fn extend_standard(&mut self) {
        for (code, hex) in STANDARD_COLORS {
            self.insert(code, hex);
        }
    }

    /// First write wins; unparseable hex values are skipped.
    fn insert(&mut self, code: &str, hex: &str) {
        if code.is_empty() || self.index.contains_key(code) {
            return;
        }
        let Ok(rgb) = Color::from_hex(hex) else {
            debug!(code, hex, "skipping catalog color with malformed hex");
            return;
        };
        self.index.insert(code.to_string(), self.entries.len());
        self.entries.push(CatalogEntry {
            code: code.to_string(),
            hex: hex.to_string(),
            rgb,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Codes in catalog iteration order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.code.as_str())
    }

    /// Hex value registered for `code`.
    pub fn hex_of(&self, code: &str) -> Option<&str> {
        self.index.get(code).map(|&i| self.entries[i].hex.as_str())
    }

    /// RGB for a color value: hex strings are parsed as-is, anything else is looked up.
    pub fn resolve(&self, value: &str) -> Result<Color> {
        if value.starts_with('#') {
            return Color::from_hex(value)
                .map_err(|_| EngineError::UnresolvedColor(value.to_string()));
        }
        self.index
            .get(value)
            .map(|&i| self.entries[i].rgb)
            .ok_or_else(|| EngineError::UnresolvedColor(value.to_string()))
    }

    /// Like [`resolve`](Self::resolve), but an unresolved value is logged and yields `None`.
    pub fn rgb(&self, value: &str) -> Option<Color> {
        match self.resolve(value) {
            Ok(color) => Some(color),
            Err(err) => {
                debug!(%err, "color passes through without RGB");
                None
            }
        }
    }

    /// Nearest catalog code to a hex color by RGB distance.
    ///
    /// Ties go to the code met first in iteration order. `None` when the hex is
    /// malformed or the table is empty.
    pub fn code_of(&self, hex: &str) -> Option<&str> {
        let target = Color::from_hex(hex).ok()?;
        let mut best: Option<(&str, f64)> = None;
        for entry in &self.entries {
            let distance = target.distance(entry.rgb);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((entry.code.as_str(), distance));
            }
        }
        best.map(|(code, _)| code)
    }
}

/// Distance between two optional colors; unresolved colors are infinitely far.
pub fn distance(a: Option<Color>, b: Option<Color>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => a.distance(b),
        _ => f64::INFINITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{CatalogColor, Keycap};

    fn keycap_with_colors(name: &str, colors: &[(&str, &str, bool)]) -> Keycap {
        Keycap {
            name: name.to_string(),
            layouts: Vec::new(),
            colors: Some(
                colors
                    .iter()
                    .map(|(code, hex, gmk)| CatalogColor {
                        code: code.to_string(),
                        name: code.to_string(),
                        hex: Some(hex.to_string()),
                        gmk_code: *gmk,
                    })
                    .collect(),
            ),
        }
    }

    #[test]
    fn standard_table_is_complete() {
        let table = ColorTable::standard();
        assert!(table.len() >= 38);
        for (code, hex) in STANDARD_COLORS {
            assert_eq!(table.hex_of(code), Some(*hex));
            assert!(Color::from_hex(hex).is_ok(), "{code} has bad hex {hex}");
        }
    }

    #[test]
    fn corpus_first_write_wins() {
        let corpus = Corpus::new(vec![
            keycap_with_colors("A", &[("CR", "#000000", true), ("XX", "#123456", true)]),
            keycap_with_colors("B", &[("CR", "#ffffff", true), ("XX", "#654321", true)]),
        ]);
        let table = ColorTable::from_corpus(&corpus);
        assert_eq!(table.hex_of("CR"), Some("#000000"));
        assert_eq!(table.hex_of("XX"), Some("#123456"));
        // standard codes fill the rest
        assert_eq!(table.hex_of("N9"), Some("#393b3b"));
    }

    #[test]
    fn non_gmk_and_malformed_colors_are_skipped() {
        let corpus = Corpus::new(vec![keycap_with_colors(
            "A",
            &[("ZZ", "#101010", false), ("YY", "not-a-hex", true)],
        )]);
        let table = ColorTable::from_corpus(&corpus);
        assert_eq!(table.hex_of("ZZ"), None);
        assert_eq!(table.hex_of("YY"), None);
    }

    #[test]
    fn iteration_order_is_corpus_then_standard() {
        let corpus = Corpus::new(vec![keycap_with_colors("A", &[("N9", "#393b3b", true)])]);
        let table = ColorTable::from_corpus(&corpus);
        let codes: Vec<&str> = table.codes().take(2).collect();
        assert_eq!(codes, vec!["N9", "CR"]);
    }

    #[test]
    fn resolve_hex_as_is_and_codes_by_lookup() {
        let table = ColorTable::standard();
        assert_eq!(table.resolve("#FF0000").unwrap(), Color::new(255, 0, 0));
        assert_eq!(table.resolve("CR").unwrap(), Color::new(0x17, 0x17, 0x18));
        assert!(matches!(
            table.resolve("NOPE"),
            Err(EngineError::UnresolvedColor(code)) if code == "NOPE"
        ));
        assert!(table.rgb("#12").is_none());
    }

    #[test]
    fn code_of_finds_nearest() {
        let table = ColorTable::standard();
        assert_eq!(table.code_of("#171718"), Some("CR"));
        assert_eq!(table.code_of("#000000"), Some("CR"));
        assert_eq!(table.code_of("#f8c201"), Some("CV"));
        assert_eq!(table.code_of("bogus"), None);
        assert_eq!(ColorTable::default().code_of("#000000"), None);
    }

    #[test]
    fn code_of_tie_goes_to_first_code() {
        let corpus = Corpus::new(vec![keycap_with_colors(
            "A",
            &[("LO", "#000000", true), ("HI", "#020202", true)],
        )]);
        let table = ColorTable::from_corpus(&corpus);
        assert_eq!(table.code_of("#010101"), Some("LO"));
    }

    #[test]
    fn code_of_is_idempotent() {
        let table = ColorTable::standard();
        let first = table.code_of("#4a7f9c");
        assert_eq!(first, table.code_of("#4a7f9c"));
        assert!(first.is_some());
    }

    #[test]
    fn distance_with_unresolved_is_infinite() {
        let black = Some(Color::new(0, 0, 0));
        assert!(distance(black, None).is_infinite());
        assert!(distance(None, None).is_infinite());
        assert_eq!(distance(black, black), 0.0);
    }
}
