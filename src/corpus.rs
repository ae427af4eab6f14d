//! Reference corpus and request types.
//!
//! The corpus is a list of keycap sets, each with named layouts carrying per-group
//! body ("approx") and legend colors. Entries are deserialized leniently: missing
//! fields default to empty and such entries are skipped by the pipeline stages.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::color::Color;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};

/// A color name from one keycap set's own vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogColor {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hex: Option<String>,
    /// Only colors flagged as standard GMK codes feed the shared catalog.
    #[serde(default)]
    pub gmk_code: bool,
}

/// One group's body and legend colors inside a layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAssignment {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub approx: String,
    #[serde(default)]
    pub legend: String,
}

impl GroupAssignment {
    pub fn new(id: &str, approx: &str, legend: &str) -> Self {
        Self {
            id: id.to_string(),
            approx: approx.to_string(),
            legend: legend.to_string(),
        }
    }

    /// Whether the record names both a group and its body color.
    pub fn is_complete(&self) -> bool {
        !self.id.is_empty() && !self.approx.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color_groups: Option<Vec<GroupAssignment>>,
}

impl Layout {
    /// The layout's groups, or an empty slice when it carries none.
    pub fn groups(&self) -> &[GroupAssignment] {
        self.color_groups.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keycap {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub layouts: Vec<Layout>,
    #[serde(default)]
    pub colors: Option<Vec<CatalogColor>>,
}

/// One (keycap set, layout) pair that carries at least one color group.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceEntry<'a> {
    pub keycap: &'a Keycap,
    pub layout: &'a Layout,
}

impl<'a> ReferenceEntry<'a> {
    pub fn groups(&self) -> &'a [GroupAssignment] {
        self.layout.groups()
    }

    /// Distinct body colors of complete group records, in first-seen order.
    pub fn distinct_bodies(&self) -> Vec<&'a str> {
        let mut seen: Vec<&'a str> = Vec::new();
        for group in self.groups().iter().filter(|g| g.is_complete()) {
            if !seen.contains(&group.approx.as_str()) {
                seen.push(group.approx.as_str());
            }
        }
        seen
    }
}

/// The full reference corpus, borrowed by every stage for the duration of a call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Corpus {
    pub keycaps: Vec<Keycap>,
}

impl Corpus {
    pub fn new(keycaps: Vec<Keycap>) -> Self {
        Self { keycaps }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn is_empty(&self) -> bool {
        self.keycaps.is_empty()
    }

    /// Every layout that has color groups, in corpus scan order.
    pub fn entries(&self) -> impl Iterator<Item = ReferenceEntry<'_>> {
        self.keycaps.iter().flat_map(|keycap| {
            keycap
                .layouts
                .iter()
                .filter(|layout| !layout.groups().is_empty())
                .map(move |layout| ReferenceEntry { keycap, layout })
        })
    }

    /// Find a keycap set by name: exact, then case-insensitive, then substring.
    ///
    /// Matches are tested per entry in scan order, so an earlier substring hit wins
    /// over a later exact one.
    pub fn find_keycap(&self, query: &str) -> Option<&Keycap> {
        let lowered = query.to_lowercase();
        self.keycaps.iter().find(|k| {
            let name = k.name.to_lowercase();
            k.name == query || name == lowered || name.contains(&lowered)
        })
    }
}

/// How a requested color was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorKind {
    /// A code from the named color vocabulary, such as `CR`.
    #[serde(rename = "gmk", alias = "symbolic")]
    Symbolic,
    Hex,
}

impl fmt::Display for ColorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorKind::Symbolic => f.write_str("gmk"),
            ColorKind::Hex => f.write_str("hex"),
        }
    }
}

/// One requested color, tagged with its original representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorInput {
    #[serde(rename = "type")]
    pub kind: ColorKind,
    pub value: String,
}

impl ColorInput {
    pub fn symbolic(code: &str) -> Self {
        Self {
            kind: ColorKind::Symbolic,
            value: code.to_string(),
        }
    }

    pub fn hex(hex: &str) -> Self {
        Self {
            kind: ColorKind::Hex,
            value: hex.to_string(),
        }
    }

    /// Classify a bare string: a leading `#` means hex, anything else a code.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with('#') {
            Self::hex(raw)
        } else {
            Self::symbolic(raw)
        }
    }

    fn validate(&self) -> Result<()> {
        if self.value.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "each color must have a non-empty value".to_string(),
            ));
        }
        if self.kind == ColorKind::Hex {
            Color::from_hex(&self.value)?;
        }
        Ok(())
    }
}

/// A color assignment request as received from the surrounding service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(default)]
    pub colors: Vec<ColorInput>,
    /// Legacy field: bare symbolic codes.
    #[serde(default)]
    pub color_codes: Vec<String>,
    #[serde(default, rename = "baseLayoutKeycapId")]
    pub base_layout_keycap: Option<String>,
    #[serde(default)]
    pub base_layout_name: Option<String>,
    #[serde(default = "default_true")]
    pub use_base_image_colors: bool,
}

fn default_true() -> bool {
    true
}

impl Request {
    pub fn new(colors: Vec<ColorInput>) -> Self {
        Self {
            colors,
            color_codes: Vec::new(),
            base_layout_keycap: None,
            base_layout_name: None,
            use_base_image_colors: true,
        }
    }

    /// Parse a request body. Malformed colors (missing tag or value) are input errors.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| EngineError::InvalidInput(e.to_string()))
    }

    /// The requested colors, preferring tagged `colors` over legacy `colorCodes`.
    pub fn inputs(&self) -> Vec<ColorInput> {
        if !self.colors.is_empty() {
            self.colors.clone()
        } else {
            self.color_codes
                .iter()
                .map(|code| ColorInput::symbolic(code))
                .collect()
        }
    }

    /// Validate and return the requested colors.
    pub fn validated_inputs(&self, config: &EngineConfig) -> Result<Vec<ColorInput>> {
        let inputs = self.inputs();
        if inputs.is_empty() {
            return Err(EngineError::InvalidInput(
                "colors or colorCodes is required and must be a non-empty array".to_string(),
            ));
        }
        if inputs.len() > config.max_colors {
            return Err(EngineError::InvalidInput(format!(
                "colors must not exceed {} items, got {}",
                config.max_colors,
                inputs.len()
            )));
        }
        for input in &inputs {
            input.validate()?;
        }
        Ok(inputs)
    }
}

/// Order-independent key for caching results of a request.
///
/// Values are sorted, joined with `,` and hashed; the first 16 hex digits are kept.
pub fn cache_key(inputs: &[ColorInput]) -> String {
    let mut values: Vec<&str> = inputs.iter().map(|c| c.value.as_str()).collect();
    values.sort_unstable();
    let digest = Sha256::digest(values.join(",").as_bytes());
    let mut key = hex::encode(digest);
    key.truncate(16);
    key
}
