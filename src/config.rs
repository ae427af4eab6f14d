use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// Tunables for one engine call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Upper bound on requested colors.
    pub max_colors: usize,
    /// Contrast ratio a rescued legend should clear (WCAG AA for body text).
    pub min_legend_contrast: f64,
    /// Layout looked up on the reference keycap when the request names none.
    pub default_base_layout: String,
}

pub const DEFAULT_MAX_COLORS: usize = 10;
pub const DEFAULT_LEGEND_CONTRAST: f64 = 4.5;

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_colors: DEFAULT_MAX_COLORS,
            min_legend_contrast: DEFAULT_LEGEND_CONTRAST,
            default_base_layout: "Base".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load a JSON config file; absent keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
