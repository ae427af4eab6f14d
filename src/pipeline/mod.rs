pub mod analyze;
pub mod assign;
pub mod contrast;
pub mod remap;

use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::ColorTable;
use crate::config::EngineConfig;
use crate::corpus::{cache_key, Corpus, GroupAssignment, Request};
use crate::error::Result;

use analyze::analyze;
use assign::{assign_groups, Assignment};
use remap::remap_groups;

/// Result of one engine call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    #[serde(rename = "colorGroups")]
    pub assignment: Assignment,
    /// The reference layout's original groups when the request named one.
    #[serde(rename = "baseColorGroups", skip_serializing_if = "Option::is_none")]
    pub base_groups: Option<Vec<GroupAssignment>>,
    /// Order-independent key over the requested colors.
    pub cache_key: String,
}

/// Validate a request and produce its group assignment.
///
/// A usable reference layout named by the request is recolored directly; otherwise
/// colors are placed using patterns learned from the whole corpus.
pub fn generate(corpus: &Corpus, request: &Request, config: &EngineConfig) -> Result<Outcome> {
    let inputs = request.validated_inputs(config)?;
    let table = ColorTable::from_corpus(corpus);
    let key = cache_key(&inputs);

    if let Some(reference) = reference_groups(corpus, request, config) {
        info!(groups = reference.len(), "recoloring reference layout");
        let assignment = remap_groups(reference, &inputs, &table, config.min_legend_contrast);
        return Ok(Outcome {
            assignment,
            base_groups: Some(reference.to_vec()),
            cache_key: key,
        });
    }

    if corpus.is_empty() {
        info!("empty corpus, no patterns to learn from");
    }
    let distributions = analyze(corpus);
    let assignment = assign_groups(&inputs, corpus, &distributions, &table);
    info!(groups = assignment.len(), "placed colors by learned pattern");
    Ok(Outcome {
        assignment,
        base_groups: None,
        cache_key: key,
    })
}

/// Color groups of the reference layout a request asks for, if it names a usable one.
fn reference_groups<'a>(
    corpus: &'a Corpus,
    request: &Request,
    config: &EngineConfig,
) -> Option<&'a [GroupAssignment]> {
    if !request.use_base_image_colors {
        return None;
    }
    let query = request.base_layout_keycap.as_deref()?;
    let Some(keycap) = corpus.find_keycap(query) else {
        warn!(keycap = query, "reference keycap not found");
        return None;
    };
    let layout_name = request
        .base_layout_name
        .as_deref()
        .unwrap_or(&config.default_base_layout);
    let Some(layout) = keycap
        .layouts
        .iter()
        .find(|l| l.name.eq_ignore_ascii_case(layout_name))
    else {
        let available: Vec<&str> = keycap.layouts.iter().map(|l| l.name.as_str()).collect();
        warn!(
            keycap = %keycap.name,
            layout = layout_name,
            ?available,
            "reference layout not found"
        );
        return None;
    };
    if layout.groups().is_empty() {
        warn!(
            keycap = %keycap.name,
            layout = %layout.name,
            "reference layout has no color groups"
        );
        return None;
    }
    Some(layout.groups())
}
