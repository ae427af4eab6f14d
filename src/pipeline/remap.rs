use std::collections::HashSet;

use tracing::debug;

use crate::catalog::{distance, ColorTable};
use crate::color::Color;
use crate::corpus::{ColorInput, ColorKind, GroupAssignment};
use crate::pipeline::assign::{AssignedGroup, Assignment};
use crate::pipeline::contrast::legible_legend;

/// Recolor an explicit reference layout with the requested colors.
///
/// Each group's body and legend take the closest requested color not yet used by an
/// earlier group. A legend that collapses onto its body is replaced by a readable one.
/// With nothing requested the reference groups come back unchanged.
pub fn remap_groups(
    reference: &[GroupAssignment],
    requested: &[ColorInput],
    table: &ColorTable,
    min_contrast: f64,
) -> Assignment {
    if requested.is_empty() {
        return reference_assignment(reference);
    }
    let rgb: Vec<Option<Color>> = requested.iter().map(|c| table.rgb(&c.value)).collect();
    let mut used: HashSet<&str> = HashSet::new();
    let mut assignment = Assignment::default();

    for group in reference {
        let body = closest_unused(table.rgb(&group.approx), requested, &rgb, &used)
            .unwrap_or(0);
        let legend_target = table.rgb(&group.legend);
        let mut legend = closest_unused(legend_target, requested, &rgb, &used);

        if legend.map_or(true, |l| requested[l].value == requested[body].value) {
            legend = rescue_legend(body, requested, &rgb, &used, min_contrast);
            debug!(
                group = %group.id,
                body = %requested[body].value,
                legend = ?legend.map(|l| requested[l].value.as_str()),
                "legend matched body, picked by contrast"
            );
        }
        let legend = legend.unwrap_or(body);

        used.insert(requested[body].value.as_str());
        if requested[legend].value != requested[body].value {
            used.insert(requested[legend].value.as_str());
        }

        assignment.upsert(AssignedGroup::new(
            &group.id,
            &requested[body],
            &requested[legend],
        ));
    }
    assignment
}

/// Index of the requested color nearest to `target`, skipping used values.
fn closest_unused(
    target: Option<Color>,
    requested: &[ColorInput],
    rgb: &[Option<Color>],
    used: &HashSet<&str>,
) -> Option<usize> {
    let target = Some(target?);
    let mut best: Option<(usize, f64)> = None;
    for (i, input) in requested.iter().enumerate() {
        if used.contains(input.value.as_str()) {
            continue;
        }
        let d = distance(target, rgb[i]);
        if d < best.map_or(f64::INFINITY, |(_, min)| min) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// Highest-contrast legend for a body color among the unused requested colors,
/// never the body itself.
fn rescue_legend(
    body: usize,
    requested: &[ColorInput],
    rgb: &[Option<Color>],
    used: &HashSet<&str>,
    min_contrast: f64,
) -> Option<usize> {
    let body_rgb = rgb[body]?;
    let body_value = requested[body].value.as_str();

    let candidates: Vec<(usize, Color)> = requested
        .iter()
        .enumerate()
        .filter(|(_, input)| {
            input.value != body_value && !used.contains(input.value.as_str())
        })
        .filter_map(|(i, _)| rgb[i].map(|color| (i, color)))
        .collect();

    legible_legend(body_rgb, &candidates, min_contrast)
}

fn kind_of(value: &str) -> ColorKind {
    if value.starts_with('#') {
        ColorKind::Hex
    } else {
        ColorKind::Symbolic
    }
}

fn reference_assignment(reference: &[GroupAssignment]) -> Assignment {
    let mut assignment = Assignment::default();
    for group in reference {
        let body = ColorInput {
            kind: kind_of(&group.approx),
            value: group.approx.clone(),
        };
        let legend = ColorInput {
            kind: kind_of(&group.legend),
            value: group.legend.clone(),
        };
        assignment.upsert(AssignedGroup::new(&group.id, &body, &legend));
    }
    assignment
}
