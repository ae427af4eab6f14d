use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{distance, ColorTable};
use crate::color::Color;
use crate::corpus::{ColorInput, ColorKind, Corpus, ReferenceEntry};
use crate::pipeline::analyze::{Distribution, Distributions};

/// Groups filled first when no reference pattern matches the request size.
pub const PRIORITY_GROUPS: [&str; 6] = ["alpha", "modifier", "num", "function", "nav", "special"];

/// One group's final body and legend colors, each in its original representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedGroup {
    pub id: String,
    pub approx: String,
    pub legend: String,
    pub approx_type: ColorKind,
    pub legend_type: ColorKind,
}

impl AssignedGroup {
    pub fn new(id: &str, body: &ColorInput, legend: &ColorInput) -> Self {
        Self {
            id: id.to_string(),
            approx: body.value.clone(),
            legend: legend.value.clone(),
            approx_type: body.kind,
            legend_type: legend.kind,
        }
    }

    pub fn body(&self) -> ColorInput {
        ColorInput {
            kind: self.approx_type,
            value: self.approx.clone(),
        }
    }

    pub fn legend(&self) -> ColorInput {
        ColorInput {
            kind: self.legend_type,
            value: self.legend.clone(),
        }
    }
}

/// Ordered group id → (body, legend) mapping returned to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Assignment {
    pub groups: Vec<AssignedGroup>,
}

impl Assignment {
    /// Insert a group, replacing an earlier entry with the same id in place.
    pub fn upsert(&mut self, group: AssignedGroup) {
        match self.groups.iter_mut().find(|g| g.id == group.id) {
            Some(existing) => *existing = group,
            None => self.groups.push(group),
        }
    }

    pub fn get(&self, group_id: &str) -> Option<&AssignedGroup> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssignedGroup> {
        self.groups.iter()
    }
}

/// Legend convention shared by both learned-pattern paths: alpha takes the second
/// color in `order`, every other group the first.
fn legend_slot(group_id: &str, order: &[usize]) -> usize {
    if group_id == "alpha" && order.len() > 1 {
        order[1]
    } else {
        order[0]
    }
}

/// Place the requested colors onto groups using patterns learned from the corpus.
///
/// Reference layouts with exactly as many distinct body colors as requested are
/// preferred; otherwise groups are filled greedily by historical frequency.
pub fn assign_groups(
    requested: &[ColorInput],
    corpus: &Corpus,
    distributions: &Distributions,
    table: &ColorTable,
) -> Assignment {
    if requested.is_empty() {
        return Assignment::default();
    }
    let rgb: Vec<Option<Color>> = requested.iter().map(|c| table.rgb(&c.value)).collect();

    if let Some(assignment) = assign_from_pattern(requested, &rgb, corpus, table) {
        if !assignment.is_empty() {
            return assignment;
        }
    }

    info!(
        colors = requested.len(),
        "no reference pattern with matching color count, falling back to group frequencies"
    );
    assign_by_frequency(requested, &rgb, distributions, table)
}

/// A reference layout whose distinct body colors number exactly the request size.
struct Candidate<'a> {
    entry: ReferenceEntry<'a>,
    bodies: Vec<&'a str>,
    rgb: Vec<Option<Color>>,
}

fn assign_from_pattern(
    requested: &[ColorInput],
    rgb: &[Option<Color>],
    corpus: &Corpus,
    table: &ColorTable,
) -> Option<Assignment> {
    let mut best: Option<(Candidate<'_>, f64)> = None;
    for entry in corpus.entries() {
        let bodies = entry.distinct_bodies();
        if bodies.len() != requested.len() {
            continue;
        }
        let candidate_rgb: Vec<Option<Color>> = bodies.iter().map(|b| table.rgb(b)).collect();
        let cost = similarity(rgb, &candidate_rgb);
        if best.as_ref().map_or(true, |(_, best_cost)| cost < *best_cost) {
            best = Some((
                Candidate {
                    entry,
                    bodies,
                    rgb: candidate_rgb,
                },
                cost,
            ));
        }
    }

    let (pattern, cost) = best?;
    debug!(
        keycap = %pattern.entry.keycap.name,
        layout = %pattern.entry.layout.name,
        cost,
        "selected reference pattern"
    );

    let mapping = map_slots(rgb, &pattern.rgb);
    let order: Vec<usize> = (0..requested.len()).collect();

    let mut assignment = Assignment::default();
    for group in pattern.entry.groups() {
        if !group.is_complete() {
            continue;
        }
        let body = pattern
            .bodies
            .iter()
            .position(|b| *b == group.approx)
            .and_then(|slot| mapping[slot])
            .unwrap_or(0);
        let legend = legend_slot(&group.id, &order);
        assignment.upsert(AssignedGroup::new(
            &group.id,
            &requested[body],
            &requested[legend],
        ));
    }
    Some(assignment)
}

/// Mean greedy nearest-neighbor distance from requested colors to a pattern.
///
/// Each requested color, in order, takes the closest pattern color not yet taken.
/// This is not an optimal matching and ties go to the earlier pattern color.
fn similarity(requested: &[Option<Color>], pattern: &[Option<Color>]) -> f64 {
    let mut taken = vec![false; pattern.len()];
    let mut total = 0.0;
    for &color in requested {
        let mut nearest: Option<(usize, f64)> = None;
        for (j, &candidate) in pattern.iter().enumerate() {
            if taken[j] {
                continue;
            }
            let d = distance(color, candidate);
            if d < nearest.map_or(f64::INFINITY, |(_, best)| best) {
                nearest = Some((j, d));
            }
        }
        if let Some((j, d)) = nearest {
            total += d;
            taken[j] = true;
        }
    }
    total / requested.len() as f64
}

/// For each pattern color, the index of the requested color standing in for it.
///
/// Pattern colors pick greedily in order; requested colors left over then fill the
/// first pattern colors still unmapped.
fn map_slots(requested: &[Option<Color>], pattern: &[Option<Color>]) -> Vec<Option<usize>> {
    let mut used = vec![false; requested.len()];
    let mut mapping: Vec<Option<usize>> = vec![None; pattern.len()];

    for (slot, &target) in pattern.iter().enumerate() {
        let mut nearest: Option<(usize, f64)> = None;
        for (i, &color) in requested.iter().enumerate() {
            if used[i] {
                continue;
            }
            let d = distance(target, color);
            if d < nearest.map_or(f64::INFINITY, |(_, best)| best) {
                nearest = Some((i, d));
            }
        }
        if let Some((i, _)) = nearest {
            mapping[slot] = Some(i);
            used[i] = true;
        }
    }

    for i in 0..requested.len() {
        if used[i] {
            continue;
        }
        if let Some(slot) = mapping.iter().position(Option::is_none) {
            mapping[slot] = Some(i);
            used[i] = true;
        }
    }
    mapping
}

fn assign_by_frequency(
    requested: &[ColorInput],
    rgb: &[Option<Color>],
    distributions: &Distributions,
    table: &ColorTable,
) -> Assignment {
    // Consumption order over `requested`; picks are swapped into the next slot.
    let mut order: Vec<usize> = (0..requested.len()).collect();
    let mut next = 0;
    let mut bodies: Vec<(&str, usize)> = Vec::new();

    let mut sequence: Vec<&str> = PRIORITY_GROUPS.to_vec();
    sequence.extend(
        distributions
            .group_ids()
            .filter(|id| !PRIORITY_GROUPS.iter().any(|p| p == id)),
    );
    for group_id in sequence {
        if next >= order.len() {
            break;
        }
        let Some(distribution) = distributions.get(group_id) else {
            continue;
        };
        let pick = closest_remaining(distribution, rgb, &order[next..], table);
        order.swap(next, next + pick);
        bodies.push((group_id, order[next]));
        next += 1;
    }

    // Out of colors: remaining groups take the first requested color.
    for distribution in distributions.iter() {
        let id = distribution.group_id.as_str();
        if distribution.most_common().is_some() && !bodies.iter().any(|(g, _)| *g == id) {
            bodies.push((id, order[0]));
        }
    }

    let mut assignment = Assignment::default();
    for (group_id, body) in bodies {
        let legend = legend_slot(group_id, &order);
        assignment.upsert(AssignedGroup::new(
            group_id,
            &requested[body],
            &requested[legend],
        ));
    }
    assignment
}

/// Offset within `pending` of the color closest to the group's most common body color.
fn closest_remaining(
    distribution: &Distribution,
    rgb: &[Option<Color>],
    pending: &[usize],
    table: &ColorTable,
) -> usize {
    let Some(common) = distribution.most_common() else {
        return 0;
    };
    let target = table.rgb(common);
    let mut pick = 0;
    let mut min = f64::INFINITY;
    for (offset, &i) in pending.iter().enumerate() {
        let d = distance(target, rgb[i]);
        if d < min {
            min = d;
            pick = offset;
        }
    }
    pick
}
