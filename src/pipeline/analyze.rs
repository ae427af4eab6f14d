use tracing::debug;

use crate::corpus::Corpus;

/// How many of a group's most frequent body colors are kept.
pub const TOP_COLORS: usize = 3;

/// Historical body-color frequencies for one group id.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub group_id: String,
    /// Color value → occurrence count, in first-seen corpus order.
    pub frequency: Vec<(String, usize)>,
    /// Up to three most frequent colors; ties keep corpus scan order.
    pub top_colors: Vec<String>,
    /// Count of the top color over all occurrences for this group.
    pub dominant_ratio: f64,
}

impl Distribution {
    fn new(group_id: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            frequency: Vec::new(),
            top_colors: Vec::new(),
            dominant_ratio: 0.0,
        }
    }

    fn record(&mut self, color: &str) {
        match self.frequency.iter_mut().find(|(c, _)| c == color) {
            Some((_, count)) => *count += 1,
            None => self.frequency.push((color.to_string(), 1)),
        }
    }

    fn finish(&mut self) {
        let total = self.total();
        let mut sorted: Vec<&(String, usize)> = self.frequency.iter().collect();
        // stable: equal counts stay in scan order
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        self.top_colors = sorted
            .iter()
            .take(TOP_COLORS)
            .map(|(c, _)| c.clone())
            .collect();
        self.dominant_ratio = match sorted.first() {
            Some((_, top)) if total > 0 => *top as f64 / total as f64,
            _ => 0.0,
        };
    }

    pub fn total(&self) -> usize {
        self.frequency.iter().map(|(_, n)| n).sum()
    }

    pub fn count_of(&self, color: &str) -> usize {
        self.frequency
            .iter()
            .find(|(c, _)| c == color)
            .map_or(0, |(_, n)| *n)
    }

    /// The most frequent historical body color.
    pub fn most_common(&self) -> Option<&str> {
        self.top_colors.first().map(String::as_str)
    }
}

/// Per-group distributions, ordered by first appearance of each group in the corpus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distributions {
    groups: Vec<Distribution>,
}

impl Distributions {
    pub fn get(&self, group_id: &str) -> Option<&Distribution> {
        self.groups.iter().find(|d| d.group_id == group_id)
    }

    pub fn group_ids(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|d| d.group_id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Distribution> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Count body colors per group across every layout of every corpus entry.
///
/// Legend colors are not counted. Layouts without color groups contribute nothing,
/// and group records missing an id or a body color are skipped.
pub fn analyze(corpus: &Corpus) -> Distributions {
    let mut groups: Vec<Distribution> = Vec::new();

    for entry in corpus.entries() {
        for group in entry.groups() {
            if !group.is_complete() {
                continue;
            }
            let idx = match groups.iter().position(|d| d.group_id == group.id) {
                Some(idx) => idx,
                None => {
                    groups.push(Distribution::new(&group.id));
                    groups.len() - 1
                }
            };
            groups[idx].record(&group.approx);
        }
    }

    for distribution in &mut groups {
        distribution.finish();
    }
    debug!(groups = groups.len(), "analyzed corpus distributions");

    Distributions { groups }
}
