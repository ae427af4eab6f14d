use tracing::debug;

use crate::color::Color;

/// Choose the candidate with the highest WCAG contrast against `body`.
///
/// The pick is returned even when it stays under `min_contrast`; that case is only
/// logged. Ties go to the earlier candidate. Returns `None` with no candidates.
pub fn legible_legend(
    body: Color,
    candidates: &[(usize, Color)],
    min_contrast: f64,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for &(idx, color) in candidates {
        let ratio = Color::contrast_ratio(&body, &color);
        if best.map_or(true, |(_, r)| ratio > r) {
            best = Some((idx, ratio));
        }
    }
    if let Some((_, ratio)) = best {
        if ratio < min_contrast {
            debug!(
                ratio,
                min_contrast,
                body = %body,
                "no legend candidate clears the contrast threshold"
            );
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_LEGEND_CONTRAST;

    const DARK: Color = Color::new(16, 16, 16);
    const LIGHT: Color = Color::new(238, 238, 238);
    const GRAY: Color = Color::new(90, 90, 90);

    #[test]
    fn highest_contrast_wins_over_readable_runner_up() {
        let mid = Color::new(128, 128, 128);
        assert!(Color::contrast_ratio(&DARK, &mid) >= DEFAULT_LEGEND_CONTRAST);
        let pick = legible_legend(DARK, &[(1, mid), (2, LIGHT)], DEFAULT_LEGEND_CONTRAST);
        assert_eq!(pick, Some(2));
    }

    #[test]
    fn candidate_order_does_not_matter() {
        let pick = legible_legend(DARK, &[(2, LIGHT), (1, GRAY)], DEFAULT_LEGEND_CONTRAST);
        assert_eq!(pick, Some(2));
    }

    #[test]
    fn best_available_when_nothing_clears_threshold() {
        let near_dark = Color::new(30, 30, 30);
        let pick = legible_legend(DARK, &[(0, near_dark), (1, GRAY)], DEFAULT_LEGEND_CONTRAST);
        assert!(Color::contrast_ratio(&DARK, &GRAY) < DEFAULT_LEGEND_CONTRAST);
        assert_eq!(pick, Some(1));
    }

    #[test]
    fn no_candidates() {
        assert_eq!(legible_legend(DARK, &[], DEFAULT_LEGEND_CONTRAST), None);
    }
}
