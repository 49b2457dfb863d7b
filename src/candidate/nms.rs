//! Non-maximum suppression over a normalized score surface.
//!
//! Candidates are generated in raster order over the grid index and fed
//! sequentially into the suppression pass. The visitation order is part of
//! the contract: suppression outcomes among equally-scored near-duplicates
//! depend on it, so candidate generation must never run concurrently or
//! unordered.

use crate::candidate::{sort_hits_asc, Hit};
use crate::grid::ScoreGrid;

/// Selects hits whose normalized score is strictly below `tolerance`.
///
/// `min_dist <= 0` disables suppression. An empty result is a valid
/// outcome, not an error.
pub fn select(grid: &ScoreGrid, tolerance: f64, min_dist: i32) -> Vec<Hit> {
    select_outside(grid, tolerance, f64::INFINITY, min_dist)
}

/// Selects hits whose normalized score is strictly above `threshold`.
///
/// Suppression still prefers the lower score of two conflicting hits, the
/// same as [`select`].
pub fn select_above(grid: &ScoreGrid, threshold: f64, min_dist: i32) -> Vec<Hit> {
    select_outside(grid, f64::NEG_INFINITY, threshold, min_dist)
}

/// Selects hits scoring strictly below `low` or strictly above `high`,
/// suppressed as one candidate stream and sorted ascending by score.
pub fn select_outside(grid: &ScoreGrid, low: f64, high: f64, min_dist: i32) -> Vec<Hit> {
    let rect = grid.rect();
    let mut accepted: Vec<Hit> = Vec::new();
    for (index, &score) in grid.values().iter().enumerate() {
        if score < low || score > high {
            let (x, y) = rect.coords(index);
            push_suppressed(&mut accepted, Hit { x, y, score }, min_dist);
        }
    }
    sort_hits_asc(&mut accepted);
    accepted
}

/// Appends `hit` unless it conflicts with an already accepted hit.
///
/// Only the first accepted hit within `min_dist` is considered: the better
/// of the two keeps that slot and scanning stops. The candidate is not
/// re-checked against later accepted hits, so the result is not a globally
/// optimal suppression; downstream consumers rely on this exact policy.
fn push_suppressed(accepted: &mut Vec<Hit>, hit: Hit, min_dist: i32) {
    if min_dist > 0 {
        for a in accepted.iter_mut() {
            if a.chebyshev_dist(&hit) < min_dist {
                if hit.score < a.score {
                    *a = hit;
                }
                return;
            }
        }
    }
    accepted.push(hit);
}

#[cfg(test)]
mod tests {
    use super::{select, select_above, select_outside};
    use crate::candidate::Hit;
    use crate::grid::{ScoreGrid, SearchRect};

    fn grid_from(rect: SearchRect, values: Vec<f64>) -> ScoreGrid {
        ScoreGrid::from_vec(rect, values).unwrap()
    }

    #[test]
    fn single_minimum_is_detected() {
        let rect = SearchRect::new(0, 0, 10, 10).unwrap();
        let mut values = vec![1.0; 100];
        values[rect.offset(2, 2)] = 0.1;
        let raw = grid_from(rect, values);
        let normalized = raw.normalize_with(0.0, 2.0).unwrap();

        let hits = select(&normalized, 0.3, 10);
        assert_eq!(hits, vec![Hit { x: 2, y: 2, score: 0.05 }]);
    }

    #[test]
    fn zero_tolerance_yields_no_hits() {
        let rect = SearchRect::new(0, 0, 4, 4).unwrap();
        let grid = grid_from(rect, vec![0.0; 16]);
        assert!(select(&grid, 0.0, 3).is_empty());
    }

    #[test]
    fn zero_min_dist_disables_suppression() {
        let rect = SearchRect::new(0, 0, 4, 1).unwrap();
        let grid = grid_from(rect, vec![0.1, 0.2, 0.9, 0.3]);
        let hits = select(&grid, 0.5, 0);
        assert_eq!(
            hits,
            vec![
                Hit { x: 0, y: 0, score: 0.1 },
                Hit { x: 1, y: 0, score: 0.2 },
                Hit { x: 3, y: 0, score: 0.3 },
            ]
        );
    }

    #[test]
    fn conflicting_candidate_replaces_worse_hit_in_place() {
        // Raster stream: 0.5 accepted, 0.3 replaces it, 0.4 conflicts with
        // the survivor and is discarded.
        let rect = SearchRect::new(0, 0, 3, 1).unwrap();
        let grid = grid_from(rect, vec![0.5, 0.3, 0.4]);
        let hits = select(&grid, 1.0, 2);
        assert_eq!(hits, vec![Hit { x: 1, y: 0, score: 0.3 }]);
    }

    #[test]
    fn only_first_conflicting_hit_is_considered() {
        // Hits at (0,0) and (4,0) are accepted first. The candidate at
        // (2,1) conflicts with both, but only the first accepted hit is
        // checked: it takes that slot and is never compared against the
        // second, even though the replacement ends up within min_dist of it.
        let rect = SearchRect::new(0, 0, 5, 2).unwrap();
        let grid = grid_from(
            rect,
            vec![0.4, 1.0, 1.0, 1.0, 0.2, 1.0, 1.0, 0.1, 1.0, 1.0],
        );
        let hits = select(&grid, 0.5, 3);
        assert_eq!(
            hits,
            vec![
                Hit { x: 2, y: 1, score: 0.1 },
                Hit { x: 4, y: 0, score: 0.2 },
            ]
        );
    }

    #[test]
    fn pairwise_distance_honors_min_dist() {
        let rect = SearchRect::new(0, 0, 8, 8).unwrap();
        let mut values = vec![1.0; 64];
        values[rect.offset(1, 1)] = 0.05;
        values[rect.offset(2, 2)] = 0.1;
        values[rect.offset(6, 6)] = 0.2;
        let grid = grid_from(rect, values);

        let min_dist = 3;
        let hits = select(&grid, 0.5, min_dist);
        assert_eq!(hits.len(), 2);
        for (i, a) in hits.iter().enumerate() {
            for b in hits.iter().skip(i + 1) {
                assert!(a.chebyshev_dist(b) >= min_dist);
            }
        }
    }

    #[test]
    fn high_side_hits_are_selected_above_threshold() {
        let rect = SearchRect::new(0, 0, 4, 1).unwrap();
        let grid = grid_from(rect, vec![0.2, 0.95, 0.5, 0.85]);
        let hits = select_above(&grid, 0.8, 0);
        assert_eq!(
            hits,
            vec![
                Hit { x: 3, y: 0, score: 0.85 },
                Hit { x: 1, y: 0, score: 0.95 },
            ]
        );
    }

    #[test]
    fn band_selection_merges_both_sides_in_one_stream() {
        let rect = SearchRect::new(0, 0, 5, 1).unwrap();
        let grid = grid_from(rect, vec![0.05, 0.5, 0.95, 0.5, 0.1]);
        let hits = select_outside(&grid, 0.2, 0.9, 0);
        assert_eq!(
            hits,
            vec![
                Hit { x: 0, y: 0, score: 0.05 },
                Hit { x: 4, y: 0, score: 0.1 },
                Hit { x: 2, y: 0, score: 0.95 },
            ]
        );
    }
}
