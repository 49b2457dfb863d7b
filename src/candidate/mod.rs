//! Hit records and selection utilities.
//!
//! A `Hit` is an accepted, deduplicated candidate match; hit lists are
//! produced by the suppression pass in [`nms`] and sorted ascending by
//! score (lower is better).

use std::cmp::Ordering;

pub mod nms;

/// Accepted match location with its normalized dissimilarity score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// X coordinate (column) of the hit.
    pub x: i32,
    /// Y coordinate (row) of the hit.
    pub y: i32,
    /// Normalized score in `[0, 1]`; lower means a better match.
    pub score: f64,
}

impl Hit {
    /// Chebyshev (L-infinity) distance to another hit.
    pub fn chebyshev_dist(&self, other: &Hit) -> i32 {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx.max(dy)
    }

    /// Returns the hit translated by `(dx, dy)`.
    ///
    /// Used by callers to re-express engine-local origins in their own
    /// coordinate system, e.g. centering on the object.
    pub fn translate(self, dx: i32, dy: i32) -> Hit {
        Hit {
            x: self.x + dx,
            y: self.y + dy,
            score: self.score,
        }
    }
}

fn hit_cmp_asc(a: &Hit, b: &Hit) -> Ordering {
    a.score
        .total_cmp(&b.score)
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
}

/// Sorts hits by ascending score with deterministic tie-breaking.
pub(crate) fn sort_hits_asc(hits: &mut [Hit]) {
    hits.sort_by(hit_cmp_asc);
}
