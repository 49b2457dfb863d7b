//! High-level matching pipeline.
//!
//! [`match_object`] runs correlate -> normalize -> select as an
//! all-or-nothing sequence: a failure in an earlier phase prevents any
//! output from the later ones. Callers needing finer control (progress
//! meters, degenerate-range recovery for debug rendering) compose the
//! phase functions from [`crate::kernel`], [`crate::grid::ScoreGrid`] and
//! [`crate::candidate::nms`] directly.

use crate::candidate::nms::select_outside;
use crate::candidate::Hit;
use crate::grid::{ScoreGrid, SearchRect};
use crate::image::ImageView;
use crate::kernel;
use crate::trace::{trace_event, trace_span};
use crate::util::ObjMatchResult;

/// How engine-local origin coordinates are re-expressed in output hits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputOffset {
    /// Report the object's top-left placement origin unchanged.
    TopLeft,
    /// Center each hit on the object's geometric center.
    #[default]
    ObjectCenter,
    /// Apply a caller-supplied shift.
    Shift {
        /// Shift applied to each hit's x coordinate.
        dx: i32,
        /// Shift applied to each hit's y coordinate.
        dy: i32,
    },
}

/// Configuration for [`match_object`].
#[derive(Clone, Debug)]
pub struct MatchConfig {
    /// Candidate origins to score. `None` uses the full field bounds
    /// adjusted so the object always fits.
    pub search: Option<SearchRect>,
    /// Upper bound (exclusive) on normalized score for a hit. Zero yields
    /// no hits by construction.
    pub tolerance: f64,
    /// Optional lower bound (exclusive): also report hits scoring above
    /// this value (anti-matches). `None` disables the high side.
    pub high: Option<f64>,
    /// Minimum Chebyshev distance between hits. `None` or a negative value
    /// defaults to `max(object width, object height)`; zero disables
    /// suppression.
    pub min_dist: Option<i32>,
    /// Output coordinate convention.
    pub offset: OutputOffset,
    /// Use the row-parallel scan. Falls back to the sequential scan when
    /// the `rayon` feature is disabled.
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            search: None,
            tolerance: 0.0,
            high: None,
            min_dist: None,
            offset: OutputOffset::default(),
            parallel: false,
        }
    }
}

/// Full pipeline output.
#[derive(Debug)]
pub struct MatchReport {
    /// Accepted hits, ascending by score. May be empty.
    pub hits: Vec<Hit>,
    /// Raw SAD minimum the grid was normalized by.
    pub score_min: f64,
    /// Raw SAD maximum the grid was normalized by.
    pub score_max: f64,
    /// Normalized score surface, kept for debug rendering.
    pub normalized: ScoreGrid,
}

/// Locates the object inside the field and returns the ranked hit list.
pub fn match_object(
    field: ImageView<'_, f64>,
    object: ImageView<'_, f64>,
    cfg: &MatchConfig,
) -> ObjMatchResult<MatchReport> {
    let rect = match cfg.search {
        Some(rect) => rect,
        None => kernel::full_search_rect(field, object)?,
    };
    let _span = trace_span!("match_object", origins = rect.len()).entered();

    let raw = if cfg.parallel {
        scan_parallel(field, object, rect)?
    } else {
        kernel::scan_full(field, object, rect)?
    };
    let (normalized, score_min, score_max) = raw.normalize()?;

    let min_dist = effective_min_dist(cfg.min_dist, object);
    let high = cfg.high.unwrap_or(f64::INFINITY);
    let mut hits = select_outside(&normalized, cfg.tolerance, high, min_dist);

    let (dx, dy) = match cfg.offset {
        OutputOffset::TopLeft => (0, 0),
        OutputOffset::ObjectCenter => ((object.width() / 2) as i32, (object.height() / 2) as i32),
        OutputOffset::Shift { dx, dy } => (dx, dy),
    };
    if (dx, dy) != (0, 0) {
        for hit in hits.iter_mut() {
            *hit = hit.translate(dx, dy);
        }
    }

    trace_event!("hits_selected", count = hits.len());
    Ok(MatchReport {
        hits,
        score_min,
        score_max,
        normalized,
    })
}

/// Resolves the configured minimum hit distance against the object size.
pub fn effective_min_dist(min_dist: Option<i32>, object: ImageView<'_, f64>) -> i32 {
    match min_dist {
        Some(d) if d >= 0 => d,
        _ => object.width().max(object.height()) as i32,
    }
}

#[cfg(feature = "rayon")]
fn scan_parallel(
    field: ImageView<'_, f64>,
    object: ImageView<'_, f64>,
    rect: SearchRect,
) -> ObjMatchResult<ScoreGrid> {
    kernel::rayon::scan_full_par(field, object, rect)
}

#[cfg(not(feature = "rayon"))]
fn scan_parallel(
    field: ImageView<'_, f64>,
    object: ImageView<'_, f64>,
    rect: SearchRect,
) -> ObjMatchResult<ScoreGrid> {
    kernel::scan_full(field, object, rect)
}

#[cfg(test)]
mod tests {
    use super::effective_min_dist;
    use crate::image::ImageView;

    #[test]
    fn min_dist_defaults_to_larger_object_dimension() {
        let data = vec![0.0; 12];
        let object = ImageView::from_slice(&data, 4, 3).unwrap();
        assert_eq!(effective_min_dist(None, object), 4);
        assert_eq!(effective_min_dist(Some(-1), object), 4);
        assert_eq!(effective_min_dist(Some(0), object), 0);
        assert_eq!(effective_min_dist(Some(7), object), 7);
    }
}
