//! Rayon-parallel SAD scan (feature-gated).
//!
//! Parallelizes within each row of the search rectangle and joins at every
//! row boundary. Each task owns exactly one grid cell, so rows need no
//! locking; the per-row join bounds in-flight work to one row's worth of
//! cells and doubles as the progress-reporting checkpoint.

use crate::grid::{ScoreGrid, SearchRect};
use crate::image::ImageView;
use crate::kernel::{sad_at, validate_placements};
use crate::trace::{trace_event, trace_span};
use crate::util::ObjMatchResult;
use rayon::prelude::*;

/// Scores every origin in `rect` with row-parallel workers.
///
/// Produces cell-for-cell identical results to [`crate::kernel::scan_full`].
pub fn scan_full_par(
    field: ImageView<'_, f64>,
    object: ImageView<'_, f64>,
    rect: SearchRect,
) -> ObjMatchResult<ScoreGrid> {
    scan_full_par_with_progress(field, object, rect, |_| {})
}

/// Row-parallel scan reporting the completed fraction after each row joins.
pub fn scan_full_par_with_progress(
    field: ImageView<'_, f64>,
    object: ImageView<'_, f64>,
    rect: SearchRect,
    mut progress: impl FnMut(f64),
) -> ObjMatchResult<ScoreGrid> {
    validate_placements(field, object, rect)?;
    let _span =
        trace_span!("scan_full_par", width = rect.width(), height = rect.height()).entered();

    let width = rect.width();
    let height = rect.height();
    let mut data = vec![0.0f64; rect.len()];
    for (row, row_cells) in data.chunks_mut(width).enumerate() {
        let v = (rect.min_y + row as i32) as usize;
        row_cells.par_iter_mut().enumerate().for_each(|(i, cell)| {
            let u = (rect.min_x + i as i32) as usize;
            *cell = sad_at(field, object, u, v);
        });
        // par_iter_mut completes before returning, so this runs only after
        // every cell in the row has been written.
        progress((row + 1) as f64 / height as f64);
    }

    trace_event!("scan_complete", cells = rect.len());
    ScoreGrid::from_vec(rect, data)
}
