//! SAD correlation kernel.
//!
//! Scores every candidate origin in a search rectangle with the sum of
//! absolute differences between object and field intensities. Lower is
//! better; a pixel-identical placement scores exactly zero.

use crate::grid::{ScoreGrid, SearchRect};
use crate::image::ImageView;
use crate::trace::{trace_event, trace_span};
use crate::util::{ObjMatchError, ObjMatchResult};

#[cfg(feature = "rayon")]
pub mod rayon;

/// Returns the largest search rectangle in which the object fits at every
/// origin: `(0,0)-(field_w - object_w + 1, field_h - object_h + 1)`.
pub fn full_search_rect(
    field: ImageView<'_, f64>,
    object: ImageView<'_, f64>,
) -> ObjMatchResult<SearchRect> {
    let field_width = field.width();
    let field_height = field.height();
    let object_width = object.width();
    let object_height = object.height();
    if field_width < object_width || field_height < object_height {
        return Err(ObjMatchError::SearchOutOfBounds {
            min_x: 0,
            min_y: 0,
            max_x: field_width as i32,
            max_y: field_height as i32,
            field_width,
            field_height,
            object_width,
            object_height,
        });
    }
    SearchRect::new(
        0,
        0,
        (field_width - object_width + 1) as i32,
        (field_height - object_height + 1) as i32,
    )
}

/// Checks that every origin in `rect` admits a fully in-bounds placement
/// of the object.
pub(crate) fn validate_placements(
    field: ImageView<'_, f64>,
    object: ImageView<'_, f64>,
    rect: SearchRect,
) -> ObjMatchResult<()> {
    let out_of_bounds = rect.min_x < 0
        || rect.min_y < 0
        || i64::from(rect.max_x) - 1 + object.width() as i64 > field.width() as i64
        || i64::from(rect.max_y) - 1 + object.height() as i64 > field.height() as i64;
    if out_of_bounds {
        return Err(ObjMatchError::SearchOutOfBounds {
            min_x: rect.min_x,
            min_y: rect.min_y,
            max_x: rect.max_x,
            max_y: rect.max_y,
            field_width: field.width(),
            field_height: field.height(),
            object_width: object.width(),
            object_height: object.height(),
        });
    }
    Ok(())
}

/// Computes the SAD score for a single placement with origin `(u, v)`.
///
/// The caller must ensure the placement is fully in bounds.
pub fn sad_at(field: ImageView<'_, f64>, object: ImageView<'_, f64>, u: usize, v: usize) -> f64 {
    let mut sum = 0.0f64;
    for y in 0..object.height() {
        let field_row = field.row(v + y).expect("row within bounds");
        let object_row = object.row(y).expect("row within bounds");
        for x in 0..object.width() {
            sum += (field_row[u + x] - object_row[x]).abs();
        }
    }
    sum
}

/// Scores every origin in `rect` sequentially.
pub fn scan_full(
    field: ImageView<'_, f64>,
    object: ImageView<'_, f64>,
    rect: SearchRect,
) -> ObjMatchResult<ScoreGrid> {
    scan_full_with_progress(field, object, rect, |_| {})
}

/// Scores every origin in `rect` sequentially, reporting the completed
/// fraction after each row.
pub fn scan_full_with_progress(
    field: ImageView<'_, f64>,
    object: ImageView<'_, f64>,
    rect: SearchRect,
    mut progress: impl FnMut(f64),
) -> ObjMatchResult<ScoreGrid> {
    validate_placements(field, object, rect)?;
    let _span = trace_span!("scan_full", width = rect.width(), height = rect.height()).entered();

    let width = rect.width();
    let height = rect.height();
    let mut data = vec![0.0f64; rect.len()];
    for (row, row_cells) in data.chunks_mut(width).enumerate() {
        let v = (rect.min_y + row as i32) as usize;
        for (i, cell) in row_cells.iter_mut().enumerate() {
            let u = (rect.min_x + i as i32) as usize;
            *cell = sad_at(field, object, u, v);
        }
        progress((row + 1) as f64 / height as f64);
    }

    trace_event!("scan_complete", cells = rect.len());
    ScoreGrid::from_vec(rect, data)
}
