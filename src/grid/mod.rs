//! Search rectangles and score grids.
//!
//! A `SearchRect` enumerates the candidate object origins in field
//! coordinates; a `ScoreGrid` holds one dissimilarity score per origin in
//! raster order (x varies fastest). The rect owns the mapping between
//! `(x, y)` origins and flat grid indices.

use crate::util::{ObjMatchError, ObjMatchResult};

/// Integer rectangle over the field's coordinate space, half-open on the
/// maximum edge like `(min_x, min_y)..(max_x, max_y)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchRect {
    /// Inclusive minimum x.
    pub min_x: i32,
    /// Inclusive minimum y.
    pub min_y: i32,
    /// Exclusive maximum x.
    pub max_x: i32,
    /// Exclusive maximum y.
    pub max_y: i32,
}

impl SearchRect {
    /// Creates a rectangle, rejecting non-positive width or height.
    pub fn new(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> ObjMatchResult<Self> {
        if max_x <= min_x || max_y <= min_y {
            return Err(ObjMatchError::InvalidSearchRect {
                min_x,
                min_y,
                max_x,
                max_y,
            });
        }
        Ok(Self {
            min_x,
            min_y,
            max_x,
            max_y,
        })
    }

    /// Returns the rectangle width in origins.
    pub fn width(&self) -> usize {
        (self.max_x - self.min_x) as usize
    }

    /// Returns the rectangle height in origins.
    pub fn height(&self) -> usize {
        (self.max_y - self.min_y) as usize
    }

    /// Returns the number of origins in the rectangle.
    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    /// Returns true if the rectangle contains no origins.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `(x, y)` lies inside the rectangle.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.min_x && x < self.max_x && y >= self.min_y && y < self.max_y
    }

    /// Maps an origin `(x, y)` inside the rectangle to its flat grid index.
    ///
    /// The caller must ensure `(x, y)` is inside the rectangle.
    pub fn offset(&self, x: i32, y: i32) -> usize {
        debug_assert!(self.contains(x, y));
        (x - self.min_x) as usize + self.width() * (y - self.min_y) as usize
    }

    /// Maps a flat grid index back to its origin `(x, y)`.
    ///
    /// Inverse of [`SearchRect::offset`] for every index below
    /// [`SearchRect::len`].
    pub fn coords(&self, index: usize) -> (i32, i32) {
        let w = self.width();
        let x = self.min_x + (index % w) as i32;
        let y = self.min_y + (index / w) as i32;
        (x, y)
    }
}

/// Dense per-origin score surface over a search rectangle.
///
/// Raw grids hold SAD sums; normalized grids hold confidence values in
/// `[0, 1]` where lower means a better match.
#[derive(Clone, Debug)]
pub struct ScoreGrid {
    rect: SearchRect,
    data: Vec<f64>,
}

impl ScoreGrid {
    /// Creates a grid from per-origin values in raster order.
    pub fn from_vec(rect: SearchRect, data: Vec<f64>) -> ObjMatchResult<Self> {
        if data.len() != rect.len() {
            return Err(ObjMatchError::GridSizeMismatch {
                expected: rect.len(),
                got: data.len(),
            });
        }
        Ok(Self { rect, data })
    }

    /// Returns the search rectangle this grid covers.
    pub fn rect(&self) -> SearchRect {
        self.rect
    }

    /// Returns the scores in raster order.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    /// Returns the score at origin `(x, y)`.
    pub fn value_at(&self, x: i32, y: i32) -> f64 {
        self.data[self.rect.offset(x, y)]
    }

    /// Returns the minimum and maximum scores in the grid.
    pub fn min_max(&self) -> (f64, f64) {
        let mut min = self.data[0];
        let mut max = self.data[0];
        for &v in &self.data[1..] {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
        (min, max)
    }

    /// Rescales the grid to `[0, 1]` using its own minimum and maximum.
    ///
    /// The cell holding the raw minimum maps to exactly 0 and the raw
    /// maximum to exactly 1. Returns the normalized grid together with the
    /// raw `(min, max)` it was scaled by.
    pub fn normalize(&self) -> ObjMatchResult<(ScoreGrid, f64, f64)> {
        let (min, max) = self.min_max();
        let normalized = self.normalize_with(min, max)?;
        Ok((normalized, min, max))
    }

    /// Rescales the grid to `(v - min) / (max - min)` with an externally
    /// supplied range.
    ///
    /// Fails when `max <= min`, since the mapping is undefined there; this
    /// is how a uniform field/object pair surfaces.
    pub fn normalize_with(&self, min: f64, max: f64) -> ObjMatchResult<ScoreGrid> {
        if max <= min {
            return Err(ObjMatchError::DegenerateScoreRange { min, max });
        }
        let range = max - min;
        let data = self.data.iter().map(|&v| (v - min) / range).collect();
        Ok(Self {
            rect: self.rect,
            data,
        })
    }
}
