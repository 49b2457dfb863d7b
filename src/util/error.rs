//! Error types for objmatch.

use thiserror::Error;

/// Result alias for objmatch operations.
pub type ObjMatchResult<T> = std::result::Result<T, ObjMatchError>;

/// Errors that can occur when running objmatch algorithms.
#[derive(Debug, Error, PartialEq)]
pub enum ObjMatchError {
    /// An image was constructed with a zero width or height.
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },
    /// An image stride is smaller than its width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride {
        /// Requested width in pixels.
        width: usize,
        /// Requested stride in elements.
        stride: usize,
    },
    /// A backing buffer is too small for the requested dimensions.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall {
        /// Minimum number of elements required.
        needed: usize,
        /// Number of elements provided.
        got: usize,
    },
    /// A search rectangle has non-positive width or height.
    #[error("invalid search rectangle ({min_x},{min_y})-({max_x},{max_y})")]
    InvalidSearchRect {
        /// Inclusive minimum x of the rectangle.
        min_x: i32,
        /// Inclusive minimum y of the rectangle.
        min_y: i32,
        /// Exclusive maximum x of the rectangle.
        max_x: i32,
        /// Exclusive maximum y of the rectangle.
        max_y: i32,
    },
    /// Some origin in the search rectangle would place the object outside
    /// the field. Surfaced before any scoring work starts.
    #[error(
        "search rectangle ({min_x},{min_y})-({max_x},{max_y}) with object \
         {object_width}x{object_height} exceeds field {field_width}x{field_height}"
    )]
    SearchOutOfBounds {
        /// Inclusive minimum x of the rectangle.
        min_x: i32,
        /// Inclusive minimum y of the rectangle.
        min_y: i32,
        /// Exclusive maximum x of the rectangle.
        max_x: i32,
        /// Exclusive maximum y of the rectangle.
        max_y: i32,
        /// Field width in pixels.
        field_width: usize,
        /// Field height in pixels.
        field_height: usize,
        /// Object width in pixels.
        object_width: usize,
        /// Object height in pixels.
        object_height: usize,
    },
    /// A score grid was built from a buffer whose length does not match
    /// its rectangle.
    #[error("score grid size mismatch: expected {expected}, got {got}")]
    GridSizeMismatch {
        /// Expected number of cells (rect width times height).
        expected: usize,
        /// Number of values provided.
        got: usize,
    },
    /// All raw scores are identical, so min/max normalization is undefined.
    #[error("degenerate score range: min {min} >= max {max}")]
    DegenerateScoreRange {
        /// Minimum raw score found in the grid.
        min: f64,
        /// Maximum raw score found in the grid.
        max: f64,
    },
    /// Failed to load or decode an image file.
    #[cfg(feature = "image-io")]
    #[error("image i/o error: {reason}")]
    ImageIo {
        /// Human-readable description from the decoder.
        reason: String,
    },
}
