//! ObjMatch locates occurrences of a small reference image ("object")
//! inside a larger image ("field").
//!
//! Every candidate placement is scored exhaustively with a sum-of-absolute-
//! differences metric, the score surface is normalized to `[0, 1]` by its
//! own range, and non-maximum suppression reduces it to a sparse, ranked
//! hit list. Optional parallelism is available via the `rayon` feature and
//! image decoding via `image-io`.

pub mod candidate;
pub mod grid;
pub mod image;
pub mod kernel;
pub mod search;
pub mod util;

pub(crate) mod trace;

pub use candidate::nms::{select, select_above, select_outside};
pub use candidate::Hit;
pub use grid::{ScoreGrid, SearchRect};
pub use image::{ImageView, OwnedImage};
pub use search::{match_object, MatchConfig, MatchReport, OutputOffset};
pub use util::{ObjMatchError, ObjMatchResult};
