//! End-to-end pipeline tests on synthetic noise fields.
//!
//! A random object is copied into a random field, partially obscured by a
//! second copy, and the full correlate -> normalize -> select pipeline must
//! recover both placements.

use objmatch::{match_object, Hit, ImageView, MatchConfig, OutputOffset};
use rand::Rng;

const FIELD_SIZE: usize = 100;
const OBJECT_SIZE: usize = 10;

/// Quantized random intensities, mimicking an 8-bit grayscale image.
fn random_intensities(rng: &mut impl Rng, width: usize, height: usize) -> Vec<f64> {
    (0..width * height)
        .map(|_| f64::from(rng.random_range(0u8..=255)) / 255.0)
        .collect()
}

fn blit(field: &mut [f64], field_width: usize, object: &[f64], object_width: usize, x0: usize, y0: usize) {
    for (row, object_row) in object.chunks(object_width).enumerate() {
        let start = (y0 + row) * field_width + x0;
        field[start..start + object_width].copy_from_slice(object_row);
    }
}

/// Field with the object copied at (20,30), then copied again at (26,36)
/// overwriting part of the first placement.
fn obscured_scene() -> (Vec<f64>, Vec<f64>) {
    let mut rng = rand::rng();
    let mut field = random_intensities(&mut rng, FIELD_SIZE, FIELD_SIZE);
    let object = random_intensities(&mut rng, OBJECT_SIZE, OBJECT_SIZE);
    blit(&mut field, FIELD_SIZE, &object, OBJECT_SIZE, 20, 30);
    blit(&mut field, FIELD_SIZE, &object, OBJECT_SIZE, 26, 36);
    (field, object)
}

#[test]
fn finds_exact_and_obscured_placements() {
    let (field, object) = obscured_scene();
    let field = ImageView::from_slice(&field, FIELD_SIZE, FIELD_SIZE).unwrap();
    let object = ImageView::from_slice(&object, OBJECT_SIZE, OBJECT_SIZE).unwrap();

    let report = match_object(
        field,
        object,
        &MatchConfig {
            tolerance: 0.2,
            min_dist: Some(0),
            offset: OutputOffset::TopLeft,
            ..MatchConfig::default()
        },
    )
    .unwrap();

    assert_eq!(report.hits.len(), 2, "hits: {:?}", report.hits);
    assert_eq!(
        report.hits[0],
        Hit {
            x: 26,
            y: 36,
            score: 0.0,
        }
    );
    assert_eq!(report.hits[1].x, 20);
    assert_eq!(report.hits[1].y, 30);
    assert!(report.hits[1].score > 0.0 && report.hits[1].score < 0.2);
    assert_eq!(report.score_min, 0.0);
    assert!(report.score_max > 0.0);
}

#[test]
fn suppression_merges_nearby_placements() {
    let (field, object) = obscured_scene();
    let field = ImageView::from_slice(&field, FIELD_SIZE, FIELD_SIZE).unwrap();
    let object = ImageView::from_slice(&object, OBJECT_SIZE, OBJECT_SIZE).unwrap();

    // Default min_dist is the object size (10); the two placements are 6
    // apart, so the exact one replaces the obscured one.
    let report = match_object(
        field,
        object,
        &MatchConfig {
            tolerance: 0.2,
            offset: OutputOffset::TopLeft,
            ..MatchConfig::default()
        },
    )
    .unwrap();

    assert_eq!(report.hits.len(), 1, "hits: {:?}", report.hits);
    assert_eq!(
        report.hits[0],
        Hit {
            x: 26,
            y: 36,
            score: 0.0,
        }
    );
}

#[test]
fn default_offset_centers_hits_on_object() {
    let (field, object) = obscured_scene();
    let field = ImageView::from_slice(&field, FIELD_SIZE, FIELD_SIZE).unwrap();
    let object = ImageView::from_slice(&object, OBJECT_SIZE, OBJECT_SIZE).unwrap();

    let report = match_object(
        field,
        object,
        &MatchConfig {
            tolerance: 0.2,
            ..MatchConfig::default()
        },
    )
    .unwrap();

    assert_eq!(report.hits[0].x, 26 + OBJECT_SIZE as i32 / 2);
    assert_eq!(report.hits[0].y, 36 + OBJECT_SIZE as i32 / 2);
}

#[test]
fn hits_are_sorted_ascending_and_separated() {
    let (field, object) = obscured_scene();
    let field = ImageView::from_slice(&field, FIELD_SIZE, FIELD_SIZE).unwrap();
    let object = ImageView::from_slice(&object, OBJECT_SIZE, OBJECT_SIZE).unwrap();

    let min_dist = 10;
    let report = match_object(
        field,
        object,
        &MatchConfig {
            tolerance: 0.5,
            min_dist: Some(min_dist),
            offset: OutputOffset::TopLeft,
            ..MatchConfig::default()
        },
    )
    .unwrap();

    for pair in report.hits.windows(2) {
        assert!(pair[0].score <= pair[1].score);
    }
    for (i, a) in report.hits.iter().enumerate() {
        for b in report.hits.iter().skip(i + 1) {
            assert!(a.chebyshev_dist(b) >= min_dist);
        }
    }
}

#[test]
fn zero_tolerance_yields_empty_hit_set() {
    let (field, object) = obscured_scene();
    let field = ImageView::from_slice(&field, FIELD_SIZE, FIELD_SIZE).unwrap();
    let object = ImageView::from_slice(&object, OBJECT_SIZE, OBJECT_SIZE).unwrap();

    // Default tolerance is 0: no score is strictly below it.
    let report = match_object(field, object, &MatchConfig::default()).unwrap();
    assert!(report.hits.is_empty());
}
