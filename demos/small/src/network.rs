//! Synthetic street grid and addresses.
//!
//! A block grid laid over downtown Mobile, Alabama, in EPSG:4326.  Every
//! block face is its own line so neighbouring blocks share endpoints, the
//! way a street centreline extract arrives.

use tc_core::{Crs, DemandPoint, LineFeature, LineId, PointId};

/// South-west corner of the grid (lon, lat).
const ORIGIN: (f64, f64) = (-88.070, 30.680);
/// Block size in degrees (≈ 190 m × 220 m at this latitude).
const BLOCK: f64 = 0.002;

/// Block faces of a `blocks × blocks` grid.
///
/// Horizontal faces come first, row by row from the south, then vertical
/// faces column by column from the west.
pub fn build_streets(blocks: usize) -> Vec<LineFeature> {
    let corner = |col: usize, row: usize| {
        (ORIGIN.0 + col as f64 * BLOCK, ORIGIN.1 + row as f64 * BLOCK)
    };

    let mut lines = Vec::with_capacity(2 * blocks * (blocks + 1));
    for row in 0..=blocks {
        for col in 0..blocks {
            let id = LineId(lines.len() as u32);
            lines.push(
                LineFeature::from_xy(id, &[corner(col, row), corner(col + 1, row)], Crs::Wgs84)
                    .with_attribute("name", format!("{} St", ordinal(row + 1)))
                    .with_attribute("fclass", "residential"),
            );
        }
    }
    for col in 0..=blocks {
        for row in 0..blocks {
            let id = LineId(lines.len() as u32);
            lines.push(
                LineFeature::from_xy(id, &[corner(col, row), corner(col, row + 1)], Crs::Wgs84)
                    .with_attribute("name", format!("{} Ave", ordinal(col + 1)))
                    .with_attribute("fclass", "residential"),
            );
        }
    }
    lines
}

/// `count` addresses set back from random block faces, plus one rural
/// address far outside the grid that will not snap.
pub fn build_addresses(blocks: usize, count: usize, seed: u64) -> Vec<DemandPoint> {
    let mut state = seed;
    let mut next = move || {
        // Knuth MMIX LCG; plenty for scattering fixtures.
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    let span = blocks as f64 * BLOCK;
    let mut points: Vec<DemandPoint> = (0..count)
        .map(|i| {
            let along = next() * span;
            let row = (next() * blocks as f64).floor();
            let setback = (next() - 0.5) * BLOCK * 0.3;
            let (lon, lat) = if i % 2 == 0 {
                (ORIGIN.0 + along, ORIGIN.1 + row * BLOCK + setback)
            } else {
                (ORIGIN.0 + row * BLOCK + setback, ORIGIN.1 + along)
            };
            DemandPoint::new(PointId(i as u32), lon, lat, Crs::Wgs84)
                .with_attribute("kind", "address")
        })
        .collect();

    points.push(
        DemandPoint::new(PointId(count as u32), ORIGIN.0 - 0.05, ORIGIN.1 - 0.05, Crs::Wgs84)
            .with_attribute("kind", "rural"),
    );
    points
}

fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
