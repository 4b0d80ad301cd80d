//! Unit tests for tc-spatial.
//!
//! All fixtures are hand-built in EPSG:3857 metres unless a test is about
//! projection.

#[cfg(test)]
mod helpers {
    use tc_core::{Crs, DemandPoint, LineFeature, LineId, PointId};

    pub fn line(id: u32, xy: &[(f64, f64)]) -> LineFeature {
        LineFeature::from_xy(LineId(id), xy, Crs::WebMercator)
    }

    pub fn point(id: u32, x: f64, y: f64) -> DemandPoint {
        DemandPoint::new(PointId(id), x, y, Crs::WebMercator)
    }

    /// A 5 × 5 street grid with 100 m blocks: horizontal lines 0..=4 at
    /// y = 0, 100, …, vertical lines 5..=9 at x = 0, 100, ….
    pub fn grid() -> Vec<LineFeature> {
        let mut lines = Vec::new();
        for i in 0..5 {
            let y = i as f64 * 100.0;
            lines.push(line(i, &[(0.0, y), (400.0, y)]));
        }
        for i in 0..5 {
            let x = i as f64 * 100.0;
            lines.push(line(5 + i, &[(x, 0.0), (x, 400.0)]));
        }
        lines
    }

    /// Deterministic scatter of `n` points over the grid area (LCG).
    pub fn scatter(n: u32) -> Vec<DemandPoint> {
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = || {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            ((state >> 33) as f64 / (1u64 << 31) as f64) * 420.0 - 10.0
        };
        (0..n).map(|i| point(i, next(), next())).collect()
    }
}

// ── Projector ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod projector {
    use geo::Coord;
    use tc_core::{CoreError, Crs, LineFeature, LineId};

    use crate::projector::MERCATOR_RADIUS;
    use crate::{Projector, SpatialError};

    fn close(a: Coord<f64>, b: Coord<f64>, tol: f64) -> bool {
        (a.x - b.x).abs() <= tol && (a.y - b.y).abs() <= tol
    }

    #[test]
    fn mercator_origin_and_antimeridian() {
        let p = Projector::new(Crs::Wgs84, Crs::WebMercator);
        let origin = p.project_coord(Coord { x: 0.0, y: 0.0 }).unwrap();
        assert!(close(origin, Coord { x: 0.0, y: 0.0 }, 1e-9));

        let edge = p.project_coord(Coord { x: 180.0, y: 0.0 }).unwrap();
        assert!((edge.x - std::f64::consts::PI * MERCATOR_RADIUS).abs() < 1e-6);
    }

    #[test]
    fn mercator_roundtrip() {
        let fwd = Projector::new(Crs::Wgs84, Crs::WebMercator);
        let src = Coord { x: -88.043, y: 30.694 };
        let back = fwd.inverse().project_coord(fwd.project_coord(src).unwrap()).unwrap();
        assert!(close(src, back, 1e-9), "got {back:?}");
    }

    #[test]
    fn atlas_centre_maps_to_origin() {
        let p = Projector::new(Crs::Wgs84, Crs::UsNationalAtlas);
        let c = p.project_coord(Coord { x: -100.0, y: 45.0 }).unwrap();
        assert!(close(c, Coord { x: 0.0, y: 0.0 }, 1e-6), "got {c:?}");
    }

    #[test]
    fn atlas_roundtrip_through_mercator() {
        let src = Coord { x: -8_000_000.0, y: 4_000_000.0 };
        let fwd = Projector::new(Crs::WebMercator, Crs::UsNationalAtlas);
        let back = fwd.inverse().project_coord(fwd.project_coord(src).unwrap()).unwrap();
        assert!(close(src, back, 1e-4), "got {back:?}");
    }

    #[test]
    fn polar_latitude_out_of_mercator_domain() {
        let p = Projector::new(Crs::Wgs84, Crs::WebMercator);
        let err = p.project_coord(Coord { x: 10.0, y: 89.0 }).unwrap_err();
        assert!(matches!(err, SpatialError::OutOfDomain { .. }));
    }

    #[test]
    fn invalid_longitude_rejected() {
        let p = Projector::new(Crs::Wgs84, Crs::WebMercator);
        assert!(p.project_coord(Coord { x: 200.0, y: 0.0 }).is_err());
        assert!(p.project_coord(Coord { x: f64::NAN, y: 0.0 }).is_err());
    }

    #[test]
    fn unknown_epsg() {
        let err = Projector::from_epsg(4326, 27700).unwrap_err();
        assert!(matches!(err, SpatialError::Core(CoreError::UnsupportedCrs(27700))));
    }

    #[test]
    fn line_in_wrong_frame_is_rejected() {
        let line = LineFeature::from_xy(LineId(1), &[(0.0, 0.0), (1.0, 1.0)], Crs::WebMercator);
        let p = Projector::new(Crs::Wgs84, Crs::WebMercator);
        assert!(matches!(
            p.project_line(&line),
            Err(SpatialError::CrsMismatch { expected: Crs::Wgs84, found: Crs::WebMercator, .. })
        ));
    }

    #[test]
    fn project_line_keeps_attributes() {
        let line = LineFeature::from_xy(LineId(9), &[(-88.0, 30.0), (-88.01, 30.01)], Crs::Wgs84)
            .with_attribute("fclass", "primary");
        let out = Projector::new(Crs::Wgs84, Crs::WebMercator).project_line(&line).unwrap();
        assert_eq!(out.id, LineId(9));
        assert_eq!(out.crs, Crs::WebMercator);
        assert_eq!(out.coord_count(), 2);
        assert_eq!(out.attributes["fclass"], "primary");
    }

    #[test]
    fn identity_is_passthrough() {
        let p = Projector::new(Crs::WebMercator, Crs::WebMercator);
        assert!(p.is_identity());
        let c = Coord { x: 123.4, y: -56.7 };
        assert_eq!(p.project_coord(c).unwrap(), c);
    }
}

// ── Measurement ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod measure {
    use geo::{Coord, LineString};

    use crate::measure::{interpolate, line_length, locate, vertex_offsets};

    fn l_shape() -> LineString<f64> {
        LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)])
    }

    #[test]
    fn length_and_offsets() {
        assert_eq!(line_length(&l_shape()), 20.0);
        assert_eq!(vertex_offsets(&l_shape()), vec![0.0, 10.0, 20.0]);
    }

    #[test]
    fn locate_interior() {
        let ls = LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]);
        let loc = locate(&ls, Coord { x: 5.0, y: 1.0 }).unwrap();
        assert_eq!(loc.coord, Coord { x: 5.0, y: 0.0 });
        assert_eq!(loc.distance, 1.0);
        assert_eq!(loc.offset, 5.0);
        assert_eq!(loc.segment, 0);
    }

    #[test]
    fn locate_second_segment() {
        let loc = locate(&l_shape(), Coord { x: 12.0, y: 4.0 }).unwrap();
        assert_eq!(loc.coord, Coord { x: 10.0, y: 4.0 });
        assert_eq!(loc.distance, 2.0);
        assert_eq!(loc.offset, 14.0);
        assert_eq!(loc.segment, 1);
    }

    #[test]
    fn locate_beyond_end_clamps() {
        let ls = LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]);
        let loc = locate(&ls, Coord { x: 13.0, y: 4.0 }).unwrap();
        assert_eq!(loc.coord, Coord { x: 10.0, y: 0.0 });
        assert_eq!(loc.distance, 5.0);
        assert_eq!(loc.offset, 10.0);
    }

    #[test]
    fn interpolate_midpoint() {
        assert_eq!(interpolate(&l_shape(), 10.0), Some(Coord { x: 10.0, y: 0.0 }));
        assert_eq!(interpolate(&l_shape(), 15.0), Some(Coord { x: 10.0, y: 5.0 }));
        assert_eq!(interpolate(&l_shape(), 99.0), Some(Coord { x: 10.0, y: 10.0 }));
        assert_eq!(interpolate(&l_shape(), -1.0), Some(Coord { x: 0.0, y: 0.0 }));
    }

    #[test]
    fn repeated_vertex_and_empty_line() {
        let ls = LineString::from(vec![(0.0, 0.0), (0.0, 0.0), (0.0, 8.0)]);
        assert_eq!(line_length(&ls), 8.0);
        assert_eq!(vertex_offsets(&ls), vec![0.0, 0.0, 8.0]);
        assert_eq!(interpolate(&ls, 2.0), Some(Coord { x: 0.0, y: 2.0 }));

        let empty = LineString::<f64>::new(vec![]);
        assert_eq!(line_length(&empty), 0.0);
        assert_eq!(interpolate(&empty, 1.0), None);
        assert!(locate(&empty, Coord { x: 0.0, y: 0.0 }).is_none());
    }
}

// ── Spatial index ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod index {
    use geo::{Coord, Rect};
    use tc_core::{Crs, LineFeature, LineId};

    use super::helpers::{grid, line};
    use crate::{IndexPolicy, LineIndex, SpatialError};

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect<f64> {
        Rect::new(Coord { x: x0, y: y0 }, Coord { x: x1, y: y1 })
    }

    #[test]
    fn candidates_by_box() {
        let lines = grid();
        let idx = LineIndex::build(&lines).unwrap();
        assert_eq!(idx.len(), 10);

        // Box around (150, 150) not touching any street line.
        assert!(idx.candidates(rect(120.0, 120.0, 180.0, 180.0)).is_empty());

        // Box straddling y = 100 between x = 120..180 → only horizontal line 1.
        assert_eq!(idx.candidates(rect(120.0, 90.0, 180.0, 110.0)), vec![LineId(1)]);

        // Box around the (100, 100) intersection → line 1 and line 6.
        assert_eq!(idx.candidates(rect(95.0, 95.0, 105.0, 105.0)), vec![LineId(1), LineId(6)]);
    }

    #[test]
    fn boxes_admit_false_positives() {
        // A diagonal line's box covers the query even though the line does not.
        let lines = vec![line(0, &[(0.0, 0.0), (100.0, 100.0)])];
        let idx = LineIndex::build(&lines).unwrap();
        assert_eq!(idx.candidates(rect(80.0, 0.0, 90.0, 10.0)), vec![LineId(0)]);
    }

    #[test]
    fn strict_rejects_zero_length() {
        let lines = vec![line(0, &[(0.0, 0.0), (1.0, 0.0)]), line(1, &[(5.0, 5.0), (5.0, 5.0)])];
        let err = LineIndex::build(&lines).err().unwrap();
        assert!(matches!(err, SpatialError::IndexBuild { line: LineId(1), .. }));
    }

    #[test]
    fn lenient_skips_and_records() {
        let lines = vec![
            line(0, &[(0.0, 0.0), (1.0, 0.0)]),
            line(1, &[(5.0, 5.0)]),
            line(2, &[(5.0, 5.0), (5.0, 5.0)]),
        ];
        let idx = LineIndex::build_with(&lines, IndexPolicy::SkipInvalid).unwrap();
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.skipped(), &[LineId(1), LineId(2)]);
    }

    #[test]
    fn mixed_frames_rejected() {
        let lines = vec![
            line(0, &[(0.0, 0.0), (1.0, 0.0)]),
            LineFeature::from_xy(LineId(1), &[(0.0, 0.0), (1.0, 0.0)], Crs::Wgs84),
        ];
        assert!(matches!(LineIndex::build(&lines), Err(SpatialError::CrsMismatch { .. })));
    }

    #[test]
    fn empty_index() {
        let idx = LineIndex::build(&[]).unwrap();
        assert!(idx.is_empty());
        assert_eq!(idx.crs(), None);
        assert!(idx.candidates(rect(-1e9, -1e9, 1e9, 1e9)).is_empty());
    }
}

// ── Snapper ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod snapper {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use geo::Coord;
    use tc_core::{Crs, DemandPoint, LineId, PointId};

    use super::helpers::{grid, line, point, scatter};
    use crate::snapper::snap_until;
    use crate::{snap, LineIndex, SnapConfig, SpatialError};

    fn with_workers(margin: f64, workers: usize) -> SnapConfig {
        SnapConfig { workers: Some(workers), ..SnapConfig::with_margin(margin) }
    }

    fn triples(points: &[DemandPoint], idx: &LineIndex<'_>, cfg: &SnapConfig) -> Vec<(PointId, LineId, f64)> {
        snap(points, idx, cfg)
            .unwrap()
            .sorted()
            .into_iter()
            .map(|r| (r.point, r.line, r.distance))
            .collect()
    }

    #[test]
    fn single_line_scenario() {
        let lines = vec![line(0, &[(0.0, 0.0), (10.0, 0.0)])];
        let idx = LineIndex::build(&lines).unwrap();
        let out = snap(&[point(0, 5.0, 1.0)], &idx, &SnapConfig::with_margin(1_000.0)).unwrap();

        assert_eq!(out.results.len(), 1);
        let r = out.results[0];
        assert_eq!(r.point, PointId(0));
        assert_eq!(r.line, LineId(0));
        assert_eq!(r.snapped, Coord { x: 5.0, y: 0.0 });
        assert_eq!(r.distance, 1.0);
        assert_eq!(r.offset, 5.0);
        assert!(out.unsnapped.is_empty());
    }

    #[test]
    fn point_outside_margin_is_dropped() {
        let lines = vec![line(0, &[(0.0, 0.0), (10.0, 0.0)])];
        let idx = LineIndex::build(&lines).unwrap();
        let pts = [point(0, 5.0, 1.0), point(1, 5.0, 500.0)];
        let out = snap(&pts, &idx, &SnapConfig::with_margin(100.0)).unwrap();
        assert_eq!(out.snapped_count(), 1);
        assert_eq!(out.unsnapped, vec![PointId(1)]);
    }

    #[test]
    fn nearest_of_several_candidates() {
        let lines = grid();
        let idx = LineIndex::build(&lines).unwrap();
        // (130, 290): 30 m from x = 100 (line 6), 10 m from y = 300 (line 3).
        let out = snap(&[point(0, 130.0, 290.0)], &idx, &SnapConfig::default()).unwrap();
        let r = out.results[0];
        assert_eq!(r.line, LineId(3));
        assert!((r.distance - 10.0).abs() < 1e-9);
        assert!((r.snapped.x - 130.0).abs() < 1e-9 && r.snapped.y == 300.0);
    }

    #[test]
    fn distance_tie_goes_to_lowest_line_id() {
        let lines = vec![
            line(7, &[(0.0, 1.0), (10.0, 1.0)]),
            line(3, &[(0.0, -1.0), (10.0, -1.0)]),
        ];
        let idx = LineIndex::build(&lines).unwrap();
        for workers in [1, 2] {
            let out = snap(&[point(0, 5.0, 0.0)], &idx, &with_workers(50.0, workers)).unwrap();
            assert_eq!(out.results[0].line, LineId(3));
        }
    }

    #[test]
    fn max_distance_filters_box_hits() {
        let lines = vec![line(0, &[(0.0, 0.0), (10.0, 0.0)])];
        let idx = LineIndex::build(&lines).unwrap();
        let cfg = SnapConfig { max_distance: Some(2.0), ..SnapConfig::with_margin(100.0) };
        let out = snap(&[point(0, 5.0, 1.0), point(1, 5.0, 50.0)], &idx, &cfg).unwrap();
        assert_eq!(out.snapped_count(), 1);
        assert_eq!(out.unsnapped, vec![PointId(1)]);
    }

    #[test]
    fn worker_count_does_not_change_results() {
        let lines = grid();
        let idx = LineIndex::build(&lines).unwrap();
        let pts = scatter(250);
        let baseline = triples(&pts, &idx, &with_workers(60.0, 1));
        assert!(!baseline.is_empty());
        for workers in [2, 3, 4, 7, 16] {
            assert_eq!(triples(&pts, &idx, &with_workers(60.0, workers)), baseline, "workers = {workers}");
        }
    }

    #[test]
    fn input_order_does_not_change_results() {
        let lines = grid();
        let idx = LineIndex::build(&lines).unwrap();
        let pts = scatter(250);
        let mut reversed = pts.clone();
        reversed.reverse();
        let mut interleaved: Vec<_> = pts.iter().step_by(2).chain(pts.iter().skip(1).step_by(2)).cloned().collect();
        interleaved.rotate_left(17);

        let cfg = with_workers(60.0, 3);
        let baseline = triples(&pts, &idx, &cfg);
        assert_eq!(triples(&reversed, &idx, &cfg), baseline);
        assert_eq!(triples(&interleaved, &idx, &cfg), baseline);
    }

    #[test]
    fn merge_is_chunk_ordered() {
        let lines = grid();
        let idx = LineIndex::build(&lines).unwrap();
        // Every point sits right on a street, so all snap.
        let pts: Vec<_> = (0..40).map(|i| point(i, i as f64 * 10.0, 0.5)).collect();
        let out = snap(&pts, &idx, &with_workers(5.0, 4)).unwrap();
        assert_eq!(out.chunks, 4);
        let ids: Vec<_> = out.results.iter().map(|r| r.point.0).collect();
        assert_eq!(ids, (0..40).collect::<Vec<_>>());
    }

    #[test]
    fn non_finite_point_fails_whole_call() {
        let lines = grid();
        let idx = LineIndex::build(&lines).unwrap();
        let mut pts = scatter(100);
        pts[63] = point(63, f64::NAN, 10.0);
        let err = snap(&pts, &idx, &with_workers(60.0, 4)).unwrap_err();
        assert!(matches!(err, SpatialError::InvalidPoint(PointId(63))));
    }

    #[test]
    fn expired_deadline_reports_chunks() {
        let lines = grid();
        let idx = LineIndex::build(&lines).unwrap();
        let pts = scatter(100);
        let cfg = SnapConfig { deadline: Some(Duration::ZERO), ..with_workers(60.0, 4) };
        match snap(&pts, &idx, &cfg) {
            Err(SpatialError::SnapTimeout { completed, outstanding, deadline }) => {
                assert_eq!(completed, 0);
                assert_eq!(outstanding, 4);
                assert_eq!(deadline, Duration::ZERO);
            }
            other => panic!("expected SnapTimeout, got {other:?}"),
        }
    }

    #[test]
    fn deadline_after_first_chunk_counts_it_completed() {
        let lines = grid();
        let idx = LineIndex::build(&lines).unwrap();
        let pts = scatter(100);
        let deadline = Duration::from_secs(30);
        let cfg = SnapConfig { deadline: Some(deadline), ..with_workers(60.0, 2) };

        // Chunk 1 expires only once chunk 0 has passed all 50 of its checks.
        let checked = AtomicUsize::new(0);
        let expired = |chunk: usize| {
            if chunk == 0 {
                checked.fetch_add(1, Ordering::SeqCst);
                return false;
            }
            while checked.load(Ordering::SeqCst) < 50 {
                std::thread::yield_now();
            }
            true
        };

        match snap_until(&pts, &idx, &cfg, &expired) {
            Err(SpatialError::SnapTimeout { completed, outstanding, deadline: d }) => {
                assert_eq!(completed, 1);
                assert_eq!(outstanding, 1);
                assert_eq!(d, deadline);
            }
            other => panic!("expected SnapTimeout, got {other:?}"),
        }
    }

    #[test]
    fn frame_mismatch_rejected() {
        let lines = grid();
        let idx = LineIndex::build(&lines).unwrap();
        let pts = [DemandPoint::new(PointId(0), -88.0, 30.0, Crs::Wgs84)];
        assert!(matches!(snap(&pts, &idx, &SnapConfig::default()), Err(SpatialError::CrsMismatch { .. })));
    }

    #[test]
    fn zero_workers_is_a_config_error() {
        let lines = grid();
        let idx = LineIndex::build(&lines).unwrap();
        let cfg = SnapConfig { workers: Some(0), ..SnapConfig::default() };
        assert!(matches!(snap(&scatter(3), &idx, &cfg), Err(SpatialError::Config(_))));
    }

    #[test]
    fn empty_inputs() {
        let lines = grid();
        let idx = LineIndex::build(&lines).unwrap();
        let out = snap(&[], &idx, &SnapConfig::default()).unwrap();
        assert_eq!(out.chunks, 0);
        assert!(out.results.is_empty());

        let empty = LineIndex::build(&[]).unwrap();
        let out = snap(&scatter(5), &empty, &SnapConfig::default()).unwrap();
        assert_eq!(out.unsnapped.len(), 5);
    }
}

// ── Splitter ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod splitter {
    use geo::Coord;
    use tc_core::LineId;

    use super::helpers::{line, point};
    use crate::{snap, split, split_snapped, LineIndex, SnapConfig};

    fn xy(c: &[Coord<f64>]) -> Vec<(f64, f64)> {
        c.iter().map(|c| (c.x, c.y)).collect()
    }

    /// Join pieces, dropping the duplicated joint at each boundary.
    fn joined(pieces: &[tc_core::LineFeature]) -> Vec<Coord<f64>> {
        let mut out: Vec<Coord<f64>> = Vec::new();
        for (i, p) in pieces.iter().enumerate() {
            let skip = if i == 0 { 0 } else { 1 };
            out.extend(p.geometry.0.iter().skip(skip).copied());
        }
        out
    }

    #[test]
    fn scenario_split_in_two() {
        let a = line(0, &[(0.0, 0.0), (10.0, 0.0)]);
        let pieces = split(&a, &[Coord { x: 5.0, y: 0.0 }]);
        assert_eq!(pieces.len(), 2);
        assert_eq!(xy(&pieces[0].geometry.0), vec![(0.0, 0.0), (5.0, 0.0)]);
        assert_eq!(xy(&pieces[1].geometry.0), vec![(5.0, 0.0), (10.0, 0.0)]);
    }

    #[test]
    fn no_cuts_passes_through() {
        let a = line(4, &[(0.0, 0.0), (3.0, 4.0), (6.0, 0.0)]).with_attribute("code", "5122");
        let pieces = split(&a, &[]);
        assert_eq!(pieces, vec![a]);
    }

    #[test]
    fn interior_cuts_round_trip() {
        // Coordinates chosen so every offset is exact in binary.
        let a = line(1, &[(0.0, 0.0), (8.0, 0.0), (8.0, 8.0), (16.0, 8.0)]);
        let cuts = [
            Coord { x: 2.0, y: 0.0 },
            Coord { x: 8.0, y: 4.0 },
            Coord { x: 14.0, y: 8.0 },
        ];
        let pieces = split(&a, &cuts);
        assert_eq!(pieces.len(), cuts.len() + 1);

        // Joined pieces = original coordinates with the cuts inserted.
        let original: Vec<_> = a.geometry.0.clone();
        let rebuilt: Vec<_> = joined(&pieces).into_iter().filter(|c| !cuts.contains(c)).collect();
        assert_eq!(rebuilt, original);

        // Pieces chain end to start.
        for w in pieces.windows(2) {
            assert_eq!(w[0].end(), w[1].start());
        }
        assert_eq!(pieces.first().unwrap().start(), a.start());
        assert_eq!(pieces.last().unwrap().end(), a.end());
    }

    #[test]
    fn cuts_given_out_of_order() {
        let a = line(0, &[(0.0, 0.0), (16.0, 0.0)]);
        let pieces = split(&a, &[Coord { x: 12.0, y: 0.0 }, Coord { x: 4.0, y: 0.0 }]);
        assert_eq!(pieces.len(), 3);
        assert_eq!(xy(&pieces[1].geometry.0), vec![(4.0, 0.0), (12.0, 0.0)]);
    }

    #[test]
    fn duplicate_cuts_collapse() {
        let a = line(0, &[(0.0, 0.0), (10.0, 0.0)]);
        let cut = Coord { x: 5.0, y: 0.0 };
        let pieces = split(&a, &[cut, cut, Coord { x: 5.0 + 1e-9, y: 0.0 }]);
        assert_eq!(pieces.len(), 2);
    }

    #[test]
    fn endpoint_and_beyond_end_cuts_ignored() {
        let a = line(0, &[(0.0, 0.0), (10.0, 0.0)]);
        let pieces = split(&a, &[Coord { x: 0.0, y: 0.0 }, Coord { x: 14.0, y: 3.0 }]);
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0], a);
    }

    #[test]
    fn cut_on_vertex_adds_no_coordinate() {
        let a = line(0, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        let pieces = split(&a, &[Coord { x: 10.0, y: 0.0 }]);
        assert_eq!(pieces.len(), 2);
        assert_eq!(xy(&pieces[0].geometry.0), vec![(0.0, 0.0), (10.0, 0.0)]);
        assert_eq!(xy(&pieces[1].geometry.0), vec![(10.0, 0.0), (10.0, 10.0)]);
    }

    #[test]
    fn pieces_keep_attributes() {
        let a = line(2, &[(0.0, 0.0), (10.0, 0.0)]).with_attribute("fclass", "residential");
        for p in split(&a, &[Coord { x: 4.0, y: 0.0 }]) {
            assert_eq!(p.id, LineId(2));
            assert_eq!(p.attributes["fclass"], "residential");
        }
    }

    #[test]
    fn split_snapped_partitions_lines() {
        let lines = vec![
            line(0, &[(0.0, 0.0), (10.0, 0.0)]),
            line(1, &[(0.0, 50.0), (10.0, 50.0)]),
            line(2, &[(0.0, 100.0), (10.0, 100.0)]),
        ];
        let idx = LineIndex::build(&lines).unwrap();
        let pts = [point(0, 5.0, 1.0), point(1, 2.0, 99.0), point(2, 7.0, 102.0)];
        let snaps = snap(&pts, &idx, &SnapConfig::with_margin(10.0)).unwrap();

        let out = split_snapped(&lines, &snaps.results);
        assert_eq!(out.split_lines, 2);
        assert_eq!(out.untouched.len(), 1);
        assert_eq!(out.untouched[0].id, LineId(1));
        // Line 0 → 2 pieces, line 2 → 3 pieces.
        assert_eq!(out.pieces.len(), 5);
        assert_eq!(out.line_count(), 6);
        let ids: Vec<_> = out.all_lines().map(|l| l.id.0).collect();
        assert_eq!(ids, vec![1, 0, 0, 2, 2, 2]);
    }
}
