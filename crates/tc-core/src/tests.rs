//! Unit tests for tc-core primitives.

#[cfg(test)]
mod ids {
    use crate::{LineId, NodeId, PointId};

    #[test]
    fn index_roundtrip() {
        let id = NodeId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(NodeId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn next_mints_in_sequence() {
        assert_eq!(NodeId(0).next(), NodeId(1));
        assert_eq!(LineId(9).next().next(), LineId(11));
    }

    #[test]
    fn invalid_sentinel() {
        assert_eq!(PointId::INVALID.0, u32::MAX);
        assert!(!NodeId::INVALID.is_valid());
        assert!(NodeId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(LineId(7).to_string(), "LineId(7)");
    }
}

#[cfg(test)]
mod crs {
    use crate::{CoreError, Crs};

    #[test]
    fn epsg_roundtrip() {
        for crs in [Crs::Wgs84, Crs::WebMercator, Crs::UsNationalAtlas] {
            assert_eq!(Crs::from_epsg(crs.epsg()).unwrap(), crs);
        }
    }

    #[test]
    fn unknown_code_rejected() {
        assert!(matches!(Crs::from_epsg(27700), Err(CoreError::UnsupportedCrs(27700))));
    }

    #[test]
    fn parse_forms() {
        assert_eq!("EPSG:3857".parse::<Crs>().unwrap(), Crs::WebMercator);
        assert_eq!("epsg:4326".parse::<Crs>().unwrap(), Crs::Wgs84);
        assert_eq!(" 2163 ".parse::<Crs>().unwrap(), Crs::UsNationalAtlas);
        assert!(matches!("mercator".parse::<Crs>(), Err(CoreError::Parse(_))));
    }

    #[test]
    fn metric_flag() {
        assert!(!Crs::Wgs84.is_metric());
        assert!(Crs::WebMercator.is_metric());
        assert_eq!(Crs::UsNationalAtlas.to_string(), "EPSG:2163");
    }
}

#[cfg(test)]
mod feature {
    use geo::{Coord, LineString};

    use crate::{CoreError, Crs, DemandPoint, LineFeature, LineId, PointId};

    #[test]
    fn endpoints() {
        let line = LineFeature::from_xy(LineId(1), &[(0.0, 0.0), (5.0, 0.0), (10.0, 2.0)], Crs::WebMercator);
        assert_eq!(line.coord_count(), 3);
        assert_eq!(line.start(), Some(Coord { x: 0.0, y: 0.0 }));
        assert_eq!(line.end(), Some(Coord { x: 10.0, y: 2.0 }));
    }

    #[test]
    fn derive_keeps_id_and_attributes() {
        let line = LineFeature::from_xy(LineId(3), &[(0.0, 0.0), (1.0, 1.0)], Crs::Wgs84)
            .with_attribute("fclass", "residential")
            .with_attribute("osm_id", "12345");
        let child = line.derive(LineString::from(vec![(0.5, 0.5), (1.0, 1.0)]), Crs::WebMercator);
        assert_eq!(child.id, LineId(3));
        assert_eq!(child.crs, Crs::WebMercator);
        assert_eq!(child.attributes, line.attributes);
        assert_eq!(child.attributes["fclass"], "residential");
    }

    #[test]
    fn validate_rejects_single_coordinate() {
        let line = LineFeature::from_xy(LineId(0), &[(1.0, 1.0)], Crs::WebMercator);
        assert!(matches!(
            line.validate(),
            Err(CoreError::InvalidGeometry { line: LineId(0), .. })
        ));
    }

    #[test]
    fn validate_rejects_nan() {
        let line = LineFeature::from_xy(LineId(2), &[(0.0, 0.0), (f64::NAN, 1.0)], Crs::WebMercator);
        assert!(line.validate().is_err());
    }

    #[test]
    fn demand_point_relocated() {
        let p = DemandPoint::new(PointId(4), 1.0, 2.0, Crs::Wgs84).with_attribute("name", "clinic");
        let moved = p.relocated(Coord { x: 3.0, y: 4.0 }, Crs::WebMercator);
        assert_eq!(moved.id, PointId(4));
        assert_eq!(moved.coord(), Coord { x: 3.0, y: 4.0 });
        assert_eq!(moved.attributes["name"], "clinic");
    }
}
