//! Turning solved node pairs back into geometry.

use geo::LineString;

use tc_core::{Crs, LineFeature, LineId};

use crate::graph::{NodeLookup, SolvedEdgeSet};
use crate::GraphResult;

/// One straight two-point line per solved pair, in solved order.
///
/// Each line runs from the first node's stored coordinate to the second's,
/// is tagged `crs`, takes the pair's position as its [`LineId`], and carries
/// `source`/`target` attributes with the raw node ids.  An id missing from
/// `lookup` fails the whole call.
pub fn materialize(
    solved: &SolvedEdgeSet,
    lookup: &NodeLookup,
    crs:    Crs,
) -> GraphResult<Vec<LineFeature>> {
    solved
        .pairs()
        .iter()
        .enumerate()
        .map(|(i, &(a, b))| {
            let from = lookup.require(a)?;
            let to = lookup.require(b)?;
            Ok(LineFeature::new(LineId(i as u32), LineString::new(vec![from, to]), crs)
                .with_attribute("source", a.0.to_string())
                .with_attribute("target", b.0.to_string()))
        })
        .collect()
}
