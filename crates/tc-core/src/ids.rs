//! Typed identifiers for nodes, lines, and demand points.
//!
//! Every id is a `u32` newtype so a `NodeId` can never be passed where a
//! `LineId` is expected.  Ids are `Copy + Ord + Hash`: sorting a set of
//! snap results or edges by id is how the pipeline stays deterministic.

use std::fmt;

/// Generate a typed ID wrapper around a `u32`.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u32);

        impl $name {
            /// Sentinel for "not assigned".
            pub const INVALID: $name = $name(u32::MAX);

            /// Position of this id in a dense table.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// The id that follows `self` when minting in sequence.
            #[inline]
            pub fn next(self) -> Self {
                $name(self.0 + 1)
            }

            #[inline]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                u32::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// A graph node: one quantized location.  Minted from 0 upward in the
    /// order endpoints are first seen.
    pub struct NodeId;
}

typed_id! {
    /// A source line feature.  Pieces cut from a line keep the parent's id.
    pub struct LineId;
}

typed_id! {
    /// A demand point (address, facility, …).
    pub struct PointId;
}
