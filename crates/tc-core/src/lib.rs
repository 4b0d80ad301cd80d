//! `tc-core` — foundational types for the tabby-cat network builder.
//!
//! Every other `tc-*` crate depends on this one.  It has no `tc-*`
//! dependencies and only two external ones (`geo` for geometry primitives
//! and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                            |
//! |-------------|-----------------------------------------------------|
//! | [`ids`]     | `NodeId`, `LineId`, `PointId`                       |
//! | [`crs`]     | `Crs` (EPSG 4326 / 3857 / 2163)                     |
//! | [`feature`] | `LineFeature`, `DemandPoint`, `Attributes`          |
//! | [`error`]   | `CoreError`, `CoreResult`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod crs;
pub mod error;
pub mod feature;
pub mod ids;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use crs::Crs;
pub use error::{CoreError, CoreResult};
pub use feature::{Attributes, DemandPoint, LineFeature};
pub use ids::{LineId, NodeId, PointId};
