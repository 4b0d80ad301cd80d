//! `tc-spatial` — projection, indexing, snapping, and splitting.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`projector`] | `Projector`, `project` (EPSG 4326 ↔ 3857 ↔ 2163)          |
//! | [`measure`]   | `line_length`, `locate`, `interpolate`, `LineLocation`    |
//! | [`index`]     | `LineIndex` (R-tree over line boxes), `IndexPolicy`       |
//! | [`snapper`]   | `snap`, `snap_one`, `SnapConfig`, `SnapResult`            |
//! | [`splitter`]  | `split`, `split_snapped`, `SplitOutcome`                  |
//! | [`error`]     | `SpatialError`, `SpatialResult<T>`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod index;
pub mod measure;
pub mod projector;
pub mod snapper;
pub mod splitter;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use index::{IndexPolicy, LineIndex};
pub use measure::LineLocation;
pub use projector::{project, Projector};
pub use snapper::{snap, snap_one, SnapConfig, SnapOutcome, SnapResult};
pub use splitter::{split, split_snapped, SplitOutcome};
