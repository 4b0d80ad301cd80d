//! `tc-graph` — quantized node keys, graph construction, materialization.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`key`]         | `NodeKey`, `Quantizer`                                  |
//! | [`graph`]       | `Graph`, `Edge`, `NodeLookup`, `SolvedEdgeSet`          |
//! | [`builder`]     | `GraphBuilder`, `GraphConfig`, `build_graph`            |
//! | [`materialize`] | `materialize` (solved pairs → straight lines)           |
//! | [`error`]       | `GraphError`, `GraphResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod builder;
pub mod error;
pub mod graph;
pub mod key;
pub mod materialize;


pub use builder::{build_graph, GraphBuilder, GraphConfig};
pub use error::{GraphError, GraphResult};
pub use graph::{Edge, Graph, NodeLookup, SolvedEdgeSet};
pub use key::{NodeKey, Quantizer};
pub use materialize::materialize;
