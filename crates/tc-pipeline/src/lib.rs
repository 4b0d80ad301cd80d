//! `tc-pipeline` — stage orchestrator for the tabby-cat network builder.
//!
//! # Stages
//!
//! ```text
//! ① Project     — lines and demand points, source frame → working frame.
//! ② Index       — R-tree over line bounding boxes.
//! ③ Snap        — nearest line per point, in parallel chunks.
//! ④ Split       — cut each line at the points snapped onto it.
//! ⑤ Graph       — quantize endpoints to nodes, one edge per line.
//! ⑥ Solve       — NetworkOptimizer picks a subset of the edges.
//! ⑦ Materialize — solved edges → straight lines, summaries, connectors,
//!                 working frame → source frame.
//! ```
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`config`]    | `PipelineConfig`, `OptimizerParams`                       |
//! | [`optimizer`] | `NetworkOptimizer`, `KeepAllOptimizer`, `SteinerTreeOptimizer` |
//! | [`observer`]  | `PipelineObserver`, `NoopObserver`, `LogObserver`, `Stage` |
//! | [`pipeline`]  | `Pipeline`, `PreparedNetwork`, `PipelineOutput`, `RunReport` |
//! | [`builder`]   | `PipelineBuilder`                                         |
//! | [`summary`]   | `FeatureSummary`, `Connector`, `snapped_points`           |
//! | [`error`]     | `PipelineError`, `PipelineResult<T>`                      |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tc_pipeline::{LogObserver, PipelineBuilder, SteinerTreeOptimizer};
//!
//! let pipeline = PipelineBuilder::new(SteinerTreeOptimizer).build()?;
//! let output = pipeline.run(&streets, &addresses, &mut LogObserver)?;
//! for (line, summary) in output.solution.iter().zip(&output.summaries) {
//!     println!("{} {:.1} m", line.id, summary.length);
//! }
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod optimizer;
pub mod pipeline;
pub mod summary;


pub use builder::PipelineBuilder;
pub use config::{OptimizerParams, PipelineConfig};
pub use error::{PipelineError, PipelineResult};
pub use observer::{LogObserver, NoopObserver, PipelineObserver, Stage};
pub use optimizer::{KeepAllOptimizer, NetworkOptimizer, OptimizerInput, SteinerTreeOptimizer};
pub use pipeline::{Pipeline, PipelineOutput, PreparedNetwork, RunReport};
pub use summary::{Connector, FeatureSummary};
