//! Fluent builder for constructing a [`Pipeline`].

use tc_core::Crs;
use tc_graph::GraphConfig;
use tc_spatial::{IndexPolicy, SnapConfig};

use crate::config::{OptimizerParams, PipelineConfig};
use crate::optimizer::NetworkOptimizer;
use crate::{Pipeline, PipelineResult};

/// Fluent builder for [`Pipeline<O>`].
///
/// # Required inputs
///
/// - `O: NetworkOptimizer`: chooses the output edges (e.g.
///   [`SteinerTreeOptimizer`](crate::SteinerTreeOptimizer))
///
/// # Optional inputs (have defaults)
///
/// | Method                   | Default                         |
/// |--------------------------|---------------------------------|
/// | `.config(c)`             | `PipelineConfig::default()`     |
/// | `.source_crs(c)`         | EPSG:4326                       |
/// | `.working_crs(c)`        | EPSG:3857                       |
/// | `.length_crs(c)`         | EPSG:2163                       |
/// | `.index_policy(p)`       | `IndexPolicy::Strict`           |
/// | `.snap(s)`               | 1000 m margin, all cores        |
/// | `.graph(g)`              | precision 1, keep self-loops    |
/// | `.optimizer_params(p)`   | `OptimizerParams::default()`    |
///
/// # Example
///
/// ```rust,ignore
/// let pipeline = PipelineBuilder::new(KeepAllOptimizer)
///     .snap(SnapConfig::with_margin(250.0))
///     .build()?;
/// let output = pipeline.run(&lines, &points, &mut LogObserver)?;
/// ```
pub struct PipelineBuilder<O: NetworkOptimizer> {
    config:    PipelineConfig,
    optimizer: O,
}

impl<O: NetworkOptimizer> PipelineBuilder<O> {
    pub fn new(optimizer: O) -> Self {
        Self { config: PipelineConfig::default(), optimizer }
    }

    /// Replace the whole configuration.  Later setters still apply.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn source_crs(mut self, crs: Crs) -> Self {
        self.config.source_crs = crs;
        self
    }

    pub fn working_crs(mut self, crs: Crs) -> Self {
        self.config.working_crs = crs;
        self
    }

    pub fn length_crs(mut self, crs: Crs) -> Self {
        self.config.length_crs = crs;
        self
    }

    pub fn index_policy(mut self, policy: IndexPolicy) -> Self {
        self.config.index_policy = policy;
        self
    }

    pub fn snap(mut self, snap: SnapConfig) -> Self {
        self.config.snap = snap;
        self
    }

    pub fn graph(mut self, graph: GraphConfig) -> Self {
        self.config.graph = graph;
        self
    }

    pub fn optimizer_params(mut self, params: OptimizerParams) -> Self {
        self.config.optimizer = params;
        self
    }

    /// Validate the configuration and return a ready-to-run [`Pipeline`].
    pub fn build(self) -> PipelineResult<Pipeline<O>> {
        self.config.validate()?;
        Ok(Pipeline { config: self.config, optimizer: self.optimizer })
    }
}
