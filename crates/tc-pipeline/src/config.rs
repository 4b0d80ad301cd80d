//! Run configuration.
//!
//! Every stage reads its own sub-struct; [`PipelineConfig::validate`] checks
//! them all up front so a bad value fails before any geometry is touched.

use tc_core::Crs;
use tc_graph::GraphConfig;
use tc_spatial::{IndexPolicy, SnapConfig};

use crate::{PipelineError, PipelineResult};

// ── OptimizerParams ───────────────────────────────────────────────────────────

/// Cost and search parameters handed unchanged to the optimizer.
///
/// The pipeline never interprets these; they exist so an optimizer can be
/// configured from the same place as every other stage.  Field names follow
/// the external solver's parameter names, and what each one means is up to
/// the optimizer that reads it.  The built-in optimizers ignore them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizerParams {
    /// Solver `traverse` setting.  Default: 3.
    pub traverse:       u32,
    pub node_gap:       f64,
    pub two_edge_cost:  f64,
    pub four_edge_cost: f64,
    pub n_edge_cost:    f64,
    pub nearest_cost:   f64,
}

impl Default for OptimizerParams {
    fn default() -> Self {
        Self {
            traverse:       3,
            node_gap:       9_999.0,
            two_edge_cost:  9_999.0,
            four_edge_cost: 9_999.0,
            n_edge_cost:    9_999.0,
            nearest_cost:   9_999.0,
        }
    }
}

impl OptimizerParams {
    pub fn validate(&self) -> PipelineResult<()> {
        let costs = [
            ("node_gap", self.node_gap),
            ("two_edge_cost", self.two_edge_cost),
            ("four_edge_cost", self.four_edge_cost),
            ("n_edge_cost", self.n_edge_cost),
            ("nearest_cost", self.nearest_cost),
        ];
        for (name, value) in costs {
            if !value.is_finite() || value < 0.0 {
                return Err(PipelineError::Config(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

// ── PipelineConfig ────────────────────────────────────────────────────────────

/// Top-level configuration for one pipeline run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipelineConfig {
    /// Frame of the input features.  Output is reprojected back to it.
    pub source_crs: Crs,
    /// Metric frame in which snapping, splitting and quantization happen.
    pub working_crs: Crs,
    /// Metric frame used to measure output lengths.
    pub length_crs: Crs,
    pub index_policy: IndexPolicy,
    pub snap: SnapConfig,
    pub graph: GraphConfig,
    pub optimizer: OptimizerParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_crs:   Crs::Wgs84,
            working_crs:  Crs::WebMercator,
            length_crs:   Crs::UsNationalAtlas,
            index_policy: IndexPolicy::Strict,
            snap:         SnapConfig::default(),
            graph:        GraphConfig::default(),
            optimizer:    OptimizerParams::default(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> PipelineResult<()> {
        if !self.working_crs.is_metric() {
            return Err(PipelineError::Config(format!(
                "working frame {} is not metric",
                self.working_crs
            )));
        }
        if !self.length_crs.is_metric() {
            return Err(PipelineError::Config(format!(
                "length frame {} is not metric",
                self.length_crs
            )));
        }
        self.snap.validate()?;
        self.graph.validate()?;
        self.optimizer.validate()
    }
}
