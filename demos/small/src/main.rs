//! small — smallest end-to-end run of the tabby-cat network builder.
//!
//! Snaps a few dozen synthetic addresses onto a 6 × 6 block street grid in
//! downtown Mobile, Alabama, builds the street graph, keeps the Steiner tree
//! that joins every address, and writes the kept streets as JSON.  Swap in a
//! real street extract and address file to run at city scale.

mod network;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use memory_stats::memory_stats;
use serde::Serialize;

use tc_core::LineId;
use tc_graph::GraphConfig;
use tc_pipeline::{
    LogObserver, PipelineBuilder, PipelineObserver, RunReport, Stage, SteinerTreeOptimizer,
};
use tc_spatial::SnapConfig;

use network::{build_addresses, build_streets};

// ── Constants ─────────────────────────────────────────────────────────────────

const BLOCKS:        usize = 6;
const ADDRESS_COUNT: usize = 40;
const SEED:          u64   = 42;
/// Addresses farther than this from every street are dropped (metres).
const SEARCH_MARGIN: f64   = 250.0;

// ── Memory helper ─────────────────────────────────────────────────────────────

fn mem_mb() -> f64 {
    memory_stats()
        .map(|s| s.physical_mem as f64 / (1024.0 * 1024.0))
        .unwrap_or(0.0)
}

// ── Observer wrapper to time stages ──────────────────────────────────────────

struct TimingObserver {
    inner:  LogObserver,
    stages: Vec<(Stage, usize, Duration)>,
}

impl TimingObserver {
    fn new() -> Self {
        Self { inner: LogObserver, stages: Vec::new() }
    }
}

impl PipelineObserver for TimingObserver {
    fn on_stage_start(&mut self, stage: Stage) {
        self.inner.on_stage_start(stage);
    }

    fn on_stage_end(&mut self, stage: Stage, items: usize, elapsed: Duration) {
        self.stages.push((stage, items, elapsed));
        self.inner.on_stage_end(stage, items, elapsed);
    }

    fn on_skipped_lines(&mut self, lines: &[LineId]) {
        self.inner.on_skipped_lines(lines);
    }

    fn on_unsnapped(&mut self, points: &[tc_core::PointId]) {
        self.inner.on_unsnapped(points);
    }

    fn on_self_loops(&mut self, lines: &[LineId]) {
        self.inner.on_self_loops(lines);
    }

    fn on_finish(&mut self, report: &RunReport) {
        self.inner.on_finish(report);
    }
}

// ── Output row ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct SolutionRow<'a> {
    line:        u32,
    name:        Option<&'a str>,
    length_m:    f64,
    lat:         f64,
    lon:         f64,
    coordinates: Vec<[f64; 2]>,
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    println!("=== small — tabby-cat network builder ===");
    println!("Grid: {BLOCKS} × {BLOCKS} blocks  |  Addresses: {ADDRESS_COUNT}  |  Seed: {SEED}");
    println!();

    // 1. Synthetic inputs.
    let streets = build_streets(BLOCKS);
    let addresses = build_addresses(BLOCKS, ADDRESS_COUNT, SEED);
    println!("Streets: {} block faces  |  Demand points: {}", streets.len(), addresses.len());

    // 2. Pipeline.
    let pipeline = PipelineBuilder::new(SteinerTreeOptimizer)
        .snap(SnapConfig::with_margin(SEARCH_MARGIN))
        .graph(GraphConfig { keep_self_loops: false, ..GraphConfig::default() })
        .build()?;

    // 3. Run.
    let mut obs = TimingObserver::new();
    let t0 = Instant::now();
    let output = pipeline.run(&streets, &addresses, &mut obs)?;
    let elapsed = t0.elapsed();

    // 4. Stage table.
    println!();
    println!("{:<12} {:>8} {:>10}", "Stage", "Items", "ms");
    println!("{}", "-".repeat(32));
    for (stage, items, took) in &obs.stages {
        println!("{:<12} {:>8} {:>10.3}", stage.to_string(), items, took.as_secs_f64() * 1e3);
    }
    println!();

    let r = &output.report;
    println!("Run complete in {:.3} s  (RSS {:.1} MB)", elapsed.as_secs_f64(), mem_mb());
    println!("  snapped         : {} of {} ({} dropped)", r.snapped, r.points_in, r.unsnapped);
    println!("  lines split     : {} into {} pieces", r.split_lines, r.pieces);
    println!("  graph           : {} nodes, {} edges", r.nodes, r.edges);
    println!("  demand nodes    : {}", r.demand_nodes);
    println!("  kept edges      : {}", r.solved_edges);

    let total_m: f64 = output.summaries.iter().map(|s| s.length).sum();
    let connector_m: f64 = output.connectors.iter().map(|c| c.length).sum();
    println!("  network length  : {:.1} m", total_m);
    println!("  connector length: {:.1} m", connector_m);
    println!();

    // 5. Write the kept network.
    let rows: Vec<SolutionRow<'_>> = output
        .solution
        .iter()
        .zip(&output.summaries)
        .map(|(line, summary)| SolutionRow {
            line:        line.id.0,
            name:        line.attributes.get("name").map(String::as_str),
            length_m:    summary.length,
            lat:         summary.lat,
            lon:         summary.lon,
            coordinates: line.geometry.0.iter().map(|c| [c.x, c.y]).collect(),
        })
        .collect();

    let dir = Path::new("output/small");
    std::fs::create_dir_all(dir)?;
    let path = dir.join("solution.json");
    serde_json::to_writer_pretty(BufWriter::new(File::create(&path)?), &rows)?;

    let connectors = dir.join("connections.json");
    serde_json::to_writer_pretty(BufWriter::new(File::create(&connectors)?), &output.connectors)?;

    let snapped = dir.join("snapped.json");
    serde_json::to_writer_pretty(BufWriter::new(File::create(&snapped)?), &output.snapped_points)?;

    println!("  {} : {} rows", path.display(), rows.len());
    println!("  {} : {} rows", connectors.display(), output.connectors.len());
    println!("  {} : {} rows", snapped.display(), output.snapped_points.len());

    Ok(())
}
