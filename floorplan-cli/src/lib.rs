//! # Floorplan CLI
//!
//! Development harness for the floor-plan engine: loads a room capture,
//! applies view commands and writes a summary or the rendered plan.
//!
//! ## Components
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `run` - Loads, drives and renders a view, returning the output bytes
//! - `PlanSummary` - Serializable description of the loaded plan and view

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use floorplan_core::{
    DisplaySettings, IngestReport, MeasurementLabel, RejectedRecord, RoomScene, SurfaceKind,
    UnitSystem, ViewCommand, ViewerConfig, ViewportDocument,
};
use floorplan_renderer::{BackendType, FloorPlanView, RendererConfig};
use serde::Serialize;

/// Command-line arguments for floorplan.
#[derive(Debug, Clone, Parser)]
#[command(name = "floorplan")]
#[command(about = "Render a captured room as an interactive floor plan")]
#[command(version)]
pub struct CliArgs {
    /// Capture document (JSON with walls, doors and windows)
    #[arg(env = "FLOORPLAN_INPUT")]
    pub input: PathBuf,

    /// Viewer configuration JSON; missing fields take defaults
    #[arg(long, env = "FLOORPLAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long, default_value = "1024")]
    pub width: f32,

    /// Viewport height in pixels
    #[arg(long, default_value = "768")]
    pub height: f32,

    /// Device pixels per viewport pixel for raster output
    #[arg(long, default_value = "1.0")]
    pub pixel_ratio: f32,

    /// Measurement units (overrides the configuration)
    #[arg(long, value_enum)]
    pub units: Option<Units>,

    /// Start with measurement labels hidden
    #[arg(long)]
    pub hide_measurements: bool,

    /// View commands to apply in order, e.g. `--command zoom-in --command toggle-units`
    #[arg(long = "command", value_enum)]
    pub commands: Vec<Command>,

    /// Output format
    #[arg(long, value_enum, default_value = "summary")]
    pub format: OutputFormat,

    /// Output file; stdout when omitted
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Unit system flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Units {
    /// Meters.
    Metric,
    /// Feet and inches.
    Imperial,
}

impl From<Units> for UnitSystem {
    fn from(units: Units) -> Self {
        match units {
            Units::Metric => Self::Metric,
            Units::Imperial => Self::Imperial,
        }
    }
}

/// View command flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Command {
    /// Zoom in one step.
    ZoomIn,
    /// Zoom out one step.
    ZoomOut,
    /// Return to the fitted view.
    Reset,
    /// Show or hide measurements.
    ToggleMeasurements,
    /// Switch metric and imperial.
    ToggleUnits,
}

impl From<Command> for ViewCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::ZoomIn => Self::ZoomIn,
            Command::ZoomOut => Self::ZoomOut,
            Command::Reset => Self::ResetView,
            Command::ToggleMeasurements => Self::ToggleMeasurements,
            Command::ToggleUnits => Self::ToggleUnits,
        }
    }
}

/// What to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    Summary,
    /// Summary as JSON.
    Json,
    /// SVG document of the final frame.
    Svg,
    /// PNG image of the final frame.
    Png,
}

/// Description of a loaded plan and its final view.
#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    /// Wall count.
    pub walls: usize,
    /// Door count.
    pub doors: usize,
    /// Window count.
    pub windows: usize,
    /// Records dropped at ingestion.
    pub rejected: Vec<RejectedRecord>,
    /// Display settings in effect.
    pub display: DisplaySettings,
    /// Final viewport.
    pub viewport: ViewportDocument,
    /// Labels drawn in the final frame.
    pub labels: Vec<MeasurementLabel>,
}

impl PlanSummary {
    fn collect(view: &mut FloorPlanView, report: IngestReport) -> Self {
        let scene = view.viewer().scene();
        let (walls, doors, windows) = (
            scene.count(SurfaceKind::Wall),
            scene.count(SurfaceKind::Door),
            scene.count(SurfaceKind::Window),
        );
        let display = view.viewer().settings();
        let viewport = ViewportDocument::from(view.viewer().controller());
        Self {
            walls,
            doors,
            windows,
            rejected: report.rejected,
            display,
            viewport,
            labels: view.labels().to_vec(),
        }
    }

    /// Render as plain text.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Surfaces: {} walls, {} doors, {} windows",
            self.walls, self.doors, self.windows
        );
        for rejected in &self.rejected {
            let _ = writeln!(
                out,
                "Rejected {} #{}: {}",
                rejected.kind, rejected.index, rejected.reason
            );
        }
        let state = self.viewport.state;
        let _ = writeln!(
            out,
            "Viewport: {}x{}, zoom {:.2}, rotation {:.1}°",
            self.viewport.width,
            self.viewport.height,
            self.viewport.zoom_ratio,
            state.rotation.to_degrees()
        );
        if self.display.show_measurements {
            let _ = writeln!(out, "Measurements ({:?}):", self.display.unit_system);
            for label in &self.labels {
                let _ = writeln!(out, "  {} {}", label.surface, label.text);
            }
        } else {
            let _ = writeln!(out, "Measurements hidden");
        }
        out
    }
}

/// Settle any running transition.
fn settle(view: &mut FloorPlanView) {
    let step = Duration::from_millis(16);
    while view.tick(step) {}
}

/// Load the capture, apply the requested commands and produce the output.
///
/// # Errors
///
/// Returns an error if an input file cannot be read or parsed, the
/// configuration is invalid, or rendering fails.
pub fn run(args: &CliArgs) -> anyhow::Result<Vec<u8>> {
    let json = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read capture {}", args.input.display()))?;
    let (scene, report) = RoomScene::from_json(&json)
        .with_context(|| format!("Failed to parse capture {}", args.input.display()))?;

    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            ViewerConfig::from_json(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => ViewerConfig::default(),
    };
    if let Some(units) = args.units {
        config.display.unit_system = units.into();
    }
    if args.hide_measurements {
        config.display.show_measurements = false;
    }

    let backend = if args.format == OutputFormat::Png {
        BackendType::Raster
    } else {
        BackendType::Svg
    };
    let mut view = FloorPlanView::new(
        scene,
        args.width,
        args.height,
        config,
        RendererConfig {
            preferred_backend: backend,
            pixel_ratio: args.pixel_ratio,
            ..RendererConfig::default()
        },
    )
    .context("Failed to create view")?;

    for command in &args.commands {
        let outcome = view.viewer_mut().execute((*command).into());
        tracing::info!("{command:?}: {outcome:?}");
        settle(&mut view);
    }
    view.redraw().context("Failed to draw floor plan")?;

    let bytes = match args.format {
        OutputFormat::Summary => PlanSummary::collect(&mut view, report).to_text().into_bytes(),
        OutputFormat::Json => {
            let summary = PlanSummary::collect(&mut view, report);
            serde_json::to_vec_pretty(&summary).context("Failed to serialize summary")?
        }
        OutputFormat::Svg => view.export_svg().into_bytes(),
        OutputFormat::Png => view.export_png().context("Failed to encode PNG")?,
    };
    Ok(bytes)
}
