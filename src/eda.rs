//! The eda stage: merge the cleaned tables and render every chart.

use anyhow::{Context, Result};
use std::fs;
use tracing::info;

use crate::charts::build_all;
use crate::clean::CleanTables;
use crate::config::StagePaths;
use crate::merge::merge;
use crate::render::{ChartRenderer, ImageFormat};
use crate::tables::write_atomic;

/// JSON dump of every chart's data, written next to the images.
pub const MANIFEST: &str = "charts.json";

/// Entry point for the `eda` subcommand. Writes `<name>.<format>` per chart
/// plus [`MANIFEST`].
#[tracing::instrument(skip(paths, renderer), fields(out_dir = %paths.out_dir.display()))]
pub fn run(paths: &StagePaths, format: ImageFormat, renderer: &dyn ChartRenderer) -> Result<()> {
    let tables = CleanTables::load(paths)?;
    let merged = merge(&tables);
    info!(rows = merged.len(), "Tables merged");

    let charts = build_all(&merged, &tables)?;

    fs::create_dir_all(&paths.out_dir)
        .with_context(|| format!("failed to create '{}'", paths.out_dir.display()))?;

    for chart in &charts {
        let path = paths
            .out_dir
            .join(format!("{}.{}", chart.name, format.extension()));
        renderer
            .render(chart, &path)
            .with_context(|| format!("failed to render '{}'", path.display()))?;
        info!(chart = chart.name, path = %path.display(), "Chart saved");
    }

    let manifest = paths.out_dir.join(MANIFEST);
    let json = serde_json::to_vec_pretty(&charts)?;
    write_atomic(&manifest, &json)
        .with_context(|| format!("failed to write '{}'", manifest.display()))?;

    info!(count = charts.len(), "Charts rendered");
    Ok(())
}
