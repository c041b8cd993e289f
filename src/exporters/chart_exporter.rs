use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, error, info};

use crate::error::DashboardError;
use crate::exporters::filename_component;
use crate::services::{ChartData, ChartId};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

pub type RenderResult = Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>>;

/// Charting backend that rasterizes a chart to PNG bytes
///
/// The dashboard only supplies the data; the embedding application decides
/// how a chart looks.
pub trait ChartRenderer {
    fn render_png(&self, chart: &ChartData) -> RenderResult;
}

/// `<chartId>_<city>_<YYYY-MM-DD>.png`
pub fn chart_filename(id: ChartId, city: &str, date: NaiveDate) -> String {
    format!(
        "{}_{}_{}.png",
        id.as_str(),
        filename_component(city),
        date.format("%Y-%m-%d")
    )
}

/// Render `chart` and write it into `dir`, returning the file path
pub fn export_chart(
    chart: &ChartData,
    renderer: &dyn ChartRenderer,
    dir: &Path,
    city: &str,
    date: NaiveDate,
) -> Result<PathBuf, DashboardError> {
    debug!("Rendering {} for export", chart.id);
    let bytes = renderer.render_png(chart).map_err(|e| {
        error!("Renderer failed for {}: {}", chart.id, e);
        DashboardError::render(format!("could not render {}: {e}", chart.id))
    })?;

    if !bytes.starts_with(&PNG_SIGNATURE) {
        return Err(DashboardError::render(format!(
            "renderer did not produce a PNG image for {}",
            chart.id
        )));
    }

    let path = dir.join(chart_filename(chart.id, city, date));
    fs::write(&path, &bytes).map_err(|e| {
        error!("Failed to write {}: {}", path.display(), e);
        DashboardError::render(format!("could not write {}: {e}", path.display()))
    })?;

    info!("Exported {} ({} bytes) to {}", chart.id, bytes.len(), path.display());
    Ok(path)
}
