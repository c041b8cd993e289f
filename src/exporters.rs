pub mod chart_exporter;
pub mod csv_exporter;

pub use chart_exporter::{chart_filename, export_chart, ChartRenderer, RenderResult};
pub use csv_exporter::{csv_filename, export_csv, write_csv};

/// Make a city name safe to embed in a file name
fn filename_component(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || matches!(c, '/' | '\\' | ':') {
                '_'
            } else {
                c
            }
        })
        .collect()
}
