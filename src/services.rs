pub mod chart_series;
pub mod deduplicator;
pub mod monthly_aggregator;
pub mod paginator;
pub mod statistics;

pub use chart_series::{ChartData, ChartId, DashboardCharts, Series};
pub use deduplicator::deduplicate;
pub use monthly_aggregator::aggregate_monthly;
pub use paginator::{Paginator, PAGE_SIZE};
