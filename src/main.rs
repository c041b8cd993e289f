use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use weather_insight::config::Config;
use weather_insight::dashboard::{
    AnalysisOutcome, AnalysisRequest, DashboardController, LoadedDataset, Notification,
};
use weather_insight::models::PageView;
use weather_insight::services::ChartId;
use weather_insight::utils::round1;

#[derive(Parser)]
#[command(name = "weather-insight")]
#[command(about = "Terminal dashboard for historical weather data", long_about = None)]
struct Cli {
    /// Backend base URL (overrides WEATHER_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Directory exports are written to (overrides EXPORT_DIR)
    #[arg(long, global = true)]
    export_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the cities the backend already has data for
    Cities,
    /// Suggest city names for a partial query
    Suggest { query: String },
    /// Check backend health
    Health,
    /// Load a city and date range and print the dashboard
    Analyze {
        #[arg(long)]
        city: String,

        /// YYYY-MM-DD
        #[arg(long)]
        start_date: String,

        /// YYYY-MM-DD
        #[arg(long)]
        end_date: String,

        /// Table page to show (1-based)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Also write the table to CSV
        #[arg(long)]
        csv: bool,

        /// Print the per-year comparison
        #[arg(long)]
        yearly: bool,

        /// Print winter/spring/summer/autumn figures
        #[arg(long)]
        seasons: bool,

        /// Print the temperature histogram
        #[arg(long)]
        distribution: bool,

        /// Only print this chart (temperatureChart, rainfallChart, seasonalChart, extremeChart)
        #[arg(long, value_parser = parse_chart_id)]
        chart: Option<ChartId>,
    },
}

fn parse_chart_id(value: &str) -> Result<ChartId, String> {
    ChartId::parse(value).ok_or_else(|| format!("unknown chart '{value}'"))
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,weather_insight=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if let Some(export_dir) = cli.export_dir {
        config.export_dir = export_dir;
    }
    info!("Starting weather insight with config: {:?}", config);

    let controller = DashboardController::from_config(config)?;

    match cli.command {
        Command::Cities => match controller.load_cities().await {
            Ok(cities) => {
                println!("{} cities available:", cities.len());
                for city in cities {
                    match city.country {
                        Some(country) => println!("  {} ({})", city.city, country),
                        None => println!("  {}", city.city),
                    }
                }
            }
            Err(n) => print_notification(&n),
        },
        Command::Suggest { query } => match controller.suggest_cities(&query).await {
            Ok(suggestions) if suggestions.is_empty() => println!("No suggestions"),
            Ok(suggestions) => {
                for s in suggestions {
                    println!(
                        "  {:<40} {:>8.3} {:>9.3}",
                        s.display_name, s.latitude, s.longitude
                    );
                }
            }
            Err(n) => print_notification(&n),
        },
        Command::Health => match controller.check_health().await {
            Ok(health) => {
                let mark = if health.is_healthy() { "✓" } else { "✗" };
                println!("{mark} status: {}", health.status);
                if let Some(db) = health.database {
                    println!("  database: {db}");
                }
                if let Some(error) = health.error {
                    println!("  error: {error}");
                }
            }
            Err(n) => print_notification(&n),
        },
        Command::Analyze {
            city,
            start_date,
            end_date,
            page,
            csv,
            yearly,
            seasons,
            distribution,
            chart,
        } => {
            let request = AnalysisRequest::new(city, start_date, end_date);

            let pb = ProgressBar::new_spinner();
            pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
            pb.set_message(format!("Loading weather data for {}...", request.city.trim()));
            pb.enable_steady_tick(Duration::from_millis(100));

            let outcome = controller.analyze(&request).await;
            pb.finish_and_clear();

            match outcome {
                AnalysisOutcome::Applied(n) => {
                    print_notification(&n);
                    let Some(dataset) = controller.dataset() else {
                        return Ok(());
                    };

                    if page != 1 && !controller.go_to_page(page) {
                        print_notification(&Notification::info(
                            format!("Page {page} is out of range, showing page 1"),
                            controller.config().notification_dismiss(),
                        ));
                    }

                    print_summary(&dataset);
                    print_charts(&dataset, chart);
                    if let Some(view) = controller.page_view() {
                        print_table(&view);
                    }
                    if yearly {
                        print_yearly(&dataset);
                    }
                    if seasons {
                        print_seasons(&dataset);
                    }
                    if distribution {
                        print_distribution(&dataset);
                    }
                    if csv {
                        match controller.export_csv() {
                            Ok(path) => println!("CSV written to {}", path.display()),
                            Err(n) => print_notification(&n),
                        }
                    }
                }
                AnalysisOutcome::Failed(n) => print_notification(&n),
                AnalysisOutcome::Stale => {}
            }
        }
    }

    Ok(())
}

fn print_notification(notification: &Notification) {
    println!("{notification}");
}

fn print_summary(dataset: &LoadedDataset) {
    let s = &dataset.summary;
    println!();
    println!(
        "{} {} to {} ({} days, {} duplicates removed)",
        dataset.city,
        dataset.start_date,
        dataset.end_date,
        s.total_days,
        dataset.duplicates_removed()
    );
    println!("  Avg max temp:    {:.1} °C", s.avg_max_temp);
    println!("  Avg min temp:    {:.1} °C", s.avg_min_temp);
    println!("  Total rainfall:  {:.1} mm", s.total_rainfall);
    println!("  Rainy days:      {}", s.rainy_days);
    println!("  Avg sunshine:    {:.1} h", s.avg_sunshine_hours);

    let f = &dataset.figures;
    println!("  Avg daily rain:  {} mm", cell(f.avg_daily_rainfall));
    println!("  Temp range:      {} °C", cell(f.temperature_range));
    println!("  Total sunshine:  {:.0} h", f.total_sunshine_hours);

    if let Some(range) = &dataset.data_range {
        let years: Vec<String> = range.years.iter().map(i32::to_string).collect();
        println!(
            "  Data range:      {} to {} ({} days; years {})",
            range.first_date,
            range.last_date,
            range.total_days,
            years.join(", ")
        );
    }

    if let Some(high) = &dataset.record_high {
        println!("  Record high:     {:.1} °C on {}", high.value, high.date);
    }
    if let Some(low) = &dataset.record_low {
        println!("  Record low:      {:.1} °C on {}", low.value, low.date);
    }

    let e = &dataset.extremes;
    println!(
        "  Hot {} | Very hot {} | Cold {} | Very cold {} | Rainy {} | Heavy rain {} | Dry {}",
        e.hot_days,
        e.very_hot_days,
        e.cold_days,
        e.very_cold_days,
        e.rainy_days,
        e.heavy_rain_days,
        e.dry_days
    );
}

fn print_charts(dataset: &LoadedDataset, only: Option<ChartId>) {
    for chart in dataset.charts.iter() {
        if only.is_some_and(|id| id != chart.id) {
            continue;
        }
        println!();
        println!("{} [{}]", chart.title, chart.id);
        if chart.is_empty() {
            println!("  (no data)");
            continue;
        }
        for (i, label) in chart.labels.iter().enumerate() {
            let values: Vec<String> = chart
                .series
                .iter()
                .map(|series| match series.points.get(i).copied().flatten() {
                    Some(v) => format!("{}={:.1}", series.label, round1(v)),
                    None => format!("{}=-", series.label),
                })
                .collect();
            println!("  {:<10} {}", label, values.join("  "));
        }
    }
}

fn print_table(view: &PageView) {
    println!();
    println!(
        "{:<12} {:>8} {:>8} {:>8} {:>8}",
        "Date", "Max °C", "Min °C", "Rain mm", "Sun h"
    );
    for record in &view.records {
        let date = record
            .calendar_date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| record.date.clone());
        println!(
            "{:<12} {:>8} {:>8} {:>8} {:>8}",
            date,
            cell(record.temperature_max),
            cell(record.temperature_min),
            cell(record.rain_sum),
            cell(record.sunshine_hours())
        );
    }
    println!(
        "Showing {}-{} of {} (page {} of {})",
        view.first_index(),
        view.last_index(),
        view.total_records,
        view.page_number,
        view.total_pages
    );
}

fn print_yearly(dataset: &LoadedDataset) {
    println!();
    println!(
        "{:<6} {:>6} {:>10} {:>10} {:>10}",
        "Year", "Days", "Avg max", "Avg min", "Rain mm"
    );
    for year in &dataset.yearly {
        println!(
            "{:<6} {:>6} {:>10} {:>10} {:>10.1}",
            year.year,
            year.days,
            cell(year.avg_max_temp),
            cell(year.avg_min_temp),
            year.total_rainfall
        );
    }
}

fn print_seasons(dataset: &LoadedDataset) {
    println!();
    println!(
        "{:<8} {:>6} {:>10} {:>10} {:>10}",
        "Season", "Days", "Avg max", "Avg min", "Rain mm"
    );
    for season in &dataset.seasons {
        println!(
            "{:<8} {:>6} {:>10} {:>10} {:>10.1}",
            season.season.label(),
            season.days,
            cell(season.avg_max_temp),
            cell(season.avg_min_temp),
            season.total_rainfall
        );
    }
}

fn print_distribution(dataset: &LoadedDataset) {
    println!();
    println!("{:<17} {:>6} {:>6}", "Temperature °C", "Max", "Min");
    for bin in &dataset.distribution {
        println!(
            "{:>7.1} to {:>5.1} {:>6} {:>6}",
            bin.lower, bin.upper, bin.max_count, bin.min_count
        );
    }
}

fn cell(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}", round1(v)))
        .unwrap_or_else(|| "-".to_string())
}
