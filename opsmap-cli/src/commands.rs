//! Subcommand implementations.

use std::sync::Arc;

use chrono::NaiveDate;
use clap::Args;
use tracing::info;

use crate::error::CliError;
use opsmap::api::ReqwestMapApi;
use opsmap::config::SessionConfig;
use opsmap::layer::TracingSurface;
use opsmap::model::{DatasetKind, DateRange};
use opsmap::session::MapSession;
use opsmap::view::{auto_center, CameraCommand};

#[derive(Debug, Args)]
pub struct SnapshotArgs {
    /// Base URL of the facility-operations API root
    #[arg(long)]
    pub base_url: String,

    /// Campus id to filter by
    #[arg(long)]
    pub campus: Option<String>,

    /// Range start (YYYY-MM-DD); defaults to the first of the current month
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Range end (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Skip rendering the geofence layer
    #[arg(long)]
    pub no_geofences: bool,

    /// Skip rendering the point layer
    #[arg(long)]
    pub no_points: bool,

    /// Skip rendering the heatmap layer
    #[arg(long)]
    pub no_heatmap: bool,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Base URL of the facility-operations API root
    #[arg(long)]
    pub base_url: String,

    /// Campus id to filter by
    #[arg(long)]
    pub campus: Option<String>,

    /// Text to match against building and member labels
    #[arg(long)]
    pub query: String,
}

fn build_session(
    base_url: &str,
) -> MapSession<ReqwestMapApi, TracingSurface> {
    let api = Arc::new(ReqwestMapApi::new(base_url));
    let surface = Arc::new(TracingSurface::new());
    MapSession::with_local_today(api, surface, SessionConfig::default())
}

/// Fetch one batch and print a dataset/error summary.
pub async fn snapshot(args: SnapshotArgs) -> Result<(), CliError> {
    let session = build_session(&args.base_url);
    if args.no_geofences {
        session.set_layer_visible(DatasetKind::Geofences, false);
    }
    if args.no_points {
        session.set_layer_visible(DatasetKind::Points, false);
    }
    if args.no_heatmap {
        session.set_layer_visible(DatasetKind::Heatmap, false);
    }

    let campuses = session.campus_options().await?;
    println!("Campuses ({}):", campuses.len());
    for campus in &campuses {
        println!("  {}  {}", campus.id, campus.label);
    }

    info!(base_url = %args.base_url, "running snapshot batch");
    session.start().await;

    if args.start.is_some() || args.end.is_some() {
        let range = DateRange {
            start: args.start.or(session.filter().range.start),
            end: args.end.or(session.filter().range.end),
        };
        session.set_date_range(range).await;
    }
    if args.campus.is_some() {
        session.set_campus(args.campus.clone()).await;
    }

    let filter = session.filter();
    println!();
    println!(
        "Filter: campus={} range={}..{}",
        filter.campus_id.as_deref().unwrap_or("(all)"),
        fmt_date(filter.range.start),
        fmt_date(filter.range.end),
    );

    let counts = session.counts();
    println!("Datasets:");
    println!("  geofences: {}", counts.geofences);
    println!("  points:    {}", counts.points);
    println!("  heatmap:   {}", counts.heatmap);

    let datasets = session.datasets();
    match auto_center(datasets.geofences.items(), &SessionConfig::default().camera) {
        Some(CameraCommand::Center { center, zoom }) => {
            println!("Camera: center {} at zoom {}", center, zoom);
        }
        Some(CameraCommand::FitBounds { bounds, padding_px }) => {
            println!("Camera: fit {} with {} px padding", bounds, padding_px);
        }
        None => println!("Camera: no valid geofence centers, view unchanged"),
    }

    let errors = session.last_errors();
    if errors.any() {
        println!("Failures:");
        if let Some(e) = &errors.geofences {
            println!("  geofences: {}", e);
        }
        if let Some(e) = &errors.points {
            println!("  points:    {}", e);
        }
        if let Some(e) = &errors.heatmap {
            println!("  heatmap:   {}", e);
        }
    } else {
        println!("Failures: none");
    }

    session.close();
    Ok(())
}

/// Fetch one batch, then run the query against the held datasets.
pub async fn search(args: SearchArgs) -> Result<(), CliError> {
    let session = build_session(&args.base_url);

    session.start().await;
    if args.campus.is_some() {
        session.set_campus(args.campus.clone()).await;
    }

    let errors = session.last_errors();
    if errors.any() {
        eprintln!("Warning: some datasets failed to load; results may be incomplete");
    }

    let results = session.search(&args.query);
    if results.is_empty() {
        println!("No matches for {:?}", args.query);
    } else {
        for result in &results {
            if result.sublabel.is_empty() {
                println!("{}  {}  at {}", result.kind, result.label, result.coordinate);
            } else {
                println!(
                    "{}  {}  ({})  at {}",
                    result.kind, result.label, result.sublabel, result.coordinate
                );
            }
        }
    }

    session.close();
    Ok(())
}

fn fmt_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "(unset)".to_string())
}
