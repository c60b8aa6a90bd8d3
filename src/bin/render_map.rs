//! Headless Map Renderer
//!
//! Loads the domain dataset and the country topology from disk and writes a
//! standalone SVG of the world map (or a region close-up) to stdout.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `MAP_DATA_DIR`: domain data directory (default: `data`)
//! - `MAP_PUBLIC_DIR`: root the topology URI resolves against (default: `public`)
//! - `MAP_CONTENT_DIR`: root region analysis paths resolve against (default: `.`)
//! - `MAP_LAYER`: `power-tiers`, `alliances` or `conflicts` (default: `power-tiers`)
//! - `MAP_REGION`: render this region's close-up instead of the world map
//! - `MAP_WIDTH` / `MAP_HEIGHT`: viewport size in pixels (default: 960x540)
//! - `MAP_*`: map settings, see `MapConfig::from_env`
//! - `RUST_LOG`: Log level filter (default: info)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: json)
//!
//! ## Usage
//!
//! ```bash
//! MAP_LAYER=alliances cargo run --bin render_map --features fs > world.svg
//! ```

use std::path::PathBuf;

use tracing::{info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use geolayer_kernel::{
    DataDir, DomainDataset, FileTopologySource, IdentifierBridge, LayerKind, MapConfig, RegionPage,
    ViewportSize, WorldPage,
};

/// Initialize the tracing subscriber with JSON or pretty format.
/// Logs go to stderr so stdout carries only the SVG.
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "render_map=info,geolayer_kernel=info".into());

    if log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .flatten_event(true),
            )
            .init();
    }
}

fn env_path(key: &str, default: &str) -> PathBuf {
    std::env::var(key).unwrap_or_else(|_| default.to_string()).into()
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let version = env!("CARGO_PKG_VERSION");
    info!(version = version, "Starting headless map renderer");

    let config = MapConfig::from_env();
    let data_dir = DataDir::new(env_path("MAP_DATA_DIR", "data"));
    let source = FileTopologySource::new(env_path("MAP_PUBLIC_DIR", "public"));
    let defaults = ViewportSize::default();
    let size = ViewportSize::new(
        env_f64("MAP_WIDTH", defaults.width),
        env_f64("MAP_HEIGHT", defaults.height),
    );
    let layer: LayerKind = match std::env::var("MAP_LAYER") {
        Ok(s) => s.parse()?,
        Err(_) => LayerKind::default(),
    };

    let data = DomainDataset::load(&data_dir)?;
    let bridge = IdentifierBridge::shared();

    let svg = match std::env::var("MAP_REGION") {
        Ok(region_id) => {
            let page = RegionPage::assemble(&data, &region_id)?;
            let analysis = page.analysis(&env_path("MAP_CONTENT_DIR", "."))?;
            if analysis.is_empty() {
                warn!(region = %region_id, "Region has no analysis document");
            }
            let mut map = page.region_map(&config, &bridge, size);
            map.mount(&source).await?;
            info!(
                region = %region_id,
                members = page.members().len(),
                highlighted = map.highlighted().len(),
                "Region map rendered"
            );
            map.render_svg()
        }
        Err(_) => {
            let page = WorldPage::assemble(&data)?;
            let cache = config.index_cache();
            let mut map = page.world_map(&config, &bridge, &cache, size);
            map.mount(&source).await?;
            map.set_layer(layer);
            map.advance(config.transition());
            info!(layer = %layer, legend_rows = map.legend().entries.len(), "World map rendered");
            map.render_svg()
        }
    };

    match svg {
        Some(svg) => {
            print!("{svg}");
            Ok(())
        }
        None => Err(format!("viewport {}x{} is not drawable", size.width, size.height).into()),
    }
}
