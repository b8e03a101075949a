//! fields-runner: loads the field registry once and answers queries.
//!
//! Usage:
//!   fields-runner --data-dir wwwroot/Data
//!   fields-runner --config fields.json --serve --port 5000 --static-dir wwwroot
//!
//! Without `--serve` the runner prints a registry summary and exits.

mod api;

use anyhow::{Context, Result};
use fields_core::{
    config::FieldsConfig,
    query::{FieldQueries, FieldQueryService},
    registry::FieldRegistry,
};
use std::env;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let serve = args.iter().any(|a| a == "--serve");
    let port = parse_arg(&args, "--port", 5000u16);
    let static_dir = string_arg(&args, "--static-dir").unwrap_or("wwwroot");

    let mut config = match string_arg(&args, "--config") {
        Some(path) => FieldsConfig::load(Path::new(path))?,
        None => FieldsConfig::default(),
    };
    if let Some(dir) = string_arg(&args, "--data-dir") {
        config.data_dir = dir.into();
    }

    // Fatal on any loader error: nothing is served from a partial registry.
    let registry = FieldRegistry::load(&config).with_context(|| {
        format!(
            "Loading fields from {} and {}",
            config.boundaries_path().display(),
            config.centroids_path().display()
        )
    })?;
    let loaded_at = registry.loaded_at();
    let service = Arc::new(FieldQueryService::new(Arc::new(registry)));

    if !serve {
        print_summary(&service, &config);
        return Ok(());
    }

    let state = api::AppState { queries: service, loaded_at };
    let app = api::create_router(state, static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Binding {addr}"))?;
    log::info!("Serving fields on http://{addr} (static root: {static_dir})");

    axum::serve(listener, app).await?;
    Ok(())
}

fn print_summary(service: &FieldQueryService, config: &FieldsConfig) {
    let registry = service.registry();

    println!("=== FIELD REGISTRY ===");
    println!("  boundaries:   {}", config.boundaries_path().display());
    println!("  centroids:    {}", config.centroids_path().display());
    println!("  loaded at:    {}", registry.loaded_at().to_rfc3339());
    println!("  fields:       {}", registry.len());
    println!("  with center:  {}", registry.linked_count());
    println!("  total area:   {:.1} m²", registry.total_area());

    println!();
    if registry.is_empty() {
        println!("  (No fields loaded)");
        return;
    }
    for field in service.list_all() {
        match field.geometry.center {
            Some(c) => println!(
                "  #{:<5} {:<24} {:>12.1} m²  center ({:.6}, {:.6})",
                field.id, field.name, field.size, c.lat, c.lng
            ),
            None => println!(
                "  #{:<5} {:<24} {:>12.1} m²  (no center)",
                field.id, field.name, field.size
            ),
        }
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
