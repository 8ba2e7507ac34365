//! Search the live Düsseldorf endpoint
//!
//! Usage: `cargo run --example search -- <query> [config.json]`
//!
//! The optional JSON file holds configuration overrides, e.g.
//! `{"params": "acdipst,10", "balloon": {"street": "adresse"}}`.

use std::sync::Arc;
use std::time::Duration;

use duesseldorf_search::{
    ReqwestTransport, SearchAdapter, SearchConfig, init_logging, web_mercator_to_lon_lat,
};
use geo::{Centroid, Geometry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(tracing::Level::INFO)?;

    let mut args = std::env::args().skip(1);
    let query = args.next().unwrap_or_else(|| "Rathaus".to_owned());
    let config = match args.next() {
        Some(path) => SearchConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => SearchConfig::default(),
    };
    println!("Overrides: {}", serde_json::to_string(&config.to_overrides())?);

    let transport = ReqwestTransport::with_timeout(Duration::from_secs(15))?;
    let adapter = SearchAdapter::with_transport(Arc::new("de"), config, Arc::new(transport))?;

    println!("Suggestions for '{query}':");
    for label in adapter.suggest(&query).await? {
        println!("  {label}");
    }

    println!("\nResults for '{query}':");
    for (i, result) in adapter.search(&query).await?.iter().enumerate() {
        let balloon = result.feature.balloon();
        let position = match result.feature.geometry() {
            Geometry::Point(point) => Some(point.0),
            other => other.centroid().map(|point| point.0),
        };
        println!("{}. {}", i + 1, result.title);
        println!("   {} / {}", balloon.balloon_title, balloon.balloon_subtitle);
        if let Some(coord) = position {
            let (lon, lat) = web_mercator_to_lon_lat(coord);
            println!("   at {lat:.5}, {lon:.5}");
        }
        let address = result.feature.address();
        if let Some(name) = address.address_name {
            println!("   {} {}", name, address.zip.unwrap_or_default());
        }
    }

    adapter.destroy();
    Ok(())
}
