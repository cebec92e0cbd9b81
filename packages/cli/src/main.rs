#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Inspection CLI for the clustering and styling engine.
//!
//! ```text
//! cargo run -p geolens_cli -- clusters points.geojson --from 0 --to 17
//! cargo run -p geolens_cli -- fetch <dataset-id> --base-url http://localhost:8000
//! cargo run -p geolens_cli -- preview viridis --width 16
//! cargo run -p geolens_cli -- ramps
//! ```

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use geojson::FeatureCollection;
use geolens_client::{FeatureSource, HttpFeatureSource, MemoryTokenStore, TokenProvider};
use geolens_cluster::{BoundingBox, ClusterConfig, ClusterIndex, MapFeature};
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "geolens_cli",
    about = "Inspect cluster indexes and color ramps"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a cluster index from a GeoJSON file and print per-zoom
    /// cluster counts
    Clusters {
        /// Path to a GeoJSON feature collection
        file: PathBuf,
        /// First zoom level to report
        #[arg(long, default_value = "0")]
        from: i32,
        /// Last zoom level to report
        #[arg(long, default_value = "17")]
        to: i32,
        /// Aggregation radius in pixels
        #[arg(long, default_value = "50")]
        radius: f64,
    },
    /// Fetch a dataset's features from the API and summarize them
    Fetch {
        /// Dataset id
        dataset_id: Uuid,
        /// API base URL
        #[arg(long, default_value = "http://localhost:8000")]
        base_url: String,
        /// Bearer token for non-public datasets
        #[arg(long)]
        token: Option<String>,
    },
    /// Print a color ramp sampled at evenly spaced points
    Preview {
        /// Ramp name (see `ramps`)
        ramp: String,
        /// Number of samples
        #[arg(long, default_value = "16")]
        width: usize,
    },
    /// List the built-in color ramps
    Ramps,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Clusters {
            file,
            from,
            to,
            radius,
        } => {
            let text = fs::read_to_string(&file)?;
            let collection: FeatureCollection = serde_json::from_str(&text)?;
            print_cluster_summary(collection, from, to, radius);
        }
        Commands::Fetch {
            dataset_id,
            base_url,
            token,
        } => {
            let tokens = MemoryTokenStore::new();
            if let Some(token) = token {
                tokens.set_token(&token);
            }
            let source = HttpFeatureSource::new(&base_url)
                .with_tokens(Arc::new(tokens) as Arc<dyn TokenProvider>);
            let collection = source.fetch_features(dataset_id).await?;
            println!(
                "Dataset {dataset_id}: {} features",
                collection.features.len()
            );
            print_cluster_summary(collection, 0, 17, 50.0);
        }
        Commands::Preview { ramp, width } => {
            for color in geolens_ramp::generate_preview(&ramp, width) {
                print!("{} ", color.display_rgb());
            }
            println!();
        }
        Commands::Ramps => {
            for name in geolens_ramp::ramp_names() {
                println!("{name}");
            }
        }
    }

    Ok(())
}

fn print_cluster_summary(collection: FeatureCollection, from: i32, to: i32, radius: f64) {
    let config = ClusterConfig {
        radius_px: radius,
        ..ClusterConfig::default()
    };
    let index = ClusterIndex::from_collection(collection, config);
    if !index.has_points() {
        println!("No point geometries to cluster.");
        return;
    }

    println!("{:<6} {:<10} {:<10} LARGEST", "ZOOM", "CLUSTERS", "POINTS");
    for zoom in from..=to {
        let features = index.query(&BoundingBox::WORLD, zoom);
        let clusters = features.iter().filter(|f| f.is_cluster()).count();
        let singles = features.len() - clusters;
        let largest = features
            .iter()
            .map(MapFeature::point_count)
            .max()
            .unwrap_or(0);
        println!("{zoom:<6} {clusters:<10} {singles:<10} {largest}");
    }
}
