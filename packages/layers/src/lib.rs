#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-dataset rendering strategy and layer descriptor assembly.
//!
//! For each visible dataset the assembler decides whether client-side
//! clustering applies, obtains the feature collection (reusing a
//! caller-supplied one when available), queries the clustering index at
//! the floored zoom, resolves the style configuration, and emits one
//! [`LayerDescriptor`] for the map renderer.
//!
//! Datasets that are not cluster-eligible — non-point geometry, or at
//! least [`CLUSTER_FEATURE_LIMIT`] known features — take an external
//! rendering path; [`LayerAssembler::clustered_layer`] signals that
//! branch with `None`, never with an error.

use std::sync::Arc;

use geojson::FeatureCollection;
use geolens_catalog_models::{DatasetDescriptor, GeometryKind};
use geolens_client::FeatureSource;
use geolens_cluster::{BoundingBox, ClusterConfig, ClusterIndex, ClusterStore, MapFeature};
use geolens_style::{ColorAccessor, RadiusAccessor, UpdateTriggers, resolve};
use hex_color::HexColor;
use uuid::Uuid;

/// Datasets at or above this known feature count are never clustered
/// client-side; they render through server-side tiling instead.
pub const CLUSTER_FEATURE_LIMIT: u64 = 10_000;

/// Returns `true` if a dataset qualifies for client-side clustering:
/// point-type geometry and a known feature count below
/// [`CLUSTER_FEATURE_LIMIT`]. An unrecorded count qualifies (the
/// catalog records it during upload processing; absence means the
/// dataset never went through the large-file path).
#[must_use]
pub fn should_cluster(descriptor: &DatasetDescriptor) -> bool {
    descriptor.geometry_kind.is_some_and(GeometryKind::is_point)
        && descriptor
            .feature_count
            .is_none_or(|count| count < CLUSTER_FEATURE_LIMIT)
}

/// A renderable layer: one per visible dataset, consumed by the map
/// renderer.
#[derive(Debug)]
pub struct LayerDescriptor {
    /// Renderer layer id, stable per dataset.
    pub id: String,
    /// The features to draw, clustered or original.
    pub features: Vec<MapFeature>,
    /// Whether features respond to hover/click picking.
    pub pickable: bool,
    /// Whether outlines are drawn.
    pub stroked: bool,
    /// Whether fills are drawn.
    pub filled: bool,
    /// Stroke width in pixels.
    pub line_width: f64,
    /// Stroke color.
    pub line_color: HexColor,
    /// Fill color accessor.
    pub fill: ColorAccessor,
    /// Point radius accessor.
    pub radius: RadiusAccessor,
    /// Trigger values for downstream accessor memo invalidation.
    pub triggers: UpdateTriggers,
}

/// Builds layer descriptors and owns the cluster index cache.
pub struct LayerAssembler {
    source: Arc<dyn FeatureSource>,
    store: ClusterStore,
    cluster_config: ClusterConfig,
}

impl LayerAssembler {
    /// Creates an assembler fetching features from `source`, with the
    /// default aggregation configuration.
    #[must_use]
    pub fn new(source: Arc<dyn FeatureSource>) -> Self {
        Self {
            source,
            store: ClusterStore::new(),
            cluster_config: ClusterConfig::default(),
        }
    }

    /// Overrides the aggregation configuration for newly built indexes.
    #[must_use]
    pub fn with_cluster_config(mut self, config: ClusterConfig) -> Self {
        self.cluster_config = config;
        self
    }

    /// Builds the clustered layer for a dataset at the current
    /// viewport, or `None` when the caller must use the non-clustering
    /// path.
    ///
    /// `None` is returned for ineligible datasets, failed fetches
    /// (logged, never raised), and collections without point
    /// geometries. The index is built on first use and reused across
    /// zoom changes; `reuse` supplies an already-fetched collection and
    /// skips the fetch when no index is cached yet.
    ///
    /// Cluster composition depends only on `floor(zoom)`, so fractional
    /// zoom changes never trigger a re-query.
    pub async fn clustered_layer(
        &mut self,
        descriptor: &DatasetDescriptor,
        bounds: &BoundingBox,
        zoom: f64,
        reuse: Option<FeatureCollection>,
    ) -> Option<LayerDescriptor> {
        if !should_cluster(descriptor) {
            log::debug!(
                "Dataset {} ({:?}, {:?} features) is not cluster-eligible",
                descriptor.id,
                descriptor.geometry_kind,
                descriptor.feature_count,
            );
            return None;
        }

        if !self.store.contains(descriptor.id) {
            let collection = match reuse {
                Some(collection) => collection,
                None => match self.source.fetch_features(descriptor.id).await {
                    Ok(collection) => collection,
                    Err(e) => {
                        log::error!(
                            "Failed to fetch features for dataset {}: {e}",
                            descriptor.id
                        );
                        return None;
                    }
                },
            };
            let index = ClusterIndex::from_collection(collection, self.cluster_config.clone());
            if !index.has_points() {
                log::warn!(
                    "Dataset {} contains no point geometries, using direct rendering",
                    descriptor.id
                );
                return None;
            }
            self.store.insert(descriptor.id, index);
        }

        let index = self.store.get(descriptor.id)?;
        #[allow(clippy::cast_possible_truncation)]
        let features = index.query(bounds, zoom.floor() as i32);
        Some(build_descriptor(descriptor, features))
    }

    /// Access to a cached index, e.g. for cluster expansion on click.
    #[must_use]
    pub fn index(&self, dataset_id: Uuid) -> Option<&ClusterIndex> {
        self.store.get(dataset_id)
    }

    /// Drops one dataset's cached index (dataset removed from the
    /// visible set, or its features changed server-side).
    pub fn invalidate(&mut self, dataset_id: Uuid) -> bool {
        self.store.invalidate(dataset_id)
    }

    /// Drops every cached index.
    pub fn clear_cache(&mut self) {
        self.store.clear();
    }

    /// Number of cached cluster indexes.
    #[must_use]
    pub fn cached_datasets(&self) -> usize {
        self.store.len()
    }
}

/// Builds the descriptor for the non-clustering path: the original
/// collection rendered directly, with the same style resolution but a
/// constant point radius.
#[must_use]
pub fn direct_layer(
    descriptor: &DatasetDescriptor,
    collection: &FeatureCollection,
) -> LayerDescriptor {
    let features = collection
        .features
        .iter()
        .cloned()
        .map(MapFeature::Single)
        .collect();
    let mut layer = build_descriptor(descriptor, features);
    layer.radius = RadiusAccessor::Constant(descriptor.style.point_radius);
    layer
}

fn build_descriptor(descriptor: &DatasetDescriptor, features: Vec<MapFeature>) -> LayerDescriptor {
    let resolved = resolve(&descriptor.style);
    LayerDescriptor {
        id: format!("dataset-{}", descriptor.id),
        features,
        pickable: true,
        stroked: descriptor.style.line_width > 0.0,
        filled: true,
        line_width: descriptor.style.line_width,
        line_color: resolved.line_color,
        fill: resolved.fill,
        radius: resolved.radius,
        triggers: resolved.triggers,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use geojson::{Feature, Geometry, Value as GeoValue};
    use geolens_client::{ClientError, StaticFeatureSource};
    use geolens_style_models::StyleMode;
    use serde_json::{Map, Value};

    use super::*;

    fn point(lng: f64, lat: f64, value: f64) -> Feature {
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoValue::Point(vec![lng, lat]))),
            id: None,
            properties: Some(Map::from_iter([(
                "value".to_string(),
                Value::from(value),
            )])),
            foreign_members: None,
        }
    }

    fn collection(features: Vec<Feature>) -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    fn close_triplet() -> FeatureCollection {
        collection(vec![
            point(2.3500, 48.8500, 10.0),
            point(2.3510, 48.8505, 50.0),
            point(2.3490, 48.8495, 90.0),
        ])
    }

    fn point_descriptor() -> DatasetDescriptor {
        DatasetDescriptor::vector("Stations", GeometryKind::Point)
    }

    /// Counts fetches so cache behavior is observable.
    struct CountingSource {
        collection: FeatureCollection,
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl FeatureSource for CountingSource {
        async fn fetch_features(
            &self,
            _dataset_id: Uuid,
        ) -> Result<FeatureCollection, ClientError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.collection.clone())
        }
    }

    #[test]
    fn eligibility_requires_point_geometry_under_limit() {
        let mut descriptor = point_descriptor();
        assert!(should_cluster(&descriptor));

        descriptor.feature_count = Some(9_999);
        assert!(should_cluster(&descriptor));

        descriptor.feature_count = Some(CLUSTER_FEATURE_LIMIT);
        assert!(!should_cluster(&descriptor));

        descriptor.feature_count = Some(15_000);
        assert!(!should_cluster(&descriptor));

        let mut lines = DatasetDescriptor::vector("Roads", GeometryKind::LineString);
        lines.feature_count = Some(10);
        assert!(!should_cluster(&lines));

        let mut raster = point_descriptor();
        raster.geometry_kind = None;
        assert!(!should_cluster(&raster));
    }

    #[tokio::test]
    async fn close_points_cluster_then_split_by_zoom() {
        let descriptor = point_descriptor();
        let source =
            StaticFeatureSource::new().with_collection(descriptor.id, close_triplet());
        let mut assembler = LayerAssembler::new(Arc::new(source));

        let low = assembler
            .clustered_layer(&descriptor, &BoundingBox::WORLD, 2.7, None)
            .await
            .expect("eligible dataset should produce a layer");
        assert_eq!(low.features.len(), 1);
        assert!(low.features[0].is_cluster());
        assert_eq!(low.features[0].point_count(), 3);

        let high = assembler
            .clustered_layer(&descriptor, &BoundingBox::WORLD, 17.2, None)
            .await
            .unwrap();
        assert_eq!(high.features.len(), 3);
        assert!(high.features.iter().all(|f| !f.is_cluster()));
    }

    #[tokio::test]
    async fn ineligible_dataset_returns_sentinel() {
        let mut descriptor = point_descriptor();
        descriptor.feature_count = Some(15_000);
        let source =
            StaticFeatureSource::new().with_collection(descriptor.id, close_triplet());
        let mut assembler = LayerAssembler::new(Arc::new(source));

        let layer = assembler
            .clustered_layer(&descriptor, &BoundingBox::WORLD, 5.0, None)
            .await;
        assert!(layer.is_none());
        assert_eq!(assembler.cached_datasets(), 0);
    }

    #[tokio::test]
    async fn fetch_failure_yields_none_not_panic() {
        let descriptor = point_descriptor();
        let mut assembler = LayerAssembler::new(Arc::new(StaticFeatureSource::new()));

        let layer = assembler
            .clustered_layer(&descriptor, &BoundingBox::WORLD, 5.0, None)
            .await;
        assert!(layer.is_none());
        // Failures are not cached; a later pass retries naturally.
        assert_eq!(assembler.cached_datasets(), 0);
    }

    #[tokio::test]
    async fn collection_without_points_yields_none() {
        let descriptor = point_descriptor();
        let lines = collection(vec![Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoValue::LineString(vec![
                vec![0.0, 0.0],
                vec![1.0, 1.0],
            ]))),
            id: None,
            properties: None,
            foreign_members: None,
        }]);
        let source = StaticFeatureSource::new().with_collection(descriptor.id, lines);
        let mut assembler = LayerAssembler::new(Arc::new(source));

        let layer = assembler
            .clustered_layer(&descriptor, &BoundingBox::WORLD, 5.0, None)
            .await;
        assert!(layer.is_none());
    }

    #[tokio::test]
    async fn index_is_cached_across_zoom_changes() {
        let descriptor = point_descriptor();
        let source = Arc::new(CountingSource {
            collection: close_triplet(),
            fetches: AtomicUsize::new(0),
        });
        let mut assembler = LayerAssembler::new(Arc::clone(&source) as Arc<dyn FeatureSource>);

        for zoom in [2.0, 9.5, 17.0] {
            assembler
                .clustered_layer(&descriptor, &BoundingBox::WORLD, zoom, None)
                .await
                .unwrap();
        }
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);

        assert!(assembler.invalidate(descriptor.id));
        assembler
            .clustered_layer(&descriptor, &BoundingBox::WORLD, 2.0, None)
            .await
            .unwrap();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn caller_supplied_collection_skips_fetch() {
        let descriptor = point_descriptor();
        let source = Arc::new(CountingSource {
            collection: close_triplet(),
            fetches: AtomicUsize::new(0),
        });
        let mut assembler = LayerAssembler::new(Arc::clone(&source) as Arc<dyn FeatureSource>);

        let layer = assembler
            .clustered_layer(&descriptor, &BoundingBox::WORLD, 3.0, Some(close_triplet()))
            .await
            .unwrap();
        assert_eq!(layer.features[0].point_count(), 3);
        assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn graduated_styling_flows_end_to_end() {
        let mut descriptor = point_descriptor();
        descriptor.style.mode = StyleMode::Graduated {
            field: "value".to_string(),
            ramp: "viridis".to_string(),
            min: 0.0,
            max: 100.0,
        };
        let source =
            StaticFeatureSource::new().with_collection(descriptor.id, close_triplet());
        let mut assembler = LayerAssembler::new(Arc::new(source));

        let layer = assembler
            .clustered_layer(&descriptor, &BoundingBox::WORLD, 18.0, None)
            .await
            .unwrap();

        let mid = layer
            .features
            .iter()
            .find(|f| f.property("value") == Some(&Value::from(50.0)))
            .unwrap();
        assert_eq!(
            layer.fill.eval(mid),
            geolens_ramp::interpolate("viridis", 0.5)
        );

        // Aggregates bypass attribute styling.
        let low = assembler
            .clustered_layer(&descriptor, &BoundingBox::WORLD, 2.0, None)
            .await
            .unwrap();
        assert_eq!(
            low.fill.eval(&low.features[0]),
            descriptor.style.cluster_fill_color
        );
    }

    #[test]
    fn direct_layer_renders_originals_with_constant_radius() {
        let mut descriptor = DatasetDescriptor::vector("Roads", GeometryKind::LineString);
        descriptor.style.line_width = 2.0;
        let layer = direct_layer(&descriptor, &close_triplet());

        assert_eq!(layer.features.len(), 3);
        assert!(layer.features.iter().all(|f| !f.is_cluster()));
        assert!(layer.stroked);
        assert!(matches!(layer.radius, RadiusAccessor::Constant(r) if r == descriptor.style.point_radius));
        assert_eq!(layer.id, format!("dataset-{}", descriptor.id));
    }
}
