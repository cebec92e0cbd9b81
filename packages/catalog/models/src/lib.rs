#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset catalog descriptor types.
//!
//! These mirror the shape of a catalog entry as served by the dataset
//! API. The catalog owns them; the rendering engine treats a descriptor
//! as read-only input keyed by its id, and reads only the id, geometry
//! kind, feature count, and style configuration.

use chrono::{DateTime, Utc};
use geolens_style_models::StyleConfig;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use uuid::Uuid;

/// Whether a dataset holds vector features or raster imagery.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DataKind {
    /// Vector features (points, lines, polygons).
    Vector,
    /// Raster imagery. Never cluster-eligible.
    Raster,
}

/// Geometry kind of a vector dataset, in `GeoJSON` spelling.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum GeometryKind {
    /// Single point per feature.
    Point,
    /// Multiple points per feature.
    MultiPoint,
    /// Single line per feature.
    LineString,
    /// Multiple lines per feature.
    MultiLineString,
    /// Single polygon per feature.
    Polygon,
    /// Multiple polygons per feature.
    MultiPolygon,
}

impl GeometryKind {
    /// Returns `true` for the point-type kinds, the only ones eligible
    /// for client-side clustering.
    #[must_use]
    pub const fn is_point(self) -> bool {
        matches!(self, Self::Point | Self::MultiPoint)
    }
}

/// A dataset catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDescriptor {
    /// Unique dataset id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Vector or raster.
    pub data_kind: DataKind,
    /// Geometry kind; `None` for raster datasets.
    pub geometry_kind: Option<GeometryKind>,
    /// Format the dataset was uploaded in (geojson, shapefile, ...).
    pub source_format: String,
    /// Spatial reference id of the stored geometries.
    pub srid: i32,
    /// Feature count recorded at upload processing time.
    pub feature_count: Option<u64>,
    /// Paint configuration.
    #[serde(default, rename = "styleConfig")]
    pub style: StyleConfig,
    /// `[minx, miny, maxx, maxy]` extent in WGS84.
    pub bounds: Option<[f64; 4]>,
    /// Minimum display zoom.
    pub min_zoom: i32,
    /// Maximum display zoom.
    pub max_zoom: i32,
    /// Whether the dataset is currently shown on the map.
    pub is_visible: bool,
    /// Whether the dataset is readable without authentication.
    pub is_public: bool,
    /// Catalog entry creation time.
    pub created_at: DateTime<Utc>,
    /// Last catalog entry update time.
    pub updated_at: DateTime<Utc>,
}

impl DatasetDescriptor {
    /// Creates a descriptor for a vector dataset with default style and
    /// zoom limits. Intended for callers assembling descriptors outside
    /// the catalog API (tests, local files).
    #[must_use]
    pub fn vector(name: &str, geometry_kind: GeometryKind) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            data_kind: DataKind::Vector,
            geometry_kind: Some(geometry_kind),
            source_format: "geojson".to_string(),
            srid: 4326,
            feature_count: None,
            style: StyleConfig::default(),
            bounds: None,
            min_zoom: 0,
            max_zoom: 22,
            is_visible: true,
            is_public: false,
            created_at: now,
            updated_at: now,
        }
    }
}
