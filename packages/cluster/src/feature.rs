//! Query result features: original points and synthetic aggregates.

use std::fmt;

use geojson::{Feature, Geometry, Value as GeoValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identifier of a cluster, usable to expand it at finer zoom. The
/// value itself carries no meaning outside the index that produced it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ClusterId(pub u64);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cluster-{}", self.0)
    }
}

/// A synthetic aggregate standing in for multiple nearby points.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterFeature {
    /// Expansion handle.
    pub id: ClusterId,
    /// Number of source points aggregated into this cluster.
    pub point_count: u64,
    /// Representative longitude (count-weighted centroid).
    pub longitude: f64,
    /// Representative latitude (count-weighted centroid).
    pub latitude: f64,
}

/// One entry of a clustering query result: either an original point
/// feature or a synthetic cluster.
#[derive(Debug, Clone, PartialEq)]
pub enum MapFeature {
    /// An original feature, properties intact.
    Single(Feature),
    /// An aggregate of two or more nearby points.
    Cluster(ClusterFeature),
}

impl MapFeature {
    /// Returns `true` for aggregate cluster features.
    #[must_use]
    pub const fn is_cluster(&self) -> bool {
        matches!(self, Self::Cluster(_))
    }

    /// Number of source points this entry represents.
    #[must_use]
    pub const fn point_count(&self) -> u64 {
        match self {
            Self::Single(_) => 1,
            Self::Cluster(cluster) => cluster.point_count,
        }
    }

    /// The feature's coordinate, if it has a point geometry.
    #[must_use]
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::Cluster(cluster) => Some((cluster.longitude, cluster.latitude)),
            Self::Single(feature) => match feature.geometry.as_ref().map(|g| &g.value) {
                Some(GeoValue::Point(coords)) if coords.len() >= 2 => {
                    Some((coords[0], coords[1]))
                }
                _ => None,
            },
        }
    }

    /// Looks up a property on a single feature. Clusters carry no
    /// source properties and always return `None`.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Single(feature) => feature.properties.as_ref()?.get(key),
            Self::Cluster(_) => None,
        }
    }

    /// Materializes the renderer-facing `GeoJSON` shape: clusters become
    /// point features with `cluster`, `pointCount`, and `clusterId`
    /// properties; singles keep their properties plus `cluster: false`.
    #[must_use]
    pub fn to_feature(&self) -> Feature {
        match self {
            Self::Single(feature) => {
                let mut feature = feature.clone();
                feature
                    .properties
                    .get_or_insert_with(Map::new)
                    .insert("cluster".to_string(), Value::Bool(false));
                feature
            }
            Self::Cluster(cluster) => {
                let mut properties = Map::new();
                properties.insert("cluster".to_string(), Value::Bool(true));
                properties.insert("pointCount".to_string(), cluster.point_count.into());
                properties.insert("clusterId".to_string(), cluster.id.0.into());
                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(GeoValue::Point(vec![
                        cluster.longitude,
                        cluster.latitude,
                    ]))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_feature(lng: f64, lat: f64) -> Feature {
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoValue::Point(vec![lng, lat]))),
            id: None,
            properties: Some(Map::from_iter([(
                "name".to_string(),
                Value::String("station".to_string()),
            )])),
            foreign_members: None,
        }
    }

    #[test]
    fn single_keeps_properties_and_gains_cluster_false() {
        let single = MapFeature::Single(point_feature(-77.0, 38.9));
        assert!(!single.is_cluster());
        assert_eq!(single.point_count(), 1);
        assert_eq!(single.position(), Some((-77.0, 38.9)));

        let feature = single.to_feature();
        let props = feature.properties.unwrap();
        assert_eq!(props["cluster"], Value::Bool(false));
        assert_eq!(props["name"], Value::String("station".to_string()));
    }

    #[test]
    fn cluster_materializes_synthetic_properties() {
        let cluster = MapFeature::Cluster(ClusterFeature {
            id: ClusterId(7),
            point_count: 12,
            longitude: 2.35,
            latitude: 48.85,
        });
        assert!(cluster.is_cluster());
        assert_eq!(cluster.point_count(), 12);
        assert_eq!(cluster.property("name"), None);

        let feature = cluster.to_feature();
        let props = feature.properties.unwrap();
        assert_eq!(props["cluster"], Value::Bool(true));
        assert_eq!(props["pointCount"], Value::from(12));
        assert_eq!(props["clusterId"], Value::from(7));
    }
}
