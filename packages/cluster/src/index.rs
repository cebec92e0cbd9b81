//! Zoom-banded greedy aggregation over an R-tree hierarchy.
//!
//! One level is materialized per integer zoom in the aggregation band,
//! built coarse-to-fine by merging the next finer level. The pixel
//! radius is rescaled into world units per zoom, so cluster composition
//! depends only on the integer zoom value.

use std::collections::BTreeMap;

use geojson::{Feature, FeatureCollection, Geometry, Value as GeoValue};
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::feature::{ClusterFeature, ClusterId, MapFeature};
use crate::{BoundingBox, mercator};

/// Aggregation parameters for one dataset's index.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    /// Aggregation radius in screen pixels. Fixed in pixels, so the
    /// geographic footprint of a cluster shrinks as zoom increases.
    pub radius_px: f64,
    /// Coarsest integer zoom at which points are merged. Below it every
    /// feature renders individually.
    pub min_zoom: i32,
    /// Finest integer zoom at which points are merged. Above it every
    /// feature renders individually.
    pub max_zoom: i32,
    /// World tile extent in pixels at zoom 0.
    pub extent: f64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            radius_px: 50.0,
            min_zoom: 0,
            max_zoom: 16,
            extent: 512.0,
        }
    }
}

/// R-tree entry referencing one node of a level.
struct LevelEntry {
    pos: [f64; 2],
    node: usize,
}

impl RTreeObject for LevelEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.pos)
    }
}

impl PointDistance for LevelEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.pos[0] - point[0];
        let dy = self.pos[1] - point[1];
        dx.mul_add(dx, dy * dy)
    }
}

#[derive(Clone)]
enum NodeKind {
    /// One source point; `feature` indexes the owned feature list.
    Leaf { feature: usize },
    /// An aggregate created at some level and possibly carried to
    /// coarser ones unchanged.
    Cluster { id: ClusterId },
}

#[derive(Clone)]
struct Node {
    x: f64,
    y: f64,
    count: u64,
    kind: NodeKind,
}

/// All nodes visible at one integer zoom, plus their R-tree.
struct Level {
    nodes: Vec<Node>,
    tree: RTree<LevelEntry>,
}

impl Level {
    fn build(nodes: Vec<Node>) -> Self {
        let entries = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| LevelEntry {
                pos: [n.x, n.y],
                node: i,
            })
            .collect();
        Self {
            nodes,
            tree: RTree::bulk_load(entries),
        }
    }
}

/// Membership record for one cluster: the zoom it was created at and
/// its child node indices in the next finer level.
struct ClusterMeta {
    zoom: i32,
    children: Vec<usize>,
}

/// Spatial aggregation index over one dataset's point features.
///
/// Built once from the fetched feature collection, which it retains;
/// repeated queries at different zoom levels reuse the same index.
pub struct ClusterIndex {
    config: ClusterConfig,
    features: Vec<Feature>,
    leaves: Level,
    levels: BTreeMap<i32, Level>,
    clusters: BTreeMap<ClusterId, ClusterMeta>,
}

impl ClusterIndex {
    /// Builds an index from a feature collection, retaining its point
    /// features. `Point` geometries contribute one leaf each;
    /// `MultiPoint` geometries contribute one leaf per part, all
    /// sharing the source feature's properties. Features of any other
    /// geometry kind are skipped.
    #[must_use]
    pub fn from_collection(collection: FeatureCollection, config: ClusterConfig) -> Self {
        let mut features = Vec::new();
        let mut leaf_nodes = Vec::new();
        let mut skipped = 0usize;

        for feature in collection.features {
            match feature.geometry.as_ref().map(|g| &g.value) {
                Some(GeoValue::Point(coords)) if coords.len() >= 2 => {
                    leaf_nodes.push(Self::leaf(coords[0], coords[1], features.len()));
                    features.push(feature);
                }
                Some(GeoValue::MultiPoint(parts)) if !parts.is_empty() => {
                    for part in parts {
                        if part.len() >= 2 {
                            leaf_nodes.push(Self::leaf(part[0], part[1], features.len()));
                        }
                    }
                    features.push(feature);
                }
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            log::debug!("Skipped {skipped} non-point features while building cluster index");
        }

        let leaves = Level::build(leaf_nodes);
        let mut clusters = BTreeMap::new();
        let mut next_id = 0u64;

        let mut built: Vec<(i32, Level)> = Vec::new();
        for zoom in (config.min_zoom..=config.max_zoom).rev() {
            let prev = built.last().map_or(&leaves, |(_, level)| level);
            let nodes = aggregate(prev, zoom, &config, &mut clusters, &mut next_id);
            built.push((zoom, Level::build(nodes)));
        }

        log::info!(
            "Built cluster index: {} points, zoom band {}..={}",
            leaves.nodes.len(),
            config.min_zoom,
            config.max_zoom,
        );

        Self {
            config,
            features,
            leaves,
            levels: built.into_iter().collect(),
            clusters,
        }
    }

    fn leaf(lng: f64, lat: f64, feature: usize) -> Node {
        Node {
            x: mercator::lng_to_x(lng),
            y: mercator::lat_to_y(lat),
            count: 1,
            kind: NodeKind::Leaf { feature },
        }
    }

    /// Returns every cluster and point visible in `bounds` at the given
    /// integer zoom. A pure function of the index: identical arguments
    /// return identical results.
    ///
    /// Outside the aggregation band (`zoom < min_zoom` or
    /// `zoom > max_zoom`) features are never merged. Viewports crossing
    /// the antimeridian (`west > east`) are handled as two envelopes.
    #[must_use]
    pub fn query(&self, bounds: &BoundingBox, zoom: i32) -> Vec<MapFeature> {
        let level = self.level_for_zoom(zoom);
        let mut out = Vec::new();
        if bounds.west > bounds.east {
            self.collect(level, bounds.west, 180.0, bounds.south, bounds.north, &mut out);
            self.collect(level, -180.0, bounds.east, bounds.south, bounds.north, &mut out);
        } else {
            self.collect(
                level,
                bounds.west,
                bounds.east,
                bounds.south,
                bounds.north,
                &mut out,
            );
        }
        out
    }

    /// Expands one cluster a single level: the clusters/points it was
    /// merged from. Unknown ids return an empty list.
    #[must_use]
    pub fn children(&self, id: ClusterId) -> Vec<MapFeature> {
        let Some(meta) = self.clusters.get(&id) else {
            return Vec::new();
        };
        let child_level = if meta.zoom >= self.config.max_zoom {
            &self.leaves
        } else {
            self.levels.get(&(meta.zoom + 1)).unwrap_or(&self.leaves)
        };
        meta.children
            .iter()
            .map(|&idx| self.node_feature(&child_level.nodes[idx]))
            .collect()
    }

    /// The first integer zoom at which the cluster splits into more
    /// than one entry. Unknown ids return `None`.
    #[must_use]
    pub fn expansion_zoom(&self, id: ClusterId) -> Option<i32> {
        self.clusters.get(&id).map(|meta| meta.zoom + 1)
    }

    /// Number of indexed source features.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Returns `true` if the collection contained at least one point.
    #[must_use]
    pub fn has_points(&self) -> bool {
        !self.leaves.nodes.is_empty()
    }

    /// The aggregation configuration this index was built with.
    #[must_use]
    pub const fn config(&self) -> &ClusterConfig {
        &self.config
    }

    fn level_for_zoom(&self, zoom: i32) -> &Level {
        if zoom < self.config.min_zoom || zoom > self.config.max_zoom {
            return &self.leaves;
        }
        self.levels.get(&zoom).unwrap_or(&self.leaves)
    }

    fn collect(
        &self,
        level: &Level,
        west: f64,
        east: f64,
        south: f64,
        north: f64,
        out: &mut Vec<MapFeature>,
    ) {
        let env = AABB::from_corners(
            [mercator::lng_to_x(west), mercator::lat_to_y(north)],
            [mercator::lng_to_x(east), mercator::lat_to_y(south)],
        );
        for entry in level.tree.locate_in_envelope(&env) {
            out.push(self.node_feature(&level.nodes[entry.node]));
        }
    }

    fn node_feature(&self, node: &Node) -> MapFeature {
        match &node.kind {
            NodeKind::Leaf { feature } => {
                let source = &self.features[*feature];
                let single = match source.geometry.as_ref().map(|g| &g.value) {
                    Some(GeoValue::Point(_)) => source.clone(),
                    // MultiPoint leaves materialize as a single-part
                    // point feature at the leaf's own coordinate.
                    _ => Feature {
                        bbox: None,
                        geometry: Some(Geometry::new(GeoValue::Point(vec![
                            mercator::x_to_lng(node.x),
                            mercator::y_to_lat(node.y),
                        ]))),
                        id: source.id.clone(),
                        properties: source.properties.clone(),
                        foreign_members: None,
                    },
                };
                MapFeature::Single(single)
            }
            NodeKind::Cluster { id } => MapFeature::Cluster(ClusterFeature {
                id: *id,
                point_count: node.count,
                longitude: mercator::x_to_lng(node.x),
                latitude: mercator::y_to_lat(node.y),
            }),
        }
    }
}

/// Merges the nodes of `prev` (the next finer level) at `zoom`'s world
/// radius. Nodes with no unmerged neighbor are carried over unchanged.
#[allow(clippy::cast_precision_loss)]
fn aggregate(
    prev: &Level,
    zoom: i32,
    config: &ClusterConfig,
    clusters: &mut BTreeMap<ClusterId, ClusterMeta>,
    next_id: &mut u64,
) -> Vec<Node> {
    let radius = config.radius_px / (config.extent * 2f64.powi(zoom));
    let radius_sq = radius * radius;

    let mut merged = vec![false; prev.nodes.len()];
    let mut out = Vec::with_capacity(prev.nodes.len());

    for i in 0..prev.nodes.len() {
        if merged[i] {
            continue;
        }
        merged[i] = true;
        let node = &prev.nodes[i];

        let neighbors: Vec<usize> = prev
            .tree
            .locate_within_distance([node.x, node.y], radius_sq)
            .map(|entry| entry.node)
            .filter(|&j| !merged[j])
            .collect();

        if neighbors.is_empty() {
            out.push(node.clone());
            continue;
        }

        let mut count = node.count;
        let mut weighted_x = node.x * node.count as f64;
        let mut weighted_y = node.y * node.count as f64;
        let mut children = vec![i];
        for j in neighbors {
            merged[j] = true;
            let member = &prev.nodes[j];
            count += member.count;
            weighted_x += member.x * member.count as f64;
            weighted_y += member.y * member.count as f64;
            children.push(j);
        }

        let id = ClusterId(*next_id);
        *next_id += 1;
        clusters.insert(id, ClusterMeta { zoom, children });
        out.push(Node {
            x: weighted_x / count as f64,
            y: weighted_y / count as f64,
            count,
            kind: NodeKind::Cluster { id },
        });
    }

    out
}
