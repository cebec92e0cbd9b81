#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spatial aggregation of point features into zoom-dependent clusters.
//!
//! An index is built once per dataset from its fetched point features
//! and answers "which clusters/points are visible at this integer zoom"
//! queries. Indexes live in a [`ClusterStore`] keyed by dataset id and
//! persist across zoom changes; only the query changes, never the
//! index.

mod feature;
mod index;
mod mercator;
mod store;

pub use feature::{ClusterFeature, ClusterId, MapFeature};
pub use index::{ClusterConfig, ClusterIndex};
pub use store::ClusterStore;

use serde::{Deserialize, Serialize};

/// A geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude boundary.
    pub west: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Northern latitude boundary.
    pub north: f64,
}

impl BoundingBox {
    /// The whole world.
    pub const WORLD: Self = Self::new(-180.0, -90.0, 180.0, 90.0);

    /// Creates a new bounding box from the given coordinates.
    ///
    /// A box with `west > east` is interpreted as crossing the
    /// antimeridian.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }
}
