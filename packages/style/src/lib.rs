#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Resolves a dataset's [`StyleConfig`] into paint accessors.
//!
//! The resolver never fails: a misconfigured style (missing attribute
//! field, unknown ramp, unparsable value) degrades to the uniform fill
//! color for the affected features. Aggregate cluster features bypass
//! attribute styling entirely and always paint with the cluster fill
//! color, in every mode.
//!
//! Per-feature accessors close over their configuration, which makes
//! their state opaque to downstream change detection; the accompanying
//! [`UpdateTriggers`] carry the primitive values whose change must
//! force the renderer to recompute.

use std::fmt;

use geolens_cluster::MapFeature;
use geolens_style_models::{StyleConfig, StyleMode};
use hex_color::HexColor;
use serde::Serialize;
use serde_json::Value;

/// Fill color for a feature: a constant, or a function of the feature.
///
/// Dispatched explicitly by the rendering adapter instead of relying on
/// runtime type inspection.
pub enum ColorAccessor {
    /// Every feature paints the same color.
    Constant(HexColor),
    /// Color is computed per feature.
    PerFeature(Box<dyn Fn(&MapFeature) -> HexColor + Send + Sync>),
}

impl ColorAccessor {
    /// Evaluates the accessor for one feature.
    #[must_use]
    pub fn eval(&self, feature: &MapFeature) -> HexColor {
        match self {
            Self::Constant(color) => *color,
            Self::PerFeature(f) => f(feature),
        }
    }
}

impl fmt::Debug for ColorAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(color) => f.debug_tuple("Constant").field(color).finish(),
            Self::PerFeature(_) => f.write_str("PerFeature(..)"),
        }
    }
}

/// Point radius in pixels: a constant, or a function of the feature.
pub enum RadiusAccessor {
    /// Every feature renders at the same radius.
    Constant(f64),
    /// Radius is computed per feature.
    PerFeature(Box<dyn Fn(&MapFeature) -> f64 + Send + Sync>),
}

impl RadiusAccessor {
    /// Evaluates the accessor for one feature.
    #[must_use]
    pub fn eval(&self, feature: &MapFeature) -> f64 {
        match self {
            Self::Constant(radius) => *radius,
            Self::PerFeature(f) => f(feature),
        }
    }
}

impl fmt::Debug for RadiusAccessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(radius) => f.debug_tuple("Constant").field(radius).finish(),
            Self::PerFeature(_) => f.write_str("PerFeature(..)"),
        }
    }
}

/// Primitive values whose change must invalidate the renderer's
/// memoized accessors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTriggers {
    /// Values feeding the fill color accessor.
    pub fill_color: Vec<Value>,
    /// Values feeding the radius accessor.
    pub radius: Vec<Value>,
}

/// The resolver's output for one dataset.
#[derive(Debug)]
pub struct ResolvedStyle {
    /// Fill color accessor.
    pub fill: ColorAccessor,
    /// Stroke color constant.
    pub line_color: HexColor,
    /// Point radius accessor.
    pub radius: RadiusAccessor,
    /// Invalidation trigger values.
    pub triggers: UpdateTriggers,
}

/// Resolves a style configuration into paint accessors.
#[must_use]
pub fn resolve(style: &StyleConfig) -> ResolvedStyle {
    ResolvedStyle {
        fill: fill_accessor(style),
        line_color: style.line_color,
        radius: radius_accessor(style),
        triggers: update_triggers(style),
    }
}

/// Normalizes a value into `[0, 1]` over the `[min, max]` domain.
///
/// Out-of-range values clamp to the endpoints. A collapsed domain
/// (`min == max`) normalizes every value to the `0.5` midpoint instead
/// of dividing by zero.
#[must_use]
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span.abs() < f64::EPSILON {
        return 0.5;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

/// Pixel radius for a cluster of `point_count` points: logarithmic in
/// the count, clamped to `[min_px, max_px]`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn cluster_radius(point_count: u64, min_px: f64, max_px: f64) -> f64 {
    let radius = min_px * (1.0 + (point_count as f64).ln());
    radius.min(max_px).max(min_px)
}

fn fill_accessor(style: &StyleConfig) -> ColorAccessor {
    let fill = style.fill_color;
    let cluster_fill = style.cluster_fill_color;

    match &style.mode {
        StyleMode::Uniform => uniform_accessor(fill, cluster_fill),
        StyleMode::Categorical {
            field,
            category_colors,
            default_color,
        } => {
            if field.is_empty() {
                log::warn!("Categorical style without a field selection, using uniform fill");
                return uniform_accessor(fill, cluster_fill);
            }
            let field = field.clone();
            let categories = category_colors.clone();
            let fallback = default_color.unwrap_or(fill);
            ColorAccessor::PerFeature(Box::new(move |feature| {
                if feature.is_cluster() {
                    return cluster_fill;
                }
                let key = stringify_category(feature.property(&field));
                categories.get(&key).copied().unwrap_or(fallback)
            }))
        }
        StyleMode::Graduated {
            field,
            ramp,
            min,
            max,
        } => {
            if field.is_empty() || ramp.is_empty() {
                log::warn!("Graduated style without a field or ramp selection, using uniform fill");
                return uniform_accessor(fill, cluster_fill);
            }
            let field = field.clone();
            let ramp = ramp.clone();
            let (min, max) = (*min, *max);
            ColorAccessor::PerFeature(Box::new(move |feature| {
                if feature.is_cluster() {
                    return cluster_fill;
                }
                // An unparsable attribute degrades this one feature to
                // the uniform fill; it never fails the whole layer.
                coerce_numeric(feature.property(&field)).map_or(fill, |value| {
                    geolens_ramp::interpolate(&ramp, normalize(value, min, max))
                })
            }))
        }
    }
}

/// Uniform fill still branches on the cluster flag so aggregates paint
/// with the cluster color; collapses to a constant when both colors
/// agree.
fn uniform_accessor(fill: HexColor, cluster_fill: HexColor) -> ColorAccessor {
    if fill == cluster_fill {
        ColorAccessor::Constant(fill)
    } else {
        ColorAccessor::PerFeature(Box::new(move |feature| {
            if feature.is_cluster() { cluster_fill } else { fill }
        }))
    }
}

fn radius_accessor(style: &StyleConfig) -> RadiusAccessor {
    let point_radius = style.point_radius;
    let (min_px, max_px) = (style.radius_min_px, style.radius_max_px);
    RadiusAccessor::PerFeature(Box::new(move |feature| match feature {
        MapFeature::Cluster(cluster) => cluster_radius(cluster.point_count, min_px, max_px),
        MapFeature::Single(_) => point_radius,
    }))
}

fn update_triggers(style: &StyleConfig) -> UpdateTriggers {
    let mut fill_color = vec![
        Value::from(style.kind().to_string()),
        Value::from(style.fill_color.display_rgba().to_string()),
        Value::from(style.cluster_fill_color.display_rgba().to_string()),
    ];
    match &style.mode {
        StyleMode::Uniform => {}
        StyleMode::Categorical {
            field,
            category_colors,
            default_color,
        } => {
            fill_color.push(Value::from(field.clone()));
            // BTreeMap iteration is ordered, so this serialization is
            // independent of the order colors were assigned in.
            fill_color.push(Value::from(
                serde_json::to_string(category_colors).unwrap_or_default(),
            ));
            fill_color.push(Value::from(
                default_color.map(|c| c.display_rgba().to_string()),
            ));
        }
        StyleMode::Graduated {
            field,
            ramp,
            min,
            max,
        } => {
            fill_color.push(Value::from(field.clone()));
            fill_color.push(Value::from(ramp.clone()));
            fill_color.push(Value::from(*min));
            fill_color.push(Value::from(*max));
        }
    }

    UpdateTriggers {
        fill_color,
        radius: vec![
            Value::from(style.point_radius),
            Value::from(style.radius_min_px),
            Value::from(style.radius_max_px),
        ],
    }
}

fn stringify_category(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "null".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn coerce_numeric(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}
