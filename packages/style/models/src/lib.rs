#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Style configuration types for dataset rendering.
//!
//! A [`StyleConfig`] is stored as a JSON blob on the dataset catalog
//! entry and consumed by the style resolver. Exactly one styling mode is
//! active at a time; the mutators on [`StyleConfig`] enforce that
//! switching modes or attribute fields never carries over state whose
//! value domain has changed.

use std::collections::BTreeMap;

use hex_color::HexColor;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Default fill for point and polygon features.
const DEFAULT_FILL: HexColor = HexColor {
    r: 0x33,
    g: 0x88,
    b: 0xff,
    a: 255,
};

/// Default line/stroke color.
const DEFAULT_LINE: HexColor = HexColor {
    r: 0xff,
    g: 0xff,
    b: 0xff,
    a: 255,
};

/// Default fill for aggregate cluster features.
const DEFAULT_CLUSTER_FILL: HexColor = HexColor {
    r: 0x51,
    g: 0xbb,
    b: 0xd6,
    a: 255,
};

/// Complete paint configuration for one dataset.
///
/// Base paint fields apply in every mode; `mode` selects how per-feature
/// fill colors are derived. Aggregate cluster features always use
/// `cluster_fill_color`, regardless of mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleConfig {
    /// Fill color, and the fallback for every styling degrade path.
    pub fill_color: HexColor,
    /// Stroke color.
    pub line_color: HexColor,
    /// Stroke width in pixels. Zero disables stroking.
    pub line_width: f64,
    /// Point radius in world units.
    pub point_radius: f64,
    /// Lower pixel clamp for rendered point radii.
    pub radius_min_px: f64,
    /// Upper pixel clamp for rendered point radii.
    pub radius_max_px: f64,
    /// Fill color for aggregate cluster features.
    pub cluster_fill_color: HexColor,
    /// The active styling mode.
    pub mode: StyleMode,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            fill_color: DEFAULT_FILL,
            line_color: DEFAULT_LINE,
            line_width: 1.0,
            point_radius: 5.0,
            radius_min_px: 2.0,
            radius_max_px: 40.0,
            cluster_fill_color: DEFAULT_CLUSTER_FILL,
            mode: StyleMode::Uniform,
        }
    }
}

impl StyleConfig {
    /// Returns the kind of the active mode.
    #[must_use]
    pub const fn kind(&self) -> StyleModeKind {
        match self.mode {
            StyleMode::Uniform => StyleModeKind::Uniform,
            StyleMode::Categorical { .. } => StyleModeKind::Categorical,
            StyleMode::Graduated { .. } => StyleModeKind::Graduated,
        }
    }

    /// Switches the active mode, discarding the previous mode's fields.
    ///
    /// Switching to the already-active kind is a no-op, so an editor can
    /// re-select the current mode without losing its configuration.
    pub fn set_mode(&mut self, kind: StyleModeKind) {
        if self.kind() == kind {
            return;
        }
        self.mode = match kind {
            StyleModeKind::Uniform => StyleMode::Uniform,
            StyleModeKind::Categorical => StyleMode::Categorical {
                field: String::new(),
                category_colors: BTreeMap::new(),
                default_color: None,
            },
            StyleModeKind::Graduated => StyleMode::Graduated {
                field: String::new(),
                ramp: String::new(),
                min: 0.0,
                max: 1.0,
            },
        };
    }

    /// Changes the categorical attribute field.
    ///
    /// Assigned category colors are keyed by the old field's value
    /// domain, so changing the field clears the mapping. No-op when the
    /// active mode is not categorical or the field is unchanged.
    pub fn set_categorical_field(&mut self, new_field: &str) {
        if let StyleMode::Categorical {
            field,
            category_colors,
            ..
        } = &mut self.mode
            && field != new_field
        {
            new_field.clone_into(field);
            category_colors.clear();
        }
    }

    /// Changes the graduated attribute field, resetting the numeric
    /// domain to `[0, 1]` since it described the old field's values.
    ///
    /// No-op when the active mode is not graduated or the field is
    /// unchanged.
    pub fn set_graduated_field(&mut self, new_field: &str) {
        if let StyleMode::Graduated {
            field, min, max, ..
        } = &mut self.mode
            && field != new_field
        {
            new_field.clone_into(field);
            *min = 0.0;
            *max = 1.0;
        }
    }
}

/// How per-feature fill colors are derived.
///
/// Serialized with a `"mode"` tag so the three variants are mutually
/// exclusive on the wire as well.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StyleMode {
    /// Every feature uses the base fill color.
    #[default]
    Uniform,
    /// Exact-match lookup of a stringified attribute value.
    Categorical {
        /// Attribute field whose value selects the color.
        field: String,
        /// Stringified value -> color. Ordered map so serialized
        /// trigger values are independent of insertion order.
        category_colors: BTreeMap<String, HexColor>,
        /// Color for values missing from the mapping; falls back to the
        /// base fill color when unset.
        default_color: Option<HexColor>,
    },
    /// Continuous color-ramp lookup over a normalized numeric attribute.
    Graduated {
        /// Attribute field supplying the numeric value.
        field: String,
        /// Name of the color ramp in the built-in catalog.
        ramp: String,
        /// Lower bound of the normalization domain.
        min: f64,
        /// Upper bound of the normalization domain.
        max: f64,
    },
}

/// Discriminant-only view of [`StyleMode`].
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
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum StyleModeKind {
    /// See [`StyleMode::Uniform`].
    Uniform,
    /// See [`StyleMode::Categorical`].
    Categorical,
    /// See [`StyleMode::Graduated`].
    Graduated,
}
