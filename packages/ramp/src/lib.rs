#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Named color ramps and continuous RGBA interpolation.
//!
//! The catalog is fixed at compile time. Graduated styling normalizes a
//! numeric attribute into `[0, 1]` and calls [`interpolate`] to obtain a
//! paint color; [`generate_preview`] samples a ramp for swatch rendering
//! in the style editor.
//!
//! Lookup failures never propagate: an unknown ramp name resolves to
//! [`NEUTRAL_GRAY`] so a stale style configuration cannot break a render
//! pass.

mod catalog;

use hex_color::HexColor;

/// Color returned for unknown or empty ramps.
pub const NEUTRAL_GRAY: HexColor = HexColor {
    r: 128,
    g: 128,
    b: 128,
    a: 255,
};

/// Returns the stops of a named ramp, or `None` if the name is unknown.
#[must_use]
pub fn ramp(name: &str) -> Option<&'static [HexColor]> {
    catalog::RAMPS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, stops)| *stops)
}

/// Returns the names of all built-in ramps, in catalog order.
#[must_use]
pub fn ramp_names() -> Vec<&'static str> {
    catalog::RAMPS.iter().map(|(n, _)| *n).collect()
}

/// Maps `t` in `[0, 1]` to a color on the named ramp.
///
/// `t` is clamped to `[0, 1]`. An unknown ramp name resolves to
/// [`NEUTRAL_GRAY`]. The endpoints are exact: `t = 0` returns the first
/// stop and `t = 1` the last, with no rounding error.
#[must_use]
pub fn interpolate(name: &str, t: f64) -> HexColor {
    ramp(name).map_or_else(
        || {
            log::warn!("Unknown color ramp {name:?}, using neutral gray");
            NEUTRAL_GRAY
        },
        |stops| interpolate_stops(stops, t),
    )
}

/// Maps `t` in `[0, 1]` to a color on an explicit stop sequence.
///
/// Stops are evenly spaced; `t` selects the bounding pair and each of
/// the four channels is interpolated linearly and rounded to the nearest
/// integer. An empty slice resolves to [`NEUTRAL_GRAY`], a single stop
/// to itself.
#[must_use]
pub fn interpolate_stops(stops: &[HexColor], t: f64) -> HexColor {
    let Some((&first, rest)) = stops.split_first() else {
        return NEUTRAL_GRAY;
    };
    if rest.is_empty() {
        return first;
    }

    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

    #[allow(clippy::cast_precision_loss)]
    let scaled = t * (stops.len() - 1) as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let segment = scaled.floor() as usize;
    if segment >= stops.len() - 1 {
        // t == 1.0 lands exactly on the last stop.
        return stops[stops.len() - 1];
    }

    #[allow(clippy::cast_precision_loss)]
    let frac = scaled - segment as f64;
    let (lo, hi) = (stops[segment], stops[segment + 1]);
    HexColor {
        r: lerp_channel(lo.r, hi.r, frac),
        g: lerp_channel(lo.g, hi.g, frac),
        b: lerp_channel(lo.b, hi.b, frac),
        a: lerp_channel(lo.a, hi.a, frac),
    }
}

/// Samples a named ramp at `width` evenly spaced points.
///
/// Used to render swatch previews; not part of the styling hot path.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn generate_preview(name: &str, width: usize) -> Vec<HexColor> {
    if width == 0 {
        return Vec::new();
    }
    if width == 1 {
        return vec![interpolate(name, 0.0)];
    }
    (0..width)
        .map(|i| interpolate(name, i as f64 / (width - 1) as f64))
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lerp_channel(lo: u8, hi: u8, frac: f64) -> u8 {
    f64::from(lo)
        .mul_add(1.0 - frac, f64::from(hi) * frac)
        .round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        for name in ramp_names() {
            let stops = ramp(name).unwrap();
            assert_eq!(interpolate(name, 0.0), stops[0], "{name}: t=0");
            assert_eq!(interpolate(name, 1.0), *stops.last().unwrap(), "{name}: t=1");
        }
    }

    #[test]
    fn out_of_range_t_clamps_to_endpoints() {
        assert_eq!(interpolate("viridis", -5.0), interpolate("viridis", 0.0));
        assert_eq!(interpolate("viridis", 5.0), interpolate("viridis", 1.0));
    }

    #[test]
    fn unknown_ramp_is_neutral_gray() {
        assert_eq!(interpolate("no-such-ramp", 0.5), NEUTRAL_GRAY);
        assert_eq!(interpolate("", 0.0), NEUTRAL_GRAY);
    }

    #[test]
    fn empty_and_single_stop_ramps() {
        assert_eq!(interpolate_stops(&[], 0.3), NEUTRAL_GRAY);

        let only = HexColor::from_u24(0x00ff_0000);
        assert_eq!(interpolate_stops(&[only], 0.0), only);
        assert_eq!(interpolate_stops(&[only], 0.7), only);
    }

    #[test]
    fn nan_t_falls_back_to_first_stop() {
        let stops = ramp("viridis").unwrap();
        assert_eq!(interpolate("viridis", f64::NAN), stops[0]);
    }

    #[test]
    fn midpoint_of_two_stops_averages_channels() {
        let black = HexColor {
            r: 0,
            g: 0,
            b: 0,
            a: 255,
        };
        let white = HexColor {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        };
        let mid = interpolate_stops(&[black, white], 0.5);
        assert_eq!((mid.r, mid.g, mid.b, mid.a), (128, 128, 128, 255));
    }

    #[test]
    fn interpolation_is_continuous() {
        // Small steps in t produce small channel deltas, including across
        // stop boundaries.
        let steps = 1000;
        let mut prev = interpolate("spectral", 0.0);
        for i in 1..=steps {
            let t = f64::from(i) / f64::from(steps);
            let next = interpolate("spectral", t);
            for (a, b) in [
                (prev.r, next.r),
                (prev.g, next.g),
                (prev.b, next.b),
                (prev.a, next.a),
            ] {
                assert!(
                    a.abs_diff(b) <= 2,
                    "discontinuity at t={t}: {a} -> {b}"
                );
            }
            prev = next;
        }
    }

    #[test]
    fn segment_boundaries_agree() {
        // On a 10-stop ramp the stop at index 3 sits at t = 3/9; both
        // straddling segments must produce exactly that stop there.
        let stops = ramp("viridis").unwrap();
        let t = 3.0 / 9.0;
        let eps = 1e-12;
        let at = interpolate("viridis", t);
        let below = interpolate("viridis", t - eps);
        let above = interpolate("viridis", t + eps);
        for (x, y) in [(at, below), (at, above)] {
            assert!(x.r.abs_diff(y.r) <= 1);
            assert!(x.g.abs_diff(y.g) <= 1);
            assert!(x.b.abs_diff(y.b) <= 1);
        }
        assert_eq!(at, stops[3]);
    }

    #[test]
    fn preview_samples_full_range() {
        let preview = generate_preview("viridis", 16);
        assert_eq!(preview.len(), 16);
        assert_eq!(preview[0], interpolate("viridis", 0.0));
        assert_eq!(preview[15], interpolate("viridis", 1.0));

        assert!(generate_preview("viridis", 0).is_empty());
        assert_eq!(generate_preview("viridis", 1).len(), 1);
    }

    #[test]
    fn channels_always_valid_for_any_t() {
        // u8 already bounds channels to [0, 255]; this guards the rounding
        // path against panics across the full range.
        for name in ramp_names() {
            for i in 0..=100 {
                let _ = interpolate(name, f64::from(i) / 100.0);
            }
        }
    }
}
