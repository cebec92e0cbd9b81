//! The built-in ramp catalog.
//!
//! Stops are process-lifetime constants; values are evenly spaced on
//! `[0, 1]`. The sequential ramps are sampled from the matplotlib
//! perceptually-uniform family, the single-hue and diverging ramps from
//! `ColorBrewer`.

use hex_color::HexColor;

const fn rgb(r: u8, g: u8, b: u8) -> HexColor {
    HexColor { r, g, b, a: 255 }
}

pub(crate) const VIRIDIS: &[HexColor] = &[
    rgb(0x44, 0x01, 0x54),
    rgb(0x48, 0x28, 0x78),
    rgb(0x3e, 0x49, 0x89),
    rgb(0x31, 0x68, 0x8e),
    rgb(0x26, 0x82, 0x8e),
    rgb(0x1f, 0x9e, 0x89),
    rgb(0x35, 0xb7, 0x79),
    rgb(0x6e, 0xce, 0x58),
    rgb(0xb5, 0xde, 0x2b),
    rgb(0xfd, 0xe7, 0x25),
];

pub(crate) const PLASMA: &[HexColor] = &[
    rgb(0x0d, 0x08, 0x87),
    rgb(0x47, 0x03, 0x9f),
    rgb(0x73, 0x01, 0xa8),
    rgb(0x9c, 0x17, 0x9e),
    rgb(0xbd, 0x37, 0x86),
    rgb(0xd8, 0x57, 0x6b),
    rgb(0xed, 0x79, 0x53),
    rgb(0xfa, 0x9e, 0x3b),
    rgb(0xfd, 0xc9, 0x26),
    rgb(0xf0, 0xf9, 0x21),
];

pub(crate) const MAGMA: &[HexColor] = &[
    rgb(0x00, 0x00, 0x04),
    rgb(0x18, 0x0f, 0x3e),
    rgb(0x45, 0x10, 0x77),
    rgb(0x72, 0x1f, 0x81),
    rgb(0x9f, 0x2f, 0x7f),
    rgb(0xcd, 0x40, 0x71),
    rgb(0xf1, 0x60, 0x5d),
    rgb(0xfd, 0x95, 0x67),
    rgb(0xfe, 0xbb, 0x81),
    rgb(0xfc, 0xfd, 0xbf),
];

pub(crate) const INFERNO: &[HexColor] = &[
    rgb(0x00, 0x00, 0x04),
    rgb(0x1b, 0x0c, 0x42),
    rgb(0x4b, 0x0c, 0x6b),
    rgb(0x78, 0x1c, 0x6d),
    rgb(0xa5, 0x2c, 0x60),
    rgb(0xcf, 0x44, 0x46),
    rgb(0xed, 0x69, 0x25),
    rgb(0xfb, 0x9a, 0x06),
    rgb(0xf7, 0xd0, 0x3c),
    rgb(0xfc, 0xff, 0xa4),
];

pub(crate) const BLUES: &[HexColor] = &[
    rgb(0xf7, 0xfb, 0xff),
    rgb(0xde, 0xeb, 0xf7),
    rgb(0xc6, 0xdb, 0xef),
    rgb(0x9e, 0xca, 0xe1),
    rgb(0x6b, 0xae, 0xd6),
    rgb(0x42, 0x92, 0xc6),
    rgb(0x21, 0x71, 0xb5),
    rgb(0x08, 0x51, 0x9c),
    rgb(0x08, 0x30, 0x6b),
];

pub(crate) const GREENS: &[HexColor] = &[
    rgb(0xf7, 0xfc, 0xf5),
    rgb(0xe5, 0xf5, 0xe0),
    rgb(0xc7, 0xe9, 0xc0),
    rgb(0xa1, 0xd9, 0x9b),
    rgb(0x74, 0xc4, 0x76),
    rgb(0x41, 0xab, 0x5d),
    rgb(0x23, 0x8b, 0x45),
    rgb(0x00, 0x6d, 0x2c),
    rgb(0x00, 0x44, 0x1b),
];

pub(crate) const ORANGES: &[HexColor] = &[
    rgb(0xff, 0xf5, 0xeb),
    rgb(0xfe, 0xe6, 0xce),
    rgb(0xfd, 0xd0, 0xa2),
    rgb(0xfd, 0xae, 0x6b),
    rgb(0xfd, 0x8d, 0x3c),
    rgb(0xf1, 0x69, 0x13),
    rgb(0xd9, 0x48, 0x01),
    rgb(0xa6, 0x36, 0x03),
    rgb(0x7f, 0x27, 0x04),
];

pub(crate) const REDS: &[HexColor] = &[
    rgb(0xff, 0xf5, 0xf0),
    rgb(0xfe, 0xe0, 0xd2),
    rgb(0xfc, 0xbb, 0xa1),
    rgb(0xfc, 0x92, 0x72),
    rgb(0xfb, 0x6a, 0x4a),
    rgb(0xef, 0x3b, 0x2c),
    rgb(0xcb, 0x18, 0x1d),
    rgb(0xa5, 0x0f, 0x15),
    rgb(0x67, 0x00, 0x0d),
];

pub(crate) const SPECTRAL: &[HexColor] = &[
    rgb(0x9e, 0x01, 0x42),
    rgb(0xd5, 0x3e, 0x4f),
    rgb(0xf4, 0x6d, 0x43),
    rgb(0xfd, 0xae, 0x61),
    rgb(0xfe, 0xe0, 0x8b),
    rgb(0xff, 0xff, 0xbf),
    rgb(0xe6, 0xf5, 0x98),
    rgb(0xab, 0xdd, 0xa4),
    rgb(0x66, 0xc2, 0xa5),
    rgb(0x32, 0x88, 0xbd),
    rgb(0x5e, 0x4f, 0xa2),
];

pub(crate) const RD_YL_BU: &[HexColor] = &[
    rgb(0xa5, 0x00, 0x26),
    rgb(0xd7, 0x30, 0x27),
    rgb(0xf4, 0x6d, 0x43),
    rgb(0xfd, 0xae, 0x61),
    rgb(0xfe, 0xe0, 0x90),
    rgb(0xff, 0xff, 0xbf),
    rgb(0xe0, 0xf3, 0xf8),
    rgb(0xab, 0xd9, 0xe9),
    rgb(0x74, 0xad, 0xd1),
    rgb(0x45, 0x75, 0xb4),
    rgb(0x31, 0x36, 0x95),
];

/// All named ramps, in catalog order.
pub(crate) const RAMPS: &[(&str, &[HexColor])] = &[
    ("viridis", VIRIDIS),
    ("plasma", PLASMA),
    ("magma", MAGMA),
    ("inferno", INFERNO),
    ("blues", BLUES),
    ("greens", GREENS),
    ("oranges", ORANGES),
    ("reds", REDS),
    ("spectral", SPECTRAL),
    ("rdylbu", RD_YL_BU),
];
