//! Color parsing and colorimetric helpers.
//!
//! Everything here is pure and infallible: malformed input degrades to a
//! usable default (opaque black) so a single bad color string never aborts
//! a scan.
//!
//! - `parse_color`: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()`.
//! - `relative_luminance` / `contrast_ratio`: WCAG 2.x formulas.
//! - `simulate_dichromacy`: fixed 3x3 matrices per deficiency kind.
//! - `find_contrasting_shade`: grayscale ramp search for a target ratio.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

static RGB_FN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*([0-9]*\.?[0-9]+)\s*)?\)$")
        .expect("static rgb() pattern")
});

/// An sRGB color with 8-bit channels and a unit alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Relative luminance of the color channels (alpha ignored).
    pub fn luminance(&self) -> f64 {
        relative_luminance(self.r, self.g, self.b)
    }

    /// Composite this color over an opaque `backdrop`.
    pub fn over(&self, backdrop: &Rgba) -> Rgba {
        if self.a >= 1.0 {
            return Rgba::opaque(self.r, self.g, self.b);
        }
        let a = self.a.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| -> u8 { channel(fg as f64 * a + bg as f64 * (1.0 - a)) };
        Rgba::opaque(
            mix(self.r, backdrop.r),
            mix(self.g, backdrop.g),
            mix(self.b, backdrop.b),
        )
    }

    /// `#rrggbb` form, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `rgb(r, g, b)` form, alpha dropped.
    pub fn to_css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Dichromatic color-vision deficiency kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dichromacy {
    Protanopia,
    Deuteranopia,
    Tritanopia,
}

impl Dichromacy {
    pub const ALL: [Dichromacy; 3] = [
        Dichromacy::Protanopia,
        Dichromacy::Deuteranopia,
        Dichromacy::Tritanopia,
    ];

    fn matrix(self) -> [[f64; 3]; 3] {
        match self {
            Dichromacy::Protanopia => [
                [0.567, 0.433, 0.0],
                [0.558, 0.442, 0.0],
                [0.0, 0.242, 0.758],
            ],
            Dichromacy::Deuteranopia => [
                [0.625, 0.375, 0.0],
                [0.7, 0.3, 0.0],
                [0.0, 0.3, 0.7],
            ],
            Dichromacy::Tritanopia => [
                [0.95, 0.05, 0.0],
                [0.0, 0.433, 0.567],
                [0.0, 0.475, 0.525],
            ],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dichromacy::Protanopia => "protanopia",
            Dichromacy::Deuteranopia => "deuteranopia",
            Dichromacy::Tritanopia => "tritanopia",
        }
    }
}

impl fmt::Display for Dichromacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn hex_pair(s: &str) -> Option<u8> {
    u8::from_str_radix(s, 16).ok()
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.is_ascii() {
        return None;
    }
    let expanded;
    let hex = if hex.len() == 3 {
        expanded = hex.chars().flat_map(|c| [c, c]).collect::<String>();
        expanded.as_str()
    } else {
        hex
    };
    match hex.len() {
        6 => Some(Rgba::opaque(
            hex_pair(&hex[0..2])?,
            hex_pair(&hex[2..4])?,
            hex_pair(&hex[4..6])?,
        )),
        8 => Some(Rgba {
            r: hex_pair(&hex[0..2])?,
            g: hex_pair(&hex[2..4])?,
            b: hex_pair(&hex[4..6])?,
            a: hex_pair(&hex[6..8])? as f64 / 255.0,
        }),
        _ => None,
    }
}

fn parse_rgb_fn(s: &str) -> Option<Rgba> {
    let caps = RGB_FN.captures(s)?;
    let ch = |i: usize| -> Option<u8> {
        let v: u32 = caps.get(i)?.as_str().parse().ok()?;
        Some(v.min(255) as u8)
    };
    let a = match caps.get(4) {
        Some(m) => m.as_str().parse::<f64>().ok()?.clamp(0.0, 1.0),
        None => 1.0,
    };
    Some(Rgba {
        r: ch(1)?,
        g: ch(2)?,
        b: ch(3)?,
        a,
    })
}

/// Parse a CSS-like color string. Unrecognized input yields opaque black.
pub fn parse_color(input: &str) -> Rgba {
    try_parse_color(input).unwrap_or(Rgba::BLACK)
}

/// Parse a color string, reporting whether it was recognized at all.
pub fn try_parse_color(input: &str) -> Option<Rgba> {
    let s = input.trim().to_ascii_lowercase();
    if let Some(hex) = s.strip_prefix('#') {
        parse_hex(hex)
    } else if s.starts_with("rgb") {
        parse_rgb_fn(&s)
    } else {
        None
    }
}

fn linearize(c: u8) -> f64 {
    let c = c as f64 / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG relative luminance of an sRGB triplet.
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    0.2126 * linearize(r) + 0.7152 * linearize(g) + 0.0722 * linearize(b)
}

/// WCAG contrast ratio, always in `[1, 21]` and symmetric.
pub fn contrast_ratio(c1: &Rgba, c2: &Rgba) -> f64 {
    let l1 = c1.luminance();
    let l2 = c2.luminance();
    let (lighter, darker) = if l1 >= l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Euclidean distance in RGB space.
///
/// A coarse "are these visually the same" heuristic; not a perceptual
/// (LAB/CIEDE2000) difference and not a contrast substitute.
pub fn color_distance(c1: &Rgba, c2: &Rgba) -> f64 {
    let dr = c1.r as f64 - c2.r as f64;
    let dg = c1.g as f64 - c2.g as f64;
    let db = c1.b as f64 - c2.b as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Apply a dichromacy matrix to a parsed color. Channels are rounded and
/// clamped to `[0, 255]`; alpha is carried through.
pub fn simulate_rgba(color: &Rgba, kind: Dichromacy) -> Rgba {
    let m = kind.matrix();
    let src = [color.r as f64, color.g as f64, color.b as f64];
    let row = |i: usize| channel(m[i][0] * src[0] + m[i][1] * src[1] + m[i][2] * src[2]);
    Rgba {
        r: row(0),
        g: row(1),
        b: row(2),
        a: color.a,
    }
}

/// Simulate how `color` appears under `kind`, as an `rgb()` string.
pub fn simulate_dichromacy(color: &str, kind: Dichromacy) -> String {
    simulate_rgba(&parse_color(color), kind).to_css()
}

pub fn simulate_protanopia(color: &str) -> String {
    simulate_dichromacy(color, Dichromacy::Protanopia)
}

pub fn simulate_deuteranopia(color: &str) -> String {
    simulate_dichromacy(color, Dichromacy::Deuteranopia)
}

pub fn simulate_tritanopia(color: &str) -> String {
    simulate_dichromacy(color, Dichromacy::Tritanopia)
}

/// Move each channel toward white (`lighten`) or black by `amount` in `[0, 1]`.
pub fn shift_luminance(color: &str, amount: f64, lighten: bool) -> String {
    shift_rgba(&parse_color(color), amount, lighten).to_css()
}

pub fn shift_rgba(color: &Rgba, amount: f64, lighten: bool) -> Rgba {
    let amount = if amount.is_finite() { amount.clamp(0.0, 1.0) } else { 0.0 };
    let shift = |c: u8| -> u8 {
        let c = c as f64;
        if lighten {
            channel(c + (255.0 - c) * amount)
        } else {
            channel(c * (1.0 - amount))
        }
    };
    Rgba::opaque(shift(color.r), shift(color.g), shift(color.b))
}

/// Find a gray that reaches `target_ratio` against `background`.
///
/// Light backgrounds are searched from black upward, dark backgrounds from
/// white downward, in steps of 5; the first passing shade wins, so the
/// result is the strongest contrast on the ramp rather than the mildest.
/// When nothing passes, black (light background) or white is returned.
pub fn find_contrasting_shade(background: &str, target_ratio: f64) -> String {
    contrasting_shade(&parse_color(background), target_ratio).to_css()
}

pub fn contrasting_shade(background: &Rgba, target_ratio: f64) -> Rgba {
    let light_bg = background.luminance() > 0.5;
    let ramp: Box<dyn Iterator<Item = u8>> = if light_bg {
        Box::new((0..255u8).step_by(5))
    } else {
        Box::new((0..=255u8).rev().step_by(5))
    };
    for v in ramp {
        let candidate = Rgba::opaque(v, v, v);
        if contrast_ratio(background, &candidate) >= target_ratio {
            return candidate;
        }
    }
    if light_bg {
        Rgba::BLACK
    } else {
        Rgba::WHITE
    }
}

/// Format a ratio for display, e.g. `4.50:1`.
pub fn format_ratio(ratio: f64) -> String {
    format!("{:.2}:1", ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(parse_color("#ff0000"), Rgba::opaque(255, 0, 0));
        assert_eq!(parse_color("#f00"), parse_color("#ff0000"));
        assert_eq!(parse_color("#FFFFFF"), Rgba::WHITE);
        let c = parse_color("#00000080");
        assert_eq!((c.r, c.g, c.b), (0, 0, 0));
        assert!((c.a - 128.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_rgb_functions() {
        assert_eq!(parse_color("rgb(10, 20, 30)"), Rgba::opaque(10, 20, 30));
        let c = parse_color("rgba(10,20,30,0.5)");
        assert_eq!((c.r, c.g, c.b), (10, 20, 30));
        assert_eq!(c.a, 0.5);
        assert_eq!(parse_color("rgb(300, 0, 0)").r, 255);
    }

    #[test]
    fn test_malformed_input_degrades_to_black() {
        for bad in ["", "   ", "red", "#12", "#gggggg", "rgb(1,2)", "hsl(0, 0%, 0%)", "#ééé"] {
            assert_eq!(parse_color(bad), Rgba::BLACK, "input {:?}", bad);
        }
        assert!(try_parse_color("nope").is_none());
    }

    #[test]
    fn test_contrast_extremes() {
        assert!((contrast_ratio(&Rgba::BLACK, &Rgba::WHITE) - 21.0).abs() < 1e-9);
        let c = parse_color("#336699");
        assert!((contrast_ratio(&c, &c) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_known_gray_ratios() {
        let white = Rgba::WHITE;
        let r1 = contrast_ratio(&parse_color("#767676"), &white);
        assert!((r1 - 4.54).abs() < 0.01);
        let r2 = contrast_ratio(&parse_color("#999999"), &white);
        assert!((r2 - 2.85).abs() < 0.01);
        assert_eq!(format_ratio(r2), "2.85:1");
    }

    #[test]
    fn test_protanopia_matrix() {
        // R'=0.567R+0.433G, G'=0.558R+0.442G, B'=0.242G+0.758B
        assert_eq!(simulate_protanopia("#ff0000"), "rgb(145, 142, 0)");
        assert_eq!(simulate_protanopia("#ffffff"), "rgb(255, 255, 255)");
        assert_eq!(simulate_deuteranopia("#000000"), "rgb(0, 0, 0)");
    }

    #[test]
    fn test_simulation_output_stays_in_gamut() {
        let c = simulate_rgba(&Rgba::WHITE, Dichromacy::Tritanopia);
        assert_eq!(c, Rgba::WHITE);
    }

    #[test]
    fn test_shift_luminance() {
        assert_eq!(shift_luminance("#808080", 0.5, false), "rgb(64, 64, 64)");
        assert_eq!(shift_luminance("#000000", 0.5, true), "rgb(128, 128, 128)");
        assert_eq!(shift_luminance("#102030", 0.0, true), "rgb(16, 32, 48)");
        assert_eq!(shift_luminance("#102030", 1.0, true), "rgb(255, 255, 255)");
    }

    #[test]
    fn test_find_contrasting_shade() {
        // light backgrounds start at black, dark ones at white
        assert_eq!(find_contrasting_shade("#ffffff", 4.5), "rgb(0, 0, 0)");
        assert_eq!(find_contrasting_shade("#000000", 7.0), "rgb(255, 255, 255)");

        let mid_light = Rgba::opaque(200, 200, 200);
        assert_eq!(contrasting_shade(&mid_light, 11.5), Rgba::BLACK);
        let mid_dark = Rgba::opaque(50, 50, 50);
        let shade = contrasting_shade(&mid_dark, 5.0);
        assert_eq!(shade, Rgba::WHITE);
        assert!(contrast_ratio(&shade, &mid_dark) >= 5.0);

        assert_eq!(find_contrasting_shade("#ffffff", 50.0), "rgb(0, 0, 0)");
        assert_eq!(find_contrasting_shade("#000000", 50.0), "rgb(255, 255, 255)");
    }

    #[test]
    fn test_alpha_compositing() {
        let half_black = Rgba { a: 0.5, ..Rgba::BLACK };
        assert_eq!(half_black.over(&Rgba::WHITE), Rgba::opaque(128, 128, 128));
    }

    fn any_rgba() -> impl Strategy<Value = Rgba> {
        (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgba::opaque(r, g, b))
    }

    proptest! {
        #[test]
        fn prop_contrast_is_symmetric(a in any_rgba(), b in any_rgba()) {
            prop_assert_eq!(contrast_ratio(&a, &b), contrast_ratio(&b, &a));
        }

        #[test]
        fn prop_contrast_in_range(a in any_rgba(), b in any_rgba()) {
            let r = contrast_ratio(&a, &b);
            prop_assert!(r >= 1.0 && r <= 21.0 + 1e-9);
        }

        #[test]
        fn prop_dichromacy_is_deterministic(c in any_rgba()) {
            let s = c.to_hex();
            for kind in Dichromacy::ALL {
                prop_assert_eq!(simulate_dichromacy(&s, kind), simulate_dichromacy(&s, kind));
            }
        }

        #[test]
        fn prop_hex_round_trip(c in any_rgba()) {
            prop_assert_eq!(parse_color(&c.to_hex()), c);
        }
    }
}
