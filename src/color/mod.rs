//! Color value types and conversions.
//!
//! This module provides the immutable [`Color`] value type along with the
//! component tuples it converts between: float [`RGBA`], 8-bit [`RGBA8`],
//! [`HSLA`] and [`HSVA`]. Parsing from the many supported textual and
//! numeric representations lives in [`parse`].

pub mod names;
pub mod parse;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Result;
pub use parse::ColorLike;

/// RGBA color with all components as floats in the 0-1 range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RGBA {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl RGBA {
    pub const TRANSPARENT: RGBA = RGBA::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to 8-bit integer form.
    pub fn to_8bit(self) -> RGBA8 {
        let quantize = |x: f64| ((x * 255.0).round().clamp(0.0, 255.0)) as u8;
        RGBA8 {
            r: quantize(self.r),
            g: quantize(self.g),
            b: quantize(self.b),
            a: self.a,
        }
    }

    /// Convert to hex notation (`#RRGGBB`, or `#RRGGBBAA` when alpha != 1).
    pub fn to_hex(self) -> String {
        self.to_8bit().to_hex()
    }

    /// CSS `rgb(..)`/`rgba(..)` string in the 0-255 range.
    pub fn rgba_string(self) -> String {
        self.to_8bit().rgba_string()
    }

    /// Convert to Hue, Saturation, Value.
    pub fn to_hsv(self) -> HSVA {
        let (h, s, v) = rgb_to_hsv(self.r, self.g, self.b);
        HSVA { h, s, v, a: self.a }
    }

    /// Convert to Hue, Saturation, Lightness.
    pub fn to_hsl(self) -> HSLA {
        let (h, l, s) = rgb_to_hls(self.r, self.g, self.b);
        HSLA { h, s, l, a: self.a }
    }

    pub fn components(self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl From<[f64; 4]> for RGBA {
    fn from(c: [f64; 4]) -> Self {
        RGBA::new(c[0], c[1], c[2], c[3])
    }
}

/// 8-bit RGBA color: RGB components from 0 to 255, alpha from 0 to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RGBA8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl RGBA8 {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to float form (0-1 range).
    pub fn to_float(self) -> RGBA {
        RGBA {
            r: self.r as f64 / 255.0,
            g: self.g as f64 / 255.0,
            b: self.b as f64 / 255.0,
            a: self.a,
        }
    }

    /// Convert to hex notation (`#RRGGBB`, or `#RRGGBBAA` when alpha != 1).
    pub fn to_hex(self) -> String {
        let out = format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b);
        if (self.a - 1.0).abs() < f64::EPSILON {
            out
        } else {
            format!("{}{:02X}", out, (self.a * 255.0).round() as u8)
        }
    }

    /// CSS string: `rgb(r, g, b)`, or `rgba(r, g, b, a)` when alpha != 1.
    pub fn rgba_string(self) -> String {
        if (self.a - 1.0).abs() < f64::EPSILON {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_hsv(self) -> HSVA {
        self.to_float().to_hsv()
    }

    pub fn to_hsl(self) -> HSLA {
        self.to_float().to_hsl()
    }
}

impl fmt::Display for RGBA8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Display for RGBA {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Hue, Saturation, Lightness. All values are floats between 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HSLA {
    pub h: f64,
    pub s: f64,
    pub l: f64,
    pub a: f64,
}

impl HSLA {
    pub const fn new(h: f64, s: f64, l: f64, a: f64) -> Self {
        Self { h, s, l, a }
    }

    /// Convert to RGB.
    pub fn to_rgba(self) -> RGBA {
        let (r, g, b) = hls_to_rgb(self.h, self.l, self.s);
        RGBA::new(r, g, b, self.a)
    }

    /// The same color with hue expressed in degrees.
    pub fn in_degrees(self) -> (f64, f64, f64, f64) {
        (self.h * 360.0, self.s, self.l, self.a)
    }
}

/// Hue, Saturation, Value. All values are floats between 0 and 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HSVA {
    pub h: f64,
    pub s: f64,
    pub v: f64,
    pub a: f64,
}

impl HSVA {
    pub const fn new(h: f64, s: f64, v: f64, a: f64) -> Self {
        Self { h, s, v, a }
    }

    /// Convert to RGB.
    pub fn to_rgba(self) -> RGBA {
        let (r, g, b) = hsv_to_rgb(self.h, self.s, self.v);
        RGBA::new(r, g, b, self.a)
    }
}

/// A single color.
///
/// Instances are immutable values; equal-valued colors compare equal. A
/// color that exactly matches an entry of the static name table remembers
/// its canonical name, which `Display` prefers over hex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    rgba: RGBA,
    name: Option<&'static str>,
}

impl Color {
    /// Parse anything color-like. See [`ColorLike`] for the accepted forms.
    pub fn new(value: impl Into<ColorLike>) -> Result<Self> {
        Self::from_like(&value.into())
    }

    pub(crate) fn from_like(value: &ColorLike) -> Result<Self> {
        let rgba = parse::parse_color(value)?;
        Ok(Self::from_rgba(rgba))
    }

    pub(crate) fn from_rgba(rgba: RGBA) -> Self {
        let c8 = rgba.to_8bit();
        let a8 = (c8.a * 255.0).round().clamp(0.0, 255.0) as u8;
        let name = names::name_of(c8.r, c8.g, c8.b, a8);
        Self { rgba, name }
    }

    /// Fully transparent black (the result of parsing `"none"`).
    pub fn transparent() -> Self {
        Self::from_rgba(RGBA::TRANSPARENT)
    }

    /// Parse a packed integer in the given component order with 8 bits per
    /// component, e.g. `Color::from_int(0xFF00FF, "rgb")`.
    pub fn from_int(value: u64, format: &str) -> Result<Self> {
        Ok(Self::from_rgba(parse::parse_int(value, format, &[])?))
    }

    /// Pack into an integer in the given component order, 8 bits each.
    pub fn to_int(&self, format: &str) -> Result<u64> {
        parse::pack_int(self.rgba, format, &[])
    }

    /// The color as (Red, Green, Blue, Alpha) floats in the 0-1 range.
    pub fn rgba(&self) -> RGBA {
        self.rgba
    }

    /// The color as (Red, Green, Blue, Alpha) in the 0-255 range.
    pub fn rgba8(&self) -> RGBA8 {
        self.rgba.to_8bit()
    }

    /// The color as Hue, Saturation, Lightness.
    pub fn hsl(&self) -> HSLA {
        self.rgba.to_hsl()
    }

    /// The color as Hue, Saturation, Value.
    pub fn hsv(&self) -> HSVA {
        self.rgba.to_hsv()
    }

    /// The alpha channel, 0-1.
    pub fn alpha(&self) -> f64 {
        self.rgba.a
    }

    /// Hex notation, e.g. `"#FF0000"`.
    pub fn hex(&self) -> String {
        self.rgba.to_hex()
    }

    /// CSS `rgb(..)`/`rgba(..)` string in the 0-255 range.
    pub fn rgba_string(&self) -> String {
        self.rgba.rgba_string()
    }

    /// The canonical name, if this color exactly matches a named entry.
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => f.write_str(name),
            None => f.write_str(&self.hex()),
        }
    }
}

impl std::str::FromStr for Color {
    type Err = crate::error::ChromapError;

    fn from_str(s: &str) -> Result<Self> {
        Color::new(s)
    }
}

impl PartialEq<&str> for Color {
    fn eq(&self, other: &&str) -> bool {
        Color::new(*other).map(|c| c == *self).unwrap_or(false)
    }
}

impl From<Color> for RGBA {
    fn from(c: Color) -> RGBA {
        c.rgba
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::new(s.as_str()).map_err(serde::de::Error::custom)
    }
}

// Conversions below are straight ports of the classic colorsys formulas.

fn rgb_to_hsv(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    let v = maxc;
    if maxc == minc {
        return (0.0, 0.0, v);
    }
    let s = (maxc - minc) / maxc;
    let rc = (maxc - r) / (maxc - minc);
    let gc = (maxc - g) / (maxc - minc);
    let bc = (maxc - b) / (maxc - minc);
    let h = if r == maxc {
        bc - gc
    } else if g == maxc {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    ((h / 6.0).rem_euclid(1.0), s, v)
}

fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match (i as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

fn rgb_to_hls(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let maxc = r.max(g).max(b);
    let minc = r.min(g).min(b);
    let sumc = maxc + minc;
    let rangec = maxc - minc;
    let l = sumc / 2.0;
    if maxc == minc {
        return (0.0, l, 0.0);
    }
    let s = if l <= 0.5 {
        rangec / sumc
    } else {
        rangec / (2.0 - maxc - minc)
    };
    let rc = (maxc - r) / rangec;
    let gc = (maxc - g) / rangec;
    let bc = (maxc - b) / rangec;
    let h = if r == maxc {
        bc - gc
    } else if g == maxc {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };
    ((h / 6.0).rem_euclid(1.0), l, s)
}

fn hls_to_rgb(h: f64, l: f64, s: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hls_component(m1, m2, h + 1.0 / 3.0),
        hls_component(m1, m2, h),
        hls_component(m1, m2, h - 1.0 / 3.0),
    )
}

fn hls_component(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}
