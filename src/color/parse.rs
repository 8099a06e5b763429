//! Parsing of color-like inputs.
//!
//! The dynamic "anything color-like" surface is expressed as the
//! [`ColorLike`] tagged union. String parsing attempts the representations
//! in a fixed order: named color, hex, `rgb()`/`rgba()`, `hsl()`/`hsla()`.
//! The order determines which error a caller sees for a malformed string.

use crate::color::{names, HSLA, RGBA, RGBA8};
use crate::error::{ChromapError, Result};

/// Any value that can be converted to a color.
///
/// Typed constructors are preferred where possible: float components are
/// always 0-1, `u8` components are always 0-255. The [`ColorLike::Floats`]
/// variant carries untyped rows (e.g. decoded from JSON) and falls back to
/// the range heuristic: if any component is greater than 1, the row is
/// assumed to be 0-255.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorLike {
    /// A color name, hex string, or CSS `rgb()`/`rgba()`/`hsl()`/`hsla()`.
    Str(String),
    /// Untyped 3- or 4-component row; range decided by heuristic.
    Floats(Vec<f64>),
    /// Normalized float components in 0-1.
    Rgba(f64, f64, f64, f64),
    /// 8-bit components, alpha as a 0-1 float.
    Rgba8(u8, u8, u8, f64),
    /// Packed 24-bit `0xRRGGBB` integer.
    Int(u32),
    /// Fully transparent black.
    Transparent,
    /// An already-parsed color.
    Color(crate::color::Color),
}

impl From<&str> for ColorLike {
    fn from(s: &str) -> Self {
        ColorLike::Str(s.to_string())
    }
}

impl From<String> for ColorLike {
    fn from(s: String) -> Self {
        ColorLike::Str(s)
    }
}

impl From<(f64, f64, f64)> for ColorLike {
    fn from((r, g, b): (f64, f64, f64)) -> Self {
        ColorLike::Rgba(r, g, b, 1.0)
    }
}

impl From<(f64, f64, f64, f64)> for ColorLike {
    fn from((r, g, b, a): (f64, f64, f64, f64)) -> Self {
        ColorLike::Rgba(r, g, b, a)
    }
}

impl From<[f64; 3]> for ColorLike {
    fn from(c: [f64; 3]) -> Self {
        ColorLike::Rgba(c[0], c[1], c[2], 1.0)
    }
}

impl From<[f64; 4]> for ColorLike {
    fn from(c: [f64; 4]) -> Self {
        ColorLike::Rgba(c[0], c[1], c[2], c[3])
    }
}

impl From<(u8, u8, u8)> for ColorLike {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        ColorLike::Rgba8(r, g, b, 1.0)
    }
}

impl From<(u8, u8, u8, f64)> for ColorLike {
    fn from((r, g, b, a): (u8, u8, u8, f64)) -> Self {
        ColorLike::Rgba8(r, g, b, a)
    }
}

impl From<[u8; 3]> for ColorLike {
    fn from(c: [u8; 3]) -> Self {
        ColorLike::Rgba8(c[0], c[1], c[2], 1.0)
    }
}

impl From<u32> for ColorLike {
    fn from(v: u32) -> Self {
        ColorLike::Int(v)
    }
}

impl From<RGBA> for ColorLike {
    fn from(c: RGBA) -> Self {
        ColorLike::Rgba(c.r, c.g, c.b, c.a)
    }
}

impl From<RGBA8> for ColorLike {
    fn from(c: RGBA8) -> Self {
        ColorLike::Rgba8(c.r, c.g, c.b, c.a)
    }
}

impl From<crate::color::Color> for ColorLike {
    fn from(c: crate::color::Color) -> Self {
        ColorLike::Color(c)
    }
}

/// Parse a [`ColorLike`] into float RGBA.
pub fn parse_color(value: &ColorLike) -> Result<RGBA> {
    match value {
        ColorLike::Str(s) => parse_color_string(s),
        ColorLike::Floats(v) => parse_float_seq(v),
        ColorLike::Rgba(r, g, b, a) => Ok(RGBA::new(
            r.clamp(0.0, 1.0),
            g.clamp(0.0, 1.0),
            b.clamp(0.0, 1.0),
            a.clamp(0.0, 1.0),
        )),
        ColorLike::Rgba8(r, g, b, a) => {
            Ok(RGBA8::new(*r, *g, *b, a.clamp(0.0, 1.0)).to_float())
        }
        ColorLike::Int(v) => {
            let r = (v >> 16) & 0xFF;
            let g = (v >> 8) & 0xFF;
            let b = v & 0xFF;
            Ok(RGBA8::new(r as u8, g as u8, b as u8, 1.0).to_float())
        }
        ColorLike::Transparent => Ok(RGBA::TRANSPARENT),
        ColorLike::Color(c) => Ok(c.rgba()),
    }
}

/// Parse a color string: name, hex, `rgb()`/`rgba()`, `hsl()`/`hsla()`.
pub fn parse_color_string(value: &str) -> Result<RGBA> {
    if let Some((r, g, b, a)) = names::lookup(value) {
        return Ok(RGBA8::new(r, g, b, a as f64 / 255.0).to_float());
    }
    if let Some(c) = parse_hex(value) {
        return Ok(c.to_float());
    }
    if let Some(c) = parse_rgb_func(value) {
        return Ok(c.to_float());
    }
    if let Some(h) = parse_hsl_func(value) {
        return Ok(h.to_rgba());
    }
    Err(ChromapError::InvalidColor {
        value: value.to_string(),
    })
}

/// Untyped numeric row. If any component exceeds 1, the row is treated as
/// 0-255 (RGB rounded and clipped, alpha clipped to 0-1); otherwise all
/// components are clipped to 0-1.
pub fn parse_float_seq(values: &[f64]) -> Result<RGBA> {
    if values.len() != 3 && values.len() != 4 {
        return Err(ChromapError::UnsupportedInput {
            message: format!(
                "expected 3 or 4 color components, got {}",
                values.len()
            ),
        });
    }
    let a = values.get(3).copied().unwrap_or(1.0);
    if values.iter().any(|&x| x > 1.0) {
        let clamp8 = |x: f64| (x.round().clamp(0.0, 255.0)) as u8;
        Ok(RGBA8::new(
            clamp8(values[0]),
            clamp8(values[1]),
            clamp8(values[2]),
            a.clamp(0.0, 1.0),
        )
        .to_float())
    } else {
        Ok(RGBA::new(
            values[0].clamp(0.0, 1.0),
            values[1].clamp(0.0, 1.0),
            values[2].clamp(0.0, 1.0),
            a.clamp(0.0, 1.0),
        ))
    }
}

/// Parse hex notation: `#RGB`, `#RRGGBB`, `#RRGGBBAA`, with optional `#`
/// or `0x` prefix. 3-digit form doubles each digit per channel.
fn parse_hex(value: &str) -> Option<RGBA8> {
    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    let hex = hex.strip_prefix("0x").or_else(|| hex.strip_prefix("0X")).unwrap_or(hex);

    if !hex.is_ascii() {
        return None;
    }
    let expanded: String = if hex.len() == 3 {
        hex.chars().flat_map(|c| [c, c]).collect()
    } else {
        hex.to_string()
    };
    if expanded.len() != 6 && expanded.len() != 8 {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    let (r, g, b) = (byte(0)?, byte(2)?, byte(4)?);
    let a = if expanded.len() == 8 {
        (byte(6)? as f64 / 255.0).clamp(0.0, 1.0)
    } else {
        1.0
    };
    Some(RGBA8::new(r, g, b, a))
}

/// Split the body of `func(...)` into component tokens. Components may be
/// separated by commas, whitespace, or (for the trailing alpha) a slash.
fn css_func_args<'a>(value: &'a str, funcs: &[&str]) -> Option<Vec<&'a str>> {
    let value = value.trim();
    let body = funcs
        .iter()
        .find_map(|f| value.strip_prefix(f))?
        .strip_prefix('(')?
        .trim_end()
        .strip_suffix(')')?;
    let tokens: Vec<&str> = body
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .collect();
    Some(tokens)
}

/// Alpha component: bare float, percentage, or `none`; clipped to 0-1.
fn parse_alpha_token(token: &str) -> Option<f64> {
    if token == "none" {
        return Some(0.0);
    }
    if let Some(pct) = token.strip_suffix('%') {
        return Some((pct.parse::<f64>().ok()? / 100.0).clamp(0.0, 1.0));
    }
    Some(token.parse::<f64>().ok()?.clamp(0.0, 1.0))
}

/// Parse `rgb(..)`/`rgba(..)`. Components may be bare numbers (rounded,
/// clipped to 0-255), percentages (scaled to 0-255), or `none` (0).
fn parse_rgb_func(value: &str) -> Option<RGBA8> {
    let tokens = css_func_args(value, &["rgba", "rgb"])?;
    if tokens.len() < 3 || tokens.len() > 4 {
        return None;
    }
    let mut rgb = [0u8; 3];
    for (slot, token) in rgb.iter_mut().zip(&tokens) {
        let v = if *token == "none" {
            0.0
        } else if let Some(pct) = token.strip_suffix('%') {
            (pct.parse::<f64>().ok()? / 100.0 * 255.0).round()
        } else {
            token.parse::<f64>().ok()?.round()
        };
        *slot = v.clamp(0.0, 255.0) as u8;
    }
    let a = match tokens.get(3) {
        Some(token) => parse_alpha_token(token)?,
        None => 1.0,
    };
    Some(RGBA8::new(rgb[0], rgb[1], rgb[2], a))
}

/// Parse `hsl(..)`/`hsla(..)`. Hue is degrees (normalized mod 360);
/// saturation and lightness must be percentages.
fn parse_hsl_func(value: &str) -> Option<HSLA> {
    let tokens = css_func_args(value, &["hsla", "hsl"])?;
    if tokens.len() < 3 || tokens.len() > 4 {
        return None;
    }
    let h = if tokens[0] == "none" {
        0.0
    } else if tokens[0].contains('%') {
        return None;
    } else {
        tokens[0].parse::<f64>().ok()?.rem_euclid(360.0) / 360.0
    };
    let mut sl = [0f64; 2];
    for (slot, token) in sl.iter_mut().zip(&tokens[1..3]) {
        *slot = if *token == "none" {
            0.0
        } else {
            let pct = token.strip_suffix('%')?;
            (pct.parse::<f64>().ok()? / 100.0).clamp(0.0, 1.0)
        };
    }
    let a = match tokens.get(3) {
        Some(token) => parse_alpha_token(token)?,
        None => 1.0,
    };
    Some(HSLA::new(h, sl[0], sl[1], a))
}

/// Unpack an integer into RGBA given a component order (a subset of
/// `"rgba"`, each letter at most once, most significant first) and bit
/// widths. `bits` may be empty (8 bits per component), a single width, or
/// one width per component.
pub fn parse_int(value: u64, format: &str, bits: &[u32]) -> Result<RGBA> {
    let widths = component_widths(format, bits)?;
    let mut out = RGBA::new(0.0, 0.0, 0.0, 1.0);
    let mut shift: u32 = widths.iter().sum();
    for (ch, w) in format.chars().zip(&widths) {
        shift -= w;
        let max = (1u64 << w) - 1;
        let x = ((value >> shift) & max) as f64 / max as f64;
        match ch {
            'r' => out.r = x,
            'g' => out.g = x,
            'b' => out.b = x,
            _ => out.a = x,
        }
    }
    Ok(out)
}

/// Pack RGBA into an integer; the inverse of [`parse_int`].
pub fn pack_int(rgba: RGBA, format: &str, bits: &[u32]) -> Result<u64> {
    let widths = component_widths(format, bits)?;
    let mut out = 0u64;
    for (ch, w) in format.chars().zip(&widths) {
        let max = (1u64 << w) - 1;
        let x = match ch {
            'r' => rgba.r,
            'g' => rgba.g,
            'b' => rgba.b,
            _ => rgba.a,
        };
        out = (out << w) | ((x * max as f64).round() as u64 & max);
    }
    Ok(out)
}

fn component_widths(format: &str, bits: &[u32]) -> Result<Vec<u32>> {
    if format.is_empty()
        || !format.chars().all(|c| matches!(c, 'r' | 'g' | 'b' | 'a'))
        || format.chars().enumerate().any(|(i, c)| format[..i].contains(c))
    {
        return Err(ChromapError::UnsupportedInput {
            message: format!("invalid component format {:?}", format),
        });
    }
    match bits.len() {
        0 => Ok(vec![8; format.len()]),
        1 => Ok(vec![bits[0]; format.len()]),
        n if n == format.len() => Ok(bits.to_vec()),
        n => Err(ChromapError::UnsupportedInput {
            message: format!(
                "expected {} bit widths for format {:?}, got {}",
                format.len(),
                format,
                n
            ),
        }),
    }
}
