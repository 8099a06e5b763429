//! Color stops: ordered (position, color) sequences backing a gradient.
//!
//! A [`ColorStops`] normalizes the whole family of colormap-like inputs
//! (color lists, (position, color) pairs, raw `(N, 5)` tables, segment
//! data, position maps, generating functions) into a canonical stop table,
//! and produces LUTs from it. See [`lut`] for the interpolation engine.

pub mod lut;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use ndarray::Array2;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::color::{Color, ColorLike};
use crate::error::{ChromapError, Result};

/// Number of samples used when a function-backed gradient is materialized
/// into a stop table.
const FUNC_SAMPLES: usize = 256;

/// How LUT values are produced between stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Blend continuously between neighboring stops.
    #[default]
    Linear,
    /// Return exact stop colors with hard edges.
    Nearest,
}

impl Interpolation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interpolation::Linear => "linear",
            Interpolation::Nearest => "nearest",
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Interpolation {
    type Err = ChromapError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linear" => Ok(Interpolation::Linear),
            "nearest" => Ok(Interpolation::Nearest),
            other => Err(ChromapError::UnsupportedInput {
                message: format!("unknown interpolation {:?}", other),
            }),
        }
    }
}

impl Serialize for Interpolation {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Record documents historically encode interpolation as a bool (true ==
// linear) as well as a string; accept both.
impl<'de> Deserialize<'de> for Interpolation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct Visitor;

        impl serde::de::Visitor<'_> for Visitor {
            type Value = Interpolation;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"linear\", \"nearest\", or a bool")
            }

            fn visit_bool<E: serde::de::Error>(self, v: bool) -> std::result::Result<Interpolation, E> {
                Ok(if v { Interpolation::Linear } else { Interpolation::Nearest })
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> std::result::Result<Interpolation, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

/// How unspecified stop positions are filled in during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// Distribute missing positions evenly between the nearest specified
    /// neighbors (edges default to 0.0 / 1.0).
    #[default]
    Neighboring,
    /// Replace the missing position at index `i` with `i / (len - 1)`,
    /// ignoring neighbors.
    Fractional,
}

/// A color stop in a color gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub position: f64,
    pub color: Color,
}

/// A gradient-generating function: position in 0-1 to RGBA components.
#[derive(Clone)]
pub struct LutFn(Arc<dyn Fn(f64) -> [f64; 4] + Send + Sync>);

impl LutFn {
    pub fn new(f: impl Fn(f64) -> [f64; 4] + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    fn eval(&self, x: f64) -> [f64; 4] {
        (self.0)(x)
    }
}

impl fmt::Debug for LutFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LutFn(..)")
    }
}

impl PartialEq for LutFn {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// One channel of matplotlib-style segment data.
#[derive(Clone)]
pub enum SegmentChannel {
    /// `(x, y0, y1)` rows.
    Table(Vec<(f64, f64, f64)>),
    /// A function of position, sampled over 0-1.
    Func(Arc<dyn Fn(f64) -> f64 + Send + Sync>),
}

impl fmt::Debug for SegmentChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentChannel::Table(rows) => f.debug_tuple("Table").field(rows).finish(),
            SegmentChannel::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// Matplotlib-style segment data: per-channel breakpoints or functions.
#[derive(Debug, Clone)]
pub struct SegmentData {
    pub red: SegmentChannel,
    pub green: SegmentChannel,
    pub blue: SegmentChannel,
    pub alpha: Option<SegmentChannel>,
}

/// One item of a colormap-like sequence: a bare color, a positioned color,
/// or a raw `(position, r, g, b, a)` row.
#[derive(Debug, Clone, PartialEq)]
pub enum StopLike {
    Color(ColorLike),
    Stop(f64, ColorLike),
    Raw([f64; 5]),
}

impl From<&str> for StopLike {
    fn from(c: &str) -> Self {
        StopLike::Color(c.into())
    }
}

impl From<String> for StopLike {
    fn from(c: String) -> Self {
        StopLike::Color(c.into())
    }
}

impl From<ColorLike> for StopLike {
    fn from(c: ColorLike) -> Self {
        StopLike::Color(c)
    }
}

impl From<Color> for StopLike {
    fn from(c: Color) -> Self {
        StopLike::Color(c.into())
    }
}

impl From<(f64, &str)> for StopLike {
    fn from((p, c): (f64, &str)) -> Self {
        StopLike::Stop(p, c.into())
    }
}

impl From<(f64, ColorLike)> for StopLike {
    fn from((p, c): (f64, ColorLike)) -> Self {
        StopLike::Stop(p, c)
    }
}

impl From<[f64; 5]> for StopLike {
    fn from(row: [f64; 5]) -> Self {
        StopLike::Raw(row)
    }
}

/// Anything that can be parsed into [`ColorStops`].
#[derive(Debug, Clone)]
pub enum ColormapLike {
    /// A single color string, or a catalog colormap name, with optional
    /// `_r` reversal suffix. (Catalog resolution happens in `Colormap`;
    /// `ColorStops::parse` treats this as a color string.)
    Name(String),
    /// A sequence of colors and/or positioned stops.
    Items(Vec<StopLike>),
    /// Position-to-color entries; sorted by position before parsing.
    Map(Vec<(f64, ColorLike)>),
    /// Matplotlib-style segment data.
    SegmentData(SegmentData),
    /// A raw `(N, 5)` table of `(position, r, g, b, a)` rows.
    Array(Array2<f64>),
    /// An existing stop sequence.
    Stops(ColorStops),
    /// A gradient-generating function.
    Func(LutFn),
}

impl From<&str> for ColormapLike {
    fn from(s: &str) -> Self {
        ColormapLike::Name(s.to_string())
    }
}

impl From<String> for ColormapLike {
    fn from(s: String) -> Self {
        ColormapLike::Name(s)
    }
}

impl From<Vec<StopLike>> for ColormapLike {
    fn from(items: Vec<StopLike>) -> Self {
        ColormapLike::Items(items)
    }
}

impl From<Vec<&str>> for ColormapLike {
    fn from(colors: Vec<&str>) -> Self {
        ColormapLike::Items(colors.into_iter().map(StopLike::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ColormapLike {
    fn from(colors: [&str; N]) -> Self {
        ColormapLike::Items(colors.into_iter().map(StopLike::from).collect())
    }
}

impl From<Vec<(f64, &str)>> for ColormapLike {
    fn from(stops: Vec<(f64, &str)>) -> Self {
        ColormapLike::Items(stops.into_iter().map(StopLike::from).collect())
    }
}

impl<const N: usize> From<[(f64, &str); N]> for ColormapLike {
    fn from(stops: [(f64, &str); N]) -> Self {
        ColormapLike::Items(stops.into_iter().map(StopLike::from).collect())
    }
}

impl From<Vec<[f64; 5]>> for ColormapLike {
    fn from(rows: Vec<[f64; 5]>) -> Self {
        ColormapLike::Items(rows.into_iter().map(StopLike::from).collect())
    }
}

impl From<Vec<ColorLike>> for ColormapLike {
    fn from(colors: Vec<ColorLike>) -> Self {
        ColormapLike::Items(colors.into_iter().map(StopLike::Color).collect())
    }
}

impl From<Array2<f64>> for ColormapLike {
    fn from(a: Array2<f64>) -> Self {
        ColormapLike::Array(a)
    }
}

impl From<SegmentData> for ColormapLike {
    fn from(seg: SegmentData) -> Self {
        ColormapLike::SegmentData(seg)
    }
}

impl From<ColorStops> for ColormapLike {
    fn from(stops: ColorStops) -> Self {
        ColormapLike::Stops(stops)
    }
}

impl From<LutFn> for ColormapLike {
    fn from(f: LutFn) -> Self {
        ColormapLike::Func(f)
    }
}

#[derive(Debug, Clone)]
enum Backing {
    /// `(N, 5)` table of `(position, r, g, b, a)` rows.
    Table(Array2<f64>),
    /// Pure gradient function; `samples` caches its materialized table.
    Func {
        f: LutFn,
        reversed: bool,
        samples: OnceCell<Array2<f64>>,
    },
}

/// An ordered, non-empty sequence of color stops.
///
/// Positions are non-decreasing; the first and last stops are anchored at
/// 0.0 / 1.0 during LUT generation (synthesized if the input didn't reach
/// the edges). Alternatively backed by a pure function, in which case the
/// stop table is a cached sampling of that function.
#[derive(Debug, Clone)]
pub struct ColorStops {
    backing: Backing,
    interpolation: Interpolation,
}

impl ColorStops {
    /// Parse any colormap-like input with the default
    /// [`FillMode::Neighboring`].
    pub fn parse(colors: impl Into<ColormapLike>) -> Result<Self> {
        Self::parse_with_fill(colors, FillMode::Neighboring)
    }

    /// Parse any colormap-like input.
    ///
    /// Each item can be a color or a (position, color) pair. Where not
    /// provided, positions are distributed between neighboring specified
    /// positions (`Neighboring`) or replaced with `index / (len - 1)`
    /// (`Fractional`):
    ///
    /// ```
    /// use chromap::stops::{ColorStops, FillMode, StopLike};
    ///
    /// let items: Vec<StopLike> =
    ///     vec!["r".into(), "y".into(), (0.8, "g").into(), "b".into()];
    /// let stops = ColorStops::parse(items.clone()).unwrap();
    /// assert_eq!(stops.stops(), vec![0.0, 0.4, 0.8, 1.0]);
    ///
    /// let stops = ColorStops::parse_with_fill(items, FillMode::Fractional).unwrap();
    /// assert_eq!(stops.stops(), vec![0.0, 1.0 / 3.0, 0.8, 1.0]);
    /// ```
    pub fn parse_with_fill(colors: impl Into<ColormapLike>, fill_mode: FillMode) -> Result<Self> {
        match colors.into() {
            ColormapLike::Stops(stops) => Ok(stops),
            ColormapLike::Func(f) => Ok(Self::from_fn_inner(f)),
            ColormapLike::Name(name) => {
                // a bare color makes a transparent-to-color gradient; the
                // `_r` suffix flips it
                let items: Vec<StopLike> = match name.strip_suffix("_r") {
                    Some(base) => vec![
                        StopLike::Color(ColorLike::Str(base.to_string())),
                        StopLike::Color(ColorLike::Transparent),
                    ],
                    None => vec![
                        StopLike::Color(ColorLike::Transparent),
                        StopLike::Color(ColorLike::Str(name)),
                    ],
                };
                Self::from_items(items, fill_mode)
            }
            ColormapLike::Items(items) => Self::from_items(items, fill_mode),
            ColormapLike::Map(mut entries) => {
                entries.sort_by(|a, b| a.0.total_cmp(&b.0));
                let items = entries
                    .into_iter()
                    .map(|(p, c)| StopLike::Stop(p, c))
                    .collect();
                Self::from_items(items, fill_mode)
            }
            ColormapLike::SegmentData(seg) => {
                Self::from_items(segment_data_to_stops(&seg), fill_mode)
            }
            ColormapLike::Array(a) => {
                if a.ncols() != 5 {
                    return Err(ChromapError::UnsupportedInput {
                        message: format!("expected an (N, 5) stop array, got {} columns", a.ncols()),
                    });
                }
                let items = a
                    .outer_iter()
                    .map(|row| StopLike::Raw([row[0], row[1], row[2], row[3], row[4]]))
                    .collect();
                Self::from_items(items, fill_mode)
            }
        }
    }

    /// A gradient backed by a pure function of position.
    pub fn from_fn(f: impl Fn(f64) -> [f64; 4] + Send + Sync + 'static) -> Self {
        Self::from_fn_inner(LutFn::new(f))
    }

    fn from_fn_inner(f: LutFn) -> Self {
        Self {
            backing: Backing::Func {
                f,
                reversed: false,
                samples: OnceCell::new(),
            },
            interpolation: Interpolation::Linear,
        }
    }

    fn from_items(items: Vec<StopLike>, fill_mode: FillMode) -> Result<Self> {
        if items.is_empty() {
            return Err(ChromapError::UnsupportedInput {
                message: "empty color sequence".to_string(),
            });
        }
        // a lone color still yields a valid gradient, from transparent
        let mut items = items;
        if items.len() == 1 {
            items.insert(0, StopLike::Color(ColorLike::Transparent));
        }

        let mut positions: Vec<Option<f64>> = Vec::with_capacity(items.len());
        let mut colors: Vec<Color> = Vec::with_capacity(items.len());
        for item in &items {
            match item {
                StopLike::Color(c) => {
                    positions.push(None);
                    colors.push(Color::from_like(c)?);
                }
                StopLike::Stop(p, c) => {
                    positions.push(Some(*p));
                    colors.push(Color::from_like(c)?);
                }
                StopLike::Raw(row) => {
                    positions.push(Some(row[0]));
                    colors.push(Color::from_like(&ColorLike::Floats(row[1..].to_vec()))?);
                }
            }
        }

        let filled = fill_stops(&positions, fill_mode);
        if filled.windows(2).any(|w| w[1] < w[0]) {
            return Err(ChromapError::StopOrder);
        }

        let mut table = Array2::zeros((filled.len(), 5));
        for (i, (pos, color)) in filled.iter().zip(&colors).enumerate() {
            let [r, g, b, a] = color.rgba().components();
            table[(i, 0)] = *pos;
            table[(i, 1)] = r;
            table[(i, 2)] = g;
            table[(i, 3)] = b;
            table[(i, 4)] = a;
        }
        Ok(Self {
            backing: Backing::Table(table),
            interpolation: Interpolation::Linear,
        })
    }

    /// The same stops with a different interpolation mode.
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// The `(N, 5)` stop table. For a function-backed gradient this is a
    /// cached sampling of the function.
    pub fn table(&self) -> &Array2<f64> {
        match &self.backing {
            Backing::Table(t) => t,
            Backing::Func { f, reversed, samples } => {
                samples.get_or_init(|| sample_func_table(f, *reversed, FUNC_SAMPLES))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.table().nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stop positions.
    pub fn stops(&self) -> Vec<f64> {
        self.table().column(0).to_vec()
    }

    /// Stop colors.
    pub fn colors(&self) -> Vec<Color> {
        self.iter().map(|s| s.color).collect()
    }

    /// The `(N, 4)` array of RGBA rows (positions dropped).
    pub fn color_array(&self) -> Array2<f64> {
        self.table().slice(ndarray::s![.., 1..]).to_owned()
    }

    /// A single stop by index.
    pub fn get(&self, index: usize) -> Option<ColorStop> {
        let table = self.table();
        if index >= table.nrows() {
            return None;
        }
        let row = table.row(index);
        Some(ColorStop {
            position: row[0],
            color: Color::from_rgba(crate::color::RGBA::new(row[1], row[2], row[3], row[4])),
        })
    }

    /// A contiguous sub-range of stops as a new `ColorStops`.
    pub fn slice(&self, range: std::ops::Range<usize>) -> Self {
        let table = self.table().slice(ndarray::s![range, ..]).to_owned();
        Self {
            backing: Backing::Table(table),
            interpolation: self.interpolation,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = ColorStop> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Create an `(N, 4)` RGBA LUT, interpolated between the stops.
    ///
    /// With nearest interpolation the raw color array is returned and `n`
    /// is not consulted; callers are expected to request `n == len()`.
    pub fn to_lut(&self, n: usize, gamma: f64) -> Result<Array2<f64>> {
        if self.interpolation == Interpolation::Nearest {
            let mut colors = self.color_array();
            colors.mapv_inplace(|v| v.clamp(0.0, 1.0));
            return Ok(colors);
        }
        match &self.backing {
            Backing::Func { f, reversed, .. } => Ok(sample_func_lut(f, *reversed, n, gamma)),
            Backing::Table(table) => {
                // many-stop tables requested at their own resolution are
                // treated as already-sampled data
                if table.nrows() > 50 && n == table.nrows() - 1 {
                    let mut colors = self.color_array();
                    colors.mapv_inplace(|v| v.clamp(0.0, 1.0));
                    return Ok(colors);
                }
                lut::interpolate_stops(n, table, gamma)
            }
        }
    }

    /// The gradient visually reversed: stop order flipped and every
    /// position `p` replaced by `1 - p`.
    ///
    /// A function-backed gradient is reversed by toggling a flag that makes
    /// evaluation read `f(1 - x)`, so reversing twice restores the original
    /// function rather than wrapping it twice.
    pub fn reversed(&self) -> Self {
        let backing = match &self.backing {
            Backing::Table(table) => {
                let mut out = Array2::zeros(table.raw_dim());
                for (i, row) in table.outer_iter().rev().enumerate() {
                    out[(i, 0)] = 1.0 - row[0];
                    for c in 1..5 {
                        out[(i, c)] = row[c];
                    }
                }
                Backing::Table(out)
            }
            Backing::Func { f, reversed, .. } => Backing::Func {
                f: f.clone(),
                reversed: !reversed,
                samples: OnceCell::new(),
            },
        };
        Self {
            backing,
            interpolation: self.interpolation,
        }
    }

    /// A CSS `background` property for this gradient.
    ///
    /// With nearest interpolation each stop is emitted twice at adjacent
    /// midpoint percentages, producing hard edges instead of blends.
    pub fn to_css(&self, options: &CssOptions) -> String {
        let color_token = |c: Color| {
            if options.as_hex {
                c.hex()
            } else {
                c.rgba_string()
            }
        };
        let stops: Vec<ColorStop> = self.iter().collect();
        if stops.len() == 1 {
            return format!("background: {};", color_token(stops[0].color));
        }
        let mut tokens = Vec::new();
        match self.interpolation {
            Interpolation::Linear => {
                for stop in &stops {
                    tokens.push(format!(
                        "{} {}%",
                        color_token(stop.color),
                        format_percent(stop.position * 100.0)
                    ));
                }
            }
            Interpolation::Nearest => {
                for (i, stop) in stops.iter().enumerate() {
                    let start = if i == 0 {
                        0.0
                    } else {
                        (stops[i - 1].position + stop.position) / 2.0
                    };
                    let end = if i == stops.len() - 1 {
                        1.0
                    } else {
                        (stop.position + stops[i + 1].position) / 2.0
                    };
                    let token = color_token(stop.color);
                    tokens.push(format!("{} {}%", token, format_percent(start * 100.0)));
                    tokens.push(format!("{} {}%", token, format_percent(end * 100.0)));
                }
            }
        }
        let body = tokens.join(", ");
        if options.radial {
            format!("background: radial-gradient({});", body)
        } else {
            format!("background: linear-gradient({}deg, {});", options.angle, body)
        }
    }
}

impl PartialEq for ColorStops {
    fn eq(&self, other: &Self) -> bool {
        self.table() == other.table()
    }
}

/// Options for [`ColorStops::to_css`] / `Colormap::to_css`.
#[derive(Debug, Clone)]
pub struct CssOptions {
    /// Gradient angle in degrees (ignored for radial gradients).
    pub angle: f64,
    /// Emit a `radial-gradient` instead of a `linear-gradient`.
    pub radial: bool,
    /// Emit hex color tokens instead of `rgb()`/`rgba()`.
    pub as_hex: bool,
}

impl Default for CssOptions {
    fn default() -> Self {
        Self {
            angle: 90.0,
            radial: false,
            as_hex: false,
        }
    }
}

fn format_percent(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}", rounded)
}

/// Fill in missing stop positions.
///
/// For [`FillMode::Neighboring`], `None` edges default to 0.0 / 1.0 and
/// each interior run of `None`s is spaced evenly between the specified
/// positions bounding it:
///
/// ```
/// use chromap::stops::{fill_stops, FillMode};
///
/// let filled = fill_stops(&[Some(0.0), None, Some(0.5), None, Some(1.0)], FillMode::Neighboring);
/// assert_eq!(filled, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(fill_stops(&[None, None, None], FillMode::Neighboring), vec![0.0, 0.5, 1.0]);
/// ```
pub fn fill_stops(stops: &[Option<f64>], fill_mode: FillMode) -> Vec<f64> {
    if stops.is_empty() {
        return Vec::new();
    }
    if fill_mode == FillMode::Fractional {
        let denom = (stops.len() - 1).max(1) as f64;
        return stops
            .iter()
            .enumerate()
            .map(|(i, s)| s.unwrap_or(i as f64 / denom))
            .collect();
    }

    // make edges 0-1 unless they are explicitly set
    let mut stops: Vec<Option<f64>> = stops.to_vec();
    if stops[0].is_none() {
        stops[0] = Some(0.0);
    }
    let last = stops.len() - 1;
    if stops[last].is_none() {
        stops[last] = Some(1.0);
    }

    let mut out: Vec<f64> = Vec::with_capacity(stops.len());
    let mut last_specified = (0usize, 0.0f64);
    let mut in_gap = false;
    for (idx, stop) in stops.iter().enumerate() {
        match stop {
            Some(stop) => {
                if in_gap {
                    // distribute the run of missing positions evenly
                    // between the bounding specified stops
                    let (idx0, pos0) = last_specified;
                    let filler =
                        ndarray::Array1::linspace(pos0, *stop, idx - idx0 + 1);
                    out.extend(filler.iter().skip(1));
                    in_gap = false;
                } else {
                    out.push(*stop);
                }
                last_specified = (idx, *stop);
            }
            None => in_gap = true,
        }
    }
    out
}

/// Materialize a gradient function into an `(n, 5)` stop table.
fn sample_func_table(f: &LutFn, reversed: bool, n: usize) -> Array2<f64> {
    let xs = lut::unit_linspace(n);
    let mut out = Array2::zeros((xs.len(), 5));
    for (i, &x) in xs.iter().enumerate() {
        let rgba = eval_clipped(f, reversed, x);
        out[(i, 0)] = x;
        for c in 0..4 {
            out[(i, c + 1)] = rgba[c];
        }
    }
    out
}

/// Sample a gradient function into an `(n, 4)` LUT at gamma-bent positions.
fn sample_func_lut(f: &LutFn, reversed: bool, n: usize, gamma: f64) -> Array2<f64> {
    let n = n.max(1);
    let mut out = Array2::zeros((n, 4));
    for i in 0..n {
        let x = if n == 1 {
            1.0
        } else {
            (i as f64 / (n - 1) as f64).powf(gamma)
        };
        let rgba = eval_clipped(f, reversed, x);
        for c in 0..4 {
            out[(i, c)] = rgba[c];
        }
    }
    out
}

fn eval_clipped(f: &LutFn, reversed: bool, x: f64) -> [f64; 4] {
    let x = if reversed { 1.0 - x } else { x };
    let mut rgba = f.eval(x);
    for v in &mut rgba {
        *v = v.clamp(0.0, 1.0);
    }
    rgba
}

// Float positions as ordered map keys; positions are finite and in 0-1.
#[derive(PartialEq)]
struct OrdPos(f64);

impl Eq for OrdPos {}

impl PartialOrd for OrdPos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrdPos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Convert matplotlib-style segment data to positioned stops.
///
/// Table channels contribute their breakpoint values directly; function
/// channels are sampled over 256 evenly spaced positions.
fn segment_data_to_stops(seg: &SegmentData) -> Vec<StopLike> {
    let has_alpha = seg.alpha.is_some();
    let default = [0.0, 0.0, 0.0, 1.0];
    let mut merged: BTreeMap<OrdPos, [f64; 4]> = BTreeMap::new();

    let mut channels: Vec<(usize, &SegmentChannel)> =
        vec![(0, &seg.red), (1, &seg.green), (2, &seg.blue)];
    if let Some(alpha) = &seg.alpha {
        channels.push((3, alpha));
    }
    for (index, channel) in channels {
        match channel {
            SegmentChannel::Table(rows) => {
                for &(x, y0, _y1) in rows {
                    merged.entry(OrdPos(x)).or_insert(default)[index] = y0;
                }
            }
            SegmentChannel::Func(f) => {
                for &x in lut::unit_linspace(FUNC_SAMPLES).iter() {
                    let y = f(x).clamp(0.0, 1.0);
                    merged.entry(OrdPos(x)).or_insert(default)[index] = y;
                }
            }
        }
    }

    merged
        .into_iter()
        .map(|(OrdPos(x), rgba)| {
            let components = if has_alpha {
                rgba.to_vec()
            } else {
                rgba[..3].to_vec()
            };
            StopLike::Stop(x, ColorLike::Floats(components))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn rmb() -> ColorStops {
        ColorStops::parse(["red", "magenta", "blue"]).unwrap()
    }

    #[test]
    fn test_parse_color_list() {
        let stops = rmb();
        assert_eq!(stops.stops(), vec![0.0, 0.5, 1.0]);
        for (stop, expected) in stops.iter().zip(["red", "magenta", "blue"]) {
            assert_eq!(stop.color, expected);
        }
    }

    #[test]
    fn test_parse_equivalent_inputs() {
        let half_green = 128.0 / 255.0;
        let data = vec![
            [0.0, 1.0, 0.0, 0.0, 1.0],
            [0.25, 0.0, half_green, 1.0, 0.5],
            [0.5, 1.0, 0.0, 1.0, 1.0],
            [0.9, 0.0, 0.0, 1.0, 1.0],
        ];
        let expected = ColorStops::parse(data.clone()).unwrap();

        let items: Vec<StopLike> = vec![
            "red".into(),
            StopLike::Color(ColorLike::Floats(vec![0.0, 128.0, 255.0, 0.5])),
            (0.5, "m").into(),
            (0.9, "blue").into(),
        ];
        assert_eq!(ColorStops::parse(items).unwrap(), expected);

        let array = array![
            [0.0, 1.0, 0.0, 0.0, 1.0],
            [0.25, 0.0, half_green, 1.0, 0.5],
            [0.5, 1.0, 0.0, 1.0, 1.0],
            [0.9, 0.0, 0.0, 1.0, 1.0],
        ];
        assert_eq!(ColorStops::parse(array).unwrap(), expected);

        let map = ColormapLike::Map(vec![
            (0.9, ColorLike::Floats(vec![0.0, 0.0, 1.0, 1.0])),
            (0.0, ColorLike::Floats(vec![1.0, 0.0, 0.0, 1.0])),
            (0.5, ColorLike::Floats(vec![1.0, 0.0, 1.0, 1.0])),
            (0.25, ColorLike::Floats(vec![0.0, half_green, 1.0, 0.5])),
        ]);
        assert_eq!(ColorStops::parse(map).unwrap(), expected);
    }

    #[test]
    fn test_parse_single_color_string() {
        // a bare color becomes a transparent-to-color gradient
        let stops = ColorStops::parse("red").unwrap();
        assert_eq!(stops.len(), 2);
        assert_eq!(stops.get(0).unwrap().color, Color::transparent());
        assert_eq!(stops.get(1).unwrap().color, "red");

        // the _r suffix flips it
        let stops = ColorStops::parse("red_r").unwrap();
        assert_eq!(stops.get(0).unwrap().color, "red");
        assert_eq!(stops.get(1).unwrap().color, Color::transparent());
    }

    #[test]
    fn test_fill_stops_modes() {
        use FillMode::*;
        assert_eq!(fill_stops(&[None, None, None], Neighboring), vec![0.0, 0.5, 1.0]);
        assert_eq!(fill_stops(&[None, Some(0.8), None], Neighboring), vec![0.0, 0.8, 1.0]);
        assert_eq!(
            fill_stops(&[None, None, Some(0.8), None], Neighboring),
            vec![0.0, 0.4, 0.8, 1.0]
        );
        assert_eq!(
            fill_stops(&[None, None, Some(0.8), None], Fractional),
            vec![0.0, 1.0 / 3.0, 0.8, 1.0]
        );
        assert_eq!(
            fill_stops(&[None, None, Some(0.8)], Neighboring),
            vec![0.0, 0.4, 0.8]
        );
        assert_eq!(
            fill_stops(&[None, None, Some(0.8)], Fractional),
            vec![0.0, 0.5, 0.8]
        );
        assert_eq!(
            fill_stops(&[Some(0.0), None, Some(0.5), None, Some(1.0)], Neighboring),
            vec![0.0, 0.25, 0.5, 0.75, 1.0]
        );
    }

    #[test]
    fn test_out_of_order_stops_rejected() {
        let items: Vec<StopLike> = vec![(0.8, "r").into(), (0.2, "b").into()];
        assert!(matches!(
            ColorStops::parse(items),
            Err(ChromapError::StopOrder)
        ));
    }

    #[test]
    fn test_slice_and_get() {
        let stops = rmb();
        let sliced = stops.slice(0..2);
        assert_eq!(sliced.len(), 2);
        assert_eq!(sliced.get(1).unwrap().color, "magenta");
        assert!(stops.get(7).is_none());
    }

    #[test]
    fn test_reversed_mirrors_positions() {
        let stops = rmb().reversed();
        assert_eq!(stops.stops(), vec![0.0, 0.5, 1.0]);
        assert_eq!(stops.colors(), ColorStops::parse(["b", "m", "r"]).unwrap().colors());
        assert_eq!(stops.reversed(), rmb());

        let uneven = ColorStops::parse(vec![(0.2, "red"), (0.8, "blue")]).unwrap();
        assert_eq!(uneven.reversed().stops(), vec![1.0 - 0.8, 1.0 - 0.2]);
        assert_eq!(uneven.reversed().get(0).unwrap().color, "blue");
    }

    #[test]
    fn test_function_backed_double_reversal() {
        let stops = ColorStops::from_fn(|x| [x, 0.0, 1.0 - x, 1.0]);
        let twice = stops.reversed().reversed();
        assert_eq!(stops, twice);

        let rev = stops.reversed();
        let lut = rev.to_lut(3, 1.0).unwrap();
        // reversed function evaluates at 1 - x
        assert_eq!(lut.row(0).to_vec(), vec![1.0, 0.0, 0.0, 1.0]);
        assert_eq!(lut.row(2).to_vec(), vec![0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_nearest_lut_returns_raw_colors() {
        let stops = rmb().with_interpolation(Interpolation::Nearest);
        let lut = stops.to_lut(17, 1.0).unwrap();
        assert_eq!(lut.nrows(), 3);
        assert_eq!(lut.row(1).to_vec(), vec![1.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_segment_data() {
        let data = [
            [0.0, 1.0, 0.0, 0.0, 1.0],
            [0.25, 0.0, 0.50196078, 1.0, 0.5],
            [0.5, 1.0, 0.0, 1.0, 1.0],
            [0.9, 0.0, 0.0, 1.0, 1.0],
        ];
        let channel = |idx: usize| {
            SegmentChannel::Table(data.iter().map(|row| (row[0], row[idx], row[idx])).collect())
        };
        let seg = SegmentData {
            red: channel(1),
            green: channel(2),
            blue: channel(3),
            alpha: Some(channel(4)),
        };
        let expected = ColorStops::parse(data.to_vec()).unwrap();
        assert_eq!(ColorStops::parse(seg).unwrap(), expected);
    }

    #[test]
    fn test_segment_data_with_function_channel() {
        let seg = SegmentData {
            red: SegmentChannel::Func(Arc::new(|x| x)),
            green: SegmentChannel::Table(vec![(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)]),
            blue: SegmentChannel::Table(vec![(0.0, 1.0, 1.0), (1.0, 0.0, 0.0)]),
            alpha: None,
        };
        let stops = ColorStops::parse(seg).unwrap();
        assert_eq!(stops.len(), 256);
        assert_eq!(stops.get(0).unwrap().color, "blue");
        let last = stops.get(255).unwrap();
        assert_eq!(last.color, "red");
    }

    #[test]
    fn test_to_css_linear() {
        let css = rmb().to_css(&CssOptions::default());
        assert_eq!(
            css,
            "background: linear-gradient(90deg, rgb(255, 0, 0) 0%, \
             rgb(255, 0, 255) 50%, rgb(0, 0, 255) 100%);"
        );
        let css = rmb().to_css(&CssOptions {
            as_hex: true,
            radial: true,
            ..Default::default()
        });
        assert_eq!(
            css,
            "background: radial-gradient(#FF0000 0%, #FF00FF 50%, #0000FF 100%);"
        );
    }

    #[test]
    fn test_to_css_nearest_doubles_stops() {
        let css = rmb()
            .with_interpolation(Interpolation::Nearest)
            .to_css(&CssOptions {
                as_hex: true,
                ..Default::default()
            });
        assert_eq!(
            css,
            "background: linear-gradient(90deg, #FF0000 0%, #FF0000 25%, \
             #FF00FF 25%, #FF00FF 75%, #0000FF 75%, #0000FF 100%);"
        );
    }

    #[test]
    fn test_interpolation_serde_accepts_bool_and_string() {
        assert_eq!(
            serde_json::from_str::<Interpolation>("false").unwrap(),
            Interpolation::Nearest
        );
        assert_eq!(
            serde_json::from_str::<Interpolation>("true").unwrap(),
            Interpolation::Linear
        );
        assert_eq!(
            serde_json::from_str::<Interpolation>("\"nearest\"").unwrap(),
            Interpolation::Nearest
        );
        assert!(serde_json::from_str::<Interpolation>("\"cubic\"").is_err());
        assert_eq!(
            serde_json::to_string(&Interpolation::Linear).unwrap(),
            "\"linear\""
        );
    }
}
