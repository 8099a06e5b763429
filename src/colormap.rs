//! The `Colormap` facade: a named mapping from scalars to colors.
//!
//! Wraps a [`ColorStops`] with metadata and a memoized LUT cache, and
//! exposes scalar/array evaluation with matplotlib-compatible index
//! semantics.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ndarray::Array2;
use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::catalog::Catalog;
use crate::color::Color;
use crate::error::{ChromapError, Result};
use crate::stops::{ColorStops, ColormapLike, CssOptions, Interpolation, StopLike};

/// Default number of LUT samples.
///
/// An odd sample count keeps evenly spaced stop positions (0, 0.5, 1)
/// landing exactly on LUT rows.
pub const DEFAULT_LUT_SIZE: usize = 255;

/// A colormap: a continuous (or nearest-stop) mapping from scalar values in
/// 0-1 to RGBA colors.
///
/// Construction from a string resolves catalog names first (including the
/// `_r` reversal suffix and `namespace:name` qualification), then falls
/// back to treating the string as a single color. All other inputs are
/// parsed directly as color stops.
///
/// The instance is immutable apart from its internal LUT cache, which is
/// compute-once per `(N, gamma)` key; concurrent reads are safe, and a
/// concurrent first population of the same key merely computes the same
/// pure result twice.
pub struct Colormap {
    name: String,
    identifier: String,
    category: Option<String>,
    stops: ColorStops,
    luts: RwLock<HashMap<(usize, u64), Arc<Array2<f64>>>>,
}

impl Colormap {
    /// Create a colormap from anything colormap-like.
    pub fn new(input: impl Into<ColormapLike>) -> Result<Self> {
        match input.into() {
            ColormapLike::Name(name) => Self::from_name(&name),
            other => {
                let stops = ColorStops::parse(other)?;
                Ok(Self::assemble("custom colormap", None, stops))
            }
        }
    }

    /// Create a colormap from a catalog name or color string.
    fn from_name(name: &str) -> Result<Self> {
        let base = name.strip_suffix("_r").unwrap_or(name);
        match Catalog::builtin().get(base) {
            Ok(item) => {
                let stops = if base == name {
                    item.stops.clone()
                } else {
                    item.stops.reversed()
                };
                Ok(Self::assemble(name, item.category.clone(), stops))
            }
            Err(ChromapError::NotFound { .. }) => {
                // not a colormap name: a bare color yields a
                // transparent-to-color gradient
                let stops = ColorStops::parse(ColormapLike::Name(name.to_string()))?;
                Ok(Self::assemble(name, None, stops))
            }
            Err(other) => Err(other),
        }
    }

    fn assemble(name: &str, category: Option<String>, stops: ColorStops) -> Self {
        Self {
            name: name.to_string(),
            identifier: make_identifier(name),
            category,
            stops,
            luts: RwLock::new(HashMap::new()),
        }
    }

    /// The same colormap under a new name (identifier recomputed).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self.identifier = make_identifier(&self.name);
        self
    }

    /// The same colormap with a category label.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// The same colormap with a different interpolation mode.
    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.stops = self.stops.with_interpolation(interpolation);
        self.luts = RwLock::new(HashMap::new());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The normalized form of the name.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn interpolation(&self) -> Interpolation {
        self.stops.interpolation()
    }

    pub fn color_stops(&self) -> &ColorStops {
        &self.stops
    }

    /// Number of color stops.
    pub fn num_colors(&self) -> usize {
        self.stops.len()
    }

    /// A lookup table of `n` RGBA rows, memoized per `(n, gamma)`.
    ///
    /// The result is deterministic: the same key always returns the same
    /// table for the lifetime of the instance.
    pub fn lut(&self, n: usize, gamma: f64) -> Result<Arc<Array2<f64>>> {
        let key = (n, gamma.to_bits());
        if let Some(cached) = self.luts.read().get(&key) {
            return Ok(cached.clone());
        }
        let lut = Arc::new(self.stops.to_lut(n, gamma)?);
        self.luts.write().insert(key, lut.clone());
        Ok(lut)
    }

    /// Map a normalized value in 0-1 to a color, using the default LUT.
    ///
    /// Values below 0 clamp to the first LUT entry; 1.0 (and anything
    /// above) maps to the last.
    pub fn sample(&self, x: f64) -> Result<Color> {
        self.sample_with(x, DEFAULT_LUT_SIZE, 1.0)
    }

    /// Map a normalized value with an explicit LUT size and gamma.
    pub fn sample_with(&self, x: f64, n: usize, gamma: f64) -> Result<Color> {
        let lut = self.lut(n, gamma)?;
        let row = lut.row(float_index(x, lut.nrows()));
        Ok(Color::from_rgba(crate::color::RGBA::new(
            row[0], row[1], row[2], row[3],
        )))
    }

    /// Map an array of normalized values to an `(len, 4)` array of RGBA
    /// rows.
    pub fn map(&self, xs: &[f64]) -> Result<Array2<f64>> {
        self.map_with(xs, DEFAULT_LUT_SIZE, 1.0)
    }

    /// Map an array of normalized values with explicit LUT size and gamma.
    pub fn map_with(&self, xs: &[f64], n: usize, gamma: f64) -> Result<Array2<f64>> {
        let lut = self.lut(n, gamma)?;
        let rows = lut.nrows();
        let mut out = Array2::zeros((xs.len(), 4));
        for (i, &x) in xs.iter().enumerate() {
            out.row_mut(i).assign(&lut.row(float_index(x, rows)));
        }
        Ok(out)
    }

    /// Like [`map`](Self::map), but scales the LUT to 8-bit before
    /// indexing and returns `u8` rows.
    pub fn map_bytes(&self, xs: &[f64]) -> Result<Array2<u8>> {
        let lut = self.lut(DEFAULT_LUT_SIZE, 1.0)?;
        let rows = lut.nrows();
        let mut out = Array2::zeros((xs.len(), 4));
        for (i, &x) in xs.iter().enumerate() {
            let row = lut.row(float_index(x, rows));
            for c in 0..4 {
                out[(i, c)] = (row[c] * 255.0) as u8;
            }
        }
        Ok(out)
    }

    /// Direct (integer) LUT indexing: indices are clipped to the table,
    /// not interpreted as normalized values.
    pub fn lookup(&self, indices: &[i64]) -> Result<Array2<f64>> {
        let lut = self.lut(DEFAULT_LUT_SIZE, 1.0)?;
        let last = lut.nrows() as i64 - 1;
        let mut out = Array2::zeros((indices.len(), 4));
        for (i, &index) in indices.iter().enumerate() {
            out.row_mut(i)
                .assign(&lut.row(index.clamp(0, last) as usize));
        }
        Ok(out)
    }

    /// `n` colors sampled evenly over the range of the colormap.
    pub fn iter_colors(&self, n: usize) -> Result<Vec<Color>> {
        crate::stops::lut::unit_linspace(n)
            .iter()
            .map(|&x| self.sample(x))
            .collect()
    }

    /// The reversed colormap. The name gains an `_r` suffix, or loses it
    /// if already present.
    pub fn reversed(&self) -> Self {
        let name = match self.name.strip_suffix("_r") {
            Some(base) => base.to_string(),
            None => format!("{}_r", self.name),
        };
        Self::assemble(&name, self.category.clone(), self.stops.reversed())
    }

    /// A CSS `background` property for this colormap.
    pub fn to_css(&self, options: &CssOptions) -> String {
        self.stops.to_css(options)
    }
}

impl From<&Colormap> for ColormapLike {
    fn from(cmap: &Colormap) -> Self {
        ColormapLike::Stops(cmap.stops.clone())
    }
}

impl PartialEq for Colormap {
    fn eq(&self, other: &Self) -> bool {
        self.stops == other.stops
    }
}

impl fmt::Debug for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Colormap")
            .field("name", &self.name)
            .field("identifier", &self.identifier)
            .field("category", &self.category)
            .field("interpolation", &self.interpolation())
            .field("num_colors", &self.num_colors())
            .finish()
    }
}

impl Clone for Colormap {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            identifier: self.identifier.clone(),
            category: self.category.clone(),
            stops: self.stops.clone(),
            luts: RwLock::new(self.luts.read().clone()),
        }
    }
}

/// The stable dict/list round-trip form used by serialization frameworks.
#[derive(Serialize, Deserialize)]
struct ColormapRepr {
    name: String,
    identifier: String,
    category: Option<String>,
    interpolation: Interpolation,
    color_stops: Vec<(f64, [f64; 4])>,
}

impl Serialize for Colormap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let color_stops = self
            .stops
            .table()
            .outer_iter()
            .map(|row| (row[0], [row[1], row[2], row[3], row[4]]))
            .collect();
        ColormapRepr {
            name: self.name.clone(),
            identifier: self.identifier.clone(),
            category: self.category.clone(),
            interpolation: self.interpolation(),
            color_stops,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Colormap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let repr = ColormapRepr::deserialize(deserializer)?;
        let items: Vec<StopLike> = repr
            .color_stops
            .into_iter()
            .map(|(p, c)| StopLike::Raw([p, c[0], c[1], c[2], c[3]]))
            .collect();
        let stops = ColorStops::parse(items)
            .map_err(serde::de::Error::custom)?
            .with_interpolation(repr.interpolation);
        let mut cmap = Colormap::assemble(&repr.name, repr.category, stops);
        cmap.identifier = repr.identifier;
        Ok(cmap)
    }
}

/// Lowercase a name and replace spaces/hyphens with underscores, dropping
/// any other non-alphanumeric characters.
fn make_identifier(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | ' '))
        .flat_map(|c| c.to_lowercase())
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

/// Convert a normalized float position into a LUT row index.
///
/// Mirrors matplotlib's mapping: negative values clamp to the first row,
/// `x == 1.0` is boundary-inclusive (maps to the last row), and the value
/// is truncated, not rounded.
fn float_index(x: f64, n: usize) -> usize {
    let nf = n as f64;
    let mut v = x * nf;
    if v < 0.0 {
        return 0;
    }
    if v == nf {
        v = nf - 1.0;
    } else if v > nf {
        v = nf;
    }
    (v as i64).clamp(0, n as i64 - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_hits_stops_exactly() {
        let cmap = Colormap::new(["red", "magenta", "blue"]).unwrap();
        assert_eq!(cmap.sample(0.0).unwrap(), "red");
        assert_eq!(cmap.sample(0.5).unwrap(), "magenta");
        assert_eq!(cmap.sample(1.0).unwrap(), "blue");
        // out of range clamps to the last entry
        assert_eq!(cmap.sample(1.5).unwrap(), "blue");
        assert_eq!(cmap.sample(-0.5).unwrap(), "red");
    }

    #[test]
    fn test_map_array() {
        let cmap = Colormap::new(["red", "magenta", "blue"]).unwrap();
        let out = cmap.map(&[0.0, 0.5, 1.0]).unwrap();
        assert_eq!(out.row(0).to_vec(), vec![1.0, 0.0, 0.0, 1.0]);
        assert_eq!(out.row(1).to_vec(), vec![1.0, 0.0, 1.0, 1.0]);
        assert_eq!(out.row(2).to_vec(), vec![0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_lut_values() {
        let cmap = Colormap::new(["red", "blue"]).unwrap();
        assert_eq!(
            cmap.lut(1, 1.0).unwrap().row(0).to_vec(),
            vec![0.0, 0.0, 1.0, 1.0]
        );
        assert_eq!(
            cmap.lut(2, 1.0).unwrap().row(0).to_vec(),
            vec![1.0, 0.0, 0.0, 1.0]
        );
        let lut3 = cmap.lut(3, 1.0).unwrap();
        assert_eq!(lut3.row(1).to_vec(), vec![0.5, 0.0, 0.5, 1.0]);
        let lut3g = cmap.lut(3, 2.0).unwrap();
        assert_eq!(lut3g.row(1).to_vec(), vec![0.75, 0.0, 0.25, 1.0]);
    }

    #[test]
    fn test_lut_pads_unanchored_stops() {
        let cmap = Colormap::new(vec![(0.2, "red"), (0.8, "blue")]).unwrap();
        let lut = cmap.lut(3, 1.0).unwrap();
        assert_eq!(lut.row(0).to_vec(), vec![1.0, 0.0, 0.0, 1.0]);
        assert_eq!(lut.row(1).to_vec(), vec![0.5, 0.0, 0.5, 1.0]);
        assert_eq!(lut.row(2).to_vec(), vec![0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_lut_cache_returns_same_table() {
        let cmap = Colormap::new(["red", "blue"]).unwrap();
        let first = cmap.lut(64, 1.5).unwrap();
        let second = cmap.lut(64, 1.5).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_integer_lookup_is_direct() {
        let cmap = Colormap::new(["red", "blue"]).unwrap();
        let out = cmap.lookup(&[0, -3, 9999]).unwrap();
        assert_eq!(out.row(0).to_vec(), vec![1.0, 0.0, 0.0, 1.0]);
        // negative and overflowing indices clip to the table
        assert_eq!(out.row(1).to_vec(), vec![1.0, 0.0, 0.0, 1.0]);
        assert_eq!(out.row(2).to_vec(), vec![0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_map_bytes() {
        let cmap = Colormap::new(["black", "white"]).unwrap();
        let out = cmap.map_bytes(&[0.0, 1.0]).unwrap();
        assert_eq!(out.row(0).to_vec(), vec![0, 0, 0, 255]);
        assert_eq!(out.row(1).to_vec(), vec![255, 255, 255, 255]);
    }

    #[test]
    fn test_iter_colors() {
        let cmap = Colormap::new(["red", "magenta", "blue"]).unwrap();
        let colors = cmap.iter_colors(3).unwrap();
        assert_eq!(colors[0], "red");
        assert_eq!(colors[1], "magenta");
        assert_eq!(colors[2], "blue");
    }

    #[test]
    fn test_equality_ignores_names() {
        let a = Colormap::new(["red", "magenta", "blue"]).unwrap();
        let b = Colormap::new(vec![(0.2, "red"), (0.8, "blue")]).unwrap();
        let c = Colormap::new(["r", "m", "b"]).unwrap().with_name("other");
        assert_eq!(a, c);
        assert_ne!(a, b);
    }

    #[test]
    fn test_reversed_name_transform_and_involution() {
        let cmap = Colormap::new(["red", "magenta", "blue"])
            .unwrap()
            .with_name("rmb");
        let rev = cmap.reversed();
        assert_eq!(rev.name(), "rmb_r");
        assert_eq!(rev.sample(0.0).unwrap(), "blue");
        assert_eq!(rev.sample(1.0).unwrap(), "red");
        let back = rev.reversed();
        assert_eq!(back.name(), "rmb");
        assert_eq!(back, cmap);
    }

    #[test]
    fn test_unknown_string_is_invalid_color() {
        let err = Colormap::new("bad_string").unwrap_err();
        assert!(matches!(err, ChromapError::InvalidColor { .. }));
        assert!(err.to_string().contains("bad_string"));
    }

    #[test]
    fn test_single_color_string_gradient() {
        let cmap = Colormap::new("red").unwrap();
        assert_eq!(cmap.num_colors(), 2);
        assert_eq!(cmap.sample(1.0).unwrap(), "red");
        assert_eq!(cmap.sample(0.0).unwrap().alpha(), 0.0);
    }

    #[test]
    fn test_identifier_normalization() {
        let cmap = Colormap::new(["red", "blue"])
            .unwrap()
            .with_name("My Fancy-Map!");
        assert_eq!(cmap.identifier(), "my_fancy_map");
    }

    #[test]
    fn test_serde_round_trip() {
        let cmap = Colormap::new(["red", "magenta", "blue"])
            .unwrap()
            .with_name("rmb")
            .with_category("miscellaneous");
        let json = serde_json::to_string(&cmap).unwrap();
        let back: Colormap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmap);
        assert_eq!(back.name(), "rmb");
        assert_eq!(back.category(), Some("miscellaneous"));
        assert_eq!(back.identifier(), "rmb");
    }

    #[test]
    fn test_float_index_boundaries() {
        assert_eq!(float_index(0.0, 255), 0);
        assert_eq!(float_index(1.0, 255), 254);
        assert_eq!(float_index(-0.1, 255), 0);
        assert_eq!(float_index(2.0, 255), 254);
        assert_eq!(float_index(f64::NAN, 255), 0);
    }
}
