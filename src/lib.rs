//! # chromap
//!
//! Colormaps and color data: gradient stops, gamma-corrected LUTs, and a
//! namespaced colormap catalog.
//!
//! This library builds deterministic, continuous mappings from scalar
//! values in 0-1 to RGBA colors by interpolating lookup tables between
//! named color stops.
//!
//! ## Key Features
//!
//! - **Flexible color parsing**: named colors, hex, `rgb()`/`hsl()`
//!   strings, numeric components, and packed integers
//! - **Color stop engine**: gap-filling heuristics, gamma-corrected
//!   piecewise-linear or nearest-neighbor LUT sampling, reversal
//! - **Colormap facade**: memoized LUTs with matplotlib-compatible scalar
//!   and array evaluation
//! - **Namespaced catalog**: record documents merged into one resolvable
//!   name space, with alias chains and conflict warnings
//!
//! ## Architecture
//!
//! - **Color layer**: immutable [`Color`] value type and conversions
//! - **Stops layer**: [`ColorStops`] normalization and LUT generation
//! - **Catalog layer**: lazy, memoized name resolution over record files

pub mod catalog;
pub mod color;
pub mod colormap;
pub mod error;
pub mod logging;
pub mod stops;

pub use catalog::{Catalog, CatalogItem, CatalogRecord};
pub use color::{Color, ColorLike, HSLA, HSVA, RGBA, RGBA8};
pub use colormap::{Colormap, DEFAULT_LUT_SIZE};
pub use error::{ChromapError, Result};
pub use logging::{init_tracing, log_timed_operation};
pub use stops::{
    ColorStop, ColorStops, ColormapLike, CssOptions, FillMode, Interpolation, StopLike,
};
