//! Built-in colormap data.
//!
//! The registry maps `namespace:name` data references from the built-in
//! records to concrete stop data: tables from the matlab, tableau, and
//! vispy collections, and gnuplot's palette formulae as gradient
//! functions.

use std::f64::consts::PI;

use crate::color::{ColorLike, HSVA};
use crate::stops::{ColormapLike, LutFn, StopLike};

use super::record::{AliasEntry, CatalogRecord, DataRef, ItemEntry, RecordEntry};

// ---------------------------------------------------------------------------
// matlab tables

const MATLAB_GRAY: &[[f64; 3]] = &[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
const MATLAB_AUTUMN: &[[f64; 3]] = &[[1.0, 0.0, 0.0], [1.0, 1.0, 0.0]];
const MATLAB_COOL: &[[f64; 3]] = &[[0.0, 1.0, 1.0], [1.0, 0.0, 1.0]];
const MATLAB_SPRING: &[[f64; 3]] = &[[1.0, 0.0, 1.0], [1.0, 1.0, 0.0]];
const MATLAB_SUMMER: &[[f64; 3]] = &[[0.0, 0.5, 0.4], [1.0, 1.0, 0.4]];
const MATLAB_WINTER: &[[f64; 3]] = &[[0.0, 0.0, 1.0], [0.0, 1.0, 0.5]];

#[rustfmt::skip]
const MATLAB_BONE: &[[f64; 5]] = &[
    [0.0, 0.0, 0.0, 0.0, 1.0],
    [0.365079, 0.31944412499999997, 0.319444, 0.444444, 1.0],
    [0.746032, 0.652778, 0.777778, 0.7777779500000788, 1.0],
    [1.0, 1.0, 1.0, 1.0, 1.0],
];

#[rustfmt::skip]
const MATLAB_COPPER: &[[f64; 5]] = &[
    [0.0, 0.0, 0.0, 0.0, 1.0],
    [0.809524, 1.0, 0.6324001488000001, 0.40273819, 1.0],
    [1.0, 1.0, 0.7812, 0.4975, 1.0],
];

#[rustfmt::skip]
const MATLAB_HOT: &[[f64; 5]] = &[
    [0.0, 0.0416, 0.0, 0.0, 1.0],
    [0.365079, 1.0, 0.0, 0.0, 1.0],
    [0.746032, 1.0, 1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0, 1.0, 1.0],
];

#[rustfmt::skip]
const MATLAB_HSV: &[[f64; 5]] = &[
    [0.0, 1.0, 0.0, 0.0, 1.0],
    [0.15873, 1.0, 0.9375, 0.0, 1.0],
    [0.174603, 0.96875, 1.0, 0.0, 1.0],
    [0.333333, 0.03125, 1.0, 0.0, 1.0],
    [0.349206, 0.0, 1.0, 0.0625, 1.0],
    [0.507937, 0.0, 1.0, 1.0, 1.0],
    [0.666667, 0.0, 0.0625, 1.0, 1.0],
    [0.68254, 0.03125, 0.0, 1.0, 1.0],
    [0.84127, 0.96875, 0.0, 1.0, 1.0],
    [0.857143, 1.0, 0.0, 0.9375, 1.0],
    [1.0, 1.0, 0.0, 0.09375, 1.0],
];

#[rustfmt::skip]
const MATLAB_JET: &[[f64; 5]] = &[
    [0.0, 0.0, 0.0, 0.5, 1.0],
    [0.11, 0.0, 0.0, 1.0, 1.0],
    [0.125, 0.0, 0.0, 1.0, 1.0],
    [0.34, 0.0, 0.86, 1.0, 1.0],
    [0.35, 0.0, 0.9, 0.9677419354838711, 1.0],
    [0.375, 0.08064516129032263, 1.0, 0.8870967741935485, 1.0],
    [0.64, 0.9354838709677419, 1.0, 0.032258064516129004, 1.0],
    [0.65, 0.9677419354838709, 0.9629629629629629, 0.0, 1.0],
    [0.66, 1.0, 0.9259259259259258, 0.0, 1.0],
    [0.89, 1.0, 0.07407407407407418, 0.0, 1.0],
    [0.91, 0.909090909090909, 0.0, 0.0, 1.0],
    [1.0, 0.5, 0.0, 0.0, 1.0],
];

// ---------------------------------------------------------------------------
// tableau palettes (qualitative; same values as Vega's category10/20)

#[rustfmt::skip]
const TABLEAU_10: &[[u8; 3]] = &[
    [ 31, 119, 180], [255, 127,  14], [ 44, 160,  44], [214,  39,  40],
    [148, 103, 189], [140,  86,  75], [227, 119, 194], [127, 127, 127],
    [188, 189,  34], [ 23, 190, 207],
];

#[rustfmt::skip]
const TABLEAU_20: &[[u8; 3]] = &[
    [ 31, 119, 180], [174, 199, 232], [255, 127,  14], [255, 187, 120],
    [ 44, 160,  44], [152, 223, 138], [214,  39,  40], [255, 152, 150],
    [148, 103, 189], [197, 176, 213], [140,  86,  75], [196, 156, 148],
    [227, 119, 194], [247, 182, 210], [127, 127, 127], [199, 199, 199],
    [188, 189,  34], [219, 219, 141], [ 23, 190, 207], [158, 218, 229],
];

#[rustfmt::skip]
const TABLEAU_COLORBLIND10: &[[u8; 3]] = &[
    [  0, 107, 164], [255, 128,   0], [171, 171, 171], [ 89,  89,  89],
    [ 95, 158, 209], [200,  82,   0], [137, 137, 137], [162, 200, 236],
    [255, 188, 121], [207, 207, 207],
];

// ---------------------------------------------------------------------------
// vispy tables

#[rustfmt::skip]
const VISPY_GRBU: &[[f64; 3]] = &[
    [0.27872962, 0.6301783, 0.35279453],
    [0.92, 0.92, 0.92],
    [0.3919671, 0.5555349, 0.88773626],
];

#[rustfmt::skip]
const VISPY_GRBU_D: &[[f64; 3]] = &[
    [0.27872962, 0.6301783, 0.35279453],
    [0.133, 0.133, 0.133],
    [0.3919671, 0.5555349, 0.88773626],
];

#[rustfmt::skip]
const VISPY_RDBU: &[[f64; 3]] = &[
    [0.75374883, 0.33251518, 0.22683573],
    [0.92, 0.92, 0.92],
    [0.24790125, 0.49360412, 0.56957495],
];

#[rustfmt::skip]
const VISPY_PUGR: &[[f64; 3]] = &[
    [0.3813749, 0.13527402, 0.6101997],
    [0.92, 0.92, 0.92],
    [0.09278259, 0.31200334, 0.20554015],
];

#[rustfmt::skip]
const VISPY_DIVERGING: &[[f64; 3]] = &[
    [0.43005887, 0.6724293, 0.9967565],
    [0.92, 0.92, 0.92],
    [0.99753714, 0.53117585, 0.43829587],
];

// hsv(200/360, 0.1, 1) -> hsv(200/360, 0.8, 1)
const VISPY_LIGHT_BLUES: &[[f64; 3]] = &[[0.9, 0.96666, 1.0], [0.2, 0.733333, 1.0]];
// hsv(35/360, 0.1, 1) -> hsv(35/360, 0.8, 1)
const VISPY_ORANGE: &[[f64; 3]] = &[[1.0, 0.9583333, 0.9], [1.0, 0.6666667, 0.2]];
const VISPY_ICE: &[[f64; 3]] = &[[0.0, 0.0, 1.0], [1.0, 1.0, 1.0]];

// red-yellow positive, blue-cyan negative, transparent in the middle
#[rustfmt::skip]
const VISPY_RDYEBUCY: &[[f64; 5]] = &[
    [0.0, 0.0, 1.0, 1.0, 1.0],
    [0.17, 0.0, 0.0, 1.0, 1.0],
    [0.335, 0.0, 0.0, 1.0, 0.0],
    [0.665, 1.0, 0.0, 0.0, 0.0],
    [0.88, 1.0, 0.0, 0.0, 1.0],
    [1.0, 1.0, 1.0, 0.0, 1.0],
];

// ---------------------------------------------------------------------------
// gnuplot palette formulae (show palette rgbformulae)

fn g2(_x: f64) -> f64 {
    1.0
}
fn g3(x: f64) -> f64 {
    x
}
fn g5(x: f64) -> f64 {
    x.powi(3)
}
fn g7(x: f64) -> f64 {
    x.sqrt()
}
fn g10(x: f64) -> f64 {
    (x * PI / 2.0).cos()
}
fn g13(x: f64) -> f64 {
    (x * PI).sin()
}
fn g15(x: f64) -> f64 {
    (x * 2.0 * PI).sin()
}
fn g21(x: f64) -> f64 {
    3.0 * x
}
fn g22(x: f64) -> f64 {
    3.0 * x - 1.0
}
fn g23(x: f64) -> f64 {
    3.0 * x - 2.0
}
fn g28(x: f64) -> f64 {
    ((3.0 * x - 1.0) / 2.0).abs()
}
fn g30(x: f64) -> f64 {
    x / 0.32 - 0.78125
}
fn g31(x: f64) -> f64 {
    2.0 * x - 0.84
}
fn g32(x: f64) -> f64 {
    if x < 0.25 {
        4.0 * x
    } else if x < 0.92 {
        -2.0 * x + 1.84
    } else {
        x / 0.08 - 11.5
    }
}
fn g33(x: f64) -> f64 {
    (2.0 * x - 0.5).abs()
}
fn g34(x: f64) -> f64 {
    2.0 * x
}
fn g35(x: f64) -> f64 {
    2.0 * x - 0.5
}
fn g36(x: f64) -> f64 {
    2.0 * x - 1.0
}

fn gnu_rgb(r: fn(f64) -> f64, g: fn(f64) -> f64, b: fn(f64) -> f64) -> ColormapLike {
    ColormapLike::Func(LutFn::new(move |x| [r(x), g(x), b(x), 1.0]))
}

fn gnu_hsv(h: fn(f64) -> f64, s: fn(f64) -> f64, v: fn(f64) -> f64) -> ColormapLike {
    ColormapLike::Func(LutFn::new(move |x| {
        let rgba = HSVA::new(h(x), s(x), v(x), 1.0).to_rgba();
        [rgba.r, rgba.g, rgba.b, rgba.a]
    }))
}

// ---------------------------------------------------------------------------
// function-backed matlab/vispy entries

fn matlab_flag() -> ColormapLike {
    ColormapLike::Func(LutFn::new(|x| {
        [
            0.75 * ((x * 31.5 + 0.25) * PI).sin() + 0.5,
            (x * 31.5 * PI).sin(),
            0.75 * ((x * 31.5 - 0.25) * PI).sin() + 0.5,
            1.0,
        ]
    }))
}

fn matlab_prism() -> ColormapLike {
    ColormapLike::Func(LutFn::new(|x| {
        [
            0.75 * ((x * 20.9 + 0.25) * PI).sin() + 0.67,
            0.75 * ((x * 20.9 - 0.25) * PI).sin() + 0.33,
            -1.1 * (x * 20.9 * PI).sin(),
            1.0,
        ]
    }))
}

fn vispy_fire() -> ColormapLike {
    const WHITE: [f64; 3] = [1.0, 1.0, 1.0];
    const YELLOW: [f64; 3] = [1.0, 1.0, 0.0];
    const RED: [f64; 3] = [1.0, 0.0, 0.0];
    ColormapLike::Func(LutFn::new(|x| {
        let mut rgba = [0.0, 0.0, 0.0, 1.0];
        for c in 0..3 {
            let start = (1.0 - x) * WHITE[c] + x * YELLOW[c];
            let end = (1.0 - x) * YELLOW[c] + x * RED[c];
            rgba[c] = (1.0 - x) * start + x * end;
        }
        rgba
    }))
}

// ---------------------------------------------------------------------------
// registry

fn rgb_rows(rows: &[[f64; 3]]) -> ColormapLike {
    ColormapLike::Items(
        rows.iter()
            .map(|r| StopLike::Color(ColorLike::Floats(r.to_vec())))
            .collect(),
    )
}

fn rgb8_rows(rows: &[[u8; 3]]) -> ColormapLike {
    ColormapLike::Items(
        rows.iter()
            .map(|&[r, g, b]| StopLike::Color(ColorLike::Rgba8(r, g, b, 1.0)))
            .collect(),
    )
}

fn stop_rows(rows: &[[f64; 5]]) -> ColormapLike {
    ColormapLike::Items(rows.iter().map(|&row| StopLike::Raw(row)).collect())
}

/// Resolve a `namespace:name` data reference to concrete stop data.
pub(crate) fn lookup(reference: &str) -> Option<ColormapLike> {
    let like = match reference {
        "matlab:gray" => rgb_rows(MATLAB_GRAY),
        "matlab:autumn" => rgb_rows(MATLAB_AUTUMN),
        "matlab:cool" => rgb_rows(MATLAB_COOL),
        "matlab:spring" => rgb_rows(MATLAB_SPRING),
        "matlab:summer" => rgb_rows(MATLAB_SUMMER),
        "matlab:winter" => rgb_rows(MATLAB_WINTER),
        "matlab:bone" => stop_rows(MATLAB_BONE),
        "matlab:copper" => stop_rows(MATLAB_COPPER),
        "matlab:hot" => stop_rows(MATLAB_HOT),
        "matlab:hsv" => stop_rows(MATLAB_HSV),
        "matlab:jet" => stop_rows(MATLAB_JET),
        "matlab:flag" => matlab_flag(),
        "matlab:prism" => matlab_prism(),
        "gnuplot:gnuplot" => gnu_rgb(g7, g5, g15),
        "gnuplot:gnuplot2" => gnu_rgb(g30, g31, g32),
        "gnuplot:ocean" => gnu_rgb(g23, g28, g3),
        "gnuplot:hot" => gnu_rgb(g21, g22, g23),
        "gnuplot:rainbow" => gnu_rgb(g33, g13, g10),
        "gnuplot:afmhot" => gnu_rgb(g34, g35, g36),
        "gnuplot:hsv" => gnu_hsv(g3, g2, g2),
        "tableau:tab10" => rgb8_rows(TABLEAU_10),
        "tableau:tab20" => rgb8_rows(TABLEAU_20),
        "tableau:colorblind10" => rgb8_rows(TABLEAU_COLORBLIND10),
        "vispy:grbu" => rgb_rows(VISPY_GRBU),
        "vispy:grbu_d" => rgb_rows(VISPY_GRBU_D),
        "vispy:rdbu" => rgb_rows(VISPY_RDBU),
        "vispy:pugr" => rgb_rows(VISPY_PUGR),
        "vispy:diverging" => rgb_rows(VISPY_DIVERGING),
        "vispy:light_blues" => rgb_rows(VISPY_LIGHT_BLUES),
        "vispy:orange" => rgb_rows(VISPY_ORANGE),
        "vispy:ice" => rgb_rows(VISPY_ICE),
        "vispy:rdyebucy" => stop_rows(VISPY_RDYEBUCY),
        "vispy:fire" => vispy_fire(),
        _ => return None,
    };
    Some(like)
}

fn item(reference: &str, category: &str) -> RecordEntry {
    RecordEntry::Item(ItemEntry {
        data: DataRef::Reference(reference.to_string()),
        category: Some(category.to_string()),
        tags: Vec::new(),
        interpolation: None,
        info: String::new(),
        aliases: Vec::new(),
        license: None,
        source: None,
        authors: None,
    })
}

fn nearest_item(reference: &str, category: &str) -> RecordEntry {
    match item(reference, category) {
        RecordEntry::Item(mut entry) => {
            entry.interpolation = Some(crate::stops::Interpolation::Nearest);
            RecordEntry::Item(entry)
        }
        alias => alias,
    }
}

fn alias(target: &str) -> RecordEntry {
    RecordEntry::Alias(AliasEntry {
        alias: target.to_string(),
        conflicts: Vec::new(),
    })
}

/// The records behind [`Catalog::builtin`](super::Catalog::builtin).
///
/// Record order is registration order: the first namespace providing a
/// short name wins it, later ones are recorded as conflicts.
pub fn builtin_records() -> Vec<CatalogRecord> {
    let matlab = CatalogRecord {
        namespace: "matlab".to_string(),
        license: Some("PSF".to_string()),
        source: Some("https://www.mathworks.com/help/matlab/colormaps.html".to_string()),
        authors: None,
        category: Some("sequential".to_string()),
        colormaps: [
            ("gray", {
                match item("matlab:gray", "sequential") {
                    RecordEntry::Item(mut entry) => {
                        entry.aliases = vec!["grey".to_string()];
                        RecordEntry::Item(entry)
                    }
                    other => other,
                }
            }),
            ("autumn", item("matlab:autumn", "sequential")),
            ("bone", item("matlab:bone", "sequential")),
            ("cool", item("matlab:cool", "sequential")),
            ("copper", item("matlab:copper", "sequential")),
            ("hot", item("matlab:hot", "sequential")),
            ("spring", item("matlab:spring", "sequential")),
            ("summer", item("matlab:summer", "sequential")),
            ("winter", item("matlab:winter", "sequential")),
            ("hsv", item("matlab:hsv", "cyclic")),
            ("jet", item("matlab:jet", "miscellaneous")),
            ("flag", item("matlab:flag", "miscellaneous")),
            ("prism", item("matlab:prism", "miscellaneous")),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect(),
    };

    let gnuplot = CatalogRecord {
        namespace: "gnuplot".to_string(),
        license: Some("gnuplot".to_string()),
        source: Some("https://gnuplot.sourceforge.net".to_string()),
        authors: Some(vec![
            "Thomas Williams".to_string(),
            "Colin Kelley".to_string(),
        ]),
        category: Some("miscellaneous".to_string()),
        colormaps: [
            ("gnuplot", item("gnuplot:gnuplot", "miscellaneous")),
            ("gnuplot2", item("gnuplot:gnuplot2", "miscellaneous")),
            ("ocean", item("gnuplot:ocean", "sequential")),
            ("hot", item("gnuplot:hot", "sequential")),
            ("rainbow", item("gnuplot:rainbow", "miscellaneous")),
            ("afmhot", item("gnuplot:afmhot", "sequential")),
            ("hsv", item("gnuplot:hsv", "cyclic")),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect(),
    };

    let tableau = CatalogRecord {
        namespace: "tableau".to_string(),
        license: None,
        source: Some(
            "https://public.tableau.com/views/TableauColors/ColorPaletteswithRGBValues"
                .to_string(),
        ),
        authors: None,
        category: Some("qualitative".to_string()),
        colormaps: [
            ("tab10", nearest_item("tableau:tab10", "qualitative")),
            ("tab20", nearest_item("tableau:tab20", "qualitative")),
            (
                "tab10_colorblind",
                nearest_item("tableau:colorblind10", "qualitative"),
            ),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect(),
    };

    let vispy = CatalogRecord {
        namespace: "vispy".to_string(),
        license: Some("BSD-3-Clause".to_string()),
        source: Some("https://github.com/vispy/vispy".to_string()),
        authors: None,
        category: Some("diverging".to_string()),
        colormaps: [
            ("grbu", item("vispy:grbu", "diverging")),
            ("grbu_d", item("vispy:grbu_d", "diverging")),
            ("rdbu", item("vispy:rdbu", "diverging")),
            ("pugr", item("vispy:pugr", "diverging")),
            ("diverging", item("vispy:diverging", "diverging")),
            ("light_blues", item("vispy:light_blues", "sequential")),
            ("orange", item("vispy:orange", "sequential")),
            ("ice", item("vispy:ice", "sequential")),
            ("rdyebucy", item("vispy:rdyebucy", "diverging")),
            ("fire", item("vispy:fire", "sequential")),
            ("single_hue", alias("vispy:light_blues")),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect(),
    };

    vec![matlab, gnuplot, tableau, vispy]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stops::ColorStops;

    #[test]
    fn test_every_reference_resolves_and_parses() {
        for record in builtin_records() {
            for (name, entry) in &record.colormaps {
                let reference = match entry {
                    RecordEntry::Item(item) => match &item.data {
                        DataRef::Reference(r) => r.clone(),
                        DataRef::Inline(_) => continue,
                    },
                    RecordEntry::Alias(_) => continue,
                };
                let like = lookup(&reference)
                    .unwrap_or_else(|| panic!("missing data for {}", reference));
                let stops = ColorStops::parse(like)
                    .unwrap_or_else(|e| panic!("bad data for {}: {}", name, e));
                assert!(stops.len() >= 2, "{} has too few stops", name);
            }
        }
    }

    #[test]
    fn test_unknown_reference() {
        assert!(lookup("matlab:nope").is_none());
    }

    #[test]
    fn test_gnuplot_hot_starts_black_ends_white() {
        let stops = ColorStops::parse(lookup("gnuplot:hot").unwrap()).unwrap();
        let lut = stops.to_lut(3, 1.0).unwrap();
        assert_eq!(lut.row(0).to_vec(), vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(lut.row(2).to_vec(), vec![1.0, 1.0, 1.0, 1.0]);
    }
}
