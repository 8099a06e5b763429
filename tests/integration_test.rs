//! Integration tests for chromap.
//!
//! These tests exercise the public surface end-to-end: color parsing,
//! stop filling, LUT evaluation, reversal, and catalog resolution.

mod common;

use pretty_assertions::assert_eq;

use chromap::{
    Catalog, ChromapError, Color, ColorStops, Colormap, CssOptions, FillMode, Interpolation,
    StopLike, RGBA8,
};

#[test]
fn test_colormap_evaluates_stops_exactly() {
    let cmap = Colormap::new(["red", "magenta", "blue"]).unwrap();
    assert_eq!(cmap.sample(0.0).unwrap(), Color::new("red").unwrap());
    assert_eq!(cmap.sample(0.5).unwrap(), Color::new("magenta").unwrap());
    assert_eq!(cmap.sample(1.0).unwrap(), Color::new("blue").unwrap());
}

#[test]
fn test_unanchored_stops_pad_then_interpolate() {
    let cmap = Colormap::new(vec![(0.2, "red"), (0.8, "blue")]).unwrap();
    let lut = cmap.lut(3, 1.0).unwrap();
    assert_eq!(lut.row(0).to_vec(), vec![1.0, 0.0, 0.0, 1.0]);
    // midpoint comes from the padding-then-interpolate algorithm
    assert_eq!(lut.row(1).to_vec(), vec![0.5, 0.0, 0.5, 1.0]);
    assert_eq!(lut.row(2).to_vec(), vec![0.0, 0.0, 1.0, 1.0]);
}

#[test]
fn test_percentage_channels_clamp_independently() {
    let color = Color::new("rgb(100%, 200%, 300%)").unwrap();
    assert_eq!(color.rgba8(), RGBA8::new(255, 255, 255, 1.0));
}

#[test]
fn test_hex_with_0x_prefix_and_alpha() {
    let color = Color::new("0x4169E133").unwrap();
    let rgba8 = color.rgba8();
    assert_eq!((rgba8.r, rgba8.g, rgba8.b), (65, 105, 225));
    assert!((color.alpha() - 0.2).abs() < 0.002);
}

#[test]
fn test_fill_modes_end_to_end() {
    let items: Vec<StopLike> = vec!["r".into(), "y".into(), (0.8, "g").into(), "b".into()];
    let stops = ColorStops::parse(items.clone()).unwrap();
    assert_eq!(stops.stops(), vec![0.0, 0.4, 0.8, 1.0]);

    let stops = ColorStops::parse_with_fill(items, FillMode::Fractional).unwrap();
    assert_eq!(stops.stops(), vec![0.0, 1.0 / 3.0, 0.8, 1.0]);
}

#[test]
fn test_8bit_round_trips() {
    // sampled grid of 8-bit values, round-tripped through every model
    for r in (0u16..=255).step_by(17) {
        for g in (0u16..=255).step_by(51) {
            for b in (0u16..=255).step_by(85) {
                let rgba = RGBA8::new(r as u8, g as u8, b as u8, 1.0);
                assert_eq!(rgba.to_float().to_8bit(), rgba);

                let via_hsl = rgba.to_hsl().to_rgba().to_8bit();
                let via_hsv = rgba.to_hsv().to_rgba().to_8bit();
                for (got, want) in [
                    (via_hsl.r, rgba.r),
                    (via_hsl.g, rgba.g),
                    (via_hsl.b, rgba.b),
                    (via_hsv.r, rgba.r),
                    (via_hsv.g, rgba.g),
                    (via_hsv.b, rgba.b),
                ] {
                    assert!(
                        (got as i16 - want as i16).abs() <= 1,
                        "{:?} drifted more than one step",
                        rgba
                    );
                }
            }
        }
    }
}

#[test]
fn test_hex_idempotence() {
    for (r, g, b, a) in [
        (0u8, 0u8, 0u8, 1.0),
        (255, 0, 0, 1.0),
        (65, 105, 225, 1.0),
        (59, 84, 226, 153.0 / 255.0),
        (1, 2, 3, 0.0),
    ] {
        let color = Color::new((r, g, b, a)).unwrap();
        let reparsed = Color::new(color.hex().as_str()).unwrap();
        assert_eq!(reparsed, color, "hex {} did not round-trip", color.hex());
    }
}

#[test]
fn test_name_normalization_matches() {
    assert_eq!(
        Color::new("Royal Blue").unwrap(),
        Color::new("royalblue").unwrap()
    );
    assert_eq!(Color::new("ROYAL-BLUE").unwrap(), Color::new("royalblue").unwrap());
}

#[test]
fn test_catalog_short_and_qualified_names_agree() {
    let jet = Colormap::new("jet").unwrap();
    let qualified = Colormap::new("matlab:jet").unwrap();
    assert_eq!(jet, qualified);

    assert!(matches!(
        Catalog::builtin().resolve("no-such-map"),
        Err(ChromapError::NotFound { .. })
    ));
}

#[test]
fn test_catalog_reversal_suffix() {
    let jet = Colormap::new("jet").unwrap();
    let jet_r = Colormap::new("jet_r").unwrap();
    assert_eq!(jet_r.sample(0.0).unwrap(), jet.sample(1.0).unwrap());
    assert_eq!(jet_r.sample(1.0).unwrap(), jet.sample(0.0).unwrap());
    assert_eq!(jet_r.reversed().name(), "jet");
}

#[test]
fn test_reversal_involution_for_function_backed_maps() {
    // flag is backed by a generating function, not a stop table
    let flag = Colormap::new("flag").unwrap();
    assert_eq!(flag.reversed().reversed(), flag);

    let rmb = Colormap::new(["red", "magenta", "blue"]).unwrap();
    assert_eq!(rmb.reversed().reversed(), rmb);
}

#[test]
fn test_nearest_colormap_css_uses_double_stops() {
    let tab10 = Colormap::new("tab10").unwrap();
    assert_eq!(tab10.interpolation(), Interpolation::Nearest);
    let css = tab10.to_css(&CssOptions {
        as_hex: true,
        ..Default::default()
    });
    // every color appears twice to create hard edges
    assert_eq!(css.matches("#1F77B4").count(), 2);
    assert!(css.starts_with("background: linear-gradient(90deg, #1F77B4 0%,"));
}

#[test]
fn test_catalog_from_record_directory() {
    let dir = tempfile::tempdir().unwrap();
    common::write_demo_records(dir.path());

    let catalog = Catalog::load_dir(dir.path(), "record.json").unwrap();
    let fade = catalog.get("demo:fade").unwrap();
    assert_eq!(fade.info, "black to white");
    assert_eq!(fade.license, "MIT");

    // the alias chain resolves to the concrete entry
    let via_alias = catalog.get("demo:faded").unwrap();
    assert_eq!(via_alias.qualified_name(), "demo:fade");

    // "fade" is provided by both namespaces: the first registrant wins,
    // and unique_keys falls back to qualified names for it
    let first = catalog.get("fade").unwrap();
    assert_eq!(first.namespace, "demo");
    let unique = catalog.unique_keys(true, false, &[], None);
    assert!(!unique.contains("fade"));
    assert!(unique.contains("demo:fade"));
    assert!(unique.contains("other:fade"));
    assert!(unique.contains("steps"));

    // per-entry interpolation override survives loading
    let steps = catalog.get("steps").unwrap();
    assert_eq!(steps.interpolation, Interpolation::Nearest);
}

#[test]
fn test_concurrent_lut_population_is_consistent() {
    let cmap = Colormap::new("jet").unwrap();
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| cmap.lut(256, 1.0).unwrap()))
            .collect();
        let luts: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for lut in &luts[1..] {
            assert_eq!(lut.as_ref(), luts[0].as_ref());
        }
    });
}

#[test]
fn test_gamma_and_bytes_evaluation() {
    let cmap = Colormap::new(["black", "white"]).unwrap();
    let lut = cmap.lut(3, 2.0).unwrap();
    // gamma bends sampling density toward the start
    assert!((lut[(1, 0)] - 0.25).abs() < 1e-12);

    let bytes = cmap.map_bytes(&[0.0, 1.0]).unwrap();
    assert_eq!(bytes.row(0).to_vec(), vec![0, 0, 0, 255]);
    assert_eq!(bytes.row(1).to_vec(), vec![255, 255, 255, 255]);
}

#[test]
fn test_colormap_serde_round_trip() {
    let cmap = Colormap::new("jet").unwrap();
    let json = serde_json::to_string(&cmap).unwrap();
    let back: Colormap = serde_json::from_str(&json).unwrap();
    assert_eq!(back, cmap);
    assert_eq!(back.name(), cmap.name());
}
