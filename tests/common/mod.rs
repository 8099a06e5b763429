//! Common test utilities for chromap.
//!
//! Provides record-document fixtures for catalog integration tests.

use std::fs;
use std::path::Path;

/// A small record document with one inline gradient and one alias.
pub const DEMO_RECORD: &str = r#"{
    "namespace": "demo",
    "license": "MIT",
    "category": "sequential",
    "colormaps": {
        "fade": {
            "data": [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]],
            "info": "black to white"
        },
        "faded": {"alias": "demo:fade"},
        "steps": {
            "data": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            "category": "qualitative",
            "interpolation": "nearest"
        }
    }
}"#;

/// A second namespace that reuses the short name "fade".
pub const OTHER_RECORD: &str = r#"{
    "namespace": "other",
    "colormaps": {
        "fade": {
            "data": [[1.0, 1.0, 1.0], [0.0, 0.0, 0.0]],
            "category": "sequential"
        }
    }
}"#;

/// Write the demo records into `root`, one per namespace directory.
pub fn write_demo_records(root: &Path) {
    let demo = root.join("demo");
    fs::create_dir_all(&demo).unwrap();
    fs::write(demo.join("record.json"), DEMO_RECORD).unwrap();

    let other = root.join("other");
    fs::create_dir_all(&other).unwrap();
    fs::write(other.join("record.json"), OTHER_RECORD).unwrap();
}
