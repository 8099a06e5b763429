//! swatch - inspect chromap colormaps from the command line.
//!
//! Resolves a colormap name (or parses a color list), prints its catalog
//! metadata, and renders the gradient as an ANSI swatch, a CSS gradient,
//! or a list of hex samples.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use chromap::{Catalog, Colormap, CssOptions};

#[derive(Parser, Debug)]
#[command(name = "swatch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Colormap name (e.g. "jet", "gnuplot:hot", "viridis_r") or a
    /// comma-separated list of colors (e.g. "red,magenta,blue")
    name: String,

    /// Output format
    #[arg(short, long, env = "CHROMAP_FORMAT", value_enum, default_value = "ansi")]
    format: Format,

    /// Number of samples for ansi/hex output
    #[arg(short = 'n', long, env = "CHROMAP_SAMPLES", default_value = "64")]
    samples: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CHROMAP_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Colored terminal swatch
    Ansi,
    /// CSS background property
    Css,
    /// Hex samples, one per line
    Hex,
}

fn main() -> Result<()> {
    let args = Args::parse();
    chromap::init_tracing(&args.log_level);

    let cmap = build_colormap(&args.name)
        .with_context(|| format!("could not build colormap from {:?}", args.name))?;

    print_metadata(&args.name);

    match args.format {
        Format::Ansi => {
            let mut line = String::new();
            for color in cmap.iter_colors(args.samples)? {
                let rgba8 = color.rgba8();
                line.push_str(&format!(
                    "\x1b[48;2;{};{};{}m \x1b[0m",
                    rgba8.r, rgba8.g, rgba8.b
                ));
            }
            println!("{}", line);
        }
        Format::Css => {
            println!("{}", cmap.to_css(&CssOptions::default()));
        }
        Format::Hex => {
            for color in cmap.iter_colors(args.samples)? {
                println!("{}", color.hex());
            }
        }
    }

    Ok(())
}

/// A comma-separated argument is a color list; anything else is a name.
fn build_colormap(name: &str) -> chromap::Result<Colormap> {
    if name.contains(',') {
        let colors: Vec<&str> = name.split(',').map(str::trim).collect();
        Colormap::new(colors)
    } else {
        Colormap::new(name)
    }
}

fn print_metadata(name: &str) {
    let catalog = Catalog::builtin();
    let base = name.strip_suffix("_r").unwrap_or(name);
    if let Ok(item) = catalog.get(base) {
        println!("{}", item.qualified_name());
        if let Some(category) = &item.category {
            println!("  category: {}", category);
        }
        println!("  interpolation: {}", item.interpolation);
        println!("  license: {}", item.license);
        if !item.source.is_empty() {
            println!("  source: {}", item.source);
        }
        if !item.aliases.is_empty() {
            println!("  aliases: {}", item.aliases.join(", "));
        }
    }
}
