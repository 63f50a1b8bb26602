mod cli;

use anyhow::Result;
use camo_maker::{Color, PatternGenerator, PatternParams, camo_palette, sphere_surface};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

const DEFAULT_LOG_DIRECTIVE: &str = "camo_maker=info";

fn main() -> Result<()> {
    let args = cli::parse();

    let directive = args.log_level.as_deref().unwrap_or(DEFAULT_LOG_DIRECTIVE);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse::<Directive>()?))
        .init();

    println!("Camo Maker - layered noise camouflage");

    let params = PatternParams {
        resolution: args.resolution,
        ..PatternParams::default()
    };

    tracing::info!(
        "Generating {}x{} pattern with {} colors (seed {})",
        params.resolution,
        params.resolution,
        params.palette.len(),
        args.seed
    );
    let mut generator = PatternGenerator::new(params, args.seed);
    let pattern = generator.generate()?;

    let surface = sphere_surface(args.radius, args.resolution)?;
    let vertices = surface.colorize(&pattern)?;
    let (min, max) = surface.bounds();

    println!("Sphere radius {} with {} colored vertices", args.radius, vertices.len());
    println!(
        "Bounds: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
        min.x, min.y, min.z, max.x, max.y, max.z
    );

    println!("Color coverage:");
    let total = vertices.len() as f64;
    for (color, count) in pattern.coverage() {
        println!(
            "  {:<13} {:>6} cells ({:5.1}%)",
            color_name(color),
            count,
            100.0 * count as f64 / total
        );
    }

    Ok(())
}

fn color_name(color: Color) -> String {
    let names = ["dark green", "forest green", "navy", "saddle brown", "olive"];
    camo_palette()
        .iter()
        .zip(names)
        .find(|(c, _)| **c == color)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| format!("{:?}", color.channels()))
}
