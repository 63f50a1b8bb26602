use clap::Parser;

/// Generate a camouflage pattern and paint it onto a sphere
#[derive(Parser, Debug)]
#[command(name = "camo-maker", version, about)]
pub struct Args {
    /// Number of samples along each side of the pattern and sphere grid
    #[arg(short, long, default_value_t = 100)]
    pub resolution: usize,

    /// Seed for the noise layers
    #[arg(short, long, default_value_t = 42)]
    pub seed: u64,

    /// Sphere radius
    #[arg(long, default_value_t = 2.0)]
    pub radius: f64,

    /// Log filter override, e.g. "camo_maker=debug"
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
