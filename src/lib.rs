//! Procedural camouflage textures for sphere surfaces
//!
//! [`pattern::generate`] builds a square grid of colors from layered, blurred
//! and thresholded noise. [`geometry::sphere_surface`] builds the matching
//! latitude/longitude grid of points, and [`geometry::SurfaceGrid::colorize`]
//! pairs the two for a renderer.

pub mod blur;
pub mod color;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod pattern;

pub use color::{Color, camo_palette};
pub use error::{CamoError, Result};
pub use geometry::{ColoredVertex, SurfaceGrid, sphere_surface};
pub use pattern::{
    LayerParams, Pattern, PatternGenerator, PatternParams, generate, generate_with_rng,
};
