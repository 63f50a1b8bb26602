use glam::DVec3;
use std::f64::consts::PI;

use crate::color::Color;
use crate::error::{CamoError, Result};
use crate::grid::Grid;
use crate::pattern::Pattern;

/// A surface point paired with the color painted on it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColoredVertex {
    pub position: DVec3,
    pub color: Color,
}

/// Square grid of points on a parametric surface
///
/// Columns sweep the polar angle and rows sweep the azimuth, so cell `(x, y)`
/// lines up with cell `(x, y)` of a [`Pattern`] of the same resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceGrid {
    points: Grid<DVec3>,
}

impl SurfaceGrid {
    pub fn resolution(&self) -> usize {
        self.points.width()
    }

    pub fn get(&self, x: usize, y: usize) -> Option<DVec3> {
        self.points.get(x, y)
    }

    pub fn points(&self) -> &[DVec3] {
        self.points.cells()
    }

    /// Axis-aligned bounds as `(min, max)`
    pub fn bounds(&self) -> (DVec3, DVec3) {
        self.points().iter().fold(
            (DVec3::splat(f64::INFINITY), DVec3::splat(f64::NEG_INFINITY)),
            |(min, max), &p| (min.min(p), max.max(p)),
        )
    }

    /// Pair every point with the pattern color at the same index
    pub fn colorize(&self, pattern: &Pattern) -> Result<Vec<ColoredVertex>> {
        if pattern.resolution() != self.resolution() {
            return Err(CamoError::ShapeMismatch {
                expected: self.resolution(),
                width: pattern.resolution(),
                height: pattern.resolution(),
            });
        }

        Ok(self
            .points()
            .iter()
            .zip(pattern.cells())
            .map(|(&position, &color)| ColoredVertex { position, color })
            .collect())
    }
}

/// `n` evenly spaced samples from `start` to `end` inclusive
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![start];
    }
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// Sample a sphere of `radius` on a `resolution` x `resolution` angle grid
pub fn sphere_surface(radius: f64, resolution: usize) -> Result<SurfaceGrid> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(CamoError::InvalidRadius(radius));
    }
    if resolution == 0 {
        return Err(CamoError::InvalidResolution(resolution));
    }

    let phi = linspace(0.0, PI, resolution);
    let theta = linspace(0.0, 2.0 * PI, resolution);

    let points = Grid::from_fn(resolution, resolution, |x, y| {
        let (sin_phi, cos_phi) = phi[x].sin_cos();
        let (sin_theta, cos_theta) = theta[y].sin_cos();
        DVec3::new(
            radius * sin_phi * cos_theta,
            radius * sin_phi * sin_theta,
            radius * cos_phi,
        )
    });

    Ok(SurfaceGrid { points })
}
