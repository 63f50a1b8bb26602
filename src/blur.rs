use crate::grid::{Grid, NoiseField};

/// Settings for the Gaussian smoothing pass
#[derive(Debug, Clone, Copy)]
pub struct BlurOptions {
    /// Kernel half-width in standard deviations
    pub truncate: f64,
}

impl Default for BlurOptions {
    fn default() -> Self {
        BlurOptions { truncate: 4.0 }
    }
}

/// Build a normalized 1D Gaussian kernel
///
/// The kernel has `2 * radius + 1` taps where `radius = floor(truncate * sigma + 0.5)`.
pub fn gaussian_kernel(sigma: f64, truncate: f64) -> Vec<f64> {
    let radius = (truncate * sigma + 0.5) as isize;
    let denom = -0.5 / (sigma * sigma);

    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|x| (denom * (x * x) as f64).exp())
        .collect();

    let sum: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }

    kernel
}

/// Map an index outside `0..len` back inside by mirroring about the edges
///
/// The edge sample is repeated (`d c b a | a b c d | d c b a`), and indices
/// more than one length away keep reflecting.
pub fn reflect_index(i: isize, len: usize) -> usize {
    let period = 2 * len as isize;
    let m = i.rem_euclid(period);
    if m < len as isize {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

/// Smooth a field with a separable Gaussian blur
///
/// * `grid` - The field to smooth
/// * `sigma` - Standard deviation of the kernel in cells
/// * `options` - Optional blur settings
///
/// Returns a new field with the same shape. Columns are filtered first,
/// then rows. A non-positive sigma returns the field unchanged.
pub fn gaussian_filter(grid: &NoiseField, sigma: f64, options: Option<BlurOptions>) -> NoiseField {
    let options = options.unwrap_or_default();

    if grid.is_empty() || sigma.is_nan() || sigma <= 0.0 {
        return grid.clone();
    }

    let kernel = gaussian_kernel(sigma, options.truncate);
    let radius = (kernel.len() / 2) as isize;
    let width = grid.width();
    let height = grid.height();

    // Filter down each column
    let vertical = Grid::from_fn(width, height, |x, y| {
        kernel
            .iter()
            .enumerate()
            .map(|(k, w)| {
                // Mirror taps that fall off the top or bottom edge
                let sy = reflect_index(y as isize + k as isize - radius, height);
                w * grid.get(x, sy).unwrap_or(0.0)
            })
            .sum::<f64>()
    });

    // Then across each row of the column-filtered field
    Grid::from_fn(width, height, |x, y| {
        kernel
            .iter()
            .enumerate()
            .map(|(k, w)| {
                let sx = reflect_index(x as isize + k as isize - radius, width);
                w * vertical.get(sx, y).unwrap_or(0.0)
            })
            .sum::<f64>()
    })
}
