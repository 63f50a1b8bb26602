//! Multi-layer blob pattern synthesis
//!
//! Each palette color gets its own layer: a high-frequency noise field and a
//! blocky low-frequency field are smoothed, mixed and thresholded into a mask.
//! Masks are composited onto a shared canvas in palette order, so later colors
//! overwrite earlier ones, and any cell left unclaimed takes the fallback color.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::blur::gaussian_filter;
use crate::color::{Color, camo_palette};
use crate::error::{CamoError, Result};
use crate::grid::{Grid, Mask, NoiseField};

/// Constants shaping each noise layer
#[derive(Debug, Clone, PartialEq)]
pub struct LayerParams {
    /// Blur sigma of the high-frequency field for the first palette entry
    pub high_sigma_base: f64,
    /// Added to the high-frequency sigma for every later palette entry
    pub high_sigma_step: f64,
    /// Blur sigma of the low-frequency field
    pub low_sigma: f64,
    pub high_weight: f64,
    pub low_weight: f64,
    /// Mask threshold for the first palette entry
    pub threshold_base: f64,
    /// Added to the threshold for every later palette entry
    pub threshold_step: f64,
    /// Side of the square block each low-frequency sample expands into
    pub block_size: usize,
}

impl Default for LayerParams {
    fn default() -> Self {
        LayerParams {
            high_sigma_base: 2.0,
            high_sigma_step: 1.0,
            low_sigma: 3.0,
            high_weight: 0.6,
            low_weight: 0.4,
            threshold_base: 0.65,
            threshold_step: 0.05,
            block_size: 4,
        }
    }
}

impl LayerParams {
    pub fn high_sigma(&self, index: usize) -> f64 {
        self.high_sigma_base + self.high_sigma_step * index as f64
    }

    pub fn threshold(&self, index: usize) -> f64 {
        self.threshold_base + self.threshold_step * index as f64
    }
}

/// Everything needed to generate one pattern
#[derive(Debug, Clone, PartialEq)]
pub struct PatternParams {
    /// Side length of the square pattern
    pub resolution: usize,
    /// Colors in compositing order; later entries win overlaps
    pub palette: Vec<Color>,
    /// Color of cells no mask claims
    pub fallback: Color,
    pub layers: LayerParams,
}

impl Default for PatternParams {
    fn default() -> Self {
        PatternParams {
            resolution: 50,
            palette: camo_palette(),
            fallback: Color::OLIVE,
            layers: LayerParams::default(),
        }
    }
}

impl PatternParams {
    pub fn new(resolution: usize, palette: Vec<Color>, fallback: Color) -> Self {
        PatternParams {
            resolution,
            palette,
            fallback,
            layers: LayerParams::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.resolution == 0 {
            return Err(CamoError::InvalidResolution(self.resolution));
        }
        if self.palette.is_empty() {
            return Err(CamoError::EmptyPalette);
        }
        Ok(())
    }
}

/// A square grid of colors, one per surface point
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    colors: Grid<Color>,
}

impl Pattern {
    pub fn resolution(&self) -> usize {
        self.colors.width()
    }

    /// Shape as `(rows, columns, channels)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.colors.height(), self.colors.width(), 3)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        self.colors.get(x, y)
    }

    /// Row-major colors
    pub fn cells(&self) -> &[Color] {
        self.colors.cells()
    }

    /// Raw channel bytes, row-major, three `f64` per cell
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.colors.cells())
    }

    /// Number of cells per distinct color, in order of first appearance
    pub fn coverage(&self) -> Vec<(Color, usize)> {
        let mut counts: Vec<(Color, usize)> = Vec::new();
        for &color in self.cells() {
            match counts.iter_mut().find(|(c, _)| *c == color) {
                Some((_, n)) => *n += 1,
                None => counts.push((color, 1)),
            }
        }
        counts
    }
}

/// Draw and mix the noise fields for palette entry `index`
///
/// Consumes `resolution²` samples for the high-frequency field followed by
/// `(resolution / block)²` samples for the low-frequency field. When the
/// low-frequency grid is empty no samples are drawn for it and it contributes
/// zero everywhere.
pub fn combined_layer<R: Rng + ?Sized>(
    resolution: usize,
    layers: &LayerParams,
    index: usize,
    rng: &mut R,
) -> NoiseField {
    // Fine detail, one sample per cell
    let high = NoiseField::uniform(resolution, resolution, rng);

    // Coarse detail, expanded back to full size as square blocks
    let low_size = resolution.checked_div(layers.block_size).unwrap_or(0);
    let low = NoiseField::uniform(low_size, low_size, rng);
    let low = low.block_replicate(layers.block_size, resolution, resolution);

    // Later palette entries get wider blobs
    let high = gaussian_filter(&high, layers.high_sigma(index), None);
    let low = if low_size == 0 {
        low
    } else {
        gaussian_filter(&low, layers.low_sigma, None)
    };

    high * layers.high_weight + low * layers.low_weight
}

/// Cells whose value is strictly above `threshold`
pub fn threshold_mask(field: &NoiseField, threshold: f64) -> Mask {
    field.map(|v| v > threshold)
}

/// Paint masks onto a blank canvas in order, then fill unclaimed cells
///
/// The canvas starts as all-zero channels. After compositing, every cell that
/// still holds the zero color takes `fallback`, including cells painted by a
/// black palette entry.
pub fn composite(resolution: usize, layers: &[(Color, Mask)], fallback: Color) -> Result<Pattern> {
    if resolution == 0 {
        return Err(CamoError::InvalidResolution(resolution));
    }

    let mut canvas: Grid<Color> = Grid::new(resolution, resolution, Color::default());

    for (color, mask) in layers {
        if mask.width() != resolution || mask.height() != resolution {
            return Err(CamoError::ShapeMismatch {
                expected: resolution,
                width: mask.width(),
                height: mask.height(),
            });
        }

        // Later layers overwrite whatever is already there
        for y in 0..resolution {
            for x in 0..resolution {
                if mask.get(x, y) == Some(true) {
                    canvas.set(x, y, *color);
                }
            }
        }
    }

    // Anything still at the zero sentinel was never claimed
    let sentinel = Color::default();
    let unclaimed = canvas.cells().iter().filter(|&&c| c == sentinel).count();
    info!(
        "Composited {} layers at {}x{}, {} cells take the fallback color",
        layers.len(),
        resolution,
        resolution,
        unclaimed
    );

    Ok(Pattern {
        colors: canvas.map(|c| if c == sentinel { fallback } else { c }),
    })
}

/// Generate a pattern from an injected random source
pub fn generate_with_rng<R: Rng + ?Sized>(params: &PatternParams, rng: &mut R) -> Result<Pattern> {
    params.validate()?;

    let resolution = params.resolution;
    let mut layers = Vec::with_capacity(params.palette.len());

    for (i, &color) in params.palette.iter().enumerate() {
        let combined = combined_layer(resolution, &params.layers, i, rng);
        let threshold = params.layers.threshold(i);
        let mask = threshold_mask(&combined, threshold);

        debug!(
            "Layer {}: sigma {:.2}, threshold {:.2}, {} cells claimed",
            i,
            params.layers.high_sigma(i),
            threshold,
            mask.count()
        );

        layers.push((color, mask));
    }

    composite(resolution, &layers, params.fallback)
}

/// Generate a pattern from a freshly seeded source
///
/// The same arguments always produce a bit-identical pattern.
pub fn generate(resolution: usize, palette: &[Color], fallback: Color, seed: u64) -> Result<Pattern> {
    let params = PatternParams::new(resolution, palette.to_vec(), fallback);
    let mut rng = StdRng::seed_from_u64(seed);
    generate_with_rng(&params, &mut rng)
}

/// A pattern generator seeded once when it is created
///
/// Every call to [`PatternGenerator::generate`] continues from where the
/// previous call left the random source, so repeated calls yield different
/// patterns. Call [`PatternGenerator::reseed`] to replay from the start.
#[derive(Debug, Clone)]
pub struct PatternGenerator {
    params: PatternParams,
    seed: u64,
    rng: StdRng,
}

impl PatternGenerator {
    pub fn new(params: PatternParams, seed: u64) -> Self {
        PatternGenerator {
            params,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn params(&self) -> &PatternParams {
        &self.params
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Rewind the random source to the construction seed
    pub fn reseed(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    pub fn generate(&mut self) -> Result<Pattern> {
        generate_with_rng(&self.params, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn busy_params(resolution: usize) -> PatternParams {
        // Low thresholds so every layer claims a sizeable share of cells
        PatternParams {
            layers: LayerParams {
                threshold_base: 0.5,
                threshold_step: 0.0,
                ..Default::default()
            },
            ..PatternParams::new(resolution, camo_palette(), Color::OLIVE)
        }
    }

    fn in_palette(color: Color, palette: &[Color], fallback: Color) -> bool {
        color == fallback || palette.contains(&color)
    }

    #[rstest]
    #[case(1)]
    #[case(4)]
    #[case(5)]
    #[case(50)]
    #[case(100)]
    fn test_shape_and_coverage(#[case] resolution: usize) {
        let palette = camo_palette();
        let pattern = generate(resolution, &palette, Color::OLIVE, 42).unwrap();

        assert_eq!(pattern.shape(), (resolution, resolution, 3));
        assert_eq!(pattern.cells().len(), resolution * resolution);
        assert_eq!(pattern.as_bytes().len(), resolution * resolution * 3 * 8);
        assert!(pattern.cells().iter().all(|&c| in_palette(c, &palette, Color::OLIVE)));
    }

    #[test]
    fn test_deterministic_for_seed() {
        let palette = camo_palette();
        let a = generate(64, &palette, Color::OLIVE, 42).unwrap();
        let b = generate(64, &palette, Color::OLIVE, 42).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_seeds_differ() {
        let params = busy_params(32);
        let a = generate_with_rng(&params, &mut StdRng::seed_from_u64(1)).unwrap();
        let b = generate_with_rng(&params, &mut StdRng::seed_from_u64(2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_later_layer_wins_overlap() {
        let first = Color::new(1.0, 0.0, 0.0);
        let second = Color::new(0.0, 0.0, 1.0);
        let fallback = Color::new(0.5, 0.5, 0.5);

        let mask_a = Grid::from_fn(3, 3, |x, _| x <= 1);
        let mask_b = Grid::from_fn(3, 3, |x, _| x >= 1);

        let pattern = composite(3, &[(first, mask_a), (second, mask_b)], fallback).unwrap();
        for y in 0..3 {
            assert_eq!(pattern.get(0, y), Some(first));
            assert_eq!(pattern.get(1, y), Some(second));
            assert_eq!(pattern.get(2, y), Some(second));
        }
    }

    #[test]
    fn test_unclaimed_cells_take_fallback() {
        let claimed = Color::new(0.2, 0.4, 0.6);
        let fallback = Color::new(0.9, 0.9, 0.9);
        let mask = Grid::from_fn(2, 2, |x, y| x == 0 && y == 0);

        let pattern = composite(2, &[(claimed, mask)], fallback).unwrap();
        assert_eq!(pattern.coverage(), vec![(claimed, 1), (fallback, 3)]);
    }

    #[test]
    fn test_black_cells_take_fallback() {
        let black = Color::new(0.0, 0.0, 0.0);
        let fallback = Color::new(0.0, 0.0, 0.5);
        let mask = Grid::new(2, 2, true);

        let pattern = composite(2, &[(black, mask)], fallback).unwrap();
        assert!(pattern.cells().iter().all(|&c| c == fallback));
    }

    #[test]
    fn test_black_palette_leaves_no_zero_cells() {
        let black = Color::new(0.0, 0.0, 0.0);
        let fallback = Color::new(0.0, 0.0, 0.5);
        let params = PatternParams {
            layers: LayerParams {
                threshold_base: 0.4,
                ..Default::default()
            },
            ..PatternParams::new(32, vec![black], fallback)
        };

        let pattern = generate_with_rng(&params, &mut StdRng::seed_from_u64(1)).unwrap();
        let zero_cells = pattern.cells().iter().filter(|&&c| c == black).count();
        assert_eq!(zero_cells, 0);
        assert!(pattern.cells().iter().all(|&c| c == fallback));
    }

    #[test]
    fn test_composite_rejects_mismatched_mask() {
        let mask = Grid::new(4, 3, true);
        let err = composite(4, &[(Color::NAVY, mask)], Color::OLIVE).unwrap_err();
        assert_eq!(
            err,
            CamoError::ShapeMismatch {
                expected: 4,
                width: 4,
                height: 3
            }
        );
        assert_eq!(err.to_string(), "shape mismatch: expected 4x4, found 4x3");
    }

    #[test]
    fn test_threshold_is_strict() {
        let field = NoiseField::new(2, 2, 0.65);
        assert_eq!(threshold_mask(&field, 0.65).count(), 0);
        assert_eq!(threshold_mask(&field, 0.64).count(), 4);
    }

    #[test]
    fn test_higher_threshold_index_yields_subset() {
        let layers = LayerParams::default();
        let mut rng = StdRng::seed_from_u64(9);
        let field = combined_layer(40, &layers, 0, &mut rng);

        let masks: Vec<Mask> = (0..5)
            .map(|i| threshold_mask(&field, layers.threshold(i)))
            .collect();

        for pair in masks.windows(2) {
            assert!(pair[1].is_subset_of(&pair[0]));
            assert!(pair[1].count() <= pair[0].count());
        }
    }

    #[test]
    fn test_layer_schedule() {
        let layers = LayerParams::default();
        assert_eq!(layers.high_sigma(0), 2.0);
        assert_eq!(layers.high_sigma(3), 5.0);
        assert!((layers.threshold(0) - 0.65).abs() < 1e-12);
        assert!((layers.threshold(4) - 0.85).abs() < 1e-12);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    fn test_tiny_resolution_is_all_fallback(#[case] resolution: usize) {
        let fallback = Color::new(0.1, 0.2, 0.3);
        let pattern = generate(resolution, &camo_palette(), fallback, 5).unwrap();
        assert!(pattern.cells().iter().all(|&c| c == fallback));
    }

    #[test]
    fn test_degenerate_low_layer_draws_only_high_samples() {
        let layers = LayerParams::default();
        let mut rng = StdRng::seed_from_u64(13);
        let field = combined_layer(3, &layers, 0, &mut rng);
        assert!(field.cells().iter().all(|&v| v <= layers.high_weight));

        // Only the 9 high-frequency samples were consumed
        let mut expected = StdRng::seed_from_u64(13);
        let _ = NoiseField::uniform(3, 3, &mut expected);
        assert_eq!(rng.r#gen::<u64>(), expected.r#gen::<u64>());
    }

    #[test]
    fn test_invalid_arguments() {
        let palette = camo_palette();
        assert_eq!(
            generate(0, &palette, Color::OLIVE, 1).unwrap_err(),
            CamoError::InvalidResolution(0)
        );
        assert_eq!(
            generate(8, &[], Color::OLIVE, 1).unwrap_err(),
            CamoError::EmptyPalette
        );
    }

    #[test]
    fn test_single_color_end_to_end() {
        let green = Color::new(0.0, 1.0, 0.0);
        let fallback = Color::new(0.0, 0.0, 0.5);
        let params = PatternParams::new(8, vec![green], fallback);

        let a = PatternGenerator::new(params.clone(), 1).generate().unwrap();
        let b = PatternGenerator::new(params, 1).generate().unwrap();

        assert_eq!(a.shape(), (8, 8, 3));
        assert_eq!(a.as_bytes(), b.as_bytes());
        assert!(a.cells().iter().all(|&c| c == green || c == fallback));
    }

    #[test]
    fn test_generator_advances_between_calls() {
        let mut generator = PatternGenerator::new(busy_params(32), 42);
        let first = generator.generate().unwrap();
        let second = generator.generate().unwrap();
        assert_ne!(first, second);

        generator.reseed();
        let replay = generator.generate().unwrap();
        assert_eq!(first, replay);
    }

    #[test]
    fn test_generator_matches_free_function() {
        let palette = camo_palette();
        let params = PatternParams::new(24, palette.clone(), Color::OLIVE);
        let from_generator = PatternGenerator::new(params, 7).generate().unwrap();
        let from_fn = generate(24, &palette, Color::OLIVE, 7).unwrap();
        assert_eq!(from_generator, from_fn);
    }

    #[test]
    fn test_busy_layers_show_several_colors() {
        let params = busy_params(48);
        let pattern = generate_with_rng(&params, &mut StdRng::seed_from_u64(3)).unwrap();
        assert!(pattern.coverage().len() > 1);
        assert!(
            pattern
                .cells()
                .iter()
                .all(|&c| in_palette(c, &params.palette, params.fallback))
        );
    }
}
