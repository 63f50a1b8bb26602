use rand::Rng;
use std::ops::{Add, Mul};

/// A dense row-major 2D grid
///
/// Cells are addressed as `(x, y)` where `x` is the column and `y` the row.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

/// Scalar field sampled from a pseudorandom source
pub type NoiseField = Grid<f64>;

/// Cells claimed by a single palette color
pub type Mask = Grid<bool>;

impl<T: Copy> Grid<T> {
    /// Create a grid with every cell set to `fill`
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Grid {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    /// Create a grid by evaluating `f(x, y)` in row-major order
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }

        Grid { width, height, cells }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-major view of every cell
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Set a cell, returning false when `(x, y)` is out of bounds
    pub fn set(&mut self, x: usize, y: usize, value: T) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = value;
                true
            }
            None => false,
        }
    }

    /// Apply `f` to every cell, keeping the shape
    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(|&v| f(v)).collect(),
        }
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }
}

impl NoiseField {
    /// Draw `width * height` independent samples in [0, 1), row by row
    pub fn uniform<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Self {
        Grid::from_fn(width, height, |_, _| rng.r#gen::<f64>())
    }

    /// Enlarge the field by repeating each cell as a `block` x `block` square
    ///
    /// The result always has the requested `width` and `height`. Rows and
    /// columns past the replicated extent repeat the last source row/column.
    /// An empty source yields an all-zero field.
    pub fn block_replicate(&self, block: usize, width: usize, height: usize) -> Self {
        if self.is_empty() || block == 0 {
            return Grid::new(width, height, 0.0);
        }

        Grid::from_fn(width, height, |x, y| {
            let sx = (x / block).min(self.width - 1);
            let sy = (y / block).min(self.height - 1);
            self.cells[sy * self.width + sx]
        })
    }
}

impl Mask {
    /// Number of claimed cells
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&claimed| claimed).count()
    }

    /// True when every cell claimed here is also claimed by `other`
    pub fn is_subset_of(&self, other: &Mask) -> bool {
        self.width == other.width
            && self.height == other.height
            && self
                .cells
                .iter()
                .zip(&other.cells)
                .all(|(&a, &b)| !a || b)
    }
}

/// Elementwise sum
///
/// # Panics
///
/// In debug builds, panics when the two fields differ in shape.
impl Add for NoiseField {
    type Output = NoiseField;

    fn add(mut self, rhs: NoiseField) -> NoiseField {
        debug_assert_eq!(
            (self.width, self.height),
            (rhs.width, rhs.height),
            "cannot add fields of different shapes"
        );
        for (a, b) in self.cells.iter_mut().zip(rhs.cells) {
            *a += b;
        }
        self
    }
}

impl Mul<f64> for NoiseField {
    type Output = NoiseField;

    fn mul(mut self, rhs: f64) -> NoiseField {
        for v in &mut self.cells {
            *v *= rhs;
        }
        self
    }
}
